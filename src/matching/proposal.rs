//! Tentative and finalized matches
//!
//! A [`Proposal`] is a candidate group under a rating tier, before a host is
//! known. Once a legal host is found it is finalized into a [`GameMatch`].

use crate::requirement::requirement_satisfied;
use crate::types::{MatchId, Player, PlayerName, RatingTier, ScoreDisplay, Seek, SeekId};
use crate::utils::{current_timestamp, generate_match_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate group of seeks, in the order they were drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub seeks: Vec<Seek>,
    pub tier: RatingTier,
}

impl Proposal {
    pub fn new(seeks: Vec<Seek>, tier: RatingTier) -> Self {
        Self { seeks, tier }
    }

    pub fn size(&self) -> usize {
        self.seeks.len()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.seeks.iter().map(|seek| &seek.player)
    }

    /// Whether the group is valid with `host` running the game
    pub fn is_match_ok(&self, host: &str) -> bool {
        requirements_hold(&self.seeks, self.tier, host)
    }

    /// Turn the proposal into a match hosted by `host`
    pub fn finalize(self, host: &Player, room: String) -> GameMatch {
        let score_display = reconcile_score_display(&self.seeks);

        GameMatch {
            match_id: generate_match_id(),
            host: host.name.clone(),
            tier: self.tier,
            score_display,
            room,
            seeks: self.seeks,
            created_at: current_timestamp(),
        }
    }
}

/// A finalized game proposal
#[derive(Debug, Clone, PartialEq)]
pub struct GameMatch {
    pub match_id: MatchId,
    /// Participating seeks in draw order
    pub seeks: Vec<Seek>,
    pub tier: RatingTier,
    pub host: PlayerName,
    pub score_display: ScoreDisplay,
    pub room: String,
    pub created_at: DateTime<Utc>,
}

impl GameMatch {
    pub fn size(&self) -> usize {
        self.seeks.len()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.seeks.iter().map(|seek| &seek.player)
    }

    pub fn seek_ids(&self) -> impl Iterator<Item = SeekId> + '_ {
        self.seeks.iter().map(|seek| seek.id)
    }

    pub fn host_player(&self) -> Option<&Player> {
        self.players().find(|player| player.name == self.host)
    }

    /// Whether the match would still be valid with `host` running it
    pub fn is_match_ok(&self, host: &str) -> bool {
        requirements_hold(&self.seeks, self.tier, host)
    }

    /// Serializable summary used for logs and publication
    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            match_id: self.match_id,
            players: self.players().map(|p| p.name.clone()).collect(),
            tier: self.tier,
            host: self.host.clone(),
            score_display: self.score_display,
            room: self.room.clone(),
            created_at: self.created_at,
        }
    }
}

/// Flat view of a match for diagnostics and downstream consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub players: Vec<PlayerName>,
    pub tier: RatingTier,
    pub host: PlayerName,
    pub score_display: ScoreDisplay,
    pub room: String,
    pub created_at: DateTime<Utc>,
}

/// Merge score display preferences across a group
///
/// The last explicit preference in group order wins. Disagreement is not
/// detected.
pub fn reconcile_score_display(seeks: &[Seek]) -> ScoreDisplay {
    seeks
        .iter()
        .flat_map(|seek| seek.score_display_preferences())
        .filter(ScoreDisplay::is_set)
        .last()
        .unwrap_or_default()
}

/// Every participant's requirements hold and `host` is a participant able to host
fn requirements_hold(seeks: &[Seek], tier: RatingTier, host: &str) -> bool {
    let host_eligible = seeks
        .iter()
        .any(|seek| seek.player.name == host && seek.player.can_host);

    host_eligible
        && seeks.iter().all(|seek| {
            seek.requirements
                .iter()
                .all(|req| requirement_satisfied(req, seeks.len(), tier))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Requirement;

    fn seek(name: &str, requirements: Vec<Requirement>) -> Seek {
        Seek::new(Player::new(name), requirements)
    }

    fn display(value: ScoreDisplay) -> Requirement {
        Requirement::score_display(value)
    }

    #[test]
    fn test_score_display_single_opinion_wins() {
        let seeks = vec![
            seek("a", vec![]),
            seek("b", vec![display(ScoreDisplay::On)]),
            seek("c", vec![display(ScoreDisplay::Unset)]),
        ];
        assert_eq!(reconcile_score_display(&seeks), ScoreDisplay::On);
    }

    #[test]
    fn test_score_display_last_explicit_value_wins() {
        let seeks = vec![
            seek("a", vec![display(ScoreDisplay::On)]),
            seek("b", vec![display(ScoreDisplay::Off)]),
            seek("c", vec![display(ScoreDisplay::Unset)]),
        ];
        assert_eq!(reconcile_score_display(&seeks), ScoreDisplay::Off);
    }

    #[test]
    fn test_score_display_defaults_to_unset() {
        let seeks = vec![seek("a", vec![]), seek("b", vec![display(ScoreDisplay::Unset)])];
        assert_eq!(reconcile_score_display(&seeks), ScoreDisplay::Unset);
    }

    #[test]
    fn test_is_match_ok_checks_every_participant() {
        let proposal = Proposal::new(
            vec![
                seek("a", vec![Requirement::party_size(2, 2)]),
                seek("b", vec![Requirement::party_size(3, 4)]),
            ],
            RatingTier::Casual,
        );
        assert!(!proposal.is_match_ok("a"));

        let proposal = Proposal::new(
            vec![
                seek("a", vec![Requirement::party_size(2, 2)]),
                seek("b", vec![Requirement::rating_tier(RatingTier::Casual)]),
            ],
            RatingTier::Casual,
        );
        assert!(proposal.is_match_ok("a"));
        assert!(proposal.is_match_ok("b"));
    }

    #[test]
    fn test_is_match_ok_rejects_outsiders_and_non_hosts() {
        let proposal = Proposal::new(
            vec![
                Seek::new(Player::new("a").without_hosting(), vec![]),
                seek("b", vec![]),
            ],
            RatingTier::Unrated,
        );
        assert!(!proposal.is_match_ok("a"));
        assert!(proposal.is_match_ok("b"));
        assert!(!proposal.is_match_ok("zed"));
    }

    #[test]
    fn test_finalize_and_record() {
        let a = seek("a", vec![display(ScoreDisplay::Off)]);
        let b = seek("b", vec![]);
        let host = b.player.clone();
        let proposal = Proposal::new(vec![a.clone(), b.clone()], RatingTier::Pro);

        let game = proposal.finalize(&host, "Outpost".to_string());
        assert_eq!(game.host, "b");
        assert_eq!(game.score_display, ScoreDisplay::Off);
        assert_eq!(game.seek_ids().collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(game.host_player(), Some(&host));

        let record = game.to_record();
        assert_eq!(record.players, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(record.room, "Outpost");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["tier"], "pro");
        assert_eq!(json["score_display"], "off");
    }
}
