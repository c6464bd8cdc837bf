//! Compatibility predicates over seeks

use crate::types::{RatingTier, Requirement, Seek};

/// Build the acceptance test for games of `party_size` players under `tier`
///
/// A seek passes when every party size bound it carries contains
/// `party_size` and every rating tier it names is exactly `tier`. Seeks
/// without a bound or tier accept anything on that axis.
pub fn accepts(party_size: usize, tier: RatingTier) -> impl Fn(&Seek) -> bool {
    move |seek: &Seek| {
        seek.requirements
            .iter()
            .all(|req| requirement_satisfied(req, party_size, tier))
    }
}

/// Whether one requirement holds for a game of the given size and tier
pub fn requirement_satisfied(requirement: &Requirement, party_size: usize, tier: RatingTier) -> bool {
    match requirement {
        Requirement::PartySize {
            min_players,
            max_players,
        } => (*min_players as usize..=*max_players as usize).contains(&party_size),
        Requirement::RatingTier { tier: wanted } => *wanted == tier,
        // Score display preferences are merged, never a reason to refuse
        Requirement::ScoreDisplay { .. } => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, ScoreDisplay};

    fn seek(requirements: Vec<Requirement>) -> Seek {
        Seek::new(Player::new("alice"), requirements)
    }

    #[test]
    fn test_party_size_bounds_inclusive() {
        let s = seek(vec![Requirement::party_size(2, 4)]);
        assert!(!accepts(1, RatingTier::Casual)(&s));
        assert!(accepts(2, RatingTier::Casual)(&s));
        assert!(accepts(4, RatingTier::Casual)(&s));
        assert!(!accepts(5, RatingTier::Casual)(&s));
    }

    #[test]
    fn test_tier_must_match_exactly() {
        let pro = seek(vec![Requirement::rating_tier(RatingTier::Pro)]);
        let casual = seek(vec![Requirement::rating_tier(RatingTier::Casual)]);

        assert!(accepts(3, RatingTier::Pro)(&pro));
        assert!(!accepts(3, RatingTier::Casual)(&pro));
        assert!(!accepts(3, RatingTier::Pro)(&casual));
        assert!(!accepts(3, RatingTier::Unrated)(&casual));
    }

    #[test]
    fn test_no_requirements_accepts_everything() {
        let s = seek(vec![]);
        for tier in RatingTier::PRIORITY {
            for size in 2..=6 {
                assert!(accepts(size, tier)(&s));
            }
        }
    }

    #[test]
    fn test_repeated_requirements_are_conjoined() {
        let s = seek(vec![
            Requirement::party_size(2, 5),
            Requirement::party_size(4, 6),
            Requirement::rating_tier(RatingTier::Casual),
            Requirement::rating_tier(RatingTier::Pro),
        ]);

        assert!(!accepts(4, RatingTier::Casual)(&s));

        let s = seek(vec![Requirement::party_size(2, 5), Requirement::party_size(4, 6)]);
        assert!(!accepts(3, RatingTier::Pro)(&s));
        assert!(accepts(4, RatingTier::Pro)(&s));
        assert!(accepts(5, RatingTier::Pro)(&s));
        assert!(!accepts(6, RatingTier::Pro)(&s));
    }

    #[test]
    fn test_score_display_never_blocks() {
        let s = seek(vec![Requirement::score_display(ScoreDisplay::Off)]);
        assert!(accepts(6, RatingTier::Unrated)(&s));
    }
}
