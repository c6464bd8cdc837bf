//! Common types used throughout the automatch service

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Player display name, unique within a pass
pub type PlayerName = String;

/// Unique identifier for seeks
pub type SeekId = Uuid;

/// Unique identifier for finalized matches
pub type MatchId = Uuid;

/// Rating system a game is played under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    Pro,
    Casual,
    Unrated,
}

impl RatingTier {
    /// Tiers in the order a pass tries them
    pub const PRIORITY: [RatingTier; 3] = [RatingTier::Pro, RatingTier::Casual, RatingTier::Unrated];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingTier::Pro => "pro",
            RatingTier::Casual => "casual",
            RatingTier::Unrated => "unrated",
        }
    }
}

impl std::fmt::Display for RatingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RatingTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro" => Ok(RatingTier::Pro),
            "casual" => Ok(RatingTier::Casual),
            "unrated" => Ok(RatingTier::Unrated),
            other => Err(format!("unknown rating tier '{}'", other)),
        }
    }
}

/// Whether running victory-point totals are shown during the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreDisplay {
    On,
    Off,
    #[default]
    Unset,
}

impl ScoreDisplay {
    pub fn is_set(&self) -> bool {
        !matches!(self, ScoreDisplay::Unset)
    }
}

impl std::fmt::Display for ScoreDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreDisplay::On => write!(f, "on"),
            ScoreDisplay::Off => write!(f, "off"),
            ScoreDisplay::Unset => write!(f, "unset"),
        }
    }
}

/// A single constraint a seek places on any game it joins
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Requirement {
    /// Inclusive bounds on the number of players in the game
    PartySize { min_players: u32, max_players: u32 },
    /// Game must be played under exactly this rating tier
    RatingTier { tier: RatingTier },
    /// Preferred score display setting
    ScoreDisplay { value: ScoreDisplay },
}

impl Requirement {
    pub fn party_size(min_players: u32, max_players: u32) -> Self {
        Requirement::PartySize {
            min_players,
            max_players,
        }
    }

    pub fn rating_tier(tier: RatingTier) -> Self {
        Requirement::RatingTier { tier }
    }

    pub fn score_display(value: ScoreDisplay) -> Self {
        Requirement::ScoreDisplay { value }
    }
}

/// Player information attached to a seek
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub name: PlayerName,
    /// Content sets the player owns, used to prefer well-stocked hosts
    pub sets_owned: Vec<String>,
    /// Whether this player's client can act as a game host
    pub can_host: bool,
}

impl Player {
    pub fn new(name: impl Into<PlayerName>) -> Self {
        Self {
            name: name.into(),
            sets_owned: Vec::new(),
            can_host: true,
        }
    }

    pub fn with_sets<I, S>(mut self, sets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sets_owned = sets.into_iter().map(Into::into).collect();
        self
    }

    pub fn without_hosting(mut self) -> Self {
        self.can_host = false;
        self
    }

    pub fn set_count(&self) -> usize {
        self.sets_owned.len()
    }
}

/// A player's open request to be matched into a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Seek {
    pub id: SeekId,
    pub player: Player,
    pub requirements: Vec<Requirement>,
}

impl Seek {
    pub fn new(player: Player, requirements: Vec<Requirement>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            requirements,
        }
    }

    pub fn player_name(&self) -> &str {
        &self.player.name
    }

    /// Score display preferences in the order they were stated
    pub fn score_display_preferences(&self) -> impl Iterator<Item = ScoreDisplay> + '_ {
        self.requirements.iter().filter_map(|req| match req {
            Requirement::ScoreDisplay { value } => Some(*value),
            _ => None,
        })
    }
}
