//! Seek record ingestion
//!
//! Seek records come from the pool owner as JSON. Party size bounds have been
//! seen both as integers and as numeric strings, so they are normalized here,
//! and anything that does not parse is rejected with
//! [`MatchmakingError::InvalidRequirement`] before it reaches a pass.

use crate::error::{MatchmakingError, Result};
use crate::types::{Player, RatingTier, Requirement, ScoreDisplay, Seek, SeekId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// A party size bound as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundValue {
    Integer(i64),
    Text(String),
    /// Anything else (floats, booleans, null); always rejected
    Other(serde_json::Value),
}

impl BoundValue {
    /// Normalize to a player count
    fn to_count(&self) -> std::result::Result<u32, String> {
        match self {
            BoundValue::Integer(value) => u32::try_from(*value)
                .map_err(|_| format!("bound {} is out of range", value)),
            BoundValue::Text(text) => text
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("bound '{}' is not a player count", text)),
            BoundValue::Other(value) => Err(format!("bound {} is not a player count", value)),
        }
    }
}

impl From<u32> for BoundValue {
    fn from(value: u32) -> Self {
        BoundValue::Integer(i64::from(value))
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        BoundValue::Text(value.to_string())
    }
}

/// Raw requirement record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementRecord {
    PartySize {
        min_players: BoundValue,
        max_players: BoundValue,
    },
    RatingTier {
        tier: RatingTier,
    },
    ScoreDisplay {
        #[serde(default)]
        value: ScoreDisplay,
    },
}

/// Raw player record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    #[serde(default)]
    pub sets_owned: Vec<String>,
    #[serde(default = "default_can_host")]
    pub can_host: bool,
}

fn default_can_host() -> bool {
    true
}

/// Raw seek record as supplied by the pool owner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeekRecord {
    #[serde(default)]
    pub id: Option<SeekId>,
    pub player: PlayerRecord,
    #[serde(default)]
    pub requirements: Vec<RequirementRecord>,
}

impl RequirementRecord {
    fn validate(&self, seek: &str) -> std::result::Result<Requirement, MatchmakingError> {
        let invalid = |reason: String| MatchmakingError::InvalidRequirement {
            seek: seek.to_string(),
            reason,
        };

        match self {
            RequirementRecord::PartySize {
                min_players,
                max_players,
            } => {
                let min = min_players.to_count().map_err(invalid)?;
                let max = max_players.to_count().map_err(invalid)?;
                if min > max {
                    return Err(invalid(format!(
                        "party size minimum {} exceeds maximum {}",
                        min, max
                    )));
                }
                Ok(Requirement::party_size(min, max))
            }
            RequirementRecord::RatingTier { tier } => Ok(Requirement::rating_tier(*tier)),
            RequirementRecord::ScoreDisplay { value } => Ok(Requirement::score_display(*value)),
        }
    }
}

impl SeekRecord {
    /// Validate the record into a typed seek
    pub fn into_seek(self) -> std::result::Result<Seek, MatchmakingError> {
        let name = self.player.name.trim().to_string();
        if name.is_empty() {
            return Err(MatchmakingError::InvalidRequirement {
                seek: self.id.map(|id| id.to_string()).unwrap_or_default(),
                reason: "player name is empty".to_string(),
            });
        }

        let requirements = self
            .requirements
            .iter()
            .map(|record| record.validate(&name))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Seek {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            player: Player {
                name,
                sets_owned: self.player.sets_owned,
                can_host: self.player.can_host,
            },
            requirements,
        })
    }
}

/// Parse and validate a JSON array of seek records
///
/// Fails on the first malformed record; nothing is returned partially.
pub fn load_seeks(json: &str) -> Result<Vec<Seek>> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut seeks = Vec::with_capacity(records.len());

    for (index, value) in records.into_iter().enumerate() {
        let record: SeekRecord = serde_json::from_value(value).map_err(|e| {
            MatchmakingError::InvalidSeekRecord {
                index,
                reason: e.to_string(),
            }
        })?;

        match record.into_seek() {
            Ok(seek) => seeks.push(seek),
            Err(e) => {
                warn!("Rejected seek record at position {}: {}", index, e);
                return Err(e.into());
            }
        }
    }

    debug!("Loaded {} seeks", seeks.len());
    Ok(seeks)
}
