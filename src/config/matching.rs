//! Matching pass configuration

use crate::matching::room::DEFAULT_ROOM;
use crate::types::RatingTier;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Shape of a matching pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Rating tiers in the order they are searched
    pub tier_priority: Vec<RatingTier>,
    /// Party sizes tried within each tier, largest first
    pub party_sizes: Vec<usize>,
    /// Candidate groups tried per anchor before giving up on it
    pub max_trials: usize,
    /// Room label attached to every match
    pub default_room: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            tier_priority: RatingTier::PRIORITY.to_vec(),
            party_sizes: vec![6, 5, 4, 3, 2],
            max_trials: 5,
            default_room: DEFAULT_ROOM.to_string(),
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tier_priority.is_empty() {
            return Err(anyhow!("Tier priority cannot be empty"));
        }
        for (i, tier) in self.tier_priority.iter().enumerate() {
            if self.tier_priority[..i].contains(tier) {
                return Err(anyhow!("Tier '{}' listed more than once", tier));
            }
        }

        if self.party_sizes.is_empty() {
            return Err(anyhow!("Party sizes cannot be empty"));
        }
        if self.party_sizes.contains(&0) {
            return Err(anyhow!("Party sizes must be at least 1"));
        }
        if self.party_sizes.windows(2).any(|w| w[0] <= w[1]) {
            return Err(anyhow!(
                "Party sizes must be strictly descending: {:?}",
                self.party_sizes
            ));
        }

        if self.max_trials == 0 {
            return Err(anyhow!("Max trials must be greater than 0"));
        }
        if self.default_room.trim().is_empty() {
            return Err(anyhow!("Default room cannot be empty"));
        }

        Ok(())
    }

    /// Parse a comma separated list of party sizes, e.g. "6,5,4,3,2"
    pub fn parse_party_sizes(value: &str) -> Result<Vec<usize>> {
        value
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| anyhow!("Invalid party size '{}'", part.trim()))
            })
            .collect()
    }

    /// Parse a comma separated list of tiers, e.g. "pro,casual,unrated"
    pub fn parse_tier_priority(value: &str) -> Result<Vec<RatingTier>> {
        value
            .split(',')
            .map(|part| part.parse::<RatingTier>().map_err(|e| anyhow!(e)))
            .collect()
    }
}
