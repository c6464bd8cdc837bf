//! Test fixtures and mock implementations for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use automatch::error::{MatchmakingError, Result};
use automatch::matching::{GameMatch, MatchRecord};
use automatch::service::MatchPublisher;
use automatch::types::{Player, RatingTier, Requirement, ScoreDisplay, Seek};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock match publisher that captures published matches for testing
#[derive(Debug, Default)]
pub struct MockMatchPublisher {
    published: Arc<Mutex<Vec<MatchRecord>>>,
    failing: AtomicBool,
}

impl MockMatchPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publisher that rejects every match
    pub fn failing() -> Self {
        Self {
            published: Arc::new(Mutex::new(Vec::new())),
            failing: AtomicBool::new(true),
        }
    }

    /// Get all published match records (for testing)
    pub fn published(&self) -> Vec<MatchRecord> {
        self.published
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.published().len()
    }
}

#[async_trait]
impl MatchPublisher for MockMatchPublisher {
    async fn publish_match(&self, game: &GameMatch) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MatchmakingError::PublishFailed {
                match_id: game.match_id.to_string(),
                reason: "publisher offline".to_string(),
            }
            .into());
        }

        if let Ok(mut records) = self.published.lock() {
            records.push(game.to_record());
        }
        Ok(())
    }
}

/// Builder for seeks used across integration tests
#[derive(Debug, Clone)]
pub struct SeekBuilder {
    player: Player,
    requirements: Vec<Requirement>,
}

impl SeekBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            player: Player::new(name),
            requirements: Vec::new(),
        }
    }

    pub fn party(mut self, min_players: u32, max_players: u32) -> Self {
        self.requirements
            .push(Requirement::party_size(min_players, max_players));
        self
    }

    pub fn tier(mut self, tier: RatingTier) -> Self {
        self.requirements.push(Requirement::rating_tier(tier));
        self
    }

    pub fn score(mut self, value: ScoreDisplay) -> Self {
        self.requirements.push(Requirement::score_display(value));
        self
    }

    pub fn sets(mut self, sets: &[&str]) -> Self {
        self.player = self.player.with_sets(sets.iter().copied());
        self
    }

    pub fn no_host(mut self) -> Self {
        self.player = self.player.without_hosting();
        self
    }

    pub fn build(self) -> Seek {
        Seek::new(self.player, self.requirements)
    }
}

/// `count` seeks named `{prefix}{i}` that all want exactly `size` players in `tier`
pub fn uniform_seeks(prefix: &str, count: usize, size: u32, tier: RatingTier) -> Vec<Seek> {
    (0..count)
        .map(|i| {
            SeekBuilder::new(&format!("{prefix}{i}"))
                .party(size, size)
                .tier(tier)
                .build()
        })
        .collect()
}

/// Seek file contents in the JSON ingestion format
pub const SAMPLE_SEEK_FILE: &str = r#"[
    {
        "player": {"name": "alice", "sets_owned": ["base", "seafarers"]},
        "requirements": [
            {"kind": "party_size", "min_players": "3", "max_players": "4"},
            {"kind": "rating_tier", "tier": "casual"},
            {"kind": "score_display", "value": "off"}
        ]
    },
    {
        "player": {"name": "bob"},
        "requirements": [
            {"kind": "party_size", "min_players": 2, "max_players": 4},
            {"kind": "rating_tier", "tier": "casual"}
        ]
    },
    {
        "player": {"name": "carol", "sets_owned": ["base"], "can_host": false},
        "requirements": [
            {"kind": "party_size", "min_players": 3, "max_players": 3},
            {"kind": "rating_tier", "tier": "casual"},
            {"kind": "score_display", "value": "on"}
        ]
    },
    {
        "player": {"name": "dave"},
        "requirements": [
            {"kind": "party_size", "min_players": 2, "max_players": 2},
            {"kind": "rating_tier", "tier": "pro"}
        ]
    }
]"#;
