//! Match publication
//!
//! Finalized matches are handed to a publisher once the pool has been
//! updated. The default publisher writes the match record to the log.

use crate::error::Result;
use crate::matching::GameMatch;
use async_trait::async_trait;
use tracing::info;

/// Trait for publishing finalized matches
#[async_trait]
pub trait MatchPublisher: Send + Sync {
    /// Publish a finalized match
    async fn publish_match(&self, game: &GameMatch) -> Result<()>;
}

/// Publisher that logs each match record as JSON
#[derive(Debug, Clone, Default)]
pub struct LogMatchPublisher;

#[async_trait]
impl MatchPublisher for LogMatchPublisher {
    async fn publish_match(&self, game: &GameMatch) -> Result<()> {
        let record = serde_json::to_string(&game.to_record())?;
        info!(match_id = %game.match_id, "Match ready: {}", record);
        Ok(())
    }
}
