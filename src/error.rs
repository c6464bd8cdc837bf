//! Error types for the automatch service
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific matchmaking scenarios
#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    #[error("Invalid requirement on seek from '{seek}': {reason}")]
    InvalidRequirement { seek: String, reason: String },

    #[error("Invalid seek record at position {index}: {reason}")]
    InvalidSeekRecord { index: usize, reason: String },

    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    #[error("Failed to publish match {match_id}: {reason}")]
    PublishFailed { match_id: String, reason: String },
}
