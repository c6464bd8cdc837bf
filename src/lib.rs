//! Automatch - periodic matchmaking for waiting game seeks
//!
//! This crate groups players' open seeks into hosted games. Each pass walks
//! rating tiers in priority order and party sizes from largest to smallest,
//! samples candidate groups at random, and keeps those with a legal host.

pub mod config;
pub mod error;
pub mod matching;
pub mod metrics;
pub mod requirement;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use matching::{FeasibilityOracle, GameMatch, GroupAssembler, PassOutcome};
pub use requirement::{accepts, load_seeks};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
