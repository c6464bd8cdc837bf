//! Configuration management for the automatch service
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for the service.

pub mod app;
pub mod matching;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, SchedulerSettings, ServiceSettings};
pub use matching::MatchingConfig;
