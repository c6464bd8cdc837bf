//! Main application configuration
//!
//! This module defines the primary configuration structures for the automatch
//! service, including environment variable and TOML loading and validation.

use crate::config::matching::MatchingConfig;
use crate::error::MatchmakingError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub scheduler: SchedulerSettings,
    pub matching: MatchingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for the health and metrics endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Pass scheduling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Seconds between matching passes
    pub pass_interval_seconds: u64,
    /// Fixed seed for the pass random source
    pub rng_seed: Option<u64>,
    /// JSON file of seeks loaded into the pool at startup
    pub seek_file: Option<PathBuf>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "automatch".to_string(),
            log_level: "info".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            pass_interval_seconds: 30,
            rng_seed: None,
            seek_file: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            self.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            self.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Scheduler settings
        if let Ok(interval) = env::var("PASS_INTERVAL_SECONDS") {
            self.scheduler.pass_interval_seconds = interval
                .parse()
                .map_err(|_| anyhow!("Invalid PASS_INTERVAL_SECONDS value: {}", interval))?;
        }
        if let Ok(seed) = env::var("MATCH_RNG_SEED") {
            self.scheduler.rng_seed = Some(
                seed.parse()
                    .map_err(|_| anyhow!("Invalid MATCH_RNG_SEED value: {}", seed))?,
            );
        }
        if let Ok(path) = env::var("SEEK_FILE") {
            self.scheduler.seek_file = Some(PathBuf::from(path));
        }

        // Matching settings
        if let Ok(trials) = env::var("MAX_TRIALS") {
            self.matching.max_trials = trials
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_TRIALS value: {}", trials))?;
        }
        if let Ok(sizes) = env::var("PARTY_SIZES") {
            self.matching.party_sizes = MatchingConfig::parse_party_sizes(&sizes)
                .with_context(|| format!("Invalid PARTY_SIZES value: {}", sizes))?;
        }
        if let Ok(tiers) = env::var("TIER_PRIORITY") {
            self.matching.tier_priority = MatchingConfig::parse_tier_priority(&tiers)
                .with_context(|| format!("Invalid TIER_PRIORITY value: {}", tiers))?;
        }
        if let Ok(room) = env::var("DEFAULT_ROOM") {
            self.matching.default_room = room;
        }

        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }

    /// Get the pass interval as Duration
    pub fn pass_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.pass_interval_seconds)
    }
}

/// Validate configuration values
///
/// Failures are reported as [`MatchmakingError::ConfigurationError`].
pub fn validate_config(config: &AppConfig) -> Result<()> {
    check_values(config).map_err(|e| {
        MatchmakingError::ConfigurationError {
            message: e.to_string(),
        }
        .into()
    })
}

fn check_values(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    if config.scheduler.pass_interval_seconds == 0 {
        return Err(anyhow!("Pass interval must be greater than 0"));
    }

    config.matching.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RatingTier;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.pass_interval(), Duration::from_secs(30));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = AppConfig::default();
        config.scheduler.pass_interval_seconds = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_failure_is_configuration_error() {
        let mut config = AppConfig::default();
        config.matching.party_sizes = vec![2, 4];

        let err = validate_config(&config).unwrap_err();
        match err.downcast_ref::<MatchmakingError>() {
            Some(MatchmakingError::ConfigurationError { message }) => {
                assert!(message.contains("strictly descending"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [scheduler]
            pass_interval_seconds = 10
            rng_seed = 99

            [matching]
            party_sizes = [4, 3, 2]
            tier_priority = ["casual", "unrated"]
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler.pass_interval_seconds, 10);
        assert_eq!(config.scheduler.rng_seed, Some(99));
        assert_eq!(config.matching.party_sizes, vec![4, 3, 2]);
        assert_eq!(
            config.matching.tier_priority,
            vec![RatingTier::Casual, RatingTier::Unrated]
        );
        assert_eq!(config.matching.max_trials, 5);
        assert_eq!(config.service.name, "automatch");
        assert!(validate_config(&config).is_ok());
    }
}
