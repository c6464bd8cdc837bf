//! Main application state and service coordination
//!
//! This module contains the AppState that owns the seek pool, runs matching
//! passes on a fixed interval, publishes the results, and serves the health
//! and metrics endpoints.

use crate::config::AppConfig;
use crate::matching::{GroupAssembler, MatchRecord, PassOutcome};
use crate::metrics::health::HealthServerConfig;
use crate::metrics::{HealthServer, MetricsCollector};
use crate::requirement::load_seeks;
use crate::service::pool::SeekPool;
use crate::service::publisher::{LogMatchPublisher, MatchPublisher};
use crate::types::SeekId;
use crate::utils::{current_timestamp, match_rng};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Running totals across passes
#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    pub passes_run: u64,
    pub matches_formed: u64,
    pub seeks_matched: u64,
    pub last_pass_at: Option<DateTime<Utc>>,
    pub last_pass_duration: Duration,
}

/// Summary of one pass as seen by the service
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub matches: Vec<MatchRecord>,
    pub matched_seeks: usize,
    pub unmatched_seeks: usize,
    pub duration: Duration,
}

/// Main application state containing all service components
pub struct AppState {
    /// Application configuration
    config: AppConfig,

    /// Waiting seeks
    pool: Arc<SeekPool>,

    /// Matching core
    assembler: Arc<GroupAssembler>,

    /// Random source shared by consecutive passes
    rng: Mutex<StdRng>,

    /// Held from snapshot to pool removal so passes never share seeks
    pass_lock: Mutex<()>,

    /// Destination for finalized matches
    publisher: Arc<dyn MatchPublisher>,

    /// Metrics collector
    metrics: Arc<MetricsCollector>,

    /// Health endpoint server, present while started
    health_server: Mutex<Option<Arc<HealthServer>>>,

    /// Background task handles
    background_tasks: Mutex<Vec<JoinHandle<()>>>,

    /// Pass statistics
    stats: RwLock<SchedulerStats>,

    /// Service status
    is_running: RwLock<bool>,

    started_at: Instant,
}

impl AppState {
    /// Initialize the application with the log publisher
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        Self::with_publisher(config, Arc::new(LogMatchPublisher)).await
    }

    /// Initialize the application with a custom match publisher
    pub async fn with_publisher(
        config: AppConfig,
        publisher: Arc<dyn MatchPublisher>,
    ) -> Result<Self, ServiceError> {
        info!("Initializing automatch service");

        crate::config::validate_config(&config).map_err(|e| ServiceError::Configuration {
            message: e.to_string(),
        })?;

        let metrics = Arc::new(MetricsCollector::new().map_err(|e| {
            ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            }
        })?);

        let pool = Arc::new(SeekPool::new());
        if let Some(path) = &config.scheduler.seek_file {
            let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                ServiceError::Initialization {
                    message: format!("Failed to read seek file {}: {}", path.display(), e),
                }
            })?;
            let seeks = load_seeks(&contents).map_err(|e| ServiceError::Initialization {
                message: format!("Failed to load seeks from {}: {}", path.display(), e),
            })?;
            let added = pool.extend(seeks).await;
            info!("Loaded {} seeks from {}", added, path.display());
        }

        if let Some(seed) = config.scheduler.rng_seed {
            info!("Matching passes use fixed seed {}", seed);
        }

        Ok(Self {
            assembler: Arc::new(GroupAssembler::new(config.matching.clone())),
            rng: Mutex::new(match_rng(config.scheduler.rng_seed)),
            pass_lock: Mutex::new(()),
            config,
            pool,
            publisher,
            metrics,
            health_server: Mutex::new(None),
            background_tasks: Mutex::new(Vec::new()),
            stats: RwLock::new(SchedulerStats::default()),
            is_running: RwLock::new(false),
            started_at: Instant::now(),
        })
    }

    /// Start the health server and the pass scheduler
    pub async fn start(self: &Arc<Self>) -> Result<(), ServiceError> {
        info!("Starting automatch service");

        {
            let mut running = self.is_running.write().await;
            if *running {
                return Err(ServiceError::BackgroundTask {
                    message: "Service already started".to_string(),
                });
            }
            *running = true;
        }

        let health_server = Arc::new(
            HealthServer::new(
                HealthServerConfig {
                    port: self.config.service.http_port,
                    host: "0.0.0.0".to_string(),
                },
                self.metrics.clone(),
            )
            .with_app_state(self.clone()),
        );
        *self.health_server.lock().await = Some(health_server.clone());

        let mut tasks = self.background_tasks.lock().await;

        tasks.push(tokio::spawn(async move {
            if let Err(e) = health_server.start().await {
                error!("Health server failed: {}", e);
            }
        }));

        let state = self.clone();
        tasks.push(tokio::spawn(async move {
            state.pass_loop().await;
        }));

        self.metrics.update_component_health("scheduler", true);
        info!(
            "✅ Automatch service started, passes every {}s",
            self.config.scheduler.pass_interval_seconds
        );
        Ok(())
    }

    /// Stop background tasks
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        info!("Starting graceful shutdown of automatch service");

        *self.is_running.write().await = false;

        if let Some(server) = self.health_server.lock().await.take() {
            if let Err(e) = server.stop().await {
                warn!("Failed to stop health server: {}", e);
            }
        }

        for task in self.background_tasks.lock().await.drain(..) {
            task.abort();
        }
        self.metrics.update_component_health("scheduler", false);

        let stats = self.stats().await;
        info!(
            "Final statistics: {} passes, {} matches, {} seeks matched, {} seeks waiting",
            stats.passes_run,
            stats.matches_formed,
            stats.seeks_matched,
            self.pool.len().await
        );
        Ok(())
    }

    async fn pass_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.config.pass_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; wait a full interval first.
        interval.tick().await;

        while self.is_running().await {
            interval.tick().await;
            if !self.is_running().await {
                break;
            }

            self.run_pass().await;
            self.metrics.update_uptime(self.started_at.elapsed());
        }

        debug!("Pass loop stopped");
    }

    /// Run one matching pass over the current pool
    ///
    /// Concurrent calls are serialized up to the pool update, so a seek is
    /// consumed by at most one pass. Matched seeks are removed from the pool
    /// before the matches are published. Publication failures are logged and counted; the seeks
    /// stay consumed.
    pub async fn run_pass(&self) -> PassSummary {
        let timer = self.metrics.start_timer();
        let pass_guard = self.pass_lock.lock().await;
        let snapshot = self.pool.snapshot().await;

        let outcome: PassOutcome = {
            let mut rng = self.rng.lock().await;
            self.assembler.run_pass(&snapshot, &mut *rng)
        };
        let duration = timer.stop();

        let matched: HashSet<SeekId> = outcome.matches.iter().flat_map(|m| m.seek_ids()).collect();
        let removed = self.pool.remove(&matched).await;
        drop(pass_guard);
        if removed != matched.len() {
            warn!(
                "{} matched seeks were already gone from the pool",
                matched.len() - removed
            );
        }

        for game in &outcome.matches {
            if let Err(e) = self.publisher.publish_match(game).await {
                error!("Failed to publish match {}: {}", game.match_id, e);
                self.metrics.record_publish_error();
            }
        }

        self.metrics.record_pass(&outcome, duration);

        {
            let mut stats = self.stats.write().await;
            stats.passes_run += 1;
            stats.matches_formed += outcome.matches.len() as u64;
            stats.seeks_matched += outcome.matched_seek_count() as u64;
            stats.last_pass_at = Some(current_timestamp());
            stats.last_pass_duration = duration;
        }

        info!(
            "Pass complete - {} seeks, {} matches, {} unmatched, {} trials, {:.2}ms",
            snapshot.len(),
            outcome.matches.len(),
            outcome.unmatched.len(),
            outcome.stats.trials,
            duration.as_secs_f64() * 1000.0
        );

        PassSummary {
            matched_seeks: outcome.matched_seek_count(),
            unmatched_seeks: outcome.unmatched.len(),
            matches: outcome.matches.iter().map(|m| m.to_record()).collect(),
            duration,
        }
    }

    /// Get service configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Check if service is running
    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }

    /// Get the seek pool
    pub fn pool(&self) -> Arc<SeekPool> {
        self.pool.clone()
    }

    /// Get the metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Get pass statistics
    pub async fn stats(&self) -> SchedulerStats {
        self.stats.read().await.clone()
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, RatingTier, Requirement, Seek};

    fn seeded_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.scheduler.rng_seed = Some(1234);
        config
    }

    fn casual_pair(name: &str) -> Seek {
        Seek::new(
            Player::new(name),
            vec![
                Requirement::party_size(2, 2),
                Requirement::rating_tier(RatingTier::Casual),
            ],
        )
    }

    #[tokio::test]
    async fn test_run_pass_consumes_matched_seeks() {
        let state = AppState::new(seeded_config()).await.unwrap();
        state
            .pool()
            .extend((0..5).map(|i| casual_pair(&format!("p{i}"))))
            .await;

        let summary = state.run_pass().await;

        assert_eq!(summary.matches.len(), 2);
        assert_eq!(summary.matched_seeks, 4);
        assert_eq!(summary.unmatched_seeks, 1);
        assert_eq!(state.pool().len().await, 1);

        let stats = state.stats().await;
        assert_eq!(stats.passes_run, 1);
        assert_eq!(stats.matches_formed, 2);
        assert!(stats.last_pass_at.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_passes_never_share_seeks() {
        let state = Arc::new(AppState::new(seeded_config()).await.unwrap());
        state
            .pool()
            .extend((0..2000).map(|i| casual_pair(&format!("p{i}"))))
            .await;

        let first = tokio::spawn({
            let state = state.clone();
            async move { state.run_pass().await }
        });
        let second = tokio::spawn({
            let state = state.clone();
            async move { state.run_pass().await }
        });
        let (first, second) = (first.await.unwrap(), second.await.unwrap());

        let mut seen = HashSet::new();
        for record in first.matches.iter().chain(&second.matches) {
            for player in &record.players {
                assert!(seen.insert(player.clone()), "{player} matched twice");
            }
        }
        assert_eq!(seen.len(), 2000);
        assert_eq!(first.matched_seeks + second.matched_seeks, 2000);
        assert!(state.pool().is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_pool_pass() {
        let state = AppState::new(seeded_config()).await.unwrap();
        let summary = state.run_pass().await;

        assert!(summary.matches.is_empty());
        assert_eq!(state.metrics().pass().passes_total.get(), 1);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.matching.max_trials = 0;

        let result = AppState::new(config).await;
        assert!(matches!(result, Err(ServiceError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_missing_seek_file() {
        let mut config = AppConfig::default();
        config.scheduler.seek_file = Some("/nonexistent/seeks.json".into());

        let result = AppState::new(config).await;
        assert!(matches!(result, Err(ServiceError::Initialization { .. })));
    }
}
