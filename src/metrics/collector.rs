//! Metrics collection using Prometheus
//!
//! This module provides metrics collection for the automatch service using
//! Prometheus metrics.

use crate::matching::PassOutcome;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the automatch service
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Per-pass metrics
    pass_metrics: PassMetrics,

    /// Match output metrics
    match_metrics: MatchMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service uptime in seconds
    pub uptime_seconds: IntGauge,

    /// Health check status (0=unhealthy, 1=degraded, 2=healthy)
    pub health_status: IntGauge,

    /// Component health status
    pub component_health: IntGaugeVec,

    /// Matches that could not be published
    pub publish_errors_total: IntCounter,
}

/// Metrics describing matching passes
#[derive(Clone)]
pub struct PassMetrics {
    /// Total passes run
    pub passes_total: IntCounter,

    /// Wall time of a pass
    pub pass_duration_seconds: Histogram,

    /// Seeks in the pool at the start of the last pass
    pub pool_size: IntGauge,

    /// Seeks left unmatched by the last pass
    pub unmatched_seeks: IntGauge,

    /// Candidate groups tested, by outcome
    pub trials_total: IntCounterVec,

    /// Anchors dropped after exhausting their trials
    pub abandoned_anchors_total: IntCounter,
}

/// Metrics describing produced matches
#[derive(Clone)]
pub struct MatchMetrics {
    /// Matches formed by tier and party size
    pub matches_total: IntCounterVec,

    /// Seeks consumed into matches by tier
    pub seeks_matched_total: IntCounterVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let pass_metrics = PassMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;

        Ok(Self {
            registry,
            service_metrics,
            pass_metrics,
            match_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get pass metrics
    pub fn pass(&self) -> &PassMetrics {
        &self.pass_metrics
    }

    /// Get match metrics
    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    /// Record a completed pass
    pub fn record_pass(&self, outcome: &PassOutcome, duration: Duration) {
        let stats = &outcome.stats;

        self.pass_metrics.passes_total.inc();
        self.pass_metrics
            .pass_duration_seconds
            .observe(duration.as_secs_f64());
        self.pass_metrics.pool_size.set(stats.seeks_considered as i64);
        self.pass_metrics
            .unmatched_seeks
            .set(outcome.unmatched.len() as i64);

        let hosted = stats.trials - stats.failed_trials;
        self.pass_metrics
            .trials_total
            .with_label_values(&["hosted"])
            .inc_by(hosted as u64);
        self.pass_metrics
            .trials_total
            .with_label_values(&["no_host"])
            .inc_by(stats.failed_trials as u64);
        self.pass_metrics
            .abandoned_anchors_total
            .inc_by(stats.abandoned_anchors as u64);

        for game in &outcome.matches {
            let size = game.size().to_string();
            self.match_metrics
                .matches_total
                .with_label_values(&[game.tier.as_str(), size.as_str()])
                .inc();
            self.match_metrics
                .seeks_matched_total
                .with_label_values(&[game.tier.as_str()])
                .inc_by(game.size() as u64);
        }
    }

    /// Record a match that failed to publish
    pub fn record_publish_error(&self) {
        self.service_metrics.publish_errors_total.inc();
    }

    /// Update service uptime
    pub fn update_uptime(&self, uptime: Duration) {
        self.service_metrics.uptime_seconds.set(uptime.as_secs() as i64);
    }

    /// Update health status
    pub fn update_health_status(&self, status: u8) {
        self.service_metrics.health_status.set(status as i64);
    }

    /// Update component health
    pub fn update_component_health(&self, component: &str, healthy: bool) {
        let status = if healthy { 1 } else { 0 };
        self.service_metrics
            .component_health
            .with_label_values(&[component])
            .set(status);
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let uptime_seconds =
            IntGauge::new("automatch_uptime_seconds", "Service uptime in seconds")?;
        registry.register(Box::new(uptime_seconds.clone()))?;

        let health_status = IntGauge::new(
            "automatch_health_status",
            "Health status (0=unhealthy, 1=degraded, 2=healthy)",
        )?;
        registry.register(Box::new(health_status.clone()))?;

        let component_health = IntGaugeVec::new(
            Opts::new("automatch_component_health", "Component health status"),
            &["component"],
        )?;
        registry.register(Box::new(component_health.clone()))?;

        let publish_errors_total = IntCounter::new(
            "automatch_publish_errors_total",
            "Matches that could not be published",
        )?;
        registry.register(Box::new(publish_errors_total.clone()))?;

        Ok(Self {
            uptime_seconds,
            health_status,
            component_health,
            publish_errors_total,
        })
    }
}

impl PassMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let passes_total = IntCounter::new("automatch_passes_total", "Total matching passes")?;
        registry.register(Box::new(passes_total.clone()))?;

        let pass_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "automatch_pass_duration_seconds",
                "Matching pass duration",
            )
            .buckets(vec![0.0001, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(pass_duration_seconds.clone()))?;

        let pool_size = IntGauge::new(
            "automatch_pool_size",
            "Seeks in the pool at the start of the last pass",
        )?;
        registry.register(Box::new(pool_size.clone()))?;

        let unmatched_seeks = IntGauge::new(
            "automatch_unmatched_seeks",
            "Seeks left unmatched by the last pass",
        )?;
        registry.register(Box::new(unmatched_seeks.clone()))?;

        let trials_total = IntCounterVec::new(
            Opts::new("automatch_trials_total", "Candidate groups tested"),
            &["outcome"],
        )?;
        registry.register(Box::new(trials_total.clone()))?;

        let abandoned_anchors_total = IntCounter::new(
            "automatch_abandoned_anchors_total",
            "Anchors dropped after exhausting their trials",
        )?;
        registry.register(Box::new(abandoned_anchors_total.clone()))?;

        Ok(Self {
            passes_total,
            pass_duration_seconds,
            pool_size,
            unmatched_seeks,
            trials_total,
            abandoned_anchors_total,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_total = IntCounterVec::new(
            Opts::new("automatch_matches_total", "Matches formed"),
            &["tier", "party_size"],
        )?;
        registry.register(Box::new(matches_total.clone()))?;

        let seeks_matched_total = IntCounterVec::new(
            Opts::new("automatch_seeks_matched_total", "Seeks consumed into matches"),
            &["tier"],
        )?;
        registry.register(Box::new(seeks_matched_total.clone()))?;

        Ok(Self {
            matches_total,
            seeks_matched_total,
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create default metrics collector")
    }
}
