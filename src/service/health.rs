//! Health check endpoints and monitoring
//!
//! This module provides health check functionality for the automatch
//! service, including readiness and liveness probes.

use crate::service::app::AppState;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Passes may lag this many intervals before the scheduler counts as degraded
const STALE_PASS_INTERVALS: u32 = 3;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Numeric form used by the health gauge
    pub fn as_gauge(&self) -> u8 {
        match self {
            HealthStatus::Healthy => 2,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 0,
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "✅ healthy"),
            HealthStatus::Degraded => write!(f, "⚠️  degraded"),
            HealthStatus::Unhealthy => write!(f, "❌ unhealthy"),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Overall service status
    pub status: HealthStatus,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Detailed component checks
    pub checks: Vec<ComponentCheck>,
    /// Service statistics
    pub stats: ServiceStats,
}

/// Individual component health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCheck {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional error message if unhealthy
    pub message: Option<String>,
    /// Check duration in milliseconds
    pub duration_ms: u64,
}

/// Service statistics for health reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStats {
    /// Seeks currently waiting
    pub seeks_waiting: usize,
    /// Passes run since service start
    pub passes_run: u64,
    /// Matches formed since service start
    pub matches_formed: u64,
    /// Seeks matched since service start
    pub seeks_matched: u64,
    /// Service uptime information
    pub uptime_info: String,
}

impl HealthCheck {
    /// Perform a full health check of the service
    pub async fn check(app_state: Arc<AppState>) -> Result<Self> {
        let mut checks = Vec::new();
        let mut overall_status = HealthStatus::Healthy;

        for check in [
            Self::check_service_running(&app_state).await,
            Self::check_seek_pool(&app_state),
            Self::check_scheduler(&app_state).await,
        ] {
            match check.status {
                HealthStatus::Unhealthy => overall_status = HealthStatus::Unhealthy,
                HealthStatus::Degraded if overall_status == HealthStatus::Healthy => {
                    overall_status = HealthStatus::Degraded
                }
                _ => {}
            }
            checks.push(check);
        }

        let stats = Self::gather_service_stats(&app_state).await;
        app_state
            .metrics()
            .update_health_status(overall_status.as_gauge());

        Ok(HealthCheck {
            status: overall_status,
            service: app_state.config().service.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            checks,
            stats,
        })
    }

    /// Simple liveness check - just verify service is running
    pub async fn liveness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if app_state.is_running().await {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Unhealthy)
        }
    }

    /// Readiness check - verify passes can run
    pub async fn readiness_check(app_state: Arc<AppState>) -> Result<HealthStatus> {
        if !app_state.is_running().await {
            return Ok(HealthStatus::Unhealthy);
        }

        Ok(Self::check_seek_pool(&app_state).status)
    }

    async fn check_service_running(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        let (status, message) = if app_state.is_running().await {
            (HealthStatus::Healthy, None)
        } else {
            (
                HealthStatus::Unhealthy,
                Some("Service is not running".to_string()),
            )
        };

        ComponentCheck {
            name: "service_running".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn check_seek_pool(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();

        // A pool held by a running pass is busy, not broken
        let (status, message) = match app_state.pool().try_len() {
            Some(_) => (HealthStatus::Healthy, None),
            None => (
                HealthStatus::Degraded,
                Some("Seek pool is locked by a pass".to_string()),
            ),
        };

        ComponentCheck {
            name: "seek_pool".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn check_scheduler(app_state: &AppState) -> ComponentCheck {
        let start = std::time::Instant::now();
        let stats = app_state.stats().await;
        let allowed_lag = app_state.config().pass_interval() * STALE_PASS_INTERVALS;

        let (status, message) = match stats.last_pass_at {
            Some(last) => {
                let lag = (chrono::Utc::now() - last).to_std().unwrap_or_default();
                if lag > allowed_lag {
                    (
                        HealthStatus::Degraded,
                        Some(format!("Last pass ran {}s ago", lag.as_secs())),
                    )
                } else {
                    (HealthStatus::Healthy, None)
                }
            }
            None if app_state.uptime() > allowed_lag => (
                HealthStatus::Degraded,
                Some("No pass has run yet".to_string()),
            ),
            None => (HealthStatus::Healthy, None),
        };

        ComponentCheck {
            name: "scheduler".to_string(),
            status,
            message,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn gather_service_stats(app_state: &AppState) -> ServiceStats {
        let stats = app_state.stats().await;
        let seeks_waiting = app_state.pool().try_len().unwrap_or_else(|| {
            debug!("Seek pool busy while gathering stats");
            0
        });

        ServiceStats {
            seeks_waiting,
            passes_run: stats.passes_run,
            matches_formed: stats.matches_formed,
            seeks_matched: stats.seeks_matched,
            uptime_info: format!("Up {}s", app_state.uptime().as_secs()),
        }
    }
}

/// Convert health check to JSON string
impl HealthCheck {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize health check: {}", e))
    }
}
