//! Metrics and monitoring for the automatch service
//!
//! This module provides Prometheus metrics collection and the HTTP server
//! exposing health probes and metrics.

pub mod collector;
pub mod health;

pub use collector::{MatchMetrics, MetricsCollector, MetricsTimer, PassMetrics, ServiceMetrics};
pub use health::{HealthServer, HealthServerConfig};
