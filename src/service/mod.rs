//! Service layer for the automatch service
//!
//! This module contains the application state, the seek pool it schedules
//! passes over, match publication, and health checks.

pub mod app;
pub mod health;
pub mod pool;
pub mod publisher;

pub use app::{AppState, PassSummary, SchedulerStats, ServiceError};
pub use health::{HealthCheck, HealthStatus};
pub use pool::SeekPool;
pub use publisher::{LogMatchPublisher, MatchPublisher};
