//! Seek requirements: validated ingestion and compatibility predicates
//!
//! Raw seek records arrive from the pool owner with loosely typed bounds.
//! This module turns them into typed [`Seek`](crate::types::Seek)s and
//! decides which seeks fit a given party size and rating tier.

pub mod ingest;
pub mod predicate;

// Re-export commonly used types
pub use ingest::{load_seeks, BoundValue, PlayerRecord, RequirementRecord, SeekRecord};
pub use predicate::{accepts, requirement_satisfied};
