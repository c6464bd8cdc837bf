//! Matching core: group assembly, host selection and match finalization
//!
//! One pass takes a snapshot of waiting seeks and returns disjoint hosted
//! matches plus the seeks left over. Passes are synchronous and draw all
//! randomness from the generator they are given.

pub mod assembler;
pub mod host;
pub mod oracle;
pub mod proposal;
pub mod room;

// Re-export commonly used types
pub use assembler::{GroupAssembler, PassOutcome, PassStats};
pub use host::HostSelector;
pub use oracle::{FeasibilityOracle, RequirementOracle};
pub use proposal::{reconcile_score_display, GameMatch, MatchRecord, Proposal};
pub use room::{RoomAssigner, StaticRoomAssigner, DEFAULT_ROOM};
