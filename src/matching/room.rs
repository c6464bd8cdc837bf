//! Room assignment for finalized matches

use crate::matching::proposal::Proposal;
use crate::types::Player;

/// Default room matches are sent to
pub const DEFAULT_ROOM: &str = "Outpost";

/// Chooses the destination room for a match
pub trait RoomAssigner: Send + Sync {
    fn assign_room(&self, proposal: &Proposal, host: &Player) -> String;
}

/// Sends every match to the same room
#[derive(Debug, Clone)]
pub struct StaticRoomAssigner {
    room: String,
}

impl StaticRoomAssigner {
    pub fn new(room: impl Into<String>) -> Self {
        Self { room: room.into() }
    }
}

impl Default for StaticRoomAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM)
    }
}

impl RoomAssigner for StaticRoomAssigner {
    fn assign_room(&self, _proposal: &Proposal, _host: &Player) -> String {
        self.room.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RatingTier;

    #[test]
    fn test_static_room() {
        let proposal = Proposal::new(vec![], RatingTier::Casual);
        let host = Player::new("a");

        assert_eq!(
            StaticRoomAssigner::default().assign_room(&proposal, &host),
            DEFAULT_ROOM
        );
        assert_eq!(
            StaticRoomAssigner::new("Library").assign_room(&proposal, &host),
            "Library"
        );
    }
}
