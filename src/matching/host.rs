//! Host selection for assembled groups

use crate::matching::oracle::FeasibilityOracle;
use crate::matching::proposal::Proposal;
use crate::types::Player;
use std::sync::Arc;
use tracing::trace;

/// Picks which participant of a proposal hosts the game
#[derive(Clone)]
pub struct HostSelector {
    oracle: Arc<dyn FeasibilityOracle>,
}

impl HostSelector {
    pub fn new(oracle: Arc<dyn FeasibilityOracle>) -> Self {
        Self { oracle }
    }

    /// Choose the host for `proposal`, or `None` when nobody can legally host
    ///
    /// Among legal hosts the one owning the most sets wins; ties keep the
    /// earliest participant in group order.
    pub fn choose_host<'a>(&self, proposal: &'a Proposal) -> Option<&'a Player> {
        let mut best: Option<&Player> = None;

        for player in proposal.players() {
            if !self.oracle.is_match_ok(proposal, &player.name) {
                trace!("'{}' cannot host this group", player.name);
                continue;
            }

            match best {
                Some(current) if player.set_count() <= current.set_count() => {}
                _ => best = Some(player),
            }
        }

        best
    }
}

impl std::fmt::Debug for HostSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSelector").finish_non_exhaustive()
    }
}
