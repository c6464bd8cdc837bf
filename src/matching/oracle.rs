//! Feasibility oracle for tentative matches
//!
//! The host selector asks an oracle whether a proposal works with a given
//! player hosting. The default oracle defers to the proposal's own
//! requirement check; callers can plug in stricter hosting policies.

use crate::matching::proposal::Proposal;

/// Decides whether a proposal is valid with a particular host
#[cfg_attr(test, mockall::automock)]
pub trait FeasibilityOracle: Send + Sync {
    fn is_match_ok(&self, proposal: &Proposal, host: &str) -> bool;
}

/// Oracle that checks every participant's requirements
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementOracle;

impl FeasibilityOracle for RequirementOracle {
    fn is_match_ok(&self, proposal: &Proposal, host: &str) -> bool {
        proposal.is_match_ok(host)
    }
}

impl<F> FeasibilityOracle for F
where
    F: Fn(&Proposal, &str) -> bool + Send + Sync,
{
    fn is_match_ok(&self, proposal: &Proposal, host: &str) -> bool {
        self(proposal, host)
    }
}
