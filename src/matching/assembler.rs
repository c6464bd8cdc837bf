//! Group assembly: one matching pass over a pool of seeks
//!
//! The assembler walks rating tiers in priority order and party sizes from
//! largest to smallest. For each combination it repeatedly anchors a random
//! candidate, samples co-members, and keeps the first group that has a
//! legal host. An anchor that fails every trial is dropped for that
//! combination only; it stays in the working pool for later ones.

use crate::config::MatchingConfig;
use crate::matching::host::HostSelector;
use crate::matching::oracle::{FeasibilityOracle, RequirementOracle};
use crate::matching::proposal::{GameMatch, Proposal};
use crate::matching::room::{RoomAssigner, StaticRoomAssigner};
use crate::requirement::accepts;
use crate::types::{RatingTier, Seek};
use rand::seq::index;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, trace};

/// Counters describing the work done by one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Seeks supplied to the pass
    pub seeks_considered: usize,
    /// (tier, size) combinations with enough candidates to attempt
    pub combinations_searched: usize,
    /// Candidate groups tested
    pub trials: usize,
    /// Candidate groups with no legal host
    pub failed_trials: usize,
    /// Anchors dropped after exhausting their trials
    pub abandoned_anchors: usize,
}

/// Result of a pass
#[derive(Debug, Clone)]
pub struct PassOutcome {
    /// Matches in the order they were formed
    pub matches: Vec<GameMatch>,
    /// Seeks left in the working pool
    pub unmatched: Vec<Seek>,
    pub stats: PassStats,
}

impl PassOutcome {
    pub fn matched_seek_count(&self) -> usize {
        self.matches.iter().map(GameMatch::size).sum()
    }
}

/// Forms disjoint hosted matches from a seek pool
#[derive(Clone)]
pub struct GroupAssembler {
    config: MatchingConfig,
    host_selector: HostSelector,
    room_assigner: Arc<dyn RoomAssigner>,
}

impl GroupAssembler {
    /// Assembler using participants' requirements as the feasibility check
    pub fn new(config: MatchingConfig) -> Self {
        Self::with_oracle(config, Arc::new(RequirementOracle))
    }

    pub fn with_oracle(config: MatchingConfig, oracle: Arc<dyn FeasibilityOracle>) -> Self {
        let room_assigner = Arc::new(StaticRoomAssigner::new(config.default_room.clone()));
        Self::with_components(config, oracle, room_assigner)
    }

    pub fn with_components(
        config: MatchingConfig,
        oracle: Arc<dyn FeasibilityOracle>,
        room_assigner: Arc<dyn RoomAssigner>,
    ) -> Self {
        Self {
            config,
            host_selector: HostSelector::new(oracle),
            room_assigner,
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Run one pass over `seeks`
    ///
    /// `seeks` is left untouched; matched seeks are cloned into the returned
    /// matches and the rest are returned as unmatched.
    pub fn run_pass<R: Rng + ?Sized>(&self, seeks: &[Seek], rng: &mut R) -> PassOutcome {
        let mut in_pool = vec![true; seeks.len()];
        let mut matches = Vec::new();
        let mut stats = PassStats {
            seeks_considered: seeks.len(),
            ..PassStats::default()
        };

        for &tier in &self.config.tier_priority {
            for &size in &self.config.party_sizes {
                let fits = accepts(size, tier);
                let mut candidates: Vec<usize> = (0..seeks.len())
                    .filter(|&i| in_pool[i] && fits(&seeks[i]))
                    .collect();

                if size == 0 || candidates.len() < size {
                    continue;
                }
                stats.combinations_searched += 1;
                trace!(
                    "Searching {} {}-player games among {} candidates",
                    tier,
                    size,
                    candidates.len()
                );

                while candidates.len() >= size {
                    let anchor = candidates.swap_remove(rng.gen_range(0..candidates.len()));

                    match self.assemble_around(
                        seeks,
                        anchor,
                        &candidates,
                        size,
                        tier,
                        &mut *rng,
                        &mut stats,
                    ) {
                        Some((co_members, game)) => {
                            in_pool[anchor] = false;
                            for &member in &co_members {
                                in_pool[member] = false;
                            }
                            candidates.retain(|i| !co_members.contains(i));

                            debug!(
                                "Formed {} {}-player match {} hosted by '{}'",
                                game.tier,
                                game.size(),
                                game.match_id,
                                game.host
                            );
                            matches.push(game);
                        }
                        None => {
                            stats.abandoned_anchors += 1;
                            debug!(
                                "No hostable {} {}-player group around '{}' after {} trials",
                                tier,
                                size,
                                seeks[anchor].player_name(),
                                self.config.max_trials
                            );
                        }
                    }
                }
            }
        }

        let unmatched = seeks
            .iter()
            .zip(&in_pool)
            .filter(|(_, pooled)| **pooled)
            .map(|(seek, _)| seek.clone())
            .collect();

        PassOutcome {
            matches,
            unmatched,
            stats,
        }
    }

    /// Try up to `max_trials` random co-groups for `anchor`
    ///
    /// Returns the pool indices of the chosen co-members and the finalized
    /// match. A failed trial leaves no trace beyond the counters.
    #[allow(clippy::too_many_arguments)]
    fn assemble_around<R: Rng + ?Sized>(
        &self,
        seeks: &[Seek],
        anchor: usize,
        candidates: &[usize],
        size: usize,
        tier: RatingTier,
        rng: &mut R,
        stats: &mut PassStats,
    ) -> Option<(Vec<usize>, GameMatch)> {
        for trial in 1..=self.config.max_trials {
            stats.trials += 1;

            let co_members: Vec<usize> = index::sample(&mut *rng, candidates.len(), size - 1)
                .into_iter()
                .map(|pos| candidates[pos])
                .collect();

            let group = std::iter::once(anchor)
                .chain(co_members.iter().copied())
                .map(|i| seeks[i].clone())
                .collect();
            let proposal = Proposal::new(group, tier);

            match self.host_selector.choose_host(&proposal) {
                Some(host) => {
                    let host = host.clone();
                    let room = self.room_assigner.assign_room(&proposal, &host);
                    return Some((co_members, proposal.finalize(&host, room)));
                }
                None => {
                    stats.failed_trials += 1;
                    trace!(
                        "Trial {} around '{}' found no legal host",
                        trial,
                        seeks[anchor].player_name()
                    );
                }
            }
        }

        None
    }
}

impl std::fmt::Debug for GroupAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupAssembler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
