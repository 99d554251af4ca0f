//! Depth-first search over reduced domains.
//!
//! Proposers are assigned in index order, each trying its domain in
//! preference order. A candidate is accepted only when the partial
//! assignment stays free of blocking pairs, so the first complete
//! assignment is stable. The search keeps its own stack of cursors and
//! never recurses.

use stablematch_core::{Matching, PreferenceModel, Result, Side, StableMatchError};
use tracing::{debug, info, trace, warn};

use super::reducer::ReducedDomains;
use super::state::SearchState;
use crate::event::MatchingEventSupport;
use crate::scope::SearchScope;
use crate::stats::SearchStats;
use crate::termination::Termination;

/// Result of a finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktrackingOutcome {
    /// The first stable assignment found, or `None` if the tree was exhausted.
    pub matching: Option<Matching>,
    pub stats: SearchStats,
    /// Deepest proposer index reached.
    pub max_depth: usize,
}

/// Backtracking search bounded by a [`Termination`].
#[derive(Debug)]
pub struct BacktrackingSolver<'m, T> {
    model: &'m PreferenceModel,
    termination: T,
    events: MatchingEventSupport,
}

impl<'m, T: Termination> BacktrackingSolver<'m, T> {
    pub fn new(model: &'m PreferenceModel, termination: T) -> Self {
        Self {
            model,
            termination,
            events: MatchingEventSupport::new(),
        }
    }

    pub fn with_events(mut self, events: MatchingEventSupport) -> Self {
        self.events = events;
        self
    }

    /// Searches `domains` for a stable assignment.
    ///
    /// Proposers with an empty domain are skipped and stay unassigned; every
    /// other proposer must be placed for the search to succeed.
    ///
    /// # Errors
    ///
    /// Returns [`StableMatchError::SearchBudgetExhausted`] when the
    /// termination fires before the search finishes.
    pub fn search(&self, domains: &ReducedDomains) -> Result<BacktrackingOutcome> {
        let n = self.model.proposer_count();
        let mut scope = SearchScope::new();
        scope.start_solving();
        let mut state = SearchState::new(n, self.model.receiver_count());

        info!(event = "phase_start", phase = "search", proposer_count = n);

        let mut depth = 0;
        let found = loop {
            if depth == n {
                break true;
            }

            let domain = domains.domain(depth);
            if domain.is_empty() {
                depth += 1;
                scope.set_depth(depth);
                continue;
            }

            let mut placed = false;
            while let Some(r) = state.next_candidate(depth, domain) {
                if self.termination.is_terminated(&scope) {
                    return Err(self.budget_exhausted(&scope));
                }
                scope.increment_step_count();

                let consistent = self.is_consistent(&state, depth, r);
                trace!(
                    event = "candidate",
                    proposer = depth,
                    receiver = r,
                    consistent
                );
                if consistent {
                    state.assign(depth, r);
                    self.events.fire_assigned(depth, r);
                    placed = true;
                    break;
                }
            }

            if placed {
                depth += 1;
                scope.set_depth(depth);
                continue;
            }

            state.reset_cursor(depth);
            match (0..depth).rev().find(|&m| !domains.domain(m).is_empty()) {
                None => break false,
                Some(m) => {
                    depth = m;
                    scope.set_depth(depth);
                    if let Some(r) = state.unassign(m) {
                        let backtracks = scope.increment_backtrack_count();
                        debug!(
                            event = "backtrack",
                            proposer = m,
                            receiver = r,
                            backtracks
                        );
                        self.events.fire_backtrack(m, r);
                    }
                }
            }
        };

        let stats = scope.stats();
        info!(
            event = "phase_end",
            phase = "search",
            found,
            steps = stats.step_count,
            backtracks = stats.backtrack_count,
            duration_ms = stats.elapsed_ms(),
        );

        Ok(BacktrackingOutcome {
            matching: found.then(|| state.into_matching()),
            stats,
            max_depth: scope.max_depth(),
        })
    }

    /// Whether `p` may take `r` without creating a blocking pair with any
    /// earlier assignment.
    ///
    /// Receivers outside the model are never consistent.
    fn is_consistent(&self, state: &SearchState, p: usize, r: usize) -> bool {
        let Some(r_list) = self.model.list(Side::Receiver, r) else {
            return false;
        };
        if state.is_taken(r) {
            return false;
        }
        let p_list = self.model.proposer(p);

        state.matching().pairs().all(|(m, w)| {
            let m_list = self.model.proposer(m);
            let w_list = self.model.receiver(w);
            // (m, r) would block: m likes r better than w, r likes m better than p.
            let m_r_blocks =
                m_list.prefers(r, w) == Some(true) && r_list.prefers(m, p) == Some(true);
            // (p, w) would block: p likes w better than r, w likes p better than m.
            let p_w_blocks =
                p_list.prefers(w, r) == Some(true) && w_list.prefers(p, m) == Some(true);
            !(m_r_blocks || p_w_blocks)
        })
    }

    fn budget_exhausted(&self, scope: &SearchScope) -> StableMatchError {
        let stats = scope.stats();
        warn!(
            event = "budget_exhausted",
            steps = stats.step_count,
            backtracks = stats.backtrack_count,
            depth = scope.max_depth(),
            duration_ms = stats.elapsed_ms(),
        );
        StableMatchError::SearchBudgetExhausted {
            steps: stats.step_count,
            backtracks: stats.backtrack_count,
            elapsed: stats.elapsed,
            depth: scope.max_depth(),
        }
    }
}
