//! Constraint formulation of stable matching.
//!
//! Solving runs two phases: domain reduction, then backtracking search over
//! the reduced domains. Proposers are assigned in index order and try their
//! candidates most-preferred first, so the solution returned is simply the
//! first stable assignment in that search order. It is not promised to be
//! optimal for either side.

mod backtracking;
mod reducer;
mod state;

use std::time::{Duration, Instant};

use stablematch_core::{Matching, PreferenceModel, Result};
use tracing::info;

use crate::event::MatchingEventSupport;
use crate::stats::SearchStats;
use crate::termination::{NoTermination, Termination};

pub use backtracking::{BacktrackingOutcome, BacktrackingSolver};
pub use reducer::{ConstraintReducer, ReducedDomains};
pub use state::SearchState;

const COMPONENT: &str = "csp";

/// Outcome of a completed constraint search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspSolution {
    /// True when every proposer with a non-empty domain was placed.
    pub found: bool,
    /// The stable assignment, present exactly when `found` is true.
    pub matching: Option<Matching>,
    pub backtracks: u64,
    /// Domain size per proposer after reduction.
    pub domain_sizes: Vec<usize>,
    pub reduction_passes: usize,
    /// Search counters; `elapsed` covers reduction and search.
    pub stats: SearchStats,
}

impl CspSolution {
    pub fn elapsed(&self) -> Duration {
        self.stats.elapsed
    }
}

/// Reduction plus backtracking, bounded by a [`Termination`].
///
/// # Example
///
/// ```
/// use stablematch_core::PreferenceModel;
/// use stablematch_solver::csp::CspSolver;
///
/// let model = PreferenceModel::new(
///     vec![vec![0, 1], vec![1, 0]],
///     vec![vec![0, 1], vec![1, 0]],
/// ).unwrap();
///
/// let solution = CspSolver::unbounded(&model).solve().unwrap();
/// assert!(solution.found);
/// assert_eq!(solution.backtracks, 0);
/// assert_eq!(solution.domain_sizes, vec![2, 2]);
/// ```
#[derive(Debug)]
pub struct CspSolver<'m, T> {
    model: &'m PreferenceModel,
    termination: T,
    events: MatchingEventSupport,
}

impl<'m> CspSolver<'m, NoTermination> {
    /// A solver that searches until the tree is exhausted.
    pub fn unbounded(model: &'m PreferenceModel) -> Self {
        Self::new(model, NoTermination)
    }
}

impl<'m, T: Termination> CspSolver<'m, T> {
    pub fn new(model: &'m PreferenceModel, termination: T) -> Self {
        Self {
            model,
            termination,
            events: MatchingEventSupport::new(),
        }
    }

    /// Attaches listeners for prunes, assignments and backtracks.
    pub fn with_events(mut self, events: MatchingEventSupport) -> Self {
        self.events = events;
        self
    }

    /// Reduces domains and searches them.
    ///
    /// # Errors
    ///
    /// Returns `SearchBudgetExhausted` when the termination fires first.
    pub fn solve(self) -> Result<CspSolution> {
        let start = Instant::now();
        info!(
            event = "solve_start",
            solver = COMPONENT,
            proposer_count = self.model.proposer_count(),
            receiver_count = self.model.receiver_count(),
        );

        let reduced = ConstraintReducer::new(self.model)
            .with_events(self.events.clone())
            .reduce();

        let outcome = BacktrackingSolver::new(self.model, self.termination)
            .with_events(self.events)
            .search(&reduced)?;

        let stats = SearchStats {
            elapsed: start.elapsed(),
            ..outcome.stats
        };
        let found = outcome.matching.is_some();

        info!(
            event = "solve_end",
            solver = COMPONENT,
            found,
            steps = stats.step_count,
            backtracks = stats.backtrack_count,
            duration_ms = stats.elapsed_ms(),
        );

        Ok(CspSolution {
            found,
            matching: outcome.matching,
            backtracks: stats.backtrack_count,
            domain_sizes: reduced.sizes(),
            reduction_passes: reduced.passes,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred_acceptance::DeferredAcceptanceMatcher;
    use crate::termination::StepCountTermination;
    use crate::verifier::is_stable;
    use stablematch_test::{scenarios, PreferenceGenerator};

    #[test]
    fn test_crossed_pair_matches_deferred_acceptance() {
        let model =
            PreferenceModel::new(vec![vec![0, 1], vec![0, 1]], vec![vec![1, 0], vec![0, 1]])
                .unwrap();
        let solution = CspSolver::unbounded(&model).solve().unwrap();

        assert!(solution.found);
        assert_eq!(solution.backtracks, 1);
        assert_eq!(solution.domain_sizes, vec![2, 2]);
        assert_eq!(solution.reduction_passes, 1);

        let matching = solution.matching.unwrap();
        let deferred = DeferredAcceptanceMatcher::new(&model).run().unwrap();
        assert_eq!(matching, deferred.matching);
        assert!(is_stable(&matching, &model));
    }

    #[test]
    fn test_reduced_sizes_reported() {
        let model = PreferenceModel::new(
            vec![vec![0, 1, 2], vec![2, 1]],
            vec![vec![0], vec![0, 1], vec![1]],
        )
        .unwrap();
        let solution = CspSolver::unbounded(&model).solve().unwrap();

        assert_eq!(solution.domain_sizes, vec![2, 2]);
        assert_eq!(solution.reduction_passes, 2);
        assert!(solution.found);
        let matching = solution.matching.unwrap();
        assert!(is_stable(&matching, &model));
        assert_eq!(matching.receiver_of(0), Some(0));
    }

    #[test]
    fn test_not_found_is_not_an_error() {
        let model = PreferenceModel::new(vec![vec![0], vec![0]], vec![vec![1, 0]]).unwrap();
        let solution = CspSolver::unbounded(&model).solve().unwrap();

        assert!(!solution.found);
        assert_eq!(solution.matching, None);
        assert_eq!(solution.domain_sizes, vec![1, 1]);
    }

    #[test]
    fn test_budget_exhausted_is_an_error() {
        let model =
            PreferenceModel::new(vec![vec![0, 1], vec![0, 1]], vec![vec![1, 0], vec![0, 1]])
                .unwrap();
        let err = CspSolver::new(&model, StepCountTermination::new(1))
            .solve()
            .unwrap_err();
        assert!(err.is_budget_exhausted());
    }

    #[test]
    fn test_empty_model() {
        let model = PreferenceModel::new(vec![], vec![]).unwrap();
        let solution = CspSolver::unbounded(&model).solve().unwrap();
        assert!(solution.found);
        assert_eq!(solution.matching, Some(Matching::new(0, 0)));
        assert!(solution.domain_sizes.is_empty());
    }

    #[test]
    fn test_first_found_is_proposer_optimal_on_complete_lists() {
        let mut generator = PreferenceGenerator::seeded(17);
        for n in 1..=5 {
            let model = generator.complete(n).into_model();
            let solution = CspSolver::unbounded(&model).solve().unwrap();
            let deferred = DeferredAcceptanceMatcher::new(&model).run().unwrap();
            assert_eq!(solution.matching, Some(deferred.matching));
        }
    }

    #[test]
    fn test_latin_square_without_backtracking() {
        let model = scenarios::latin_square().into_model();
        let solution = CspSolver::unbounded(&model).solve().unwrap();
        assert!(solution.found);
        assert_eq!(solution.backtracks, 0);
        assert_eq!(solution.stats.step_count, 3);
    }
}
