//! Plain function entry points.

use std::time::Duration;

use stablematch_core::{BlockingPair, Matching, PreferenceError, PreferenceModel, Result};
use stablematch_solver::{
    find_blocking_pairs, CspSolution, CspSolver, DeferredAcceptanceMatcher,
    DeferredAcceptanceResult, TerminationBuilder,
};

/// Validates raw preference lists into a model.
///
/// `proposer_lists[p]` ranks receivers for proposer `p`, most preferred
/// first, and `receiver_lists[r]` ranks proposers. Omitted agents are
/// unacceptable.
pub fn build_model(
    proposer_lists: Vec<Vec<usize>>,
    receiver_lists: Vec<Vec<usize>>,
) -> std::result::Result<PreferenceModel, PreferenceError> {
    PreferenceModel::new(proposer_lists, receiver_lists)
}

/// Runs Gale-Shapley deferred acceptance with proposers proposing.
pub fn run_deferred_acceptance(model: &PreferenceModel) -> Result<DeferredAcceptanceResult> {
    DeferredAcceptanceMatcher::new(model).run()
}

/// Lists the blocking pairs of `matching`; empty means stable.
pub fn verify_stability(matching: &Matching, model: &PreferenceModel) -> Vec<BlockingPair> {
    find_blocking_pairs(matching, model)
}

/// Reduces domains and runs the backtracking search.
///
/// With a `time_budget`, running out of time gives
/// `StableMatchError::SearchBudgetExhausted` rather than a not-found result.
pub fn solve_csp(model: &PreferenceModel, time_budget: Option<Duration>) -> Result<CspSolution> {
    CspSolver::new(model, TerminationBuilder::from_time_budget(time_budget)).solve()
}
