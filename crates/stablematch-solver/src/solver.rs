//! Configured entry point running either strategy.

use std::path::Path;

use stablematch_config::SolverConfig;
use stablematch_core::{BlockingPair, Matching, PreferenceModel, Result, StableMatchError};
use tracing::info;

use crate::builder::TerminationBuilder;
use crate::csp::{CspSolution, CspSolver};
use crate::deferred_acceptance::{DeferredAcceptanceMatcher, DeferredAcceptanceResult};
use crate::event::MatchingEventSupport;
use crate::verifier::{find_blocking_pairs, StabilityVerifier};

/// Both strategies run on one model, side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub deferred: DeferredAcceptanceResult,
    pub deferred_blocking: Vec<BlockingPair>,
    pub csp: CspSolution,
    /// Blocking pairs of the CSP matching, when one was found.
    pub csp_blocking: Option<Vec<BlockingPair>>,
    /// True when the CSP found exactly the deferred-acceptance matching.
    pub identical: bool,
    /// Proposers the CSP matching serves strictly better than deferred acceptance.
    pub csp_improved_proposers: Vec<usize>,
}

/// Solver driven by a [`SolverConfig`].
///
/// # Example
///
/// ```
/// use stablematch_config::SolverConfig;
/// use stablematch_core::PreferenceModel;
/// use stablematch_solver::StableMatchSolver;
///
/// let model = PreferenceModel::new(
///     vec![vec![0, 1], vec![0, 1]],
///     vec![vec![1, 0], vec![0, 1]],
/// ).unwrap();
///
/// let solver = StableMatchSolver::new(SolverConfig::new().with_step_limit(10_000));
/// let comparison = solver.compare(&model).unwrap();
///
/// assert!(comparison.identical);
/// assert!(comparison.deferred_blocking.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StableMatchSolver {
    config: SolverConfig,
    events: MatchingEventSupport,
}

impl StableMatchSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            events: MatchingEventSupport::new(),
        }
    }

    /// Loads the configuration from a TOML or YAML file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        let config =
            SolverConfig::load(path).map_err(|e| StableMatchError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    /// Attaches listeners passed to every solver run.
    pub fn with_events(mut self, events: MatchingEventSupport) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs deferred acceptance, certifying the result in asserted mode.
    pub fn run_deferred_acceptance(
        &self,
        model: &PreferenceModel,
    ) -> Result<DeferredAcceptanceResult> {
        let result = DeferredAcceptanceMatcher::new(model)
            .with_events(self.events.clone())
            .run()?;
        self.assert_certified("deferred_acceptance", model, &result.matching)?;
        Ok(result)
    }

    /// Runs the constraint search under the configured termination.
    pub fn solve_csp(&self, model: &PreferenceModel) -> Result<CspSolution> {
        let termination = TerminationBuilder::build(self.config.termination.as_ref());
        let solution = CspSolver::new(model, termination)
            .with_events(self.events.clone())
            .solve()?;
        if let Some(matching) = &solution.matching {
            self.assert_certified("csp", model, matching)?;
        }
        Ok(solution)
    }

    /// Runs both strategies and verifies both outputs independently.
    pub fn compare(&self, model: &PreferenceModel) -> Result<Comparison> {
        let deferred = self.run_deferred_acceptance(model)?;
        let csp = self.solve_csp(model)?;

        let deferred_blocking = find_blocking_pairs(&deferred.matching, model);
        let csp_blocking = csp
            .matching
            .as_ref()
            .map(|matching| find_blocking_pairs(matching, model));
        let identical = csp.matching.as_ref() == Some(&deferred.matching);
        let csp_improved_proposers = csp
            .matching
            .as_ref()
            .map(|matching| improved_proposers(model, &deferred.matching, matching))
            .unwrap_or_default();

        info!(
            event = "comparison",
            identical,
            deferred_blocking = deferred_blocking.len(),
            csp_found = csp.found,
            csp_improved = csp_improved_proposers.len(),
        );

        Ok(Comparison {
            deferred,
            deferred_blocking,
            csp,
            csp_blocking,
            identical,
            csp_improved_proposers,
        })
    }

    fn assert_certified(
        &self,
        component: &'static str,
        model: &PreferenceModel,
        matching: &Matching,
    ) -> Result<()> {
        if !self.config.environment_mode.is_asserted() {
            return Ok(());
        }
        StabilityVerifier::new(model)
            .certify(matching)
            .map_err(|e| StableMatchError::InternalInvariantViolation {
                component,
                detail: e.to_string(),
            })
    }
}

/// Proposers that rank their `candidate` partner above their `baseline` one.
///
/// Being matched beats being unmatched.
pub fn improved_proposers(
    model: &PreferenceModel,
    baseline: &Matching,
    candidate: &Matching,
) -> Vec<usize> {
    (0..model.proposer_count())
        .filter(|&p| {
            let list = model.proposer(p);
            let rank = |m: &Matching| m.receiver_of(p).and_then(|r| list.rank_of(r));
            match (rank(candidate), rank(baseline)) {
                (Some(new), Some(old)) => new < old,
                (Some(_), None) => true,
                _ => false,
            }
        })
        .collect()
}
