//! Builder module for constructing solver components from configuration.

use std::time::Duration;

use stablematch_config::TerminationConfig;

use crate::termination::{
    BacktrackCountTermination, OrTermination, StepCountTermination, TimeTermination,
};

/// The termination a [`TerminationConfig`] maps to.
///
/// Limits that are not configured are `None` and never fire, so an empty
/// configuration gives an unbounded search.
pub type ConfiguredTermination = OrTermination<(
    Option<TimeTermination>,
    Option<StepCountTermination>,
    Option<BacktrackCountTermination>,
)>;

/// Builder for constructing terminations from configuration.
pub struct TerminationBuilder;

impl TerminationBuilder {
    /// Builds a termination firing when any configured limit is reached.
    pub fn build(config: Option<&TerminationConfig>) -> ConfiguredTermination {
        let Some(config) = config else {
            return Self::unbounded();
        };
        OrTermination::new((
            config.time_limit().map(TimeTermination::new),
            config.step_count_limit.map(StepCountTermination::new),
            config
                .backtrack_count_limit
                .map(BacktrackCountTermination::new),
        ))
    }

    /// Builds a termination bounded by wall time only.
    pub fn from_time_budget(budget: Option<Duration>) -> ConfiguredTermination {
        OrTermination::new((budget.map(TimeTermination::new), None, None))
    }

    /// A termination that never fires.
    pub fn unbounded() -> ConfiguredTermination {
        OrTermination::new((None, None, None))
    }
}
