//! Step count termination.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates after a number of candidate evaluations.
///
/// # Example
///
/// ```
/// use stablematch_solver::termination::StepCountTermination;
///
/// // Terminate after 1000 candidate checks
/// let term = StepCountTermination::new(1000);
/// ```
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
}

impl StepCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.step_count() >= self.limit
    }
}
