//! Termination conditions for the backtracking search.
//!
//! A termination is consulted before every candidate evaluation. When it
//! fires, the search stops with `SearchBudgetExhausted`, which is distinct
//! from exhausting the search tree.

mod backtrack_count;
mod composite;
mod external;
mod step_count;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;

pub use backtrack_count::BacktrackCountTermination;
pub use composite::{AndTermination, OrTermination};
pub use external::ExternalTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop searching.
pub trait Termination: Send + Debug {
    /// Returns true if searching should terminate.
    fn is_terminated(&self, scope: &SearchScope) -> bool;
}

/// A termination that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl Termination for NoTermination {
    fn is_terminated(&self, _scope: &SearchScope) -> bool {
        false
    }
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        (**self).is_terminated(scope)
    }
}

impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        self.as_ref().is_some_and(|t| t.is_terminated(scope))
    }
}
