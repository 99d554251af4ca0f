//! Backtrack count termination.

use super::Termination;
use crate::scope::SearchScope;

/// Terminates once the search has undone `limit` assignments.
#[derive(Debug, Clone)]
pub struct BacktrackCountTermination {
    limit: u64,
}

impl BacktrackCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl Termination for BacktrackCountTermination {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        scope.backtrack_count() >= self.limit
    }
}
