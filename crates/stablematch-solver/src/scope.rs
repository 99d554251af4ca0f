//! Search-level scope.

use std::time::{Duration, Instant};

use crate::stats::SearchStats;

/// Live counters of one backtracking search.
///
/// Terminations read the scope to decide whether the budget is spent.
#[derive(Debug, Default, Clone)]
pub struct SearchScope {
    start_time: Option<Instant>,
    step_count: u64,
    backtrack_count: u64,
    depth: usize,
    max_depth: usize,
}

impl SearchScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock and clears all counters.
    pub fn start_solving(&mut self) {
        *self = Self {
            start_time: Some(Instant::now()),
            ..Self::default()
        };
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    /// Records one candidate evaluation.
    pub fn increment_step_count(&mut self) -> u64 {
        self.step_count += 1;
        self.step_count
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Records one undone assignment.
    pub fn increment_backtrack_count(&mut self) -> u64 {
        self.backtrack_count += 1;
        self.backtrack_count
    }

    pub fn backtrack_count(&self) -> u64 {
        self.backtrack_count
    }

    /// Sets the index of the proposer currently being assigned.
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        self.max_depth = self.max_depth.max(depth);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest proposer index reached so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> SearchStats {
        SearchStats {
            step_count: self.step_count,
            backtrack_count: self.backtrack_count,
            elapsed: self.elapsed().unwrap_or_default(),
        }
    }
}
