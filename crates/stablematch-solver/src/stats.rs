//! Search statistics.

use std::time::Duration;

/// Counters of a finished backtracking search.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stablematch_solver::stats::SearchStats;
///
/// let stats = SearchStats {
///     step_count: 500,
///     backtrack_count: 12,
///     elapsed: Duration::from_millis(250),
/// };
///
/// assert_eq!(stats.steps_per_second(), 2000);
/// assert_eq!(stats.elapsed_ms(), 250);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Candidate evaluations performed.
    pub step_count: u64,
    /// Assignments undone after a dead end.
    pub backtrack_count: u64,
    /// Wall time spent, reduction included.
    pub elapsed: Duration,
}

impl SearchStats {
    /// Returns the elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Returns the step rate.
    pub fn steps_per_second(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.step_count as f64 / secs) as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_elapsed_rate() {
        let stats = SearchStats {
            step_count: 10,
            ..Default::default()
        };
        assert_eq!(stats.steps_per_second(), 0);
        assert_eq!(stats.elapsed_ms(), 0);
    }
}
