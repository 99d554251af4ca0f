//! Mutable state of the backtracking search.

use stablematch_core::Matching;

/// Partial assignment plus a candidate cursor per proposer.
///
/// The cursor of proposer `p` is the index into its domain of the next
/// candidate to try. It survives while deeper proposers are explored so the
/// search resumes where it left off after a backtrack.
#[derive(Debug, Clone)]
pub struct SearchState {
    matching: Matching,
    cursor: Vec<usize>,
}

impl SearchState {
    pub fn new(proposer_count: usize, receiver_count: usize) -> Self {
        Self {
            matching: Matching::new(proposer_count, receiver_count),
            cursor: vec![0; proposer_count],
        }
    }

    /// Takes the next untried candidate of proposer `p` from `domain`.
    pub fn next_candidate(&mut self, p: usize, domain: &[usize]) -> Option<usize> {
        let candidate = domain.get(self.cursor[p]).copied()?;
        self.cursor[p] += 1;
        Some(candidate)
    }

    /// Rewinds proposer `p` to the start of its domain.
    pub fn reset_cursor(&mut self, p: usize) {
        self.cursor[p] = 0;
    }

    pub fn assign(&mut self, p: usize, r: usize) {
        self.matching.pair(p, r);
    }

    /// Clears the assignment of `p`, returning the receiver it held.
    pub fn unassign(&mut self, p: usize) -> Option<usize> {
        self.matching.unpair_proposer(p)
    }

    pub fn is_taken(&self, r: usize) -> bool {
        self.matching.proposer_of(r).is_some()
    }

    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    pub fn into_matching(self) -> Matching {
        self.matching
    }
}
