//! Error types for StableMatch

use std::time::Duration;

use thiserror::Error;

use crate::preference::Side;

/// Malformed preference input, detected while building a [`PreferenceModel`].
///
/// [`PreferenceModel`]: crate::PreferenceModel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    /// A list names a partner that does not exist on the other side.
    #[error("{side} {agent}: partner {partner} is out of range (other side has {bound} agents)")]
    OutOfRange {
        side: Side,
        agent: usize,
        partner: usize,
        bound: usize,
    },

    /// A list names the same partner twice.
    #[error("{side} {agent}: partner {partner} is listed more than once (positions {first} and {second})")]
    Duplicate {
        side: Side,
        agent: usize,
        partner: usize,
        first: usize,
        second: usize,
    },
}

/// A matching built from external data violates the pairing invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchingError {
    /// An index lies outside the agent range of its side.
    #[error("{side} {index} is out of range ({bound} agents)")]
    OutOfRange {
        side: Side,
        index: usize,
        bound: usize,
    },

    /// Two proposers claim the same receiver.
    #[error("receiver {receiver} is claimed by proposers {first} and {second}")]
    ReceiverTaken {
        receiver: usize,
        first: usize,
        second: usize,
    },
}

/// Main error type for StableMatch operations
#[derive(Debug, Error)]
pub enum StableMatchError {
    /// Input preference lists are malformed
    #[error("Invalid preferences: {0}")]
    InvalidPreference(#[from] PreferenceError),

    /// A matching handed to the library is malformed
    #[error("Invalid matching: {0}")]
    InvalidMatching(#[from] MatchingError),

    /// The backtracking search ran out of its time or step budget.
    ///
    /// This says nothing about whether a stable matching exists.
    #[error(
        "Search budget exhausted after {steps} steps, {backtracks} backtracks in {elapsed:?} (deepest proposer reached: {depth})"
    )]
    SearchBudgetExhausted {
        steps: u64,
        backtracks: u64,
        elapsed: Duration,
        depth: usize,
    },

    /// A solver broke one of its own guarantees
    #[error("Internal invariant violated in {component}: {detail}")]
    InternalInvariantViolation {
        component: &'static str,
        detail: String,
    },

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StableMatchError {
    /// Returns true if the error is a recoverable budget exhaustion.
    pub fn is_budget_exhausted(&self) -> bool {
        matches!(self, StableMatchError::SearchBudgetExhausted { .. })
    }
}

/// Result type alias for StableMatch operations
pub type Result<T> = std::result::Result<T, StableMatchError>;
