//! Event system for solver monitoring and extensibility.
//!
//! Listeners receive a synchronous callback for every proposal made by the
//! deferred-acceptance matcher and for every prune, assignment and
//! backtrack of the constraint search. The proposal events form the full
//! step history of a Gale-Shapley run, in order.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use stablematch_solver::event::{MatchingEventSupport, RecordingEventListener};
//!
//! let recorder = Arc::new(RecordingEventListener::new());
//! let mut support = MatchingEventSupport::new();
//! support.add_proposal_listener(recorder.clone());
//!
//! assert!(support.has_listeners());
//! assert!(recorder.events().is_empty());
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

/// Outcome of one deferred-acceptance step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalEvent {
    /// The proposer has no receiver left to propose to and leaves the queue.
    Exhausted { proposer: usize },

    /// The receiver does not list the proposer; the proposer is requeued.
    Unacceptable { proposer: usize, receiver: usize },

    /// The receiver was free and now holds the proposer.
    Accepted { proposer: usize, receiver: usize },

    /// The receiver traded `displaced` for the proposer; `displaced` is requeued.
    Replaced {
        proposer: usize,
        receiver: usize,
        displaced: usize,
    },

    /// The receiver kept `holder`; the proposer is requeued.
    Rejected {
        proposer: usize,
        receiver: usize,
        holder: usize,
    },
}

impl ProposalEvent {
    /// The proposer that was popped from the queue.
    pub fn proposer(&self) -> usize {
        match *self {
            ProposalEvent::Exhausted { proposer }
            | ProposalEvent::Unacceptable { proposer, .. }
            | ProposalEvent::Accepted { proposer, .. }
            | ProposalEvent::Replaced { proposer, .. }
            | ProposalEvent::Rejected { proposer, .. } => proposer,
        }
    }

    /// The receiver proposed to, if a proposal was made.
    pub fn receiver(&self) -> Option<usize> {
        match *self {
            ProposalEvent::Exhausted { .. } => None,
            ProposalEvent::Unacceptable { receiver, .. }
            | ProposalEvent::Accepted { receiver, .. }
            | ProposalEvent::Replaced { receiver, .. }
            | ProposalEvent::Rejected { receiver, .. } => Some(receiver),
        }
    }

    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ProposalEvent::Exhausted { .. } => "exhausted",
            ProposalEvent::Unacceptable { .. } => "unacceptable",
            ProposalEvent::Accepted { .. } => "accepted",
            ProposalEvent::Replaced { .. } => "replaced",
            ProposalEvent::Rejected { .. } => "rejected",
        }
    }
}

impl fmt::Display for ProposalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ProposalEvent::Exhausted { proposer } => {
                write!(f, "proposer {proposer} exhausted its list")
            }
            ProposalEvent::Unacceptable { proposer, receiver } => write!(
                f,
                "proposer {proposer} -> receiver {receiver}: not on the receiver's list"
            ),
            ProposalEvent::Accepted { proposer, receiver } => {
                write!(f, "proposer {proposer} -> receiver {receiver}: accepted")
            }
            ProposalEvent::Replaced {
                proposer,
                receiver,
                displaced,
            } => write!(
                f,
                "proposer {proposer} -> receiver {receiver}: replaces proposer {displaced}"
            ),
            ProposalEvent::Rejected {
                proposer,
                receiver,
                holder,
            } => write!(
                f,
                "proposer {proposer} -> receiver {receiver}: rejected, keeps proposer {holder}"
            ),
        }
    }
}

/// Listener for deferred-acceptance steps.
pub trait ProposalListener: Send + Sync + Debug {
    /// Called after each step with the 1-based step number.
    fn on_proposal(&self, step: u64, event: &ProposalEvent);
}

/// Listener for constraint-search events.
///
/// All methods default to no-ops.
pub trait SearchListener: Send + Sync + Debug {
    /// Called when the reducer removes `receiver` from `proposer`'s domain.
    fn on_domain_pruned(&self, _proposer: usize, _receiver: usize) {}

    /// Called when the search fixes `proposer` to `receiver`.
    fn on_assigned(&self, _proposer: usize, _receiver: usize) {}

    /// Called when the search undoes `proposer`'s assignment to `receiver`.
    fn on_backtrack(&self, _proposer: usize, _receiver: usize) {}
}

/// Central event broadcaster.
///
/// All listener methods are called synchronously in registration order.
#[derive(Clone, Default)]
pub struct MatchingEventSupport {
    proposal_listeners: Vec<Arc<dyn ProposalListener>>,
    search_listeners: Vec<Arc<dyn SearchListener>>,
}

impl MatchingEventSupport {
    /// Creates a new event support instance.
    pub fn new() -> Self {
        Self::default()
    }

    // === Listener Registration ===

    pub fn add_proposal_listener(&mut self, listener: Arc<dyn ProposalListener>) {
        self.proposal_listeners.push(listener);
    }

    pub fn add_search_listener(&mut self, listener: Arc<dyn SearchListener>) {
        self.search_listeners.push(listener);
    }

    /// Removes all listeners.
    pub fn clear_listeners(&mut self) {
        self.proposal_listeners.clear();
        self.search_listeners.clear();
    }

    // === Event Firing ===

    pub fn fire_proposal(&self, step: u64, event: &ProposalEvent) {
        for listener in &self.proposal_listeners {
            listener.on_proposal(step, event);
        }
    }

    pub fn fire_domain_pruned(&self, proposer: usize, receiver: usize) {
        for listener in &self.search_listeners {
            listener.on_domain_pruned(proposer, receiver);
        }
    }

    pub fn fire_assigned(&self, proposer: usize, receiver: usize) {
        for listener in &self.search_listeners {
            listener.on_assigned(proposer, receiver);
        }
    }

    pub fn fire_backtrack(&self, proposer: usize, receiver: usize) {
        for listener in &self.search_listeners {
            listener.on_backtrack(proposer, receiver);
        }
    }

    // === Query Methods ===

    pub fn proposal_listener_count(&self) -> usize {
        self.proposal_listeners.len()
    }

    pub fn search_listener_count(&self) -> usize {
        self.search_listeners.len()
    }

    /// Returns true if there are any listeners registered.
    pub fn has_listeners(&self) -> bool {
        !self.proposal_listeners.is_empty() || !self.search_listeners.is_empty()
    }
}

impl Debug for MatchingEventSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchingEventSupport")
            .field("proposal_listeners", &self.proposal_listeners.len())
            .field("search_listeners", &self.search_listeners.len())
            .finish()
    }
}

/// A listener that forwards events to `tracing` at DEBUG level.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventListener {
    prefix: String,
}

impl LoggingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logging listener with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ProposalListener for LoggingEventListener {
    fn on_proposal(&self, step: u64, event: &ProposalEvent) {
        debug!(prefix = %self.prefix, step, kind = event.kind(), "{}", event);
    }
}

impl SearchListener for LoggingEventListener {
    fn on_domain_pruned(&self, proposer: usize, receiver: usize) {
        debug!(prefix = %self.prefix, proposer, receiver, "domain pruned");
    }

    fn on_assigned(&self, proposer: usize, receiver: usize) {
        debug!(prefix = %self.prefix, proposer, receiver, "assigned");
    }

    fn on_backtrack(&self, proposer: usize, receiver: usize) {
        debug!(prefix = %self.prefix, proposer, receiver, "backtrack");
    }
}

/// A counting listener that tracks event occurrences.
///
/// Useful for testing and statistics collection.
#[derive(Debug, Default)]
pub struct CountingEventListener {
    proposal_count: AtomicU64,
    accepted_count: AtomicU64,
    replaced_count: AtomicU64,
    rejected_count: AtomicU64,
    unacceptable_count: AtomicU64,
    exhausted_count: AtomicU64,
    pruned_count: AtomicU64,
    assigned_count: AtomicU64,
    backtrack_count: AtomicU64,
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deferred-acceptance steps seen.
    pub fn proposal_count(&self) -> u64 {
        self.proposal_count.load(Ordering::SeqCst)
    }

    pub fn accepted_count(&self) -> u64 {
        self.accepted_count.load(Ordering::SeqCst)
    }

    pub fn replaced_count(&self) -> u64 {
        self.replaced_count.load(Ordering::SeqCst)
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected_count.load(Ordering::SeqCst)
    }

    pub fn unacceptable_count(&self) -> u64 {
        self.unacceptable_count.load(Ordering::SeqCst)
    }

    pub fn exhausted_count(&self) -> u64 {
        self.exhausted_count.load(Ordering::SeqCst)
    }

    pub fn pruned_count(&self) -> u64 {
        self.pruned_count.load(Ordering::SeqCst)
    }

    pub fn assigned_count(&self) -> u64 {
        self.assigned_count.load(Ordering::SeqCst)
    }

    pub fn backtrack_count(&self) -> u64 {
        self.backtrack_count.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.proposal_count,
            &self.accepted_count,
            &self.replaced_count,
            &self.rejected_count,
            &self.unacceptable_count,
            &self.exhausted_count,
            &self.pruned_count,
            &self.assigned_count,
            &self.backtrack_count,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

impl ProposalListener for CountingEventListener {
    fn on_proposal(&self, _step: u64, event: &ProposalEvent) {
        self.proposal_count.fetch_add(1, Ordering::SeqCst);
        let counter = match event {
            ProposalEvent::Exhausted { .. } => &self.exhausted_count,
            ProposalEvent::Unacceptable { .. } => &self.unacceptable_count,
            ProposalEvent::Accepted { .. } => &self.accepted_count,
            ProposalEvent::Replaced { .. } => &self.replaced_count,
            ProposalEvent::Rejected { .. } => &self.rejected_count,
        };
        counter.fetch_add(1, Ordering::SeqCst);
    }
}

impl SearchListener for CountingEventListener {
    fn on_domain_pruned(&self, _proposer: usize, _receiver: usize) {
        self.pruned_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_assigned(&self, _proposer: usize, _receiver: usize) {
        self.assigned_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_backtrack(&self, _proposer: usize, _receiver: usize) {
        self.backtrack_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// A listener that keeps the proposal history of a run.
#[derive(Debug, Default)]
pub struct RecordingEventListener {
    events: Mutex<Vec<ProposalEvent>>,
}

impl RecordingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in step order.
    pub fn events(&self) -> Vec<ProposalEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drops the recorded history.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ProposalListener for RecordingEventListener {
    fn on_proposal(&self, _step: u64, event: &ProposalEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
