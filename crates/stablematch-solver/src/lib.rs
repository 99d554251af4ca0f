//! StableMatch Solver Engine
//!
//! This crate provides the matching algorithms:
//! - Gale-Shapley deferred acceptance
//! - Constraint formulation (domain reduction plus backtracking)
//! - Blocking-pair verification
//! - Termination conditions for the backtracking search
//! - Event system for monitoring
//! - Configuration wiring (builder module)

pub mod builder;
pub mod csp;
pub mod deferred_acceptance;
pub mod event;
pub mod scope;
pub mod solver;
pub mod stats;
pub mod termination;
pub mod verifier;

pub use builder::{ConfiguredTermination, TerminationBuilder};
pub use csp::{
    BacktrackingOutcome, BacktrackingSolver, ConstraintReducer, CspSolution, CspSolver,
    ReducedDomains, SearchState,
};
pub use deferred_acceptance::{DeferredAcceptanceMatcher, DeferredAcceptanceResult};
pub use event::{
    CountingEventListener, LoggingEventListener, MatchingEventSupport, ProposalEvent,
    ProposalListener, RecordingEventListener, SearchListener,
};
pub use scope::SearchScope;
pub use solver::{improved_proposers, Comparison, StableMatchSolver};
pub use stats::SearchStats;
pub use termination::{
    AndTermination, BacktrackCountTermination, ExternalTermination, NoTermination, OrTermination,
    StepCountTermination, Termination, TimeTermination,
};
pub use verifier::{find_blocking_pairs, is_stable, CertificationError, StabilityVerifier};
