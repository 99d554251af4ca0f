//! StableMatch - Stable Matching in Rust
//!
//! Two independent strategies over the same preference model: Gale-Shapley
//! deferred acceptance and a constraint search, each checked by the same
//! blocking-pair verifier.
//!
//! # Example
//!
//! ```rust
//! use stablematch::prelude::*;
//!
//! let model = build_model(
//!     vec![vec![0, 1], vec![0, 1]],
//!     vec![vec![1, 0], vec![0, 1]],
//! ).unwrap();
//!
//! let result = run_deferred_acceptance(&model).unwrap();
//! assert_eq!(result.step_count, 3);
//! assert!(verify_stability(&result.matching, &model).is_empty());
//!
//! let csp = solve_csp(&model, None).unwrap();
//! assert!(csp.found);
//! assert_eq!(csp.domain_sizes, vec![2, 2]);
//! ```

// Model and errors
pub use stablematch_core::{
    BlockingPair, Matching, MatchingError, PreferenceError, PreferenceList, PreferenceModel,
    Result, Side, StableMatchError,
};

// Configuration
pub use stablematch_config::{ConfigError, EnvironmentMode, SolverConfig, TerminationConfig};

// Solvers
pub use stablematch_solver::{
    improved_proposers, Comparison, CspSolution, CspSolver, DeferredAcceptanceMatcher,
    DeferredAcceptanceResult, MatchingEventSupport, StabilityVerifier, StableMatchSolver,
};

// Event listeners and terminations
pub use stablematch_solver::{event, termination};

#[cfg(feature = "console")]
pub use stablematch_console::init as init_console;

mod solver;
pub use solver::{build_model, run_deferred_acceptance, solve_csp, verify_stability};

pub mod prelude {
    pub use super::{build_model, run_deferred_acceptance, solve_csp, verify_stability};
    pub use super::{
        BlockingPair, CspSolution, DeferredAcceptanceResult, Matching, PreferenceModel,
        StableMatchError,
    };
    pub use super::{SolverConfig, StableMatchSolver};
}
