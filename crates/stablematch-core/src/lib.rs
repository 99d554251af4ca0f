//! StableMatch Core - Core types for stable matching
//!
//! This crate provides the fundamental data shared by every solver:
//! - `PreferenceModel`: validated, immutable preference lists with O(1) rank lookup
//! - `Matching`: a symmetric, injective proposer/receiver pairing
//! - `BlockingPair`: a witness of instability
//! - Error types for malformed input and solver failures

pub mod error;
pub mod matching;
pub mod preference;

pub use error::{MatchingError, PreferenceError, Result, StableMatchError};
pub use matching::{BlockingPair, Matching};
pub use preference::{PreferenceList, PreferenceModel, Side};
