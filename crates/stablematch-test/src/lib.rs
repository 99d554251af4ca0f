//! Shared test fixtures for StableMatch crates.
//!
//! - [`scenarios`] - Small hand-written preference profiles with known answers
//! - [`generator`] - Seeded random preference profiles
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! stablematch-test = { workspace = true }
//! ```
//!
//! Then build the models you need:
//!
//! ```
//! use stablematch_test::{scenarios, PreferenceGenerator};
//!
//! let crossed = scenarios::crossed_pair().into_model();
//! let random = PreferenceGenerator::seeded(7).complete(5).into_model();
//! assert_eq!(crossed.proposer_count(), 2);
//! assert_eq!(random.proposer_count(), 5);
//! ```

pub mod generator;
pub mod scenarios;

pub use generator::PreferenceGenerator;
pub use scenarios::PreferenceProfile;
