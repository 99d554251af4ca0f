//! Configuration system for StableMatch.
//!
//! Load solver configuration from TOML or YAML to bound the backtracking
//! search and switch result assertions on, without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use stablematch_config::{EnvironmentMode, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     environment_mode = "full_assert"
//!
//!     [termination]
//!     seconds_spent_limit = 2
//!     millis_spent_limit = 500
//!     backtrack_count_limit = 10000
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
//! assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use stablematch_config::SolverConfig;
//!
//! let config = SolverConfig::load("stablematch.toml").unwrap_or_default();
//! // Proceeds without a budget if the file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode controlling result assertions.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Budget for the backtracking search.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// `.yaml` and `.yml` are read as YAML, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, fails to parse, or
    /// describes an invalid budget.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects budgets that would stop the search before its first step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(termination) = &self.termination else {
            return Ok(());
        };
        if termination.step_count_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "step_count_limit must be positive".to_string(),
            ));
        }
        if termination.backtrack_count_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "backtrack_count_limit must be positive".to_string(),
            ));
        }
        if termination.time_limit() == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid(
                "time limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the search time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        let millis = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: None,
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the backtrack budget.
    pub fn with_backtrack_limit(mut self, limit: u64) -> Self {
        self.termination = Some(TerminationConfig {
            backtrack_count_limit: Some(limit),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the step budget.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.termination = Some(TerminationConfig {
            step_count_limit: Some(limit),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the environment mode.
    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    /// Returns the search time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Results are returned as produced.
    #[default]
    NonAsserting,

    /// Every produced matching is certified stable and consistent before it
    /// is returned.
    FullAssert,
}

impl EnvironmentMode {
    /// Returns true if solver outputs must be certified.
    pub fn is_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}

/// Termination configuration for the backtracking search.
///
/// Every limit is optional; the search stops at whichever is hit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend searching.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend searching, added to the seconds limit.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of candidate evaluations.
    pub step_count_limit: Option<u64>,

    /// Maximum number of undone assignments.
    pub backtrack_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.seconds_spent_limit.is_none() && self.millis_spent_limit.is_none() {
            return None;
        }
        let limit = Duration::from_secs(self.seconds_spent_limit.unwrap_or(0))
            + Duration::from_millis(self.millis_spent_limit.unwrap_or(0));
        Some(limit)
    }

    /// Returns true if no limit is set.
    pub fn is_unbounded(&self) -> bool {
        self.time_limit().is_none()
            && self.step_count_limit.is_none()
            && self.backtrack_count_limit.is_none()
    }
}
