//! Quiz configuration.
//!
//! The defaults reproduce the reference full-length test: 54 questions in
//! 64 minutes. A TOML file may override any field.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Time allowed for the reference full-length test (64 minutes).
pub const DEFAULT_TOTAL_BUDGET_SECS: u64 = 64 * 60;

/// Number of questions in the reference full-length test.
pub const DEFAULT_REFERENCE_QUESTION_COUNT: u32 = 54;

/// Countdown tick period.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Seconds granted for a test of `reference_question_count` questions.
    pub total_budget_secs: u64,
    pub reference_question_count: u32,
    pub tick_interval_ms: u64,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            total_budget_secs: DEFAULT_TOTAL_BUDGET_SECS,
            reference_question_count: DEFAULT_REFERENCE_QUESTION_COUNT,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl QuizConfig {
    /// Load a configuration from a TOML file.
    ///
    /// Missing fields fall back to their defaults. The result is validated
    /// before it is returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: QuizConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reference_question_count == 0 {
            return Err(ConfigError::Invalid(
                "reference_question_count must be at least 1".to_string(),
            ));
        }
        // Every question must be worth at least one second of countdown.
        if self.total_budget_secs < u64::from(self.reference_question_count) {
            return Err(ConfigError::Invalid(
                "total_budget_secs must be at least reference_question_count".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
