//! Error types.
//!
//! Repository and assembly failures are recoverable: they put the session in
//! the `Error` phase. `InvalidTransition` is never surfaced to the taker; the
//! runner logs and drops it.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::Phase;

/// Failures reported by a question repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("no questions found for test {test_id}")]
    NotFound { test_id: String },

    /// The repository could not be reached.
    #[error("question repository unavailable: {0}")]
    Unavailable(String),

    /// The repository answered with something that could not be read.
    #[error("malformed question data: {0}")]
    Malformed(String),
}

/// Failures while assembling a test. Kept on the session in the `Error` phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("Test not found: {test_id}")]
    TestNotFound { test_id: String },

    #[error("{0}")]
    Repository(String),
}

impl AssemblyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TestNotFound { .. })
    }
}

impl From<RepositoryError> for AssemblyError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { test_id } => Self::TestNotFound { test_id },
            other => Self::Repository(other.to_string()),
        }
    }
}

/// A raw question row that cannot become a `Question`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("question {ordinal} has invalid correct option {value:?}")]
    InvalidCorrectOption { ordinal: u32, value: String },
}

/// An action or event refused by the session state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTransition {
    #[error("{action} is not allowed in the {phase:?} phase")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("a test identifier is required")]
    EmptyTestId,

    #[error("question {index} has no answer yet")]
    Unanswered { index: usize },

    #[error("already at the first question")]
    AtFirstQuestion,

    #[error("already at the last question")]
    AtLastQuestion,

    #[error("submit is only allowed from the last question (at {index})")]
    NotLastQuestion { index: usize },

    #[error("event belongs to a previous session")]
    StaleSession,
}

/// Failures while reading a question bank file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl From<LoadError> for RepositoryError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Io { .. } => Self::Unavailable(err.to_string()),
            LoadError::Parse { .. } => Self::Malformed(err.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level error for the library entry points and the binary.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}
