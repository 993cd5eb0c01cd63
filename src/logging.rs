//! Tracing subscriber setup.
//!
//! The server logs to stderr. The terminal quiz owns the screen, so it only
//! logs when given a file to write to.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::QuizError;

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "sat_quiz=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_stderr() -> Result<(), QuizError> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| QuizError::Logging(e.to_string()))
}

pub fn init_file<P: AsRef<Path>>(path: P) -> Result<(), QuizError> {
    let file = File::create(path.as_ref())?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| QuizError::Logging(e.to_string()))
}
