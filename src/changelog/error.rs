//! Changelog-level error types
//!
//! Task failures keep their `TaskError` as the source so callers can still
//! branch on the task error kind.

use crate::core::TaskError;
use crate::validation::ValidationErrors;
use thiserror::Error;

pub type RunnerResult<T> = Result<T, RunnerError>;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Invalid changelog: {0}")]
    Changelog(String),

    #[error("Failed to read changelog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Changeset '{id}' failed validation: {errors}")]
    Validation { id: String, errors: ValidationErrors },

    #[error("Changeset '{id}' failed: {source}")]
    Changeset {
        id: String,
        #[source]
        source: TaskError,
    },

    #[error("Changelog ledger error: {0}")]
    Ledger(#[from] rusqlite::Error),
}

impl From<serde_json::Error> for RunnerError {
    fn from(err: serde_json::Error) -> Self {
        RunnerError::Changelog(err.to_string())
    }
}
