use crate::validation::ValidationErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Validation failed: {0}")]
    ValidationFailure(ValidationErrors),

    #[error("Resource '{path}' not found")]
    ResourceNotFound { path: String },

    #[error("Resource is empty: {path}")]
    EmptyResource { path: String },

    #[error("Failed to read resource '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to execute SQL statement: {0}")]
    SqlExecution(String),

    #[error("Database connection is not a direct connection: {0}")]
    ConfigurationType(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Task has already run and cannot be executed again")]
    AlreadyFinished,
}

/// Coarse error category for callers that branch on the failure kind
/// instead of matching on the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskErrorKind {
    Validation,
    ResourceNotFound,
    EmptyResource,
    Io,
    SqlExecution,
    ConfigurationType,
    Configuration,
    Lifecycle,
}

impl TaskError {
    pub fn kind(&self) -> TaskErrorKind {
        match self {
            Self::ValidationFailure(_) => TaskErrorKind::Validation,
            Self::ResourceNotFound { .. } => TaskErrorKind::ResourceNotFound,
            Self::EmptyResource { .. } => TaskErrorKind::EmptyResource,
            Self::Io { .. } => TaskErrorKind::Io,
            Self::SqlExecution(_) => TaskErrorKind::SqlExecution,
            Self::ConfigurationType(_) => TaskErrorKind::ConfigurationType,
            Self::Configuration(_) => TaskErrorKind::Configuration,
            Self::AlreadyFinished => TaskErrorKind::Lifecycle,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

impl From<rusqlite::Error> for TaskError {
    fn from(err: rusqlite::Error) -> Self {
        Self::SqlExecution(err.to_string())
    }
}
