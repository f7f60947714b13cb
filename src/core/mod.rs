pub mod error;
pub mod types;

pub use error::{Result, TaskError, TaskErrorKind};
pub use types::{MigrationTaskConfig, OperationMode, TaskField, TaskVariant};
