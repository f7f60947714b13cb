// ============================================================================
// json-changeset Library
// ============================================================================

pub mod core;
pub mod interface;
pub mod connection;
pub mod resource;
pub mod validation;
pub mod mutation;
pub mod task;
pub mod changelog;

// Re-export main types for convenience
pub use crate::core::{
    MigrationTaskConfig, OperationMode, Result, TaskError, TaskErrorKind, TaskField, TaskVariant,
};
pub use interface::{Database, DirectConnection, SqlDialect};
pub use connection::{OfflineDatabase, SqliteDatabase};
pub use resource::{
    FileSystemAccessor, InMemoryAccessor, ResourceAccessor, ResourceHandle, load_text,
};
pub use validation::{ParameterValidator, ValidationErrors};
pub use mutation::MutationStatement;
pub use task::{ResourceTask, TaskState};

// Re-export changelog runner API
pub use changelog::{
    AppliedChangeSet, ChangeSet, Changelog, ChangelogRunner, RunReport, RunnerConfig, RunnerError,
};
