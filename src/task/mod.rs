//! Resource-backed migration task
//!
//! `ResourceTask` is what an orchestrator drives for one changeset:
//!
//! ```text
//! Configured --validate()--> Validated --execute()--> Executed
//!      |                          |
//!      +---------> Failed <-------+
//! ```
//!
//! `Executed` and `Failed` are terminal. A failed task is not retried; the
//! orchestrator re-runs the whole changeset instead.

use crate::core::{MigrationTaskConfig, OperationMode, Result, TaskError, TaskVariant};
use crate::interface::Database;
use crate::mutation::MutationStatement;
use crate::resource::{ResourceAccessor, load_text};
use crate::validation::{ParameterValidator, ValidationErrors};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Configured,
    Validated,
    Executed,
    Failed,
}

pub struct ResourceTask {
    variant: TaskVariant,
    config: MigrationTaskConfig,
    accessor: Option<Arc<dyn ResourceAccessor>>,
    state: TaskState,
    rows_affected: Option<usize>,
}

impl std::fmt::Debug for ResourceTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceTask")
            .field("variant", &self.variant)
            .field("config", &self.config)
            .field("has_accessor", &self.accessor.is_some())
            .field("state", &self.state)
            .field("rows_affected", &self.rows_affected)
            .finish()
    }
}

impl ResourceTask {
    /// Takes ownership of the configuration; it cannot change afterwards.
    pub fn new(variant: TaskVariant, config: MigrationTaskConfig) -> Self {
        Self {
            variant,
            config,
            accessor: None,
            state: TaskState::Configured,
            rows_affected: None,
        }
    }

    pub fn stream_json_insert(config: MigrationTaskConfig) -> Self {
        Self::new(TaskVariant::StreamJsonInsert, config)
    }

    pub fn employee_upsert(config: MigrationTaskConfig) -> Self {
        Self::new(TaskVariant::EmployeeUpsert, config)
    }

    /// Nothing to prepare; kept for orchestrators that call it unconditionally.
    pub fn set_up(&mut self) -> Result<()> {
        Ok(())
    }

    pub fn set_resource_accessor(&mut self, accessor: Arc<dyn ResourceAccessor>) {
        self.accessor = Some(accessor);
    }

    pub fn with_resource_accessor(mut self, accessor: Arc<dyn ResourceAccessor>) -> Self {
        self.set_resource_accessor(accessor);
        self
    }

    pub fn variant(&self) -> TaskVariant {
        self.variant
    }

    pub fn config(&self) -> &MigrationTaskConfig {
        &self.config
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn rows_affected(&self) -> Option<usize> {
        self.rows_affected
    }

    /// Logical path of the resource this task loads.
    pub fn resource_path(&self) -> Option<&str> {
        match self.variant {
            TaskVariant::StreamJsonInsert => self.config.json_file_path.as_deref(),
            TaskVariant::EmployeeUpsert => self.config.skills.as_deref(),
        }
    }

    /// Checks the configuration. An empty list means the task may run.
    ///
    /// Terminal tasks report their state unchanged.
    pub fn validate(&mut self, _database: &dyn Database) -> ValidationErrors {
        let errors = ParameterValidator::for_variant(self.variant).validate(&self.config);
        if matches!(self.state, TaskState::Configured | TaskState::Validated) {
            self.state = if errors.is_empty() {
                TaskState::Validated
            } else {
                TaskState::Failed
            };
        }
        errors
    }

    /// Loads the resource and issues the single write.
    ///
    /// A task that was never validated is validated here first.
    pub fn execute(&mut self, database: &dyn Database) -> Result<usize> {
        match self.state {
            TaskState::Executed | TaskState::Failed => return Err(TaskError::AlreadyFinished),
            TaskState::Configured => {
                let errors = self.validate(database);
                if !errors.is_empty() {
                    return Err(TaskError::ValidationFailure(errors));
                }
            }
            TaskState::Validated => {}
        }

        match self.apply(database) {
            Ok(rows) => {
                self.state = TaskState::Executed;
                self.rows_affected = Some(rows);
                info!(
                    variant = %self.variant,
                    rows,
                    resource = self.resource_path().unwrap_or_default(),
                    "applied JSON resource"
                );
                Ok(rows)
            }
            Err(err) => {
                self.state = TaskState::Failed;
                warn!(variant = %self.variant, error = %err, "task failed");
                Err(err)
            }
        }
    }

    fn apply(&self, database: &dyn Database) -> Result<usize> {
        let connection = database.direct_connection().ok_or_else(|| {
            TaskError::ConfigurationType(format!(
                "'{}' does not expose a direct connection",
                database.product_name()
            ))
        })?;
        let accessor = self.accessor.as_deref().ok_or_else(|| {
            TaskError::Configuration("no resource accessor has been set".to_string())
        })?;
        let path = self
            .resource_path()
            .ok_or_else(|| TaskError::Configuration("resource path is not set".to_string()))?;

        let content = load_text(accessor, path)?;
        let statement = MutationStatement::for_task(self.variant, &self.config, &content)?;
        statement.execute(connection)
    }

    /// Summary of what was written, for the orchestrator's change log.
    pub fn confirmation_message(&self) -> String {
        let or_blank = |v: Option<&str>| v.unwrap_or_default().to_string();
        match self.variant {
            TaskVariant::StreamJsonInsert => format!(
                "Inserted JSON from file {} into table {}",
                or_blank(self.config.json_file_path.as_deref()),
                or_blank(self.config.table_name.as_deref())
            ),
            TaskVariant::EmployeeUpsert => match self.config.operation_mode() {
                OperationMode::Insert => format!(
                    "Inserted row into table employees (ID: {})",
                    or_blank(self.config.id.as_deref())
                ),
                OperationMode::Update => format!(
                    "Updated row in table employees (ID: {})",
                    or_blank(self.config.id.as_deref())
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::OfflineDatabase;
    use crate::core::TaskErrorKind;
    use crate::interface::{DirectConnection, SqlDialect};
    use crate::resource::InMemoryAccessor;
    use std::cell::RefCell;

    /// Records every statement instead of running it.
    #[derive(Default)]
    struct RecordingDatabase {
        statements: RefCell<Vec<(String, Vec<String>)>>,
        fail_with: Option<String>,
    }

    impl DirectConnection for RecordingDatabase {
        fn dialect(&self) -> SqlDialect {
            SqlDialect::Standard
        }

        fn execute_update(&self, sql: &str, params: &[&str]) -> Result<usize> {
            self.statements.borrow_mut().push((
                sql.to_string(),
                params.iter().map(|p| p.to_string()).collect(),
            ));
            match &self.fail_with {
                Some(msg) => Err(TaskError::SqlExecution(msg.clone())),
                None => Ok(1),
            }
        }
    }

    impl Database for RecordingDatabase {
        fn product_name(&self) -> &str {
            "recording"
        }

        fn direct_connection(&self) -> Option<&dyn DirectConnection> {
            Some(self)
        }
    }

    fn accessor() -> Arc<dyn ResourceAccessor> {
        Arc::new(
            InMemoryAccessor::new()
                .with_resource("skills/e100.json", "{\"level\":\"senior\"}")
                .with_resource("skills/blank.json", "  \n"),
        )
    }

    fn employee_config() -> MigrationTaskConfig {
        MigrationTaskConfig::new()
            .with_id("E100")
            .with_firstname("Ann")
            .with_lastname("Lee")
            .with_email("ann@x.com")
            .with_skills("skills/e100.json")
    }

    fn employee_task(config: MigrationTaskConfig) -> ResourceTask {
        ResourceTask::employee_upsert(config).with_resource_accessor(accessor())
    }

    #[test]
    fn test_update_flows_through_lifecycle() {
        let db = RecordingDatabase::default();
        let mut task = employee_task(employee_config().with_operation_type("update"));
        task.set_up().unwrap();
        assert_eq!(task.state(), TaskState::Configured);

        assert!(task.validate(&db).is_empty());
        assert_eq!(task.state(), TaskState::Validated);

        assert_eq!(task.execute(&db).unwrap(), 1);
        assert_eq!(task.state(), TaskState::Executed);
        assert_eq!(task.rows_affected(), Some(1));

        let statements = db.statements.borrow();
        assert_eq!(statements.len(), 1);
        let (sql, params) = &statements[0];
        assert!(sql.starts_with("UPDATE employees SET"));
        assert_eq!(
            params,
            &vec!["Ann", "Lee", "ann@x.com", "{\"level\":\"senior\"}", "E100"]
        );
        assert_eq!(task.confirmation_message(), "Updated row in table employees (ID: E100)");
    }

    #[test]
    fn test_execute_validates_unvalidated_task() {
        let db = RecordingDatabase::default();
        let mut config = employee_config();
        config.email = None;
        let mut task = employee_task(config);

        let err = task.execute(&db).unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::Validation);
        assert!(err.to_string().contains("email is required"));
        assert_eq!(task.state(), TaskState::Failed);
        assert!(db.statements.borrow().is_empty());
    }

    #[test]
    fn test_missing_resource_issues_no_statement() {
        let db = RecordingDatabase::default();
        let mut task = employee_task(employee_config().with_skills("skills/missing.json"));

        assert!(task.validate(&db).is_empty());
        let err = task.execute(&db).unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::ResourceNotFound);
        assert_eq!(task.state(), TaskState::Failed);
        assert_eq!(task.rows_affected(), None);
        assert!(db.statements.borrow().is_empty());
    }

    #[test]
    fn test_blank_resource_issues_no_statement() {
        let db = RecordingDatabase::default();
        let mut task = employee_task(employee_config().with_skills("skills/blank.json"));

        let err = task.execute(&db).unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::EmptyResource);
        assert!(db.statements.borrow().is_empty());
    }

    #[test]
    fn test_failed_task_is_not_retried() {
        let db = RecordingDatabase {
            fail_with: Some("UNIQUE constraint failed: employees.id".into()),
            ..Default::default()
        };
        let mut task = employee_task(employee_config());

        let err = task.execute(&db).unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::SqlExecution);
        assert!(err.to_string().contains("UNIQUE constraint failed"));

        let again = task.execute(&db).unwrap_err();
        assert!(matches!(again, TaskError::AlreadyFinished));
        assert_eq!(db.statements.borrow().len(), 1);
    }

    #[test]
    fn test_executed_task_is_terminal() {
        let db = RecordingDatabase::default();
        let mut task = employee_task(employee_config());
        task.execute(&db).unwrap();

        assert!(matches!(task.execute(&db), Err(TaskError::AlreadyFinished)));
        assert!(task.validate(&db).is_empty());
        assert_eq!(task.state(), TaskState::Executed);
    }

    #[test]
    fn test_offline_database_is_a_configuration_type_error() {
        let db = OfflineDatabase::new("h2-offline");
        let mut task = employee_task(employee_config());

        assert!(task.validate(&db).is_empty());
        let err = task.execute(&db).unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::ConfigurationType);
        assert!(err.to_string().contains("h2-offline"));
    }

    #[test]
    fn test_missing_accessor_is_a_configuration_error() {
        let db = RecordingDatabase::default();
        let mut task = ResourceTask::employee_upsert(employee_config());
        let err = task.execute(&db).unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::Configuration);
    }

    #[test]
    fn test_confirmation_messages() {
        let stream = ResourceTask::stream_json_insert(
            MigrationTaskConfig::new()
                .with_table_name("employee_skills")
                .with_json_file_path("skills/e100.json"),
        );
        assert_eq!(
            stream.confirmation_message(),
            "Inserted JSON from file skills/e100.json into table employee_skills"
        );

        let insert = ResourceTask::employee_upsert(employee_config());
        assert_eq!(
            insert.confirmation_message(),
            "Inserted row into table employees (ID: E100)"
        );

        let update = ResourceTask::employee_upsert(employee_config().with_operation_type("update"));
        assert_eq!(
            update.confirmation_message(),
            "Updated row in table employees (ID: E100)"
        );
    }
}
