//! Single-statement mutations
//!
//! A [`MutationStatement`] is a declarative description of one INSERT or
//! UPDATE: the target table, the columns in bind order, and which column
//! carries the JSON payload. Rendering to SQL and binding happen from that
//! description alone, so the task variants differ only in the data they
//! feed in.

use crate::core::{MigrationTaskConfig, OperationMode, Result, TaskError, TaskField, TaskVariant};
use crate::interface::{DirectConnection, SqlDialect};

const PLACEHOLDER: &str = "?";
const EMPLOYEES_TABLE: &str = "employees";

/// One column and the value bound to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub column: String,
    pub value: String,
    /// The bound text is cast to JSON inside the statement.
    pub json: bool,
}

impl ColumnBinding {
    pub fn text(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            json: false,
        }
    }

    pub fn json(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
            json: true,
        }
    }

    fn placeholder(&self, dialect: SqlDialect) -> String {
        if self.json {
            dialect.json_cast(PLACEHOLDER)
        } else {
            PLACEHOLDER.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    /// `SET` every binding, `WHERE key = ?`.
    Update { key: ColumnBinding },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationStatement {
    table: String,
    bindings: Vec<ColumnBinding>,
    kind: StatementKind,
}

impl MutationStatement {
    pub fn insert(table: impl Into<String>, bindings: Vec<ColumnBinding>) -> Self {
        Self {
            table: table.into(),
            bindings,
            kind: StatementKind::Insert,
        }
    }

    pub fn update(
        table: impl Into<String>,
        bindings: Vec<ColumnBinding>,
        key: ColumnBinding,
    ) -> Self {
        Self {
            table: table.into(),
            bindings,
            kind: StatementKind::Update { key },
        }
    }

    /// Builds the statement a task variant issues for `content`.
    ///
    /// The stream-JSON variant always inserts; the employee variant follows
    /// the configured operation mode.
    pub fn for_task(
        variant: TaskVariant,
        config: &MigrationTaskConfig,
        content: &str,
    ) -> Result<Self> {
        let field = |f: TaskField| {
            config.get(f).ok_or_else(|| {
                TaskError::Configuration(format!("{} is required", f.label()))
            })
        };

        let statement = match variant {
            TaskVariant::StreamJsonInsert => Self::insert(
                field(TaskField::TableName)?,
                vec![
                    ColumnBinding::text(field(TaskField::IdColumn)?, field(TaskField::IdValue)?),
                    ColumnBinding::text("primary_skill", field(TaskField::PrimarySkill)?),
                    ColumnBinding::text("secondary_skill", field(TaskField::SecondarySkill)?),
                    ColumnBinding::json(field(TaskField::JsonColumn)?, content),
                    ColumnBinding::text(
                        field(TaskField::EmployeeIdColumn)?,
                        field(TaskField::EmployeeIdValue)?,
                    ),
                ],
            ),
            TaskVariant::EmployeeUpsert => {
                let id = ColumnBinding::text("id", field(TaskField::Id)?);
                let columns = vec![
                    ColumnBinding::text("firstname", field(TaskField::Firstname)?),
                    ColumnBinding::text("lastname", field(TaskField::Lastname)?),
                    ColumnBinding::text("email", field(TaskField::Email)?),
                    ColumnBinding::json("skills", content),
                ];
                match config.operation_mode() {
                    OperationMode::Update => Self::update(EMPLOYEES_TABLE, columns, id),
                    OperationMode::Insert => {
                        let mut bindings = Vec::with_capacity(columns.len() + 1);
                        bindings.push(id);
                        bindings.extend(columns);
                        Self::insert(EMPLOYEES_TABLE, bindings)
                    }
                }
            }
        };

        Ok(statement)
    }

    pub fn kind(&self) -> &StatementKind {
        &self.kind
    }

    /// Renders the statement text. Identifiers are spliced in as-is.
    pub fn to_sql(&self, dialect: SqlDialect) -> String {
        match &self.kind {
            StatementKind::Insert => {
                let columns: Vec<&str> = self.bindings.iter().map(|b| b.column.as_str()).collect();
                let values: Vec<String> =
                    self.bindings.iter().map(|b| b.placeholder(dialect)).collect();
                format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    self.table,
                    columns.join(", "),
                    values.join(", ")
                )
            }
            StatementKind::Update { key } => {
                let assignments: Vec<String> = self
                    .bindings
                    .iter()
                    .map(|b| format!("{} = {}", b.column, b.placeholder(dialect)))
                    .collect();
                format!(
                    "UPDATE {} SET {} WHERE {} = {}",
                    self.table,
                    assignments.join(", "),
                    key.column,
                    key.placeholder(dialect)
                )
            }
        }
    }

    /// Positional parameters in bind order.
    pub fn parameters(&self) -> Vec<&str> {
        let mut params: Vec<&str> = self.bindings.iter().map(|b| b.value.as_str()).collect();
        if let StatementKind::Update { key } = &self.kind {
            params.push(key.value.as_str());
        }
        params
    }

    /// Issues the statement and returns the affected row count.
    pub fn execute(&self, connection: &dyn DirectConnection) -> Result<usize> {
        let sql = self.to_sql(connection.dialect());
        connection.execute_update(&sql, &self.parameters())
    }
}
