use crate::core::Result;

/// SQL flavour spoken by a connection.
///
/// Only the JSON cast differs between flavours: SQLite has no JSON type, so a
/// `CAST(? AS JSON)` there would coerce the text to NUMERIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SqlDialect {
    /// `CAST(? AS JSON)`, as understood by MySQL/MariaDB and friends.
    #[default]
    Standard,
    /// `json(?)`
    Sqlite,
}

impl SqlDialect {
    pub fn json_cast(&self, placeholder: &str) -> String {
        match self {
            Self::Standard => format!("CAST({} AS JSON)", placeholder),
            Self::Sqlite => format!("json({})", placeholder),
        }
    }
}

/// A connection able to prepare and run a positional-parameter statement.
///
/// Implementations prepare, bind and execute in one call and must release the
/// prepared statement before returning, on success and on failure alike.
pub trait DirectConnection {
    fn dialect(&self) -> SqlDialect;

    /// Runs one data-modifying statement and returns the affected row count.
    fn execute_update(&self, sql: &str, params: &[&str]) -> Result<usize>;
}

/// The database handle a migration orchestrator passes to each task.
///
/// The task never opens or closes the underlying connection; it only borrows
/// it for the duration of a single statement.
pub trait Database {
    /// Human readable product name, used in log and error messages.
    fn product_name(&self) -> &str;

    /// The directly usable connection behind this handle, if there is one.
    fn direct_connection(&self) -> Option<&dyn DirectConnection>;
}
