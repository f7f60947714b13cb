pub mod offline;

use crate::core::{Result, TaskError};
use crate::interface::{Database, DirectConnection, SqlDialect};
use rusqlite::{Connection, Transaction, params_from_iter};
use std::path::Path;
use tracing::debug;

pub use offline::OfflineDatabase;

const SQLITE_PRODUCT_NAME: &str = "SQLite";

/// SQLite database handle
///
/// Owns a `rusqlite::Connection`. Tasks borrow it through the `Database`
/// trait; the changelog runner also uses the raw connection for transactions.
pub struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

impl Database for SqliteDatabase {
    fn product_name(&self) -> &str {
        SQLITE_PRODUCT_NAME
    }

    fn direct_connection(&self) -> Option<&dyn DirectConnection> {
        Some(&self.conn)
    }
}

impl Database for Transaction<'_> {
    fn product_name(&self) -> &str {
        SQLITE_PRODUCT_NAME
    }

    fn direct_connection(&self) -> Option<&dyn DirectConnection> {
        let conn: &Connection = self;
        Some(conn)
    }
}

impl DirectConnection for Connection {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn execute_update(&self, sql: &str, params: &[&str]) -> Result<usize> {
        debug!(sql, params = params.len(), "preparing statement");
        // The statement is finalized when it goes out of scope, whichever way
        // this function returns.
        let mut statement = self.prepare(sql)?;
        let affected = statement
            .execute(params_from_iter(params.iter().copied()))
            .map_err(|e| TaskError::SqlExecution(e.to_string()))?;
        Ok(affected)
    }
}
