use super::{ChangeSet, Changelog, RunnerError, RunnerResult};
use crate::connection::{OfflineDatabase, SqliteDatabase};
use crate::resource::ResourceAccessor;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Arc;
use tracing::{info, warn};

/// Table recording which changesets have been applied
pub const LEDGER_TABLE: &str = "json_changeset_log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedChangeSet {
    pub id: String,
    pub rows_affected: usize,
    pub confirmation: String,
}

/// Outcome of one `update` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub applied: Vec<AppliedChangeSet>,
    /// Already recorded in the ledger
    pub skipped: Vec<String>,
    /// Validated but not applied (dry run)
    pub pending: Vec<String>,
}

pub struct ChangelogRunner {
    accessor: Arc<dyn ResourceAccessor>,
    dry_run: bool,
}

impl ChangelogRunner {
    pub fn new(accessor: Arc<dyn ResourceAccessor>) -> Self {
        Self {
            accessor,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validates every changeset without a database.
    ///
    /// Messages are prefixed with the changeset id.
    pub fn validate(&self, changelog: &Changelog) -> Vec<String> {
        let offline = OfflineDatabase::default();
        let mut messages = Vec::new();
        for change_set in &changelog.change_sets {
            let mut task = change_set.build_task(Arc::clone(&self.accessor));
            let errors = task.validate(&offline);
            messages.extend(errors.iter().map(|e| format!("{}: {}", change_set.id, e)));
        }
        messages
    }

    /// Applies pending changesets in order, one transaction each.
    ///
    /// Stops at the first failing changeset; changesets before it stay
    /// committed, the failing one is rolled back.
    pub fn update(
        &self,
        database: &mut SqliteDatabase,
        changelog: &Changelog,
    ) -> RunnerResult<RunReport> {
        ensure_ledger(database.connection())?;

        let mut report = RunReport::default();
        for change_set in &changelog.change_sets {
            if is_applied(database.connection(), &change_set.id)? {
                info!(changeset = %change_set.id, "already applied, skipping");
                report.skipped.push(change_set.id.clone());
                continue;
            }

            match self.apply(database, change_set)? {
                Some(applied) => report.applied.push(applied),
                None => report.pending.push(change_set.id.clone()),
            }
        }

        Ok(report)
    }

    fn apply(
        &self,
        database: &mut SqliteDatabase,
        change_set: &ChangeSet,
    ) -> RunnerResult<Option<AppliedChangeSet>> {
        let mut task = change_set.build_task(Arc::clone(&self.accessor));
        task.set_up().map_err(|source| RunnerError::Changeset {
            id: change_set.id.clone(),
            source,
        })?;

        let errors = task.validate(&*database);
        if !errors.is_empty() {
            return Err(RunnerError::Validation {
                id: change_set.id.clone(),
                errors,
            });
        }

        if self.dry_run {
            info!(changeset = %change_set.id, "dry run, not applied");
            return Ok(None);
        }

        // Dropping the transaction without commit rolls it back.
        let tx = database.connection_mut().transaction()?;
        let rows_affected = task.execute(&tx).map_err(|source| {
            warn!(changeset = %change_set.id, "rolling back");
            RunnerError::Changeset {
                id: change_set.id.clone(),
                source,
            }
        })?;

        let confirmation = task.confirmation_message();
        tx.execute(
            &format!(
                "INSERT INTO {} (id, author, confirmation, applied_at) VALUES (?1, ?2, ?3, ?4)",
                LEDGER_TABLE
            ),
            params![
                change_set.id,
                change_set.author,
                confirmation,
                chrono::Utc::now().to_rfc3339()
            ],
        )?;
        tx.commit()?;

        info!(changeset = %change_set.id, rows_affected, "{}", confirmation);
        Ok(Some(AppliedChangeSet {
            id: change_set.id.clone(),
            rows_affected,
            confirmation,
        }))
    }
}

fn ensure_ledger(conn: &Connection) -> RunnerResult<()> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            author TEXT NOT NULL,
            confirmation TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        LEDGER_TABLE
    ))?;
    Ok(())
}

fn is_applied(conn: &Connection, id: &str) -> RunnerResult<bool> {
    let found = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE id = ?1", LEDGER_TABLE),
            [id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}
