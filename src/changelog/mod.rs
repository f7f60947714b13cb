//! Changelog runner
//!
//! A small orchestrator: an ordered list of changesets, each
//! one resource task, applied in its own transaction and recorded in a
//! ledger table so a second run skips it.
//!
//! - `config.rs` - run configuration
//! - `runner.rs` - validation and update passes
//! - `error.rs` - runner errors

mod config;
mod error;
mod runner;

use crate::core::{MigrationTaskConfig, TaskVariant};
use crate::resource::ResourceAccessor;
use crate::task::ResourceTask;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

pub use config::RunnerConfig;
pub use error::{RunnerError, RunnerResult};
pub use runner::{AppliedChangeSet, ChangelogRunner, LEDGER_TABLE, RunReport};

/// One changeset: an id, an author, the task it runs and the task's
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub id: String,
    pub author: String,
    pub task: TaskVariant,
    #[serde(default)]
    pub params: MigrationTaskConfig,
}

impl ChangeSet {
    /// Builds a fresh task for this changeset
    pub fn build_task(&self, accessor: Arc<dyn ResourceAccessor>) -> ResourceTask {
        ResourceTask::new(self.task, self.params.clone()).with_resource_accessor(accessor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changelog {
    #[serde(default)]
    pub change_sets: Vec<ChangeSet>,
}

impl Changelog {
    pub fn from_json(json: &str) -> RunnerResult<Self> {
        let changelog: Changelog = serde_json::from_str(json)?;
        changelog.check()?;
        Ok(changelog)
    }

    pub fn load(path: impl AsRef<Path>) -> RunnerResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn check(&self) -> RunnerResult<()> {
        let mut seen = HashSet::new();
        for change_set in &self.change_sets {
            if change_set.id.trim().is_empty() {
                return Err(RunnerError::Changelog("changeset id cannot be empty".into()));
            }
            if !seen.insert(change_set.id.as_str()) {
                return Err(RunnerError::Changelog(format!(
                    "duplicate changeset id '{}'",
                    change_set.id
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.change_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.change_sets.is_empty()
    }
}
