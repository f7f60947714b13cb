use std::path::{Path, PathBuf};

/// Changelog run configuration
///
/// Built from command-line arguments; every path is taken as given.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Changelog file (JSON)
    pub changelog_path: PathBuf,

    /// SQLite database file
    pub database_path: Option<PathBuf>,

    /// Root directory resource paths are resolved against.
    /// Defaults to the directory holding the changelog.
    pub resource_root: Option<PathBuf>,

    /// Validate and report, but write nothing
    pub dry_run: bool,
}

impl RunnerConfig {
    /// Create a configuration for a changelog file
    pub fn new(changelog_path: impl Into<PathBuf>) -> Self {
        Self {
            changelog_path: changelog_path.into(),
            database_path: None,
            resource_root: None,
            dry_run: false,
        }
    }

    /// Set the database file
    pub fn database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Set the resource root directory
    pub fn resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }

    /// Enable or disable dry-run mode
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Directory resource paths resolve against
    pub fn effective_resource_root(&self) -> PathBuf {
        match &self.resource_root {
            Some(root) => root.clone(),
            None => self
                .changelog_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}
