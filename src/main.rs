use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use json_changeset::{
    Changelog, ChangelogRunner, FileSystemAccessor, RunReport, RunnerConfig, SqliteDatabase,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "json-changeset")]
#[command(about = "Apply JSON resource changesets to a SQLite database")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply every changeset not yet recorded in the database
    Update {
        #[arg(long)]
        database: PathBuf,
        #[arg(long)]
        changelog: PathBuf,
        /// Resource root; defaults to the changelog's directory
        #[arg(long)]
        resources: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Check changeset parameters without touching a database
    Validate {
        #[arg(long)]
        changelog: PathBuf,
        #[arg(long)]
        resources: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Update {
            database,
            changelog,
            resources,
            dry_run,
        } => {
            let mut config = RunnerConfig::new(changelog).database(database).dry_run(dry_run);
            if let Some(root) = resources {
                config = config.resource_root(root);
            }
            update(&config)
        }
        Command::Validate {
            changelog,
            resources,
        } => {
            let mut config = RunnerConfig::new(changelog);
            if let Some(root) = resources {
                config = config.resource_root(root);
            }
            validate(&config)
        }
    }
}

fn load_runner(config: &RunnerConfig) -> Result<(Changelog, ChangelogRunner)> {
    let changelog = Changelog::load(&config.changelog_path).with_context(|| {
        format!(
            "Failed to load changelog '{}'",
            config.changelog_path.display()
        )
    })?;
    let accessor = FileSystemAccessor::new(config.effective_resource_root());
    let runner = ChangelogRunner::new(Arc::new(accessor)).dry_run(config.dry_run);
    Ok((changelog, runner))
}

fn update(config: &RunnerConfig) -> Result<()> {
    let Some(database_path) = &config.database_path else {
        bail!("A database path is required for update");
    };
    let (changelog, runner) = load_runner(config)?;

    let mut database = SqliteDatabase::open(database_path)
        .with_context(|| format!("Failed to open database '{}'", database_path.display()))?;
    let report = runner.update(&mut database, &changelog)?;

    print_report(&report);
    Ok(())
}

fn validate(config: &RunnerConfig) -> Result<()> {
    let (changelog, runner) = load_runner(config)?;
    let messages = runner.validate(&changelog);
    if messages.is_empty() {
        println!("{} changeset(s) valid", changelog.len());
        return Ok(());
    }
    for message in &messages {
        println!("{}", message);
    }
    bail!("{} validation error(s)", messages.len())
}

fn print_report(report: &RunReport) {
    for applied in &report.applied {
        println!(
            "applied  {} ({} row(s)): {}",
            applied.id, applied.rows_affected, applied.confirmation
        );
    }
    for id in &report.pending {
        println!("pending  {}", id);
    }
    for id in &report.skipped {
        println!("skipped  {}", id);
    }
}
