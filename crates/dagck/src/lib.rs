//! DAG folder checkers
//!
//! Three executables share one command line and one pipeline:
//!
//! | Binary | Check |
//! |--------|-------|
//! | `check-dag-naming` | every DAG ID follows `{tenant}_{name}` |
//! | `check-dag-resources` | `max_active_runs` / `max_active_tasks` within limits |
//! | `validate-dags` | every file imports cleanly and defines a DAG |
//!
//! With no paths the whole configured DAG folder is scanned. Exit status is
//! 1 when any file has an error, 0 otherwise (warnings never fail a run).

pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser};
use dagck_validate::{
    BatchRunner, ConfigLoader, DagCheck, DagckConfig, DefinitionCheck, NamingCheck, PythonDagBag,
    ReportFormat, Reporter, ResourceCheck,
};
use tracing::debug;

pub use logging::init_logging;

/// Command line shared by all checkers
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// DAG files to check (default: every DAG file in the DAG folder)
    pub paths: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Project root; the DAG folder and report paths are relative to it
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Report format: human or json
    #[arg(long, default_value = "human")]
    pub format: ReportFormat,
}

/// Which checker a binary runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Naming,
    Resources,
    Definition,
}

impl CheckKind {
    pub fn binary_name(self) -> &'static str {
        match self {
            Self::Naming => "check-dag-naming",
            Self::Resources => "check-dag-resources",
            Self::Definition => "validate-dags",
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            Self::Naming => "Check DAG IDs follow the {tenant}_{name} naming convention",
            Self::Resources => "Check DAGs declare sane max_active_runs / max_active_tasks",
            Self::Definition => "Check DAG files import cleanly and define at least one DAG",
        }
    }

    /// Parse process arguments under this checker's name
    pub fn parse_args(self) -> Cli {
        let matches = Cli::command()
            .name(self.binary_name())
            .about(self.about())
            .get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }
}

/// Shared `main` of the three binaries
pub fn main_for(kind: CheckKind) -> ExitCode {
    let cli = kind.parse_args();
    match run(kind, &cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load configuration, run the checker, print the report, return the exit status
pub fn run(kind: CheckKind, cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    init_logging(&config.logging)?;
    debug!(check = kind.binary_name(), root = %config.project_root.display(), "Configuration loaded");

    let registry = PythonDagBag::new(&config);
    match kind {
        CheckKind::Naming => execute(&config, &NamingCheck::new(&config.rules, &registry), cli),
        CheckKind::Resources => execute(&config, &ResourceCheck::new(&config.rules, &registry), cli),
        CheckKind::Definition => execute(&config, &DefinitionCheck::new(&registry), cli),
    }
}

fn load_config(cli: &Cli) -> Result<DagckConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(root) = &cli.project_root {
        loader = loader.with_project_root(root);
    }
    loader.load().context("failed to load configuration")
}

fn execute(config: &DagckConfig, check: &dyn DagCheck, cli: &Cli) -> Result<i32> {
    let runner = BatchRunner::new(config, check);
    let report = if cli.paths.is_empty() {
        runner.run_directory(&config.dags_path())
    } else {
        runner.run_paths(&cli.paths)
    }
    .with_context(|| format!("{} check aborted", check.name()))?;

    print!("{}", Reporter::render(&report, &check.style(), cli.format)?);
    Ok(Reporter::exit_code(&report))
}
