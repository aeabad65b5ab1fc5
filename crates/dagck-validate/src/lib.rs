//! DAG Folder Validation
//!
//! This crate checks Airflow DAG definition files against:
//! - Naming conventions (`{tenant}_{name}` identifiers, known tenants)
//! - Resource limits (`max_active_runs`, `max_active_tasks`)
//! - Definition validity (the file imports cleanly and registers a DAG)
//!
//! Configuration for every file is gathered from two sources: a static
//! tree-sitter parse of the file, and the Airflow `DagBag` registry loaded
//! from the file's folder. Static values always win; the registry only fills
//! what the parse could not see.
//!
//! # Example
//!
//! ```ignore
//! use dagck_validate::{BatchRunner, ConfigLoader, NamingCheck, PythonDagBag};
//!
//! let config = ConfigLoader::new().load()?;
//! let registry = PythonDagBag::new(&config);
//! let check = NamingCheck::new(&config.rules, &registry);
//! let report = BatchRunner::new(&config, &check).run_directory(&config.dags_path())?;
//! ```

pub mod ast;
pub mod check;
pub mod config;
pub mod definition;
pub mod naming;
pub mod record;
pub mod registry;
pub mod reporter;
pub mod resources;
pub mod runner;
pub mod scan;
pub mod violation_trait;

use std::path::PathBuf;
use thiserror::Error;

pub use ast::{DagCall, PythonParser, SourceExtractor};
pub use check::{DagCheck, Verdict};
pub use config::{
    ConfigLoader, DagckConfig, LoggingConfig, RegistryConfig, ResourceLimits, RulesConfig,
};
pub use definition::{DefinitionCheck, DefinitionViolation};
pub use naming::{NamingCheck, NamingViolation, check_naming_convention};
pub use record::{ConfigRecord, PartialConfig};
pub use registry::{
    DagRegistry, PythonDagBag, RegisteredDag, RegistryEnvironment, RegistryError,
    RegistryFallback, RegistrySnapshot,
};
pub use reporter::{ReportFormat, ReportStyle, Reporter};
pub use resources::{ResourceCheck, ResourceViolation, evaluate_limits};
pub use runner::{AggregateReport, BatchRunner};
pub use scan::discover_dag_files;
pub use violation_trait::{Violation, ViolationCategory};

/// Result type for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Validation error types
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for ValidationError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Severity level for violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
        }
    }
}
