//! DAG Definition Validation
//!
//! A file is valid when it exists, imports without error and registers at
//! least one DAG. Registry load failures are not suppressed here: they
//! abort the whole run, unlike the naming and resource checks.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::check::{DagCheck, Verdict};
use crate::registry::DagRegistry;
use crate::reporter::ReportStyle;
use crate::scan::dag_folder;
use crate::violation_trait::{Violation, ViolationCategory};
use crate::{Result, Severity};

/// Definition violation types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefinitionViolation {
    /// Path does not exist
    FileNotFound { path: PathBuf },
    /// Registry recorded an import error for the file
    ImportError { file_name: String, error: String },
    /// File imported cleanly but registered no DAG
    NoDefinition { file_name: String },
}

impl fmt::Display for DefinitionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound { path } => write!(f, "DAG file not found: {}", path.display()),
            Self::ImportError { file_name, error } => {
                write!(f, "Import error in {file_name}: {error}")
            }
            Self::NoDefinition { file_name } => {
                write!(f, "DAG not found in {file_name} - check for DAG definition")
            }
        }
    }
}

impl Violation for DefinitionViolation {
    fn id(&self) -> &str {
        match self {
            Self::FileNotFound { .. } => "DEF001",
            Self::ImportError { .. } => "DEF002",
            Self::NoDefinition { .. } => "DEF003",
        }
    }

    fn category(&self) -> ViolationCategory {
        ViolationCategory::Definition
    }

    fn severity(&self) -> Severity {
        Severity::Error
    }
}

/// Definition validity check straight against the registry
pub struct DefinitionCheck<'a> {
    registry: &'a dyn DagRegistry,
}

impl<'a> DefinitionCheck<'a> {
    pub fn new(registry: &'a dyn DagRegistry) -> Self {
        Self { registry }
    }
}

impl DagCheck for DefinitionCheck<'_> {
    fn name(&self) -> &'static str {
        "definition"
    }

    fn style(&self) -> ReportStyle {
        ReportStyle::definition()
    }

    fn check_file(&self, dag_file: &Path) -> Result<Verdict> {
        if !dag_file.exists() {
            return Ok(Verdict::failed(&DefinitionViolation::FileNotFound {
                path: dag_file.to_path_buf(),
            }));
        }

        let file_name = dag_file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let snapshot = self.registry.load(&dag_folder(dag_file))?;

        let mut verdict = Verdict::new();
        for error in snapshot.import_errors_for(dag_file) {
            verdict.record(&DefinitionViolation::ImportError {
                file_name: file_name.clone(),
                error: error.to_string(),
            });
        }

        let registered = snapshot.dags_for(dag_file).next().is_some();
        debug!(file = %dag_file.display(), registered, "Checked DAG definition");

        if !registered && verdict.is_valid() {
            verdict.record(&DefinitionViolation::NoDefinition { file_name });
        }

        Ok(verdict)
    }
}
