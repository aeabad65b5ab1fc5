//! Registry Module
//!
//! Access to the orchestration framework's DAG registry (Airflow `DagBag`).
//! The registry is an external collaborator behind [`DagRegistry`]; the
//! production implementation runs a Python probe in a subprocess.
//!
//! Registry entries and import errors are tied to a file by equality of
//! normalised paths, never by substring containment.

mod dagbag;
mod environment;

pub use dagbag::{PROBE_MARKER, PythonDagBag};
pub use environment::RegistryEnvironment;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ast::literals::float_limit;
use crate::record::PartialConfig;
use crate::scan::{dag_folder, same_source};

/// Registry load failures
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry is disabled in configuration")]
    Disabled,

    #[error("cannot start registry interpreter '{python}': {source}")]
    Unavailable {
        python: String,
        #[source]
        source: std::io::Error,
    },

    #[error("registry load failed (exit status {status:?}): {stderr}")]
    LoadFailed { status: Option<i32>, stderr: String },

    #[error("malformed registry output: {0}")]
    MalformedOutput(String),
}

/// One DAG as recorded by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredDag {
    pub dag_id: String,
    /// Source file the registry loaded the DAG from
    #[serde(default)]
    pub fileloc: Option<PathBuf>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    pub max_active_runs: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_limit")]
    pub max_active_tasks: Option<i64>,
}

/// Any JSON number is a limit: large integers saturate, floats round up
fn deserialize_limit<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(number.and_then(|number| {
        number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .or_else(|| number.as_f64().and_then(float_limit))
    }))
}

/// Result of loading one folder through the registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub dags: Vec<RegisteredDag>,
    /// Import error text keyed by the failing file's path
    #[serde(default)]
    pub import_errors: BTreeMap<PathBuf, String>,
}

impl RegistrySnapshot {
    /// DAGs registered from `dag_file`, in registry order
    pub fn dags_for<'a>(&'a self, dag_file: &'a Path) -> impl Iterator<Item = &'a RegisteredDag> + 'a {
        self.dags.iter().filter(move |dag| {
            dag.fileloc
                .as_deref()
                .is_some_and(|fileloc| same_source(fileloc, dag_file))
        })
    }

    /// Import errors recorded against `dag_file`
    pub fn import_errors_for<'a>(&'a self, dag_file: &'a Path) -> impl Iterator<Item = &'a str> + 'a {
        self.import_errors
            .iter()
            .filter(move |(path, _)| same_source(path, dag_file))
            .map(|(_, error)| error.as_str())
    }
}

/// Loads a folder into a snapshot of registered DAGs and import errors
pub trait DagRegistry {
    fn load(&self, dag_folder: &Path) -> std::result::Result<RegistrySnapshot, RegistryError>;
}

/// Registry lookups that degrade to "nothing known" on any failure
///
/// Used by the naming and resource checks; the definition check calls the
/// registry directly so load failures abort the run.
pub struct RegistryFallback<'a> {
    registry: &'a dyn DagRegistry,
}

impl<'a> RegistryFallback<'a> {
    pub fn new(registry: &'a dyn DagRegistry) -> Self {
        Self { registry }
    }

    /// Registry-derived fields for `dag_file`, loading its parent folder
    pub fn lookup(&self, dag_file: &Path) -> PartialConfig {
        let folder = dag_folder(dag_file);
        match self.registry.load(&folder) {
            Ok(snapshot) => PartialConfig::from_registry(snapshot.dags_for(dag_file)),
            Err(RegistryError::Disabled) => PartialConfig::default(),
            Err(err) => {
                warn!(
                    file = %dag_file.display(),
                    error = %err,
                    "Registry unavailable, using static configuration only"
                );
                PartialConfig::default()
            }
        }
    }

    /// Merge static fields with registry fields; static always wins
    pub fn complete(&self, dag_file: &Path, static_config: PartialConfig) -> PartialConfig {
        if static_config.is_complete() {
            debug!(file = %dag_file.display(), "Static configuration complete, skipping registry");
            return static_config;
        }
        static_config.merge(self.lookup(dag_file))
    }
}
