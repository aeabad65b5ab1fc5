//! Airflow `DagBag` registry reached through a Python subprocess

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{DagRegistry, RegistryEnvironment, RegistryError, RegistrySnapshot};
use crate::config::DagckConfig;

/// Prefix of the single stdout line carrying the registry document
pub const PROBE_MARKER: &str = "DAGCK_REGISTRY:";

/// Loads the folder in argv[1] and prints one marked JSON document
const PROBE_SCRIPT: &str = r#"
import json
import math
import sys

from airflow.models import DagBag

_I64_MAX = 2**63 - 1


def _int(value):
    if isinstance(value, bool) or not isinstance(value, (int, float)):
        return None
    if isinstance(value, float):
        if math.isnan(value):
            return None
        if math.isinf(value):
            return _I64_MAX if value > 0 else -_I64_MAX - 1
        value = math.ceil(value)
    return max(-_I64_MAX - 1, min(_I64_MAX, value))


bag = DagBag(dag_folder=sys.argv[1], include_examples=False)
document = {
    "dags": [
        {
            "dag_id": dag_id,
            "fileloc": getattr(dag, "fileloc", None),
            "max_active_runs": _int(getattr(dag, "max_active_runs", None)),
            "max_active_tasks": _int(getattr(dag, "max_active_tasks", None)),
        }
        for dag_id, dag in bag.dags.items()
    ],
    "import_errors": {str(path): str(error) for path, error in bag.import_errors.items()},
}
print("DAGCK_REGISTRY:" + json.dumps(document))
"#;

/// Lines of interpreter stderr kept in `LoadFailed`
const STDERR_TAIL_LINES: usize = 20;

/// Production registry: `python -c <probe> <folder>`
#[derive(Debug, Clone)]
pub struct PythonDagBag {
    enabled: bool,
    python: String,
    project_root: PathBuf,
    python_paths: Vec<PathBuf>,
    environment: RegistryEnvironment,
}

impl PythonDagBag {
    pub fn new(config: &DagckConfig) -> Self {
        let root = &config.project_root;
        let mut python_paths = vec![root.clone(), root.join("plugins")];
        python_paths.extend(
            config
                .registry
                .extra_python_paths
                .iter()
                .map(|path| config.resolve(path)),
        );

        Self {
            enabled: config.registry.enabled,
            python: config.registry.python.clone(),
            project_root: root.clone(),
            python_paths,
            environment: RegistryEnvironment::from_config(config),
        }
    }

    fn command(&self, dag_folder: &Path) -> Command {
        let mut command = Command::new(&self.python);
        command
            .arg("-c")
            .arg(PROBE_SCRIPT)
            .arg(dag_folder)
            .current_dir(&self.project_root)
            .envs(self.environment.resolve_from_process())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(python_path) = self.python_path() {
            command.env("PYTHONPATH", python_path);
        }
        command
    }

    fn python_path(&self) -> Option<OsString> {
        let inherited = std::env::var_os("PYTHONPATH");
        let inherited_paths = inherited
            .as_deref()
            .map(|paths| std::env::split_paths(paths).collect::<Vec<_>>())
            .unwrap_or_default();

        std::env::join_paths(self.python_paths.iter().cloned().chain(inherited_paths)).ok()
    }
}

impl DagRegistry for PythonDagBag {
    fn load(&self, dag_folder: &Path) -> Result<RegistrySnapshot, RegistryError> {
        if !self.enabled {
            return Err(RegistryError::Disabled);
        }

        debug!(folder = %dag_folder.display(), python = %self.python, "Loading DagBag");
        let output = self
            .command(dag_folder)
            .output()
            .map_err(|source| RegistryError::Unavailable {
                python: self.python.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RegistryError::LoadFailed {
                status: output.status.code(),
                stderr: stderr_tail(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Extract the marked registry document from probe stdout
///
/// Airflow may log to stdout while loading, so only the last marked line counts.
pub fn parse_probe_output(stdout: &str) -> Result<RegistrySnapshot, RegistryError> {
    let document = stdout
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(PROBE_MARKER))
        .ok_or_else(|| {
            RegistryError::MalformedOutput("no registry document in probe output".to_string())
        })?;

    serde_json::from_str(document).map_err(|e| RegistryError::MalformedOutput(e.to_string()))
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
