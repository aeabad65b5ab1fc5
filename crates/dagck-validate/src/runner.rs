//! Batch runner: discover DAG files, check each one, aggregate verdicts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::Result;
use crate::check::{DagCheck, Verdict};
use crate::config::DagckConfig;
use crate::scan::{discover_dag_files, relative_key};

/// Findings of one run, keyed by path relative to the project root
///
/// Sparse: files with no errors and no warnings do not appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateReport {
    pub files_checked: usize,
    pub errors_by_file: BTreeMap<String, Vec<String>>,
    pub warnings_by_file: BTreeMap<String, Vec<String>>,
}

impl AggregateReport {
    /// True when no file carries an error
    pub fn passed(&self) -> bool {
        self.errors_by_file.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings_by_file.is_empty()
    }

    pub fn failed_files(&self) -> usize {
        self.errors_by_file.len()
    }

    /// Fold one file's verdict in, keeping only non-empty lists
    pub fn add(&mut self, key: String, verdict: Verdict) {
        self.files_checked += 1;
        if !verdict.warnings.is_empty() {
            self.warnings_by_file.insert(key.clone(), verdict.warnings);
        }
        if !verdict.errors.is_empty() {
            self.errors_by_file.insert(key, verdict.errors);
        }
    }
}

/// Drives one check over a directory or an explicit file list
pub struct BatchRunner<'a> {
    config: &'a DagckConfig,
    check: &'a dyn DagCheck,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a DagckConfig, check: &'a dyn DagCheck) -> Self {
        Self { config, check }
    }

    /// Check every DAG candidate under `dags_dir`
    pub fn run_directory(&self, dags_dir: &Path) -> Result<AggregateReport> {
        if !dags_dir.is_dir() {
            warn!(dir = %dags_dir.display(), "DAG directory does not exist");
        }
        self.run_files(&discover_dag_files(dags_dir))
    }

    /// Check exactly these files; relative paths resolve against the project root
    pub fn run_paths(&self, paths: &[PathBuf]) -> Result<AggregateReport> {
        let files: Vec<PathBuf> = paths.iter().map(|path| self.config.resolve(path)).collect();
        self.run_files(&files)
    }

    fn run_files(&self, files: &[PathBuf]) -> Result<AggregateReport> {
        let mut report = AggregateReport::default();

        for dag_file in files {
            debug!(check = self.check.name(), file = %dag_file.display(), "Checking file");
            let verdict = self.check.check_file(dag_file)?;
            report.add(relative_key(dag_file, &self.config.project_root), verdict);
        }

        info!(
            check = self.check.name(),
            files = report.files_checked,
            failed = report.failed_files(),
            warned = report.warnings_by_file.len(),
            "Check finished"
        );
        Ok(report)
    }
}
