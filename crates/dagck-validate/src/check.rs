//! Per-file verdicts and the trait every DAG check implements.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::reporter::ReportStyle;
use crate::violation_trait::Violation;

/// Outcome of checking one DAG file
///
/// Valid iff `errors` is empty; warnings never affect validity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Verdict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verdict holding a single fatal finding
    pub fn failed(violation: &dyn Violation) -> Self {
        let mut verdict = Self::new();
        verdict.record(violation);
        verdict
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Route a finding into errors or warnings by its severity
    pub fn record(&mut self, violation: &dyn Violation) {
        debug!(
            id = violation.id(),
            category = %violation.category(),
            severity = %violation.severity(),
            suggestion = violation.suggestion().as_deref().unwrap_or(""),
            "{violation}"
        );
        if violation.is_error() {
            self.errors.push(violation.message());
        } else {
            self.warnings.push(violation.message());
        }
    }
}

/// A single-file check driven by the batch runner
pub trait DagCheck {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Headings and hints the reporter prints for this check
    fn style(&self) -> ReportStyle;

    /// Run the full pipeline (extract, fall back, evaluate) for one file
    ///
    /// An `Err` aborts the whole batch; checks that must keep going on
    /// per-file failures fold them into the verdict instead.
    fn check_file(&self, dag_file: &Path) -> Result<Verdict>;
}
