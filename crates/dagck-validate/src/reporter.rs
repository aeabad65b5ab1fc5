//! Validation Report Generation
//!
//! Generates reports in two formats:
//! - Human-readable for terminal output (warnings, errors, hints, banner)
//! - JSON for CI integration

use std::fmt::Write as _;
use std::str::FromStr;

use serde::Serialize;

use crate::Result;
use crate::config::ResourceLimits;
use crate::runner::AggregateReport;

/// Output format of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format '{other}' (use human or json)")),
        }
    }
}

/// Per-check wording of the human-readable report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportStyle {
    pub check: &'static str,
    pub warnings_heading: String,
    pub errors_heading: String,
    /// Remediation lines printed after the errors block
    pub hints: Vec<String>,
    pub success: String,
    pub success_with_warnings: String,
}

impl ReportStyle {
    pub fn naming() -> Self {
        Self {
            check: "naming",
            warnings_heading: "⚠️  Warnings:".to_string(),
            errors_heading: "❌ DAG naming convention violations:".to_string(),
            hints: vec![
                "DAG IDs must follow format: {tenant}_{name}".to_string(),
                "Example: data-engineering_daily_etl".to_string(),
            ],
            success: "✅ All DAGs follow naming convention".to_string(),
            success_with_warnings: "✅ All DAGs follow naming convention (with warnings)"
                .to_string(),
        }
    }

    pub fn resources(limits: &ResourceLimits) -> Self {
        Self {
            check: "resources",
            warnings_heading: "⚠️  Resource limit warnings:".to_string(),
            errors_heading: "❌ Resource limit violations:".to_string(),
            hints: vec![
                "Recommended limits:".to_string(),
                format!(
                    "  - max_active_runs: {} (max: {})",
                    limits.default_max_active_runs, limits.max_allowed_active_runs
                ),
                format!(
                    "  - max_active_tasks: {} (max: {})",
                    limits.default_max_active_tasks, limits.max_allowed_active_tasks
                ),
            ],
            success: "✅ All DAGs have proper resource limits".to_string(),
            success_with_warnings: "✅ All DAGs have resource limits (with warnings)".to_string(),
        }
    }

    pub fn definition() -> Self {
        Self {
            check: "definition",
            warnings_heading: "⚠️  Warnings:".to_string(),
            errors_heading: "❌ DAG validation failed:".to_string(),
            hints: Vec::new(),
            success: "✅ All DAGs are valid".to_string(),
            success_with_warnings: "✅ All DAGs are valid (with warnings)".to_string(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    check: &'static str,
    passed: bool,
    #[serde(flatten)]
    report: &'a AggregateReport,
}

/// Report generator
pub struct Reporter;

impl Reporter {
    /// Render in the requested format
    pub fn render(report: &AggregateReport, style: &ReportStyle, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Human => Ok(Self::to_human_readable(report, style)),
            ReportFormat::Json => Self::to_json(report, style),
        }
    }

    /// Generate JSON report
    pub fn to_json(report: &AggregateReport, style: &ReportStyle) -> Result<String> {
        let document = JsonReport {
            check: style.check,
            passed: report.passed(),
            report,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Generate human-readable report
    ///
    /// Warnings first, then errors with remediation hints, then a one-line banner.
    pub fn to_human_readable(report: &AggregateReport, style: &ReportStyle) -> String {
        let mut output = String::new();

        if report.has_warnings() {
            push_block(&mut output, &style.warnings_heading, &report.warnings_by_file);
        }

        if !report.passed() {
            push_block(&mut output, &style.errors_heading, &report.errors_by_file);
            if !style.hints.is_empty() {
                for hint in &style.hints {
                    output.push_str(hint);
                    output.push('\n');
                }
                output.push('\n');
            }
            let _ = writeln!(
                output,
                "❌ {} of {} DAG file(s) failed the {} check",
                report.failed_files(),
                report.files_checked,
                style.check
            );
        } else if report.has_warnings() {
            output.push_str(&style.success_with_warnings);
            output.push('\n');
        } else {
            output.push_str(&style.success);
            output.push('\n');
        }

        output
    }

    /// Process exit status: 1 if any file carries an error
    pub fn exit_code(report: &AggregateReport) -> i32 {
        i32::from(!report.passed())
    }
}

fn push_block(
    output: &mut String,
    heading: &str,
    by_file: &std::collections::BTreeMap<String, Vec<String>>,
) {
    output.push_str(heading);
    output.push('\n');
    for (file, messages) in by_file {
        let _ = writeln!(output, "\n  {file}:");
        for message in messages {
            let _ = writeln!(output, "    - {message}");
        }
    }
    output.push('\n');
}
