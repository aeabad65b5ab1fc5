//! Resource Limit Validation
//!
//! Each limit is judged independently against its recommended default and
//! its hard ceiling. Above the ceiling is an error; unset or above the
//! recommendation is a warning.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::SourceExtractor;
use crate::check::{DagCheck, Verdict};
use crate::config::{ResourceLimits, RulesConfig};
use crate::record::{ConfigRecord, PartialConfig};
use crate::registry::{DagRegistry, RegistryFallback};
use crate::reporter::ReportStyle;
use crate::violation_trait::{Violation, ViolationCategory};
use crate::{Result, Severity};

/// DAG argument a limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitField {
    MaxActiveRuns,
    MaxActiveTasks,
}

impl fmt::Display for LimitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxActiveRuns => write!(f, "max_active_runs"),
            Self::MaxActiveTasks => write!(f, "max_active_tasks"),
        }
    }
}

impl LimitField {
    pub fn recommended(self, limits: &ResourceLimits) -> i64 {
        match self {
            Self::MaxActiveRuns => limits.default_max_active_runs,
            Self::MaxActiveTasks => limits.default_max_active_tasks,
        }
    }

    pub fn ceiling(self, limits: &ResourceLimits) -> i64 {
        match self {
            Self::MaxActiveRuns => limits.max_allowed_active_runs,
            Self::MaxActiveTasks => limits.max_allowed_active_tasks,
        }
    }
}

/// Resource violation types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceViolation {
    /// Limit not declared anywhere
    Unset {
        dag_id: String,
        field: LimitField,
        recommended: i64,
    },
    /// Limit above the hard ceiling
    ExceedsCeiling {
        dag_id: String,
        field: LimitField,
        value: i64,
        ceiling: i64,
    },
    /// Limit within the ceiling but above the recommendation
    AboveRecommended {
        dag_id: String,
        field: LimitField,
        value: i64,
        recommended: i64,
    },
}

impl fmt::Display for ResourceViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset {
                dag_id,
                field,
                recommended,
            } => write!(f, "{dag_id}: {field} not set (recommended: {recommended})"),
            Self::ExceedsCeiling {
                dag_id,
                field,
                value,
                ceiling,
            } => write!(
                f,
                "{dag_id}: {field}={value} exceeds maximum allowed ({ceiling})"
            ),
            Self::AboveRecommended {
                dag_id,
                field,
                value,
                recommended,
            } => write!(
                f,
                "{dag_id}: {field}={value} is higher than recommended ({recommended})"
            ),
        }
    }
}

impl Violation for ResourceViolation {
    fn id(&self) -> &str {
        match self {
            Self::Unset { .. } => "RES001",
            Self::ExceedsCeiling { .. } => "RES002",
            Self::AboveRecommended { .. } => "RES003",
        }
    }

    fn category(&self) -> ViolationCategory {
        ViolationCategory::Resources
    }

    fn severity(&self) -> Severity {
        match self {
            Self::ExceedsCeiling { .. } => Severity::Error,
            Self::Unset { .. } | Self::AboveRecommended { .. } => Severity::Warning,
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::Unset {
                field, recommended, ..
            }
            | Self::AboveRecommended {
                field, recommended, ..
            } => Some(format!("Set {field}={recommended}")),
            Self::ExceedsCeiling { field, ceiling, .. } => {
                Some(format!("Lower {field} to at most {ceiling}"))
            }
        }
    }
}

/// Judge one limit value
pub fn evaluate_limit(
    dag_id: &str,
    field: LimitField,
    value: Option<i64>,
    limits: &ResourceLimits,
) -> Option<ResourceViolation> {
    let recommended = field.recommended(limits);
    let ceiling = field.ceiling(limits);

    match value {
        None => Some(ResourceViolation::Unset {
            dag_id: dag_id.to_string(),
            field,
            recommended,
        }),
        Some(value) if value > ceiling => Some(ResourceViolation::ExceedsCeiling {
            dag_id: dag_id.to_string(),
            field,
            value,
            ceiling,
        }),
        Some(value) if value > recommended => Some(ResourceViolation::AboveRecommended {
            dag_id: dag_id.to_string(),
            field,
            value,
            recommended,
        }),
        Some(_) => None,
    }
}

/// Judge both limits of a record; runs first, then tasks
pub fn evaluate_limits(record: &ConfigRecord, limits: &ResourceLimits) -> Vec<ResourceViolation> {
    let dag_id = record.display_name();
    [
        (LimitField::MaxActiveRuns, record.max_active_runs),
        (LimitField::MaxActiveTasks, record.max_active_tasks),
    ]
    .into_iter()
    .filter_map(|(field, value)| evaluate_limit(&dag_id, field, value, limits))
    .collect()
}

/// Resource limit check with registry fallback for undeclared limits
pub struct ResourceCheck<'a> {
    limits: ResourceLimits,
    extractor: SourceExtractor,
    fallback: RegistryFallback<'a>,
}

impl<'a> ResourceCheck<'a> {
    pub fn new(rules: &RulesConfig, registry: &'a dyn DagRegistry) -> Self {
        Self {
            limits: rules.limits,
            extractor: SourceExtractor::new(rules.constructors.iter().cloned()),
            fallback: RegistryFallback::new(registry),
        }
    }

    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Static configuration completed from the registry
    pub fn build_record(&self, dag_file: &Path) -> ConfigRecord {
        let static_config = PartialConfig::from_calls(&self.extractor.extract_file(dag_file));
        ConfigRecord::new(dag_file, self.fallback.complete(dag_file, static_config))
    }
}

impl DagCheck for ResourceCheck<'_> {
    fn name(&self) -> &'static str {
        "resources"
    }

    fn style(&self) -> ReportStyle {
        ReportStyle::resources(&self.limits)
    }

    fn check_file(&self, dag_file: &Path) -> Result<Verdict> {
        let record = self.build_record(dag_file);
        debug!(
            file = %dag_file.display(),
            dag_id = ?record.identifier,
            max_active_runs = ?record.max_active_runs,
            max_active_tasks = ?record.max_active_tasks,
            "Checking DAG resources"
        );

        let mut verdict = Verdict::new();
        for violation in evaluate_limits(&record, &self.limits) {
            verdict.record(&violation);
        }
        Ok(verdict)
    }
}
