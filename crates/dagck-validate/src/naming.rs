//! Naming Convention Validation
//!
//! DAG IDs must follow `{tenant}_{name}`:
//! - split at the first `_`
//! - tenant: lowercase letters, digits, hyphens
//! - name: lowercase letters, digits, underscores
//! - tenant outside the known list: warning only

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::SourceExtractor;
use crate::check::{DagCheck, Verdict};
use crate::config::RulesConfig;
use crate::record::{PartialConfig, TENANT_SEPARATOR};
use crate::registry::{DagRegistry, RegistryFallback};
use crate::reporter::ReportStyle;
use crate::violation_trait::{Violation, ViolationCategory};
use crate::{Result, Severity};

static TENANT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("Invalid regex"));

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").expect("Invalid regex"));

/// Naming violation types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NamingViolation {
    /// Identifier is the empty string
    EmptyIdentifier,
    /// No `_` separator at all
    MissingSeparator { dag_id: String },
    /// Nothing before the first separator
    EmptyTenant { dag_id: String },
    /// Nothing after the first separator
    EmptyName { dag_id: String },
    /// Tenant has characters outside `[a-z0-9-]`
    InvalidTenantFormat { dag_id: String },
    /// Name has characters outside `[a-z0-9_]`
    InvalidNameFormat { dag_id: String },
    /// Well-formed, but the tenant is not in the known list
    UnknownTenant { dag_id: String, tenant: String },
    /// No identifier could be found for the file
    NoIdentifier,
}

impl std::fmt::Display for NamingViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "DAG ID is empty"),
            Self::MissingSeparator { dag_id } => write!(
                f,
                "{dag_id}: DAG ID '{dag_id}' must follow format: {{tenant}}_{{name}}"
            ),
            Self::EmptyTenant { dag_id } => {
                write!(f, "{dag_id}: DAG ID '{dag_id}' has empty tenant prefix")
            }
            Self::EmptyName { dag_id } => write!(
                f,
                "{dag_id}: DAG ID '{dag_id}' has empty name after tenant prefix"
            ),
            Self::InvalidTenantFormat { dag_id } => write!(
                f,
                "{dag_id}: DAG ID '{dag_id}' has invalid tenant format (use lowercase, alphanumeric, hyphens)"
            ),
            Self::InvalidNameFormat { dag_id } => write!(
                f,
                "{dag_id}: DAG ID '{dag_id}' has invalid name format (use lowercase, alphanumeric, underscores)"
            ),
            Self::UnknownTenant { dag_id, tenant } => write!(
                f,
                "{dag_id}: Warning: Unknown tenant '{tenant}' (DAG ID is valid but tenant not in known list)"
            ),
            Self::NoIdentifier => write!(f, "No DAG ID found in file"),
        }
    }
}

impl Violation for NamingViolation {
    fn id(&self) -> &str {
        match self {
            Self::EmptyIdentifier => "NAME001",
            Self::MissingSeparator { .. } => "NAME002",
            Self::EmptyTenant { .. } => "NAME003",
            Self::EmptyName { .. } => "NAME004",
            Self::InvalidTenantFormat { .. } => "NAME005",
            Self::InvalidNameFormat { .. } => "NAME006",
            Self::UnknownTenant { .. } => "NAME007",
            Self::NoIdentifier => "NAME008",
        }
    }

    fn category(&self) -> ViolationCategory {
        ViolationCategory::Naming
    }

    fn severity(&self) -> Severity {
        match self {
            Self::UnknownTenant { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnknownTenant { tenant, .. } => {
                Some(format!("Add '{tenant}' to rules.known_tenants if it is a real team"))
            }
            Self::NoIdentifier => Some("Pass a literal dag_id to the DAG constructor".to_string()),
            _ => Some("Use {tenant}_{name}, e.g. data-engineering_daily_etl".to_string()),
        }
    }
}

/// Check a single identifier against the naming convention
///
/// `None` means valid with nothing to report. An `UnknownTenant` result is
/// still a valid identifier. Total over every input string.
pub fn check_naming_convention(dag_id: &str, rules: &RulesConfig) -> Option<NamingViolation> {
    if dag_id.is_empty() {
        return Some(NamingViolation::EmptyIdentifier);
    }

    let owned = || dag_id.to_string();
    let Some((tenant, name)) = dag_id.split_once(TENANT_SEPARATOR) else {
        return Some(NamingViolation::MissingSeparator { dag_id: owned() });
    };

    if tenant.is_empty() {
        return Some(NamingViolation::EmptyTenant { dag_id: owned() });
    }
    if name.is_empty() {
        return Some(NamingViolation::EmptyName { dag_id: owned() });
    }
    if !TENANT_PATTERN.is_match(tenant) {
        return Some(NamingViolation::InvalidTenantFormat { dag_id: owned() });
    }
    if !NAME_PATTERN.is_match(name) {
        return Some(NamingViolation::InvalidNameFormat { dag_id: owned() });
    }
    if !rules.is_known_tenant(tenant) {
        return Some(NamingViolation::UnknownTenant {
            dag_id: owned(),
            tenant: tenant.to_string(),
        });
    }

    None
}

/// Naming convention check over static ids plus registry ids
pub struct NamingCheck<'a> {
    rules: &'a RulesConfig,
    extractor: SourceExtractor,
    fallback: RegistryFallback<'a>,
}

impl<'a> NamingCheck<'a> {
    pub fn new(rules: &'a RulesConfig, registry: &'a dyn DagRegistry) -> Self {
        Self {
            rules,
            extractor: SourceExtractor::new(rules.constructors.iter().cloned()),
            fallback: RegistryFallback::new(registry),
        }
    }

    /// All identifiers for the file: static literals first, then registry-only ids
    pub fn collect_dag_ids(&self, dag_file: &Path) -> Vec<String> {
        let static_config = PartialConfig::from_calls(&self.extractor.extract_file(dag_file));
        static_config.merge(self.fallback.lookup(dag_file)).dag_ids
    }
}

impl DagCheck for NamingCheck<'_> {
    fn name(&self) -> &'static str {
        "naming"
    }

    fn style(&self) -> ReportStyle {
        ReportStyle::naming()
    }

    fn check_file(&self, dag_file: &Path) -> Result<Verdict> {
        let dag_ids = self.collect_dag_ids(dag_file);
        debug!(file = %dag_file.display(), ids = ?dag_ids, "Checking DAG naming");

        let mut verdict = Verdict::new();
        for dag_id in &dag_ids {
            if let Some(violation) = check_naming_convention(dag_id, self.rules) {
                verdict.record(&violation);
            }
        }
        if dag_ids.is_empty() {
            verdict.record(&NamingViolation::NoIdentifier);
        }

        Ok(verdict)
    }
}
