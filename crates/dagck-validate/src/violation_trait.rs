//! Violation Trait
//!
//! Generic trait for every finding a DAG check can produce. Verdicts route
//! findings into errors or warnings purely by severity.

use serde::Serialize;
use std::fmt::Display;

pub use super::Severity;

/// Category of violation for grouping in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationCategory {
    /// Identifier format and tenant prefix
    Naming,
    /// Concurrency limits declared on the DAG
    Resources,
    /// Import failures and missing DAG definitions
    Definition,
}

impl Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Naming => write!(f, "Naming"),
            Self::Resources => write!(f, "Resources"),
            Self::Definition => write!(f, "Definition"),
        }
    }
}

/// Generic violation trait - all violations implement this
///
/// `Display` renders the exact line printed under the file in reports.
pub trait Violation: Display + Send + Sync {
    /// Unique violation ID (e.g., "NAME002", "RES003")
    fn id(&self) -> &str;

    /// Category for grouping in reports
    fn category(&self) -> ViolationCategory;

    /// Severity level
    fn severity(&self) -> Severity;

    /// Human-readable message describing the violation
    fn message(&self) -> String {
        self.to_string()
    }

    /// Suggested fix for the violation (if applicable)
    fn suggestion(&self) -> Option<String> {
        None
    }

    fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}
