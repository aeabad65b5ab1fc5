//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tenants accepted without a warning
const DEFAULT_KNOWN_TENANTS: &[&str] = &[
    "data-engineering",
    "analytics",
    "ml-team",
    "data-science",
    "platform",
    "devops",
];

/// Top-level configuration shared by all three checkers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DagckConfig {
    /// Root that report paths are relative to and relative CLI paths resolve against
    pub project_root: PathBuf,

    /// DAG folder scanned when no paths are given (relative to `project_root`)
    pub dags_dir: PathBuf,

    pub rules: RulesConfig,
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

impl Default for DagckConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            dags_dir: PathBuf::from("dags"),
            rules: RulesConfig::default(),
            registry: RegistryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl DagckConfig {
    /// Configuration rooted at `project_root`, everything else defaulted
    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Absolute location of the default DAG folder
    pub fn dags_path(&self) -> PathBuf {
        self.resolve(&self.dags_dir)
    }

    /// Resolve a user-supplied path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Rule parameters for the naming and resource checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Tenant prefixes that do not raise an "unknown tenant" warning
    pub known_tenants: Vec<String>,

    /// Call names recognised as DAG constructors by the static extractor
    pub constructors: Vec<String>,

    pub limits: ResourceLimits,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            known_tenants: DEFAULT_KNOWN_TENANTS
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
            constructors: vec!["DAG".to_string()],
            limits: ResourceLimits::default(),
        }
    }
}

impl RulesConfig {
    pub fn is_known_tenant(&self, tenant: &str) -> bool {
        self.known_tenants.iter().any(|t| t == tenant)
    }
}

/// Recommended values and hard ceilings for DAG concurrency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLimits {
    pub default_max_active_runs: i64,
    pub default_max_active_tasks: i64,
    pub max_allowed_active_runs: i64,
    pub max_allowed_active_tasks: i64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            default_max_active_runs: 1,
            default_max_active_tasks: 3,
            max_allowed_active_runs: 5,
            max_allowed_active_tasks: 10,
        }
    }
}

/// How the Airflow `DagBag` registry is reached
///
/// Every Airflow knob is applied to the registry process only when the
/// caller's environment does not already set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Disable to run the naming and resource checks on static data only
    pub enabled: bool,

    /// Python interpreter that has Airflow installed
    pub python: String,

    /// `AIRFLOW_HOME`; the project root when unset
    pub airflow_home: Option<PathBuf>,

    /// `AIRFLOW__CORE__EXECUTOR`
    pub executor: String,

    /// `AIRFLOW__DATABASE__SQL_ALCHEMY_CONN`, a throwaway metadata store
    pub sql_alchemy_conn: String,

    /// `AIRFLOW__CORE__LOAD_EXAMPLES`
    pub load_examples: bool,

    /// Prepended to `PYTHONPATH` after the project root and its `plugins/`
    pub extra_python_paths: Vec<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            python: "python3".to_string(),
            airflow_home: None,
            executor: "SequentialExecutor".to_string(),
            sql_alchemy_conn: "sqlite:////tmp/dagck_airflow.db".to_string(),
            load_examples: false,
            extra_python_paths: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
        }
    }
}
