//! Airflow bootstrap environment for the registry process

use crate::config::DagckConfig;

pub const AIRFLOW_HOME: &str = "AIRFLOW_HOME";
pub const AIRFLOW_EXECUTOR: &str = "AIRFLOW__CORE__EXECUTOR";
pub const AIRFLOW_SQL_ALCHEMY_CONN: &str = "AIRFLOW__DATABASE__SQL_ALCHEMY_CONN";
pub const AIRFLOW_LOAD_EXAMPLES: &str = "AIRFLOW__CORE__LOAD_EXAMPLES";

/// Default values for the Airflow knobs the registry needs
///
/// A default only reaches the registry process when the caller's own
/// environment leaves that variable unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEnvironment {
    defaults: Vec<(&'static str, String)>,
}

impl RegistryEnvironment {
    pub fn from_config(config: &DagckConfig) -> Self {
        let registry = &config.registry;
        let home = registry
            .airflow_home
            .as_deref()
            .map_or_else(|| config.project_root.clone(), |home| config.resolve(home));

        Self {
            defaults: vec![
                (AIRFLOW_HOME, home.to_string_lossy().into_owned()),
                (AIRFLOW_EXECUTOR, registry.executor.clone()),
                (AIRFLOW_SQL_ALCHEMY_CONN, registry.sql_alchemy_conn.clone()),
                (AIRFLOW_LOAD_EXAMPLES, registry.load_examples.to_string()),
            ],
        }
    }

    /// Recognised variables with their configured defaults
    pub fn defaults(&self) -> &[(&'static str, String)] {
        &self.defaults
    }

    /// Variables to set, given a lookup into the caller's environment
    pub fn resolve<F>(&self, lookup: F) -> Vec<(&'static str, String)>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.defaults
            .iter()
            .filter(|(key, _)| lookup(key).is_none())
            .cloned()
            .collect()
    }

    /// Variables to set, given the current process environment
    pub fn resolve_from_process(&self) -> Vec<(&'static str, String)> {
        self.resolve(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }
}
