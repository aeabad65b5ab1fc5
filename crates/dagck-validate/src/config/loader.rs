//! Configuration loader
//!
//! Merges configuration sources with Figment; later sources override earlier:
//! 1. Default values from `DagckConfig::default()`
//! 2. TOML configuration file (`--config`, else `dagck.toml` in the project root)
//! 3. Environment variables with prefix (e.g., `DAGCK_RULES__LIMITS__MAX_ALLOWED_ACTIVE_RUNS`)
//! 4. An explicit project root from the command line

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::DagckConfig;
use crate::{Result, ValidationError};

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "DAGCK";

/// Configuration file looked up in the project root
pub const DEFAULT_CONFIG_FILENAME: &str = "dagck.toml";

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    project_root: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            project_root: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    ///
    /// A missing explicit file is an error, unlike the default lookup.
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Pin the project root, overriding every other source
    pub fn with_project_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.project_root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<DagckConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(DagckConfig::default()));

        match &self.config_path {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "Configuration file loaded");
                figment = figment.merge(Toml::file(path));
            }
            Some(path) => {
                return Err(ValidationError::Config(format!(
                    "configuration file not found: {}",
                    path.display()
                )));
            }
            None => {
                let search_root = self.project_root.clone().unwrap_or_else(|| PathBuf::from("."));
                let default_path = search_root.join(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    debug!(path = %default_path.display(), "Configuration file loaded");
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        // Double underscore separates nested keys so field names keep theirs
        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        if let Some(root) = &self.project_root {
            figment = figment.merge(Serialized::default("project_root", root));
        }

        let mut config: DagckConfig = figment.extract()?;
        config.project_root = absolutize(&config.project_root)?;

        validate_config(&config)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let joined = std::env::current_dir()?.join(path);
    Ok(joined.canonicalize().unwrap_or(joined))
}

/// Validate configuration values
fn validate_config(config: &DagckConfig) -> Result<()> {
    let limits = &config.rules.limits;
    if limits.max_allowed_active_runs < limits.default_max_active_runs {
        return Err(ValidationError::Config(format!(
            "max_allowed_active_runs ({}) is below default_max_active_runs ({})",
            limits.max_allowed_active_runs, limits.default_max_active_runs
        )));
    }
    if limits.max_allowed_active_tasks < limits.default_max_active_tasks {
        return Err(ValidationError::Config(format!(
            "max_allowed_active_tasks ({}) is below default_max_active_tasks ({})",
            limits.max_allowed_active_tasks, limits.default_max_active_tasks
        )));
    }
    if config.rules.constructors.is_empty() {
        return Err(ValidationError::Config(
            "at least one DAG constructor name is required".to_string(),
        ));
    }
    if config.registry.enabled && config.registry.python.trim().is_empty() {
        return Err(ValidationError::Config(
            "registry.python cannot be empty when the registry is enabled".to_string(),
        ));
    }
    Ok(())
}
