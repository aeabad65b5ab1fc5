//! Configuration Module
//!
//! Layered configuration for the DAG checks: built-in defaults, an optional
//! `dagck.toml`, then `DAGCK_*` environment variables.

mod loader;
mod types;

pub use loader::{CONFIG_ENV_PREFIX, ConfigLoader, DEFAULT_CONFIG_FILENAME};
pub use types::{DagckConfig, LoggingConfig, RegistryConfig, ResourceLimits, RulesConfig};
