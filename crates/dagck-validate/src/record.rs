//! Per-file configuration records and the two-source merge
//!
//! A `PartialConfig` comes from exactly one source (static parse or
//! registry). `PartialConfig::merge` reconciles them: a field the primary
//! source supplied is never overwritten by the fallback.

use std::path::{Path, PathBuf};

use crate::ast::DagCall;
use crate::registry::RegisteredDag;

/// Separator between tenant prefix and DAG name
pub const TENANT_SEPARATOR: char = '_';

/// Configuration fields from a single source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialConfig {
    /// Identifier naming the record
    pub identifier: Option<String>,
    /// Every identifier seen, in discovery order; registry ids only when new
    pub dag_ids: Vec<String>,
    pub max_active_runs: Option<i64>,
    pub max_active_tasks: Option<i64>,
}

impl PartialConfig {
    /// Static source: the last literal value of each field wins
    pub fn from_calls(calls: &[DagCall]) -> Self {
        let mut partial = Self::default();
        for call in calls {
            if let Some(dag_id) = &call.dag_id {
                // every literal is checked, repeats included
                partial.dag_ids.push(dag_id.clone());
                if !dag_id.is_empty() {
                    partial.identifier = Some(dag_id.clone());
                }
            }
            if call.max_active_runs.is_some() {
                partial.max_active_runs = call.max_active_runs;
            }
            if call.max_active_tasks.is_some() {
                partial.max_active_tasks = call.max_active_tasks;
            }
        }
        partial
    }

    /// Registry source: the first registered value of each field wins
    pub fn from_registry<'a, I>(dags: I) -> Self
    where
        I: IntoIterator<Item = &'a RegisteredDag>,
    {
        let mut partial = Self::default();
        for dag in dags {
            partial.push_id(&dag.dag_id);
            if partial.identifier.is_none() {
                partial.identifier = Some(dag.dag_id.clone());
            }
            partial.max_active_runs = partial.max_active_runs.or(dag.max_active_runs);
            partial.max_active_tasks = partial.max_active_tasks.or(dag.max_active_tasks);
        }
        partial
    }

    /// Fill fields left unset from `fallback`; present fields are kept
    #[must_use]
    pub fn merge(mut self, fallback: PartialConfig) -> Self {
        for dag_id in &fallback.dag_ids {
            self.push_id(dag_id);
        }
        self.identifier = self.identifier.or(fallback.identifier);
        self.max_active_runs = self.max_active_runs.or(fallback.max_active_runs);
        self.max_active_tasks = self.max_active_tasks.or(fallback.max_active_tasks);
        self
    }

    /// True when every field the resource check needs is known
    pub fn is_complete(&self) -> bool {
        self.identifier.is_some() && self.max_active_runs.is_some() && self.max_active_tasks.is_some()
    }

    fn push_id(&mut self, dag_id: &str) {
        if !self.dag_ids.iter().any(|known| known == dag_id) {
            self.dag_ids.push(dag_id.to_string());
        }
    }
}

/// Merged configuration for one DAG file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    pub identifier: Option<String>,
    pub dag_ids: Vec<String>,
    pub max_active_runs: Option<i64>,
    pub max_active_tasks: Option<i64>,
    pub source_path: PathBuf,
}

impl ConfigRecord {
    pub fn new(source_path: &Path, config: PartialConfig) -> Self {
        Self {
            identifier: config.identifier,
            dag_ids: config.dag_ids,
            max_active_runs: config.max_active_runs,
            max_active_tasks: config.max_active_tasks,
            source_path: source_path.to_path_buf(),
        }
    }

    /// Tenant prefix of the identifier (text before the first separator)
    pub fn tenant(&self) -> Option<&str> {
        self.identifier
            .as_deref()
            .and_then(|id| id.split_once(TENANT_SEPARATOR))
            .map(|(tenant, _)| tenant)
    }

    /// DAG name of the identifier (text after the first separator)
    pub fn name(&self) -> Option<&str> {
        self.identifier
            .as_deref()
            .and_then(|id| id.split_once(TENANT_SEPARATOR))
            .map(|(_, name)| name)
    }

    /// Identifier for messages, falling back to the file stem
    pub fn display_name(&self) -> String {
        match self.identifier.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => self
                .source_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}
