//! Static DAG configuration extractor
//!
//! Finds every call to a recognised DAG constructor (`DAG(...)`, including
//! `with DAG(...) as dag:`) and reads the literal values of `dag_id`,
//! `max_active_runs` and `max_active_tasks` keyword arguments.

use std::path::Path;

use tracing::debug;
use tree_sitter::Node;

use super::PythonParser;
use super::literals::{integer_literal, string_literal};

/// Literal keyword values found on one constructor call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DagCall {
    pub dag_id: Option<String>,
    pub max_active_runs: Option<i64>,
    pub max_active_tasks: Option<i64>,
}

/// Pure, content-only extractor; never evaluates code
#[derive(Debug, Clone)]
pub struct SourceExtractor {
    constructors: Vec<String>,
}

impl SourceExtractor {
    pub fn new<I, S>(constructors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            constructors: constructors.into_iter().map(Into::into).collect(),
        }
    }

    /// Extract every constructor call in `content`
    ///
    /// Malformed sources yield nothing: callers must treat an empty result
    /// as "unknown", never as an error.
    pub fn extract(&self, content: &str) -> Vec<DagCall> {
        let Ok(mut parser) = PythonParser::new() else {
            return Vec::new();
        };
        let Ok(tree) = parser.parse(content, "<source>") else {
            return Vec::new();
        };

        let root = tree.root_node();
        if root.has_error() {
            return Vec::new();
        }

        let mut calls = Vec::new();
        self.collect_calls(root, content.as_bytes(), &mut calls);
        calls
    }

    /// Read and extract a file; unreadable files yield nothing
    pub fn extract_file(&self, path: &Path) -> Vec<DagCall> {
        match std::fs::read_to_string(path) {
            Ok(content) => self.extract(&content),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Skipping static extraction");
                Vec::new()
            }
        }
    }

    fn collect_calls(&self, node: Node<'_>, source: &[u8], calls: &mut Vec<DagCall>) {
        if node.kind() == "call" && self.is_constructor(node, source) {
            if let Some(arguments) = node.child_by_field_name("arguments") {
                calls.push(read_keywords(arguments, source));
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_calls(child, source, calls);
        }
    }

    /// Only bare names count; `airflow.DAG(...)` is not recognised
    fn is_constructor(&self, call: Node<'_>, source: &[u8]) -> bool {
        call.child_by_field_name("function")
            .filter(|function| function.kind() == "identifier")
            .and_then(|function| function.utf8_text(source).ok())
            .is_some_and(|name| self.constructors.iter().any(|c| c == name))
    }
}

fn read_keywords(arguments: Node<'_>, source: &[u8]) -> DagCall {
    let mut call = DagCall::default();
    let mut cursor = arguments.walk();

    for argument in arguments.named_children(&mut cursor) {
        if argument.kind() != "keyword_argument" {
            continue;
        }
        let (Some(name), Some(value)) = (
            argument.child_by_field_name("name"),
            argument.child_by_field_name("value"),
        ) else {
            continue;
        };

        match name.utf8_text(source).unwrap_or_default() {
            "dag_id" => {
                if let Some(dag_id) = string_literal(value, source) {
                    call.dag_id = Some(dag_id);
                }
            }
            "max_active_runs" => {
                if let Some(limit) = integer_literal(value, source) {
                    call.max_active_runs = Some(limit);
                }
            }
            "max_active_tasks" => {
                if let Some(limit) = integer_literal(value, source) {
                    call.max_active_tasks = Some(limit);
                }
            }
            _ => {}
        }
    }

    call
}
