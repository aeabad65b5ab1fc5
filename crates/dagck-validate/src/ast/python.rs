//! Python parser using tree-sitter-python

use std::path::PathBuf;
use tree_sitter::{Parser, Tree};

use crate::{Result, ValidationError};

/// Python AST parser using tree-sitter-python
pub struct PythonParser {
    parser: Parser,
}

impl PythonParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ValidationError::Parse {
                file: PathBuf::new(),
                message: format!("Failed to load Python grammar: {e}"),
            })?;

        Ok(Self { parser })
    }

    pub fn language(&self) -> &'static str {
        "python"
    }

    /// Parse `content` into a syntax tree
    ///
    /// tree-sitter recovers from malformed input, so callers that need
    /// all-or-nothing semantics must check `root_node().has_error()`.
    pub fn parse(&mut self, content: &str, filename: &str) -> Result<Tree> {
        self.parser
            .parse(content, None)
            .ok_or_else(|| ValidationError::Parse {
                file: filename.into(),
                message: "Failed to parse Python code".into(),
            })
    }
}
