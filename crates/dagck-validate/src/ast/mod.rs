//! AST Analysis Module
//!
//! Static extraction of DAG constructor arguments from Python sources using
//! tree-sitter. Nothing is evaluated: only literal keyword values are read.

pub mod extractor;
pub mod literals;
pub mod python;

pub use extractor::{DagCall, SourceExtractor};
pub use python::PythonParser;
