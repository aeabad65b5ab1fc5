//! Shared file-scanning helpers for the DAG checks.

use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Package marker files never hold DAGs
const PACKAGE_INIT: &str = "__init__.py";

/// Test modules living next to DAGs
const TEST_PREFIX: &str = "test_";

/// True if a file name is a DAG candidate (`*.py`, not a package init or test module)
pub fn is_dag_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.extension().is_some_and(|ext| ext == "py")
        && name != PACKAGE_INIT
        && !name.starts_with(TEST_PREFIX)
}

/// Recursively discover DAG candidates under `dags_dir`, sorted by path
pub fn discover_dag_files(dags_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dags_dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file() && is_dag_candidate(e.path()))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();

    debug!(dir = %dags_dir.display(), count = files.len(), "Discovered DAG files");
    files
}

/// Folder the registry is loaded from for a given DAG file
pub fn dag_folder(dag_file: &Path) -> PathBuf {
    match dag_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Canonical form when the path exists, lexically cleaned otherwise
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| clean_path(path))
}

/// True if two paths name the same source file
pub fn same_source(a: &Path, b: &Path) -> bool {
    normalize_path(a) == normalize_path(b)
}

/// Report key for a file: relative to the project root when inside it
pub fn relative_key(path: &Path, project_root: &Path) -> String {
    let cleaned = clean_path(path);
    let root = clean_path(project_root);
    cleaned
        .strip_prefix(&root)
        .unwrap_or(&cleaned)
        .to_string_lossy()
        .into_owned()
}

fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(cleaned.components().next_back(), Some(Component::Normal(_))) {
                    cleaned.pop();
                } else {
                    cleaned.push(component);
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}
