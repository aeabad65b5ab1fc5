//! Tests for the definition validity check

use std::collections::BTreeMap;

use dagck_validate::{DagCheck, DefinitionCheck, RegistrySnapshot, ValidationError};
use tempfile::TempDir;

use crate::test_utils::{FixtureRegistry, dag_source, registered, write_dag};

#[test]
fn test_missing_file_fails_without_loading() {
    let temp = TempDir::new().unwrap();
    let registry = FixtureRegistry::empty();
    let missing = temp.path().join("dags/ghost.py");

    let verdict = DefinitionCheck::new(&registry).check_file(&missing).unwrap();

    assert_eq!(registry.load_count(), 0);
    assert_eq!(verdict.errors.len(), 1);
    assert!(verdict.errors[0].starts_with("DAG file not found: "));
}

#[test]
fn test_registered_file_is_valid() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "etl.py", &dag_source("analytics_etl", Some(1), Some(3)));
    let registry = FixtureRegistry::with_dags(vec![registered("analytics_etl", &dag, None, None)]);

    let verdict = DefinitionCheck::new(&registry).check_file(&dag).unwrap();

    assert!(verdict.is_valid());
}

#[test]
fn test_import_error_is_echoed() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "broken.py", "import not_a_module\n");
    let mut import_errors = BTreeMap::new();
    import_errors.insert(
        dag.clone(),
        "ModuleNotFoundError: No module named 'not_a_module'".to_string(),
    );
    let registry = FixtureRegistry::snapshot(RegistrySnapshot {
        dags: vec![],
        import_errors,
    });

    let verdict = DefinitionCheck::new(&registry).check_file(&dag).unwrap();

    assert_eq!(
        verdict.errors,
        vec![
            "Import error in broken.py: ModuleNotFoundError: No module named 'not_a_module'"
                .to_string()
        ]
    );
}

#[test]
fn test_file_without_dag_is_reported() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "helpers.py", "def helper():\n    return 1\n");
    let registry = FixtureRegistry::empty();

    let verdict = DefinitionCheck::new(&registry).check_file(&dag).unwrap();

    assert_eq!(
        verdict.errors,
        vec!["DAG not found in helpers.py - check for DAG definition".to_string()]
    );
}

#[test]
fn test_registry_failure_aborts() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "etl.py", &dag_source("analytics_etl", None, None));
    let registry = FixtureRegistry::broken("Traceback (most recent call last): ...");

    let result = DefinitionCheck::new(&registry).check_file(&dag);

    assert!(matches!(result, Err(ValidationError::Registry(_))));
}
