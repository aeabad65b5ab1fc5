//! Batch runner over real folders

use std::path::PathBuf;

use dagck_validate::{BatchRunner, NamingCheck, ReportStyle, Reporter, ResourceCheck};
use tempfile::TempDir;

use crate::test_utils::{FixtureRegistry, dag_source, project, write_dag, write_file};

fn populated_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_dag(&temp, "good.py", &dag_source("analytics_daily", Some(1), Some(3)));
    write_dag(&temp, "nested/bad.py", &dag_source("NoSeparator", Some(1), Some(3)));
    write_dag(&temp, "__init__.py", &dag_source("skipped_init", None, None));
    write_dag(&temp, "test_good.py", &dag_source("skipped_test", None, None));
    write_dag(&temp, "notes.txt", "DAG(dag_id=\"skipped_txt\")");
    temp
}

#[test]
fn test_directory_mode_skips_non_candidates() {
    let temp = populated_project();
    let config = project(&temp);
    let registry = FixtureRegistry::empty();
    let check = NamingCheck::new(&config.rules, &registry);

    let report = BatchRunner::new(&config, &check)
        .run_directory(&config.dags_path())
        .unwrap();

    assert_eq!(report.files_checked, 2);
    assert_eq!(
        report.errors_by_file.keys().collect::<Vec<_>>(),
        vec!["dags/nested/bad.py"]
    );
    assert!(report.warnings_by_file.is_empty());
}

#[test]
fn test_explicit_paths_resolve_against_project_root() {
    let temp = populated_project();
    let config = project(&temp);
    let registry = FixtureRegistry::empty();
    let check = NamingCheck::new(&config.rules, &registry);

    let report = BatchRunner::new(&config, &check)
        .run_paths(&[PathBuf::from("dags/good.py")])
        .unwrap();

    assert_eq!(report.files_checked, 1);
    assert!(report.passed());
}

#[test]
fn test_paths_outside_root_keep_their_form() {
    let temp = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    let outside = write_file(&elsewhere, "loose.py", &dag_source("bad", None, None));
    let config = project(&temp);
    let registry = FixtureRegistry::empty();
    let check = NamingCheck::new(&config.rules, &registry);

    let report = BatchRunner::new(&config, &check)
        .run_paths(std::slice::from_ref(&outside))
        .unwrap();

    let key = outside.to_string_lossy().into_owned();
    assert!(report.errors_by_file.contains_key(&key));
}

#[test]
fn test_missing_folder_checks_nothing() {
    let temp = TempDir::new().unwrap();
    let config = project(&temp);
    let registry = FixtureRegistry::empty();
    let check = NamingCheck::new(&config.rules, &registry);

    let report = BatchRunner::new(&config, &check)
        .run_directory(&config.dags_path())
        .unwrap();

    assert_eq!(report.files_checked, 0);
    assert_eq!(Reporter::exit_code(&report), 0);
}

#[test]
fn test_rerun_is_idempotent() {
    let temp = populated_project();
    write_dag(&temp, "heavy.py", &dag_source("analytics_heavy", Some(4), None));
    let config = project(&temp);
    let registry = FixtureRegistry::empty();
    let check = ResourceCheck::new(&config.rules, &registry);
    let runner = BatchRunner::new(&config, &check);

    let first = runner.run_directory(&config.dags_path()).unwrap();
    let second = runner.run_directory(&config.dags_path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        Reporter::to_human_readable(&first, &ReportStyle::resources(&config.rules.limits)),
        Reporter::to_human_readable(&second, &ReportStyle::resources(&config.rules.limits))
    );
}
