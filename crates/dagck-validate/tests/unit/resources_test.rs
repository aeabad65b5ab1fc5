//! Tests for the resource limit check

use dagck_validate::{DagCheck, ResourceCheck, RulesConfig};
use tempfile::TempDir;

use crate::test_utils::{FixtureRegistry, dag_source, registered, write_dag};

#[test]
fn test_recommended_limits_are_clean() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "etl.py", &dag_source("analytics_etl", Some(1), Some(3)));
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::empty();

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert_eq!(verdict, dagck_validate::Verdict::new());
}

#[test]
fn test_complete_static_config_skips_registry() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "etl.py", &dag_source("analytics_etl", Some(2), Some(3)));
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::empty();

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert_eq!(registry.load_count(), 0);
    assert_eq!(
        verdict.warnings,
        vec!["analytics_etl: max_active_runs=2 is higher than recommended (1)".to_string()]
    );
}

#[test]
fn test_registry_fills_only_missing_fields() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "etl.py", &dag_source("analytics_etl", Some(1), None));
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::with_dags(vec![registered("analytics_etl", &dag, Some(9), Some(12))]);
    let check = ResourceCheck::new(&rules, &registry);

    let record = check.build_record(&dag);
    assert_eq!(record.max_active_runs, Some(1));
    assert_eq!(record.max_active_tasks, Some(12));

    let verdict = check.check_file(&dag).unwrap();
    assert_eq!(
        verdict.errors,
        vec!["analytics_etl: max_active_tasks=12 exceeds maximum allowed (10)".to_string()]
    );
}

#[test]
fn test_unset_limits_fall_back_to_file_stem() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "nightly.py", "x = 1\n");
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::broken("boom");

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert!(verdict.is_valid());
    assert_eq!(
        verdict.warnings,
        vec![
            "nightly: max_active_runs not set (recommended: 1)".to_string(),
            "nightly: max_active_tasks not set (recommended: 3)".to_string(),
        ]
    );
}

#[test]
fn test_error_and_warning_on_different_fields() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "etl.py", &dag_source("analytics_etl", Some(6), Some(4)));
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::empty();

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert_eq!(verdict.errors.len(), 1);
    assert_eq!(verdict.warnings.len(), 1);
    assert!(verdict.errors[0].contains("max_active_runs=6"));
    assert!(verdict.warnings[0].contains("max_active_tasks=4"));
}

#[test]
fn test_configured_limits_apply() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "etl.py", &dag_source("analytics_etl", Some(7), Some(3)));
    let mut rules = RulesConfig::default();
    rules.limits.max_allowed_active_runs = 8;
    let registry = FixtureRegistry::empty();

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert!(verdict.is_valid());
    assert_eq!(verdict.warnings.len(), 1);
}

#[test]
fn test_wrapped_and_wide_limits_still_hit_the_ceiling() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(
        &temp,
        "etl.py",
        "from airflow import DAG\n\
         DAG(dag_id='analytics_x', max_active_runs=(10), max_active_tasks=99999999999999999999)\n",
    );
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::broken("registry down");

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert_eq!(registry.load_count(), 0);
    assert!(verdict.warnings.is_empty());
    assert_eq!(verdict.errors.len(), 2);
    assert_eq!(
        verdict.errors[0],
        "analytics_x: max_active_runs=10 exceeds maximum allowed (5)"
    );
}

#[test]
fn test_float_limit_is_compared_numerically() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(
        &temp,
        "etl.py",
        "DAG(dag_id='analytics_x', max_active_runs=10.0, max_active_tasks=3.0)\n",
    );
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::empty();

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert_eq!(
        verdict.errors,
        vec!["analytics_x: max_active_runs=10 exceeds maximum allowed (5)".to_string()]
    );
    assert!(verdict.warnings.is_empty());
}

#[test]
fn test_empty_static_id_reports_file_stem() {
    let temp = TempDir::new().unwrap();
    let dag = write_dag(&temp, "nightly.py", "DAG(dag_id='', max_active_runs=2, max_active_tasks=3)\n");
    let rules = RulesConfig::default();
    let registry = FixtureRegistry::empty();

    let verdict = ResourceCheck::new(&rules, &registry).check_file(&dag).unwrap();

    assert_eq!(
        verdict.warnings,
        vec!["nightly: max_active_runs=2 is higher than recommended (1)".to_string()]
    );
}
