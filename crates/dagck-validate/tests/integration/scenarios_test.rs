//! End-to-end scenarios through runner and reporter

use std::collections::BTreeMap;

use dagck_validate::{
    BatchRunner, DagCheck, DefinitionCheck, NamingCheck, RegistrySnapshot, Reporter, ResourceCheck,
};
use tempfile::TempDir;

use crate::test_utils::{FixtureRegistry, dag_source, project, registered, write_dag};

fn naming_output(dag_id: &str) -> (String, i32) {
    let temp = TempDir::new().unwrap();
    write_dag(&temp, "dag.py", &dag_source(dag_id, None, None));
    let config = project(&temp);
    let registry = FixtureRegistry::disabled();
    let check = NamingCheck::new(&config.rules, &registry);

    let report = BatchRunner::new(&config, &check)
        .run_directory(&config.dags_path())
        .unwrap();
    (
        Reporter::to_human_readable(&report, &check.style()),
        Reporter::exit_code(&report),
    )
}

#[test]
fn test_known_tenant_passes_silently() {
    let (output, code) = naming_output("data-engineering_daily_etl");

    assert_eq!(code, 0);
    assert_eq!(output, "✅ All DAGs follow naming convention\n");
}

#[test]
fn test_unknown_tenant_passes_with_warning() {
    let (output, code) = naming_output("reporting_daily_etl");

    assert_eq!(code, 0);
    assert!(output.starts_with("⚠️  Warnings:"));
    assert!(output.contains("Unknown tenant 'reporting'"));
    assert!(output.ends_with("✅ All DAGs follow naming convention (with warnings)\n"));
}

#[test]
fn test_missing_separator_fails_with_format_hint() {
    let (output, code) = naming_output("dailyetl");

    assert_eq!(code, 1);
    assert!(output.contains("  dags/dag.py:\n    - dailyetl: DAG ID 'dailyetl' must follow format: {tenant}_{name}"));
    assert!(output.contains("Example: data-engineering_daily_etl"));
}

#[test]
fn test_runs_above_ceiling_fails() {
    let temp = TempDir::new().unwrap();
    write_dag(&temp, "dag.py", &dag_source("analytics_busy", Some(10), Some(3)));
    let config = project(&temp);
    let registry = FixtureRegistry::disabled();
    let check = ResourceCheck::new(&config.rules, &registry);

    let report = BatchRunner::new(&config, &check)
        .run_directory(&config.dags_path())
        .unwrap();
    let output = Reporter::to_human_readable(&report, &check.style());

    assert_eq!(Reporter::exit_code(&report), 1);
    assert!(output.contains("analytics_busy: max_active_runs=10 exceeds maximum allowed (5)"));
    assert!(output.contains("  - max_active_runs: 1 (max: 5)"));
}

#[test]
fn test_broken_import_is_attributed_to_its_file() {
    let temp = TempDir::new().unwrap();
    let good = write_dag(&temp, "good.py", &dag_source("analytics_good", Some(1), Some(3)));
    let broken = write_dag(&temp, "broken.py", "import missing_dependency\n");
    let mut import_errors = BTreeMap::new();
    import_errors.insert(
        broken.clone(),
        "ModuleNotFoundError: No module named 'missing_dependency'".to_string(),
    );
    let registry = FixtureRegistry::snapshot(RegistrySnapshot {
        dags: vec![registered("analytics_good", &good, Some(1), Some(3))],
        import_errors,
    });
    let config = project(&temp);
    let check = DefinitionCheck::new(&registry);

    let report = BatchRunner::new(&config, &check)
        .run_directory(&config.dags_path())
        .unwrap();

    assert_eq!(Reporter::exit_code(&report), 1);
    assert_eq!(report.errors_by_file.len(), 1);
    assert_eq!(
        report.errors_by_file["dags/broken.py"],
        vec!["Import error in broken.py: ModuleNotFoundError: No module named 'missing_dependency'"]
    );
    let output = Reporter::to_human_readable(&report, &check.style());
    assert!(output.starts_with("❌ DAG validation failed:"));
}

#[test]
fn test_registry_failure_aborts_definition_batch() {
    let temp = TempDir::new().unwrap();
    write_dag(&temp, "a.py", &dag_source("analytics_a", None, None));
    write_dag(&temp, "b.py", &dag_source("analytics_b", None, None));
    let config = project(&temp);
    let registry = FixtureRegistry::broken("SyntaxError in unrelated module");
    let check = DefinitionCheck::new(&registry);

    let result = BatchRunner::new(&config, &check).run_directory(&config.dags_path());

    assert!(result.is_err());
    assert_eq!(registry.load_count(), 1);
}
