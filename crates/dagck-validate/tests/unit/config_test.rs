//! Tests for configuration helpers and registry bootstrap settings

use std::path::{Path, PathBuf};

use dagck_validate::{DagckConfig, RegistryEnvironment};

#[test]
fn test_paths_resolve_against_project_root() {
    let config = DagckConfig::for_project("/srv/airflow");

    assert_eq!(config.dags_path(), PathBuf::from("/srv/airflow/dags"));
    assert_eq!(
        config.resolve(Path::new("dags/etl.py")),
        PathBuf::from("/srv/airflow/dags/etl.py")
    );
    assert_eq!(config.resolve(Path::new("/tmp/etl.py")), PathBuf::from("/tmp/etl.py"));
}

#[test]
fn test_caller_environment_wins_over_defaults() {
    let config = DagckConfig::for_project("/srv/airflow");
    let environment = RegistryEnvironment::from_config(&config);

    let resolved = environment.resolve(|key| {
        (key == "AIRFLOW__CORE__EXECUTOR").then(|| "LocalExecutor".to_string())
    });

    let keys: Vec<&str> = resolved.iter().map(|(key, _)| *key).collect();
    assert!(!keys.contains(&"AIRFLOW__CORE__EXECUTOR"));
    assert!(keys.contains(&"AIRFLOW__CORE__LOAD_EXAMPLES"));
    assert_eq!(resolved.len(), environment.defaults().len() - 1);
}
