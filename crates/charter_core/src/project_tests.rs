//! Tests for project and input-file loading.

use std::fs;

use super::*;

#[test]
fn project_file_parses_metadata_and_default_values() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(PROJECT_FILE),
        "name: api\nversion: 1.2.0\nvalues:\n  type: service\n  replicas: 3\n",
    )
    .unwrap();

    let project = load_project(dir.path()).unwrap();
    assert_eq!(project.name, "api");
    assert_eq!(project.version.as_deref(), Some("1.2.0"));
    let keys: Vec<&str> = project.values.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["type", "replicas"]);
}

#[test]
fn missing_project_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_project(dir.path());
    match result {
        Err(BuildError::InputRead { path, .. }) => assert!(path.ends_with(PROJECT_FILE)),
        other => panic!("expected InputRead, got {other:?}"),
    }
}

#[test]
fn job_file_with_the_recognized_root_key_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(JOB_FILE);
    fs::write(&path, "job:\n  name: example\n  region: eu\n").unwrap();

    let block = load_job_file(&path).unwrap();
    assert_eq!(block.name, "job");
    assert_eq!(
        block.parameter("name"),
        Some(&Value::String("example".to_string()))
    );
}

#[test]
fn job_file_with_an_unrecognized_root_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(JOB_FILE);
    fs::write(&path, "service:\n  name: example\n").unwrap();

    let result = load_job_file(&path);
    match result {
        Err(BuildError::UnexpectedRoot { found, .. }) => assert!(found.contains("service")),
        other => panic!("expected UnexpectedRoot, got {other:?}"),
    }
}

#[test]
fn job_file_with_extra_top_level_keys_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(JOB_FILE);
    fs::write(&path, "job:\n  name: example\nextra: true\n").unwrap();

    assert!(matches!(
        load_job_file(&path),
        Err(BuildError::UnexpectedRoot { .. })
    ));
}

#[test]
fn malformed_yaml_is_a_parse_error_naming_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(JOB_FILE);
    fs::write(&path, "job: [unclosed\n").unwrap();

    match load_job_file(&path) {
        Err(BuildError::InputParse { path: reported, .. }) => {
            assert!(reported.ends_with(JOB_FILE))
        }
        other => panic!("expected InputParse, got {other:?}"),
    }
}
