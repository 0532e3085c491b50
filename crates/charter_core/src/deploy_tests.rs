//! Tests for the deploy flow, against a recording mock deployer.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::project::{JOB_FILE, PROJECT_FILE};

#[derive(Default)]
struct MockDeployer {
    calls: Mutex<Vec<String>>,
    missing_namespace: bool,
}

#[async_trait]
impl Deployer for MockDeployer {
    async fn ensure_namespace(
        &self,
        namespace: &str,
        create_missing: bool,
    ) -> Result<(), DeployError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("ensure:{namespace}:{create_missing}"));
        if self.missing_namespace {
            return Err(DeployError::NamespaceMissing {
                namespace: namespace.to_string(),
            });
        }
        Ok(())
    }

    async fn submit(&self, hcl: &str) -> Result<String, DeployError> {
        assert!(hcl.starts_with("job "));
        self.calls.lock().unwrap().push("submit".to_string());
        Ok("eval-123".to_string())
    }
}

fn write_minimal_project(dir: &Path) {
    fs::write(dir.join(PROJECT_FILE), "name: example\n").unwrap();
    fs::write(
        dir.join(JOB_FILE),
        "job:\n  name: example\n  group:\n    - name: web\n      count: 1\n",
    )
    .unwrap();
}

#[tokio::test]
async fn deploy_checks_the_namespace_then_submits() {
    let dir = tempfile::tempdir().unwrap();
    write_minimal_project(dir.path());
    let deployer = MockDeployer::default();

    let request = BuildRequest {
        project_dir: dir.path().to_path_buf(),
        namespace: Some("payments".to_string()),
        ..BuildRequest::default()
    };
    let summary = deploy(
        &request,
        &deployer,
        DeployOptions {
            create_namespace: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(summary.job, "example");
    assert_eq!(summary.evaluation, "eval-123");
    let calls = deployer.calls.lock().unwrap();
    assert_eq!(*calls, vec!["ensure:payments:true", "submit"]);
}

#[tokio::test]
async fn deploy_skips_the_namespace_check_when_none_is_targeted() {
    let dir = tempfile::tempdir().unwrap();
    write_minimal_project(dir.path());
    let deployer = MockDeployer::default();

    let request = BuildRequest {
        project_dir: dir.path().to_path_buf(),
        ..BuildRequest::default()
    };
    deploy(&request, &deployer, DeployOptions::default())
        .await
        .unwrap();

    let calls = deployer.calls.lock().unwrap();
    assert_eq!(*calls, vec!["submit"]);
}

#[tokio::test]
async fn namespace_failures_abort_before_submission() {
    let dir = tempfile::tempdir().unwrap();
    write_minimal_project(dir.path());
    let deployer = MockDeployer {
        missing_namespace: true,
        ..MockDeployer::default()
    };

    let request = BuildRequest {
        project_dir: dir.path().to_path_buf(),
        namespace: Some("payments".to_string()),
        ..BuildRequest::default()
    };
    let result = deploy(&request, &deployer, DeployOptions::default()).await;
    assert!(matches!(result, Err(DeployError::NamespaceMissing { .. })));

    let calls = deployer.calls.lock().unwrap();
    assert_eq!(*calls, vec!["ensure:payments:false"]);
}

#[tokio::test]
async fn build_failures_propagate_without_touching_the_deployer() {
    let deployer = MockDeployer::default();
    let request = BuildRequest {
        project_dir: std::path::PathBuf::from("/nonexistent/project"),
        ..BuildRequest::default()
    };
    let result = deploy(&request, &deployer, DeployOptions::default()).await;
    assert!(matches!(result, Err(DeployError::Build(_))));
    assert!(deployer.calls.lock().unwrap().is_empty());
}
