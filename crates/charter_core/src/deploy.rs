//! The deploy flow: hand rendered text to a remote scheduler.
//!
//! The build pipeline is synchronous and pure; everything network-facing
//! sits behind the [`Deployer`] trait so the flow is testable without a
//! cluster. [`nomad_client::NomadClient`] is the production implementation.

use async_trait::async_trait;
use tracing::info;

use nomad_client::NomadClient;

use crate::errors::DeployError;
use crate::{build, BuildRequest};

#[cfg(test)]
#[path = "deploy_tests.rs"]
mod tests;

/// Submits rendered job-specification text to a remote scheduler.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Verify the target namespace exists, creating it when permitted.
    async fn ensure_namespace(
        &self,
        namespace: &str,
        create_missing: bool,
    ) -> Result<(), DeployError>;

    /// Submit the rendered text and return the scheduler-assigned
    /// evaluation identifier.
    async fn submit(&self, hcl: &str) -> Result<String, DeployError>;
}

/// Caller-supplied knobs for one deploy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeployOptions {
    /// Create the target namespace when it does not exist.
    pub create_namespace: bool,
}

/// Outcome of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySummary {
    /// The deployed job's name.
    pub job: String,

    /// The scheduler-assigned evaluation identifier.
    pub evaluation: String,
}

/// Build the job and submit it to the scheduler.
///
/// The namespace check runs only when the build request targets a
/// namespace; no retries are performed here.
pub async fn deploy(
    request: &BuildRequest,
    deployer: &dyn Deployer,
    options: DeployOptions,
) -> Result<DeploySummary, DeployError> {
    let built = build(request)?;

    if let Some(namespace) = &request.namespace {
        deployer
            .ensure_namespace(namespace, options.create_namespace)
            .await?;
    }

    let evaluation = deployer.submit(&built.hcl).await?;
    info!(job = %built.name, evaluation = %evaluation, "job deployed");
    Ok(DeploySummary {
        job: built.name,
        evaluation,
    })
}

#[async_trait]
impl Deployer for NomadClient {
    async fn ensure_namespace(
        &self,
        namespace: &str,
        create_missing: bool,
    ) -> Result<(), DeployError> {
        NomadClient::ensure_namespace(self, namespace, create_missing)
            .await
            .map_err(DeployError::from)
    }

    async fn submit(&self, hcl: &str) -> Result<String, DeployError> {
        let job = self.parse_job(hcl).await.map_err(DeployError::from)?;
        let response = self.register_job(&job).await.map_err(DeployError::from)?;
        Ok(response.eval_id)
    }
}
