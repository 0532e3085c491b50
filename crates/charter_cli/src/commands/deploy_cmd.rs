//! Deploy command module.
//!
//! Runs the build pipeline and submits the rendered job specification to a
//! Nomad cluster over its HTTP API.

use clap::Args;
use tracing::info;

use charter_core::{deploy, DeployOptions};
use nomad_client::NomadClient;

use super::render_cmd::BuildArgs;
use crate::errors::Error;

#[cfg(test)]
#[path = "deploy_cmd_tests.rs"]
mod deploy_cmd_tests;

/// Command-line arguments for the deploy command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Address of the cluster's HTTP API
    #[arg(long, default_value = "http://127.0.0.1:4646")]
    pub address: String,

    /// ACL token sent with every request
    #[arg(long, env = "NOMAD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Create the target namespace when it does not exist
    #[arg(long)]
    pub create_namespace: bool,
}

pub async fn execute(args: &DeployArgs) -> Result<(), Error> {
    let client = NomadClient::new(&args.address, args.token.clone())?;
    let options = DeployOptions {
        create_namespace: args.create_namespace,
    };
    let summary = deploy(&args.build.to_request(), &client, options).await?;
    info!(job = %summary.job, evaluation = %summary.evaluation, "job registered");
    println!(
        "Deployed '{}' (evaluation {})",
        summary.job, summary.evaluation
    );
    Ok(())
}
