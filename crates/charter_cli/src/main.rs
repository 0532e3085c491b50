use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod errors;

use charter_core::{BuildError, DeployError};
use commands::deploy_cmd::DeployArgs;
use commands::render_cmd::RenderArgs;
use errors::Error;

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// Charter CLI: build and deploy Nomad job specifications from layered definitions
#[derive(Parser)]
#[command(name = "charter")]
#[command(about = "Build and deploy job specifications from layered definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the job specification and print or write the rendered text
    Render(RenderArgs),

    /// Build the job specification and submit it to a cluster
    Deploy(DeployArgs),

    /// Show the CLI version
    Version,
}

pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Log the error and pick the exit code: unresolved references are a
/// distinct failure mode (2), everything else exits 1.
fn report(error: &Error) -> i32 {
    let build_error = match error {
        Error::Build(inner) => Some(inner),
        Error::Deploy(DeployError::Build(inner)) => Some(inner),
        _ => None,
    };
    if let Some(BuildError::MissingReferences { names }) = build_error {
        error!("build finished with unresolved references:");
        for name in names {
            error!("  {name}");
        }
        return 2;
    }
    error!("Error: {error}");
    1
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("CHARTER_LOG"))
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Render(args) => {
            if let Err(e) = commands::render_cmd::execute(args) {
                std::process::exit(report(&e));
            }
        }
        Commands::Deploy(args) => {
            if let Err(e) = commands::deploy_cmd::execute(args).await {
                std::process::exit(report(&e));
            }
        }
        Commands::Version => {
            println!("charter version {}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        }
    }
}
