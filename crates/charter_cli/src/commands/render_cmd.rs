//! Render command module.
//!
//! Runs the build pipeline (load, merge, resolve, render) and writes the
//! resulting job specification to stdout or to a file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use charter_core::{build, BuildRequest};

use crate::errors::Error;
use crate::parse_key_val;

#[cfg(test)]
#[path = "render_cmd_tests.rs"]
mod render_cmd_tests;

/// Inputs shared by every command that runs the build pipeline.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory containing charter.yaml and job.yaml
    pub project_dir: PathBuf,

    /// Overlay file merged into the base definition; repeatable, later files win
    #[arg(short = 'f', long = "overlay", value_name = "FILE")]
    pub overlays: Vec<PathBuf>,

    /// Release name appended to job, group, and task names
    #[arg(long)]
    pub release: Option<String>,

    /// Namespace the job is deployed into
    #[arg(long)]
    pub namespace: Option<String>,

    /// Chart value override; repeatable, highest precedence
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// KEY=VALUE file layered under the process environment during
    /// reference resolution
    #[arg(long, value_name = "FILE")]
    pub var_file: Option<PathBuf>,
}

impl BuildArgs {
    pub fn to_request(&self) -> BuildRequest {
        BuildRequest {
            project_dir: self.project_dir.clone(),
            overlays: self.overlays.clone(),
            release: self.release.clone(),
            namespace: self.namespace.clone(),
            set_values: self.set.clone(),
            var_file: self.var_file.clone(),
        }
    }
}

/// Command-line arguments for the render command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Write the rendered specification to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn execute(args: &RenderArgs) -> Result<(), Error> {
    let built = build(&args.build.to_request())?;
    match &args.output {
        Some(path) => {
            fs::write(path, &built.hcl).map_err(|error| Error::OutputWrite {
                path: path.display().to_string(),
                reason: error.to_string(),
            })?;
            info!(job = %built.name, path = %path.display(), "wrote job specification");
        }
        None => print!("{}", built.hcl),
    }
    Ok(())
}
