//! # Charter Core
//!
//! This crate provides the orchestration logic for Charter, a tool that
//! builds Nomad-style job specifications from a base definition plus overlay
//! files, with release/namespace parameters and environment-variable
//! substitution.
//!
//! ## Overview
//!
//! One build runs the complete workflow:
//! 1. Load the project (`charter.yaml`) and base definition (`job.yaml`)
//! 2. Parse each input into a generic value tree and structure-build it
//!    against the job-specification grammar
//! 3. Merge overlay trees and scalar overrides into the base tree
//! 4. Resolve `${...}` reference tokens against the variable sources
//! 5. Render the final canonical tree to job-specification text
//!
//! Deploying hands the rendered text to a [`Deployer`] and returns the
//! scheduler-assigned evaluation identifier.
//!
//! ## Examples
//!
//! ```no_run
//! use std::path::PathBuf;
//! use charter_core::{build, BuildRequest};
//!
//! let request = BuildRequest {
//!     project_dir: PathBuf::from("deploy/api"),
//!     overlays: vec![PathBuf::from("deploy/api/production.yaml")],
//!     release: Some("prod".to_string()),
//!     namespace: Some("payments".to_string()),
//!     ..BuildRequest::default()
//! };
//!
//! let built = build(&request)?;
//! println!("{}", built.hcl);
//! # Ok::<(), charter_core::BuildError>(())
//! ```
//!
//! A build is single-threaded and depth-first; all state (the
//! missing-reference accumulator, the variable sources) is scoped to the
//! build invocation, so independent builds are safe and deterministic.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, info};
use uuid::Uuid;

use env_resolver::Resolver;
use jobspec::{changes, structure, BlockType, Changes, Value};

pub mod errors;
pub use errors::{BuildError, DeployError};

pub mod project;
pub use project::ProjectFile;

pub mod render;

pub mod deploy;
pub use deploy::{deploy, DeployOptions, DeploySummary, Deployer};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Everything one build consumes, supplied once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Directory holding `charter.yaml` and `job.yaml`.
    pub project_dir: PathBuf,

    /// Overlay files, in application order; later files win.
    pub overlays: Vec<PathBuf>,

    /// Release name appended to job, group, and task labels.
    pub release: Option<String>,

    /// Target namespace, injected into the job and its consul/vault blocks.
    pub namespace: Option<String>,

    /// Chart values supplied on the command line, highest precedence.
    pub set_values: Vec<(String, String)>,

    /// Optional KEY=VALUE variable file layered under the process
    /// environment during reference resolution.
    pub var_file: Option<PathBuf>,
}

/// A fully built and rendered job specification.
#[derive(Debug, Clone)]
pub struct BuiltJob {
    /// The job's final name (label after renaming), for reporting.
    pub name: String,

    /// The rendered job-specification text.
    pub hcl: String,
}

/// Run the build pipeline: load, structure-build, merge, resolve, render.
pub fn build(request: &BuildRequest) -> Result<BuiltJob, BuildError> {
    let project = project::load_project(&request.project_dir)?;
    info!(project = %project.name, "building job specification");

    let base_input = project::load_job_file(&request.project_dir.join(project::JOB_FILE))?;
    let mut base = structure::build(&base_input, BlockType::Job);

    let mut overlays = Vec::with_capacity(request.overlays.len());
    for path in &request.overlays {
        debug!(path = %path.display(), "loading overlay");
        let input = project::load_job_file(path)?;
        overlays.push(structure::build(&input, BlockType::Job));
    }

    let changes = Changes {
        release: request.release.clone(),
        namespace: request.namespace.clone(),
        chart_values: chart_values(&project, &request.set_values)?,
        overlays,
    };
    changes::apply(&mut base, &changes)?;

    let mut resolver = Resolver::from_sources(request.var_file.as_deref())?;
    resolver.resolve_tree(&mut base);
    let missing = resolver.into_missing();
    if !missing.is_empty() {
        return Err(BuildError::MissingReferences { names: missing });
    }

    let name = base.label.clone().unwrap_or(project.name);
    let hcl = render::render_job(&base);
    Ok(BuiltJob { name, hcl })
}

/// Assemble chart values by precedence: generated built-ins, then the
/// project's defaults, then command-line values.
fn chart_values(
    project: &ProjectFile,
    set_values: &[(String, String)],
) -> Result<IndexMap<String, Value>, BuildError> {
    let mut values = IndexMap::new();
    values.insert(
        "deploy_version".to_string(),
        Value::String(Uuid::new_v4().to_string()),
    );
    for (key, node) in &project.values {
        let value = Value::from_yaml(node).map_err(|error| BuildError::InputParse {
            path: project::PROJECT_FILE.to_string(),
            reason: format!("value '{key}': {error}"),
        })?;
        values.insert(key.clone(), value);
    }
    for (key, value) in set_values {
        values.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(values)
}
