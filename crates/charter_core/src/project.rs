//! Project and input-file loading.
//!
//! A project directory holds `charter.yaml` (project metadata and default
//! chart values) and `job.yaml` (the base job definition). Overlay files are
//! standalone YAML documents supplied by the caller in application order.
//! Every job-bearing file must have the recognized root key `job` as its
//! single top-level key or it is rejected with the offending path named.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use jobspec::{ConfigBlock, Value};

use crate::errors::BuildError;

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;

/// File name of the project metadata file.
pub const PROJECT_FILE: &str = "charter.yaml";

/// File name of the base job definition.
pub const JOB_FILE: &str = "job.yaml";

/// Parsed `charter.yaml` contents.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectFile {
    /// Project name, used for reporting when the job carries no label.
    pub name: String,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Default chart values, overridden by values supplied on the command
    /// line.
    #[serde(default)]
    pub values: IndexMap<String, serde_yaml::Value>,
}

/// Load and parse the project metadata file from `dir`.
pub fn load_project(dir: &Path) -> Result<ProjectFile, BuildError> {
    let path = dir.join(PROJECT_FILE);
    let text = read(&path)?;
    serde_yaml::from_str(&text).map_err(|error| BuildError::InputParse {
        path: path.display().to_string(),
        reason: error.to_string(),
    })
}

/// Load one job-bearing YAML file and reshape it into a [`ConfigBlock`].
pub fn load_job_file(path: &Path) -> Result<ConfigBlock, BuildError> {
    let text = read(path)?;
    let node: serde_yaml::Value =
        serde_yaml::from_str(&text).map_err(|error| BuildError::InputParse {
            path: path.display().to_string(),
            reason: error.to_string(),
        })?;
    let value = Value::from_yaml(&node).map_err(|error| BuildError::InputParse {
        path: path.display().to_string(),
        reason: error.to_string(),
    })?;

    let map = match &value {
        Value::Map(map) => map,
        _ => {
            return Err(BuildError::UnexpectedRoot {
                path: path.display().to_string(),
                found: "a non-mapping document".to_string(),
            })
        }
    };
    match map.get("job") {
        Some(body) if map.len() == 1 => Ok(ConfigBlock::from_value("job", body)),
        _ => Err(BuildError::UnexpectedRoot {
            path: path.display().to_string(),
            found: format!(
                "[{}]",
                map.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        }),
    }
}

fn read(path: &Path) -> Result<String, BuildError> {
    std::fs::read_to_string(path).map_err(|error| BuildError::InputRead {
        path: path.display().to_string(),
        reason: error.to_string(),
    })
}
