//! Data models for the Nomad API payloads the client exchanges.

use serde::{Deserialize, Serialize};

/// One namespace on the target cluster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Namespace {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Description", default)]
    pub description: String,
}

/// Nomad's answer to a job registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegisterResponse {
    /// Identifier of the evaluation created for the job.
    #[serde(rename = "EvalID", default)]
    pub eval_id: String,

    #[serde(rename = "JobModifyIndex", default)]
    pub job_modify_index: u64,

    /// Non-fatal scheduler warnings, verbatim.
    #[serde(rename = "Warnings", default)]
    pub warnings: String,
}
