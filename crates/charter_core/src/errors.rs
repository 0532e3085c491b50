//! Build and deploy error types.
//!
//! Every fatal kind stops the build immediately and carries enough context
//! (file path, block path) to diagnose. Missing references are the one
//! deferred kind: they accumulate during resolution and surface once, in
//! aggregate, as [`BuildError::MissingReferences`].

use thiserror::Error;

use jobspec::StructureError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors raised while building and rendering a job specification.
#[derive(Error, Debug)]
pub enum BuildError {
    /// An input or overlay file could not be read.
    #[error("failed to read input file '{path}': {reason}")]
    InputRead { path: String, reason: String },

    /// An input or overlay file could not be parsed.
    #[error("failed to parse input file '{path}': {reason}")]
    InputParse { path: String, reason: String },

    /// The file's top-level key is not the recognized root key.
    #[error("input file '{path}' must have a single top-level 'job' key, found {found}")]
    UnexpectedRoot { path: String, found: String },

    /// A structural defect detected while applying changes.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// The reference-resolver's named-value source could not be loaded.
    #[error(transparent)]
    Resolver(#[from] env_resolver::Error),

    /// References that resolved through no source and carried no default,
    /// reported together after the whole tree was processed.
    #[error("unresolved references: {}", names.join(", "))]
    MissingReferences { names: Vec<String> },
}

/// Errors raised while deploying a built job to the remote scheduler.
#[derive(Error, Debug)]
pub enum DeployError {
    #[error(transparent)]
    Build(#[from] BuildError),

    /// A remote failure; the scheduler's message is passed through
    /// unmodified.
    #[error("remote scheduler error: {message}")]
    Remote { message: String },

    #[error("namespace '{namespace}' does not exist on the target cluster")]
    NamespaceMissing { namespace: String },
}

impl From<nomad_client::Error> for DeployError {
    fn from(error: nomad_client::Error) -> Self {
        match error {
            nomad_client::Error::NamespaceMissing { namespace } => {
                DeployError::NamespaceMissing { namespace }
            }
            other => DeployError::Remote {
                message: other.to_string(),
            },
        }
    }
}
