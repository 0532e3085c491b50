use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the Charter CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// The build pipeline failed before any output was produced.
    #[error(transparent)]
    Build(#[from] charter_core::BuildError),

    /// The deploy flow failed, either while building or while talking to
    /// the scheduler.
    #[error(transparent)]
    Deploy(#[from] charter_core::DeployError),

    /// The scheduler client could not be constructed.
    #[error(transparent)]
    Client(#[from] nomad_client::Error),

    /// The rendered specification could not be written to the output file.
    #[error("failed to write '{path}': {reason}")]
    OutputWrite { path: String, reason: String },
}
