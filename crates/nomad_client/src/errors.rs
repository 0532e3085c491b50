//! Nomad client error types.

use thiserror::Error;

/// Errors returned by [`crate::NomadClient`] operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The cluster address is not a valid URL.
    #[error("invalid Nomad address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The HTTP request could not be completed.
    #[error("request to Nomad failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Nomad answered with a non-success status. The message is the response
    /// body, passed through unmodified.
    #[error("Nomad returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The target namespace does not exist and creating it was not permitted.
    #[error("namespace '{namespace}' does not exist on the target cluster")]
    NamespaceMissing { namespace: String },
}
