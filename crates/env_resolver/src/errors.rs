use thiserror::Error;

/// Errors raised while constructing a resolver's named-value sources.
///
/// A missing reference is deliberately not represented here: it accumulates
/// in the resolver for one aggregate report after the whole tree has been
/// processed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The file-backed variable source could not be read or parsed.
    #[error("failed to load variable file '{path}': {reason}")]
    VarFile { path: String, reason: String },
}
