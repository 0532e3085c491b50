//! Job-specification model error types.
//!
//! Structural errors indicate a defect in the supplied trees (or the caller),
//! not recoverable user input; the build aborts on them immediately.

use thiserror::Error;

use crate::grammar::BlockType;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors converting parsed input into generic values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("unsupported value in input: {kind}")]
    UnsupportedValue { kind: String },

    #[error("mapping key is not a string: {key}")]
    NonStringKey { key: String },
}

/// Structural errors raised while applying changes to a canonical tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructureError {
    /// The changes pass was invoked on a tree whose root is not a job block.
    #[error("changes must be applied to a job block, found '{found}'")]
    UnexpectedRoot { found: BlockType },

    /// A block type declared singleton occurs more than once under one parent.
    #[error("block '{block_type}' at {path} occurs {count} times but allows at most one instance")]
    DuplicateSingleton {
        block_type: BlockType,
        path: String,
        count: usize,
    },
}
