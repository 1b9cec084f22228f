//! Error types for the Sprout converter.

use thiserror::Error;

/// Errors that abort normalization of a selection.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A container or group without an id; id-keyed indexing would corrupt other results.
    #[error("{kind} '{name}' at ({x}, {y}) has no id")]
    MissingId {
        kind: String,
        name: String,
        x: f64,
        y: f64,
    },

    /// The selection could not be read.
    #[error("Invalid host input: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error(transparent)]
    Tree(#[from] LayoutError),
}

/// Errors when querying a normalized tree.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("No node at index {index}")]
    UnknownNode { index: usize },
}
