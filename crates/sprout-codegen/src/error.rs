//! Error types for code generation.

use sprout_core::{LayoutError, NormalizeError};
use thiserror::Error;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur during code generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// Template rendering error.
    #[error("Template error: {0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// Invalid template.
    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] handlebars::TemplateError),

    /// The tree refers to a node it does not hold.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The selection could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Nothing survived normalization.
    #[error("Nothing to generate: the selection is empty")]
    EmptySelection,
}
