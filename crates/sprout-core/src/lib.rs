//! Core types, host input model, and errors for the Sprout design converter.
//!
//! This crate provides the foundational types used across all other sprout crates:
//! - Value types (colors, geometry, blend modes, effects)
//! - Indeterminate ("mixed") values via [`Mixed`]
//! - Paint descriptors and styled text runs
//! - The host tool's node tree as it arrives over JSON
//! - Error types

pub mod errors;
pub mod host;
pub mod paint;
pub mod text;
pub mod types;

pub use errors::*;
pub use host::*;
pub use paint::*;
pub use text::*;
pub use types::*;
