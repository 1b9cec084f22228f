//! Normalization of host design trees for Sprout.
//!
//! Turns the host's node tree into one immutable [`NormalizedTree`]:
//! hidden and unsupported nodes are dropped, structurally redundant nodes are
//! rewritten, and free-form containers get an inferred flow where one fits.
//!
//! # Example
//!
//! ```ignore
//! use sprout_normalize::{normalize_json, ConversionContext, NormalizeOptions};
//!
//! let mut ctx = ConversionContext::new();
//! let tree = normalize_json(selection_json, &NormalizeOptions::default(), &mut ctx)?;
//!
//! for warning in ctx.warnings().messages() {
//!     eprintln!("{}", warning);
//! }
//! ```

mod cloner;
mod context;
mod normalizer;
mod source;

pub use cloner::{clone_node, is_blocked, BLOCKED_PROPERTIES};
pub use context::{ConversionContext, TextRunCache, WarningSink};
pub use normalizer::{normalize, normalize_json, normalize_selection, renormalize, NormalizeOptions};
pub use source::{convert_paints, SourceKind, SourceNode, TreeNode};
