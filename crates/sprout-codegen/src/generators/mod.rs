//! Code generators for the supported UI frameworks.

mod flutter;
mod html;
mod style;
mod swiftui;
mod tailwind;
mod templates;

pub use flutter::FlutterGenerator;
pub use html::HtmlGenerator;
pub use swiftui::SwiftUiGenerator;
pub use tailwind::TailwindGenerator;
pub use templates::TemplateEngine;

use serde::{Deserialize, Serialize};
use sprout_layout::NormalizedTree;
use sprout_normalize::ConversionContext;

use crate::error::{CodegenError, Result};

/// Common trait for code generators.
///
/// Generators only read the tree and the context; sizing decisions come from
/// the shared resolver so every target agrees on fixed, hug, and fill.
pub trait CodeGenerator {
    /// Target framework name.
    fn framework_name(&self) -> &'static str;

    /// Markup or view code for the selection, without a file wrapper.
    fn generate_body(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String>;

    /// Complete output for the selection.
    fn generate(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String>;
}

/// Options shared by all generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Name of the generated view; converted to each target's convention
    pub component_name: String,
    /// Wrap the markup in a complete source file
    pub wrap_in_file: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            component_name: "Generated View".to_string(),
            wrap_in_file: true,
        }
    }
}

impl GeneratorOptions {
    pub fn with_component_name(mut self, name: impl Into<String>) -> Self {
        self.component_name = name.into();
        self
    }

    /// Emit only the markup.
    pub fn body_only(mut self) -> Self {
        self.wrap_in_file = false;
        self
    }
}

/// Supported output targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Html,
    Tailwind,
    SwiftUi,
    Flutter,
}

impl Framework {
    /// Build the generator for this target.
    pub fn generator(self, options: GeneratorOptions) -> Result<Box<dyn CodeGenerator>> {
        Ok(match self {
            Framework::Html => Box::new(HtmlGenerator::with_options(options)?),
            Framework::Tailwind => Box::new(TailwindGenerator::with_options(options)?),
            Framework::SwiftUi => Box::new(SwiftUiGenerator::with_options(options)?),
            Framework::Flutter => Box::new(FlutterGenerator::with_options(options)?),
        })
    }
}

/// Fail on an empty tree before any generator runs.
pub(crate) fn ensure_selection(tree: &NormalizedTree) -> Result<()> {
    if tree.is_empty() {
        return Err(CodegenError::EmptySelection);
    }
    Ok(())
}

/// Data handed to every file-wrapper template.
#[derive(Debug, Serialize)]
pub(crate) struct FileTemplate<'a> {
    pub name: &'a str,
    pub body: &'a str,
}
