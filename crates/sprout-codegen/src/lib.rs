//! Code generation from normalized Sprout trees.
//!
//! Each generator walks a [`NormalizedTree`](sprout_layout::NormalizedTree)
//! and asks the shared sizing resolver whether a node is fixed, hugging, or
//! filling, so the four targets agree on layout:
//!
//! - [`HtmlGenerator`]: HTML with inline CSS (flexbox or absolute positioning)
//! - [`TailwindGenerator`]: HTML with Tailwind utility classes
//! - [`SwiftUiGenerator`]: `HStack`/`VStack`/`ZStack` views
//! - [`FlutterGenerator`]: `Row`/`Column`/`Stack` widgets
//!
//! # Example
//!
//! ```ignore
//! use sprout_codegen::{convert, Framework, GeneratorOptions};
//! use sprout_normalize::NormalizeOptions;
//!
//! let normalize = NormalizeOptions::default();
//! let options = GeneratorOptions::default();
//! let output = convert(selection_json, Framework::SwiftUi, &normalize, options)?;
//! println!("{}", output.code);
//! ```

pub mod error;
pub mod generators;

pub use error::{CodegenError, Result};
pub use generators::{
    CodeGenerator, FlutterGenerator, Framework, GeneratorOptions, HtmlGenerator, SwiftUiGenerator,
    TailwindGenerator, TemplateEngine,
};

use sprout_normalize::{normalize_json, ConversionContext, NormalizeOptions};

/// Generated code and the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub framework: Framework,
    pub code: String,
    /// De-duplicated, in the order first raised
    pub warnings: Vec<String>,
}

/// Normalize a JSON selection and generate code for one framework.
pub fn convert(
    json: &str,
    framework: Framework,
    normalize_options: &NormalizeOptions,
    options: GeneratorOptions,
) -> Result<Conversion> {
    let mut ctx = ConversionContext::new();
    let tree = normalize_json(json, normalize_options, &mut ctx)?;
    let generator = framework.generator(options)?;
    let code = generator.generate(&tree, &ctx)?;

    tracing::debug!(
        "Generated {} code for {} nodes ({} warnings)",
        generator.framework_name(),
        tree.len(),
        ctx.warnings().len()
    );

    Ok(Conversion {
        framework,
        code,
        warnings: ctx.warnings().messages().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card() -> String {
        json!({
            "id": "1:1",
            "name": "Card",
            "type": "FRAME",
            "width": 200.0,
            "height": 80.0,
            "children": [
                {
                    "id": "2:1",
                    "type": "RECTANGLE",
                    "x": 10.0,
                    "y": 10.0,
                    "width": 60.0,
                    "height": 60.0
                },
                {
                    "id": "2:2",
                    "type": "RECTANGLE",
                    "x": 90.0,
                    "y": 10.0,
                    "width": 100.0,
                    "height": 60.0
                },
                { "id": "2:3", "type": "STICKY" }
            ]
        })
        .to_string()
    }

    #[test]
    fn test_every_framework_renders_the_row() {
        let expected = [
            (Framework::Html, "flex-direction: row"),
            (Framework::Tailwind, "flex-row"),
            (Framework::SwiftUi, "HStack("),
            (Framework::Flutter, "Row("),
        ];

        for (framework, token) in expected {
            let options = GeneratorOptions::default().body_only();
            let output =
                convert(&card(), framework, &NormalizeOptions::default(), options).unwrap();
            assert_eq!(output.framework, framework);
            assert!(
                output.code.contains(token),
                "{:?} output lacks {}:\n{}",
                framework,
                token,
                output.code
            );
            assert_eq!(output.warnings, vec!["Unsupported node kind 'STICKY' omitted".to_string()]);
        }
    }

    #[test]
    fn test_invalid_json_is_a_normalize_error() {
        let options = NormalizeOptions::default();
        let result = convert("{", Framework::Html, &options, GeneratorOptions::default());
        assert!(matches!(result, Err(CodegenError::Normalize(_))));
    }

    #[test]
    fn test_hidden_selection_is_empty() {
        let json = json!({
            "id": "1",
            "type": "RECTANGLE",
            "visible": false,
            "width": 1.0,
            "height": 1.0
        });
        let options = NormalizeOptions::default();
        let result =
            convert(&json.to_string(), Framework::Flutter, &options, GeneratorOptions::default());
        assert!(matches!(result, Err(CodegenError::EmptySelection)));
    }

    #[test]
    fn test_framework_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Framework::SwiftUi).unwrap(), "\"swiftui\"");
        let framework: Framework = serde_json::from_str("\"tailwind\"").unwrap();
        assert_eq!(framework, Framework::Tailwind);
    }
}
