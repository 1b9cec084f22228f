//! Template engine for file wrappers.

use convert_case::{Case, Casing};
use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;

use crate::error::Result;

handlebars_helper!(pascal_case: |s: str| s.to_case(Case::Pascal));
handlebars_helper!(camel_case: |s: str| s.to_case(Case::Camel));
handlebars_helper!(snake_case: |s: str| s.to_case(Case::Snake));
handlebars_helper!(kebab_case: |s: str| s.to_case(Case::Kebab));
handlebars_helper!(title_case: |s: str| s.to_case(Case::Title));

// Indent every non-blank line by the given number of spaces.
handlebars_helper!(indent: |content: str, spaces: u64| indent_lines(content, spaces as usize));
// Indent every line but the first, for output that continues an existing line.
handlebars_helper!(hang: |content: str, spaces: u64| hang_lines(content, spaces as usize));

/// Template engine using Handlebars.
///
/// Output is code, not HTML, so values are written unescaped.
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("pascal_case", Box::new(pascal_case));
        handlebars.register_helper("camel_case", Box::new(camel_case));
        handlebars.register_helper("snake_case", Box::new(snake_case));
        handlebars.register_helper("kebab_case", Box::new(kebab_case));
        handlebars.register_helper("title_case", Box::new(title_case));
        handlebars.register_helper("indent", Box::new(indent));
        handlebars.register_helper("hang", Box::new(hang));
        Self { handlebars }
    }

    /// Register a named template.
    pub fn register_template(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars.register_template_string(name, template)?;
        Ok(())
    }

    /// Render a named template.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        Ok(self.handlebars.render(name, data)?)
    }

    /// Render a template string directly.
    pub fn render_string<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

impl<'a> Default for TemplateEngine<'a> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn indent_lines(content: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn hang_lines(content: &str, spaces: usize) -> String {
    match content.split_once('\n') {
        Some((first, rest)) => format!("{}\n{}", first, indent_lines(rest, spaces)),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_registered_template() {
        let mut engine = TemplateEngine::new();
        engine.register_template("hello", "Hello, {{name}}!").unwrap();

        let result = engine.render("hello", &json!({"name": "<World>"})).unwrap();
        assert_eq!(result, "Hello, <World>!");
    }

    #[test]
    fn test_case_helpers() {
        let engine = TemplateEngine::new();
        let data = json!({"name": "profile card"});
        assert_eq!(engine.render_string("{{pascal_case name}}", &data).unwrap(), "ProfileCard");
        assert_eq!(engine.render_string("{{camel_case name}}", &data).unwrap(), "profileCard");
        assert_eq!(engine.render_string("{{kebab_case name}}", &data).unwrap(), "profile-card");
    }

    #[test]
    fn test_indent_helper() {
        let engine = TemplateEngine::new();
        let result = engine
            .render_string("{{indent body 2}}", &json!({"body": "a\n\nb"}))
            .unwrap();
        assert_eq!(result, "  a\n\n  b");
    }

    #[test]
    fn test_hang_helper() {
        let engine = TemplateEngine::new();
        let result = engine
            .render_string("return {{hang body 4}};", &json!({"body": "Row(\n  a,\n)"}))
            .unwrap();
        assert_eq!(result, "return Row(\n      a,\n    );");
    }

    #[test]
    fn test_invalid_template_is_rejected() {
        let mut engine = TemplateEngine::new();
        assert!(engine.register_template("broken", "{{#if}}").is_err());
    }
}
