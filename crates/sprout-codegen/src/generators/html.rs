//! HTML generator with inline CSS.
//!
//! Flow containers become flexbox; free-form containers become a relative box
//! whose children are absolutely positioned at their parent-relative offsets.

use sprout_core::{
    Axis, CornerRadii, Effect, GradientPaint, Mixed, Paint, StrokeAlign, TextAlignHorizontal,
    TextCase, TextDecoration, TextRun,
};
use sprout_layout::{
    css_gradient_degrees, gradient_angle, resolve_axis_sizing, Alignment, AxisSizing,
    Distribution, Flow, NodeIndex, NodeKind, NormalizedNode, NormalizedTree,
};
use sprout_normalize::ConversionContext;

use super::style::{
    css_color, escape_html, fmt_num, font_weight, solid_fill, stop_colors, text_runs,
};
use super::templates::TemplateEngine;
use super::{ensure_selection, CodeGenerator, FileTemplate, GeneratorOptions};
use crate::error::Result;

const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{title_case name}}</title>
</head>
<body>
  <div class="{{kebab_case name}}">
{{indent body 4}}
  </div>
</body>
</html>
"#;

/// Placeholder color for image fills.
const IMAGE_PLACEHOLDER: &str = "#D9D9D9";

type Declarations = Vec<(&'static str, String)>;

/// HTML + inline CSS generator.
pub struct HtmlGenerator {
    engine: TemplateEngine<'static>,
    options: GeneratorOptions,
}

impl HtmlGenerator {
    pub fn new() -> Result<Self> {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("html_document", DOCUMENT_TEMPLATE)?;
        Ok(Self { engine, options })
    }

    fn write_node(
        &self,
        tree: &NormalizedTree,
        ctx: &ConversionContext,
        index: NodeIndex,
        indent: usize,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let node = tree.node(index)?;
        let parent_flow = tree.parent(index).map(NormalizedNode::flow);
        let spaces = " ".repeat(indent);

        let mut css = Declarations::new();
        position(node, parent_flow, &mut css);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            sizing(resolve_axis_sizing(tree, index, axis)?, axis, parent_flow, &mut css);
        }
        if let Some(layout) = node.layout() {
            if let Some(main) = layout.flow.main_axis() {
                css.push(("display", "flex".to_string()));
                css.push((
                    "flex-direction",
                    if main == Axis::Horizontal { "row" } else { "column" }.to_string(),
                ));
                if layout.item_spacing > 0.0 {
                    css.push(("gap", format!("{}px", fmt_num(layout.item_spacing))));
                }
                css.push(("justify-content", justify(layout.distribution).to_string()));
                css.push(("align-items", align(layout.alignment).to_string()));
            }
            if !layout.padding.is_zero() {
                let p = &layout.padding;
                css.push((
                    "padding",
                    format!(
                        "{}px {}px {}px {}px",
                        fmt_num(p.top),
                        fmt_num(p.right),
                        fmt_num(p.bottom),
                        fmt_num(p.left)
                    ),
                ));
            }
            if layout.clips_content {
                css.push(("overflow", "hidden".to_string()));
            }
        }
        appearance(node, &mut css);

        let attrs = format!(
            " data-name=\"{}\" style=\"{}\"",
            escape_html(node.name()),
            declarations(&css)
        );

        match &node.kind {
            NodeKind::Text(content) => {
                let runs = text_runs(node, ctx);
                let mut text_css = Declarations::new();
                text_css.push(("margin", "0".to_string()));
                if let Some(align) = text_align(content.align_horizontal) {
                    text_css.push(("text-align", align.to_string()));
                }
                let inner = match runs {
                    [single] => {
                        text_css.extend(run_declarations(single));
                        escape_html(&single.characters)
                    }
                    [] => escape_html(&content.characters),
                    _ => runs
                        .iter()
                        .map(|run| {
                            format!(
                                "<span style=\"{}\">{}</span>",
                                declarations(&run_declarations(run)),
                                escape_html(&run.characters)
                            )
                        })
                        .collect(),
                };
                css.extend(text_css);
                lines.push(format!(
                    "{}<p data-name=\"{}\" style=\"{}\">{}</p>",
                    spaces,
                    escape_html(node.name()),
                    declarations(&css),
                    inner
                ));
            }
            NodeKind::Container(_) | NodeKind::Group => {
                lines.push(format!("{}<div{}>", spaces, attrs));
                for &child in &node.children {
                    self.write_node(tree, ctx, child, indent + 2, lines)?;
                }
                lines.push(format!("{}</div>", spaces));
            }
            _ => lines.push(format!("{}<div{}></div>", spaces, attrs)),
        }
        Ok(())
    }
}

impl CodeGenerator for HtmlGenerator {
    fn framework_name(&self) -> &'static str {
        "HTML"
    }

    fn generate_body(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String> {
        ensure_selection(tree)?;
        let mut lines = Vec::new();
        for &root in tree.roots() {
            self.write_node(tree, ctx, root, 0, &mut lines)?;
        }
        Ok(lines.join("\n"))
    }

    fn generate(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String> {
        let body = self.generate_body(tree, ctx)?;
        if !self.options.wrap_in_file {
            return Ok(body);
        }
        self.engine.render(
            "html_document",
            &FileTemplate { name: &self.options.component_name, body: &body },
        )
    }
}

fn declarations(css: &Declarations) -> String {
    css.iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ")
}

fn position(node: &NormalizedNode, parent_flow: Option<Flow>, css: &mut Declarations) {
    let free_form_parent = parent_flow == Some(Flow::None);
    let hosts_absolute_children = !node.children.is_empty() && !node.flow().is_flow();

    if free_form_parent {
        let geometry = node.geometry();
        css.push(("position", "absolute".to_string()));
        css.push(("left", format!("{}px", fmt_num(geometry.x))));
        css.push(("top", format!("{}px", fmt_num(geometry.y))));
    } else if hosts_absolute_children {
        css.push(("position", "relative".to_string()));
    }

    let rotation = node.geometry().rotation;
    if node.geometry().is_rotated() {
        css.push(("transform", format!("rotate({}deg)", fmt_num(-rotation))));
        css.push(("transform-origin", "top left".to_string()));
    }
}

fn sizing(sizing: AxisSizing, axis: Axis, parent_flow: Option<Flow>, css: &mut Declarations) {
    let property = match axis {
        Axis::Horizontal => "width",
        Axis::Vertical => "height",
    };
    match sizing {
        AxisSizing::Fixed(length) => css.push((property, format!("{}px", fmt_num(length)))),
        AxisSizing::Hug => css.push((property, "fit-content".to_string())),
        AxisSizing::Fill => {
            if parent_flow.and_then(|flow| flow.main_axis()) == Some(axis) {
                css.push(("flex", "1 1 0".to_string()));
            } else {
                css.push(("align-self", "stretch".to_string()));
            }
        }
    }
}

fn justify(distribution: Distribution) -> &'static str {
    match distribution {
        Distribution::Start => "flex-start",
        Distribution::Center => "center",
        Distribution::End => "flex-end",
        Distribution::SpaceBetween => "space-between",
    }
}

fn align(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Start => "flex-start",
        Alignment::Center => "center",
        Alignment::End => "flex-end",
        Alignment::Baseline => "baseline",
    }
}

fn text_align(align: TextAlignHorizontal) -> Option<&'static str> {
    match align {
        TextAlignHorizontal::Left => None,
        TextAlignHorizontal::Center => Some("center"),
        TextAlignHorizontal::Right => Some("right"),
        TextAlignHorizontal::Justified => Some("justify"),
    }
}

fn css_stops(gradient: &GradientPaint) -> String {
    gradient
        .stops
        .iter()
        .zip(stop_colors(gradient))
        .map(|(stop, color)| format!("{} {}%", css_color(&color), fmt_num(stop.position * 100.0)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn background(paint: &Paint) -> Option<(&'static str, String)> {
    match paint {
        Paint::Solid { .. } => paint
            .solid_color()
            .map(|color| ("background-color", css_color(&color))),
        Paint::LinearGradient(gradient) => {
            let degrees = css_gradient_degrees(gradient_angle(&gradient.transform));
            let value =
                format!("linear-gradient({}deg, {})", fmt_num(degrees), css_stops(gradient));
            Some(("background", value))
        }
        Paint::RadialGradient(gradient) => {
            Some(("background", format!("radial-gradient({})", css_stops(gradient))))
        }
        Paint::AngularGradient(gradient) => {
            Some(("background", format!("conic-gradient({})", css_stops(gradient))))
        }
        Paint::Image(_) => Some(("background-color", IMAGE_PLACEHOLDER.to_string())),
    }
}

fn appearance(node: &NormalizedNode, css: &mut Declarations) {
    let props = &node.props;
    let is_text = matches!(node.kind, NodeKind::Text(_));

    if !is_text {
        // Topmost paint wins
        if let Some(declaration) = props.fills.iter().rev().find_map(background) {
            css.push(declaration);
        }
    }

    if let (Some(color), Mixed::Known(weight)) = (solid_fill(&props.strokes), props.stroke_weight) {
        if weight > 0.0 {
            let value = format!("{}px solid {}", fmt_num(weight), css_color(&color));
            match (&node.kind, props.stroke_align) {
                (NodeKind::Line, _) => css.push(("border-top", value)),
                (_, StrokeAlign::Outside) => css.push(("outline", value)),
                _ => {
                    css.push(("border", value));
                    css.push(("box-sizing", "border-box".to_string()));
                }
            }
        }
    }

    match (&node.kind, props.corner_radii) {
        (NodeKind::Ellipse, _) => css.push(("border-radius", "50%".to_string())),
        (_, radii) if radii.is_zero() => {}
        (_, CornerRadii::Uniform(r)) => css.push(("border-radius", format!("{}px", fmt_num(r)))),
        (_, CornerRadii::PerCorner { top_left, top_right, bottom_right, bottom_left }) => css.push((
            "border-radius",
            format!(
                "{}px {}px {}px {}px",
                fmt_num(top_left),
                fmt_num(top_right),
                fmt_num(bottom_right),
                fmt_num(bottom_left)
            ),
        )),
    }

    if props.opacity < 1.0 {
        css.push(("opacity", fmt_num(props.opacity)));
    }
    if let Some(keyword) = props.blend_mode.css_keyword() {
        css.push(("mix-blend-mode", keyword.to_string()));
    }

    let mut shadows = Vec::new();
    for effect in &props.effects {
        match effect {
            Effect::DropShadow(s) | Effect::InnerShadow(s) => shadows.push(format!(
                "{}{}px {}px {}px {}px {}",
                if matches!(effect, Effect::InnerShadow(_)) { "inset " } else { "" },
                fmt_num(s.offset.x),
                fmt_num(s.offset.y),
                fmt_num(s.radius),
                fmt_num(s.spread),
                css_color(&s.color)
            )),
            Effect::LayerBlur(b) => css.push(("filter", format!("blur({}px)", fmt_num(b.radius)))),
            Effect::BackgroundBlur(b) => {
                css.push(("backdrop-filter", format!("blur({}px)", fmt_num(b.radius))))
            }
        }
    }
    if !shadows.is_empty() {
        let property = if is_text { "text-shadow" } else { "box-shadow" };
        css.push((property, shadows.join(", ")));
    }
}

fn run_declarations(run: &TextRun) -> Declarations {
    let mut css = Declarations::new();
    css.push(("font-family", format!("'{}'", run.font.family)));
    css.push(("font-size", format!("{}px", fmt_num(run.font_size))));
    if run.font_weight != 400 {
        css.push(("font-weight", font_weight(run.font_weight).to_string()));
    }
    if run.font.is_italic() {
        css.push(("font-style", "italic".to_string()));
    }
    if let Some(line_height) = run.line_height.to_px(run.font_size) {
        css.push(("line-height", format!("{}px", fmt_num(line_height))));
    }
    let spacing = run.letter_spacing.to_px(run.font_size);
    if spacing != 0.0 {
        css.push(("letter-spacing", format!("{}px", fmt_num(spacing))));
    }
    match run.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => css.push(("text-decoration", "underline".to_string())),
        TextDecoration::Strikethrough => css.push(("text-decoration", "line-through".to_string())),
    }
    match run.case {
        TextCase::Original => {}
        TextCase::Upper => css.push(("text-transform", "uppercase".to_string())),
        TextCase::Lower => css.push(("text-transform", "lowercase".to_string())),
        TextCase::Title => css.push(("text-transform", "capitalize".to_string())),
        TextCase::SmallCaps | TextCase::SmallCapsForced => {
            css.push(("font-variant", "small-caps".to_string()))
        }
    }
    if let Some(color) = solid_fill(&run.fills) {
        css.push(("color", css_color(&color)));
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sprout_normalize::{normalize_json, NormalizeOptions};

    fn generate(selection: serde_json::Value) -> String {
        let mut ctx = ConversionContext::new();
        let normalize = NormalizeOptions::default();
        let tree = normalize_json(&selection.to_string(), &normalize, &mut ctx).unwrap();
        let options = GeneratorOptions::default().body_only();
        let generator = HtmlGenerator::with_options(options).unwrap();
        generator.generate(&tree, &ctx).unwrap()
    }

    #[test]
    fn test_inferred_row_becomes_flexbox() {
        let html = generate(json!({
            "id": "1:1",
            "name": "Row",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [
                { "id": "a", "type": "RECTANGLE", "width": 40.0, "height": 100.0 },
                { "id": "b", "type": "RECTANGLE", "x": 60.0, "width": 40.0, "height": 100.0 }
            ]
        }));

        assert!(html.contains("display: flex; flex-direction: row; gap: 20px"));
        assert!(html.contains("width: 40px; height: 100px"));
        assert!(!html.contains("position: absolute"));
    }

    #[test]
    fn test_free_form_children_are_absolute() {
        let html = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [
                { "id": "a", "type": "ELLIPSE", "x": 0.0, "y": 0.0, "width": 50.0, "height": 50.0 },
                {
                    "id": "b",
                    "type": "ELLIPSE",
                    "x": 10.0,
                    "y": 10.0,
                    "width": 50.0,
                    "height": 50.0
                }
            ]
        }));

        assert!(html.contains("position: relative"));
        assert!(html.contains("position: absolute; left: 10px; top: 10px"));
        assert!(html.contains("border-radius: 50%"));
    }

    #[test]
    fn test_fill_and_hug() {
        let html = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 300.0,
            "height": 100.0,
            "layoutMode": "HORIZONTAL",
            "primaryAxisSizingMode": "AUTO",
            "children": [
                {
                    "id": "a",
                    "type": "RECTANGLE",
                    "width": 40.0,
                    "height": 10.0,
                    "layoutGrow": 1.0,
                    "layoutAlign": "STRETCH"
                }
            ]
        }));

        assert!(html.contains("width: fit-content"));
        assert!(html.contains("flex: 1 1 0"));
        assert!(html.contains("align-self: stretch"));
    }

    #[test]
    fn test_linear_gradient_angle() {
        let html = generate(json!([{
            "id": "g",
            "type": "RECTANGLE",
            "width": 10.0,
            "height": 10.0,
            "fills": [{
                "type": "GRADIENT_LINEAR",
                "gradientStops": [
                    { "position": 0.0, "color": { "r": 1.0, "g": 0.0, "b": 0.0 } },
                    { "position": 1.0, "color": { "r": 0.0, "g": 0.0, "b": 1.0 } }
                ]
            }]
        }]));

        assert!(html.contains("linear-gradient(90deg, #FF0000 0%, #0000FF 100%)"));
    }

    #[test]
    fn test_text_runs_become_spans() {
        let html = generate(json!([{
            "id": "t",
            "type": "TEXT",
            "width": 100.0,
            "height": 20.0,
            "characters": "Hi <you>",
            "styledSegments": [
                { "characters": "Hi ", "fontSize": 12.0 },
                { "characters": "<you>", "fontSize": 12.0, "fontWeight": 700 }
            ]
        }]));

        assert!(html.contains("<span style=\"font-family: 'Inter'; font-size: 12px\">Hi </span>"));
        assert!(html.contains("font-weight: 700\">&lt;you&gt;</span>"));
    }

    #[test]
    fn test_document_wrapper() {
        let mut ctx = ConversionContext::new();
        let tree = normalize_json(
            &json!({ "id": "r", "type": "RECTANGLE", "width": 1.0, "height": 1.0 }).to_string(),
            &NormalizeOptions::default(),
            &mut ctx,
        )
        .unwrap();
        let options = GeneratorOptions::default().with_component_name("profile card");
        let generator = HtmlGenerator::with_options(options).unwrap();
        let html = generator.generate(&tree, &ctx).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Profile Card</title>"));
        assert!(html.contains("<div class=\"profile-card\">"));
    }
}
