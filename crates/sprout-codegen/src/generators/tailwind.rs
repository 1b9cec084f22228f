//! HTML generator with Tailwind utility classes.
//!
//! Values outside Tailwind's scale use arbitrary-value brackets, so the output
//! stays pixel-exact without a custom theme.

use sprout_core::{
    Axis, Color, CornerRadii, Effect, GradientPaint, Mixed, Paint, StrokeAlign,
    TextAlignHorizontal, TextCase, TextDecoration, TextRun,
};
use sprout_layout::{
    resolve_axis_sizing, Alignment, AxisSizing, Distribution, Flow, NodeIndex, NodeKind,
    NormalizedNode, NormalizedTree,
};
use sprout_normalize::ConversionContext;

use super::style::{
    css_color, escape_html, fmt_num, font_weight, linear_gradient, solid_fill, stop_colors,
    text_runs,
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
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body>
  <div class="{{kebab_case name}}">
{{indent body 4}}
  </div>
</body>
</html>
"#;

/// HTML + Tailwind CSS generator.
pub struct TailwindGenerator {
    engine: TemplateEngine<'static>,
    options: GeneratorOptions,
}

impl TailwindGenerator {
    pub fn new() -> Result<Self> {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("tailwind_document", DOCUMENT_TEMPLATE)?;
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

        let mut classes = Vec::new();
        position_classes(node, parent_flow, &mut classes);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let sizing = resolve_axis_sizing(tree, index, axis)?;
            sizing_classes(sizing, axis, parent_flow, &mut classes);
        }
        if let Some(layout) = node.layout() {
            if let Some(main) = layout.flow.main_axis() {
                classes.push("flex".to_string());
                let direction = match main {
                    Axis::Horizontal => "flex-row",
                    Axis::Vertical => "flex-col",
                };
                classes.push(direction.to_string());
                if layout.item_spacing > 0.0 {
                    classes.push(format!("gap-[{}px]", fmt_num(layout.item_spacing)));
                }
                classes.push(justify(layout.distribution).to_string());
                classes.push(items(layout.alignment).to_string());
            }
            let p = &layout.padding;
            if p.is_uniform() && !p.is_zero() {
                classes.push(format!("p-[{}px]", fmt_num(p.top)));
            } else if !p.is_zero() {
                let sides = [("pt", p.top), ("pr", p.right), ("pb", p.bottom), ("pl", p.left)];
                for (prefix, value) in sides {
                    if value > 0.0 {
                        classes.push(format!("{}-[{}px]", prefix, fmt_num(value)));
                    }
                }
            }
            if layout.clips_content {
                classes.push("overflow-hidden".to_string());
            }
        }
        appearance_classes(node, &mut classes);

        let name = escape_html(node.name());
        match &node.kind {
            NodeKind::Text(content) => {
                if let Some(align) = text_align(content.align_horizontal) {
                    classes.push(align.to_string());
                }
                let runs = text_runs(node, ctx);
                let inner = match runs {
                    [single] => {
                        classes.extend(run_classes(single));
                        escape_html(&single.characters)
                    }
                    [] => escape_html(&content.characters),
                    _ => runs
                        .iter()
                        .map(|run| {
                            format!(
                                "<span class=\"{}\">{}</span>",
                                run_classes(run).join(" "),
                                escape_html(&run.characters)
                            )
                        })
                        .collect(),
                };
                lines.push(format!(
                    "{}<p data-name=\"{}\" class=\"{}\">{}</p>",
                    spaces,
                    name,
                    classes.join(" "),
                    inner
                ));
            }
            NodeKind::Container(_) | NodeKind::Group => {
                lines.push(format!(
                    "{}<div data-name=\"{}\" class=\"{}\">",
                    spaces,
                    name,
                    classes.join(" ")
                ));
                for &child in &node.children {
                    self.write_node(tree, ctx, child, indent + 2, lines)?;
                }
                lines.push(format!("{}</div>", spaces));
            }
            _ => lines.push(format!(
                "{}<div data-name=\"{}\" class=\"{}\"></div>",
                spaces,
                name,
                classes.join(" ")
            )),
        }
        Ok(())
    }
}

impl CodeGenerator for TailwindGenerator {
    fn framework_name(&self) -> &'static str {
        "Tailwind CSS"
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
            "tailwind_document",
            &FileTemplate { name: &self.options.component_name, body: &body },
        )
    }
}

/// Arbitrary values may not contain spaces; Tailwind reads `_` as one.
fn arbitrary(value: &str) -> String {
    value.replace(", ", ",").replace(' ', "_")
}

fn color_value(color: &Color) -> String {
    arbitrary(&css_color(color))
}

fn position_classes(node: &NormalizedNode, parent_flow: Option<Flow>, classes: &mut Vec<String>) {
    let geometry = node.geometry();
    if parent_flow == Some(Flow::None) {
        classes.push("absolute".to_string());
        classes.push(format!("left-[{}px]", fmt_num(geometry.x)));
        classes.push(format!("top-[{}px]", fmt_num(geometry.y)));
    } else if !node.children.is_empty() && !node.flow().is_flow() {
        classes.push("relative".to_string());
    }
    if geometry.is_rotated() {
        classes.push("origin-top-left".to_string());
        classes.push(format!("rotate-[{}deg]", fmt_num(-geometry.rotation)));
    }
}

fn sizing_classes(
    sizing: AxisSizing,
    axis: Axis,
    parent_flow: Option<Flow>,
    classes: &mut Vec<String>,
) {
    let prefix = match axis {
        Axis::Horizontal => "w",
        Axis::Vertical => "h",
    };
    match sizing {
        AxisSizing::Fixed(length) => classes.push(format!("{}-[{}px]", prefix, fmt_num(length))),
        AxisSizing::Hug => classes.push(format!("{}-fit", prefix)),
        AxisSizing::Fill => {
            if parent_flow.and_then(|flow| flow.main_axis()) == Some(axis) {
                classes.push("flex-1".to_string());
            } else {
                classes.push("self-stretch".to_string());
            }
        }
    }
}

fn justify(distribution: Distribution) -> &'static str {
    match distribution {
        Distribution::Start => "justify-start",
        Distribution::Center => "justify-center",
        Distribution::End => "justify-end",
        Distribution::SpaceBetween => "justify-between",
    }
}

fn items(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Start => "items-start",
        Alignment::Center => "items-center",
        Alignment::End => "items-end",
        Alignment::Baseline => "items-baseline",
    }
}

fn text_align(align: TextAlignHorizontal) -> Option<&'static str> {
    match align {
        TextAlignHorizontal::Left => None,
        TextAlignHorizontal::Center => Some("text-center"),
        TextAlignHorizontal::Right => Some("text-right"),
        TextAlignHorizontal::Justified => Some("text-justify"),
    }
}

fn gradient_classes(gradient: &GradientPaint, suffix: &str, classes: &mut Vec<String>) {
    let colors = stop_colors(gradient);
    let (Some(first), Some(last)) = (colors.first(), colors.last()) else {
        return;
    };
    classes.push(format!("bg-gradient-to-{}", suffix));
    classes.push(format!("from-[{}]", color_value(first)));
    // Tailwind has a single `via` stop
    if colors.len() > 2 {
        classes.push(format!("via-[{}]", color_value(&colors[colors.len() / 2])));
    }
    classes.push(format!("to-[{}]", color_value(last)));
}

fn arbitrary_gradient(function: &str, gradient: &GradientPaint) -> String {
    let stops = gradient
        .stops
        .iter()
        .zip(stop_colors(gradient))
        .map(|(stop, color)| format!("{} {}%", css_color(&color), fmt_num(stop.position * 100.0)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("bg-[{}]", arbitrary(&format!("{}({})", function, stops)))
}

fn appearance_classes(node: &NormalizedNode, classes: &mut Vec<String>) {
    let props = &node.props;
    let is_text = matches!(node.kind, NodeKind::Text(_));

    if !is_text {
        if let Some((gradient, direction)) = linear_gradient(&props.fills) {
            gradient_classes(gradient, direction.tailwind_suffix(), classes);
        } else if let Some(paint) = props.fills.last() {
            match paint {
                Paint::Solid { .. } => {
                    if let Some(color) = paint.solid_color() {
                        classes.push(format!("bg-[{}]", color_value(&color)));
                    }
                }
                Paint::RadialGradient(gradient) => {
                    classes.push(arbitrary_gradient("radial-gradient", gradient))
                }
                Paint::AngularGradient(gradient) => {
                    classes.push(arbitrary_gradient("conic-gradient", gradient))
                }
                Paint::Image(_) => classes.push("bg-[#D9D9D9]".to_string()),
                Paint::LinearGradient(_) => {}
            }
        }
    }

    if let (Some(color), Mixed::Known(weight)) = (solid_fill(&props.strokes), props.stroke_weight) {
        if weight > 0.0 {
            let width = fmt_num(weight);
            let color = color_value(&color);
            match (&node.kind, props.stroke_align) {
                (NodeKind::Line, _) => {
                    classes.push(format!("border-t-[{}px]", width));
                    classes.push(format!("border-[{}]", color));
                }
                (_, StrokeAlign::Outside) => {
                    classes.push(format!("outline-[{}px]", width));
                    classes.push(format!("outline-[{}]", color));
                }
                _ => {
                    classes.push(format!("border-[{}px]", width));
                    classes.push(format!("border-[{}]", color));
                }
            }
        }
    }

    match (&node.kind, props.corner_radii) {
        (NodeKind::Ellipse, _) => classes.push("rounded-full".to_string()),
        (_, radii) if radii.is_zero() => {}
        (_, CornerRadii::Uniform(r)) => classes.push(format!("rounded-[{}px]", fmt_num(r))),
        (_, CornerRadii::PerCorner { top_left, top_right, bottom_right, bottom_left }) => {
            let corners = [
                ("tl", top_left),
                ("tr", top_right),
                ("br", bottom_right),
                ("bl", bottom_left),
            ];
            for (corner, r) in corners {
                if r > 0.0 {
                    classes.push(format!("rounded-{}-[{}px]", corner, fmt_num(r)));
                }
            }
        }
    }

    if props.opacity < 1.0 {
        classes.push(format!("opacity-[{}]", fmt_num(props.opacity)));
    }
    if let Some(keyword) = props.blend_mode.css_keyword() {
        classes.push(format!("mix-blend-{}", keyword));
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
            Effect::LayerBlur(b) => classes.push(format!("blur-[{}px]", fmt_num(b.radius))),
            Effect::BackgroundBlur(b) => {
                classes.push(format!("backdrop-blur-[{}px]", fmt_num(b.radius)))
            }
        }
    }
    if !shadows.is_empty() {
        classes.push(format!("shadow-[{}]", arbitrary(&shadows.join(","))));
    }
}

fn weight_class(weight: u16) -> &'static str {
    match font_weight(weight) {
        100 => "font-thin",
        200 => "font-extralight",
        300 => "font-light",
        500 => "font-medium",
        600 => "font-semibold",
        700 => "font-bold",
        800 => "font-extrabold",
        900 => "font-black",
        _ => "font-normal",
    }
}

fn run_classes(run: &TextRun) -> Vec<String> {
    let mut classes = vec![
        format!("font-['{}']", arbitrary(&run.font.family)),
        format!("text-[{}px]", fmt_num(run.font_size)),
    ];
    if run.font_weight != 400 {
        classes.push(weight_class(run.font_weight).to_string());
    }
    if run.font.is_italic() {
        classes.push("italic".to_string());
    }
    if let Some(line_height) = run.line_height.to_px(run.font_size) {
        classes.push(format!("leading-[{}px]", fmt_num(line_height)));
    }
    let spacing = run.letter_spacing.to_px(run.font_size);
    if spacing != 0.0 {
        classes.push(format!("tracking-[{}px]", fmt_num(spacing)));
    }
    match run.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => classes.push("underline".to_string()),
        TextDecoration::Strikethrough => classes.push("line-through".to_string()),
    }
    match run.case {
        TextCase::Original => {}
        TextCase::Upper => classes.push("uppercase".to_string()),
        TextCase::Lower => classes.push("lowercase".to_string()),
        TextCase::Title => classes.push("capitalize".to_string()),
        TextCase::SmallCaps | TextCase::SmallCapsForced => {
            classes.push("[font-variant:small-caps]".to_string())
        }
    }
    if let Some(color) = solid_fill(&run.fills) {
        classes.push(format!("text-[{}]", color_value(&color)));
    }
    classes
}
