//! Flutter widget generator.
//!
//! Every node becomes a widget expression; wrappers (`Opacity`,
//! `Transform.rotate`, `Expanded`, `Positioned`) are applied inside out so the
//! outermost one is what the parent's `children` list sees.

use sprout_core::{
    Axis, Color, CornerRadii, Effect, GradientPaint, Mixed, Paint, StrokeAlign, TextAlignHorizontal,
    TextContent, TextDecoration, TextRun,
};
use sprout_layout::{
    classify_direction, gradient_angle, resolve_axis_sizing, resolve_sizing, Alignment,
    AxisSizing, ContainerLayout, Distribution, Flow, NodeIndex, NodeKind, NormalizedNode,
    NormalizedTree,
};
use sprout_normalize::ConversionContext;

use super::style::{
    apply_case, escape_dart, fmt_num, font_weight, solid_fill, stop_colors, text_runs,
};
use super::templates::{indent_lines, TemplateEngine};
use super::{ensure_selection, CodeGenerator, FileTemplate, GeneratorOptions};
use crate::error::Result;

const WIDGET_TEMPLATE: &str = r#"import 'dart:ui';

import 'package:flutter/material.dart';

class {{pascal_case name}} extends StatelessWidget {
  const {{pascal_case name}}({super.key});

  @override
  Widget build(BuildContext context) {
    return {{hang body 4}};
  }
}
"#;

const IMAGE_PLACEHOLDER: &str = "Color(0xFFD9D9D9)";

/// Flutter widget generator.
pub struct FlutterGenerator {
    engine: TemplateEngine<'static>,
    options: GeneratorOptions,
}

impl FlutterGenerator {
    pub fn new() -> Result<Self> {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("flutter_widget", WIDGET_TEMPLATE)?;
        Ok(Self { engine, options })
    }

    fn widget(
        &self,
        tree: &NormalizedTree,
        ctx: &ConversionContext,
        index: NodeIndex,
    ) -> Result<String> {
        let node = tree.node(index)?;
        let props = &node.props;
        let parent_flow = tree.parent(index).map(NormalizedNode::flow);

        let child = match &node.kind {
            NodeKind::Container(_) | NodeKind::Group => {
                Some(self.layout_widget(tree, ctx, index, node)?)
            }
            NodeKind::Text(content) => Some(text_widget(node, ctx, content)),
            NodeKind::BooleanPlaceholder => Some("const Placeholder()".to_string()),
            _ => None,
        };

        let (horizontal, vertical) = resolve_sizing(tree, index)?;
        // Main-axis fill becomes an `Expanded` wrapper instead of a dimension
        let expanded_axis = parent_flow.and_then(|flow| flow.main_axis()).filter(|&axis| {
            let sizing = match axis {
                Axis::Horizontal => horizontal,
                Axis::Vertical => vertical,
            };
            sizing == AxisSizing::Fill
        });
        let mut args = Vec::new();
        let width = dimension(horizontal).filter(|_| expanded_axis != Some(Axis::Horizontal));
        if let Some(width) = width {
            args.push(format!("width: {}", width));
        }
        let height = dimension(vertical).filter(|_| expanded_axis != Some(Axis::Vertical));
        if let Some(height) = height {
            // A line's box has no height; draw it as thick as its stroke
            let height = match (&node.kind, props.stroke_weight, vertical) {
                (NodeKind::Line, Mixed::Known(weight), AxisSizing::Fixed(h)) => {
                    fmt_num(h.max(weight))
                }
                _ => height,
            };
            args.push(format!("height: {}", height));
        }
        if let Some(padding) = node.layout().and_then(edge_insets) {
            args.push(format!("padding: {}", padding));
        }
        let decoration = box_decoration(node);
        let clips = node
            .layout()
            .is_some_and(|layout| layout.clips_content && layout.flow.is_flow());
        if let Some(decoration) = &decoration {
            if clips {
                args.push("clipBehavior: Clip.antiAlias".to_string());
            }
            args.push(format!("decoration: {}", decoration));
        }

        let mut widget = match child {
            Some(child) if args.is_empty() => child,
            Some(child) => {
                let padded = args.iter().any(|arg| arg.starts_with("padding"));
                let name = if decoration.is_some() || padded {
                    "Container"
                } else {
                    "SizedBox"
                };
                args.push(format!("child: {}", child));
                call(name, args)
            }
            None => call("Container", args),
        };
        if clips && decoration.is_none() {
            widget = call("ClipRect", vec![format!("child: {}", widget)]);
        }

        for effect in &props.effects {
            match effect {
                Effect::LayerBlur(b) => {
                    widget = call(
                        "ImageFiltered",
                        vec![
                            format!("imageFilter: {}", blur_filter(b.radius)),
                            format!("child: {}", widget),
                        ],
                    );
                }
                Effect::BackgroundBlur(b) => {
                    let backdrop = call(
                        "BackdropFilter",
                        vec![
                            format!("filter: {}", blur_filter(b.radius)),
                            format!("child: {}", widget),
                        ],
                    );
                    widget = call("ClipRect", vec![format!("child: {}", backdrop)]);
                }
                // Shadows are part of the decoration
                Effect::DropShadow(_) | Effect::InnerShadow(_) => {}
            }
        }
        if props.opacity < 1.0 {
            widget = call(
                "Opacity",
                vec![
                    format!("opacity: {}", fmt_num(props.opacity)),
                    format!("child: {}", widget),
                ],
            );
        }
        let geometry = node.geometry();
        if geometry.is_rotated() {
            widget = call(
                "Transform.rotate",
                vec![
                    format!("angle: {}", fmt_radians(-geometry.rotation.to_radians())),
                    "alignment: Alignment.topLeft".to_string(),
                    format!("child: {}", widget),
                ],
            );
        }

        match parent_flow {
            Some(Flow::None) => {
                widget = call(
                    "Positioned",
                    vec![
                        format!("left: {}", fmt_num(geometry.x)),
                        format!("top: {}", fmt_num(geometry.y)),
                        format!("child: {}", widget),
                    ],
                );
            }
            Some(_) if expanded_axis.is_some() => {
                let mut expanded = Vec::new();
                let flex = props.layout_grow.round() as i64;
                if flex > 1 {
                    expanded.push(format!("flex: {}", flex));
                }
                expanded.push(format!("child: {}", widget));
                widget = call("Expanded", expanded);
            }
            _ => {}
        }
        Ok(widget)
    }

    fn layout_widget(
        &self,
        tree: &NormalizedTree,
        ctx: &ConversionContext,
        index: NodeIndex,
        node: &NormalizedNode,
    ) -> Result<String> {
        let children = node
            .children
            .iter()
            .map(|&child| self.widget(tree, ctx, child))
            .collect::<Result<Vec<_>>>()?;

        let Some(layout) = node.layout().filter(|layout| layout.flow.is_flow()) else {
            let mut args = Vec::new();
            if !node.layout().is_some_and(|layout| layout.clips_content) {
                args.push("clipBehavior: Clip.none".to_string());
            }
            args.push(format!("children: {}", list(children)));
            return Ok(call("Stack", args));
        };

        let (name, gap) = match layout.flow {
            Flow::Column => ("Column", "height"),
            _ => ("Row", "width"),
        };
        let mut args = Vec::new();
        let main_axis = match layout.distribution {
            Distribution::Start => None,
            Distribution::Center => Some("MainAxisAlignment.center"),
            Distribution::End => Some("MainAxisAlignment.end"),
            Distribution::SpaceBetween => Some("MainAxisAlignment.spaceBetween"),
        };
        if let Some(main_axis) = main_axis {
            args.push(format!("mainAxisAlignment: {}", main_axis));
        }
        let cross_axis = match (layout.alignment, layout.flow) {
            (Alignment::Start, _) => "CrossAxisAlignment.start",
            (Alignment::Center, _) => "CrossAxisAlignment.center",
            (Alignment::End, _) => "CrossAxisAlignment.end",
            (Alignment::Baseline, Flow::Row) => "CrossAxisAlignment.baseline",
            (Alignment::Baseline, _) => "CrossAxisAlignment.start",
        };
        args.push(format!("crossAxisAlignment: {}", cross_axis));
        if cross_axis == "CrossAxisAlignment.baseline" {
            args.push("textBaseline: TextBaseline.alphabetic".to_string());
        }
        let main = layout.flow.main_axis().unwrap_or(Axis::Horizontal);
        if resolve_axis_sizing(tree, index, main)? == AxisSizing::Hug {
            args.push("mainAxisSize: MainAxisSize.min".to_string());
        }

        let spaced = layout.item_spacing > 0.0 && layout.distribution != Distribution::SpaceBetween;
        let mut items = Vec::with_capacity(children.len() * 2);
        for (position, child) in children.into_iter().enumerate() {
            if position > 0 && spaced {
                items.push(format!("SizedBox({}: {})", gap, fmt_num(layout.item_spacing)));
            }
            items.push(child);
        }
        args.push(format!("children: {}", list(items)));
        Ok(call(name, args))
    }
}

impl CodeGenerator for FlutterGenerator {
    fn framework_name(&self) -> &'static str {
        "Flutter"
    }

    fn generate_body(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String> {
        ensure_selection(tree)?;
        match tree.roots() {
            [root] => self.widget(tree, ctx, *root),
            roots => {
                let widgets = roots
                    .iter()
                    .map(|&root| self.widget(tree, ctx, root))
                    .collect::<Result<Vec<_>>>()?;
                Ok(call(
                    "Column",
                    vec![
                        "crossAxisAlignment: CrossAxisAlignment.start".to_string(),
                        "mainAxisSize: MainAxisSize.min".to_string(),
                        format!("children: {}", list(widgets)),
                    ],
                ))
            }
        }
    }

    fn generate(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String> {
        let body = self.generate_body(tree, ctx)?;
        if !self.options.wrap_in_file {
            return Ok(body);
        }
        self.engine.render(
            "flutter_widget",
            &FileTemplate { name: &self.options.component_name, body: &body },
        )
    }
}

/// A constructor call with one named argument per line and trailing commas.
fn call(name: &str, args: Vec<String>) -> String {
    if args.is_empty() {
        return format!("{}()", name);
    }
    let mut out = format!("{}(\n", name);
    for arg in args {
        out.push_str(&indent_lines(&arg, 2));
        out.push_str(",\n");
    }
    out.push(')');
    out
}

fn list(items: Vec<String>) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    let mut out = "[\n".to_string();
    for item in items {
        out.push_str(&indent_lines(&item, 2));
        out.push_str(",\n");
    }
    out.push(']');
    out
}

fn fmt_radians(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    format!("{}", rounded)
}

fn dimension(sizing: AxisSizing) -> Option<String> {
    match sizing {
        AxisSizing::Fixed(length) => Some(fmt_num(length)),
        AxisSizing::Fill => Some("double.infinity".to_string()),
        AxisSizing::Hug => None,
    }
}

fn dart_color(color: &Color) -> String {
    let (r, g, b, a) = color.to_rgba8();
    format!("Color(0x{:02X}{:02X}{:02X}{:02X})", a, r, g, b)
}

fn blur_filter(radius: f64) -> String {
    let sigma = fmt_num(radius / 2.0);
    format!("ImageFilter.blur(sigmaX: {}, sigmaY: {})", sigma, sigma)
}

fn edge_insets(layout: &ContainerLayout) -> Option<String> {
    let p = &layout.padding;
    if p.is_zero() {
        None
    } else if p.is_uniform() {
        Some(format!("const EdgeInsets.all({})", fmt_num(p.top)))
    } else {
        Some(format!(
            "const EdgeInsets.fromLTRB({}, {}, {}, {})",
            fmt_num(p.left),
            fmt_num(p.top),
            fmt_num(p.right),
            fmt_num(p.bottom)
        ))
    }
}

fn gradient(name: &str, gradient: &GradientPaint, extra: Vec<String>) -> String {
    let colors = stop_colors(gradient)
        .iter()
        .map(dart_color)
        .collect::<Vec<_>>()
        .join(", ");
    let stops = gradient
        .stops
        .iter()
        .map(|stop| fmt_num(stop.position))
        .collect::<Vec<_>>()
        .join(", ");
    let mut args = extra;
    args.push(format!("colors: [{}]", colors));
    args.push(format!("stops: [{}]", stops));
    call(name, args)
}

fn box_decoration(node: &NormalizedNode) -> Option<String> {
    let props = &node.props;
    let mut args = Vec::new();

    match &node.kind {
        NodeKind::Text(_) | NodeKind::BooleanPlaceholder => return None,
        NodeKind::Line => {
            if let Some(color) = solid_fill(&props.strokes) {
                args.push(format!("color: {}", dart_color(&color)));
            }
        }
        _ => match props.fills.last() {
            Some(paint @ Paint::Solid { .. }) => {
                if let Some(color) = paint.solid_color() {
                    args.push(format!("color: {}", dart_color(&color)));
                }
            }
            Some(Paint::LinearGradient(g)) => {
                let direction = classify_direction(gradient_angle(&g.transform));
                let (begin, end) = direction.flutter_alignments();
                let ends = vec![format!("begin: {}", begin), format!("end: {}", end)];
                args.push(format!("gradient: {}", gradient("LinearGradient", g, ends)));
            }
            Some(Paint::RadialGradient(g)) => {
                args.push(format!("gradient: {}", gradient("RadialGradient", g, Vec::new())))
            }
            Some(Paint::AngularGradient(g)) => {
                args.push(format!("gradient: {}", gradient("SweepGradient", g, Vec::new())))
            }
            Some(Paint::Image(_)) => args.push(format!("color: {}", IMAGE_PLACEHOLDER)),
            None => {}
        },
    }

    if node.kind != NodeKind::Line {
        let stroke = (solid_fill(&props.strokes), props.stroke_weight);
        if let (Some(color), Mixed::Known(weight)) = stroke {
            if weight > 0.0 {
                let mut border = vec![
                    format!("color: {}", dart_color(&color)),
                    format!("width: {}", fmt_num(weight)),
                ];
                let align = match props.stroke_align {
                    StrokeAlign::Inside => None,
                    StrokeAlign::Center => Some("strokeAlign: BorderSide.strokeAlignCenter"),
                    StrokeAlign::Outside => Some("strokeAlign: BorderSide.strokeAlignOutside"),
                };
                border.extend(align.map(str::to_string));
                args.push(format!("border: Border.all({})", border.join(", ")));
            }
        }
    }

    let geometry = node.geometry();
    match (&node.kind, props.corner_radii) {
        (NodeKind::Ellipse, _) => args.push(format!(
            "borderRadius: BorderRadius.all(Radius.elliptical({}, {}))",
            fmt_num(geometry.width / 2.0),
            fmt_num(geometry.height / 2.0)
        )),
        (_, radii) if radii.is_zero() => {}
        (_, CornerRadii::Uniform(r)) => {
            args.push(format!("borderRadius: BorderRadius.circular({})", fmt_num(r)))
        }
        (_, CornerRadii::PerCorner { top_left, top_right, bottom_right, bottom_left }) => {
            args.push(format!(
                concat!(
                    "borderRadius: const BorderRadius.only(",
                    "topLeft: Radius.circular({}), topRight: Radius.circular({}), ",
                    "bottomRight: Radius.circular({}), bottomLeft: Radius.circular({}))"
                ),
                fmt_num(top_left),
                fmt_num(top_right),
                fmt_num(bottom_right),
                fmt_num(bottom_left)
            ))
        }
    }

    let shadows = props
        .effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::DropShadow(s) => Some(format!(
                "BoxShadow(color: {}, offset: Offset({}, {}), blurRadius: {}, spreadRadius: {})",
                dart_color(&s.color),
                fmt_num(s.offset.x),
                fmt_num(s.offset.y),
                fmt_num(s.radius),
                fmt_num(s.spread)
            )),
            _ => None,
        })
        .collect::<Vec<_>>();
    if !shadows.is_empty() {
        args.push(format!("boxShadow: {}", list(shadows)));
    }

    if args.is_empty() {
        None
    } else {
        Some(call("BoxDecoration", args))
    }
}

fn text_style(run: &TextRun) -> String {
    let mut args = vec![
        format!("fontFamily: '{}'", escape_dart(&run.font.family)),
        format!("fontSize: {}", fmt_num(run.font_size)),
    ];
    if run.font_weight != 400 {
        args.push(format!("fontWeight: FontWeight.w{}", font_weight(run.font_weight)));
    }
    if run.font.is_italic() {
        args.push("fontStyle: FontStyle.italic".to_string());
    }
    if let Some(line_height) = run.line_height.to_px(run.font_size) {
        if run.font_size > 0.0 {
            args.push(format!("height: {}", fmt_num(line_height / run.font_size)));
        }
    }
    let spacing = run.letter_spacing.to_px(run.font_size);
    if spacing != 0.0 {
        args.push(format!("letterSpacing: {}", fmt_num(spacing)));
    }
    match run.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => args.push("decoration: TextDecoration.underline".to_string()),
        TextDecoration::Strikethrough => {
            args.push("decoration: TextDecoration.lineThrough".to_string())
        }
    }
    if let Some(color) = solid_fill(&run.fills) {
        args.push(format!("color: {}", dart_color(&color)));
    }
    format!("TextStyle({})", args.join(", "))
}

fn text_widget(node: &NormalizedNode, ctx: &ConversionContext, content: &TextContent) -> String {
    let align = match content.align_horizontal {
        TextAlignHorizontal::Left => None,
        TextAlignHorizontal::Center => Some("textAlign: TextAlign.center".to_string()),
        TextAlignHorizontal::Right => Some("textAlign: TextAlign.right".to_string()),
        TextAlignHorizontal::Justified => Some("textAlign: TextAlign.justify".to_string()),
    };

    let mut args = Vec::new();
    let name = match text_runs(node, ctx) {
        [] => {
            args.push(format!("'{}'", escape_dart(&content.characters)));
            "Text"
        }
        [run] => {
            args.push(format!("'{}'", escape_dart(&apply_case(&run.characters, run.case))));
            args.push(format!("style: {}", text_style(run)));
            "Text"
        }
        runs => {
            let spans = runs
                .iter()
                .map(|run| {
                    format!(
                        "TextSpan(text: '{}', style: {})",
                        escape_dart(&apply_case(&run.characters, run.case)),
                        text_style(run)
                    )
                })
                .collect();
            args.push(call("TextSpan", vec![format!("children: {}", list(spans))]));
            "Text.rich"
        }
    };
    args.extend(align);
    call(name, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sprout_normalize::{normalize_json, NormalizeOptions};

    fn generate_with(selection: serde_json::Value, options: GeneratorOptions) -> String {
        let mut ctx = ConversionContext::new();
        let normalize = NormalizeOptions::default();
        let tree = normalize_json(&selection.to_string(), &normalize, &mut ctx).unwrap();
        FlutterGenerator::with_options(options).unwrap().generate(&tree, &ctx).unwrap()
    }

    fn generate(selection: serde_json::Value) -> String {
        generate_with(selection, GeneratorOptions::default().body_only())
    }

    #[test]
    fn test_inferred_row() {
        let dart = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [
                { "id": "a", "type": "RECTANGLE", "width": 40.0, "height": 100.0 },
                { "id": "b", "type": "RECTANGLE", "x": 60.0, "width": 40.0, "height": 100.0 }
            ]
        }));

        let expected = "\
SizedBox(
  width: 100,
  height: 100,
  child: Row(
    crossAxisAlignment: CrossAxisAlignment.start,
    children: [
      Container(
        width: 40,
        height: 100,
      ),
      SizedBox(width: 20),
      Container(
        width: 40,
        height: 100,
      ),
    ],
  ),
)";
        assert_eq!(dart, expected);
    }

    #[test]
    fn test_free_form_is_stack() {
        let dart = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "clipsContent": true,
            "children": [
                { "id": "a", "type": "ELLIPSE", "width": 50.0, "height": 50.0 },
                {
                    "id": "b",
                    "type": "RECTANGLE",
                    "x": 10.0,
                    "y": 20.0,
                    "width": 50.0,
                    "height": 50.0,
                    "fills": [{
                        "type": "SOLID",
                        "color": { "r": 1.0, "g": 0.0, "b": 0.0 },
                        "opacity": 0.5
                    }]
                }
            ]
        }));

        assert!(dart.contains("child: Stack(\n    children: ["));
        assert!(dart.contains("Positioned(\n        left: 10,\n        top: 20,"));
        assert!(dart.contains("color: Color(0x80FF0000)"));
        assert!(dart.contains("borderRadius: BorderRadius.all(Radius.elliptical(25, 25))"));
    }

    #[test]
    fn test_fill_children() {
        let dart = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 300.0,
            "height": 100.0,
            "layoutMode": "VERTICAL",
            "primaryAxisSizingMode": "AUTO",
            "paddingTop": 8.0,
            "paddingBottom": 8.0,
            "children": [
                {
                    "id": "a",
                    "type": "RECTANGLE",
                    "width": 20.0,
                    "height": 20.0,
                    "layoutAlign": "STRETCH"
                },
                {
                    "id": "b",
                    "type": "RECTANGLE",
                    "y": 20.0,
                    "width": 20.0,
                    "height": 20.0,
                    "layoutGrow": 2.0
                }
            ]
        }));

        assert!(dart.starts_with(
            "Container(\n  width: 300,\n  padding: const EdgeInsets.fromLTRB(0, 8, 0, 8),"
        ));
        assert!(dart.contains("mainAxisSize: MainAxisSize.min"));
        assert!(dart.contains("width: double.infinity"));
        assert!(dart.contains("Expanded(\n        flex: 2,"));
    }

    #[test]
    fn test_grow_in_row_drops_main_axis_width() {
        let dart = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 300.0,
            "height": 40.0,
            "layoutMode": "HORIZONTAL",
            "children": [
                { "id": "a", "type": "RECTANGLE", "width": 20.0, "height": 20.0 },
                {
                    "id": "b",
                    "type": "RECTANGLE",
                    "x": 20.0,
                    "width": 35.0,
                    "height": 25.0,
                    "layoutGrow": 1.0
                }
            ]
        }));

        assert!(dart.contains("child: Row("));
        assert!(dart.contains("width: 20"));
        assert!(!dart.contains("width: 35"));
        assert!(dart.contains("height: 25"));
        assert!(dart.contains("Expanded("));
        assert!(!dart.contains("flex:"));
    }

    #[test]
    fn test_rich_text() {
        let dart = generate(json!([{
            "id": "t",
            "type": "TEXT",
            "width": 100.0,
            "height": 20.0,
            "characters": "It's $5",
            "textAlignHorizontal": "RIGHT",
            "styledSegments": [
                { "characters": "It's ", "fontSize": 14.0 },
                { "characters": "$5", "fontSize": 14.0, "fontWeight": 700 }
            ]
        }]));

        assert!(dart.contains("child: Text.rich("));
        assert!(dart.contains(
            "TextSpan(text: 'It\\'s ', style: TextStyle(fontFamily: 'Inter', fontSize: 14)),"
        ));
        assert!(dart.contains(concat!(
            "TextSpan(text: '\\$5', style: TextStyle(",
            "fontFamily: 'Inter', fontSize: 14, fontWeight: FontWeight.w700)),"
        )));
        assert!(dart.contains("textAlign: TextAlign.right,"));
    }

    #[test]
    fn test_widget_file() {
        let dart = generate_with(
            json!({ "id": "r", "type": "RECTANGLE", "width": 1.0, "height": 1.0 }),
            GeneratorOptions::default().with_component_name("profile card"),
        );

        assert!(dart.contains("class ProfileCard extends StatelessWidget {"));
        assert!(dart.contains("const ProfileCard({super.key});"));
        assert!(dart.contains("    return Container(\n      width: 1,\n      height: 1,\n    );"));
    }
}
