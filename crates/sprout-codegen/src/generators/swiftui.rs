//! SwiftUI code generator.

use convert_case::{Case, Casing};
use sprout_core::{
    Color, CornerRadii, Effect, GradientPaint, Mixed, Paint, TextAlignHorizontal, TextContent,
    TextDecoration, TextRun,
};
use sprout_layout::{
    classify_direction, gradient_angle, resolve_sizing, Alignment, AxisSizing, Distribution,
    Flow, NodeIndex, NodeKind, NormalizedNode, NormalizedTree,
};
use sprout_normalize::ConversionContext;

use super::style::{
    apply_case, escape_literal, fmt_num, font_weight, solid_fill, stop_colors, text_runs,
};
use super::templates::TemplateEngine;
use super::{ensure_selection, CodeGenerator, FileTemplate, GeneratorOptions};
use crate::error::Result;

const VIEW_TEMPLATE: &str = r#"import SwiftUI

struct {{pascal_case name}}: View {
    var body: some View {
{{indent body 8}}
    }
}

#if DEBUG
struct {{pascal_case name}}_Previews: PreviewProvider {
    static var previews: some View {
        {{pascal_case name}}()
    }
}
#endif
"#;

/// SwiftUI code generator.
pub struct SwiftUiGenerator {
    engine: TemplateEngine<'static>,
    options: GeneratorOptions,
}

impl SwiftUiGenerator {
    pub fn new() -> Result<Self> {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Result<Self> {
        let mut engine = TemplateEngine::new();
        engine.register_template("swiftui_view", VIEW_TEMPLATE)?;
        Ok(Self { engine, options })
    }

    fn write_view(
        &self,
        tree: &NormalizedTree,
        ctx: &ConversionContext,
        index: NodeIndex,
        indent: usize,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let node = tree.node(index)?;
        let spaces = " ".repeat(indent);

        // Modifiers after a closing brace line up with it; after a one-line
        // view they are indented one level.
        let modifier_indent = match &node.kind {
            NodeKind::Container(_) | NodeKind::Group => {
                lines.push(format!("{}{} {{", spaces, stack_header(node)));
                self.write_children(tree, ctx, node, indent + 4, lines)?;
                lines.push(format!("{}}}", spaces));
                spaces
            }
            NodeKind::Text(content) => {
                lines.push(format!("{}{}", spaces, text_expression(node, ctx, content)));
                " ".repeat(indent + 4)
            }
            NodeKind::BooleanPlaceholder => {
                lines.push(format!("{}Image(systemName: \"photo\")", spaces));
                " ".repeat(indent + 4)
            }
            _ => {
                lines.push(format!("{}{}", spaces, outline_shape(node)));
                " ".repeat(indent + 4)
            }
        };

        for modifier in modifiers(tree, ctx, index, node)? {
            lines.push(format!("{}{}", modifier_indent, modifier));
        }
        Ok(())
    }

    fn write_children(
        &self,
        tree: &NormalizedTree,
        ctx: &ConversionContext,
        node: &NormalizedNode,
        indent: usize,
        lines: &mut Vec<String>,
    ) -> Result<()> {
        let spaces = " ".repeat(indent);
        let layout = node.layout().filter(|layout| layout.flow.is_flow());
        let distribution = layout.map(|layout| layout.distribution).unwrap_or_default();
        let spacer = match layout {
            Some(layout) if distribution == Distribution::SpaceBetween => {
                format!("{}Spacer(minLength: {})", spaces, fmt_num(layout.item_spacing))
            }
            _ => format!("{}Spacer(minLength: 0)", spaces),
        };

        if matches!(distribution, Distribution::Center | Distribution::End) {
            lines.push(spacer.clone());
        }
        for (position, &child) in node.children.iter().enumerate() {
            if position > 0 && distribution == Distribution::SpaceBetween {
                lines.push(spacer.clone());
            }
            self.write_view(tree, ctx, child, indent, lines)?;
        }
        if distribution == Distribution::Center {
            lines.push(spacer);
        }
        Ok(())
    }
}

impl CodeGenerator for SwiftUiGenerator {
    fn framework_name(&self) -> &'static str {
        "SwiftUI"
    }

    fn generate_body(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String> {
        ensure_selection(tree)?;
        let mut lines = Vec::new();
        match tree.roots() {
            [root] => self.write_view(tree, ctx, *root, 0, &mut lines)?,
            roots => {
                lines.push("VStack(alignment: .leading, spacing: 0) {".to_string());
                for &root in roots {
                    self.write_view(tree, ctx, root, 4, &mut lines)?;
                }
                lines.push("}".to_string());
            }
        }
        Ok(lines.join("\n"))
    }

    fn generate(&self, tree: &NormalizedTree, ctx: &ConversionContext) -> Result<String> {
        let body = self.generate_body(tree, ctx)?;
        if !self.options.wrap_in_file {
            return Ok(body);
        }
        self.engine.render(
            "swiftui_view",
            &FileTemplate { name: &self.options.component_name, body: &body },
        )
    }
}

/// Format a unit-interval value with three decimals.
fn fmt_fraction(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

fn swift_color(color: &Color) -> String {
    let rgb = format!(
        "red: {}, green: {}, blue: {}",
        fmt_fraction(color.r as f64),
        fmt_fraction(color.g as f64),
        fmt_fraction(color.b as f64)
    );
    if color.a >= 1.0 {
        format!("Color({})", rgb)
    } else {
        format!("Color({}, opacity: {})", rgb, fmt_fraction(color.a as f64))
    }
}

fn swift_stops(gradient: &GradientPaint) -> String {
    let stops = gradient
        .stops
        .iter()
        .zip(stop_colors(gradient))
        .map(|(stop, color)| {
            format!(
                ".init(color: {}, location: {})",
                swift_color(&color),
                fmt_fraction(stop.position)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", stops)
}

/// A `ShapeStyle` expression for a paint.
fn swift_paint(paint: &Paint, node: &NormalizedNode) -> Option<String> {
    match paint {
        Paint::Solid { .. } => paint.solid_color().map(|color| swift_color(&color)),
        Paint::LinearGradient(gradient) => {
            let direction = classify_direction(gradient_angle(&gradient.transform));
            let (start, end) = direction.swiftui_points();
            Some(format!(
                "LinearGradient(stops: {}, startPoint: {}, endPoint: {})",
                swift_stops(gradient),
                start,
                end
            ))
        }
        Paint::RadialGradient(gradient) => {
            let geometry = node.geometry();
            Some(format!(
                "RadialGradient(stops: {}, center: .center, startRadius: 0, endRadius: {})",
                swift_stops(gradient),
                fmt_num(geometry.width.max(geometry.height) / 2.0)
            ))
        }
        Paint::AngularGradient(gradient) => Some(format!(
            "AngularGradient(stops: {}, center: .center)",
            swift_stops(gradient)
        )),
        Paint::Image(_) => Some("Color(.systemGray5)".to_string()),
    }
}

fn stack_header(node: &NormalizedNode) -> String {
    let Some(layout) = node.layout() else {
        return "ZStack(alignment: .topLeading)".to_string();
    };
    let spacing = if layout.distribution == Distribution::SpaceBetween {
        0.0
    } else {
        layout.item_spacing
    };
    match layout.flow {
        Flow::Row => {
            let alignment = match layout.alignment {
                Alignment::Start => ".top",
                Alignment::Center => ".center",
                Alignment::End => ".bottom",
                Alignment::Baseline => ".firstTextBaseline",
            };
            format!("HStack(alignment: {}, spacing: {})", alignment, fmt_num(spacing))
        }
        Flow::Column => {
            let alignment = match layout.alignment {
                Alignment::Start | Alignment::Baseline => ".leading",
                Alignment::Center => ".center",
                Alignment::End => ".trailing",
            };
            format!("VStack(alignment: {}, spacing: {})", alignment, fmt_num(spacing))
        }
        Flow::None => "ZStack(alignment: .topLeading)".to_string(),
    }
}

/// The shape a node is drawn, clipped, or outlined with.
fn outline_shape(node: &NormalizedNode) -> String {
    if node.kind == NodeKind::Ellipse {
        return "Ellipse()".to_string();
    }
    match node.props.corner_radii {
        radii if radii.is_zero() => "Rectangle()".to_string(),
        CornerRadii::Uniform(r) => format!("RoundedRectangle(cornerRadius: {})", fmt_num(r)),
        CornerRadii::PerCorner { top_left, top_right, bottom_right, bottom_left } => format!(
            concat!(
                "UnevenRoundedRectangle(topLeadingRadius: {}, bottomLeadingRadius: {}, ",
                "bottomTrailingRadius: {}, topTrailingRadius: {})"
            ),
            fmt_num(top_left),
            fmt_num(bottom_left),
            fmt_num(bottom_right),
            fmt_num(top_right)
        ),
    }
}

fn weight_name(weight: u16) -> &'static str {
    match font_weight(weight) {
        100 => ".ultraLight",
        200 => ".thin",
        300 => ".light",
        500 => ".medium",
        600 => ".semibold",
        700 => ".bold",
        800 => ".heavy",
        900 => ".black",
        _ => ".regular",
    }
}

/// One run as a `Text`; only `Text`-returning modifiers so runs concatenate.
fn run_text(run: &TextRun) -> String {
    let mut expression = format!(
        "Text(\"{}\").font(.custom(\"{}\", size: {}))",
        escape_literal(&apply_case(&run.characters, run.case)),
        escape_literal(&run.font.family),
        fmt_num(run.font_size)
    );
    if run.font_weight != 400 {
        expression.push_str(&format!(".fontWeight({})", weight_name(run.font_weight)));
    }
    if run.font.is_italic() {
        expression.push_str(".italic()");
    }
    match run.decoration {
        TextDecoration::None => {}
        TextDecoration::Underline => expression.push_str(".underline()"),
        TextDecoration::Strikethrough => expression.push_str(".strikethrough()"),
    }
    let spacing = run.letter_spacing.to_px(run.font_size);
    if spacing != 0.0 {
        expression.push_str(&format!(".kerning({})", fmt_num(spacing)));
    }
    if let Some(color) = solid_fill(&run.fills) {
        expression.push_str(&format!(".foregroundColor({})", swift_color(&color)));
    }
    expression
}

fn text_expression(
    node: &NormalizedNode,
    ctx: &ConversionContext,
    content: &TextContent,
) -> String {
    match text_runs(node, ctx) {
        [] => format!("Text(\"{}\")", escape_literal(&content.characters)),
        [single] => run_text(single),
        runs => format!("({})", runs.iter().map(run_text).collect::<Vec<_>>().join(" + ")),
    }
}

fn modifiers(
    tree: &NormalizedTree,
    ctx: &ConversionContext,
    index: NodeIndex,
    node: &NormalizedNode,
) -> Result<Vec<String>> {
    let props = &node.props;
    let mut modifiers = Vec::new();
    let is_block = matches!(node.kind, NodeKind::Container(_) | NodeKind::Group);

    let mut frame_alignment = None;
    match &node.kind {
        NodeKind::Text(content) => {
            let alignment = match content.align_horizontal {
                TextAlignHorizontal::Left | TextAlignHorizontal::Justified => ".leading",
                TextAlignHorizontal::Center => ".center",
                TextAlignHorizontal::Right => ".trailing",
            };
            if alignment != ".leading" {
                modifiers.push(format!(".multilineTextAlignment({})", alignment));
            }
            frame_alignment = Some(alignment);
            if let [run, ..] = text_runs(node, ctx) {
                if let Some(line_height) = run.line_height.to_px(run.font_size) {
                    if line_height > run.font_size {
                        let spacing = line_height - run.font_size;
                        modifiers.push(format!(".lineSpacing({})", fmt_num(spacing)));
                    }
                }
            }
        }
        NodeKind::BooleanPlaceholder => modifiers.push(".resizable()".to_string()),
        NodeKind::Line => {
            if let Some(color) = solid_fill(&props.strokes) {
                modifiers.push(format!(".fill({})", swift_color(&color)));
            }
        }
        NodeKind::Container(_) | NodeKind::Group => {}
        _ => {
            let fill = props.fills.iter().rev().find_map(|paint| swift_paint(paint, node));
            if let Some(fill) = fill {
                modifiers.push(format!(".fill({})", fill));
            }
        }
    }

    if let Some(layout) = node.layout() {
        let p = &layout.padding;
        if p.is_uniform() && !p.is_zero() {
            modifiers.push(format!(".padding({})", fmt_num(p.top)));
        } else if !p.is_zero() {
            modifiers.push(format!(
                ".padding(EdgeInsets(top: {}, leading: {}, bottom: {}, trailing: {}))",
                fmt_num(p.top),
                fmt_num(p.left),
                fmt_num(p.bottom),
                fmt_num(p.right)
            ));
        }
    }

    let (horizontal, vertical) = resolve_sizing(tree, index)?;
    let mut fixed = Vec::new();
    let mut fill = Vec::new();
    match horizontal {
        AxisSizing::Fixed(width) => fixed.push(format!("width: {}", fmt_num(width))),
        AxisSizing::Fill => fill.push("maxWidth: .infinity".to_string()),
        AxisSizing::Hug => {}
    }
    match vertical {
        AxisSizing::Fixed(height) => {
            // A line's box has no height; draw it as thick as its stroke
            let height = match (&node.kind, props.stroke_weight) {
                (NodeKind::Line, Mixed::Known(weight)) => height.max(weight),
                _ => height,
            };
            fixed.push(format!("height: {}", fmt_num(height)));
        }
        AxisSizing::Fill => fill.push("maxHeight: .infinity".to_string()),
        AxisSizing::Hug => {}
    }
    if let Some(alignment) = frame_alignment {
        if !fixed.is_empty() {
            fixed.push(format!("alignment: {}", alignment));
        }
        if !fill.is_empty() {
            fill.push(format!("alignment: {}", alignment));
        }
    }
    if !fixed.is_empty() {
        modifiers.push(format!(".frame({})", fixed.join(", ")));
    }
    if !fill.is_empty() {
        modifiers.push(format!(".frame({})", fill.join(", ")));
    }

    if is_block {
        if let Some(fill) = props.fills.iter().rev().find_map(|paint| swift_paint(paint, node)) {
            modifiers.push(format!(".background({})", fill));
        }
        if !props.corner_radii.is_zero() {
            modifiers.push(format!(".clipShape({})", outline_shape(node)));
        } else if node.layout().is_some_and(|layout| layout.clips_content) {
            modifiers.push(".clipped()".to_string());
        }
    }

    let outlined = !matches!(
        node.kind,
        NodeKind::Line | NodeKind::Text(_) | NodeKind::BooleanPlaceholder
    );
    let stroke = (outlined, solid_fill(&props.strokes), props.stroke_weight);
    if let (true, Some(color), Mixed::Known(weight)) = stroke {
        if weight > 0.0 {
            modifiers.push(format!(
                ".overlay({}.stroke({}, lineWidth: {}))",
                outline_shape(node),
                swift_color(&color),
                fmt_num(weight)
            ));
        }
    }

    for effect in &props.effects {
        match effect {
            Effect::DropShadow(s) => modifiers.push(format!(
                ".shadow(color: {}, radius: {}, x: {}, y: {})",
                swift_color(&s.color),
                fmt_num(s.radius / 2.0),
                fmt_num(s.offset.x),
                fmt_num(s.offset.y)
            )),
            Effect::LayerBlur(b) => {
                modifiers.push(format!(".blur(radius: {})", fmt_num(b.radius / 2.0)))
            }
            Effect::BackgroundBlur(_) => {
                modifiers.push(".background(.ultraThinMaterial)".to_string())
            }
            // No SwiftUI counterpart
            Effect::InnerShadow(_) => {}
        }
    }

    if props.opacity < 1.0 {
        modifiers.push(format!(".opacity({})", fmt_num(props.opacity)));
    }
    if let Some(keyword) = props.blend_mode.css_keyword() {
        modifiers.push(format!(".blendMode(.{})", keyword.to_case(Case::Camel)));
    }

    let geometry = node.geometry();
    if geometry.is_rotated() {
        modifiers.push(format!(
            ".rotationEffect(.degrees({}), anchor: .topLeading)",
            fmt_num(-geometry.rotation)
        ));
    }
    let in_free_form = tree.parent(index).is_some_and(|parent| !parent.flow().is_flow());
    if in_free_form && (geometry.x != 0.0 || geometry.y != 0.0) {
        modifiers.push(format!(".offset(x: {}, y: {})", fmt_num(geometry.x), fmt_num(geometry.y)));
    }

    Ok(modifiers)
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
        SwiftUiGenerator::with_options(options).unwrap().generate(&tree, &ctx).unwrap()
    }

    fn generate(selection: serde_json::Value) -> String {
        generate_with(selection, GeneratorOptions::default().body_only())
    }

    #[test]
    fn test_inferred_row_is_hstack() {
        let swift = generate(json!({
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
HStack(alignment: .top, spacing: 20) {
    Rectangle()
        .frame(width: 40, height: 100)
    Rectangle()
        .frame(width: 40, height: 100)
}
.frame(width: 100, height: 100)";
        assert_eq!(swift, expected);
    }

    #[test]
    fn test_free_form_uses_offsets() {
        let swift = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [
                { "id": "a", "type": "ELLIPSE", "width": 50.0, "height": 50.0 },
                {
                    "id": "b",
                    "type": "ELLIPSE",
                    "x": 10.0,
                    "y": 20.0,
                    "width": 50.0,
                    "height": 50.0
                }
            ]
        }));

        assert!(swift.starts_with("ZStack(alignment: .topLeading) {"));
        assert!(swift.contains("Ellipse()"));
        assert!(swift.contains(".offset(x: 10, y: 20)"));
    }

    #[test]
    fn test_fill_and_space_between() {
        let swift = generate(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 300.0,
            "height": 50.0,
            "layoutMode": "HORIZONTAL",
            "primaryAxisAlignItems": "SPACE_BETWEEN",
            "counterAxisAlignItems": "CENTER",
            "itemSpacing": 8.0,
            "children": [
                { "id": "a", "type": "RECTANGLE", "width": 20.0, "height": 20.0 },
                {
                    "id": "b",
                    "type": "RECTANGLE",
                    "x": 280.0,
                    "width": 20.0,
                    "height": 20.0,
                    "layoutAlign": "STRETCH"
                }
            ]
        }));

        assert!(swift.starts_with("HStack(alignment: .center, spacing: 0) {"));
        assert!(swift.contains("    Spacer(minLength: 8)\n"));
        assert!(swift.contains(".frame(width: 20)\n        .frame(maxHeight: .infinity)"));
    }

    #[test]
    fn test_text_runs_concatenate() {
        let swift = generate(json!([{
            "id": "t",
            "type": "TEXT",
            "width": 100.0,
            "height": 20.0,
            "characters": "Hi there",
            "styledSegments": [
                { "characters": "Hi ", "fontSize": 14.0 },
                {
                    "characters": "there",
                    "fontSize": 14.0,
                    "fontWeight": 700,
                    "textDecoration": "UNDERLINE"
                }
            ]
        }]));

        assert!(swift.starts_with(concat!(
            "(Text(\"Hi \").font(.custom(\"Inter\", size: 14)) + ",
            "Text(\"there\").font(.custom(\"Inter\", size: 14)).fontWeight(.bold).underline())"
        )));
        assert!(swift.contains(".frame(width: 100, height: 20, alignment: .leading)"));
    }

    #[test]
    fn test_gradient_and_corner_radius() {
        let swift = generate(json!([{
            "id": "g",
            "type": "RECTANGLE",
            "width": 10.0,
            "height": 10.0,
            "cornerRadius": 6.0,
            "fills": [{
                "type": "GRADIENT_LINEAR",
                "gradientStops": [
                    { "position": 0.0, "color": { "r": 1.0, "g": 0.0, "b": 0.0 } },
                    { "position": 1.0, "color": { "r": 0.0, "g": 0.0, "b": 1.0, "a": 0.5 } }
                ]
            }]
        }]));

        assert!(swift.starts_with("RoundedRectangle(cornerRadius: 6)"));
        assert!(swift.contains(concat!(
            ".fill(LinearGradient(stops: [",
            ".init(color: Color(red: 1, green: 0, blue: 0), location: 0), ",
            ".init(color: Color(red: 0, green: 0, blue: 1, opacity: 0.5), location: 1)",
            "], startPoint: .leading, endPoint: .trailing))"
        )));
    }

    #[test]
    fn test_view_file() {
        let swift = generate_with(
            json!({ "id": "r", "type": "RECTANGLE", "width": 1.0, "height": 1.0 }),
            GeneratorOptions::default().with_component_name("profile card"),
        );

        assert!(swift.starts_with("import SwiftUI\n\nstruct ProfileCard: View {"));
        assert!(swift.contains("        Rectangle()\n            .frame(width: 1, height: 1)"));
        assert!(swift.contains("ProfileCard_Previews: PreviewProvider"));
    }
}
