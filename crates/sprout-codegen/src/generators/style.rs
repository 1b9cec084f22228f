//! Value formatting shared by the generators.

use sprout_core::{Color, GradientPaint, Paint, TextCase, TextRun};
use sprout_layout::{classify_direction, gradient_angle, GradientDirection, NormalizedNode};
use sprout_normalize::ConversionContext;

/// Format a length with at most two decimals and no trailing zeros.
pub(crate) fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// CSS color: hex when opaque, `rgba()` otherwise.
pub(crate) fn css_color(color: &Color) -> String {
    if color.a >= 1.0 {
        color.to_hex()
    } else {
        let (r, g, b, _) = color.to_rgba8();
        format!("rgba({}, {}, {}, {})", r, g, b, fmt_num(color.a as f64))
    }
}

/// First solid fill, paint opacity folded into alpha.
pub(crate) fn solid_fill(fills: &[Paint]) -> Option<Color> {
    fills.iter().find_map(Paint::solid_color)
}

/// First linear gradient, with its snapped direction.
pub(crate) fn linear_gradient(fills: &[Paint]) -> Option<(&GradientPaint, GradientDirection)> {
    fills.iter().find_map(|paint| match paint {
        Paint::LinearGradient(gradient) => {
            Some((gradient, classify_direction(gradient_angle(&gradient.transform))))
        }
        _ => None,
    })
}

pub(crate) fn has_image(fills: &[Paint]) -> bool {
    fills.iter().any(|paint| matches!(paint, Paint::Image(_)))
}

/// Gradient stop colors with the paint opacity applied.
pub(crate) fn stop_colors(gradient: &GradientPaint) -> Vec<Color> {
    gradient
        .stops
        .iter()
        .map(|stop| stop.color.with_opacity(gradient.opacity))
        .collect()
}

/// Styled runs of a text node, preferring the run cache.
pub(crate) fn text_runs<'a>(node: &'a NormalizedNode, ctx: &'a ConversionContext) -> &'a [TextRun] {
    ctx.text_runs()
        .get(node.id())
        .or_else(|| node.text_content().map(|content| content.runs.as_slice()))
        .unwrap_or(&[])
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for a double-quoted Swift string literal.
pub(crate) fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for a single-quoted Dart string literal, including interpolation.
pub(crate) fn escape_dart(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Bake a run's text case into its characters.
///
/// Small caps have no plain-text form and pass through unchanged.
pub(crate) fn apply_case(text: &str, case: TextCase) -> String {
    match case {
        TextCase::Upper => text.to_uppercase(),
        TextCase::Lower => text.to_lowercase(),
        TextCase::Title => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for c in text.chars() {
                if at_word_start {
                    out.extend(c.to_uppercase());
                } else {
                    out.push(c);
                }
                at_word_start = c.is_whitespace();
            }
            out
        }
        TextCase::Original | TextCase::SmallCaps | TextCase::SmallCapsForced => text.to_string(),
    }
}

/// Nearest multiple of 100 in the CSS weight range.
pub(crate) fn font_weight(weight: u16) -> u16 {
    let snapped = ((weight as f64 / 100.0).round() * 100.0) as u16;
    snapped.clamp(100, 900)
}
