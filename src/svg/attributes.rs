//! Attribute groups shared by the basic elements, and value formatting.

use super::types::AttrSpec;
use crate::types::{AttrKind, AttrValue, Attributes};

const LINECAPS: &[&str] = &["butt", "round", "square"];
const LINEJOINS: &[&str] = &["miter", "miter-clip", "round", "bevel", "arcs"];
const FILL_RULES: &[&str] = &["nonzero", "evenodd"];
const FONT_VARIANTS: &[&str] = &["normal", "small-caps"];
const TEXT_DECORATIONS: &[&str] = &["none", "underline", "overline", "line-through"];
const TEXT_TRANSFORMS: &[&str] = &["none", "capitalize", "uppercase", "lowercase"];
const DIRECTIONS: &[&str] = &["ltr", "rtl"];
const TEXT_ANCHORS: &[&str] = &["start", "middle", "end"];
const WRITING_MODES: &[&str] = &[
    "lr-tb", "rl-tb", "tb-rl", "lr", "rl", "tb", "horizontal-tb", "vertical-rl", "vertical-lr",
];
const BASELINES: &[&str] = &[
    "auto", "baseline", "middle", "central", "ideographic", "alphabetic", "hanging",
    "mathematical", "text-top", "text-bottom",
];
const BIDI_MODES: &[&str] = &["normal", "embed", "bidi-override", "isolate", "isolate-override"];

/// All basic elements have these.
pub const DEFAULT_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("style", AttrKind::Text, "Inline style attribute for setting multiple CSS properties at once."),
    AttrSpec::new("transform", AttrKind::Text, "Transformation such as translate(10,20) or rotate(45)."),
];

/// Elements with an outline have these.
pub const STROKE_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("stroke", AttrKind::Color, "Stroke color of the outline."),
    AttrSpec::new("stroke_width", AttrKind::Float, "Width of the outline."),
    AttrSpec::new("stroke_opacity", AttrKind::Float, "Opacity of the outline, 0 (transparent) to 1 (opaque)."),
    AttrSpec::new("stroke_dasharray", AttrKind::Text, "Pattern of dashes and gaps used in the outline."),
    AttrSpec::new("stroke_linecap", AttrKind::Keyword(LINECAPS), "Shape at the end of open outlines."),
    AttrSpec::new("stroke_linejoin", AttrKind::Keyword(LINEJOINS), "Shape at the corners of the outline."),
    AttrSpec::new("stroke_miterlimit", AttrKind::Float, "Limit on the miter length of joined corners."),
    AttrSpec::new("marker_start", AttrKind::Text, "Marker symbol for the start of the line."),
    AttrSpec::new("marker_mid", AttrKind::Text, "Marker symbol for the middle of the line."),
    AttrSpec::new("marker_end", AttrKind::Text, "Marker symbol for the end of the line."),
];

/// Filled shapes have these.
pub const FILL_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("fill", AttrKind::Color, "Fill color."),
    AttrSpec::new("fill_opacity", AttrKind::Float, "Opacity of the fill, 0 (transparent) to 1 (opaque)."),
    AttrSpec::new("fill_rule", AttrKind::Keyword(FILL_RULES), "How the inside of the shape is determined."),
    AttrSpec::new("pattern", AttrKind::Text, "URL referencing a <pattern> element used as the fill."),
    AttrSpec::new("gradient", AttrKind::Text, "URL referencing a gradient element used as the fill."),
];

pub const FONT_ATTRIBUTES: &[AttrSpec] = &[
    AttrSpec::new("font_size", AttrKind::Float, "Font size of the text."),
    AttrSpec::new("font_family", AttrKind::Text, "Font family of the text."),
    AttrSpec::new("font_variant", AttrKind::Keyword(FONT_VARIANTS), "Use of alternate glyphs."),
    AttrSpec::new("text_decoration", AttrKind::Keyword(TEXT_DECORATIONS), "Decorations added to the text."),
    AttrSpec::new("text_transform", AttrKind::Keyword(TEXT_TRANSFORMS), "Capitalization of the text."),
    AttrSpec::new("word_spacing", AttrKind::Length, "Spacing between words, e.g. 2 or '2em'."),
    AttrSpec::new("letter_spacing", AttrKind::Length, "Spacing between characters, e.g. 1 or '1em'."),
    AttrSpec::new("direction", AttrKind::Keyword(DIRECTIONS), "Text direction."),
    AttrSpec::new("text_anchor", AttrKind::Keyword(TEXT_ANCHORS), "Alignment of the text."),
    AttrSpec::new("writing_mode", AttrKind::Keyword(WRITING_MODES), "Writing mode of the text."),
    AttrSpec::new("dominant_baseline", AttrKind::Keyword(BASELINES), "Baseline used to align the text."),
    AttrSpec::new("unicode_bidi", AttrKind::Keyword(BIDI_MODES), "Bidirectional algorithm override."),
];

/// Sentinel switching an element from `<tag/>` to `<tag>content</tag>`
pub const CONTENT: AttrSpec = AttrSpec::new("content", AttrKind::Text, "Raw markup placed between the tags.");

// ============================================================================
// Formatting
// ============================================================================

/// Two-decimal fixed point.
///
/// Rounds the exact binary value, exact ties to even: 3 -> "3.00", 3.005 -> "3.00".
pub fn format_float(value: f64) -> String {
    format!("{:.2}", value)
}

/// Shortest form: integer if whole number, otherwise full precision
pub fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// snake_case key -> kebab-case SVG attribute name
pub fn svg_attr_name(key: &str) -> String {
    key.replace('_', "-")
}

/// Escape special XML characters in text content
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Serialized attribute value, or `None` for values with no attribute form
pub fn format_value(kind: AttrKind, value: &AttrValue) -> Option<String> {
    match (kind, value) {
        (AttrKind::Float, AttrValue::Number(n)) => Some(format_float(*n)),
        (_, AttrValue::Number(n)) => Some(fmt_num(*n)),
        (_, AttrValue::Text(s)) => Some(escape_xml(s)),
        _ => None,
    }
}

/// `key="value"` pairs for every declared spec present in `attrs`, space-separated
pub fn write_attributes<'a>(specs: impl Iterator<Item = &'a AttrSpec>, attrs: &Attributes) -> String {
    specs
        .filter(|spec| spec.name != CONTENT.name)
        .filter_map(|spec| {
            let value = attrs.get(spec.name)?;
            let formatted = format_value(spec.kind, value)?;
            Some(format!("{}=\"{}\"", svg_attr_name(spec.name), formatted))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Indent every line by two spaces
pub fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("  {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_decimal_formatting() {
        assert_eq!(format_float(3.0), "3.00");
        assert_eq!(format_float(3.005), "3.00");
        assert_eq!(format_float(1.0 / 3.0), "0.33");
        assert_eq!(format_float(2.0 / 3.0), "0.67");
        assert_eq!(format_float(-1.5), "-1.50");
    }

    #[test]
    fn shortest_number_formatting() {
        assert_eq!(fmt_num(20.0), "20");
        assert_eq!(fmt_num(-45.0), "-45");
        assert_eq!(fmt_num(12.5), "12.5");
    }

    #[test]
    fn kebab_case_names() {
        assert_eq!(svg_attr_name("stroke_width"), "stroke-width");
        assert_eq!(svg_attr_name("cx"), "cx");
    }

    #[test]
    fn attributes_follow_declaration_order() {
        let attrs = Attributes::new()
            .with("stroke_width", 2)
            .with("stroke", "red")
            .with("content", "ignored");
        let written = write_attributes(STROKE_ATTRIBUTES.iter().chain([&CONTENT]), &attrs);
        assert_eq!(written, r#"stroke="red" stroke-width="2.00""#);
    }

    #[test]
    fn text_values_are_escaped() {
        let attrs = Attributes::new().with("style", "a<b & \"c\"");
        let written = write_attributes(DEFAULT_ATTRIBUTES.iter(), &attrs);
        assert_eq!(written, r#"style="a&lt;b &amp; &quot;c&quot;""#);
    }

    #[test]
    fn indent_every_line() {
        assert_eq!(indent("a\nb"), "  a\n  b");
    }
}
