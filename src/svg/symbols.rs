//! Symbol shapes backed by a one-time `<defs>` entry, and the arrow helper.

use super::attributes::{
    escape_xml, fmt_num, format_float, DEFAULT_ATTRIBUTES, FILL_ATTRIBUTES, STROKE_ATTRIBUTES,
};
use super::elements::{LINE, POLYGON};
use super::types::AttrSpec;
use crate::error::{Result, SnipError};
use crate::registry::{Definitions, ShapeRegistry};
use crate::shape::{missing, RenderContext, Shape};
use crate::types::{AttrKind, Attributes};

/// A reusable symbol placed with `<use>`, scaled and translated.
#[derive(Debug, Clone, Copy)]
pub struct Symbol {
    id: &'static str,
    /// `size / divisor` gives the scale applied to the definition
    divisor: f64,
    /// Attribute carrying the color, written as inline style
    color: &'static str,
    rotates: bool,
    definition: &'static str,
}

pub const CROSS: Symbol = Symbol {
    id: "cross",
    divisor: 6.0,
    color: "stroke",
    rotates: false,
    definition: r#"<g id="cross">
  <line x1="-5" y1="-5" x2="5" y2="5" stroke-width="2"/>
  <line x1="-5" y1="5" x2="5" y2="-5" stroke-width="2"/>
</g>"#,
};

pub const STAR: Symbol = Symbol {
    id: "star",
    divisor: 10.0,
    color: "fill",
    rotates: false,
    definition: r#"<g id="star">
  <polygon points="0,-10 2.76,-3.5 9.51,-3.5 4.63,1.5 7.39,8 0,4.5 -7.39,8 -4.63,1.5 -9.51,-3.5 -2.76,-3.5" stroke-width="2"/>
</g>"#,
};

pub const HEART: Symbol = Symbol {
    id: "heart",
    divisor: 10.0,
    color: "fill",
    rotates: true,
    definition: r#"<g id="heart">
<path d="M8 1.314C12.438-3.248 23.534 4.735 8 15-7.534 4.736 3.562-3.248 8 1.314z"/>
</g>"#,
};

pub const SYMBOLS: &[Symbol] = &[CROSS, STAR, HEART];

const DEFAULT_SIZE: f64 = 4.0;

/// Register the `<defs>` entries of all built-in symbols
pub fn declare_symbols(registry: &mut ShapeRegistry) {
    for symbol in SYMBOLS {
        registry.declare(symbol.id, symbol.definitions());
    }
}

impl Symbol {
    pub fn definitions(&self) -> Definitions {
        [(self.id, self.definition)].into_iter().collect()
    }
}

impl Shape for Symbol {
    fn id(&self) -> &str {
        self.id
    }

    fn attribute(&self, key: &str) -> Option<AttrKind> {
        match key {
            "x" | "y" => Some(AttrKind::Float),
            "size" => Some(AttrKind::Number),
            "angle" if self.rotates => Some(AttrKind::Number),
            k if k == self.color => Some(AttrKind::Color),
            _ => None,
        }
    }

    fn render(&self, attrs: &Attributes, _ctx: &mut RenderContext<'_>) -> Result<String> {
        let x = attrs.f64("x").unwrap_or(0.0);
        let y = attrs.f64("y").unwrap_or(0.0);
        let size = attrs.f64("size").unwrap_or(DEFAULT_SIZE);
        let style = attrs
            .str(self.color)
            .filter(|c| !c.is_empty())
            .map(|c| format!(r#" style="{}: {};""#, self.color, escape_xml(c)))
            .unwrap_or_default();
        let rotate = if self.rotates {
            format!(" rotate({})", fmt_num(attrs.f64("angle").unwrap_or(0.0)))
        } else {
            String::new()
        };
        Ok(format!(
            r##"<use{} xlink:href="#{}" transform="translate({},{}) scale({}){}"/>"##,
            style,
            self.id,
            format_float(x),
            format_float(y),
            format_float(size / self.divisor),
            rotate
        ))
    }
}

// ============================================================================
// Arrow
// ============================================================================

const ARROW_ARGS: &[AttrSpec] = &[
    AttrSpec::new("start_x", AttrKind::Float, "x-coordinate of the arrow's starting point."),
    AttrSpec::new("start_y", AttrKind::Float, "y-coordinate of the arrow's starting point."),
    AttrSpec::new("end_x", AttrKind::Float, "x-coordinate of the arrow's end point."),
    AttrSpec::new("end_y", AttrKind::Float, "y-coordinate of the arrow's end point."),
    AttrSpec::new("arrow_length", AttrKind::Float, "Length of the arrowhead."),
    AttrSpec::new("arrow_width", AttrKind::Float, "Half width of the arrowhead."),
];

const ARROW_LENGTH: f64 = 10.0;
const ARROW_WIDTH: f64 = 6.0;

/// Line plus a triangular head. Stroke, fill and default attributes are forwarded.
#[derive(Debug, Clone, Copy)]
pub struct Arrow;

impl Arrow {
    fn forwarded(key: &str) -> bool {
        [STROKE_ATTRIBUTES, FILL_ATTRIBUTES, DEFAULT_ATTRIBUTES]
            .iter()
            .any(|group| group.iter().any(|spec| spec.name == key))
    }
}

impl Shape for Arrow {
    fn id(&self) -> &str {
        "arrow"
    }

    fn attribute(&self, key: &str) -> Option<AttrKind> {
        ARROW_ARGS
            .iter()
            .chain(STROKE_ATTRIBUTES)
            .chain(FILL_ATTRIBUTES)
            .chain(DEFAULT_ATTRIBUTES)
            .find(|spec| spec.name == key)
            .map(|spec| spec.kind)
    }

    fn render(&self, attrs: &Attributes, _ctx: &mut RenderContext<'_>) -> Result<String> {
        let coord = |key: &str| attrs.f64(key).ok_or_else(|| missing("arrow", key, AttrKind::Float));
        let (start_x, start_y) = (coord("start_x")?, coord("start_y")?);
        let (end_x, end_y) = (coord("end_x")?, coord("end_y")?);
        let arrow_length = attrs.f64("arrow_length").unwrap_or(ARROW_LENGTH);
        let arrow_width = attrs.f64("arrow_width").unwrap_or(ARROW_WIDTH);

        let (dx, dy) = (end_x - start_x, end_y - start_y);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 {
            return Err(SnipError::Geometry("arrow has zero length".to_string()));
        }
        let (dx, dy) = (dx / length, dy / length);

        let head_x1 = end_x - arrow_length * dx - arrow_width * dy;
        let head_y1 = end_y - arrow_length * dy + arrow_width * dx;
        let head_x2 = end_x - arrow_length * dx + arrow_width * dy;
        let head_y2 = end_y - arrow_length * dy - arrow_width * dx;

        let style = attrs.filtered(Arrow::forwarded);
        let line = style
            .filtered(|k| LINE.find(k).is_some())
            .with("x1", start_x)
            .with("y1", start_y)
            .with("x2", end_x)
            .with("y2", end_y);
        let points = format!(
            "{},{} {},{} {},{}",
            format_float(end_x),
            format_float(end_y),
            format_float(head_x1),
            format_float(head_y1),
            format_float(head_x2),
            format_float(head_y2)
        );
        let head = style
            .filtered(|k| POLYGON.find(k).is_some())
            .with("points", points);

        Ok(format!("{}\n{}", LINE.to_svg(&line), POLYGON.to_svg(&head)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    fn render(shape: &dyn Shape, attrs: &Attributes) -> Result<String> {
        let mut defs = Definitions::new();
        let overrides = Attributes::new();
        let mut ctx = RenderContext {
            defs: &mut defs,
            overrides: &overrides,
        };
        shape.render(attrs, &mut ctx)
    }

    #[test]
    fn cross_uses_definition() {
        let svg = render(&CROSS, &attrs! { x: 1, y: 2, stroke: "red" }).unwrap();
        assert_eq!(
            svg,
            r##"<use style="stroke: red;" xlink:href="#cross" transform="translate(1.00,2.00) scale(0.67)"/>"##
        );
    }

    #[test]
    fn symbol_defaults() {
        let svg = render(&STAR, &Attributes::new()).unwrap();
        assert_eq!(
            svg,
            r##"<use xlink:href="#star" transform="translate(0.00,0.00) scale(0.40)"/>"##
        );
    }

    #[test]
    fn heart_rotates() {
        let svg = render(&HEART, &attrs! { size: 10, angle: 45, fill: "pink" }).unwrap();
        assert!(svg.contains("scale(1.00) rotate(45)"));
        assert!(svg.contains(r#"style="fill: pink;""#));
        assert_eq!(CROSS.attribute("angle"), None);
    }

    #[test]
    fn symbol_definitions_are_keyed_by_id() {
        let defs = HEART.definitions();
        assert!(defs.get("heart").unwrap().starts_with(r#"<g id="heart">"#));
    }

    #[test]
    fn arrow_renders_line_and_head() {
        let attrs = attrs! { start_x: 0, start_y: 0, end_x: 20, end_y: 0, stroke: "black" };
        let svg = render(&Arrow, &attrs).unwrap();
        let lines: Vec<&str> = svg.lines().collect();
        assert_eq!(
            lines[0],
            r#"<line x1="0.00" y1="0.00" x2="20.00" y2="0.00" stroke="black" />"#
        );
        assert_eq!(
            lines[1],
            r#"<polygon points="20.00,0.00 10.00,6.00 10.00,-6.00" stroke="black" />"#
        );
    }

    #[test]
    fn zero_length_arrow_is_an_error() {
        let attrs = attrs! { start_x: 5, start_y: 5, end_x: 5, end_y: 5 };
        assert!(matches!(render(&Arrow, &attrs), Err(SnipError::Geometry(_))));
    }

    #[test]
    fn arrow_requires_coordinates() {
        let attrs = attrs! { start_x: 5 };
        assert!(matches!(
            render(&Arrow, &attrs),
            Err(SnipError::InvalidAttribute { .. })
        ));
    }
}
