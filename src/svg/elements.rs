//! Basic SVG elements (rect, circle, ellipse, line, text, path, polygon, polyline).
//!
//! Each element is an [`ElementSpec`]: a tag name plus attribute groups. Rendering is pure
//! string building; absent attributes are omitted.

use super::attributes::{
    write_attributes, fmt_num, CONTENT, DEFAULT_ATTRIBUTES, FILL_ATTRIBUTES, FONT_ATTRIBUTES,
    STROKE_ATTRIBUTES,
};
use super::types::{AttrSpec, ElementSpec};
use crate::error::Result;
use crate::shape::{RenderContext, Shape};
use crate::types::{AttrKind, AttrValue, Attributes};

const CONTENT_GROUP: &[AttrSpec] = &[CONTENT];

const RECT_ARGS: &[AttrSpec] = &[
    AttrSpec::new("x", AttrKind::Float, "x-coordinate of the top-left corner."),
    AttrSpec::new("y", AttrKind::Float, "y-coordinate of the top-left corner."),
    AttrSpec::new("width", AttrKind::Float, "Width of the rectangle."),
    AttrSpec::new("height", AttrKind::Float, "Height of the rectangle."),
    AttrSpec::new("rx", AttrKind::Float, "Horizontal corner radius."),
    AttrSpec::new("ry", AttrKind::Float, "Vertical corner radius."),
    AttrSpec::new("fill", AttrKind::Color, "Fill color of the rectangle."),
];

const CIRCLE_ARGS: &[AttrSpec] = &[
    AttrSpec::new("cx", AttrKind::Float, "x-coordinate of the center."),
    AttrSpec::new("cy", AttrKind::Float, "y-coordinate of the center."),
    AttrSpec::new("r", AttrKind::Float, "Radius."),
];

const ELLIPSE_ARGS: &[AttrSpec] = &[
    AttrSpec::new("cx", AttrKind::Float, "x-coordinate of the center."),
    AttrSpec::new("cy", AttrKind::Float, "y-coordinate of the center."),
    AttrSpec::new("rx", AttrKind::Float, "Horizontal radius."),
    AttrSpec::new("ry", AttrKind::Float, "Vertical radius."),
];

const LINE_ARGS: &[AttrSpec] = &[
    AttrSpec::new("x1", AttrKind::Float, "x-coordinate of the start point."),
    AttrSpec::new("y1", AttrKind::Float, "y-coordinate of the start point."),
    AttrSpec::new("x2", AttrKind::Float, "x-coordinate of the end point."),
    AttrSpec::new("y2", AttrKind::Float, "y-coordinate of the end point."),
];

const TEXT_ARGS: &[AttrSpec] = &[
    AttrSpec::new("x", AttrKind::Float, "x-coordinate of the start of the baseline."),
    AttrSpec::new("y", AttrKind::Float, "y-coordinate of the start of the baseline."),
];

const PATH_ARGS: &[AttrSpec] = &[
    AttrSpec::new("d", AttrKind::Text, "Path data."),
    AttrSpec::new("fill", AttrKind::Color, "Fill color of the path."),
];

const POINTS_ARGS: &[AttrSpec] = &[
    AttrSpec::new("points", AttrKind::Text, "Space-separated list of x,y vertex pairs."),
];

pub const RECT: ElementSpec = ElementSpec {
    name: "rect",
    groups: &[RECT_ARGS, STROKE_ATTRIBUTES, DEFAULT_ATTRIBUTES, CONTENT_GROUP],
};

pub const CIRCLE: ElementSpec = ElementSpec {
    name: "circle",
    groups: &[CIRCLE_ARGS, FILL_ATTRIBUTES, STROKE_ATTRIBUTES, DEFAULT_ATTRIBUTES, CONTENT_GROUP],
};

pub const ELLIPSE: ElementSpec = ElementSpec {
    name: "ellipse",
    groups: &[ELLIPSE_ARGS, FILL_ATTRIBUTES, STROKE_ATTRIBUTES, DEFAULT_ATTRIBUTES, CONTENT_GROUP],
};

pub const LINE: ElementSpec = ElementSpec {
    name: "line",
    groups: &[LINE_ARGS, STROKE_ATTRIBUTES, DEFAULT_ATTRIBUTES, CONTENT_GROUP],
};

pub const TEXT: ElementSpec = ElementSpec {
    name: "text",
    groups: &[
        TEXT_ARGS,
        CONTENT_GROUP,
        FONT_ATTRIBUTES,
        FILL_ATTRIBUTES,
        STROKE_ATTRIBUTES,
        DEFAULT_ATTRIBUTES,
    ],
};

pub const PATH: ElementSpec = ElementSpec {
    name: "path",
    groups: &[PATH_ARGS, STROKE_ATTRIBUTES, DEFAULT_ATTRIBUTES, CONTENT_GROUP],
};

pub const POLYGON: ElementSpec = ElementSpec {
    name: "polygon",
    groups: &[POINTS_ARGS, FILL_ATTRIBUTES, STROKE_ATTRIBUTES, DEFAULT_ATTRIBUTES, CONTENT_GROUP],
};

pub const POLYLINE: ElementSpec = ElementSpec {
    name: "polyline",
    groups: &[POINTS_ARGS, FILL_ATTRIBUTES, STROKE_ATTRIBUTES, DEFAULT_ATTRIBUTES, CONTENT_GROUP],
};

/// All basic elements, for lookup by tag name
pub const ELEMENTS: &[ElementSpec] = &[RECT, CIRCLE, ELLIPSE, LINE, TEXT, PATH, POLYGON, POLYLINE];

impl ElementSpec {
    /// Render the element from already validated attributes.
    pub fn to_svg(&self, attrs: &Attributes) -> String {
        let written = write_attributes(self.attributes(), attrs);
        let open = if written.is_empty() {
            format!("<{}", self.name)
        } else {
            format!("<{} {}", self.name, written)
        };
        match attrs.get(CONTENT.name) {
            Some(AttrValue::Text(content)) => format!("{}>{}</{}>", open, content, self.name),
            Some(AttrValue::Number(n)) => format!("{}>{}</{}>", open, fmt_num(*n), self.name),
            _ => format!("{} />", open),
        }
    }
}

impl Shape for ElementSpec {
    fn id(&self) -> &str {
        self.name
    }

    fn attribute(&self, key: &str) -> Option<AttrKind> {
        self.find(key).map(|spec| spec.kind)
    }

    fn render(&self, attrs: &Attributes, _ctx: &mut RenderContext<'_>) -> Result<String> {
        Ok(self.to_svg(attrs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;

    #[test]
    fn circle_self_closing() {
        let attrs = attrs! { cx: 10, cy: 10, r: 5, fill: "red" };
        assert_eq!(
            CIRCLE.to_svg(&attrs),
            r#"<circle cx="10.00" cy="10.00" r="5.00" fill="red" />"#
        );
    }

    #[test]
    fn absent_attributes_are_omitted() {
        assert_eq!(RECT.to_svg(&Attributes::new()), "<rect />");
        let attrs = attrs! { width: 4 };
        assert_eq!(RECT.to_svg(&attrs), r#"<rect width="4.00" />"#);
    }

    #[test]
    fn content_switches_to_open_close_form() {
        let attrs = attrs! { x: 1, y: 2, content: "hello", text_anchor: "middle" };
        assert_eq!(
            TEXT.to_svg(&attrs),
            r#"<text x="1.00" y="2.00" text-anchor="middle">hello</text>"#
        );
    }

    #[test]
    fn kebab_case_attribute_names() {
        let attrs = attrs! { x1: 0, y1: 0, x2: 1, y2: 1, stroke_width: 2, stroke_linecap: "round" };
        assert_eq!(
            LINE.to_svg(&attrs),
            r#"<line x1="0.00" y1="0.00" x2="1.00" y2="1.00" stroke-width="2.00" stroke-linecap="round" />"#
        );
    }

    #[test]
    fn declared_attributes() {
        assert_eq!(CIRCLE.attribute("r"), Some(AttrKind::Float));
        assert_eq!(CIRCLE.attribute("fill"), Some(AttrKind::Color));
        assert_eq!(CIRCLE.attribute("content"), Some(AttrKind::Text));
        assert_eq!(LINE.attribute("fill"), None);
        assert_eq!(RECT.attribute("fill"), Some(AttrKind::Color));
    }

    #[test]
    fn validate_rejects_unknown_and_malformed() {
        assert!(CIRCLE.validate(&attrs! { cx: 1 }).is_ok());
        assert!(CIRCLE.validate(&attrs! { x1: 1 }).is_err());
        assert!(CIRCLE.validate(&attrs! { cx: "ten" }).is_err());
        assert!(CIRCLE.validate(&attrs! { fill: "not a color" }).is_err());
    }
}
