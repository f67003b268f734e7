//! 3D elements drawn through a 3x4 projection matrix.
//!
//! A world point `X` maps to the image point `x = P * [X; 1]`, divided by its last
//! component. Every 3D shape delegates to a basic element and forwards that element's
//! attributes, so `stroke_width` etc. work as in 2D.

use nalgebra::{Matrix3x4, Vector3, Vector4};

use super::attributes::{format_float, indent};
use super::elements::{CIRCLE, LINE, POLYGON, TEXT};
use super::types::{AttrSpec, ElementSpec};
use crate::error::{Result, SnipError};
use crate::shape::{missing, RenderContext, Shape};
use crate::types::{AttrKind, Attributes};

/// Project a world point to image coordinates.
pub fn project(p: &Matrix3x4<f64>, world: &Vector3<f64>) -> Result<(f64, f64)> {
    let image = p * Vector4::new(world.x, world.y, world.z, 1.0);
    // P is only defined up to scale, so any nonzero w is usable
    let (x, y) = (image.x / image.z, image.y / image.z);
    if image.z == 0.0 || !x.is_finite() || !y.is_finite() {
        return Err(SnipError::Geometry(format!(
            "point ({}, {}, {}) projects to infinity",
            world.x, world.y, world.z
        )));
    }
    Ok((x, y))
}

const PROJECTION: AttrSpec = AttrSpec::new("p", AttrKind::Projection, "3x4 projection matrix.");

const POINT_ARGS: &[AttrSpec] = &[
    PROJECTION,
    AttrSpec::new("at", AttrKind::Point, "World position of the point."),
];

const LINE_ARGS: &[AttrSpec] = &[
    PROJECTION,
    AttrSpec::new("start", AttrKind::Point, "World position of the start point."),
    AttrSpec::new("end", AttrKind::Point, "World position of the end point."),
];

const TEXT_ARGS: &[AttrSpec] = &[
    PROJECTION,
    AttrSpec::new("at", AttrKind::Point, "World position of the text anchor."),
];

const POLYGON_ARGS: &[AttrSpec] = &[
    PROJECTION,
    AttrSpec::new("vertices", AttrKind::Points, "World positions of the vertices."),
];

const CUBE_ARGS: &[AttrSpec] = &[
    PROJECTION,
    AttrSpec::new("min", AttrKind::Point, "Minimum corner of the axis-aligned box."),
    AttrSpec::new("max", AttrKind::Point, "Maximum corner of the axis-aligned box."),
];

const PYRAMID_ARGS: &[AttrSpec] = &[
    PROJECTION,
    AttrSpec::new("apex", AttrKind::Point, "Tip of the pyramid (e.g. a camera center)."),
    AttrSpec::new("origin", AttrKind::Point, "Base corner."),
    AttrSpec::new("u", AttrKind::Point, "Base corner adjacent to origin along u."),
    AttrSpec::new("v", AttrKind::Point, "Base corner adjacent to origin along v."),
    AttrSpec::new("uv", AttrKind::Point, "Base corner opposite to origin."),
];

/// 3D shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projected {
    Point,
    Line,
    Text,
    Polygon,
    WireCube,
    WirePyramid,
}

pub const PROJECTED: &[Projected] = &[
    Projected::Point,
    Projected::Line,
    Projected::Text,
    Projected::Polygon,
    Projected::WireCube,
    Projected::WirePyramid,
];

impl Projected {
    fn own(&self) -> &'static [AttrSpec] {
        match self {
            Projected::Point => POINT_ARGS,
            Projected::Line => LINE_ARGS,
            Projected::Text => TEXT_ARGS,
            Projected::Polygon => POLYGON_ARGS,
            Projected::WireCube => CUBE_ARGS,
            Projected::WirePyramid => PYRAMID_ARGS,
        }
    }

    /// The 2D element this shape is drawn with
    fn base(&self) -> ElementSpec {
        match self {
            Projected::Point => CIRCLE,
            Projected::Text => TEXT,
            Projected::Polygon => POLYGON,
            Projected::Line | Projected::WireCube | Projected::WirePyramid => LINE,
        }
    }

    /// Base attributes computed from the projection, not settable by the caller
    fn computed(&self) -> &'static [&'static str] {
        match self {
            Projected::Point => &["cx", "cy"],
            Projected::Text => &["x", "y"],
            Projected::Polygon => &["points"],
            Projected::Line | Projected::WireCube | Projected::WirePyramid => {
                &["x1", "y1", "x2", "y2"]
            }
        }
    }

    fn defaults(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Projected::Point => &[("r", "3"), ("fill", "purple")],
            Projected::Line => &[("stroke", "green")],
            Projected::Text => &[],
            Projected::Polygon => &[("fill", "#00ff40"), ("stroke", "green")],
            Projected::WireCube => &[("stroke", "blue")],
            Projected::WirePyramid => &[("stroke", "#00000080")],
        }
    }

    fn forwards(&self, key: &str) -> bool {
        !self.computed().contains(&key) && self.base().find(key).is_some()
    }

    /// Caller attributes meant for the base element, with shape defaults filled in
    fn style(&self, attrs: &Attributes) -> Attributes {
        let mut style = attrs.filtered(|k| self.forwards(k));
        for (key, value) in self.defaults() {
            if !style.contains_key(key) {
                match self.base().find(key).map(|spec| spec.kind) {
                    Some(AttrKind::Float) => style.insert(key, value.parse::<f64>().unwrap_or(0.0)),
                    _ => style.insert(key, *value),
                };
            }
        }
        style
    }

    fn point<'a>(&self, attrs: &'a Attributes, key: &str) -> Result<&'a Vector3<f64>> {
        attrs
            .point(key)
            .ok_or_else(|| missing(self.id(), key, AttrKind::Point))
    }
}

fn line_between(
    p: &Matrix3x4<f64>,
    start: &Vector3<f64>,
    end: &Vector3<f64>,
    style: &Attributes,
) -> Result<String> {
    let (x1, y1) = project(p, start)?;
    let (x2, y2) = project(p, end)?;
    let attrs = style
        .clone()
        .with("x1", x1)
        .with("y1", y1)
        .with("x2", x2)
        .with("y2", y2);
    Ok(LINE.to_svg(&attrs))
}

fn group(lines: Vec<String>) -> String {
    format!("<g>\n{}\n</g>", indent(&lines.join("\n")))
}

/// The 12 edges of the box spanned by `min` and `max`
fn box_edges(min: &Vector3<f64>, max: &Vector3<f64>) -> Vec<(Vector3<f64>, Vector3<f64>)> {
    let corner = |i: usize| {
        Vector3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };
    let mut edges = Vec::with_capacity(12);
    for a in 0..8usize {
        for b in (a + 1)..8 {
            if (a ^ b).count_ones() == 1 {
                edges.push((corner(a), corner(b)));
            }
        }
    }
    edges
}

impl Shape for Projected {
    fn id(&self) -> &str {
        match self {
            Projected::Point => "point3d",
            Projected::Line => "line3d",
            Projected::Text => "text3d",
            Projected::Polygon => "polygon3d",
            Projected::WireCube => "wire_cube",
            Projected::WirePyramid => "wire_pyramid",
        }
    }

    fn attribute(&self, key: &str) -> Option<AttrKind> {
        if let Some(spec) = self.own().iter().find(|spec| spec.name == key) {
            return Some(spec.kind);
        }
        if self.forwards(key) {
            self.base().attribute(key)
        } else {
            None
        }
    }

    fn render(&self, attrs: &Attributes, _ctx: &mut RenderContext<'_>) -> Result<String> {
        let p = attrs
            .projection("p")
            .ok_or_else(|| missing(self.id(), "p", AttrKind::Projection))?;
        let style = self.style(attrs);

        match self {
            Projected::Point => {
                let (cx, cy) = project(p, self.point(attrs, "at")?)?;
                Ok(CIRCLE.to_svg(&style.with("cx", cx).with("cy", cy)))
            }
            Projected::Text => {
                let (x, y) = project(p, self.point(attrs, "at")?)?;
                Ok(TEXT.to_svg(&style.with("x", x).with("y", y)))
            }
            Projected::Line => {
                line_between(p, self.point(attrs, "start")?, self.point(attrs, "end")?, &style)
            }
            Projected::Polygon => {
                let vertices = attrs
                    .points("vertices")
                    .ok_or_else(|| missing(self.id(), "vertices", AttrKind::Points))?;
                let points = vertices
                    .iter()
                    .map(|v| project(p, v).map(|(x, y)| format!("{},{}", format_float(x), format_float(y))))
                    .collect::<Result<Vec<_>>>()?
                    .join(" ");
                Ok(POLYGON.to_svg(&style.with("points", points)))
            }
            Projected::WireCube => {
                let min = self.point(attrs, "min")?;
                let max = self.point(attrs, "max")?;
                let lines = box_edges(min, max)
                    .iter()
                    .map(|(a, b)| line_between(p, a, b, &style))
                    .collect::<Result<Vec<_>>>()?;
                Ok(group(lines))
            }
            Projected::WirePyramid => {
                let apex = self.point(attrs, "apex")?;
                let origin = self.point(attrs, "origin")?;
                let u = self.point(attrs, "u")?;
                let v = self.point(attrs, "v")?;
                let uv = self.point(attrs, "uv")?;
                let edges = [
                    (origin, u),
                    (origin, v),
                    (u, uv),
                    (v, uv),
                    (apex, origin),
                    (apex, u),
                    (apex, v),
                    (apex, uv),
                ];
                let lines = edges
                    .iter()
                    .map(|(a, b)| line_between(p, a, b, &style))
                    .collect::<Result<Vec<_>>>()?;
                Ok(group(lines))
            }
        }
    }
}
