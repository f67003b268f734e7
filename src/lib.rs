//! svg-snip - Compose SVG snippets from typed shape renderers
//!
//! This library renders basic SVG elements, symbols with shared `<defs>`, embedded
//! images and 3D wireframes (through a projection matrix) into small SVG documents.
//! Snippets are collected in a [`Composer`] and rendered together, optionally with
//! per-render overrides, as animation frames, or nested inside another composer.
//!
//! # Example
//!
//! ```rust
//! use svg_snip::{attrs, Canvas, Composer, RenderOptions};
//! use svg_snip::svg::{CIRCLE, CROSS};
//!
//! let mut svg = Composer::new(Canvas::new(100.0, 100.0));
//! svg.add(CIRCLE, attrs! { cx: 50, cy: 50, r: 20, fill: "red" }).unwrap();
//! svg.add(CROSS, attrs! { x: 50, y: 50, stroke: "black" }).unwrap();
//! let document = svg.render(&RenderOptions::default()).unwrap();
//! assert!(document.contains("<defs>"));
//! ```
//!
//! # Supported Shapes
//!
//! - Basic elements (rect, circle, ellipse, line, text, path, polygon, polyline)
//! - Symbols (cross, star, heart) and arrows
//! - Embedded PNG/JPEG images
//! - 3D points, lines, text, polygons, wire cubes and wire pyramids
//! - Groups wrapping a nested composer

pub mod error;
pub mod types;
pub mod registry;
pub mod shape;
pub mod svg;
pub mod composer;
pub mod display;
pub mod scene;

pub use composer::{Composer, EntryId, Group, RenderOptions};
pub use display::{DisplaySurface, MemorySurface, WriterSurface};
pub use error::{Result, SnipError};
pub use registry::{Definitions, ShapeRegistry};
pub use scene::{load_scene, LoadedScene, SceneFile, SceneItem};
pub use shape::{RenderContext, Shape};
pub use types::{AttrKind, AttrValue, Attributes, Canvas, ImageFormat, ImageSource};

/// Render a JSON scene description to SVG text.
///
/// Scenes with `frames` render one document per frame, joined by newlines.
///
/// # Example
/// ```rust
/// let svg = svg_snip::render_scene_json(
///     r#"{ "canvas": { "width": 20, "height": 20 },
///          "scene": [ { "shape": "circle", "cx": 10, "cy": 10, "r": 5 } ] }"#,
/// ).unwrap();
/// assert!(svg.starts_with("<svg "));
/// ```
pub fn render_scene_json(input: &str) -> Result<String> {
    load_scene(input)?.render()
}

/// Like [`render_scene_json`], forcing the debug source view on or off.
pub fn render_scene_json_with(input: &str, debug: bool) -> Result<String> {
    let mut scene = load_scene(input)?;
    scene.options.debug = debug;
    scene.render()
}
