//! SVG shapes - every built-in element renders to a string fragment.
//!
//! Provides:
//! - Basic elements (rect, circle, ellipse, line, text, path, polygon, polyline)
//! - Symbols with shared definitions (cross, star, heart) and arrows
//! - Embedded images
//! - 3D elements drawn through a projection matrix
//!
//! Pure string building, no DOM manipulation.

mod types;
pub mod attributes;
mod elements;
mod symbols;
mod image;
mod projection;
pub mod document;

use std::rc::Rc;

use crate::shape::Shape;

pub use types::{AttrSpec, ElementSpec};
pub use elements::{CIRCLE, ELEMENTS, ELLIPSE, LINE, PATH, POLYGON, POLYLINE, RECT, TEXT};
pub use symbols::{declare_symbols, Arrow, Symbol, CROSS, HEART, STAR, SYMBOLS};
pub use image::Image;
pub use projection::{project, Projected, PROJECTED};

/// Look up a built-in shape by its id, e.g. `"circle"` or `"wire_cube"`.
///
/// `group` is not included; it wraps a composer and is built with
/// [`crate::Composer::add_group`].
pub fn shape_by_name(name: &str) -> Option<Rc<dyn Shape>> {
    if let Some(element) = ELEMENTS.iter().find(|e| e.name == name) {
        return Some(Rc::new(*element));
    }
    if let Some(symbol) = SYMBOLS.iter().find(|s| s.id() == name) {
        return Some(Rc::new(*symbol));
    }
    if let Some(projected) = PROJECTED.iter().find(|p| p.id() == name) {
        return Some(Rc::new(*projected));
    }
    match name {
        "arrow" => Some(Rc::new(Arrow)),
        "image" => Some(Rc::new(Image)),
        _ => None,
    }
}
