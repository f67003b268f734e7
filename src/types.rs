//! Type definitions for canvases, attribute values and attribute sets

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use lazy_static::lazy_static;
use nalgebra::{Matrix3x4, Vector3};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

lazy_static! {
    static ref RE_HEX_COLOR: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
    static ref RE_NAMED_COLOR: Regex = Regex::new(r"^[a-zA-Z]+$").unwrap();
    static ref RE_FUNCTIONAL_COLOR: Regex = Regex::new(r#"^[a-zA-Z-]+\([^"<>]*\)$"#).unwrap();
}

/// Logical drawing size of a composer.
///
/// `scale` only affects the rendered `width`/`height` attributes, never the viewBox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(200.0, 200.0)
    }
}

// ============================================================================
// Attribute kinds
// ============================================================================

/// Declared semantic type of a shape attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    /// Numeric, written with exactly two decimals
    Float,
    /// Numeric, written in shortest form
    Number,
    /// Number or a string with a unit (`2em`)
    Length,
    /// Color keyword, hex code or functional notation
    Color,
    /// Free text
    Text,
    /// One of a fixed set of keywords (`inherit` is always accepted)
    Keyword(&'static [&'static str]),
    /// 3D point
    Point,
    /// List of 3D points
    Points,
    /// 3x4 projection matrix
    Projection,
    /// Embedded image payload
    Image,
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrKind::Float => write!(f, "float"),
            AttrKind::Number => write!(f, "number"),
            AttrKind::Length => write!(f, "length"),
            AttrKind::Color => write!(f, "color"),
            AttrKind::Text => write!(f, "text"),
            AttrKind::Keyword(words) => write!(f, "one of {}", words.join("|")),
            AttrKind::Point => write!(f, "3D point"),
            AttrKind::Points => write!(f, "list of 3D points"),
            AttrKind::Projection => write!(f, "3x4 projection matrix"),
            AttrKind::Image => write!(f, "image"),
        }
    }
}

impl AttrKind {
    /// Check that `value` is acceptable for this kind. Returns the reason on failure.
    pub fn validate(&self, value: &AttrValue) -> Result<(), String> {
        match (self, value) {
            (AttrKind::Float | AttrKind::Number | AttrKind::Length, AttrValue::Number(n)) => {
                if n.is_finite() {
                    Ok(())
                } else {
                    Err(format!("{} is not a finite number", n))
                }
            }
            (AttrKind::Length, AttrValue::Text(s)) => {
                if s.trim().is_empty() {
                    Err("empty length".to_string())
                } else {
                    Ok(())
                }
            }
            (AttrKind::Color, AttrValue::Text(s)) => {
                if is_color(s) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not a color", s))
                }
            }
            (AttrKind::Text, AttrValue::Text(_)) => Ok(()),
            (AttrKind::Text, AttrValue::Number(n)) => {
                if n.is_finite() {
                    Ok(())
                } else {
                    Err(format!("{} is not a finite number", n))
                }
            }
            (AttrKind::Keyword(words), AttrValue::Text(s)) => {
                if s == "inherit" || words.contains(&s.as_str()) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not an accepted keyword", s))
                }
            }
            (AttrKind::Point, AttrValue::Point(p)) => finite_point(p),
            (AttrKind::Points, AttrValue::Points(points)) => {
                points.iter().try_for_each(finite_point)
            }
            (AttrKind::Projection, AttrValue::Projection(m)) => {
                if m.iter().all(|v| v.is_finite()) {
                    Ok(())
                } else {
                    Err("projection matrix has non-finite entries".to_string())
                }
            }
            (AttrKind::Image, AttrValue::Image(_)) => Ok(()),
            (_, other) => Err(format!("got {}", other.kind_name())),
        }
    }
}

fn finite_point(p: &Vector3<f64>) -> Result<(), String> {
    if p.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err("point has non-finite coordinates".to_string())
    }
}

/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, keywords (`red`, `currentColor`, `none`)
/// and functional notations (`rgb(..)`, `var(--x)`, `url(#grad)`).
pub fn is_color(s: &str) -> bool {
    RE_HEX_COLOR.is_match(s) || RE_NAMED_COLOR.is_match(s) || RE_FUNCTIONAL_COLOR.is_match(s)
}

// ============================================================================
// Attribute values
// ============================================================================

/// Embedded image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Image payload for the `image` element.
///
/// `Raw` holds already-encoded file bytes; only base64 wrapping happens here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    Raw { bytes: Vec<u8>, format: ImageFormat },
    Encoded { base64: String, format: ImageFormat },
}

impl ImageSource {
    pub fn format(&self) -> ImageFormat {
        match self {
            ImageSource::Raw { format, .. } | ImageSource::Encoded { format, .. } => *format,
        }
    }

    pub fn to_base64(&self) -> String {
        match self {
            ImageSource::Raw { bytes, .. } => BASE64_STANDARD.encode(bytes),
            ImageSource::Encoded { base64, .. } => base64.clone(),
        }
    }

    /// `data:` URI usable as an `href`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.format().mime(), self.to_base64())
    }
}

/// A typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Point(Vector3<f64>),
    Points(Vec<Vector3<f64>>),
    Projection(Matrix3x4<f64>),
    Image(ImageSource),
}

impl AttrValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::Number(_) => "number",
            AttrValue::Text(_) => "text",
            AttrValue::Point(_) => "point",
            AttrValue::Points(_) => "point list",
            AttrValue::Projection(_) => "matrix",
            AttrValue::Image(_) => "image",
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<f32> for AttrValue {
    fn from(v: f32) -> Self {
        AttrValue::Number(v as f64)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::Number(v as f64)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Number(v as f64)
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        AttrValue::Number(v as f64)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Text(v)
    }
}

impl From<Vector3<f64>> for AttrValue {
    fn from(v: Vector3<f64>) -> Self {
        AttrValue::Point(v)
    }
}

impl From<[f64; 3]> for AttrValue {
    fn from(v: [f64; 3]) -> Self {
        AttrValue::Point(Vector3::from(v))
    }
}

impl From<Vec<[f64; 3]>> for AttrValue {
    fn from(v: Vec<[f64; 3]>) -> Self {
        AttrValue::Points(v.into_iter().map(Vector3::from).collect())
    }
}

impl From<Vec<Vector3<f64>>> for AttrValue {
    fn from(v: Vec<Vector3<f64>>) -> Self {
        AttrValue::Points(v)
    }
}

impl From<Matrix3x4<f64>> for AttrValue {
    fn from(v: Matrix3x4<f64>) -> Self {
        AttrValue::Projection(v)
    }
}

impl From<ImageSource> for AttrValue {
    fn from(v: ImageSource) -> Self {
        AttrValue::Image(v)
    }
}

// ============================================================================
// Attribute sets
// ============================================================================

/// Normalize a caller key to the stored snake_case form (`stroke-width` -> `stroke_width`)
pub fn normalize_key(key: &str) -> String {
    key.replace('-', "_")
}

/// A keyed set of attribute values.
///
/// Keys are stored in snake_case; kebab-case keys are normalized on insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: BTreeMap<String, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.values.insert(normalize_key(key), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<AttrValue> {
        self.values.remove(&normalize_key(key))
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.values.get(&normalize_key(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(&normalize_key(key))
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AttrValue::as_f64)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttrValue::as_str)
    }

    pub fn point(&self, key: &str) -> Option<&Vector3<f64>> {
        match self.get(key) {
            Some(AttrValue::Point(p)) => Some(p),
            _ => None,
        }
    }

    pub fn points(&self, key: &str) -> Option<&[Vector3<f64>]> {
        match self.get(key) {
            Some(AttrValue::Points(p)) => Some(p),
            _ => None,
        }
    }

    pub fn projection(&self, key: &str) -> Option<&Matrix3x4<f64>> {
        match self.get(key) {
            Some(AttrValue::Projection(m)) => Some(m),
            _ => None,
        }
    }

    pub fn image(&self, key: &str) -> Option<&ImageSource> {
        match self.get(key) {
            Some(AttrValue::Image(i)) => Some(i),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of `self` with every key from `overrides` that passes `accepts` replaced.
    pub fn merged(&self, overrides: &Attributes, accepts: impl Fn(&str) -> bool) -> Attributes {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            if accepts(key) {
                merged.values.insert(key.to_string(), value.clone());
            }
        }
        merged
    }

    /// Copy containing only the keys that pass `keep`
    pub fn filtered(&self, keep: impl Fn(&str) -> bool) -> Attributes {
        Attributes {
            values: self
                .values
                .iter()
                .filter(|(k, _)| keep(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Build an [`Attributes`] set from `key: value` pairs.
///
/// ```rust
/// let attrs = svg_snip::attrs! { cx: 10, cy: 10, r: 5, fill: "red" };
/// assert_eq!(attrs.len(), 4);
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::Attributes::new()
    };
    ($($key:ident : $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::Attributes::new();
        $( attrs.insert(stringify!($key), $value); )+
        attrs
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kebab_keys_are_normalized() {
        let attrs = Attributes::new().with("stroke-width", 2.0);
        assert!(attrs.contains_key("stroke_width"));
        assert_eq!(attrs.f64("stroke_width"), Some(2.0));
    }

    #[test]
    fn reads_accept_either_key_form() {
        let attrs = Attributes::new().with("stroke-width", 2.0).with("font_size", 3.0);
        assert_eq!(attrs.get("stroke-width"), Some(&AttrValue::Number(2.0)));
        assert!(attrs.contains_key("stroke-width"));
        assert_eq!(attrs.f64("font-size"), Some(3.0));
        assert_eq!(attrs.get("font_size"), attrs.get("font-size"));
    }

    #[test]
    fn color_grammar() {
        for ok in ["red", "currentColor", "#fff", "#00ff40", "#00000080", "rgb(255,0,0)", "url(#g)", "var(--fg)"] {
            assert!(is_color(ok), "{} should be a color", ok);
        }
        for bad in ["", "#12", "red\" onload=\"x", "12", "#ggg"] {
            assert!(!is_color(bad), "{} should not be a color", bad);
        }
    }

    #[test]
    fn validate_rejects_wrong_kinds() {
        assert!(AttrKind::Float.validate(&AttrValue::from("3")).is_err());
        assert!(AttrKind::Float.validate(&AttrValue::Number(f64::NAN)).is_err());
        assert!(AttrKind::Float.validate(&AttrValue::Number(3.0)).is_ok());
        assert!(AttrKind::Keyword(&["butt", "round"]).validate(&"round".into()).is_ok());
        assert!(AttrKind::Keyword(&["butt", "round"]).validate(&"inherit".into()).is_ok());
        assert!(AttrKind::Keyword(&["butt", "round"]).validate(&"flat".into()).is_err());
        assert!(AttrKind::Text.validate(&AttrValue::Number(4.0)).is_ok());
        assert!(AttrKind::Point.validate(&[1.0, 2.0, 3.0].into()).is_ok());
    }

    #[test]
    fn merged_applies_accepted_overrides_only() {
        let stored = attrs! { cx: 1, fill: "red" };
        let overrides = attrs! { fill: "blue", p: "ignored" };
        let merged = stored.merged(&overrides, |k| k != "p");
        assert_eq!(merged.str("fill"), Some("blue"));
        assert!(!merged.contains_key("p"));
        assert_eq!(stored.str("fill"), Some("red"));
    }

    #[test]
    fn image_source_data_uri() {
        let raw = ImageSource::Raw {
            bytes: b"abc".to_vec(),
            format: ImageFormat::Png,
        };
        assert_eq!(raw.data_uri(), "data:image/png;base64,YWJj");
        let encoded = ImageSource::Encoded {
            base64: "YWJj".to_string(),
            format: ImageFormat::Jpeg,
        };
        assert_eq!(encoded.data_uri(), "data:image/jpeg;base64,YWJj");
    }
}
