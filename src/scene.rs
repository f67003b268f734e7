//! JSON scene files.
//!
//! ```json
//! {
//!   "canvas": { "width": 100, "height": 100, "scale": 2 },
//!   "scene": [
//!     { "shape": "circle", "cx": 50, "cy": 50, "r": 10, "fill": "red" },
//!     { "shape": "group", "transform": "translate(5,5)", "scene": [
//!       { "shape": "cross", "x": 0, "y": 0 }
//!     ] }
//!   ],
//!   "overrides": { "stroke": "black" },
//!   "frames": [ { "r": 5 }, { "r": 15 } ]
//! }
//! ```
//!
//! Values are converted using the declared kind of each key, so `[1, 2, 3]` becomes a
//! 3D point for 3D shapes and a projection is written as three rows of four numbers.

use nalgebra::{Matrix3x4, Vector3};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::composer::{Composer, Group, RenderOptions};
use crate::error::{Result, SnipError};
use crate::shape::Shape;
use crate::svg::attributes::fmt_num;
use crate::svg::shape_by_name;
use crate::types::{normalize_key, AttrKind, AttrValue, Attributes, Canvas, ImageSource};

/// Top-level scene description
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    pub canvas: Canvas,
    #[serde(default)]
    pub scene: Vec<SceneItem>,
    /// Applied to every render of the scene
    #[serde(default)]
    pub overrides: Map<String, Value>,
    /// One override set per animation frame
    #[serde(default)]
    pub frames: Vec<Map<String, Value>>,
    #[serde(default)]
    pub debug: bool,
}

/// One entry of a scene: a shape id plus its attributes
#[derive(Debug, Clone, Deserialize)]
pub struct SceneItem {
    pub shape: String,
    /// Children of a `group` item
    #[serde(default)]
    pub scene: Vec<SceneItem>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A scene ready to render
#[derive(Debug)]
pub struct LoadedScene {
    pub composer: Composer,
    pub options: RenderOptions,
    pub frames: Vec<Attributes>,
}

impl LoadedScene {
    /// Render the scene, or all frames one after another when frames are given.
    pub fn render(&self) -> Result<String> {
        if self.frames.is_empty() {
            return self.composer.render(&self.options);
        }
        let frames: Vec<Attributes> = self
            .frames
            .iter()
            .map(|frame| self.options.overrides.merged(frame, |_| true))
            .collect();
        let (_, body) = self.composer.animate(&frames)?;
        Ok(body)
    }
}

/// Parse a JSON scene description.
pub fn load_scene(input: &str) -> Result<LoadedScene> {
    let file: SceneFile = serde_json::from_str(input)?;
    build_scene(file)
}

pub fn build_scene(file: SceneFile) -> Result<LoadedScene> {
    if !(file.canvas.width > 0.0 && file.canvas.height > 0.0 && file.canvas.scale > 0.0) {
        return Err(SnipError::Scene(format!(
            "canvas must have positive width, height and scale, got {}x{} at {}",
            file.canvas.width, file.canvas.height, file.canvas.scale
        )));
    }

    let composer = build_composer(file.canvas, &file.scene)?;
    let options = RenderOptions::new()
        .debug(file.debug)
        .with_overrides(override_attributes(&file.scene, &file.overrides)?);
    let frames = file
        .frames
        .iter()
        .map(|frame| override_attributes(&file.scene, frame))
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "loaded scene with {} entries and {} frames",
        composer.len(),
        frames.len()
    );
    Ok(LoadedScene {
        composer,
        options,
        frames,
    })
}

fn build_composer(canvas: Canvas, items: &[SceneItem]) -> Result<Composer> {
    let mut composer = Composer::new(canvas);
    for item in items {
        if item.shape == "group" {
            let group = Group::new(build_composer(canvas, &item.scene)?);
            let attributes = convert_attributes(&group, "group", &item.attributes)?;
            composer.add(group, attributes)?;
            continue;
        }
        if !item.scene.is_empty() {
            return Err(SnipError::Scene(format!(
                "only group items may contain a scene, found one in '{}'",
                item.shape
            )));
        }
        let shape = shape_by_name(&item.shape)
            .ok_or_else(|| SnipError::UnknownShape(item.shape.clone()))?;
        let attributes = convert_attributes(shape.as_ref(), &item.shape, &item.attributes)?;
        composer.add_shared(shape, attributes)?;
    }
    Ok(composer)
}

fn convert_attributes(
    shape: &dyn Shape,
    shape_name: &str,
    values: &Map<String, Value>,
) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for (key, value) in values {
        let key = normalize_key(key);
        let kind = shape
            .attribute(&key)
            .ok_or_else(|| SnipError::UnknownAttribute {
                shape: shape_name.to_string(),
                key: key.clone(),
            })?;
        let converted = convert_value(kind, value).map_err(|reason| SnipError::InvalidAttribute {
            shape: shape_name.to_string(),
            key: key.clone(),
            expected: kind,
            reason,
        })?;
        attributes.insert(&key, converted);
    }
    Ok(attributes)
}

/// Convert a JSON value to the representation `kind` expects.
pub fn convert_value(kind: AttrKind, value: &Value) -> std::result::Result<AttrValue, String> {
    match kind {
        AttrKind::Point => point(value).map(AttrValue::Point),
        AttrKind::Points => match value {
            Value::Array(items) => items
                .iter()
                .map(point)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(AttrValue::Points),
            other => Err(format!("expected a list of points, got {}", other)),
        },
        AttrKind::Projection => projection(value).map(AttrValue::Projection),
        AttrKind::Image => serde_json::from_value::<ImageSource>(value.clone())
            .map(AttrValue::Image)
            .map_err(|e| e.to_string()),
        // lists such as stroke_dasharray: [4, 2] -> "4 2"
        AttrKind::Text | AttrKind::Length => match value {
            Value::Array(items) => items
                .iter()
                .map(list_item)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(|parts| AttrValue::Text(parts.join(" "))),
            _ => scalar(value),
        },
        _ => scalar(value),
    }
}

fn list_item(value: &Value) -> std::result::Result<String, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(fmt_num)
            .ok_or_else(|| format!("{} is not representable as a float", n)),
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("expected a number or string list item, got {}", other)),
    }
}

/// Convert a JSON value without a declared kind, guessing from its shape.
pub fn infer_value(value: &Value) -> std::result::Result<AttrValue, String> {
    match value {
        Value::Array(items) if items.len() == 3 && items.iter().all(Value::is_number) => {
            point(value).map(AttrValue::Point)
        }
        Value::Array(rows) if rows.len() == 3 && rows.iter().all(|r| row_len(r) == Some(4)) => {
            projection(value).map(AttrValue::Projection)
        }
        Value::Array(_) => convert_value(AttrKind::Points, value),
        Value::Object(_) => convert_value(AttrKind::Image, value),
        _ => scalar(value),
    }
}

/// Kind of `key` on the first shape in `items` that declares it, depth first
fn declared_kind(items: &[SceneItem], key: &str) -> Option<AttrKind> {
    items.iter().find_map(|item| {
        let own = if item.shape == "group" {
            Group::declared(key)
        } else {
            shape_by_name(&item.shape).and_then(|shape| shape.attribute(key))
        };
        own.or_else(|| declared_kind(&item.scene, key))
    })
}

/// Overrides are typed by the scene's shapes; keys nobody declares are inferred.
fn override_attributes(items: &[SceneItem], values: &Map<String, Value>) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for (key, value) in values {
        let key = normalize_key(key);
        let converted = match declared_kind(items, &key) {
            Some(kind) => convert_value(kind, value),
            None => infer_value(value),
        }
        .map_err(|reason| SnipError::Scene(format!("override '{}': {}", key, reason)))?;
        attributes.insert(&key, converted);
    }
    Ok(attributes)
}

fn scalar(value: &Value) -> std::result::Result<AttrValue, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(AttrValue::Number)
            .ok_or_else(|| format!("{} is not representable as a float", n)),
        Value::String(s) => Ok(AttrValue::Text(s.clone())),
        other => Err(format!("expected a number or string, got {}", other)),
    }
}

fn numbers(value: &Value, expected: usize) -> std::result::Result<Vec<f64>, String> {
    match value {
        Value::Array(items) if items.len() == expected => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| format!("expected a number, got {}", item))
            })
            .collect(),
        other => Err(format!("expected {} numbers, got {}", expected, other)),
    }
}

fn row_len(value: &Value) -> Option<usize> {
    value.as_array().map(Vec::len)
}

fn point(value: &Value) -> std::result::Result<Vector3<f64>, String> {
    let xyz = numbers(value, 3)?;
    Ok(Vector3::new(xyz[0], xyz[1], xyz[2]))
}

fn projection(value: &Value) -> std::result::Result<Matrix3x4<f64>, String> {
    let rows = match value {
        Value::Array(rows) if rows.len() == 3 => rows,
        other => return Err(format!("expected 3 rows of 4 numbers, got {}", other)),
    };
    let mut entries = Vec::with_capacity(12);
    for row in rows {
        entries.extend(numbers(row, 4)?);
    }
    Ok(Matrix3x4::from_row_slice(&entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_basic_scene() {
        let scene = load_scene(
            r#"{
                "canvas": { "width": 20, "height": 20 },
                "scene": [ { "shape": "circle", "cx": 10, "cy": 10, "r": 5, "fill": "red" } ]
            }"#,
        )
        .unwrap();
        assert_eq!(scene.composer.len(), 1);
        let svg = scene.render().unwrap();
        assert!(svg.contains(r#"<circle cx="10.00" cy="10.00" r="5.00" fill="red" />"#));
    }

    #[test]
    fn kebab_case_keys_are_accepted() {
        let scene = load_scene(
            r#"{ "canvas": { "width": 10, "height": 10 },
                 "scene": [ { "shape": "line", "x1": 0, "stroke-width": 2 } ] }"#,
        )
        .unwrap();
        assert!(scene.render().unwrap().contains(r#"stroke-width="2.00""#));
    }

    #[test]
    fn unknown_shape_and_key_are_errors() {
        let unknown_shape = load_scene(
            r#"{ "canvas": { "width": 10, "height": 10 }, "scene": [ { "shape": "blob" } ] }"#,
        );
        assert!(matches!(unknown_shape, Err(SnipError::UnknownShape(_))));

        let unknown_key = load_scene(
            r#"{ "canvas": { "width": 10, "height": 10 },
                 "scene": [ { "shape": "rect", "radius": 3 } ] }"#,
        );
        assert!(matches!(unknown_key, Err(SnipError::UnknownAttribute { .. })));
    }

    #[test]
    fn invalid_canvas_is_rejected() {
        let result = load_scene(r#"{ "canvas": { "width": 0, "height": 10 } }"#);
        assert!(matches!(result, Err(SnipError::Scene(_))));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(load_scene("{ nope"), Err(SnipError::Json(_))));
    }

    #[test]
    fn values_follow_declared_kind() {
        assert_eq!(
            convert_value(AttrKind::Point, &json!([1, 2, 3])).unwrap(),
            AttrValue::Point(Vector3::new(1.0, 2.0, 3.0))
        );
        let matrix = json!([[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0]]);
        match convert_value(AttrKind::Projection, &matrix).unwrap() {
            AttrValue::Projection(m) => assert_eq!(m[(2, 2)], 1.0),
            other => panic!("unexpected {:?}", other),
        }
        assert!(convert_value(AttrKind::Point, &json!([1, 2])).is_err());
        assert!(convert_value(AttrKind::Float, &json!(true)).is_err());
        let image = json!({ "base64": "AAAA", "format": "png" });
        assert!(matches!(
            convert_value(AttrKind::Image, &image).unwrap(),
            AttrValue::Image(ImageSource::Encoded { .. })
        ));
    }

    #[test]
    fn projection_matrix_is_row_major() {
        let matrix = json!([[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12]]);
        let m = projection(&matrix).unwrap();
        assert_eq!(m[(0, 3)], 4.0);
        assert_eq!(m[(1, 0)], 5.0);
    }

    #[test]
    fn overrides_are_inferred() {
        assert_eq!(infer_value(&json!("blue")).unwrap(), AttrValue::Text("blue".into()));
        assert_eq!(infer_value(&json!(2)).unwrap(), AttrValue::Number(2.0));
        assert!(matches!(
            infer_value(&json!([0, 0, 1])).unwrap(),
            AttrValue::Point(_)
        ));
        assert!(matches!(
            infer_value(&json!([[0, 0, 1], [1, 0, 1]])).unwrap(),
            AttrValue::Points(_)
        ));
    }

    #[test]
    fn group_items_nest_scenes() {
        let scene = load_scene(
            r#"{ "canvas": { "width": 10, "height": 10 },
                 "scene": [
                   { "shape": "group", "transform": "scale(2)",
                     "scene": [ { "shape": "cross", "x": 1, "y": 1 } ] }
                 ] }"#,
        )
        .unwrap();
        let svg = scene.render().unwrap();
        assert!(svg.contains(r#"<g transform="scale(2)">"#));
        assert_eq!(svg.matches(r#"<g id="cross">"#).count(), 1);
    }

    #[test]
    fn children_only_allowed_in_groups() {
        let result = load_scene(
            r#"{ "canvas": { "width": 10, "height": 10 },
                 "scene": [ { "shape": "rect", "scene": [ { "shape": "rect" } ] } ] }"#,
        );
        assert!(matches!(result, Err(SnipError::Scene(_))));
    }

    #[test]
    fn overrides_follow_declared_kind() {
        let scene = load_scene(
            r#"{ "canvas": { "width": 10, "height": 10 },
                 "scene": [ { "shape": "line", "x1": 0, "x2": 10 } ],
                 "frames": [ { "stroke_dasharray": [4, 4, 4] }, { "stroke-dasharray": "1 2" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            scene.frames[0].get("stroke_dasharray"),
            Some(&AttrValue::Text("4 4 4".into()))
        );
        let svg = scene.render().unwrap();
        assert!(svg.contains(r#"stroke-dasharray="4 4 4""#));
        assert!(svg.contains(r#"stroke-dasharray="1 2""#));
    }

    #[test]
    fn nested_3d_shapes_type_point_overrides() {
        let scene = load_scene(
            r#"{ "canvas": { "width": 100, "height": 100 },
                 "scene": [ { "shape": "group", "scene": [
                   { "shape": "point3d",
                     "p": [[100, 0, 50, 0], [0, 100, 50, 0], [0, 0, 1, 0]],
                     "at": [0, 0, 1] } ] } ],
                 "overrides": { "at": [1, -1, 4] } }"#,
        )
        .unwrap();
        assert!(matches!(
            scene.options.overrides.get("at"),
            Some(AttrValue::Point(_))
        ));
        assert!(scene.render().unwrap().contains(r#"cx="75.00" cy="25.00""#));
    }

    #[test]
    fn frames_render_one_document_each() {
        let scene = load_scene(
            r#"{ "canvas": { "width": 10, "height": 10 },
                 "scene": [ { "shape": "circle", "r": 1, "fill": "red" } ],
                 "overrides": { "fill": "blue" },
                 "frames": [ { "r": 2 }, { "r": 3 } ] }"#,
        )
        .unwrap();
        let svg = scene.render().unwrap();
        assert_eq!(svg.matches("<svg ").count(), 2);
        assert_eq!(svg.matches(r#"fill="blue""#).count(), 2);
        assert!(svg.contains(r#"--index: 1;"#));
    }
}
