//! Inline images as base64 `data:` URIs (e.g. a background under a vector overlay).

use super::attributes::{format_float, write_attributes, DEFAULT_ATTRIBUTES};
use crate::error::Result;
use crate::shape::{missing, RenderContext, Shape};
use crate::types::{AttrKind, Attributes};

#[derive(Debug, Clone, Copy)]
pub struct Image;

impl Shape for Image {
    fn id(&self) -> &str {
        "image"
    }

    fn attribute(&self, key: &str) -> Option<AttrKind> {
        match key {
            "x" | "y" | "width" | "height" => Some(AttrKind::Float),
            "data" => Some(AttrKind::Image),
            _ => DEFAULT_ATTRIBUTES
                .iter()
                .find(|spec| spec.name == key)
                .map(|spec| spec.kind),
        }
    }

    fn render(&self, attrs: &Attributes, _ctx: &mut RenderContext<'_>) -> Result<String> {
        let data = attrs
            .image("data")
            .ok_or_else(|| missing("image", "data", AttrKind::Image))?;

        let mut parts = vec![
            format!(r#"x="{}px""#, format_float(attrs.f64("x").unwrap_or(0.0))),
            format!(r#"y="{}px""#, format_float(attrs.f64("y").unwrap_or(0.0))),
        ];
        for key in ["width", "height"] {
            if let Some(v) = attrs.f64(key) {
                parts.push(format!(r#"{}="{}px""#, key, format_float(v)));
            }
        }
        let extra = write_attributes(DEFAULT_ATTRIBUTES.iter(), attrs);
        if !extra.is_empty() {
            parts.push(extra);
        }
        parts.push(format!(r#"href="{}""#, data.data_uri()));

        Ok(format!("<image {} />", parts.join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Definitions;
    use crate::types::{ImageFormat, ImageSource};

    fn render(attrs: &Attributes) -> Result<String> {
        let mut defs = Definitions::new();
        let overrides = Attributes::new();
        let mut ctx = RenderContext {
            defs: &mut defs,
            overrides: &overrides,
        };
        Image.render(attrs, &mut ctx)
    }

    #[test]
    fn raw_bytes_are_base64_encoded() {
        let source = ImageSource::Raw {
            bytes: vec![0x89, b'P', b'N', b'G'],
            format: ImageFormat::Png,
        };
        let attrs = Attributes::new().with("data", source).with("width", 20);
        assert_eq!(
            render(&attrs).unwrap(),
            r#"<image x="0.00px" y="0.00px" width="20.00px" href="data:image/png;base64,iVBORw==" />"#
        );
    }

    #[test]
    fn encoded_payload_is_used_verbatim() {
        let source = ImageSource::Encoded {
            base64: "AAAA".to_string(),
            format: ImageFormat::Jpeg,
        };
        let attrs = Attributes::new().with("data", source).with("style", "opacity: 0.5");
        let svg = render(&attrs).unwrap();
        assert!(svg.contains(r#"style="opacity: 0.5""#));
        assert!(svg.ends_with(r#"href="data:image/jpeg;base64,AAAA" />"#));
    }

    #[test]
    fn missing_data_is_an_error() {
        assert!(render(&Attributes::new()).is_err());
    }
}
