//! The renderer contract shared by every element, symbol and 3D shape.

use crate::error::{Result, SnipError};
use crate::registry::Definitions;
use crate::types::{AttrKind, Attributes};

/// State handed to a shape while it renders.
///
/// Only shapes that recurse into nested composition need more than the attributes.
pub struct RenderContext<'a> {
    /// Accumulator for `<defs>` fragments; nested composers merge into it.
    pub defs: &'a mut Definitions,
    /// Render-time overrides of the outermost call, passed on to nested composers.
    pub overrides: &'a Attributes,
}

/// A renderer: maps a typed attribute set to an SVG fragment.
pub trait Shape {
    /// Stable identifier, used as the shape registry key.
    fn id(&self) -> &str;

    /// Declared kind of `key`, or `None` if the shape does not recognize it.
    fn attribute(&self, key: &str) -> Option<AttrKind>;

    fn render(&self, attrs: &Attributes, ctx: &mut RenderContext<'_>) -> Result<String>;

    /// Reject undeclared keys and values that do not match their declared kind.
    fn validate(&self, attrs: &Attributes) -> Result<()> {
        for (key, value) in attrs.iter() {
            let kind = self
                .attribute(key)
                .ok_or_else(|| SnipError::UnknownAttribute {
                    shape: self.id().to_string(),
                    key: key.to_string(),
                })?;
            kind.validate(value)
                .map_err(|reason| SnipError::InvalidAttribute {
                    shape: self.id().to_string(),
                    key: key.to_string(),
                    expected: kind,
                    reason,
                })?;
        }
        Ok(())
    }
}

/// Error for a required attribute that is absent
pub(crate) fn missing(shape: &str, key: &str, expected: AttrKind) -> SnipError {
    SnipError::InvalidAttribute {
        shape: shape.to_string(),
        key: key.to_string(),
        expected,
        reason: "missing required value".to_string(),
    }
}
