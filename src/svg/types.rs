//! Declarative attribute and element descriptions.

use crate::types::AttrKind;

/// One declared attribute of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttrSpec {
    /// snake_case key; serialized with `_` replaced by `-`
    pub name: &'static str,
    pub kind: AttrKind,
    pub doc: &'static str,
}

impl AttrSpec {
    pub const fn new(name: &'static str, kind: AttrKind, doc: &'static str) -> Self {
        Self { name, kind, doc }
    }
}

/// A basic SVG element described by its tag name and attribute groups.
///
/// Attributes are written in declaration order: groups in order, then entries in order.
#[derive(Debug, Clone, Copy)]
pub struct ElementSpec {
    pub name: &'static str,
    pub groups: &'static [&'static [AttrSpec]],
}

impl ElementSpec {
    pub fn attributes(&self) -> impl Iterator<Item = &'static AttrSpec> {
        let groups: &'static [&'static [AttrSpec]] = self.groups;
        groups.iter().flat_map(|group| group.iter())
    }

    pub fn find(&self, key: &str) -> Option<&'static AttrSpec> {
        self.attributes().find(|spec| spec.name == key)
    }
}
