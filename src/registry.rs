//! Shape registry - one-time `<defs>` fragments required by shapes.
//!
//! A shape that references reusable markup (e.g. `<use xlink:href="#cross"/>`) declares the
//! markup here under its shape id. The composer pulls in the definitions of every shape used
//! in a scene exactly once.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;

use crate::svg::declare_symbols;

lazy_static! {
    static ref BUILTIN: Arc<ShapeRegistry> = Arc::new(ShapeRegistry::with_builtins());
}

/// Insertion-ordered mapping from definition tag id to SVG markup.
///
/// Re-inserting an existing tag id replaces the markup in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    entries: Vec<(String, String)>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag_id: impl Into<String>, markup: impl Into<String>) {
        let tag_id = tag_id.into();
        let markup = markup.into();
        match self.entries.iter_mut().find(|(id, _)| *id == tag_id) {
            Some(entry) => entry.1 = markup,
            None => self.entries.push((tag_id, markup)),
        }
    }

    /// Merge all of `other` into `self`, `other` winning on collisions
    pub fn extend(&mut self, other: &Definitions) {
        for (tag_id, markup) in other.iter() {
            self.insert(tag_id, markup);
        }
    }

    pub fn get(&self, tag_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == tag_id)
            .map(|(_, markup)| markup.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, m)| (id.as_str(), m.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut defs = Definitions::new();
        for (k, v) in iter {
            defs.insert(k, v);
        }
        defs
    }
}

/// Mapping from shape id to the definitions that shape needs.
///
/// Registration is expected to finish before the registry is shared with composers.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<String, Definitions>,
}

impl ShapeRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in symbol shapes (cross, star, heart)
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        declare_symbols(&mut registry);
        registry
    }

    /// Shared registry of built-in shapes
    pub fn builtin() -> Arc<ShapeRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Store the definitions for `shape_id`, replacing any earlier declaration.
    pub fn declare(&mut self, shape_id: &str, definitions: Definitions) {
        if self.shapes.insert(shape_id.to_string(), definitions).is_some() {
            log::debug!("shape '{}' re-declared, previous definitions replaced", shape_id);
        } else {
            log::trace!("shape '{}' declared", shape_id);
        }
    }

    pub fn lookup(&self, shape_id: &str) -> Option<&Definitions> {
        self.shapes.get(shape_id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definitions_keep_first_position_on_overwrite() {
        let mut defs: Definitions = [("a", "1"), ("b", "2")].into_iter().collect();
        defs.insert("a", "3");
        let order: Vec<_> = defs.iter().collect();
        assert_eq!(order, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn declare_overwrites() {
        let mut registry = ShapeRegistry::new();
        registry.declare("dot", [("dot", "<g id=\"dot\"/>")].into_iter().collect());
        registry.declare("dot", [("dot2", "<g id=\"dot2\"/>")].into_iter().collect());
        let defs = registry.lookup("dot").unwrap();
        assert_eq!(defs.len(), 1);
        assert!(defs.get("dot").is_none());
        assert!(defs.get("dot2").is_some());
    }

    #[test]
    fn builtins_are_declared() {
        let registry = ShapeRegistry::builtin();
        for id in ["cross", "star", "heart"] {
            assert!(registry.lookup(id).is_some(), "{} missing", id);
        }
        assert!(registry.lookup("circle").is_none());
    }
}
