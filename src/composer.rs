//! Scene composer - ordered shape entries rendered into one SVG document.
//!
//! ```rust
//! use svg_snip::{attrs, Canvas, Composer, RenderOptions};
//! use svg_snip::svg::CIRCLE;
//!
//! let mut svg = Composer::new(Canvas::new(200.0, 200.0));
//! svg.add(CIRCLE, attrs! { cx: 100, cy: 100, r: 10 }).unwrap();
//! let document = svg.render(&RenderOptions::default()).unwrap();
//! assert!(document.contains("<circle"));
//! ```

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::display::DisplaySurface;
use crate::error::{Result, SnipError};
use crate::registry::{Definitions, ShapeRegistry};
use crate::shape::{RenderContext, Shape};
use crate::svg::attributes::{indent, write_attributes, DEFAULT_ATTRIBUTES, FILL_ATTRIBUTES, STROKE_ATTRIBUTES};
use crate::svg::document::{debug_details, svg_open_tag};
use crate::svg::Image;
use crate::types::{AttrKind, AttrValue, Attributes, Canvas, ImageSource};

/// Handle to a scene entry, returned by [`Composer::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-call render settings
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Prepend a collapsible block with the escaped source
    pub debug: bool,
    /// Raw attribute text placed on the root element, e.g. `style="--index: 1;"`
    pub extra_attrib: Option<String>,
    /// Values replacing stored attributes of every entry that declares the key, for this call only
    pub overrides: Attributes,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn extra_attrib(mut self, extra: impl Into<String>) -> Self {
        self.extra_attrib = Some(extra.into());
        self
    }

    pub fn override_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.overrides.insert(key, value);
        self
    }

    pub fn with_overrides(mut self, overrides: Attributes) -> Self {
        self.overrides = overrides;
        self
    }
}

struct SceneEntry {
    shape: Rc<dyn Shape>,
    attributes: Attributes,
}

/// Ordered list of (shape, attributes) entries on a fixed canvas.
pub struct Composer {
    canvas: Canvas,
    registry: Arc<ShapeRegistry>,
    scene: Vec<SceneEntry>,
    surface: Option<Box<dyn DisplaySurface>>,
}

impl Composer {
    /// Empty composer using the built-in shape registry
    pub fn new(canvas: Canvas) -> Self {
        Self::with_registry(canvas, ShapeRegistry::builtin())
    }

    pub fn with_registry(canvas: Canvas, registry: Arc<ShapeRegistry>) -> Self {
        Self {
            canvas,
            registry,
            scene: Vec::new(),
            surface: None,
        }
    }

    /// Composer whose first entry is `source` stretched over the whole canvas
    pub fn with_background(source: ImageSource, canvas: Canvas) -> Result<Self> {
        let mut composer = Self::new(canvas);
        let attrs = Attributes::new()
            .with("data", source)
            .with("width", canvas.width)
            .with("height", canvas.height);
        composer.add(Image, attrs)?;
        Ok(composer)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.canvas.scale = scale;
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// Append an entry. Unknown keys and malformed values are rejected here.
    pub fn add<S: Shape + 'static>(&mut self, shape: S, attributes: Attributes) -> Result<EntryId> {
        self.add_shared(Rc::new(shape), attributes)
    }

    pub fn add_shared(&mut self, shape: Rc<dyn Shape>, attributes: Attributes) -> Result<EntryId> {
        shape.validate(&attributes)?;
        log::trace!("add '{}' with {} attributes", shape.id(), attributes.len());
        self.scene.push(SceneEntry { shape, attributes });
        Ok(EntryId(self.scene.len() - 1))
    }

    /// Nest `child` as a `<g>` element; its definitions surface in this composer's `<defs>`.
    pub fn add_group(&mut self, child: Composer, attributes: Attributes) -> Result<EntryId> {
        self.add(Group::new(child), attributes)
    }

    pub fn attributes(&self, id: EntryId) -> Option<&Attributes> {
        self.scene.get(id.0).map(|entry| &entry.attributes)
    }

    /// Unvalidated handle to the stored attributes; checked again at render time.
    pub fn attributes_mut(&mut self, id: EntryId) -> Option<&mut Attributes> {
        self.scene.get_mut(id.0).map(|entry| &mut entry.attributes)
    }

    /// Replace one stored attribute. Visible from the next render on.
    pub fn set(&mut self, id: EntryId, key: &str, value: impl Into<AttrValue>) -> Result<()> {
        let entry = self.scene.get_mut(id.0).ok_or(SnipError::UnknownEntry(id))?;
        let candidate = Attributes::new().with(key, value);
        entry.shape.validate(&candidate)?;
        for (key, value) in candidate.iter() {
            entry.attributes.insert(key, value.clone());
        }
        Ok(())
    }

    /// Render a complete SVG document.
    pub fn render(&self, options: &RenderOptions) -> Result<String> {
        let mut defs = Definitions::new();
        let fragments = self.render_entries(&options.overrides, &mut defs)?;

        let mut body: Vec<String> = Vec::with_capacity(fragments.len() + defs.len() + 2);
        if !defs.is_empty() {
            body.push("<defs>".to_string());
            body.extend(defs.iter().map(|(_, markup)| indent(markup)));
            body.push("</defs>".to_string());
        }
        body.extend(fragments);

        let open = svg_open_tag(&self.canvas, options.extra_attrib.as_deref());
        let document = if body.is_empty() {
            format!("{}\n</svg>", open)
        } else {
            let inner: Vec<String> = body.iter().map(|part| indent(part)).collect();
            format!("{}\n{}\n</svg>", open, inner.join("\n"))
        };

        if options.debug {
            Ok(debug_details(&document))
        } else {
            Ok(document)
        }
    }

    /// Render as a fragment for embedding in a parent document.
    ///
    /// No `<defs>` block is written; required definitions are merged into `defs` so the
    /// outermost render can emit them once.
    pub fn render_nested(&self, options: &RenderOptions, defs: &mut Definitions) -> Result<String> {
        Ok(self.render_entries(&options.overrides, defs)?.join("\n"))
    }

    fn render_entries(&self, overrides: &Attributes, defs: &mut Definitions) -> Result<Vec<String>> {
        let mut used: Vec<&str> = Vec::new();
        for entry in &self.scene {
            let id = entry.shape.id();
            if !used.contains(&id) {
                used.push(id);
            }
        }
        for id in used {
            if let Some(shape_defs) = self.registry.lookup(id) {
                defs.extend(shape_defs);
            }
        }

        log::debug!(
            "rendering {} entries on {}x{} canvas ({} overrides)",
            self.scene.len(),
            self.canvas.width,
            self.canvas.height,
            overrides.len()
        );

        let mut fragments = Vec::with_capacity(self.scene.len());
        for entry in &self.scene {
            let shape = &entry.shape;
            let effective = entry
                .attributes
                .merged(overrides, |key| shape.attribute(key).is_some());
            shape.validate(&effective)?;
            let mut ctx = RenderContext {
                defs: &mut *defs,
                overrides,
            };
            fragments.push(shape.render(&effective, &mut ctx)?);
        }
        Ok(fragments)
    }

    /// One render per override set, each tagged with `style="--index: i;"`.
    ///
    /// Returns `(head, body)`; the head is empty and reserved for animation styles.
    pub fn animate(&self, frames: &[Attributes]) -> Result<(String, String)> {
        let snippets = frames
            .iter()
            .enumerate()
            .map(|(index, overrides)| {
                let options = RenderOptions::new()
                    .extra_attrib(format!(r#"style="--index: {};""#, index))
                    .with_overrides(overrides.clone());
                self.render(&options)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((String::new(), snippets.join("\n")))
    }

    /// Render into `surface` and keep it for later [`Composer::update`] calls.
    pub fn display(&mut self, mut surface: Box<dyn DisplaySurface>, options: &RenderOptions) -> Result<()> {
        let markup = self.render(options)?;
        surface.show(&markup)?;
        self.surface = Some(surface);
        Ok(())
    }

    /// Re-render into the surface given to [`Composer::display`].
    pub fn update(&mut self, options: &RenderOptions) -> Result<()> {
        if self.surface.is_none() {
            return Err(SnipError::NotDisplayed);
        }
        let markup = self.render(options)?;
        match self.surface.as_mut() {
            Some(surface) => surface.show(&markup),
            None => Err(SnipError::NotDisplayed),
        }
    }
}

// ============================================================================
// Nested composition
// ============================================================================

/// A child composer rendered as a `<g>` element.
pub struct Group {
    child: Composer,
}

impl Group {
    pub fn new(child: Composer) -> Self {
        Self { child }
    }

    /// Declared kind of `key` on any group
    pub fn declared(key: &str) -> Option<AttrKind> {
        DEFAULT_ATTRIBUTES
            .iter()
            .chain(FILL_ATTRIBUTES)
            .chain(STROKE_ATTRIBUTES)
            .find(|spec| spec.name == key)
            .map(|spec| spec.kind)
    }
}

impl Shape for Group {
    fn id(&self) -> &str {
        "group"
    }

    fn attribute(&self, key: &str) -> Option<AttrKind> {
        Group::declared(key)
    }

    fn render(&self, attrs: &Attributes, ctx: &mut RenderContext<'_>) -> Result<String> {
        let options = RenderOptions::new().with_overrides(ctx.overrides.clone());
        let fragment = self.child.render_nested(&options, ctx.defs)?;
        let written = write_attributes(
            DEFAULT_ATTRIBUTES
                .iter()
                .chain(FILL_ATTRIBUTES)
                .chain(STROKE_ATTRIBUTES),
            attrs,
        );
        let open = if written.is_empty() {
            "<g>".to_string()
        } else {
            format!("<g {}>", written)
        };
        if fragment.is_empty() {
            Ok(format!("{}</g>", open))
        } else {
            Ok(format!("{}\n{}\n</g>", open, indent(&fragment)))
        }
    }
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shapes: Vec<&str> = self.scene.iter().map(|entry| entry.shape.id()).collect();
        f.debug_struct("Composer")
            .field("canvas", &self.canvas)
            .field("scene", &shapes)
            .field("displayed", &self.surface.is_some())
            .finish()
    }
}
