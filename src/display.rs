//! Display surfaces that receive rendered documents.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use crate::error::Result;

/// Something a rendered SVG document can be shown on.
///
/// A composer keeps its surface after [`crate::Composer::display`] so later
/// [`crate::Composer::update`] calls replace what is shown.
pub trait DisplaySurface {
    fn show(&mut self, markup: &str) -> Result<()>;
}

/// Keeps every shown document in memory. Clones share the same frame list.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    frames: Rc<RefCell<Vec<String>>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<String> {
        self.frames.borrow().clone()
    }

    /// Most recently shown document
    pub fn last(&self) -> Option<String> {
        self.frames.borrow().last().cloned()
    }
}

impl DisplaySurface for MemorySurface {
    fn show(&mut self, markup: &str) -> Result<()> {
        self.frames.borrow_mut().push(markup.to_string());
        Ok(())
    }
}

/// Writes each document followed by a newline, e.g. to stdout.
pub struct WriterSurface<W: Write> {
    writer: W,
}

impl<W: Write> WriterSurface<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DisplaySurface for WriterSurface<W> {
    fn show(&mut self, markup: &str) -> Result<()> {
        writeln!(self.writer, "{}", markup)?;
        self.writer.flush()?;
        Ok(())
    }
}
