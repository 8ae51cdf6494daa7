//! In-memory document source.

use std::collections::BTreeMap;

use super::{DocumentSource, PageHandle};
use crate::error::{Error, Result};
use crate::model::{OutlineEntry, RawBlock};

#[derive(Debug, Clone)]
enum MemoryPage {
    Readable(Vec<RawBlock>),
    Failed(String),
}

/// A document held entirely in memory.
///
/// Useful for tests, benchmarks, and callers that decode documents
/// themselves.
///
/// # Example
///
/// ```
/// use docstruct::model::{BBox, RawBlock};
/// use docstruct::source::{DocumentSource, MemoryDocument};
///
/// let doc = MemoryDocument::new()
///     .with_outline_entry(1, "Introduction", 1)
///     .with_page(1, vec![RawBlock::heading(BBox::default(), "Introduction")]);
///
/// assert_eq!(doc.page_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    title: Option<String>,
    outline: Vec<OutlineEntry>,
    pages: BTreeMap<u32, MemoryPage>,
}

impl MemoryDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append an outline entry.
    pub fn with_outline_entry(mut self, depth: i64, title: impl Into<String>, page: i64) -> Self {
        self.outline.push(OutlineEntry::new(depth, title, page));
        self
    }

    /// Replace the outline.
    pub fn with_outline(mut self, outline: Vec<OutlineEntry>) -> Self {
        self.outline = outline;
        self
    }

    /// Add (or replace) a readable page.
    pub fn with_page(mut self, number: u32, blocks: Vec<RawBlock>) -> Self {
        self.pages.insert(number, MemoryPage::Readable(blocks));
        self
    }

    /// Add a page that fails to read with the given reason.
    pub fn with_failed_page(mut self, number: u32, reason: impl Into<String>) -> Self {
        self.pages.insert(number, MemoryPage::Failed(reason.into()));
        self
    }

    /// Add a page in place.
    pub fn add_page(&mut self, number: u32, blocks: Vec<RawBlock>) {
        self.pages.insert(number, MemoryPage::Readable(blocks));
    }

    /// Add an outline entry in place.
    pub fn add_outline_entry(&mut self, entry: OutlineEntry) {
        self.outline.push(entry);
    }
}

impl DocumentSource for MemoryDocument {
    fn outline(&self) -> Box<dyn Iterator<Item = OutlineEntry> + '_> {
        Box::new(self.outline.iter().cloned())
    }

    fn pages(&self) -> BTreeMap<u32, PageHandle> {
        self.pages
            .keys()
            .enumerate()
            .map(|(slot, &number)| (number, PageHandle::new(number, slot)))
            .collect()
    }

    fn blocks(&self, page: &PageHandle) -> Result<Vec<RawBlock>> {
        match self.pages.get(&page.number) {
            Some(MemoryPage::Readable(blocks)) => Ok(blocks.clone()),
            Some(MemoryPage::Failed(reason)) => Err(Error::PageExtraction {
                page: page.number,
                reason: reason.clone(),
            }),
            None => Err(Error::PageExtraction {
                page: page.number,
                reason: "page not present".to_string(),
            }),
        }
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}
