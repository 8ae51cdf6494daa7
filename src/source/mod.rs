//! Document source abstraction.
//!
//! A source exposes the two streams the pipeline consumes: the flat outline
//! and the per-page raw text blocks. Decoding the underlying document format
//! is entirely the source's business.

mod json;
mod memory;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{OutlineEntry, RawBlock};

pub use json::{DocumentDump, JsonDocument, PageDump};
pub use memory::MemoryDocument;

/// Handle to a single page of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageHandle {
    /// 1-indexed page number
    pub number: u32,

    /// Source-specific slot, opaque to callers
    pub slot: usize,
}

impl PageHandle {
    /// Create a new page handle.
    pub fn new(number: u32, slot: usize) -> Self {
        Self { number, slot }
    }
}

/// Abstract interface for document access.
///
/// Implementations must be deterministic: identical documents yield
/// identical outlines, pages, and blocks on every call.
pub trait DocumentSource {
    /// Outline entries in declared order.
    fn outline(&self) -> Box<dyn Iterator<Item = OutlineEntry> + '_>;

    /// All pages as (page number → handle), in ascending page order.
    fn pages(&self) -> BTreeMap<u32, PageHandle>;

    /// Raw blocks of a page in emission order.
    ///
    /// Returns [`Error::PageExtraction`](crate::Error::PageExtraction) if the
    /// page is missing or unreadable.
    fn blocks(&self, page: &PageHandle) -> Result<Vec<RawBlock>>;

    /// Document title, if the source knows one.
    fn title(&self) -> Option<&str> {
        None
    }

    /// Number of pages.
    fn page_count(&self) -> u32 {
        self.pages().len() as u32
    }
}
