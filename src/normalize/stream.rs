//! Lazy, page-ordered content stream.
//!
//! The stream reads one page at a time from the source and yields a
//! [`PageOutcome`] per page, so at most one page of blocks is held in
//! memory.
//!
//! # Example
//!
//! ```
//! use docstruct::model::{BBox, RawBlock};
//! use docstruct::normalize::{ContentNormalizer, ContentStream, PageOutcome};
//! use docstruct::source::MemoryDocument;
//!
//! let doc = MemoryDocument::new()
//!     .with_page(1, vec![RawBlock::new(BBox::default(), "First page")])
//!     .with_page(2, vec![RawBlock::new(BBox::default(), "Second page")]);
//! let normalizer = ContentNormalizer::default();
//!
//! for outcome in ContentStream::new(&doc, &normalizer) {
//!     if let PageOutcome::Extracted(batch) = outcome {
//!         println!("page {}: {} blocks", batch.page, batch.blocks.len());
//!     }
//! }
//! ```

use super::{ContentNormalizer, PageOutcome};
use crate::source::{DocumentSource, PageHandle};

/// Iterator over page outcomes in ascending page order.
pub struct ContentStream<'a, S: ?Sized> {
    source: &'a S,
    normalizer: &'a ContentNormalizer,
    pages: Vec<PageHandle>,
    position: usize,
}

impl<'a, S> ContentStream<'a, S>
where
    S: DocumentSource + ?Sized,
{
    /// Stream every page of the source.
    pub fn new(source: &'a S, normalizer: &'a ContentNormalizer) -> Self {
        let pages = source.pages().into_values().collect();
        Self::with_pages(source, normalizer, pages)
    }

    /// Stream only the given pages, in the given order.
    pub fn with_pages(
        source: &'a S,
        normalizer: &'a ContentNormalizer,
        pages: Vec<PageHandle>,
    ) -> Self {
        Self {
            source,
            normalizer,
            pages,
            position: 0,
        }
    }

    /// Rewind to the first page.
    pub fn restart(&mut self) {
        self.position = 0;
    }

    /// Pages not yet yielded.
    pub fn remaining(&self) -> usize {
        self.pages.len() - self.position
    }

    /// Check if every page has been yielded.
    pub fn is_done(&self) -> bool {
        self.position >= self.pages.len()
    }
}

impl<S> Iterator for ContentStream<'_, S>
where
    S: DocumentSource + ?Sized,
{
    type Item = PageOutcome;

    fn next(&mut self) -> Option<PageOutcome> {
        let handle = self.pages.get(self.position)?;
        self.position += 1;
        Some(self.normalizer.process_page(self.source, handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, RawBlock};
    use crate::source::MemoryDocument;

    fn sample() -> MemoryDocument {
        MemoryDocument::new()
            .with_page(2, vec![RawBlock::new(BBox::default(), "two")])
            .with_page(1, vec![RawBlock::new(BBox::default(), "one")])
            .with_failed_page(3, "broken")
    }

    #[test]
    fn test_pages_in_order_with_failures() {
        let doc = sample();
        let normalizer = ContentNormalizer::default();
        let outcomes: Vec<_> = ContentStream::new(&doc, &normalizer).collect();

        let pages: Vec<u32> = outcomes.iter().map(|o| o.page()).collect();
        assert_eq!(pages, vec![1, 2, 3]);
        assert!(outcomes[2].is_failed());
    }

    #[test]
    fn test_restart_yields_identical_outcomes() {
        let doc = sample();
        let normalizer = ContentNormalizer::default();
        let mut stream = ContentStream::new(&doc, &normalizer);

        let first: Vec<_> = stream.by_ref().collect();
        assert!(stream.is_done());

        stream.restart();
        assert_eq!(stream.remaining(), 3);
        let second: Vec<_> = stream.collect();
        assert_eq!(first, second);
    }
}
