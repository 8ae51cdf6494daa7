//! Per-page content index used for cross-validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{BlockType, ContentBlock};
use crate::normalize::PageBatch;

/// What was extracted from one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub block_count: u32,
    pub heading_count: u32,
}

/// Index of content-bearing pages.
///
/// Holds counts only, never block text.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    pages: BTreeMap<u32, PageContent>,
}

impl ContentIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one block of the given type on `page`.
    pub fn add(&mut self, page: u32, block_type: BlockType) {
        let entry = self.pages.entry(page).or_default();
        entry.block_count += 1;
        if block_type == BlockType::Heading {
            entry.heading_count += 1;
        }
    }

    /// Count a content block.
    pub fn record(&mut self, block: &ContentBlock) {
        self.add(block.page, block.block_type);
    }

    /// Count every block of a page batch.
    pub fn record_batch(&mut self, batch: &PageBatch) {
        for block in &batch.blocks {
            self.record(block);
        }
    }

    /// Check if any block was extracted from `page`.
    pub fn has_content(&self, page: u32) -> bool {
        self.pages.contains_key(&page)
    }

    /// Counts for a page.
    pub fn get(&self, page: u32) -> Option<&PageContent> {
        self.pages.get(&page)
    }

    /// Content-bearing pages in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = (u32, &PageContent)> {
        self.pages.iter().map(|(&page, content)| (page, content))
    }

    /// Number of content-bearing pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of blocks.
    pub fn block_count(&self) -> u64 {
        self.pages.values().map(|p| p.block_count as u64).sum()
    }

    /// Check if no content was recorded.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
