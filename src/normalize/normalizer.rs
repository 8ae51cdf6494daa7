//! Per-page content normalization.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{BlockClassifier, HintClassifier, NormalizeOptions, TextCleaner};
use crate::error::Error;
use crate::identifier;
use crate::model::{BlockType, ContentBlock, RawBlock, TableShape};
use crate::source::{DocumentSource, PageHandle};

/// A page that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    /// 1-indexed page number
    pub page: u32,

    /// Reason reported by the source
    pub reason: String,
}

impl PageFailure {
    /// Convert into the matching error.
    pub fn into_error(self) -> Error {
        Error::PageExtraction {
            page: self.page,
            reason: self.reason,
        }
    }
}

/// Statistics collected during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Pages whose blocks were read
    pub pages_processed: u32,

    /// Pages that could not be read
    pub pages_failed: u32,

    /// Raw blocks seen
    pub blocks_seen: u32,

    /// Content blocks emitted
    pub blocks_emitted: u32,

    /// Blocks dropped because their text normalized to nothing
    pub blocks_dropped_empty: u32,

    /// Blocks dropped for being under the minimum length
    pub blocks_dropped_short: u32,

    /// Blocks dropped because a bbox coordinate was NaN or infinite
    #[serde(default)]
    pub blocks_dropped_bbox: u32,

    /// Emitted headings
    pub heading_count: u32,

    /// Emitted paragraphs
    pub paragraph_count: u32,

    /// Emitted blocks of any other type
    pub other_count: u32,

    /// Failed pages in page order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PageFailure>,
}

impl NormalizeStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an emitted block.
    pub fn add_block(&mut self, block_type: BlockType) {
        self.blocks_emitted += 1;
        match block_type {
            BlockType::Heading => self.heading_count += 1,
            BlockType::Paragraph => self.paragraph_count += 1,
            BlockType::Other => self.other_count += 1,
        }
    }

    /// Record a page failure.
    pub fn add_failure(&mut self, failure: PageFailure) {
        self.pages_failed += 1;
        self.failures.push(failure);
    }

    /// Total blocks dropped for any reason.
    pub fn blocks_dropped(&self) -> u32 {
        self.blocks_dropped_empty + self.blocks_dropped_short + self.blocks_dropped_bbox
    }

    /// Merge statistics from another page or run.
    pub fn merge(&mut self, other: &NormalizeStats) {
        self.pages_processed += other.pages_processed;
        self.pages_failed += other.pages_failed;
        self.blocks_seen += other.blocks_seen;
        self.blocks_emitted += other.blocks_emitted;
        self.blocks_dropped_empty += other.blocks_dropped_empty;
        self.blocks_dropped_short += other.blocks_dropped_short;
        self.blocks_dropped_bbox += other.blocks_dropped_bbox;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.other_count += other.other_count;
        self.failures.extend(other.failures.iter().cloned());
    }
}

/// Normalized blocks of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch {
    /// 1-indexed page number
    pub page: u32,

    /// Emitted blocks in emission order
    pub blocks: Vec<ContentBlock>,

    /// Counters for this page only
    pub stats: NormalizeStats,
}

/// Result of processing one page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page was read and normalized.
    Extracted(PageBatch),
    /// The page could not be read.
    Failed(PageFailure),
}

impl PageOutcome {
    /// Page number this outcome belongs to.
    pub fn page(&self) -> u32 {
        match self {
            PageOutcome::Extracted(batch) => batch.page,
            PageOutcome::Failed(failure) => failure.page,
        }
    }

    /// Check if the page failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, PageOutcome::Failed(_))
    }
}

/// Turns raw page blocks into typed, identified content blocks.
#[derive(Clone)]
pub struct ContentNormalizer {
    options: NormalizeOptions,
    cleaner: TextCleaner,
    classifier: Arc<dyn BlockClassifier>,
}

impl ContentNormalizer {
    /// Create a normalizer using the heading-hint classifier.
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            cleaner: TextCleaner::new(&options),
            options,
            classifier: Arc::new(HintClassifier),
        }
    }

    /// Replace the classification rule.
    pub fn with_classifier(mut self, classifier: Arc<dyn BlockClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Name of the classification rule.
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Normalize the raw blocks of one page.
    ///
    /// Blocks keep their emission order; dropped blocks do not consume an
    /// index, so ids on a page are contiguous from `p<page>_0`.
    pub fn normalize_page(&self, page: u32, raw: Vec<RawBlock>) -> PageBatch {
        let mut stats = NormalizeStats::new();
        stats.pages_processed = 1;

        let mut blocks = Vec::with_capacity(raw.len());

        for block in raw {
            stats.blocks_seen += 1;

            if !block.bbox.is_finite() {
                log::warn!(
                    "Page {}: dropping block with non-finite bbox {:?}",
                    page,
                    block.bbox
                );
                stats.blocks_dropped_bbox += 1;
                continue;
            }

            let text = self.cleaner.clean(&block.text);
            if text.is_empty() {
                stats.blocks_dropped_empty += 1;
                continue;
            }
            if let Some(min) = self.options.min_text_chars {
                if text.chars().count() < min {
                    stats.blocks_dropped_short += 1;
                    continue;
                }
            }

            let block_type = self.classifier.classify(&block, &text);
            stats.add_block(block_type);

            // Cleaning collapses tabs, so the grid is read from the raw text.
            let table = match block_type {
                BlockType::Heading => None,
                _ => TableShape::estimate(&block.text),
            };

            blocks.push(ContentBlock {
                block_id: identifier::block_id(page, blocks.len()),
                page,
                bbox: block.bbox,
                text,
                block_type,
                table,
            });
        }

        if stats.blocks_dropped() > 0 {
            log::debug!(
                "Page {}: dropped {} of {} blocks",
                page,
                stats.blocks_dropped(),
                stats.blocks_seen
            );
        }

        PageBatch {
            page,
            blocks,
            stats,
        }
    }

    /// Read and normalize one page from a source.
    pub fn process_page<S>(&self, source: &S, handle: &PageHandle) -> PageOutcome
    where
        S: DocumentSource + ?Sized,
    {
        match source.blocks(handle) {
            Ok(raw) => PageOutcome::Extracted(self.normalize_page(handle.number, raw)),
            Err(e) => {
                log::warn!("Failed to extract page {}: {}", handle.number, e);
                let reason = match e {
                    Error::PageExtraction { reason, .. } => reason,
                    other => other.to_string(),
                };
                PageOutcome::Failed(PageFailure {
                    page: handle.number,
                    reason,
                })
            }
        }
    }
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl std::fmt::Debug for ContentNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentNormalizer")
            .field("options", &self.options)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
