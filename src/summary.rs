//! Run summary written next to the extracted files.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::ContentBlock;
use crate::normalize::NormalizeStats;
use crate::outline::TocIndex;

/// Number of leading content blocks searched for key terms.
pub const KEY_TERM_SAMPLE: usize = 100;

/// Document-level summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub title: Option<String>,
    pub total_pages: u32,
    pub total_toc_entries: u32,
    pub total_content_items: u64,
    /// Node count per level, keyed `level_N`
    pub toc_levels: BTreeMap<String, u32>,
    /// Block count per type
    pub content_types: BTreeMap<String, u64>,
    /// Titles of top-level sections in outline order
    pub major_sections: Vec<String>,
    pub key_terms: Vec<String>,
    pub key_terms_count: u32,
    /// Blocks carrying a table shape
    #[serde(default)]
    pub tables: u32,
    #[serde(default)]
    pub table_rows: u64,
    /// Rows × columns summed over tables
    #[serde(default)]
    pub table_cells_expected: u64,
    #[serde(default)]
    pub table_cells_filled: u64,
    pub dropped_blocks: u32,
    pub failed_pages: Vec<u32>,
}

/// Collects summary data while content streams past.
#[derive(Debug, Clone, Default)]
pub struct SummaryBuilder {
    keywords: Vec<(String, String)>,
    sampled: usize,
    found: BTreeSet<String>,
    content_types: BTreeMap<String, u64>,
    total: u64,
    tables: u32,
    table_rows: u64,
    table_cells_expected: u64,
    table_cells_filled: u64,
}

impl SummaryBuilder {
    /// Create a builder searching for the given keywords (case-insensitive).
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| (k.as_ref().to_lowercase(), k.as_ref().to_string()))
                .filter(|(lower, _)| !lower.is_empty())
                .collect(),
            ..Self::default()
        }
    }

    /// Observe one emitted block.
    pub fn observe_block(&mut self, block: &ContentBlock) {
        self.total += 1;
        *self
            .content_types
            .entry(block.block_type.as_str().to_string())
            .or_insert(0) += 1;

        if let Some(shape) = &block.table {
            self.tables += 1;
            self.table_rows += u64::from(shape.rows);
            self.table_cells_expected += shape.expected_cells();
            self.table_cells_filled += u64::from(shape.filled_cells);
        }

        if self.sampled < KEY_TERM_SAMPLE && !self.keywords.is_empty() {
            self.sampled += 1;
            let text = block.text.to_lowercase();
            for (lower, original) in &self.keywords {
                if text.contains(lower.as_str()) {
                    self.found.insert(original.clone());
                }
            }
        }
    }

    /// Produce the summary.
    pub fn finish(
        self,
        title: Option<&str>,
        total_pages: u32,
        toc: &TocIndex,
        stats: &NormalizeStats,
    ) -> DocumentSummary {
        let toc_levels = toc
            .level_counts()
            .into_iter()
            .map(|(level, count)| (format!("level_{}", level), count))
            .collect();

        let key_terms: Vec<String> = self.found.into_iter().collect();

        DocumentSummary {
            title: title.map(str::to_string),
            total_pages,
            total_toc_entries: toc.len() as u32,
            total_content_items: self.total,
            toc_levels,
            content_types: self.content_types,
            major_sections: toc.roots().map(|n| n.title.clone()).collect(),
            key_terms_count: key_terms.len() as u32,
            key_terms,
            tables: self.tables,
            table_rows: self.table_rows,
            table_cells_expected: self.table_cells_expected,
            table_cells_filled: self.table_cells_filled,
            dropped_blocks: stats.blocks_dropped(),
            failed_pages: stats.failures.iter().map(|f| f.page).collect(),
        }
    }
}
