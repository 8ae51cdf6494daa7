//! Structural discrepancies between the table of contents and the content stream.

use serde::{Deserialize, Serialize};

use super::TocNode;

/// Kind of discrepancy.
///
/// Variant order is the tie-break order used when sorting a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// A TOC entry declares a page that carries no content
    OrphanedTocEntry,
    /// A page carries content but no TOC entry declares it
    UnmatchedPage,
}

impl DiscrepancyKind {
    /// Snake-case name as written to reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscrepancyKind::OrphanedTocEntry => "orphaned_toc_entry",
            DiscrepancyKind::UnmatchedPage => "unmatched_page",
        }
    }

    /// Whether this kind is informational only.
    pub fn is_informational(&self) -> bool {
        matches!(self, DiscrepancyKind::UnmatchedPage)
    }
}

/// A single cross-validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    pub section_id: Option<String>,
    pub page: u32,
    pub detail: String,
}

impl Discrepancy {
    /// A TOC node whose page has no content blocks.
    pub fn orphaned(node: &TocNode) -> Self {
        Self {
            kind: DiscrepancyKind::OrphanedTocEntry,
            section_id: Some(node.section_id.clone()),
            page: node.page,
            detail: format!(
                "section {} \"{}\" declares page {} but no content was extracted from it",
                node.section_id, node.title, node.page
            ),
        }
    }

    /// A content-bearing page that no TOC node declares.
    pub fn unmatched(page: u32, block_count: u32) -> Self {
        Self {
            kind: DiscrepancyKind::UnmatchedPage,
            section_id: None,
            page,
            detail: format!(
                "page {} has {} content block(s) but no TOC entry points to it",
                page, block_count
            ),
        }
    }

    /// Section id or page reference, whichever identifies the finding.
    pub fn reference(&self) -> String {
        match &self.section_id {
            Some(id) => id.clone(),
            None => format!("page {}", self.page),
        }
    }
}
