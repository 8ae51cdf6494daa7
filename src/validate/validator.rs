//! Cross-validation of the table of contents against extracted content.

use serde::{Deserialize, Serialize};

use super::ContentIndex;
use crate::model::{Discrepancy, DiscrepancyKind};
use crate::outline::TocIndex;

/// Options for cross-validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Also report content pages no TOC entry declares
    pub report_unmatched_pages: bool,

    /// Require both a TOC and content for a run to be valid
    pub strict: bool,
}

impl ValidationOptions {
    /// Create new validation options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable `unmatched_page` findings.
    pub fn with_unmatched_pages(mut self, report: bool) -> Self {
        self.report_unmatched_pages = report;
        self
    }

    /// Require both structures to be non-empty.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub toc_entries: u32,
    pub content_pages: u32,
    pub content_blocks: u64,
    pub orphaned_count: u32,
    pub unmatched_count: u32,
    pub is_valid: bool,
    pub discrepancies: Vec<Discrepancy>,
}

/// Compares a finished TOC index with a finished content index.
#[derive(Debug, Clone, Default)]
pub struct CrossValidator {
    options: ValidationOptions,
}

impl CrossValidator {
    /// Create a validator.
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    /// List discrepancies ordered by page, then kind, then outline order.
    pub fn validate(&self, toc: &TocIndex, content: &ContentIndex) -> Vec<Discrepancy> {
        let mut found: Vec<Discrepancy> = toc
            .nodes()
            .iter()
            .filter(|node| !content.has_content(node.page))
            .map(Discrepancy::orphaned)
            .collect();

        if self.options.report_unmatched_pages {
            found.extend(
                content
                    .pages()
                    .filter(|(page, _)| !toc.declares_page(*page))
                    .map(|(page, c)| Discrepancy::unmatched(page, c.block_count)),
            );
        }

        // Stable: nodes on the same page keep outline order.
        found.sort_by_key(|d| (d.page, d.kind));
        found
    }

    /// Validate and summarize.
    pub fn report(&self, toc: &TocIndex, content: &ContentIndex) -> ValidationReport {
        let discrepancies = self.validate(toc, content);

        let count = |kind: DiscrepancyKind| {
            discrepancies.iter().filter(|d| d.kind == kind).count() as u32
        };
        let orphaned_count = count(DiscrepancyKind::OrphanedTocEntry);
        let unmatched_count = count(DiscrepancyKind::UnmatchedPage);

        let is_valid = if self.options.strict {
            !toc.is_empty() && !content.is_empty()
        } else {
            !toc.is_empty() || !content.is_empty()
        };

        log::info!(
            "Validation: {} TOC entries, {} content pages, {} orphaned, {} unmatched",
            toc.len(),
            content.page_count(),
            orphaned_count,
            unmatched_count
        );

        ValidationReport {
            toc_entries: toc.len() as u32,
            content_pages: content.page_count() as u32,
            content_blocks: content.block_count(),
            orphaned_count,
            unmatched_count,
            is_valid,
            discrepancies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BlockType, OutlineEntry};
    use crate::outline::build_toc;

    fn toc(entries: &[(i64, &str, i64)]) -> TocIndex {
        build_toc(
            entries
                .iter()
                .map(|(d, t, p)| OutlineEntry::new(*d, *t, *p))
                .collect::<Vec<_>>(),
        )
        .into_iter()
        .collect()
    }

    fn content(pages: &[u32]) -> ContentIndex {
        let mut index = ContentIndex::new();
        for &page in pages {
            index.add(page, BlockType::Paragraph);
        }
        index
    }

    #[test]
    fn test_orphaned_entry_exact_page() {
        let toc = toc(&[(1, "Intro", 1), (1, "Appendix", 50)]);
        let content = content(&[1, 49, 51]);

        let found = CrossValidator::default().validate(&toc, &content);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DiscrepancyKind::OrphanedTocEntry);
        assert_eq!(found[0].page, 50);
        assert_eq!(found[0].section_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_unmatched_pages_suppressed_by_default() {
        let toc = toc(&[(1, "Intro", 1)]);
        let content = content(&[1, 2, 3]);

        assert!(CrossValidator::default().validate(&toc, &content).is_empty());

        let verbose = CrossValidator::new(ValidationOptions::new().with_unmatched_pages(true));
        let found = verbose.validate(&toc, &content);
        let pages: Vec<u32> = found.iter().map(|d| d.page).collect();
        assert_eq!(pages, vec![2, 3]);
        assert!(found.iter().all(|d| d.kind == DiscrepancyKind::UnmatchedPage));
    }

    #[test]
    fn test_ordering_page_then_kind_then_outline() {
        let toc = toc(&[(1, "Late", 9), (1, "B", 4), (2, "B1", 4)]);
        let content = content(&[2, 7]);

        let validator = CrossValidator::new(ValidationOptions::new().with_unmatched_pages(true));
        let found = validator.validate(&toc, &content);

        let summary: Vec<(u32, DiscrepancyKind, String)> = found
            .iter()
            .map(|d| (d.page, d.kind, d.reference()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (2, DiscrepancyKind::UnmatchedPage, "page 2".to_string()),
                (4, DiscrepancyKind::OrphanedTocEntry, "2".to_string()),
                (4, DiscrepancyKind::OrphanedTocEntry, "2.1".to_string()),
                (7, DiscrepancyKind::UnmatchedPage, "page 7".to_string()),
                (9, DiscrepancyKind::OrphanedTocEntry, "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_report_validity() {
        let empty_toc = TocIndex::new();
        let content = content(&[1]);

        let lenient = CrossValidator::default().report(&empty_toc, &content);
        assert!(lenient.is_valid);
        assert_eq!(lenient.content_blocks, 1);

        let strict = CrossValidator::new(ValidationOptions::new().strict()).report(&empty_toc, &content);
        assert!(!strict.is_valid);
    }

    #[test]
    fn test_report_counts() {
        let toc = toc(&[(1, "A", 1), (1, "B", 5)]);
        let content = content(&[1, 2]);

        let report = CrossValidator::new(ValidationOptions::new().with_unmatched_pages(true))
            .report(&toc, &content);

        assert_eq!(report.orphaned_count, 1);
        assert_eq!(report.unmatched_count, 1);
        assert_eq!(report.toc_entries, 2);
        assert_eq!(report.content_pages, 2);
    }
}
