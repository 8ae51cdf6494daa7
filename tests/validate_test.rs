//! Integration tests for cross-validation, including validation of
//! previously written output.

use docstruct::model::{BBox, RawBlock};
use docstruct::validate::{load_content_index, load_toc_index, ContentIndex};
use docstruct::{
    build_toc, BlockType, CrossValidator, DiscrepancyKind, MemoryDocument, OutlineEntry, Pipeline,
    TocIndex, ValidationOptions,
};
use tempfile::TempDir;

fn toc(items: &[(i64, &str, i64)]) -> TocIndex {
    build_toc(
        items
            .iter()
            .map(|&(depth, title, page)| OutlineEntry::new(depth, title, page)),
    )
    .into_iter()
    .collect()
}

#[test]
fn test_orphan_on_page_without_content() {
    let toc = toc(&[(1, "Intro", 1), (1, "Annex", 50)]);
    let mut content = ContentIndex::new();
    content.add(1, BlockType::Paragraph);

    let found = CrossValidator::default().validate(&toc, &content);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, DiscrepancyKind::OrphanedTocEntry);
    assert_eq!(found[0].page, 50);
    assert_eq!(found[0].section_id.as_deref(), Some("2"));
}

#[test]
fn test_empty_inputs_produce_no_findings() {
    let validator = CrossValidator::new(ValidationOptions::new().with_unmatched_pages(true));
    let report = validator.report(&TocIndex::new(), &ContentIndex::new());

    assert!(report.discrepancies.is_empty());
    assert!(!report.is_valid);
}

#[test]
fn test_findings_ordered_by_page_then_kind() {
    let toc = toc(&[(1, "A", 3), (1, "B", 1), (2, "B1", 3)]);
    let mut content = ContentIndex::new();
    content.add(2, BlockType::Paragraph);
    content.add(4, BlockType::Heading);

    let found = CrossValidator::new(ValidationOptions::new().with_unmatched_pages(true))
        .validate(&toc, &content);

    let summary: Vec<(u32, String)> = found
        .iter()
        .map(|d| (d.page, d.reference()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, "2".to_string()),
            (2, "page 2".to_string()),
            (3, "1".to_string()),
            (3, "2.1".to_string()),
            (4, "page 4".to_string()),
        ]
    );
}

#[test]
fn test_revalidate_written_output() {
    let dir = TempDir::new().unwrap();
    let doc = MemoryDocument::new()
        .with_outline_entry(1, "Intro", 1)
        .with_outline_entry(1, "Missing", 3)
        .with_page(1, vec![RawBlock::new(BBox::default(), "Hello")])
        .with_page(2, vec![RawBlock::new(BBox::default(), "World")]);

    let options = ValidationOptions::new().with_unmatched_pages(true);
    let run = Pipeline::new(docstruct::PipelineOptions::new().with_validation(options))
        .run(&doc, dir.path())
        .unwrap();

    let (toc, _) = load_toc_index(&run.toc_path).unwrap();
    let (content, read) = load_content_index(&run.content_path).unwrap();
    assert_eq!(read.records, 2);

    let reloaded = CrossValidator::new(options).report(&toc, &content);
    assert_eq!(reloaded, run.validation);
    assert_eq!(reloaded.orphaned_count, 1);
    assert_eq!(reloaded.unmatched_count, 1);
}
