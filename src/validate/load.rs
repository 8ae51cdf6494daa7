//! Rebuild validation indexes from previously written output.

use std::path::Path;

use super::ContentIndex;
use crate::error::Result;
use crate::model::TocNode;
use crate::outline::TocIndex;
use crate::writer::{for_each_record, ContentRecord, ReadSummary, TocRecord};

/// Load a TOC index from a TOC JSONL file.
pub fn load_toc_index<P: AsRef<Path>>(path: P) -> Result<(TocIndex, ReadSummary)> {
    let mut index = TocIndex::new();
    let summary = for_each_record(path, |record: TocRecord| {
        index.insert(TocNode::from(record));
    })?;
    Ok((index, summary))
}

/// Load a content index from a content JSONL file.
pub fn load_content_index<P: AsRef<Path>>(path: P) -> Result<(ContentIndex, ReadSummary)> {
    let mut index = ContentIndex::new();
    let summary = for_each_record(path, |record: ContentRecord| {
        index.add(record.page, record.block_type);
    })?;
    Ok((index, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, BlockType, ContentBlock, OutlineEntry};
    use crate::outline::build_toc;
    use crate::writer::write_jsonl;
    use tempfile::TempDir;

    #[test]
    fn test_toc_roundtrip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("toc.jsonl");
        let nodes = build_toc(vec![
            OutlineEntry::new(1, "A", 1),
            OutlineEntry::new(2, "A1", 2),
        ]);
        write_jsonl(&path, nodes.iter().map(TocRecord::from)).unwrap();

        let (index, summary) = load_toc_index(&path).unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(index.get("1").unwrap().child_ids, vec!["1.1".to_string()]);
        assert!(index.is_consistent());
    }

    #[test]
    fn test_content_index_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spec.jsonl");
        let block = ContentBlock {
            block_id: "p3_0".to_string(),
            page: 3,
            bbox: BBox::default(),
            text: "Heading".to_string(),
            block_type: BlockType::Heading,
            table: None,
        };
        write_jsonl(&path, [ContentRecord::new(&block, None)]).unwrap();

        let (index, _) = load_content_index(&path).unwrap();
        assert_eq!(index.get(3).unwrap().heading_count, 1);
    }
}
