//! Output record shapes.
//!
//! Field declaration order is the serialized field order; changing it
//! changes every output file.

use serde::{Deserialize, Serialize};

use crate::model::{
    BBox, BlockType, ContentBlock, Discrepancy, DiscrepancyKind, TableShape, TocNode,
};

/// Longest content prefix used as a content record title.
pub const TITLE_MAX_CHARS: usize = 50;

/// One line of the table-of-contents file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocRecord {
    pub section_id: String,
    pub title: String,
    pub page: u32,
    pub level: u32,
    pub parent_id: Option<String>,
    pub full_path: String,
}

impl From<&TocNode> for TocRecord {
    fn from(node: &TocNode) -> Self {
        Self {
            section_id: node.section_id.clone(),
            title: node.title.clone(),
            page: node.page,
            level: node.level,
            parent_id: node.parent_id.clone(),
            full_path: node.full_path.clone(),
        }
    }
}

impl From<TocRecord> for TocNode {
    fn from(record: TocRecord) -> Self {
        Self {
            source_depth: record.level,
            section_id: record.section_id,
            title: record.title,
            page: record.page,
            level: record.level,
            parent_id: record.parent_id,
            full_path: record.full_path,
            child_ids: Vec::new(),
        }
    }
}

/// One line of the content file.
///
/// `level`, `parent_id` and `full_path` are `null` unless the block was
/// attributed to a TOC section. `table` is present only for tabular blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Same as `block_id`
    pub section_id: String,
    pub title: String,
    pub content: String,
    pub page: u32,
    pub level: Option<u32>,
    pub parent_id: Option<String>,
    pub full_path: Option<String>,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub block_id: String,
    pub bbox: BBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableShape>,
}

impl ContentRecord {
    /// Build a record for a block, optionally attributed to a section.
    pub fn new(block: &ContentBlock, section: Option<&TocNode>) -> Self {
        Self {
            section_id: block.block_id.clone(),
            title: truncate_title(&block.text),
            content: block.text.clone(),
            page: block.page,
            level: section.map(|s| s.level + 1),
            parent_id: section.map(|s| s.section_id.clone()),
            full_path: section.map(|s| s.full_path.clone()),
            block_type: block.block_type,
            block_id: block.block_id.clone(),
            bbox: block.bbox,
            table: block.table,
        }
    }
}

/// Shorten text to [`TITLE_MAX_CHARS`] characters, marking the cut with "...".
pub fn truncate_title(text: &str) -> String {
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// One entry of the discrepancy report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyRecord {
    pub kind: DiscrepancyKind,
    pub reference: String,
    pub page: u32,
    pub detail: String,
}

impl From<&Discrepancy> for DiscrepancyRecord {
    fn from(d: &Discrepancy) -> Self {
        Self {
            kind: d.kind,
            reference: d.reference(),
            page: d.page,
            detail: d.detail.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> TocNode {
        TocNode {
            section_id: "2.1".to_string(),
            title: "Cable Types".to_string(),
            page: 14,
            level: 2,
            source_depth: 2,
            parent_id: Some("2".to_string()),
            full_path: "Cables > Cable Types".to_string(),
            child_ids: vec!["2.1.1".to_string()],
        }
    }

    fn block(text: &str) -> ContentBlock {
        ContentBlock {
            block_id: "p14_3".to_string(),
            page: 14,
            bbox: BBox::new(1.0, 2.0, 3.0, 4.0),
            text: text.to_string(),
            block_type: BlockType::Paragraph,
            table: None,
        }
    }

    #[test]
    fn test_toc_record_field_order() {
        let json = serde_json::to_string(&TocRecord::from(&node())).unwrap();
        assert_eq!(
            json,
            r#"{"section_id":"2.1","title":"Cable Types","page":14,"level":2,"parent_id":"2","full_path":"Cables > Cable Types"}"#
        );
    }

    #[test]
    fn test_content_record_unattributed() {
        let json = serde_json::to_string(&ContentRecord::new(&block("Body"), None)).unwrap();
        assert_eq!(
            json,
            r#"{"section_id":"p14_3","title":"Body","content":"Body","page":14,"level":null,"parent_id":null,"full_path":null,"type":"paragraph","block_id":"p14_3","bbox":[1.0,2.0,3.0,4.0]}"#
        );
    }

    #[test]
    fn test_content_record_table_shape() {
        let mut table = block("Voltage | Current");
        table.table = Some(TableShape {
            rows: 4,
            columns: 2,
            filled_cells: 7,
        });

        let json = serde_json::to_string(&ContentRecord::new(&table, None)).unwrap();
        assert!(json.ends_with(r#""table":{"rows":4,"columns":2,"filled_cells":7}}"#));

        let back: ContentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.table, table.table);
    }

    #[test]
    fn test_content_record_attributed() {
        let record = ContentRecord::new(&block("Body"), Some(&node()));
        assert_eq!(record.level, Some(3));
        assert_eq!(record.parent_id.as_deref(), Some("2.1"));
        assert_eq!(record.full_path.as_deref(), Some("Cables > Cable Types"));
    }

    #[test]
    fn test_truncate_title() {
        let long = "x".repeat(60);
        let title = truncate_title(&long);
        assert_eq!(title.len(), 53);
        assert!(title.ends_with("..."));

        let exact = "y".repeat(50);
        assert_eq!(truncate_title(&exact), exact);

        // Multi-byte characters are cut on a char boundary.
        let wide = "é".repeat(55);
        assert_eq!(truncate_title(&wide).chars().count(), 53);
    }

    #[test]
    fn test_discrepancy_record() {
        let d = Discrepancy::unmatched(9, 2);
        let json = serde_json::to_string(&DiscrepancyRecord::from(&d)).unwrap();
        assert!(json.starts_with(r#"{"kind":"unmatched_page","reference":"page 9","page":9,"#));
    }
}
