//! Outline entries and table-of-contents nodes.

use serde::{Deserialize, Serialize};

/// A flat outline entry as reported by the document source.
///
/// Depth and page are signed so that malformed input survives
/// deserialization and can be rejected (and counted) by the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting depth (1 = top level)
    pub depth: i64,

    /// Entry title
    pub title: String,

    /// Declared page (1-indexed)
    pub page: i64,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(depth: i64, title: impl Into<String>, page: i64) -> Self {
        Self {
            depth,
            title: title.into(),
            page,
        }
    }

    /// Describe why this entry cannot be placed in the hierarchy, if it can't.
    pub fn malformed_reason(&self) -> Option<&'static str> {
        if self.depth < 1 {
            Some("non-positive depth")
        } else if u32::try_from(self.depth).is_err() {
            Some("depth out of range")
        } else if self.title.trim().is_empty() {
            Some("empty title")
        } else if self.page < 1 {
            Some("non-positive page")
        } else if u32::try_from(self.page).is_err() {
            Some("page out of range")
        } else {
            None
        }
    }

    /// Check if the entry can be placed in the hierarchy.
    pub fn is_well_formed(&self) -> bool {
        self.malformed_reason().is_none()
    }
}

/// A node of the reconstructed table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocNode {
    /// Dot-separated sibling-position path (e.g. "1.2.3")
    pub section_id: String,

    /// Trimmed entry title
    pub title: String,

    /// Declared page (1-indexed)
    pub page: u32,

    /// Effective nesting depth; equals the segment count of `section_id`
    pub level: u32,

    /// Depth as declared by the outline
    pub source_depth: u32,

    /// Section id of the nearest shallower ancestor
    pub parent_id: Option<String>,

    /// Ancestor titles joined by " > ", ending with this node's title
    pub full_path: String,

    /// Direct children, filled in by the TOC index
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_ids: Vec<String>,
}

impl TocNode {
    /// Check if this node sits at the top of the hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if the outline skipped depths to reach this node.
    pub fn depth_skipped(&self) -> bool {
        self.source_depth > self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_reasons() {
        assert_eq!(
            OutlineEntry::new(0, "A", 1).malformed_reason(),
            Some("non-positive depth")
        );
        assert_eq!(
            OutlineEntry::new(1, "   ", 1).malformed_reason(),
            Some("empty title")
        );
        assert_eq!(
            OutlineEntry::new(1, "A", 0).malformed_reason(),
            Some("non-positive page")
        );
        assert!(OutlineEntry::new(1, "A", 1).is_well_formed());
    }

    #[test]
    fn test_outline_entry_deserialize_negative_depth() {
        let entry: OutlineEntry =
            serde_json::from_str(r#"{"depth": -2, "title": "Bad", "page": 3}"#).unwrap();
        assert!(!entry.is_well_formed());
    }
}
