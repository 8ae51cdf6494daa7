//! Raw and normalized content blocks.

use serde::{Deserialize, Serialize};

use super::TableShape;

/// Bounding box of a block in page coordinates.
///
/// Serialized as a four-element array `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Check that every coordinate is a finite number.
    ///
    /// JSON has no encoding for NaN or infinity, so only finite boxes
    /// survive a write and re-read.
    pub fn is_finite(&self) -> bool {
        [self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl From<[f64; 4]> for BBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// A text block as reported by the document source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Position on the page
    pub bbox: BBox,

    /// Unnormalized text
    pub text: String,

    /// Source's hint that the block looks like a heading
    #[serde(default)]
    pub heading_hint: bool,
}

impl RawBlock {
    /// Create a body-text block.
    pub fn new(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
            heading_hint: false,
        }
    }

    /// Create a block hinted as a heading.
    pub fn heading(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
            heading_hint: true,
        }
    }
}

/// Classification of a normalized block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Heading,
    Paragraph,
    Other,
}

impl BlockType {
    /// Lowercase name as written to output.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Heading => "heading",
            BlockType::Paragraph => "paragraph",
            BlockType::Other => "other",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized, classified, identified content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Stable id, `p<page>_<index>`
    pub block_id: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Bounding box carried over from the raw block
    pub bbox: BBox,

    /// Normalized text, never empty
    pub text: String,

    /// Block classification
    pub block_type: BlockType,

    /// Estimated grid shape of a tabular block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableShape>,
}

impl ContentBlock {
    /// Check if the block was classified as a heading.
    pub fn is_heading(&self) -> bool {
        self.block_type == BlockType::Heading
    }

    /// Character count of the normalized text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
