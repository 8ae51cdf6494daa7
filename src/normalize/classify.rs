//! Block classification rules.

use regex::Regex;

use crate::model::{BlockType, RawBlock, TableShape};

/// A rule assigning a [`BlockType`] to a normalized block.
///
/// `text` is the normalized text; `block` is the raw block it came from.
/// Implementations must be deterministic.
pub trait BlockClassifier: Send + Sync {
    /// Classify a block.
    fn classify(&self, block: &RawBlock, text: &str) -> BlockType;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> BlockClassifier for F
where
    F: Fn(&RawBlock, &str) -> BlockType + Send + Sync,
{
    fn classify(&self, block: &RawBlock, text: &str) -> BlockType {
        self(block, text)
    }
}

/// Default rule: heading iff the source hinted so, else paragraph.
#[derive(Debug, Clone, Copy, Default)]
pub struct HintClassifier;

impl BlockClassifier for HintClassifier {
    fn classify(&self, block: &RawBlock, _text: &str) -> BlockType {
        if block.heading_hint {
            BlockType::Heading
        } else {
            BlockType::Paragraph
        }
    }

    fn name(&self) -> &str {
        "hint"
    }
}

/// Pattern-based rule for technical specifications.
///
/// - hinted blocks and short numbered titles ("4.2.1 Source Capabilities",
///   "Appendix B Revision History") are headings;
/// - tabular rows and text with no letters or digits are `other`;
/// - everything else is a paragraph.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    numbered_heading: Regex,
    max_heading_chars: usize,
}

impl PatternClassifier {
    /// Create a classifier with the default heading length limit.
    pub fn new() -> Self {
        Self {
            numbered_heading: Regex::new(
                r"^(?:\d+(?:\.\d+)*\.?|[A-Z]\.\d+(?:\.\d+)*|(?:Chapter|Section|Appendix|Annex)\s+[A-Z0-9]+)\s+\S",
            )
            .unwrap(),
            max_heading_chars: 100,
        }
    }

    /// Set the longest text that can still count as a numbered heading.
    pub fn with_max_heading_chars(mut self, max: usize) -> Self {
        self.max_heading_chars = max;
        self
    }

    fn is_numbered_heading(&self, text: &str) -> bool {
        text.chars().count() <= self.max_heading_chars
            && !text.ends_with('.')
            && self.numbered_heading.is_match(text)
    }

    fn is_tabular(raw: &str) -> bool {
        TableShape::estimate(raw).is_some()
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockClassifier for PatternClassifier {
    fn classify(&self, block: &RawBlock, text: &str) -> BlockType {
        if block.heading_hint || self.is_numbered_heading(text) {
            BlockType::Heading
        } else if Self::is_tabular(&block.text) || !text.chars().any(char::is_alphanumeric) {
            BlockType::Other
        } else {
            BlockType::Paragraph
        }
    }

    fn name(&self) -> &str {
        "pattern"
    }
}
