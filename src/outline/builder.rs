//! Ancestor-stack reconstruction of the outline hierarchy.
//!
//! The outline arrives as a flat sequence of `(depth, title, page)` entries.
//! Each entry is attached to the nearest preceding entry with a strictly
//! smaller depth, and numbered by its arrival position among that parent's
//! children. Depth gaps never create placeholder nodes: a depth-3 entry
//! directly under a depth-1 entry becomes `"1.1"`, not `"1.0.1"`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::identifier;
use crate::model::{OutlineEntry, TocNode};

/// Separator used when joining ancestor titles into a full path.
pub const PATH_SEPARATOR: &str = " > ";

/// An entry on the ancestor stack.
#[derive(Debug, Clone)]
struct AncestorFrame {
    depth: u32,
    section_id: String,
    full_path: String,
}

/// Counters collected while building the hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineStats {
    /// Outline entries consumed
    pub entries_seen: u32,

    /// TOC nodes emitted
    pub nodes_emitted: u32,

    /// Entries rejected as malformed
    pub malformed_skipped: u32,

    /// Nodes whose declared depth exceeded their effective level
    pub depth_skips: u32,

    /// Deepest effective level reached
    pub max_level: u32,
}

impl OutlineStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Incremental outline hierarchy builder.
///
/// Feed entries in declared order with [`push`](Self::push); every
/// well-formed entry yields exactly one [`TocNode`], in input order.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    stack: Vec<AncestorFrame>,
    // Keyed by parent section id; `None` is the root.
    child_counts: HashMap<Option<String>, u32>,
    stats: OutlineStats,
}

impl HierarchyBuilder {
    /// Create a new builder with an empty ancestor stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one outline entry.
    ///
    /// Returns `None` if the entry is malformed; it is counted and skipped.
    pub fn push(&mut self, entry: &OutlineEntry) -> Option<TocNode> {
        self.stats.entries_seen += 1;

        if let Some(reason) = entry.malformed_reason() {
            return self.skip(entry, reason);
        }
        let (Ok(depth), Ok(page)) = (u32::try_from(entry.depth), u32::try_from(entry.page)) else {
            return self.skip(entry, "value out of range");
        };
        let title = entry.title.trim().to_string();

        while self.stack.last().is_some_and(|frame| frame.depth >= depth) {
            if let Some(frame) = self.stack.pop() {
                // A popped frame can never become a parent again.
                self.child_counts.remove(&Some(frame.section_id));
            }
        }

        let parent = self.stack.last();
        let parent_id = parent.map(|frame| frame.section_id.clone());

        let position = self.child_counts.entry(parent_id.clone()).or_insert(0);
        *position += 1;

        let section_id = identifier::section_id(parent_id.as_deref(), *position);
        let full_path = match parent {
            Some(frame) => format!("{}{}{}", frame.full_path, PATH_SEPARATOR, title),
            None => title.clone(),
        };
        let level = self.stack.len() as u32 + 1;

        self.stack.push(AncestorFrame {
            depth,
            section_id: section_id.clone(),
            full_path: full_path.clone(),
        });

        self.stats.nodes_emitted += 1;
        self.stats.max_level = self.stats.max_level.max(level);
        if depth > level {
            self.stats.depth_skips += 1;
        }

        Some(TocNode {
            section_id,
            title,
            page,
            level,
            source_depth: depth,
            parent_id,
            full_path,
            child_ids: Vec::new(),
        })
    }

    fn skip(&mut self, entry: &OutlineEntry, reason: &str) -> Option<TocNode> {
        log::debug!(
            "Skipping outline entry {:?} (depth {}, page {}): {}",
            entry.title,
            entry.depth,
            entry.page,
            reason
        );
        self.stats.malformed_skipped += 1;
        None
    }

    /// Current ancestor stack depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &OutlineStats {
        &self.stats
    }

    /// Consume the builder and return its statistics.
    pub fn into_stats(self) -> OutlineStats {
        self.stats
    }
}

/// Lazy adapter turning an outline entry iterator into TOC nodes.
pub struct TocStream<I> {
    entries: I,
    builder: HierarchyBuilder,
}

impl<I> TocStream<I>
where
    I: Iterator<Item = OutlineEntry>,
{
    /// Create a new stream over the given entries.
    pub fn new<T>(entries: T) -> Self
    where
        T: IntoIterator<Item = OutlineEntry, IntoIter = I>,
    {
        Self {
            entries: entries.into_iter(),
            builder: HierarchyBuilder::new(),
        }
    }

    /// Statistics for the entries consumed so far.
    pub fn stats(&self) -> &OutlineStats {
        self.builder.stats()
    }

    /// Consume the stream and return its statistics.
    pub fn into_stats(self) -> OutlineStats {
        self.builder.into_stats()
    }
}

impl<I> Iterator for TocStream<I>
where
    I: Iterator<Item = OutlineEntry>,
{
    type Item = TocNode;

    fn next(&mut self) -> Option<TocNode> {
        for entry in self.entries.by_ref() {
            if let Some(node) = self.builder.push(&entry) {
                return Some(node);
            }
        }
        None
    }
}

/// Build the full table of contents in memory.
///
/// Convenient for small outlines; prefer [`TocStream`] for streaming.
pub fn build_toc<I>(entries: I) -> Vec<TocNode>
where
    I: IntoIterator<Item = OutlineEntry>,
{
    TocStream::new(entries).collect()
}
