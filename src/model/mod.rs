//! Document model types.
//!
//! Inputs reported by a [`DocumentSource`](crate::source::DocumentSource)
//! (outline entries, raw blocks) and the structures derived from them
//! (TOC nodes, content blocks, discrepancies).

mod content;
mod discrepancy;
mod outline;
mod table;

pub use content::{BBox, BlockType, ContentBlock, RawBlock};
pub use discrepancy::{Discrepancy, DiscrepancyKind};
pub use outline::{OutlineEntry, TocNode};
pub use table::TableShape;
