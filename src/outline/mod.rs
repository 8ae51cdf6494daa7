//! Outline hierarchy reconstruction.

mod builder;
mod index;

pub use builder::{build_toc, HierarchyBuilder, OutlineStats, TocStream, PATH_SEPARATOR};
pub use index::TocIndex;
