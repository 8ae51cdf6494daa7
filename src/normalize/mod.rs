//! Content normalization: raw page blocks to typed content blocks.

mod classify;
mod normalizer;
mod options;
pub mod parallel;
mod stream;
mod text;

pub use classify::{BlockClassifier, HintClassifier, PatternClassifier};
pub use normalizer::{ContentNormalizer, NormalizeStats, PageBatch, PageFailure, PageOutcome};
pub use options::NormalizeOptions;
pub use parallel::{for_each_page_ordered, ParallelConfig};
pub use stream::ContentStream;
pub use text::{normalize_text, TextCleaner};
