//! # docstruct
//!
//! Structured extraction for large technical documents.
//!
//! This library turns a document's flat outline and per-page text blocks
//! into machine-readable artifacts:
//!
//! - a hierarchical table of contents with dotted section ids (`toc.jsonl`)
//! - normalized, classified content blocks (`spec.jsonl`)
//! - a cross-validation report of TOC/content mismatches
//! - a document summary (`metadata.json`)
//!
//! ## Quick Start
//!
//! ```no_run
//! use docstruct::extract_file;
//!
//! fn main() -> docstruct::Result<()> {
//!     let report = extract_file("usb_pd_dump.json", "out")?;
//!     println!(
//!         "{} sections, {} blocks, {} discrepancies",
//!         report.outline.nodes_emitted,
//!         report.content.blocks_emitted,
//!         report.validation.discrepancies.len()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Streaming**: the outline and pages are read once; output is written
//!   as it is produced
//! - **Atomic output**: every file is written to a temporary sibling and
//!   renamed into place on success
//! - **Parallel processing**: pages are normalized with Rayon and written
//!   in page order
//! - **Pluggable classification**: implement [`BlockClassifier`] or pass a
//!   closure
//! - **Pluggable sources**: implement [`DocumentSource`] for any format

pub mod error;
pub mod identifier;
pub mod model;
pub mod normalize;
pub mod options;
pub mod outline;
pub mod pipeline;
pub mod search;
pub mod source;
pub mod summary;
pub mod validate;
pub mod writer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    BBox, BlockType, ContentBlock, Discrepancy, DiscrepancyKind, OutlineEntry, RawBlock, TocNode,
};
pub use normalize::{
    BlockClassifier, ContentNormalizer, HintClassifier, NormalizeOptions, NormalizeStats,
    PatternClassifier,
};
pub use options::{ErrorMode, OutputFiles, PageSelection, PipelineOptions};
pub use outline::{build_toc, HierarchyBuilder, OutlineStats, TocIndex, TocStream};
pub use pipeline::{Pipeline, RunReport};
pub use source::{DocumentSource, JsonDocument, MemoryDocument};
pub use summary::DocumentSummary;
pub use validate::{CrossValidator, ValidationOptions, ValidationReport};
pub use writer::{ContentRecord, JsonFormat, JsonlWriter, TocRecord};

use std::path::Path;
use std::sync::Arc;

/// Extract a document dump into `out_dir` with default options.
///
/// # Arguments
///
/// * `input` - Path to a JSON document dump
/// * `out_dir` - Directory receiving the output files
///
/// # Example
///
/// ```no_run
/// use docstruct::extract_file;
///
/// let report = extract_file("dump.json", "out").unwrap();
/// assert!(report.toc_path.exists());
/// ```
pub fn extract_file<P, Q>(input: P, out_dir: Q) -> Result<RunReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    extract_file_with_options(input, out_dir, PipelineOptions::default())
}

/// Extract a document dump into `out_dir` with custom options.
///
/// # Example
///
/// ```no_run
/// use docstruct::{extract_file_with_options, PipelineOptions};
///
/// let options = PipelineOptions::new()
///     .with_parallel(true)
///     .with_unmatched_pages(true);
/// let report = extract_file_with_options("dump.json", "out", options).unwrap();
/// ```
pub fn extract_file_with_options<P, Q>(
    input: P,
    out_dir: Q,
    options: PipelineOptions,
) -> Result<RunReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let doc = JsonDocument::open(input)?;
    Pipeline::new(options).run(&doc, out_dir.as_ref())
}

/// Build only the table of contents of a document dump.
///
/// # Example
///
/// ```no_run
/// use docstruct::toc_from_file;
///
/// let toc = toc_from_file("dump.json").unwrap();
/// for node in toc.roots() {
///     println!("{} {}", node.section_id, node.title);
/// }
/// ```
pub fn toc_from_file<P: AsRef<Path>>(input: P) -> Result<TocIndex> {
    let doc = JsonDocument::open(input)?;
    Ok(TocStream::new(doc.outline()).collect())
}

/// Builder for configuring and running an extraction.
///
/// # Example
///
/// ```no_run
/// use docstruct::{Docstruct, PageSelection};
///
/// let report = Docstruct::new()
///     .parallel()
///     .with_pages(PageSelection::Range(1..=50))
///     .with_keywords(["VBUS", "PDO"])
///     .extract("dump.json", "out")?;
/// # Ok::<(), docstruct::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct Docstruct {
    options: PipelineOptions,
    classifier: Option<Arc<dyn BlockClassifier>>,
}

impl Docstruct {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort on the first unreadable page.
    pub fn strict(mut self) -> Self {
        self.options = self.options.strict();
        self
    }

    /// Skip unreadable pages (the default).
    pub fn lenient(mut self) -> Self {
        self.options = self.options.with_error_mode(ErrorMode::Lenient);
        self
    }

    /// Normalize pages in parallel.
    pub fn parallel(mut self) -> Self {
        self.options = self.options.with_parallel(true);
        self
    }

    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.options = self.options.with_threads(threads);
        self
    }

    /// Limit how many pages may run ahead of delivery in parallel runs.
    pub fn with_window(mut self, window: usize) -> Self {
        self.options = self.options.with_window(window);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Limit the number of pages processed.
    pub fn with_max_pages(mut self, max: u32) -> Self {
        self.options = self.options.with_max_pages(max);
        self
    }

    /// Set text normalization options.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.options = self.options.with_normalize(normalize);
        self
    }

    /// Report content pages that no TOC entry declares.
    pub fn with_unmatched_pages(mut self) -> Self {
        self.options = self.options.with_unmatched_pages(true);
        self
    }

    /// Leave content records unattributed.
    pub fn without_attribution(mut self) -> Self {
        self.options = self.options.with_attribution(false);
        self
    }

    /// Set the keywords reported in the summary.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = self.options.with_keywords(keywords);
        self
    }

    /// Set the format of the report and summary files.
    pub fn with_report_format(mut self, format: JsonFormat) -> Self {
        self.options = self.options.with_report_format(format);
        self
    }

    /// Use a custom block classifier.
    pub fn with_classifier(mut self, classifier: impl BlockClassifier + 'static) -> Self {
        self.classifier = Some(Arc::new(classifier));
        self
    }

    /// Options collected so far.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Build the configured pipeline.
    pub fn pipeline(&self) -> Pipeline {
        let pipeline = Pipeline::new(self.options.clone());
        match &self.classifier {
            Some(classifier) => pipeline.with_classifier(Arc::clone(classifier)),
            None => pipeline,
        }
    }

    /// Run on any document source.
    pub fn run<S>(&self, source: &S, out_dir: impl AsRef<Path>) -> Result<RunReport>
    where
        S: DocumentSource + Sync + ?Sized,
    {
        self.pipeline().run(source, out_dir.as_ref())
    }

    /// Run on a JSON document dump.
    pub fn extract(&self, input: impl AsRef<Path>, out_dir: impl AsRef<Path>) -> Result<RunReport> {
        let doc = JsonDocument::open(input)?;
        self.run(&doc, out_dir)
    }
}

impl std::fmt::Debug for Docstruct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Docstruct")
            .field("options", &self.options)
            .field("classifier", &self.classifier.as_ref().map(|c| c.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> MemoryDocument {
        MemoryDocument::new()
            .with_outline_entry(1, "Overview", 1)
            .with_outline_entry(2, "Scope", 2)
            .with_page(1, vec![RawBlock::heading(BBox::default(), "1 Overview")])
            .with_page(2, vec![RawBlock::new(BBox::default(), "This covers scope.")])
    }

    #[test]
    fn test_builder_collects_options() {
        let builder = Docstruct::new()
            .strict()
            .with_threads(2)
            .with_unmatched_pages()
            .without_attribution();

        let options = builder.options();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
        assert!(options.validation.report_unmatched_pages);
        assert!(!options.attribute_hierarchy);
    }

    #[test]
    fn test_builder_with_closure_classifier() {
        let dir = TempDir::new().unwrap();
        let report = Docstruct::new()
            .with_classifier(|_: &RawBlock, _: &str| BlockType::Other)
            .run(&sample(), dir.path())
            .unwrap();

        assert_eq!(report.content.other_count, 2);
        assert_eq!(report.content.heading_count, 0);
    }

    #[test]
    fn test_extract_file_from_dump() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dump.json");
        std::fs::write(
            &input,
            r#"{
                "title": "Dump",
                "outline": [{"depth": 1, "title": "Intro", "page": 1}],
                "pages": [{"number": 1, "blocks": [{"bbox": [0, 0, 10, 10], "text": "Hello"}]}]
            }"#,
        )
        .unwrap();

        let out = dir.path().join("out");
        let report = extract_file(&input, &out).unwrap();

        assert_eq!(report.summary.title.as_deref(), Some("Dump"));
        assert_eq!(report.content.blocks_emitted, 1);
        assert!(out.join("toc.jsonl").exists());
        assert!(out.join("spec.jsonl").exists());
        assert!(out.join("validation_report.json").exists());
        assert!(out.join("metadata.json").exists());

        let toc = toc_from_file(&input).unwrap();
        assert_eq!(toc.len(), 1);
    }
}
