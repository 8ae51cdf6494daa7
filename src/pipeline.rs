//! End-to-end extraction pipeline.
//!
//! A run reads the outline once, writing TOC records as nodes are built,
//! then reads pages once, writing content records as pages are normalized.
//! Both phases fill in-memory indexes (counts and TOC nodes only, never
//! block text) that the cross-validator consumes at the end.
//!
//! # Example
//!
//! ```no_run
//! use docstruct::pipeline::Pipeline;
//! use docstruct::source::JsonDocument;
//! use docstruct::PipelineOptions;
//!
//! let doc = JsonDocument::open("spec-dump.json")?;
//! let report = Pipeline::new(PipelineOptions::new().with_parallel(true))
//!     .run(&doc, "out".as_ref())?;
//! println!("{} TOC entries", report.outline.nodes_emitted);
//! # Ok::<(), docstruct::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::normalize::{
    for_each_page_ordered, BlockClassifier, ContentNormalizer, ContentStream, NormalizeStats,
    PageOutcome,
};
use crate::options::{ErrorMode, PipelineOptions};
use crate::outline::{OutlineStats, TocIndex, TocStream};
use crate::source::{DocumentSource, PageHandle};
use crate::summary::{DocumentSummary, SummaryBuilder};
use crate::validate::{ContentIndex, CrossValidator, ValidationReport};
use crate::writer::{write_json, write_report, ContentRecord, JsonlWriter, TocRecord, WriteSummary};

/// Result of the outline phase.
#[derive(Debug, Clone)]
pub struct TocPhase {
    pub index: TocIndex,
    pub stats: OutlineStats,
    pub written: WriteSummary,
}

/// Result of the content phase.
#[derive(Debug, Clone)]
pub struct ContentPhase {
    pub index: ContentIndex,
    pub stats: NormalizeStats,
    pub summary: SummaryBuilder,
    pub written: WriteSummary,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outline: OutlineStats,
    pub content: NormalizeStats,
    pub validation: ValidationReport,
    pub summary: DocumentSummary,
    pub toc_path: PathBuf,
    pub content_path: PathBuf,
    pub report_path: PathBuf,
    pub summary_path: PathBuf,
}

impl RunReport {
    /// Check if any page was skipped.
    pub fn has_page_failures(&self) -> bool {
        self.content.pages_failed > 0
    }
}

/// Drives a document source through hierarchy building, normalization,
/// writing, and cross-validation.
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: PipelineOptions,
    normalizer: ContentNormalizer,
}

impl Pipeline {
    /// Create a pipeline with the given options.
    pub fn new(options: PipelineOptions) -> Self {
        let normalizer = ContentNormalizer::new(options.normalize.clone());
        Self {
            options,
            normalizer,
        }
    }

    /// Replace the block classification rule.
    pub fn with_classifier(mut self, classifier: Arc<dyn BlockClassifier>) -> Self {
        self.normalizer = self.normalizer.with_classifier(classifier);
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Pages selected for extraction, in ascending order.
    pub fn selected_pages<S>(&self, source: &S) -> Vec<PageHandle>
    where
        S: DocumentSource + ?Sized,
    {
        let limit = self.options.max_pages.map_or(usize::MAX, |m| m as usize);
        source
            .pages()
            .into_values()
            .filter(|handle| self.options.pages.includes(handle.number))
            .take(limit)
            .collect()
    }

    /// Build the table of contents and write it to `dest`.
    pub fn build_toc<S>(&self, source: &S, dest: &Path) -> Result<TocPhase>
    where
        S: DocumentSource + ?Sized,
    {
        let mut writer = JsonlWriter::create(dest)?;
        let mut index = TocIndex::new();
        let mut stream = TocStream::new(source.outline());

        for node in stream.by_ref() {
            writer.write_record(&TocRecord::from(&node))?;
            index.insert(node);
        }

        let written = writer.finish()?;
        let stats = stream.into_stats();

        if stats.malformed_skipped > 0 {
            log::warn!(
                "Skipped {} malformed outline entries",
                stats.malformed_skipped
            );
        }

        Ok(TocPhase {
            index,
            stats,
            written,
        })
    }

    /// Normalize the selected pages and write content records to `dest`.
    ///
    /// `toc` is used for section attribution when enabled.
    pub fn extract_content<S>(&self, source: &S, dest: &Path, toc: &TocIndex) -> Result<ContentPhase>
    where
        S: DocumentSource + Sync + ?Sized,
    {
        let pages = self.selected_pages(source);
        let attribute = self.options.attribute_hierarchy;
        let strict = self.options.error_mode == ErrorMode::Strict;

        let mut writer = JsonlWriter::create(dest)?;
        let mut index = ContentIndex::new();
        let mut stats = NormalizeStats::new();
        let mut summary = SummaryBuilder::new(&self.options.keywords);

        let mut handle = |outcome: PageOutcome| -> Result<()> {
            match outcome {
                PageOutcome::Extracted(batch) => {
                    stats.merge(&batch.stats);
                    for block in &batch.blocks {
                        let section = if attribute {
                            toc.section_for_page(block.page)
                        } else {
                            None
                        };
                        writer.write_record(&ContentRecord::new(block, section))?;
                        index.record(block);
                        summary.observe_block(block);
                    }
                    Ok(())
                }
                PageOutcome::Failed(failure) if strict => Err(failure.into_error()),
                PageOutcome::Failed(failure) => {
                    stats.add_failure(failure);
                    Ok(())
                }
            }
        };

        if self.options.parallel {
            for_each_page_ordered(
                source,
                &self.normalizer,
                &pages,
                self.options.parallel_config,
                handle,
            )?;
        } else {
            for outcome in ContentStream::with_pages(source, &self.normalizer, pages) {
                handle(outcome)?;
            }
        }

        let written = writer.finish()?;

        Ok(ContentPhase {
            index,
            stats,
            summary,
            written,
        })
    }

    /// Run every phase and write all artifacts into `out_dir`.
    pub fn run<S>(&self, source: &S, out_dir: &Path) -> Result<RunReport>
    where
        S: DocumentSource + Sync + ?Sized,
    {
        fs::create_dir_all(out_dir).map_err(|e| Error::write(out_dir, e))?;

        let files = &self.options.output_files;
        let toc_path = files.toc_path(out_dir);
        let content_path = files.content_path(out_dir);
        let report_path = files.report_path(out_dir);
        let summary_path = files.summary_path(out_dir);

        let started = Instant::now();
        let toc = self.build_toc(source, &toc_path)?;
        log::info!(
            "Wrote {} TOC entries to {} in {:?}",
            toc.written.records,
            toc_path.display(),
            started.elapsed()
        );

        let started = Instant::now();
        let content = self.extract_content(source, &content_path, &toc.index)?;
        log::info!(
            "Wrote {} content blocks from {} pages to {} in {:?} ({} pages failed, {} blocks dropped)",
            content.written.records,
            content.stats.pages_processed,
            content_path.display(),
            started.elapsed(),
            content.stats.pages_failed,
            content.stats.blocks_dropped()
        );

        let validation =
            CrossValidator::new(self.options.validation).report(&toc.index, &content.index);
        write_report(&report_path, &validation.discrepancies, self.options.report_format)?;

        let summary = content.summary.finish(
            source.title(),
            source.page_count(),
            &toc.index,
            &content.stats,
        );
        write_json(&summary_path, &summary, self.options.report_format)?;

        Ok(RunReport {
            outline: toc.stats,
            content: content.stats,
            validation,
            summary,
            toc_path,
            content_path,
            report_path,
            summary_path,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineOptions::default())
    }
}
