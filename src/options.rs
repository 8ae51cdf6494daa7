//! Pipeline options and configuration.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::normalize::{NormalizeOptions, ParallelConfig};
use crate::validate::ValidationOptions;
use crate::writer::JsonFormat;

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Error handling mode for unreadable pages
    pub error_mode: ErrorMode,

    /// Whether to normalize pages in parallel
    pub parallel: bool,

    /// Worker threads and read-ahead window for parallel runs
    pub parallel_config: ParallelConfig,

    /// Page selection (which pages to extract)
    pub pages: PageSelection,

    /// Stop after this many selected pages (None = unlimited)
    pub max_pages: Option<u32>,

    /// Text cleanup and filtering
    pub normalize: NormalizeOptions,

    /// Cross-validation behavior
    pub validation: ValidationOptions,

    /// Attribute content blocks to the TOC section covering their page
    pub attribute_hierarchy: bool,

    /// Keywords searched for in the run summary
    pub keywords: Vec<String>,

    /// Output file names
    pub output_files: OutputFiles,

    /// Format of the report and summary files
    pub report_format: JsonFormat,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Abort on the first unreadable page.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the worker thread count (implies parallel processing).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.parallel = true;
        self.parallel_config.threads = Some(threads.max(1));
        self
    }

    /// Set how many pages may run ahead of delivery in parallel runs.
    pub fn with_window(mut self, window: usize) -> Self {
        self.parallel_config.window = window.max(1);
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set specific page range.
    pub fn with_page_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.pages = PageSelection::Range(range);
        self
    }

    /// Limit the number of pages processed.
    pub fn with_max_pages(mut self, max: u32) -> Self {
        self.max_pages = Some(max);
        self
    }

    /// Set normalize options.
    pub fn with_normalize(mut self, normalize: NormalizeOptions) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set validation options.
    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }

    /// Report content pages that no TOC entry declares.
    pub fn with_unmatched_pages(mut self, report: bool) -> Self {
        self.validation = self.validation.with_unmatched_pages(report);
        self
    }

    /// Enable or disable content-to-section attribution.
    pub fn with_attribution(mut self, attribute: bool) -> Self {
        self.attribute_hierarchy = attribute;
        self
    }

    /// Set the keywords reported in the summary.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set output file names.
    pub fn with_output_files(mut self, files: OutputFiles) -> Self {
        self.output_files = files;
        self
    }

    /// Set report format.
    pub fn with_report_format(mut self, format: JsonFormat) -> Self {
        self.report_format = format;
        self
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Lenient,
            parallel: false,
            parallel_config: ParallelConfig::default(),
            pages: PageSelection::All,
            max_pages: None,
            normalize: NormalizeOptions::default(),
            validation: ValidationOptions::default(),
            attribute_hierarchy: true,
            keywords: Vec::new(),
            output_files: OutputFiles::default(),
            report_format: JsonFormat::Pretty,
        }
    }
}

/// Error handling mode for unreadable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first unreadable page
    Strict,
    /// Skip unreadable pages and continue
    #[default]
    Lenient,
}

/// File names of the artifacts written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFiles {
    pub toc: String,
    pub content: String,
    pub report: String,
    pub summary: String,
}

impl OutputFiles {
    /// Resolve the table-of-contents path.
    pub fn toc_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.toc)
    }

    /// Resolve the content path.
    pub fn content_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.content)
    }

    /// Resolve the discrepancy report path.
    pub fn report_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.report)
    }

    /// Resolve the summary path.
    pub fn summary_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.summary)
    }
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            toc: "toc.jsonl".to_string(),
            content: "spec.jsonl".to_string(),
            report: "validation_report.json".to_string(),
            summary: "metadata.json".to_string(),
        }
    }
}

/// Most pages a comma-separated selection may expand to.
pub const MAX_LISTED_PAGES: usize = 100_000;

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Extract all pages
    #[default]
    All,
    /// Extract a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Extract specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let start = parse_page(start, s)?;
                let end = parse_page(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!(
                        "{}: start is after end",
                        s
                    )));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_page(start, s)?;
                let end = parse_page(end, s)?;
                if start > end {
                    return Err(Error::InvalidPageRange(format!(
                        "{}: {} is reversed",
                        s, part
                    )));
                }
                let span = (end - start) as usize + 1;
                if pages.len() + span > MAX_LISTED_PAGES {
                    return Err(Error::InvalidPageRange(format!(
                        "{}: lists more than {} pages, use a single range",
                        s, MAX_LISTED_PAGES
                    )));
                }
                pages.extend(start..=end);
            } else {
                if pages.len() >= MAX_LISTED_PAGES {
                    return Err(Error::InvalidPageRange(format!(
                        "{}: lists more than {} pages",
                        s, MAX_LISTED_PAGES
                    )));
                }
                pages.push(parse_page(part, s)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(part: &str, whole: &str) -> Result<u32> {
    match part.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "{}: invalid page number {:?}",
            whole,
            part.trim()
        ))),
        Ok(page) => Ok(page),
    }
}
