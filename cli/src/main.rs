//! docstruct CLI - structured extraction for technical documents

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docstruct::search::{search_content, search_toc, SearchResults};
use docstruct::validate::{load_content_index, load_toc_index};
use docstruct::writer::{write_jsonl, write_report};
use docstruct::{
    CrossValidator, Docstruct, DocumentSource, HintClassifier, JsonDocument, JsonFormat,
    NormalizeOptions, OutputFiles, PageSelection, PatternClassifier, RunReport, TocIndex,
    TocRecord, TocStream, ValidationOptions,
};

#[derive(Parser)]
#[command(name = "docstruct")]
#[command(version)]
#[command(about = "Extract a hierarchical TOC and normalized content from technical documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract TOC, content, validation report, and summary
    Extract {
        /// Input document dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "DOCSTRUCT_OUTPUT", default_value = "outputs")]
        output: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,

        /// Normalize pages in parallel
        #[arg(short, long)]
        parallel: bool,

        /// Worker threads (implies --parallel)
        #[arg(short = 'j', long, env = "DOCSTRUCT_THREADS")]
        threads: Option<usize>,

        /// Pages that may be in flight ahead of the writer in parallel runs
        #[arg(long)]
        window: Option<usize>,

        /// Abort on the first unreadable page
        #[arg(long)]
        strict: bool,

        /// Also report content pages no TOC entry declares
        #[arg(long)]
        unmatched: bool,

        /// Leave content records unattributed
        #[arg(long)]
        no_attribution: bool,

        /// Drop blocks shorter than this many characters
        #[arg(long)]
        min_chars: Option<usize>,

        /// Block classification rule
        #[arg(long, value_enum, default_value = "hint")]
        classifier: ClassifierKind,

        /// Comma-separated keywords reported in the summary
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,

        /// Write compact JSON reports
        #[arg(long)]
        compact: bool,
    },

    /// Print the table of contents
    Toc {
        /// Input document dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write TOC records to this JSONL file instead of printing a tree
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Deepest level to print
        #[arg(long)]
        max_level: Option<u32>,
    },

    /// Cross-validate previously written output
    Validate {
        /// Directory containing toc.jsonl and spec.jsonl
        #[arg(value_name = "DIR", env = "DOCSTRUCT_OUTPUT", default_value = "outputs")]
        dir: PathBuf,

        /// Also report content pages no TOC entry declares
        #[arg(long)]
        unmatched: bool,

        /// Rewrite the validation report file
        #[arg(short, long)]
        write: bool,
    },

    /// Search written output for a keyword
    Search {
        /// Keyword (case-insensitive)
        term: String,

        /// Directory containing the output files
        #[arg(short, long, value_name = "DIR", env = "DOCSTRUCT_OUTPUT", default_value = "outputs")]
        dir: PathBuf,

        /// Search section titles instead of content
        #[arg(long)]
        toc: bool,

        /// Maximum hits to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Print hits as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document information
    Info {
        /// Input document dump (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ClassifierKind {
    /// Heading iff the source hinted so
    Hint,
    /// Numbered titles are headings; tabular rows are other
    Pattern,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            pages,
            max_pages,
            parallel,
            threads,
            window,
            strict,
            unmatched,
            no_attribution,
            min_chars,
            classifier,
            keywords,
            compact,
        } => {
            let settings = ExtractSettings {
                pages,
                max_pages,
                parallel,
                threads,
                window,
                strict,
                unmatched,
                no_attribution,
                min_chars,
                classifier,
                keywords,
                compact,
            };
            cmd_extract(&input, &output, settings)
        }
        Commands::Toc {
            input,
            output,
            max_level,
        } => cmd_toc(&input, output.as_deref(), max_level),
        Commands::Validate {
            dir,
            unmatched,
            write,
        } => cmd_validate(&dir, unmatched, write),
        Commands::Search {
            term,
            dir,
            toc,
            limit,
            json,
        } => cmd_search(&term, &dir, toc, limit, json),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

struct ExtractSettings {
    pages: Option<String>,
    max_pages: Option<u32>,
    parallel: bool,
    threads: Option<usize>,
    window: Option<usize>,
    strict: bool,
    unmatched: bool,
    no_attribution: bool,
    min_chars: Option<usize>,
    classifier: ClassifierKind,
    keywords: Vec<String>,
    compact: bool,
}

impl ExtractSettings {
    fn into_builder(self) -> Result<Docstruct, Box<dyn std::error::Error>> {
        let page_selection = match self.pages.as_deref() {
            Some(p) => PageSelection::parse(p)?,
            None => PageSelection::All,
        };

        let mut normalize = NormalizeOptions::default();
        if let Some(min) = self.min_chars {
            normalize = normalize.with_min_text_chars(min);
        }

        let mut builder = Docstruct::new()
            .with_pages(page_selection)
            .with_normalize(normalize)
            .with_keywords(self.keywords);

        builder = match self.classifier {
            ClassifierKind::Hint => builder.with_classifier(HintClassifier),
            ClassifierKind::Pattern => builder.with_classifier(PatternClassifier::new()),
        };
        if let Some(max) = self.max_pages {
            builder = builder.with_max_pages(max);
        }
        if let Some(threads) = self.threads {
            builder = builder.with_threads(threads);
        } else if self.parallel {
            builder = builder.parallel();
        }
        if let Some(window) = self.window {
            builder = builder.with_window(window);
        }
        if self.strict {
            builder = builder.strict();
        }
        if self.unmatched {
            builder = builder.with_unmatched_pages();
        }
        if self.no_attribution {
            builder = builder.without_attribution();
        }
        if self.compact {
            builder = builder.with_report_format(JsonFormat::Compact);
        }

        Ok(builder)
    }
}

fn cmd_extract(
    input: &Path,
    output: &Path,
    settings: ExtractSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let builder = settings.into_builder()?;
    log::debug!("Resolved extraction options: {:?}", builder.options());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Loading document...");
    let doc = JsonDocument::open(input)?;

    pb.set_message(format!("Extracting {} pages...", doc.page_count()));
    let report = builder.run(&doc, output)?;
    pb.finish_with_message("Done!");

    print_run_report(&report);
    Ok(())
}

fn print_run_report(report: &RunReport) {
    println!("\n{}", "Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "TOC entries".bold(), report.outline.nodes_emitted);
    if report.outline.malformed_skipped > 0 {
        println!(
            "{}: {}",
            "Malformed entries".bold(),
            report.outline.malformed_skipped.to_string().yellow()
        );
    }
    println!("{}: {}", "Pages".bold(), report.content.pages_processed);
    println!("{}: {}", "Content blocks".bold(), report.content.blocks_emitted);
    println!("{}: {}", "Dropped blocks".bold(), report.content.blocks_dropped());
    if report.has_page_failures() {
        let pages: Vec<String> = report
            .summary
            .failed_pages
            .iter()
            .map(u32::to_string)
            .collect();
        println!("{}: {}", "Failed pages".bold(), pages.join(", ").red());
    }

    let validation = &report.validation;
    let status = if validation.discrepancies.is_empty() {
        "no discrepancies".green()
    } else {
        format!(
            "{} orphaned, {} unmatched",
            validation.orphaned_count, validation.unmatched_count
        )
        .yellow()
    };
    println!("{}: {}", "Validation".bold(), status);

    println!("\n{}", "Output files:".green().bold());
    println!("  {} {}", "├─".dimmed(), report.toc_path.display());
    println!("  {} {}", "├─".dimmed(), report.content_path.display());
    println!("  {} {}", "├─".dimmed(), report.report_path.display());
    println!("  {} {}", "└─".dimmed(), report.summary_path.display());
}

fn cmd_toc(
    input: &Path,
    output: Option<&Path>,
    max_level: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = JsonDocument::open(input)?;

    if let Some(path) = output {
        let mut stream = TocStream::new(doc.outline());
        let summary = write_jsonl(path, stream.by_ref().map(|node| TocRecord::from(&node)))?;
        let stats = stream.into_stats();
        println!(
            "{} {} entries to {} ({} malformed skipped)",
            "Saved".green(),
            summary.records,
            path.display(),
            stats.malformed_skipped
        );
        return Ok(());
    }

    let toc: TocIndex = TocStream::new(doc.outline()).collect();
    for node in toc.nodes() {
        if max_level.is_some_and(|max| node.level > max) {
            continue;
        }
        let indent = "  ".repeat(node.level.saturating_sub(1) as usize);
        let marker = if node.depth_skipped() { " (depth skip)".yellow().to_string() } else { String::new() };
        println!(
            "{}{} {} {}{}",
            indent,
            node.section_id.cyan(),
            node.title,
            format!("p.{}", node.page).dimmed(),
            marker
        );
    }

    Ok(())
}

fn cmd_validate(dir: &Path, unmatched: bool, write: bool) -> Result<(), Box<dyn std::error::Error>> {
    let files = OutputFiles::default();
    let (toc, toc_read) = load_toc_index(files.toc_path(dir))?;
    let (content, content_read) = load_content_index(files.content_path(dir))?;

    log::debug!(
        "Loaded {} TOC records and {} content records from {}",
        toc_read.records,
        content_read.records,
        dir.display()
    );

    for (name, read) in [(&files.toc, toc_read), (&files.content, content_read)] {
        if read.malformed > 0 {
            println!(
                "{} {} malformed lines in {}",
                "Warning:".yellow().bold(),
                read.malformed,
                name
            );
        }
    }

    let options = ValidationOptions::new().with_unmatched_pages(unmatched);
    let report = CrossValidator::new(options).report(&toc, &content);

    for d in &report.discrepancies {
        println!(
            "{} {} {}",
            format!("[{}]", d.kind.as_str()).yellow(),
            d.reference().bold(),
            d.detail
        );
    }

    println!(
        "\n{}: {} TOC entries, {} content pages, {} discrepancies",
        "Validation".cyan().bold(),
        report.toc_entries,
        report.content_pages,
        report.discrepancies.len()
    );

    if write {
        let path = files.report_path(dir);
        write_report(&path, &report.discrepancies, JsonFormat::Pretty)?;
        println!("{} {}", "Saved to".green(), path.display());
    }

    if !report.is_valid {
        return Err("output contains neither TOC entries nor content".into());
    }
    Ok(())
}

fn cmd_search(
    term: &str,
    dir: &Path,
    toc: bool,
    limit: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = OutputFiles::default();
    let results: SearchResults = if toc {
        search_toc(files.toc_path(dir), term, limit)?
    } else {
        search_content(files.content_path(dir), term, limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results.hits)?);
        return Ok(());
    }

    for hit in &results.hits {
        println!(
            "{} {} {}",
            hit.id.cyan(),
            format!("p.{}", hit.page).dimmed(),
            hit.snippet
        );
    }

    let shown = results.hits.len() as u64;
    println!(
        "\n{} {:?} found {} times{}",
        "Done!".green().bold(),
        term,
        results.total,
        if shown < results.total {
            format!(" (showing {})", shown)
        } else {
            String::new()
        }
    );

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = JsonDocument::open(input)?;
    let dump = doc.dump();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(title) = doc.title() {
        println!("{}: {}", "Title".bold(), title);
    }
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Outline entries".bold(), dump.outline.len());

    let failed: Vec<String> = dump
        .pages
        .iter()
        .filter(|p| p.error.is_some())
        .map(|p| p.number.to_string())
        .collect();
    if !failed.is_empty() {
        println!("{}: {}", "Unreadable pages".bold(), failed.join(", ").red());
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let blocks: usize = dump.pages.iter().map(|p| p.blocks.len()).sum();
    let hinted = dump
        .pages
        .iter()
        .flat_map(|p| &p.blocks)
        .filter(|b| b.heading_hint)
        .count();
    let words: usize = dump
        .pages
        .iter()
        .flat_map(|p| &p.blocks)
        .map(|b| b.text.split_whitespace().count())
        .sum();

    println!("{}: {}", "Raw blocks".bold(), blocks);
    println!("{}: {}", "Heading hints".bold(), hinted);
    println!("{}: {}", "Words".bold(), words);

    let toc: TocIndex = TocStream::new(doc.outline()).collect();
    for (level, count) in toc.level_counts() {
        println!("{}: {}", format!("Level {} sections", level).bold(), count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Hierarchical TOC and content extraction tool");
    println!();
    println!("License: MIT");
}
