//! Keyword search over written JSONL output.

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::BlockType;
use crate::writer::{for_each_record, ContentRecord, ReadSummary, TocRecord};

/// Maximum characters of block text shown in a hit.
pub const SNIPPET_MAX_CHARS: usize = 100;

/// One matching record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Block id for content hits, section id for TOC hits
    pub id: String,
    pub page: u32,
    pub block_type: Option<BlockType>,
    pub snippet: String,
}

/// Result of a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Matching records (at most `limit` of them)
    pub hits: Vec<SearchHit>,

    /// Total number of matching records
    pub total: u64,

    /// Lines that could not be parsed
    pub malformed: u64,
}

/// Search block text in a content file (case-insensitive).
///
/// `limit` bounds the hits kept, not the total counted.
pub fn search_content<P: AsRef<Path>>(path: P, term: &str, limit: usize) -> Result<SearchResults> {
    let needle = prepare(term)?;
    let mut results = SearchResults::default();

    let read = for_each_record(path, |record: ContentRecord| {
        if record.content.to_lowercase().contains(&needle) {
            results.total += 1;
            if results.hits.len() < limit {
                results.hits.push(SearchHit {
                    id: record.block_id,
                    page: record.page,
                    block_type: Some(record.block_type),
                    snippet: snippet(&record.content),
                });
            }
        }
    })?;

    finish(results, read, term)
}

/// Search section titles in a TOC file (case-insensitive).
pub fn search_toc<P: AsRef<Path>>(path: P, term: &str, limit: usize) -> Result<SearchResults> {
    let needle = prepare(term)?;
    let mut results = SearchResults::default();

    let read = for_each_record(path, |record: TocRecord| {
        if record.title.to_lowercase().contains(&needle) {
            results.total += 1;
            if results.hits.len() < limit {
                results.hits.push(SearchHit {
                    snippet: snippet(&record.full_path),
                    id: record.section_id,
                    page: record.page,
                    block_type: None,
                });
            }
        }
    })?;

    finish(results, read, term)
}

fn prepare(term: &str) -> Result<String> {
    let term = term.trim();
    if term.is_empty() {
        return Err(Error::Other("Search term cannot be empty".to_string()));
    }
    Ok(term.to_lowercase())
}

fn finish(mut results: SearchResults, read: ReadSummary, term: &str) -> Result<SearchResults> {
    results.malformed = read.malformed;
    log::info!(
        "Found {:?} in {} of {} records",
        term,
        results.total,
        read.records
    );
    Ok(results)
}

fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
