//! Document source backed by a JSON document dump.
//!
//! The dump is what an external decoder writes after reading the real
//! document:
//!
//! ```json
//! {
//!   "title": "Example Specification",
//!   "page_count": 3,
//!   "outline": [{"depth": 1, "title": "Introduction", "page": 1}],
//!   "pages": [
//!     {"number": 1, "blocks": [{"bbox": [72, 700, 540, 720], "text": "Introduction", "heading_hint": true}]},
//!     {"number": 2, "error": "content stream is corrupt"}
//!   ]
//! }
//! ```
//!
//! Pages listed with an `error`, and pages within `page_count` that are
//! absent from `pages`, are reported as unreadable.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DocumentSource, PageHandle};
use crate::error::{Error, Result};
use crate::model::{OutlineEntry, RawBlock};

const MISSING_SLOT: usize = usize::MAX;

/// Largest `page_count` a dump may declare.
pub const MAX_PAGE_COUNT: u32 = 1_000_000;

/// Serialized form of a whole document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentDump {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Declared page count; pages up to it are expected in `pages`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    #[serde(default)]
    pub outline: Vec<OutlineEntry>,

    #[serde(default)]
    pub pages: Vec<PageDump>,
}

/// Serialized form of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDump {
    /// 1-indexed page number
    pub number: u32,

    #[serde(default)]
    pub blocks: Vec<RawBlock>,

    /// Decoder failure for this page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A document loaded from a JSON dump.
#[derive(Debug, Clone)]
pub struct JsonDocument {
    path: Option<PathBuf>,
    dump: DocumentDump,
    slots: BTreeMap<u32, usize>,
}

impl JsonDocument {
    /// Open a dump file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::DocumentOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut doc = Self::from_reader(BufReader::new(file))?;
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Load a dump from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let dump: DocumentDump = serde_json::from_reader(reader)
            .map_err(|e| Error::InvalidDocument(e.to_string()))?;
        Self::from_dump(dump)
    }

    /// Load a dump from a string.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: DocumentDump =
            serde_json::from_str(json).map_err(|e| Error::InvalidDocument(e.to_string()))?;
        Self::from_dump(dump)
    }

    /// Wrap an already-deserialized dump.
    pub fn from_dump(dump: DocumentDump) -> Result<Self> {
        let mut slots = BTreeMap::new();

        for (slot, page) in dump.pages.iter().enumerate() {
            if page.number == 0 {
                return Err(Error::InvalidDocument(
                    "page numbers are 1-indexed, found page 0".to_string(),
                ));
            }
            if slots.insert(page.number, slot).is_some() {
                return Err(Error::InvalidDocument(format!(
                    "page {} listed more than once",
                    page.number
                )));
            }
        }

        if let Some(count) = dump.page_count {
            if count > MAX_PAGE_COUNT {
                return Err(Error::InvalidDocument(format!(
                    "page_count {} exceeds the limit of {}",
                    count, MAX_PAGE_COUNT
                )));
            }
        }

        Ok(Self {
            path: None,
            dump,
            slots,
        })
    }

    /// Path the dump was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The underlying dump.
    pub fn dump(&self) -> &DocumentDump {
        &self.dump
    }
}

impl DocumentSource for JsonDocument {
    fn outline(&self) -> Box<dyn Iterator<Item = OutlineEntry> + '_> {
        Box::new(self.dump.outline.iter().cloned())
    }

    fn pages(&self) -> BTreeMap<u32, PageHandle> {
        let mut pages: BTreeMap<u32, PageHandle> = self
            .slots
            .iter()
            .map(|(&number, &slot)| (number, PageHandle::new(number, slot)))
            .collect();

        // Declared but unlisted pages read as missing.
        for number in 1..=self.dump.page_count.unwrap_or(0) {
            pages
                .entry(number)
                .or_insert_with(|| PageHandle::new(number, MISSING_SLOT));
        }
        pages
    }

    fn blocks(&self, page: &PageHandle) -> Result<Vec<RawBlock>> {
        let dump = match self.dump.pages.get(page.slot) {
            Some(dump) if page.slot != MISSING_SLOT => dump,
            _ => {
                return Err(Error::PageExtraction {
                    page: page.number,
                    reason: "page missing from document dump".to_string(),
                })
            }
        };

        match &dump.error {
            Some(reason) => Err(Error::PageExtraction {
                page: page.number,
                reason: reason.clone(),
            }),
            None => Ok(dump.blocks.clone()),
        }
    }

    fn title(&self) -> Option<&str> {
        self.dump.title.as_deref()
    }

    fn page_count(&self) -> u32 {
        let highest_listed = self.slots.keys().next_back().copied().unwrap_or(0);
        self.dump.page_count.unwrap_or(0).max(highest_listed)
    }
}
