//! Output writers.
//!
//! Every artifact is written to a temporary sibling file and renamed into
//! place once complete.

mod jsonl;
mod record;
mod report;

pub use jsonl::{
    for_each_record, temp_path_for, try_write_jsonl, write_jsonl, JsonlWriter, ReadSummary,
    WriteSummary, TEMP_SUFFIX,
};
pub use record::{truncate_title, ContentRecord, DiscrepancyRecord, TocRecord, TITLE_MAX_CHARS};
pub use report::{to_json, write_json, write_report, JsonFormat};
