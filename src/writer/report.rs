//! Whole-document JSON artifacts (discrepancy report, run summary).

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::{temp_path_for, DiscrepancyRecord};
use crate::error::{Error, Result};
use crate::model::Discrepancy;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value to a JSON string.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
        JsonFormat::Compact => serde_json::to_string(value)?,
    };
    Ok(json)
}

/// Atomically write a value as a single JSON document.
pub fn write_json<T: Serialize + ?Sized>(dest: &Path, value: &T, format: JsonFormat) -> Result<()> {
    let mut data = to_json(value, format)?.into_bytes();
    data.push(b'\n');

    let temp = temp_path_for(dest);
    let mut file = File::create(&temp).map_err(|e| Error::write(&temp, e))?;
    file.write_all(&data).map_err(|e| Error::write(&temp, e))?;
    file.sync_all().map_err(|e| Error::write(&temp, e))?;
    drop(file);

    fs::rename(&temp, dest).map_err(|e| Error::write(dest, e))
}

/// Write the discrepancy report as a JSON array.
pub fn write_report(dest: &Path, discrepancies: &[Discrepancy], format: JsonFormat) -> Result<()> {
    let records: Vec<DiscrepancyRecord> = discrepancies.iter().map(DiscrepancyRecord::from).collect();
    write_json(dest, &records, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TocNode;
    use tempfile::TempDir;

    fn orphan() -> Discrepancy {
        Discrepancy::orphaned(&TocNode {
            section_id: "3".to_string(),
            title: "Missing".to_string(),
            page: 50,
            level: 1,
            source_depth: 1,
            parent_id: None,
            full_path: "Missing".to_string(),
            child_ids: Vec::new(),
        })
    }

    #[test]
    fn test_to_json_formats() {
        let pretty = to_json(&vec![1, 2], JsonFormat::Pretty).unwrap();
        assert!(pretty.contains('\n'));
        let compact = to_json(&vec![1, 2], JsonFormat::Compact).unwrap();
        assert_eq!(compact, "[1,2]");
    }

    #[test]
    fn test_write_report_array() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("validation_report.json");

        write_report(&dest, &[orphan()], JsonFormat::Compact).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["kind"], "orphaned_toc_entry");
        assert_eq!(entries[0]["reference"], "3");
        assert_eq!(entries[0]["page"], 50);
        assert!(!temp_path_for(&dest).exists());
    }

    #[test]
    fn test_empty_report_is_empty_array() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("validation_report.json");

        write_report(&dest, &[], JsonFormat::Pretty).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "[]\n");
    }
}
