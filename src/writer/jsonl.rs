//! Atomic JSON Lines output.
//!
//! Records are written one per line to `<dest>.tmp` and the file is renamed
//! over `dest` only after everything was flushed and synced. A failed or
//! abandoned write leaves the temporary file behind and never touches the
//! destination. Each record is serialized in full before any of its bytes
//! reach the file, so the temporary file only ever holds whole lines.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Suffix appended to the destination file name while writing.
pub const TEMP_SUFFIX: &str = ".tmp";

/// Temporary path used while writing `dest`.
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let mut name: OsString = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(TEMP_SUFFIX);
    dest.with_file_name(name)
}

/// Summary of a finished write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Final destination
    pub path: PathBuf,

    /// Records written
    pub records: u64,

    /// Bytes written, newlines included
    pub bytes: u64,
}

/// Streaming JSON Lines writer with atomic finalization.
///
/// # Example
///
/// ```no_run
/// use docstruct::writer::JsonlWriter;
///
/// let mut writer = JsonlWriter::create("out/toc.jsonl")?;
/// writer.write_record(&serde_json::json!({"section_id": "1"}))?;
/// let summary = writer.finish()?;
/// assert_eq!(summary.records, 1);
/// # Ok::<(), docstruct::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonlWriter {
    dest: PathBuf,
    temp: PathBuf,
    out: BufWriter<File>,
    line: Vec<u8>,
    records: u64,
    bytes: u64,
}

impl JsonlWriter {
    /// Start writing to `dest`.
    pub fn create<P: AsRef<Path>>(dest: P) -> Result<Self> {
        let dest = dest.as_ref().to_path_buf();
        let temp = temp_path_for(&dest);
        let file = File::create(&temp).map_err(|e| Error::write(&temp, e))?;

        Ok(Self {
            dest,
            temp,
            out: BufWriter::new(file),
            line: Vec::with_capacity(512),
            records: 0,
            bytes: 0,
        })
    }

    /// Append one record as a line.
    pub fn write_record<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<()> {
        self.line.clear();
        serde_json::to_writer(&mut self.line, record)?;
        self.line.push(b'\n');

        self.out
            .write_all(&self.line)
            .map_err(|e| Error::write(&self.temp, e))?;

        self.records += 1;
        self.bytes += self.line.len() as u64;
        Ok(())
    }

    /// Records written so far.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Final destination path.
    pub fn dest_path(&self) -> &Path {
        &self.dest
    }

    /// Temporary path being written.
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Flush, sync, and atomically move the file into place.
    pub fn finish(self) -> Result<WriteSummary> {
        let JsonlWriter {
            dest,
            temp,
            mut out,
            records,
            bytes,
            ..
        } = self;

        out.flush().map_err(|e| Error::write(&temp, e))?;
        let file = out
            .into_inner()
            .map_err(|e| Error::write(&temp, e.into_error()))?;
        file.sync_all().map_err(|e| Error::write(&temp, e))?;
        drop(file);

        fs::rename(&temp, &dest).map_err(|e| Error::write(&dest, e))?;
        log::debug!("Wrote {} records to {}", records, dest.display());

        Ok(WriteSummary {
            path: dest,
            records,
            bytes,
        })
    }
}

/// Write every record of an iterator to `dest`.
pub fn write_jsonl<P, I, T>(dest: P, records: I) -> Result<WriteSummary>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = T>,
    T: Serialize,
{
    let mut writer = JsonlWriter::create(dest)?;
    for record in records {
        writer.write_record(&record)?;
    }
    writer.finish()
}

/// Like [`write_jsonl`], for a source that can fail mid-stream.
///
/// The first error aborts the write and leaves the temporary file.
pub fn try_write_jsonl<P, I, T>(dest: P, records: I) -> Result<WriteSummary>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Result<T>>,
    T: Serialize,
{
    let mut writer = JsonlWriter::create(dest)?;
    for record in records {
        writer.write_record(&record?)?;
    }
    writer.finish()
}

/// Summary of a JSONL read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Lines decoded successfully
    pub records: u64,

    /// Non-blank lines that could not be decoded
    pub malformed: u64,
}

/// Decode each line of a JSONL file and pass it to `f`.
///
/// Blank lines are ignored; undecodable lines are skipped and counted.
pub fn for_each_record<T, P, F>(path: P, mut f: F) -> Result<ReadSummary>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
    F: FnMut(T),
{
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut summary = ReadSummary::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(&line) {
            Ok(record) => {
                summary.records += 1;
                f(record);
            }
            Err(e) => {
                log::debug!("{}:{}: skipping malformed line: {}", path.display(), line_no + 1, e);
                summary.malformed += 1;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: u32,
        name: String,
    }

    fn rows() -> Vec<Row> {
        (1..=3)
            .map(|id| Row {
                id,
                name: format!("row {}", id),
            })
            .collect()
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(
            temp_path_for(Path::new("out/toc.jsonl")),
            PathBuf::from("out/toc.jsonl.tmp")
        );
    }

    #[test]
    fn test_write_and_rename() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("rows.jsonl");

        let summary = write_jsonl(&dest, rows()).unwrap();

        assert_eq!(summary.records, 3);
        assert!(dest.exists());
        assert!(!temp_path_for(&dest).exists());

        let content = fs::read_to_string(&dest).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("{\"id\":1,\"name\":\"row 1\"}\n"));
        assert_eq!(summary.bytes, content.len() as u64);
    }

    #[test]
    fn test_failure_keeps_temp_and_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("rows.jsonl");
        fs::write(&dest, "previous\n").unwrap();

        let records = vec![
            Ok(Row {
                id: 1,
                name: "kept".to_string(),
            }),
            Err(Error::Other("source failed".to_string())),
        ];
        let err = try_write_jsonl(&dest, records).unwrap_err();

        assert!(matches!(err, Error::Other(_)));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "previous\n");
        assert!(temp_path_for(&dest).exists());
    }

    #[test]
    fn test_create_in_missing_directory_is_write_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing").join("rows.jsonl");

        let err = JsonlWriter::create(&dest).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }

    #[test]
    fn test_rewrite_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("rows.jsonl");

        write_jsonl(&dest, rows()).unwrap();
        let first = fs::read(&dest).unwrap();
        write_jsonl(&dest, rows()).unwrap();
        let second = fs::read(&dest).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rows.jsonl");
        fs::write(
            &path,
            "{\"id\":1,\"name\":\"a\"}\n\nnot json\n{\"id\":2,\"name\":\"b\"}\n",
        )
        .unwrap();

        let mut read = Vec::new();
        let summary = for_each_record(&path, |row: Row| read.push(row)).unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(summary.malformed, 1);
        assert_eq!(read[1].id, 2);
    }
}
