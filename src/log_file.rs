//! Append-only CSV log of samples.
//!
//! Every record is written with its own open/write/sync/close cycle. A record
//! that [`LogFile::append`] reported as written survives a crash of proclog or
//! the host, and a killed session never leaves a half-written line behind.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::{ProclogError, Result};
use crate::process::Sample;

/// First line of every log file.
pub const HEADER: &str = "date;time;cpu_usage;mem_wm;mem_privacy;handles";

const FILE_NAME_FORMAT: &str = "%Y-%m-%d %H-%M-%S";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// File name for a session started at `started_at`: `log YYYY-MM-DD HH-MM-SS.csv`.
pub fn log_file_name(started_at: NaiveDateTime) -> String {
    format!("log {}.csv", started_at.format(FILE_NAME_FORMAT))
}

/// Formats one data record, including its leading newline.
///
/// ```text
/// \n'2024-05-01';'13:37:00';'12.5';'1048576';'524288';'7'
/// ```
pub fn format_record(sample: &Sample) -> String {
    format!(
        "\n'{}';'{}';'{:?}';'{}';'{}';'{}'",
        sample.timestamp.format(DATE_FORMAT),
        sample.timestamp.format(TIME_FORMAT),
        sample.cpu_percent,
        sample.resident_memory,
        sample.private_memory,
        sample.handle_count
    )
}

/// A session's log file. Holds only the path; no handle is kept open between
/// writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Creates the log file in `dir` and writes the header.
    ///
    /// # Errors
    ///
    /// - [`ProclogError::FileCreationConflict`] if a log for the same second
    ///   already exists
    /// - [`ProclogError::Io`] if `dir` is missing or not writable
    pub fn create(dir: &Path, started_at: NaiveDateTime) -> Result<Self> {
        let path = dir.join(log_file_name(started_at));

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => ProclogError::FileCreationConflict(path.clone()),
                _ => ProclogError::Io(e),
            })?;

        file.write_all(HEADER.as_bytes())?;
        file.sync_data()?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record for `sample`.
    ///
    /// The file is reopened in append mode and closed again before returning.
    /// It is not recreated if it has disappeared, since a log without its
    /// header is not a valid log.
    pub fn append(&self, sample: &Sample) -> Result<()> {
        let record = format_record(sample);

        self.write_record(&record)
            .map_err(|source| ProclogError::LogWrite {
                path: self.path.clone(),
                source,
            })
    }

    fn write_record(&self, record: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(record.as_bytes())?;
        file.sync_data()
    }
}
