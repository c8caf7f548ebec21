//! Append-only CSV ledger of observation records
//!
//! The header row is written exactly once, when the file is first created
//! (or found empty). Rows are never rewritten, so row order is append order.
//! Single-writer: concurrent appenders must be serialized by the caller.

use crate::AirLogError;
use crate::Result;
use crate::models::Record;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Durable, append-only store of `Record`s
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file has been created yet
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Append one record, creating the file and header on first use
    #[instrument(
        name = "ledger_append",
        level = "debug",
        skip(self, record),
        fields(city = %record.city)
    )]
    pub fn append(&self, record: &Record) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        if needs_header {
            debug!("Creating ledger at {}", self.path.display());
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        writer.serialize(record).map_err(io::Error::from)?;
        writer.flush()?;

        info!(
            "Appended record for {} at {} to {}",
            record.city,
            record.timestamp_string(),
            self.path.display()
        );
        Ok(())
    }

    /// Read every record in append order.
    ///
    /// Fails with `LedgerNotFound` before the first append and with
    /// `CorruptLedger` on the first row that does not match the schema.
    #[instrument(name = "ledger_read_all", level = "debug", skip(self))]
    pub fn read_all(&self) -> Result<Vec<Record>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AirLogError::LedgerNotFound {
                    path: self.path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers().map_err(|e| csv_error(e, 1))?;
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if headers.iter().ne(Record::HEADER.iter().copied()) {
            let found = headers.iter().collect::<Vec<_>>().join(",");
            return Err(AirLogError::corrupt(1, format!("unexpected header: {found}")));
        }

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<Record>().enumerate() {
            // Header is line 1
            let fallback_line = index as u64 + 2;
            records.push(row.map_err(|e| csv_error(e, fallback_line))?);
        }

        debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

fn csv_error(error: csv::Error, fallback_line: u64) -> AirLogError {
    if error.is_io_error() {
        return io::Error::from(error).into();
    }
    let line = error
        .position()
        .map_or(fallback_line, csv::Position::line);
    AirLogError::corrupt(line, error.to_string())
}
