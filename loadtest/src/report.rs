//! Persists load test records to CSV.

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::outcome::{Record, StatusKey};

/// Column names of the results file.
pub const HEADER: [&str; 3] = ["Request Number", "Latency (ms)", "Status Code"];

/// Returns the name of the results file for a run started at `started`.
pub fn results_filename(started: NaiveDateTime) -> String {
    format!(
        "load_test_results_{}.csv",
        started.format("%Y-%m-%d_%H-%M-%S")
    )
}

#[derive(Serialize)]
struct Row {
    number: u64,
    latency_ms: f64,
    status: StatusKey,
}

/// Writes one CSV row per record, flushing after every row.
///
/// The header is written on creation, so a run without requests still leaves a valid file.
#[derive(Debug)]
pub struct CsvSink {
    writer: csv::Writer<File>,
}

impl CsvSink {
    /// Creates (or truncates) the file at `path` and writes the header.
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;

        Ok(Self { writer })
    }

    /// Appends a record to the file.
    pub fn write(&mut self, record: &Record) -> Result<()> {
        self.writer.serialize(Row {
            number: record.number,
            latency_ms: record.outcome.latency_ms(),
            status: record.outcome.status_key(),
        })?;
        self.writer.flush()?;

        Ok(())
    }
}
