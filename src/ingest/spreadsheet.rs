//! Spreadsheet boundary: rows of named fields.
//!
//! The pipeline consumes spreadsheets only as mappings from column name to
//! raw cell value. This adapter reads CSV with a header row; cells are
//! trimmed and field counts may vary per row. No schema validation happens
//! here; absent columns resolve through sanitizer defaults downstream.

use crate::models::record::RawRow;
use crate::{Error, Result};
use std::io::BufRead;

/// CSV-backed source of [`RawRow`] mappings.
pub struct SpreadsheetReader<R: BufRead> {
    /// CSV reader.
    reader: csv::Reader<R>,
    /// Header row, cloned up front.
    headers: Vec<String>,
}

impl<R: BufRead> SpreadsheetReader<R> {
    /// Creates a reader over CSV input with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the header row cannot be read.
    pub fn new(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // Allow varying number of fields
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::OperationFailed {
                operation: "read_spreadsheet_headers".to_string(),
                cause: e.to_string(),
            })?
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        if headers.is_empty() {
            return Err(Error::InvalidInput(
                "spreadsheet has no header row".to_string(),
            ));
        }

        Ok(Self {
            reader: csv_reader,
            headers,
        })
    }

    /// Returns the header names.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Reads all remaining rows.
    ///
    /// Malformed rows are logged and skipped; a row-level parse failure
    /// never aborts the batch.
    ///
    /// # Errors
    ///
    /// Returns an error only if the underlying reader fails irrecoverably.
    pub fn read_all(&mut self) -> Result<Vec<RawRow>> {
        let mut rows = Vec::new();
        for (index, result) in self.reader.records().enumerate() {
            match result {
                Ok(record) => {
                    let mut row = RawRow::new();
                    for (column, cell) in self.headers.iter().zip(record.iter()) {
                        row.set(column.clone(), cell);
                    }
                    rows.push(row);
                }
                Err(e) => {
                    tracing::warn!(row = index + 1, error = %e, "skipping malformed row");
                }
            }
        }
        Ok(rows)
    }
}
