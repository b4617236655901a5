//! CSV row parser.
//!
//! Turns a delimited file with a header row into an ordered, lazy sequence of
//! `header -> value` maps. Record lengths may vary: missing trailing cells are
//! simply absent from the map and surplus cells are dropped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};

use crate::error::ImportError;
use crate::models::RawRow;

/// Lazy iterator over the data rows of a CSV source.
///
/// Yields `Err(ImportError::Stream)` if the underlying read fails; rows
/// already yielded are unaffected.
pub struct RowReader<R: Read> {
    headers: Vec<String>,
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> RowReader<R> {
    /// Read the header row from `source` and prepare to stream data rows.
    pub fn new(source: R) -> Result<Self, ImportError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(source);

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        Ok(Self {
            headers,
            records: reader.into_records(),
        })
    }

    /// Column names from the header row, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn to_row(&self, record: &StringRecord) -> RawRow {
        self.headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect()
    }
}

impl RowReader<File> {
    /// Open a CSV file from disk.
    pub fn open(path: &Path) -> Result<Self, ImportError> {
        let file = File::open(path)
            .map_err(|e| ImportError::Stream(format!("{}: {}", path.display(), e)))?;
        Self::new(file)
    }
}

impl<R: Read> Iterator for RowReader<R> {
    type Item = Result<RawRow, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|r| self.to_row(&r))
                .map_err(ImportError::from),
        )
    }
}

/// Read every row of the file at `path`, stopping at the first read error.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>, ImportError> {
    RowReader::open(path)?.collect()
}
