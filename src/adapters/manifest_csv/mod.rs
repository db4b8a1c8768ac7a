// CSV manifest adapter - Reads cut manifests from delimited text

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

pub const START_FRAME_COLUMN: &str = "start_frame";
pub const END_FRAME_COLUMN: &str = "end_frame";
pub const FILENAME_COLUMN: &str = "filename";

/// Default field delimiter for manifests
pub const DEFAULT_DELIMITER: u8 = b',';

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column positions of the required fields
struct ColumnMap {
    start_frame: usize,
    end_frame: usize,
    filename: usize,
}

/// CSV manifest adapter
#[derive(Debug, Clone)]
pub struct CsvManifestAdapter {
    delimiter: u8,
}

impl Default for CsvManifestAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvManifestAdapter {
    /// Create new adapter using the default delimiter
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Create new adapter using a custom single-byte delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    fn map_columns(headers: &StringRecord) -> Result<ColumnMap, ManifestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| ManifestError::MissingColumn {
                    column: name.to_string(),
                })
        };

        Ok(ColumnMap {
            start_frame: find(START_FRAME_COLUMN)?,
            end_frame: find(END_FRAME_COLUMN)?,
            filename: find(FILENAME_COLUMN)?,
        })
    }

    fn parse_frame(record: &StringRecord, index: usize, row: usize, column: &str) -> Result<f64, ManifestError> {
        let value = record.get(index).unwrap_or_default();
        match value.parse::<f64>() {
            Ok(frame) if frame.is_finite() => Ok(frame),
            _ => Err(ManifestError::TypeMismatch {
                row,
                column: column.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl ManifestPort for CsvManifestAdapter {
    fn parse(&self, manifest: &[u8]) -> Result<Vec<CutJob>, ManifestError> {
        let manifest = manifest.strip_prefix(UTF8_BOM).unwrap_or(manifest);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(manifest);

        let headers = reader
            .headers()
            .map_err(|e| ManifestError::Malformed {
                message: e.to_string(),
            })?
            .clone();

        if headers.iter().all(str::is_empty) {
            return Err(ManifestError::Empty);
        }

        let columns = Self::map_columns(&headers)?;
        let mut jobs = Vec::new();

        for (position, record) in reader.records().enumerate() {
            let record = record.map_err(|e| ManifestError::Malformed {
                message: e.to_string(),
            })?;
            let row = position + 1;

            // Spreadsheet exports often pad with empty rows
            if record.iter().all(str::is_empty) {
                continue;
            }

            let start_frame = Self::parse_frame(&record, columns.start_frame, row, START_FRAME_COLUMN)?;
            let end_frame = Self::parse_frame(&record, columns.end_frame, row, END_FRAME_COLUMN)?;
            let filename = record.get(columns.filename).unwrap_or_default();

            jobs.push(CutJob::new(jobs.len(), start_frame, end_frame, filename));
        }

        if jobs.is_empty() {
            return Err(ManifestError::Empty);
        }

        debug!("Parsed {} cut jobs from manifest", jobs.len());
        Ok(jobs)
    }
}
