//! CSV loading with numeric/categorical type inference.
//!
//! Reads a CSV file into a [`DataFrame`](crate::dataframe::DataFrame).
//! Tokenization is delegated to the `csv` crate; per-column typing is
//! decided here: a column is numeric when every non-null value parses
//! as `f64`, otherwise categorical.
//!
//! # Features
//!
//! - Header row by default; generated `col_N` names otherwise
//! - Standard null markers recognized: empty, `NA`, `N/A`, `null`,
//!   `NULL`, `None`, `NaN`, `.`
//! - UTF-8 BOM tolerated
//! - Ragged rows rejected with the offending line number
//!
//! # Example
//!
//! ```
//! use tablens::loader::CsvReader;
//! use tablens::dataframe::DataKind;
//!
//! let csv = "name,value\nAlice,1.5\nBob,NA\n";
//! let df = CsvReader::new().read_str(csv).unwrap();
//! assert_eq!(df.row_count(), 2);
//! assert_eq!(df.column(0).unwrap().kind(), DataKind::Categorical);
//! assert_eq!(df.column(1).unwrap().kind(), DataKind::Numeric);
//! assert_eq!(df.column(1).unwrap().null_count(), 1);
//! ```

use std::path::Path;

use log::debug;

use crate::dataframe::{Column, DataFrame, NullMask};
use crate::error::TablensError;

/// Standard null value markers recognized during loading.
const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", ".",
    "NaN", "nan", "NAN", "#N/A", "#NA",
];

/// CSV reader configuration and entry point.
///
/// ```
/// use tablens::loader::CsvReader;
///
/// let csv = "a;b\n1;2\n3;4\n";
/// let df = CsvReader::new().delimiter(b';').read_str(csv).unwrap();
/// assert_eq!(df.row_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CsvReader {
    delimiter: u8,
    has_header: bool,
    null_markers: Vec<String>,
}

impl CsvReader {
    /// Creates a reader with default settings (comma delimiter, header
    /// row, standard null markers).
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets whether the first row is a header (default: true).
    pub fn has_header(mut self, header: bool) -> Self {
        self.has_header = header;
        self
    }

    /// Sets custom null markers (replaces the defaults).
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Reads a CSV file from disk into a DataFrame.
    pub fn read_path(&self, path: &Path) -> Result<DataFrame, TablensError> {
        let content = std::fs::read_to_string(path)?;
        let df = self.read_str(&content)?;
        debug!(
            "loaded {}: {} rows, {} columns",
            path.display(),
            df.row_count(),
            df.column_count()
        );
        Ok(df)
    }

    /// Parses a CSV string into a DataFrame.
    pub fn read_str(&self, input: &str) -> Result<DataFrame, TablensError> {
        // Strip BOM if present
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(self.has_header)
            .from_reader(input.as_bytes());

        let headers: Vec<String> = if self.has_header {
            reader
                .headers()
                .map_err(|e| csv_error(&e))?
                .iter()
                .map(|h| h.trim().to_string())
                .collect()
        } else {
            Vec::new()
        };

        // Collect rows, transposing into column-major raw strings
        let mut raw_columns: Vec<Vec<String>> = headers
            .iter()
            .map(|_| Vec::new())
            .collect();

        for record in reader.records() {
            let record = record.map_err(|e| csv_error(&e))?;
            if raw_columns.is_empty() {
                // Headerless input: the first record fixes the width
                raw_columns = (0..record.len()).map(|_| Vec::new()).collect();
            }
            for (col_idx, field) in record.iter().enumerate() {
                raw_columns[col_idx].push(field.trim().to_string());
            }
        }

        let names: Vec<String> = if self.has_header {
            headers
        } else {
            (0..raw_columns.len()).map(|i| format!("col_{i}")).collect()
        };

        if raw_columns.iter().all(|c| c.is_empty()) {
            return Ok(DataFrame::new());
        }

        let mut df = DataFrame::new();
        for (name, raw) in names.into_iter().zip(raw_columns.iter()) {
            df.add_column(name, self.build_column(raw))?;
        }
        Ok(df)
    }

    // ── Type inference ───────────────────────────────────────────

    /// Checks whether a trimmed value is a null marker.
    fn is_null(&self, value: &str) -> bool {
        self.null_markers.iter().any(|m| m == value)
    }

    /// Infers the column kind and builds a typed Column.
    ///
    /// Numeric if every non-null value parses as `f64`; an all-null
    /// column defaults to numeric with every row masked.
    fn build_column(&self, raw: &[String]) -> Column {
        let null_flags: Vec<bool> = raw.iter().map(|v| self.is_null(v)).collect();

        if null_flags.iter().all(|&n| n) {
            return Column::numeric(vec![0.0; raw.len()], NullMask::all(raw.len()));
        }

        let numeric = raw
            .iter()
            .zip(null_flags.iter())
            .filter(|(_, &n)| !n)
            .all(|(v, _)| v.parse::<f64>().is_ok());

        if numeric {
            let mut values = Vec::with_capacity(raw.len());
            let mut nulls = NullMask::empty();
            for (v, &null) in raw.iter().zip(null_flags.iter()) {
                if null {
                    values.push(0.0);
                    nulls.push(true);
                } else {
                    values.push(v.parse::<f64>().unwrap_or(0.0));
                    nulls.push(false);
                }
            }
            Column::numeric(values, nulls)
        } else {
            let mut values = Vec::with_capacity(raw.len());
            let mut nulls = NullMask::empty();
            for (v, &null) in raw.iter().zip(null_flags.iter()) {
                if null {
                    values.push(String::new());
                    nulls.push(true);
                } else {
                    values.push(v.clone());
                    nulls.push(false);
                }
            }
            Column::categorical(values, nulls)
        }
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a `csv` crate error to [`TablensError::CsvParse`] with the
/// source line when the reader knows it.
fn csv_error(e: &csv::Error) -> TablensError {
    let line = e
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(0);
    TablensError::CsvParse {
        line,
        message: e.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
