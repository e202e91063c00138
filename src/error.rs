//! Error types for tablens.

use std::fmt;

/// All errors produced by tablens operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TablensError {
    /// CSV parsing failed.
    CsvParse { line: usize, message: String },
    /// Dataset has zero rows or zero columns.
    EmptyDataset,
    /// Column length does not match the DataFrame row count.
    ShapeMismatch { expected: usize, actual: usize },
    /// Unrecognized outlier-detection method name.
    UnknownMethod { name: String },
    /// I/O error while reading input or writing artifacts.
    Io(String),
}

impl fmt::Display for TablensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CsvParse { line, message } => {
                write!(f, "CSV parse error at line {line}: {message}")
            }
            Self::EmptyDataset => {
                write!(f, "dataset has no rows or no columns")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "expected {expected} rows, got {actual}")
            }
            Self::UnknownMethod { name } => {
                write!(f, "unknown outlier-detection method '{name}'")
            }
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for TablensError {}

impl From<std::io::Error> for TablensError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
