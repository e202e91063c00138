//! Column-major DataFrame for tabular data.
//!
//! The [`DataFrame`] stores data in column-major order with typed
//! columns and a compact [`NullMask`] tracking missing values. Two
//! semantic kinds exist: numeric (supports arithmetic comparison) and
//! categorical (everything else).
//!
//! | Kind | Storage |
//! |------|---------|
//! | [`Numeric`](Column::Numeric) | `Vec<f64>` + mask |
//! | [`Categorical`](Column::Categorical) | `Vec<String>` + mask |
//!
//! Row and column counts are fixed once loading finishes; the analysis
//! engines only read.
//!
//! # Example
//!
//! ```
//! use tablens::dataframe::{Column, DataFrame, NullMask};
//!
//! let mut df = DataFrame::new();
//! df.add_column(
//!     "temperature".to_string(),
//!     Column::numeric(vec![20.5, 21.3, 19.8], NullMask::none(3)),
//! ).unwrap();
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.column_count(), 1);
//! ```

use serde::Serialize;

use crate::error::TablensError;

// ── NullMask ──────────────────────────────────────────────────────────

/// Bit-packed missing-value mask.
///
/// Each bit marks whether the corresponding row is null (1) or present
/// (0), packed into `u64` words — 1 bit per row instead of a byte.
#[derive(Debug, Clone, PartialEq)]
pub struct NullMask {
    bits: Vec<u64>,
    len: usize,
}

impl NullMask {
    /// Creates a mask of `len` rows with no nulls.
    pub fn none(len: usize) -> Self {
        Self {
            bits: vec![0u64; len.div_ceil(64)],
            len,
        }
    }

    /// Creates a mask of `len` rows that are all null.
    pub fn all(len: usize) -> Self {
        let mut mask = Self::none(len);
        for idx in 0..len {
            mask.set_null(idx);
        }
        mask
    }

    /// Creates an empty mask with no rows.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    /// Appends one row, null or present.
    pub fn push(&mut self, null: bool) {
        let idx = self.len;
        self.len += 1;
        if idx / 64 >= self.bits.len() {
            self.bits.push(0);
        }
        if null {
            self.bits[idx / 64] |= 1u64 << (idx % 64);
        }
    }

    /// Marks row `idx` as null.
    #[inline]
    pub fn set_null(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        self.bits[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Returns `true` if row `idx` is null.
    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Returns the number of tracked rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the mask tracks zero rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts null rows. Bits are only ever set below `len`, so a plain
    /// popcount over the words is exact.
    pub fn null_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Counts present (non-null) rows.
    pub fn valid_count(&self) -> usize {
        self.len - self.null_count()
    }

    /// Returns an iterator over the indices of present rows.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&idx| !self.is_null(idx))
    }
}

// ── DataKind ──────────────────────────────────────────────────────────

/// Semantic kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    /// Numeric values (stored as `f64`).
    Numeric,
    /// Categorical or free-form text values.
    Categorical,
}

impl DataKind {
    /// Returns `true` for the numeric kind.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Categorical => write!(f, "categorical"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with a null mask for missing values.
///
/// Values are stored densely; null positions hold a default (0.0 or an
/// empty string) that must be ignored via the mask.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Dense `f64` values. Null positions hold `0.0`.
    Numeric { values: Vec<f64>, nulls: NullMask },
    /// String values. Null positions hold an empty string.
    Categorical { values: Vec<String>, nulls: NullMask },
}

impl Column {
    /// Creates a numeric column.
    pub fn numeric(values: Vec<f64>, nulls: NullMask) -> Self {
        Self::Numeric { values, nulls }
    }

    /// Creates a categorical column.
    pub fn categorical(values: Vec<String>, nulls: NullMask) -> Self {
        Self::Categorical { values, nulls }
    }

    /// Returns the semantic kind of this column.
    pub fn kind(&self) -> DataKind {
        match self {
            Self::Numeric { .. } => DataKind::Numeric,
            Self::Categorical { .. } => DataKind::Categorical,
        }
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.nulls().len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the null mask.
    pub fn nulls(&self) -> &NullMask {
        match self {
            Self::Numeric { nulls, .. } | Self::Categorical { nulls, .. } => nulls,
        }
    }

    /// Returns the number of missing values.
    pub fn null_count(&self) -> usize {
        self.nulls().null_count()
    }

    /// Returns the number of present values.
    pub fn valid_count(&self) -> usize {
        self.nulls().valid_count()
    }

    /// Returns the numeric value at `idx`, or `None` if the row is null
    /// or the column is not numeric.
    pub fn numeric_at(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Numeric { values, nulls } => {
                if nulls.is_null(idx) {
                    None
                } else {
                    Some(values[idx])
                }
            }
            _ => None,
        }
    }

    /// Returns the category string at `idx`, or `None` if the row is
    /// null or the column is not categorical.
    pub fn category_at(&self, idx: usize) -> Option<&str> {
        match self {
            Self::Categorical { values, nulls } => {
                if nulls.is_null(idx) {
                    None
                } else {
                    Some(&values[idx])
                }
            }
            _ => None,
        }
    }

    /// Returns the present numeric values (nulls excluded) as a new
    /// `Vec<f64>`, or `None` for a categorical column.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Numeric { values, nulls } => {
                Some(nulls.valid_indices().map(|i| values[i]).collect())
            }
            _ => None,
        }
    }
}

// ── DataFrame ─────────────────────────────────────────────────────────

/// Column-major tabular data structure.
///
/// Named columns of equal length; supports numeric and categorical
/// kinds. The analysis pipeline treats a loaded DataFrame as immutable.
#[derive(Debug, Clone)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Creates an empty DataFrame with no columns or rows.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Adds a named column.
    ///
    /// The first column fixes the row count; any later column of a
    /// different length is rejected with
    /// [`TablensError::ShapeMismatch`].
    pub fn add_column(&mut self, name: String, column: Column) -> Result<(), TablensError> {
        let len = column.len();
        if self.columns.is_empty() {
            self.row_count = len;
        } else if len != self.row_count {
            return Err(TablensError::ShapeMismatch {
                expected: self.row_count,
                actual: len,
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the DataFrame has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns the column at `index`.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Returns the column with the given `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
    }

    /// Returns an iterator over (name, column) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(|s| s.as_str()).zip(self.columns.iter())
    }

    /// Returns the total number of missing values across all columns.
    pub fn total_null_count(&self) -> usize {
        self.columns.iter().map(|c| c.null_count()).sum()
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
