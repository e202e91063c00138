//! Outlier detection over numeric columns.
//!
//! Two interchangeable methods behind one `detect` contract, selected
//! by value:
//!
//! - **Modified Z-score** — robust scoring around the median:
//!   `score = 0.6745 * (x - median) / MAD`, flagging `|score| > 3.5`.
//!   Reference: Iglewicz & Hoaglin (1993), "How to Detect and Handle
//!   Outliers". When MAD is zero (constant or near-constant column)
//!   the score is not computable for any value and the count is 0.
//! - **IQR** — Tukey fences at `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`. When
//!   IQR is zero the fences collapse to the quartile point and every
//!   value not exactly equal to it is flagged; that is the correct
//!   reading of the fences and is preserved.
//!
//! The two methods need not agree. A run selects one method and the
//! emitted [`OutlierReport`] records which, so reports are
//! reproducible.
//!
//! # Example
//!
//! ```
//! use tablens::dataframe::{Column, NullMask};
//! use tablens::outlier::OutlierMethod;
//!
//! let col = Column::numeric(
//!     vec![10.0, 12.0, 12.0, 13.0, 12.0, 11.0, 14.0, 13.0, 15.0, 102.0],
//!     NullMask::none(10),
//! );
//! assert_eq!(OutlierMethod::ModifiedZScore.detect(&col), 1);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::dataframe::{Column, DataFrame};
use crate::error::TablensError;
use crate::stats;

/// Scale factor making MAD consistent with the standard deviation of a
/// normal distribution.
const MODIFIED_Z_SCALE: f64 = 0.6745;

/// Absolute modified Z-score above which a value is flagged.
const MODIFIED_Z_THRESHOLD: f64 = 3.5;

/// Tukey fence multiplier on the interquartile range.
const IQR_FENCE: f64 = 1.5;

// ── Method ────────────────────────────────────────────────────────────

/// Outlier-detection method. A closed set; callers select by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutlierMethod {
    /// Median/MAD-based modified Z-score.
    ModifiedZScore,
    /// Tukey fences on the interquartile range.
    Iqr,
}

impl OutlierMethod {
    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModifiedZScore => "modified-z-score",
            Self::Iqr => "iqr",
        }
    }

    /// Counts outliers among the valid values of a column.
    ///
    /// Categorical columns and numeric columns with no valid values
    /// yield 0. The count never exceeds the row count.
    pub fn detect(&self, column: &Column) -> usize {
        let valid = match column.valid_numeric_values() {
            Some(v) if !v.is_empty() => v,
            _ => return 0,
        };
        match self {
            Self::ModifiedZScore => detect_modified_z(&valid),
            Self::Iqr => detect_iqr(&valid),
        }
    }
}

impl fmt::Display for OutlierMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutlierMethod {
    type Err = TablensError;

    /// Parses a method name. Anything unrecognized is
    /// [`TablensError::UnknownMethod`] — silently falling back to a
    /// different method would make results non-reproducible.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "modified-z-score" => Ok(Self::ModifiedZScore),
            "iqr" => Ok(Self::Iqr),
            other => Err(TablensError::UnknownMethod {
                name: other.to_string(),
            }),
        }
    }
}

// ── Report ────────────────────────────────────────────────────────────

/// Outlier count for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutliers {
    /// Column name.
    pub column: String,
    /// Number of flagged values.
    pub count: usize,
}

/// Per-column outlier counts for one run, plus the method that
/// produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierReport {
    /// The active detection method.
    pub method: OutlierMethod,
    /// One entry per numeric column, in dataset order.
    pub counts: Vec<ColumnOutliers>,
}

impl OutlierReport {
    /// Total flagged values across all columns.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// Count for a named column, if it is a numeric column.
    pub fn count_for(&self, column: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.count)
    }
}

/// Runs outlier detection over every numeric column of a DataFrame.
pub fn detect_outliers(df: &DataFrame, method: OutlierMethod) -> OutlierReport {
    let counts = df
        .iter()
        .filter(|(_, col)| col.kind().is_numeric())
        .map(|(name, col)| ColumnOutliers {
            column: name.to_string(),
            count: method.detect(col),
        })
        .collect();
    OutlierReport { method, counts }
}

// ── Detectors ─────────────────────────────────────────────────────────

fn detect_modified_z(values: &[f64]) -> usize {
    let median = match stats::median(values) {
        Some(m) => m,
        None => return 0,
    };
    let mad = match stats::mad(values) {
        Some(m) => m,
        None => return 0,
    };
    // MAD of zero means the score is infinite for every non-median
    // value; nothing sensible can be flagged
    if mad == 0.0 {
        return 0;
    }
    values
        .iter()
        .filter(|&&v| {
            let score = MODIFIED_Z_SCALE * (v - median) / mad;
            score.abs() > MODIFIED_Z_THRESHOLD
        })
        .count()
}

fn detect_iqr(values: &[f64]) -> usize {
    let (q1, q3) = match (stats::quantile(values, 0.25), stats::quantile(values, 0.75)) {
        (Some(q1), Some(q3)) => (q1, q3),
        _ => return 0,
    };
    let iqr = q3 - q1;
    let low = q1 - IQR_FENCE * iqr;
    let high = q3 + IQR_FENCE * iqr;
    values.iter().filter(|&&v| v < low || v > high).count()
}

// ── Tests ─────────────────────────────────────────────────────────────
