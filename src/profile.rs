//! Column-level profiling and the dataset-level insight types.
//!
//! The profiling engine reports descriptive statistics and missing
//! patterns. It tolerates dirty data — missing values are expected
//! input, not errors. Statistics that cannot be computed are reported
//! as `None`, never as NaN: an all-missing numeric column has no
//! [`NumericSummary`] at all, and a single-value column has no sample
//! standard deviation.
//!
//! # Example
//!
//! ```
//! use tablens::loader::CsvReader;
//! use tablens::profile::profile_dataframe;
//!
//! let csv = "x,y\n1.0,A\n2.0,B\nNA,A\n4.0,A\n5.0,B\n";
//! let df = CsvReader::new().read_str(csv).unwrap();
//! let profiles = profile_dataframe(&df);
//!
//! assert_eq!(profiles.len(), 2);
//! assert_eq!(profiles[0].name, "x");
//! assert_eq!(profiles[0].missing_count, 1);
//! assert!(profiles[0].summary.is_some());
//! assert!(profiles[1].summary.is_none());
//! ```

use serde::Serialize;

use crate::dataframe::{Column, DataFrame, DataKind};
use crate::stats;

// ── Numeric summary ───────────────────────────────────────────────────

/// Descriptive statistics for a numeric column, computed over valid
/// (non-missing) values only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    /// Number of valid values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (ddof = 1). `None` when fewer than
    /// two valid values exist.
    pub std: Option<f64>,
    /// Minimum value.
    pub min: f64,
    /// 25th percentile (linear interpolation).
    pub p25: f64,
    /// Median (50th percentile).
    pub p50: f64,
    /// 75th percentile.
    pub p75: f64,
    /// Maximum value.
    pub max: f64,
}

// ── Column profile ────────────────────────────────────────────────────

/// Complete profile for a single column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Semantic kind.
    pub kind: DataKind,
    /// Number of missing values.
    pub missing_count: usize,
    /// Numeric statistics. `None` for categorical columns and for
    /// numeric columns with zero valid values.
    pub summary: Option<NumericSummary>,
}

// ── Dataset insights ──────────────────────────────────────────────────

/// Dataset-level rollup consumed by report rendering. Built by the
/// aggregator from the type partition and the loaded DataFrame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInsights {
    /// Number of rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Count of numeric columns.
    pub numeric_columns: usize,
    /// Count of categorical columns.
    pub categorical_columns: usize,
    /// Total missing values across all columns.
    pub missing_values: usize,
}

// ── Profiling functions ───────────────────────────────────────────────

/// Profiles all columns of a DataFrame, in column order.
pub fn profile_dataframe(df: &DataFrame) -> Vec<ColumnProfile> {
    df.iter()
        .map(|(name, col)| profile_column(name, col))
        .collect()
}

/// Profiles a single column.
pub fn profile_column(name: &str, col: &Column) -> ColumnProfile {
    let summary = match col {
        Column::Numeric { .. } => {
            let valid = col.valid_numeric_values().unwrap_or_default();
            summarize(&valid)
        }
        Column::Categorical { .. } => None,
    };

    ColumnProfile {
        name: name.to_string(),
        kind: col.kind(),
        missing_count: col.null_count(),
        summary,
    }
}

/// Summarizes a slice of valid numeric values. `None` when the slice
/// is empty — the statistics are undefined, not zero.
fn summarize(valid: &[f64]) -> Option<NumericSummary> {
    let mean = stats::mean(valid)?;
    // mean existing implies min/max/quantiles exist too
    Some(NumericSummary {
        count: valid.len(),
        mean,
        std: stats::sample_std(valid),
        min: stats::min(valid)?,
        p25: stats::quantile(valid, 0.25)?,
        p50: stats::quantile(valid, 0.5)?,
        p75: stats::quantile(valid, 0.75)?,
        max: stats::max(valid)?,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::NullMask;
    use crate::loader::CsvReader;

    const EPS: f64 = 1e-10;

    fn numeric_column(values: Vec<f64>) -> Column {
        let n = values.len();
        Column::numeric(values, NullMask::none(n))
    }

    // ── Numeric summaries ────────────────────────────────────────

    #[test]
    fn summary_basic_statistics() {
        let col = numeric_column(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let profile = profile_column("x", &col);
        let s = profile.summary.expect("numeric summary");

        assert_eq!(s.count, 5);
        assert!((s.mean - 3.0).abs() < EPS);
        // ddof=1: var = 2.5
        assert!((s.std.unwrap() - 2.5f64.sqrt()).abs() < EPS);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.p25, 2.0);
        assert_eq!(s.p50, 3.0);
        assert_eq!(s.p75, 4.0);
        assert_eq!(s.max, 5.0);
    }

    #[test]
    fn summary_percentiles_interpolate() {
        let col = numeric_column(vec![1.0, 2.0, 3.0, 4.0]);
        let s = profile_column("x", &col).summary.unwrap();
        assert!((s.p25 - 1.75).abs() < EPS);
        assert!((s.p50 - 2.5).abs() < EPS);
        assert!((s.p75 - 3.25).abs() < EPS);
    }

    #[test]
    fn summary_skips_missing_values() {
        let mut nulls = NullMask::none(4);
        nulls.set_null(1);
        let col = Column::numeric(vec![1.0, 0.0, 3.0, 5.0], nulls);
        let profile = profile_column("x", &col);
        assert_eq!(profile.missing_count, 1);
        let s = profile.summary.unwrap();
        assert_eq!(s.count, 3);
        assert!((s.mean - 3.0).abs() < EPS);
    }

    #[test]
    fn all_missing_column_has_undefined_summary() {
        let col = Column::numeric(vec![0.0, 0.0, 0.0], NullMask::all(3));
        let profile = profile_column("x", &col);
        assert_eq!(profile.kind, DataKind::Numeric);
        assert_eq!(profile.missing_count, 3);
        assert!(profile.summary.is_none());
    }

    #[test]
    fn single_value_column_has_undefined_std() {
        let col = numeric_column(vec![7.0]);
        let s = profile_column("x", &col).summary.unwrap();
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 7.0);
        assert_eq!(s.std, None);
        assert_eq!(s.min, 7.0);
        assert_eq!(s.max, 7.0);
    }

    #[test]
    fn categorical_column_has_no_summary() {
        let col = Column::categorical(vec!["a".into(), "b".into()], NullMask::none(2));
        let profile = profile_column("label", &col);
        assert_eq!(profile.kind, DataKind::Categorical);
        assert!(profile.summary.is_none());
    }

    // ── Coverage ─────────────────────────────────────────────────

    #[test]
    fn profiles_cover_every_column_exactly_once() {
        let csv = "a,b,c\n1,x,2.5\n2,y,3.5\n";
        let df = CsvReader::new().read_str(csv).unwrap();
        let profiles = profile_dataframe(&df);
        assert_eq!(profiles.len(), df.column_count());
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
