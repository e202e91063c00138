//! Full-dataset analysis: classification, aggregation, and the
//! [`AnalysisResult`] contract.
//!
//! This module ties the engines together. [`classify`] partitions the
//! columns into numeric and categorical sets; [`analyze`] rejects
//! degenerate input, runs profiling, correlation, and outlier
//! detection, and composes their outputs into one immutable
//! [`AnalysisResult`]. No further computation happens here — the
//! aggregator's only contract is completeness and stable field naming,
//! so report rendering stays decoupled from analysis internals.
//!
//! The sub-engines are read-only over the DataFrame and mutually
//! independent; they run sequentially here, and merge order cannot
//! affect the output since each fills a disjoint field.
//!
//! # Example
//!
//! ```
//! use tablens::analysis::analyze;
//! use tablens::loader::CsvReader;
//! use tablens::outlier::OutlierMethod;
//!
//! let csv = "x,y,label\n1.0,2.0,a\n2.0,4.1,b\n3.0,5.9,a\n4.0,8.2,b\n";
//! let df = CsvReader::new().read_str(csv).unwrap();
//! let result = analyze(&df, OutlierMethod::ModifiedZScore).unwrap();
//!
//! assert_eq!(result.insights.row_count, 4);
//! assert_eq!(result.insights.numeric_columns, 2);
//! assert_eq!(result.profiles.len(), 3);
//! assert!(result.correlation.get(0, 1).unwrap() > 0.99);
//! ```

use serde::Serialize;

use crate::correlate::{correlation_matrix, CorrelationMatrix};
use crate::dataframe::DataFrame;
use crate::error::TablensError;
use crate::outlier::{detect_outliers, OutlierMethod, OutlierReport};
use crate::profile::{profile_dataframe, ColumnProfile, DatasetInsights};

// ── Type classification ───────────────────────────────────────────────

/// Disjoint partition of the column names by semantic kind. The union
/// of the two sets is every column, each exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypePartition {
    /// Names of numeric columns, in dataset order.
    pub numeric: Vec<String>,
    /// Names of categorical columns, in dataset order.
    pub categorical: Vec<String>,
}

/// Partitions a DataFrame's columns into numeric and categorical name
/// sets. Zero numeric columns is a valid outcome and flows through the
/// rest of the pipeline as an empty correlation matrix and an empty
/// outlier report.
pub fn classify(df: &DataFrame) -> TypePartition {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for (name, col) in df.iter() {
        if col.kind().is_numeric() {
            numeric.push(name.to_string());
        } else {
            categorical.push(name.to_string());
        }
    }
    TypePartition {
        numeric,
        categorical,
    }
}

// ── AnalysisResult ────────────────────────────────────────────────────

/// The structured, immutable output of the analysis pipeline — the
/// sole artifact handed to report rendering.
///
/// Either every field is computed or the run fails before this struct
/// exists; it is never partially populated.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Dataset-level rollup.
    pub insights: DatasetInsights,
    /// One profile per column, in dataset order.
    pub profiles: Vec<ColumnProfile>,
    /// Pearson correlation matrix; explicitly empty when fewer than
    /// two numeric columns exist.
    pub correlation: CorrelationMatrix,
    /// Per-column outlier counts plus the method that produced them.
    pub outliers: OutlierReport,
}

/// Runs the full analysis pipeline over a loaded DataFrame.
///
/// # Errors
///
/// [`TablensError::EmptyDataset`] when the DataFrame has zero rows or
/// zero columns; nothing is computed in that case.
pub fn analyze(df: &DataFrame, method: OutlierMethod) -> Result<AnalysisResult, TablensError> {
    if df.column_count() == 0 || df.row_count() == 0 {
        return Err(TablensError::EmptyDataset);
    }

    let partition = classify(df);
    let insights = DatasetInsights {
        row_count: df.row_count(),
        column_count: df.column_count(),
        numeric_columns: partition.numeric.len(),
        categorical_columns: partition.categorical.len(),
        missing_values: df.total_null_count(),
    };

    Ok(AnalysisResult {
        insights,
        profiles: profile_dataframe(df),
        correlation: correlation_matrix(df),
        outliers: detect_outliers(df, method),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CsvReader;

    fn sample_df() -> DataFrame {
        let csv = "\
age,income,city,score
23,50000,Oslo,7.1
35,62000,Lima,6.4
29,NA,Oslo,8.0
41,71000,Kyiv,5.5
37,68000,Lima,NA
";
        CsvReader::new().read_str(csv).unwrap()
    }

    // ── Classification ───────────────────────────────────────────

    #[test]
    fn classify_partitions_all_columns() {
        let df = sample_df();
        let partition = classify(&df);
        assert_eq!(partition.numeric, vec!["age", "income", "score"]);
        assert_eq!(partition.categorical, vec!["city"]);
        assert_eq!(
            partition.numeric.len() + partition.categorical.len(),
            df.column_count()
        );
    }

    #[test]
    fn classify_zero_numeric_is_valid() {
        let csv = "a,b\nx,p\ny,q\n";
        let df = CsvReader::new().read_str(csv).unwrap();
        let partition = classify(&df);
        assert!(partition.numeric.is_empty());
        assert_eq!(partition.categorical.len(), 2);

        // And the downstream engines degrade cleanly
        let result = analyze(&df, OutlierMethod::Iqr).unwrap();
        assert!(result.correlation.is_empty());
        assert!(result.outliers.counts.is_empty());
    }

    // ── Aggregation ──────────────────────────────────────────────

    #[test]
    fn analyze_populates_every_field() {
        let df = sample_df();
        let result = analyze(&df, OutlierMethod::ModifiedZScore).unwrap();

        assert_eq!(result.insights.row_count, 5);
        assert_eq!(result.insights.column_count, 4);
        assert_eq!(result.insights.numeric_columns, 3);
        assert_eq!(result.insights.categorical_columns, 1);
        assert_eq!(result.insights.missing_values, 2);

        assert_eq!(result.profiles.len(), 4);
        assert_eq!(result.correlation.size(), 3);
        assert_eq!(result.outliers.counts.len(), 3);
        assert_eq!(result.outliers.method, OutlierMethod::ModifiedZScore);
    }

    #[test]
    fn outlier_keys_are_exactly_the_numeric_columns() {
        let df = sample_df();
        let result = analyze(&df, OutlierMethod::Iqr).unwrap();
        let partition = classify(&df);
        let keys: Vec<&str> = result
            .outliers
            .counts
            .iter()
            .map(|c| c.column.as_str())
            .collect();
        assert_eq!(keys, partition.numeric);
    }

    #[test]
    fn empty_dataset_is_fatal() {
        let df = DataFrame::new();
        let err = analyze(&df, OutlierMethod::Iqr).unwrap_err();
        assert_eq!(err, TablensError::EmptyDataset);
    }

    #[test]
    fn header_only_csv_is_fatal() {
        let df = CsvReader::new().read_str("a,b\n").unwrap();
        assert!(analyze(&df, OutlierMethod::Iqr).is_err());
    }

    // ── Determinism ──────────────────────────────────────────────

    #[test]
    fn analysis_is_deterministic() {
        let df = sample_df();
        let a = analyze(&df, OutlierMethod::ModifiedZScore).unwrap();
        let b = analyze(&df, OutlierMethod::ModifiedZScore).unwrap();
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
