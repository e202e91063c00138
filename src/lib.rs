//! # tablens
//!
//! Statistical profiling, outlier detection, and report generation for
//! tabular datasets.
//!
//! tablens loads a CSV file, computes a deterministic statistical
//! profile — per-column summaries, missing-value counts, a Pearson
//! correlation matrix, and outlier counts — and assembles a Markdown
//! report with chart artifacts and an optional LLM-generated
//! narrative. The analysis core is pure and synchronous; everything
//! with side effects (loading, chart files, report file, narrative
//! HTTP call) lives at the edges.
//!
//! ## Modules
//!
//! - [`dataframe`] — Column-major tabular data model (DataFrame, Column, NullMask)
//! - [`loader`] — CSV loading with numeric/categorical type inference
//! - [`stats`] — Scalar statistics (mean, sample std, quantiles, MAD)
//! - [`profile`] — Column-level summaries and dataset-level insights
//! - [`correlate`] — Pearson correlation matrix with explicit empty/undefined states
//! - [`outlier`] — Outlier detection (modified Z-score, IQR)
//! - [`analysis`] — Type classification and the aggregated [`analysis::AnalysisResult`]
//! - [`chart`] — SVG chart artifacts (correlation heatmap, outlier bars)
//! - [`report`] — Markdown report assembly
//! - [`narrative`] — Chat-completions narrative client with graceful degradation
//! - [`error`] — Error types
//!
//! ## Quick Start
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
//! assert!(result.correlation.get(0, 1).unwrap() > 0.99);
//! ```

pub mod analysis;
pub mod chart;
pub mod correlate;
pub mod dataframe;
pub mod error;
pub mod loader;
pub mod narrative;
pub mod outlier;
pub mod profile;
pub mod report;
pub mod stats;
