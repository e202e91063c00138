//! Pairwise Pearson correlation over numeric columns.
//!
//! Produces a [`CorrelationMatrix`] with an explicit empty state:
//! fewer than two numeric columns means there is nothing to correlate,
//! which is a valid outcome rather than an error. Individual cells can
//! be undefined — a zero-variance column has no correlation with
//! anything (including itself), and a pair with fewer than two
//! complete observations cannot be measured. Undefined cells are
//! `None`; the column keeps its slot in the matrix shape.
//!
//! Rows contribute pairwise-complete: a row counts toward the (i, j)
//! cell only when both columns have a value in that row.
//!
//! # Example
//!
//! ```
//! use tablens::loader::CsvReader;
//! use tablens::correlate::correlation_matrix;
//!
//! let csv = "x,y\n1.0,2.0\n2.0,4.0\n3.0,6.0\n";
//! let df = CsvReader::new().read_str(csv).unwrap();
//! let matrix = correlation_matrix(&df);
//!
//! assert_eq!(matrix.size(), 2);
//! assert!((matrix.get(0, 1).unwrap() - 1.0).abs() < 1e-10);
//! assert_eq!(matrix.get(0, 0), Some(1.0));
//! ```

use serde::Serialize;

use crate::dataframe::{Column, DataFrame};

// ── CorrelationMatrix ─────────────────────────────────────────────────

/// Square Pearson correlation matrix over the numeric columns.
///
/// `Empty` when fewer than two numeric columns exist. Cells are
/// `Option<f64>`: `None` marks an undefined coefficient (zero
/// variance, or not enough complete pairs).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CorrelationMatrix {
    /// Fewer than two numeric columns; nothing to correlate.
    Empty,
    /// Computed matrix. `cells[i][j]` is the coefficient between
    /// `names[i]` and `names[j]`; symmetric by construction.
    Computed {
        names: Vec<String>,
        cells: Vec<Vec<Option<f64>>>,
    },
}

impl CorrelationMatrix {
    /// Returns `true` for the empty state.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the number of numeric columns covered (0 when empty).
    pub fn size(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Computed { names, .. } => names.len(),
        }
    }

    /// Returns the covered column names (empty slice when empty).
    pub fn names(&self) -> &[String] {
        match self {
            Self::Empty => &[],
            Self::Computed { names, .. } => names,
        }
    }

    /// Returns the coefficient at (i, j), or `None` when the matrix is
    /// empty, the indices are out of range, or the cell is undefined.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Computed { cells, .. } => cells.get(i)?.get(j).copied().flatten(),
        }
    }
}

// ── Computation ───────────────────────────────────────────────────────

/// Computes the Pearson correlation matrix over the numeric columns of
/// a DataFrame.
pub fn correlation_matrix(df: &DataFrame) -> CorrelationMatrix {
    let numeric: Vec<(&str, &Column)> = df
        .iter()
        .filter(|(_, c)| c.kind().is_numeric())
        .collect();

    if numeric.len() < 2 {
        return CorrelationMatrix::Empty;
    }

    let n = numeric.len();
    let mut cells: Vec<Vec<Option<f64>>> = vec![vec![None; n]; n];

    for i in 0..n {
        cells[i][i] = self_correlation(numeric[i].1);
        for j in (i + 1)..n {
            let r = pearson_pairwise(numeric[i].1, numeric[j].1);
            cells[i][j] = r;
            cells[j][i] = r;
        }
    }

    CorrelationMatrix::Computed {
        names: numeric.iter().map(|(name, _)| (*name).to_string()).collect(),
        cells,
    }
}

/// Diagonal entry: 1.0 when the column has nonzero variance over at
/// least two valid values, otherwise undefined (0/0 in Pearson terms).
fn self_correlation(col: &Column) -> Option<f64> {
    let valid = col.valid_numeric_values()?;
    if valid.len() < 2 {
        return None;
    }
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    let sum_sq: f64 = valid.iter().map(|v| (v - mean) * (v - mean)).sum();
    if sum_sq > 0.0 {
        Some(1.0)
    } else {
        None
    }
}

/// Pearson r over the rows where both columns have a value.
///
/// `None` when fewer than two complete pairs exist or either side has
/// zero variance over those pairs.
fn pearson_pairwise(a: &Column, b: &Column) -> Option<f64> {
    let len = a.len().min(b.len());
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for idx in 0..len {
        if let (Some(x), Some(y)) = (a.numeric_at(idx), b.numeric_at(idx)) {
            xs.push(x);
            ys.push(y);
        }
    }

    let n = xs.len();
    if n < 2 {
        return None;
    }

    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataframe::{DataFrame, NullMask};
    use crate::loader::CsvReader;

    const EPS: f64 = 1e-10;

    fn frame(columns: Vec<(&str, Vec<f64>)>) -> DataFrame {
        let mut df = DataFrame::new();
        for (name, values) in columns {
            let n = values.len();
            df.add_column(name.to_string(), Column::numeric(values, NullMask::none(n)))
                .unwrap();
        }
        df
    }

    // ── Matrix shape and symmetry ────────────────────────────────

    #[test]
    fn perfect_positive_and_negative() {
        let df = frame(vec![
            ("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            ("y", vec![2.0, 4.0, 6.0, 8.0, 10.0]),
            ("z", vec![5.0, 4.0, 3.0, 2.0, 1.0]),
        ]);
        let m = correlation_matrix(&df);

        assert_eq!(m.size(), 3);
        assert!((m.get(0, 1).unwrap() - 1.0).abs() < EPS);
        assert!((m.get(0, 2).unwrap() + 1.0).abs() < EPS);
        assert_eq!(m.get(0, 0), Some(1.0));
    }

    #[test]
    fn matrix_is_symmetric() {
        let df = frame(vec![
            ("a", vec![1.0, 3.0, 2.0, 5.0]),
            ("b", vec![2.0, 1.0, 4.0, 3.0]),
            ("c", vec![0.5, 2.5, 1.5, 3.5]),
        ]);
        let m = correlation_matrix(&df);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
    }

    // ── Empty state ──────────────────────────────────────────────

    #[test]
    fn fewer_than_two_numeric_columns_is_empty() {
        let df = frame(vec![("only", vec![1.0, 2.0, 3.0])]);
        let m = correlation_matrix(&df);
        assert!(m.is_empty());
        assert_eq!(m.size(), 0);
        assert_eq!(m.get(0, 0), None);
    }

    #[test]
    fn categorical_columns_are_excluded() {
        let csv = "x,label,y\n1.0,a,2.0\n2.0,b,4.0\n3.0,c,6.0\n";
        let df = CsvReader::new().read_str(csv).unwrap();
        let m = correlation_matrix(&df);
        assert_eq!(m.size(), 2);
        assert_eq!(m.names(), &["x", "y"]);
    }

    #[test]
    fn zero_numeric_columns_is_empty() {
        let csv = "a,b\nx,p\ny,q\n";
        let df = CsvReader::new().read_str(csv).unwrap();
        assert!(correlation_matrix(&df).is_empty());
    }

    // ── Undefined cells ──────────────────────────────────────────

    #[test]
    fn zero_variance_column_keeps_slot_with_undefined_cells() {
        let df = frame(vec![
            ("x", vec![1.0, 2.0, 3.0]),
            ("flat", vec![4.0, 4.0, 4.0]),
        ]);
        let m = correlation_matrix(&df);

        // Shape keeps the degenerate column
        assert_eq!(m.size(), 2);
        assert_eq!(m.names(), &["x", "flat"]);
        // Every cell touching the flat column is undefined, its own
        // diagonal included
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(1, 0), None);
        assert_eq!(m.get(1, 1), None);
        // The healthy column is untouched
        assert_eq!(m.get(0, 0), Some(1.0));
    }

    #[test]
    fn pairwise_complete_rows_only() {
        let mut df = DataFrame::new();
        let mut nulls = NullMask::none(5);
        nulls.set_null(4);
        df.add_column(
            "x".into(),
            Column::numeric(vec![1.0, 2.0, 3.0, 4.0, 100.0], nulls),
        )
        .unwrap();
        df.add_column(
            "y".into(),
            Column::numeric(vec![2.0, 4.0, 6.0, 8.0, 0.0], NullMask::none(5)),
        )
        .unwrap();

        // Row 4 is excluded (x missing), so the remaining pairs are
        // perfectly linear
        let m = correlation_matrix(&df);
        assert!((m.get(0, 1).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn insufficient_pairs_is_undefined() {
        let mut df = DataFrame::new();
        let mut ax = NullMask::none(3);
        ax.set_null(1);
        ax.set_null(2);
        let mut by = NullMask::none(3);
        by.set_null(0);
        df.add_column("x".into(), Column::numeric(vec![1.0, 0.0, 0.0], ax))
            .unwrap();
        df.add_column("y".into(), Column::numeric(vec![0.0, 2.0, 3.0], by))
            .unwrap();

        // No row has both values present
        let m = correlation_matrix(&df);
        assert_eq!(m.get(0, 1), None);
    }

    #[test]
    fn coefficient_stays_in_unit_range() {
        let df = frame(vec![
            ("a", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            ("b", vec![1.1, 1.9, 3.2, 3.8, 5.1, 5.9]),
        ]);
        let m = correlation_matrix(&df);
        let r = m.get(0, 1).unwrap();
        assert!((-1.0..=1.0).contains(&r));
        assert!(r > 0.99);
    }
}
