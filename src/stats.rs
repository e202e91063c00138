//! Scalar statistics over `f64` slices.
//!
//! The building blocks used by the profiling, correlation, and
//! outlier-detection engines: mean, sample variance and standard
//! deviation (ddof = 1), linear-interpolation quantiles, median, and
//! median absolute deviation (MAD).
//!
//! All functions return `Option` — `None` means the statistic is not
//! computable for the given input (empty slice, or fewer than two
//! values for sample variance). Callers propagate that as an explicit
//! "undefined" state instead of letting NaN leak into results.
//!
//! # Example
//!
//! ```
//! use tablens::stats;
//!
//! let data = [1.0, 2.0, 3.0, 4.0];
//! assert_eq!(stats::mean(&data), Some(2.5));
//! assert_eq!(stats::quantile(&data, 0.5), Some(2.5));
//! assert_eq!(stats::mean(&[]), None);
//! ```

// ── Central tendency ──────────────────────────────────────────────────

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (50th percentile, averaging the two middle values for even
/// lengths). `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

// ── Dispersion ────────────────────────────────────────────────────────

/// Sample variance (ddof = 1). `None` for fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(sum_sq / (n - 1) as f64)
}

/// Sample standard deviation (ddof = 1). `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Median absolute deviation: median(|x - median(x)|).
///
/// MAD is the robust scale estimator behind the modified Z-score; it
/// stays finite under up to 50% extreme values. `None` for an empty
/// slice. A constant slice yields `Some(0.0)`.
pub fn mad(values: &[f64]) -> Option<f64> {
    let m = median(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - m).abs()).collect();
    median(&deviations)
}

// ── Order statistics ──────────────────────────────────────────────────

/// Minimum value. `None` for an empty slice.
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().min_by(f64::total_cmp)
}

/// Maximum value. `None` for an empty slice.
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().max_by(f64::total_cmp)
}

/// Quantile with linear interpolation between order statistics.
///
/// For a sorted sample of n values, quantile `q` sits at rank
/// `q * (n - 1)`; fractional ranks interpolate linearly between the
/// two neighboring values. `None` for an empty slice or `q` outside
/// `[0, 1]`.
///
/// ```
/// use tablens::stats::quantile;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 100.0];
/// assert_eq!(quantile(&data, 0.25), Some(2.0));
/// assert_eq!(quantile(&data, 0.5), Some(3.0));
/// assert_eq!(quantile(&data, 1.0), Some(100.0));
/// ```
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let frac = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

// ── Tests ─────────────────────────────────────────────────────────────
