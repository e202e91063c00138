//! Chart artifacts rendered from an [`AnalysisResult`].
//!
//! Two artifacts, written as standalone SVG files into the output
//! directory:
//!
//! - `correlation_heatmap.svg` — cell grid over the correlation
//!   matrix with a diverging blue→white→red scale; undefined cells
//!   are grey and labeled `n/a`. Skipped when the matrix is empty.
//! - `outliers_bar.svg` — one bar per numeric column. Skipped when no
//!   outliers were flagged at all.
//!
//! The renderer consumes `AnalysisResult` fields by name and performs
//! no computation of its own beyond layout; the same result always
//! produces byte-identical files.

use std::fs;
use std::path::Path;

use log::debug;

use crate::analysis::AnalysisResult;
use crate::correlate::CorrelationMatrix;
use crate::error::TablensError;
use crate::outlier::OutlierReport;

/// Heatmap artifact file name.
pub const HEATMAP_FILE: &str = "correlation_heatmap.svg";

/// Outlier bar chart artifact file name.
pub const OUTLIER_FILE: &str = "outliers_bar.svg";

const CELL: usize = 56;
const HEATMAP_LEFT: usize = 130;
const HEATMAP_TOP: usize = 120;

const BAR_WIDTH: usize = 48;
const BAR_GAP: usize = 16;
const BAR_PLOT_HEIGHT: usize = 180;

/// A chart artifact written to disk, referenced by the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFile {
    /// Human-readable chart title.
    pub title: String,
    /// File name relative to the output directory.
    pub file_name: String,
}

/// Renders all applicable charts into `out_dir` (created if absent)
/// and returns the artifacts actually written.
pub fn render_charts(
    result: &AnalysisResult,
    out_dir: &Path,
) -> Result<Vec<ChartFile>, TablensError> {
    fs::create_dir_all(out_dir)?;
    let mut files = Vec::new();

    if let Some(svg) = heatmap_svg(&result.correlation) {
        fs::write(out_dir.join(HEATMAP_FILE), svg)?;
        files.push(ChartFile {
            title: "Correlation Heatmap".to_string(),
            file_name: HEATMAP_FILE.to_string(),
        });
    }

    if let Some(svg) = outlier_bars_svg(&result.outliers) {
        fs::write(out_dir.join(OUTLIER_FILE), svg)?;
        files.push(ChartFile {
            title: "Outliers Count by Column".to_string(),
            file_name: OUTLIER_FILE.to_string(),
        });
    }

    debug!("rendered {} chart artifact(s) in {}", files.len(), out_dir.display());
    Ok(files)
}

// ── Heatmap ───────────────────────────────────────────────────────────

/// Builds the correlation heatmap SVG, or `None` for an empty matrix.
pub fn heatmap_svg(matrix: &CorrelationMatrix) -> Option<String> {
    let names = matrix.names();
    if matrix.is_empty() || names.is_empty() {
        return None;
    }
    let n = names.len();
    let width = HEATMAP_LEFT + n * CELL + 20;
    let height = HEATMAP_TOP + n * CELL + 20;

    let mut svg = svg_open(width, height);
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"28\" font-size=\"18\" font-family=\"sans-serif\" text-anchor=\"middle\">Correlation Heatmap</text>\n",
        width / 2
    ));

    // Column labels, rotated above the grid
    for (j, name) in names.iter().enumerate() {
        let x = HEATMAP_LEFT + j * CELL + CELL / 2;
        let y = HEATMAP_TOP - 8;
        svg.push_str(&format!(
            "  <text x=\"{x}\" y=\"{y}\" font-size=\"12\" font-family=\"sans-serif\" text-anchor=\"start\" transform=\"rotate(-45 {x} {y})\">{}</text>\n",
            xml_escape(name)
        ));
    }

    for (i, name) in names.iter().enumerate() {
        // Row label
        let label_y = HEATMAP_TOP + i * CELL + CELL / 2 + 4;
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{label_y}\" font-size=\"12\" font-family=\"sans-serif\" text-anchor=\"end\">{}</text>\n",
            HEATMAP_LEFT - 8,
            xml_escape(name)
        ));

        for j in 0..n {
            let x = HEATMAP_LEFT + j * CELL;
            let y = HEATMAP_TOP + i * CELL;
            let (fill, label, label_color) = match matrix.get(i, j) {
                Some(r) => {
                    let color = if r.abs() > 0.6 { "#ffffff" } else { "#1f1f1f" };
                    (diverging_color(r), format!("{r:.2}"), color)
                }
                None => ("#e0e0e0".to_string(), "n/a".to_string(), "#1f1f1f"),
            };
            svg.push_str(&format!(
                "  <rect x=\"{x}\" y=\"{y}\" width=\"{CELL}\" height=\"{CELL}\" fill=\"{fill}\" stroke=\"#ffffff\"/>\n"
            ));
            svg.push_str(&format!(
                "  <text x=\"{}\" y=\"{}\" font-size=\"12\" font-family=\"sans-serif\" text-anchor=\"middle\" fill=\"{label_color}\">{label}</text>\n",
                x + CELL / 2,
                y + CELL / 2 + 4
            ));
        }
    }

    svg.push_str("</svg>\n");
    Some(svg)
}

/// Maps a coefficient in [-1, 1] onto a diverging blue→white→red
/// scale.
fn diverging_color(r: f64) -> String {
    let t = r.clamp(-1.0, 1.0);
    let (from, to, f) = if t < 0.0 {
        // -1 → deep blue, 0 → white
        ((59u8, 76u8, 192u8), (255u8, 255u8, 255u8), t + 1.0)
    } else {
        // 0 → white, 1 → deep red
        ((255u8, 255u8, 255u8), (180u8, 4u8, 38u8), t)
    };
    let lerp = |a: u8, b: u8| -> u8 {
        (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8
    };
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(from.0, to.0),
        lerp(from.1, to.1),
        lerp(from.2, to.2)
    )
}

// ── Outlier bars ──────────────────────────────────────────────────────

/// Builds the outlier bar chart SVG, or `None` when the report is
/// empty or flags nothing.
pub fn outlier_bars_svg(report: &OutlierReport) -> Option<String> {
    if report.counts.is_empty() || report.total() == 0 {
        return None;
    }
    let n = report.counts.len();
    let left = 40;
    let top = 48;
    let baseline = top + BAR_PLOT_HEIGHT;
    let width = left + n * (BAR_WIDTH + BAR_GAP) + 20;
    let height = baseline + 80;

    let max_count = report
        .counts
        .iter()
        .map(|c| c.count)
        .max()
        .unwrap_or(1)
        .max(1);

    let mut svg = svg_open(width, height);
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"28\" font-size=\"18\" font-family=\"sans-serif\" text-anchor=\"middle\">Outliers Count by Column</text>\n",
        width / 2
    ));

    for (idx, col) in report.counts.iter().enumerate() {
        let bar_h = col.count * BAR_PLOT_HEIGHT / max_count;
        let x = left + idx * (BAR_WIDTH + BAR_GAP);
        let y = baseline - bar_h;
        svg.push_str(&format!(
            "  <rect x=\"{x}\" y=\"{y}\" width=\"{BAR_WIDTH}\" height=\"{bar_h}\" fill=\"#008080\"/>\n"
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" font-family=\"sans-serif\" text-anchor=\"middle\">{}</text>\n",
            x + BAR_WIDTH / 2,
            y.saturating_sub(6),
            col.count
        ));
        let label_x = x + BAR_WIDTH / 2;
        let label_y = baseline + 16;
        svg.push_str(&format!(
            "  <text x=\"{label_x}\" y=\"{label_y}\" font-size=\"12\" font-family=\"sans-serif\" text-anchor=\"end\" transform=\"rotate(-35 {label_x} {label_y})\">{}</text>\n",
            xml_escape(&col.column)
        ));
    }

    // Baseline axis
    svg.push_str(&format!(
        "  <line x1=\"{left}\" y1=\"{baseline}\" x2=\"{}\" y2=\"{baseline}\" stroke=\"#1f1f1f\"/>\n",
        left + n * (BAR_WIDTH + BAR_GAP)
    ));

    svg.push_str("</svg>\n");
    Some(svg)
}

// ── SVG helpers ───────────────────────────────────────────────────────

fn svg_open(width: usize, height: usize) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
    )
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::loader::CsvReader;
    use crate::outlier::{ColumnOutliers, OutlierMethod};

    fn sample_result() -> AnalysisResult {
        let csv = "\
x,y,label
1.0,2.0,a
2.0,4.0,b
3.0,6.1,a
4.0,8.0,b
5.0,9.9,a
100.0,2.0,b
";
        let df = CsvReader::new().read_str(csv).unwrap();
        analyze(&df, OutlierMethod::Iqr).unwrap()
    }

    // ── Heatmap ──────────────────────────────────────────────────

    #[test]
    fn heatmap_has_cell_per_pair() {
        let result = sample_result();
        let svg = heatmap_svg(&result.correlation).unwrap();
        assert!(svg.starts_with("<svg"));
        // 2 numeric columns → 4 cells
        assert_eq!(svg.matches("<rect").count(), 4);
        assert!(svg.contains("Correlation Heatmap"));
    }

    #[test]
    fn heatmap_skipped_for_empty_matrix() {
        assert_eq!(heatmap_svg(&CorrelationMatrix::Empty), None);
    }

    #[test]
    fn heatmap_marks_undefined_cells() {
        let csv = "x,flat\n1.0,4.0\n2.0,4.0\n3.0,4.0\n";
        let df = CsvReader::new().read_str(csv).unwrap();
        let result = analyze(&df, OutlierMethod::Iqr).unwrap();
        let svg = heatmap_svg(&result.correlation).unwrap();
        assert!(svg.contains("n/a"));
        assert!(svg.contains("#e0e0e0"));
    }

    #[test]
    fn diverging_scale_endpoints() {
        assert_eq!(diverging_color(1.0), "#b40426");
        assert_eq!(diverging_color(-1.0), "#3b4cc0");
        assert_eq!(diverging_color(0.0), "#ffffff");
    }

    // ── Outlier bars ─────────────────────────────────────────────

    #[test]
    fn bars_rendered_per_numeric_column() {
        let result = sample_result();
        assert!(result.outliers.total() > 0);
        let svg = outlier_bars_svg(&result.outliers).unwrap();
        assert_eq!(svg.matches("<rect").count(), result.outliers.counts.len());
    }

    #[test]
    fn bars_skipped_when_nothing_flagged() {
        let report = OutlierReport {
            method: OutlierMethod::Iqr,
            counts: vec![ColumnOutliers {
                column: "x".into(),
                count: 0,
            }],
        };
        assert_eq!(outlier_bars_svg(&report), None);
    }

    #[test]
    fn column_names_are_escaped() {
        let report = OutlierReport {
            method: OutlierMethod::Iqr,
            counts: vec![ColumnOutliers {
                column: "a<b".into(),
                count: 2,
            }],
        };
        let svg = outlier_bars_svg(&report).unwrap();
        assert!(svg.contains("a&lt;b"));
        assert!(!svg.contains("a<b"));
    }

    // ── File output ──────────────────────────────────────────────

    #[test]
    fn render_charts_writes_artifacts() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let files = render_charts(&result, dir.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(dir.path().join(HEATMAP_FILE).exists());
        assert!(dir.path().join(OUTLIER_FILE).exists());
    }

    #[test]
    fn render_charts_creates_output_dir() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("out");
        render_charts(&result, &nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn no_artifacts_for_categorical_only_data() {
        let csv = "a,b\nx,p\ny,q\n";
        let df = CsvReader::new().read_str(csv).unwrap();
        let result = analyze(&df, OutlierMethod::Iqr).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let files = render_charts(&result, dir.path()).unwrap();
        assert!(files.is_empty());
        assert!(!dir.path().join(HEATMAP_FILE).exists());
    }
}
