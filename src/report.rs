//! Markdown report assembly.
//!
//! Renders the analysis result into `Analysis_Report.md` inside the
//! output directory: dataset insights, a summary-statistics table over
//! the numeric columns, a missing-values table over all columns, the
//! outlier counts with the active method, references to the chart
//! artifacts that were actually rendered, and the narrative appended
//! last. Undefined statistics print as `n/a` — they are sentinels, not
//! numbers, and must not render as NaN.
//!
//! The renderer consumes [`AnalysisResult`] fields by name and adds no
//! analysis of its own.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::analysis::AnalysisResult;
use crate::chart::ChartFile;
use crate::error::TablensError;

/// Report file name inside the output directory.
pub const REPORT_FILE: &str = "Analysis_Report.md";

/// Renders the Markdown report and writes it into `out_dir` (created
/// if absent). Returns the report path.
pub fn render_report(
    result: &AnalysisResult,
    charts: &[ChartFile],
    narrative: &str,
    out_dir: &Path,
) -> Result<PathBuf, TablensError> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(REPORT_FILE);
    fs::write(&path, report_markdown(result, charts, narrative))?;
    info!("report written to {}", path.display());
    Ok(path)
}

/// Builds the full report as a Markdown string.
pub fn report_markdown(
    result: &AnalysisResult,
    charts: &[ChartFile],
    narrative: &str,
) -> String {
    let mut md = String::from("# Automated Dataset Analysis\n\n");

    // ── Insights ─────────────────────────────────────────────────
    let insights = &result.insights;
    md.push_str("## Dataset Insights\n");
    md.push_str(&format!("- **Total Rows:** {}\n", insights.row_count));
    md.push_str(&format!("- **Total Columns:** {}\n", insights.column_count));
    md.push_str(&format!(
        "- **Numeric Columns:** {}\n",
        insights.numeric_columns
    ));
    md.push_str(&format!(
        "- **Categorical Columns:** {}\n",
        insights.categorical_columns
    ));
    md.push_str(&format!(
        "- **Missing Values:** {}\n\n",
        insights.missing_values
    ));

    // ── Summary statistics ───────────────────────────────────────
    md.push_str("## Summary Statistics\n");
    let numeric_profiles: Vec<_> = result
        .profiles
        .iter()
        .filter(|p| p.kind.is_numeric())
        .collect();
    if numeric_profiles.is_empty() {
        md.push_str("No numeric columns.\n\n");
    } else {
        md.push_str("| Column | Count | Mean | Std | Min | P25 | P50 | P75 | Max |\n");
        md.push_str("|---|---|---|---|---|---|---|---|---|\n");
        for profile in &numeric_profiles {
            match &profile.summary {
                Some(s) => {
                    md.push_str(&format!(
                        "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                        profile.name,
                        s.count,
                        fmt_num(s.mean),
                        s.std.map(fmt_num).unwrap_or_else(|| "n/a".to_string()),
                        fmt_num(s.min),
                        fmt_num(s.p25),
                        fmt_num(s.p50),
                        fmt_num(s.p75),
                        fmt_num(s.max),
                    ));
                }
                None => {
                    md.push_str(&format!(
                        "| {} | 0 | n/a | n/a | n/a | n/a | n/a | n/a | n/a |\n",
                        profile.name
                    ));
                }
            }
        }
        md.push('\n');
    }

    // ── Missing values ───────────────────────────────────────────
    md.push_str("## Missing Values\n");
    md.push_str("| Column | Kind | Missing |\n");
    md.push_str("|---|---|---|\n");
    for profile in &result.profiles {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            profile.name, profile.kind, profile.missing_count
        ));
    }
    md.push('\n');

    // ── Outliers ─────────────────────────────────────────────────
    md.push_str("## Outliers\n");
    md.push_str(&format!(
        "Detection method: `{}`\n\n",
        result.outliers.method
    ));
    if result.outliers.counts.is_empty() {
        md.push_str("No numeric columns to scan.\n\n");
    } else {
        md.push_str("| Column | Outliers |\n");
        md.push_str("|---|---|\n");
        for col in &result.outliers.counts {
            md.push_str(&format!("| {} | {} |\n", col.column, col.count));
        }
        md.push('\n');
    }

    // ── Visualizations ───────────────────────────────────────────
    md.push_str("## Visualizations\n");
    if charts.is_empty() {
        md.push_str("No charts were rendered for this dataset.\n");
    } else {
        for chart in charts {
            md.push_str(&format!("### {}\n", chart.title));
            md.push_str(&format!("![{}]({})\n", chart.title, chart.file_name));
        }
    }
    md.push('\n');

    // ── Narrative ────────────────────────────────────────────────
    md.push_str("## Generated Narrative\n");
    md.push_str(narrative);
    md.push('\n');

    md
}

fn fmt_num(v: f64) -> String {
    format!("{v:.4}")
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::loader::CsvReader;
    use crate::narrative::FALLBACK_NARRATIVE;
    use crate::outlier::OutlierMethod;

    fn sample_result() -> AnalysisResult {
        let csv = "\
age,city,score
23,Oslo,7.1
35,Lima,6.4
29,Oslo,NA
41,Kyiv,5.5
";
        let df = CsvReader::new().read_str(csv).unwrap();
        analyze(&df, OutlierMethod::ModifiedZScore).unwrap()
    }

    // ── Content ──────────────────────────────────────────────────

    #[test]
    fn report_has_all_sections() {
        let md = report_markdown(&sample_result(), &[], FALLBACK_NARRATIVE);
        for section in [
            "# Automated Dataset Analysis",
            "## Dataset Insights",
            "## Summary Statistics",
            "## Missing Values",
            "## Outliers",
            "## Visualizations",
            "## Generated Narrative",
        ] {
            assert!(md.contains(section), "missing section: {section}");
        }
    }

    #[test]
    fn summary_row_per_numeric_column() {
        let result = sample_result();
        let md = report_markdown(&result, &[], "");
        // age and score get summary rows; city does not
        assert!(md.contains("| age | 4 |"));
        assert!(md.contains("| score | 3 |"));
        let summary = md
            .split("## Missing Values")
            .next()
            .unwrap()
            .to_string();
        assert!(!summary.contains("| city |"));
    }

    #[test]
    fn missing_values_row_per_column() {
        let md = report_markdown(&sample_result(), &[], "");
        assert!(md.contains("| age | numeric | 0 |"));
        assert!(md.contains("| city | categorical | 0 |"));
        assert!(md.contains("| score | numeric | 1 |"));
    }

    #[test]
    fn undefined_statistics_render_as_na() {
        let csv = "x,y\nNA,1.0\nNA,2.0\nNA,3.0\n";
        let df = CsvReader::new().read_str(csv).unwrap();
        let result = analyze(&df, OutlierMethod::Iqr).unwrap();
        let md = report_markdown(&result, &[], "");
        assert!(md.contains("| x | 0 | n/a |"));
        assert!(!md.contains("NaN"));
    }

    #[test]
    fn method_is_documented() {
        let md = report_markdown(&sample_result(), &[], "");
        assert!(md.contains("Detection method: `modified-z-score`"));
    }

    #[test]
    fn charts_referenced_when_present() {
        let charts = vec![ChartFile {
            title: "Correlation Heatmap".into(),
            file_name: "correlation_heatmap.svg".into(),
        }];
        let md = report_markdown(&sample_result(), &charts, "");
        assert!(md.contains("![Correlation Heatmap](correlation_heatmap.svg)"));
    }

    #[test]
    fn narrative_appended_last() {
        let md = report_markdown(&sample_result(), &[], "Story about the data.");
        let idx = md.find("## Generated Narrative").unwrap();
        assert!(md[idx..].contains("Story about the data."));
    }

    // ── File output ──────────────────────────────────────────────

    #[test]
    fn render_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = render_report(&sample_result(), &[], FALLBACK_NARRATIVE, dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join(REPORT_FILE));
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains(FALLBACK_NARRATIVE));
    }
}
