use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;

use tablens::analysis::analyze;
use tablens::chart::render_charts;
use tablens::loader::CsvReader;
use tablens::narrative::{self, NarrativeConfig, FALLBACK_NARRATIVE};
use tablens::outlier::OutlierMethod;
use tablens::report::render_report;

#[derive(Parser, Debug)]
#[command(name = "tablens")]
#[command(about = "Statistical profiling and report generation for tabular datasets")]
#[command(version)]
struct Cli {
    /// CSV file to analyze
    input: PathBuf,

    /// Output directory for the report and chart artifacts
    #[arg(long, default_value = "analysis_output")]
    out_dir: PathBuf,

    /// Outlier-detection method (modified-z-score or iqr)
    #[arg(long, default_value = "modified-z-score", value_parser = OutlierMethod::from_str)]
    method: OutlierMethod,

    /// Skip narrative generation and use the placeholder text
    #[arg(long)]
    no_narrative: bool,

    /// Also write the analysis result as analysis.json
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let df = CsvReader::new()
        .read_path(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    let result = analyze(&df, cli.method)
        .with_context(|| format!("analysis of {} failed", cli.input.display()))?;

    let charts = render_charts(&result, &cli.out_dir)
        .context("failed to render chart artifacts")?;

    let narrative = if cli.no_narrative {
        FALLBACK_NARRATIVE.to_string()
    } else {
        narrative::generate(&result, &NarrativeConfig::default())
    };

    let report_path = render_report(&result, &charts, &narrative, &cli.out_dir)
        .context("failed to write report")?;

    if cli.json {
        let json_path = cli.out_dir.join("analysis.json");
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&json_path, json)
            .with_context(|| format!("failed to write {}", json_path.display()))?;
    }

    println!("Analysis completed. Report saved at: {}", report_path.display());
    Ok(())
}
