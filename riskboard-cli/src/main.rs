//! Riskboard CLI - renders precomputed risk records as decomposition reports

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use riskboard_core::bottleneck::BottleneckItem;
use riskboard_core::classify::{classify_risk_with_thresholds, gauge_geometry};
use riskboard_core::config;
use riskboard_core::distribution::reconstruct;
use riskboard_core::record::{MonteCarloSummary, RiskRecord};
use riskboard_core::report::{build_report, render_json, render_text, DecompositionReport};
use riskboard_core::summary::summarize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "riskboard")]
#[command(about = "Decompose precomputed risk records into explained, chart-ready reports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decompose one record or a record array into reports
    Decompose {
        /// Path to a JSON file holding a record or an array of records
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Include per-feature rationale lines (text format only)
        #[arg(long)]
        explain: bool,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file path (default: stdout; HTML defaults to riskboard-report.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Summarize a record array (counts, average risk, highest)
    Summary {
        /// Path to a JSON file holding an array of records
        path: PathBuf,
    },
    /// Reconstruct a density curve from Monte Carlo summary statistics
    Distribution {
        #[arg(long)]
        mean: f64,

        #[arg(long)]
        std_dev: f64,

        /// Lower bound of the 95% confidence interval
        #[arg(long)]
        low: f64,

        /// Upper bound of the 95% confidence interval
        #[arg(long)]
        high: f64,

        /// Number of curve samples
        #[arg(long, default_value = "51")]
        resolution: usize,
    },
    /// Classify a risk score and compute gauge geometry
    Gauge {
        /// Risk score (clamped to 0-100)
        score: f64,

        /// Gauge size in pixels
        #[arg(long, default_value = "120")]
        size: f64,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Render backend-classified bottleneck items as a styled table
    Bottlenecks {
        /// Path to a JSON file holding an array of bottleneck items
        path: PathBuf,
    },
    /// Validate a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without producing output
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Html,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decompose {
            path,
            format,
            explain,
            config: config_path,
            output,
        } => run_decompose(&path, format, explain, config_path.as_deref(), output),
        Commands::Summary { path } => run_summary(&path),
        Commands::Distribution {
            mean,
            std_dev,
            low,
            high,
            resolution,
        } => run_distribution(mean, std_dev, low, high, resolution),
        Commands::Gauge {
            score,
            size,
            config: config_path,
        } => run_gauge(score, size, config_path.as_deref()),
        Commands::Bottlenecks { path } => run_bottlenecks(&path),
        Commands::Config { action } => run_config(action),
    }
}

fn run_decompose(
    path: &Path,
    format: OutputFormat,
    explain: bool,
    config_path: Option<&Path>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let resolved = load_config(config_path)?;
    let records = read_records(path)?;
    if records.is_empty() {
        anyhow::bail!("No records found in {}", path.display());
    }

    // Records decompose independently; order is preserved by collect
    let reports: Vec<DecompositionReport> = records
        .par_iter()
        .map(|record| build_report(record, &resolved))
        .collect();

    let rendered = match format {
        OutputFormat::Text => render_text(&reports, explain),
        OutputFormat::Json => render_json(&reports),
        OutputFormat::Html => riskboard_core::render_html(&reports[0], &[]),
    };

    if format == OutputFormat::Html && reports.len() > 1 {
        eprintln!(
            "warning: HTML output renders the first record only ({} supplied)",
            reports.len()
        );
    }

    match output {
        Some(out_path) => {
            std::fs::write(&out_path, rendered)
                .with_context(|| format!("Failed to write output: {}", out_path.display()))?;
            eprintln!("Report written to {}", out_path.display());
        }
        None => {
            if format == OutputFormat::Html {
                let out_path = PathBuf::from("riskboard-report.html");
                std::fs::write(&out_path, rendered)
                    .with_context(|| format!("Failed to write output: {}", out_path.display()))?;
                eprintln!("Report written to {}", out_path.display());
            } else {
                print!("{}", rendered);
            }
        }
    }

    Ok(())
}

fn run_summary(path: &Path) -> anyhow::Result<()> {
    let records = read_records(path)?;
    let summary = summarize(&records);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_distribution(
    mean: f64,
    std_dev: f64,
    low: f64,
    high: f64,
    resolution: usize,
) -> anyhow::Result<()> {
    // Reject malformed statistics at the boundary; the core assumes them valid
    let stats = MonteCarloSummary {
        mean,
        std_dev,
        confidence_interval_95: [low, high],
        trials: 1,
        risk_contribution: 0.0,
    };
    stats.validate()?;

    let curve = reconstruct(mean, std_dev, [low, high], resolution);
    println!("{}", serde_json::to_string_pretty(&curve)?);
    Ok(())
}

fn run_gauge(score: f64, size: f64, config_path: Option<&Path>) -> anyhow::Result<()> {
    let resolved = load_config(config_path)?;
    // The core's gauge contract is 0-100; clamp user input here
    let score = score.clamp(0.0, 100.0);
    let bin = classify_risk_with_thresholds(score, &resolved.thresholds);
    let geometry = gauge_geometry(score, size);
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "score": score,
            "bin": bin.as_str(),
            "color": bin.color(),
            "geometry": geometry,
        }))?
    );
    Ok(())
}

fn run_bottlenecks(path: &Path) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let items: Vec<BottleneckItem> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse bottleneck items: {}", path.display()))?;

    println!(
        "{:<3} {:<10} {:<14} {:<32} {}",
        "", "SEVERITY", "CATEGORY", "NAME", "IMPACT"
    );
    for item in &items {
        println!(
            "{:<3} {:<10} {:<14} {:<32} {}",
            item.icon(),
            item.severity.as_str(),
            item.category.as_str(),
            item.name,
            item.impact,
        );
    }
    Ok(())
}

fn run_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Validate { path } => {
            let resolved = load_config(path.as_deref())?;
            match resolved.config_path {
                Some(ref p) => println!("Config OK: {}", p.display()),
                None => println!("No config file found; defaults are in effect"),
            }
        }
        ConfigAction::Show { path } => {
            let resolved = load_config(path.as_deref())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "config_path": resolved.config_path.as_ref().map(|p| p.display().to_string()),
                    "palette": {
                        "neutral": resolved.palette.neutral,
                        "terminal": resolved.palette.terminal,
                        "cycle": resolved.palette.cycle,
                    },
                    "thresholds": {
                        "critical": resolved.thresholds.critical,
                        "high": resolved.thresholds.high,
                        "warning": resolved.thresholds.warning,
                    },
                    "radar_max": resolved.radar_max,
                    "curve_resolution": resolved.curve_resolution,
                }))?
            );
        }
    }
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<config::ResolvedConfig> {
    let cwd = std::env::current_dir()?;
    config::discover_config(explicit, &cwd)
}

/// Read a record or a record array, skipping entries that fail validation
fn read_records(path: &Path) -> anyhow::Result<Vec<RiskRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let parsed: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;

    let raw: Vec<serde_json::Value> = match parsed {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    let mut records = Vec::new();
    let mut skipped: usize = 0;
    for (i, value) in raw.into_iter().enumerate() {
        match serde_json::from_value::<RiskRecord>(value) {
            Ok(record) => match record.validate() {
                Ok(()) => records.push(record),
                Err(e) => {
                    eprintln!("warning: skipping record {}: {}", i, e);
                    skipped += 1;
                }
            },
            Err(e) => {
                eprintln!("warning: skipping record {}: {}", i, e);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        eprintln!("Skipped {} record(s) due to validation errors", skipped);
    }

    Ok(records)
}
