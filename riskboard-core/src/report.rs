//! Reporting and output generation
//!
//! Global invariants enforced:
//! - Deterministic output ordering (resolver order, never re-sorted)
//! - Byte-for-byte identical output across runs for identical input

use crate::classify::{classify_risk_with_thresholds, RiskBin};
use crate::config::ResolvedConfig;
use crate::distribution::{reconstruct, DensityPoint};
use crate::project::{project, ChartProjections};
use crate::record::RiskRecord;
use crate::resolve::{contribution_total, resolve, FeatureContribution};
use serde::Serialize;

/// Complete decomposition view model for one record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DecompositionReport {
    pub article_number: u32,
    pub name: String,
    pub status: String,
    pub base_risk: f64,
    pub final_risk: f64,
    pub bin: String,
    pub bin_color: String,
    pub contribution_total: f64,
    /// `final_risk - (base_risk + contribution_total)`; non-zero values are
    /// surfaced, never corrected
    pub residual: f64,
    pub contributions: Vec<FeatureContribution>,
    pub charts: ChartProjections,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<Vec<DensityPoint>>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub recommendation: String,
}

/// Build the full decomposition report for a record
pub fn build_report(record: &RiskRecord, config: &ResolvedConfig) -> DecompositionReport {
    let contributions = resolve(record);
    let charts = project(
        &contributions,
        record.base_risk,
        record.final_risk,
        &config.palette,
        config.radar_max,
    );
    let curve = record.components.feature_4_confidence.as_ref().map(|mc| {
        reconstruct(
            mc.mean,
            mc.std_dev,
            mc.confidence_interval_95,
            config.curve_resolution,
        )
    });
    let bin = classify_risk_with_thresholds(record.final_risk, &config.thresholds);

    DecompositionReport {
        article_number: record.article_number,
        name: record.name.clone(),
        status: record.status.as_str().to_string(),
        base_risk: record.base_risk,
        final_risk: record.final_risk,
        bin: bin.as_str().to_string(),
        bin_color: bin.color().to_string(),
        contribution_total: contribution_total(&contributions),
        residual: record.consistency_gap(),
        contributions,
        charts,
        curve,
        recommendation: record.recommendation.clone(),
    }
}

impl DecompositionReport {
    /// Bin parsed back from the stored string (display helpers)
    pub fn risk_bin(&self) -> RiskBin {
        match self.bin.as_str() {
            "CRITICAL" => RiskBin::Critical,
            "HIGH" => RiskBin::High,
            "WARNING" => RiskBin::Warning,
            _ => RiskBin::Success,
        }
    }
}

/// Render reports as text output
pub fn render_text(reports: &[DecompositionReport], explain: bool) -> String {
    let mut output = String::new();

    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!(
            "Article {} - {}  [{}]  risk {:.1}/100 ({})\n",
            report.article_number, report.name, report.status, report.final_risk, report.bin
        ));
        output.push_str(&format!(
            "{:<4} {:<26} {:>8} {:>12}\n",
            "ID", "FEATURE", "DELTA", "CUMULATIVE"
        ));
        output.push_str(&format!(
            "{:<4} {:<26} {:>8} {:>12}\n",
            "--", "Base Risk", format!("{:.1}", report.base_risk), format!("{:.1}", report.base_risk)
        ));
        for c in &report.contributions {
            output.push_str(&format!(
                "{:<4} {:<26} {:>8} {:>12}\n",
                c.id,
                truncate_or_pad(c.display_name, 26),
                format!("{:+.1}", c.risk_delta),
                format!("{:.1}", c.cumulative_risk),
            ));
            if explain {
                output.push_str(&format!("     {}\n", c.rationale));
            }
        }
        output.push_str(&format!(
            "{:<4} {:<26} {:>8} {:>12}\n",
            "--", "Final", "", format!("{:.1}", report.final_risk)
        ));
        if report.residual.abs() > 1e-6 {
            output.push_str(&format!(
                "note: final risk differs from accumulated total by {:+.1}\n",
                report.residual
            ));
        }
    }

    output
}

/// Render reports as JSON output
pub fn render_json(reports: &[DecompositionReport]) -> String {
    serde_json::to_string_pretty(reports).unwrap_or_else(|_| "[]".to_string())
}

/// Truncate or pad string to fixed width (char-count based)
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
