//! Backend wire model for precomputed risk records
//!
//! Everything here is deserialized from the backend collaborator and treated
//! as read-only. Validation is limited to boundary precondition checks; the
//! decomposition itself degrades gracefully on missing optional fields.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Backend-assigned display status for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    #[serde(rename = "NORMAL")]
    Normal,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "HIGH_RISK")]
    HighRisk,
    #[serde(rename = "CRITICAL BLOCKER")]
    CriticalBlocker,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Normal => "NORMAL",
            RecordStatus::Warning => "WARNING",
            RecordStatus::HighRisk => "HIGH_RISK",
            RecordStatus::CriticalBlocker => "CRITICAL BLOCKER",
        }
    }
}

/// One retrieved evidence document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    pub quote: String,
    #[serde(default)]
    pub relevance_score: f64,
}

/// One historical precedent case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Precedent {
    pub case_name: String,
    pub year: i32,
    /// Impact on a 0-5 scale
    #[serde(default)]
    pub impact_score: f64,
    pub relevance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Outcome of the simulated adversarial debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateResult {
    /// Fraction in [0, 1]
    pub vulnerability_score: f64,
    pub government_argument: String,
    pub court_argument: String,
    #[serde(default)]
    pub risk_contribution: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub debate_transcript: Vec<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mitigations: Vec<HashMap<String, String>>,
}

/// Monte Carlo summary statistics for slot 4
///
/// The sampling itself happens in the backend; only summary statistics cross
/// the wire. All fields default so a sparse payload still decomposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    #[serde(default)]
    pub mean: f64,
    #[serde(default)]
    pub std_dev: f64,
    #[serde(default)]
    pub confidence_interval_95: [f64; 2],
    #[serde(default = "default_trials")]
    pub trials: u64,
    #[serde(default)]
    pub risk_contribution: f64,
}

fn default_trials() -> u64 {
    1000
}

impl MonteCarloSummary {
    /// Boundary precondition check. Malformed statistics are rejected here
    /// so the reconstruction never sees them.
    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() || !self.std_dev.is_finite() {
            anyhow::bail!("monte carlo statistics must be finite");
        }
        if self.std_dev < 0.0 {
            anyhow::bail!("std_dev must be non-negative (got {})", self.std_dev);
        }
        let [low, high] = self.confidence_interval_95;
        if !(low <= self.mean && self.mean <= high) {
            anyhow::bail!(
                "confidence interval [{}, {}] must contain the mean {}",
                low,
                high,
                self.mean
            );
        }
        if self.trials < 1 {
            anyhow::bail!("trials must be at least 1");
        }
        Ok(())
    }
}

/// One interactive what-if toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleState {
    pub toggle_id: String,
    pub question: String,
    pub current_state: bool,
    #[serde(default)]
    pub impact_if_true: f64,
    #[serde(default)]
    pub impact_if_false: f64,
    #[serde(default)]
    pub description: String,
}

/// Parliamentary support snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliticalSupport {
    /// Percentage in [0, 100]
    pub current_support: f64,
    /// Percentage in [0, 100]
    pub required_support: f64,
    #[serde(default)]
    pub risk_contribution: f64,
}

/// Timeline feasibility assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineAssessment {
    pub months_needed: u32,
    pub months_available: u32,
    pub feasible: bool,
    #[serde(default)]
    pub risk_impact: f64,
    pub target_year: i32,
}

/// The eight fixed, independently optional feature slots
///
/// Wire names are the backend's; presence/absence is the only signal a slot
/// carries beyond its value. Slot 4 is structured, slot 8 is a rank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureComponents {
    #[serde(default)]
    pub base: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_1_debate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_2_rag: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_3_precedent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_4_confidence: Option<MonteCarloSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_5_explorer: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_6_political: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_7_timeline: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_8_priority: Option<u32>,
}

/// One precomputed risk record (wire name: article)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskRecord {
    pub article_number: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_risk: f64,
    pub final_risk: f64,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_rank: Option<u32>,
    pub components: FeatureComponents,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rag_evidence: Vec<Evidence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub precedents: Vec<Precedent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debate_result: Option<DebateResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub explorer_toggles: Vec<ToggleState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub political_support: Option<PoliticalSupport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineAssessment>,
    #[serde(default)]
    pub recommendation: String,
}

impl RiskRecord {
    /// Boundary precondition check for a record before decomposition
    pub fn validate(&self) -> Result<()> {
        if !self.base_risk.is_finite() || !self.final_risk.is_finite() {
            anyhow::bail!(
                "record {}: risk scores must be finite",
                self.article_number
            );
        }
        if let Some(ref mc) = self.components.feature_4_confidence {
            mc.validate()?;
        }
        Ok(())
    }

    /// Sum of all numeric feature deltas, in slot order
    ///
    /// Evidence (slot 2) and priority (slot 8) never contribute.
    pub fn delta_sum(&self) -> f64 {
        let c = &self.components;
        c.feature_1_debate.unwrap_or(0.0)
            + c.feature_3_precedent.unwrap_or(0.0)
            + c.feature_4_confidence
                .as_ref()
                .map_or(0.0, |mc| mc.risk_contribution)
            + c.feature_5_explorer.unwrap_or(0.0)
            + c.feature_6_political.unwrap_or(0.0)
            + c.feature_7_timeline.unwrap_or(0.0)
    }

    /// Soft-invariant check: `final_risk - (base_risk + delta_sum)`
    ///
    /// The backend computes `final_risk`; this core never re-derives it. A
    /// non-zero gap is surfaced (waterfall jump, report note), not corrected.
    pub fn consistency_gap(&self) -> f64 {
        self.final_risk - (self.base_risk + self.delta_sum())
    }
}
