//! Typed contracts for the backend collaborator
//!
//! The backend performs debate simulation, retrieval, Monte Carlo sampling,
//! and bottleneck analysis; this crate only consumes its summary records.
//! Transport, retries, and routing live behind the [`Backend`] seam and are
//! out of scope here.

use crate::bottleneck::BottleneckItem;
use crate::record::RiskRecord;
use crate::session::SliderSpec;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `POST /api/articles/{id}/toggle` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub toggle_id: String,
    pub new_state: bool,
}

/// `POST /api/articles/{id}/toggle` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub success: bool,
    pub toggle_id: String,
    pub new_state: bool,
    #[serde(default)]
    pub impact: f64,
    pub updated_article: RiskRecord,
}

/// `POST /api/admin/dashboard` request body (GET uses the defaults)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInput {
    #[serde(default = "default_target_year")]
    pub target_year: i32,
    #[serde(default = "default_percent")]
    pub evm_supply: f64,
    #[serde(default = "default_percent")]
    pub security_personnel: f64,
}

fn default_target_year() -> i32 {
    2029
}

fn default_percent() -> f64 {
    100.0
}

impl Default for DashboardInput {
    fn default() -> Self {
        DashboardInput {
            target_year: default_target_year(),
            evm_supply: default_percent(),
            security_personnel: default_percent(),
        }
    }
}

/// One administrative feature card on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminFeature {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub risk_contribution: f64,
    #[serde(default)]
    pub status: String,
    /// Feature-specific payload, merged in place by slider recomputes
    #[serde(default)]
    pub data: Value,
}

/// `GET|POST /api/admin/dashboard` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub features: Vec<AdminFeature>,
    #[serde(default)]
    pub bottleneck_sliders: Vec<SliderSpec>,
    #[serde(default)]
    pub overall_status: String,
}

/// `POST /api/admin/bottleneck/calculate` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckRequest {
    pub sliders: BTreeMap<String, f64>,
    #[serde(default)]
    pub context: Value,
}

/// `POST /api/admin/bottleneck/analyze` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckAnalysis {
    #[serde(default)]
    pub bottlenecks: Vec<BottleneckItem>,
    #[serde(default)]
    pub analysis_mode: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub risk_contribution: f64,
}

/// Transport seam implemented by whatever fetch layer hosts this core
///
/// Failure policy is the caller's: the initial record load surfaces errors
/// with a retry affordance, toggle and slider interactions swallow-and-log.
pub trait Backend {
    /// `GET /api/articles/`
    fn fetch_records(&self) -> Result<Vec<RiskRecord>>;

    /// `POST /api/articles/{article_number}/toggle`
    fn apply_toggle(&self, article_number: u32, request: &ToggleRequest) -> Result<ToggleResponse>;

    /// `GET /api/admin/dashboard`
    fn fetch_dashboard(&self) -> Result<AdminDashboard>;

    /// `POST /api/admin/dashboard`
    fn update_dashboard(&self, input: &DashboardInput) -> Result<AdminDashboard>;

    /// `POST /api/admin/bottleneck/analyze`
    fn analyze_bottlenecks(&self, input: &DashboardInput) -> Result<BottleneckAnalysis>;

    /// `POST /api/admin/bottleneck/calculate` -> partial feature payload
    /// merged by the caller's [`crate::session::SliderSession`]
    fn recompute_sliders(&self, request: &BottleneckRequest) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dashboard_input_defaults_match_backend() {
        let input: DashboardInput = serde_json::from_value(json!({})).unwrap();
        assert_eq!(input.target_year, 2029);
        assert_eq!(input.evm_supply, 100.0);
        assert_eq!(input.security_personnel, 100.0);
    }

    #[test]
    fn test_bottleneck_analysis_tolerates_sparse_payload() {
        let analysis: BottleneckAnalysis = serde_json::from_value(json!({
            "bottlenecks": [
                { "name": "Deadline compression", "severity": "HIGH", "category": "timeline" }
            ]
        }))
        .unwrap();
        assert_eq!(analysis.bottlenecks.len(), 1);
        assert!(analysis.analysis_mode.is_empty());
    }

    #[test]
    fn test_admin_dashboard_round_trips_sliders() {
        let dashboard: AdminDashboard = serde_json::from_value(json!({
            "features": [
                { "id": "f5", "name": "Bottleneck Explorer",
                  "risk_contribution": 12.0, "status": "Interactive",
                  "data": { "current_risk": 68.0 } }
            ],
            "bottleneck_sliders": [
                { "id": "budget", "label": "Budget Availability", "unit": "%",
                  "min": 0.0, "max": 100.0, "defaultValue": 80.0 }
            ],
            "overall_status": "At Risk"
        }))
        .unwrap();
        assert_eq!(dashboard.bottleneck_sliders[0].default_value, 80.0);
        assert_eq!(dashboard.features[0].data["current_risk"], 68.0);
    }
}
