//! Severity/Risk Classifier
//!
//! Continuous score -> display bin, gauge geometry, and the total (never
//! failing) categorical classifiers used by bottleneck cards.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Distance from the gauge edge to the stroke center, in pixels
pub const GAUGE_INSET: f64 = 10.0;

/// Display bin for a continuous risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBin {
    Critical, // >= 80
    High,     // >= 60
    Warning,  // >= 30
    Success,  // < 30
}

impl RiskBin {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskBin::Critical => "CRITICAL",
            RiskBin::High => "HIGH",
            RiskBin::Warning => "WARNING",
            RiskBin::Success => "SUCCESS",
        }
    }

    /// Gauge/badge color for the bin
    pub fn color(self) -> &'static str {
        match self {
            RiskBin::Critical => "#ff0844",
            RiskBin::High => "#f5576c",
            RiskBin::Warning => "#f5af19",
            RiskBin::Success => "#38ef7d",
        }
    }
}

/// Configurable bin thresholds (inclusive lower bounds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinThresholds {
    pub critical: f64,
    pub high: f64,
    pub warning: f64,
}

impl Default for BinThresholds {
    fn default() -> Self {
        BinThresholds {
            critical: 80.0,
            high: 60.0,
            warning: 30.0,
        }
    }
}

/// Classify a risk score in [0, 100] with default thresholds
///
/// Checked top-down with inclusive lower bounds: exactly 80 is CRITICAL,
/// not HIGH.
pub fn classify_risk(score: f64) -> RiskBin {
    classify_risk_with_thresholds(score, &BinThresholds::default())
}

/// Classify with custom thresholds
pub fn classify_risk_with_thresholds(score: f64, thresholds: &BinThresholds) -> RiskBin {
    if score >= thresholds.critical {
        RiskBin::Critical
    } else if score >= thresholds.high {
        RiskBin::High
    } else if score >= thresholds.warning {
        RiskBin::Warning
    } else {
        RiskBin::Success
    }
}

/// Stroke geometry for the circular gauge
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GaugeGeometry {
    pub radius: f64,
    pub circumference: f64,
    /// Dash offset leaving `score/100` of the ring visible
    pub dash_offset: f64,
}

/// Compute gauge stroke geometry for a score in [0, 100] and a pixel size
///
/// Callers own the 0-100 domain contract; behavior outside it is undefined.
pub fn gauge_geometry(score: f64, size: f64) -> GaugeGeometry {
    let radius = size / 2.0 - GAUGE_INSET;
    let circumference = 2.0 * PI * radius;
    GaugeGeometry {
        radius,
        circumference,
        dash_offset: circumference * (1.0 - score / 100.0),
    }
}

/// Backend-supplied severity label for a bottleneck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl From<String> for Severity {
    /// Total: any unrecognized label classifies as Medium
    fn from(label: String) -> Self {
        Severity::from_label(&label)
    }
}

impl Severity {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            _ => Severity::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
        }
    }

    pub fn style(self) -> SeverityStyle {
        match self {
            Severity::Critical => SeverityStyle {
                background: "rgba(244, 67, 54, 0.1)",
                border: "#f44336",
                text: "#f44336",
            },
            Severity::High => SeverityStyle {
                background: "rgba(255, 152, 0, 0.1)",
                border: "#ff9800",
                text: "#ff9800",
            },
            Severity::Medium => SeverityStyle {
                background: "rgba(33, 150, 243, 0.1)",
                border: "#2196f3",
                text: "#2196f3",
            },
        }
    }
}

/// Card styling triple for a severity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeverityStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

/// Map a severity label to its card style; unknown labels get the Medium
/// style, never an error
pub fn classify_severity_label(label: &str) -> SeverityStyle {
    Severity::from_label(label).style()
}

/// Backend-supplied bottleneck category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Category {
    Manufacturing,
    Coordination,
    Timeline,
    Security,
    Legal,
    SupplyChain,
    Other,
}

impl From<String> for Category {
    /// Total: any unrecognized category classifies as Other
    fn from(label: String) -> Self {
        Category::from_label(&label)
    }
}

impl Category {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "manufacturing" => Category::Manufacturing,
            "coordination" => Category::Coordination,
            "timeline" => Category::Timeline,
            "security" => Category::Security,
            "legal" => Category::Legal,
            "supply_chain" => Category::SupplyChain,
            _ => Category::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Manufacturing => "manufacturing",
            Category::Coordination => "coordination",
            Category::Timeline => "timeline",
            Category::Security => "security",
            Category::Legal => "legal",
            Category::SupplyChain => "supply_chain",
            Category::Other => "other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Manufacturing => "\u{1f3ed}", // 🏭
            Category::Coordination => "\u{1f91d}",  // 🤝
            Category::Timeline => "\u{23f3}",       // ⏳
            Category::Security => "\u{1f46e}",      // 👮
            Category::Legal => "\u{2696}",          // ⚖
            Category::SupplyChain => "\u{1f4e6}",   // 📦
            Category::Other => "\u{26a0}",          // ⚠
        }
    }
}

/// Map a category string to its display icon; unknown categories get the
/// generic icon, never an error
pub fn category_icon(label: &str) -> &'static str {
    Category::from_label(label).icon()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_inclusive_and_checked_top_down() {
        assert_eq!(classify_risk(80.0), RiskBin::Critical);
        assert_eq!(classify_risk(79.999), RiskBin::High);
        assert_eq!(classify_risk(60.0), RiskBin::High);
        assert_eq!(classify_risk(30.0), RiskBin::Warning);
        assert_eq!(classify_risk(29.0), RiskBin::Success);
        assert_eq!(classify_risk(0.0), RiskBin::Success);
        assert_eq!(classify_risk(100.0), RiskBin::Critical);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = BinThresholds {
            critical: 90.0,
            high: 70.0,
            warning: 40.0,
        };
        assert_eq!(classify_risk_with_thresholds(85.0, &t), RiskBin::High);
        assert_eq!(classify_risk_with_thresholds(90.0, &t), RiskBin::Critical);
    }

    #[test]
    fn test_gauge_geometry() {
        let g = gauge_geometry(75.0, 120.0);
        // radius = 120/2 - 10 = 50
        assert!((g.radius - 50.0).abs() < 1e-9);
        assert!((g.circumference - 2.0 * PI * 50.0).abs() < 1e-9);
        // 75% filled leaves a quarter of the ring as offset
        assert!((g.dash_offset - g.circumference * 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_gauge_full_and_empty() {
        let full = gauge_geometry(100.0, 120.0);
        assert!(full.dash_offset.abs() < 1e-9);
        let empty = gauge_geometry(0.0, 120.0);
        assert!((empty.dash_offset - empty.circumference).abs() < 1e-9);
    }

    #[test]
    fn test_severity_labels_are_total() {
        assert_eq!(Severity::from_label("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::from_label("high"), Severity::High);
        assert_eq!(Severity::from_label("UNKNOWN"), Severity::Medium);
        assert_eq!(
            classify_severity_label("UNKNOWN"),
            Severity::Medium.style()
        );
    }

    #[test]
    fn test_category_icons_are_total() {
        assert_eq!(category_icon("manufacturing"), "\u{1f3ed}");
        assert_eq!(category_icon("supply_chain"), "\u{1f4e6}");
        assert_eq!(category_icon("no-such-category"), "\u{26a0}");
    }

    #[test]
    fn test_severity_deserializes_with_fallback() {
        let s: Severity = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(s, Severity::Medium);
        let c: Category = serde_json::from_str("\"weather\"").unwrap();
        assert_eq!(c, Category::Other);
    }
}
