//! List-level aggregates for a fetched record set
//!
//! Strictly derived, never stored: recomputed from the record list on every
//! call, matching the dashboard header counters.

use crate::record::{RecordStatus, RiskRecord};
use serde::Serialize;

/// Record with the highest final risk in a set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HighestRisk {
    pub article_number: u32,
    pub final_risk: f64,
}

/// Derived aggregates over a record set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordSetSummary {
    pub total_records: usize,
    pub critical_blockers: usize,
    pub average_risk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest: Option<HighestRisk>,
}

/// Summarize a record set for dashboard headers
pub fn summarize(records: &[RiskRecord]) -> RecordSetSummary {
    let total_records = records.len();
    let critical_blockers = records
        .iter()
        .filter(|r| r.status == RecordStatus::CriticalBlocker)
        .count();
    let average_risk = if records.is_empty() {
        0.0
    } else {
        records.iter().map(|r| r.final_risk).sum::<f64>() / total_records as f64
    };
    let highest = records
        .iter()
        .max_by(|a, b| {
            a.final_risk
                .partial_cmp(&b.final_risk)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|r| HighestRisk {
            article_number: r.article_number,
            final_risk: r.final_risk,
        });

    RecordSetSummary {
        total_records,
        critical_blockers,
        average_risk,
        highest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<RiskRecord> {
        serde_json::from_value(json!([
            { "article_number": 83, "name": "Duration of Houses", "base_risk": 30.0,
              "final_risk": 45.0, "status": "WARNING", "components": { "base": 30.0 } },
            { "article_number": 356, "name": "President's Rule", "base_risk": 40.0,
              "final_risk": 92.0, "status": "CRITICAL BLOCKER", "components": { "base": 40.0 } },
            { "article_number": 172, "name": "State Legislatures", "base_risk": 25.0,
              "final_risk": 40.0, "status": "NORMAL", "components": { "base": 25.0 } }
        ]))
        .unwrap()
    }

    #[test]
    fn test_summarize_counts_and_averages() {
        let summary = summarize(&records());
        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.critical_blockers, 1);
        // (45 + 92 + 40) / 3 = 59
        assert!((summary.average_risk - 59.0).abs() < 1e-9);
        assert_eq!(
            summary.highest,
            Some(HighestRisk {
                article_number: 356,
                final_risk: 92.0
            })
        );
    }

    #[test]
    fn test_summarize_empty_set() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_records, 0);
        assert_eq!(summary.average_risk, 0.0);
        assert!(summary.highest.is_none());
    }
}
