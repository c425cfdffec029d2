//! Feature Contribution Resolver
//!
//! Global invariants enforced:
//! - Entries appear in canonical slot order (1-8)
//! - Each entry's cumulative risk is the running total after its own delta
//! - Missing narrative fields degrade to fallback rationales, never errors
//! - Pure function of the record; inputs are never mutated

use crate::feature::FeatureKind;
use crate::record::{
    DebateResult, Evidence, MonteCarloSummary, PoliticalSupport, Precedent, RiskRecord,
    TimelineAssessment, ToggleState,
};
use serde::Serialize;

/// Feature-specific payload carried alongside a contribution entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionDetail {
    Debate(DebateResult),
    Evidence { count: usize, items: Vec<Evidence> },
    Precedents(Vec<Precedent>),
    MonteCarlo(MonteCarloSummary),
    Toggles(Vec<ToggleState>),
    Political(PoliticalSupport),
    Timeline(TimelineAssessment),
    Priority { rank: u32 },
}

/// One explained step of the risk decomposition
///
/// Constructed fresh on every `resolve` call and never mutated; holds no
/// references back into the source record.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureContribution {
    pub id: &'static str,
    pub display_name: &'static str,
    pub icon: &'static str,
    pub risk_delta: f64,
    pub cumulative_risk: f64,
    pub rationale: String,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ContributionDetail>,
}

struct SlotValue {
    delta: f64,
    rationale: String,
    detail: Option<ContributionDetail>,
}

/// Decompose a record into an ordered, explained contribution list
///
/// Slots absent from the record are skipped entirely; they contribute no
/// entry and no delta. The running total starts at `base_risk` and each
/// present slot's entry carries the total after adding that slot's delta,
/// so later slots see earlier deltas already applied.
pub fn resolve(record: &RiskRecord) -> Vec<FeatureContribution> {
    let mut contributions = Vec::new();
    let mut cumulative = record.base_risk;

    for kind in FeatureKind::CANONICAL_ORDER {
        let Some(slot) = slot_value(kind, record) else {
            continue;
        };
        cumulative += slot.delta;
        contributions.push(FeatureContribution {
            id: kind.id(),
            display_name: kind.display_name(),
            icon: kind.icon(),
            risk_delta: slot.delta,
            cumulative_risk: cumulative,
            rationale: slot.rationale,
            color: kind.color(),
            detail: slot.detail,
        });
    }

    contributions
}

/// Sum of all resolved deltas (the "feature contributions" summary figure)
pub fn contribution_total(contributions: &[FeatureContribution]) -> f64 {
    contributions.iter().map(|c| c.risk_delta).sum()
}

fn slot_value(kind: FeatureKind, record: &RiskRecord) -> Option<SlotValue> {
    let c = &record.components;
    match kind {
        FeatureKind::Debate => c.feature_1_debate.map(|delta| SlotValue {
            delta,
            rationale: debate_rationale(record.debate_result.as_ref()),
            detail: record.debate_result.clone().map(ContributionDetail::Debate),
        }),
        // Present only when evidence was actually retrieved; surfaces the
        // document count and top quote, never a risk delta.
        FeatureKind::Evidence => {
            if record.rag_evidence.is_empty() {
                return None;
            }
            Some(SlotValue {
                delta: 0.0,
                rationale: evidence_rationale(&record.rag_evidence),
                detail: Some(ContributionDetail::Evidence {
                    count: record.rag_evidence.len(),
                    items: record.rag_evidence.clone(),
                }),
            })
        }
        FeatureKind::Precedent => c.feature_3_precedent.map(|delta| SlotValue {
            delta,
            rationale: precedent_rationale(&record.precedents),
            detail: Some(ContributionDetail::Precedents(record.precedents.clone())),
        }),
        FeatureKind::MonteCarlo => c.feature_4_confidence.as_ref().map(|mc| SlotValue {
            delta: mc.risk_contribution,
            rationale: monte_carlo_rationale(mc),
            detail: Some(ContributionDetail::MonteCarlo(mc.clone())),
        }),
        FeatureKind::Explorer => c.feature_5_explorer.map(|delta| SlotValue {
            delta,
            rationale: explorer_rationale(record.explorer_toggles.len(), delta),
            detail: Some(ContributionDetail::Toggles(record.explorer_toggles.clone())),
        }),
        FeatureKind::Political => c.feature_6_political.map(|delta| SlotValue {
            delta,
            rationale: political_rationale(record.political_support.as_ref()),
            detail: record
                .political_support
                .clone()
                .map(ContributionDetail::Political),
        }),
        FeatureKind::Timeline => c.feature_7_timeline.map(|delta| SlotValue {
            delta,
            rationale: timeline_rationale(record.timeline.as_ref()),
            detail: record.timeline.clone().map(ContributionDetail::Timeline),
        }),
        // Ranking only; surfaces the rank, never a risk delta.
        FeatureKind::Priority => c.feature_8_priority.map(|rank| SlotValue {
            delta: 0.0,
            rationale: priority_rationale(rank, record.final_risk),
            detail: Some(ContributionDetail::Priority { rank }),
        }),
    }
}

fn debate_rationale(result: Option<&DebateResult>) -> String {
    match result {
        Some(d) => format!(
            "Vulnerability score: {:.1}% - {}",
            d.vulnerability_score * 100.0,
            truncate_chars(&d.court_argument, 150)
        ),
        None => "AI-simulated debate reveals constitutional vulnerabilities".to_string(),
    }
}

fn evidence_rationale(evidence: &[Evidence]) -> String {
    // Callers guarantee non-empty; guard anyway so the resolver never panics
    match evidence.first() {
        Some(top) => format!(
            "Found {} evidence document(s) - \"{}\"",
            evidence.len(),
            truncate_chars(&top.quote, 100)
        ),
        None => "Evidence retrieval returned no documents".to_string(),
    }
}

fn precedent_rationale(precedents: &[Precedent]) -> String {
    match precedents.first() {
        Some(top) => format!(
            "{} relevant case(s) found - {} ({}): {}",
            precedents.len(),
            top.case_name,
            top.year,
            truncate_chars(&top.relevance, 100)
        ),
        None => "Historical precedents indicate constitutional risks".to_string(),
    }
}

fn monte_carlo_rationale(mc: &MonteCarloSummary) -> String {
    let [low, high] = mc.confidence_interval_95;
    format!(
        "95% confidence interval: [{:.1}, {:.1}] - mean: {:.1} \u{b1} {:.1}",
        low, high, mc.mean, mc.std_dev
    )
}

fn explorer_rationale(toggle_count: usize, delta: f64) -> String {
    let direction = if delta > 0.0 { "increased" } else { "reduced" };
    format!(
        "{} interactive scenario(s) analyzed - current state indicates {} risk",
        toggle_count, direction
    )
}

fn political_rationale(support: Option<&PoliticalSupport>) -> String {
    match support {
        Some(s) => {
            let verdict = if s.current_support < s.required_support {
                "Insufficient"
            } else {
                "Sufficient"
            };
            format!(
                "Current support: {}% | required: {}% - {} parliamentary majority",
                s.current_support, s.required_support, verdict
            )
        }
        None => "Political support analysis indicates amendment feasibility challenges".to_string(),
    }
}

fn timeline_rationale(timeline: Option<&TimelineAssessment>) -> String {
    match timeline {
        Some(t) => format!(
            "{} months needed vs {} available - {} by {}",
            t.months_needed,
            t.months_available,
            if t.feasible { "Feasible" } else { "Not feasible" },
            t.target_year
        ),
        None => "Timeline analysis indicates amendment completion challenges".to_string(),
    }
}

fn priority_rationale(rank: u32, final_risk: f64) -> String {
    format!(
        "Ranked #{} priority based on risk score ({:.1}/100) and impact analysis",
        rank, final_risk
    )
}

/// Truncate on a char boundary, appending an ellipsis when shortened
fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RiskRecord;
    use serde_json::json;

    fn record(value: serde_json::Value) -> RiskRecord {
        serde_json::from_value(value).unwrap()
    }

    fn two_feature_record() -> RiskRecord {
        record(json!({
            "article_number": 356,
            "name": "President's Rule",
            "base_risk": 40.0,
            "final_risk": 60.0,
            "status": "HIGH_RISK",
            "components": {
                "base": 40.0,
                "feature_1_debate": 15.0,
                "feature_3_precedent": 5.0
            }
        }))
    }

    #[test]
    fn test_resolve_orders_and_accumulates() {
        let contributions = resolve(&two_feature_record());

        // F1: 40 + 15 = 55, F3: 55 + 5 = 60
        assert_eq!(contributions.len(), 2);
        assert_eq!(contributions[0].id, "F1");
        assert_eq!(contributions[0].risk_delta, 15.0);
        assert_eq!(contributions[0].cumulative_risk, 55.0);
        assert_eq!(contributions[1].id, "F3");
        assert_eq!(contributions[1].cumulative_risk, 60.0);
    }

    #[test]
    fn test_absent_slots_are_skipped_entirely() {
        let contributions = resolve(&two_feature_record());
        assert!(contributions.iter().all(|c| c.id != "F4" && c.id != "F8"));
    }

    #[test]
    fn test_last_cumulative_equals_base_plus_delta_sum() {
        let r = record(json!({
            "article_number": 1,
            "name": "Test",
            "base_risk": 10.0,
            "final_risk": 22.5,
            "status": "NORMAL",
            "components": {
                "base": 10.0,
                "feature_1_debate": 8.0,
                "feature_5_explorer": -2.5,
                "feature_6_political": 7.0
            }
        }));
        let contributions = resolve(&r);
        let last = contributions.last().unwrap();
        assert!((last.cumulative_risk - (10.0 + 8.0 - 2.5 + 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_evidence_slot_contributes_no_delta() {
        let r = record(json!({
            "article_number": 2,
            "name": "Test",
            "base_risk": 30.0,
            "final_risk": 30.0,
            "status": "NORMAL",
            "components": { "base": 30.0 },
            "rag_evidence": [
                { "source": "Committee Report", "quote": "No procedure is defined.", "relevance_score": 0.9 }
            ]
        }));
        let contributions = resolve(&r);
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].id, "F2");
        assert_eq!(contributions[0].risk_delta, 0.0);
        // Running total unchanged by a zero-delta slot
        assert_eq!(contributions[0].cumulative_risk, 30.0);
        assert!(contributions[0].rationale.contains("1 evidence document(s)"));
    }

    #[test]
    fn test_monte_carlo_delta_comes_from_risk_contribution() {
        let r = record(json!({
            "article_number": 3,
            "name": "Test",
            "base_risk": 20.0,
            "final_risk": 32.0,
            "status": "WARNING",
            "components": {
                "base": 20.0,
                "feature_4_confidence": {
                    "mean": 55.0,
                    "std_dev": 6.0,
                    "confidence_interval_95": [43.0, 67.0],
                    "trials": 1000,
                    "risk_contribution": 12.0
                }
            }
        }));
        let contributions = resolve(&r);
        assert_eq!(contributions[0].id, "F4");
        assert_eq!(contributions[0].risk_delta, 12.0);
        assert!(contributions[0]
            .rationale
            .contains("95% confidence interval: [43.0, 67.0]"));
    }

    #[test]
    fn test_monte_carlo_missing_contribution_defaults_to_zero() {
        let r = record(json!({
            "article_number": 3,
            "name": "Test",
            "base_risk": 20.0,
            "final_risk": 20.0,
            "status": "NORMAL",
            "components": {
                "base": 20.0,
                "feature_4_confidence": { "mean": 50.0, "std_dev": 5.0,
                                          "confidence_interval_95": [40.0, 60.0] }
            }
        }));
        let contributions = resolve(&r);
        assert_eq!(contributions[0].risk_delta, 0.0);
    }

    #[test]
    fn test_fallback_rationale_when_narrative_missing() {
        // feature_1_debate present but no debate_result payload
        let contributions = resolve(&two_feature_record());
        assert_eq!(
            contributions[0].rationale,
            "AI-simulated debate reveals constitutional vulnerabilities"
        );
    }

    #[test]
    fn test_priority_slot_surfaces_rank_only() {
        let r = record(json!({
            "article_number": 4,
            "name": "Test",
            "base_risk": 50.0,
            "final_risk": 50.0,
            "status": "NORMAL",
            "components": { "base": 50.0, "feature_8_priority": 2 }
        }));
        let contributions = resolve(&r);
        assert_eq!(contributions[0].id, "F8");
        assert_eq!(contributions[0].risk_delta, 0.0);
        assert!(contributions[0].rationale.contains("Ranked #2"));
    }

    #[test]
    fn test_contribution_total_sums_deltas() {
        let contributions = resolve(&two_feature_record());
        assert!((contribution_total(&contributions) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncate_chars_is_char_boundary_safe() {
        let quote = "\u{963f}\u{963f}\u{963f}\u{963f}\u{963f}";
        assert_eq!(truncate_chars(quote, 3), "\u{963f}\u{963f}\u{963f}...");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
