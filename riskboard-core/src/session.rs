//! Interactive slider session for the bottleneck explorer
//!
//! Owns slider state for one explorer session. Every user move applies an
//! optimistic local update and issues a recompute request stamped with a
//! monotonic epoch; only the response to the *latest* request may merge into
//! the feature payload. Out-of-order responses are discarded as stale, so a
//! rapid slider drag can never leave an older result on screen.
//!
//! On failure the optimistic slider value is kept and the payload is left
//! unchanged (stale-but-consistent); the failure is counted for the caller
//! to log, never surfaced as an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Backend-declared slider (wire shape of `bottleneck_sliders`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderSpec {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub default_value: f64,
}

/// One slider plus its session-local current value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderState {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub default_value: f64,
    pub current_value: f64,
}

impl SliderState {
    fn from_spec(spec: SliderSpec) -> Self {
        SliderState {
            current_value: spec.default_value,
            id: spec.id,
            label: spec.label,
            unit: spec.unit,
            min: spec.min,
            max: spec.max,
            default_value: spec.default_value,
        }
    }

    /// Display label: below the default reads as elevated risk
    pub fn impact_label(&self) -> &'static str {
        if self.current_value < self.default_value {
            "High Risk"
        } else {
            "Stable"
        }
    }
}

/// Recompute request issued after an optimistic slider update
#[derive(Debug, Clone, Serialize)]
pub struct RecomputeRequest {
    /// Monotonic sequence number; the session only merges the response
    /// carrying the latest epoch
    pub epoch: u64,
    pub sliders: BTreeMap<String, f64>,
    pub context: Value,
}

/// Outcome of offering a backend response to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Response matched the latest epoch and was merged
    Applied,
    /// Response was superseded by a newer request and discarded
    Stale,
}

/// State machine for one explorer session
///
/// Single-threaded, no networking; the caller moves requests and responses
/// between this session and the transport.
#[derive(Debug, Clone)]
pub struct SliderSession {
    sliders: Vec<SliderState>,
    context: Value,
    payload: Value,
    epoch: u64,
    failed_requests: u64,
}

impl SliderSession {
    /// Start a session from backend slider specs and the feature payload
    /// the sliders recompute
    pub fn new(specs: Vec<SliderSpec>, context: Value, payload: Value) -> Self {
        SliderSession {
            sliders: specs.into_iter().map(SliderState::from_spec).collect(),
            context,
            payload,
            epoch: 0,
            failed_requests: 0,
        }
    }

    pub fn sliders(&self) -> &[SliderState] {
        &self.sliders
    }

    /// Currently displayed feature payload (initial plus merged partials)
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn latest_epoch(&self) -> u64 {
        self.epoch
    }

    /// Swallowed-and-counted interaction failures
    pub fn failed_requests(&self) -> u64 {
        self.failed_requests
    }

    /// Optimistically set a slider and issue a recompute request
    ///
    /// The value is clamped into the slider's range. Returns `None` for an
    /// unknown slider id; no state changes in that case.
    pub fn set(&mut self, id: &str, value: f64) -> Option<RecomputeRequest> {
        let slider = self.sliders.iter_mut().find(|s| s.id == id)?;
        slider.current_value = value.clamp(slider.min, slider.max);

        self.epoch += 1;
        Some(RecomputeRequest {
            epoch: self.epoch,
            sliders: self
                .sliders
                .iter()
                .map(|s| (s.id.clone(), s.current_value))
                .collect(),
            context: self.context.clone(),
        })
    }

    /// Offer a backend response for the request with the given epoch
    ///
    /// Only the latest-issued epoch merges; anything older is stale and
    /// discarded without touching the payload.
    pub fn apply_response(&mut self, epoch: u64, partial: Value) -> MergeOutcome {
        if epoch != self.epoch {
            return MergeOutcome::Stale;
        }
        merge_shallow(&mut self.payload, partial);
        MergeOutcome::Applied
    }

    /// Record a failed recompute: slider stays optimistic, payload untouched
    pub fn apply_failure(&mut self, _epoch: u64) {
        self.failed_requests += 1;
    }

    /// Reset every slider to its default value
    pub fn reset(&mut self) {
        for slider in &mut self.sliders {
            slider.current_value = slider.default_value;
        }
    }
}

/// Shallow-merge a partial object into the payload; a non-object partial
/// replaces the payload wholesale
fn merge_shallow(payload: &mut Value, partial: Value) {
    match (payload.as_object_mut(), partial) {
        (Some(target), Value::Object(fields)) => {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        (_, partial) => *payload = partial,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn specs() -> Vec<SliderSpec> {
        serde_json::from_value(json!([
            { "id": "evm_delay", "label": "EVM Production Delay", "unit": "months",
              "min": -12.0, "max": 0.0, "defaultValue": -6.0 },
            { "id": "state_coop", "label": "State Cooperation", "unit": "%",
              "min": 0.0, "max": 100.0, "defaultValue": 85.0 }
        ]))
        .unwrap()
    }

    fn session() -> SliderSession {
        SliderSession::new(
            specs(),
            json!({ "target_year": 2029 }),
            json!({ "current_risk": 68.0 }),
        )
    }

    #[test]
    fn test_set_is_optimistic_and_issues_epoch() {
        let mut s = session();
        let request = s.set("state_coop", 60.0).unwrap();
        assert_eq!(request.epoch, 1);
        assert_eq!(request.sliders["state_coop"], 60.0);
        assert_eq!(request.sliders["evm_delay"], -6.0);
        assert_eq!(s.sliders()[1].current_value, 60.0);
    }

    #[test]
    fn test_set_clamps_to_range() {
        let mut s = session();
        s.set("state_coop", 250.0).unwrap();
        assert_eq!(s.sliders()[1].current_value, 100.0);
    }

    #[test]
    fn test_unknown_slider_id_is_a_no_op() {
        let mut s = session();
        assert!(s.set("nonexistent", 1.0).is_none());
        assert_eq!(s.latest_epoch(), 0);
    }

    #[test]
    fn test_latest_response_merges_shallowly() {
        let mut s = session();
        let request = s.set("state_coop", 60.0).unwrap();
        let outcome = s.apply_response(request.epoch, json!({ "new_risk": 82.1 }));
        assert_eq!(outcome, MergeOutcome::Applied);
        assert_eq!(s.payload()["current_risk"], 68.0);
        assert_eq!(s.payload()["new_risk"], 82.1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut s = session();
        let first = s.set("state_coop", 60.0).unwrap();
        let second = s.set("state_coop", 40.0).unwrap();

        // The older request's response arrives last; it must not win.
        assert_eq!(
            s.apply_response(second.epoch, json!({ "new_risk": 90.0 })),
            MergeOutcome::Applied
        );
        assert_eq!(
            s.apply_response(first.epoch, json!({ "new_risk": 75.0 })),
            MergeOutcome::Stale
        );
        assert_eq!(s.payload()["new_risk"], 90.0);
    }

    #[test]
    fn test_failure_keeps_optimistic_value_and_payload() {
        let mut s = session();
        let request = s.set("evm_delay", -12.0).unwrap();
        s.apply_failure(request.epoch);
        assert_eq!(s.sliders()[0].current_value, -12.0);
        assert_eq!(s.payload()["current_risk"], 68.0);
        assert_eq!(s.failed_requests(), 1);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut s = session();
        s.set("evm_delay", -12.0).unwrap();
        s.set("state_coop", 10.0).unwrap();
        s.reset();
        assert_eq!(s.sliders()[0].current_value, -6.0);
        assert_eq!(s.sliders()[1].current_value, 85.0);
    }

    #[test]
    fn test_impact_label_flags_below_default() {
        let mut s = session();
        s.set("state_coop", 40.0).unwrap();
        assert_eq!(s.sliders()[1].impact_label(), "High Risk");
        s.reset();
        assert_eq!(s.sliders()[1].impact_label(), "Stable");
    }
}
