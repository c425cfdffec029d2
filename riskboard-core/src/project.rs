//! Chart Projection Builder
//!
//! Global invariants enforced:
//! - Projections are strictly derived (never stored, always computed)
//! - Entry order equals resolver order
//! - Color assignment cycles the injected palette by position, not by feature
//!
//! Known/expected behavior: the pie projection includes only strictly
//! positive deltas, so risk-reducing features are under-represented there.
//! That matches the display contract and is not corrected here.

use crate::resolve::FeatureContribution;
use serde::Serialize;

/// Fixed radar axis bound so shapes are comparable across records
pub const DEFAULT_RADAR_MAX: f64 = 20.0;

/// Injectable ordered color cycle for positional chart coloring
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Base-risk bars and the waterfall's Base point
    pub neutral: String,
    /// The waterfall's Final point
    pub terminal: String,
    /// Cycled by position for every other entry
    pub cycle: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            neutral: "#4a5568".to_string(),
            terminal: "#ff0844".to_string(),
            cycle: [
                "#667eea", "#11998e", "#f093fb", "#fa709a", "#4facfe", "#43e97b", "#ff0844",
                "#fee140",
            ]
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
        }
    }
}

impl Palette {
    /// Color for the given position, cycling the palette
    pub fn color(&self, position: usize) -> &str {
        &self.cycle[position % self.cycle.len()]
    }
}

/// One bar-chart entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub is_base: bool,
}

/// One pie-chart wedge (positive deltas only)
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PieDatum {
    pub label: String,
    pub weight: f64,
    pub color: String,
}

/// One waterfall step carrying its own delta and the running cumulative
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WaterfallPoint {
    pub label: String,
    pub delta: f64,
    pub cumulative: f64,
    pub color: String,
}

/// One radar axis
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RadarDatum {
    pub axis: String,
    pub value: f64,
    pub max: f64,
}

/// All four chart-ready shapes for one decomposition
#[derive(Debug, Clone, Serialize)]
pub struct ChartProjections {
    pub bar: Vec<BarDatum>,
    pub pie: Vec<PieDatum>,
    pub waterfall: Vec<WaterfallPoint>,
    pub radar: Vec<RadarDatum>,
}

/// Project a contribution list into the four chart view models
///
/// Pure reducer: contribution order is preserved, inputs are not mutated.
/// The waterfall's Final point is pinned to `final_risk`; when that diverges
/// from the last cumulative value the chart shows a visible jump, which is
/// intentional surfacing of backend inconsistency.
pub fn project(
    contributions: &[FeatureContribution],
    base_risk: f64,
    final_risk: f64,
    palette: &Palette,
    radar_max: f64,
) -> ChartProjections {
    ChartProjections {
        bar: project_bar(contributions, base_risk, palette),
        pie: project_pie(contributions, palette),
        waterfall: project_waterfall(contributions, base_risk, final_risk, palette),
        radar: project_radar(contributions, radar_max),
    }
}

fn project_bar(
    contributions: &[FeatureContribution],
    base_risk: f64,
    palette: &Palette,
) -> Vec<BarDatum> {
    let mut bars = vec![BarDatum {
        label: "Base Risk".to_string(),
        value: base_risk,
        color: palette.neutral.clone(),
        is_base: true,
    }];
    for c in contributions.iter().filter(|c| c.risk_delta != 0.0) {
        // Position includes the base entry so adjacent bars differ predictably
        bars.push(BarDatum {
            label: c.display_name.to_string(),
            value: c.risk_delta,
            color: palette.color(bars.len()).to_string(),
            is_base: false,
        });
    }
    bars
}

fn project_pie(contributions: &[FeatureContribution], palette: &Palette) -> Vec<PieDatum> {
    contributions
        .iter()
        .filter(|c| c.risk_delta > 0.0)
        .enumerate()
        .map(|(i, c)| PieDatum {
            label: c.display_name.to_string(),
            weight: c.risk_delta.abs(),
            color: palette.color(i).to_string(),
        })
        .collect()
}

fn project_waterfall(
    contributions: &[FeatureContribution],
    base_risk: f64,
    final_risk: f64,
    palette: &Palette,
) -> Vec<WaterfallPoint> {
    let mut points = vec![WaterfallPoint {
        label: "Base".to_string(),
        delta: base_risk,
        cumulative: base_risk,
        color: palette.neutral.clone(),
    }];
    let mut running = base_risk;
    for (i, c) in contributions
        .iter()
        .filter(|c| c.risk_delta != 0.0)
        .enumerate()
    {
        running += c.risk_delta;
        points.push(WaterfallPoint {
            label: c.display_name.to_string(),
            delta: c.risk_delta,
            cumulative: running,
            color: palette.color(i).to_string(),
        });
    }
    // Pinned to the backend's final risk, not the accumulated total
    points.push(WaterfallPoint {
        label: "Final".to_string(),
        delta: final_risk,
        cumulative: final_risk,
        color: palette.terminal.clone(),
    });
    points
}

fn project_radar(contributions: &[FeatureContribution], radar_max: f64) -> Vec<RadarDatum> {
    contributions
        .iter()
        .filter(|c| c.risk_delta != 0.0)
        .map(|c| RadarDatum {
            axis: c.display_name.to_string(),
            value: c.risk_delta.abs(),
            max: radar_max,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::resolve;
    use serde_json::json;

    fn contributions() -> Vec<FeatureContribution> {
        let record = serde_json::from_value(json!({
            "article_number": 356,
            "name": "Test",
            "base_risk": 40.0,
            "final_risk": 58.0,
            "status": "HIGH_RISK",
            "components": {
                "base": 40.0,
                "feature_1_debate": 15.0,
                "feature_3_precedent": 5.0,
                "feature_5_explorer": -2.0,
                "feature_8_priority": 1
            }
        }))
        .unwrap();
        resolve(&record)
    }

    #[test]
    fn test_bar_starts_with_neutral_base_and_skips_zero_deltas() {
        let bars = project_bar(&contributions(), 40.0, &Palette::default());
        // Base + F1 + F3 + F5 (F8 has zero delta)
        assert_eq!(bars.len(), 4);
        assert!(bars[0].is_base);
        assert_eq!(bars[0].color, "#4a5568");
        assert_eq!(bars[1].label, "AI Debate Agent");
        // Positional coloring: bar index 1 -> cycle[1]
        assert_eq!(bars[1].color, "#11998e");
    }

    #[test]
    fn test_pie_excludes_non_positive_deltas() {
        let pie = project_pie(&contributions(), &Palette::default());
        assert_eq!(pie.len(), 2);
        let weights: f64 = pie.iter().map(|p| p.weight).sum();
        // Sum of pie weights equals sum of positive deltas (15 + 5)
        assert!((weights - 20.0).abs() < 1e-9);
        assert!(pie.iter().all(|p| p.label != "Real-time Explorer"));
    }

    #[test]
    fn test_waterfall_endpoints_are_base_and_final() {
        let wf = project_waterfall(&contributions(), 40.0, 58.0, &Palette::default());
        assert_eq!(wf.first().unwrap().cumulative, 40.0);
        assert_eq!(wf.last().unwrap().cumulative, 58.0);
        assert_eq!(wf.last().unwrap().label, "Final");
    }

    #[test]
    fn test_waterfall_surfaces_divergence_as_jump() {
        // Accumulated total is 58 but the backend says 65: the Final point
        // is pinned to 65 and the discontinuity stays visible.
        let wf = project_waterfall(&contributions(), 40.0, 65.0, &Palette::default());
        let before_final = &wf[wf.len() - 2];
        assert_eq!(before_final.cumulative, 58.0);
        assert_eq!(wf.last().unwrap().cumulative, 65.0);
    }

    #[test]
    fn test_waterfall_intermediate_cumulative_matches_resolver() {
        let wf = project_waterfall(&contributions(), 40.0, 58.0, &Palette::default());
        // Base(40) -> F1 55 -> F3 60 -> F5 58 -> Final
        assert_eq!(wf[1].cumulative, 55.0);
        assert_eq!(wf[2].cumulative, 60.0);
        assert_eq!(wf[3].cumulative, 58.0);
    }

    #[test]
    fn test_radar_uses_absolute_deltas_and_fixed_bound() {
        let radar = project_radar(&contributions(), DEFAULT_RADAR_MAX);
        assert_eq!(radar.len(), 3);
        let explorer = radar
            .iter()
            .find(|d| d.axis == "Real-time Explorer")
            .unwrap();
        assert_eq!(explorer.value, 2.0);
        assert!(radar.iter().all(|d| d.max == 20.0));
    }

    #[test]
    fn test_palette_cycles_by_position() {
        let palette = Palette {
            neutral: "n".into(),
            terminal: "t".into(),
            cycle: vec!["a".into(), "b".into()],
        };
        assert_eq!(palette.color(0), "a");
        assert_eq!(palette.color(1), "b");
        assert_eq!(palette.color(2), "a");
    }
}
