//! HTML report generation
//!
//! Generates self-contained HTML reports with embedded CSS and inline SVG
//! charts computed here; no script dependency, works offline.
//!
//! Global invariants enforced:
//! - Deterministic output (identical report yields identical bytes)
//! - Chart geometry is finite for every valid view model

use crate::bottleneck::BottleneckItem;
use crate::classify::gauge_geometry;
use crate::project::{BarDatum, PieDatum, RadarDatum, WaterfallPoint};
use crate::distribution::DensityPoint;
use crate::report::DecompositionReport;
use std::f64::consts::PI;

const GAUGE_SIZE: f64 = 120.0;
const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 260.0;
const CHART_PAD: f64 = 30.0;

/// Render a decomposition (plus optional bottleneck items) as an HTML report
pub fn render_html(report: &DecompositionReport, bottlenecks: &[BottleneckItem]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Risk Decomposition - Article {number}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {header}
        {summary}
        {charts}
        {features}
        {bottlenecks}
        {recommendation}
    </div>
</body>
</html>"#,
        number = report.article_number,
        css = inline_css(),
        header = render_header(report),
        summary = render_summary(report),
        charts = render_charts(report),
        features = render_feature_cards(report),
        bottlenecks = render_bottleneck_cards(bottlenecks),
        recommendation = render_recommendation(report),
    )
}

fn render_header(report: &DecompositionReport) -> String {
    format!(
        r#"<header class="header">
    <div>
        <h1>Article {number}: {name}</h1>
        <span class="status-badge" style="color: {color}; border-color: {color}">{status}</span>
    </div>
    {gauge}
</header>"#,
        number = report.article_number,
        name = html_escape(&report.name),
        color = report.bin_color,
        status = html_escape(&report.status),
        gauge = render_gauge(report.final_risk, &report.bin_color),
    )
}

/// Circular gauge ring; stroke-dasharray geometry mirrors the live UI
fn render_gauge(score: f64, color: &str) -> String {
    let g = gauge_geometry(score.clamp(0.0, 100.0), GAUGE_SIZE);
    let center = GAUGE_SIZE / 2.0;
    format!(
        r#"<div class="gauge">
    <svg width="{size}" height="{size}">
        <circle cx="{c}" cy="{c}" r="{r:.1}" fill="none" stroke="rgba(255,255,255,0.1)" stroke-width="8"/>
        <circle cx="{c}" cy="{c}" r="{r:.1}" fill="none" stroke="{color}" stroke-width="8"
                stroke-linecap="round" stroke-dasharray="{circ:.2}" stroke-dashoffset="{offset:.2}"
                transform="rotate(-90 {c} {c})"/>
    </svg>
    <div class="gauge-value">{score:.1}<span>/100</span></div>
</div>"#,
        size = GAUGE_SIZE,
        c = center,
        r = g.radius,
        color = color,
        circ = g.circumference,
        offset = g.dash_offset,
        score = score,
    )
}

fn render_summary(report: &DecompositionReport) -> String {
    let residual_note = if report.residual.abs() > 1e-6 {
        format!(
            r#"<p class="residual-note">Final risk differs from the accumulated total by {:+.1} points.</p>"#,
            report.residual
        )
    } else {
        String::new()
    };
    format!(
        r#"<section class="summary">
    <div class="summary-card"><div class="label">Base Risk</div><div class="value">{base:.1}</div></div>
    <div class="summary-card"><div class="label">Feature Contributions</div><div class="value">{total:+.1}</div></div>
    <div class="summary-card"><div class="label">Final Risk Score</div><div class="value">{final_risk:.1}</div></div>
    {residual_note}
</section>"#,
        base = report.base_risk,
        total = report.contribution_total,
        final_risk = report.final_risk,
        residual_note = residual_note,
    )
}

fn render_charts(report: &DecompositionReport) -> String {
    let mut sections = vec![
        chart_section("Risk Contribution by Feature", &bar_svg(&report.charts.bar)),
        chart_section(
            "Risk Accumulation Waterfall",
            &waterfall_svg(&report.charts.waterfall),
        ),
    ];
    if !report.charts.pie.is_empty() {
        sections.push(chart_section(
            "Feature Contribution Distribution",
            &pie_svg(&report.charts.pie),
        ));
    }
    if !report.charts.radar.is_empty() {
        sections.push(chart_section("Feature Impact Radar", &radar_svg(&report.charts.radar)));
    }
    if let Some(ref curve) = report.curve {
        sections.push(chart_section(
            "Monte Carlo Confidence Analysis",
            &curve_svg(curve),
        ));
    }
    format!(
        r#"<section class="charts">{}</section>"#,
        sections.join("\n")
    )
}

fn chart_section(title: &str, svg: &str) -> String {
    format!(
        r#"<div class="chart-card"><h2>{}</h2>{}</div>"#,
        title, svg
    )
}

fn bar_svg(bars: &[BarDatum]) -> String {
    if bars.is_empty() {
        return empty_chart();
    }
    let max = bars
        .iter()
        .map(|b| b.value.abs())
        .fold(f64::MIN_POSITIVE, f64::max);
    let plot_height = CHART_HEIGHT - 2.0 * CHART_PAD;
    let band = (CHART_WIDTH - 2.0 * CHART_PAD) / bars.len() as f64;
    let bar_width = band * 0.6;

    let rects: String = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let height = (b.value.abs() / max) * plot_height;
            let x = CHART_PAD + i as f64 * band + (band - bar_width) / 2.0;
            let y = CHART_HEIGHT - CHART_PAD - height;
            format!(
                r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}" rx="4"><title>{label}: {value:+.1}</title></rect>
<text x="{tx:.1}" y="{ty:.1}" class="tick">{short}</text>"#,
                x = x,
                y = y,
                w = bar_width,
                h = height,
                color = b.color,
                label = html_escape(&b.label),
                value = b.value,
                tx = x + bar_width / 2.0,
                ty = CHART_HEIGHT - CHART_PAD + 14.0,
                short = html_escape(&initials(&b.label)),
            )
        })
        .collect();

    svg_frame(&rects)
}

fn waterfall_svg(points: &[WaterfallPoint]) -> String {
    if points.is_empty() {
        return empty_chart();
    }
    let max = points
        .iter()
        .map(|p| p.cumulative.abs())
        .fold(f64::MIN_POSITIVE, f64::max);
    let band = (CHART_HEIGHT - 2.0 * CHART_PAD) / points.len() as f64;
    let bar_height = band * 0.6;
    let plot_width = CHART_WIDTH - 2.0 * CHART_PAD - 110.0;

    let rows: String = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let width = (p.cumulative.abs() / max) * plot_width;
            let y = CHART_PAD + i as f64 * band + (band - bar_height) / 2.0;
            format!(
                r#"<text x="{lx:.1}" y="{ly:.1}" class="row-label">{label}</text>
<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{color}" rx="4"><title>{label}: {cumulative:.1}</title></rect>
<text x="{vx:.1}" y="{ly:.1}" class="row-value">{cumulative:.1}</text>"#,
                lx = CHART_PAD,
                ly = y + bar_height / 2.0 + 4.0,
                label = html_escape(&p.label),
                x = CHART_PAD + 110.0,
                y = y,
                w = width,
                h = bar_height,
                color = p.color,
                cumulative = p.cumulative,
                vx = CHART_PAD + 114.0 + width,
            )
        })
        .collect();

    svg_frame(&rows)
}

fn pie_svg(wedges: &[PieDatum]) -> String {
    let total: f64 = wedges.iter().map(|w| w.weight).sum();
    if total <= 0.0 {
        return empty_chart();
    }
    let cx = CHART_WIDTH / 2.0;
    let cy = CHART_HEIGHT / 2.0;
    let radius = (CHART_HEIGHT / 2.0 - CHART_PAD).max(10.0);

    let mut angle = -PI / 2.0;
    let paths: String = wedges
        .iter()
        .map(|w| {
            let sweep = (w.weight / total) * 2.0 * PI;
            let (x0, y0) = polar(cx, cy, radius, angle);
            angle += sweep;
            let (x1, y1) = polar(cx, cy, radius, angle);
            let large_arc = i32::from(sweep > PI);
            let share = w.weight / total * 100.0;
            // A full-circle single wedge degenerates as an arc; draw a circle
            if wedges.len() == 1 {
                format!(
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="{color}"><title>{label}: 100%</title></circle>"#,
                    cx = cx,
                    cy = cy,
                    radius = radius,
                    color = w.color,
                    label = html_escape(&w.label),
                )
            } else {
                format!(
                    r#"<path d="M {cx:.1} {cy:.1} L {x0:.1} {y0:.1} A {radius:.1} {radius:.1} 0 {large_arc} 1 {x1:.1} {y1:.1} Z" fill="{color}"><title>{label}: {share:.0}%</title></path>"#,
                    cx = cx,
                    cy = cy,
                    x0 = x0,
                    y0 = y0,
                    radius = radius,
                    large_arc = large_arc,
                    x1 = x1,
                    y1 = y1,
                    color = w.color,
                    label = html_escape(&w.label),
                    share = share,
                )
            }
        })
        .collect();

    svg_frame(&paths)
}

fn radar_svg(axes: &[RadarDatum]) -> String {
    if axes.is_empty() {
        return empty_chart();
    }
    let cx = CHART_WIDTH / 2.0;
    let cy = CHART_HEIGHT / 2.0;
    let radius = (CHART_HEIGHT / 2.0 - CHART_PAD).max(10.0);
    let step = 2.0 * PI / axes.len() as f64;

    let grid: String = axes
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let angle = -PI / 2.0 + i as f64 * step;
            let (x, y) = polar(cx, cy, radius, angle);
            format!(
                r#"<line x1="{cx:.1}" y1="{cy:.1}" x2="{x:.1}" y2="{y:.1}" class="radar-grid"/>
<text x="{x:.1}" y="{y:.1}" class="tick">{label}</text>"#,
                cx = cx,
                cy = cy,
                x = x,
                y = y,
                label = html_escape(&initials(&a.axis)),
            )
        })
        .collect();

    let points: Vec<String> = axes
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let angle = -PI / 2.0 + i as f64 * step;
            let fraction = if a.max > 0.0 {
                (a.value / a.max).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let (x, y) = polar(cx, cy, radius * fraction, angle);
            format!("{:.1},{:.1}", x, y)
        })
        .collect();

    svg_frame(&format!(
        r##"{grid}<circle cx="{cx:.1}" cy="{cy:.1}" r="{radius:.1}" fill="none" class="radar-grid"/>
<polygon points="{points}" fill="rgba(102, 126, 234, 0.5)" stroke="#667eea" stroke-width="2"/>"##,
        grid = grid,
        cx = cx,
        cy = cy,
        radius = radius,
        points = points.join(" "),
    ))
}

fn curve_svg(curve: &[DensityPoint]) -> String {
    if curve.len() < 2 {
        return empty_chart();
    }
    let x_min = curve.first().map_or(0.0, |p| p.x);
    let x_max = curve.last().map_or(1.0, |p| p.x);
    let x_span = (x_max - x_min).max(f64::MIN_POSITIVE);
    let density_max = curve
        .iter()
        .map(|p| p.density)
        .fold(f64::MIN_POSITIVE, f64::max);
    let plot_width = CHART_WIDTH - 2.0 * CHART_PAD;
    let plot_height = CHART_HEIGHT - 2.0 * CHART_PAD;

    let mut path = format!(
        "M {:.1} {:.1}",
        CHART_PAD,
        CHART_HEIGHT - CHART_PAD
    );
    for p in curve {
        let x = CHART_PAD + (p.x - x_min) / x_span * plot_width;
        let y = CHART_HEIGHT - CHART_PAD - (p.density / density_max) * plot_height;
        path.push_str(&format!(" L {:.1} {:.1}", x, y));
    }
    path.push_str(&format!(
        " L {:.1} {:.1} Z",
        CHART_WIDTH - CHART_PAD,
        CHART_HEIGHT - CHART_PAD
    ));

    svg_frame(&format!(
        r##"<path d="{path}" fill="rgba(102, 126, 234, 0.35)" stroke="#667eea" stroke-width="2"/>
<text x="{tx:.1}" y="{ty:.1}" class="tick">{low:.1}</text>
<text x="{tx2:.1}" y="{ty:.1}" class="tick">{high:.1}</text>"##,
        path = path,
        tx = CHART_PAD,
        ty = CHART_HEIGHT - CHART_PAD + 14.0,
        low = x_min,
        tx2 = CHART_WIDTH - CHART_PAD,
        high = x_max,
    ))
}

fn render_feature_cards(report: &DecompositionReport) -> String {
    if report.contributions.is_empty() {
        return String::new();
    }
    let cards: String = report
        .contributions
        .iter()
        .map(|c| {
            let badge = if c.risk_delta != 0.0 {
                format!(
                    r#"<span class="delta-badge {class}">{delta:+.1} pts</span>"#,
                    class = if c.risk_delta > 0.0 { "positive" } else { "negative" },
                    delta = c.risk_delta,
                )
            } else {
                String::new()
            };
            format!(
                r#"<div class="feature-card" style="border-left-color: {color}">
    <div class="feature-head">
        <span class="feature-icon">{icon}</span>
        <span class="feature-name">{name}</span>
        <span class="feature-id">{id}</span>
        {badge}
    </div>
    <p class="feature-rationale">{rationale}</p>
    <div class="feature-cumulative">Cumulative risk: {cumulative:.1}</div>
</div>"#,
                color = c.color,
                icon = c.icon,
                name = html_escape(c.display_name),
                id = c.id,
                badge = badge,
                rationale = html_escape(&c.rationale),
                cumulative = c.cumulative_risk,
            )
        })
        .collect();
    format!(
        r#"<section class="features"><h2>Detailed Feature Analysis</h2>{}</section>"#,
        cards
    )
}

fn render_bottleneck_cards(bottlenecks: &[BottleneckItem]) -> String {
    if bottlenecks.is_empty() {
        return String::new();
    }
    let cards: String = bottlenecks
        .iter()
        .map(|b| {
            let style = b.style();
            format!(
                r#"<div class="bottleneck-card" style="background: {bg}; border-left: 4px solid {border}">
    <div class="bottleneck-head">
        <span class="bottleneck-icon">{icon}</span>
        <span class="bottleneck-name">{name}</span>
        <span class="severity" style="color: {text}">{severity}</span>
    </div>
    <p>{description}</p>
    <p class="impact">{impact}</p>
</div>"#,
                bg = style.background,
                border = style.border,
                icon = b.icon(),
                name = html_escape(&b.name),
                text = style.text,
                severity = b.severity.as_str(),
                description = html_escape(&b.description),
                impact = html_escape(&b.impact),
            )
        })
        .collect();
    format!(
        r#"<section class="bottlenecks"><h2>Bottlenecks</h2>{}</section>"#,
        cards
    )
}

fn render_recommendation(report: &DecompositionReport) -> String {
    if report.recommendation.is_empty() {
        return String::new();
    }
    format!(
        r#"<section class="recommendation"><h2>Recommendation</h2><p>{}</p></section>"#,
        html_escape(&report.recommendation)
    )
}

fn svg_frame(body: &str) -> String {
    format!(
        r#"<svg viewBox="0 0 {w} {h}" width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg">{body}</svg>"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        body = body,
    )
}

fn empty_chart() -> String {
    svg_frame(r#"<text x="320" y="130" class="tick">no data</text>"#)
}

fn polar(cx: f64, cy: f64, radius: f64, angle: f64) -> (f64, f64) {
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}

/// Compact label for chart ticks ("AI Debate Agent" -> "ADA")
fn initials(label: &str) -> String {
    label
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn inline_css() -> &'static str {
    r#"
:root { color-scheme: dark; }
* { box-sizing: border-box; margin: 0; padding: 0; }
body { background: #0a0e1a; color: #e2e8f0; font-family: -apple-system, 'Segoe UI', sans-serif; padding: 2rem; }
.container { max-width: 960px; margin: 0 auto; }
.header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1.5rem; }
.header h1 { font-size: 1.4rem; margin-bottom: 0.5rem; }
.status-badge { border: 1px solid; border-radius: 6px; padding: 0.2rem 0.6rem; font-size: 0.8rem; }
.gauge { position: relative; width: 120px; height: 120px; }
.gauge-value { position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; font-size: 1.3rem; font-weight: 700; }
.gauge-value span { font-size: 0.7rem; color: #a0aec0; margin-left: 2px; }
.summary { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; margin-bottom: 1.5rem; }
.summary-card { background: rgba(255,255,255,0.04); border: 1px solid rgba(255,255,255,0.08); border-radius: 10px; padding: 1rem; text-align: center; }
.summary-card .label { color: #a0aec0; font-size: 0.8rem; }
.summary-card .value { font-size: 1.6rem; font-weight: 700; }
.residual-note { grid-column: 1 / -1; color: #f5af19; font-size: 0.85rem; }
.chart-card { background: rgba(255,255,255,0.04); border: 1px solid rgba(255,255,255,0.08); border-radius: 10px; padding: 1rem; margin-bottom: 1.5rem; }
.chart-card h2, .features h2, .bottlenecks h2 { font-size: 1rem; margin-bottom: 0.8rem; color: #a0aec0; }
.tick { fill: #a0aec0; font-size: 11px; text-anchor: middle; }
.row-label { fill: #a0aec0; font-size: 11px; }
.row-value { fill: #e2e8f0; font-size: 11px; }
.radar-grid { stroke: rgba(255,255,255,0.15); }
.feature-card { background: rgba(255,255,255,0.04); border-left: 4px solid; border-radius: 8px; padding: 0.9rem; margin-bottom: 0.8rem; }
.feature-head { display: flex; align-items: center; gap: 0.5rem; margin-bottom: 0.4rem; }
.feature-id { color: #a0aec0; font-size: 0.75rem; }
.delta-badge { border-radius: 10px; padding: 0.1rem 0.5rem; font-size: 0.75rem; }
.delta-badge.positive { background: rgba(245, 87, 108, 0.2); color: #f5576c; }
.delta-badge.negative { background: rgba(56, 239, 125, 0.2); color: #38ef7d; }
.feature-rationale { font-size: 0.85rem; color: #cbd5e0; }
.feature-cumulative { margin-top: 0.4rem; font-size: 0.8rem; color: #a0aec0; }
.recommendation { background: rgba(255,255,255,0.04); border-radius: 10px; padding: 1rem; margin-bottom: 1.5rem; }
.recommendation h2 { font-size: 1rem; margin-bottom: 0.5rem; color: #a0aec0; }
.bottleneck-card { border-radius: 8px; padding: 0.9rem; margin-bottom: 0.8rem; }
.bottleneck-head { display: flex; align-items: center; gap: 0.5rem; margin-bottom: 0.4rem; }
.severity { margin-left: auto; font-size: 0.75rem; font-weight: 700; }
.impact { color: #a0aec0; font-size: 0.8rem; margin-top: 0.3rem; }
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolvedConfig;
    use crate::record::RiskRecord;
    use crate::report::build_report;
    use serde_json::json;

    fn report() -> DecompositionReport {
        let record: RiskRecord = serde_json::from_value(json!({
            "article_number": 356,
            "name": "President's Rule",
            "base_risk": 40.0,
            "final_risk": 60.0,
            "status": "CRITICAL BLOCKER",
            "components": {
                "base": 40.0,
                "feature_1_debate": 15.0,
                "feature_4_confidence": {
                    "mean": 55.0, "std_dev": 6.0,
                    "confidence_interval_95": [43.0, 67.0],
                    "risk_contribution": 5.0
                }
            },
            "recommendation": "Amend before synchronization"
        }))
        .unwrap();
        build_report(&record, &ResolvedConfig::default())
    }

    #[test]
    fn test_render_html_is_self_contained_and_deterministic() {
        let r = report();
        let a = render_html(&r, &[]);
        let b = render_html(&r, &[]);
        assert_eq!(a, b);
        assert!(a.starts_with("<!DOCTYPE html>"));
        assert!(a.contains("<style>"));
        assert!(!a.contains("<script"));
    }

    #[test]
    fn test_html_includes_all_chart_sections() {
        let html = render_html(&report(), &[]);
        assert!(html.contains("Risk Contribution by Feature"));
        assert!(html.contains("Risk Accumulation Waterfall"));
        assert!(html.contains("Feature Contribution Distribution"));
        assert!(html.contains("Feature Impact Radar"));
        assert!(html.contains("Monte Carlo Confidence Analysis"));
    }

    #[test]
    fn test_html_geometry_is_finite() {
        let html = render_html(&report(), &[]);
        assert!(!html.contains("NaN"));
        assert!(!html.contains("inf"));
    }

    #[test]
    fn test_bottleneck_cards_carry_severity_styles() {
        let bottlenecks: Vec<BottleneckItem> = serde_json::from_value(json!([
            { "name": "EVM shortfall", "description": "Production deficit",
              "impact": "+14% risk", "severity": "CRITICAL", "category": "manufacturing" }
        ]))
        .unwrap();
        let html = render_html(&report(), &bottlenecks);
        assert!(html.contains("EVM shortfall"));
        assert!(html.contains("#f44336"));
        assert!(html.contains("\u{1f3ed}"));
    }

    #[test]
    fn test_escapes_untrusted_text() {
        let mut r = report();
        r.name = "<script>alert(1)</script>".to_string();
        let html = render_html(&r, &[]);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_gauge_ring_uses_dash_offset() {
        let html = render_gauge(75.0, "#f5576c");
        assert!(html.contains("stroke-dasharray"));
        assert!(html.contains("stroke-dashoffset"));
        assert!(html.contains("rotate(-90"));
    }
}
