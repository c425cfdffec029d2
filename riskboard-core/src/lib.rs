//! Riskboard core library - decomposes precomputed risk records into
//! chart-ready view models
//!
//! The backend collaborator performs debate simulation, evidence retrieval,
//! Monte Carlo sampling, and bottleneck analysis; this crate turns the
//! summary records it returns into explained contribution breakdowns, chart
//! projections, a reconstructed density curve, and display classifications.

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Decomposition is strictly per-record
// - No global mutable state
// - No randomness, clocks, threads, or async
// - Feature iteration order is explicit (canonical slot order 1-8)
// - Identical input yields byte-for-byte identical output
// - Valid-shaped input never errors; missing fields degrade to fallbacks

pub mod api;
pub mod bottleneck;
pub mod classify;
pub mod config;
pub mod distribution;
pub mod feature;
pub mod html;
pub mod project;
pub mod record;
pub mod report;
pub mod resolve;
pub mod session;
pub mod summary;

pub use classify::{classify_risk, classify_severity_label, category_icon, gauge_geometry};
pub use config::{discover_config, ResolvedConfig};
pub use distribution::{reconstruct, reconstruct_default};
pub use html::render_html;
pub use project::{project, ChartProjections, Palette};
pub use record::RiskRecord;
pub use report::{build_report, render_json, render_text, DecompositionReport};
pub use resolve::{resolve, FeatureContribution};
pub use summary::summarize;
