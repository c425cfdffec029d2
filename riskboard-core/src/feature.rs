//! Closed enumeration of the eight analysis features
//!
//! Every iteration over features goes through `CANONICAL_ORDER`; slot
//! numbering (1-8) is fixed and never inferred from key presence.

/// One of the eight risk-contributing analysis features attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Slot 1: adversarial debate simulation
    Debate,
    /// Slot 2: retrieved documentary evidence (never contributes risk)
    Evidence,
    /// Slot 3: historical precedent analysis
    Precedent,
    /// Slot 4: Monte Carlo confidence modeling (structured payload)
    MonteCarlo,
    /// Slot 5: interactive what-if explorer
    Explorer,
    /// Slot 6: political support tracking
    Political,
    /// Slot 7: timeline feasibility
    Timeline,
    /// Slot 8: priority ranking (never contributes risk)
    Priority,
}

impl FeatureKind {
    /// Fixed iteration order for every decomposition and chart
    pub const CANONICAL_ORDER: [FeatureKind; 8] = [
        FeatureKind::Debate,
        FeatureKind::Evidence,
        FeatureKind::Precedent,
        FeatureKind::MonteCarlo,
        FeatureKind::Explorer,
        FeatureKind::Political,
        FeatureKind::Timeline,
        FeatureKind::Priority,
    ];

    /// Slot number (1-8)
    pub fn slot(self) -> u8 {
        match self {
            FeatureKind::Debate => 1,
            FeatureKind::Evidence => 2,
            FeatureKind::Precedent => 3,
            FeatureKind::MonteCarlo => 4,
            FeatureKind::Explorer => 5,
            FeatureKind::Political => 6,
            FeatureKind::Timeline => 7,
            FeatureKind::Priority => 8,
        }
    }

    /// Short display identifier ("F1".."F8")
    pub fn id(self) -> &'static str {
        match self {
            FeatureKind::Debate => "F1",
            FeatureKind::Evidence => "F2",
            FeatureKind::Precedent => "F3",
            FeatureKind::MonteCarlo => "F4",
            FeatureKind::Explorer => "F5",
            FeatureKind::Political => "F6",
            FeatureKind::Timeline => "F7",
            FeatureKind::Priority => "F8",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            FeatureKind::Debate => "AI Debate Agent",
            FeatureKind::Evidence => "Evidence Retrieval",
            FeatureKind::Precedent => "Precedent Analysis",
            FeatureKind::MonteCarlo => "Monte Carlo Simulation",
            FeatureKind::Explorer => "Real-time Explorer",
            FeatureKind::Political => "Political Support Tracker",
            FeatureKind::Timeline => "Timeline Feasibility",
            FeatureKind::Priority => "Priority Ranking",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FeatureKind::Debate => "\u{1f4ac}",     // 💬
            FeatureKind::Evidence => "\u{1f4da}",   // 📚
            FeatureKind::Precedent => "\u{2696}",   // ⚖
            FeatureKind::MonteCarlo => "\u{1f4ca}", // 📊
            FeatureKind::Explorer => "\u{1f504}",   // 🔄
            FeatureKind::Political => "\u{1f3db}",  // 🏛
            FeatureKind::Timeline => "\u{23f1}",    // ⏱
            FeatureKind::Priority => "\u{1f3af}",   // 🎯
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FeatureKind::Debate => "Simulates adversarial constitutional arguments",
            FeatureKind::Evidence => "Retrieves evidence from source documents",
            FeatureKind::Precedent => "Analyzes relevant court cases",
            FeatureKind::MonteCarlo => "Probabilistic risk modeling with confidence intervals",
            FeatureKind::Explorer => "Interactive toggles for what-if scenarios",
            FeatureKind::Political => "Tracks parliamentary majority requirements",
            FeatureKind::Timeline => "Assesses amendment completion timelines",
            FeatureKind::Priority => "Ranks records by risk and impact",
        }
    }

    /// Fixed per-feature color token (detail cards, badges)
    pub fn color(self) -> &'static str {
        match self {
            FeatureKind::Debate => "#667eea",
            FeatureKind::Evidence => "#11998e",
            FeatureKind::Precedent => "#f093fb",
            FeatureKind::MonteCarlo => "#fa709a",
            FeatureKind::Explorer => "#4facfe",
            FeatureKind::Political => "#43e97b",
            FeatureKind::Timeline => "#fa709a",
            FeatureKind::Priority => "#ff0844",
        }
    }
}
