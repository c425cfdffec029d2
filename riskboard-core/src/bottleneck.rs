//! Bottleneck display items
//!
//! Backend-classified administrative risk items. Severity and category are
//! only used for display styling; both deserialize totally (unknown labels
//! fall back to MEDIUM / other).

use crate::classify::{Category, Severity, SeverityStyle};
use serde::{Deserialize, Serialize};

/// One backend-classified bottleneck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: String,
    pub severity: Severity,
    pub category: Category,
}

impl BottleneckItem {
    /// Card style triple for this item's severity
    pub fn style(&self) -> SeverityStyle {
        self.severity.style()
    }

    /// Display icon for this item's category
    pub fn icon(&self) -> &'static str {
        self.category.icon()
    }
}
