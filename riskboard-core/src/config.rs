//! Configuration file support for Riskboard
//!
//! Loads project-specific configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.riskboardrc.json` in the working directory
//! 3. `riskboard.config.json` in the working directory
//!
//! All fields are optional. CLI flags take precedence over config file
//! values.

use crate::classify::BinThresholds;
use crate::distribution::DEFAULT_RESOLUTION;
use crate::project::{Palette, DEFAULT_RADAR_MAX};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILENAMES: &[&str] = &[".riskboardrc.json", "riskboard.config.json"];

/// Riskboard configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskboardConfig {
    /// Ordered color cycle for positional chart coloring
    #[serde(default)]
    pub palette: Vec<String>,

    /// Color for base-risk entries (default: #4a5568)
    #[serde(default)]
    pub neutral_color: Option<String>,

    /// Color for the waterfall's Final point (default: #ff0844)
    #[serde(default)]
    pub terminal_color: Option<String>,

    /// Custom risk bin thresholds
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Radar chart outer bound (default: 20.0)
    #[serde(default)]
    pub radar_max: Option<f64>,

    /// Density curve sample count (default: 51)
    #[serde(default)]
    pub curve_resolution: Option<usize>,
}

/// Custom risk bin thresholds (inclusive lower bounds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Lower bound of the CRITICAL bin (default: 80.0)
    pub critical: Option<f64>,
    /// Lower bound of the HIGH bin (default: 60.0)
    pub high: Option<f64>,
    /// Lower bound of the WARNING bin (default: 30.0)
    pub warning: Option<f64>,
}

/// Resolved configuration with defaults applied
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub palette: Palette,
    pub thresholds: BinThresholds,
    pub radar_max: f64,
    pub curve_resolution: usize,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            palette: Palette::default(),
            thresholds: BinThresholds::default(),
            radar_max: DEFAULT_RADAR_MAX,
            curve_resolution: DEFAULT_RESOLUTION,
            config_path: None,
        }
    }
}

impl RiskboardConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref t) = self.thresholds {
            let critical = t.critical.unwrap_or(80.0);
            let high = t.high.unwrap_or(60.0);
            let warning = t.warning.unwrap_or(30.0);

            if !(critical > high && high > warning) {
                anyhow::bail!(
                    "thresholds must satisfy critical > high > warning (got {} / {} / {})",
                    critical,
                    high,
                    warning
                );
            }
            if warning < 0.0 || critical > 100.0 {
                anyhow::bail!("thresholds must lie within the 0-100 score domain");
            }
        }

        if self.palette.iter().any(|color| color.trim().is_empty()) {
            anyhow::bail!("palette entries must be non-empty color strings");
        }

        if let Some(radar_max) = self.radar_max {
            if radar_max <= 0.0 {
                anyhow::bail!("radar_max must be positive (got {})", radar_max);
            }
        }

        if let Some(resolution) = self.curve_resolution {
            if resolution < 2 {
                anyhow::bail!("curve_resolution must be at least 2 (got {})", resolution);
            }
        }

        Ok(())
    }

    /// Resolve into a full configuration with defaults applied
    pub fn resolve(&self, config_path: Option<PathBuf>) -> ResolvedConfig {
        let defaults = ResolvedConfig::default();
        let mut palette = defaults.palette;
        if !self.palette.is_empty() {
            palette.cycle = self.palette.clone();
        }
        if let Some(ref neutral) = self.neutral_color {
            palette.neutral = neutral.clone();
        }
        if let Some(ref terminal) = self.terminal_color {
            palette.terminal = terminal.clone();
        }

        let thresholds = self.thresholds.as_ref().map_or(defaults.thresholds, |t| {
            BinThresholds {
                critical: t.critical.unwrap_or(defaults.thresholds.critical),
                high: t.high.unwrap_or(defaults.thresholds.high),
                warning: t.warning.unwrap_or(defaults.thresholds.warning),
            }
        });

        ResolvedConfig {
            palette,
            thresholds,
            radar_max: self.radar_max.unwrap_or(defaults.radar_max),
            curve_resolution: self.curve_resolution.unwrap_or(defaults.curve_resolution),
            config_path,
        }
    }
}

/// Load a config file from an explicit path
pub fn load_config_file(path: &Path) -> Result<RiskboardConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: RiskboardConfig = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(config)
}

/// Discover and load configuration
///
/// Explicit path wins; otherwise the filenames in search order under `root`.
/// Returns the resolved defaults when no config file exists.
pub fn discover_config(explicit: Option<&Path>, root: &Path) -> Result<ResolvedConfig> {
    if let Some(path) = explicit {
        let config = load_config_file(path)?;
        return Ok(config.resolve(Some(path.to_path_buf())));
    }

    for filename in CONFIG_FILENAMES {
        let candidate = root.join(filename);
        if candidate.is_file() {
            let config = load_config_file(&candidate)?;
            return Ok(config.resolve(Some(candidate)));
        }
    }

    Ok(ResolvedConfig::default())
}
