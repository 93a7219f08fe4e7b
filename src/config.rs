//! Engine configuration
//!
//! Every threshold the extractors and the cost model use lives here. The
//! defaults are the tuned values the test-suite documents; they are tunable
//! parameters, not a compatibility contract.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::vocabulary::vocabulary;

/// Heuristic extractor thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Shortest paragraph accepted as a summary
    pub summary_min_chars: usize,
    /// How many block-level elements of the body the summary search looks at
    pub summary_block_window: usize,
    /// Shortest block considered for main content
    pub min_candidate_chars: usize,
    /// Main content preview length in characters
    pub preview_chars: usize,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            summary_min_chars: 80,
            summary_block_window: 20,
            min_candidate_chars: 25,
            preview_chars: 500,
        }
    }
}

/// Markup locator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Introductory markers must appear before this element index
    pub summary_scan_limit: usize,
    /// Main content preview length in characters
    pub preview_chars: usize,
    /// Marker values are cut to this length in `markers_found`
    pub marker_value_chars: usize,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            summary_scan_limit: 400,
            preview_chars: 500,
            marker_value_chars: 100,
        }
    }
}

/// Cost model settings, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Simulated cost of a full heuristic pass
    pub baseline_ms: f64,
    /// Fixed cost of scanning markers, charged only when markup is present
    pub scan_overhead_ms: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            baseline_ms: 120.0,
            scan_overhead_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub heuristic: HeuristicConfig,
    pub markup: MarkupConfig,
    pub cost: CostConfig,
}

fn require(ok: bool, key: &'static str, reason: &str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            reason: reason.to_string(),
        })
    }
}

impl EngineConfig {
    /// Parse a JSON configuration document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate().inspect_err(|e| {
            warn!(error = %e, "rejected engine configuration");
        })?;
        Ok(config)
    }

    /// Check the static vocabulary and every numeric setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        vocabulary().validate()?;

        let cost = &self.cost;
        require(
            cost.baseline_ms.is_finite() && cost.baseline_ms > 0.0,
            "cost.baseline_ms",
            "must be a positive number",
        )?;
        require(
            cost.scan_overhead_ms.is_finite() && cost.scan_overhead_ms >= 0.0,
            "cost.scan_overhead_ms",
            "must be zero or positive",
        )?;
        require(
            self.heuristic.preview_chars > 0,
            "heuristic.preview_chars",
            "must be greater than zero",
        )?;
        require(
            self.heuristic.summary_block_window > 0,
            "heuristic.summary_block_window",
            "must be greater than zero",
        )?;
        require(
            self.markup.preview_chars > 0,
            "markup.preview_chars",
            "must be greater than zero",
        )?;
        require(
            self.markup.marker_value_chars > 0,
            "markup.marker_value_chars",
            "must be greater than zero",
        )?;
        Ok(())
    }
}
