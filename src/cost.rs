//! Cognitive cost model
//!
//! Heuristic inference always pays the full baseline. Every field the
//! explicit-marker path resolves removes a third of that baseline; a page
//! without markers gets no advantage at all.

use serde::{Deserialize, Serialize};

use crate::config::CostConfig;
use crate::extractors::ExtractionResult;
use crate::vocabulary::Field;

/// Reported speedup when the explicit-marker path costs nothing
pub const SPEEDUP_SENTINEL: f64 = 1.0e6;

/// Measurements taken by whoever fetched and parsed the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchMeasurements {
    pub network_time_ms: f64,
    pub dom_parse_time_ms: f64,
    pub response_size: u64,
    pub status_code: u16,
}

/// Timings for one strategy, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostMetrics {
    pub network_time: f64,
    pub dom_parse_time: f64,
    pub cognitive_time: f64,
    pub total_time: f64,
    pub response_size: u64,
    pub status_code: u16,
}

impl CostMetrics {
    pub fn new(fetch: &FetchMeasurements, cognitive_time: f64) -> Self {
        Self {
            network_time: fetch.network_time_ms,
            dom_parse_time: fetch.dom_parse_time_ms,
            cognitive_time,
            total_time: fetch.network_time_ms + fetch.dom_parse_time_ms + cognitive_time,
            response_size: fetch.response_size,
            status_code: fetch.status_code,
        }
    }
}

/// Cognitive time of both strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CognitiveTimes {
    pub heuristic: f64,
    pub waio: f64,
}

impl CognitiveTimes {
    pub fn speedup_ratio(&self) -> f64 {
        speedup_ratio(self.heuristic, self.waio)
    }

    pub fn gain_percent(&self) -> f64 {
        gain_percent(self.heuristic, self.waio)
    }
}

pub struct CostModel<'a> {
    config: &'a CostConfig,
}

impl<'a> CostModel<'a> {
    pub fn new(config: &'a CostConfig) -> Self {
        Self { config }
    }

    pub fn heuristic_time(&self) -> f64 {
        self.config.baseline_ms
    }

    /// `baseline × (1 − k/3)` for k fields resolved by markers, the reduced
    /// part divided by `modifier` when k > 0. Exactly the baseline when the
    /// page carries no markers.
    pub fn waio_time(&self, waio: &ExtractionResult, modifier: f64) -> f64 {
        let baseline = self.config.baseline_ms;
        if !waio.markup_detected {
            return baseline;
        }

        let total = Field::ALL.len();
        let resolved = waio.resolved_via_markup().min(total);
        // Multiply before dividing so whole thirds come out exact
        let mut time = baseline * (total - resolved) as f64 / total as f64;
        if resolved > 0 && modifier > 0.0 {
            time /= modifier;
        }
        time + self.config.scan_overhead_ms
    }

    pub fn times(&self, waio: &ExtractionResult, modifier: f64) -> CognitiveTimes {
        CognitiveTimes {
            heuristic: self.heuristic_time(),
            waio: self.waio_time(waio, modifier),
        }
    }
}

/// `heuristic / waio`, or [`SPEEDUP_SENTINEL`] when waio is free
pub fn speedup_ratio(heuristic: f64, waio: f64) -> f64 {
    if waio == 0.0 {
        SPEEDUP_SENTINEL
    } else {
        heuristic / waio
    }
}

/// `(1 − waio/heuristic) × 100`. Zero and negative gains are kept as is.
pub fn gain_percent(heuristic: f64, waio: f64) -> f64 {
    if heuristic == 0.0 {
        return 0.0;
    }
    (1.0 - waio / heuristic) * 100.0
}
