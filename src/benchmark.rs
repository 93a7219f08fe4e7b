//! Benchmark orchestration
//!
//! Runs both extractors against one document, prices both outcomes with
//! the cost model and merges the fields into a single report that records
//! which strategy supplied each value.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::config::EngineConfig;
use crate::cost::{CostMetrics, CostModel, FetchMeasurements};
use crate::document::Document;
use crate::error::{ConfigError, ExtractError};
use crate::extractors::{
    ExtractionResult, FieldOutcome, Fields, HeuristicExtractor, MarkupLocator, Provenance,
};
use crate::preference::{scoring_modifier, BotType, SimulationMode};
use crate::vocabulary::{vocabulary, Field, Vocabulary};

/// Optional context for a benchmark run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkOptions {
    pub url: Option<Url>,
    /// Apply this bot's preference modifier to the explicit-marker cost
    pub bot: Option<BotType>,
    pub mode: SimulationMode,
}

impl BenchmarkOptions {
    pub fn with_url(mut self, url: &str) -> Result<Self, url::ParseError> {
        self.url = Some(Url::parse(url)?);
        Ok(self)
    }

    pub fn with_bot(mut self, bot: BotType, mode: SimulationMode) -> Self {
        self.bot = Some(bot);
        self.mode = mode;
        self
    }
}

/// Extraction outcome and timings for one strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub extraction: ExtractionResult,
    pub metrics: CostMetrics,
}

/// Side-by-side result of one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub url: Option<String>,
    pub bot: Option<BotType>,
    pub simulation_mode: SimulationMode,
    pub heuristic: StrategyReport,
    pub waio: StrategyReport,
    /// Unified view: marker values where available, heuristic otherwise
    pub merged: ExtractionResult,
    pub speedup_ratio: f64,
    pub gain_percent: f64,
    pub preference_modifier: f64,
}

/// The extraction engine. Holds validated configuration and the static
/// vocabulary; every call builds fresh results and shares nothing.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    vocabulary: &'static Vocabulary,
}

impl Default for Engine {
    /// Default configuration is valid by construction; only the static
    /// vocabulary needs checking, and only in debug builds.
    fn default() -> Self {
        debug_assert_eq!(vocabulary().validate(), Ok(()));
        Self {
            config: EngineConfig::default(),
            vocabulary: vocabulary(),
        }
    }
}

impl Engine {
    /// Validate the vocabulary and `config`; fails on any inconsistency
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            vocabulary: vocabulary(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn heuristic(&self, doc: &Document) -> ExtractionResult {
        HeuristicExtractor::new(&self.config.heuristic, self.vocabulary).extract(doc)
    }

    pub fn markup(&self, doc: &Document) -> ExtractionResult {
        MarkupLocator::new(&self.config.markup, self.vocabulary).locate(doc)
    }

    /// Heuristic path over raw HTML. Unreadable input yields all fields
    /// unresolved.
    pub fn extract_heuristic(&self, html: &str) -> ExtractionResult {
        match Document::parse(html) {
            Ok(doc) => self.heuristic(&doc),
            Err(e) => unreadable(e),
        }
    }

    /// Explicit-marker path over raw HTML
    pub fn extract_markup(&self, html: &str) -> ExtractionResult {
        match Document::parse(html) {
            Ok(doc) => self.markup(&doc),
            Err(e) => unreadable(e),
        }
    }

    /// Price two extraction outcomes and merge their fields
    pub fn compare(
        &self,
        heuristic: &ExtractionResult,
        waio: &ExtractionResult,
        fetch: &FetchMeasurements,
        options: &BenchmarkOptions,
    ) -> ComparisonResult {
        let modifier = match options.bot {
            Some(bot) if waio.markup_detected => {
                scoring_modifier(bot, options.mode, &waio.markers_found)
            }
            _ => 1.0,
        };

        let times = CostModel::new(&self.config.cost).times(waio, modifier);
        let merged = merge(heuristic, waio);

        let result = ComparisonResult {
            url: options.url.as_ref().map(Url::to_string),
            bot: options.bot,
            simulation_mode: options.mode,
            heuristic: StrategyReport {
                extraction: heuristic.clone(),
                metrics: CostMetrics::new(fetch, times.heuristic),
            },
            waio: StrategyReport {
                extraction: waio.clone(),
                metrics: CostMetrics::new(fetch, times.waio),
            },
            merged,
            speedup_ratio: times.speedup_ratio(),
            gain_percent: times.gain_percent(),
            preference_modifier: modifier,
        };

        info!(
            url = result.url.as_deref().unwrap_or("-"),
            markup_detected = waio.markup_detected,
            resolved_via_markup = waio.resolved_via_markup(),
            gain_percent = result.gain_percent,
            "benchmark complete"
        );
        result
    }

    /// Run both strategies on one document and compare them
    pub fn run(
        &self,
        html: &str,
        fetch: &FetchMeasurements,
        options: &BenchmarkOptions,
    ) -> ComparisonResult {
        self.run_parsed(Document::parse(html), fetch, options)
    }

    /// Like [`Engine::run`] for undecoded bytes
    pub fn run_bytes(
        &self,
        html: &[u8],
        fetch: &FetchMeasurements,
        options: &BenchmarkOptions,
    ) -> ComparisonResult {
        self.run_parsed(Document::from_bytes(html), fetch, options)
    }

    fn run_parsed(
        &self,
        parsed: Result<Document, ExtractError>,
        fetch: &FetchMeasurements,
        options: &BenchmarkOptions,
    ) -> ComparisonResult {
        let (heuristic, waio) = match parsed {
            Ok(doc) => (self.heuristic(&doc), self.markup(&doc)),
            Err(e) => (unreadable(e.clone()), unreadable(e)),
        };
        self.compare(&heuristic, &waio, fetch, options)
    }
}

fn unreadable(err: ExtractError) -> ExtractionResult {
    debug!(error = %err, "document unreadable, reporting all fields unresolved");
    ExtractionResult::unresolved()
}

/// Marker value when the locator found one, heuristic value otherwise
pub fn merge(heuristic: &ExtractionResult, waio: &ExtractionResult) -> ExtractionResult {
    let mut fields = Fields::default();
    for field in Field::ALL {
        let from_markup = waio.field(field);
        let outcome = if from_markup.found && from_markup.provenance == Provenance::Waio {
            from_markup.clone()
        } else {
            FieldOutcome::from_option(heuristic.field(field).value.clone(), Provenance::Heuristic)
        };
        *fields.get_mut(field) = outcome;
    }

    ExtractionResult::new(
        fields,
        waio.markup_detected,
        waio.markers_found.clone(),
        waio.selection_notes.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
    <html>
    <head><meta name="description" content="Heuristic summary"></head>
    <body>
        <h1 data-ai-category="headline">Marked Title</h1>
        <div>Plain article text long enough to be picked as the main content block.</div>
    </body>
    </html>
    "#;

    #[test]
    fn test_merge_prefers_markup_then_heuristic() {
        let engine = Engine::default();
        let result = engine.run(PAGE, &FetchMeasurements::default(), &BenchmarkOptions::default());

        let merged = &result.merged;
        assert_eq!(merged.fields.title.value.as_deref(), Some("Marked Title"));
        assert_eq!(merged.fields.title.provenance, Provenance::Waio);
        assert_eq!(merged.fields.summary.value.as_deref(), Some("Heuristic summary"));
        assert_eq!(merged.fields.summary.provenance, Provenance::Heuristic);
        assert_eq!(merged.fields.main_content.provenance, Provenance::Heuristic);
        assert!(merged.fields.main_content.found);
    }

    #[test]
    fn test_unresolved_everywhere_stays_unresolved() {
        let heuristic = ExtractionResult::unresolved();
        let waio = ExtractionResult::unresolved();
        let merged = merge(&heuristic, &waio);
        for field in Field::ALL {
            assert!(!merged.field(field).found);
            assert_eq!(merged.field(field).provenance, Provenance::Heuristic);
        }
    }

    #[test]
    fn test_fetch_measurements_carried_to_both_strategies() {
        let fetch = FetchMeasurements {
            network_time_ms: 320.0,
            dom_parse_time_ms: 12.0,
            response_size: 2048,
            status_code: 200,
        };
        let result = Engine::default().run(PAGE, &fetch, &BenchmarkOptions::default());
        for metrics in [&result.heuristic.metrics, &result.waio.metrics] {
            assert_eq!(metrics.network_time, 320.0);
            assert_eq!(metrics.dom_parse_time, 12.0);
            assert_eq!(metrics.response_size, 2048);
            assert_eq!(metrics.status_code, 200);
            assert_eq!(
                metrics.total_time,
                metrics.network_time + metrics.dom_parse_time + metrics.cognitive_time
            );
        }
    }

    #[test]
    fn test_bot_preference_applies_only_with_markup() {
        let options = BenchmarkOptions::default().with_bot(BotType::GptBot, SimulationMode::WaioTheory);
        let engine = Engine::default();

        let with = engine.run(PAGE, &FetchMeasurements::default(), &options);
        assert_eq!(with.preference_modifier, 1.2);
        assert_eq!(with.bot, Some(BotType::GptBot));

        let plain = "<html><body><h1>No markers</h1></body></html>";
        let without = engine.run(plain, &FetchMeasurements::default(), &options);
        assert_eq!(without.preference_modifier, 1.0);
        assert_eq!(without.gain_percent, 0.0);
    }

    #[test]
    fn test_url_is_normalized() {
        let options = BenchmarkOptions::default()
            .with_url("HTTPS://Example.com/post")
            .unwrap();
        let result = Engine::default().run(PAGE, &FetchMeasurements::default(), &options);
        assert_eq!(result.url.as_deref(), Some("https://example.com/post"));

        assert!(BenchmarkOptions::default().with_url("not a url").is_err());
    }

    #[test]
    fn test_default_engine_matches_validated_engine() {
        let default = Engine::default();
        assert!(default.config().validate().is_ok());
        let validated = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(default.config(), validated.config());
        assert!(std::ptr::eq(default.vocabulary, validated.vocabulary));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.cost.baseline_ms = -5.0;
        assert!(Engine::new(config).is_err());
        assert!(Engine::new(EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_binary_input_keeps_full_shape() {
        let engine = Engine::default();
        let result = engine.run_bytes(
            &[0x00, 0xff, 0x13, 0x37],
            &FetchMeasurements::default(),
            &BenchmarkOptions::default(),
        );
        assert_eq!(result.merged.fields.count_found(), 0);
        assert_eq!(result.gain_percent, 0.0);

        let json = serde_json::to_value(&result).unwrap();
        for key in ["heuristic", "waio", "merged", "speedup_ratio", "gain_percent"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
