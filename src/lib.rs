//! Dual extraction and scoring engine for AI-oriented HTML markup
//!
//! Extracts title, summary and main content from a page twice:
//! - heuristically, from structure and text density alone
//! - from explicit `data-ai-*` markers placed by the author
//!
//! and prices both outcomes with a simple cognitive cost model so the
//! benefit of the markers can be measured. A C ABI over JSON is provided
//! for embedding hosts.

pub mod benchmark;
pub mod config;
pub mod cost;
pub mod document;
mod error;
pub mod extractors;
pub mod ffi;
pub mod preference;
pub mod vocabulary;

pub use benchmark::{BenchmarkOptions, ComparisonResult, Engine, StrategyReport};
pub use config::EngineConfig;
pub use cost::{CostMetrics, FetchMeasurements};
pub use document::Document;
pub use error::{ConfigError, ExtractError};
pub use extractors::{ExtractionResult, FieldOutcome, Provenance};
pub use preference::{BotType, SimulationMode};
pub use vocabulary::Field;

/// Heuristic extraction with the default configuration
pub fn extract_heuristic(html: &str) -> ExtractionResult {
    Engine::default().extract_heuristic(html)
}

/// Explicit-marker extraction with the default configuration
pub fn extract_markup(html: &str) -> ExtractionResult {
    Engine::default().extract_markup(html)
}

/// Price and merge two results produced earlier
pub fn compare(
    heuristic: &ExtractionResult,
    waio: &ExtractionResult,
    fetch: &FetchMeasurements,
    options: &BenchmarkOptions,
) -> ComparisonResult {
    Engine::default().compare(heuristic, waio, fetch, options)
}

/// Run both strategies over `html` and compare them
pub fn run_benchmark(
    html: &str,
    fetch: &FetchMeasurements,
    options: &BenchmarkOptions,
) -> ComparisonResult {
    Engine::default().run(html, fetch, options)
}
