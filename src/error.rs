//! Error types for the extraction engine

use thiserror::Error;

use crate::vocabulary::{Category, Field};

/// Per-document failures. Extractors recover from these locally and report
/// every field as unresolved; they never reach the caller of an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Input cannot be treated as HTML at all
    #[error("Malformed input: {reason}")]
    MalformedInput { reason: String },
}

/// Startup failures in the static vocabulary or the engine configuration.
/// These are fatal: an engine is never built from an invalid setup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A vocabulary table has no entries
    #[error("Marker vocabulary table is empty: {0}")]
    EmptyVocabulary(&'static str),

    /// The same value appears twice in one vocabulary table
    #[error("Duplicate marker value '{value}' in {table}")]
    DuplicateValue { table: &'static str, value: String },

    /// No category or direct marker maps to this field
    #[error("No marker rule maps to field '{0}'")]
    UnmappedField(Field),

    /// A mapping rule refers to a category missing from the category table
    #[error("Mapping rule refers to unknown category {0:?}")]
    UnknownCategory(Category),

    /// A numeric or textual setting is out of range
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// Configuration document could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}
