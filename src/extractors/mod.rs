//! Field extraction strategies
//!
//! Both strategies produce the same [`ExtractionResult`] shape so they can
//! be scored and merged side by side.

mod heuristic;
mod markup;
mod meta;

pub use heuristic::*;
pub use markup::*;
pub use meta::*;

use serde::{Deserialize, Serialize};

use crate::vocabulary::Field;

/// Which strategy supplied a reported value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Waio,
    Heuristic,
}

/// Outcome for a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOutcome {
    pub value: Option<String>,
    pub found: bool,
    pub provenance: Provenance,
}

impl FieldOutcome {
    pub fn unresolved() -> Self {
        Self {
            value: None,
            found: false,
            provenance: Provenance::Heuristic,
        }
    }

    pub fn resolved(value: String, provenance: Provenance) -> Self {
        Self {
            value: Some(value),
            found: true,
            provenance,
        }
    }

    /// Resolved when `value` is present, unresolved otherwise
    pub fn from_option(value: Option<String>, provenance: Provenance) -> Self {
        match value {
            Some(v) => Self::resolved(v, provenance),
            None => Self::unresolved(),
        }
    }
}

impl Default for FieldOutcome {
    fn default() -> Self {
        Self::unresolved()
    }
}

/// One outcome per target field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fields {
    pub title: FieldOutcome,
    pub summary: FieldOutcome,
    pub main_content: FieldOutcome,
}

impl Fields {
    pub fn get(&self, field: Field) -> &FieldOutcome {
        match field {
            Field::Title => &self.title,
            Field::Summary => &self.summary,
            Field::MainContent => &self.main_content,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut FieldOutcome {
        match field {
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::MainContent => &mut self.main_content,
        }
    }

    /// Resolved fields carrying the given provenance
    pub fn count_by(&self, provenance: Provenance) -> usize {
        Field::ALL
            .iter()
            .filter(|f| {
                let outcome = self.get(**f);
                outcome.found && outcome.provenance == provenance
            })
            .count()
    }

    pub fn count_found(&self) -> usize {
        Field::ALL.iter().filter(|f| self.get(**f).found).count()
    }
}

/// A marker attribute seen in the document, recognized or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRecord {
    pub tag: String,
    pub name: String,
    pub value: String,
}

/// Why the locator picked a value for a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionNote {
    pub field: Field,
    pub rule: String,
}

/// Result of one extraction strategy over one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(flatten)]
    pub fields: Fields,
    pub markup_detected: bool,
    pub markers_found: Vec<MarkerRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection_notes: Vec<SelectionNote>,
    /// Percentage of fields supplied by explicit markers
    pub integrity_score: f64,
}

impl ExtractionResult {
    /// All fields unresolved, no markup. Used when a document cannot be read.
    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn new(
        fields: Fields,
        markup_detected: bool,
        markers_found: Vec<MarkerRecord>,
        selection_notes: Vec<SelectionNote>,
    ) -> Self {
        let integrity_score =
            fields.count_by(Provenance::Waio) as f64 / Field::ALL.len() as f64 * 100.0;
        Self {
            fields,
            markup_detected,
            markers_found,
            selection_notes,
            integrity_score,
        }
    }

    pub fn field(&self, field: Field) -> &FieldOutcome {
        self.fields.get(field)
    }

    /// Number of fields resolved through explicit markers
    pub fn resolved_via_markup(&self) -> usize {
        self.fields.count_by(Provenance::Waio)
    }
}
