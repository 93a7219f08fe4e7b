//! Target fields and the explicit marker vocabulary
//!
//! Markers are `data-ai-*` attributes (plus `data-importance`) whose values
//! come from small closed vocabularies. Lookups go through static tables so
//! the whole vocabulary can be validated once at startup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the three fields every strategy tries to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Summary,
    MainContent,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Title, Field::Summary, Field::MainContent];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Summary => "summary",
            Field::MainContent => "main_content",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values of `data-ai-category` / `data-ai-entity-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Headline,
    Title,
    Subheadline,
    Summary,
    Introduction,
    Description,
    Abstract,
    Body,
    Section,
    Article,
    Content,
    Main,
    Navigation,
    Sidebar,
    Footer,
    Author,
    Date,
}

/// Values of `data-ai-intent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Article,
    Informational,
    Navigational,
    Transactional,
    Commercial,
    Support,
}

/// Values of `data-ai-confidence`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Values of `data-importance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

/// A recognized marker attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Category(Category),
    Intent(Intent),
    Confidence(Confidence),
    Importance(Importance),
    /// `data-ai-title` and friends: names the field directly
    Direct(Field),
}

/// The fixed marker vocabulary and category→field mapping table
#[derive(Debug)]
pub struct Vocabulary {
    pub prefix: &'static str,
    pub importance_attr: &'static str,
    pub category_attrs: &'static [&'static str],
    pub intent_attr: &'static str,
    pub confidence_attr: &'static str,
    pub categories: &'static [(&'static str, Category)],
    pub intents: &'static [(&'static str, Intent)],
    pub confidences: &'static [(&'static str, Confidence)],
    pub importances: &'static [(&'static str, Importance)],
    pub direct_markers: &'static [(&'static str, Field)],
    pub field_rules: &'static [(Category, Field)],
    /// Intents that turn an element into a structural container
    pub scope_intents: &'static [Intent],
}

static STANDARD: Vocabulary = Vocabulary {
    prefix: "data-ai-",
    importance_attr: "data-importance",
    category_attrs: &["data-ai-category", "data-ai-entity-type"],
    intent_attr: "data-ai-intent",
    confidence_attr: "data-ai-confidence",
    categories: &[
        ("headline", Category::Headline),
        ("title", Category::Title),
        ("subheadline", Category::Subheadline),
        ("summary", Category::Summary),
        ("introduction", Category::Introduction),
        ("description", Category::Description),
        ("abstract", Category::Abstract),
        ("body", Category::Body),
        ("section", Category::Section),
        ("article", Category::Article),
        ("content", Category::Content),
        ("main", Category::Main),
        ("navigation", Category::Navigation),
        ("sidebar", Category::Sidebar),
        ("footer", Category::Footer),
        ("author", Category::Author),
        ("date", Category::Date),
    ],
    intents: &[
        ("article", Intent::Article),
        ("informational", Intent::Informational),
        ("navigational", Intent::Navigational),
        ("transactional", Intent::Transactional),
        ("commercial", Intent::Commercial),
        ("support", Intent::Support),
    ],
    confidences: &[
        ("high", Confidence::High),
        ("medium", Confidence::Medium),
        ("low", Confidence::Low),
    ],
    importances: &[
        ("critical", Importance::Critical),
        ("high", Importance::High),
        ("medium", Importance::Medium),
        ("low", Importance::Low),
    ],
    direct_markers: &[
        ("data-ai-title", Field::Title),
        ("data-ai-summary", Field::Summary),
        ("data-ai-description", Field::Summary),
        ("data-ai-content", Field::MainContent),
        ("data-ai-main", Field::MainContent),
        ("data-ai-article", Field::MainContent),
    ],
    field_rules: &[
        (Category::Headline, Field::Title),
        (Category::Title, Field::Title),
        (Category::Summary, Field::Summary),
        (Category::Introduction, Field::Summary),
        (Category::Description, Field::Summary),
        (Category::Abstract, Field::Summary),
        (Category::Body, Field::MainContent),
        (Category::Section, Field::MainContent),
        (Category::Article, Field::MainContent),
        (Category::Content, Field::MainContent),
        (Category::Main, Field::MainContent),
    ],
    scope_intents: &[Intent::Article],
};

/// The process-wide vocabulary. Immutable for the life of the process.
pub fn vocabulary() -> &'static Vocabulary {
    &STANDARD
}

fn lookup<T: Copy>(table: &[(&'static str, T)], value: &str) -> Option<T> {
    let value = value.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, v)| *v)
}

fn check_table<T>(name: &'static str, table: &[(&'static str, T)]) -> Result<(), ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::EmptyVocabulary(name));
    }
    for (i, (value, _)) in table.iter().enumerate() {
        if table[..i].iter().any(|(seen, _)| seen.eq_ignore_ascii_case(value)) {
            return Err(ConfigError::DuplicateValue {
                table: name,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

impl Vocabulary {
    /// Whether an attribute name follows the marker naming convention
    pub fn is_marker_attr(&self, name: &str) -> bool {
        name.starts_with(self.prefix) || name == self.importance_attr
    }

    /// Classify one attribute. `None` means the attribute is not a marker or
    /// its value is outside the vocabulary.
    pub fn classify(&self, name: &str, value: &str) -> Option<Marker> {
        if self.category_attrs.contains(&name) {
            return self.category(value).map(Marker::Category);
        }
        if name == self.intent_attr {
            return lookup(self.intents, value).map(Marker::Intent);
        }
        if name == self.confidence_attr {
            return lookup(self.confidences, value).map(Marker::Confidence);
        }
        if name == self.importance_attr {
            return lookup(self.importances, value).map(Marker::Importance);
        }
        self.direct_markers
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, field)| Marker::Direct(*field))
    }

    /// Category named by a `data-ai-category` / `data-ai-entity-type` value
    pub fn category(&self, value: &str) -> Option<Category> {
        lookup(self.categories, value)
    }

    /// Field a category feeds, if any
    pub fn field_for(&self, category: Category) -> Option<Field> {
        self.field_rules
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, f)| *f)
    }

    pub fn is_scope_intent(&self, intent: Intent) -> bool {
        self.scope_intents.contains(&intent)
    }

    /// Check the tables are non-empty, duplicate-free and cover every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyVocabulary("prefix"));
        }
        if self.category_attrs.is_empty() {
            return Err(ConfigError::EmptyVocabulary("category attributes"));
        }
        check_table("categories", self.categories)?;
        check_table("intents", self.intents)?;
        check_table("confidences", self.confidences)?;
        check_table("importances", self.importances)?;
        check_table("direct markers", self.direct_markers)?;
        if self.field_rules.is_empty() {
            return Err(ConfigError::EmptyVocabulary("field rules"));
        }

        for (category, _) in self.field_rules {
            if !self.categories.iter().any(|(_, c)| c == category) {
                return Err(ConfigError::UnknownCategory(*category));
            }
        }

        for field in Field::ALL {
            let by_category = self.field_rules.iter().any(|(_, f)| *f == field);
            let by_direct = self.direct_markers.iter().any(|(_, f)| *f == field);
            if !by_category && !by_direct {
                return Err(ConfigError::UnmappedField(field));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_vocabulary_is_valid() {
        let vocab = vocabulary();
        assert!(vocab.validate().is_ok());
        assert_eq!(vocab.categories.len(), 17);
    }

    #[test]
    fn test_classify_markers() {
        let vocab = vocabulary();
        assert_eq!(
            vocab.classify("data-ai-category", "headline"),
            Some(Marker::Category(Category::Headline))
        );
        // entity types from schema-style markup are capitalized
        assert_eq!(
            vocab.classify("data-ai-entity-type", "Title"),
            Some(Marker::Category(Category::Title))
        );
        assert_eq!(
            vocab.classify("data-importance", "critical"),
            Some(Marker::Importance(Importance::Critical))
        );
        assert_eq!(
            vocab.classify("data-ai-title", ""),
            Some(Marker::Direct(Field::Title))
        );
        assert_eq!(vocab.classify("data-ai-category", "banner-ad"), None);
        assert_eq!(vocab.classify("data-ai-unknown", "x"), None);
    }

    #[test]
    fn test_marker_attr_convention() {
        let vocab = vocabulary();
        assert!(vocab.is_marker_attr("data-ai-anything"));
        assert!(vocab.is_marker_attr("data-importance"));
        assert!(!vocab.is_marker_attr("data-id"));
        assert!(!vocab.is_marker_attr("class"));
    }

    #[test]
    fn test_field_mapping() {
        let vocab = vocabulary();
        assert_eq!(vocab.field_for(Category::Headline), Some(Field::Title));
        assert_eq!(vocab.field_for(Category::Abstract), Some(Field::Summary));
        assert_eq!(vocab.field_for(Category::Section), Some(Field::MainContent));
        assert_eq!(vocab.field_for(Category::Navigation), None);
        assert_eq!(vocab.field_for(Category::Subheadline), None);
    }

    #[test]
    fn test_empty_table_rejected() {
        let broken = Vocabulary {
            intents: &[],
            ..copy_of_standard()
        };
        assert_eq!(
            broken.validate(),
            Err(ConfigError::EmptyVocabulary("intents"))
        );
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let broken = Vocabulary {
            confidences: &[("high", Confidence::High), ("HIGH", Confidence::Low)],
            ..copy_of_standard()
        };
        assert!(matches!(
            broken.validate(),
            Err(ConfigError::DuplicateValue { table: "confidences", .. })
        ));
    }

    #[test]
    fn test_unmapped_field_rejected() {
        let broken = Vocabulary {
            field_rules: &[(Category::Headline, Field::Title)],
            direct_markers: &[("data-ai-title", Field::Title)],
            ..copy_of_standard()
        };
        assert_eq!(
            broken.validate(),
            Err(ConfigError::UnmappedField(Field::Summary))
        );
    }

    #[test]
    fn test_unknown_category_in_rules_rejected() {
        let broken = Vocabulary {
            categories: &[("headline", Category::Headline)],
            ..copy_of_standard()
        };
        assert!(matches!(
            broken.validate(),
            Err(ConfigError::UnknownCategory(_))
        ));
    }

    fn copy_of_standard() -> Vocabulary {
        let s = vocabulary();
        Vocabulary {
            prefix: s.prefix,
            importance_attr: s.importance_attr,
            category_attrs: s.category_attrs,
            intent_attr: s.intent_attr,
            confidence_attr: s.confidence_attr,
            categories: s.categories,
            intents: s.intents,
            confidences: s.confidences,
            importances: s.importances,
            direct_markers: s.direct_markers,
            field_rules: s.field_rules,
            scope_intents: s.scope_intents,
        }
    }
}
