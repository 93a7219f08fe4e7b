//! Bot preference profiles and simulation modes
//!
//! Some crawlers favour particular schema types. When a page marks up a
//! type the selected bot prefers, the explicit-marker path gets an extra
//! speedup multiplier. How large depends on the simulation mode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extractors::MarkerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotType {
    #[serde(rename = "GPTBot")]
    GptBot,
    #[serde(rename = "ClaudeBot")]
    ClaudeBot,
    #[serde(rename = "ChatGPT-User")]
    ChatGptUser,
    #[serde(rename = "Googlebot")]
    Googlebot,
    #[serde(rename = "Google-Extended")]
    GoogleExtended,
    #[serde(rename = "Bingbot")]
    Bingbot,
    #[serde(rename = "PerplexityBot")]
    PerplexityBot,
    #[serde(rename = "YouBot")]
    YouBot,
    #[serde(rename = "MetaBot")]
    MetaBot,
}

impl BotType {
    pub const ALL: [BotType; 9] = [
        BotType::GptBot,
        BotType::ClaudeBot,
        BotType::ChatGptUser,
        BotType::Googlebot,
        BotType::GoogleExtended,
        BotType::Bingbot,
        BotType::PerplexityBot,
        BotType::YouBot,
        BotType::MetaBot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BotType::GptBot => "GPTBot",
            BotType::ClaudeBot => "ClaudeBot",
            BotType::ChatGptUser => "ChatGPT-User",
            BotType::Googlebot => "Googlebot",
            BotType::GoogleExtended => "Google-Extended",
            BotType::Bingbot => "Bingbot",
            BotType::PerplexityBot => "PerplexityBot",
            BotType::YouBot => "YouBot",
            BotType::MetaBot => "MetaBot",
        }
    }

    /// Look a bot up by its display name
    pub fn from_name(name: &str) -> Option<BotType> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }

    pub fn profile(self) -> &'static PreferenceProfile {
        match self {
            BotType::GptBot => &GPTBOT,
            BotType::ClaudeBot => &CLAUDEBOT,
            BotType::PerplexityBot => &PERPLEXITY,
            BotType::GoogleExtended => &GOOGLE_EXTENDED,
            BotType::Bingbot => &BINGBOT,
            BotType::Googlebot | BotType::ChatGptUser | BotType::YouBot | BotType::MetaBot => {
                &GENERAL
            }
        }
    }
}

impl fmt::Display for BotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationMode {
    /// Explicit markup is assumed faster to parse and bots skip aggressively
    #[default]
    #[serde(rename = "WAIO Theory")]
    WaioTheory,
    /// Structured data gives no parse advantage; preferences matter a little
    #[serde(rename = "Industry Consensus")]
    IndustryConsensus,
}

/// Schema types a bot prioritizes
#[derive(Debug)]
pub struct PreferenceProfile {
    pub schema_types: &'static [&'static str],
}

static GPTBOT: PreferenceProfile = PreferenceProfile {
    schema_types: &["FAQPage", "Article", "Product"],
};
static CLAUDEBOT: PreferenceProfile = PreferenceProfile {
    schema_types: &["Article", "FAQPage", "Review"],
};
static PERPLEXITY: PreferenceProfile = PreferenceProfile {
    schema_types: &["Article", "FAQPage", "Review"],
};
static GOOGLE_EXTENDED: PreferenceProfile = PreferenceProfile {
    schema_types: &["FAQPage", "Article", "Review", "Product"],
};
static BINGBOT: PreferenceProfile = PreferenceProfile {
    schema_types: &["Product", "LocalBusiness", "Review"],
};
static GENERAL: PreferenceProfile = PreferenceProfile { schema_types: &[] };

const MARKUP_BONUS: f64 = 1.2;
const THEORY_PREFERENCE_BONUS: f64 = 1.4;
const CONSENSUS_PREFERENCE_BONUS: f64 = 1.1;

impl PreferenceProfile {
    /// Whether any marker name or value mentions a preferred schema type
    pub fn matches(&self, markers: &[MarkerRecord]) -> bool {
        if markers.is_empty() {
            return false;
        }
        let haystack = markers
            .iter()
            .flat_map(|m| [m.name.as_str(), m.value.as_str()])
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        self.schema_types
            .iter()
            .any(|t| haystack.contains(&t.to_lowercase()))
    }
}

/// Speedup multiplier for the explicit-marker path (1.0 = no change).
/// Pages without markers never earn a bonus.
pub fn scoring_modifier(bot: BotType, mode: SimulationMode, markers: &[MarkerRecord]) -> f64 {
    if markers.is_empty() {
        return 1.0;
    }
    let preferred = bot.profile().matches(markers);

    match mode {
        SimulationMode::WaioTheory => {
            if preferred {
                MARKUP_BONUS * THEORY_PREFERENCE_BONUS
            } else {
                MARKUP_BONUS
            }
        }
        SimulationMode::IndustryConsensus => {
            if preferred {
                CONSENSUS_PREFERENCE_BONUS
            } else {
                1.0
            }
        }
    }
}
