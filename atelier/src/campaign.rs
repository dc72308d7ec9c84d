//! Campaign payloads flowing through the chain.
//!
//! Every step consumes and produces one of these shapes. Parsing is
//! permissive: containers default missing fields and ignore unknown ones, so
//! a slightly off-schema model reply still flows through the chain instead
//! of failing the run.

use serde::{Deserialize, Serialize};

/// Audience used when the form leaves the field blank.
pub const DEFAULT_AUDIENCE: &str = "People in Riyadh, Saudi Arabia";

/// Output language for consumer-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    #[default]
    English,
    Arabic,
}

impl Language {
    /// Loose parser: "arabic"/"ar" in any case is Arabic, everything else is
    /// English. Model replies and form values both go through here.
    pub fn from_name(s: &str) -> Self {
        let s = s.trim();
        if s.eq_ignore_ascii_case("arabic") || s.eq_ignore_ascii_case("ar") {
            Language::Arabic
        } else {
            Language::English
        }
    }

    /// Canonical name used in prompts and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Language::from_name(&s))
    }
}

/// Raw form inputs before defaulting and normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBrief {
    pub product: String,
    pub description: String,
    pub audience: String,
    pub tone: String,
    pub language: Language,
}

impl RawBrief {
    /// Applies the blank-field rule: the audience is trimmed, and when empty
    /// it becomes [`DEFAULT_AUDIENCE`]. Other fields pass through as typed.
    pub fn with_defaults(mut self) -> Self {
        let audience = self.audience.trim();
        self.audience = if audience.is_empty() {
            DEFAULT_AUDIENCE.to_string()
        } else {
            audience.to_string()
        };
        self
    }
}

/// Normalized brief, the output of the first chain step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Brief {
    pub product: String,
    pub description: String,
    pub audience: String,
    pub tone: String,
    pub language: Language,
    pub objectives: Vec<String>,
    pub constraints: Vec<String>,
}

/// Market intelligence categories for the KSA market (step 2).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketInsights {
    pub cultural_moments: Vec<String>,
    pub local_trends: Vec<String>,
    pub target_behaviors: Vec<String>,
    pub competitive_landscape: Vec<String>,
    pub opportunities: Vec<String>,
    pub seasonal_relevance: Vec<String>,
}

/// Step 2 reply wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketReport {
    pub market_insights: MarketInsights,
}

/// One creative angle (step 3 produces exactly five).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Angle {
    pub id: String,
    pub title: String,
    pub insight: String,
    pub key_message: String,
    pub cultural_hook: String,
    pub timing_consideration: String,
}

/// Step 3 reply wrapper.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleSet {
    pub angles: Vec<Angle>,
}

/// Platform captions for one idea.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Captions {
    pub instagram: String,
    pub x: String,
}

/// One campaign idea (steps 4 through 7 carry exactly three, labeled A/B/C).
///
/// `compliance_notes` only exists once the compliance step has added it;
/// it stays out of serialized payloads while empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Idea {
    pub label: String,
    pub based_on_angle_id: String,
    pub tagline: String,
    pub script_30s: String,
    pub captions: Captions,
    pub cta: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub compliance_notes: String,
}

/// Reply wrapper for the idea-carrying steps (4, 5, 6, 7).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaSet {
    pub ideas: Vec<Idea>,
}

/// Everything one chain run produced, kept in memory for the request and
/// exposed by the JSON API and the CLI's `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    pub brief: Brief,
    pub market_insights: MarketInsights,
    pub angles: Vec<Angle>,
    pub ideas: Vec<Idea>,
    pub markdown: String,
}
