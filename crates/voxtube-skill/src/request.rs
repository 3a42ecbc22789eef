//! Inbound skill request envelope.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Slot carrying the free-text search terms of `SearchIntent`.
pub const SEARCH_TERMS_SLOT: &str = "SearchTerms";

/// Intents the platform may send that have no implementation yet.
pub const UNIMPLEMENTED_INTENTS: &[&str] = &[
    "AMAZON.LoopOffIntent",
    "AMAZON.LoopOnIntent",
    "AMAZON.NextIntent",
    "AMAZON.PreviousIntent",
    "AMAZON.RepeatIntent",
    "AMAZON.ShuffleOffIntent",
    "AMAZON.ShuffleOnIntent",
    "AMAZON.StartOverIntent",
];

/// A request from the voice platform. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub request: RequestBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    /// e.g. "LaunchRequest", "IntentRequest".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// What the skill should do for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillAction {
    Launch,
    /// `None` when the search terms slot is missing or blank.
    Search(Option<String>),
    Pause,
    Resume,
    Unimplemented(String),
    Unknown,
}

impl SkillAction {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Launch => "launch",
            Self::Search(_) => "search",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Unimplemented(_) => "unimplemented",
            Self::Unknown => "unknown",
        }
    }
}

impl SkillRequest {
    pub fn intent_name(&self) -> Option<&str> {
        self.request.intent.as_ref().map(|i| i.name.as_str())
    }

    /// Value of a slot, ignoring blank values.
    pub fn slot_value(&self, slot: &str) -> Option<&str> {
        self.request
            .intent
            .as_ref()?
            .slots
            .get(slot)?
            .value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Classify the request. The launch check wins over any intent.
    pub fn action(&self) -> SkillAction {
        if self.request.kind == "LaunchRequest" {
            return SkillAction::Launch;
        }

        match self.intent_name() {
            Some("SearchIntent") => {
                SkillAction::Search(self.slot_value(SEARCH_TERMS_SLOT).map(str::to_string))
            }
            Some("AMAZON.PauseIntent") | Some("AMAZON.CancelIntent") => SkillAction::Pause,
            Some("AMAZON.ResumeIntent") => SkillAction::Resume,
            Some(name) if UNIMPLEMENTED_INTENTS.contains(&name) => {
                SkillAction::Unimplemented(name.to_string())
            }
            _ => SkillAction::Unknown,
        }
    }
}
