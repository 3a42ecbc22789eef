use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of a media item returned by the search stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResultId(String);

impl SearchResultId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL handed to the media resolution service.
    pub fn canonical_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for SearchResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SearchResultId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One streamable encoding of a media item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaVariant {
    /// Set when the descriptor carried a video bitrate.
    pub has_video: bool,
    pub container: String,
    pub audio_encoding: String,
    /// Malformed or missing values are stored as 0.
    pub audio_bitrate: u32,
    pub stream_url: String,
}

impl MediaVariant {
    /// Audio-only M4A container with AAC audio.
    pub fn is_compatible_audio(&self) -> bool {
        !self.has_video && self.container == "m4a" && self.audio_encoding == "aac"
    }
}

/// Metadata for a resolved media item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub id: Option<String>,
    pub title: String,
    pub duration_secs: u64,
}

/// A resolved media item with every candidate variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub info: MediaInfo,
    pub variants: Vec<MediaVariant>,
}

/// Which stage produced a [`PipelineFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network error or unexpected status from an upstream service.
    Transport,
    /// Search succeeded but yielded nothing usable.
    NoResults,
    /// Resolution succeeded but no variant fits the audio policy.
    NoCompatibleFormat,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::NoResults => "no_results",
            Self::NoCompatibleFormat => "no_compatible_format",
        }
    }
}

/// Terminal, user-facing failure of a fulfillment run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct PipelineFailure {
    pub kind: FailureKind,
    pub message: String,
    pub end_session: bool,
}

impl PipelineFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            end_session: true,
        }
    }

    pub fn search_failed() -> Self {
        Self::new(
            FailureKind::Transport,
            "Sorry, searching YouTube failed. Try again later.",
        )
    }

    pub fn no_results() -> Self {
        Self::new(
            FailureKind::NoResults,
            "Sorry, didn't find any results for that search. Try a different search.",
        )
    }

    pub fn resolve_failed() -> Self {
        Self::new(
            FailureKind::Transport,
            "Sorry, I couldn't load that video. Try again later.",
        )
    }

    pub fn no_compatible_format() -> Self {
        Self::new(
            FailureKind::NoCompatibleFormat,
            "Sorry, this video didn't have a compatible audio file available.",
        )
    }
}

/// Successful fulfillment: something to say and, usually, something to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentResult {
    pub text: String,
    pub audio_url: Option<String>,
}

/// Uniform reply handed to the response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub end_session: bool,
    #[serde(default)]
    pub pause: bool,
}

impl SkillReply {
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn ending(mut self) -> Self {
        self.end_session = true;
        self
    }

    pub fn pausing(mut self) -> Self {
        self.pause = true;
        self
    }
}

impl From<FulfillmentResult> for SkillReply {
    fn from(result: FulfillmentResult) -> Self {
        Self {
            text: Some(result.text),
            audio_url: result.audio_url,
            end_session: false,
            pause: false,
        }
    }
}

impl From<PipelineFailure> for SkillReply {
    fn from(failure: PipelineFailure) -> Self {
        Self {
            text: Some(failure.message),
            audio_url: None,
            end_session: failure.end_session,
            pause: false,
        }
    }
}

impl From<Result<FulfillmentResult, PipelineFailure>> for SkillReply {
    fn from(outcome: Result<FulfillmentResult, PipelineFailure>) -> Self {
        match outcome {
            Ok(result) => result.into(),
            Err(failure) => failure.into(),
        }
    }
}
