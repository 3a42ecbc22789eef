//! Outbound response envelope with speech and audio player directives.

use serde::{Deserialize, Serialize};

use voxtube_core::types::SkillReply;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Directive {
    #[serde(rename = "AudioPlayer.Play", rename_all = "camelCase")]
    Play {
        play_behavior: String,
        audio_item: AudioItem,
    },
    #[serde(rename = "AudioPlayer.ClearQueue", rename_all = "camelCase")]
    ClearQueue { clear_behavior: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioItem {
    pub stream: AudioStream,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    pub token: String,
    pub url: String,
}

impl Directive {
    /// Replace whatever is playing with `url`. The URL doubles as the stream token.
    pub fn play(url: &str) -> Self {
        Self::Play {
            play_behavior: "REPLACE_ALL".into(),
            audio_item: AudioItem {
                stream: AudioStream {
                    token: url.to_string(),
                    url: url.to_string(),
                },
            },
        }
    }

    pub fn clear_queue() -> Self {
        Self::ClearQueue {
            clear_behavior: "CLEAR_ALL".into(),
        }
    }
}

impl From<&SkillReply> for SkillResponse {
    fn from(reply: &SkillReply) -> Self {
        let mut directives = Vec::new();
        if let Some(url) = reply.audio_url.as_deref().filter(|u| !u.is_empty()) {
            directives.push(Directive::play(url));
        }
        if reply.pause {
            directives.push(Directive::clear_queue());
        }

        Self {
            version: "1.0".into(),
            response: ResponseBody {
                output_speech: reply
                    .text
                    .as_ref()
                    .filter(|t| !t.is_empty())
                    .map(|text| OutputSpeech {
                        kind: "PlainText".into(),
                        text: text.clone(),
                    }),
                should_end_session: reply.end_session.then_some(true),
                directives,
            },
        }
    }
}

impl From<SkillReply> for SkillResponse {
    fn from(reply: SkillReply) -> Self {
        Self::from(&reply)
    }
}
