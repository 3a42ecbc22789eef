//! Maps skill requests to replies.

use std::sync::Arc;

use tracing::{debug, info};

use voxtube_core::config::Config;
use voxtube_core::error::Result;
use voxtube_core::types::SkillReply;
use voxtube_media::HttpMediaResolver;
use voxtube_search::YouTubeSearch;

use crate::pipeline::FulfillmentPipeline;
use crate::request::{SkillAction, SkillRequest};

/// The skill entry point. Stateless between requests.
#[derive(Clone)]
pub struct Skill {
    pipeline: FulfillmentPipeline,
}

impl Skill {
    pub fn new(pipeline: FulfillmentPipeline) -> Self {
        Self { pipeline }
    }

    /// Wire the YouTube search backend and HTTP resolver from config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = YouTubeSearch::from_config(&config.search())?;
        let resolver = HttpMediaResolver::new(&config.resolver())?;
        Ok(Self::new(FulfillmentPipeline::new(
            Arc::new(search),
            Arc::new(resolver),
        )))
    }

    pub fn pipeline(&self) -> &FulfillmentPipeline {
        &self.pipeline
    }

    /// Handle one request. Always produces a reply.
    pub async fn handle(&self, request: &SkillRequest) -> SkillReply {
        let action = request.action();
        info!(
            kind = %request.request.kind,
            intent = request.intent_name().unwrap_or("-"),
            action = action.label(),
            "Incoming request"
        );

        let reply = self.handle_action(action).await;
        debug!(?reply, "Responding");
        reply
    }

    pub async fn handle_action(&self, action: SkillAction) -> SkillReply {
        match action {
            SkillAction::Launch => SkillReply::speak("Tell me to play something or look for something"),
            SkillAction::Search(None) => {
                SkillReply::speak("Sorry, I couldn't understand what you said. Please ask again.").ending()
            }
            SkillAction::Search(Some(terms)) => self.pipeline.fulfill_search(&terms).await.into(),
            SkillAction::Pause => SkillReply::speak("Okay").pausing().ending(),
            SkillAction::Resume => SkillReply::speak("Hold on, not implemented yet").ending(),
            SkillAction::Unimplemented(_) => {
                SkillReply::speak("Sorry, that functionality hasn't been implemented")
            }
            SkillAction::Unknown => SkillReply::default().ending(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use voxtube_core::config::SearchConfig;
    use voxtube_core::types::PipelineFailure;

    use crate::pipeline::tests::{FakeResolver, FakeSearch, lofi_mix};
    use crate::response::SkillResponse;

    fn build_skill(search: FakeSearch, resolver: FakeResolver) -> (Skill, Arc<FakeSearch>, Arc<FakeResolver>) {
        let search = Arc::new(search);
        let resolver = Arc::new(resolver);
        let skill = Skill::new(FulfillmentPipeline::new(search.clone(), resolver.clone()));
        (skill, search, resolver)
    }

    fn search_request(terms: Option<&str>) -> SkillRequest {
        let slots = match terms {
            Some(t) => json!({"SearchTerms": {"name": "SearchTerms", "value": t}}),
            None => json!({"SearchTerms": {"name": "SearchTerms"}}),
        };
        serde_json::from_value(json!({
            "version": "1.0",
            "request": {
                "type": "IntentRequest",
                "intent": {"name": "SearchIntent", "slots": slots}
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_plays_audio() {
        let (skill, _, resolver) = build_skill(
            FakeSearch::returning(&["abc123", "def456", "ghi789"]),
            FakeResolver::default().with("abc123", Ok(lofi_mix())),
        );

        let reply = skill.handle(&search_request(Some("lofi beats"))).await;
        assert_eq!(reply.text.as_deref(), Some("Playing Lofi Mix"));
        assert_eq!(reply.audio_url.as_deref(), Some("u1"));
        assert!(!reply.end_session);
        assert_eq!(resolver.calls(), 1);
    }

    #[tokio::test]
    async fn test_search_without_terms_skips_pipeline() {
        let (skill, search, _) = build_skill(FakeSearch::returning(&["abc123"]), FakeResolver::default());

        let reply = skill.handle(&search_request(None)).await;
        assert_eq!(
            reply.text.as_deref(),
            Some("Sorry, I couldn't understand what you said. Please ask again.")
        );
        assert!(reply.end_session);
        assert_eq!(search.calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_search_failure_becomes_reply() {
        let (skill, _, _) = build_skill(
            FakeSearch::failing(PipelineFailure::search_failed()),
            FakeResolver::default(),
        );

        let response = SkillResponse::from(skill.handle(&search_request(Some("lofi beats"))).await);
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(
            value["response"]["outputSpeech"]["text"],
            "Sorry, searching YouTube failed. Try again later."
        );
        assert_eq!(value["response"]["shouldEndSession"], json!(true));
        assert_eq!(value["response"]["directives"], json!([]));
    }

    #[tokio::test]
    async fn test_fixed_replies() {
        let (skill, _, _) = build_skill(FakeSearch::returning(&[]), FakeResolver::default());

        let launch = skill.handle_action(SkillAction::Launch).await;
        assert_eq!(
            launch.text.as_deref(),
            Some("Tell me to play something or look for something")
        );
        assert!(!launch.end_session);

        let pause = skill.handle_action(SkillAction::Pause).await;
        assert_eq!(pause.text.as_deref(), Some("Okay"));
        assert!(pause.pause && pause.end_session);

        let resume = skill.handle_action(SkillAction::Resume).await;
        assert_eq!(resume.text.as_deref(), Some("Hold on, not implemented yet"));
        assert!(resume.end_session);

        let loop_on = skill
            .handle_action(SkillAction::Unimplemented("AMAZON.LoopOnIntent".into()))
            .await;
        assert_eq!(
            loop_on.text.as_deref(),
            Some("Sorry, that functionality hasn't been implemented")
        );
        assert!(!loop_on.end_session);

        let unknown = skill.handle_action(SkillAction::Unknown).await;
        assert_eq!(unknown, SkillReply::default().ending());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            search: Some(SearchConfig {
                api_key: Some("k".into()),
                ..SearchConfig::default()
            }),
            ..Config::default()
        };
        assert!(Skill::from_config(&config).is_ok());

        let config = Config {
            search: Some(SearchConfig {
                api_key_env: "NONEXISTENT_VT_SKILL_KEY".into(),
                ..SearchConfig::default()
            }),
            ..Config::default()
        };
        assert!(Skill::from_config(&config).is_err());
    }
}
