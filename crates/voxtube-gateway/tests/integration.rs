//! Gateway integration tests: start a real gateway and talk to it over HTTP.
//!
//! Run with: `cargo test -p voxtube-gateway --test integration`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use voxtube_core::config::{Config, GatewayConfig};
use voxtube_core::types::{MediaInfo, MediaVariant, PipelineFailure, ResolvedMedia, SearchResultId};
use voxtube_gateway::GatewayState;
use voxtube_media::MediaResolver;
use voxtube_search::SearchBackend;
use voxtube_skill::{FulfillmentPipeline, Skill};

/// Search fake keyed on the search terms.
struct ScriptedSearch;

#[async_trait]
impl SearchBackend for ScriptedSearch {
    async fn search(&self, terms: &str) -> Result<Vec<SearchResultId>, PipelineFailure> {
        match terms {
            "lofi beats" => Ok(vec!["abc123".into(), "def456".into(), "ghi789".into()]),
            "music videos" => Ok(vec!["vid001".into()]),
            "outage" => Err(PipelineFailure::search_failed()),
            _ => Err(PipelineFailure::no_results()),
        }
    }
}

struct ScriptedResolver;

#[async_trait]
impl MediaResolver for ScriptedResolver {
    async fn resolve(&self, id: &SearchResultId) -> Result<ResolvedMedia, PipelineFailure> {
        let video = MediaVariant {
            has_video: true,
            container: "mp4".into(),
            stream_url: "video-url".into(),
            ..MediaVariant::default()
        };
        match id.as_str() {
            "abc123" => Ok(ResolvedMedia {
                info: MediaInfo {
                    id: Some("abc123".into()),
                    title: "Lofi Mix".into(),
                    duration_secs: 3600,
                },
                variants: vec![
                    video,
                    MediaVariant {
                        has_video: false,
                        container: "m4a".into(),
                        audio_encoding: "aac".into(),
                        audio_bitrate: 128,
                        stream_url: "u1".into(),
                    },
                ],
            }),
            "vid001" => Ok(ResolvedMedia {
                info: MediaInfo {
                    title: "Clip".into(),
                    ..MediaInfo::default()
                },
                variants: vec![video],
            }),
            _ => Err(PipelineFailure::resolve_failed()),
        }
    }
}

/// Find an available port.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Start a gateway backed by the scripted fakes and return its port.
async fn start_test_gateway() -> u16 {
    let port = find_free_port();

    let config = Config {
        gateway: Some(GatewayConfig {
            port,
            bind: Some("127.0.0.1".into()),
            tls: None,
        }),
        ..Config::default()
    };
    let skill = Skill::new(FulfillmentPipeline::new(
        Arc::new(ScriptedSearch),
        Arc::new(ScriptedResolver),
    ));
    let state = Arc::new(GatewayState::new(Arc::new(config), skill));

    tokio::spawn(async move {
        let _ = voxtube_gateway::start_gateway(state, port).await;
    });

    // Wait for gateway to be ready
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .is_ok()
        {
            break;
        }
    }

    port
}

fn search_intent(terms: &str) -> serde_json::Value {
    json!({
        "version": "1.0",
        "session": {"new": true, "sessionId": "amzn1.echo-api.session.1"},
        "request": {
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.1",
            "intent": {
                "name": "SearchIntent",
                "slots": {"SearchTerms": {"name": "SearchTerms", "value": terms}}
            }
        }
    })
}

async fn post_skill(port: u16, body: &serde_json::Value) -> serde_json::Value {
    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/skill"))
        .json(body)
        .send()
        .await
        .expect("Skill request failed");
    assert!(resp.status().is_success());
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let port = start_test_gateway().await;

    let resp = reqwest::get(format!("http://127.0.0.1:{port}/health"))
        .await
        .expect("Health request failed");

    assert!(resp.status().is_success());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_search_plays_audio() {
    let port = start_test_gateway().await;

    let body = post_skill(port, &search_intent("lofi beats")).await;
    assert_eq!(
        body,
        json!({
            "version": "1.0",
            "response": {
                "outputSpeech": {"type": "PlainText", "text": "Playing Lofi Mix"},
                "directives": [{
                    "type": "AudioPlayer.Play",
                    "playBehavior": "REPLACE_ALL",
                    "audioItem": {"stream": {"token": "u1", "url": "u1"}}
                }]
            }
        })
    );
}

#[tokio::test]
async fn test_search_failures_end_session() {
    let port = start_test_gateway().await;

    let cases = [
        ("outage", "Sorry, searching YouTube failed. Try again later."),
        (
            "nothing at all",
            "Sorry, didn't find any results for that search. Try a different search.",
        ),
        (
            "music videos",
            "Sorry, this video didn't have a compatible audio file available.",
        ),
    ];

    for (terms, expected) in cases {
        let body = post_skill(port, &search_intent(terms)).await;
        assert_eq!(body["response"]["outputSpeech"]["text"], expected, "terms: {terms}");
        assert_eq!(body["response"]["shouldEndSession"], true, "terms: {terms}");
        assert_eq!(body["response"]["directives"], json!([]), "terms: {terms}");
    }
}

#[tokio::test]
async fn test_launch_and_pause() {
    let port = start_test_gateway().await;

    let launch = post_skill(port, &json!({"version": "1.0", "request": {"type": "LaunchRequest"}})).await;
    assert_eq!(
        launch["response"]["outputSpeech"]["text"],
        "Tell me to play something or look for something"
    );
    assert!(launch["response"].get("shouldEndSession").is_none());

    let pause = post_skill(
        port,
        &json!({"request": {"type": "IntentRequest", "intent": {"name": "AMAZON.PauseIntent"}}}),
    )
    .await;
    assert_eq!(pause["response"]["outputSpeech"]["text"], "Okay");
    assert_eq!(pause["response"]["shouldEndSession"], true);
    assert_eq!(
        pause["response"]["directives"][0]["type"],
        "AudioPlayer.ClearQueue"
    );
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let port = start_test_gateway().await;

    let resp = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{port}/skill"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}
