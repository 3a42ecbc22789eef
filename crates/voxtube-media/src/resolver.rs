//! Media resolution: search result id → metadata plus candidate variants.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use voxtube_core::config::ResolverConfig;
use voxtube_core::error::{Result, VoxtubeError};
use voxtube_core::types::{MediaInfo, PipelineFailure, ResolvedMedia, SearchResultId};

use crate::format::parse_variants;

/// Resolves a search result into playable variants.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Fetch metadata and every variant for `id`. One attempt, no retries.
    async fn resolve(&self, id: &SearchResultId) -> std::result::Result<ResolvedMedia, PipelineFailure>;
}

/// Client for an HTTP resolution service speaking ytdl-style JSON.
///
/// Issues `GET <url>?url=<canonical watch url>` and expects
/// `{ title, length_seconds, video_id, formats: [...] }`.
pub struct HttpMediaResolver {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMediaResolver {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| VoxtubeError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.url.clone(),
        })
    }

    async fn fetch(&self, canonical_url: &str) -> std::result::Result<Value, String> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("url", canonical_url)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("HTTP {status}: {body}"));
        }

        resp.json::<Value>().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl MediaResolver for HttpMediaResolver {
    async fn resolve(&self, id: &SearchResultId) -> std::result::Result<ResolvedMedia, PipelineFailure> {
        let canonical_url = id.canonical_url();
        debug!(%id, url = %canonical_url, "Resolving media");

        let body = self.fetch(&canonical_url).await.map_err(|error| {
            warn!(%id, %error, "Failed resolving media");
            PipelineFailure::resolve_failed()
        })?;

        let resolved = ResolvedMedia {
            info: parse_media_info(&body),
            variants: parse_variants(&body),
        };
        debug!(%id, variants = resolved.variants.len(), "Resolved media");
        Ok(resolved)
    }
}

/// Extract title, duration, and id from a resolution response.
pub fn parse_media_info(body: &Value) -> MediaInfo {
    let duration_secs = match &body["length_seconds"] {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };

    MediaInfo {
        id: body["video_id"].as_str().map(str::to_string),
        title: body["title"].as_str().unwrap_or_default().to_string(),
        duration_secs,
    }
}
