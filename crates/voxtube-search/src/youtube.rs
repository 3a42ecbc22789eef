//! YouTube Data API v3 search backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};

use voxtube_core::config::SearchConfig;
use voxtube_core::error::{Result, VoxtubeError};
use voxtube_core::types::{PipelineFailure, SearchResultId};

use crate::{MAX_RESULTS, SearchBackend};

pub struct YouTubeSearch {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YouTubeSearch {
    pub fn new(config: &SearchConfig, api_key: String) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| VoxtubeError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
        })
    }

    /// Build from config, resolving the API key once at startup.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            VoxtubeError::Config(format!(
                "No search API key configured (set search.api_key or {})",
                config.api_key_env
            ))
        })?;
        Self::new(config, api_key)
    }
}

/// Extract video ids from a search response, skipping entries without one.
pub fn parse_search_results(body: &Value) -> Vec<SearchResultId> {
    let empty = vec![];
    let items = body["items"].as_array().unwrap_or(&empty);
    items
        .iter()
        .filter_map(|item| item["id"]["videoId"].as_str())
        .filter(|id| !id.is_empty())
        .map(SearchResultId::from)
        .collect()
}

#[async_trait]
impl SearchBackend for YouTubeSearch {
    async fn search(&self, terms: &str) -> std::result::Result<Vec<SearchResultId>, PipelineFailure> {
        debug!(terms, "Searching YouTube");

        let max_results = MAX_RESULTS.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("part", "id"),
                ("maxResults", max_results.as_str()),
                ("q", terms),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await;

        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Failed searching YouTube");
                return Err(PipelineFailure::search_failed());
            }
        };

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(%status, error = %e, "Failed reading YouTube search response");
                return Err(PipelineFailure::search_failed());
            }
        };
        if status != StatusCode::OK {
            warn!(%status, body = %body, "Failed searching YouTube");
            return Err(PipelineFailure::search_failed());
        }

        // A 200 with an unparseable body counts as an empty result set.
        let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let results = parse_search_results(&body);
        if results.is_empty() {
            debug!(terms, "Search returned no usable results");
            return Err(PipelineFailure::no_results());
        }

        info!(results = ?results, "Got search results");
        Ok(results)
    }
}
