//! Search → resolve → select fulfillment pipeline.

use std::sync::Arc;

use tracing::{debug, info};

use voxtube_core::types::{FulfillmentResult, PipelineFailure};
use voxtube_media::{MediaResolver, select_best_audio_format};
use voxtube_search::SearchBackend;

/// Runs the three fulfillment stages in order, stopping at the first failure.
///
/// Holds no mutable state; one pipeline serves any number of concurrent
/// invocations.
#[derive(Clone)]
pub struct FulfillmentPipeline {
    search: Arc<dyn SearchBackend>,
    resolver: Arc<dyn MediaResolver>,
}

impl FulfillmentPipeline {
    pub fn new(search: Arc<dyn SearchBackend>, resolver: Arc<dyn MediaResolver>) -> Self {
        Self { search, resolver }
    }

    /// Find something to play for `terms`.
    ///
    /// Only the top search result is resolved. Resolver failures are
    /// returned as the resolver produced them.
    pub async fn fulfill_search(&self, terms: &str) -> Result<FulfillmentResult, PipelineFailure> {
        let results = self.search.search(terms).await?;
        let top = results.first().ok_or_else(PipelineFailure::no_results)?;
        debug!(%top, candidates = results.len(), "Search stage done");

        let resolved = self.resolver.resolve(top).await?;
        debug!(%top, variants = resolved.variants.len(), "Resolve stage done");

        let best = select_best_audio_format(&resolved.variants)
            .ok_or_else(PipelineFailure::no_compatible_format)?;
        info!(
            container = %best.container,
            encoding = %best.audio_encoding,
            bitrate = best.audio_bitrate,
            "Found a format to use"
        );

        info!(%top, title = %resolved.info.title, "Playing");
        Ok(FulfillmentResult {
            text: format!("Playing {}", resolved.info.title),
            audio_url: Some(best.stream_url.clone()),
        })
    }
}
