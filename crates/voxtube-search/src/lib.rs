//! Search stage of the fulfillment pipeline.
//!
//! Every search API implements [`SearchBackend`]; the production backend is
//! [`YouTubeSearch`].

use async_trait::async_trait;

use voxtube_core::types::{PipelineFailure, SearchResultId};

pub mod youtube;

pub use youtube::YouTubeSearch;

/// Maximum number of results requested from the search API.
pub const MAX_RESULTS: u32 = 3;

/// The search trait.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search for `terms`, returning result ids in rank order.
    ///
    /// Never returns an empty list: zero usable results is a
    /// [`FailureKind::NoResults`](voxtube_core::types::FailureKind) failure.
    async fn search(&self, terms: &str) -> Result<Vec<SearchResultId>, PipelineFailure>;
}
