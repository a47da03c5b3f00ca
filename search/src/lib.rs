//! # Search
//!
//! Web search as a polymorphic capability: an ordered list of
//! [`SearchProvider`] implementations is tried until one returns a non-empty
//! result list. No merging, no deduplication, no ranking.
//!
//! Providers: Serper and Brave (key-gated JSON APIs) and a keyless
//! DuckDuckGo HTML scrape as the last resort. Each provider owns the parsing
//! of its own response shape into [`SearchResult`].

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

mod fallback;
mod providers;

pub use fallback::FallbackSearch;
pub use providers::{BraveProvider, DuckDuckGoProvider, SerperProvider};

/// Bounded wait for every outbound search request.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(12);

/// One search hit in the common shape all providers map into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A single search backend. Implementations are tried in order by
/// [`FallbackSearch`]; an error or empty result moves on to the next one.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// Builds the shared HTTP client with the bounded search timeout.
pub(crate) fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(SEARCH_TIMEOUT)
        .build()?)
}
