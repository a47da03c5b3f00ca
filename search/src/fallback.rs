//! First-success selection over an ordered provider list.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{SearchProvider, SearchResult};

/// Tries providers in order; the first non-empty result list wins. A failing
/// or empty provider is skipped, never surfaced to the caller. When every
/// provider comes back empty, the overall result is an empty list.
#[derive(Clone, Default)]
pub struct FallbackSearch {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl FallbackSearch {
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        for provider in &self.providers {
            match provider.search(query, limit).await {
                Ok(results) if !results.is_empty() => {
                    info!(
                        provider = provider.name(),
                        count = results.len(),
                        "Search provider returned results"
                    );
                    return results;
                }
                Ok(_) => {
                    info!(provider = provider.name(), "Search provider returned nothing");
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Search provider failed");
                }
            }
        }
        Vec::new()
    }
}
