//! Web research collection.
//!
//! Before planning an article we ask a web search backend for the top results
//! on the keyword and keep their titles, URLs and snippets as context for the
//! AI prompts. Research is enrichment, not a correctness requirement: any
//! backend failure degrades to an empty [`ResearchResult`] instead of aborting
//! the run.

mod duckduckgo;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use seowriter_shared::{Outcome, ResearchConfig, ResearchResult, Result, SearchHit};

pub use duckduckgo::DuckDuckGo;

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// A web search backend.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Search the web for `query`, returning at most `max_results` hits.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Fail-open wrapper around a [`SearchBackend`].
pub struct ResearchCollector {
    backend: Box<dyn SearchBackend>,
    max_results: usize,
}

impl ResearchCollector {
    pub fn new(backend: Box<dyn SearchBackend>, max_results: usize) -> Self {
        Self {
            backend,
            max_results,
        }
    }

    /// Build a collector backed by DuckDuckGo from the `[research]` config.
    pub fn from_config(config: &ResearchConfig) -> Result<Self> {
        let backend = DuckDuckGo::new(config)?;
        Ok(Self::new(Box::new(backend), config.max_results))
    }

    /// Search with the configured result cap.
    pub async fn search(&self, query: &str) -> Outcome<ResearchResult> {
        self.search_limited(query, self.max_results).await
    }

    /// Search for `query`, capped at `max_results` records.
    ///
    /// Never fails: a backend error is logged and reported as
    /// [`Outcome::Fallback`] carrying an empty result.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn search_limited(&self, query: &str, max_results: usize) -> Outcome<ResearchResult> {
        if max_results == 0 {
            return Outcome::Fresh(ResearchResult::empty());
        }

        match self.backend.search(query, max_results).await {
            Ok(mut hits) => {
                hits.truncate(max_results);
                info!(results = hits.len(), "web research complete");
                Outcome::Fresh(ResearchResult::new(hits))
            }
            Err(e) => {
                warn!(error = %e, "error during web search, continuing without research");
                Outcome::Fallback {
                    value: ResearchResult::empty(),
                    reason: e.to_string(),
                }
            }
        }
    }
}
