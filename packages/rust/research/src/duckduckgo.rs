//! DuckDuckGo search backend.
//!
//! Uses the keyless HTML interface: POST the query as a form, then scrape the
//! result blocks out of the returned page.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use seowriter_shared::{ResearchConfig, Result, SearchHit, SeoWriterError};

use crate::SearchBackend;

/// Browser-like User-Agent; the HTML endpoint rejects obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static RESULT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.result:not(.result--ad)").expect("valid selector"));
static TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid selector"));
static SNIPPET_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").expect("valid selector"));

/// DuckDuckGo HTML search backend (no API key required).
pub struct DuckDuckGo {
    client: Client,
    endpoint: String,
    region: String,
}

impl DuckDuckGo {
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SeoWriterError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            region: config.region.clone(),
        })
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGo {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("q", query), ("kl", self.region.as_str())])
            .send()
            .await
            .map_err(|e| SeoWriterError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeoWriterError::Network(format!(
                "{}: HTTP {status}",
                self.endpoint
            )));
        }

        let body = response.text().await.map_err(|e| {
            SeoWriterError::Network(format!("{}: failed to read body: {e}", self.endpoint))
        })?;

        let hits = parse_results(&body, max_results);
        debug!(hits = hits.len(), "parsed DuckDuckGo results");
        Ok(hits)
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}

// ---------------------------------------------------------------------------
// HTML parsing
// ---------------------------------------------------------------------------

/// Extract up to `max_results` hits from a DuckDuckGo HTML results page.
fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let doc = Html::parse_document(html);

    doc.select(&RESULT_SEL)
        .filter_map(|block| {
            let link = block.select(&TITLE_SEL).next()?;
            let url = resolve_result_url(link.value().attr("href")?)?;
            let title = element_text(link);
            if title.is_empty() {
                return None;
            }
            let snippet = block
                .select(&SNIPPET_SEL)
                .next()
                .map(element_text)
                .unwrap_or_default();

            Some(SearchHit {
                title,
                url,
                snippet,
            })
        })
        .take(max_results)
        .collect()
}

/// Visible text of an element with whitespace runs collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwrap DuckDuckGo's `/l/?uddg=<target>` redirect links.
///
/// Returns `None` for anything that does not end up at an http(s) URL.
fn resolve_result_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;

    let target = match parsed.query_pairs().find(|(k, _)| k == "uddg") {
        Some((_, target)) => Url::parse(&target).ok()?,
        None => parsed,
    };

    matches!(target.scheme(), "http" | "https").then(|| target.to_string())
}
