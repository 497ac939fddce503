//! Site-scoped web search against the DuckDuckGo HTML endpoint.

use crate::market::Market;
use crate::net::CachedFetcher;
use scraper::{Html, Selector};
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// Maximum number of result links returned per search.
pub const RESULT_LINK_LIMIT: usize = 5;

const DEFAULT_ENDPOINT: &str = "https://duckduckgo.com/html/";

/// Result link anchor on the DuckDuckGo HTML results page.
static RESULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").unwrap());

/// Search client returning candidate product-page URLs.
pub struct SearchEngine {
    cache: Arc<CachedFetcher>,
    endpoint: String,
    locale: &'static str,
}

impl SearchEngine {
    /// Creates a search engine for the given market.
    pub fn new(cache: Arc<CachedFetcher>, market: Market) -> Self {
        Self::with_endpoint(cache, market, DEFAULT_ENDPOINT)
    }

    /// Creates a search engine with a custom endpoint (for testing).
    pub fn with_endpoint(
        cache: Arc<CachedFetcher>,
        market: Market,
        endpoint: impl Into<String>,
    ) -> Self {
        Self { cache, endpoint: endpoint.into(), locale: market.search_locale() }
    }

    /// Runs a search, optionally scoped to a single site, and returns up to
    /// [`RESULT_LINK_LIMIT`] result URLs in page order.
    ///
    /// Failures are silent: a failed fetch or a page without result links both
    /// yield an empty list.
    pub async fn links(&self, query: &str, site: Option<&str>) -> Vec<String> {
        let q = match site {
            Some(domain) => format!("{} site:{}", query, domain),
            None => query.to_string(),
        };

        debug!("Searching: {}", q);

        let params = vec![("q".to_string(), q), ("kl".to_string(), self.locale.to_string())];

        match self.cache.get(&self.endpoint, &params).await {
            Some(html) => extract_links(&html),
            None => Vec::new(),
        }
    }
}

/// Pulls result hrefs out of the result-listing markup.
fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&RESULT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(String::from)
        .take(RESULT_LINK_LIMIT)
        .collect()
}
