//! Per-row lookup: try each retailer for the market until a price turns up.

use crate::config::Config;
use crate::market::Market;
use crate::net::{CachedFetcher, Fetch, HttpFetcher};
use crate::retailers::Retailer;
use crate::search::SearchEngine;
use anyhow::Result;
use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A single extracted price with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Price value in the market currency
    pub price: f64,
    /// ISO currency code (GBP, ...)
    pub currency: String,
    /// Product page the price was extracted from
    pub source_url: String,
}

/// Runs the retailer-by-retailer lookup for one product.
///
/// Strictly sequential: one retailer at a time, one candidate URL at a time.
/// The first parse to yield a price wins; there is no cross-retailer price
/// comparison. A delay (plus jitter) between retailers throttles the search
/// engine.
pub struct LookupEngine {
    cache: Arc<CachedFetcher>,
    search: SearchEngine,
    market: Market,
    delay_ms: u64,
    delay_jitter_ms: u64,
}

impl LookupEngine {
    /// Creates an engine backed by a real HTTP client.
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::with_fetcher(config, Box::new(fetcher), None))
    }

    /// Creates an engine with an injected fetcher and optional search endpoint
    /// override (for testing).
    pub fn with_fetcher(
        config: &Config,
        fetcher: Box<dyn Fetch>,
        search_endpoint: Option<String>,
    ) -> Self {
        let cache = Arc::new(CachedFetcher::new(fetcher));
        let search = match search_endpoint {
            Some(endpoint) => SearchEngine::with_endpoint(cache.clone(), config.market, endpoint),
            None => SearchEngine::new(cache.clone(), config.market),
        };

        Self {
            cache,
            search,
            market: config.market,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
        }
    }

    /// Returns the configured market.
    pub fn market(&self) -> Market {
        self.market
    }

    /// Returns the shared response cache.
    pub fn cache(&self) -> &CachedFetcher {
        &self.cache
    }

    /// Looks up a price for one product row.
    ///
    /// Returns `None` when both fields are empty or no retailer produced a
    /// price; every underlying failure is silent.
    pub async fn lookup(
        &self,
        identifier: Option<&str>,
        product_name: Option<&str>,
    ) -> Option<Quote> {
        let query = build_query(identifier, product_name)?;
        let retailers = Retailer::for_market(self.market);

        for (i, retailer) in retailers.iter().enumerate() {
            let links = retailer.search(&self.search, &query).await;
            debug!("{}: {} candidate pages for '{}'", retailer.name(), links.len(), query);

            for url in &links {
                if let Some(quote) =
                    retailer.parse(&self.cache, url, identifier, product_name).await
                {
                    info!(
                        "{}: {} {:.2} from {}",
                        retailer.name(),
                        quote.currency,
                        quote.price,
                        quote.source_url
                    );
                    return Some(quote);
                }
            }

            // Throttle before moving on; every retailer costs a search request
            if i + 1 < retailers.len() {
                self.delay().await;
            }
        }

        debug!("No price found for '{}'", query);
        None
    }

    /// Sleeps for the configured inter-retailer delay with random jitter.
    async fn delay(&self) {
        if self.delay_ms == 0 && self.delay_jitter_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

/// Builds the search query from a row's name and identifier.
///
/// The EAN rides along after the name to sharpen the search; both-empty rows
/// produce no query at all.
pub fn build_query(identifier: Option<&str>, product_name: Option<&str>) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(name) = product_name.map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(name);
    }
    if let Some(id) = identifier.map(str::trim).filter(|s| !s.is_empty()) {
        parts.push(id);
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
