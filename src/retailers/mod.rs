//! Retailer adapters: one search/parse strategy pair per supported shop.
//!
//! Adapters are a fixed, compile-time set of enum variants, not a trait
//! hierarchy; no two retailers share behavior beyond the interface shape.

pub mod selectors;

use crate::lookup::Quote;
use crate::market::Market;
use crate::net::CachedFetcher;
use crate::search::SearchEngine;
use regex_lite::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::trace;

/// First £-prefixed numeric token, thousands groups included.
static PRICE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"£\s*([0-9][0-9,]*(?:\.[0-9]+)?)").unwrap());

/// A retailer whose product pages we can extract an RRP from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Retailer {
    SephoraUk,
    SpaceNk,
    BootsUk,
}

impl Retailer {
    /// Returns the display name of this retailer.
    pub fn name(&self) -> &'static str {
        match self {
            Retailer::SephoraUk => "Sephora UK",
            Retailer::SpaceNk => "Space NK",
            Retailer::BootsUk => "Boots UK",
        }
    }

    /// Returns the domain used to scope search queries.
    pub fn domain(&self) -> &'static str {
        match self {
            Retailer::SephoraUk => "sephora.co.uk",
            Retailer::SpaceNk => "spacenk.com",
            Retailer::BootsUk => "boots.com",
        }
    }

    /// Returns the market this retailer belongs to.
    pub fn market(&self) -> Market {
        match self {
            Retailer::SephoraUk | Retailer::SpaceNk | Retailer::BootsUk => Market::Uk,
        }
    }

    /// Returns the retailers for a market, in lookup order.
    pub fn for_market(market: Market) -> &'static [Retailer] {
        match market {
            Market::Uk => &[Retailer::SephoraUk, Retailer::SpaceNk, Retailer::BootsUk],
        }
    }

    /// Primary price selectors for this retailer's product pages.
    fn price_selector(&self) -> &'static Selector {
        match self {
            Retailer::SephoraUk => &selectors::SEPHORA_PRICE,
            Retailer::SpaceNk => &selectors::SPACE_NK_PRICE,
            Retailer::BootsUk => &selectors::BOOTS_PRICE,
        }
    }

    /// Searches for candidate product-page URLs on this retailer's domain.
    pub async fn search(&self, engine: &SearchEngine, query: &str) -> Vec<String> {
        engine.links(query, Some(self.domain())).await
    }

    /// Fetches a candidate page and tries to extract a price from it.
    ///
    /// `identifier` and `product_name` are accepted but not yet used to check
    /// that the page actually matches the queried product; the first page that
    /// yields a price is trusted.
    pub async fn parse(
        &self,
        cache: &CachedFetcher,
        url: &str,
        identifier: Option<&str>,
        product_name: Option<&str>,
    ) -> Option<Quote> {
        let _ = (identifier, product_name);

        let html = cache.get(url, &[]).await?;
        let price = self.extract_price(&html)?;

        trace!("{}: extracted {:.2} from {}", self.name(), price, url);

        Some(Quote {
            price,
            currency: self.market().currency().to_string(),
            source_url: url.to_string(),
        })
    }

    /// Extracts a price from product-page markup.
    ///
    /// Tries the retailer's primary selectors first; if none of them yields a
    /// parsable price, falls back to the generic price metadata tag.
    pub fn extract_price(&self, html: &str) -> Option<f64> {
        let document = Html::parse_document(html);

        if let Some(element) = document.select(self.price_selector()).next() {
            let text = element.text().collect::<Vec<_>>().join(" ");
            if let Some(price) = parse_price_text(&text) {
                return Some(price);
            }
        }

        document
            .select(&selectors::META_PRICE)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .and_then(|content| content.trim().parse().ok())
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parses the first £-prefixed amount out of element text, stripping
/// thousands separators.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let captures = PRICE_PATTERN.captures(text)?;
    captures.get(1)?.as_str().replace(',', "").parse().ok()
}
