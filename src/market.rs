//! Market configuration: which retailers apply, which currency, which search locale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic/currency scope selecting the retailer set for a lookup.
///
/// Only the UK is wired up today; the enum exists so further markets slot in
/// without touching the lookup loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    #[default]
    Uk,
}

impl Market {
    /// Returns the ISO currency code for this market.
    pub fn currency(&self) -> &'static str {
        match self {
            Market::Uk => "GBP",
        }
    }

    /// Returns the currency symbol that prefixes prices on this market's pages.
    pub fn currency_symbol(&self) -> char {
        match self {
            Market::Uk => '£',
        }
    }

    /// Returns the search engine locale (`kl` parameter) for this market.
    pub fn search_locale(&self) -> &'static str {
        match self {
            Market::Uk => "uk",
        }
    }

    /// Returns the Accept-Language header value for this market.
    pub fn accept_language(&self) -> &'static str {
        match self {
            Market::Uk => "en-GB,en;q=0.9",
        }
    }

    /// Returns all supported markets.
    pub fn all() -> &'static [Market] {
        &[Market::Uk]
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Market::Uk => "uk",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Market {
    type Err = MarketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uk" | "gb" | "united kingdom" => Ok(Market::Uk),
            _ => Err(MarketParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketParseError(String);

impl fmt::Display for MarketParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown market '{}'. Valid markets: uk", self.0)
    }
}

impl std::error::Error for MarketParseError {}
