//! CSS selectors for retailer product pages.
//!
//! This file contains all CSS selectors used for locating price-bearing
//! elements. Update this file when a retailer changes their page markup.
//!
//! **Update process**: When extraction fails, capture an HTML sample,
//! update selectors, and add a test fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Price element on Sephora UK product pages.
pub static SEPHORA_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "[data-testid='pdp-price-now'], \
         [data-test='product-price'], \
         [data-automation='product-price']",
    )
    .unwrap()
});

/// Price element on Space NK product pages.
pub static SPACE_NK_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "[data-test='pdp-price'], \
         .product-price, \
         [itemprop='price']",
    )
    .unwrap()
});

/// Price element on Boots UK product pages.
pub static BOOTS_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "[data-e2e='product-price'], \
         .price__now, \
         .product__price, \
         [itemprop='price']",
    )
    .unwrap()
});

/// Generic price metadata tag, the fallback when primary selectors miss.
pub static META_PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta[itemprop='price']").unwrap());
