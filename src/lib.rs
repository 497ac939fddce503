//! rrp-crawler - recommended retail price lookup for product spreadsheets
//!
//! Searches the web for retailer product pages, extracts RRPs from their
//! markup, and appends the results to a CSV/TSV of products.

pub mod commands;
pub mod config;
pub mod format;
pub mod lookup;
pub mod market;
pub mod net;
pub mod retailers;
pub mod search;
pub mod sheet;

pub use config::Config;
pub use lookup::{LookupEngine, Quote};
pub use market::Market;
pub use retailers::Retailer;
