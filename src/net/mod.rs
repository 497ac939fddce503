//! HTTP plumbing: the raw fetcher and the run-scoped response cache.

pub mod cache;
pub mod client;

pub use cache::CachedFetcher;
pub use client::{Fetch, HttpFetcher};
