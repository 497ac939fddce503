//! Run-scoped response cache memoizing fetch outcomes.

use crate::net::client::Fetch;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::{debug, trace};

/// Cache key: URL plus a syntactic serialization of the parameter list.
///
/// The key is purely textual, so the same parameters in a different order are
/// a different entry.
type CacheKey = (String, String);

/// Memoizing wrapper around a [`Fetch`] implementation.
///
/// Unbounded and scoped to one run; there is no eviction. Failed fetches are
/// memoized as well, so a dead URL costs exactly one request per run.
pub struct CachedFetcher {
    fetcher: Box<dyn Fetch>,
    entries: Mutex<HashMap<CacheKey, Option<String>>>,
    requests: AtomicU64,
}

impl CachedFetcher {
    /// Wraps a fetcher with a fresh, empty cache.
    pub fn new(fetcher: Box<dyn Fetch>) -> Self {
        Self { fetcher, entries: Mutex::new(HashMap::new()), requests: AtomicU64::new(0) }
    }

    /// Returns the page body for a URL, fetching it at most once per run.
    ///
    /// Every failure mode of the underlying fetch collapses to `None`.
    pub async fn get(&self, url: &str, params: &[(String, String)]) -> Option<String> {
        let key: CacheKey =
            (url.to_string(), serde_json::to_string(params).unwrap_or_default());

        {
            let entries = self.entries.lock().expect("cache lock poisoned");
            if let Some(cached) = entries.get(&key) {
                trace!("Cache hit: {}", url);
                return cached.clone();
            }
        }

        self.requests.fetch_add(1, Ordering::SeqCst);

        let body = match self.fetcher.fetch(url, params).await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!("Fetch failed for {}: {:#}", url, e);
                None
            }
        };

        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key, body.clone());
        body
    }

    /// Returns the number of requests issued to the underlying fetcher.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }
}
