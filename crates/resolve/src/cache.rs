//! Exchange-rate cache.

use crate::{CurrencyRates, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default lifetime of a cached rate.
pub const RATE_CACHE_TTL: Duration = Duration::from_secs(60 * 10);

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    fetched_at: Instant,
    rate: f64,
}

/// Rates keyed by `FROM:TO`, expiring after a fixed TTL.
#[derive(Debug)]
pub struct RateCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<f64> {
        let entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries
            .get(key)
            .filter(|entry| now.duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| entry.rate)
    }

    pub fn insert(&self, key: String, rate: f64) {
        self.insert_at(key, rate, Instant::now());
    }

    fn insert_at(&self, key: String, rate: f64, fetched_at: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.retain(|_, entry| fetched_at.duration_since(entry.fetched_at) < self.ttl);
        entries.insert(key, CacheEntry { fetched_at, rate });
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(RATE_CACHE_TTL)
    }
}

/// Wraps a rate service with a [`RateCache`].
pub struct CachedRates<S> {
    inner: S,
    cache: RateCache,
}

impl<S: CurrencyRates> CachedRates<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            cache: RateCache::new(ttl),
        }
    }
}

#[async_trait]
impl<S: CurrencyRates> CurrencyRates for CachedRates<S> {
    async fn rate(&self, from: &str, to: &str) -> Result<f64> {
        let key = format!("{from}:{to}");
        if let Some(rate) = self.cache.get(&key) {
            debug!(pair = %key, "Rate cache hit");
            return Ok(rate);
        }
        let rate = self.inner.rate(from, to).await?;
        self.cache.insert(key, rate);
        Ok(rate)
    }
}
