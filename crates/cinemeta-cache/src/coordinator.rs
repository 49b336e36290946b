//! Two-tier cache coordinator.
#![allow(clippy::future_not_send)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;
use tracing::instrument;

use super::fetch::{CachedResponse, FetchedPayload, LocalFetch, Provenance};
use super::hot::HotCache;
use super::store::DurableStore;

/// Coordinates lookups and writes across the hot and durable tiers.
///
/// Lookup order is hot tier, durable tier, network. Durable hits are
/// promoted into the hot tier; fresh fetches populate both tiers before the
/// call returns. Concurrent misses for the same URL are serialized behind a
/// per-key lock so at most one fetch per key is in flight.
#[derive(Debug)]
pub struct ResponseCache {
    /// In-memory tier. One lock guards the entry map and recency order.
    hot: Mutex<HotCache>,
    /// Persistent tier.
    store: DurableStore,
    /// Per-key miss locks. Grows with distinct keys, like the durable tier.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ResponseCache {
    /// Opens the durable tier under `dir` and sizes the hot tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable store cannot be opened or migrated.
    pub fn open(dir: Option<&PathBuf>, hot_capacity: usize) -> Result<Self> {
        let store = DurableStore::open(dir)?;
        Ok(Self::with_store(store, hot_capacity))
    }

    /// Opens an in-memory durable tier (tests and throwaway sessions).
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be opened.
    pub fn open_in_memory(hot_capacity: usize) -> Result<Self> {
        let store = DurableStore::open_in_memory()?;
        Ok(Self::with_store(store, hot_capacity))
    }

    fn with_store(store: DurableStore, hot_capacity: usize) -> Self {
        Self {
            hot: Mutex::new(HotCache::new(hot_capacity)),
            store,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves `url` to a response, reporting whether a tier served it.
    ///
    /// With `force_refresh` both tiers are skipped and overwritten from the
    /// network. Otherwise the hot tier is consulted first, then the durable
    /// tier (promoting on hit), then the network. A durable read failure is
    /// logged and treated as a miss; a fetch failure or write-back failure
    /// is returned to the caller with no cache mutation left behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or a fresh response cannot be
    /// written back to the durable tier.
    #[instrument(skip_all)]
    pub async fn resolve(
        &self,
        fetcher: &(impl LocalFetch + Sync),
        url: &str,
        force_refresh: bool,
    ) -> Result<(CachedResponse, bool)> {
        if force_refresh {
            let key_lock = self.key_lock(url).await;
            let _guard = key_lock.lock().await;
            return self.fetch_and_populate(fetcher, url).await;
        }

        if let Some(body) = self.hot.lock().await.get(url) {
            tracing::debug!(url, "hot cache hit");
            let response = CachedResponse::from_tier(body, Provenance::FromHotCache);
            return Ok((response, true));
        }

        let key_lock = self.key_lock(url).await;
        let _guard = key_lock.lock().await;

        // Another caller may have filled the hot tier while we waited.
        if let Some(body) = self.hot.lock().await.get(url) {
            tracing::debug!(url, "hot cache hit after waiting on in-flight fetch");
            let response = CachedResponse::from_tier(body, Provenance::FromHotCache);
            return Ok((response, true));
        }

        match self.store.get(url) {
            Ok(Some(body)) => {
                tracing::debug!(url, "durable store hit, promoting to hot tier");
                self.hot.lock().await.put(url, body.clone());
                let response = CachedResponse::from_tier(body, Provenance::FromDurableStore);
                return Ok((response, true));
            }
            Ok(None) => {}
            Err(err) => {
                // A failed read still has a safe fallback: the network.
                tracing::warn!(url, error = %err, "durable store read failed, treating as miss");
            }
        }

        self.fetch_and_populate(fetcher, url).await
    }

    /// Removes `url` from both tiers.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable delete fails.
    pub async fn evict(&self, url: &str) -> Result<()> {
        self.hot.lock().await.remove(url);
        self.store.remove(url)
    }

    /// Read-only access to the durable tier (maintenance/inspection).
    #[must_use]
    pub const fn durable(&self) -> &DurableStore {
        &self.store
    }

    /// Fetches `url` and writes the body into both tiers.
    ///
    /// The durable tier is written first: if that write fails the call fails
    /// with the hot tier untouched, so no partial state is left behind.
    async fn fetch_and_populate(
        &self,
        fetcher: &(impl LocalFetch + Sync),
        url: &str,
    ) -> Result<(CachedResponse, bool)> {
        tracing::debug!(url, "fetching from network");
        let payload: FetchedPayload = fetcher.fetch(url).await?;

        self.store
            .put(url, &payload.body)
            .context("cache write-back failed")?;
        self.hot.lock().await.put(url, payload.body.clone());

        Ok((CachedResponse::from_fetch(payload), false))
    }

    /// Returns the miss lock for `url`, creating it on first use.
    async fn key_lock(&self, url: &str) -> Arc<Mutex<()>> {
        let mut locks = self.in_flight.lock().await;
        locks.entry(String::from(url)).or_default().clone()
    }
}
