//! Cache presence selection.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::coordinator::ResponseCache;
use super::fetch::{CachedResponse, LocalFetch};

/// Whether requests go through the tiered cache or straight to the network.
///
/// A tagged choice rather than a trait object: callers construct one variant
/// at client build time and every request is routed through it.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum CachePolicy {
    /// Serve from the two-tier cache, fetching on miss.
    Tiered(ResponseCache),
    /// Always fetch; never read or write either tier.
    Bypass,
}

impl CachePolicy {
    /// Resolves `url` under this policy.
    ///
    /// Returns the response and whether a cache tier served it. `Bypass`
    /// always performs a network round trip and always reports `false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails or, for [`CachePolicy::Tiered`],
    /// a fresh response cannot be written back.
    pub async fn get(
        &self,
        fetcher: &(impl LocalFetch + Sync),
        url: &str,
        force_refresh: bool,
    ) -> Result<(CachedResponse, bool)> {
        match self {
            Self::Tiered(cache) => cache.resolve(fetcher, url, force_refresh).await,
            Self::Bypass => {
                let payload = fetcher.fetch(url).await?;
                Ok((CachedResponse::from_fetch(payload), false))
            }
        }
    }
}
