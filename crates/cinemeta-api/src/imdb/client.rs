//! `ImdbClient` - bare metadata API client with tiered response caching.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cinemeta_cache::{CachePolicy, ResponseCache};
use tracing::instrument;
use url::Url;

use super::api::LocalImdbApi;
use super::fetcher::HttpFetcher;
use super::types::{SearchResponse, SeasonResponse, TitleResponse, UsageResponse, embedded_error};
use super::urls::{DEFAULT_BASE_URL, endpoint_url};
use crate::image::{ImageSize, ImageUrl};
use crate::poster::{PosterSize, PosterUrl};

/// Default hot-cache capacity (entries).
const DEFAULT_HOT_CACHE_CAPACITY: usize = 20;

/// Bare API client.
///
/// Routes every request through its [`CachePolicy`]; the returned flag on
/// each lookup reports whether a cache tier served the response.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ImdbClient {
    /// Network collaborator.
    fetcher: HttpFetcher,
    /// Tiered cache or bypass.
    policy: CachePolicy,
    /// Base URL for API requests (must end with a slash).
    base_url: Url,
    /// Static API key, embedded in every request URL.
    api_key: String,
}

/// Builder for `ImdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct ImdbClientBuilder {
    api_key: Option<String>,
    user_agent: Option<String>,
    base_url: Option<Url>,
    cache_dir: Option<PathBuf>,
    hot_cache_capacity: usize,
    policy: Option<CachePolicy>,
    no_cache: bool,
}

impl ImdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            api_key: None,
            user_agent: None,
            base_url: None,
            cache_dir: None,
            hot_cache_capacity: DEFAULT_HOT_CACHE_CAPACITY,
            policy: None,
            no_cache: false,
        }
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Overrides the base URL (for wiremock in tests). Must end with a
    /// trailing slash; `build` rejects it otherwise.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Directory holding the durable cache database.
    ///
    /// Defaults to `~/.local/share/cinemeta`.
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Sets the hot-cache capacity (default: 20). Zero is accepted and
    /// disables the hot tier without erroring.
    #[must_use]
    pub const fn hot_cache_capacity(mut self, capacity: usize) -> Self {
        self.hot_cache_capacity = capacity;
        self
    }

    /// Disables caching entirely: every request fetches and neither tier is
    /// read or written.
    #[must_use]
    pub const fn no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    /// Supplies a pre-built cache policy, overriding the other cache
    /// settings (in-memory caches in tests).
    #[must_use]
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Builds the client, opening the durable store when caching is enabled.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - The base URL does not end with a trailing slash.
    /// - The HTTP client build or durable store open fails.
    pub fn build(self) -> Result<ImdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        // Endpoint names are appended directly to the base.
        if !base_url.as_str().ends_with('/') {
            bail!("base URL must end with a trailing slash: {base_url}");
        }

        let fetcher = HttpFetcher::new(&user_agent)?;

        let policy = if let Some(policy) = self.policy {
            policy
        } else if self.no_cache {
            CachePolicy::Bypass
        } else {
            CachePolicy::Tiered(ResponseCache::open(
                self.cache_dir.as_ref(),
                self.hot_cache_capacity,
            )?)
        };

        Ok(ImdbClient {
            fetcher,
            policy,
            base_url,
            api_key,
        })
    }
}

impl ImdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> ImdbClientBuilder {
        ImdbClientBuilder::new()
    }

    /// Resolves `url` through the cache policy and decodes the JSON body,
    /// rejecting responses with an embedded error message.
    async fn request_json<T>(&self, url: &str, force_refresh: bool, what: &str) -> Result<(T, bool)>
    where
        T: serde::de::DeserializeOwned,
    {
        let (response, cached) = self.policy.get(&self.fetcher, url, force_refresh).await?;
        let parsed: T = serde_json::from_slice(&response.body)
            .with_context(|| format!("failed to decode JSON response: {what}"))?;
        Ok((parsed, cached))
    }

    /// Resolves `url` through the cache policy, returning raw bytes.
    async fn request_content(&self, url: &str, force_refresh: bool) -> Result<(Vec<u8>, bool)> {
        let (response, cached) = self.policy.get(&self.fetcher, url, force_refresh).await?;
        Ok((response.body, cached))
    }

    /// Runs one `Search*` endpoint.
    async fn search(
        &self,
        endpoint: &str,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)> {
        let url = endpoint_url(&self.base_url, endpoint, &self.api_key, &[term]);
        tracing::info!(endpoint, term, "running search");
        let (response, cached): (SearchResponse, bool) =
            self.request_json(&url, force_refresh, endpoint).await?;
        if let Some(message) = embedded_error(response.error_message.as_ref()) {
            bail!("API error: {message}");
        }
        Ok((response, cached))
    }
}

impl LocalImdbApi for ImdbClient {
    #[instrument(skip_all)]
    async fn search_title(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)> {
        self.search("SearchTitle", term, force_refresh).await
    }

    #[instrument(skip_all)]
    async fn search_series(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)> {
        self.search("SearchSeries", term, force_refresh).await
    }

    #[instrument(skip_all)]
    async fn search_movie(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)> {
        self.search("SearchMovie", term, force_refresh).await
    }

    #[instrument(skip_all)]
    async fn search_episode(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)> {
        self.search("SearchEpisode", term, force_refresh).await
    }

    #[instrument(skip_all)]
    async fn search_name(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)> {
        self.search("SearchName", term, force_refresh).await
    }

    #[instrument(skip_all)]
    async fn title(
        &self,
        id: &str,
        options: &[&str],
        force_refresh: bool,
    ) -> Result<(TitleResponse, bool)> {
        let joined = options.join(",");
        let url = endpoint_url(&self.base_url, "Title", &self.api_key, &[id, &joined]);
        tracing::info!(id, "running title details lookup");
        let (response, cached): (TitleResponse, bool) =
            self.request_json(&url, force_refresh, "Title").await?;
        if let Some(message) = embedded_error(response.error_message.as_ref()) {
            bail!("API error: {message}");
        }
        Ok((response, cached))
    }

    #[instrument(skip_all)]
    async fn season(
        &self,
        show_id: &str,
        season_number: u32,
        force_refresh: bool,
    ) -> Result<(SeasonResponse, bool)> {
        let season_term = season_number.to_string();
        let url = endpoint_url(
            &self.base_url,
            "SeasonEpisodes",
            &self.api_key,
            &[show_id, &season_term],
        );
        tracing::info!(show_id, season_number, "running season details lookup");
        let (response, cached): (SeasonResponse, bool) = self
            .request_json(&url, force_refresh, "SeasonEpisodes")
            .await?;
        if let Some(message) = embedded_error(response.error_message.as_ref()) {
            bail!("API error: {message}");
        }
        Ok((response, cached))
    }

    #[instrument(skip_all)]
    async fn download_poster(
        &self,
        poster_id: &str,
        size: PosterSize,
        force_refresh: bool,
    ) -> Result<(Vec<u8>, bool)> {
        let url = PosterUrl::with_size(poster_id, size);
        tracing::info!(url, "downloading poster");
        self.request_content(&url, force_refresh).await
    }

    #[instrument(skip_all)]
    async fn download_image(
        &self,
        image_id: &str,
        size: &ImageSize,
        force_refresh: bool,
    ) -> Result<(Vec<u8>, bool)> {
        let url = ImageUrl::with_size(image_id, size);
        tracing::info!(url, "downloading image");
        self.request_content(&url, force_refresh).await
    }

    #[instrument(skip_all)]
    async fn check_usage(&self) -> Result<(u32, u32)> {
        let url = endpoint_url(&self.base_url, "Usage", &self.api_key, &[]);
        tracing::info!("checking usage amount");
        let payload = self.fetcher.fetch_raw(&url).await?;
        let usage: UsageResponse = serde_json::from_slice(&payload.body)
            .context("failed to decode JSON response: Usage")?;
        if embedded_error(usage.error_message.as_ref()).is_some() {
            return Ok((0, 100));
        }
        Ok((usage.count.unwrap_or(0), usage.maximum.unwrap_or(100)))
    }
}
