//! High-level catalog operations over an [`LocalImdbApi`] implementation.
//!
//! Translates wire responses into the typed domain model and adds the
//! operations that span several endpoint calls, such as fetching every
//! season of a series.
#![allow(clippy::future_not_send)]

use anyhow::{Result, bail};
use futures::future::try_join_all;
use tracing::instrument;

use crate::image::ImageSize;
use crate::imdb::{LocalImdbApi, TitleResponse};
use crate::model::{Movie, Name, Season, Title, TvSeries};
use crate::poster::PosterSize;

/// A lookup result together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The decoded value.
    pub value: T,
    /// `true` when a cache tier served the underlying response.
    pub cached: bool,
}

impl<T> ApiResult<T> {
    const fn new(value: T, cached: bool) -> Self {
        Self { value, cached }
    }
}

/// Title details dispatched on the kind the API reported.
#[derive(Debug, Clone)]
pub enum TitleDetails {
    /// A TV series.
    TvSeries(TvSeries),
    /// A movie.
    Movie(Movie),
    /// Any other kind, passed through undecoded.
    Other(TitleResponse),
}

/// Typed catalog over a metadata API client.
///
/// Generic over the API trait so tests can substitute a mock for the HTTP
/// client.
#[derive(Debug)]
pub struct Catalog<A> {
    api: A,
}

impl<A: LocalImdbApi + Sync> Catalog<A> {
    /// Wraps an API client.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying API client.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Searches across all title kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip_all)]
    pub async fn search_title(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<Title>>> {
        let (response, cached) = self.api.search_title(term, force_refresh).await?;
        Ok(ApiResult::new(
            Title::from_entries(response.results.as_ref()),
            cached,
        ))
    }

    /// Searches TV series only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip_all)]
    pub async fn search_series(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<Title>>> {
        let (response, cached) = self.api.search_series(term, force_refresh).await?;
        Ok(ApiResult::new(
            Title::from_entries(response.results.as_ref()),
            cached,
        ))
    }

    /// Searches movies only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip_all)]
    pub async fn search_movie(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<Title>>> {
        let (response, cached) = self.api.search_movie(term, force_refresh).await?;
        Ok(ApiResult::new(
            Title::from_entries(response.results.as_ref()),
            cached,
        ))
    }

    /// Searches episodes only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip_all)]
    pub async fn search_episode(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<Title>>> {
        let (response, cached) = self.api.search_episode(term, force_refresh).await?;
        Ok(ApiResult::new(
            Title::from_entries(response.results.as_ref()),
            cached,
        ))
    }

    /// Searches people.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip_all)]
    pub async fn search_name(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<Name>>> {
        let (response, cached) = self.api.search_name(term, force_refresh).await?;
        Ok(ApiResult::new(
            Name::from_entries(response.results.as_ref()),
            cached,
        ))
    }

    /// Fetches title details and dispatches on the reported kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip_all)]
    pub async fn title(
        &self,
        id: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<TitleDetails>> {
        let (response, cached) = self.api.title(id, &[], force_refresh).await?;
        let details = match response.kind.as_deref() {
            Some("TVSeries") => TitleDetails::TvSeries(TvSeries::from_response(&response)),
            Some("Movie") => TitleDetails::Movie(Movie::from_response(&response)),
            _ => TitleDetails::Other(response),
        };
        Ok(ApiResult::new(details, cached))
    }

    /// Fetches a TV series by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports an error,
    /// or the title is not a TV series.
    #[instrument(skip_all)]
    pub async fn tv_series(
        &self,
        id: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<TvSeries>> {
        let (response, cached) = self.api.title(id, &[], force_refresh).await?;
        if response.kind.as_deref() != Some("TVSeries") {
            bail!(
                "{id} is a {}, not a TV series",
                response.kind.as_deref().unwrap_or("title of unknown kind")
            );
        }
        Ok(ApiResult::new(TvSeries::from_response(&response), cached))
    }

    /// Fetches a movie by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API reports an error,
    /// or the title is not a movie.
    #[instrument(skip_all)]
    pub async fn movie(&self, id: &str, force_refresh: bool) -> Result<ApiResult<Movie>> {
        let (response, cached) = self.api.title(id, &[], force_refresh).await?;
        if response.kind.as_deref() != Some("Movie") {
            bail!(
                "{id} is a {}, not a movie",
                response.kind.as_deref().unwrap_or("title of unknown kind")
            );
        }
        Ok(ApiResult::new(Movie::from_response(&response), cached))
    }

    /// Fetches title details with the poster set attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    #[instrument(skip_all)]
    pub async fn look_up_full_title_data(
        &self,
        id: &str,
        force_refresh: bool,
    ) -> Result<ApiResult<TitleDetails>> {
        let (response, cached) = self.api.title(id, &["Posters"], force_refresh).await?;
        let details = match response.kind.as_deref() {
            Some("TVSeries") => TitleDetails::TvSeries(TvSeries::from_response(&response)),
            Some("Movie") => TitleDetails::Movie(Movie::from_response(&response)),
            _ => TitleDetails::Other(response),
        };
        Ok(ApiResult::new(details, cached))
    }

    /// Fetches one season of a series, validating the season number against
    /// the series' season list first.
    ///
    /// # Errors
    ///
    /// Returns an error if the series does not have the requested season,
    /// if a request fails, or if the API reports an error.
    #[instrument(skip_all)]
    pub async fn season(
        &self,
        series: &TvSeries,
        season_number: u32,
        force_refresh: bool,
    ) -> Result<ApiResult<Season>> {
        if !series.contains_season(season_number) {
            bail!(
                "{} has no season {season_number} (valid seasons: {})",
                series.title,
                series.seasons.join(", ")
            );
        }
        let (response, cached) = self
            .api
            .season(&series.id, season_number, force_refresh)
            .await?;
        Ok(ApiResult::new(
            Season::from_response(&response, season_number)?,
            cached,
        ))
    }

    /// Fetches every season of a series concurrently.
    ///
    /// The result is ordered by season number. The `cached` flag is `true`
    /// when at least one season came from a cache tier.
    ///
    /// # Errors
    ///
    /// Returns an error if any season request fails.
    #[instrument(skip_all)]
    pub async fn all_seasons(
        &self,
        series: &TvSeries,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<Season>>> {
        let lookups = series
            .season_numbers()
            .into_iter()
            .map(|number| self.season(series, number, force_refresh));
        let results = try_join_all(lookups).await?;

        let cached = results.iter().any(|r| r.cached);
        let seasons = results.into_iter().map(|r| r.value).collect();
        Ok(ApiResult::new(seasons, cached))
    }

    /// Downloads a poster rendition.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn download_poster(
        &self,
        poster_id: &str,
        size: PosterSize,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<u8>>> {
        let (bytes, cached) = self
            .api
            .download_poster(poster_id, size, force_refresh)
            .await?;
        Ok(ApiResult::new(bytes, cached))
    }

    /// Downloads an image rendition.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn download_image(
        &self,
        image_id: &str,
        size: &ImageSize,
        force_refresh: bool,
    ) -> Result<ApiResult<Vec<u8>>> {
        let (bytes, cached) = self
            .api
            .download_image(image_id, size, force_refresh)
            .await?;
        Ok(ApiResult::new(bytes, cached))
    }

    /// Reads the current API usage as `(count, maximum)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn check_usage(&self) -> Result<(u32, u32)> {
        self.api.check_usage().await
    }
}
