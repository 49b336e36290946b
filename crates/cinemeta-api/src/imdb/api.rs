//! `ImdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{SearchResponse, SeasonResponse, TitleResponse};
use crate::image::ImageSize;
use crate::poster::PosterSize;

/// Metadata API trait.
///
/// Abstracts the bare endpoint client for mock substitution in tests. Uses
/// `trait_variant::make` to generate a `Send`-bound async trait.
///
/// Every lookup returns the decoded response together with a flag telling
/// whether a cache tier served it (`true`) or a network round trip ran
/// (`false`). `force_refresh` skips the cache and overwrites it.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(ImdbApi: Send)]
pub trait LocalImdbApi {
    /// Searches across all title kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn search_title(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)>;

    /// Searches TV series only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn search_series(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)>;

    /// Searches movies only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn search_movie(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)>;

    /// Searches episodes only.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn search_episode(
        &self,
        term: &str,
        force_refresh: bool,
    ) -> Result<(SearchResponse, bool)>;

    /// Searches people.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn search_name(&self, term: &str, force_refresh: bool)
    -> Result<(SearchResponse, bool)>;

    /// Fetches title details, optionally with extra blocks such as `Posters`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn title(
        &self,
        id: &str,
        options: &[&str],
        force_refresh: bool,
    ) -> Result<(TitleResponse, bool)>;

    /// Fetches one season's episode list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API reports an error.
    async fn season(
        &self,
        show_id: &str,
        season_number: u32,
        force_refresh: bool,
    ) -> Result<(SeasonResponse, bool)>;

    /// Downloads a poster rendition.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn download_poster(
        &self,
        poster_id: &str,
        size: PosterSize,
        force_refresh: bool,
    ) -> Result<(Vec<u8>, bool)>;

    /// Downloads an image rendition.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn download_image(
        &self,
        image_id: &str,
        size: &ImageSize,
        force_refresh: bool,
    ) -> Result<(Vec<u8>, bool)>;

    /// Reads the current API usage as `(count, maximum)`. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn check_usage(&self) -> Result<(u32, u32)>;
}
