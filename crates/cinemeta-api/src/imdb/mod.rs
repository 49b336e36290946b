//! IMDb metadata API client module.
//!
//! Handles HTTP requests to the `imdb-api.com` endpoints and retrieves
//! search results, title details, season listings, and artwork, with all
//! successful responses flowing through the response cache.

mod api;
mod client;
mod fetcher;
pub(crate) mod types;
pub(crate) mod urls;

#[allow(clippy::module_name_repetitions)]
pub use api::{ImdbApi, LocalImdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{ImdbClient, ImdbClientBuilder};
pub use fetcher::HttpFetcher;
pub use types::{
    ActorEntry, EpisodeEntry, PosterData, PosterEntry, SearchResponse, SearchResult,
    SeasonResponse, TitleResponse, TvSeriesInfo, UsageResponse,
};
pub use urls::DEFAULT_BASE_URL;
