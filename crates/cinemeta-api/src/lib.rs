//! API client library for cinemeta.
//!
//! Provides a cached client for the IMDb metadata API, a typed domain
//! model over its JSON responses, and artwork sizing helpers.

/// High-level catalog operations.
pub mod catalog;

/// Image sizing and aspect-ratio math.
pub mod image;

/// IMDb metadata API client.
pub mod imdb;

/// Typed domain objects.
pub mod model;

/// Poster rendition sizes and URLs.
pub mod poster;
