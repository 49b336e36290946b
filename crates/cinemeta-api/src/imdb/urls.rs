//! Endpoint URL construction and IMDb website links.

use url::Url;

/// Default base URL for the metadata API.
pub const DEFAULT_BASE_URL: &str = "https://imdb-api.com/en/API/";

/// Builds `{base}{endpoint}/{api_key}/{terms...}`, skipping empty terms.
///
/// The returned string is also the cache key: no normalization is applied,
/// so URLs differing by any character are distinct entries.
#[must_use]
pub fn endpoint_url(base: &Url, endpoint: &str, api_key: &str, terms: &[&str]) -> String {
    let mut url = format!("{base}{endpoint}/{api_key}");
    for term in terms.iter().filter(|t| !t.is_empty()) {
        url.push('/');
        url.push_str(term);
    }
    url
}

/// IMDb website links for titles.
#[derive(Debug)]
pub struct TitleUrl;

impl TitleUrl {
    /// Title page for `id`.
    #[must_use]
    pub fn for_id(id: &str) -> String {
        format!("https://www.imdb.com/title/{id}")
    }

    /// Episode listing for one season of `id`.
    #[must_use]
    pub fn for_season(id: &str, season: u32) -> String {
        format!("https://www.imdb.com/title/{id}/episodes?season={season}")
    }
}

/// IMDb website links for people.
#[derive(Debug)]
pub struct PersonUrl;

impl PersonUrl {
    /// Person page for `id`.
    #[must_use]
    pub fn for_person(id: &str) -> String {
        format!("https://www.imdb.com/name/{id}")
    }
}

/// IMDb website links for full cast listings.
#[derive(Debug)]
pub struct FullCastUrl;

impl FullCastUrl {
    /// Full credits cast page for title `id`.
    #[must_use]
    pub fn for_title(id: &str) -> String {
        format!("https://www.imdb.com/title/{id}/fullcredits/cast")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_endpoint_url_joins_terms() {
        // Arrange
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();

        // Act
        let url = endpoint_url(&base, "SearchSeries", "k_123", &["avatar"]);

        // Assert
        assert_eq!(url, "https://imdb-api.com/en/API/SearchSeries/k_123/avatar");
    }

    #[test]
    fn test_endpoint_url_skips_empty_terms() {
        // Arrange
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();

        // Act
        let url = endpoint_url(&base, "Title", "k_123", &["tt0417299", ""]);

        // Assert
        assert_eq!(url, "https://imdb-api.com/en/API/Title/k_123/tt0417299");
    }

    #[test]
    fn test_endpoint_url_without_terms() {
        // Arrange
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();

        // Act
        let url = endpoint_url(&base, "Usage", "k_123", &[]);

        // Assert
        assert_eq!(url, "https://imdb-api.com/en/API/Usage/k_123");
    }

    #[test]
    fn test_website_links() {
        // Arrange & Act & Assert
        assert_eq!(
            TitleUrl::for_id("tt0417299"),
            "https://www.imdb.com/title/tt0417299"
        );
        assert_eq!(
            TitleUrl::for_season("tt0417299", 2),
            "https://www.imdb.com/title/tt0417299/episodes?season=2"
        );
        assert_eq!(
            PersonUrl::for_person("nm0000123"),
            "https://www.imdb.com/name/nm0000123"
        );
        assert_eq!(
            FullCastUrl::for_title("tt0417299"),
            "https://www.imdb.com/title/tt0417299/fullcredits/cast"
        );
    }
}
