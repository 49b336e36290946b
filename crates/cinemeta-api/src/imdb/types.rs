//! Wire types for the metadata API's JSON responses.
//!
//! Every top-level response carries an `errorMessage` field that is set (and
//! non-empty) when the API embeds a failure in an HTTP 200 response.

use serde::Deserialize;

/// Returns the embedded error message, if one is actually set.
///
/// The API sends `""` or `null` on success and a message on failure.
#[must_use]
pub fn embedded_error(message: Option<&String>) -> Option<&str> {
    message.map(String::as_str).filter(|m| !m.is_empty())
}

/// Minimal envelope used to sniff JSON bodies for an embedded error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    /// Embedded error message, empty or absent on success.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Response for the `Search*` endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Endpoint variant that produced this result set.
    #[serde(default)]
    pub search_type: Option<String>,
    /// The search expression as understood by the API.
    #[serde(default)]
    pub expression: Option<String>,
    /// Result entries; `null` when nothing matched.
    #[serde(default)]
    pub results: Option<Vec<SearchResult>>,
    /// Embedded error message.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One search hit.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// IMDb id (`tt...` or `nm...`).
    pub id: String,
    /// Result kind reported by the API.
    #[serde(default)]
    pub result_type: Option<String>,
    /// Thumbnail image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Display title.
    pub title: String,
    /// Year/kind annotation, e.g. `(2005) (TV Series)`.
    #[serde(default)]
    pub description: Option<String>,
}

/// Response for the `Title` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleResponse {
    /// IMDb title id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Title with year/kind annotation.
    #[serde(default)]
    pub full_title: Option<String>,
    /// `TVSeries`, `Movie`, ...
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// First release year.
    #[serde(default)]
    pub year: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Plot summary.
    #[serde(default)]
    pub plot: Option<String>,
    /// Comma-separated genre list.
    #[serde(default)]
    pub genres: Option<String>,
    /// Rating as a decimal string.
    #[serde(default, rename = "imDbRating")]
    pub imdb_rating: Option<String>,
    /// Billed cast.
    #[serde(default)]
    pub actor_list: Option<Vec<ActorEntry>>,
    /// Poster set (present when the `Posters` option was requested).
    #[serde(default)]
    pub posters: Option<PosterData>,
    /// TV-series-only metadata.
    #[serde(default)]
    pub tv_series_info: Option<TvSeriesInfo>,
    /// Embedded error message.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One billed cast member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorEntry {
    /// IMDb person id.
    pub id: String,
    /// Headshot image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Person name.
    pub name: String,
    /// Character billing (arrives duplicated, see the model layer).
    #[serde(default)]
    pub as_character: Option<String>,
}

/// Poster collection attached to a title.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterData {
    /// Portrait posters.
    #[serde(default)]
    pub posters: Option<Vec<PosterEntry>>,
    /// Landscape backdrops.
    #[serde(default)]
    pub backdrops: Option<Vec<PosterEntry>>,
}

/// One poster rendition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterEntry {
    /// Poster id.
    pub id: String,
    /// Download link.
    pub link: String,
    /// Width-to-height ratio.
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}

/// TV-series metadata block of a `Title` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TvSeriesInfo {
    /// Final air year, empty while running.
    #[serde(default)]
    pub year_end: Option<String>,
    /// Series creators.
    #[serde(default)]
    pub creators: Option<String>,
    /// Season numbers as strings, e.g. `["1", "2", "3"]`.
    #[serde(default)]
    pub seasons: Vec<String>,
}

/// Response for the `SeasonEpisodes` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonResponse {
    /// IMDb id of the parent series.
    #[serde(rename = "imDbId")]
    pub imdb_id: String,
    /// Series title.
    pub title: String,
    /// Series title with annotation.
    #[serde(default)]
    pub full_title: Option<String>,
    /// Response kind.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// First air year of the series.
    #[serde(default)]
    pub year: Option<String>,
    /// Episodes of the requested season.
    #[serde(default)]
    pub episodes: Option<Vec<EpisodeEntry>>,
    /// Embedded error message.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// One episode of a season listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeEntry {
    /// IMDb episode id.
    pub id: String,
    /// Season number as a string.
    pub season_number: String,
    /// Episode number as a string.
    pub episode_number: String,
    /// Episode title.
    pub title: String,
    /// Still image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Air year.
    #[serde(default)]
    pub year: Option<String>,
    /// Air date, e.g. `21 Feb. 2005`.
    #[serde(default)]
    pub released: Option<String>,
    /// Plot summary.
    #[serde(default)]
    pub plot: Option<String>,
    /// Rating as a decimal string.
    #[serde(default, rename = "imDbRating")]
    pub imdb_rating: Option<String>,
}

/// Response for the `Usage` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    /// Requests made in the current window.
    #[serde(default)]
    pub count: Option<u32>,
    /// Request allowance.
    #[serde(default)]
    pub maximum: Option<u32>,
    /// Embedded error message.
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_embedded_error_filters_empty_and_absent() {
        // Arrange & Act & Assert
        assert_eq!(embedded_error(None), None);
        assert_eq!(embedded_error(Some(&String::new())), None);
        assert_eq!(
            embedded_error(Some(&String::from("Invalid API Key"))),
            Some("Invalid API Key")
        );
    }

    #[test]
    fn test_parse_error_envelope() {
        // Arrange
        let json = r#"{"results":null,"errorMessage":"Maximum usage (101 of 100)"}"#;

        // Act
        let envelope: ApiEnvelope = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(
            embedded_error(envelope.error_message.as_ref()),
            Some("Maximum usage (101 of 100)")
        );
    }

    #[test]
    fn test_parse_usage_response() {
        // Arrange
        let json = r#"{"count":42,"maximum":100,"errorMessage":""}"#;

        // Act
        let usage: UsageResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(usage.count, Some(42));
        assert_eq!(usage.maximum, Some(100));
        assert_eq!(embedded_error(usage.error_message.as_ref()), None);
    }
}
