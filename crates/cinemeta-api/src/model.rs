//! Typed domain objects mapped from the wire types.

use std::fmt;

use anyhow::{Context, Result};

use crate::image::{ImageSize, ImageUrl, image_info_from_url};
use crate::imdb::types::{
    ActorEntry, EpisodeEntry, PosterEntry, SearchResult, SeasonResponse, TitleResponse,
};
use crate::imdb::urls::{FullCastUrl, PersonUrl, TitleUrl};
use crate::poster::{PosterSize, PosterUrl};

/// A search hit (any title kind).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    /// IMDb title id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Thumbnail, when the API sent one.
    pub image: Option<Image>,
    /// Year/kind annotation.
    pub description: Option<String>,
}

impl Title {
    /// Maps one search hit.
    #[must_use]
    pub fn from_entry(entry: &SearchResult) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            image: entry.image.as_deref().map(Image::from_url),
            description: entry.description.clone(),
        }
    }

    /// Maps a result list, treating `None` as empty.
    #[must_use]
    pub fn from_entries(entries: Option<&Vec<SearchResult>>) -> Vec<Self> {
        entries
            .map(|list| list.iter().map(Self::from_entry).collect())
            .unwrap_or_default()
    }

    /// IMDb website link for this title.
    #[must_use]
    pub fn imdb_link(&self) -> String {
        TitleUrl::for_id(&self.id)
    }

    /// IMDb full cast listing link.
    #[must_use]
    pub fn full_cast_link(&self) -> String {
        FullCastUrl::for_title(&self.id)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.id, self.title)
    }
}

/// A TV series with its season list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TvSeries {
    /// IMDb title id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Title with year/kind annotation.
    pub full_title: Option<String>,
    /// Cover image.
    pub image: Option<Image>,
    /// Billed cast.
    pub cast: Vec<CastMember>,
    /// Plot summary.
    pub plot: Option<String>,
    /// Genre list.
    pub genres: Vec<String>,
    /// Rating as a decimal string.
    pub imdb_rating: Option<String>,
    /// Posters (populated when the `Posters` option was requested).
    pub posters: Vec<Poster>,
    /// Season numbers as the API reports them, e.g. `["1", "2", "3"]`.
    pub seasons: Vec<String>,
}

impl TvSeries {
    /// Maps a `Title` response into a series.
    #[must_use]
    pub fn from_response(response: &TitleResponse) -> Self {
        Self {
            id: response.id.clone(),
            title: response.title.clone(),
            full_title: response.full_title.clone(),
            image: response.image.as_deref().map(Image::from_url),
            cast: CastMember::from_entries(response.actor_list.as_ref()),
            plot: response.plot.clone(),
            genres: split_genres(response.genres.as_deref()),
            imdb_rating: response.imdb_rating.clone(),
            posters: Poster::from_title_response(response),
            seasons: response
                .tv_series_info
                .as_ref()
                .map(|info| info.seasons.clone())
                .unwrap_or_default(),
        }
    }

    /// Whether `season_number` appears in the season list.
    #[must_use]
    pub fn contains_season(&self, season_number: u32) -> bool {
        let as_text = season_number.to_string();
        self.seasons.iter().any(|s| *s == as_text)
    }

    /// Season numbers parsed to integers; unparsable entries are skipped.
    #[must_use]
    pub fn season_numbers(&self) -> Vec<u32> {
        self.seasons.iter().filter_map(|s| s.parse().ok()).collect()
    }

    /// IMDb website link for this series.
    #[must_use]
    pub fn imdb_link(&self) -> String {
        TitleUrl::for_id(&self.id)
    }

    /// IMDb full cast listing link.
    #[must_use]
    pub fn full_cast_link(&self) -> String {
        FullCastUrl::for_title(&self.id)
    }
}

impl fmt::Display for TvSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.id,
            self.full_title.as_deref().unwrap_or(&self.title)
        )
    }
}

/// A movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    /// IMDb title id.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Title with year annotation.
    pub full_title: Option<String>,
    /// Cover image.
    pub image: Option<Image>,
    /// Billed cast.
    pub cast: Vec<CastMember>,
    /// Plot summary.
    pub plot: Option<String>,
    /// Genre list.
    pub genres: Vec<String>,
    /// Rating as a decimal string.
    pub imdb_rating: Option<String>,
    /// Posters (populated when the `Posters` option was requested).
    pub posters: Vec<Poster>,
}

impl Movie {
    /// Maps a `Title` response into a movie.
    #[must_use]
    pub fn from_response(response: &TitleResponse) -> Self {
        Self {
            id: response.id.clone(),
            title: response.title.clone(),
            full_title: response.full_title.clone(),
            image: response.image.as_deref().map(Image::from_url),
            cast: CastMember::from_entries(response.actor_list.as_ref()),
            plot: response.plot.clone(),
            genres: split_genres(response.genres.as_deref()),
            imdb_rating: response.imdb_rating.clone(),
            posters: Poster::from_title_response(response),
        }
    }

    /// IMDb website link for this movie.
    #[must_use]
    pub fn imdb_link(&self) -> String {
        TitleUrl::for_id(&self.id)
    }

    /// IMDb full cast listing link.
    #[must_use]
    pub fn full_cast_link(&self) -> String {
        FullCastUrl::for_title(&self.id)
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.id,
            self.full_title.as_deref().unwrap_or(&self.title)
        )
    }
}

/// One season of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    /// IMDb id of the parent series.
    pub show_id: String,
    /// Parent series title.
    pub show_title: String,
    /// Season number.
    pub season_number: u32,
    /// Episodes in airing order.
    pub episodes: Vec<Episode>,
}

impl Season {
    /// Maps a `SeasonEpisodes` response.
    ///
    /// The endpoint does not echo the requested season number, so the caller
    /// passes it in.
    ///
    /// # Errors
    ///
    /// Returns an error if an episode carries a non-numeric season or
    /// episode number.
    pub fn from_response(response: &SeasonResponse, season_number: u32) -> Result<Self> {
        let episodes = response
            .episodes
            .as_ref()
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| Episode::from_entry(e, &response.imdb_id, &response.title))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            show_id: response.imdb_id.clone(),
            show_title: response.title.clone(),
            season_number,
            episodes,
        })
    }

    /// The episode with the given 1-based number, if present.
    #[must_use]
    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.iter().find(|e| e.episode == number)
    }

    /// IMDb website link for this season's episode list.
    #[must_use]
    pub fn imdb_link(&self) -> String {
        TitleUrl::for_season(&self.show_id, self.season_number)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Season {} of {} ({})",
            self.season_number, self.show_title, self.show_id
        )
    }
}

/// One episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// IMDb episode id.
    pub id: String,
    /// Episode title.
    pub title: String,
    /// IMDb id of the parent series.
    pub show_id: String,
    /// Parent series title.
    pub show_title: String,
    /// Season number.
    pub season: u32,
    /// Episode number within the season.
    pub episode: u32,
    /// Still image.
    pub image: Option<Image>,
    /// Air date.
    pub release_date: Option<String>,
    /// Plot summary.
    pub plot: Option<String>,
    /// Rating as a decimal string.
    pub imdb_rating: Option<String>,
}

impl Episode {
    /// Maps one episode entry, attaching the parent series identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the season or episode number is non-numeric.
    pub fn from_entry(entry: &EpisodeEntry, show_id: &str, show_title: &str) -> Result<Self> {
        let season: u32 = entry
            .season_number
            .parse()
            .with_context(|| format!("invalid season number for {}", entry.id))?;
        let episode: u32 = entry
            .episode_number
            .parse()
            .with_context(|| format!("invalid episode number for {}", entry.id))?;
        Ok(Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            show_id: String::from(show_id),
            show_title: String::from(show_title),
            season,
            episode,
            image: entry.image.as_deref().map(Image::from_url),
            release_date: entry.released.clone(),
            plot: entry.plot.clone(),
            imdb_rating: entry.imdb_rating.clone(),
        })
    }

    /// IMDb website link for this episode.
    #[must_use]
    pub fn imdb_link(&self) -> String {
        TitleUrl::for_id(&self.id)
    }

    /// IMDb full cast listing link.
    #[must_use]
    pub fn full_cast_link(&self) -> String {
        FullCastUrl::for_title(&self.id)
    }
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} (S{}E{} of {})",
            self.id, self.title, self.season, self.episode, self.show_title
        )
    }
}

/// One billed cast member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
    /// IMDb person id.
    pub id: String,
    /// Person name.
    pub name: String,
    /// Character played.
    pub as_character: String,
    /// Headshot.
    pub image: Option<Image>,
}

impl CastMember {
    /// Maps one cast entry.
    #[must_use]
    pub fn from_entry(entry: &ActorEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            as_character: entry
                .as_character
                .as_deref()
                .map(recover_character)
                .unwrap_or_default(),
            image: entry.image.as_deref().map(Image::from_url),
        }
    }

    /// Maps a cast list, treating `None` as empty.
    #[must_use]
    pub fn from_entries(entries: Option<&Vec<ActorEntry>>) -> Vec<Self> {
        entries
            .map(|list| list.iter().map(Self::from_entry).collect())
            .unwrap_or_default()
    }

    /// IMDb website link for this person.
    #[must_use]
    pub fn imdb_link(&self) -> String {
        PersonUrl::for_person(&self.id)
    }
}

impl fmt::Display for CastMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} as {}", self.id, self.name, self.as_character)
    }
}

/// A person search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    /// IMDb person id.
    pub id: String,
    /// Person name.
    pub name: String,
    /// Headshot.
    pub image: Option<Image>,
}

impl Name {
    /// Maps one `SearchName` hit.
    #[must_use]
    pub fn from_entry(entry: &SearchResult) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.title.clone(),
            image: entry.image.as_deref().map(Image::from_url),
        }
    }

    /// Maps a result list, treating `None` as empty.
    #[must_use]
    pub fn from_entries(entries: Option<&Vec<SearchResult>>) -> Vec<Self> {
        entries
            .map(|list| list.iter().map(Self::from_entry).collect())
            .unwrap_or_default()
    }

    /// IMDb website link for this person.
    #[must_use]
    pub fn imdb_link(&self) -> String {
        PersonUrl::for_person(&self.id)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.name)
    }
}

/// One poster rendition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poster {
    /// Poster id.
    pub id: String,
    /// Rendition size recovered from the link.
    pub size: PosterSize,
    /// Download link.
    pub link: String,
}

impl Poster {
    /// Maps one poster entry.
    #[must_use]
    pub fn from_entry(entry: &PosterEntry) -> Self {
        Self {
            id: entry.id.clone(),
            size: PosterSize::from_link(&entry.link),
            link: entry.link.clone(),
        }
    }

    /// Collects the portrait posters of a `Title` response.
    #[must_use]
    pub fn from_title_response(response: &TitleResponse) -> Vec<Self> {
        response
            .posters
            .as_ref()
            .and_then(|data| data.posters.as_ref())
            .map(|list| list.iter().map(Self::from_entry).collect())
            .unwrap_or_default()
    }

    /// The same poster at a different rendition size.
    #[must_use]
    pub fn with_size(&self, size: PosterSize) -> Self {
        Self {
            id: self.id.clone(),
            size,
            link: PosterUrl::with_size(&self.id, size),
        }
    }
}

impl fmt::Display for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.size)
    }
}

/// An image reference with best-effort size and ratio metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image id (the path tail of the download URL).
    pub id: String,
    /// Rendition size encoded in the URL.
    pub size: ImageSize,
    /// Aspect ratio embedded in the id, when parsable.
    pub aspect_ratio: Option<crate::image::AspectRatio>,
    /// Download link.
    pub link: String,
}

impl Image {
    /// Parses an image URL, degrading gracefully for externally hosted
    /// links that carry no size or ratio metadata.
    #[must_use]
    pub fn from_url(link: &str) -> Self {
        match image_info_from_url(link) {
            Ok((size, aspect_ratio, id)) => Self {
                id,
                size,
                aspect_ratio: Some(aspect_ratio),
                link: String::from(link),
            },
            Err(_) => Self {
                id: String::from(link),
                size: ImageSize::Original,
                aspect_ratio: None,
                link: String::from(link),
            },
        }
    }

    /// The same image at a different rendition size.
    #[must_use]
    pub fn with_size(&self, size: ImageSize) -> Self {
        let aspect_ratio = self
            .aspect_ratio
            .and_then(|original| size.aspect_ratio(original).ok());
        Self {
            id: self.id.clone(),
            size,
            aspect_ratio,
            link: ImageUrl::with_size(&self.id, &size),
        }
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.size)
    }
}

/// Splits the API's comma-separated genre string.
fn split_genres(genres: Option<&str>) -> Vec<String> {
    genres
        .map(|g| g.split(", ").map(String::from).collect())
        .unwrap_or_default()
}

/// Recovers the character name from the API's duplicated `asCharacter`
/// billing, which arrives as e.g. `"Aangas Aang"` (`"{char}as {char}"`).
///
/// Takes the first half, as the duplicated suffix is `"as "` plus the same
/// text again.
fn recover_character(billing: &str) -> String {
    let chars: Vec<char> = billing.chars().collect();
    let end = chars.len().saturating_sub(3) / 2;
    chars.into_iter().take(end).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::imdb::types::{SearchResponse, TitleResponse};

    fn series_response() -> TitleResponse {
        let json = include_str!("../../../fixtures/imdb/title_tvseries_tt0417299.json");
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_recover_character_strips_duplication() {
        // Arrange & Act & Assert
        assert_eq!(recover_character("Aangas Aang"), "Aang");
        assert_eq!(recover_character("Kataraas Katara"), "Katara");
        assert_eq!(recover_character(""), "");
    }

    #[test]
    fn test_title_from_search_fixture() {
        // Arrange
        let json = include_str!("../../../fixtures/imdb/search_series_avatar.json");
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        // Act
        let titles = Title::from_entries(response.results.as_ref());

        // Assert
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].id, "tt0417299");
        assert_eq!(
            titles[0].imdb_link(),
            "https://www.imdb.com/title/tt0417299"
        );
        assert!(titles[0].image.is_some());
    }

    #[test]
    fn test_title_from_empty_search() {
        // Arrange
        let json = include_str!("../../../fixtures/imdb/search_title_empty.json");
        let response: SearchResponse = serde_json::from_str(json).unwrap();

        // Act
        let titles = Title::from_entries(response.results.as_ref());

        // Assert
        assert!(titles.is_empty());
    }

    #[test]
    fn test_tv_series_from_response() {
        // Arrange
        let response = series_response();

        // Act
        let series = TvSeries::from_response(&response);

        // Assert
        assert_eq!(series.id, "tt0417299");
        assert_eq!(series.genres, vec!["Animation", "Action", "Adventure"]);
        assert_eq!(series.seasons, vec!["1", "2", "3"]);
        assert_eq!(series.cast.len(), 3);
        assert_eq!(series.cast[0].as_character, "Aang");
        assert_eq!(series.posters.len(), 2);
        assert!(series.contains_season(2));
        assert!(!series.contains_season(4));
        assert_eq!(series.season_numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn test_movie_from_response() {
        // Arrange
        let json = include_str!("../../../fixtures/imdb/title_movie_tt0120737.json");
        let response: TitleResponse = serde_json::from_str(json).unwrap();

        // Act
        let movie = Movie::from_response(&response);

        // Assert
        assert_eq!(movie.id, "tt0120737");
        assert_eq!(movie.cast.len(), 2);
        assert_eq!(movie.cast[0].as_character, "Frodo");
        assert_eq!(movie.posters.len(), 1);
    }

    #[test]
    fn test_season_from_response() {
        // Arrange
        let json = include_str!("../../../fixtures/imdb/season_tt0417299_1.json");
        let response: crate::imdb::types::SeasonResponse = serde_json::from_str(json).unwrap();

        // Act
        let season = Season::from_response(&response, 1).unwrap();

        // Assert
        assert_eq!(season.season_number, 1);
        assert_eq!(season.episodes.len(), 3);
        let first = season.episode(1).unwrap();
        assert_eq!(first.title, "The Boy in the Iceberg");
        assert_eq!(first.show_id, "tt0417299");
        assert_eq!(
            season.imdb_link(),
            "https://www.imdb.com/title/tt0417299/episodes?season=1"
        );
    }

    #[test]
    fn test_poster_size_recovered_from_link() {
        // Arrange
        let response = series_response();

        // Act
        let posters = Poster::from_title_response(&response);

        // Assert
        assert_eq!(posters[0].size, PosterSize::Original);
        assert_eq!(posters[1].size, PosterSize::Wide500);
    }

    #[test]
    fn test_poster_with_size_rebuilds_link() {
        // Arrange
        let poster = Poster {
            id: String::from("abc"),
            size: PosterSize::Original,
            link: String::from("https://imdb-api.com/posters/original/abc"),
        };

        // Act
        let resized = poster.with_size(PosterSize::Wide154);

        // Assert
        assert_eq!(resized.link, "https://imdb-api.com/Posters/w154/abc");
        assert_eq!(resized.size, PosterSize::Wide154);
    }

    #[test]
    fn test_image_from_url_parses_metadata() {
        // Arrange
        let url = "https://imdb-api.com/images/original/MV5B._V1_Ratio0.7273_AL_.jpg";

        // Act
        let image = Image::from_url(url);

        // Assert
        assert_eq!(image.size, ImageSize::Original);
        assert_eq!(image.id, "MV5B._V1_Ratio0.7273_AL_.jpg");
        assert!(image.aspect_ratio.is_some());
    }

    #[test]
    fn test_image_from_external_url_degrades() {
        // Arrange
        let url = "https://m.media-amazon.com/images/M/whatever.jpg";

        // Act
        let image = Image::from_url(url);

        // Assert
        assert_eq!(image.aspect_ratio, None);
        assert_eq!(image.link, url);
    }

    #[test]
    fn test_image_with_size_rebuilds_link() {
        // Arrange
        let image = Image::from_url("https://imdb-api.com/images/original/id_Ratio1.0000_AL_.jpg");

        // Act
        let resized = image.with_size(ImageSize::with_dims(100, 50));

        // Assert
        assert_eq!(
            resized.link,
            "https://imdb-api.com/Images/100x50/id_Ratio1.0000_AL_.jpg"
        );
        assert_eq!(
            resized.aspect_ratio,
            Some(crate::image::AspectRatio::from_scaled(20_000).unwrap())
        );
    }

    #[test]
    fn test_display_formats() {
        // Arrange
        let response = series_response();
        let series = TvSeries::from_response(&response);

        // Act & Assert
        assert_eq!(
            series.to_string(),
            "tt0417299 - Avatar: The Last Airbender (TV Series 2005-2008)"
        );
        assert_eq!(
            series.cast[0].to_string(),
            "nm1364610: Zach Tyler Eisen as Aang"
        );
    }
}
