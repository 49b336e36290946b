//! Poster size table and poster URL construction.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// URL template for poster downloads.
const POSTER_URL_FORMAT: &str = "https://imdb-api.com/Posters";

/// Regex extracting the size segment from a poster link.
#[allow(clippy::expect_used)]
static POSTER_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/posters/([^/]+)/").expect("failed to compile poster size regex")
});

/// Poster rendition sizes offered by the API.
///
/// `Wide*` variants are constrained by width, `Square*` variants by the
/// square edge length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum PosterSize {
    Original,
    Wide45,
    Wide92,
    Wide154,
    Wide185,
    Wide200,
    Wide300,
    Wide342,
    Wide400,
    Wide500,
    Wide780,
    Wide1280,
    Square32,
    Square45,
    Square50,
    Square64,
    Square66,
    Square90,
    Square100,
    Square115,
    Square128,
    Square132,
    Square150,
    Square180,
    Square230,
    Square235,
    Square264,
    Square300,
    Square375,
    Square470,
}

impl PosterSize {
    /// The size code used in poster URLs.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Wide45 => "w45",
            Self::Wide92 => "w92",
            Self::Wide154 => "w154",
            Self::Wide185 => "w185",
            Self::Wide200 => "w200",
            Self::Wide300 => "w300",
            Self::Wide342 => "w342",
            Self::Wide400 => "w400",
            Self::Wide500 => "w500",
            Self::Wide780 => "w780",
            Self::Wide1280 => "w1280",
            Self::Square32 => "s32",
            Self::Square45 => "s45",
            Self::Square50 => "s50",
            Self::Square64 => "s64",
            Self::Square66 => "s66",
            Self::Square90 => "s90",
            Self::Square100 => "s100",
            Self::Square115 => "s115",
            Self::Square128 => "s128",
            Self::Square132 => "s132",
            Self::Square150 => "s150",
            Self::Square180 => "s180",
            Self::Square230 => "s230",
            Self::Square235 => "s235",
            Self::Square264 => "s264",
            Self::Square300 => "s300",
            Self::Square375 => "s375",
            Self::Square470 => "s470",
        }
    }

    /// Parses a size code (`original`, `w500`, `s235`, ...).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "original" => Some(Self::Original),
            "w45" => Some(Self::Wide45),
            "w92" => Some(Self::Wide92),
            "w154" => Some(Self::Wide154),
            "w185" => Some(Self::Wide185),
            "w200" => Some(Self::Wide200),
            "w300" => Some(Self::Wide300),
            "w342" => Some(Self::Wide342),
            "w400" => Some(Self::Wide400),
            "w500" => Some(Self::Wide500),
            "w780" => Some(Self::Wide780),
            "w1280" => Some(Self::Wide1280),
            "s32" => Some(Self::Square32),
            "s45" => Some(Self::Square45),
            "s50" => Some(Self::Square50),
            "s64" => Some(Self::Square64),
            "s66" => Some(Self::Square66),
            "s90" => Some(Self::Square90),
            "s100" => Some(Self::Square100),
            "s115" => Some(Self::Square115),
            "s128" => Some(Self::Square128),
            "s132" => Some(Self::Square132),
            "s150" => Some(Self::Square150),
            "s180" => Some(Self::Square180),
            "s230" => Some(Self::Square230),
            "s235" => Some(Self::Square235),
            "s264" => Some(Self::Square264),
            "s300" => Some(Self::Square300),
            "s375" => Some(Self::Square375),
            "s470" => Some(Self::Square470),
            _ => None,
        }
    }

    /// Recovers the size from a poster link's `/Posters/{size}/` segment.
    ///
    /// Unknown or missing segments fall back to [`PosterSize::Original`].
    #[must_use]
    pub fn from_link(link: &str) -> Self {
        POSTER_SIZE_RE
            .captures(link)
            .and_then(|caps| caps.get(1))
            .and_then(|m| Self::from_code(m.as_str()))
            .unwrap_or(Self::Original)
    }
}

impl fmt::Display for PosterSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Poster download URL builder.
#[derive(Debug)]
pub struct PosterUrl;

impl PosterUrl {
    /// Builds the download URL for `poster_id` at `size`.
    #[must_use]
    pub fn with_size(poster_id: &str, size: PosterSize) -> String {
        format!("{POSTER_URL_FORMAT}/{size}/{poster_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_size_builds_expected_url() {
        // Arrange & Act
        let url = PosterUrl::with_size("abc123.jpg", PosterSize::Wide500);

        // Assert
        assert_eq!(url, "https://imdb-api.com/Posters/w500/abc123.jpg");
    }

    #[test]
    fn test_code_round_trips() {
        // Arrange & Act & Assert
        for size in [
            PosterSize::Original,
            PosterSize::Wide1280,
            PosterSize::Square470,
        ] {
            assert_eq!(PosterSize::from_code(size.code()), Some(size));
        }
    }

    #[test]
    fn test_from_link_extracts_size_segment() {
        // Arrange
        let link = "https://imdb-api.com/posters/w300/abc123.jpg";

        // Act & Assert
        assert_eq!(PosterSize::from_link(link), PosterSize::Wide300);
    }

    #[test]
    fn test_from_link_falls_back_to_original() {
        // Arrange: externally hosted link without a size segment
        let link = "https://m.media-amazon.com/images/M/abc123.jpg";

        // Act & Assert
        assert_eq!(PosterSize::from_link(link), PosterSize::Original);
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        // Arrange & Act & Assert
        assert_eq!(PosterSize::from_code("w9999"), None);
    }
}
