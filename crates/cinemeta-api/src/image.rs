//! Image sizing, aspect-ratio math, and image URL construction.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

/// URL template for image downloads.
const IMAGE_URL_FORMAT: &str = "https://imdb-api.com/Images";

/// Fixed-point scale for aspect ratios (four fractional digits).
const RATIO_SCALE: u32 = 10_000;

/// Regex extracting the size segment and image id from an image URL.
#[allow(clippy::expect_used)]
static IMAGE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)images/([^/]+)/(.+)$").expect("failed to compile image path regex")
});

/// Regex extracting the `_Ratio` fragment embedded in image ids.
#[allow(clippy::expect_used)]
static RATIO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_Ratio([0-9]+(?:[.:][0-9]+)?)").expect("failed to compile ratio regex")
});

/// Requested rendition size for an image download.
///
/// `Original` is a plain variant: requesting it leaves the source dimensions
/// (and therefore the source aspect ratio) untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// The source rendition, dimensions unknown to the client.
    Original,
    /// An exact pixel size.
    Dimensions {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },
}

impl ImageSize {
    /// Builds an exact pixel size.
    #[must_use]
    pub const fn with_dims(width: u32, height: u32) -> Self {
        Self::Dimensions { width, height }
    }

    /// Parses a URL size descriptor (`original` or `{width}x{height}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is neither form.
    pub fn from_descriptor(desc: &str) -> Result<Self> {
        if desc.eq_ignore_ascii_case("original") {
            return Ok(Self::Original);
        }
        let (width, height) = desc
            .to_ascii_lowercase()
            .split_once('x')
            .map(|(w, h)| (String::from(w), String::from(h)))
            .with_context(|| format!("invalid image size descriptor: {desc}"))?;
        let width: u32 = width
            .parse()
            .with_context(|| format!("invalid image width: {width}"))?;
        let height: u32 = height
            .parse()
            .with_context(|| format!("invalid image height: {height}"))?;
        Ok(Self::Dimensions { width, height })
    }

    /// The aspect ratio this rendition will have, given the source ratio.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions form an illegal ratio.
    pub fn aspect_ratio(&self, original: AspectRatio) -> Result<AspectRatio> {
        match *self {
            Self::Original => Ok(original),
            Self::Dimensions { width, height } => AspectRatio::from_dims(width, height),
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Original => f.write_str("original"),
            Self::Dimensions { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

/// Width-to-height ratio in fixed point (scaled by 10,000).
///
/// Fixed point keeps equality and ordering exact across parse/format round
/// trips, which float ratios would not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AspectRatio(u32);

impl AspectRatio {
    /// Builds a ratio from its scaled integer form.
    ///
    /// # Errors
    ///
    /// Returns an error for ratios outside `(0, 100)`.
    pub fn from_scaled(scaled: u32) -> Result<Self> {
        if scaled == 0 || scaled >= RATIO_SCALE.saturating_mul(100) {
            bail!("{} is an illegal aspect ratio", f64::from(scaled) / f64::from(RATIO_SCALE));
        }
        Ok(Self(scaled))
    }

    /// Builds a ratio from a float such as `1.7778`.
    ///
    /// # Errors
    ///
    /// Returns an error for non-finite or out-of-range values.
    #[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_float(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            bail!("{value} is an illegal aspect ratio");
        }
        Self::from_scaled((value * f64::from(RATIO_SCALE)).round() as u32)
    }

    /// Builds a ratio from pixel dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if `height` is zero or the ratio is out of range.
    pub fn from_dims(width: u32, height: u32) -> Result<Self> {
        if height == 0 {
            bail!("aspect ratio requires a non-zero height");
        }
        Self::from_float(f64::from(width) / f64::from(height))
    }

    /// Extracts the ratio embedded in an image URL or id, e.g.
    /// `..._Ratio0.6762_AL_.jpg`.
    ///
    /// # Errors
    ///
    /// Returns an error if no `_Ratio` fragment is present or it does not
    /// parse.
    pub fn from_url_or_id(url: &str) -> Result<Self> {
        let caps = RATIO_RE
            .captures(url)
            .with_context(|| format!("no aspect ratio fragment in {url}"))?;
        let text = caps
            .get(1)
            .context("ratio capture group missing")?
            .as_str();
        text.parse()
    }

    /// The ratio as a float.
    #[must_use]
    pub fn as_float(self) -> f64 {
        f64::from(self.0) / f64::from(RATIO_SCALE)
    }
}

impl FromStr for AspectRatio {
    type Err = anyhow::Error;

    /// Parses `1.7778` style floats and `16:9` style dimension pairs.
    fn from_str(s: &str) -> Result<Self> {
        if let Some((width, height)) = s.split_once(':') {
            let width: u32 = width
                .parse()
                .with_context(|| format!("{s} is an illegal aspect ratio"))?;
            let height: u32 = height
                .parse()
                .with_context(|| format!("{s} is an illegal aspect ratio"))?;
            return Self::from_dims(width, height);
        }
        let value: f64 = s
            .parse()
            .with_context(|| format!("{s} is an illegal aspect ratio"))?;
        Self::from_float(value)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:04}",
            self.0.checked_div(RATIO_SCALE).unwrap_or(0),
            self.0.checked_rem(RATIO_SCALE).unwrap_or(0)
        )
    }
}

/// Recovers `(size, aspect ratio, image id)` from an image download URL.
///
/// # Errors
///
/// Returns an error if the URL has no `images/{size}/{id}` path or no
/// ratio fragment.
pub fn image_info_from_url(url: &str) -> Result<(ImageSize, AspectRatio, String)> {
    let caps = IMAGE_PATH_RE
        .captures(url)
        .with_context(|| format!("not an image URL: {url}"))?;
    let size = ImageSize::from_descriptor(
        caps.get(1).context("size capture group missing")?.as_str(),
    )?;
    let id = String::from(caps.get(2).context("id capture group missing")?.as_str());
    let aspect_ratio = AspectRatio::from_url_or_id(url)?;
    Ok((size, aspect_ratio, id))
}

/// Image download URL builder with fit/fill sizing helpers.
#[derive(Debug)]
pub struct ImageUrl;

impl ImageUrl {
    /// Builds the download URL for `image_id` at `size`.
    #[must_use]
    pub fn with_size(image_id: &str, size: &ImageSize) -> String {
        format!("{IMAGE_URL_FORMAT}/{size}/{image_id}")
    }

    /// Builds the download URL for an exact pixel size.
    #[must_use]
    pub fn with_dims(image_id: &str, width: u32, height: u32) -> String {
        Self::with_size(image_id, &ImageSize::with_dims(width, height))
    }

    /// Builds the download URL for the source rendition.
    #[must_use]
    pub fn with_original_size(image_id: &str) -> String {
        Self::with_size(image_id, &ImageSize::Original)
    }

    /// Builds a URL for the largest rendition contained by the given box
    /// (letterboxing: no cropping, the source ratio is preserved).
    ///
    /// # Errors
    ///
    /// Returns an error if `image_id` carries no ratio fragment or the box
    /// forms an illegal ratio.
    pub fn to_fit(image_id: &str, width: u32, height: u32) -> Result<String> {
        let original = AspectRatio::from_url_or_id(image_id)?;
        let (real_width, real_height) = fit_dimensions(original, width, height)?;
        Ok(Self::with_dims(image_id, real_width, real_height))
    }

    /// Builds a URL for the smallest rendition covering the given box
    /// (the source ratio is preserved; overflow is expected to be cropped
    /// by the consumer).
    ///
    /// # Errors
    ///
    /// Returns an error if `image_id` carries no ratio fragment or the box
    /// forms an illegal ratio.
    pub fn to_fill(image_id: &str, width: u32, height: u32) -> Result<String> {
        let original = AspectRatio::from_url_or_id(image_id)?;
        let (real_width, real_height) = fill_dimensions(original, width, height)?;
        Ok(Self::with_dims(image_id, real_width, real_height))
    }
}

/// Largest dimensions with the source ratio contained by the desired box.
#[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_dimensions(original: AspectRatio, width: u32, height: u32) -> Result<(u32, u32)> {
    let desired = AspectRatio::from_dims(width, height)?;
    if desired == original {
        Ok((width, height))
    } else if desired > original {
        // Box is wider than the source: height constrains.
        Ok(((f64::from(height) * original.as_float()).round() as u32, height))
    } else {
        Ok((width, (f64::from(width) / original.as_float()).round() as u32))
    }
}

/// Smallest dimensions with the source ratio covering the desired box.
#[allow(clippy::as_conversions, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fill_dimensions(original: AspectRatio, width: u32, height: u32) -> Result<(u32, u32)> {
    let desired = AspectRatio::from_dims(width, height)?;
    if desired == original {
        Ok((width, height))
    } else if desired > original {
        // Box is wider than the source: width constrains.
        Ok((width, (f64::from(width) / original.as_float()).round() as u32))
    } else {
        Ok(((f64::from(height) * original.as_float()).round() as u32, height))
    }
}
