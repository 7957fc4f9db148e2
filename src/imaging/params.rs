//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`operations`](super::operations) module (which
//! decides dimensions and output type) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping backends
//! (e.g. for testing with a mock) without changing policy logic.
//!
//! ## Types
//!
//! - [`Quality`] — Normalized compression quality in `[0, 1]`. Clamped on construction.
//! - [`MediaType`] — The two encodings the policy chooses between.
//! - [`ResizeFilter`] — Smooth resampling filters. Nearest-neighbour is deliberately absent.
//! - [`CompressParams`] — Full specification for one compression: source bytes, output size, type, quality.

use bytes::Bytes;
use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Normalized quality in the closed interval `[0, 1]`.
///
/// Drives both the PNG resampling scale and the JPEG encoder level.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Quality(f64);

impl Quality {
    /// Clamp `value` into `[0, 1]`. NaN maps to 0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Build from a 0–100 slider value.
    pub fn from_percent(percent: u32) -> Self {
        Self::new(f64::from(percent) / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Slider position, rounded to the nearest whole percent.
    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    /// Quality level for the JPEG encoder, which accepts 1–100.
    pub fn jpeg_level(self) -> u8 {
        ((self.0 * 100.0).round() as u8).clamp(1, 100)
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.8)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Encoded image type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Jpeg,
    Png,
}

impl MediaType {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Extension used for saved output files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            _ => None,
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// What a file name's extension says about its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    /// A PNG or JPEG extension.
    Supported(MediaType),
    /// An image extension for a format we do not encode (gif, webp, ...).
    OtherImage(ImageFormat),
    /// An extension that is not an image at all (txt, pdf, ...).
    NotImage,
    /// No extension; the bytes have to speak for themselves.
    Unknown,
}

impl DeclaredType {
    pub fn from_name(name: &str) -> Self {
        let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
            return Self::Unknown;
        };
        match ImageFormat::from_extension(ext) {
            Some(format) => match MediaType::from_format(format) {
                Some(media) => Self::Supported(media),
                None => Self::OtherImage(format),
            },
            None => Self::NotImage,
        }
    }
}

/// Resampling filter used when the output size differs from the source.
///
/// Only smooth filters are representable; `image`'s `Nearest` is not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    /// Bilinear.
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parameters for one decode → resample → encode pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressParams {
    pub source: Bytes,
    pub width: u32,
    pub height: u32,
    pub output: MediaType,
    pub quality: Quality,
    pub filter: ResizeFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_unit_interval() {
        assert_eq!(Quality::new(-0.5).value(), 0.0);
        assert_eq!(Quality::new(0.42).value(), 0.42);
        assert_eq!(Quality::new(7.0).value(), 1.0);
    }

    #[test]
    fn quality_nan_is_zero() {
        assert_eq!(Quality::new(f64::NAN).value(), 0.0);
    }

    #[test]
    fn quality_from_percent() {
        assert_eq!(Quality::from_percent(75).value(), 0.75);
        assert_eq!(Quality::from_percent(250).value(), 1.0);
    }

    #[test]
    fn quality_displays_as_percent() {
        assert_eq!(Quality::new(0.5).to_string(), "50%");
        assert_eq!(Quality::default().to_string(), "80%");
    }

    #[test]
    fn jpeg_level_stays_in_encoder_range() {
        assert_eq!(Quality::new(0.0).jpeg_level(), 1);
        assert_eq!(Quality::new(0.5).jpeg_level(), 50);
        assert_eq!(Quality::new(0.926).jpeg_level(), 93);
        assert_eq!(Quality::new(1.0).jpeg_level(), 100);
    }

    #[test]
    fn media_type_extensions() {
        assert_eq!(MediaType::Jpeg.extension(), "jpg");
        assert_eq!(MediaType::Png.extension(), "png");
        assert_eq!(MediaType::Png.to_string(), "image/png");
    }

    #[test]
    fn declared_type_from_name() {
        assert_eq!(
            DeclaredType::from_name("cat.PNG"),
            DeclaredType::Supported(MediaType::Png)
        );
        assert_eq!(
            DeclaredType::from_name("cat.jpeg"),
            DeclaredType::Supported(MediaType::Jpeg)
        );
        assert_eq!(
            DeclaredType::from_name("cat.gif"),
            DeclaredType::OtherImage(ImageFormat::Gif)
        );
        assert_eq!(DeclaredType::from_name("notes.txt"), DeclaredType::NotImage);
        assert_eq!(DeclaredType::from_name("README"), DeclaredType::Unknown);
    }

    #[test]
    fn resize_filter_parses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            filter: ResizeFilter,
        }
        let w: Wrapper = toml::from_str(r#"filter = "catmull-rom""#).unwrap();
        assert_eq!(w.filter, ResizeFilter::CatmullRom);
        assert!(toml::from_str::<Wrapper>(r#"filter = "nearest""#).is_err());
    }
}
