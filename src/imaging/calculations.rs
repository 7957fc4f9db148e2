//! Pure calculation functions for the compression policy.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{MediaType, Quality};

/// Below this quality every output is JPEG, whatever the source type.
pub const JPEG_THRESHOLD: f64 = 0.8;

/// Calculate output dimensions for a source image at a given quality.
///
/// PNG is lossless, so resolution is its only lever: each side scales by
/// `sqrt(quality)`, which makes the pixel *area* scale linearly with quality.
/// Every other type keeps its dimensions and relies on the lossy encoder.
///
/// Each side is clamped to at least one pixel.
///
/// # Examples
/// ```
/// # use squish::imaging::{MediaType, Quality, output_dimensions};
/// assert_eq!(output_dimensions((1000, 1000), MediaType::Png, Quality::new(0.5)), (707, 707));
/// assert_eq!(output_dimensions((1000, 1000), MediaType::Jpeg, Quality::new(0.5)), (1000, 1000));
/// ```
pub fn output_dimensions(source: (u32, u32), media_type: MediaType, quality: Quality) -> (u32, u32) {
    let (width, height) = source;
    if media_type != MediaType::Png {
        return (width, height);
    }

    let scale = quality.value().sqrt();
    let scaled = |side: u32| ((f64::from(side) * scale).floor() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Pick the encoding for the output.
pub fn output_media_type(source: MediaType, quality: Quality) -> MediaType {
    if quality.value() < JPEG_THRESHOLD {
        MediaType::Jpeg
    } else {
        source
    }
}

/// Percentage size reduction, rounded to one decimal place.
///
/// Negative when the output grew. A zero-byte source reports `0.0`.
pub fn compression_ratio(source_size: u64, compressed_size: u64) -> f64 {
    if source_size == 0 {
        return 0.0;
    }
    let ratio = (1.0 - compressed_size as f64 / source_size as f64) * 100.0;
    (ratio * 10.0).round() / 10.0
}
