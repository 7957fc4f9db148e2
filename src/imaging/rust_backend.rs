//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG) | `image::ImageReader::decode` |
//! | Resample | `DynamicImage::resize_exact` with a smooth [`ResizeFilter`](super::ResizeFilter) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! Both encoders are deterministic: the same parameters always yield the same
//! bytes.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{CompressParams, MediaType};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(format!("Failed to sniff format: {}", e)))
}

/// Decode an in-memory image.
fn load_image(bytes: &[u8]) -> Result<DynamicImage, BackendError> {
    reader(bytes)?
        .decode()
        .map_err(|e| BackendError::Decode(format!("Failed to decode image: {}", e)))
}

/// Encode to JPEG. The encoder has no alpha channel, so pixels go through RGB8.
fn encode_jpeg(img: &DynamicImage, level: u8) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, level);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

/// Encode to PNG. Float buffers have no PNG representation and drop to RGBA8.
fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let converted;
    let img = match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            converted = DynamicImage::ImageRgba8(img.to_rgba8());
            &converted
        }
        other => other,
    };
    let mut buf = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut buf))
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(bytes)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(format!("Failed to read dimensions: {}", e)))?;
        Ok(Dimensions { width, height })
    }

    fn compress(&self, params: &CompressParams) -> Result<Vec<u8>, BackendError> {
        if params.width == 0 || params.height == 0 {
            return Err(BackendError::Encode(format!(
                "Refusing to encode a {}x{} image",
                params.width, params.height
            )));
        }

        let img = load_image(&params.source)?;
        let resized = if img.dimensions() == (params.width, params.height) {
            img
        } else {
            img.resize_exact(params.width, params.height, params.filter.filter_type())
        };

        match params.output {
            MediaType::Jpeg => encode_jpeg(&resized, params.quality.jpeg_level()),
            MediaType::Png => encode_png(&resized),
        }
    }
}
