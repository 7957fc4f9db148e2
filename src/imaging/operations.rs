//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take a source and a quality, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{output_dimensions, output_media_type};
use super::params::{CompressParams, Quality, ResizeFilter};
use crate::types::{CompressedImage, SourceImage};
use bytes::Bytes;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan a compression without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_compression(
    source: &SourceImage,
    quality: Quality,
    filter: ResizeFilter,
) -> CompressParams {
    let (width, height) = output_dimensions(source.dimensions(), source.media_type(), quality);

    CompressParams {
        source: source.data().clone(),
        width,
        height,
        output: output_media_type(source.media_type(), quality),
        quality,
        filter,
    }
}

/// Compress `source` at `quality`.
///
/// PNG sources are downscaled by `sqrt(quality)` per side; anything below
/// 80% quality is re-encoded as JPEG.
pub fn compress(
    backend: &impl ImageBackend,
    source: &SourceImage,
    quality: Quality,
    filter: ResizeFilter,
) -> Result<CompressedImage> {
    let params = plan_compression(source, quality, filter);
    let data = backend.compress(&params)?;

    log::debug!(
        "{} @ {}: {}x{} {} -> {}x{} {} ({} -> {} bytes)",
        source.name(),
        quality,
        source.dimensions().0,
        source.dimensions().1,
        source.media_type(),
        params.width,
        params.height,
        params.output,
        source.size(),
        data.len()
    );

    Ok(CompressedImage {
        data: Bytes::from(data),
        media_type: params.output,
        width: params.width,
        height: params.height,
        quality,
    })
}
