//! Image processing: the compression policy and the pixel work behind it.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resample** | `resize_exact` with a smooth filter (Lanczos3 by default) |
//! | **Encode** | `JpegEncoder` (quality-driven) / `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimensions, output type and ratio (unit testable)
//! - **Parameters**: Data structures describing a compression
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{JPEG_THRESHOLD, compression_ratio, output_dimensions, output_media_type};
pub use operations::{compress, plan_compression};
pub use params::{CompressParams, DeclaredType, MediaType, Quality, ResizeFilter};
pub use rust_backend::RustBackend;
