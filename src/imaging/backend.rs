//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: identify and compress.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests substitute a recording mock so policy and session logic can be
//! exercised without encoding pixels.

use super::params::CompressParams;
use thiserror::Error;

/// Failures from the pixel layer. Both are terminal for one attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Send + Sync` because the session hands the backend to blocking worker
/// threads.
pub trait ImageBackend: Send + Sync {
    /// Read pixel dimensions from the image header.
    fn identify(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode `params.source`, resample to the requested size and encode.
    fn compress(&self, params: &CompressParams) -> Result<Vec<u8>, BackendError>;
}
