//! The two images a session juggles: the source the user picked and the
//! compressed copy derived from it.

use crate::imaging::{
    BackendError, DeclaredType, Dimensions, ImageBackend, MediaType, Quality, compression_ratio,
};
use crate::naming::compressed_file_name;
use bytes::Bytes;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not an image: {0}")]
    NotAnImage(String),
    #[error("Unsupported image type {mime} for {name} (only PNG and JPEG)")]
    UnsupportedType { name: String, mime: &'static str },
    #[error("{name} is {pixels} pixels, limit is {limit}")]
    TooLarge { name: String, pixels: u64, limit: u64 },
    #[error(transparent)]
    Decode(#[from] BackendError),
}

/// An uploaded image. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct SourceImage {
    name: String,
    data: Bytes,
    dimensions: Dimensions,
    media_type: MediaType,
}

impl SourceImage {
    /// Load from memory.
    ///
    /// The declared media type comes from `name`'s extension, falling back to
    /// sniffing the bytes when there is none. Dimensions come from the image
    /// header; the body is not decoded until compression.
    pub fn from_bytes(
        backend: &impl ImageBackend,
        name: impl Into<String>,
        data: impl Into<Bytes>,
        max_pixels: u64,
    ) -> Result<Self, SourceError> {
        let name = name.into();
        let data = data.into();

        let media_type = match DeclaredType::from_name(&name) {
            DeclaredType::Supported(media) => media,
            DeclaredType::OtherImage(format) => {
                return Err(SourceError::UnsupportedType {
                    name,
                    mime: format.to_mime_type(),
                });
            }
            DeclaredType::NotImage => return Err(SourceError::NotAnImage(name)),
            DeclaredType::Unknown => sniff(&name, &data)?,
        };

        let dimensions = backend.identify(&data)?;
        let pixels = u64::from(dimensions.width) * u64::from(dimensions.height);
        if pixels > max_pixels {
            return Err(SourceError::TooLarge {
                name,
                pixels,
                limit: max_pixels,
            });
        }

        log::debug!(
            "loaded {} ({}, {}x{}, {} bytes)",
            name,
            media_type,
            dimensions.width,
            dimensions.height,
            data.len()
        );

        Ok(Self {
            name,
            data,
            dimensions,
            media_type,
        })
    }

    /// Read a file from disk. The file name (not the full path) becomes the
    /// source name.
    pub fn open(
        backend: &impl ImageBackend,
        path: &Path,
        max_pixels: u64,
    ) -> Result<Self, SourceError> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(backend, name, data, max_pixels)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.dimensions.width, self.dimensions.height)
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

fn sniff(name: &str, data: &[u8]) -> Result<MediaType, SourceError> {
    let format =
        image::guess_format(data).map_err(|_| SourceError::NotAnImage(name.to_string()))?;
    MediaType::from_format(format).ok_or_else(|| SourceError::UnsupportedType {
        name: name.to_string(),
        mime: format.to_mime_type(),
    })
}

/// Output of one compression pass. Never mutated; a new quality produces a
/// new value.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub data: Bytes,
    pub media_type: MediaType,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

impl CompressedImage {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Percentage saved relative to `source`, one decimal place.
    pub fn ratio(&self, source: &SourceImage) -> f64 {
        compression_ratio(source.size(), self.size())
    }

    /// Download name: `<source stem>_compressed.<jpg|png>`.
    pub fn file_name(&self, source: &SourceImage) -> String {
        compressed_file_name(source.name(), self.media_type)
    }

    /// Write into `dir` under [`file_name`](Self::file_name), returning the path.
    pub fn save(&self, source: &SourceImage, dir: &Path) -> std::io::Result<std::path::PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name(source));
        std::fs::write(&path, &self.data)?;
        Ok(path)
    }
}
