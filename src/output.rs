//! CLI output formatting.
//!
//! Every command prints through a `format_*` function that returns lines,
//! so the exact text is unit-testable, and a thin `print_*` wrapper.
//!
//! # Output Format
//!
//! ## Inspect
//!
//! ```text
//! holiday.png
//!     Type: image/png
//!     Dimensions: 1000x1000
//!     Size: 1.91 MB
//! ```
//!
//! ## Compress
//!
//! ```text
//! holiday.png @ 50%
//!     Original: 1000x1000 image/png, 1.91 MB
//!     Compressed: 707x707 image/jpeg, 96.55 KB (95.1% smaller)
//!     Saved: out/holiday_compressed.jpg
//! ```
//!
//! ## Tune
//!
//! One line per session event:
//!
//! ```text
//! #3 50% → 707x707 image/jpeg, 96.55 KB (95.1% smaller)
//! #4 discarded
//! ```

use crate::imaging::MediaType;
use crate::session::SessionEvent;
use crate::types::{CompressedImage, SourceImage};
use serde::Serialize;
use std::path::Path;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable byte count: `1536` → `"1.5 KB"`.
///
/// The unit is `floor(log1024(bytes))`, capped at GB. The value keeps at most
/// two decimals with trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut whole = bytes;
    while whole >= 1024 && unit < SIZE_UNITS.len() - 1 {
        whole /= 1024;
        unit += 1;
    }

    // Ties round up (1.125 → 1.13); `{:.2}` alone would round them to even.
    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let value = (value * 100.0).round() / 100.0;
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, SIZE_UNITS[unit])
}

/// `"<size> (<ratio>% smaller)"`, the ratio printed to one decimal.
pub fn format_compressed_size(image: &CompressedImage, source: &SourceImage) -> String {
    format!(
        "{} ({:.1}% smaller)",
        format_file_size(image.size()),
        image.ratio(source)
    )
}

fn describe(width: u32, height: u32, media_type: MediaType) -> String {
    format!("{}x{} {}", width, height, media_type)
}

pub fn format_inspect_output(source: &SourceImage) -> Vec<String> {
    let (width, height) = source.dimensions();
    vec![
        source.name().to_string(),
        format!("    Type: {}", source.media_type()),
        format!("    Dimensions: {}x{}", width, height),
        format!("    Size: {}", format_file_size(source.size())),
    ]
}

pub fn print_inspect_output(source: &SourceImage) {
    for line in format_inspect_output(source) {
        println!("{}", line);
    }
}

pub fn format_compress_output(
    source: &SourceImage,
    image: &CompressedImage,
    saved: Option<&Path>,
) -> Vec<String> {
    let (width, height) = source.dimensions();
    let mut lines = vec![
        format!("{} @ {}", source.name(), image.quality),
        format!(
            "    Original: {}, {}",
            describe(width, height, source.media_type()),
            format_file_size(source.size())
        ),
        format!(
            "    Compressed: {}, {}",
            describe(image.width, image.height, image.media_type),
            format_compressed_size(image, source)
        ),
    ];
    if let Some(path) = saved {
        lines.push(format!("    Saved: {}", path.display()));
    }
    lines
}

pub fn print_compress_output(source: &SourceImage, image: &CompressedImage, saved: Option<&Path>) {
    for line in format_compress_output(source, image, saved) {
        println!("{}", line);
    }
}

/// One line describing a session event.
pub fn format_session_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Updated {
            request,
            source,
            image,
        } => format!(
            "{} {} → {}, {}",
            request,
            image.quality,
            describe(image.width, image.height, image.media_type),
            format_compressed_size(image, source)
        ),
        SessionEvent::Failed { request, error } => format!("{} failed: {}", request, error),
        SessionEvent::Discarded { request } => format!("{} discarded", request),
    }
}

/// Machine-readable summary of one compression, printed by `--json`.
#[derive(Debug, Serialize)]
pub struct CompressionReport {
    pub source: ImageSummary,
    pub output: ImageSummary,
    pub quality: f64,
    /// Percentage saved, one decimal place.
    pub ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImageSummary {
    pub name: String,
    pub media_type: MediaType,
    pub width: u32,
    pub height: u32,
    pub size: u64,
}

impl CompressionReport {
    pub fn new(source: &SourceImage, image: &CompressedImage, saved: Option<&Path>) -> Self {
        let (width, height) = source.dimensions();
        Self {
            source: ImageSummary {
                name: source.name().to_string(),
                media_type: source.media_type(),
                width,
                height,
                size: source.size(),
            },
            output: ImageSummary {
                name: image.file_name(source),
                media_type: image.media_type,
                width: image.width,
                height: image.height,
                size: image.size(),
            },
            quality: image.quality.value(),
            ratio: image.ratio(source),
            saved: saved.map(|p| p.display().to_string()),
        }
    }
}
