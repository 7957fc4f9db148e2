//! File naming for saved output.
//!
//! A compressed copy is saved next to nothing in particular; its name is
//! derived from the source name alone:
//!
//! - `holiday.png` at 50% → `holiday_compressed.jpg`
//! - `archive.tar.png` at 90% → `archive.tar_compressed.png`
//! - `scan` (no extension) → `scan_compressed.jpg`
//!
//! Only the last extension is removed, and only when it is non-empty and not
//! part of a directory (`photo.` keeps its trailing dot).

use crate::imaging::MediaType;

/// Suffix appended to the source stem.
pub const COMPRESSED_SUFFIX: &str = "_compressed";

/// Strip the final `.ext` from `name`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            if ext.is_empty() || ext.contains('/') {
                name
            } else {
                &name[..dot]
            }
        }
        None => name,
    }
}

/// Download name for a compressed copy of `source_name`.
pub fn compressed_file_name(source_name: &str, output: MediaType) -> String {
    format!(
        "{}{}.{}",
        strip_extension(source_name),
        COMPRESSED_SUFFIX,
        output.extension()
    )
}
