//! Configuration module.
//!
//! Handles loading, validating, and merging `squish.toml`. User values are
//! layered over stock defaults, so a config file only needs the keys it wants
//! to change.
//!
//! ## Config File Location
//!
//! `squish.toml` is read from the directory given by `--config-dir`
//! (the working directory by default). A missing file means stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [compression]
//! quality = 80                 # Initial quality dial, percent (0-100)
//! resize_filter = "lanczos3"   # lanczos3 | catmull-rom | gaussian | triangle
//! max_pixels = 100000000       # Reject sources larger than this
//!
//! [session]
//! debounce_ms = 100            # Quiet window before a quality change is applied
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::ResizeFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILE: &str = "squish.toml";

/// Bounds for `session.debounce_ms`.
const DEBOUNCE_MS_RANGE: std::ops::RangeInclusive<u64> = 1..=5_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("squish.toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Configuration loaded from `squish.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Compression policy inputs.
    pub compression: CompressionConfig,
    /// Interactive session settings.
    pub session: SessionConfig,
}

impl Config {
    /// Range checks serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression.quality > 100 {
            return Err(ConfigError::Validation(
                "compression.quality must be 0-100".into(),
            ));
        }
        if self.compression.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "compression.max_pixels must be non-zero".into(),
            ));
        }
        if !DEBOUNCE_MS_RANGE.contains(&self.session.debounce_ms) {
            return Err(ConfigError::Validation(format!(
                "session.debounce_ms must be {}-{}",
                DEBOUNCE_MS_RANGE.start(),
                DEBOUNCE_MS_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// Compression settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompressionConfig {
    /// Starting quality in percent (0 = smallest, 100 = best).
    pub quality: u32,
    /// Filter used when PNG sources are downscaled.
    pub resize_filter: ResizeFilter,
    /// Largest accepted source, in pixels (`width * height`).
    pub max_pixels: u64,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            resize_filter: ResizeFilter::default(),
            max_pixels: 100_000_000,
        }
    }
}

/// Interactive session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Milliseconds of quiet after the last quality change before deriving.
    pub debounce_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { debounce_ms: 100 }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// `Config::default()` as a TOML table: the bottom layer every `squish.toml`
/// is merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Layer `overlay` onto `base`.
///
/// Tables merge per key, recursing into nested tables. Any other overlay value
/// replaces the base value outright. Base keys missing from the overlay stay.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `dir/squish.toml` without interpreting it. `Ok(None)` when absent.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Apply the user layer, if any, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Effective configuration for `dir`: stock defaults overridden by
/// `dir/squish.toml` when it exists.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    let config = resolve_config(base, overlay)?;
    log::debug!("config: {:?}", config);
    Ok(config)
}

/// Documented `squish.toml` printed by `squish gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# squish configuration
# ====================
# Every key is optional and shows its default.
# Misspelled or unknown keys are rejected.

# ---------------------------------------------------------------------------
# Compression
# ---------------------------------------------------------------------------
[compression]
# Starting quality in percent (0 = smallest, 100 = best).
# Below 80 every output is re-encoded as JPEG. PNG sources are also
# downscaled so their pixel area shrinks in proportion to quality.
quality = 80

# Resampling filter for PNG downscaling.
# One of: "lanczos3", "catmull-rom", "gaussian", "triangle" (bilinear).
resize_filter = "lanczos3"

# Reject sources with more pixels than this (width * height).
max_pixels = 100000000

# ---------------------------------------------------------------------------
# Interactive session (`squish tune`)
# ---------------------------------------------------------------------------
[session]
# Milliseconds to wait after the last quality change before re-compressing.
# Changes arriving inside this window replace the pending one.
debounce_ms = 100
"##
}
