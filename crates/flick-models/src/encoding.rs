//! Encoding parameters for variants and derived assets.

use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "veryfast";
/// Default CRF (Constant Rate Factor) for resolution variants
pub const VARIANT_CRF: u8 = 21;
/// CRF for the teaser clip
pub const TEASER_CRF: u8 = 22;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";
/// Pixel format for broad player compatibility
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";
/// JPEG quality for extracted stills (`-q:v`, lower is better)
pub const STILL_QUALITY: u8 = 3;

/// Thumbnail still dimensions
pub const THUMBNAIL_WIDTH: u32 = 640;
pub const THUMBNAIL_HEIGHT: u32 = 360;

/// Hero still dimensions
pub const HERO_WIDTH: u32 = 1280;
pub const HERO_HEIGHT: u32 = 720;

/// Teaser clip dimensions and length
pub const TEASER_WIDTH: u32 = 1280;
pub const TEASER_HEIGHT: u32 = 720;
pub const TEASER_SECONDS: u64 = 8;

/// Captured stderr is truncated to this many characters per error entry
pub const STDERR_TRUNCATE_CHARS: usize = 4000;
/// The persisted error summary is truncated to this many characters
pub const ERROR_SUMMARY_MAX_CHARS: usize = 8000;

/// Video encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset (e.g., "veryfast", "medium")
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Constant Rate Factor (quality, 0-51, lower is better)
    #[serde(default = "default_crf")]
    pub crf: u8,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Pixel format
    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_crf() -> u8 {
    VARIANT_CRF
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_pixel_format() -> String {
    DEFAULT_PIXEL_FORMAT.to_string()
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            crf: VARIANT_CRF,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
        }
    }
}

impl EncodingConfig {
    /// Create a new encoding configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for the teaser clip (slightly higher CRF).
    pub fn for_teaser() -> Self {
        Self {
            crf: TEASER_CRF,
            ..Default::default()
        }
    }

    /// Returns a new config with updated CRF.
    pub fn with_crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }
}

/// Truncate a string to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncodingConfig::default();
        assert_eq!(config.codec, "libx264");
        assert_eq!(config.crf, VARIANT_CRF);
        assert_eq!(config.pixel_format, "yuv420p");
    }

    #[test]
    fn test_teaser_config() {
        let config = EncodingConfig::for_teaser();
        assert_eq!(config.crf, TEASER_CRF);
    }

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 10), "");
    }

    #[test]
    fn test_truncate_chars_counts_chars_not_bytes() {
        let s = "äöü".repeat(10);
        let out = truncate_chars(&s, 5);
        assert_eq!(out.chars().count(), 5);
    }

    #[test]
    fn test_truncate_chars_exact_bound() {
        let s = "x".repeat(ERROR_SUMMARY_MAX_CHARS + 100);
        let out = truncate_chars(&s, ERROR_SUMMARY_MAX_CHARS);
        assert_eq!(out.chars().count(), ERROR_SUMMARY_MAX_CHARS);
    }
}
