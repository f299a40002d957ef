//! Core enums used throughout the application.

use serde::{Deserialize, Serialize};

/// Category of media a source file belongs to.
///
/// Each category maps to a fixed, ordered catalog of recognized file
/// extensions. Catalogs are disjoint in intent but may share literal
/// extension strings ("gif" appears in both Video and Image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    #[default]
    Video,
    Audio,
    Image,
    Document,
}

const VIDEO_FORMATS: &[&str] = &[
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "gif",
];

const AUDIO_FORMATS: &[&str] = &[
    "mp3", "wav", "aac", "flac", "ogg", "m4a", "wma", "opus", "aiff",
];

const IMAGE_FORMATS: &[&str] = &[
    "jpg", "png", "gif", "bmp", "webp", "tiff", "ico", "svg",
];

const DOCUMENT_FORMATS: &[&str] = &["pdf", "txt", "docx", "html"];

impl MediaCategory {
    /// Get the display name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Image => "Image",
            Self::Document => "Document",
        }
    }

    /// Get the ordered format catalog for this category.
    pub fn formats(&self) -> &'static [&'static str] {
        match self {
            Self::Video => VIDEO_FORMATS,
            Self::Audio => AUDIO_FORMATS,
            Self::Image => IMAGE_FORMATS,
            Self::Document => DOCUMENT_FORMATS,
        }
    }

    /// Check whether an extension belongs to this category's catalog.
    pub fn contains(&self, format: &str) -> bool {
        self.formats().iter().any(|f| *f == format)
    }

    /// Get all available categories.
    pub fn all() -> &'static [MediaCategory] {
        &[Self::Video, Self::Audio, Self::Image, Self::Document]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this category (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|c| c == self).unwrap_or(0)
    }

    /// Find the first category whose catalog contains the given extension.
    ///
    /// Catalog order decides ties ("gif" resolves to Video).
    pub fn for_extension(ext: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.contains(ext))
    }
}

impl std::fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Top-level conversion strategy selecting which argument sub-builder applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversionMode {
    #[default]
    #[serde(rename = "Standard Conversion")]
    Standard,
    #[serde(rename = "Resize")]
    Resize,
    #[serde(rename = "Compression")]
    Compression,
}

impl ConversionMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "Standard Conversion",
            Self::Resize => "Resize",
            Self::Compression => "Compression",
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [ConversionMode] {
        &[Self::Standard, Self::Resize, Self::Compression]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this mode (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }
}

impl std::fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Quality tier for compression mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityTier {
    #[serde(rename = "High (Large file)")]
    High,
    #[default]
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Low (Small file)")]
    Low,
}

impl QualityTier {
    /// Get the display name for this tier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::High => "High (Large file)",
            Self::Medium => "Medium",
            Self::Low => "Low (Small file)",
        }
    }

    /// Get all available tiers.
    pub fn all() -> &'static [QualityTier] {
        &[Self::High, Self::Medium, Self::Low]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this tier (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolution preset for resize mode.
///
/// Named presets carry their resolution in the label's leading token,
/// matching the combo box strings presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResizePreset {
    #[default]
    #[serde(rename = "None")]
    None,
    #[serde(rename = "1920x1080 (1080p)")]
    Hd1080,
    #[serde(rename = "1280x720 (720p)")]
    Hd720,
    #[serde(rename = "854x480 (480p)")]
    Sd480,
    #[serde(rename = "640x360 (360p)")]
    Sd360,
    #[serde(rename = "Custom")]
    Custom,
}

impl ResizePreset {
    /// Get the display name for this preset.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Hd1080 => "1920x1080 (1080p)",
            Self::Hd720 => "1280x720 (720p)",
            Self::Sd480 => "854x480 (480p)",
            Self::Sd360 => "640x360 (360p)",
            Self::Custom => "Custom",
        }
    }

    /// Get all available presets.
    pub fn all() -> &'static [ResizePreset] {
        &[
            Self::None,
            Self::Hd1080,
            Self::Hd720,
            Self::Sd480,
            Self::Sd360,
            Self::Custom,
        ]
    }

    /// Create from index (for UI combo boxes).
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Get index of this preset (for UI combo boxes).
    pub fn to_index(&self) -> usize {
        Self::all().iter().position(|p| p == self).unwrap_or(0)
    }

    /// Resolution token for a named preset ("1920x1080").
    ///
    /// Taken from the label's leading token. None and Custom have no
    /// fixed resolution.
    pub fn resolution(&self) -> Option<&'static str> {
        match self {
            Self::None | Self::Custom => None,
            _ => self.name().split_whitespace().next(),
        }
    }
}

impl std::fmt::Display for ResizePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What to do when a final output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwriteSetting {
    /// Consult the presentation layer per file.
    #[default]
    Ask,
    /// Skip the file (neither success nor failure).
    Skip,
    /// Overwrite without asking.
    Overwrite,
}

impl OverwriteSetting {
    /// Get the display name for this setting.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ask => "Ask",
            Self::Skip => "Skip",
            Self::Overwrite => "Overwrite",
        }
    }

    /// Get all available settings.
    pub fn all() -> &'static [OverwriteSetting] {
        &[Self::Ask, Self::Skip, Self::Overwrite]
    }
}

impl std::fmt::Display for OverwriteSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&MediaCategory::Audio).unwrap();
        assert_eq!(json, "\"audio\"");
    }

    #[test]
    fn category_catalogs_match_ui_lists() {
        assert_eq!(MediaCategory::Video.formats().len(), 11);
        assert_eq!(MediaCategory::Audio.formats().len(), 9);
        assert_eq!(MediaCategory::Image.formats().len(), 8);
        assert_eq!(MediaCategory::Document.formats(), &["pdf", "txt", "docx", "html"]);
    }

    #[test]
    fn gif_is_in_both_video_and_image() {
        assert!(MediaCategory::Video.contains("gif"));
        assert!(MediaCategory::Image.contains("gif"));
        // Catalog order resolves the tie to Video.
        assert_eq!(MediaCategory::for_extension("gif"), Some(MediaCategory::Video));
    }

    #[test]
    fn mode_serializes_display_name() {
        let json = serde_json::to_string(&ConversionMode::Standard).unwrap();
        assert_eq!(json, "\"Standard Conversion\"");
    }

    #[test]
    fn resize_preset_resolution_tokens() {
        assert_eq!(ResizePreset::Hd1080.resolution(), Some("1920x1080"));
        assert_eq!(ResizePreset::Sd360.resolution(), Some("640x360"));
        assert_eq!(ResizePreset::None.resolution(), None);
        assert_eq!(ResizePreset::Custom.resolution(), None);
    }

    #[test]
    fn tier_round_trips_through_index() {
        for tier in QualityTier::all() {
            assert_eq!(QualityTier::from_index(tier.to_index()), *tier);
        }
    }
}
