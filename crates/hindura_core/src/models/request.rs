//! Conversion request types.
//!
//! A `RequestTemplate` captures the shared option state once per batch;
//! a `ConversionRequest` is the template plus one input path, built at
//! dequeue time and immutable afterwards.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::enums::{ConversionMode, MediaCategory, QualityTier, ResizePreset};

/// GIF frame-rate presets offered to the user.
pub const GIF_FPS_PRESETS: &[&str] = &["5", "10", "15", "20", "24", "30"];

/// GIF scale-width presets offered to the user.
pub const GIF_SCALE_PRESETS: &[&str] = &["160", "240", "320", "480", "640"];

/// Options for video-to-GIF conversion.
///
/// fps and scale are free-form strings chosen from the preset lists;
/// they are substituted verbatim into the filter graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifOptions {
    /// Output frame rate.
    #[serde(default = "default_gif_fps")]
    pub fps: String,
    /// Output width in pixels (height follows aspect ratio).
    #[serde(default = "default_gif_scale")]
    pub scale: String,
}

fn default_gif_fps() -> String {
    "10".to_string()
}

fn default_gif_scale() -> String {
    "320".to_string()
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            fps: default_gif_fps(),
            scale: default_gif_scale(),
        }
    }
}

/// Resize selection: a preset plus the custom dimension fields.
///
/// The custom fields mirror free-form entry boxes and are only consulted
/// when the preset is `Custom`. Both must be non-empty in that case; the
/// plan builder rejects the request otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResizeSelection {
    /// Selected resolution preset.
    #[serde(default)]
    pub preset: ResizePreset,
    /// Custom width entry (Custom preset only).
    #[serde(default)]
    pub custom_width: String,
    /// Custom height entry (Custom preset only).
    #[serde(default)]
    pub custom_height: String,
}

impl ResizeSelection {
    /// Selection with a named preset.
    pub fn preset(preset: ResizePreset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
    }

    /// Selection with custom dimensions.
    pub fn custom(width: impl Into<String>, height: impl Into<String>) -> Self {
        Self {
            preset: ResizePreset::Custom,
            custom_width: width.into(),
            custom_height: height.into(),
        }
    }

    /// Whether any resize is selected at all.
    pub fn is_active(&self) -> bool {
        self.preset != ResizePreset::None
    }
}

/// Shared option state for one batch run.
///
/// Built once from the user's selections; the source/target format pair
/// applies to every queued file, matching the original single-plan batch
/// behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// Source media category.
    pub category: MediaCategory,
    /// Source format extension (lowercase, no dot).
    pub source_format: String,
    /// Target format extension (lowercase, no dot).
    pub target_format: String,
    /// Conversion mode.
    #[serde(default)]
    pub mode: ConversionMode,
    /// Resize selection (consulted in Standard and Resize modes).
    #[serde(default)]
    pub resize: ResizeSelection,
    /// GIF options (consulted when converting video to gif).
    #[serde(default)]
    pub gif: GifOptions,
    /// Compression quality tier (Compression mode only).
    #[serde(default)]
    pub quality: QualityTier,
}

impl RequestTemplate {
    /// Create a template for a standard conversion.
    pub fn new(
        category: MediaCategory,
        source_format: impl Into<String>,
        target_format: impl Into<String>,
    ) -> Self {
        Self {
            category,
            source_format: source_format.into(),
            target_format: target_format.into(),
            mode: ConversionMode::Standard,
            resize: ResizeSelection::default(),
            gif: GifOptions::default(),
            quality: QualityTier::default(),
        }
    }

    /// Set the conversion mode.
    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the resize selection.
    pub fn with_resize(mut self, resize: ResizeSelection) -> Self {
        self.resize = resize;
        self
    }

    /// Set the GIF options.
    pub fn with_gif(mut self, gif: GifOptions) -> Self {
        self.gif = gif;
        self
    }

    /// Set the compression quality tier.
    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    /// Bind this template to one input path.
    pub fn request_for(&self, input_path: impl Into<PathBuf>) -> ConversionRequest {
        ConversionRequest {
            input_path: input_path.into(),
            template: self.clone(),
        }
    }
}

/// One file's conversion request: the shared template plus its path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Path to the input file.
    pub input_path: PathBuf,
    /// Shared option state.
    pub template: RequestTemplate,
}

impl ConversionRequest {
    /// The input file's stem (filename without extension).
    pub fn input_stem(&self) -> String {
        self.input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gif_defaults_match_presets() {
        let gif = GifOptions::default();
        assert!(GIF_FPS_PRESETS.contains(&gif.fps.as_str()));
        assert!(GIF_SCALE_PRESETS.contains(&gif.scale.as_str()));
        assert_eq!(gif.fps, "10");
        assert_eq!(gif.scale, "320");
    }

    #[test]
    fn template_binds_path() {
        let template = RequestTemplate::new(MediaCategory::Video, "mov", "mp4");
        let request = template.request_for("/media/clip.mov");
        assert_eq!(request.input_stem(), "clip");
        assert_eq!(request.template.target_format, "mp4");
    }

    #[test]
    fn template_deserializes_with_defaults() {
        let json = r#"{"category":"video","source_format":"mkv","target_format":"mp4"}"#;
        let template: RequestTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(template.mode, ConversionMode::Standard);
        assert_eq!(template.resize.preset, ResizePreset::None);
    }
}
