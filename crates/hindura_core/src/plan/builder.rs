//! Conversion Plan Builder.
//!
//! Maps a request template to the ordered argument list inserted between
//! `-i <input>` and the trailing `-y <output>`. Argument mapping is
//! table-driven: each (mode, category) pair resolves through a dispatch
//! table keyed by target format, with an explicit per-category default row.
//!
//! Every sub-builder is pure. The only failure paths are pre-spawn
//! validation errors (missing target format, incomplete custom resize).

use super::error::{PlanError, PlanResult};
use crate::models::{
    ConversionMode, GifOptions, MediaCategory, QualityTier, RequestTemplate, ResizePreset,
    ResizeSelection,
};

/// How a request was classified; decides the output-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    /// Plain format conversion.
    Standard,
    /// Audio track extracted from a video source.
    AudioExtract,
    /// Video rendered to an animated GIF.
    Gif,
    /// Scaled output (Resize mode, or Standard mode with a resize selected).
    Resized,
    /// Quality-tier compression.
    Compressed,
}

impl PlanKind {
    /// Suffix appended to the input stem in the output file name.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Standard => "_converted",
            Self::AudioExtract => "_audio",
            Self::Gif => "_gif",
            Self::Resized => "_resized",
            Self::Compressed => "_compressed",
        }
    }
}

/// A built conversion plan: classification plus tool arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    /// Classification of the conversion.
    pub kind: PlanKind,
    /// Arguments inserted between `-i <input>` and `-y <output>`.
    pub args: Vec<String>,
}

impl ConversionPlan {
    fn new(kind: PlanKind, args: Vec<String>) -> Self {
        Self { kind, args }
    }

    /// Final output file name for a given input stem.
    pub fn output_file_name(&self, stem: &str, target_format: &str) -> String {
        format!("{stem}{}.{target_format}", self.kind.suffix())
    }

    /// Temporary output file name. Keeps the target extension last so the
    /// tool's format auto-detection still sees it.
    pub fn temp_file_name(&self, stem: &str, target_format: &str) -> String {
        format!("{stem}{}.tmp.{target_format}", self.kind.suffix())
    }
}

/// Build the plan for a request template.
///
/// Standard mode classifies in order: audio extraction (video source,
/// audio-catalog target), then GIF (video source, gif target), then
/// resize (any active selection), then plain conversion.
pub fn build_plan(template: &RequestTemplate) -> PlanResult<ConversionPlan> {
    if template.target_format.is_empty() {
        return Err(PlanError::MissingTargetFormat);
    }
    let target = template.target_format.as_str();

    match template.mode {
        ConversionMode::Standard => {
            if template.category == MediaCategory::Video && MediaCategory::Audio.contains(target) {
                Ok(ConversionPlan::new(
                    PlanKind::AudioExtract,
                    audio_extract_args(target),
                ))
            } else if template.category == MediaCategory::Video && target == "gif" {
                Ok(ConversionPlan::new(PlanKind::Gif, gif_args(&template.gif)))
            } else if template.resize.is_active() {
                Ok(ConversionPlan::new(
                    PlanKind::Resized,
                    resize_args(&template.resize, template.category, target)?,
                ))
            } else {
                Ok(ConversionPlan::new(
                    PlanKind::Standard,
                    standard_args(template.category, target),
                ))
            }
        }
        ConversionMode::Resize => Ok(ConversionPlan::new(
            PlanKind::Resized,
            resize_args(&template.resize, template.category, target)?,
        )),
        ConversionMode::Compression => Ok(ConversionPlan::new(
            PlanKind::Compressed,
            compression_args(template.category, target, template.quality),
        )),
    }
}

/// Validate a template without keeping the plan.
pub fn validate_template(template: &RequestTemplate) -> PlanResult<()> {
    build_plan(template).map(|_| ())
}

type ArgTable = &'static [(&'static [&'static str], &'static [&'static str])];

const VIDEO_STANDARD: ArgTable = &[
    (&["mp4"], &["-c:v", "libx264", "-c:a", "aac", "-strict", "experimental"]),
    (&["avi"], &["-c:v", "mpeg4", "-c:a", "mp3"]),
    (&["mkv", "mov", "m4v"], &["-c:v", "libx264", "-c:a", "aac"]),
    (&["webm"], &["-c:v", "libvpx-vp9", "-c:a", "libopus"]),
    (
        &["mpg", "mpeg"],
        &["-c:v", "mpeg2video", "-c:a", "mp2", "-b:v", "4000k", "-b:a", "192k"],
    ),
    (&["wmv"], &["-c:v", "wmv2", "-c:a", "wmav2"]),
    (&["flv"], &["-c:v", "flv1", "-c:a", "mp3"]),
];
const VIDEO_STANDARD_DEFAULT: &[&str] = &["-c:v", "libx264", "-c:a", "aac"];

const AUDIO_STANDARD: ArgTable = &[
    (&["mp3"], &["-c:a", "libmp3lame", "-b:a", "192k"]),
    (&["aac", "m4a"], &["-c:a", "aac", "-b:a", "192k"]),
    (&["flac"], &["-c:a", "flac"]),
    (&["wav"], &["-c:a", "pcm_s16le"]),
    (&["ogg"], &["-c:a", "libvorbis", "-q:a", "5"]),
    (&["opus"], &["-c:a", "libopus", "-b:a", "128k"]),
    (&["wma"], &["-c:a", "wmav2", "-b:a", "192k"]),
    (&["aiff"], &["-c:a", "pcm_s16be"]),
];
const AUDIO_STANDARD_DEFAULT: &[&str] = &["-c:a", "aac", "-b:a", "192k"];

const IMAGE_STANDARD: ArgTable = &[
    (&["jpg", "jpeg"], &["-q:v", "2"]),
    (&["png"], &["-compression_level", "6"]),
    (&["webp"], &["-quality", "90"]),
    (&["bmp", "tiff"], &[]),
];
const IMAGE_STANDARD_DEFAULT: &[&str] = &[];

const AUDIO_EXTRACT: ArgTable = &[
    (&["mp3"], &["-vn", "-c:a", "libmp3lame", "-b:a", "192k"]),
    (&["aac", "m4a"], &["-vn", "-c:a", "aac", "-b:a", "192k"]),
    (&["flac"], &["-vn", "-c:a", "flac"]),
    (&["wav"], &["-vn", "-c:a", "pcm_s16le"]),
    (&["ogg"], &["-vn", "-c:a", "libvorbis", "-q:a", "5"]),
];
const AUDIO_EXTRACT_DEFAULT: &[&str] = &["-vn", "-c:a", "copy"];

fn lookup(table: ArgTable, target: &str, default: &'static [&'static str]) -> Vec<String> {
    table
        .iter()
        .find(|(targets, _)| targets.contains(&target))
        .map(|(_, args)| *args)
        .unwrap_or(default)
        .iter()
        .map(|a| a.to_string())
        .collect()
}

/// Standard conversion codec arguments for a (category, target) pair.
pub fn standard_args(category: MediaCategory, target: &str) -> Vec<String> {
    match category {
        MediaCategory::Video => lookup(VIDEO_STANDARD, target, VIDEO_STANDARD_DEFAULT),
        MediaCategory::Audio => lookup(AUDIO_STANDARD, target, AUDIO_STANDARD_DEFAULT),
        MediaCategory::Image => lookup(IMAGE_STANDARD, target, IMAGE_STANDARD_DEFAULT),
        // Document pairs pass no codec args; the tool handles the pair or fails.
        MediaCategory::Document => Vec::new(),
    }
}

fn audio_extract_args(target: &str) -> Vec<String> {
    lookup(AUDIO_EXTRACT, target, AUDIO_EXTRACT_DEFAULT)
}

fn gif_args(gif: &GifOptions) -> Vec<String> {
    let filter = format!(
        "fps={},scale={}:-1:flags=lanczos,split[s0][s1];[s0]palettegen[p];[s1][p]paletteuse",
        gif.fps, gif.scale
    );
    vec![
        "-vf".to_string(),
        filter,
        "-loop".to_string(),
        "0".to_string(),
    ]
}

fn resize_args(
    resize: &ResizeSelection,
    category: MediaCategory,
    target: &str,
) -> PlanResult<Vec<String>> {
    let scale_filter = match resize.preset {
        // No resize selected: delegate to standard conversion unchanged.
        ResizePreset::None => return Ok(standard_args(category, target)),
        ResizePreset::Custom => {
            if resize.custom_width.is_empty() || resize.custom_height.is_empty() {
                return Err(PlanError::MissingCustomDimensions);
            }
            format!("scale={}:{}", resize.custom_width, resize.custom_height)
        }
        // Named presets substitute their WxH label token verbatim.
        preset => format!("scale={}", preset.resolution().unwrap_or_default()),
    };

    let mut args = vec!["-vf".to_string(), scale_filter];
    args.extend(standard_args(category, target));
    Ok(args)
}

fn compression_args(category: MediaCategory, target: &str, tier: QualityTier) -> Vec<String> {
    match category {
        MediaCategory::Video => {
            let (crf, bitrate) = match tier {
                QualityTier::High => ("18", "5000k"),
                QualityTier::Medium => ("23", "2500k"),
                QualityTier::Low => ("28", "1000k"),
            };
            let args: &[&str] = match target {
                "webm" => &["-c:v", "libvpx-vp9", "-b:v", bitrate, "-c:a", "libopus", "-b:a", "96k"],
                _ => &["-c:v", "libx264", "-crf", crf, "-c:a", "aac", "-b:a", "128k"],
            };
            args.iter().map(|a| a.to_string()).collect()
        }
        MediaCategory::Audio => {
            let bitrate = match tier {
                QualityTier::High => "256k",
                QualityTier::Medium => "192k",
                QualityTier::Low => "128k",
            };
            let codec = match target {
                "mp3" => "libmp3lame",
                "ogg" => "libvorbis",
                _ => "aac",
            };
            vec![
                "-c:a".to_string(),
                codec.to_string(),
                "-b:a".to_string(),
                bitrate.to_string(),
            ]
        }
        MediaCategory::Image => match target {
            "jpg" | "jpeg" => {
                let q = match tier {
                    QualityTier::High => "2",
                    QualityTier::Medium => "5",
                    QualityTier::Low => "10",
                };
                vec!["-q:v".to_string(), q.to_string()]
            }
            "png" => vec!["-compression_level".to_string(), "9".to_string()],
            _ => Vec::new(),
        },
        MediaCategory::Document => Vec::new(),
    }
}
