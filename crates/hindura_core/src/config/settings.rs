//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::{GifOptions, OverwriteSetting};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Conversion defaults.
    #[serde(default)]
    pub conversion: ConversionSettings,
}

/// Path configuration for output, logs, and the external tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Output folder for converted files. Empty means the input's own
    /// directory.
    #[serde(default)]
    pub output_folder: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Explicit path to the ffmpeg executable. Empty means auto-discover.
    #[serde(default)]
    pub ffmpeg_path: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: String::new(),
            logs_folder: default_logs_folder(),
            ffmpeg_path: String::new(),
        }
    }
}

/// Conversion behavior defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// What to do when a final output file already exists.
    #[serde(default)]
    pub overwrite: OverwriteSetting,

    /// Default GIF frame rate.
    #[serde(default = "default_gif_fps")]
    pub gif_fps: String,

    /// Default GIF scale width.
    #[serde(default = "default_gif_scale")]
    pub gif_scale: String,

    /// Seconds to wait for a cancelled process to exit before killing it.
    #[serde(default = "default_termination_grace")]
    pub termination_grace_secs: u64,
}

fn default_gif_fps() -> String {
    "10".to_string()
}

fn default_gif_scale() -> String {
    "320".to_string()
}

fn default_termination_grace() -> u64 {
    5
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            overwrite: OverwriteSetting::default(),
            gif_fps: default_gif_fps(),
            gif_scale: default_gif_scale(),
            termination_grace_secs: default_termination_grace(),
        }
    }
}

impl Settings {
    /// Resolve the output directory for a given input file.
    pub fn resolved_output_dir(&self, input: &Path) -> PathBuf {
        if self.paths.output_folder.is_empty() {
            input.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            PathBuf::from(&self.paths.output_folder)
        }
    }

    /// Explicitly configured tool path, if any.
    pub fn ffmpeg_override(&self) -> Option<PathBuf> {
        if self.paths.ffmpeg_path.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.paths.ffmpeg_path))
        }
    }

    /// Log directory as a path.
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.logs_folder)
    }

    /// GIF options seeded from the configured defaults.
    pub fn gif_defaults(&self) -> GifOptions {
        GifOptions {
            fps: self.conversion.gif_fps.clone(),
            scale: self.conversion.gif_scale.clone(),
        }
    }
}

/// Identifies a settings section for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Conversion,
}

impl ConfigSection {
    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Paths => "paths",
            Self::Conversion => "conversion",
        }
    }
}
