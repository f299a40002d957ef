//! Data models for Hindura.
//!
//! This module contains the core data structures used throughout the
//! application:
//! - Enums for media categories, conversion modes, quality tiers
//! - Request structures (templates, per-file requests)
//! - Batch outcome structures (per-file results, summaries)

mod enums;
mod outcome;
mod request;

// Re-export all public types
pub use enums::{
    ConversionMode, MediaCategory, OverwriteSetting, QualityTier, ResizePreset,
};
pub use outcome::{BatchOutcome, BatchStatus, FileOutcome, FileStatus};
pub use request::{
    ConversionRequest, GifOptions, RequestTemplate, ResizeSelection, GIF_FPS_PRESETS,
    GIF_SCALE_PRESETS,
};
