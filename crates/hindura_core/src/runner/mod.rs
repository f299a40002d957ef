//! Batch conversion runner.
//!
//! This module provides:
//! - `BatchRunner`: sequential queue processing with temp-file staging
//! - `CancelHandle`: cross-thread cancellation of a running batch
//! - `OverwritePolicy`: per-file handling of existing outputs
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hindura_core::config::Settings;
//! use hindura_core::logging::ConverterLog;
//! use hindura_core::models::{MediaCategory, RequestTemplate};
//! use hindura_core::runner::{BatchRunner, OverwritePolicy};
//!
//! let settings = Settings::default();
//! let tool = BatchRunner::resolve_tool(&settings).unwrap();
//! let log = Arc::new(ConverterLog::open(settings.logs_dir(), None).unwrap());
//!
//! let runner = BatchRunner::new(tool, settings, OverwritePolicy::Skip, log);
//! let template = RequestTemplate::new(MediaCategory::Video, "mov", "mp4");
//! let summary = runner.run_batch(&["clip.mov".into()], &template).unwrap();
//! println!("{} succeeded", summary.success_count());
//! ```

mod batch;
mod error;
mod process;
mod types;

pub use batch::BatchRunner;
pub use error::{BatchError, BatchResult};
pub use process::{command_line, failure_reason, run_ffmpeg, ProcessOutcome};
pub use types::{CancelHandle, FileProgress, OverwritePolicy, OverwritePrompt, ProgressCallback};
