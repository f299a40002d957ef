//! Logging infrastructure for Hindura.
//!
//! This module provides:
//! - The persistent converter log with file + UI callback dual output
//! - Tail buffer for failure diagnosis
//! - Integration with the `tracing` ecosystem
//!
//! # Example
//!
//! ```no_run
//! use hindura_core::logging::ConverterLog;
//!
//! let log = ConverterLog::open("/path/to/logs", None).unwrap();
//! log.command("ffmpeg -i input.mov ...");
//! log.line("Return code: 0");
//! log.success("clip_converted.mp4");
//! ```

mod converter_log;
mod types;

pub use converter_log::{ConverterLog, LOG_FILE_NAME};
pub use types::{MessagePrefix, UiLogCallback};

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize global tracing subscriber for application-wide logging.
///
/// Respects the RUST_LOG environment variable, falling back to the
/// provided default directive. Outputs to stderr with timestamps.
/// Should be called once at application startup.
pub fn init_tracing(default_directive: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_directive))
        .init();
}

/// Initialize tracing with an additional plain-text file layer.
///
/// Events go to stderr and to `hindura.log` in the given directory.
pub fn init_tracing_with_file(default_directive: &str, log_dir: &Path) {
    let appender = tracing_appender::rolling::never(log_dir, "hindura.log");

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(fmt::layer().with_writer(appender).with_ansi(false))
        .with(env_filter(default_directive))
        .init();
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_falls_back_to_directive() {
        let filter = env_filter("debug");
        assert!(!filter.to_string().is_empty());
    }
}
