//! Append-only converter log with file and callback output.
//!
//! The log records every invoked command line, exit code, and the tool's
//! diagnostic text across application runs. Every write is best-effort:
//! a logging failure never interrupts a conversion. A bounded tail buffer
//! of recent diagnostic lines is kept for failure-reason capture.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{MessagePrefix, UiLogCallback};

/// File name of the persisted converter log.
pub const LOG_FILE_NAME: &str = "converter_log.txt";

/// Diagnostic lines retained for failure diagnosis.
const TAIL_LIMIT: usize = 100;

/// Persistent converter log with dual output (file + UI callback).
pub struct ConverterLog {
    /// Path to the log file.
    log_path: PathBuf,
    /// File writer (buffered, append mode).
    file_writer: Arc<Mutex<Option<BufWriter<File>>>>,
    /// Presentation-layer callback.
    ui_callback: Arc<Mutex<Option<UiLogCallback>>>,
    /// Tail buffer of recent diagnostic lines.
    tail_buffer: Arc<Mutex<VecDeque<String>>>,
}

impl ConverterLog {
    /// Open (or create) the converter log in the given directory.
    pub fn open(
        log_dir: impl AsRef<Path>,
        ui_callback: Option<UiLogCallback>,
    ) -> std::io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(LOG_FILE_NAME);
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        Ok(Self {
            log_path,
            file_writer: Arc::new(Mutex::new(Some(BufWriter::new(file)))),
            ui_callback: Arc::new(Mutex::new(ui_callback)),
            tail_buffer: Arc::new(Mutex::new(VecDeque::with_capacity(TAIL_LIMIT))),
        })
    }

    /// Get the log file path.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a plain message.
    pub fn line(&self, message: &str) {
        self.output(&self.format_message(message));
    }

    /// Log a command being executed.
    pub fn command(&self, command_line: &str) {
        self.line(&MessagePrefix::Command.format(command_line));
    }

    /// Log a success message.
    pub fn success(&self, message: &str) {
        self.line(&MessagePrefix::Success.format(message));
    }

    /// Log a warning message.
    pub fn warn(&self, message: &str) {
        self.line(&MessagePrefix::Warning.format(message));
    }

    /// Log an error message.
    pub fn error(&self, message: &str) {
        self.line(&MessagePrefix::Error.format(message));
    }

    /// Record one diagnostic line from the external tool.
    ///
    /// Lines go to the tail buffer only; the full diagnostic text is
    /// written once per conversion via [`Self::diagnostics`].
    pub fn output_line(&self, line: &str) {
        let mut buffer = self.tail_buffer.lock();
        if buffer.len() >= TAIL_LIMIT {
            buffer.pop_front();
        }
        buffer.push_back(line.to_string());
    }

    /// Write the full diagnostic text of a finished conversion.
    pub fn diagnostics(&self, text: &str) {
        self.line(&format!("STDERR: {}", text));
    }

    /// Get the current tail buffer contents.
    pub fn tail(&self) -> Vec<String> {
        self.tail_buffer.lock().iter().cloned().collect()
    }

    /// Clear the tail buffer (between conversions).
    pub fn clear_tail(&self) {
        self.tail_buffer.lock().clear();
    }

    /// Flush the log file.
    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Close the log and release the file handle.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        format!("[{}] {}", timestamp, message)
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if let Some(ref callback) = *self.ui_callback.lock() {
            callback(formatted);
        }
    }
}

impl Drop for ConverterLog {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let log = ConverterLog::open(dir.path(), None).unwrap();

        assert!(log.log_path().exists());
        assert!(log.log_path().ends_with(LOG_FILE_NAME));
    }

    #[test]
    fn appends_across_reopens() {
        let dir = tempdir().unwrap();
        {
            let log = ConverterLog::open(dir.path(), None).unwrap();
            log.command("ffmpeg -i a.mov -y a_converted.tmp.mp4");
        }
        {
            let log = ConverterLog::open(dir.path(), None).unwrap();
            log.line("Return code: 0");
        }

        let content = fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert!(content.contains("$ ffmpeg -i a.mov"));
        assert!(content.contains("Return code: 0"));
    }

    #[test]
    fn calls_ui_callback() {
        let dir = tempdir().unwrap();
        let call_count = Arc::new(AtomicUsize::new(0));
        let count_clone = call_count.clone();

        let callback: UiLogCallback = Box::new(move |_msg| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        let log = ConverterLog::open(dir.path(), Some(callback)).unwrap();
        log.line("Message 1");
        log.warn("Message 2");

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn tail_buffer_maintains_limit() {
        let dir = tempdir().unwrap();
        let log = ConverterLog::open(dir.path(), None).unwrap();

        for i in 0..(TAIL_LIMIT + 10) {
            log.output_line(&format!("Line {}", i));
        }

        let tail = log.tail();
        assert_eq!(tail.len(), TAIL_LIMIT);
        assert_eq!(tail[0], "Line 10");

        log.clear_tail();
        assert!(log.tail().is_empty());
    }
}
