//! Sequential batch conversion over a queue of input files.
//!
//! One `BatchRunner` owns the resolved tool path, settings, and overwrite
//! policy for its lifetime. A batch processes files strictly in order:
//! probe duration, convert to a temp file, then rename into place on
//! success. Cancellation stops the in-flight process and ends the batch;
//! the interrupted file is abandoned without an outcome.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Settings;
use crate::logging::ConverterLog;
use crate::models::{BatchOutcome, FileOutcome, RequestTemplate};
use crate::plan::{build_plan, ConversionPlan};
use crate::probe::{probe_duration, ProgressTracker};
use crate::tool::find_ffmpeg;

use super::error::{BatchError, BatchResult};
use super::process::{command_line, failure_reason, run_ffmpeg};
use super::types::{CancelHandle, FileProgress, OverwritePolicy, ProgressCallback};

/// Result of processing one queued file.
enum FileResult {
    /// The file ran to a decision.
    Done(FileOutcome),
    /// Cancellation interrupted the conversion; the file is abandoned.
    Cancelled,
}

/// Sequential converter over a queue of files.
///
/// Share behind an `Arc` to run on a worker thread while another thread
/// cancels or polls [`BatchRunner::is_running`].
pub struct BatchRunner {
    tool_path: PathBuf,
    settings: Settings,
    overwrite: OverwritePolicy,
    log: Arc<ConverterLog>,
    cancel: CancelHandle,
    running: AtomicBool,
    last_outcome: Mutex<Option<BatchOutcome>>,
    progress: Option<ProgressCallback>,
}

impl BatchRunner {
    /// Create a runner with a resolved tool path.
    pub fn new(
        tool_path: impl Into<PathBuf>,
        settings: Settings,
        overwrite: OverwritePolicy,
        log: Arc<ConverterLog>,
    ) -> Self {
        Self {
            tool_path: tool_path.into(),
            settings,
            overwrite,
            log,
            cancel: CancelHandle::new(),
            running: AtomicBool::new(false),
            last_outcome: Mutex::new(None),
            progress: None,
        }
    }

    /// Attach a progress callback. Call before sharing the runner.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Resolve the tool for a runner from the configured override.
    pub fn resolve_tool(settings: &Settings) -> BatchResult<PathBuf> {
        find_ffmpeg(settings.ffmpeg_override().as_deref()).ok_or(BatchError::ToolUnavailable)
    }

    /// The resolved tool path this runner invokes.
    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    /// Handle for cancelling the running batch from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Request cancellation of the running batch.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether a batch is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Summary of the most recently finished batch.
    pub fn last_outcome(&self) -> Option<BatchOutcome> {
        self.last_outcome.lock().clone()
    }

    /// Run a batch over the given files with a shared template.
    ///
    /// Rejects the batch up front when one is already running, the queue
    /// is empty, or the template fails validation. Per-file problems are
    /// recorded as failed outcomes and never abort the batch.
    pub fn run_batch(
        &self,
        files: &[PathBuf],
        template: &RequestTemplate,
    ) -> BatchResult<BatchOutcome> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(BatchError::AlreadyRunning);
        }

        let result = self.run_batch_inner(files, template);
        self.running.store(false, Ordering::SeqCst);

        if let Ok(ref outcome) = result {
            *self.last_outcome.lock() = Some(outcome.clone());
        }
        result
    }

    /// Re-run only the files that failed in the previous batch.
    pub fn retry_failures(&self, template: &RequestTemplate) -> BatchResult<BatchOutcome> {
        let failed = self
            .last_outcome
            .lock()
            .as_ref()
            .map(BatchOutcome::failed_paths)
            .unwrap_or_default();

        if failed.is_empty() {
            return Err(BatchError::NothingToRetry);
        }

        self.log
            .line(&format!("Retrying {} failed file(s)", failed.len()));
        self.run_batch(&failed, template)
    }

    fn run_batch_inner(
        &self,
        files: &[PathBuf],
        template: &RequestTemplate,
    ) -> BatchResult<BatchOutcome> {
        if files.is_empty() {
            return Err(BatchError::EmptyQueue);
        }
        let plan = build_plan(template)?;

        if !self.settings.paths.output_folder.is_empty() {
            let dir = PathBuf::from(&self.settings.paths.output_folder);
            fs::create_dir_all(&dir).map_err(|source| BatchError::OutputDir {
                path: dir.clone(),
                source,
            })?;
        }

        self.cancel.reset();

        let total = files.len();
        self.log.line(&format!(
            "Starting batch: {} file(s), {} -> {}",
            total, template.source_format, template.target_format
        ));

        // The shared plan applies to every queued file; mismatched
        // extensions are converted anyway, but visibly.
        for input in files {
            let ext = input
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if ext != template.source_format {
                self.log.warn(&format!(
                    "{} does not match the batch source format .{}",
                    input.display(),
                    template.source_format
                ));
            }
        }

        let mut outcomes = Vec::with_capacity(total);
        for (index, input) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.log.warn("Batch cancelled");
                return Ok(BatchOutcome::cancelled(outcomes));
            }

            match self.convert_one(input, template, &plan, index, total) {
                FileResult::Done(outcome) => outcomes.push(outcome),
                FileResult::Cancelled => {
                    self.log.warn("Batch cancelled");
                    return Ok(BatchOutcome::cancelled(outcomes));
                }
            }
        }

        let summary = BatchOutcome::completed(outcomes);
        self.log.line(&format!(
            "Batch complete: {} succeeded, {} failed, {} skipped",
            summary.success_count(),
            summary.failure_count(),
            summary.skipped_count()
        ));
        Ok(summary)
    }

    fn convert_one(
        &self,
        input: &Path,
        template: &RequestTemplate,
        plan: &ConversionPlan,
        index: usize,
        total: usize,
    ) -> FileResult {
        let request = template.request_for(input);
        let stem = request.input_stem();
        let target = &template.target_format;

        let out_dir = self.settings.resolved_output_dir(input);
        let final_path = out_dir.join(plan.output_file_name(&stem, target));
        let temp_path = out_dir.join(plan.temp_file_name(&stem, target));

        let display = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| input.display().to_string());
        self.log
            .line(&format!("Converting {} ({}/{})", display, index + 1, total));

        if final_path.exists() && !self.overwrite.should_overwrite(&final_path) {
            self.log
                .warn(&format!("Skipped, output exists: {}", final_path.display()));
            return FileResult::Done(FileOutcome::skipped(input));
        }

        let duration = probe_duration(&self.tool_path, input);
        let mut tracker = ProgressTracker::new(duration);
        let starting_fraction = tracker.is_determinate().then_some(0.0);
        self.emit_progress(index, total, starting_fraction);

        self.log.clear_tail();
        self.log
            .command(&command_line(&self.tool_path, input, &plan.args, &temp_path));

        let grace = Duration::from_secs(self.settings.conversion.termination_grace_secs);
        let run = run_ffmpeg(
            &self.tool_path,
            input,
            &plan.args,
            &temp_path,
            &self.cancel,
            grace,
            |line| {
                self.log.output_line(line);
                if let Some(fraction) = tracker.observe(line) {
                    self.emit_progress(index, total, Some(fraction));
                }
            },
        );

        let process = match run {
            Ok(process) => process,
            Err(e) => {
                let reason = format!("Failed to start ffmpeg: {}", e);
                self.log.error(&reason);
                return FileResult::Done(FileOutcome::failed(input, reason));
            }
        };

        if process.cancelled {
            remove_temp(&temp_path, &self.log);
            return FileResult::Cancelled;
        }

        let code = process.exit_code.unwrap_or(-1);
        self.log.line(&format!("Return code: {}", code));
        self.log.diagnostics(&process.lines.join("\n"));

        let outcome = if process.succeeded() {
            match move_into_place(&temp_path, &final_path) {
                Ok(()) => {
                    self.emit_progress(index, total, Some(1.0));
                    self.log.success(&final_path.display().to_string());
                    FileOutcome::success(input, &final_path)
                }
                Err(e) => {
                    remove_temp(&temp_path, &self.log);
                    let reason = format!("Failed to move output into place: {}", e);
                    self.log.error(&reason);
                    FileOutcome::failed(input, reason)
                }
            }
        } else {
            remove_temp(&temp_path, &self.log);
            let reason = failure_reason(code, &process.lines);
            self.log.error(&reason);
            FileOutcome::failed(input, reason)
        };

        FileResult::Done(outcome)
    }

    fn emit_progress(&self, file_index: usize, total_files: usize, fraction: Option<f64>) {
        if let Some(ref callback) = self.progress {
            callback(FileProgress {
                file_index,
                total_files,
                fraction,
            });
        }
    }
}

/// Replace the final file with the finished temp file.
fn move_into_place(temp: &Path, final_path: &Path) -> io::Result<()> {
    if final_path.exists() {
        fs::remove_file(final_path)?;
    }
    fs::rename(temp, final_path)
}

/// Best-effort temp cleanup after a failed or cancelled conversion.
fn remove_temp(temp: &Path, log: &ConverterLog) {
    if temp.exists() {
        if let Err(e) = fs::remove_file(temp) {
            log.warn(&format!("Could not remove temp file {}: {}", temp.display(), e));
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::{BatchStatus, FileStatus, MediaCategory};
    use std::os::unix::fs::PermissionsExt;
    use std::thread;
    use tempfile::tempdir;

    /// Script standing in for ffmpeg: probes report a 10s duration,
    /// conversions write the output file, inputs named *bad* fail.
    const FAKE_TOOL: &str = r#"#!/bin/sh
out=""
in=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-y" ]; then out="$a"; fi
  if [ "$prev" = "-i" ]; then in="$a"; fi
  prev="$a"
done
echo "Duration: 00:00:10.00, start: 0.000000, bitrate: 1000 kb/s" >&2
if [ -z "$out" ]; then
  exit 1
fi
case "$in" in
  *bad*)
    echo "Conversion failed!" >&2
    exit 3
    ;;
esac
echo "time=00:00:05.00 bitrate=1000.0kbits/s" >&2
echo converted > "$out"
exit 0
"#;

    /// Hangs on conversion runs; probe runs (no -y) exit immediately.
    const SLOW_TOOL: &str = r#"#!/bin/sh
for a in "$@"; do
  if [ "$a" = "-y" ]; then
    echo "starting" >&2
    exec sleep 10
  fi
done
exit 1
"#;

    fn install_tool(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake_ffmpeg");
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn runner_in(dir: &Path, body: &str, overwrite: OverwritePolicy) -> BatchRunner {
        let tool = install_tool(dir, body);
        let mut settings = Settings::default();
        settings.conversion.termination_grace_secs = 1;
        let log = Arc::new(ConverterLog::open(dir.join("logs"), None).unwrap());
        BatchRunner::new(tool, settings, overwrite, log)
    }

    fn template() -> RequestTemplate {
        RequestTemplate::new(MediaCategory::Video, "mov", "mp4")
    }

    #[test]
    fn batch_converts_and_renames_into_place() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clip.mov");
        fs::write(&input, "source").unwrap();

        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Overwrite);
        let summary = runner.run_batch(&[input.clone()], &template()).unwrap();

        assert_eq!(summary.status, BatchStatus::Completed);
        assert_eq!(summary.success_count(), 1);

        let final_path = dir.path().join("clip_converted.mp4");
        assert!(final_path.exists());
        assert!(!dir.path().join("clip_converted.tmp.mp4").exists());
        assert_eq!(summary.outcomes[0].output.as_deref(), Some(final_path.as_path()));
    }

    #[test]
    fn existing_output_is_skipped_under_skip_policy() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clip.mov");
        fs::write(&input, "source").unwrap();
        let final_path = dir.path().join("clip_converted.mp4");
        fs::write(&final_path, "old contents").unwrap();

        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Skip);
        let summary = runner.run_batch(&[input], &template()).unwrap();

        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(fs::read_to_string(&final_path).unwrap(), "old contents");
    }

    #[test]
    fn existing_output_is_replaced_under_overwrite_policy() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clip.mov");
        fs::write(&input, "source").unwrap();
        let final_path = dir.path().join("clip_converted.mp4");
        fs::write(&final_path, "old contents").unwrap();

        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Overwrite);
        let summary = runner.run_batch(&[input], &template()).unwrap();

        assert_eq!(summary.success_count(), 1);
        assert_eq!(fs::read_to_string(&final_path).unwrap(), "converted\n");
    }

    #[test]
    fn failure_records_reason_and_cleans_temp() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad_clip.mov");
        fs::write(&input, "source").unwrap();

        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Overwrite);
        let summary = runner.run_batch(&[input], &template()).unwrap();

        assert_eq!(summary.failure_count(), 1);
        let outcome = &summary.outcomes[0];
        assert_eq!(outcome.status, FileStatus::Failed);
        let reason = outcome.error.as_deref().unwrap();
        assert!(reason.starts_with("Error: 3"));
        assert!(reason.contains("Conversion failed!"));
        assert!(!dir.path().join("bad_clip_converted.tmp.mp4").exists());
    }

    #[test]
    fn retry_reruns_only_failed_files() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.mov");
        let bad = dir.path().join("bad.mov");
        fs::write(&good, "source").unwrap();
        fs::write(&bad, "source").unwrap();

        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Overwrite);
        let first = runner
            .run_batch(&[good.clone(), bad.clone()], &template())
            .unwrap();
        assert_eq!(first.success_count(), 1);
        assert_eq!(first.failed_paths(), vec![bad.clone()]);

        let retry = runner.retry_failures(&template()).unwrap();
        assert_eq!(retry.processed(), 1);
        assert_eq!(retry.outcomes[0].input_path, bad);
    }

    #[test]
    fn retry_without_failures_is_rejected() {
        let dir = tempdir().unwrap();
        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Overwrite);

        assert!(matches!(
            runner.retry_failures(&template()),
            Err(BatchError::NothingToRetry)
        ));
    }

    #[test]
    fn empty_queue_is_rejected() {
        let dir = tempdir().unwrap();
        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Overwrite);

        assert!(matches!(
            runner.run_batch(&[], &template()),
            Err(BatchError::EmptyQueue)
        ));
    }

    #[test]
    fn cancel_stops_batch_and_abandons_in_flight_file() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("clip.mov");
        let second = dir.path().join("next.mov");
        fs::write(&first, "source").unwrap();
        fs::write(&second, "source").unwrap();

        let runner = Arc::new(runner_in(dir.path(), SLOW_TOOL, OverwritePolicy::Overwrite));
        let cancel = runner.cancel_handle();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(400));
            cancel.cancel();
        });

        let summary = runner.run_batch(&[first, second], &template()).unwrap();
        canceller.join().unwrap();

        assert_eq!(summary.status, BatchStatus::Cancelled);
        // The in-flight file is abandoned and the queued file never runs.
        assert!(summary.outcomes.is_empty());
        assert!(!dir.path().join("clip_converted.mp4").exists());
        assert!(!dir.path().join("next_converted.mp4").exists());
        assert!(!dir.path().join("next_converted.tmp.mp4").exists());
    }

    #[test]
    fn progress_callback_sees_determinate_fractions() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("clip.mov");
        fs::write(&input, "source").unwrap();

        let seen: Arc<Mutex<Vec<Option<f64>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let runner = runner_in(dir.path(), FAKE_TOOL, OverwritePolicy::Overwrite)
            .with_progress(Box::new(move |p: FileProgress| {
                sink.lock().push(p.fraction);
            }));
        runner.run_batch(&[input], &template()).unwrap();

        let fractions = seen.lock().clone();
        assert_eq!(fractions.first(), Some(&Some(0.0)));
        assert!(fractions.contains(&Some(0.5)));
        assert_eq!(fractions.last(), Some(&Some(1.0)));
    }
}
