//! Shared types for the batch runner.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for a running batch.
///
/// Cloning the handle shares the underlying flag, so a UI thread can
/// cancel a batch running on a worker thread.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a new, un-cancelled handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clear the flag so the handle can be reused for a new batch.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Decision callback for the `Ask` overwrite policy.
///
/// Receives the final output path and returns `true` to overwrite.
pub type OverwritePrompt = Box<dyn Fn(&Path) -> bool + Send + Sync>;

/// What to do when a final output file already exists.
pub enum OverwritePolicy {
    /// Ask the caller per file via the prompt callback.
    Ask(OverwritePrompt),
    /// Skip the file, recording a skipped outcome.
    Skip,
    /// Replace the existing file.
    Overwrite,
}

impl OverwritePolicy {
    /// Resolve the policy for one existing output file.
    ///
    /// Returns `true` when conversion should proceed.
    pub fn should_overwrite(&self, final_path: &Path) -> bool {
        match self {
            OverwritePolicy::Ask(prompt) => prompt(final_path),
            OverwritePolicy::Skip => false,
            OverwritePolicy::Overwrite => true,
        }
    }
}

impl std::fmt::Debug for OverwritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverwritePolicy::Ask(_) => f.write_str("Ask"),
            OverwritePolicy::Skip => f.write_str("Skip"),
            OverwritePolicy::Overwrite => f.write_str("Overwrite"),
        }
    }
}

/// Progress snapshot for the file currently being converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileProgress {
    /// Zero-based index of the current file.
    pub file_index: usize,
    /// Total files in this batch.
    pub total_files: usize,
    /// Completed fraction in `[0.0, 1.0]`, or `None` when the input's
    /// duration could not be determined.
    pub fraction: Option<f64>,
}

/// Callback invoked with progress updates during conversion.
pub type ProgressCallback = Box<dyn Fn(FileProgress) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_handle_shares_flag_across_clones() {
        let handle = CancelHandle::new();
        let clone = handle.clone();

        assert!(!handle.is_cancelled());
        clone.cancel();
        assert!(handle.is_cancelled());

        handle.reset();
        assert!(!clone.is_cancelled());
    }

    #[test]
    fn overwrite_policy_decisions() {
        let path = Path::new("/out/a_converted.mp4");

        assert!(!OverwritePolicy::Skip.should_overwrite(path));
        assert!(OverwritePolicy::Overwrite.should_overwrite(path));

        let ask_yes = OverwritePolicy::Ask(Box::new(|_| true));
        assert!(ask_yes.should_overwrite(path));

        let ask_no = OverwritePolicy::Ask(Box::new(|_| false));
        assert!(!ask_no.should_overwrite(path));
    }
}
