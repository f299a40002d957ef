//! Batch outcome structures (per-file results, end-of-batch summaries).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Final status of one file's conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// Converted and renamed into place.
    Success,
    /// Conversion or rename failed; reason recorded.
    Failed,
    /// Final output existed and the overwrite policy declined.
    Skipped,
    /// Batch was cancelled while this file was in flight.
    Cancelled,
}

/// Result of one file's conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Path to the input file.
    pub input_path: PathBuf,
    /// Final status.
    pub status: FileStatus,
    /// Path to the final output file (if successful).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Failure reason (if failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    /// Create a successful outcome.
    pub fn success(input_path: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            status: FileStatus::Success,
            output: Some(output.into()),
            error: None,
        }
    }

    /// Create a failed outcome.
    pub fn failed(input_path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            input_path: input_path.into(),
            status: FileStatus::Failed,
            output: None,
            error: Some(error.into()),
        }
    }

    /// Create a skipped outcome.
    pub fn skipped(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            status: FileStatus::Skipped,
            output: None,
            error: None,
        }
    }

    /// Create a cancelled outcome.
    pub fn cancelled(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            status: FileStatus::Cancelled,
            output: None,
            error: None,
        }
    }

    /// Whether this outcome is a success.
    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Success
    }

    /// Whether this outcome is a failure.
    pub fn is_failed(&self) -> bool {
        self.status == FileStatus::Failed
    }

    /// The input file's display name (final path component).
    pub fn file_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input_path.display().to_string())
    }
}

/// How a batch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Every queued file was processed (some may have failed or skipped).
    Completed,
    /// The batch was cancelled before the queue drained.
    Cancelled,
}

/// End-of-batch summary.
///
/// Outcomes are in queue order. A cancelled in-flight file is abandoned
/// and does not appear in the list; only files that ran to a decision do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// How the batch ended.
    pub status: BatchStatus,
    /// Per-file outcomes, in processing order.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchOutcome {
    /// Create a summary for a batch that drained its queue.
    pub fn completed(outcomes: Vec<FileOutcome>) -> Self {
        Self {
            status: BatchStatus::Completed,
            outcomes,
        }
    }

    /// Create a summary for a cancelled batch.
    pub fn cancelled(outcomes: Vec<FileOutcome>) -> Self {
        Self {
            status: BatchStatus::Cancelled,
            outcomes,
        }
    }

    /// Number of files that ran to a decision.
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of successful conversions.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of skipped files.
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == FileStatus::Skipped)
            .count()
    }

    /// Number of failed files.
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// Paths of the failed files, in processing order.
    pub fn failed_paths(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(|o| o.input_path.clone())
            .collect()
    }

    /// Human-readable failure descriptions, in processing order.
    pub fn failure_descriptions(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(|o| {
                format!(
                    "{}: {}",
                    o.file_name(),
                    o.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect()
    }

    /// Whether any file failed.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BatchOutcome {
        BatchOutcome::completed(vec![
            FileOutcome::success("/in/a.mov", "/in/a_converted.mp4"),
            FileOutcome::failed("/in/b.mov", "Error: 1\nLast error: moov atom not found"),
            FileOutcome::skipped("/in/c.mov"),
        ])
    }

    #[test]
    fn counts_partition_outcomes() {
        let summary = sample();
        assert_eq!(summary.processed(), 3);
        assert_eq!(summary.success_count(), 1);
        assert_eq!(summary.failure_count(), 1);
        assert_eq!(summary.skipped_count(), 1);
    }

    #[test]
    fn failed_paths_preserve_order() {
        let summary = sample();
        assert_eq!(summary.failed_paths(), vec![PathBuf::from("/in/b.mov")]);
        let descriptions = summary.failure_descriptions();
        assert_eq!(descriptions.len(), 1);
        assert!(descriptions[0].starts_with("b.mov: "));
    }

    #[test]
    fn outcome_serializes_without_empty_fields() {
        let json = serde_json::to_string(&FileOutcome::skipped("/in/c.mov")).unwrap();
        assert!(json.contains("\"status\":\"Skipped\""));
        assert!(!json.contains("\"output\""));
        assert!(!json.contains("\"error\""));
    }
}
