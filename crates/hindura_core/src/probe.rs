//! Duration probing and diagnostic-stream parsing.
//!
//! The external tool reports both the input duration and conversion
//! progress on stderr. Duration comes from an inspection run (`-i` with
//! no output, which exits nonzero by design); progress comes from the
//! `time=` field of the periodic status lines during conversion.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Duration: (\d{2}):(\d{2}):(\d{2})\.(\d{2})").unwrap())
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"time=(\d{2}):(\d{2}):(\d{2})\.(\d{2})").unwrap())
}

fn clock_to_secs(captures: &regex::Captures<'_>) -> f64 {
    let field = |i: usize| {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds, centis) = (field(1), field(2), field(3), field(4));
    f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + f64::from(seconds)
        + f64::from(centis) / 100.0
}

/// Parse the input duration in seconds from inspection-run diagnostics.
pub fn parse_duration(diagnostics: &str) -> Option<f64> {
    duration_re()
        .captures(diagnostics)
        .map(|c| clock_to_secs(&c))
}

/// Parse the elapsed output time in seconds from one status line.
pub fn parse_progress_time(line: &str) -> Option<f64> {
    time_re().captures(line).map(|c| clock_to_secs(&c))
}

/// Probe a media file's duration by running the tool in inspection mode.
///
/// Returns `None` when the tool cannot be run or the duration line is
/// absent; the caller falls back to indeterminate progress.
pub fn probe_duration(tool: &Path, input: &Path) -> Option<f64> {
    let output = match Command::new(tool).arg("-i").arg(input).output() {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("Duration probe failed for {}: {}", input.display(), e);
            return None;
        }
    };
    parse_duration(&String::from_utf8_lossy(&output.stderr))
}

/// Incremental progress state for one conversion.
///
/// Reported fractions are clamped to [0, 1] and monotone non-decreasing.
/// Without a known duration the tracker stays indeterminate and never
/// reports a fraction.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    duration_secs: Option<f64>,
    fraction: f64,
}

impl ProgressTracker {
    /// Create a tracker for an input of the given duration.
    pub fn new(duration_secs: Option<f64>) -> Self {
        Self {
            duration_secs: duration_secs.filter(|d| *d > 0.0),
            fraction: 0.0,
        }
    }

    /// Whether a fraction can be computed at all.
    pub fn is_determinate(&self) -> bool {
        self.duration_secs.is_some()
    }

    /// Feed one diagnostic line; returns the new fraction when it advanced.
    pub fn observe(&mut self, line: &str) -> Option<f64> {
        let elapsed = parse_progress_time(line)?;
        let total = self.duration_secs?;
        let fraction = (elapsed / total).min(1.0);
        if fraction > self.fraction {
            self.fraction = fraction;
            Some(fraction)
        } else {
            None
        }
    }

    /// Latest reported fraction.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}
