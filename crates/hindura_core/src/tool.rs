//! Discovery and verification of the external ffmpeg executable.
//!
//! Candidates are tried in priority order: the configured override, a
//! bundled binary next to the application executable, then the system
//! PATH. Each candidate must answer `-version` with exit code 0 before
//! it is accepted.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

/// Executable name on this platform.
#[cfg(windows)]
const FFMPEG_EXE: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const FFMPEG_EXE: &str = "ffmpeg";

/// Locate a working ffmpeg executable.
///
/// Tries, in order:
/// 1. The explicit override path, when one is given.
/// 2. A bundled binary in the same directory as the running executable.
/// 3. `ffmpeg` resolved through the system PATH.
///
/// Returns the first candidate that passes verification, or `None`.
pub fn find_ffmpeg(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if verify_ffmpeg(path) {
            return Some(path.to_path_buf());
        }
        debug!(path = %path.display(), "configured ffmpeg path failed verification");
    }

    if let Some(bundled) = bundled_candidate() {
        if verify_ffmpeg(&bundled) {
            return Some(bundled);
        }
    }

    let on_path = PathBuf::from(FFMPEG_EXE);
    if verify_ffmpeg(&on_path) {
        return Some(on_path);
    }

    None
}

/// Check that the candidate runs and reports a version.
///
/// Output is discarded; only the exit status matters.
pub fn verify_ffmpeg(candidate: &Path) -> bool {
    let result = Command::new(candidate)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(status) => status.success(),
        Err(e) => {
            debug!(candidate = %candidate.display(), error = %e, "ffmpeg candidate not runnable");
            false
        }
    }
}

/// Candidate bundled alongside the application executable.
fn bundled_candidate() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let dir = exe.parent()?;
    let candidate = dir.join(FFMPEG_EXE);
    candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_candidate_fails_verification() {
        assert!(!verify_ffmpeg(Path::new("/nonexistent/ffmpeg-definitely-missing")));
    }

    #[test]
    fn find_with_bad_override_falls_through() {
        // A bogus override must not be returned even if ffmpeg is absent
        // everywhere else.
        let result = find_ffmpeg(Some(Path::new("/nonexistent/ffmpeg-definitely-missing")));
        if let Some(found) = result {
            assert_ne!(found, Path::new("/nonexistent/ffmpeg-definitely-missing"));
        }
    }
}
