//! Execution of a single ffmpeg conversion process.
//!
//! Stderr is drained on a dedicated reader thread and forwarded line by
//! line over a channel, so the control loop can watch the cancel flag
//! while the tool runs. Cancellation first asks ffmpeg to quit, waits a
//! bounded grace period, then kills the process.

use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::types::CancelHandle;

/// Poll interval for channel reads and child exit checks.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Trailing stderr lines inspected for the failure reason.
const FAILURE_WINDOW: usize = 5;

/// Result of one ffmpeg invocation.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// Exit code, when the process ran to completion and reported one.
    pub exit_code: Option<i32>,
    /// All stderr lines, in order.
    pub lines: Vec<String>,
    /// Whether the run was stopped by cancellation.
    pub cancelled: bool,
}

impl ProcessOutcome {
    /// Whether the conversion finished successfully.
    pub fn succeeded(&self) -> bool {
        !self.cancelled && self.exit_code == Some(0)
    }
}

/// Render the invocation as a loggable command line.
///
/// Arguments containing whitespace are quoted for readability only.
pub fn command_line(tool: &Path, input: &Path, args: &[String], temp_output: &Path) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(args.len() + 5);
    parts.push(display_arg(&tool.display().to_string()));
    parts.push("-i".to_string());
    parts.push(display_arg(&input.display().to_string()));
    for arg in args {
        parts.push(display_arg(arg));
    }
    parts.push("-y".to_string());
    parts.push(display_arg(&temp_output.display().to_string()));
    parts.join(" ")
}

fn display_arg(arg: &str) -> String {
    if arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// Build the failure reason from the exit code and trailing stderr.
///
/// Takes the last non-empty line among the final few stderr lines,
/// which is where ffmpeg prints its actual error.
pub fn failure_reason(exit_code: i32, lines: &[String]) -> String {
    let last_error = lines
        .iter()
        .rev()
        .take(FAILURE_WINDOW)
        .find(|line| !line.trim().is_empty());

    match last_error {
        Some(line) => format!("Error: {}\nLast error: {}", exit_code, line.trim()),
        None => format!("Error: {}", exit_code),
    }
}

/// Run one conversion: `ffmpeg -i <input> [args] -y <temp_output>`.
///
/// Each stderr line is passed to `on_line` as it arrives. When the
/// cancel flag is raised mid-run the process is stopped and the outcome
/// is marked cancelled.
pub fn run_ffmpeg<F>(
    tool: &Path,
    input: &Path,
    args: &[String],
    temp_output: &Path,
    cancel: &CancelHandle,
    termination_grace: Duration,
    mut on_line: F,
) -> io::Result<ProcessOutcome>
where
    F: FnMut(&str),
{
    let mut child = Command::new(tool)
        .arg("-i")
        .arg(input)
        .args(args)
        .arg("-y")
        .arg(temp_output)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("child stderr was not captured"))?;

    let (tx, rx) = mpsc::channel();
    let reader = thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut lines = Vec::new();
    let mut cancelled = false;

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => {
                on_line(&line);
                lines.push(line);
            }
            Err(RecvTimeoutError::Timeout) => {
                if cancel.is_cancelled() {
                    cancelled = true;
                    stop_child(&mut child, termination_grace);
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Lines buffered between the stop decision and pipe closure.
    while let Ok(line) = rx.try_recv() {
        on_line(&line);
        lines.push(line);
    }
    let _ = reader.join();

    let status = child.wait()?;
    let exit_code = if cancelled { None } else { status.code() };

    Ok(ProcessOutcome {
        exit_code,
        lines,
        cancelled,
    })
}

/// Stop a running child: request quit, wait out the grace period, kill.
fn stop_child(child: &mut Child, grace: Duration) {
    // ffmpeg treats "q" on stdin as a quit request.
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(b"q");
    }

    let deadline = Instant::now() + grace;
    while Instant::now() < deadline {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                debug!(error = %e, "failed to poll cancelled process");
                break;
            }
        }
    }

    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn command_line_rendering() {
        let line = command_line(
            Path::new("ffmpeg"),
            Path::new("/media/my clip.mov"),
            &["-c:v".to_string(), "libx264".to_string()],
            Path::new("/media/my clip_converted.tmp.mp4"),
        );
        assert_eq!(
            line,
            "ffmpeg -i \"/media/my clip.mov\" -c:v libx264 -y \"/media/my clip_converted.tmp.mp4\""
        );
    }

    #[test]
    fn failure_reason_picks_last_nonempty_line() {
        let lines = vec![
            "frame=  100 fps=25".to_string(),
            "Error while decoding stream #0:0".to_string(),
            "   ".to_string(),
            String::new(),
        ];
        assert_eq!(
            failure_reason(1, &lines),
            "Error: 1\nLast error: Error while decoding stream #0:0"
        );
    }

    #[test]
    fn failure_reason_without_stderr() {
        assert_eq!(failure_reason(137, &[]), "Error: 137");
    }

    #[test]
    fn failure_reason_ignores_lines_outside_window() {
        let mut lines: Vec<String> = vec!["real error up here".to_string()];
        lines.extend(std::iter::repeat_n(String::new(), 6));
        assert_eq!(failure_reason(1, &lines), "Error: 1");
    }

    #[test]
    fn run_reports_exit_code() {
        // "false" exists on any POSIX system and exits nonzero at once.
        let tool = PathBuf::from("false");
        let cancel = CancelHandle::new();
        let outcome = run_ffmpeg(
            &tool,
            Path::new("input"),
            &[],
            Path::new("output"),
            &cancel,
            Duration::from_secs(1),
            |_| {},
        )
        .unwrap();

        assert!(!outcome.cancelled);
        assert_eq!(outcome.exit_code, Some(1));
        assert!(!outcome.succeeded());
    }
}
