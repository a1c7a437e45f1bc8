//! Completion detection for the external solver's output file.

use crate::DriveError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Marker the solver writes at the top of its final output section.
///
/// The process gives no done-signal of its own (no pipe, no lock file, no
/// rename), so this substring plus a trailing newline is the only
/// observable proxy for "writer finished". The proxy is racy by nature: a
/// buffered writer can expose the marker before the numeric body is fully
/// flushed. An atomic-rename protocol would close the race but requires
/// control over the solver process.
pub const COMPLETION_MARKER: &str = "# Basis\nHiGHS";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cooperative cancellation handle for a pending wait.
///
/// Clone it, hand the clone to another thread, and call
/// [`CancelToken::cancel`] to make the waiting side fail with
/// `DriveError::Cancelled` at its next poll.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, untriggered token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been triggered.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Statistics from one wait, successful or not.
#[derive(Debug, Clone, Copy)]
pub struct WaitStats {
    /// Number of poll iterations that found the file incomplete.
    pub polls: u64,
    /// Total time spent waiting.
    pub waited: Duration,
}

/// Polls a solution path until its content shape says the writer finished.
///
/// Each probe re-reads the entire file; O(file size) per iteration is
/// acceptable for bounded solution-file sizes. Sleeping between probes is
/// cooperative, never a busy spin.
#[derive(Debug, Clone)]
pub struct SolutionWatcher {
    path: PathBuf,
    interval: Duration,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl SolutionWatcher {
    /// Watch `path` with the default poll interval and no timeout.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SolutionWatcher {
            path: path.into(),
            interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
            cancel: None,
        }
    }

    /// Set the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Bound the wait. Without a timeout the wait is unbounded: a solver
    /// that crashes before writing anything leaves the caller polling
    /// forever.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a cancellation token, checked once per poll.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Single probe: the file exists, contains [`COMPLETION_MARKER`], and
    /// ends with a newline.
    ///
    /// # Errors
    ///
    /// A missing file reports `Ok(false)`; any other I/O failure
    /// propagates raw.
    pub fn is_complete(&self) -> io::Result<bool> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => return Err(err),
        };
        Ok(text.contains(COMPLETION_MARKER) && text.ends_with('\n'))
    }

    /// Path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the file is complete, sleeping between probes.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when a configured timeout elapses, `Cancelled`
    /// when the token fires, or a raw I/O error from probing.
    pub fn wait(&self) -> Result<WaitStats, DriveError> {
        let started = Instant::now();
        let mut polls: u64 = 0;
        loop {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    return Err(DriveError::Cancelled);
                }
            }
            if self.is_complete()? {
                let stats = WaitStats {
                    polls,
                    waited: started.elapsed(),
                };
                debug!(
                    component = "watch",
                    operation = "wait",
                    status = "success",
                    polls = stats.polls,
                    waited_ms = stats.waited.as_secs_f64() * 1000.0,
                    path = %self.path.display(),
                    "Solution file complete"
                );
                return Ok(stats);
            }
            polls += 1;
            if let Some(limit) = self.timeout {
                let waited = started.elapsed();
                if waited >= limit {
                    return Err(DriveError::Timeout { waited, polls });
                }
            }
            trace!(
                component = "watch",
                operation = "poll",
                status = "pending",
                polls,
                path = %self.path.display(),
                "Solution file not complete yet"
            );
            thread::sleep(self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::OpenOptions;
    use std::io::Write;

    fn scratch_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("drover-watch-{}-{}", std::process::id(), name))
    }

    #[test]
    fn missing_file_is_not_complete() {
        let watcher = SolutionWatcher::new(scratch_path("absent.sol"));
        assert!(!watcher.is_complete().unwrap());
    }

    #[test]
    fn two_stage_write_flips_readiness() {
        let path = scratch_path("staged.sol");
        fs::write(
            &path,
            "Model status\nOptimal\n\n# Primal solution values\n1\nObjective 42.0\nx1 3.0\n",
        )
        .unwrap();
        let watcher = SolutionWatcher::new(&path);
        // Marker absent: a newline-terminated prefix alone is not completion.
        assert!(!watcher.is_complete().unwrap());

        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "\n# Basis\nHiGHS v1\nNone").unwrap();
        // Marker present but no trailing newline yet.
        assert!(!watcher.is_complete().unwrap());

        writeln!(file).unwrap();
        assert!(watcher.is_complete().unwrap());

        fs::remove_file(&path).ok();
    }

    #[test]
    fn wait_times_out_on_never_ready_file() {
        let watcher = SolutionWatcher::new(scratch_path("never.sol"))
            .with_interval(Duration::from_millis(5))
            .with_timeout(Duration::from_millis(40));
        let err = watcher.wait().unwrap_err();
        match err {
            DriveError::Timeout { polls, waited } => {
                assert!(polls >= 1);
                assert!(waited >= Duration::from_millis(40));
            }
            other => panic!("expected Timeout, got {other}"),
        }
    }

    #[test]
    fn wait_observes_cancellation() {
        let token = CancelToken::new();
        token.cancel();
        let watcher = SolutionWatcher::new(scratch_path("cancelled.sol"))
            .with_interval(Duration::from_millis(5))
            .with_cancel(token);
        let err = watcher.wait().unwrap_err();
        assert!(matches!(err, DriveError::Cancelled));
    }

    #[test]
    fn wait_returns_stats_for_ready_file() {
        let path = scratch_path("ready.sol");
        fs::write(&path, "header\n# Basis\nHiGHS v1\nNone\n").unwrap();
        let watcher = SolutionWatcher::new(&path).with_interval(Duration::from_millis(5));
        let stats = watcher.wait().unwrap();
        assert_eq!(stats.polls, 0);
        fs::remove_file(&path).ok();
    }
}
