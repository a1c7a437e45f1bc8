//! File-driven solver frontend.
//!
//! Drives the external executable through its file interface: write the
//! model and options, spawn, poll the solution file until its content
//! shape says the writer finished, terminate the process, decode,
//! normalize, and write values back onto the symbol table.

use crate::decode::decode_solution;
use crate::error::DriveError;
use crate::files::{solve_token, FileOverrides, SolveFiles};
use crate::launch::SolverCommand;
use crate::numeric::normalize;
use crate::options::HighsOptions;
use crate::solution::Solution;
use crate::warmstart::encode_warmstart;
use crate::watch::{CancelToken, SolutionWatcher};
use drover_model::{ModelSource, SymbolTable};
use drover_solver::{Solve, SolverConfig, SolverError};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Executable name used when none is configured; resolved via `PATH`.
pub const DEFAULT_EXECUTABLE: &str = "highs";

const DEFAULT_SCRATCH_ROOT: &str = "./tmp";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_ROUNDING_DIGITS: i32 = 8;
const DEFAULT_PRECISION: i32 = 8;

/// Frontend for a solver executable that communicates only through files.
///
/// One instance drives one solve at a time, synchronously. Concurrent
/// solves need independent instances; their scratch files cannot collide
/// because every solve gets a unique file-name token, but no further
/// cross-instance coordination exists.
#[derive(Debug)]
pub struct Solver {
    executable: PathBuf,
    config: SolverConfig,
    options: HighsOptions,
    overrides: FileOverrides,
    scratch_root: PathBuf,
    poll_interval: Duration,
    wait_timeout: Option<Duration>,
    cancel: CancelToken,
    warm_start: bool,
    keep_files: bool,
    remove_log: bool,
    rounding_digits: i32,
    precision: i32,
    symbols: Option<SymbolTable>,
}

impl Solver {
    /// Create a frontend for the given executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Solver {
            executable: executable.into(),
            config: SolverConfig::new(),
            options: HighsOptions::new(),
            overrides: FileOverrides::default(),
            scratch_root: PathBuf::from(DEFAULT_SCRATCH_ROOT),
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_timeout: None,
            cancel: CancelToken::new(),
            warm_start: false,
            keep_files: false,
            remove_log: false,
            rounding_digits: DEFAULT_ROUNDING_DIGITS,
            precision: DEFAULT_PRECISION,
            symbols: None,
        }
    }

    fn update_config(&mut self, update: impl FnOnce(SolverConfig) -> SolverConfig) {
        self.config = update(std::mem::take(&mut self.config));
    }

    /// Set a time limit in seconds, forwarded to the solver's own
    /// `--time_limit` flag. This bounds the solver, not the wait for its
    /// output; see [`Solver::set_wait_timeout`] for the latter.
    pub fn set_time_limit(&mut self, seconds: f64) {
        self.update_config(|config| config.with_time_limit(seconds));
    }

    /// Set a relative MIP gap for the next solve.
    pub fn set_mip_gap(&mut self, gap: f64) {
        self.update_config(|config| config.with_mip_gap(gap));
    }

    /// Set thread count for the next solve.
    pub fn set_threads(&mut self, threads: u32) {
        self.update_config(|config| config.with_threads(threads));
    }

    /// Enable or disable presolve for the next solve.
    pub fn set_presolve(&mut self, enabled: bool) {
        self.update_config(|config| config.with_presolve(enabled));
    }

    /// Set feasibility tolerance for the next solve.
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.update_config(|config| config.with_tolerance(tolerance));
    }

    /// Enable or disable solver logging to console for the next solve.
    pub fn set_log_to_console(&mut self, enabled: bool) {
        self.update_config(|config| config.with_log_to_console(enabled));
    }

    /// Get access to the current solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Set the solver configuration.
    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    /// Set a raw solver option written verbatim into the options file.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl ToString) {
        self.options.set(key, value);
    }

    /// Directory for per-solve scratch files.
    pub fn set_scratch_root(&mut self, root: impl Into<PathBuf>) {
        self.scratch_root = root.into();
    }

    /// Write the model file to a caller-chosen path and keep it after the
    /// solve.
    pub fn set_model_file(&mut self, path: impl Into<PathBuf>) {
        self.overrides.model = Some(path.into());
    }

    /// Let the solver write its solution to a caller-chosen path and keep
    /// it after the solve.
    pub fn set_solution_file(&mut self, path: impl Into<PathBuf>) {
        self.overrides.solution = Some(path.into());
    }

    /// Redirect the solver log to a caller-chosen path.
    pub fn set_log_file(&mut self, path: impl Into<PathBuf>) {
        self.overrides.log = Some(path.into());
    }

    /// Interval between completion probes on the solution file.
    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    /// Bound the wait for the solution file. Without this, a solver that
    /// dies before writing its output leaves `solve` polling forever.
    pub fn set_wait_timeout(&mut self, timeout: Duration) {
        self.wait_timeout = Some(timeout);
    }

    /// Token that cancels a pending wait from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Re-encode the previous solve's values as a warm start for the next
    /// solve.
    pub fn set_warm_start(&mut self, enabled: bool) {
        self.warm_start = enabled;
    }

    /// Keep scratch files after a successful solve instead of deleting
    /// them. Files are always kept when a solve fails, for post-mortem.
    pub fn set_keep_files(&mut self, keep: bool) {
        self.keep_files = keep;
    }

    /// Delete the solver log after the solve.
    pub fn set_remove_log(&mut self, remove: bool) {
        self.remove_log = remove;
    }

    /// Decimal places for the fixed rounding step applied to decoded
    /// values.
    pub fn set_rounding_digits(&mut self, digits: i32) {
        self.rounding_digits = digits;
    }

    /// Significant-digit budget for the magnitude-adaptive rounding step.
    pub fn set_precision(&mut self, precision: i32) {
        self.precision = precision;
    }

    /// Symbol table of the last completed solve, values written back.
    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.symbols.as_ref()
    }

    /// Run one solve.
    ///
    /// On success the returned [`Solution`] carries the normalized values
    /// and the same values are written back onto the symbol table
    /// retained by the frontend. On failure the scratch files are left in
    /// place for inspection.
    ///
    /// A file that passes the completion check and still fails to decode
    /// structurally may be a solver anomaly, a completion-detection race,
    /// or a mis-declared symbol table; the error does not distinguish
    /// these.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be written, the process
    /// cannot be spawned, the wait times out or is cancelled, or the
    /// solution file fails structural decoding.
    pub fn solve(&mut self, model: &dyn ModelSource) -> Result<Solution, DriveError> {
        let solve_started = Instant::now();
        let token = solve_token();
        let files = SolveFiles::new(&self.scratch_root, &token, &self.overrides)?;

        let mut symbols = model.write_model(files.model.path())?;
        debug!(
            component = "driver",
            operation = "write_model",
            status = "success",
            symbols = symbols.len() as u64,
            decisions = symbols.decision_count() as u64,
            path = %files.model.path().display(),
            "Model written"
        );

        let mut command = SolverCommand::new(
            &self.executable,
            files.solution.path(),
            files.options.path(),
            files.model.path(),
        );
        if let Some(limit) = self.config.time_limit {
            command = command.with_time_limit(limit);
        }

        if self.warm_start {
            if let Some(previous) = &self.symbols {
                symbols.assign_from(previous);
            }
            encode_warmstart(files.warmstart.path(), &symbols)?;
            command = command.with_warmstart_file(files.warmstart.path());
        }

        let mut options = self.options.clone();
        options.apply_config(&self.config);
        options.set("log_file", files.log.path().display());
        options.write_to(files.options.path())?;

        let process = command.spawn()?;

        let mut watcher = SolutionWatcher::new(files.solution.path())
            .with_interval(self.poll_interval)
            .with_cancel(self.cancel.clone());
        if let Some(timeout) = self.wait_timeout {
            watcher = watcher.with_timeout(timeout);
        }

        let stats = match watcher.wait() {
            Ok(stats) => stats,
            Err(err) => {
                warn!(
                    component = "driver",
                    operation = "wait",
                    status = "error",
                    error = %err,
                    "Abandoning solve; terminating solver process"
                );
                drop(process);
                return Err(err);
            }
        };
        // Terminate even when the solver already exited on its own;
        // holding an exited child keeps an un-reaped handle around.
        process.terminate();

        let text = fs::read_to_string(files.solution.path())?;
        let raw = decode_solution(&text, &symbols)?;

        let mut values = BTreeMap::new();
        for (name, value) in &raw.values {
            let normalized = normalize(*value, self.rounding_digits, self.precision);
            symbols.set_value(name, normalized)?;
            values.insert(name.clone(), normalized);
        }

        let solution = Solution {
            status: raw.status,
            status_label: raw.status_label,
            objective: raw.objective,
            values,
            solve_time_seconds: solve_started.elapsed().as_secs_f64(),
            polls: stats.polls,
        };

        if !self.keep_files {
            files.cleanup();
        }
        if self.remove_log {
            files.remove_log();
        }
        self.symbols = Some(symbols);

        debug!(
            component = "driver",
            operation = "solve",
            status = "success",
            solver_status = %solution.status,
            objective = ?solution.objective,
            num_values = solution.values.len() as u64,
            polls = stats.polls,
            duration_ms = solution.solve_time_seconds * 1000.0,
            "Solve completed"
        );
        Ok(solution)
    }
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(DEFAULT_EXECUTABLE)
    }
}

/// Convert a driver error to the generic solver error.
fn drive_error_to_generic(err: DriveError) -> SolverError {
    match err {
        DriveError::Timeout { waited, .. } => SolverError::Timeout {
            waited_secs: waited.as_secs_f64(),
        },
        DriveError::Cancelled => SolverError::Cancelled,
        other => SolverError::InternalError(other.to_string()),
    }
}

impl Solve for Solver {
    type Solution = Solution;

    fn solve(
        &mut self,
        model: &dyn ModelSource,
        config: &SolverConfig,
    ) -> Result<Solution, SolverError> {
        self.config = config.clone();
        let solution = Solver::solve(self, model).map_err(drive_error_to_generic)?;
        if !solution.is_feasible() {
            return Err(SolverError::SolveFailure {
                status: solution.status(),
            });
        }
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drover_solver::SolverStatus;

    #[test]
    fn default_knobs() {
        let solver = Solver::default();
        assert_eq!(solver.executable, PathBuf::from(DEFAULT_EXECUTABLE));
        assert_eq!(solver.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(solver.wait_timeout, None);
        assert_eq!(solver.rounding_digits, 8);
        assert_eq!(solver.precision, 8);
        assert!(!solver.warm_start);
        assert!(!solver.keep_files);
        assert!(solver.symbols().is_none());
    }

    #[test]
    fn config_setters_accumulate() {
        let mut solver = Solver::default();
        solver.set_time_limit(10.0);
        solver.set_threads(2);
        assert_eq!(solver.config().time_limit, Some(10.0));
        assert_eq!(solver.config().threads, Some(2));
    }

    #[test]
    fn cancel_token_is_shared() {
        let solver = Solver::default();
        let token = solver.cancel_token();
        assert!(!solver.cancel.is_cancelled());
        token.cancel();
        assert!(solver.cancel.is_cancelled());
    }

    #[test]
    fn generic_error_conversion() {
        let err = drive_error_to_generic(DriveError::Timeout {
            waited: Duration::from_secs(2),
            polls: 20,
        });
        assert!(matches!(err, SolverError::Timeout { .. }));

        let err = drive_error_to_generic(DriveError::Cancelled);
        assert!(matches!(err, SolverError::Cancelled));

        let err = drive_error_to_generic(DriveError::MissingValue {
            symbol: "x1".to_string(),
        });
        match err {
            SolverError::InternalError(msg) => assert!(msg.contains("x1")),
            other => panic!("expected InternalError, got {other}"),
        }
    }

    #[test]
    fn solve_failure_statuses() {
        // The generic facade turns non-feasible statuses into errors;
        // the inherent solve returns the record for any status.
        assert!(!SolverStatus::Infeasible.is_feasible());
        assert!(!SolverStatus::Unknown.is_feasible());
        assert!(SolverStatus::ReachedTimeLimit.is_feasible());
    }
}
