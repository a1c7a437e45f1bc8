//! Command assembly and process lifecycle for the external solver.

use std::io;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use tracing::{debug, trace, warn};

/// One fully-assembled solver invocation.
///
/// Argument order is significant: the model path must come last, and
/// `--read_solution_file` sits between the solution and options flags.
#[derive(Debug, Clone)]
pub struct SolverCommand {
    executable: PathBuf,
    time_limit: Option<f64>,
    solution_file: PathBuf,
    warmstart_file: Option<PathBuf>,
    options_file: PathBuf,
    model_file: PathBuf,
}

impl SolverCommand {
    /// Assemble a command with the three mandatory paths.
    pub fn new(
        executable: impl Into<PathBuf>,
        solution_file: impl Into<PathBuf>,
        options_file: impl Into<PathBuf>,
        model_file: impl Into<PathBuf>,
    ) -> Self {
        SolverCommand {
            executable: executable.into(),
            time_limit: None,
            solution_file: solution_file.into(),
            warmstart_file: None,
            options_file: options_file.into(),
            model_file: model_file.into(),
        }
    }

    /// Forward a time limit in seconds to the solver.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Supply a warm-start file the solver reads as a prior solution.
    pub fn with_warmstart_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.warmstart_file = Some(path.into());
        self
    }

    /// Render the argument vector (exposed for logging and tests).
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(limit) = self.time_limit {
            args.push("--time_limit".to_string());
            args.push(limit.to_string());
        }
        args.push("--solution_file".to_string());
        args.push(self.solution_file.display().to_string());
        if let Some(path) = &self.warmstart_file {
            args.push("--read_solution_file".to_string());
            args.push(path.display().to_string());
        }
        args.push("--options_file".to_string());
        args.push(self.options_file.display().to_string());
        args.push(self.model_file.display().to_string());
        args
    }

    /// Spawn the solver asynchronously and hand back the handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the executable cannot be spawned.
    pub fn spawn(&self) -> io::Result<SolverProcess> {
        let mut command = Command::new(&self.executable);
        if let Some(limit) = self.time_limit {
            command.arg("--time_limit").arg(limit.to_string());
        }
        command.arg("--solution_file").arg(&self.solution_file);
        if let Some(path) = &self.warmstart_file {
            command.arg("--read_solution_file").arg(path);
        }
        command.arg("--options_file").arg(&self.options_file);
        command.arg(&self.model_file);
        command.stdout(Stdio::null()).stderr(Stdio::null());

        let child = command.spawn()?;
        debug!(
            component = "launch",
            operation = "spawn",
            status = "success",
            executable = %self.executable.display(),
            pid = child.id(),
            args = ?self.to_args(),
            "Spawned solver process"
        );
        Ok(SolverProcess { child: Some(child) })
    }
}

/// Handle to a running solver process.
///
/// The process is terminated explicitly once its output is confirmed
/// complete, even when it already exited on its own, so no idle handle
/// lingers. The drop guard covers early error paths (timeout,
/// cancellation), so a child never outlives the call that spawned it.
/// Exit codes and stderr are never inspected.
#[derive(Debug)]
pub struct SolverProcess {
    child: Option<Child>,
}

impl SolverProcess {
    /// OS process id, if the child has not been reaped yet.
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Kill and reap the process. Harmless if it already exited.
    pub fn terminate(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        if let Err(err) = child.kill() {
            trace!(
                component = "launch",
                operation = "kill",
                status = "noop",
                error = %err,
                "Solver process already gone"
            );
        }
        match child.wait() {
            Ok(exit) => trace!(
                component = "launch",
                operation = "reap",
                status = "success",
                code = ?exit.code(),
                "Reaped solver process"
            ),
            Err(err) => warn!(
                component = "launch",
                operation = "reap",
                status = "warn",
                error = %err,
                "Failed to reap solver process"
            ),
        }
    }
}

impl Drop for SolverProcess {
    fn drop(&mut self) {
        self.shutdown();
    }
}
