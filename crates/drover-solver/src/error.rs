//! Solver error types.

use crate::SolverStatus;

/// Error type for solver operations.
#[derive(Debug, Clone)]
pub enum SolverError {
    /// Solver finished without a usable solution.
    SolveFailure {
        /// The solver status that caused the failure.
        status: SolverStatus,
    },
    /// The solver's output never satisfied the completion predicate
    /// within the allowed wait.
    Timeout {
        /// Seconds waited before giving up.
        waited_secs: f64,
    },
    /// Cancellation was requested while waiting for the solver.
    Cancelled,
    /// Frontend-specific error not covered by other variants.
    InternalError(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::SolveFailure { status } => match status {
                SolverStatus::Infeasible => "SOLVER_INFEASIBLE",
                SolverStatus::Unbounded => "SOLVER_UNBOUNDED",
                _ => "SOLVER_NO_SOLUTION",
            },
            SolverError::Timeout { .. } => "SOLVER_WAIT_TIMEOUT",
            SolverError::Cancelled => "SOLVER_CANCELLED",
            SolverError::InternalError(_) => "SOLVER_INTERNAL",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::SolveFailure { status } => {
                write!(f, "[{}] {}", self.code(), status_message(*status))
            }
            SolverError::Timeout { waited_secs } => write!(
                f,
                "[{}] Solver output incomplete after {:.1}s",
                self.code(),
                waited_secs
            ),
            SolverError::Cancelled => {
                write!(f, "[{}] Solve cancelled while waiting", self.code())
            }
            SolverError::InternalError(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
        }
    }
}

fn status_message(status: SolverStatus) -> &'static str {
    match status {
        SolverStatus::Infeasible => "Problem is infeasible",
        SolverStatus::Unbounded => "Problem is unbounded",
        SolverStatus::ReachedTimeLimit => "Solver reached time limit",
        SolverStatus::Unknown => "Solver status unknown",
        SolverStatus::Optimal => "Solver returned optimal",
    }
}

impl std::error::Error for SolverError {}
