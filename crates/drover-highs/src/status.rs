//! Status-label mapping for the solver's text grammar.

use drover_solver::SolverStatus;

/// Map the label following the `Model status` marker onto a status.
///
/// Labels outside the known set map to `Unknown` rather than failing: the
/// status line is informational, not structural, and solver releases have
/// grown new labels before.
pub(crate) fn status_from_label(label: &str) -> SolverStatus {
    match label {
        "Optimal" => SolverStatus::Optimal,
        "Infeasible" => SolverStatus::Infeasible,
        "Unbounded" => SolverStatus::Unbounded,
        "Time limit reached" => SolverStatus::ReachedTimeLimit,
        _ => SolverStatus::Unknown,
    }
}
