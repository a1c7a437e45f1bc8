//! Solution type and trait implementations.

use drover_solver::{SolutionView, SolverStatus};
use std::collections::BTreeMap;

/// Decoded, normalized result of one solve.
///
/// Built fresh per solve from the solution file; values are keyed by
/// solver symbol and already normalized.
#[derive(Debug, Clone)]
pub struct Solution {
    pub(crate) status: SolverStatus,
    pub(crate) status_label: String,
    pub(crate) objective: Option<f64>,
    pub(crate) values: BTreeMap<String, f64>,
    pub(crate) solve_time_seconds: f64,
    pub(crate) polls: u64,
}

impl Solution {
    /// Solver status.
    pub fn status(&self) -> SolverStatus {
        self.status
    }

    /// Verbatim status label from the solution file.
    pub fn status_label(&self) -> &str {
        &self.status_label
    }

    /// Objective value, absent when the solver's objective line did not
    /// parse.
    pub fn objective_value(&self) -> Option<f64> {
        self.objective
    }

    /// Normalized value decoded for a symbol.
    pub fn value(&self, symbol: &str) -> Option<f64> {
        self.values.get(symbol).copied()
    }

    /// All normalized values keyed by symbol.
    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    /// Wall time of the whole solve, spawn to decode.
    pub fn solve_time_seconds(&self) -> f64 {
        self.solve_time_seconds
    }

    /// Number of polls that found the solution file incomplete.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Check if the solution is optimal.
    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    /// Check if the solution is feasible (includes optimal).
    pub fn is_feasible(&self) -> bool {
        self.status.is_feasible()
    }

    /// Check if the solution is infeasible.
    pub fn is_infeasible(&self) -> bool {
        self.status.is_infeasible()
    }

    /// Check if the solution is unbounded.
    pub fn is_unbounded(&self) -> bool {
        self.status.is_unbounded()
    }
}

impl SolutionView for Solution {
    fn status(&self) -> SolverStatus {
        self.status
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective
    }

    fn value(&self, symbol: &str) -> Option<f64> {
        self.values.get(symbol).copied()
    }

    fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    fn solve_time_seconds(&self) -> f64 {
        self.solve_time_seconds
    }
}
