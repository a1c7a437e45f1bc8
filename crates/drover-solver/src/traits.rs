//! Solver traits for abstraction over different solver frontends.

use crate::{SolverConfig, SolverError, SolverStatus};
use drover_model::ModelSource;
use std::collections::BTreeMap;

/// Trait for accessing solution data from a solver.
///
/// Solutions are keyed by solver-emitted symbols rather than positional
/// indices; a frontend that works through the solver's file interface only
/// ever learns names, not column positions.
pub trait SolutionView {
    /// Get the solver status.
    fn status(&self) -> SolverStatus;

    /// Get the objective value, if the solver reported one.
    fn objective_value(&self) -> Option<f64>;

    /// Get the value decoded for a symbol.
    fn value(&self, symbol: &str) -> Option<f64>;

    /// Get all decoded values keyed by symbol.
    fn values(&self) -> &BTreeMap<String, f64>;

    /// Get the solve wall time in seconds.
    fn solve_time_seconds(&self) -> f64;

    /// Check if the solution is optimal.
    fn is_optimal(&self) -> bool {
        self.status().is_optimal()
    }

    /// Check if the solution is feasible.
    fn is_feasible(&self) -> bool {
        self.status().is_feasible()
    }

    /// Check if the solution is infeasible.
    fn is_infeasible(&self) -> bool {
        self.status().is_infeasible()
    }

    /// Check if the solution is unbounded.
    fn is_unbounded(&self) -> bool {
        self.status().is_unbounded()
    }
}

/// Trait for solver frontends.
///
/// A frontend owns everything about how the solve is carried out (process
/// handling, file plumbing, decoding); callers supply the model and a
/// configuration.
pub trait Solve {
    /// The solution type returned by this frontend.
    type Solution: SolutionView;

    /// Solve the model with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a `SolverError` if:
    /// - The solver finishes without a usable solution
    /// - The output never completes within the allowed wait
    /// - The frontend fails to drive the solver
    fn solve(
        &mut self,
        model: &dyn ModelSource,
        config: &SolverConfig,
    ) -> Result<Self::Solution, SolverError>;
}
