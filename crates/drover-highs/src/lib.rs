//! File-interface driver for the HiGHS executable.
//!
//! The solver process communicates only through files on disk: it reads a
//! model file and an options file, and writes a solution file. It gives no
//! other done-signal, so this crate watches the solution file until its
//! content shape says the writer finished, then decodes the file's
//! line-oriented grammar into a [`Solution`], normalizes the decoded
//! values, and writes them back onto the caller's symbol table. Prior
//! results can be re-encoded as a warm-start input for the next run.

mod decode;
mod error;
mod files;
mod launch;
mod numeric;
mod options;
mod solution;
mod solver;
mod status;
mod warmstart;
mod watch;

pub use decode::{decode_solution, RawSolution};
pub use error::DriveError;
pub use files::{FileOverrides, ScratchFile, SolveFiles};
pub use launch::{SolverCommand, SolverProcess};
pub use numeric::normalize;
pub use options::HighsOptions;
pub use solution::Solution;
pub use solver::{Solver, DEFAULT_EXECUTABLE};
pub use warmstart::encode_warmstart;
pub use watch::{CancelToken, SolutionWatcher, WaitStats, COMPLETION_MARKER};
