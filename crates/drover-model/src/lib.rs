//! Model-side collaborators for the Drover solver harness.
//!
//! The harness never builds optimization models itself. It consumes an
//! externally-owned modeling object through two narrow surfaces:
//!
//! - [`ModelSource`]: serializes the model to the file format the solver
//!   executable reads, and hands back the [`SymbolTable`] keying the
//!   solver's output.
//! - [`SymbolTable`]: maps solver-emitted identifiers onto model entities
//!   and carries the current value assignment of every decision variable.

mod error;
mod source;
mod symbol;

pub use error::ModelError;
pub use source::{FileModel, ModelSource};
pub use symbol::{SymbolEntry, SymbolKind, SymbolTable};
