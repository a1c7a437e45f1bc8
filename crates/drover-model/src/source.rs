//! Model-source collaborator trait and a file-backed implementation.

use crate::{ModelError, SymbolKind, SymbolTable};
use std::fs;
use std::path::{Path, PathBuf};

/// An externally-owned modeling object.
///
/// The harness asks it to serialize the model to the path the solver will
/// read, and takes ownership of the symbol table the solver's output is
/// keyed by. Decoded values flow back through that table.
pub trait ModelSource {
    /// Write the model to `path` and return this model's symbol table.
    ///
    /// Implementations that carry a current value assignment (for warm
    /// starts) should populate `SymbolEntry::value` on decision entries.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the symbol set is
    /// inconsistent.
    fn write_model(&self, path: &Path) -> Result<SymbolTable, ModelError>;
}

/// A model that already exists on disk, with explicitly declared symbols.
///
/// Useful when the model file was produced by another tool and only the
/// solve needs driving. The declared decision symbols must match the
/// column names inside the file; names the solver emits that are not
/// declared here are ignored during decoding.
#[derive(Debug, Clone)]
pub struct FileModel {
    path: PathBuf,
    decisions: Vec<String>,
    auxiliaries: Vec<String>,
}

impl FileModel {
    /// Reference a pre-written model file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileModel {
            path: path.into(),
            decisions: Vec::new(),
            auxiliaries: Vec::new(),
        }
    }

    /// Declare a decision-variable symbol.
    pub fn decision(mut self, name: impl Into<String>) -> Self {
        self.decisions.push(name.into());
        self
    }

    /// Declare an auxiliary (non-decision) symbol.
    pub fn auxiliary(mut self, name: impl Into<String>) -> Self {
        self.auxiliaries.push(name.into());
        self
    }

    /// Path of the underlying model file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for FileModel {
    fn write_model(&self, path: &Path) -> Result<SymbolTable, ModelError> {
        if path != self.path {
            fs::copy(&self.path, path)?;
        }
        let mut table = SymbolTable::new();
        for name in &self.decisions {
            table.insert(name.clone(), SymbolKind::Decision)?;
        }
        for name in &self.auxiliaries {
            table.insert(name.clone(), SymbolKind::Auxiliary)?;
        }
        Ok(table)
    }
}
