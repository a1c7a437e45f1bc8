//! Options-file serialization.

use drover_solver::SolverConfig;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Solver options rendered as one `key = value` line each.
///
/// Insertion order is preserved; setting an existing key updates it in
/// place without reordering.
#[derive(Debug, Clone, Default)]
pub struct HighsOptions {
    entries: Vec<(String, String)>,
}

impl HighsOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up an option value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Fold configuration fields into option entries.
    ///
    /// `time_limit` is excluded: it travels on the command line, not in
    /// the options file.
    pub fn apply_config(&mut self, config: &SolverConfig) {
        if let Some(gap) = config.mip_gap {
            self.set("mip_rel_gap", gap);
        }
        if let Some(threads) = config.threads {
            self.set("threads", threads);
        }
        if let Some(presolve) = config.presolve {
            self.set("presolve", if presolve { "on" } else { "off" });
        }
        if let Some(tolerance) = config.tolerance {
            self.set("primal_feasibility_tolerance", tolerance);
            self.set("dual_feasibility_tolerance", tolerance);
        }
        if let Some(enabled) = config.log_to_console {
            self.set("log_to_console", enabled);
        }
    }

    /// Write the options file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for (key, value) in self.iter() {
            writeln!(out, "{} = {}", key, value)?;
        }
        out.flush()
    }
}
