//! Scratch files and naming for a single solve.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static NEXT_SOLVE: AtomicU64 = AtomicU64::new(0);

/// Collision-free token naming the files of one solve: process id plus a
/// per-process counter. Survives rapid successive calls where a timestamp
/// suffix would not, and keeps concurrent driver instances in the same
/// directory from clashing.
pub(crate) fn solve_token() -> String {
    let seq = NEXT_SOLVE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", std::process::id(), seq)
}

/// One file slot: its path and whether the driver owns (and deletes) it.
#[derive(Debug, Clone)]
pub struct ScratchFile {
    path: PathBuf,
    temporary: bool,
}

impl ScratchFile {
    fn temporary(path: PathBuf) -> Self {
        ScratchFile {
            path,
            temporary: true,
        }
    }

    fn external(path: PathBuf) -> Self {
        ScratchFile {
            path,
            temporary: false,
        }
    }

    /// Path of this file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the driver deletes this file during cleanup.
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    fn remove(&self) {
        if !self.temporary {
            return;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                component = "files",
                operation = "remove",
                status = "warn",
                path = %self.path.display(),
                error = %err,
                "Failed to remove scratch file"
            ),
        }
    }
}

/// Caller-supplied path overrides. An overridden file is written where the
/// caller asked and is never deleted by the driver.
#[derive(Debug, Clone, Default)]
pub struct FileOverrides {
    /// Where to write the model file.
    pub model: Option<PathBuf>,
    /// Where the solver should write the solution file.
    pub solution: Option<PathBuf>,
    /// Where the solver should write its log.
    pub log: Option<PathBuf>,
}

/// The full file set for one solve.
#[derive(Debug, Clone)]
pub struct SolveFiles {
    /// Model file handed to the solver as its trailing positional argument.
    pub model: ScratchFile,
    /// Solution file the solver writes and the watcher polls.
    pub solution: ScratchFile,
    /// Warm-start input file (written only when warm starts are enabled).
    pub warmstart: ScratchFile,
    /// Options file with one `key = value` line per option.
    pub options: ScratchFile,
    /// Solver log file. Never deleted by [`SolveFiles::cleanup`]; use
    /// [`SolveFiles::remove_log`] to opt in.
    pub log: ScratchFile,
    root: PathBuf,
}

impl SolveFiles {
    /// Lay out the file set under `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch directory cannot be created.
    pub fn new(root: &Path, token: &str, overrides: &FileOverrides) -> io::Result<Self> {
        fs::create_dir_all(root)?;

        let model = match &overrides.model {
            Some(path) => ScratchFile::external(path.clone()),
            None => ScratchFile::temporary(root.join(format!("model-{token}.mps"))),
        };
        let solution = match &overrides.solution {
            Some(path) => ScratchFile::external(path.clone()),
            None => ScratchFile::temporary(root.join(format!("solution-{token}.sol"))),
        };
        let warmstart = ScratchFile::temporary(root.join(format!("warmstart-{token}.sol")));
        let options = ScratchFile::temporary(root.join(format!("options-{token}.txt")));
        let log = match &overrides.log {
            Some(path) => ScratchFile::external(path.clone()),
            None => ScratchFile::external(PathBuf::from("HiGHS.log")),
        };

        Ok(SolveFiles {
            model,
            solution,
            warmstart,
            options,
            log,
            root: root.to_path_buf(),
        })
    }

    /// Delete every temporary file, then the scratch directory if it is
    /// now empty. Externally-owned files are left alone.
    pub fn cleanup(&self) {
        self.model.remove();
        self.solution.remove();
        self.warmstart.remove();
        self.options.remove();
        self.remove_root_if_empty();
        debug!(
            component = "files",
            operation = "cleanup",
            status = "success",
            root = %self.root.display(),
            "Removed scratch files"
        );
    }

    /// Delete the solver log file, wherever it was written.
    pub fn remove_log(&self) {
        match fs::remove_file(self.log.path()) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(
                component = "files",
                operation = "remove_log",
                status = "warn",
                path = %self.log.path().display(),
                error = %err,
                "Failed to remove log file"
            ),
        }
    }

    fn remove_root_if_empty(&self) {
        let empty = match fs::read_dir(&self.root) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => return,
        };
        if empty {
            let _ = fs::remove_dir(&self.root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_root(name: &str) -> PathBuf {
        env::temp_dir().join(format!("drover-files-{}-{}", std::process::id(), name))
    }

    #[test]
    fn tokens_are_unique() {
        let a = solve_token();
        let b = solve_token();
        assert_ne!(a, b);
        assert!(a.starts_with(&format!("{}-", std::process::id())));
    }

    #[test]
    fn default_layout_uses_token_names() {
        let root = scratch_root("layout");
        let files = SolveFiles::new(&root, "7-0", &FileOverrides::default()).unwrap();

        assert_eq!(files.model.path(), root.join("model-7-0.mps"));
        assert_eq!(files.solution.path(), root.join("solution-7-0.sol"));
        assert_eq!(files.warmstart.path(), root.join("warmstart-7-0.sol"));
        assert_eq!(files.options.path(), root.join("options-7-0.txt"));
        assert_eq!(files.log.path(), Path::new("HiGHS.log"));
        assert!(files.model.is_temporary());
        assert!(!files.log.is_temporary());

        files.cleanup();
        assert!(!root.exists());
    }

    #[test]
    fn cleanup_removes_written_files_and_empty_root() {
        let root = scratch_root("cleanup");
        let files = SolveFiles::new(&root, "7-1", &FileOverrides::default()).unwrap();
        fs::write(files.model.path(), "model").unwrap();
        fs::write(files.solution.path(), "solution").unwrap();

        files.cleanup();
        assert!(!files.model.path().exists());
        assert!(!files.solution.path().exists());
        assert!(!root.exists());
    }

    #[test]
    fn overridden_files_survive_cleanup() {
        let root = scratch_root("overrides");
        let kept = scratch_root("kept.sol");
        let overrides = FileOverrides {
            solution: Some(kept.clone()),
            ..FileOverrides::default()
        };
        let files = SolveFiles::new(&root, "7-2", &overrides).unwrap();
        fs::write(files.solution.path(), "solution").unwrap();

        files.cleanup();
        assert!(kept.exists());
        fs::remove_file(&kept).ok();
    }

    #[test]
    fn cleanup_keeps_root_with_foreign_files() {
        let root = scratch_root("foreign");
        let files = SolveFiles::new(&root, "7-3", &FileOverrides::default()).unwrap();
        let foreign = root.join("unrelated.txt");
        fs::write(&foreign, "keep me").unwrap();

        files.cleanup();
        assert!(foreign.exists());

        fs::remove_file(&foreign).ok();
        fs::remove_dir(&root).ok();
    }
}
