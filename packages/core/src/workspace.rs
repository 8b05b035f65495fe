//! Output directories for generation runs.
//!
//! The server gives every request its own [`RunWorkspace`] so concurrent
//! runs never clear or read each other's documents. The CLI works against
//! a fixed directory and uses [`clear_output_dir`] before rendering.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// Result of clearing an output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The directory existed and was removed.
    Removed,
    /// Nothing to remove.
    AlreadyAbsent,
}

/// Remove `path` and everything below it.
///
/// A missing directory is not an error; permission problems and other IO
/// failures are.
pub fn clear_output_dir(path: &Path) -> Result<ClearOutcome> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "cleared output directory");
            Ok(ClearOutcome::Removed)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(ClearOutcome::AlreadyAbsent),
        Err(e) => Err(e.into()),
    }
}

/// Isolated output directory for one run, removed on drop.
#[derive(Debug)]
pub struct RunWorkspace {
    dir: TempDir,
}

impl RunWorkspace {
    /// Create a fresh directory below `root`, creating `root` if needed.
    pub fn create_in(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix("run-").tempdir_in(root)?;
        tracing::debug!(path = %dir.path().display(), "created run workspace");
        Ok(Self { dir })
    }

    /// Directory receiving the documents of this run.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now and report failures instead of ignoring
    /// them on drop.
    pub fn close(self) -> Result<()> {
        let path: PathBuf = self.dir.path().to_path_buf();
        self.dir.close()?;
        tracing::debug!(path = %path.display(), "removed run workspace");
        Ok(())
    }
}
