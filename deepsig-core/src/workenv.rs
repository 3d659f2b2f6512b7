//! Scratch workspace for staged output files.
//!
//! Outputs are written inside a private temporary directory and only moved
//! to their destinations by [`ScratchWorkspace::commit`]. A workspace that is
//! dropped without a successful commit, whether by an early `?` return or
//! a panic, is left on disk with its partial files and its path is logged.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::{constants::WORKSPACE_PREFIX, types::DeepSigError};

#[derive(Debug)]
struct StagedFile {
    staged: PathBuf,
    destination: PathBuf,
}

/// Temporary directory removed on success and preserved on failure
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: Option<TempDir>,
    path: PathBuf,
    staged: Vec<StagedFile>,
}

impl ScratchWorkspace {
    /// Creates a workspace in the system temporary directory
    pub fn new() -> Result<Self, DeepSigError> {
        Self::from_dir(tempfile::Builder::new().prefix(WORKSPACE_PREFIX).tempdir()?)
    }

    /// Creates a workspace inside `parent`, usually the output directory so
    /// that committing is a rename on the same filesystem.
    pub fn new_in<P: AsRef<Path>>(parent: P) -> Result<Self, DeepSigError> {
        Self::from_dir(
            tempfile::Builder::new()
                .prefix(WORKSPACE_PREFIX)
                .tempdir_in(parent)?,
        )
    }

    fn from_dir(dir: TempDir) -> Result<Self, DeepSigError> {
        let path = dir.path().to_path_buf();
        debug!("Created scratch workspace {}", path.display());
        Ok(Self {
            dir: Some(dir),
            path,
            staged: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reserves a file in the workspace that [`commit`](Self::commit) will
    /// move to `destination`. Write the output to the returned path.
    pub fn stage<P: Into<PathBuf>>(&mut self, destination: P) -> PathBuf {
        let destination = destination.into();
        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let staged = self.path.join(format!("{}-{}", self.staged.len(), name));
        self.staged.push(StagedFile {
            staged: staged.clone(),
            destination,
        });
        staged
    }

    /// Moves every staged file to its destination, then deletes the
    /// workspace.
    ///
    /// All staged files and destination directories are checked before the
    /// first move. If a move still fails, files already moved are put back
    /// into the workspace, so either every output lands or none does.
    ///
    /// # Errors
    ///
    /// Returns [`DeepSigError::IoError`] if a staged file is missing, a
    /// destination directory does not exist, or a move fails; the workspace
    /// is then kept.
    pub fn commit(mut self) -> Result<(), DeepSigError> {
        for file in &self.staged {
            file.check()?;
        }

        for (index, file) in self.staged.iter().enumerate() {
            if let Err(e) = move_file(&file.staged, &file.destination) {
                for moved in self.staged[..index].iter().rev() {
                    if let Err(undo) = move_file(&moved.destination, &moved.staged) {
                        warn!(
                            "Could not move {} back into the workspace: {}",
                            moved.destination.display(),
                            undo
                        );
                    }
                }
                return Err(e.into());
            }
            debug!("Wrote {}", file.destination.display());
        }

        if let Some(dir) = self.dir.take() {
            dir.close()?;
        }
        Ok(())
    }
}

impl StagedFile {
    /// Staged file written and destination directory present
    fn check(&self) -> io::Result<()> {
        if !self.staged.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("staged output {} was never written", self.staged.display()),
            ));
        }
        let parent = match self.destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("output directory {} does not exist", parent.display()),
            ));
        }
        Ok(())
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let kept = dir.keep();
            warn!("Run did not complete; scratch workspace kept at {}", kept.display());
        }
    }
}

/// Renames `from` to `to`, copying when they sit on different filesystems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) if from.is_file() => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}
