//! Race-free reservation of unique file paths.
//!
//! Reservation relies on the filesystem's exclusive create (`O_CREAT | O_EXCL`
//! on Unix, `CREATE_NEW` on Windows) rather than an in-process lock, so two
//! callers never receive the same path, whether they live in this process or
//! in another process sharing the directory.

use crate::config::PathsConfig;
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Result of an exclusive create attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The path did not exist and now belongs to the caller.
    Created,
    /// The path already existed.
    Collision,
}

/// Atomically create `path` if it does not exist.
///
/// Collisions are reported as [`CreateOutcome::Collision`]; every other
/// failure is an error.
pub fn create_exclusive(path: &Path) -> io::Result<CreateOutcome> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(CreateOutcome::Created),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(CreateOutcome::Collision),
        Err(e) => Err(e),
    }
}

/// Reserve the first candidate path produced by `render` that does not exist.
///
/// Candidates are rendered for indices `0, 1, 2, ...` and created exclusively;
/// the returned path exists as an empty file owned by the caller. `render`
/// must be deterministic and injective, and must explore a growing namespace:
/// a function that keeps returning existing paths loops forever.
///
/// Any failure other than a collision is returned immediately, without
/// trying further candidates.
///
/// # Examples
///
/// ```no_run
/// use forkguard::paths::unique_path;
/// use std::path::Path;
///
/// let dir = Path::new("/tmp");
/// let path = unique_path(|i| dir.join(format!("file_{i}.txt")))?;
/// # Ok::<(), forkguard::Error>(())
/// ```
pub fn unique_path<F>(render: F) -> Result<PathBuf>
where
    F: Fn(u64) -> PathBuf,
{
    let mut index: u64 = 0;
    loop {
        let candidate = render(index);
        match create_exclusive(&candidate) {
            Ok(CreateOutcome::Created) => {
                debug!("Reserved {}", candidate.display());
                return Ok(candidate);
            }
            Ok(CreateOutcome::Collision) => {
                trace!("{} exists, trying next index", candidate.display());
                index += 1;
            }
            Err(source) => {
                return Err(Error::PathReserve {
                    path: candidate,
                    source,
                });
            }
        }
    }
}

/// Reserve `dir/{prefix}_{index}{extension}` for the lowest free index.
pub fn unique_path_in(dir: &Path, prefix: &str, extension: &str) -> Result<PathBuf> {
    unique_path(|i| dir.join(format!("{prefix}_{i}{extension}")))
}

/// Reusable allocator bound to a directory and naming scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniquePathAllocator {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl UniquePathAllocator {
    /// Allocator reserving `dir/{prefix}_{index}{extension}`.
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Allocator for the configured runtime directory and naming scheme.
    pub fn from_config(config: &PathsConfig) -> Self {
        Self::new(config.runtime_dir(), &config.prefix, &config.extension)
    }

    /// Directory paths are reserved in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve the next free path.
    pub fn allocate(&self) -> Result<PathBuf> {
        unique_path_in(&self.dir, &self.prefix, &self.extension)
    }
}
