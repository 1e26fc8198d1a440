//! The single error type shared by every build step.
//!
//! Every variant is fatal: the orchestrator stops at the first one and the
//! binary exits with status 1. Degraded capabilities (no `git`, a stage
//! compiled out, an image that will not decode) are never errors; the step
//! that hits them logs a warning and carries on.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Content directory '{}' not found", .0.display())]
    ContentDirMissing(PathBuf),
    #[error(
        "Output directory '{}' would overwrite content directory '{}'",
        dist.display(),
        content.display()
    )]
    OverlappingDirs { content: PathBuf, dist: PathBuf },
    #[error("Refusing to copy {} onto itself", .0.display())]
    SameFile(PathBuf),
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Configuration errors are detected before anything is written.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ContentDirMissing(_) | Self::OverlappingDirs { .. }
        )
    }
}

/// Attach a path to a bare `io::Result`.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T, BuildError>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: impl AsRef<Path>) -> Result<T, BuildError> {
        self.map_err(|e| BuildError::io(path, e))
    }
}
