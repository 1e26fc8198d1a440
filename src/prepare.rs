//! Output directory preparation.
//!
//! Runs before anything is written. A missing content directory is reported
//! before the output directory is touched, so a bad `CONTENT_DIR` leaves the
//! filesystem exactly as it was.
//!
//! The same goes for an output directory that would destroy the content:
//! one that resolves to the content directory itself, or, with `--clean`,
//! one that contains it.

use crate::config::BuildConfig;
use crate::error::{BuildError, IoContext};
use std::fs;
use tracing::{debug, info};

pub fn prepare_output(config: &BuildConfig) -> Result<(), BuildError> {
    if !config.content_dir.is_dir() {
        return Err(BuildError::ContentDirMissing(config.content_dir.clone()));
    }
    check_overlap(config)?;

    let dist = &config.dist_dir;
    if config.clean && dist.exists() {
        info!("Cleaning {}", dist.display());
        fs::remove_dir_all(dist).at(dist)?;
    }

    fs::create_dir_all(dist).at(dist)?;
    debug!("Output directory ready: {}", dist.display());
    Ok(())
}

/// Compares canonical paths, so `site` and `./site/../site` are the same.
/// An output directory that does not exist yet cannot overlap anything.
fn check_overlap(config: &BuildConfig) -> Result<(), BuildError> {
    let content = fs::canonicalize(&config.content_dir).at(&config.content_dir)?;
    let Ok(dist) = fs::canonicalize(&config.dist_dir) else {
        return Ok(());
    };

    if dist == content || (config.clean && content.starts_with(&dist)) {
        return Err(BuildError::OverlappingDirs {
            content: config.content_dir.clone(),
            dist: config.dist_dir.clone(),
        });
    }
    Ok(())
}
