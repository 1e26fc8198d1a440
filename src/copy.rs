//! Content copying.
//!
//! The top level of the content directory is walked one entry at a time:
//! files are copied next to each other, directories are copied whole. This
//! is a structural copy; nothing is transformed.
//!
//! ## Merge policy
//!
//! Copying into an existing output directory is last-writer-wins. A file
//! already at the destination is overwritten; a directory already at the
//! destination is merged into, with colliding files inside it overwritten
//! and everything else left in place. Use `--clean` to drop stale output.
//!
//! ## Symlinks
//!
//! Links are followed: the output receives the target's contents, not a
//! link. A dangling link is skipped with a warning, at the top level and
//! inside copied directories alike.
//!
//! A file is never copied onto itself. Content and output resolving to the
//! same directory is rejected up front by [`prepare`](crate::prepare); the
//! per-file check here is the last line before `fs::copy` would truncate it.
//!
//! If the output directory lives inside the content directory it is skipped,
//! otherwise every build would copy its own previous output.

use crate::error::{BuildError, IoContext};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Number of files and directories written to the output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
}

impl CopyStats {
    fn add(&mut self, other: CopyStats) {
        self.files += other.files;
        self.dirs += other.dirs;
    }
}

pub fn copy_content(content_dir: &Path, dist_dir: &Path) -> Result<CopyStats, BuildError> {
    info!(
        "Copying content from {} to {}",
        content_dir.display(),
        dist_dir.display()
    );

    let output = fs::canonicalize(dist_dir).ok();
    let mut stats = CopyStats::default();

    for src in top_level_entries(content_dir)? {
        let Some(name) = src.file_name() else {
            continue;
        };
        if is_output(&src, output.as_deref()) {
            debug!("Skipping output directory {}", src.display());
            continue;
        }

        let meta = match fs::metadata(&src) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Skipping {}: dangling link", src.display());
                continue;
            }
            Err(e) => return Err(BuildError::io(&src, e)),
        };

        let dst = dist_dir.join(name);
        if meta.is_file() {
            copy_file(&src, &dst)?;
            stats.files += 1;
            info!("  Copied file: {}", name.to_string_lossy());
        } else if meta.is_dir() {
            stats.add(copy_tree(&src, &dst, output.as_deref())?);
            info!("  Copied directory: {}", name.to_string_lossy());
        } else {
            debug!("Skipping {}: not a file or directory", src.display());
        }
    }

    Ok(stats)
}

fn top_level_entries(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut entries = fs::read_dir(dir)
        .at(dir)?
        .map(|e| e.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .at(dir)?;
    entries.sort();
    Ok(entries)
}

/// Copy a directory and everything under it, merging into `dst`.
fn copy_tree(src: &Path, dst: &Path, output: Option<&Path>) -> Result<CopyStats, BuildError> {
    let mut stats = CopyStats::default();

    let walker = WalkDir::new(src)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && is_output(e.path(), output)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling_link(&e) => {
                if let Some(path) = e.path() {
                    warn!("Skipping {}: dangling link", path.display());
                }
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let Ok(rel) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).at(&target)?;
            stats.dirs += 1;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &target)?;
            stats.files += 1;
            debug!("    {}", target.display());
        }
    }

    Ok(stats)
}

/// Copy bytes and permissions, then carry the modification time over.
fn copy_file(src: &Path, dst: &Path) -> Result<(), BuildError> {
    if same_file(src, dst) {
        return Err(BuildError::SameFile(dst.to_path_buf()));
    }
    fs::copy(src, dst).at(dst)?;
    if let Err(e) = preserve_mtime(src, dst) {
        debug!("Could not preserve mtime on {}: {e}", dst.display());
    }
    Ok(())
}

fn same_file(src: &Path, dst: &Path) -> bool {
    match (fs::canonicalize(src), fs::canonicalize(dst)) {
        (Ok(src), Ok(dst)) => src == dst,
        _ => false,
    }
}

fn is_dangling_link(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
        && err.path().is_some_and(|p| p.is_symlink())
}

fn preserve_mtime(src: &Path, dst: &Path) -> io::Result<()> {
    let modified = fs::metadata(src)?.modified()?;
    fs::File::options()
        .write(true)
        .open(dst)?
        .set_modified(modified)
}

fn is_output(path: &Path, output: Option<&Path>) -> bool {
    match output {
        Some(output) => fs::canonicalize(path).is_ok_and(|p| p == output),
        None => false,
    }
}
