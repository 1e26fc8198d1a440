//! Shared test utilities: build content trees on disk and compare them.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let content = write_tree(tmp.path(), "content", &[
//!     ("index.html", "<h1>home</h1>"),
//!     ("assets/logo.png", "png"),
//! ]);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Create `root/name` and populate it. Parent directories are created as
/// needed; an empty slice yields an empty directory.
pub fn write_tree(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (rel, contents) in files {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
    }
    dir
}

/// Relative, `/`-separated paths of every file under `dir`, sorted.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// Every file under `src` exists under `dst` with identical bytes.
///
/// `dst` may contain extra files; only `src` is checked against it.
pub fn assert_same_tree(src: &Path, dst: &Path) {
    for rel in list_files(src) {
        let expected = fs::read(src.join(&rel)).unwrap();
        let actual = fs::read(dst.join(&rel))
            .unwrap_or_else(|e| panic!("'{rel}' missing from {}: {e}", dst.display()));
        assert_eq!(actual, expected, "contents differ for '{rel}'");
    }
}
