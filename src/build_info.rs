//! `build-info.json` emission.
//!
//! A flat record describing one build:
//!
//! ```json
//! {
//!   "build_time": "2026-10-15T09:30:00Z",
//!   "build_env": "production",
//!   "git_commit": "a1b2c3d",
//!   "version": "1.4.0"
//! }
//! ```
//!
//! `git_commit` is `null` when there is no `git`, no repository, or the
//! lookup fails for any other reason. The version comes from the first of:
//! a `VERSION` file in the project directory, the `VERSION` environment
//! variable, then [`DEFAULT_VERSION`].

use crate::capabilities::Capability;
use crate::config::BuildConfig;
use crate::error::{BuildError, IoContext};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

pub const BUILD_INFO_FILENAME: &str = "build-info.json";
pub const VERSION_FILENAME: &str = "VERSION";
pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub build_time: String,
    pub build_env: String,
    pub git_commit: Option<String>,
    pub version: String,
}

impl BuildInfo {
    pub fn collect(config: &BuildConfig, revision_control: &Capability, now: DateTime<Utc>) -> Self {
        Self {
            build_time: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            build_env: config.build_env.clone(),
            git_commit: short_revision(&config.project_dir, revision_control),
            version: resolve_version(&config.project_dir, config.release_version.as_deref()),
        }
    }
}

/// Short hash of `HEAD`, or `None` if it can't be determined.
pub fn short_revision(project_dir: &Path, revision_control: &Capability) -> Option<String> {
    if let Capability::Unavailable { reason } = revision_control {
        debug!("Skipping revision lookup: git {reason}");
        return None;
    }

    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(project_dir)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()
        .filter(|o| o.status.success())?;

    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

pub fn resolve_version(project_dir: &Path, env_version: Option<&str>) -> String {
    let from_file = fs::read_to_string(project_dir.join(VERSION_FILENAME))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    from_file
        .or_else(|| env_version.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_VERSION.to_string())
}

pub fn write_build_info(dist_dir: &Path, info: &BuildInfo) -> Result<(), BuildError> {
    let path = dist_dir.join(BUILD_INFO_FILENAME);
    let json = serde_json::to_string_pretty(info)?;
    fs::write(&path, json).at(&path)?;
    info!(
        "Generated {} (version {}, commit {})",
        BUILD_INFO_FILENAME,
        info.version,
        info.git_commit.as_deref().unwrap_or("unknown")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn version_file_wins() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(VERSION_FILENAME), "2.3.4\n").unwrap();
        assert_eq!(resolve_version(tmp.path(), Some("9.9.9")), "2.3.4");
    }

    #[test]
    fn env_version_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve_version(tmp.path(), Some("9.9.9")), "9.9.9");
    }

    #[test]
    fn blank_version_file_falls_through() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(VERSION_FILENAME), "  \n").unwrap();
        assert_eq!(resolve_version(tmp.path(), None), DEFAULT_VERSION);
    }

    #[test]
    fn default_version() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve_version(tmp.path(), None), "1.0.0");
    }

    #[test]
    fn unavailable_git_means_no_commit() {
        let tmp = TempDir::new().unwrap();
        let cap = Capability::unavailable("not installed");
        assert_eq!(short_revision(tmp.path(), &cap), None);
    }

    /// Runs git in `dir`, returning trimmed stdout on success.
    fn git(dir: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("GIT_CEILING_DIRECTORIES", dir.parent().unwrap_or(dir))
            .output()
            .ok()
            .filter(|o| o.status.success())?;
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    #[test]
    fn short_revision_of_checkout() {
        let tmp = TempDir::new().unwrap();
        if git(tmp.path(), &["--version"]).is_none() {
            eprintln!("git not installed; skipping");
            return;
        }
        git(tmp.path(), &["init", "-q"]).unwrap();
        git(
            tmp.path(),
            &[
                "-c",
                "user.name=Site Builder",
                "-c",
                "user.email=builder@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "--allow-empty",
                "-m",
                "init",
            ],
        )
        .unwrap();
        let expected = git(tmp.path(), &["rev-parse", "--short", "HEAD"]).unwrap();

        let revision = short_revision(tmp.path(), &Capability::Available).unwrap();

        assert!(!revision.is_empty());
        assert!(revision.chars().all(|c| c.is_ascii_hexdigit()), "{revision}");
        assert_eq!(revision, expected);
    }

    #[test]
    fn collect_fills_record() {
        let tmp = TempDir::new().unwrap();
        let mut config = BuildConfig::new("content", "dist");
        config.project_dir = tmp.path().to_path_buf();
        config.build_env = "development".to_string();
        config.release_version = Some("3.0.0".to_string());

        let info = BuildInfo::collect(&config, &Capability::unavailable("off"), fixed_now());

        assert_eq!(
            info,
            BuildInfo {
                build_time: "2026-10-15T09:30:00Z".to_string(),
                build_env: "development".to_string(),
                git_commit: None,
                version: "3.0.0".to_string(),
            }
        );
    }

    #[test]
    fn written_json_has_null_commit() {
        let tmp = TempDir::new().unwrap();
        let info = BuildInfo {
            build_time: "2026-10-15T09:30:00Z".to_string(),
            build_env: "production".to_string(),
            git_commit: None,
            version: DEFAULT_VERSION.to_string(),
        };

        write_build_info(tmp.path(), &info).unwrap();

        let raw = fs::read_to_string(tmp.path().join(BUILD_INFO_FILENAME)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        assert!(obj["git_commit"].is_null());
        assert_eq!(obj["build_env"], "production");
        assert_eq!(obj["build_time"], "2026-10-15T09:30:00Z");
        assert_eq!(obj["version"], "1.0.0");
    }
}
