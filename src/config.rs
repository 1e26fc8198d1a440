//! Build configuration.
//!
//! Settings come from two sources, merged by clap in one pass: command-line
//! flags and environment variables. A flag wins over its environment
//! variable, which wins over the default.
//!
//! | Flag | Environment | Default |
//! |------|-------------|---------|
//! | `--content-dir` | `CONTENT_DIR` | `content` |
//! | `--dist-dir` | `DIST_DIR` | `dist` |
//! | `--build-env` | `BUILD_ENV` | `production` |
//! | `--release-version` | `VERSION` | (see [`build_info`](crate::build_info)) |
//! | `--site-url` | `SITE_URL` | (relative URLs) |
//! | `--clean` | | off |
//! | `--verbose`, `-v` | | off |
//! | `--markdown` | | off |
//! | `--optimize-images` | | off |
//!
//! There is no validation beyond what clap does for types: an unknown
//! `BUILD_ENV` value is carried through verbatim.

use clap::Parser;
use std::path::PathBuf;

pub const DEVELOPMENT: &str = "development";
pub const PRODUCTION: &str = "production";

/// Command-line surface of the build.
#[derive(Parser, Debug, Clone)]
#[command(name = "site-builder")]
#[command(about = "Copy a content directory into a publishable site")]
#[command(long_about = "\
Copy a content directory into a publishable site

The content directory is copied into the output directory as-is, then a
sitemap.xml listing every HTML page and a build-info.json describing the
build are written next to it.

  content/                     dist/
  ├── index.html        →      ├── index.html
  ├── about.html               ├── about.html
  └── assets/                  ├── assets/
      └── logo.png             │   └── logo.png
                               ├── sitemap.xml
                               └── build-info.json")]
#[command(version)]
pub struct BuildArgs {
    /// Remove the output directory before building
    #[arg(long)]
    pub clean: bool,

    /// Log debug detail and full error chains
    #[arg(short, long)]
    pub verbose: bool,

    /// Content directory
    #[arg(long, env = "CONTENT_DIR", default_value = "content")]
    pub content_dir: PathBuf,

    /// Output directory
    #[arg(long, env = "DIST_DIR", default_value = "dist")]
    pub dist_dir: PathBuf,

    /// Build environment name (development or production)
    #[arg(long, env = "BUILD_ENV", default_value = PRODUCTION)]
    pub build_env: String,

    /// Version recorded in build-info.json when no VERSION file exists
    #[arg(long, env = "VERSION")]
    pub release_version: Option<String>,

    /// Absolute site URL prefixed to sitemap locations
    #[arg(long, env = "SITE_URL")]
    pub site_url: Option<String>,

    /// Render Markdown files in the output to HTML pages
    #[arg(long)]
    pub markdown: bool,

    /// Re-encode JPEG and PNG files in the output when it makes them smaller
    #[arg(long)]
    pub optimize_images: bool,
}

impl BuildArgs {
    pub fn into_config(self) -> BuildConfig {
        BuildConfig {
            content_dir: self.content_dir,
            dist_dir: self.dist_dir,
            clean: self.clean,
            verbose: self.verbose,
            build_env: self.build_env,
            project_dir: PathBuf::from("."),
            release_version: self.release_version.filter(|v| !v.trim().is_empty()),
            site_url: self.site_url.filter(|u| !u.trim().is_empty()),
            stages: Stages {
                markdown: self.markdown,
                optimize_images: self.optimize_images,
            },
        }
    }
}

/// Opt-in post-processing stages. Neither runs unless asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stages {
    pub markdown: bool,
    pub optimize_images: bool,
}

/// Resolved settings for one build invocation.
///
/// Created once from [`BuildArgs`] and only borrowed afterwards.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub content_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub clean: bool,
    pub verbose: bool,
    pub build_env: String,
    /// Working directory: the `VERSION` file and the revision lookup live here.
    pub project_dir: PathBuf,
    pub release_version: Option<String>,
    pub site_url: Option<String>,
    pub stages: Stages,
}

impl BuildConfig {
    /// Defaults for everything except the two directories.
    pub fn new(content_dir: impl Into<PathBuf>, dist_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            dist_dir: dist_dir.into(),
            clean: false,
            verbose: false,
            build_env: PRODUCTION.to_string(),
            project_dir: PathBuf::from("."),
            release_version: None,
            site_url: None,
            stages: Stages::default(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.build_env == DEVELOPMENT
    }
}
