//! Build orchestration.
//!
//! The build is a straight line:
//!
//! ```text
//! prepare → copy → [markdown] → [images] → sitemap → build-info → done
//! ```
//!
//! The bracketed stages only run when asked for. The first error stops the
//! build; whatever was written to the output directory up to that point is
//! left there.

use crate::build_info::{self, BuildInfo};
use crate::capabilities::Capabilities;
use crate::config::BuildConfig;
use crate::copy::{self, CopyStats};
use crate::error::BuildError;
use crate::imaging::{self, ImageStats};
use crate::markdown::{self, MarkdownStats};
use crate::prepare;
use crate::sitemap;
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::info;

/// Everything a successful build produced, for reporting.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub copied: CopyStats,
    pub markdown: Option<MarkdownStats>,
    pub images: Option<ImageStats>,
    pub sitemap_urls: usize,
    pub build_info: BuildInfo,
    pub elapsed: Duration,
}

pub fn run(config: &BuildConfig, caps: &Capabilities) -> Result<BuildReport, BuildError> {
    let started = Instant::now();
    let now = Utc::now();
    info!("Building static site ({})", config.build_env);

    prepare::prepare_output(config)?;

    let copied = copy::copy_content(&config.content_dir, &config.dist_dir)?;

    let markdown = config
        .stages
        .markdown
        .then(|| markdown::render_markdown(&config.dist_dir, &caps.markdown))
        .transpose()?;

    let images = config
        .stages
        .optimize_images
        .then(|| imaging::optimize_images(&config.dist_dir, &caps.imaging))
        .transpose()?;

    let sitemap_urls =
        sitemap::write_sitemap(&config.dist_dir, config.site_url.as_deref(), now.date_naive())?;

    let build_info = BuildInfo::collect(config, &caps.revision_control, now);
    build_info::write_build_info(&config.dist_dir, &build_info)?;

    Ok(BuildReport {
        copied,
        markdown,
        images,
        sitemap_urls,
        build_info,
        elapsed: started.elapsed(),
    })
}
