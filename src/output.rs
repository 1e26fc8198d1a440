//! Log output for the end of a build.
//!
//! Format functions are pure (they return lines) so they can be tested
//! without a subscriber; [`log_report`] and [`log_failure`] emit them.

use crate::error::BuildError;
use crate::pipeline::BuildReport;
use std::error::Error as _;
use tracing::{error, info};

pub fn format_report(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Copied {} file(s) and {} directory(ies)",
        report.copied.files, report.copied.dirs
    )];

    if let Some(md) = &report.markdown {
        lines.push(format!(
            "Markdown: {} rendered, {} skipped",
            md.rendered, md.skipped
        ));
    }
    if let Some(img) = &report.images {
        lines.push(format!(
            "Images: {} optimized, {} unchanged, {} failed ({} bytes saved)",
            img.optimized, img.unchanged, img.failed, img.bytes_saved
        ));
    }

    lines.push(format!("Sitemap: {} URL(s)", report.sitemap_urls));
    lines.push(format!(
        "Build completed successfully in {:.2}s",
        report.elapsed.as_secs_f64()
    ));
    lines
}

/// One line for the error, plus its cause chain and debug form when verbose.
///
/// Configuration errors are fully described by their message.
pub fn format_failure(err: &BuildError, verbose: bool) -> Vec<String> {
    let mut lines = vec![format!("Build failed: {err}")];
    if verbose && !err.is_configuration() {
        let mut source = err.source();
        while let Some(cause) = source {
            lines.push(format!("  caused by: {cause}"));
            source = cause.source();
        }
        lines.push(format!("  detail: {err:?}"));
    }
    lines
}

pub fn log_report(report: &BuildReport) {
    for line in format_report(report) {
        info!("{line}");
    }
}

pub fn log_failure(err: &BuildError, verbose: bool) {
    for line in format_failure(err, verbose) {
        error!("{line}");
    }
}
