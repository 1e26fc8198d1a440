//! Sitemap generation.
//!
//! Every `.html` file under the output directory becomes one `<url>` entry
//! in `sitemap.xml` at the output root:
//!
//! ```text
//! dist/index.html          →  /
//! dist/about.html          →  /about.html
//! dist/blog/index.html     →  /blog/
//! dist/blog/first.html     →  /blog/first.html
//! ```
//!
//! `lastmod` is the date the build ran, not the file's modification time.
//! Entries are sorted by path so the same tree always yields the same
//! document. With a site URL configured, locations are absolute
//! (`https://example.com/about.html`); otherwise they are root-relative.

use crate::error::{BuildError, IoContext};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, info};
use walkdir::WalkDir;

pub const SITEMAP_FILENAME: &str = "sitemap.xml";
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const HTML_EXTENSION: &str = "html";
const INDEX_FILENAME: &str = "index.html";

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Leading-slash URL path, e.g. `/blog/`.
    pub path: String,
    pub lastmod: NaiveDate,
}

/// Walk `dist_dir` and return an entry per HTML file, sorted by path.
pub fn collect_entries(dist_dir: &Path, lastmod: NaiveDate) -> Result<Vec<SitemapEntry>, BuildError> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(dist_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_html(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dist_dir) else {
            continue;
        };
        entries.push(SitemapEntry {
            path: url_path(rel),
            lastmod,
        });
    }

    Ok(entries)
}

fn is_html(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == HTML_EXTENSION)
}

/// Map a path relative to the output root to its URL path.
///
/// `index.html` at any depth maps to its directory.
pub fn url_path(rel: &Path) -> String {
    let segments: Vec<String> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    match segments.split_last() {
        Some((last, dirs)) if last == INDEX_FILENAME => {
            if dirs.is_empty() {
                "/".to_string()
            } else {
                format!("/{}/", dirs.join("/"))
            }
        }
        _ => format!("/{}", segments.join("/")),
    }
}

/// Render the sitemap document.
pub fn render(entries: &[SitemapEntry], site_url: Option<&str>) -> String {
    let base = site_url.map(|u| u.trim_end_matches('/')).unwrap_or("");

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NAMESPACE}\">");
    for entry in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(
            xml,
            "    <loc>{}</loc>",
            escape_xml(&format!("{base}{}", entry.path))
        );
        let _ = writeln!(
            xml,
            "    <lastmod>{}</lastmod>",
            entry.lastmod.format("%Y-%m-%d")
        );
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Collect, render and write `sitemap.xml`. Returns the number of entries.
pub fn write_sitemap(
    dist_dir: &Path,
    site_url: Option<&str>,
    lastmod: NaiveDate,
) -> Result<usize, BuildError> {
    let entries = collect_entries(dist_dir, lastmod)?;
    for entry in &entries {
        debug!("  sitemap: {}", entry.path);
    }

    let path = dist_dir.join(SITEMAP_FILENAME);
    fs::write(&path, render(&entries, site_url)).at(&path)?;
    info!("Generated {} ({} URLs)", SITEMAP_FILENAME, entries.len());
    Ok(entries.len())
}
