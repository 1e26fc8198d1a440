//! Optional Markdown rendering stage.
//!
//! Off unless `--markdown` is passed. Each `*.md` file in the output gets a
//! sibling `*.html` page; the `.md` file itself is left in place. An HTML
//! file that already exists under the target name is authored content and
//! is never overwritten.
//!
//! Needs the `markdown` cargo feature (pulldown-cmark + maud). Without it
//! the stage logs a warning and does nothing.

use crate::capabilities::Capability;
use crate::error::BuildError;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownStats {
    pub rendered: usize,
    pub skipped: usize,
}

pub fn render_markdown(dist_dir: &Path, capability: &Capability) -> Result<MarkdownStats, BuildError> {
    if let Capability::Unavailable { reason } = capability {
        warn!("Markdown rendering requested but {reason}; skipping");
        return Ok(MarkdownStats::default());
    }

    #[cfg(feature = "markdown")]
    {
        render::render_tree(dist_dir)
    }
    #[cfg(not(feature = "markdown"))]
    {
        let _ = dist_dir;
        Ok(MarkdownStats::default())
    }
}

/// First `# heading` in the document, or `fallback`.
pub fn page_title(markdown: &str, fallback: &str) -> String {
    markdown
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(feature = "markdown")]
mod render {
    use super::{MarkdownStats, page_title};
    use crate::error::{BuildError, IoContext};
    use maud::{DOCTYPE, Markup, PreEscaped, html};
    use pulldown_cmark::{Options, Parser, html as md_html};
    use std::fs;
    use std::path::Path;
    use tracing::{debug, info, warn};
    use walkdir::WalkDir;

    pub(super) fn render_tree(dist_dir: &Path) -> Result<MarkdownStats, BuildError> {
        let mut stats = MarkdownStats::default();

        for entry in WalkDir::new(dist_dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !path.extension().is_some_and(|e| e == "md") {
                continue;
            }

            let target = path.with_extension("html");
            if target.exists() {
                warn!(
                    "Not rendering {}: {} already exists",
                    path.display(),
                    target.display()
                );
                stats.skipped += 1;
                continue;
            }

            let source = fs::read_to_string(path).at(path)?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let page = render_page(&page_title(&source, &stem), &source);
            fs::write(&target, page.into_string()).at(&target)?;
            debug!("  rendered {}", target.display());
            stats.rendered += 1;
        }

        info!("Rendered {} Markdown page(s)", stats.rendered);
        Ok(stats)
    }

    pub(super) fn render_page(title: &str, markdown: &str) -> Markup {
        let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
        let mut body = String::new();
        md_html::push_html(&mut body, parser);

        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (title) }
                }
                body {
                    main {
                        article { (PreEscaped(body)) }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn title_from_heading() {
        assert_eq!(page_title("intro\n# Hello World \n\ntext", "x"), "Hello World");
    }

    #[test]
    fn title_falls_back() {
        assert_eq!(page_title("## Not top level\n", "notes"), "notes");
        assert_eq!(page_title("# \n", "notes"), "notes");
    }

    #[test]
    #[traced_test]
    fn unavailable_capability_warns_and_skips() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.md"), "# A").unwrap();

        let stats =
            render_markdown(tmp.path(), &Capability::unavailable("not compiled in")).unwrap();

        assert_eq!(stats, MarkdownStats::default());
        assert!(!tmp.path().join("a.html").exists());
        assert!(logs_contain("Markdown rendering requested but not compiled in"));
    }

    #[cfg(feature = "markdown")]
    mod rendering {
        use super::super::*;
        use crate::test_helpers::*;
        use std::fs;
        use tempfile::TempDir;

        #[test]
        fn renders_sibling_html() {
            let tmp = TempDir::new().unwrap();
            let dist = write_tree(
                tmp.path(),
                "dist",
                &[("post.md", "# First Post\n\nThis is **bold**."), ("docs/guide.md", "plain")],
            );

            let stats = render_markdown(&dist, &Capability::Available).unwrap();

            assert_eq!(stats, MarkdownStats { rendered: 2, skipped: 0 });
            let html = fs::read_to_string(dist.join("post.html")).unwrap();
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains("<title>First Post</title>"));
            assert!(html.contains("<strong>bold</strong>"));
            let guide = fs::read_to_string(dist.join("docs/guide.html")).unwrap();
            assert!(guide.contains("<title>guide</title>"));
            assert!(dist.join("post.md").exists());
        }

        #[test]
        fn existing_html_is_not_overwritten() {
            let tmp = TempDir::new().unwrap();
            let dist = write_tree(
                tmp.path(),
                "dist",
                &[("about.md", "# About"), ("about.html", "hand written")],
            );

            let stats = render_markdown(&dist, &Capability::Available).unwrap();

            assert_eq!(stats, MarkdownStats { rendered: 0, skipped: 1 });
            assert_eq!(fs::read_to_string(dist.join("about.html")).unwrap(), "hand written");
        }

        #[test]
        fn title_is_escaped() {
            let html = super::super::render::render_page("<b>x</b>", "body").into_string();
            assert!(html.contains("<title>&lt;b&gt;x&lt;/b&gt;</title>"));
        }
    }
}
