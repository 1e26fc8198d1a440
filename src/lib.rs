//! # Site Builder
//!
//! A minimal static site build. The content directory is already the site:
//! it is copied into the output directory unchanged, and two generated files
//! are written next to it.
//!
//! ```text
//! content/            dist/
//! ├── index.html  →   ├── index.html
//! ├── about.html      ├── about.html
//! └── assets/         ├── assets/
//!                     ├── sitemap.xml       (one <url> per HTML page)
//!                     └── build-info.json   (time, env, commit, version)
//! ```
//!
//! # Pipeline
//!
//! ```text
//! prepare → copy → [markdown] → [images] → sitemap → build-info
//! ```
//!
//! Single-threaded and synchronous. The first error ends the build with
//! exit status 1; partial output is not rolled back.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Flags and environment variables → [`config::BuildConfig`] |
//! | [`capabilities`] | Optional tools and features, probed once at startup |
//! | [`logging`] | Scoped `tracing` dispatcher for a run |
//! | [`prepare`] | Content directory check, `--clean`, output directory creation |
//! | [`copy`] | Structural copy of the content tree, last-writer-wins merge |
//! | [`markdown`] | Opt-in: `*.md` → `*.html` pages |
//! | [`imaging`] | Opt-in: JPEG/PNG re-encoding, kept only when smaller |
//! | [`sitemap`] | `sitemap.xml` from every HTML file in the output |
//! | [`build_info`] | `build-info.json` |
//! | [`pipeline`] | Runs the steps in order, returns a [`pipeline::BuildReport`] |
//! | [`output`] | Report and failure lines for the log |
//! | [`error`] | [`BuildError`] |

pub mod build_info;
pub mod capabilities;
pub mod config;
pub mod copy;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod markdown;
pub mod output;
pub mod pipeline;
pub mod prepare;
pub mod sitemap;

pub use error::BuildError;

#[cfg(test)]
pub(crate) mod test_helpers;
