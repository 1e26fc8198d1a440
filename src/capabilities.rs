//! Optional capabilities, probed once at startup.
//!
//! Three things the build can do without: look up the source-control
//! revision, render Markdown, and re-encode images. Each is resolved to a
//! [`Capability`] before the pipeline starts and handed to the steps that
//! use it, so no step probes its environment inline.

use std::fmt;
use std::process::{Command, Stdio};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Available,
    Unavailable { reason: String },
}

impl Capability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable { reason } => write!(f, "unavailable ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub revision_control: Capability,
    pub markdown: Capability,
    pub imaging: Capability,
}

impl Capabilities {
    pub fn probe() -> Self {
        let caps = Self {
            revision_control: probe_git(),
            markdown: compiled_in(cfg!(feature = "markdown"), "markdown"),
            imaging: compiled_in(cfg!(feature = "images"), "images"),
        };
        tracing::debug!(
            "Capabilities: revision control {}, markdown {}, imaging {}",
            caps.revision_control,
            caps.markdown,
            caps.imaging
        );
        caps
    }

    /// Nothing optional is available.
    pub fn none() -> Self {
        Self {
            revision_control: Capability::unavailable("disabled"),
            markdown: Capability::unavailable("disabled"),
            imaging: Capability::unavailable("disabled"),
        }
    }
}

fn probe_git() -> Capability {
    match Command::new("git")
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => Capability::Available,
        Ok(status) => Capability::unavailable(format!("git --version exited with {status}")),
        Err(e) => Capability::unavailable(format!("git not found: {e}")),
    }
}

fn compiled_in(enabled: bool, feature: &str) -> Capability {
    if enabled {
        Capability::Available
    } else {
        Capability::unavailable(format!("built without the `{feature}` feature"))
    }
}
