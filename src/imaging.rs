//! Optional image optimization stage.
//!
//! Off unless `--optimize-images` is passed. JPEG and PNG files in the
//! output are decoded and re-encoded (JPEG at quality [`JPEG_QUALITY`], PNG
//! at best compression). The re-encoded bytes replace the file only when
//! they are smaller. A file that does not decode is left alone.
//!
//! Needs the `images` cargo feature. Without it the stage logs a warning
//! and does nothing.

use crate::capabilities::Capability;
use crate::error::BuildError;
use std::path::Path;
use tracing::warn;

pub const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageStats {
    pub optimized: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub bytes_saved: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

pub fn optimize_images(dist_dir: &Path, capability: &Capability) -> Result<ImageStats, BuildError> {
    if let Capability::Unavailable { reason } = capability {
        warn!("Image optimization requested but {reason}; skipping");
        return Ok(ImageStats::default());
    }

    #[cfg(feature = "images")]
    {
        encode::optimize_tree(dist_dir)
    }
    #[cfg(not(feature = "images"))]
    {
        let _ = dist_dir;
        Ok(ImageStats::default())
    }
}

#[cfg(feature = "images")]
mod encode {
    use super::{ImageKind, ImageStats, JPEG_QUALITY};
    use crate::error::{BuildError, IoContext};
    use image::codecs::jpeg::JpegEncoder;
    use image::codecs::png::{CompressionType, FilterType, PngEncoder};
    use image::{DynamicImage, ImageError, ImageReader};
    use std::fs;
    use std::path::Path;
    use tracing::{debug, info, warn};
    use walkdir::WalkDir;

    pub(super) fn optimize_tree(dist_dir: &Path) -> Result<ImageStats, BuildError> {
        let mut stats = ImageStats::default();

        for entry in WalkDir::new(dist_dir).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(kind) = ImageKind::from_path(path) else {
                continue;
            };

            let original = fs::metadata(path).at(path)?.len();
            let encoded = match reencode(path, kind) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    stats.failed += 1;
                    continue;
                }
            };

            let size = encoded.len() as u64;
            if size < original {
                fs::write(path, &encoded).at(path)?;
                debug!("  {}: {original} → {size} bytes", path.display());
                stats.optimized += 1;
                stats.bytes_saved += original - size;
            } else {
                stats.unchanged += 1;
            }
        }

        info!(
            "Optimized {} image(s), saved {} bytes",
            stats.optimized, stats.bytes_saved
        );
        Ok(stats)
    }

    fn reencode(path: &Path, kind: ImageKind) -> Result<Vec<u8>, ImageError> {
        let img = ImageReader::open(path)?.decode()?;
        let mut buf = Vec::new();
        match kind {
            ImageKind::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
                DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
            }
            ImageKind::Png => {
                let encoder =
                    PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
                img.write_with_encoder(encoder)?;
            }
        }
        Ok(buf)
    }
}
