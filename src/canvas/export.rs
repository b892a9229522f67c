//! Raster export of a finished drawing.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::Canvas;
use crate::foundation::atomic_write::atomic_write;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{EaselError, EaselResult};

/// Give up looking for a free name after this many suffixes.
const MAX_NAME_SUFFIX: u32 = 999;

impl Canvas {
    /// Flatten to an RGB image with every unset pixel set to `background`.
    pub fn to_rgb_image(&self, background: Rgb8) -> image::RgbImage {
        let size = self.size();
        let mut img =
            image::RgbImage::from_pixel(size.width, size.height, image::Rgb(background.to_array()));
        for ((x, y), c) in self.pixels() {
            img.put_pixel(x, y, image::Rgb(c.to_array()));
        }
        img
    }

    /// PNG-encoded raster.
    pub fn encode_png(&self, background: Rgb8) -> EaselResult<Vec<u8>> {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(self.to_rgb_image(background))
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| EaselError::persistence(format!("encode png: {e}")))?;
        Ok(buf)
    }

    /// Write a timestamped PNG into `dir` and return its path.
    #[tracing::instrument(skip(self, background))]
    pub fn export_png(
        &self,
        dir: &Path,
        background: Rgb8,
        at: DateTime<Utc>,
    ) -> EaselResult<PathBuf> {
        let bytes = self.encode_png(background)?;
        let path = unique_drawing_path(dir, at)?;
        atomic_write(&path, &bytes)
            .map_err(|e| EaselError::persistence(format!("write '{}': {e}", path.display())))?;
        info!(path = %path.display(), pixels = self.pixel_count(), "drawing saved");
        Ok(path)
    }
}

/// `drawing_YYYYMMDD_HHMMSS.png`, or `drawing_YYYYMMDD_HHMMSS_N.png` when taken.
pub fn unique_drawing_path(dir: &Path, at: DateTime<Utc>) -> EaselResult<PathBuf> {
    let stem = format!("drawing_{}", at.format("%Y%m%d_%H%M%S"));
    let first = dir.join(format!("{stem}.png"));
    if !first.exists() {
        return Ok(first);
    }
    (1..=MAX_NAME_SUFFIX)
        .map(|n| dir.join(format!("{stem}_{n}.png")))
        .find(|p| !p.exists())
        .ok_or_else(|| EaselError::persistence(format!("no free file name for '{stem}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/export.rs"]
mod tests;
