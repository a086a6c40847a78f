//! Grayscale animation frames.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use tracing::debug;

use super::FrameExportError;
use crate::lattice::HeightField;
use crate::pipeline::{FrameSink, PipelineError};

/// Gray-level mapping for animation frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOptions {
    /// Height offset (from `center`) that maps to full white; `-max_val` maps to black.
    pub max_val: f32,
    /// Height drawn as mid-gray.
    pub center: f32,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            max_val: 2.0,
            center: 0.0,
        }
    }
}

/// Renders a surface as 8-bit grayscale: `(h - center) / (2 * max_val) + 0.5`,
/// clipped to `[0, 1]`. Columns run along the image x axis.
pub fn frame_to_gray(field: &HeightField<f32>, options: &FrameOptions) -> Result<GrayImage, FrameExportError> {
    if !(options.max_val > 0.0) {
        return Err(FrameExportError::InvalidRange(-options.max_val, options.max_val));
    }
    let scale = 2.0 * options.max_val;
    let mut img = GrayImage::new(field.nx() as u32, field.ny() as u32);
    for (i, j) in field.coords() {
        let v = ((field.get(i, j) - options.center) / scale + 0.5).clamp(0.0, 1.0);
        img.put_pixel(j as u32, i as u32, Luma([(v * 255.0) as u8]));
    }
    Ok(img)
}

/// Writes one grayscale frame as PNG.
pub fn export_frame_png(field: &HeightField<f32>, path: &Path, options: &FrameOptions) -> Result<(), FrameExportError> {
    frame_to_gray(field, options)?.save(path)?;
    Ok(())
}

/// Frame sink that writes `frame_NNNN.png` files into a directory.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    dir: PathBuf,
    options: FrameOptions,
    written: Vec<PathBuf>,
}

impl FrameRecorder {
    /// Creates the directory if needed.
    pub fn new(dir: impl Into<PathBuf>, options: FrameOptions) -> Result<Self, FrameExportError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            options,
            written: Vec::new(),
        })
    }

    /// Frame files written so far, in capture order.
    pub fn frames(&self) -> &[PathBuf] {
        &self.written
    }

    fn frame_path(&self, step: u32) -> PathBuf {
        self.dir.join(format!("frame_{:04}.png", step))
    }
}

impl FrameSink for FrameRecorder {
    fn capture(&mut self, step: u32, surface: &HeightField<f32>) -> Result<(), PipelineError> {
        let path = self.frame_path(step);
        export_frame_png(surface, &path, &self.options).map_err(|e| PipelineError::Sink {
            step,
            message: format!("{}: {}", path.display(), e),
        })?;
        debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
