//! Export module for writing surfaces to image files.
//!
//! Supports 8-bit grayscale frames for animation, looping GIF assembly,
//! cool-warm colormap previews, space-time profiles of one-row runs, and
//! 16-bit PNG heightmaps.

mod colormap;
mod frame;
mod gif;
mod png;
mod profile;

use thiserror::Error;

pub use colormap::coolwarm;
pub use frame::{export_frame_png, frame_to_gray, FrameOptions, FrameRecorder};
pub use gif::assemble_gif;
pub use png::{export_colormap_png, export_heightmap_png16, PngExportOptions};
pub use profile::export_profile_png;

/// Errors that can occur while writing images.
#[derive(Error, Debug)]
pub enum FrameExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid value range: min ({0}) >= max ({1})")]
    InvalidRange(f32, f32),
    #[error("No frames to assemble")]
    NoFrames,
}
