//! Animated GIF assembly from recorded frames.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};
use tracing::info;

use super::FrameExportError;

/// Writes a looping animated GIF from frame image files, in the order given.
pub fn assemble_gif(frames: &[PathBuf], path: &Path, delay_ms: u32) -> Result<(), FrameExportError> {
    if frames.is_empty() {
        return Err(FrameExportError::NoFrames);
    }

    let file = File::create(path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    for frame_path in frames {
        let rgba = image::open(frame_path)?.to_rgba8();
        encoder.encode_frame(Frame::from_parts(rgba, 0, 0, delay))?;
    }

    info!("Wrote {} ({} frames)", path.display(), frames.len());
    Ok(())
}
