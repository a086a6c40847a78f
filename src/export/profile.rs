//! Space-time profile of a single lattice row.

use std::path::Path;

use image::{Rgb, RgbImage};

use super::{coolwarm, FrameExportError};
use crate::lattice::HeightField;

/// Stacks `row` of each captured surface into one image, earliest capture on
/// top, so a one-row dune run reads as a space-time diagram.
///
/// Colors span the min/max over all stacked rows.
pub fn export_profile_png(
    frames: &[(u32, HeightField<f32>)],
    row: usize,
    path: &Path,
) -> Result<(), FrameExportError> {
    let first = frames.first().ok_or(FrameExportError::NoFrames)?;
    let nx = first.1.nx();

    let (min, max) = frames
        .iter()
        .flat_map(|(_, f)| f.row(row).iter().copied())
        .fold((f32::MAX, f32::MIN), |(lo, hi), h| (lo.min(h), hi.max(h)));
    let range = if max > min { max - min } else { 1.0 };

    let mut img = RgbImage::new(nx as u32, frames.len() as u32);
    for (t, (_, field)) in frames.iter().enumerate() {
        for (j, &h) in field.row(row).iter().take(nx).enumerate() {
            img.put_pixel(j as u32, t as u32, Rgb(coolwarm((h - min) / range)));
        }
    }
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_profile_rows_follow_captures() {
        let frames: Vec<(u32, HeightField<f32>)> = (1..=3)
            .map(|k| {
                let mut f: HeightField<f32> = HeightField::new(6, 1).unwrap();
                f.set(0, k as usize, 4.0);
                (k, f)
            })
            .collect();
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.png");

        export_profile_png(&frames, 0, &path).unwrap();

        let img = image::open(&path).unwrap().into_rgb8();
        assert_eq!(img.dimensions(), (6, 3));
        for t in 0..3u32 {
            assert_eq!(img.get_pixel(t + 1, t).0, coolwarm(1.0));
            assert_eq!(img.get_pixel(0, t).0, coolwarm(0.0));
        }
    }

    #[test]
    fn test_profile_needs_frames() {
        let dir = tempdir().unwrap();
        let err = export_profile_png(&[], 0, &dir.path().join("p.png")).unwrap_err();
        assert!(matches!(err, FrameExportError::NoFrames));
    }
}
