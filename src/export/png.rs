//! PNG export for final surfaces.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma, Rgb};

use super::{coolwarm, FrameExportError};
use crate::lattice::HeightField;

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Height mapped to the lowest output value.
    pub min_height: f32,
    /// Height mapped to the highest output value.
    pub max_height: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -1.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the field's own height range.
    ///
    /// A flat field gets a unit-wide range around its height so it still exports.
    pub fn auto_range(field: &HeightField<f32>) -> Self {
        let (min, max) = field.height_range();
        let (min, max) = if min < max { (min, max) } else { (min - 0.5, min + 0.5) };
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }

    /// Maps heights into `[0, 1]` over the configured range.
    fn normalizer(&self) -> Result<impl Fn(f32) -> f32, FrameExportError> {
        let (min, max) = (self.min_height, self.max_height);
        if !(min < max) {
            return Err(FrameExportError::InvalidRange(min, max));
        }
        let range = max - min;
        Ok(move |v: f32| ((v - min) / range).clamp(0.0, 1.0))
    }
}

/// Exports a surface as a 16-bit grayscale PNG heightmap.
pub fn export_heightmap_png16(
    field: &HeightField<f32>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), FrameExportError> {
    let normalize = options.normalizer()?;
    let (width, height) = (field.nx() as u32, field.ny() as u32);

    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
    for (i, j) in field.coords() {
        let value = (normalize(field.get(i, j)) * 65535.0) as u16;
        img.put_pixel(j as u32, i as u32, Luma([value]));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    // Convert u16 slice to bytes for the encoder
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    Ok(())
}

/// Exports a surface as an RGB preview: troughs blue, crests red.
pub fn export_colormap_png(
    field: &HeightField<f32>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), FrameExportError> {
    let normalize = options.normalizer()?;
    let (width, height) = (field.nx() as u32, field.ny() as u32);

    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    for (i, j) in field.coords() {
        img.put_pixel(j as u32, i as u32, Rgb(coolwarm(normalize(field.get(i, j)))));
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)?;

    Ok(())
}
