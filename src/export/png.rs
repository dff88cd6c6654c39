//! 16-bit grayscale export of scalar layers.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{image_size, tile_origin, ExportError, ExportOptions};
use crate::pipeline::{FieldId, WorldMap};

/// Value range mapped onto 0..=65535.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRange {
    /// Use the layer's own min and max.
    Auto,
    Fixed { min: f32, max: f32 },
}

/// Writes an `f32` layer (elevation, temperature, rainfall...) as a 16-bit PNG.
pub fn export_scalar_png(
    world: &WorldMap,
    id: FieldId,
    path: &Path,
    range: ScalarRange,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    let values = world.fields.f32(id)?;
    let (min, max) = match range {
        ScalarRange::Auto => world.range_f32(id)?,
        ScalarRange::Fixed { min, max } => (min, max),
    };
    // A flat layer still exports; it maps to black.
    let span = if max > min {
        max - min
    } else if range == ScalarRange::Auto {
        1.0
    } else {
        return Err(ExportError::InvalidRange(min, max));
    };

    let scale = options.scale.max(1);
    let (w, h) = image_size(&world.grid, scale);
    let mut pixels = vec![0u16; (w * h) as usize];
    for (idx, &v) in values.iter().enumerate() {
        let level = (((v - min) / span).clamp(0.0, 1.0) * 65535.0).round() as u16;
        let (ox, oy) = tile_origin(&world.grid, scale, idx);
        for py in oy..oy + scale {
            let row = (py * w) as usize;
            pixels[row + ox as usize..row + (ox + scale) as usize].fill(level);
        }
    }

    let bytes: Vec<u8> = pixels.iter().flat_map(|p| p.to_ne_bytes()).collect();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(&bytes, w, h, ExtendedColorType::L16)?;
    Ok(())
}
