//! PNG export of generated layers.
//!
//! Tiles are drawn as `scale`-pixel squares with odd columns shifted half a
//! tile down, so the images keep the hex layout's stagger.

mod biome_map;
mod plate_map;
mod png;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use thiserror::Error;

use crate::geometry::HexGrid;
use crate::pipeline::PipelineError;

pub use biome_map::{export_biome_map, BiomeMapOptions};
pub use plate_map::{boundary_color, export_boundary_map, export_plate_map, generate_plate_colors, hsv_to_rgb};
pub use png::{export_scalar_png, ScalarRange};

/// Errors that can occur during map export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Field error: {0}")]
    Field(#[from] PipelineError),
    #[error("empty value range: min ({0}) >= max ({1})")]
    InvalidRange(f32, f32),
}

/// Options shared by every exporter.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pixels per tile edge.
    pub scale: u32,
    pub compression: CompressionType,
    pub filter: FilterType,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 4,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

/// Image size for a grid at `scale`.
pub(crate) fn image_size(grid: &HexGrid, scale: u32) -> (u32, u32) {
    let scale = scale.max(1);
    (grid.width * scale, grid.height * scale + scale / 2)
}

/// Pixel rectangle origin of tile `idx`.
pub(crate) fn tile_origin(grid: &HexGrid, scale: u32, idx: usize) -> (u32, u32) {
    let scale = scale.max(1);
    let (x, y) = grid.coords(idx);
    (x * scale, y * scale + (x & 1) * (scale / 2))
}

/// Paints every tile with `color(idx)` onto a background.
pub(crate) fn rasterize(grid: &HexGrid, scale: u32, background: [u8; 3], color: impl Fn(usize) -> [u8; 3]) -> RgbImage {
    let scale = scale.max(1);
    let (w, h) = image_size(grid, scale);
    let mut img = RgbImage::from_pixel(w, h, Rgb(background));
    for idx in 0..grid.len() {
        let (ox, oy) = tile_origin(grid, scale, idx);
        let c = Rgb(color(idx));
        for py in oy..oy + scale {
            for px in ox..ox + scale {
                img.put_pixel(px, py, c);
            }
        }
    }
    img
}

pub(crate) fn write_rgb(img: &RgbImage, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)?;
    Ok(())
}
