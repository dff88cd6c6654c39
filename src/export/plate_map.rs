//! Plate and boundary maps.

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{rasterize, write_rgb, ExportError, ExportOptions};
use crate::pipeline::{FieldId, WorldMap};
use crate::tectonics::BoundaryType;

/// Generates distinct colors for plates using golden ratio distribution.
pub fn generate_plate_colors(num_plates: usize, seed: u64) -> Vec<[u8; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let golden_ratio = 0.618_034_f32;

    let mut hue = rng.random::<f32>();
    (0..num_plates)
        .map(|_| {
            hue = (hue + golden_ratio) % 1.0;
            let saturation = 0.5 + rng.random::<f32>() * 0.4;
            let value = 0.6 + rng.random::<f32>() * 0.3;
            hsv_to_rgb(hue, saturation, value)
        })
        .collect()
}

/// Converts HSV (all in 0..1) to RGB.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let i = h.floor() as i32;
    let f = h - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

pub fn boundary_color(kind: BoundaryType) -> [u8; 3] {
    match kind {
        BoundaryType::None => [40, 40, 40],
        BoundaryType::Convergent => [220, 50, 40],
        BoundaryType::Divergent => [40, 120, 230],
        BoundaryType::Transform => [240, 200, 40],
    }
}

/// Writes plate membership, one color per plate, with boundary tiles darkened.
pub fn export_plate_map(world: &WorldMap, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    let plate_id = world.fields.u8(FieldId::PlateId)?;
    let boundary = world.fields.u8(FieldId::BoundaryType)?;
    let count = plate_id.iter().map(|&p| p as usize + 1).max().unwrap_or(0);
    let colors = generate_plate_colors(count, world.seed);

    let img = rasterize(&world.grid, options.scale, [0, 0, 0], |i| {
        let c = colors[plate_id[i] as usize];
        if boundary[i] != BoundaryType::None.as_u8() {
            c.map(|v| v / 2)
        } else {
            c
        }
    });
    write_rgb(&img, path, options)
}

/// Writes boundary tiles colored by their kind, everything else dark.
pub fn export_boundary_map(world: &WorldMap, path: &Path, options: &ExportOptions) -> Result<(), ExportError> {
    let boundary = world.fields.u8(FieldId::BoundaryType)?;
    let img = rasterize(&world.grid, options.scale, [0, 0, 0], |i| {
        boundary_color(BoundaryType::from_u8(boundary[i]))
    });
    write_rgb(&img, path, options)
}
