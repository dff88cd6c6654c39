//! Biome preview map.

use std::path::Path;

use super::{rasterize, tile_origin, write_rgb, ExportError, ExportOptions};
use crate::ecology::biome_preview_rgb;
use crate::pipeline::{FieldId, WorldMap};

/// Overlay colors for the biome preview.
#[derive(Debug, Clone)]
pub struct BiomeMapOptions {
    /// Color of water tiles (biome 0).
    pub ocean_color: [u8; 3],
    /// River tiles are painted this color when the river mask is published.
    pub river_color: Option<[u8; 3]>,
    /// Start tiles get a centered marker of this color when published.
    pub start_color: Option<[u8; 3]>,
}

impl Default for BiomeMapOptions {
    fn default() -> Self {
        Self {
            ocean_color: [15, 40, 90],
            river_color: Some([60, 110, 210]),
            start_color: Some([255, 255, 255]),
        }
    }
}

/// Writes the biome layer as an RGB PNG, with optional river and start overlays.
pub fn export_biome_map(
    world: &WorldMap,
    path: &Path,
    options: &ExportOptions,
    biome_options: &BiomeMapOptions,
) -> Result<(), ExportError> {
    let biome = world.fields.u8(FieldId::Biome)?;
    let rivers = match biome_options.river_color {
        Some(_) if world.fields.contains(FieldId::RiverMask) => Some(world.fields.u8(FieldId::RiverMask)?),
        _ => None,
    };

    let mut img = rasterize(&world.grid, options.scale, biome_options.ocean_color, |i| {
        match (rivers, biome_options.river_color) {
            (Some(mask), Some(color)) if mask[i] != 0 => color,
            _ if biome[i] == 0 => biome_options.ocean_color,
            _ => biome_preview_rgb(biome[i]),
        }
    });

    if let Some(color) = biome_options.start_color {
        if world.fields.contains(FieldId::StartTiles) {
            let scale = options.scale.max(1);
            let mark = (scale / 2).max(1);
            let inset = (scale - mark) / 2;
            for &idx in world.fields.indices(FieldId::StartTiles)? {
                let (ox, oy) = tile_origin(&world.grid, scale, idx);
                for py in oy + inset..oy + inset + mark {
                    for px in ox + inset..ox + inset + mark {
                        img.put_pixel(px, py, image::Rgb(color));
                    }
                }
            }
        }
    }

    write_rgb(&img, path, options)
}
