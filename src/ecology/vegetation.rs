//! Vegetation density.

use rayon::prelude::*;

use super::biome::BiomeId;
use super::config::MoistureTemperatureConfig;

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Layers vegetation density reads.
#[derive(Debug, Clone, Copy)]
pub struct VegetationInputs<'a> {
    pub biome: &'a [u8],
    pub temperature: &'a [f32],
    pub rainfall: &'a [f32],
    pub aridity: &'a [f32],
    pub river_class: &'a [u8],
}

/// Density in 0..=255; water tiles are 0.
pub fn moisture_temperature(inputs: VegetationInputs<'_>, cfg: &MoistureTemperatureConfig) -> Vec<u8> {
    (0..inputs.biome.len())
        .into_par_iter()
        .map(|i| {
            let Some(biome) = BiomeId::from_u8(inputs.biome[i]) else {
                return 0;
            };

            // Combine biome base with climate signal.
            let mut veg = biome.base_veg();
            let temp_w = smoothstep(-5.0, 25.0, inputs.temperature[i]);
            let rain_w = smoothstep(100.0, 2200.0, inputs.rainfall[i]);
            veg *= 0.35 + 0.65 * temp_w * rain_w;

            let deficit = (1.0 - inputs.aridity[i]).clamp(0.0, 1.0);
            veg *= 1.0 - cfg.aridity_weight * deficit;

            if inputs.river_class[i] > 0 {
                veg += cfg.river_boost;
            }

            (veg.clamp(0.0, 1.0) * 255.0).round() as u8
        })
        .collect()
}
