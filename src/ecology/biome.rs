//! Biome classification.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::WhittakerConfig;
use crate::geometry::HexGrid;
use crate::morphology::elevation::smoothed_noise;

/// Biome classification ID. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BiomeId {
    // 0 is reserved for water.
    IceCap = 1,
    Tundra = 2,
    BorealForest = 3,
    TemperateGrassland = 4,
    TemperateDeciduousForest = 5,
    TemperateRainforest = 6,
    SubtropicalDesert = 7,
    Savanna = 8,
    TropicalSeasonalForest = 9,
    TropicalRainforest = 10,
    Mountain = 11,
}

impl BiomeId {
    pub const ALL: [BiomeId; 11] = [
        BiomeId::IceCap,
        BiomeId::Tundra,
        BiomeId::BorealForest,
        BiomeId::TemperateGrassland,
        BiomeId::TemperateDeciduousForest,
        BiomeId::TemperateRainforest,
        BiomeId::SubtropicalDesert,
        BiomeId::Savanna,
        BiomeId::TropicalSeasonalForest,
        BiomeId::TropicalRainforest,
        BiomeId::Mountain,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// `None` for water (0) and unknown ids.
    pub fn from_u8(v: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_u8() == v)
    }

    pub fn name(self) -> &'static str {
        match self {
            BiomeId::IceCap => "ice-cap",
            BiomeId::Tundra => "tundra",
            BiomeId::BorealForest => "boreal-forest",
            BiomeId::TemperateGrassland => "temperate-grassland",
            BiomeId::TemperateDeciduousForest => "temperate-deciduous-forest",
            BiomeId::TemperateRainforest => "temperate-rainforest",
            BiomeId::SubtropicalDesert => "subtropical-desert",
            BiomeId::Savanna => "savanna",
            BiomeId::TropicalSeasonalForest => "tropical-seasonal-forest",
            BiomeId::TropicalRainforest => "tropical-rainforest",
            BiomeId::Mountain => "mountain",
        }
    }

    /// Base vegetation density for this biome (0..1).
    pub fn base_veg(self) -> f32 {
        match self {
            BiomeId::IceCap => 0.0,
            BiomeId::Tundra => 0.15,
            BiomeId::BorealForest => 0.65,
            BiomeId::TemperateGrassland => 0.45,
            BiomeId::TemperateDeciduousForest => 0.70,
            BiomeId::TemperateRainforest => 0.85,
            BiomeId::SubtropicalDesert => 0.05,
            BiomeId::Savanna => 0.35,
            BiomeId::TropicalSeasonalForest => 0.75,
            BiomeId::TropicalRainforest => 0.95,
            BiomeId::Mountain => 0.25,
        }
    }

    /// RGB preview color for this biome.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            BiomeId::IceCap => [240, 248, 255],
            BiomeId::Tundra => [170, 190, 170],
            BiomeId::BorealForest => [30, 80, 40],
            BiomeId::TemperateGrassland => [130, 180, 90],
            BiomeId::TemperateDeciduousForest => [40, 120, 60],
            BiomeId::TemperateRainforest => [20, 100, 60],
            BiomeId::SubtropicalDesert => [220, 205, 140],
            BiomeId::Savanna => [190, 190, 95],
            BiomeId::TropicalSeasonalForest => [50, 150, 70],
            BiomeId::TropicalRainforest => [20, 140, 55],
            BiomeId::Mountain => [140, 140, 140],
        }
    }
}

/// RGB preview color for a stored biome id; water is dark blue.
pub fn biome_preview_rgb(biome_id: u8) -> [u8; 3] {
    match biome_id {
        0 => [20, 40, 90],
        id => BiomeId::from_u8(id).map_or([255, 0, 255], BiomeId::preview_rgb),
    }
}

/// Classify one land tile using a Whittaker-like scheme.
///
/// Inputs should already include ecotone jitter, if enabled.
pub fn classify_whittaker(elevation_m: f32, temp_c: f32, rainfall_mm: f32, cfg: &WhittakerConfig) -> BiomeId {
    if elevation_m >= cfg.mountain_elevation_m {
        return BiomeId::Mountain;
    }

    // Permanent ice: sustained cold.
    if temp_c <= cfg.ice_temp_c {
        return BiomeId::IceCap;
    }

    // Tundra / boreal transition.
    if temp_c < cfg.cold_temp_c {
        if rainfall_mm < 350.0 {
            return BiomeId::Tundra;
        }
        return BiomeId::BorealForest;
    }

    // Warm climates.
    if temp_c >= cfg.tropical_temp_c {
        if rainfall_mm >= 2500.0 {
            return BiomeId::TropicalRainforest;
        }
        if rainfall_mm >= 1200.0 {
            return BiomeId::TropicalSeasonalForest;
        }
        if rainfall_mm >= 450.0 {
            return BiomeId::Savanna;
        }
        return BiomeId::SubtropicalDesert;
    }

    // Temperate climates.
    if rainfall_mm >= 1600.0 {
        return BiomeId::TemperateRainforest;
    }
    if rainfall_mm >= 800.0 {
        return BiomeId::TemperateDeciduousForest;
    }
    if rainfall_mm >= 350.0 {
        return BiomeId::TemperateGrassland;
    }
    BiomeId::SubtropicalDesert
}

/// Layers biome classification reads.
#[derive(Debug, Clone, Copy)]
pub struct ClimateInputs<'a> {
    pub elevation: &'a [f32],
    pub land_mask: &'a [u8],
    pub temperature: &'a [f32],
    pub rainfall: &'a [f32],
}

/// Biome id per tile; water tiles are 0.
pub fn whittaker<R: Rng>(grid: &HexGrid, inputs: ClimateInputs<'_>, cfg: &WhittakerConfig, rng: &mut R) -> Vec<u8> {
    let jitter = smoothed_noise(grid, cfg.jitter_smoothing, rng);
    (0..grid.len())
        .map(|i| {
            if inputs.land_mask[i] == 0 {
                return 0;
            }
            let j = jitter[i];
            let t = inputs.temperature[i] + cfg.jitter_temp_c * j;
            let p = (inputs.rainfall[i] + cfg.jitter_rainfall_mm * j).max(0.0);
            classify_whittaker(inputs.elevation[i], t, p, cfg).as_u8()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn classification_follows_climate() {
        let cfg = WhittakerConfig::default();
        assert_eq!(classify_whittaker(100.0, 27.0, 3000.0, &cfg), BiomeId::TropicalRainforest);
        assert_eq!(classify_whittaker(100.0, 27.0, 100.0, &cfg), BiomeId::SubtropicalDesert);
        assert_eq!(classify_whittaker(100.0, 12.0, 1000.0, &cfg), BiomeId::TemperateDeciduousForest);
        assert_eq!(classify_whittaker(100.0, -5.0, 200.0, &cfg), BiomeId::Tundra);
        assert_eq!(classify_whittaker(100.0, -20.0, 200.0, &cfg), BiomeId::IceCap);
        assert_eq!(classify_whittaker(3500.0, 20.0, 1000.0, &cfg), BiomeId::Mountain);
    }

    #[test]
    fn water_is_zero_and_ids_round_trip() {
        let grid = HexGrid::new(6, 4);
        let n = grid.len();
        let elevation = vec![10.0; n];
        let mut land = vec![1u8; n];
        land[0] = 0;
        let temperature = vec![15.0; n];
        let rainfall = vec![900.0; n];
        let ids = whittaker(
            &grid,
            ClimateInputs { elevation: &elevation, land_mask: &land, temperature: &temperature, rainfall: &rainfall },
            &WhittakerConfig::default(),
            &mut ChaCha8Rng::seed_from_u64(5),
        );
        assert_eq!(ids[0], 0);
        assert!(ids[1..].iter().all(|&b| BiomeId::from_u8(b).is_some()));
        for b in BiomeId::ALL {
            assert_eq!(BiomeId::from_u8(b.as_u8()), Some(b));
        }
        assert_eq!(biome_preview_rgb(99), [255, 0, 255]);
    }

    #[test]
    fn jitter_is_deterministic_for_seed() {
        let grid = HexGrid::new(8, 8);
        let n = grid.len();
        let elevation = vec![100.0; n];
        let land = vec![1u8; n];
        let temperature = vec![20.0; n];
        let rainfall = vec![1200.0; n];
        let inputs = ClimateInputs { elevation: &elevation, land_mask: &land, temperature: &temperature, rainfall: &rainfall };
        let cfg = WhittakerConfig::default();
        let a = whittaker(&grid, inputs, &cfg, &mut ChaCha8Rng::seed_from_u64(9));
        let b = whittaker(&grid, inputs, &cfg, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
