//! Terrain features scattered over the game map.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::DensityConfig;
use super::terrain::TerrainType;
use crate::ecology::BiomeId;
use crate::geometry::HexGrid;
use crate::morphology::ReliefClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FeatureType {
    None = 0,
    Forest = 1,
    Jungle = 2,
    Marsh = 3,
    Oasis = 4,
    Ice = 5,
}

impl FeatureType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => FeatureType::Forest,
            2 => FeatureType::Jungle,
            3 => FeatureType::Marsh,
            4 => FeatureType::Oasis,
            5 => FeatureType::Ice,
            _ => FeatureType::None,
        }
    }
}

/// Layers the feature scatter reads.
#[derive(Debug, Clone, Copy)]
pub struct FeatureInputs<'a> {
    pub terrain: &'a [u8],
    pub relief: &'a [u8],
    pub biome: &'a [u8],
    pub vegetation: &'a [u8],
    pub temperature: &'a [f32],
    pub river_mask: &'a [u8],
}

fn is_tropical(biome: Option<BiomeId>) -> bool {
    matches!(
        biome,
        Some(BiomeId::TropicalRainforest) | Some(BiomeId::TropicalSeasonalForest)
    )
}

/// One feature per tile, drawn in tile order from `rng`.
///
/// Mountains never carry a feature. Every other tile draws exactly one
/// random number so results do not shift when a single rule changes.
pub fn density<R: Rng>(grid: &HexGrid, inputs: FeatureInputs<'_>, cfg: &DensityConfig, rng: &mut R) -> Vec<u8> {
    (0..grid.len())
        .map(|i| {
            let roll: f32 = rng.random();
            let terrain = TerrainType::from_u8(inputs.terrain[i]);

            if terrain.is_water() {
                let freezes = inputs.temperature[i] <= cfg.ice_max_temp_c;
                return if freezes && roll < cfg.density {
                    FeatureType::Ice.as_u8()
                } else {
                    FeatureType::None.as_u8()
                };
            }
            if ReliefClass::from_u8(inputs.relief[i]) == ReliefClass::Mountains {
                return FeatureType::None.as_u8();
            }

            let veg = inputs.vegetation[i];
            let biome = BiomeId::from_u8(inputs.biome[i]);
            let riverside = inputs.river_mask[i] != 0
                || grid.neighbor_indices(i).any(|n| inputs.river_mask[n] != 0);

            let feature = if terrain == TerrainType::Desert {
                if riverside || roll < cfg.oasis_chance * cfg.density {
                    FeatureType::Oasis
                } else {
                    FeatureType::None
                }
            } else if riverside
                && ReliefClass::from_u8(inputs.relief[i]) == ReliefClass::Flat
                && roll < cfg.marsh_chance * cfg.density
            {
                FeatureType::Marsh
            } else if is_tropical(biome) && veg >= cfg.jungle_min_vegetation && roll < cfg.density {
                FeatureType::Jungle
            } else if veg >= cfg.forest_min_vegetation && roll < cfg.density * (veg as f32 / 255.0) {
                FeatureType::Forest
            } else {
                FeatureType::None
            };
            feature.as_u8()
        })
        .collect()
}
