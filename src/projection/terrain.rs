//! Terrain types for the game map.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::StandardTerrainConfig;
use crate::geometry::HexGrid;
use crate::morphology::coast::is_shallow_water;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TerrainType {
    Ocean = 0,
    Coast = 1,
    Grassland = 2,
    Plains = 3,
    Desert = 4,
    Tundra = 5,
    Snow = 6,
}

impl TerrainType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => TerrainType::Coast,
            2 => TerrainType::Grassland,
            3 => TerrainType::Plains,
            4 => TerrainType::Desert,
            5 => TerrainType::Tundra,
            6 => TerrainType::Snow,
            _ => TerrainType::Ocean,
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, TerrainType::Ocean | TerrainType::Coast)
    }
}

/// Terrain of one land tile.
pub fn classify_land(temperature_c: f32, aridity: f32, cfg: &StandardTerrainConfig) -> TerrainType {
    if temperature_c < cfg.snow_temp_c {
        TerrainType::Snow
    } else if temperature_c < cfg.tundra_temp_c {
        TerrainType::Tundra
    } else if aridity < cfg.desert_aridity {
        TerrainType::Desert
    } else if aridity > cfg.grassland_aridity {
        TerrainType::Grassland
    } else {
        TerrainType::Plains
    }
}

/// Terrain per tile. Water next to land is coast, other water is ocean.
pub fn standard(
    grid: &HexGrid,
    land_mask: &[u8],
    temperature: &[f32],
    aridity: &[f32],
    cfg: &StandardTerrainConfig,
) -> Vec<u8> {
    (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let t = if land_mask[i] != 0 {
                classify_land(temperature[i], aridity[i], cfg)
            } else if is_shallow_water(grid, land_mask, i) {
                TerrainType::Coast
            } else {
                TerrainType::Ocean
            };
            t.as_u8()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_classes_follow_climate() {
        let cfg = StandardTerrainConfig::default();
        assert_eq!(classify_land(-20.0, 1.0, &cfg), TerrainType::Snow);
        assert_eq!(classify_land(-3.0, 1.0, &cfg), TerrainType::Tundra);
        assert_eq!(classify_land(25.0, 0.1, &cfg), TerrainType::Desert);
        assert_eq!(classify_land(15.0, 2.0, &cfg), TerrainType::Grassland);
        assert_eq!(classify_land(15.0, 0.7, &cfg), TerrainType::Plains);
    }

    #[test]
    fn water_beside_land_is_coast() {
        let grid = HexGrid::new(8, 6);
        let mut land = vec![0u8; grid.len()];
        let island = grid.index(2, 2);
        land[island] = 1;
        let temp = vec![15.0; grid.len()];
        let arid = vec![0.7; grid.len()];
        let out = standard(&grid, &land, &temp, &arid, &StandardTerrainConfig::default());
        assert_eq!(TerrainType::from_u8(out[island]), TerrainType::Plains);
        for n in grid.neighbor_indices(island) {
            assert_eq!(TerrainType::from_u8(out[n]), TerrainType::Coast);
        }
        assert_eq!(TerrainType::from_u8(out[grid.index(6, 5)]), TerrainType::Ocean);
    }
}
