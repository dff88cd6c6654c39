//! Map projection strategy configurations.

use serde::{Deserialize, Serialize};

use crate::schema::{check_range, ConfigPath, Issues, NoOptions, Validate};

/// Terrain from land mask, temperature and aridity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct StandardTerrainConfig {
    /// Land colder than this (°C) is snow.
    pub snow_temp_c: f32,
    /// Land colder than this (°C) is tundra.
    pub tundra_temp_c: f32,
    /// Land with an aridity index below this is desert.
    pub desert_aridity: f32,
    /// Land with an aridity index above this is grassland rather than plains.
    pub grassland_aridity: f32,
}

impl Default for StandardTerrainConfig {
    fn default() -> Self {
        Self {
            snow_temp_c: -10.0,
            tundra_temp_c: 0.0,
            desert_aridity: 0.35,
            grassland_aridity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum TerrainProjectionStrategy {
    Standard(StandardTerrainConfig),
}

impl Default for TerrainProjectionStrategy {
    fn default() -> Self {
        TerrainProjectionStrategy::Standard(StandardTerrainConfig::default())
    }
}

impl Validate for TerrainProjectionStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            TerrainProjectionStrategy::Standard(c) => {
                check_range(issues, path, "snow_temp_c", c.snow_temp_c as f64, -60.0, 10.0);
                check_range(issues, path, "tundra_temp_c", c.tundra_temp_c as f64, c.snow_temp_c as f64, 20.0);
                check_range(issues, path, "desert_aridity", c.desert_aridity as f64, 0.0, 5.0);
                check_range(issues, path, "grassland_aridity", c.grassland_aridity as f64, c.desert_aridity as f64, 10.0);
            }
        }
    }
}

/// Which river classes reach the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum RiverProjectionStrategy {
    MajorOnly(NoOptions),
    All(NoOptions),
}

impl Default for RiverProjectionStrategy {
    fn default() -> Self {
        RiverProjectionStrategy::MajorOnly(NoOptions {})
    }
}

impl Validate for RiverProjectionStrategy {
    fn validate(&self, _path: &ConfigPath, _issues: &mut Issues) {}
}

/// Random feature scatter weighted by vegetation and climate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DensityConfig {
    /// Global chance multiplier for every feature.
    pub density: f32,
    /// Minimum vegetation (0..255) for forest.
    pub forest_min_vegetation: u8,
    /// Minimum vegetation (0..255) for jungle on tropical biomes.
    pub jungle_min_vegetation: u8,
    /// Chance of marsh on wet flat land beside a river.
    pub marsh_chance: f32,
    /// Chance of an oasis on a desert tile.
    pub oasis_chance: f32,
    /// Water colder than this (°C) may freeze.
    pub ice_max_temp_c: f32,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            density: 0.6,
            forest_min_vegetation: 110,
            jungle_min_vegetation: 170,
            marsh_chance: 0.25,
            oasis_chance: 0.06,
            ice_max_temp_c: -6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum FeatureProjectionStrategy {
    Density(DensityConfig),
}

impl Default for FeatureProjectionStrategy {
    fn default() -> Self {
        FeatureProjectionStrategy::Density(DensityConfig::default())
    }
}

impl Validate for FeatureProjectionStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            FeatureProjectionStrategy::Density(c) => {
                check_range(issues, path, "density", c.density as f64, 0.0, 1.0);
                check_range(issues, path, "marsh_chance", c.marsh_chance as f64, 0.0, 1.0);
                check_range(issues, path, "oasis_chance", c.oasis_chance as f64, 0.0, 1.0);
                check_range(issues, path, "ice_max_temp_c", c.ice_max_temp_c as f64, -60.0, 10.0);
            }
        }
    }
}
