//! Morphology strategy configurations.

use serde::{Deserialize, Serialize};

use crate::schema::{check_range, ConfigPath, Issues, Validate};

/// Base elevation from crust type and tectonic potentials.
///
/// Elevations are meters relative to an arbitrary datum; the land mask
/// strategy re-centers them on sea level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CrustUpliftConfig {
    /// Target share of tiles on continental plates.
    pub continental_fraction: f32,
    pub ocean_floor_m: f32,
    pub continental_shelf_m: f32,
    /// Elevation added at full uplift potential.
    pub uplift_scale_m: f32,
    /// Elevation removed at full rift potential.
    pub rift_scale_m: f32,
    /// Elevation added to stable continental interiors.
    pub shield_bonus_m: f32,
    /// Amplitude of per-tile random relief.
    pub roughness_m: f32,
    /// Neighbor-averaging passes applied to the random relief.
    pub smoothing_passes: u32,
}

impl Default for CrustUpliftConfig {
    fn default() -> Self {
        Self {
            continental_fraction: 0.4,
            ocean_floor_m: -3800.0,
            continental_shelf_m: 250.0,
            uplift_scale_m: 3200.0,
            rift_scale_m: 1800.0,
            shield_bonus_m: 350.0,
            roughness_m: 600.0,
            smoothing_passes: 2,
        }
    }
}

impl Validate for CrustUpliftConfig {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "continental_fraction", self.continental_fraction as f64, 0.0, 1.0);
        check_range(issues, path, "ocean_floor_m", self.ocean_floor_m as f64, -11000.0, 0.0);
        check_range(issues, path, "continental_shelf_m", self.continental_shelf_m as f64, -2000.0, 3000.0);
        check_range(issues, path, "uplift_scale_m", self.uplift_scale_m as f64, 0.0, 9000.0);
        check_range(issues, path, "rift_scale_m", self.rift_scale_m as f64, 0.0, 9000.0);
        check_range(issues, path, "shield_bonus_m", self.shield_bonus_m as f64, 0.0, 3000.0);
        check_range(issues, path, "roughness_m", self.roughness_m as f64, 0.0, 5000.0);
        check_range(issues, path, "smoothing_passes", self.smoothing_passes as f64, 0.0, 16.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum BaseElevationStrategy {
    CrustUplift(CrustUpliftConfig),
}

impl Default for BaseElevationStrategy {
    fn default() -> Self {
        BaseElevationStrategy::CrustUplift(CrustUpliftConfig::default())
    }
}

impl Validate for BaseElevationStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            BaseElevationStrategy::CrustUplift(c) => c.validate(path, issues),
        }
    }
}

/// Sea level chosen so that a given share of tiles is water.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TargetWaterConfig {
    pub water_percent: f32,
}

impl Default for TargetWaterConfig {
    fn default() -> Self {
        Self { water_percent: 62.0 }
    }
}

/// Sea level at a fixed elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FixedSeaLevelConfig {
    pub sea_level_m: f32,
}

impl Default for FixedSeaLevelConfig {
    fn default() -> Self {
        Self { sea_level_m: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum LandmaskStrategy {
    TargetWater(TargetWaterConfig),
    FixedSeaLevel(FixedSeaLevelConfig),
}

impl Default for LandmaskStrategy {
    fn default() -> Self {
        LandmaskStrategy::TargetWater(TargetWaterConfig::default())
    }
}

impl Validate for LandmaskStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            LandmaskStrategy::TargetWater(c) => {
                check_range(issues, path, "water_percent", c.water_percent as f64, 0.0, 100.0)
            }
            LandmaskStrategy::FixedSeaLevel(c) => {
                check_range(issues, path, "sea_level_m", c.sea_level_m as f64, -11000.0, 9000.0)
            }
        }
    }
}

/// Hills and mountains from uplift potential and elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct UpliftThresholdConfig {
    /// Uplift potential (0..255) at or above which land becomes hills.
    pub hill_uplift: u8,
    /// Uplift potential at or above which land becomes mountains.
    pub mountain_uplift: u8,
    /// Elevation above sea level at or above which land becomes hills.
    pub hill_elevation_m: f32,
    /// Elevation above sea level at or above which land becomes mountains.
    pub mountain_elevation_m: f32,
    /// Rift potential at or above which land becomes hills (rift shoulders).
    pub rift_hill: u8,
}

impl Default for UpliftThresholdConfig {
    fn default() -> Self {
        Self {
            hill_uplift: 90,
            mountain_uplift: 170,
            hill_elevation_m: 900.0,
            mountain_elevation_m: 2400.0,
            rift_hill: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum ReliefStrategy {
    UpliftThreshold(UpliftThresholdConfig),
}

impl Default for ReliefStrategy {
    fn default() -> Self {
        ReliefStrategy::UpliftThreshold(UpliftThresholdConfig::default())
    }
}

impl Validate for ReliefStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            ReliefStrategy::UpliftThreshold(c) => {
                check_range(issues, path, "hill_uplift", c.hill_uplift as f64, 1.0, 255.0);
                check_range(issues, path, "mountain_uplift", c.mountain_uplift as f64, c.hill_uplift as f64, 255.0);
                check_range(issues, path, "hill_elevation_m", c.hill_elevation_m as f64, 0.0, 9000.0);
                check_range(
                    issues,
                    path,
                    "mountain_elevation_m",
                    c.mountain_elevation_m as f64,
                    c.hill_elevation_m as f64,
                    9000.0,
                );
                check_range(issues, path, "rift_hill", c.rift_hill as f64, 1.0, 255.0);
            }
        }
    }
}

/// Hop distance from the shoreline, capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HexBfsConfig {
    pub max_distance: u8,
}

impl Default for HexBfsConfig {
    fn default() -> Self {
        Self { max_distance: 32 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum CoastDistanceStrategy {
    HexBfs(HexBfsConfig),
}

impl Default for CoastDistanceStrategy {
    fn default() -> Self {
        CoastDistanceStrategy::HexBfs(HexBfsConfig::default())
    }
}

impl Validate for CoastDistanceStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            CoastDistanceStrategy::HexBfs(c) => {
                check_range(issues, path, "max_distance", c.max_distance as f64, 1.0, 254.0)
            }
        }
    }
}
