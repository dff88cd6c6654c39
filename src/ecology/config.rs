//! Ecology strategy configurations.

use serde::{Deserialize, Serialize};

use crate::schema::{check_range, ConfigPath, Issues, Validate};

/// Whittaker-like biome classification from temperature and rainfall.
///
/// Temperatures are °C, rainfall mm/year, elevation m above sea level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct WhittakerConfig {
    /// Land at or above this height is always mountain.
    pub mountain_elevation_m: f32,
    /// Mean temperature at or below which land is ice cap.
    pub ice_temp_c: f32,
    /// Upper bound of the tundra / boreal band.
    pub cold_temp_c: f32,
    /// Lower bound of the tropical band.
    pub tropical_temp_c: f32,

    // --- Ecotone jitter (noise-perturbed boundaries) ---
    /// Jitter amplitude applied to temperature (°C).
    pub jitter_temp_c: f32,
    /// Jitter amplitude applied to precipitation (mm/year).
    pub jitter_rainfall_mm: f32,
    /// Neighbor-averaging passes applied to the jitter noise.
    pub jitter_smoothing: u32,
}

impl Default for WhittakerConfig {
    fn default() -> Self {
        Self {
            mountain_elevation_m: 3000.0,
            ice_temp_c: -10.0,
            cold_temp_c: 0.0,
            tropical_temp_c: 20.0,
            jitter_temp_c: 1.5,
            jitter_rainfall_mm: 120.0,
            jitter_smoothing: 2,
        }
    }
}

impl Validate for WhittakerConfig {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "mountain_elevation_m", self.mountain_elevation_m as f64, 0.0, 9000.0);
        check_range(issues, path, "ice_temp_c", self.ice_temp_c as f64, -60.0, 10.0);
        check_range(issues, path, "cold_temp_c", self.cold_temp_c as f64, self.ice_temp_c as f64, 20.0);
        check_range(issues, path, "tropical_temp_c", self.tropical_temp_c as f64, self.cold_temp_c as f64, 40.0);
        check_range(issues, path, "jitter_temp_c", self.jitter_temp_c as f64, 0.0, 10.0);
        check_range(issues, path, "jitter_rainfall_mm", self.jitter_rainfall_mm as f64, 0.0, 1000.0);
        check_range(issues, path, "jitter_smoothing", self.jitter_smoothing as f64, 0.0, 16.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum BiomeStrategy {
    Whittaker(WhittakerConfig),
}

impl Default for BiomeStrategy {
    fn default() -> Self {
        BiomeStrategy::Whittaker(WhittakerConfig::default())
    }
}

impl Validate for BiomeStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            BiomeStrategy::Whittaker(c) => c.validate(path, issues),
        }
    }
}

/// Vegetation density from biome base values and the climate signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MoistureTemperatureConfig {
    /// Density added next to rivers (0..1 scale).
    pub river_boost: f32,
    /// How strongly a moisture deficit (aridity < 1) thins vegetation.
    pub aridity_weight: f32,
}

impl Default for MoistureTemperatureConfig {
    fn default() -> Self {
        Self {
            river_boost: 0.25,
            aridity_weight: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum VegetationStrategy {
    MoistureTemperature(MoistureTemperatureConfig),
}

impl Default for VegetationStrategy {
    fn default() -> Self {
        VegetationStrategy::MoistureTemperature(MoistureTemperatureConfig::default())
    }
}

impl Validate for VegetationStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            VegetationStrategy::MoistureTemperature(c) => {
                check_range(issues, path, "river_boost", c.river_boost as f64, 0.0, 1.0);
                check_range(issues, path, "aridity_weight", c.aridity_weight as f64, 0.0, 1.0);
            }
        }
    }
}
