//! Climate strategy configurations.
//!
//! Units:
//! - temperatures: °C
//! - elevation: m above sea level
//! - distances: tile hops
//! - precipitation: mm/year (relative units; exported consistently)

use serde::{Deserialize, Serialize};

use crate::schema::{check_range, ConfigPath, Issues, NoOptions, Validate};

/// Latitudinal temperature gradient with altitude lapse and maritime buffering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LatitudeLapseConfig {
    pub equator_temp_c: f32,
    pub pole_temp_c: f32,
    /// Shape of the equator-to-pole curve; above 1 sharpens polar contrast.
    pub latitude_exponent: f32,
    pub lapse_rate_c_per_km: f32,
    /// Coast distance (hops) over which land is pulled toward the ocean baseline.
    pub maritime_buffer_tiles: f32,
    pub ocean_temp_c: f32,
    /// Added to every tile.
    pub offset_c: f32,
}

impl Default for LatitudeLapseConfig {
    fn default() -> Self {
        Self {
            equator_temp_c: 29.0,
            pole_temp_c: -22.0,
            latitude_exponent: 1.15,
            lapse_rate_c_per_km: 6.5,
            maritime_buffer_tiles: 3.0,
            ocean_temp_c: 18.0,
            offset_c: 0.0,
        }
    }
}

impl Validate for LatitudeLapseConfig {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "equator_temp_c", self.equator_temp_c as f64, -60.0, 60.0);
        check_range(issues, path, "pole_temp_c", self.pole_temp_c as f64, -80.0, 40.0);
        check_range(issues, path, "latitude_exponent", self.latitude_exponent as f64, 0.1, 4.0);
        check_range(issues, path, "lapse_rate_c_per_km", self.lapse_rate_c_per_km as f64, 0.0, 15.0);
        check_range(issues, path, "maritime_buffer_tiles", self.maritime_buffer_tiles as f64, 0.1, 64.0);
        check_range(issues, path, "ocean_temp_c", self.ocean_temp_c as f64, -10.0, 40.0);
        check_range(issues, path, "offset_c", self.offset_c as f64, -30.0, 30.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum TemperatureStrategy {
    LatitudeLapse(LatitudeLapseConfig),
}

impl Default for TemperatureStrategy {
    fn default() -> Self {
        TemperatureStrategy::LatitudeLapse(LatitudeLapseConfig::default())
    }
}

impl Validate for TemperatureStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            TemperatureStrategy::LatitudeLapse(c) => c.validate(path, issues),
        }
    }
}

/// Simplified three-cell circulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ThreeCellConfig {
    /// Latitude of the intertropical convergence zone.
    pub itcz_latitude_deg: f32,
    /// 0..1, mixes north/south flow toward the ITCZ into the zonal winds.
    pub meridional_strength: f32,
}

impl Default for ThreeCellConfig {
    fn default() -> Self {
        Self {
            itcz_latitude_deg: 0.0,
            meridional_strength: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum WindStrategy {
    ThreeCell(ThreeCellConfig),
}

impl Default for WindStrategy {
    fn default() -> Self {
        WindStrategy::ThreeCell(ThreeCellConfig::default())
    }
}

impl Validate for WindStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            WindStrategy::ThreeCell(c) => {
                check_range(issues, path, "itcz_latitude_deg", c.itcz_latitude_deg as f64, -30.0, 30.0);
                check_range(issues, path, "meridional_strength", c.meridional_strength as f64, 0.0, 1.0);
            }
        }
    }
}

/// Rainfall from latitude bands plus coastal and mountain bonuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LatitudeBandsConfig {
    pub equator_mm: f32,
    pub subtropic_mm: f32,
    pub temperate_mm: f32,
    pub polar_mm: f32,
    pub coastal_bonus_mm: f32,
    /// Hops over which the coastal bonus decays by 1/e.
    pub coastal_decay_tiles: f32,
    pub mountain_bonus_mm: f32,
    pub rainfall_scale: f32,
}

impl Default for LatitudeBandsConfig {
    fn default() -> Self {
        Self {
            equator_mm: 2000.0,
            subtropic_mm: 350.0,
            temperate_mm: 1100.0,
            polar_mm: 250.0,
            coastal_bonus_mm: 350.0,
            coastal_decay_tiles: 3.0,
            mountain_bonus_mm: 450.0,
            rainfall_scale: 1.0,
        }
    }
}

impl Validate for LatitudeBandsConfig {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        for (field, v) in [
            ("equator_mm", self.equator_mm),
            ("subtropic_mm", self.subtropic_mm),
            ("temperate_mm", self.temperate_mm),
            ("polar_mm", self.polar_mm),
            ("coastal_bonus_mm", self.coastal_bonus_mm),
            ("mountain_bonus_mm", self.mountain_bonus_mm),
        ] {
            check_range(issues, path, field, v as f64, 0.0, 10000.0);
        }
        check_range(issues, path, "coastal_decay_tiles", self.coastal_decay_tiles as f64, 0.1, 64.0);
        check_range(issues, path, "rainfall_scale", self.rainfall_scale as f64, 0.0, 10.0);
    }
}

/// Moisture carried along the wind, rained out by orographic lift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MoistureAdvectionConfig {
    /// Moisture picked up per step over warm water (mm).
    pub evaporation_mm: f32,
    /// Share of the ocean rate picked up over land.
    pub land_evaporation: f32,
    /// Share of carried moisture that falls per step.
    pub rainout_rate: f32,
    /// Extra rainout per km of rise toward the downwind tile.
    pub orographic_scale: f32,
    pub iterations: u32,
    /// Steps per year used to turn the mean step rainfall into annual rainfall.
    pub steps_per_year: f32,
    pub rainfall_scale: f32,
}

impl Default for MoistureAdvectionConfig {
    fn default() -> Self {
        Self {
            evaporation_mm: 60.0,
            land_evaporation: 0.2,
            rainout_rate: 0.12,
            orographic_scale: 1.2,
            iterations: 48,
            steps_per_year: 20.0,
            rainfall_scale: 1.0,
        }
    }
}

impl Validate for MoistureAdvectionConfig {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "evaporation_mm", self.evaporation_mm as f64, 0.0, 1000.0);
        check_range(issues, path, "land_evaporation", self.land_evaporation as f64, 0.0, 1.0);
        check_range(issues, path, "rainout_rate", self.rainout_rate as f64, 0.0, 1.0);
        check_range(issues, path, "orographic_scale", self.orographic_scale as f64, 0.0, 20.0);
        check_range(issues, path, "iterations", self.iterations as f64, 1.0, 1024.0);
        check_range(issues, path, "steps_per_year", self.steps_per_year as f64, 0.1, 1000.0);
        check_range(issues, path, "rainfall_scale", self.rainfall_scale as f64, 0.0, 10.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum PrecipitationStrategy {
    LatitudeBands(LatitudeBandsConfig),
    MoistureAdvection(MoistureAdvectionConfig),
}

impl Default for PrecipitationStrategy {
    fn default() -> Self {
        PrecipitationStrategy::MoistureAdvection(MoistureAdvectionConfig::default())
    }
}

impl PrecipitationStrategy {
    pub fn rainfall_scale_mut(&mut self) -> &mut f32 {
        match self {
            PrecipitationStrategy::LatitudeBands(c) => &mut c.rainfall_scale,
            PrecipitationStrategy::MoistureAdvection(c) => &mut c.rainfall_scale,
        }
    }
}

impl Validate for PrecipitationStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            PrecipitationStrategy::LatitudeBands(c) => c.validate(path, issues),
            PrecipitationStrategy::MoistureAdvection(c) => c.validate(path, issues),
        }
    }
}

/// Local corrections to baseline rainfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RefineConfig {
    /// Global weight of every correction below; 0 leaves rainfall unchanged.
    pub strength: f32,
    /// Rainfall removed in the lee of mountains.
    pub rain_shadow: f32,
    pub coastal_boost: f32,
    pub river_boost: f32,
    pub smoothing_passes: u32,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            strength: 1.0,
            rain_shadow: 0.35,
            coastal_boost: 0.1,
            river_boost: 0.12,
            smoothing_passes: 1,
        }
    }
}

impl Validate for RefineConfig {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "strength", self.strength as f64, 0.0, 4.0);
        check_range(issues, path, "rain_shadow", self.rain_shadow as f64, 0.0, 1.0);
        check_range(issues, path, "coastal_boost", self.coastal_boost as f64, 0.0, 2.0);
        check_range(issues, path, "river_boost", self.river_boost as f64, 0.0, 2.0);
        check_range(issues, path, "smoothing_passes", self.smoothing_passes as f64, 0.0, 16.0);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum RefinePrecipitationStrategy {
    Refine(RefineConfig),
    /// Keeps the baseline rainfall.
    Passthrough(NoOptions),
}

impl Default for RefinePrecipitationStrategy {
    fn default() -> Self {
        RefinePrecipitationStrategy::Refine(RefineConfig::default())
    }
}

impl Validate for RefinePrecipitationStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        if let RefinePrecipitationStrategy::Refine(c) = self {
            c.validate(path, issues);
        }
    }
}

/// Wet and dry latitude belts laid over the refined rainfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MacroBeltsConfig {
    pub belt_count: u32,
    /// Peak relative change at a belt's center.
    pub amplitude: f32,
    /// Belt half-width as a share of map height.
    pub half_width: f32,
}

impl Default for MacroBeltsConfig {
    fn default() -> Self {
        Self {
            belt_count: 2,
            amplitude: 0.3,
            half_width: 0.08,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum SwatchStrategy {
    None(NoOptions),
    MacroBelts(MacroBeltsConfig),
}

impl Default for SwatchStrategy {
    fn default() -> Self {
        SwatchStrategy::None(NoOptions {})
    }
}

impl Validate for SwatchStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        if let SwatchStrategy::MacroBelts(c) = self {
            check_range(issues, path, "belt_count", c.belt_count as f64, 0.0, 16.0);
            check_range(issues, path, "amplitude", c.amplitude as f64, 0.0, 0.95);
            check_range(issues, path, "half_width", c.half_width as f64, 0.01, 0.5);
        }
    }
}

/// Ratio of rainfall to potential evapotranspiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PetRatioConfig {
    pub pet_base_mm: f32,
    pub pet_mm_per_c: f32,
}

impl Default for PetRatioConfig {
    fn default() -> Self {
        Self {
            pet_base_mm: 250.0,
            pet_mm_per_c: 55.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum AridityStrategy {
    PetRatio(PetRatioConfig),
}

impl Default for AridityStrategy {
    fn default() -> Self {
        AridityStrategy::PetRatio(PetRatioConfig::default())
    }
}

impl Validate for AridityStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            AridityStrategy::PetRatio(c) => {
                check_range(issues, path, "pet_base_mm", c.pet_base_mm as f64, 1.0, 5000.0);
                check_range(issues, path, "pet_mm_per_c", c.pet_mm_per_c as f64, 0.0, 500.0);
            }
        }
    }
}
