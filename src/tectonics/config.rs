//! Configuration for plate generation.

use serde::{Deserialize, Serialize};

use super::plate::DirectionalityBias;
use crate::schema::{check_range, ConfigPath, Issues, Validate};

/// Where the attempt random stream gets its seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SeedMode {
    /// Use the seed supplied by the host engine.
    #[default]
    Engine,
    /// Use `value` and ignore the engine seed.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct SeedConfig {
    pub mode: SeedMode,
    pub value: u64,
    /// Added to the chosen base seed; lets one map seed drive several layouts.
    pub offset: u64,
}

impl SeedConfig {
    pub fn resolve(&self, engine_seed: u64) -> u64 {
        let base = match self.mode {
            SeedMode::Engine => engine_seed,
            SeedMode::Fixed => self.value,
        };
        base.wrapping_add(self.offset)
    }
}

/// Plate layout and motion parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PlateConfig {
    /// Number of tectonic plates.
    pub count: usize,
    /// Lloyd relaxation passes applied to both Voronoi diagrams.
    pub relaxation_steps: usize,
    /// 0.5 is neutral; higher pushes plates toward the map center (more convergent margins).
    pub convergence_mix: f32,
    /// Global scale on every plate's rotation.
    pub rotation_multiplier: f32,
    pub directionality: Option<DirectionalityBias>,
    pub seed: SeedConfig,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            count: 8,
            relaxation_steps: 4,
            convergence_mix: 0.5,
            rotation_multiplier: 1.0,
            directionality: None,
            seed: SeedConfig::default(),
        }
    }
}

impl PlateConfig {
    /// A balanced layout for standard-size maps.
    pub fn earth_like(seed: u64) -> Self {
        Self {
            seed: SeedConfig {
                mode: SeedMode::Fixed,
                value: seed,
                offset: 0,
            },
            ..Default::default()
        }
    }

    /// Many small, fast-spinning, mostly converging plates.
    pub fn active(seed: u64) -> Self {
        Self {
            count: 14,
            convergence_mix: 0.65,
            rotation_multiplier: 1.6,
            ..Self::earth_like(seed)
        }
    }

    /// Few large, slow plates.
    pub fn stable(seed: u64) -> Self {
        Self {
            count: 5,
            convergence_mix: 0.45,
            rotation_multiplier: 0.6,
            ..Self::earth_like(seed)
        }
    }
}

impl Validate for PlateConfig {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "count", self.count as f64, 2.0, 255.0);
        check_range(issues, path, "relaxation_steps", self.relaxation_steps as f64, 0.0, 32.0);
        check_range(issues, path, "convergence_mix", self.convergence_mix as f64, 0.0, 1.0);
        check_range(issues, path, "rotation_multiplier", self.rotation_multiplier as f64, 0.0, 10.0);
        if let Some(d) = &self.directionality {
            let p = path.child("directionality");
            check_range(issues, &p, "angle_deg", d.angle_deg as f64, -360.0, 360.0);
            check_range(issues, &p, "strength", d.strength as f64, 0.0, 1.0);
        }
    }
}

/// Boundary classification thresholds.
///
/// The convergent and divergent cutoffs are intentionally asymmetric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BoundaryThresholds {
    /// `subduction` above this is convergent.
    pub convergent: f32,
    /// `subduction` below this is divergent.
    pub divergent: f32,
    /// `sliding` above this (with neither of the above) is transform.
    pub transform: f32,
    /// `|subduction| + sliding` that maps to full boundary intensity.
    pub intensity_scale: f32,
}

impl Default for BoundaryThresholds {
    fn default() -> Self {
        Self {
            convergent: 0.25,
            divergent: -0.15,
            transform: 0.4,
            intensity_scale: 1.5,
        }
    }
}

impl Validate for BoundaryThresholds {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "convergent", self.convergent as f64, 0.0, 10.0);
        check_range(issues, path, "divergent", self.divergent as f64, -10.0, 0.0);
        check_range(issues, path, "transform", self.transform as f64, 0.0, 10.0);
        check_range(issues, path, "intensity_scale", self.intensity_scale as f64, 0.01, 100.0);
    }
}

/// Saturation limits checked after every attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ValidationLimits {
    /// Maximum share of boundary tiles, and of influenced tiles.
    pub saturation_limit: f32,
    /// Maximum average closeness (0..255) among influenced tiles.
    pub closeness_limit: f32,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            saturation_limit: 0.45,
            closeness_limit: 80.0,
        }
    }
}

impl Validate for ValidationLimits {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "saturation_limit", self.saturation_limit as f64, 0.0, 1.0);
        check_range(issues, path, "closeness_limit", self.closeness_limit as f64, 0.0, 255.0);
    }
}

/// Mesh and influence parameters for one attempt.
///
/// The retry loop derives coarser copies of this from the configured values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GenerationParams {
    /// Assignment cells per tile for the fine Voronoi diagram.
    pub cell_density: f32,
    /// Hops from a boundary beyond which boundary influence is cut off.
    pub max_influence_distance: u32,
    /// Exponential decay of closeness per hop.
    pub influence_decay: f32,
    pub thresholds: BoundaryThresholds,
    pub validation: ValidationLimits,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            cell_density: 0.08,
            max_influence_distance: 4,
            influence_decay: 0.9,
            thresholds: BoundaryThresholds::default(),
            validation: ValidationLimits::default(),
        }
    }
}

impl Validate for GenerationParams {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        check_range(issues, path, "cell_density", self.cell_density as f64, 0.001, 1.0);
        check_range(issues, path, "max_influence_distance", self.max_influence_distance as f64, 1.0, 32.0);
        check_range(issues, path, "influence_decay", self.influence_decay as f64, 0.01, 10.0);
        self.thresholds.validate(&path.child("thresholds"), issues);
        self.validation.validate(&path.child("validation"), issues);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlateConfig::default();
        assert_eq!(config.count, 8);
        assert_eq!(config.seed.mode, SeedMode::Engine);
        assert!(config.validate_at_root().is_ok());
        assert!(GenerationParams::default().validate_at_root().is_ok());
    }

    #[test]
    fn test_active_and_stable_presets() {
        let active = PlateConfig::active(456);
        let stable = PlateConfig::stable(456);
        assert!(active.count > PlateConfig::default().count);
        assert!(stable.count < PlateConfig::default().count);
        assert!(active.rotation_multiplier > stable.rotation_multiplier);
        assert_eq!(active.seed.resolve(0), 456);
    }

    #[test]
    fn seed_resolution_honours_mode_and_offset() {
        let engine = SeedConfig { mode: SeedMode::Engine, value: 9, offset: 3 };
        assert_eq!(engine.resolve(100), 103);
        let fixed = SeedConfig { mode: SeedMode::Fixed, value: 9, offset: 3 };
        assert_eq!(fixed.resolve(100), 12);
    }

    #[test]
    fn out_of_range_fields_are_reported_with_paths() {
        let config = PlateConfig {
            count: 1,
            convergence_mix: 1.5,
            ..Default::default()
        };
        let err = config.validate_at_root().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("count"), "{text}");
        assert!(text.contains("convergence_mix"), "{text}");
    }
}
