//! Hydrography strategy configurations.

use serde::{Deserialize, Serialize};

use crate::schema::{check_range, ConfigError, ConfigPath, Issues, Validate};

/// Flow routing by steepest descent over a depression-filled surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SteepestDescentConfig {
    /// Fill closed basins before routing so every land tile drains to the sea.
    pub fill_depressions: bool,
    /// Minimum drop (m) imposed across filled flats.
    pub epsilon_m: f32,
}

impl Default for SteepestDescentConfig {
    fn default() -> Self {
        Self {
            fill_depressions: true,
            epsilon_m: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum FlowStrategy {
    SteepestDescent(SteepestDescentConfig),
}

impl Default for FlowStrategy {
    fn default() -> Self {
        FlowStrategy::SteepestDescent(SteepestDescentConfig::default())
    }
}

impl Validate for FlowStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            FlowStrategy::SteepestDescent(c) => {
                check_range(issues, path, "epsilon_m", c.epsilon_m as f64, 0.0, 10.0);
            }
        }
    }
}

/// Rivers where upstream area crosses fixed thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AccumulationThresholdConfig {
    /// Upstream tile count for a minor river.
    pub minor_threshold: u32,
    /// Upstream tile count for a major river.
    pub major_threshold: u32,
    /// Tiles drier than this never carry a river.
    pub min_rainfall_mm: f32,
}

impl Default for AccumulationThresholdConfig {
    fn default() -> Self {
        Self {
            minor_threshold: 6,
            major_threshold: 24,
            min_rainfall_mm: 250.0,
        }
    }
}

impl AccumulationThresholdConfig {
    /// Multiplies both thresholds, keeping them at least 1 and ordered.
    pub fn scale_thresholds(&mut self, factor: f32) {
        self.minor_threshold = ((self.minor_threshold as f32 * factor).round() as u32).max(1);
        self.major_threshold = ((self.major_threshold as f32 * factor).round() as u32).max(self.minor_threshold);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum RiverStrategy {
    AccumulationThreshold(AccumulationThresholdConfig),
}

impl Default for RiverStrategy {
    fn default() -> Self {
        RiverStrategy::AccumulationThreshold(AccumulationThresholdConfig::default())
    }
}

impl Validate for RiverStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            RiverStrategy::AccumulationThreshold(c) => {
                check_range(issues, path, "minor_threshold", c.minor_threshold as f64, 1.0, 1.0e6);
                check_range(issues, path, "major_threshold", c.major_threshold as f64, 1.0, 1.0e6);
                check_range(issues, path, "min_rainfall_mm", c.min_rainfall_mm as f64, 0.0, 10000.0);
                if c.major_threshold < c.minor_threshold {
                    issues.push(ConfigError::Invalid {
                        path: path.child("major_threshold"),
                        message: "must be at least minor_threshold".to_string(),
                    });
                }
            }
        }
    }
}
