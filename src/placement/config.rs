//! Start placement strategy configurations.

use serde::{Deserialize, Serialize};

use crate::schema::{check_range, ConfigPath, Issues, Validate};

/// Greedy placement on the most fertile tiles, kept apart by hex distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FertilitySpacedConfig {
    pub player_count: u32,
    /// Preferred minimum hex distance between starts; relaxed when the map is too small.
    pub min_distance: u32,
    /// Fertility bonus for tiles beside a river.
    pub river_bonus: f32,
    /// Fertility bonus for coastal tiles.
    pub coast_bonus: f32,
}

impl Default for FertilitySpacedConfig {
    fn default() -> Self {
        Self {
            player_count: 8,
            min_distance: 8,
            river_bonus: 0.3,
            coast_bonus: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum StartPlacementStrategy {
    FertilitySpaced(FertilitySpacedConfig),
}

impl Default for StartPlacementStrategy {
    fn default() -> Self {
        StartPlacementStrategy::FertilitySpaced(FertilitySpacedConfig::default())
    }
}

impl Validate for StartPlacementStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            StartPlacementStrategy::FertilitySpaced(c) => {
                check_range(issues, path, "player_count", c.player_count as f64, 1.0, 64.0);
                check_range(issues, path, "min_distance", c.min_distance as f64, 1.0, 256.0);
                check_range(issues, path, "river_bonus", c.river_bonus as f64, 0.0, 4.0);
                check_range(issues, path, "coast_bonus", c.coast_bonus as f64, 0.0, 4.0);
            }
        }
    }
}
