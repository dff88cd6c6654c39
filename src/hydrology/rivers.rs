//! River classes from flow accumulation.

use serde::{Deserialize, Serialize};

use super::config::AccumulationThresholdConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RiverClass {
    None = 0,
    Minor = 1,
    Major = 2,
}

impl RiverClass {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => RiverClass::Minor,
            2 => RiverClass::Major,
            _ => RiverClass::None,
        }
    }
}

/// Classifies land tiles by contributing area; water and dry tiles carry no river.
pub fn accumulation_threshold(
    accumulation: &[u32],
    land_mask: &[u8],
    rainfall: &[f32],
    cfg: &AccumulationThresholdConfig,
) -> Vec<u8> {
    (0..accumulation.len())
        .map(|i| {
            let class = if land_mask[i] == 0 || rainfall[i] < cfg.min_rainfall_mm {
                RiverClass::None
            } else if accumulation[i] >= cfg.major_threshold {
                RiverClass::Major
            } else if accumulation[i] >= cfg.minor_threshold {
                RiverClass::Minor
            } else {
                RiverClass::None
            };
            class.as_u8()
        })
        .collect()
}
