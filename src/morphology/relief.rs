//! Hills and mountains.

use serde::{Deserialize, Serialize};

use super::config::UpliftThresholdConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReliefClass {
    Flat = 0,
    Hills = 1,
    Mountains = 2,
}

impl ReliefClass {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => ReliefClass::Hills,
            2 => ReliefClass::Mountains,
            _ => ReliefClass::Flat,
        }
    }
}

/// Classifies land tiles by uplift potential, rift potential and height above sea level.
///
/// Water tiles are always flat.
pub fn uplift_threshold(
    elevation: &[f32],
    land_mask: &[u8],
    uplift: &[u8],
    rift: &[u8],
    cfg: &UpliftThresholdConfig,
) -> Vec<u8> {
    (0..elevation.len())
        .map(|idx| {
            if land_mask[idx] == 0 {
                return ReliefClass::Flat;
            }
            let e = elevation[idx];
            if uplift[idx] >= cfg.mountain_uplift || e >= cfg.mountain_elevation_m {
                ReliefClass::Mountains
            } else if uplift[idx] >= cfg.hill_uplift || e >= cfg.hill_elevation_m || rift[idx] >= cfg.rift_hill {
                ReliefClass::Hills
            } else {
                ReliefClass::Flat
            }
        })
        .map(ReliefClass::as_u8)
        .collect()
}
