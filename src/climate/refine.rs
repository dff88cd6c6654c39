//! Refinement of baseline rainfall once rivers are known.

use glam::Vec2;
use rayon::prelude::*;

use super::config::RefineConfig;
use super::util::{neighbor_mean, step_along};
use crate::geometry::HexGrid;
use crate::morphology::ReliefClass;

/// Layers the refinement reads besides rainfall itself.
#[derive(Debug, Clone, Copy)]
pub struct RefineInputs<'a> {
    pub land_mask: &'a [u8],
    pub relief: &'a [u8],
    pub coast_distance: &'a [u8],
    pub river_class: &'a [u8],
    pub wind_u: &'a [f32],
    pub wind_v: &'a [f32],
}

/// Applies rain shadows, coastal and river boosts, then smoothing.
///
/// Every correction is weighted by `cfg.strength`; a strength of zero
/// returns the input unchanged.
pub fn refine(grid: &HexGrid, rainfall: &[f32], inputs: RefineInputs<'_>, cfg: &RefineConfig) -> Vec<f32> {
    let s = cfg.strength.max(0.0);
    let mut out: Vec<f32> = (0..grid.len())
        .into_par_iter()
        .map(|i| {
            let mut mm = rainfall[i];
            if inputs.land_mask[i] == 0 {
                return mm;
            }

            let here = ReliefClass::from_u8(inputs.relief[i]);
            let upwind = step_along(grid, i, -Vec2::new(inputs.wind_u[i], inputs.wind_v[i]));
            let sheltered = upwind
                .is_some_and(|u| ReliefClass::from_u8(inputs.relief[u]) == ReliefClass::Mountains);
            if sheltered && here != ReliefClass::Mountains {
                mm *= (1.0 - cfg.rain_shadow * s).max(0.0);
            }
            if inputs.coast_distance[i] == 1 {
                mm *= 1.0 + cfg.coastal_boost * s;
            }
            if inputs.river_class[i] > 0 {
                mm *= 1.0 + cfg.river_boost * s;
            }
            mm
        })
        .collect();

    let blend = (0.5 * s).min(1.0);
    if blend > 0.0 {
        for _ in 0..cfg.smoothing_passes {
            let prev = out.clone();
            out.par_iter_mut().enumerate().for_each(|(i, v)| {
                *v = prev[i] * (1.0 - blend) + neighbor_mean(grid, &prev, i) * blend;
            });
        }
    }
    out
}
