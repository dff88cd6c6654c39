//! Baseline rainfall models.

use glam::Vec2;
use rayon::prelude::*;

use super::config::{LatitudeBandsConfig, MoistureAdvectionConfig};
use super::util::{latitude_of_row, step_along};
use crate::geometry::HexGrid;
use crate::morphology::ReliefClass;

/// Terrain layers rainfall depends on.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceInputs<'a> {
    pub elevation: &'a [f32],
    pub land_mask: &'a [u8],
    pub relief: &'a [u8],
    pub coast_distance: &'a [u8],
}

/// Band rainfall at a latitude, linear between the band centers.
pub fn band_rainfall(latitude_deg: f32, cfg: &LatitudeBandsConfig) -> f32 {
    let knots = [
        (0.0, cfg.equator_mm),
        (25.0, cfg.subtropic_mm),
        (50.0, cfg.temperate_mm),
        (80.0, cfg.polar_mm),
    ];
    let lat = latitude_deg.abs();
    for pair in knots.windows(2) {
        let (l0, v0) = pair[0];
        let (l1, v1) = pair[1];
        if lat <= l1 {
            let t = ((lat - l0) / (l1 - l0)).clamp(0.0, 1.0);
            return v0 + (v1 - v0) * t;
        }
    }
    cfg.polar_mm
}

/// Rainfall (mm/year) from latitude bands with coastal and mountain bonuses.
pub fn latitude_bands(grid: &HexGrid, surface: SurfaceInputs<'_>, cfg: &LatitudeBandsConfig) -> Vec<f32> {
    (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            let (_, y) = grid.coords(idx);
            let mut mm = band_rainfall(latitude_of_row(grid, y), cfg);
            if surface.land_mask[idx] != 0 {
                let inland = surface.coast_distance[idx].saturating_sub(1) as f32;
                mm += cfg.coastal_bonus_mm * (-inland / cfg.coastal_decay_tiles).exp();
                mm += match ReliefClass::from_u8(surface.relief[idx]) {
                    ReliefClass::Mountains => cfg.mountain_bonus_mm,
                    ReliefClass::Hills => cfg.mountain_bonus_mm * 0.5,
                    ReliefClass::Flat => 0.0,
                };
            }
            (mm * cfg.rainfall_scale).max(0.0)
        })
        .collect()
}

/// Rainfall (mm/year) from iterative moisture advection along the wind.
///
/// Each step a tile takes the moisture of its upwind neighbor, picks up
/// evaporation, and rains out a share that grows with the rise toward its
/// downwind neighbor. Steps are Jacobi updates, so every tile reads only
/// the previous step's moisture.
///
/// # Arguments
/// * `grid` - Tile grid
/// * `surface` - Elevation and land mask
/// * `temperature` - Temperature (°C), drives evaporation over water
/// * `wind_u`, `wind_v` - Wind components
/// * `cfg` - Model parameters
pub fn moisture_advection(
    grid: &HexGrid,
    surface: SurfaceInputs<'_>,
    temperature: &[f32],
    wind_u: &[f32],
    wind_v: &[f32],
    cfg: &MoistureAdvectionConfig,
) -> Vec<f32> {
    let total = grid.len();

    let upwind: Vec<Option<usize>> = (0..total)
        .into_par_iter()
        .map(|i| step_along(grid, i, -Vec2::new(wind_u[i], wind_v[i])))
        .collect();
    let downwind: Vec<Option<usize>> = (0..total)
        .into_par_iter()
        .map(|i| step_along(grid, i, Vec2::new(wind_u[i], wind_v[i])))
        .collect();

    let pickup: Vec<f32> = (0..total)
        .map(|i| {
            let evap_w = (temperature[i] / 30.0).clamp(0.0, 1.0);
            let rate = if surface.land_mask[i] == 0 { 1.0 } else { cfg.land_evaporation };
            cfg.evaporation_mm * evap_w * rate
        })
        .collect();

    let rainout = cfg.rainout_rate.clamp(0.0, 1.0);
    let mut moisture = vec![0.0f32; total];
    let mut precip_accum = vec![0.0f32; total];

    let iters = cfg.iterations.max(1);
    for _ in 0..iters {
        let step: Vec<(f32, f32)> = (0..total)
            .into_par_iter()
            .map(|i| {
                let m = upwind[i].map(|u| moisture[u]).unwrap_or(0.0) + pickup[i];

                // Orographic lift proxy using downwind height difference.
                let elev = surface.elevation[i].max(0.0);
                let lift_km = downwind[i]
                    .map(|d| (surface.elevation[d].max(0.0) - elev).max(0.0) / 1000.0)
                    .unwrap_or(0.0);

                let precip = (rainout * m * (1.0 + cfg.orographic_scale.max(0.0) * lift_km)).min(m).max(0.0);
                ((m - precip).max(0.0), precip)
            })
            .collect();

        for (i, (m, p)) in step.into_iter().enumerate() {
            moisture[i] = m;
            precip_accum[i] += p;
        }
    }

    let per_step = cfg.steps_per_year / iters as f32;
    precip_accum
        .into_iter()
        .map(|p| p * per_step * cfg.rainfall_scale)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::config::ThreeCellConfig;
    use crate::climate::wind::three_cell;

    fn flat_surface(n: usize, land: u8) -> (Vec<f32>, Vec<u8>, Vec<u8>, Vec<u8>) {
        (vec![if land == 0 { -100.0 } else { 100.0 }; n], vec![land; n], vec![0; n], vec![5; n])
    }

    #[test]
    fn bands_interpolate_between_knots() {
        let cfg = LatitudeBandsConfig::default();
        assert_eq!(band_rainfall(0.0, &cfg), cfg.equator_mm);
        assert_eq!(band_rainfall(-25.0, &cfg), cfg.subtropic_mm);
        let mid = band_rainfall(37.5, &cfg);
        assert!((mid - (cfg.subtropic_mm + cfg.temperate_mm) / 2.0).abs() < 1e-3);
        assert_eq!(band_rainfall(89.0, &cfg), cfg.polar_mm);
    }

    #[test]
    fn mountains_and_coasts_get_more_rain() {
        let grid = HexGrid::new(3, 1);
        let elevation = vec![100.0; 3];
        let land = vec![1u8; 3];
        let relief = vec![0u8, 2, 0];
        let coast = vec![8u8, 8, 1];
        let cfg = LatitudeBandsConfig::default();
        let rain = latitude_bands(
            &grid,
            SurfaceInputs { elevation: &elevation, land_mask: &land, relief: &relief, coast_distance: &coast },
            &cfg,
        );
        assert!(rain[1] > rain[0]);
        assert!(rain[2] > rain[0]);
    }

    #[test]
    fn advection_precipitation_is_non_negative() {
        let grid = HexGrid::new(16, 12);
        let n = grid.len();
        let (elev, land, relief, coast) = flat_surface(n, 0);
        let temp = vec![25.0; n];
        let (u, v) = three_cell(&grid, &ThreeCellConfig::default());
        let cfg = MoistureAdvectionConfig { iterations: 8, ..Default::default() };
        let rain = moisture_advection(
            &grid,
            SurfaceInputs { elevation: &elev, land_mask: &land, relief: &relief, coast_distance: &coast },
            &temp,
            &u,
            &v,
            &cfg,
        );
        assert!(rain.iter().all(|&p| p >= 0.0));
        assert!(rain.iter().any(|&p| p > 0.0));
    }

    #[test]
    fn orographic_lift_increases_local_precipitation() {
        let grid = HexGrid::new(12, 4);
        let n = grid.len();
        let (mut elev, mut land, relief, coast) = flat_surface(n, 0);
        let temp = vec![28.0; n];
        // Steady westward wind.
        let u = vec![-1.0; n];
        let v = vec![0.0; n];
        let cfg = MoistureAdvectionConfig {
            iterations: 12,
            orographic_scale: 2.0,
            ..Default::default()
        };

        let target = grid.index(6, 1);
        let dn = step_along(&grid, target, Vec2::new(-1.0, 0.0)).unwrap();

        let surface = |e: &[f32], l: &[u8]| moisture_advection(
            &grid,
            SurfaceInputs { elevation: e, land_mask: l, relief: &relief, coast_distance: &coast },
            &temp,
            &u,
            &v,
            &cfg,
        );
        let base = surface(&elev, &land);

        elev[dn] = 1500.0;
        land[dn] = 1;
        let ridge = surface(&elev, &land);

        assert!(
            ridge[target] > base[target],
            "expected orographic lift to increase rain at target (base={}, ridge={})",
            base[target],
            ridge[target]
        );
    }
}
