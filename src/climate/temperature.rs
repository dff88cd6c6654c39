//! Annual mean temperature model.

use rayon::prelude::*;

use super::config::LatitudeLapseConfig;
use super::util::latitude_of_row;
use crate::geometry::HexGrid;

/// Compute annual temperature (°C) for a point given latitude, elevation, and coast distance.
///
/// # Arguments
/// * `latitude_deg` - Latitude, north positive
/// * `elevation_m` - Height above sea level; ignored for water
/// * `is_water` - Whether the tile is sea
/// * `coast_distance` - Hops from the shoreline (1 on the coast)
/// * `cfg` - Model parameters
pub fn temperature_c(
    latitude_deg: f32,
    elevation_m: f32,
    is_water: bool,
    coast_distance: u8,
    cfg: &LatitudeLapseConfig,
) -> f32 {
    let t = (latitude_deg.abs() / 90.0).clamp(0.0, 1.0);

    // Latitudinal gradient. Nonlinear curve gives larger polar contrast.
    let lat_w = t.powf(cfg.latitude_exponent);
    let baseline = cfg.equator_temp_c * (1.0 - lat_w) + cfg.pole_temp_c * lat_w;

    if is_water {
        return baseline + cfg.offset_c;
    }

    let lapse = cfg.lapse_rate_c_per_km * elevation_m.max(0.0) / 1000.0;
    let mut temp = baseline - lapse;

    // Maritime buffering for land: blend toward an "ocean baseline".
    let inland = coast_distance.saturating_sub(1) as f32;
    let w = (-inland / cfg.maritime_buffer_tiles.max(0.1)).exp().clamp(0.0, 1.0) * 0.5;
    let ocean_baseline = baseline * 0.6 + cfg.ocean_temp_c * 0.4;
    temp = temp * (1.0 - w) + ocean_baseline * w;

    temp + cfg.offset_c
}

/// Temperature for every tile.
pub fn latitude_lapse(
    grid: &HexGrid,
    elevation: &[f32],
    land_mask: &[u8],
    coast_distance: &[u8],
    cfg: &LatitudeLapseConfig,
) -> Vec<f32> {
    (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            let (_, y) = grid.coords(idx);
            temperature_c(
                latitude_of_row(grid, y),
                elevation[idx],
                land_mask[idx] == 0,
                coast_distance[idx],
                cfg,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_is_warmer_than_pole() {
        let cfg = LatitudeLapseConfig::default();
        let equator = temperature_c(0.0, 0.0, false, 30, &cfg);
        let pole = temperature_c(85.0, 0.0, false, 30, &cfg);
        assert!(equator > pole);
    }

    #[test]
    fn higher_elevation_is_colder_by_lapse_rate() {
        let cfg = LatitudeLapseConfig {
            maritime_buffer_tiles: 0.1,
            ..Default::default()
        };
        // Far inland so buffering is negligible.
        let t0 = temperature_c(14.0, 0.0, false, 200, &cfg);
        let t1 = temperature_c(14.0, 1000.0, false, 200, &cfg);
        let actual_drop = t0 - t1;
        assert!(
            (actual_drop - cfg.lapse_rate_c_per_km).abs() < 1e-3,
            "expected drop ~{}, got {}",
            cfg.lapse_rate_c_per_km,
            actual_drop
        );
    }

    #[test]
    fn offset_shifts_every_tile() {
        let base = LatitudeLapseConfig::default();
        let hot = LatitudeLapseConfig { offset_c: 5.0, ..base.clone() };
        for (lat, water) in [(10.0, true), (50.0, false)] {
            let d = temperature_c(lat, 200.0, water, 2, &hot) - temperature_c(lat, 200.0, water, 2, &base);
            assert!((d - 5.0).abs() < 1e-4);
        }
    }
}
