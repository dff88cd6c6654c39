//! Base elevation from crust type and tectonic potentials.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use super::config::CrustUpliftConfig;
use crate::geometry::HexGrid;
use crate::tectonics::assign::plate_tile_counts;

/// Crust value of oceanic tiles.
pub const OCEANIC: u8 = 0;
/// Crust value of continental tiles.
pub const CONTINENTAL: u8 = 1;

/// Tectonic layers the elevation model reads.
#[derive(Debug, Clone, Copy)]
pub struct TectonicInputs<'a> {
    pub plate_id: &'a [u8],
    pub uplift: &'a [u8],
    pub rift: &'a [u8],
    pub shield: &'a [u8],
}

/// Marks plates continental, in random order, until `fraction` of the tiles are covered.
pub fn continental_plates<R: Rng>(plate_id: &[u8], plate_count: usize, fraction: f32, rng: &mut R) -> Vec<bool> {
    let counts = plate_tile_counts(plate_id, plate_count);
    let total = plate_id.len().max(1) as f32;
    let mut order: Vec<usize> = (0..plate_count).collect();
    order.shuffle(rng);

    let mut continental = vec![false; plate_count];
    let mut covered = 0usize;
    for p in order {
        if covered as f32 / total >= fraction {
            break;
        }
        continental[p] = true;
        covered += counts[p];
    }
    continental
}

/// Uniform noise in [-1, 1] smoothed by neighbor averaging.
pub fn smoothed_noise<R: Rng>(grid: &HexGrid, passes: u32, rng: &mut R) -> Vec<f32> {
    let mut noise: Vec<f32> = (0..grid.len()).map(|_| rng.random::<f32>() * 2.0 - 1.0).collect();
    for _ in 0..passes {
        noise = (0..grid.len())
            .into_par_iter()
            .map(|idx| {
                let (sum, n) = grid
                    .neighbor_indices(idx)
                    .fold((noise[idx], 1.0f32), |(s, n), nb| (s + noise[nb], n + 1.0));
                sum / n
            })
            .collect();
    }
    // Averaging shrinks the spread; stretch back to [-1, 1].
    let peak = noise.iter().fold(0.0f32, |m, v| m.max(v.abs()));
    if peak > 0.0 {
        noise.iter_mut().for_each(|v| *v /= peak);
    }
    noise
}

/// Computes elevation (m) and crust type for every tile.
///
/// # Arguments
/// * `grid` - Tile grid
/// * `tectonics` - Plate ids and boundary potentials
/// * `plate_count` - Number of plates
/// * `cfg` - Elevation parameters
/// * `rng` - Stage random source
pub fn crust_uplift<R: Rng>(
    grid: &HexGrid,
    tectonics: TectonicInputs<'_>,
    plate_count: usize,
    cfg: &CrustUpliftConfig,
    rng: &mut R,
) -> (Vec<f32>, Vec<u8>) {
    let continental = continental_plates(tectonics.plate_id, plate_count, cfg.continental_fraction, rng);
    let noise = smoothed_noise(grid, cfg.smoothing_passes, rng);

    (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            let is_continental = continental
                .get(tectonics.plate_id[idx] as usize)
                .copied()
                .unwrap_or(false);
            let unit = |v: u8| v as f32 / 255.0;

            let base = if is_continental {
                cfg.continental_shelf_m + unit(tectonics.shield[idx]) * cfg.shield_bonus_m
            } else {
                cfg.ocean_floor_m
            };
            let elevation = base + unit(tectonics.uplift[idx]) * cfg.uplift_scale_m
                - unit(tectonics.rift[idx]) * cfg.rift_scale_m
                + noise[idx] * cfg.roughness_m;
            let crust = if is_continental { CONTINENTAL } else { OCEANIC };
            (elevation, crust)
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn continental_share_reaches_the_target() {
        let ids: Vec<u8> = (0..100).map(|i| (i / 10) as u8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let cont = continental_plates(&ids, 10, 0.35, &mut rng);
        assert_eq!(cont.iter().filter(|&&c| c).count(), 4);
        let none = continental_plates(&ids, 10, 0.0, &mut rng);
        assert!(none.iter().all(|&c| !c));
    }

    #[test]
    fn uplift_raises_and_rift_lowers() {
        let grid = HexGrid::new(2, 2);
        let cfg = CrustUpliftConfig {
            continental_fraction: 1.0,
            roughness_m: 0.0,
            ..Default::default()
        };
        let ids = [0u8; 4];
        let uplift = [0u8, 255, 0, 0];
        let rift = [0u8, 0, 255, 0];
        let shield = [255u8; 4];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (elev, crust) = crust_uplift(
            &grid,
            TectonicInputs { plate_id: &ids, uplift: &uplift, rift: &rift, shield: &shield },
            1,
            &cfg,
            &mut rng,
        );
        assert!(crust.iter().all(|&c| c == CONTINENTAL));
        let flat = cfg.continental_shelf_m + cfg.shield_bonus_m;
        assert!((elev[0] - flat).abs() < 1e-3);
        assert!((elev[1] - (flat + cfg.uplift_scale_m)).abs() < 1e-3);
        assert!((elev[2] - (flat - cfg.rift_scale_m)).abs() < 1e-3);
    }

    #[test]
    fn smoothed_noise_stays_in_unit_range() {
        let grid = HexGrid::new(16, 12);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let noise = smoothed_noise(&grid, 3, &mut rng);
        assert!(noise.iter().all(|v| (-1.0..=1.0).contains(v)));
        assert!(noise.iter().any(|&v| v != noise[0]));
    }
}
