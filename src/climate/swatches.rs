//! Large-scale wet and dry belts.

use rand::Rng;

use super::config::MacroBeltsConfig;
use crate::geometry::HexGrid;

/// Scales rainfall inside randomly placed latitude belts.
///
/// Each belt has a random center row and sign; rainfall at its center is
/// multiplied by `1 ± amplitude`, falling off linearly to no change at
/// `half_width` of the map height away.
pub fn macro_belts<R: Rng>(grid: &HexGrid, rainfall: &mut [f32], cfg: &MacroBeltsConfig, rng: &mut R) {
    let height = grid.height as f32;
    let half = (cfg.half_width * height).max(0.5);
    let belts: Vec<(f32, f32)> = (0..cfg.belt_count)
        .map(|_| {
            let center = rng.random_range(0.0..height);
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            (center, sign)
        })
        .collect();

    let factors: Vec<f32> = (0..grid.height)
        .map(|y| {
            let row = y as f32 + 0.5;
            belts.iter().fold(1.0f32, |f, &(center, sign)| {
                let w = (1.0 - (row - center).abs() / half).max(0.0);
                f * (1.0 + sign * cfg.amplitude * w)
            })
        })
        .collect();

    for (idx, mm) in rainfall.iter_mut().enumerate() {
        let (_, y) = grid.coords(idx);
        *mm = (*mm * factors[y as usize]).max(0.0);
    }
}
