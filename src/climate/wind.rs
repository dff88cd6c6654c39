//! Simplified three-cell wind model.

use glam::Vec2;

use super::config::ThreeCellConfig;
use super::util::latitude_of_row;
use crate::geometry::HexGrid;

const EAST: Vec2 = Vec2::new(1.0, 0.0);
const NORTH: Vec2 = Vec2::new(0.0, -1.0);

/// Returns the prevailing wind direction on the map plane at `latitude_deg`.
///
/// This uses a very simplified three-cell approximation:
/// - 0–30°: easterlies (westward)
/// - 30–60°: westerlies (eastward)
/// - 60–90°: polar easterlies (westward)
///
/// Adds a small meridional component that converges toward the ITCZ.
pub fn prevailing_wind(latitude_deg: f32, cfg: &ThreeCellConfig) -> Vec2 {
    let rel_lat = latitude_deg - cfg.itcz_latitude_deg;
    let abs_lat = rel_lat.abs();

    let zonal = if abs_lat < 30.0 {
        -EAST
    } else if abs_lat < 60.0 {
        EAST
    } else {
        -EAST
    };

    let toward_itcz = if rel_lat >= 0.0 { -NORTH } else { NORTH };
    let tropics_w = (1.0 - (abs_lat / 30.0).clamp(0.0, 1.0)).powf(1.5);
    let m = cfg.meridional_strength * tropics_w;

    (zonal * (1.0 - m) + toward_itcz * m).normalize_or_zero()
}

/// Wind components (u east, v south) for every tile.
pub fn three_cell(grid: &HexGrid, cfg: &ThreeCellConfig) -> (Vec<f32>, Vec<f32>) {
    // Wind only varies by row.
    let rows: Vec<Vec2> = (0..grid.height)
        .map(|y| prevailing_wind(latitude_of_row(grid, y), cfg))
        .collect();
    (0..grid.len())
        .map(|idx| {
            let w = rows[grid.coords(idx).1 as usize];
            (w.x, w.y)
        })
        .unzip()
}
