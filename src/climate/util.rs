//! Shared helpers for climate computations.

use glam::Vec2;

use crate::geometry::HexGrid;

/// Latitude of the top row's upper edge.
pub const TOP_LATITUDE_DEG: f32 = 80.0;
/// Latitude of the bottom row's lower edge.
pub const BOTTOM_LATITUDE_DEG: f32 = -80.0;

/// Latitude (degrees, north positive) of row `y`.
pub fn latitude_of_row(grid: &HexGrid, y: u32) -> f32 {
    grid.latitude_deg(y, TOP_LATITUDE_DEG, BOTTOM_LATITUDE_DEG)
}

/// Map-plane vector from a tile to its neighbor in each direction.
///
/// Odd columns sit half a row lower, so the diagonal steps are half a row
/// tall on both parities. +x is east, +y is south.
pub const DIRECTION_VECTORS: [Vec2; 6] = [
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, -0.5),
    Vec2::new(1.0, 0.5),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 0.5),
    Vec2::new(-1.0, -0.5),
];

/// Neighbor of tile `idx` lying most nearly along `dir`.
///
/// `None` when `dir` is zero or every neighbor in that half-plane is off the map.
pub fn step_along(grid: &HexGrid, idx: usize, dir: Vec2) -> Option<usize> {
    let dir = dir.try_normalize()?;
    let (x, y) = grid.coords(idx);
    let mut best = None;
    let mut best_dot = 0.0f32;
    for (d, v) in DIRECTION_VECTORS.iter().enumerate() {
        let dot = v.normalize().dot(dir);
        if dot > best_dot {
            if let Some((nx, ny)) = grid.neighbor(x, y, d) {
                best_dot = dot;
                best = Some(grid.index(nx, ny));
            }
        }
    }
    best
}

/// Mean of each tile and its neighbors.
pub fn neighbor_mean(grid: &HexGrid, values: &[f32], idx: usize) -> f32 {
    let (sum, n) = grid
        .neighbor_indices(idx)
        .fold((values[idx], 1.0f32), |(s, n), nb| (s + values[nb], n + 1.0));
    sum / n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_spans_the_configured_range() {
        let grid = HexGrid::new(4, 10);
        assert!(latitude_of_row(&grid, 0) > 70.0);
        assert!(latitude_of_row(&grid, 9) < -70.0);
        assert!(latitude_of_row(&grid, 4) > 0.0 && latitude_of_row(&grid, 5) < 0.0);
    }

    #[test]
    fn step_along_follows_direction_and_wraps() {
        let grid = HexGrid::new(6, 5);
        let idx = grid.index(0, 2);
        assert_eq!(step_along(&grid, idx, Vec2::new(0.0, 1.0)), Some(grid.index(0, 3)));
        // Due west from column 0 wraps to column 5; (0, 2) is even so W-ish picks SW or NW.
        let west = step_along(&grid, idx, Vec2::new(-1.0, 0.0)).unwrap();
        assert_eq!(grid.coords(west).0, 5);
        assert_eq!(step_along(&grid, idx, Vec2::ZERO), None);
        // Top row has no northern neighbor.
        assert_eq!(step_along(&grid, grid.index(2, 0), Vec2::new(0.0, -1.0)), None);
    }
}
