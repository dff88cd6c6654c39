//! Coastline distance on the hex grid.

use std::collections::VecDeque;

use crate::geometry::HexGrid;

/// Hop distance from the shoreline for every land tile.
///
/// Water tiles are 0, land tiles touching water are 1, and every further hop
/// inland adds 1, capped at `max_distance`. A map without water is
/// `max_distance` everywhere on land.
pub fn coast_distance(grid: &HexGrid, land_mask: &[u8], max_distance: u8) -> Vec<u8> {
    let mut dist = vec![u8::MAX; grid.len()];
    let mut q: VecDeque<usize> = VecDeque::new();

    for idx in 0..grid.len() {
        if land_mask[idx] == 0 {
            dist[idx] = 0;
            continue;
        }
        if grid.neighbor_indices(idx).any(|n| land_mask[n] == 0) {
            dist[idx] = 1;
            q.push_back(idx);
        }
    }

    while let Some(idx) = q.pop_front() {
        let d = dist[idx];
        if d >= max_distance {
            continue;
        }
        for n in grid.neighbor_indices(idx) {
            if dist[n] == u8::MAX {
                dist[n] = d + 1;
                q.push_back(n);
            }
        }
    }

    for d in &mut dist {
        if *d == u8::MAX || *d > max_distance {
            *d = max_distance;
        }
    }
    dist
}

/// True for water tiles with at least one land neighbor.
pub fn is_shallow_water(grid: &HexGrid, land_mask: &[u8], idx: usize) -> bool {
    land_mask[idx] == 0 && grid.neighbor_indices(idx).any(|n| land_mask[n] != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coast_distance_is_one_on_coastline() {
        let grid = HexGrid::new(12, 6);
        // Water in columns 0..3, land elsewhere.
        let mask: Vec<u8> = (0..grid.len()).map(|i| u8::from(grid.coords(i).0 >= 3)).collect();
        let dist = coast_distance(&grid, &mask, 32);
        assert_eq!(dist[grid.index(0, 2)], 0);
        assert_eq!(dist[grid.index(3, 2)], 1);
        assert_eq!(dist[grid.index(4, 2)], 2);
        // x wraps, so column 11 touches column 0.
        assert_eq!(dist[grid.index(11, 2)], 1);
        assert_eq!(dist[grid.index(7, 2)], 5);
    }

    #[test]
    fn all_land_is_far_inland() {
        let grid = HexGrid::new(5, 5);
        let dist = coast_distance(&grid, &vec![1; grid.len()], 9);
        assert!(dist.iter().all(|&d| d == 9));
    }

    #[test]
    fn shallow_water_touches_land() {
        let grid = HexGrid::new(6, 4);
        let mask: Vec<u8> = (0..grid.len()).map(|i| u8::from(grid.coords(i).0 == 3)).collect();
        assert!(is_shallow_water(&grid, &mask, grid.index(2, 1)));
        assert!(!is_shallow_water(&grid, &mask, grid.index(0, 1)));
        assert!(!is_shallow_water(&grid, &mask, grid.index(3, 1)));
    }
}
