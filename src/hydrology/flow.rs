//! Flow direction and accumulation.

use rayon::prelude::*;

use crate::geometry::HexGrid;

/// Marker for tiles with no downstream neighbor (sea and sinks).
pub const NO_FLOW: u32 = u32::MAX;

/// For each land tile, the index of its lowest strictly-lower neighbor.
///
/// Water tiles and local minima get [`NO_FLOW`]. Ties keep the first
/// neighbor in direction order.
pub fn flow_directions(grid: &HexGrid, heights: &[f32], land_mask: &[u8]) -> Vec<u32> {
    (0..grid.len())
        .into_par_iter()
        .map(|i| {
            if land_mask[i] == 0 {
                return NO_FLOW;
            }
            let mut best_idx = NO_FLOW;
            let mut best_h = heights[i];
            for n in grid.neighbor_indices(i) {
                if heights[n] < best_h {
                    best_h = heights[n];
                    best_idx = n as u32;
                }
            }
            best_idx
        })
        .collect()
}

/// Contributing area (tile count, self included) given downstream indices.
pub fn flow_accumulation(heights: &[f32], downstream: &[u32]) -> Vec<u32> {
    let total = heights.len();

    // Upstream tiles are strictly higher, so descending height is a topological order.
    let mut order: Vec<usize> = (0..total).collect();
    order.sort_by(|&a, &b| heights[b].total_cmp(&heights[a]));

    let mut accum = vec![1u32; total];
    for &i in &order {
        let d = downstream[i];
        if d != NO_FLOW {
            let d = d as usize;
            accum[d] = accum[d].saturating_add(accum[i]);
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slope_drains_to_sea_and_accumulates() {
        // One row rising east from a sea tile at x = 0; x wraps so the last tile
        // also borders the sea.
        let grid = HexGrid::new(6, 1);
        let h: Vec<f32> = (0..6).map(|x| x as f32 * 10.0).collect();
        let mut land = vec![1u8; 6];
        land[0] = 0;

        let down = flow_directions(&grid, &h, &land);
        assert_eq!(down, vec![NO_FLOW, 0, 1, 2, 3, 0]);

        let acc = flow_accumulation(&h, &down);
        assert_eq!(acc, vec![6, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn local_minimum_is_a_sink() {
        let grid = HexGrid::new(5, 5);
        let mut h = vec![10.0f32; grid.len()];
        let pit = grid.index(2, 2);
        h[pit] = 1.0;
        let land = vec![1u8; grid.len()];
        let down = flow_directions(&grid, &h, &land);
        assert_eq!(down[pit], NO_FLOW);
        for n in grid.neighbor_indices(pit) {
            assert_eq!(down[n], pit as u32);
        }
    }
}
