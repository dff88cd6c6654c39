//! Priority-Flood depression filling (Barnes et al. 2014) on the hex grid.
//!
//! Water tiles are the outlets. A map with no water drains through its
//! lowest tile.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::HexGrid;

#[derive(Clone, Copy, Debug)]
struct HeapItem {
    height: f32,
    idx: usize,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

// Min-heap by height, then by index, via reversed ordering.
impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .height
            .total_cmp(&self.height)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

/// Returns filled heights (same length as input).
///
/// Every land tile ends at least `epsilon` above the neighbor it was flooded
/// from, so steepest descent on the result reaches an outlet from anywhere.
/// Water tiles keep their height.
pub fn priority_flood_fill(grid: &HexGrid, heights: &[f32], land_mask: &[u8], epsilon: f32) -> Vec<f32> {
    let total = grid.len();
    let mut filled = heights.to_vec();
    let mut visited = vec![false; total];
    let mut heap = BinaryHeap::<HeapItem>::new();

    for idx in 0..total {
        if land_mask[idx] == 0 {
            visited[idx] = true;
            heap.push(HeapItem { height: heights[idx], idx });
        }
    }

    // If nothing is water, fall back to seeding the global minimum.
    if heap.is_empty() && total > 0 {
        let (min_i, min_h) = heights
            .iter()
            .enumerate()
            .fold((0usize, f32::INFINITY), |acc, (i, &h)| if h < acc.1 { (i, h) } else { acc });
        visited[min_i] = true;
        heap.push(HeapItem { height: min_h, idx: min_i });
    }

    while let Some(HeapItem { height: h_cur, idx }) = heap.pop() {
        for n_idx in grid.neighbor_indices(idx) {
            if visited[n_idx] {
                continue;
            }
            visited[n_idx] = true;

            let new_h = filled[n_idx].max(h_cur + epsilon);
            filled[n_idx] = new_h;
            heap.push(HeapItem { height: new_h, idx: n_idx });
        }
    }

    filled
}
