//! Plate boundary detection, boundary distance field and boundary physics.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::BoundaryThresholds;
use super::plate::PlateRegion;
use crate::geometry::HexGrid;

/// Distance value for tiles the capped BFS never reached.
pub const FAR: u8 = u8::MAX;

/// Type of plate boundary based on relative motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum BoundaryType {
    /// Not a boundary, or relative motion too small to matter.
    #[default]
    None = 0,
    /// Plates moving toward each other.
    Convergent = 1,
    /// Plates moving apart.
    Divergent = 2,
    /// Plates sliding past each other.
    Transform = 3,
}

impl BoundaryType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => BoundaryType::Convergent,
            2 => BoundaryType::Divergent,
            3 => BoundaryType::Transform,
            _ => BoundaryType::None,
        }
    }
}

/// Boundary tiles of a plate assignment.
#[derive(Debug, Clone)]
pub struct BoundaryMap {
    /// Plate of the first differing neighbor (fixed direction order), per tile.
    pub neighbor_plate: Vec<Option<u8>>,
    /// Boundary tile indices in ascending order.
    pub tiles: Vec<usize>,
}

impl BoundaryMap {
    #[inline]
    pub fn is_boundary(&self, idx: usize) -> bool {
        self.neighbor_plate[idx].is_some()
    }

    pub fn count(&self) -> usize {
        self.tiles.len()
    }
}

/// Flags every tile with a neighbor on another plate.
pub fn detect_boundaries(grid: &HexGrid, plate_ids: &[u8]) -> BoundaryMap {
    debug_assert_eq!(plate_ids.len(), grid.len());
    let neighbor_plate: Vec<Option<u8>> = (0..grid.len())
        .map(|idx| {
            let own = plate_ids[idx];
            grid.neighbor_indices(idx)
                .map(|n| plate_ids[n])
                .find(|&other| other != own)
        })
        .collect();
    let tiles = neighbor_plate
        .iter()
        .enumerate()
        .filter_map(|(idx, n)| n.map(|_| idx))
        .collect();
    BoundaryMap { neighbor_plate, tiles }
}

/// Hop distance to the nearest boundary tile.
///
/// Multi-source FIFO BFS seeded with all boundary tiles at once. Expansion stops
/// at `max_influence_distance + 1` hops; tiles beyond stay [`FAR`].
pub fn distance_field(grid: &HexGrid, boundaries: &BoundaryMap, max_influence_distance: u32) -> Vec<u8> {
    let cap = (max_influence_distance + 1).min(FAR as u32 - 1) as u8;
    let mut dist = vec![FAR; grid.len()];
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(boundaries.count());

    for &idx in &boundaries.tiles {
        dist[idx] = 0;
        queue.push_back(idx);
    }

    while let Some(idx) = queue.pop_front() {
        let d = dist[idx];
        if d >= cap {
            continue;
        }
        for n in grid.neighbor_indices(idx) {
            if dist[n] == FAR {
                dist[n] = d + 1;
                queue.push_back(n);
            }
        }
    }

    dist
}

/// Relative plate motion across a boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryMotion {
    /// Relative motion along the seed-to-seed normal; positive means approaching.
    pub subduction: f32,
    /// Magnitude of relative motion along the boundary.
    pub sliding: f32,
}

impl BoundaryMotion {
    pub fn classify(&self, thresholds: &BoundaryThresholds) -> BoundaryType {
        if self.subduction > thresholds.convergent {
            BoundaryType::Convergent
        } else if self.subduction < thresholds.divergent {
            BoundaryType::Divergent
        } else if self.sliding > thresholds.transform {
            BoundaryType::Transform
        } else {
            BoundaryType::None
        }
    }

    /// Activity in 0..=1, full at `thresholds.intensity_scale`.
    pub fn intensity(&self, thresholds: &BoundaryThresholds) -> f32 {
        ((self.subduction.abs() + self.sliding) / thresholds.intensity_scale).clamp(0.0, 1.0)
    }
}

/// Decomposes the relative motion of `this` and `other` at `pos`.
pub fn boundary_motion(this: &PlateRegion, other: &PlateRegion, pos: Vec2, rotation_multiplier: f32) -> BoundaryMotion {
    let v_this = this.velocity_at(pos, rotation_multiplier);
    let v_other = other.velocity_at(pos, rotation_multiplier);
    let normal = (other.seed - this.seed).normalize_or_zero();
    let tangent = normal.perp();
    BoundaryMotion {
        subduction: normal.dot(v_this) - normal.dot(v_other),
        sliding: (tangent.dot(v_this) - tangent.dot(v_other)).abs(),
    }
}

/// Classification of each boundary tile.
#[derive(Debug, Clone)]
pub struct BoundaryClassification {
    /// Per tile; `None` for interior tiles.
    pub boundary_type: Vec<BoundaryType>,
    /// Per tile boundary intensity, 0 for interior tiles.
    pub intensity: Vec<u8>,
}

/// Classifies every boundary tile from its plate and its recorded neighbor plate.
pub fn classify_boundaries(
    grid: &HexGrid,
    boundaries: &BoundaryMap,
    plate_ids: &[u8],
    plates: &[PlateRegion],
    rotation_multiplier: f32,
    thresholds: &BoundaryThresholds,
) -> BoundaryClassification {
    let mut boundary_type = vec![BoundaryType::None; grid.len()];
    let mut intensity = vec![0u8; grid.len()];

    for &idx in &boundaries.tiles {
        let Some(other_id) = boundaries.neighbor_plate[idx] else {
            continue;
        };
        let this = &plates[plate_ids[idx] as usize];
        let other = &plates[other_id as usize];
        let (x, y) = grid.coords(idx);
        let motion = boundary_motion(this, other, grid.tile_position(x, y), rotation_multiplier);
        boundary_type[idx] = motion.classify(thresholds);
        intensity[idx] = (motion.intensity(thresholds) * 255.0).round() as u8;
    }

    BoundaryClassification {
        boundary_type,
        intensity,
    }
}
