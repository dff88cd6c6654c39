//! Diffusion of boundary classification into plate interiors.
//!
//! Boundary tiles seed their type and intensity. A second BFS, in the same
//! visitation order as the distance field, hands every reached interior tile
//! the boundary tile that reached it first. Derived potentials then follow
//! from the hop distance.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::boundary::{BoundaryClassification, BoundaryMap, BoundaryType, FAR};
use super::plate::PlateRegion;
use crate::geometry::HexGrid;

/// Per-tile tectonic layers of one generation attempt.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TectonicFields {
    pub plate_id: Vec<u8>,
    pub boundary_closeness: Vec<u8>,
    /// [`BoundaryType`] as `u8`.
    pub boundary_type: Vec<u8>,
    pub tectonic_stress: Vec<u8>,
    pub uplift_potential: Vec<u8>,
    pub rift_potential: Vec<u8>,
    /// Always `255 - boundary_closeness`.
    pub shield_stability: Vec<u8>,
    /// Plate velocity at the tile, x100.
    pub plate_movement_u: Vec<i8>,
    pub plate_movement_v: Vec<i8>,
    /// Plate rotation (degrees, scaled by the global multiplier) x100.
    pub plate_rotation: Vec<i8>,
    /// Hops to the nearest boundary; [`FAR`] when out of reach.
    pub distance_field: Vec<u8>,
}

impl TectonicFields {
    pub fn len(&self) -> usize {
        self.plate_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plate_id.is_empty()
    }

    pub fn is_boundary(&self, idx: usize) -> bool {
        self.distance_field[idx] == 0
    }

    pub fn boundary_type_at(&self, idx: usize) -> BoundaryType {
        BoundaryType::from_u8(self.boundary_type[idx])
    }
}

/// Output of [`diffuse_influence`].
#[derive(Debug, Clone)]
pub struct InfluenceFields {
    pub closeness: Vec<u8>,
    pub boundary_type: Vec<u8>,
    pub stress: Vec<u8>,
    pub uplift: Vec<u8>,
    pub rift: Vec<u8>,
    pub shield: Vec<u8>,
    /// Boundary tile each tile inherited its classification from.
    pub source: Vec<Option<usize>>,
}

/// `round(255 * exp(-distance * decay))`.
#[inline]
pub fn closeness_at(distance: u8, decay: f32) -> u8 {
    (255.0 * (-(distance as f32) * decay).exp()).round().clamp(0.0, 255.0) as u8
}

/// Boundary tile that reached each tile first in the distance BFS.
///
/// Walks the precomputed distance field level by level from the boundary tiles
/// in ascending index order; a neighbor one hop further out takes the source
/// of the first tile that visits it.
pub fn inherit_sources(grid: &HexGrid, boundaries: &BoundaryMap, distance: &[u8]) -> Vec<Option<usize>> {
    let mut source: Vec<Option<usize>> = vec![None; grid.len()];
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(boundaries.count());

    for &idx in &boundaries.tiles {
        source[idx] = Some(idx);
        queue.push_back(idx);
    }

    while let Some(idx) = queue.pop_front() {
        let d = distance[idx];
        let from = source[idx];
        for n in grid.neighbor_indices(idx) {
            if source[n].is_none() && distance[n] != FAR && distance[n] == d + 1 {
                source[n] = from;
                queue.push_back(n);
            }
        }
    }

    source
}

/// Derives closeness, type, stress, uplift, rift and shield for every tile.
///
/// # Arguments
/// * `grid` - Tile grid
/// * `boundaries` - Boundary tiles of the attempt
/// * `classification` - Type and intensity of every boundary tile
/// * `distance` - Capped distance field from [`super::boundary::distance_field`]
/// * `max_influence_distance` - Tiles at or beyond this many hops are reset
/// * `decay` - Closeness decay per hop
pub fn diffuse_influence(
    grid: &HexGrid,
    boundaries: &BoundaryMap,
    classification: &BoundaryClassification,
    distance: &[u8],
    max_influence_distance: u32,
    decay: f32,
) -> InfluenceFields {
    let source = inherit_sources(grid, boundaries, distance);
    let n = grid.len();

    let mut fields = InfluenceFields {
        closeness: vec![0; n],
        boundary_type: vec![BoundaryType::None.as_u8(); n],
        stress: vec![0; n],
        uplift: vec![0; n],
        rift: vec![0; n],
        shield: vec![255; n],
        source,
    };

    for idx in 0..n {
        let d = distance[idx];
        if d == FAR || d as u32 >= max_influence_distance {
            continue;
        }
        let Some(src) = fields.source[idx] else {
            continue;
        };

        let ty = classification.boundary_type[src];
        let closeness = closeness_at(d, decay);
        let quarter = closeness >> 2;

        fields.closeness[idx] = closeness;
        fields.boundary_type[idx] = ty.as_u8();
        fields.shield[idx] = 255 - closeness;
        fields.stress[idx] = (closeness as u32 * classification.intensity[src] as u32 / 255) as u8;
        fields.uplift[idx] = if ty == BoundaryType::Convergent { closeness } else { quarter };
        fields.rift[idx] = if ty == BoundaryType::Divergent { closeness } else { quarter };
    }

    fields
}

#[inline]
fn scale_to_i8(v: f32) -> i8 {
    (v * 100.0).round().clamp(-127.0, 127.0) as i8
}

/// Per-tile plate velocity (u, v) and rotation, scaled by 100 and clamped.
pub fn movement_fields(
    grid: &HexGrid,
    plate_ids: &[u8],
    plates: &[PlateRegion],
    rotation_multiplier: f32,
) -> (Vec<i8>, Vec<i8>, Vec<i8>) {
    let n = grid.len();
    let mut u = Vec::with_capacity(n);
    let mut v = Vec::with_capacity(n);
    let mut rot = Vec::with_capacity(n);
    for (idx, &id) in plate_ids.iter().enumerate() {
        let plate = &plates[id as usize];
        let (x, y) = grid.coords(idx);
        let vel = plate.velocity_at(grid.tile_position(x, y), rotation_multiplier);
        u.push(scale_to_i8(vel.x));
        v.push(scale_to_i8(vel.y));
        rot.push(scale_to_i8(plate.rotation * rotation_multiplier));
    }
    (u, v, rot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tectonics::boundary::{detect_boundaries, distance_field};
    use glam::Vec2;

    fn striped(grid: &HexGrid, split: u32) -> Vec<u8> {
        (0..grid.len())
            .map(|i| if grid.coords(i).0 < split { 0 } else { 1 })
            .collect()
    }

    fn classification_with(grid: &HexGrid, map: &BoundaryMap, ty: BoundaryType) -> BoundaryClassification {
        let mut boundary_type = vec![BoundaryType::None; grid.len()];
        let mut intensity = vec![0u8; grid.len()];
        for &idx in &map.tiles {
            boundary_type[idx] = ty;
            intensity[idx] = 200;
        }
        BoundaryClassification {
            boundary_type,
            intensity,
        }
    }

    #[test]
    fn closeness_matches_exponential_decay() {
        assert_eq!(closeness_at(0, 0.7), 255);
        assert_eq!(closeness_at(1, 0.7), (255.0f32 * (-0.7f32).exp()).round() as u8);
        assert!(closeness_at(3, 0.7) < closeness_at(2, 0.7));
    }

    #[test]
    fn fields_reset_beyond_influence_distance() {
        let grid = HexGrid::new(24, 6);
        let ids = striped(&grid, 12);
        let map = detect_boundaries(&grid, &ids);
        let max = 3;
        let dist = distance_field(&grid, &map, max);
        let class = classification_with(&grid, &map, BoundaryType::Convergent);
        let f = diffuse_influence(&grid, &map, &class, &dist, max, 0.7);

        for idx in 0..grid.len() {
            assert_eq!(f.shield[idx], 255 - f.closeness[idx]);
            if dist[idx] == FAR || dist[idx] as u32 >= max {
                assert_eq!(f.closeness[idx], 0);
                assert_eq!(f.boundary_type[idx], BoundaryType::None.as_u8());
                assert_eq!(f.stress[idx], 0);
                assert_eq!(f.uplift[idx], 0);
                assert_eq!(f.rift[idx], 0);
            } else {
                assert!(f.closeness[idx] > 0);
                assert_eq!(f.boundary_type[idx], BoundaryType::Convergent.as_u8());
            }
        }
    }

    #[test]
    fn dominant_type_gets_full_potential_and_others_a_quarter() {
        let grid = HexGrid::new(24, 6);
        let ids = striped(&grid, 12);
        let map = detect_boundaries(&grid, &ids);
        let dist = distance_field(&grid, &map, 4);
        let class = classification_with(&grid, &map, BoundaryType::Divergent);
        let f = diffuse_influence(&grid, &map, &class, &dist, 4, 0.7);

        let idx = grid.index(10, 3);
        assert_eq!(dist[idx], 1);
        assert_eq!(f.rift[idx], f.closeness[idx]);
        assert_eq!(f.uplift[idx], f.closeness[idx] >> 2);
        assert_eq!(f.stress[idx], (f.closeness[idx] as u32 * 200 / 255) as u8);
    }

    #[test]
    fn sources_are_boundary_tiles_at_matching_distance() {
        let grid = HexGrid::new(20, 10);
        let ids: Vec<u8> = (0..grid.len())
            .map(|i| {
                let (x, y) = grid.coords(i);
                if x < 8 && y < 5 {
                    0
                } else if x < 14 {
                    1
                } else {
                    2
                }
            })
            .collect();
        let map = detect_boundaries(&grid, &ids);
        let dist = distance_field(&grid, &map, 5);
        let source = inherit_sources(&grid, &map, &dist);
        for idx in 0..grid.len() {
            match source[idx] {
                Some(src) => {
                    assert!(map.is_boundary(src));
                    assert!(grid.hex_distance(grid.coords(idx), grid.coords(src)) <= dist[idx] as u32);
                }
                None => assert_eq!(dist[idx], FAR),
            }
        }
    }

    #[test]
    fn movement_fields_are_scaled_and_clamped() {
        let grid = HexGrid::new(4, 4);
        let mut a = PlateRegion::stationary(0, Vec2::new(0.0, 0.0));
        a.movement = Vec2::new(0.5, -2.0);
        let ids = vec![0u8; grid.len()];
        let (u, v, rot) = movement_fields(&grid, &ids, &[a], 1.0);
        assert!(u.iter().all(|&x| x == 50));
        assert!(v.iter().all(|&x| x == -127));
        assert!(rot.iter().all(|&r| r == 0));
    }
}
