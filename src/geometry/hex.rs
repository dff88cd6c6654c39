//! Offset hex grid topology.
//!
//! Tiles are laid out in columns ("odd-q"): odd columns sit half a tile lower
//! than even columns, so the neighbor table depends on the parity of `x`.
//! The grid wraps horizontally (x modulo width) and is clamped vertically
//! (rows 0 and `height - 1` are the poles).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Neighbor offsets for even columns, in direction order N, NE, SE, S, SW, NW.
pub const EVEN_COLUMN_OFFSETS: [(i32, i32); 6] = [(0, -1), (1, -1), (1, 0), (0, 1), (-1, 0), (-1, -1)];

/// Neighbor offsets for odd columns, in direction order N, NE, SE, S, SW, NW.
pub const ODD_COLUMN_OFFSETS: [(i32, i32); 6] = [(0, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];

/// A width × height hex grid with cylindrical wrap on x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexGrid {
    pub width: u32,
    pub height: u32,
}

impl HexGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of `(x, y)`, `y * width + x`.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Inverse of [`HexGrid::index`].
    #[inline]
    pub fn coords(&self, idx: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((idx % w) as u32, (idx / w) as u32)
    }

    /// Continuous position of a tile, used for Voronoi sites and plate kinematics.
    #[inline]
    pub fn tile_position(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(x as f32, y as f32)
    }

    /// Offset table for column `x`.
    #[inline]
    pub fn offsets(x: u32) -> &'static [(i32, i32); 6] {
        if x & 1 == 0 {
            &EVEN_COLUMN_OFFSETS
        } else {
            &ODD_COLUMN_OFFSETS
        }
    }

    /// Neighbor of `(x, y)` in direction `dir` (0..6), or `None` past a pole.
    #[inline]
    pub fn neighbor(&self, x: u32, y: u32, dir: usize) -> Option<(u32, u32)> {
        let (dx, dy) = Self::offsets(x)[dir];
        let ny = y as i32 + dy;
        if ny < 0 || ny >= self.height as i32 {
            return None;
        }
        let w = self.width as i32;
        let nx = (x as i32 + dx).rem_euclid(w);
        Some((nx as u32, ny as u32))
    }

    /// All valid neighbors of `(x, y)` in the fixed direction order.
    ///
    /// Never allocates; the returned iterator holds at most six coordinates.
    #[inline]
    pub fn neighbors(&self, x: u32, y: u32) -> Neighbors {
        let mut out = Neighbors {
            coords: [(0, 0); 6],
            len: 0,
            pos: 0,
        };
        for dir in 0..6 {
            if let Some(c) = self.neighbor(x, y, dir) {
                out.coords[out.len] = c;
                out.len += 1;
            }
        }
        out
    }

    /// Neighbor flat indices of tile `idx`, in the fixed direction order.
    #[inline]
    pub fn neighbor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let (x, y) = self.coords(idx);
        self.neighbors(x, y).map(move |(nx, ny)| self.index(nx, ny))
    }

    /// Latitude in degrees of row `y`, interpolated between the top and bottom row latitudes.
    pub fn latitude_deg(&self, y: u32, top_deg: f32, bottom_deg: f32) -> f32 {
        let t = (y as f32 + 0.5) / self.height.max(1) as f32;
        top_deg + (bottom_deg - top_deg) * t
    }

    /// Hex step distance between two tiles, taking the horizontal wrap into account.
    pub fn hex_distance(&self, a: (u32, u32), b: (u32, u32)) -> u32 {
        let w = self.width as i32;
        [-w, 0, w]
            .into_iter()
            .map(|shift| cube_distance(a.0 as i32, a.1 as i32, b.0 as i32 + shift, b.1 as i32))
            .min()
            .unwrap_or(0)
    }
}

fn offset_to_cube(x: i32, y: i32) -> (i32, i32, i32) {
    let q = x;
    let r = y - (x - (x & 1)) / 2;
    (q, r, -q - r)
}

fn cube_distance(x0: i32, y0: i32, x1: i32, y1: i32) -> u32 {
    let (q0, r0, s0) = offset_to_cube(x0, y0);
    let (q1, r1, s1) = offset_to_cube(x1, y1);
    (q0 - q1).unsigned_abs().max((r0 - r1).unsigned_abs()).max((s0 - s1).unsigned_abs())
}

/// Up to six neighbor coordinates, yielded in direction order.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors {
    coords: [(u32, u32); 6],
    len: usize,
    pos: usize,
}

impl Neighbors {
    pub fn as_slice(&self) -> &[(u32, u32)] {
        &self.coords[self.pos..self.len]
    }
}

impl Iterator for Neighbors {
    type Item = (u32, u32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.len {
            let c = self.coords[self.pos];
            self.pos += 1;
            Some(c)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.pos;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Neighbors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_tile_has_six_neighbors() {
        let grid = HexGrid::new(8, 8);
        assert_eq!(grid.neighbors(3, 3).len(), 6);
        assert_eq!(grid.neighbors(4, 4).len(), 6);
    }

    #[test]
    fn poles_are_clamped() {
        let grid = HexGrid::new(8, 8);
        // Even column on the top row loses N, NE, NW.
        assert_eq!(grid.neighbors(2, 0).len(), 3);
        // Odd column on the top row loses only N.
        assert_eq!(grid.neighbors(3, 0).len(), 5);
        // Odd column on the bottom row loses SE, S, SW.
        assert_eq!(grid.neighbors(3, 7).len(), 3);
    }

    #[test]
    fn x_wraps_around() {
        let grid = HexGrid::new(8, 8);
        let n: Vec<_> = grid.neighbors(0, 3).collect();
        assert!(n.contains(&(7, 3)));
        assert!(n.contains(&(7, 2)));
        let n: Vec<_> = grid.neighbors(7, 3).collect();
        assert!(n.contains(&(0, 3)));
        assert!(n.contains(&(0, 4)));
    }

    #[test]
    fn direction_order_is_fixed() {
        let grid = HexGrid::new(8, 8);
        let even: Vec<_> = grid.neighbors(2, 3).collect();
        assert_eq!(even, vec![(2, 2), (3, 2), (3, 3), (2, 4), (1, 3), (1, 2)]);
        let odd: Vec<_> = grid.neighbors(3, 3).collect();
        assert_eq!(odd, vec![(3, 2), (4, 3), (4, 4), (3, 4), (2, 4), (2, 3)]);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let grid = HexGrid::new(10, 7);
        for idx in 0..grid.len() {
            for n in grid.neighbor_indices(idx) {
                assert!(
                    grid.neighbor_indices(n).any(|m| m == idx),
                    "{idx} -> {n} is not mirrored"
                );
            }
        }
    }

    #[test]
    fn hex_distance_matches_neighbors_and_wraps() {
        let grid = HexGrid::new(10, 10);
        for (nx, ny) in grid.neighbors(5, 5) {
            assert_eq!(grid.hex_distance((5, 5), (nx, ny)), 1);
        }
        assert_eq!(grid.hex_distance((0, 4), (9, 4)), 1);
        assert_eq!(grid.hex_distance((2, 2), (2, 6)), 4);
    }

    #[test]
    fn index_round_trips() {
        let grid = HexGrid::new(7, 5);
        for idx in 0..grid.len() {
            let (x, y) = grid.coords(idx);
            assert_eq!(grid.index(x, y), idx);
        }
    }
}
