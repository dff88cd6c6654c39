//! Nearest-seed plate assignment for cells and tiles.

use glam::Vec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::TectonicError;
use super::plate::PlateRegion;
use super::voronoi::VoronoiMesh;
use crate::geometry::HexGrid;

/// A fine Voronoi cell with its owning plate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionCell {
    pub site: Vec2,
    pub area: f32,
    pub plate_id: usize,
}

/// Index of the plate whose seed is nearest to `pos` by squared distance.
///
/// Ties go to the first plate in seed order. `None` only for an empty plate list.
pub fn nearest_plate(plates: &[PlateRegion], pos: Vec2) -> Option<usize> {
    let mut best = None;
    let mut best_dist_sq = f32::INFINITY;
    for (idx, plate) in plates.iter().enumerate() {
        let dist_sq = plate.seed.distance_squared(pos);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some(idx);
        }
    }
    best
}

/// Assigns every cell of the fine mesh to its nearest plate seed.
pub fn assign_cells(mesh: &VoronoiMesh, plates: &[PlateRegion]) -> Result<Vec<RegionCell>, TectonicError> {
    mesh.cells
        .iter()
        .map(|cell| {
            let plate_id = nearest_plate(plates, cell.site).ok_or(TectonicError::EmptyDiagram {
                sites: plates.len(),
                cells: mesh.len(),
            })?;
            Ok(RegionCell {
                site: cell.site,
                area: cell.area,
                plate_id,
            })
        })
        .collect()
}

/// Tile plate ids taken directly from the nearest plate seed.
pub fn assign_tiles_direct(grid: &HexGrid, plates: &[PlateRegion]) -> Result<Vec<u8>, TectonicError> {
    let ids: Vec<usize> = (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            let (x, y) = grid.coords(idx);
            nearest_plate(plates, grid.tile_position(x, y)).ok_or(TectonicError::NearestCellLookupFailed {
                tile: idx,
                cells: plates.len(),
            })
        })
        .collect::<Result<_, _>>()?;
    narrow_plate_ids(&ids, plates.len())
}

/// Tile plate ids inherited from the nearest fine cell.
pub fn assign_tiles_by_cells(
    grid: &HexGrid,
    mesh: &VoronoiMesh,
    cells: &[RegionCell],
    plate_count: usize,
) -> Result<Vec<u8>, TectonicError> {
    let ids: Vec<usize> = (0..grid.len())
        .into_par_iter()
        .map(|idx| {
            let (x, y) = grid.coords(idx);
            let lookup_failed = TectonicError::NearestCellLookupFailed {
                tile: idx,
                cells: cells.len(),
            };
            let cell = mesh.nearest_cell(grid.tile_position(x, y)).ok_or(lookup_failed.clone())?;
            cells.get(cell).map(|c| c.plate_id).ok_or(lookup_failed)
        })
        .collect::<Result<_, _>>()?;
    narrow_plate_ids(&ids, plate_count)
}

/// Checks every id against `plate_count` and packs them into bytes.
pub fn narrow_plate_ids(ids: &[usize], plate_count: usize) -> Result<Vec<u8>, TectonicError> {
    ids.iter()
        .enumerate()
        .map(|(tile, &plate_id)| {
            if plate_id >= plate_count || plate_id > u8::MAX as usize {
                Err(TectonicError::PlateIdOutOfRange {
                    tile,
                    plate_id,
                    plate_count,
                })
            } else {
                Ok(plate_id as u8)
            }
        })
        .collect()
}

/// Number of tiles owned by each plate.
pub fn plate_tile_counts(plate_ids: &[u8], plate_count: usize) -> Vec<usize> {
    let mut counts = vec![0usize; plate_count];
    for &id in plate_ids {
        if let Some(c) = counts.get_mut(id as usize) {
            *c += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn nearest_plate_breaks_ties_in_seed_order() {
        let plates = vec![
            PlateRegion::stationary(0, Vec2::new(0.0, 0.0)),
            PlateRegion::stationary(1, Vec2::new(2.0, 0.0)),
        ];
        assert_eq!(nearest_plate(&plates, Vec2::new(1.0, 0.0)), Some(0));
        assert_eq!(nearest_plate(&plates, Vec2::new(1.5, 0.0)), Some(1));
        assert_eq!(nearest_plate(&[], Vec2::ZERO), None);
    }

    #[test]
    fn direct_assignment_is_exact_nearest_seed() {
        let grid = HexGrid::new(12, 9);
        let plates = vec![
            PlateRegion::stationary(0, Vec2::new(1.0, 1.0)),
            PlateRegion::stationary(1, Vec2::new(9.0, 2.0)),
            PlateRegion::stationary(2, Vec2::new(5.0, 7.5)),
        ];
        let ids = assign_tiles_direct(&grid, &plates).unwrap();
        for (idx, &id) in ids.iter().enumerate() {
            let (x, y) = grid.coords(idx);
            let p = grid.tile_position(x, y);
            assert_eq!(Some(id as usize), nearest_plate(&plates, p));
        }
    }

    #[test]
    fn cell_assignment_covers_every_tile_with_valid_ids() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let grid = HexGrid::new(40, 24);
        let bounds = Vec2::new(40.0, 24.0);
        let coarse = VoronoiMesh::random(5, bounds, 2, &mut rng).unwrap();
        let plates: Vec<_> = coarse
            .sites()
            .into_iter()
            .enumerate()
            .map(|(i, s)| PlateRegion::stationary(i, s))
            .collect();
        let fine = VoronoiMesh::random(120, bounds, 1, &mut rng).unwrap();
        let cells = assign_cells(&fine, &plates).unwrap();
        let ids = assign_tiles_by_cells(&grid, &fine, &cells, plates.len()).unwrap();
        assert_eq!(ids.len(), grid.len());
        assert!(ids.iter().all(|&id| (id as usize) < plates.len()));
        let counts = plate_tile_counts(&ids, plates.len());
        assert_eq!(counts.iter().sum::<usize>(), grid.len());
    }

    #[test]
    fn out_of_range_plate_id_is_fatal() {
        let err = narrow_plate_ids(&[0, 1, 3], 3).unwrap_err();
        assert_eq!(
            err,
            TectonicError::PlateIdOutOfRange { tile: 2, plate_id: 3, plate_count: 3 }
        );
    }
}
