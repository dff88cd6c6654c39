//! Player start selection.

use log::{debug, warn};

use super::config::FertilitySpacedConfig;
use crate::geometry::HexGrid;
use crate::morphology::ReliefClass;
use crate::projection::TerrainType;

/// Layers start placement reads.
#[derive(Debug, Clone, Copy)]
pub struct PlacementInputs<'a> {
    pub terrain: &'a [u8],
    pub relief: &'a [u8],
    pub vegetation: &'a [u8],
    pub river_mask: &'a [u8],
    pub coast_distance: &'a [u8],
}

/// Suitability of a tile as a start; 0 means never.
pub fn fertility(grid: &HexGrid, inputs: PlacementInputs<'_>, idx: usize, cfg: &FertilitySpacedConfig) -> f32 {
    let terrain = TerrainType::from_u8(inputs.terrain[idx]);
    if terrain.is_water() || ReliefClass::from_u8(inputs.relief[idx]) == ReliefClass::Mountains {
        return 0.0;
    }
    let climate = match terrain {
        TerrainType::Snow => return 0.0,
        TerrainType::Tundra | TerrainType::Desert => 0.25,
        _ => 1.0,
    };

    let mut score = 0.2 + inputs.vegetation[idx] as f32 / 255.0;
    if inputs.river_mask[idx] != 0 || grid.neighbor_indices(idx).any(|n| inputs.river_mask[n] != 0) {
        score += cfg.river_bonus;
    }
    if inputs.coast_distance[idx] == 1 {
        score += cfg.coast_bonus;
    }
    score * climate
}

/// Picks up to `player_count` start tiles, best fertility first.
///
/// Candidates closer than `min_distance` to a chosen start are skipped. When
/// a full pass finds too few starts the distance shrinks by one and the
/// search resumes, keeping the starts already chosen.
pub fn fertility_spaced(grid: &HexGrid, inputs: PlacementInputs<'_>, cfg: &FertilitySpacedConfig) -> Vec<usize> {
    let mut candidates: Vec<(usize, f32)> = (0..grid.len())
        .map(|i| (i, fertility(grid, inputs, i, cfg)))
        .filter(|&(_, score)| score > 0.0)
        .collect();
    // Stable: equal scores keep tile order.
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let wanted = cfg.player_count as usize;
    let mut starts: Vec<usize> = Vec::with_capacity(wanted);
    let mut min_distance = cfg.min_distance.max(1);

    loop {
        for &(idx, _) in &candidates {
            if starts.len() == wanted {
                break;
            }
            let here = grid.coords(idx);
            let clear = starts
                .iter()
                .all(|&s| s != idx && grid.hex_distance(here, grid.coords(s)) >= min_distance);
            if clear {
                starts.push(idx);
            }
        }
        if starts.len() == wanted || min_distance == 1 {
            break;
        }
        min_distance -= 1;
        debug!("relaxing start spacing to {min_distance} ({} of {wanted} placed)", starts.len());
    }

    if starts.len() < wanted {
        warn!("only {} of {wanted} starts fit on the map", starts.len());
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Layers {
        terrain: Vec<u8>,
        relief: Vec<u8>,
        vegetation: Vec<u8>,
        rivers: Vec<u8>,
        coast: Vec<u8>,
    }

    impl Layers {
        fn land(n: usize) -> Self {
            Self {
                terrain: vec![TerrainType::Grassland.as_u8(); n],
                relief: vec![0; n],
                vegetation: vec![100; n],
                rivers: vec![0; n],
                coast: vec![5; n],
            }
        }

        fn inputs(&self) -> PlacementInputs<'_> {
            PlacementInputs {
                terrain: &self.terrain,
                relief: &self.relief,
                vegetation: &self.vegetation,
                river_mask: &self.rivers,
                coast_distance: &self.coast,
            }
        }
    }

    #[test]
    fn starts_respect_spacing() {
        let grid = HexGrid::new(40, 24);
        let layers = Layers::land(grid.len());
        let cfg = FertilitySpacedConfig { player_count: 6, min_distance: 8, ..Default::default() };
        let starts = fertility_spaced(&grid, layers.inputs(), &cfg);
        assert_eq!(starts.len(), 6);
        for (i, &a) in starts.iter().enumerate() {
            for &b in &starts[i + 1..] {
                assert!(grid.hex_distance(grid.coords(a), grid.coords(b)) >= 8);
            }
        }
    }

    #[test]
    fn fertile_tiles_win() {
        let grid = HexGrid::new(20, 10);
        let mut layers = Layers::land(grid.len());
        let best = grid.index(13, 4);
        layers.vegetation[best] = 255;
        layers.rivers[best] = 1;
        let cfg = FertilitySpacedConfig { player_count: 1, ..Default::default() };
        assert_eq!(fertility_spaced(&grid, layers.inputs(), &cfg), vec![best]);
    }

    #[test]
    fn spacing_relaxes_on_small_maps() {
        let grid = HexGrid::new(6, 4);
        let layers = Layers::land(grid.len());
        let cfg = FertilitySpacedConfig { player_count: 4, min_distance: 20, ..Default::default() };
        let starts = fertility_spaced(&grid, layers.inputs(), &cfg);
        assert_eq!(starts.len(), 4);
    }

    #[test]
    fn water_and_mountains_are_never_chosen() {
        let grid = HexGrid::new(4, 4);
        let mut layers = Layers::land(grid.len());
        layers.terrain.iter_mut().for_each(|t| *t = TerrainType::Ocean.as_u8());
        layers.terrain[5] = TerrainType::Plains.as_u8();
        layers.relief[5] = ReliefClass::Mountains.as_u8();
        layers.terrain[6] = TerrainType::Plains.as_u8();
        let cfg = FertilitySpacedConfig { player_count: 3, min_distance: 1, ..Default::default() };
        assert_eq!(fertility_spaced(&grid, layers.inputs(), &cfg), vec![6]);
    }
}
