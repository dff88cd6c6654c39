//! Sea level selection and land/water split.

/// Elevation at or below which `water_percent` of the tiles lie.
pub fn sea_level_for_water(elevation: &[f32], water_percent: f32) -> f32 {
    if elevation.is_empty() {
        return 0.0;
    }
    let mut sorted = elevation.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let water_tiles = (sorted.len() as f32 * water_percent / 100.0).round() as usize;
    if water_tiles == 0 {
        // Everything stays land.
        return sorted[0] - 1.0;
    }
    sorted[water_tiles.min(sorted.len()) - 1]
}

/// Shifts elevation so that sea level is 0 and returns the land mask (1 = land).
pub fn apply_sea_level(elevation: &mut [f32], sea_level: f32) -> Vec<u8> {
    elevation
        .iter_mut()
        .map(|e| {
            *e -= sea_level;
            u8::from(*e > 0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_water_share_is_met() {
        let mut elev: Vec<f32> = (0..100).map(|i| i as f32 * 10.0 - 300.0).collect();
        let sea = sea_level_for_water(&elev, 60.0);
        let mask = apply_sea_level(&mut elev, sea);
        assert_eq!(mask.iter().filter(|&&m| m == 0).count(), 60);
        assert!(elev.iter().zip(&mask).all(|(&e, &m)| (e > 0.0) == (m == 1)));
    }

    #[test]
    fn extremes_give_all_land_or_all_water() {
        let elev = vec![5.0, -3.0, 12.0];
        let mut all_land = elev.clone();
        let sea = sea_level_for_water(&all_land, 0.0);
        assert!(apply_sea_level(&mut all_land, sea).iter().all(|&m| m == 1));

        let mut all_water = elev;
        let sea = sea_level_for_water(&all_water, 100.0);
        assert!(apply_sea_level(&mut all_water, sea).iter().all(|&m| m == 0));
    }
}
