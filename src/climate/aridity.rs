//! Aridity index.

use rayon::prelude::*;

use super::config::PetRatioConfig;

/// Rainfall over potential evapotranspiration; below 1 is a moisture deficit.
pub fn pet_ratio(rainfall: &[f32], temperature: &[f32], cfg: &PetRatioConfig) -> Vec<f32> {
    rainfall
        .par_iter()
        .zip(temperature.par_iter())
        .map(|(&mm, &t)| {
            let pet = cfg.pet_base_mm + cfg.pet_mm_per_c * t.max(0.0);
            mm.max(0.0) / pet.max(1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_raises_demand() {
        let cfg = PetRatioConfig::default();
        let idx = pet_ratio(&[1000.0, 1000.0, 0.0], &[5.0, 30.0, 20.0], &cfg);
        assert!(idx[0] > idx[1]);
        assert_eq!(idx[2], 0.0);
    }

    #[test]
    fn freezing_uses_base_demand() {
        let cfg = PetRatioConfig { pet_base_mm: 250.0, pet_mm_per_c: 55.0 };
        let idx = pet_ratio(&[500.0], &[-10.0], &cfg);
        assert!((idx[0] - 2.0).abs() < 1e-6);
    }
}
