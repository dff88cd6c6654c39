//! Plate regions and rigid-body plate kinematics.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shared drift applied to every plate heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectionalityBias {
    /// Drift heading in degrees, 0 = +x, 90 = +y.
    pub angle_deg: f32,
    /// Weight of the drift relative to each plate's own heading (0..=1).
    pub strength: f32,
}

impl DirectionalityBias {
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle_deg.to_radians())
    }
}

/// A tectonic plate on the map plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateRegion {
    pub id: usize,
    /// Seed position (coarse Voronoi site).
    pub seed: Vec2,
    /// Linear movement per unit time.
    pub movement: Vec2,
    /// Rotation in degrees per unit time, positive counter-clockwise.
    pub rotation: f32,
    pub directionality: Option<DirectionalityBias>,
}

impl PlateRegion {
    /// A plate with no motion.
    pub fn stationary(id: usize, seed: Vec2) -> Self {
        Self {
            id,
            seed,
            movement: Vec2::ZERO,
            rotation: 0.0,
            directionality: None,
        }
    }

    /// Creates a plate with a random heading, speed and spin.
    ///
    /// # Arguments
    /// * `id` - Plate index
    /// * `seed` - Seed position
    /// * `center` - Map center, target of the convergence bias
    /// * `convergence_mix` - 0.5 is neutral; above biases headings toward `center`,
    ///   below biases them away from it
    /// * `directionality` - Optional drift shared by all plates
    /// * `rng` - Attempt random source
    pub fn random<R: Rng>(
        id: usize,
        seed: Vec2,
        center: Vec2,
        convergence_mix: f32,
        directionality: Option<DirectionalityBias>,
        rng: &mut R,
    ) -> Self {
        let heading = Vec2::from_angle(rng.random::<f32>() * std::f32::consts::TAU);
        let speed = 0.4 + rng.random::<f32>() * 0.6;
        let rotation = rng.random::<f32>() * 2.0 - 1.0;

        let bias = ((convergence_mix - 0.5) * 2.0).clamp(-1.0, 1.0);
        let inward = (center - seed).normalize_or_zero();
        let mut dir = (heading * (1.0 - bias.abs()) + inward * bias).normalize_or(heading);

        if let Some(d) = directionality {
            let s = d.strength.clamp(0.0, 1.0);
            dir = (dir * (1.0 - s) + d.direction() * s).normalize_or(dir);
        }

        Self {
            id,
            seed,
            movement: dir * speed,
            rotation,
            directionality,
        }
    }

    /// Displacement at `pos` induced by the plate's rotation about its seed.
    ///
    /// With `r = pos - seed` rotated by the plate angle to `r'`, the displacement is `r - r'`.
    #[inline]
    pub fn rotational_at(&self, pos: Vec2, rotation_multiplier: f32) -> Vec2 {
        let r = pos - self.seed;
        let angle = (self.rotation * rotation_multiplier).to_radians();
        let (sin, cos) = angle.sin_cos();
        let r_rot = Vec2::new(r.x * cos - r.y * sin, r.x * sin + r.y * cos);
        r - r_rot
    }

    /// Total plate velocity at `pos`: rotational displacement plus linear movement.
    ///
    /// Both the movement field and the boundary physics call this, so they see
    /// identical floats.
    #[inline]
    pub fn velocity_at(&self, pos: Vec2, rotation_multiplier: f32) -> Vec2 {
        self.rotational_at(pos, rotation_multiplier) + self.movement
    }

    pub fn speed(&self) -> f32 {
        self.movement.length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn stationary_plate_has_zero_velocity_everywhere() {
        let plate = PlateRegion::stationary(0, Vec2::new(4.0, 4.0));
        for p in [Vec2::ZERO, Vec2::new(10.0, -3.0), Vec2::new(4.0, 4.0)] {
            assert_eq!(plate.velocity_at(p, 1.0), Vec2::ZERO);
        }
    }

    #[test]
    fn velocity_at_seed_is_linear_movement() {
        let mut plate = PlateRegion::stationary(0, Vec2::new(5.0, 5.0));
        plate.movement = Vec2::new(0.3, -0.2);
        plate.rotation = 1.0;
        assert_eq!(plate.velocity_at(plate.seed, 2.0), plate.movement);
    }

    #[test]
    fn rotation_displacement_is_r_minus_rotated_r() {
        let mut plate = PlateRegion::stationary(0, Vec2::ZERO);
        plate.rotation = 90.0;
        // r = (1, 0) rotated by 90 degrees is (0, 1); displacement is (1, -1).
        let d = plate.rotational_at(Vec2::new(1.0, 0.0), 1.0);
        assert_relative_eq!(d.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(d.y, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_multiplier_scales_the_angle() {
        let mut plate = PlateRegion::stationary(0, Vec2::ZERO);
        plate.rotation = 45.0;
        let a = plate.rotational_at(Vec2::new(3.0, 1.0), 2.0);
        plate.rotation = 90.0;
        let b = plate.rotational_at(Vec2::new(3.0, 1.0), 1.0);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
    }

    #[test]
    fn full_convergence_points_plates_at_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let center = Vec2::new(50.0, 25.0);
        let plate = PlateRegion::random(0, Vec2::new(10.0, 25.0), center, 1.0, None, &mut rng);
        let dir = plate.movement.normalize();
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-5);
        assert!(plate.speed() >= 0.4 && plate.speed() <= 1.0);
    }

    #[test]
    fn random_plates_are_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(77);
        let mut b = ChaCha8Rng::seed_from_u64(77);
        let bias = Some(DirectionalityBias { angle_deg: 90.0, strength: 0.5 });
        let pa = PlateRegion::random(3, Vec2::new(7.0, 8.0), Vec2::ZERO, 0.5, bias, &mut a);
        let pb = PlateRegion::random(3, Vec2::new(7.0, 8.0), Vec2::ZERO, 0.5, bias, &mut b);
        assert_eq!(pa, pb);
        assert!(pa.rotation.abs() <= 1.0);
    }
}
