use core::f32::consts::PI;

use glam::{vec2, vec3, UVec2, Vec2, Vec3};

use crate::uniform_sphere;

/// Deterministic stream of random numbers.
///
/// The whole state is a single `u32`, so a stream can be saved next to a path
/// and resumed later on to make the very same decisions again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        }
    }

    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Returns the seed of `nth` independent trace started for given pixel in
    /// a frame seeded with `seed`.
    pub fn domain_seed(seed: u32, id: UVec2, nth: u32) -> u32 {
        Self::new(seed.wrapping_add(nth.wrapping_mul(0x9e3779b9)), id)
            .sample_int()
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        ((self.sample_int() >> 8) as f32) / 16777216.0
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    pub fn sample2(&mut self) -> Vec2 {
        let x = self.sample();
        let y = self.sample();

        vec2(x, y)
    }

    pub fn sample3(&mut self) -> Vec3 {
        let x = self.sample();
        let y = self.sample();
        let z = self.sample();

        vec3(x, y, z)
    }

    /// Generates a uniform sample on a circle.
    pub fn sample_circle(&mut self) -> Vec2 {
        let angle = self.sample() * PI * 2.0;

        vec2(angle.cos(), angle.sin())
    }

    /// Generates a uniform sample inside of a disk.
    pub fn sample_disk(&mut self) -> Vec2 {
        let radius = self.sample().sqrt();

        self.sample_circle() * radius
    }

    /// Generates a uniform sample on a unit sphere.
    pub fn sample_sphere(&mut self) -> Vec3 {
        uniform_sphere(self.sample2())
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn determinism() {
        let mut a = WhiteNoise::new(1234, uvec2(10, 20));
        let mut b = WhiteNoise::new(1234, uvec2(10, 20));

        for _ in 0..100 {
            assert_eq!(a.sample_int(), b.sample_int());
        }

        // ---

        let mut a = WhiteNoise::new(1234, uvec2(10, 20));

        a.sample2();

        let mut b = WhiteNoise::from_state(a.state());

        for _ in 0..100 {
            assert_eq!(a.sample().to_bits(), b.sample().to_bits());
        }
    }

    #[test]
    fn range() {
        let mut wnoise = WhiteNoise::new(0, UVec2::ZERO);
        let mut sum = 0.0;

        for _ in 0..10_000 {
            let sample = wnoise.sample();

            assert!((0.0..1.0).contains(&sample));

            sum += sample;
        }

        let mean = sum / 10_000.0;

        assert!((mean - 0.5).abs() < 0.02, "mean = {}", mean);
    }

    #[test]
    fn domain_seeds() {
        let a = WhiteNoise::domain_seed(1, uvec2(3, 4), 0);
        let b = WhiteNoise::domain_seed(1, uvec2(3, 4), 1);
        let c = WhiteNoise::domain_seed(1, uvec2(4, 3), 0);

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, WhiteNoise::domain_seed(1, uvec2(3, 4), 0));
    }

    #[test]
    fn sphere() {
        let mut wnoise = WhiteNoise::new(7, uvec2(1, 1));
        for _ in 0..1000 {
            assert!((wnoise.sample_sphere().length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn disk() {
        let mut wnoise = WhiteNoise::new(7, uvec2(1, 1));

        for _ in 0..1000 {
            assert!(wnoise.sample_disk().length() <= 1.0 + 1e-5);
        }
    }
}
