mod f32_ext;
mod vec3_ext;

use core::f32::consts::PI;

use glam::{vec3, Vec2, Vec3};

pub use self::f32_ext::*;
pub use self::vec3_ext::*;

/// Balance heuristic for two sampling techniques, given as their pdfs.
pub fn balance_heuristic(this: f32, other: f32) -> f32 {
    let sum = this + other;

    if sum > 0.0 {
        this / sum
    } else {
        0.0
    }
}

/// Maps two uniform numbers into a uniform direction on the unit sphere.
pub fn uniform_sphere(u: Vec2) -> Vec3 {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;

    vec3(r * phi.cos(), r * phi.sin(), z)
}

/// Maps two uniform numbers into a cosine-weighted direction on the z-up
/// hemisphere.
pub fn cosine_hemisphere(u: Vec2) -> Vec3 {
    let r = u.x.sqrt();
    let phi = 2.0 * PI * u.y;

    vec3(r * phi.cos(), r * phi.sin(), (1.0 - u.x).max(0.0).sqrt())
}
