use glam::{UVec2, Vec2, Vec3};

use crate::{Hit, LightSample, Material, Ray, TriangleId};

/// How far rays are pushed away from the surface they start at.
pub const RAY_OFFSET: f32 = 1e-4;

/// A point on the scene's surface, together with what's needed to shade it.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub point: Vec3,

    /// Geometric normal, following the triangle's winding order
    pub normal: Vec3,

    pub triangle_id: TriangleId,
    pub barycentrics: Vec2,
    pub material: Material,
}

impl Vertex {
    /// Returns the normal flipped towards given direction.
    pub fn normal_towards(&self, dir: Vec3) -> Vec3 {
        if self.normal.dot(dir) >= 0.0 {
            self.normal
        } else {
            -self.normal
        }
    }

    /// Returns radiance emitted in given direction; only the front face
    /// emits.
    pub fn emission_towards(&self, dir: Vec3) -> Vec3 {
        if self.normal.dot(dir) > 0.0 {
            self.material.emission()
        } else {
            Vec3::ZERO
        }
    }

    /// Returns a ray leaving this vertex in given direction.
    pub fn ray_towards(&self, dir: Vec3) -> Ray {
        Ray::new(self.point + self.normal_towards(dir) * RAY_OFFSET, dir)
    }
}

/// Everything the path tracer needs to know about the world it traces.
pub trait Scene {
    fn camera_ray(&self, pixel: UVec2, jitter: Vec2) -> Ray;

    fn trace(&self, ray: Ray) -> Hit;

    fn vertex(&self, triangle_id: TriangleId, barycentrics: Vec2) -> Vertex;

    /// Picks a light for next-event estimation, consuming `u` for the light
    /// choice and the point on it.
    fn sample_light(&self, origin: Vec3, u: Vec3) -> LightSample;

    /// Solid-angle pdf of `sample_light()` picking given emissive vertex when
    /// looking from `origin`.
    fn light_pdf(&self, origin: Vec3, light: &Vertex) -> f32;

    fn environment(&self, direction: Vec3) -> Vec3;

    /// Solid-angle pdf of `sample_light()` picking given direction towards
    /// the environment.
    fn environment_pdf(&self) -> f32;
}
