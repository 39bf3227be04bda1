use glam::Vec3;

use crate::{Brdf, Lobe, Ray, Vertex};

/// A vertex reached while tracing, with enough context to scatter from it or
/// reconnect through it.
#[derive(Clone, Copy, Debug)]
pub struct PathVertex {
    pub vertex: Vertex,

    /// Shading normal, facing `wo`
    pub normal: Vec3,

    /// Direction towards the previous vertex (or the camera)
    pub wo: Vec3,

    /// Throughput of the path up to this vertex, excluding its own scattering
    pub throughput: Vec3,

    /// Solid-angle pdf of the direction that led here; zero for the primary
    /// hit
    pub incoming_pdf: f32,

    /// Whether the previous vertex was a delta (mirror) one
    pub after_delta: bool,

    pub is_rough: bool,
}

impl PathVertex {
    pub fn new(
        vertex: Vertex,
        ray: Ray,
        throughput: Vec3,
        incoming_pdf: f32,
        after_delta: bool,
        min_roughness: f32,
    ) -> Self {
        let wo = -ray.direction();

        Self {
            vertex,
            normal: vertex.normal_towards(wo),
            wo,
            throughput,
            incoming_pdf,
            after_delta,
            is_rough: vertex.material.is_rough(min_roughness),
        }
    }

    pub fn brdf(&self) -> Brdf<'_> {
        Brdf::new(&self.vertex.material, self.normal)
    }

    pub fn lobe(&self) -> Lobe {
        self.vertex.material.lobe()
    }

    pub fn is_delta(&self) -> bool {
        self.vertex.material.is_delta()
    }

    pub fn point(&self) -> Vec3 {
        self.vertex.point
    }

    /// Returns radiance this vertex emits towards the previous one.
    pub fn emission(&self) -> Vec3 {
        self.vertex.emission_towards(self.wo)
    }
}
