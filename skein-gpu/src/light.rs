use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{TriangleId, Vertex};

/// Emissive triangle that can be picked by next-event estimation.
#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Light {
    pub triangle_id: u32,
    pub area: f32,
    pub _pad0: u32,
    pub _pad1: u32,
}

impl Light {
    pub fn new(triangle_id: TriangleId, area: f32) -> Self {
        Self {
            triangle_id: triangle_id.get(),
            area,
            _pad0: 0,
            _pad1: 0,
        }
    }

    pub fn triangle_id(&self) -> TriangleId {
        TriangleId::new(self.triangle_id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightId(u32);

impl LightId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Outcome of sampling a light for next-event estimation.
#[derive(Clone, Copy, Debug)]
pub enum LightSample {
    /// A point on an emissive triangle; `pdf` is expressed in the area measure
    /// and includes the probability of picking that triangle.
    Surface { vertex: Vertex, pdf: f32 },

    /// A direction towards the environment; `pdf` is expressed in the
    /// solid-angle measure and includes the probability of picking the
    /// environment.
    Environment { direction: Vec3, pdf: f32 },

    /// There's nothing to sample.
    None,
}
