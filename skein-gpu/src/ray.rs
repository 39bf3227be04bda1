use glam::{Vec2, Vec3};

use crate::{TriangleId, TrianglesView};

#[derive(Copy, Clone, Default, Debug)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Traces this ray and returns its nearest hit.
    ///
    /// Every triangle is checked; there's no acceleration structure.
    pub fn trace_nearest(self, triangles: TrianglesView) -> Hit {
        let mut hit = Hit::none();

        for (triangle_id, triangle) in triangles.iter() {
            if triangle.hit(self, &mut hit) {
                hit.triangle_id = triangle_id;
            }
        }

        hit
    }
}

/// Result of tracing a ray; a single `Hit` is shared by everything that needs
/// to know what the ray ran into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub triangle_id: TriangleId,
    pub barycentrics: Vec2,
    pub distance: f32,
}

impl Hit {
    pub fn none() -> Self {
        Self {
            triangle_id: TriangleId::new(0),
            barycentrics: Vec2::ZERO,
            distance: f32::MAX,
        }
    }

    pub fn is_some(&self) -> bool {
        self.distance < f32::MAX
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }
}

impl Default for Hit {
    fn default() -> Self {
        Self::none()
    }
}
