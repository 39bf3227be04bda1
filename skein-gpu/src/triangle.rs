use bytemuck::{Pod, Zeroable};
use glam::{vec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Hit, MaterialId, Ray};

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Triangle {
    /// x, y, z - position of the first vertex
    /// w - material id
    pub d0: Vec4,

    /// x, y, z - position of the second vertex
    /// w - unused
    pub d1: Vec4,

    /// x, y, z - position of the third vertex
    /// w - unused
    pub d2: Vec4,
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], material_id: MaterialId) -> Self {
        Self {
            d0: positions[0].extend(f32::from_bits(material_id.get())),
            d1: positions[1].extend(0.0),
            d2: positions[2].extend(0.0),
        }
    }

    pub fn position0(&self) -> Vec3 {
        self.d0.xyz()
    }

    pub fn position1(&self) -> Vec3 {
        self.d1.xyz()
    }

    pub fn position2(&self) -> Vec3 {
        self.d2.xyz()
    }

    pub fn positions(&self) -> [Vec3; 3] {
        [self.position0(), self.position1(), self.position2()]
    }

    pub fn material_id(&self) -> MaterialId {
        MaterialId::new(self.d0.w.to_bits())
    }

    fn cross(&self) -> Vec3 {
        (self.position1() - self.position0())
            .cross(self.position2() - self.position0())
    }

    /// Returns the geometric normal, following the winding order.
    pub fn normal(&self) -> Vec3 {
        self.cross().normalize_or_zero()
    }

    pub fn area(&self) -> f32 {
        0.5 * self.cross().length()
    }

    pub fn point_at(&self, barycentrics: Vec2) -> Vec3 {
        self.position0()
            + (self.position1() - self.position0()) * barycentrics.x
            + (self.position2() - self.position0()) * barycentrics.y
    }

    /// Maps two uniform numbers into barycentrics of a point distributed
    /// uniformly over this triangle's surface.
    pub fn sample(u: Vec2) -> Vec2 {
        let su = u.x.sqrt();

        vec2(su * (1.0 - u.y), su * u.y)
    }

    pub fn hit(&self, ray: Ray, hit: &mut Hit) -> bool {
        let v0v1 = self.position1() - self.position0();
        let v0v2 = self.position2() - self.position0();

        // ---

        let pvec = ray.direction().cross(v0v2);
        let det = v0v1.dot(pvec);

        if det.abs() < f32::EPSILON {
            return false;
        }

        // ---

        let inv_det = 1.0 / det;
        let tvec = ray.origin() - self.position0();
        let u = tvec.dot(pvec) * inv_det;
        let qvec = tvec.cross(v0v1);
        let v = ray.direction().dot(qvec) * inv_det;
        let distance = v0v2.dot(qvec) * inv_det;

        if (u < 0.0)
            | (u > 1.0)
            | (v < 0.0)
            | (u + v > 1.0)
            | (distance <= 0.0)
            | (distance >= hit.distance)
        {
            return false;
        }

        hit.distance = distance;
        hit.barycentrics = vec2(u, v);

        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriangleId(u32);

impl TriangleId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;

    use super::*;

    fn triangle() -> Triangle {
        Triangle::new(
            [
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            ],
            MaterialId::new(7),
        )
    }

    #[test]
    fn layout() {
        let triangle = triangle();

        assert_eq!(MaterialId::new(7), triangle.material_id());
        assert_relative_eq!(vec3(0.0, 0.0, 1.0), triangle.normal());
        assert_relative_eq!(0.5, triangle.area());
    }

    #[test]
    fn hit() {
        let triangle = triangle();
        let ray = Ray::new(vec3(0.25, 0.5, 2.0), vec3(0.0, 0.0, -1.0));
        let mut hit = Hit::none();

        assert!(triangle.hit(ray, &mut hit));
        assert_relative_eq!(2.0, hit.distance);
        assert_relative_eq!(vec2(0.25, 0.5), hit.barycentrics);
        assert_relative_eq!(vec3(0.25, 0.5, 0.0), triangle.point_at(hit.barycentrics));

        // ---

        let ray = Ray::new(vec3(0.75, 0.75, 2.0), vec3(0.0, 0.0, -1.0));
        let mut hit = Hit::none();

        assert!(!triangle.hit(ray, &mut hit));
        assert!(hit.is_none());
    }

    #[test]
    fn sample() {
        for u in [vec2(0.0, 0.0), vec2(0.5, 0.5), vec2(0.99, 0.1)] {
            let uv = Triangle::sample(u);

            assert!(uv.x >= 0.0 && uv.y >= 0.0 && uv.x + uv.y <= 1.0);
        }
    }
}
