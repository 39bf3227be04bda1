use bytemuck::{Pod, Zeroable};
use glam::{vec2, vec4, IVec2, Mat4, UVec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::Ray;

#[repr(C)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Camera {
    pub projection_view: Mat4,
    pub ndc_to_world: Mat4,
    pub origin: Vec4,
    pub screen: Vec4,
    pub data: Vec4,
}

impl Camera {
    pub const MODE_IMAGE: u32 = 0;
    pub const MODE_REFERENCE: u32 = 1;

    /// Creates a pinhole camera located at `origin`, looking at `target`.
    pub fn new(
        origin: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y: f32,
        screen_size: UVec2,
        mode: u32,
    ) -> Self {
        let screen = screen_size.as_vec2();
        let aspect = screen.x / screen.y.max(1.0);
        let view = Mat4::look_at_rh(origin, target, up);
        let projection = Mat4::perspective_rh(fov_y, aspect, 0.01, 1000.0);
        let projection_view = projection * view;

        Self {
            projection_view,
            ndc_to_world: projection_view.inverse(),
            origin: origin.extend(0.0),
            screen: vec4(screen.x, screen.y, 0.0, 0.0),
            data: vec4(f32::from_bits(mode), 0.0, 0.0, 0.0),
        }
    }

    /// Given a point in screen-coordinates, returns a unique index for it; used
    /// to index screen-space structures.
    pub fn screen_to_idx(&self, pos: UVec2) -> usize {
        (pos.y * (self.screen.x as u32) + pos.x) as usize
    }

    pub fn screen_size(&self) -> UVec2 {
        self.screen.xy().as_uvec2()
    }

    /// Mirrors given point back into the screen if it lays outside of it.
    pub fn contain(&self, mut pos: IVec2) -> UVec2 {
        let screen_size = self.screen.xy().as_ivec2();

        if pos.x < 0 {
            pos.x = -pos.x;
        }

        if pos.y < 0 {
            pos.y = -pos.y;
        }

        if pos.x >= screen_size.x {
            pos.x = screen_size.x - pos.x + screen_size.x - 1;
        }

        if pos.y >= screen_size.y {
            pos.y = screen_size.y - pos.y + screen_size.y - 1;
        }

        pos.clamp(IVec2::ZERO, (screen_size - 1).max(IVec2::ZERO))
            .as_uvec2()
    }

    /// Casts a ray from camera's origin through given pixel; `jitter` selects
    /// the point within the pixel.
    pub fn ray(&self, screen_pos: UVec2, jitter: Vec2) -> Ray {
        let screen_size = self.screen.xy();
        let ndc = (screen_pos.as_vec2() + jitter) * 2.0 / screen_size - Vec2::ONE;
        let ndc = vec2(ndc.x, -ndc.y);

        let target = self.ndc_to_world.project_point3(ndc.extend(0.5));
        let origin = self.origin.xyz();

        Ray::new(origin, (target - origin).normalize())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{ivec2, uvec2, vec3};

    use super::*;

    fn camera() -> Camera {
        Camera::new(
            vec3(0.0, 0.0, 5.0),
            Vec3::ZERO,
            vec3(0.0, 1.0, 0.0),
            60.0f32.to_radians(),
            uvec2(32, 16),
            Camera::MODE_IMAGE,
        )
    }

    #[test]
    fn ray() {
        let camera = camera();
        let ray = camera.ray(uvec2(16, 8), Vec2::ZERO);

        assert_relative_eq!(vec3(0.0, 0.0, 5.0), ray.origin());
        assert_relative_eq!(vec3(0.0, 0.0, -1.0), ray.direction(), epsilon = 1e-4);

        // Pixels at the top of the screen look up
        assert!(camera.ray(uvec2(16, 0), Vec2::ZERO).direction().y > 0.0);

        // Pixels at the left of the screen look left
        assert!(camera.ray(uvec2(0, 8), Vec2::ZERO).direction().x < 0.0);
    }

    #[test]
    fn contain() {
        let camera = camera();

        assert_eq!(uvec2(3, 4), camera.contain(ivec2(-3, -4)));
        assert_eq!(uvec2(30, 14), camera.contain(ivec2(33, 17)));
        assert_eq!(uvec2(5, 5), camera.contain(ivec2(5, 5)));

        for x in -40..80 {
            for y in -40..80 {
                let pos = camera.contain(ivec2(x, y));

                assert!(pos.x < 32 && pos.y < 16);
            }
        }
    }

    #[test]
    fn idx() {
        let camera = camera();

        assert_eq!(0, camera.screen_to_idx(uvec2(0, 0)));
        assert_eq!(31, camera.screen_to_idx(uvec2(31, 0)));
        assert_eq!(15 * 32 + 5, camera.screen_to_idx(uvec2(5, 15)));
    }
}
