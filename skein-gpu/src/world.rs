use core::f32::consts::PI;

use glam::{vec2, UVec2, Vec2, Vec3};

use crate::{
    uniform_sphere, Camera, Hit, LightId, LightSample, LightsView,
    MaterialsView, Ray, Scene, Triangle, TriangleId, TrianglesView, Vec3Ext,
    Vertex,
};

/// Scene kept in flat buffers: triangle soup, materials, emissive triangles
/// and a constant-radiance environment.
#[derive(Clone, Copy)]
pub struct World<'a> {
    pub camera: &'a Camera,
    pub triangles: TrianglesView<'a>,
    pub materials: MaterialsView<'a>,
    pub lights: LightsView<'a>,
    pub environment: Vec3,
}

impl World<'_> {
    /// Probability of next-event estimation picking the environment instead
    /// of an emissive triangle.
    fn environment_probability(&self) -> f32 {
        match (self.environment.is_lit(), self.lights.is_empty()) {
            (false, _) => 0.0,
            (true, true) => 1.0,
            (true, false) => 0.5,
        }
    }
}

impl Scene for World<'_> {
    fn camera_ray(&self, pixel: UVec2, jitter: Vec2) -> Ray {
        self.camera.ray(pixel, jitter)
    }

    fn trace(&self, ray: Ray) -> Hit {
        ray.trace_nearest(self.triangles)
    }

    fn vertex(&self, triangle_id: TriangleId, barycentrics: Vec2) -> Vertex {
        let triangle = self.triangles.get(triangle_id);

        Vertex {
            point: triangle.point_at(barycentrics),
            normal: triangle.normal(),
            triangle_id,
            barycentrics,
            material: self.materials.get(triangle.material_id()),
        }
    }

    fn sample_light(&self, _origin: Vec3, u: Vec3) -> LightSample {
        let env_probability = self.environment_probability();

        if u.x < env_probability {
            return LightSample::Environment {
                direction: uniform_sphere(vec2(u.y, u.z)),
                pdf: env_probability / (4.0 * PI),
            };
        }

        if self.lights.is_empty() {
            return LightSample::None;
        }

        let count = self.lights.len();
        let u_light = (u.x - env_probability) / (1.0 - env_probability);
        let light_id = ((u_light * count as f32) as usize).min(count - 1);
        let light = self.lights.get(LightId::new(light_id as u32));

        let barycentrics = Triangle::sample(vec2(u.y, u.z));
        let vertex = self.vertex(light.triangle_id(), barycentrics);
        let pdf = (1.0 - env_probability) / (count as f32 * light.area);

        LightSample::Surface { vertex, pdf }
    }

    fn light_pdf(&self, origin: Vec3, light: &Vertex) -> f32 {
        if self.lights.is_empty() || !light.material.is_emissive() {
            return 0.0;
        }

        let area = self.triangles.get(light.triangle_id).area();
        let offset = light.point - origin;
        let distance_squared = offset.length_squared();
        let cos = light.normal.dot(offset.normalize()).abs();

        if area <= 0.0 || cos <= 0.0 {
            return 0.0;
        }

        (1.0 - self.environment_probability())
            / (self.lights.len() as f32 * area)
            * distance_squared
            / cos
    }

    fn environment(&self, _direction: Vec3) -> Vec3 {
        self.environment
    }

    fn environment_pdf(&self) -> f32 {
        self.environment_probability() / (4.0 * PI)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3};

    use super::*;
    use crate::testing::TestScene;
    use crate::WhiteNoise;

    #[test]
    fn light_pdf_matches_sampling() {
        let scene = TestScene::quad_light();
        let world = scene.world();
        let origin = vec3(0.3, 0.0, -0.2);
        let mut wnoise = WhiteNoise::new(0, uvec2(0, 0));

        for _ in 0..64 {
            let LightSample::Surface { vertex, pdf } =
                world.sample_light(origin, wnoise.sample3())
            else {
                panic!("expected a surface sample");
            };

            let offset = vertex.point - origin;
            let cos = vertex.normal.dot(offset.normalize()).abs();
            let expected = pdf * offset.length_squared() / cos;

            assert_relative_eq!(
                expected,
                world.light_pdf(origin, &vertex),
                max_relative = 1e-4
            );
        }
    }

    #[test]
    fn light_pdf_of_non_emitters() {
        let scene = TestScene::quad_light();
        let world = scene.world();
        let floor = world.vertex(TriangleId::new(0), vec2(0.2, 0.2));

        assert_eq!(0.0, world.light_pdf(Vec3::Y, &floor));
    }

    #[test]
    fn environment_sampling() {
        let mut scene = TestScene::quad_light();

        assert_eq!(0.0, scene.world().environment_pdf());

        scene.environment = Vec3::ONE;

        let world = scene.world();

        assert_relative_eq!(0.5 / (4.0 * PI), world.environment_pdf());

        let LightSample::Environment { direction, pdf } =
            world.sample_light(Vec3::ZERO, vec3(0.25, 0.5, 0.5))
        else {
            panic!("expected an environment sample");
        };

        assert_relative_eq!(1.0, direction.length(), epsilon = 1e-5);
        assert_relative_eq!(world.environment_pdf(), pdf);

        scene.lights.clear();

        assert_relative_eq!(1.0 / (4.0 * PI), scene.world().environment_pdf());
    }

    #[test]
    fn vertices() {
        let scene = TestScene::quad_light();
        let world = scene.world();

        // Second triangle of the light
        let vertex = world.vertex(TriangleId::new(3), vec2(0.0, 0.0));

        assert_relative_eq!(vec3(-0.5, 2.0, -0.5), vertex.point);
        assert_relative_eq!(vec3(0.0, -1.0, 0.0), vertex.normal);
        assert!(vertex.material.is_emissive());
    }
}
