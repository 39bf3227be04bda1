//! Small scenes shared by tests.

use glam::{uvec2, vec3, vec4, Vec3};

use crate::{
    Camera, Light, LightsView, Material, MaterialId, MaterialKind,
    MaterialsView, RestirParams, Triangle, TriangleId, TrianglesView, World,
};

pub struct TestScene {
    pub camera: Camera,
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
    pub lights: Vec<Light>,
    pub environment: Vec3,
    pub params: RestirParams,
}

impl TestScene {
    /// Diffuse floor lit by a single square light hanging above it; the
    /// camera looks straight down at the floor.
    pub fn quad_light() -> Self {
        let mut this = Self::new(
            Camera::new(
                vec3(0.0, 1.5, 0.0),
                Vec3::ZERO,
                vec3(0.0, 0.0, -1.0),
                60f32.to_radians(),
                uvec2(32, 32),
                Camera::MODE_IMAGE,
            ),
            Vec3::ZERO,
            RestirParams::default(),
        );

        let floor = this.add_material(Material::default());
        let light = this.add_material(emitter(Vec3::splat(10.0)));

        this.add_quad(
            [
                vec3(-5.0, 0.0, -5.0),
                vec3(-5.0, 0.0, 5.0),
                vec3(5.0, 0.0, 5.0),
                vec3(5.0, 0.0, -5.0),
            ],
            floor,
        );

        this.add_quad(
            [
                vec3(-0.5, 2.0, -0.5),
                vec3(0.5, 2.0, -0.5),
                vec3(0.5, 2.0, 0.5),
                vec3(-0.5, 2.0, 0.5),
            ],
            light,
        );

        this.collect_lights();
        this
    }

    /// Box open towards the camera, with a light under the ceiling, a
    /// colored diffuse wall and a smooth glossy one.
    pub fn cornell_box() -> Self {
        let mut this = Self::new(
            Camera::new(
                vec3(0.0, 1.0, 4.5),
                vec3(0.0, 1.0, 0.0),
                Vec3::Y,
                45f32.to_radians(),
                uvec2(24, 24),
                Camera::MODE_IMAGE,
            ),
            Vec3::splat(0.1),
            RestirParams {
                max_bounces: 3,
                ..Default::default()
            },
        );

        let white = this.add_material(Material::default());

        let red = this.add_material(Material {
            base_color: vec4(0.8, 0.1, 0.1, 1.0),
            ..Default::default()
        });

        let glossy = this.add_material(Material {
            base_color: vec4(0.2, 0.8, 0.2, 1.0),
            roughness: 0.1,
            kind: MaterialKind::Glossy as u32,
            ..Default::default()
        });

        let light = this.add_material(emitter(Vec3::splat(15.0)));

        let [x0, x1] = [-1.0, 1.0];
        let [y0, y1] = [0.0, 2.0];
        let [z0, z1] = [-1.0, 1.0];

        // Floor & ceiling
        this.add_quad(
            [
                vec3(x0, y0, z0),
                vec3(x0, y0, z1),
                vec3(x1, y0, z1),
                vec3(x1, y0, z0),
            ],
            white,
        );

        this.add_quad(
            [
                vec3(x0, y1, z0),
                vec3(x1, y1, z0),
                vec3(x1, y1, z1),
                vec3(x0, y1, z1),
            ],
            white,
        );

        // Back wall
        this.add_quad(
            [
                vec3(x0, y0, z0),
                vec3(x1, y0, z0),
                vec3(x1, y1, z0),
                vec3(x0, y1, z0),
            ],
            white,
        );

        // Side walls
        this.add_quad(
            [
                vec3(x0, y0, z0),
                vec3(x0, y1, z0),
                vec3(x0, y1, z1),
                vec3(x0, y0, z1),
            ],
            red,
        );

        this.add_quad(
            [
                vec3(x1, y0, z0),
                vec3(x1, y0, z1),
                vec3(x1, y1, z1),
                vec3(x1, y1, z0),
            ],
            glossy,
        );

        this.add_quad(
            [
                vec3(-0.3, y1 - 0.01, -0.3),
                vec3(0.3, y1 - 0.01, -0.3),
                vec3(0.3, y1 - 0.01, 0.3),
                vec3(-0.3, y1 - 0.01, 0.3),
            ],
            light,
        );

        this.collect_lights();
        this
    }

    fn new(camera: Camera, environment: Vec3, params: RestirParams) -> Self {
        Self {
            camera,
            triangles: Default::default(),
            materials: Default::default(),
            lights: Default::default(),
            environment,
            params,
        }
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);

        MaterialId::new(self.materials.len() as u32 - 1)
    }

    pub fn add_quad(&mut self, [a, b, c, d]: [Vec3; 4], material: MaterialId) {
        self.triangles.push(Triangle::new([a, b, c], material));
        self.triangles.push(Triangle::new([a, c, d], material));
    }

    fn collect_lights(&mut self) {
        for (idx, triangle) in self.triangles.iter().enumerate() {
            let material = self.materials[triangle.material_id().get() as usize];

            if material.is_emissive() {
                self.lights.push(Light::new(
                    TriangleId::new(idx as u32),
                    triangle.area(),
                ));
            }
        }
    }

    pub fn world(&self) -> World<'_> {
        World {
            camera: &self.camera,
            triangles: TrianglesView::new(&self.triangles),
            materials: MaterialsView::new(&self.materials),
            lights: LightsView::new(&self.lights),
            environment: self.environment,
        }
    }
}

fn emitter(emission: Vec3) -> Material {
    Material {
        base_color: Vec3::ZERO.extend(1.0),
        emissive: emission.extend(1.0),
        ..Default::default()
    }
}
