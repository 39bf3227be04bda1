//! Progressive path tracer built around spatiotemporal reuse of whole light
//! paths (ReSTIR PT).
//!
//! Kernels live in `skein-gpu` and `skein-shaders` and are written against
//! flat buffers, one invocation per pixel; this crate owns those buffers and
//! schedules kernels over the CPU.
//!
//! ```no_run
//! use skein::{gpu, Camera, Config, Engine};
//! use glam::{vec3, Vec3};
//!
//! # fn main() -> Result<(), skein::Error> {
//! let mut engine = Engine::new(Config::default())?;
//! let white = engine.add_material(gpu::Material::default());
//!
//! engine.add_quad(
//!     [
//!         vec3(-1.0, 0.0, -1.0),
//!         vec3(-1.0, 0.0, 1.0),
//!         vec3(1.0, 0.0, 1.0),
//!         vec3(1.0, 0.0, -1.0),
//!     ],
//!     white,
//! )?;
//!
//! engine.set_environment(Vec3::ONE);
//!
//! let mut camera = engine.create_camera(Camera::default())?;
//!
//! for _ in 0..16 {
//!     camera.render(&engine)?;
//! }
//!
//! let image = camera.accumulated();
//! # Ok(())
//! # }
//! ```

mod buffers;
mod camera;
mod camera_controller;
mod config;
mod error;
mod lights;
mod materials;
mod triangles;
mod utils;

use glam::Vec3;
use log::debug;
pub use skein_gpu as gpu;
pub use skein_gpu::{Material, MaterialId, MaterialKind, Mis, TriangleId};

pub(crate) use self::buffers::*;
pub use self::camera::*;
pub use self::camera_controller::*;
pub use self::config::*;
pub use self::error::*;
pub(crate) use self::lights::*;
pub(crate) use self::materials::*;
pub(crate) use self::triangles::*;
pub(crate) use self::utils::*;

#[derive(Debug)]
pub struct Engine {
    config: Config,
    params: gpu::RestirParams,
    triangles: Triangles,
    materials: Materials,
    lights: Lights,
    environment: Vec3,

    /// Bumped on every change to the scene, so that cameras know when their
    /// reservoirs went stale
    revision: u64,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        debug!("Initializing engine: {:?}", config);

        Ok(Self {
            params: config.serialize(),
            config,
            triangles: Default::default(),
            materials: Default::default(),
            lights: Default::default(),
            environment: Vec3::ZERO,
            revision: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn params(&self) -> &gpu::RestirParams {
        &self.params
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add_material(&mut self, material: gpu::Material) -> MaterialId {
        self.revision += 1;
        self.materials.add(material)
    }

    pub fn add_triangle(
        &mut self,
        positions: [Vec3; 3],
        material_id: MaterialId,
    ) -> Result<TriangleId, Error> {
        let triangle = self.build_triangle(positions, material_id)?;

        Ok(self.insert_triangle(triangle))
    }

    /// Adds a planar quad, split into triangles `(a, b, c)` and `(a, c, d)`;
    /// emitters emit towards the side the `a -> b -> c` winding faces.
    pub fn add_quad(
        &mut self,
        [a, b, c, d]: [Vec3; 4],
        material_id: MaterialId,
    ) -> Result<[TriangleId; 2], Error> {
        let lhs = self.build_triangle([a, b, c], material_id)?;
        let rhs = self.build_triangle([a, c, d], material_id)?;

        Ok([self.insert_triangle(lhs), self.insert_triangle(rhs)])
    }

    /// Sets the radiance arriving from every direction that doesn't hit any
    /// triangle.
    pub fn set_environment(&mut self, radiance: Vec3) {
        self.revision += 1;
        self.environment = radiance;
    }

    pub fn create_camera(
        &self,
        camera: Camera,
    ) -> Result<CameraController, Error> {
        CameraController::new(self, camera)
    }

    pub(crate) fn world<'a>(&'a self, camera: &'a gpu::Camera) -> gpu::World<'a> {
        gpu::World {
            camera,
            triangles: gpu::TrianglesView::new(self.triangles.buffer()),
            materials: gpu::MaterialsView::new(self.materials.buffer()),
            lights: gpu::LightsView::new(self.lights.buffer()),
            environment: self.environment,
        }
    }

    fn build_triangle(
        &self,
        positions: [Vec3; 3],
        material_id: MaterialId,
    ) -> Result<gpu::Triangle, Error> {
        if self.materials.get(material_id).is_none() {
            return Err(Error::UnknownMaterial(material_id));
        }

        let triangle = gpu::Triangle::new(positions, material_id);
        let area = triangle.area();

        if !(area > 0.0 && area.is_finite()) {
            return Err(Error::DegenerateTriangle);
        }

        Ok(triangle)
    }

    fn insert_triangle(&mut self, triangle: gpu::Triangle) -> TriangleId {
        let is_emissive = self
            .materials
            .get(triangle.material_id())
            .is_some_and(|material| material.is_emissive());

        let id = self.triangles.add(triangle);

        if is_emissive {
            self.lights.add(id, triangle.area());
        }

        self.revision += 1;

        id
    }
}
