mod buffers;
mod pass;
mod passes;

use image::Rgb32FImage;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use self::buffers::*;
pub use self::pass::*;
pub use self::passes::*;
use crate::{Camera, CameraMode, Engine, Error};

#[derive(Debug)]
pub struct CameraController {
    camera: Camera,
    buffers: CameraBuffers,
    passes: CameraPasses,
    rng: StdRng,
    frame: u32,

    /// Engine's revision the reservoirs were gathered for
    revision: u64,
}

impl CameraController {
    pub(crate) fn new(engine: &Engine, camera: Camera) -> Result<Self, Error> {
        camera.validate()?;

        info!("Creating camera: {}", camera.describe());

        let buffers = CameraBuffers::new(&camera);
        let passes = CameraPasses::new(&camera, &buffers);

        let rng = match engine.config().seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            camera,
            buffers,
            passes,
            rng,
            frame: 0,
            revision: engine.revision(),
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Returns the number of frames accumulated so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Switches to `camera`; if it's different from the current one, all the
    /// reservoirs and the accumulated image get dropped.
    pub fn update(&mut self, camera: Camera) -> Result<(), Error> {
        camera.validate()?;

        if !self.camera.is_invalidated_by(&camera) {
            return Ok(());
        }

        let needs_rebuilding = self.camera.size != camera.size;

        self.camera = camera;

        if needs_rebuilding {
            self.rebuild_buffers();
            self.rebuild_passes();
        } else {
            self.buffers.camera = self.camera.serialize();
            self.buffers.reset();
        }

        self.frame = 0;

        Ok(())
    }

    fn rebuild_buffers(&mut self) {
        debug!("Rebuilding buffers for camera: {}", self.camera.describe());

        self.buffers = CameraBuffers::new(&self.camera);
    }

    fn rebuild_passes(&mut self) {
        debug!("Rebuilding passes for camera: {}", self.camera.describe());

        self.passes = CameraPasses::new(&self.camera, &self.buffers);
    }

    /// Renders a single frame and folds it into the accumulated image.
    pub fn render(&mut self, engine: &Engine) -> Result<(), Error> {
        if self.revision != engine.revision() {
            debug!("Scene has changed, resetting camera");

            self.revision = engine.revision();
            self.buffers.reset();
            self.frame = 0;
        }

        match self.camera.mode {
            CameraMode::Image => self.render_image(engine)?,
            CameraMode::Reference => self.render_reference(engine)?,
        }

        self.frame += 1;

        Ok(())
    }

    fn render_image(&mut self, engine: &Engine) -> Result<(), Error> {
        let config = engine.config();
        let frame = self.frame;
        let buffers = &mut self.buffers;
        let passes = &self.passes;
        let mut alternate = false;

        debug!(
            "Rendering frame {frame}: sampling, temporal={}, spatial={}, \
             resolving",
            config.temporal, config.spatial_passes,
        );

        passes.pt_sampling.run(engine, buffers, self.rng.gen())?;

        if config.temporal {
            passes.pt_temporal_resampling.run(
                engine,
                buffers,
                alternate,
                self.rng.gen(),
            )?;

            alternate = !alternate;
        }

        for nth in 0..config.spatial_passes {
            passes.pt_spatial_resampling.run(
                engine,
                buffers,
                alternate,
                self.rng.gen(),
                nth,
            )?;

            alternate = !alternate;
        }

        passes.pt_resolving.run(buffers, alternate)?;

        buffers
            .prev_reservoirs
            .copy_from_slice(buffers.reservoirs.get(alternate));

        Ok(())
    }

    fn render_reference(&mut self, engine: &Engine) -> Result<(), Error> {
        debug!("Rendering frame {}: reference", self.frame);

        self.passes
            .ref_tracing
            .run(engine, &mut self.buffers, self.rng.gen())
    }

    /// Returns the image accumulated since the camera (or the scene) has
    /// last changed.
    pub fn accumulated(&self) -> Rgb32FImage {
        let size = self.camera.size;

        Rgb32FImage::from_fn(size.x, size.y, |x, y| {
            let pixel = self.buffers.image[(y * size.x + x) as usize];

            image::Rgb([pixel.x, pixel.y, pixel.z])
        })
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        info!("Deleting camera: {}", self.camera.describe());
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3, Vec3};

    use super::*;
    use crate::{gpu, Config, Mis};

    fn engine(config: Config) -> Engine {
        let mut engine = Engine::new(config.with_seed(1234)).unwrap();
        let floor = engine.add_material(gpu::Material::default());

        let light = engine.add_material(gpu::Material {
            base_color: Vec3::ZERO.extend(1.0),
            emissive: Vec3::splat(10.0).extend(1.0),
            ..Default::default()
        });

        engine
            .add_quad(
                [
                    vec3(-5.0, 0.0, -5.0),
                    vec3(-5.0, 0.0, 5.0),
                    vec3(5.0, 0.0, 5.0),
                    vec3(5.0, 0.0, -5.0),
                ],
                floor,
            )
            .unwrap();

        engine
            .add_quad(
                [
                    vec3(-0.5, 2.0, -0.5),
                    vec3(0.5, 2.0, -0.5),
                    vec3(0.5, 2.0, 0.5),
                    vec3(-0.5, 2.0, 0.5),
                ],
                light,
            )
            .unwrap();

        engine.set_environment(Vec3::splat(0.1));
        engine
    }

    fn camera(mode: CameraMode) -> Camera {
        Camera {
            mode,
            size: uvec2(32, 32),
            origin: vec3(0.0, 1.5, 0.0),
            target: Vec3::ZERO,
            up: vec3(0.0, 0.0, -1.0),
            fov_y: 60f32.to_radians(),
        }
    }

    fn render(engine: &Engine, mode: CameraMode, frames: u32) -> Rgb32FImage {
        let mut camera = engine.create_camera(camera(mode)).unwrap();

        for _ in 0..frames {
            camera.render(engine).unwrap();
        }

        assert_eq!(frames, camera.frame());

        camera.accumulated()
    }

    fn mean(image: &Rgb32FImage) -> f32 {
        let sum: f64 = image
            .pixels()
            .map(|pixel| {
                assert!(
                    pixel.0.iter().all(|c| c.is_finite() && *c >= 0.0),
                    "invalid pixel: {:?}",
                    pixel
                );

                gpu::Vec3Ext::luma(Vec3::from(pixel.0)) as f64
            })
            .sum();

        (sum / (image.width() * image.height()) as f64) as f32
    }

    #[test]
    fn renders_finite_images() {
        for mis in [Mis::Gbh, Mis::Pairwise, Mis::Biased] {
            let engine = engine(
                Config::default()
                    .with_mis(mis)
                    .with_initial_candidates(2)
                    .with_spatial_passes(2),
            );

            let image = render(&engine, CameraMode::Image, 4);

            assert!(mean(&image) > 0.0);
        }
    }

    #[test]
    fn converges_to_reference() {
        let engine = engine(Config::default());

        let expected = mean(&render(&engine, CameraMode::Reference, 64));
        let actual = mean(&render(&engine, CameraMode::Image, 64));

        assert!(expected > 0.0);
        assert_relative_eq!(expected, actual, max_relative = 0.1);
    }

    #[test]
    fn converges_to_reference_without_reuse() {
        let engine = engine(
            Config::default()
                .with_temporal(false)
                .with_spatial_passes(0),
        );

        let expected = mean(&render(&engine, CameraMode::Reference, 64));
        let actual = mean(&render(&engine, CameraMode::Image, 64));

        assert_relative_eq!(expected, actual, max_relative = 0.1);
    }

    #[test]
    fn camera_changes_reset_accumulation() {
        let engine = engine(Config::default());
        let mut camera = engine.create_camera(camera(CameraMode::Image)).unwrap();

        camera.render(&engine).unwrap();
        camera.render(&engine).unwrap();

        // Same camera, nothing to reset
        camera.update(camera.camera().clone()).unwrap();

        assert_eq!(2, camera.frame());

        camera
            .update(Camera {
                origin: vec3(0.0, 1.0, 0.0),
                ..camera.camera().clone()
            })
            .unwrap();

        assert_eq!(0, camera.frame());
        assert_eq!(0.0, mean(&camera.accumulated()));

        camera
            .update(Camera {
                size: uvec2(8, 4),
                ..camera.camera().clone()
            })
            .unwrap();

        camera.render(&engine).unwrap();

        let image = camera.accumulated();

        assert_eq!((8, 4), image.dimensions());
        assert!(mean(&image) > 0.0);
    }

    #[test]
    fn scene_changes_reset_accumulation() {
        let mut engine = engine(Config::default());
        let mut camera = engine.create_camera(camera(CameraMode::Image)).unwrap();

        camera.render(&engine).unwrap();
        camera.render(&engine).unwrap();

        engine.set_environment(Vec3::ZERO);
        camera.render(&engine).unwrap();

        assert_eq!(1, camera.frame());
    }

    #[test]
    fn empty_viewport() {
        let engine = engine(Config::default());

        let err = engine
            .create_camera(Camera {
                size: uvec2(0, 16),
                ..camera(CameraMode::Image)
            })
            .unwrap_err();

        assert!(matches!(
            err,
            Error::EmptyViewport {
                width: 0,
                height: 16
            }
        ));
    }
}
