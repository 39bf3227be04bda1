//! Renders a Cornell box and saves it as `cornell.png`.
//!
//! Usage: cargo run --release --example cornell -- [frames] [reference]
//!
//! Set `RUST_LOG=debug` to see passes being run (and, with the `metrics`
//! feature enabled, how long they take).

use std::env;
use std::error::Error;

use glam::{uvec2, vec3, vec4, Vec3};
use image::DynamicImage;
use skein::{gpu, Camera, CameraMode, Config, Engine, MaterialKind};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);

    let frames = match args.next() {
        Some(frames) => frames.parse()?,
        None => 64,
    };

    let mode = match args.next().as_deref() {
        Some("reference") => CameraMode::Reference,
        _ => CameraMode::Image,
    };

    let engine = build_scene(Config::default().with_spatial_passes(2))?;

    let mut camera = engine.create_camera(Camera {
        mode,
        size: uvec2(256, 256),
        origin: vec3(0.0, 1.0, 3.4),
        target: vec3(0.0, 1.0, 0.0),
        up: Vec3::Y,
        fov_y: 40f32.to_radians(),
    })?;

    for frame in 0..frames {
        camera.render(&engine)?;

        if frame % 16 == 0 {
            log::info!("Rendered frame {}/{}", frame + 1, frames);
        }
    }

    DynamicImage::ImageRgb32F(camera.accumulated())
        .into_rgb8()
        .save("cornell.png")?;

    log::info!("Saved cornell.png");

    Ok(())
}

fn build_scene(config: Config) -> Result<Engine, skein::Error> {
    let mut engine = Engine::new(config)?;

    let white = engine.add_material(gpu::Material::default());

    let red = engine.add_material(gpu::Material {
        base_color: vec4(0.63, 0.06, 0.04, 1.0),
        ..Default::default()
    });

    let green = engine.add_material(gpu::Material {
        base_color: vec4(0.15, 0.48, 0.09, 1.0),
        ..Default::default()
    });

    let metal = engine.add_material(gpu::Material {
        base_color: vec4(0.9, 0.9, 0.9, 1.0),
        roughness: 0.3,
        kind: MaterialKind::Glossy as u32,
        ..Default::default()
    });

    let mirror = engine.add_material(gpu::Material {
        base_color: vec4(0.95, 0.95, 0.95, 1.0),
        kind: MaterialKind::Mirror as u32,
        ..Default::default()
    });

    let light = engine.add_material(gpu::Material {
        base_color: Vec3::ZERO.extend(1.0),
        emissive: vec4(17.0, 12.0, 4.0, 1.0),
        ..Default::default()
    });

    // Floor, ceiling, back wall
    engine.add_quad(
        [
            vec3(-1.0, 0.0, -1.0),
            vec3(-1.0, 0.0, 1.0),
            vec3(1.0, 0.0, 1.0),
            vec3(1.0, 0.0, -1.0),
        ],
        white,
    )?;

    engine.add_quad(
        [
            vec3(-1.0, 2.0, -1.0),
            vec3(1.0, 2.0, -1.0),
            vec3(1.0, 2.0, 1.0),
            vec3(-1.0, 2.0, 1.0),
        ],
        white,
    )?;

    engine.add_quad(
        [
            vec3(-1.0, 0.0, -1.0),
            vec3(1.0, 0.0, -1.0),
            vec3(1.0, 2.0, -1.0),
            vec3(-1.0, 2.0, -1.0),
        ],
        white,
    )?;

    // Side walls
    engine.add_quad(
        [
            vec3(-1.0, 0.0, -1.0),
            vec3(-1.0, 2.0, -1.0),
            vec3(-1.0, 2.0, 1.0),
            vec3(-1.0, 0.0, 1.0),
        ],
        red,
    )?;

    engine.add_quad(
        [
            vec3(1.0, 0.0, -1.0),
            vec3(1.0, 0.0, 1.0),
            vec3(1.0, 2.0, 1.0),
            vec3(1.0, 2.0, -1.0),
        ],
        green,
    )?;

    add_box(&mut engine, vec3(-0.35, 0.6, -0.3), vec3(0.3, 0.6, 0.3), metal)?;
    add_box(&mut engine, vec3(0.4, 0.3, 0.35), vec3(0.25, 0.3, 0.25), mirror)?;

    // Light, facing down
    engine.add_quad(
        [
            vec3(-0.25, 1.99, -0.25),
            vec3(0.25, 1.99, -0.25),
            vec3(0.25, 1.99, 0.25),
            vec3(-0.25, 1.99, 0.25),
        ],
        light,
    )?;

    Ok(engine)
}

/// Adds an axis-aligned box with given center and half-extents.
fn add_box(
    engine: &mut Engine,
    center: Vec3,
    extent: Vec3,
    material: gpu::MaterialId,
) -> Result<(), skein::Error> {
    let corner = |x: f32, y: f32, z: f32| center + extent * vec3(x, y, z);

    let faces = [
        [(-1., 1., -1.), (-1., 1., 1.), (1., 1., 1.), (1., 1., -1.)],
        [(-1., -1., -1.), (1., -1., -1.), (1., -1., 1.), (-1., -1., 1.)],
        [(-1., -1., 1.), (1., -1., 1.), (1., 1., 1.), (-1., 1., 1.)],
        [(-1., -1., -1.), (-1., 1., -1.), (1., 1., -1.), (1., -1., -1.)],
        [(1., -1., -1.), (1., 1., -1.), (1., 1., 1.), (1., -1., 1.)],
        [(-1., -1., -1.), (-1., -1., 1.), (-1., 1., 1.), (-1., 1., -1.)],
    ];

    for face in faces {
        engine.add_quad(face.map(|(x, y, z)| corner(x, y, z)), material)?;
    }

    Ok(())
}
