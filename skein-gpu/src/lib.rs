//! Common structs, algorithms etc. used by skein's kernels and renderer.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::too_many_arguments)]

mod brdf;
mod camera;
mod gbuffer;
mod kernel;
mod light;
mod lights;
mod material;
mod materials;
mod noise;
mod passes;
mod path;
mod ray;
mod reservoir;
mod scene;
mod shift;
mod tracer;
mod triangle;
mod triangles;
mod utils;
mod world;

#[cfg(test)]
mod testing;

pub use self::brdf::*;
pub use self::camera::*;
pub use self::gbuffer::*;
pub use self::kernel::*;
pub use self::light::*;
pub use self::lights::*;
pub use self::material::*;
pub use self::materials::*;
pub use self::noise::*;
pub use self::passes::*;
pub use self::path::*;
pub use self::ray::*;
pub use self::reservoir::*;
pub use self::scene::*;
pub use self::shift::*;
pub use self::tracer::*;
pub use self::triangle::*;
pub use self::triangles::*;
pub use self::utils::*;
pub use self::world::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}

/// Maximum number of paths traced per pixel by the sampling pass.
pub const MAX_INITIAL_CANDIDATES: usize = 4;

/// Maximum number of neighbors considered per spatial pass.
pub const MAX_SPATIAL_CANDIDATES: usize = 6;

/// Maximum number of reservoirs merged in a single resampling step: the
/// canonical one plus its neighbors.
pub const MAX_CANDIDATES: usize = 1 + MAX_SPATIAL_CANDIDATES;

/// Maximum value of [`RestirParams::max_bounces`].
pub const MAX_BOUNCES: u32 = 16;

/// Kernels are dispatched in square workgroups of this many pixels per side.
pub const WORKGROUP_SIZE: u32 = 8;
