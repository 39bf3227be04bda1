use glam::{UVec2, Vec3};

use crate::{gpu, Error};

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub mode: CameraMode,
    pub size: UVec2,
    pub origin: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    /// Vertical field of view, in radians
    pub fov_y: f32,
}

impl Camera {
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.size.x == 0 || self.size.y == 0 {
            return Err(Error::EmptyViewport {
                width: self.size.x,
                height: self.size.y,
            });
        }

        Ok(())
    }

    /// Returns whether switching from this camera to `other` makes the data
    /// gathered so far (reservoirs, accumulated image) unusable.
    pub(crate) fn is_invalidated_by(&self, other: &Self) -> bool {
        self != other
    }

    pub(crate) fn serialize(&self) -> gpu::Camera {
        gpu::Camera::new(
            self.origin,
            self.target,
            self.up,
            self.fov_y,
            self.size,
            self.mode.serialize(),
        )
    }

    pub(crate) fn describe(&self) -> String {
        format!(
            "mode={:?}, size={}x{}, origin={}, target={}",
            self.mode, self.size.x, self.size.y, self.origin, self.target,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            mode: Default::default(),
            size: UVec2::new(512, 512),
            origin: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraMode {
    /// Path tracing with spatiotemporal path reuse
    #[default]
    Image,

    /// Plain path tracing, without any reuse; slow to converge, but serves
    /// as the ground truth
    Reference,
}

impl CameraMode {
    pub(crate) fn serialize(&self) -> u32 {
        match self {
            CameraMode::Image => gpu::Camera::MODE_IMAGE,
            CameraMode::Reference => gpu::Camera::MODE_REFERENCE,
        }
    }
}
