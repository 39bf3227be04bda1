use glam::Vec4;
use log::debug;

use crate::{gpu, Camera, DoubleBuffered, StorageBuffer};

#[derive(Debug)]
pub struct CameraBuffers {
    pub camera: gpu::Camera,

    /// Reservoirs of the frame being rendered, ping-ponged between passes
    pub reservoirs: DoubleBuffered<StorageBuffer<gpu::ReservoirData>>,

    /// Reservoirs the previous frame ended up with
    pub prev_reservoirs: StorageBuffer<gpu::ReservoirData>,

    /// Running average of resolved radiance; `w` counts the frames
    pub image: StorageBuffer<Vec4>,
}

impl CameraBuffers {
    pub fn new(camera: &Camera) -> Self {
        debug!("Initializing camera buffers");

        let len = (camera.size.x * camera.size.y) as usize;

        Self {
            camera: camera.serialize(),
            reservoirs: DoubleBuffered::new(
                StorageBuffer::new("skein_reservoirs_a", len),
                StorageBuffer::new("skein_reservoirs_b", len),
            ),
            prev_reservoirs: StorageBuffer::new("skein_prev_reservoirs", len),
            image: StorageBuffer::new("skein_image", len),
        }
    }

    /// Forgets all the reservoirs and the accumulated image.
    pub fn reset(&mut self) {
        debug!("Resetting camera buffers");

        self.reservoirs.for_each_mut(|buffer| buffer.clear());
        self.prev_reservoirs.clear();
        self.image.clear();
    }
}
