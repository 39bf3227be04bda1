use crate::{gpu, StorageBuffer};

/// Emissive triangles, i.e. what next-event estimation picks from.
#[derive(Debug)]
pub struct Lights {
    buffer: StorageBuffer<gpu::Light>,
}

impl Lights {
    pub fn add(&mut self, triangle_id: gpu::TriangleId, area: f32) {
        self.buffer.push(gpu::Light::new(triangle_id, area));
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer(&self) -> &[gpu::Light] {
        &self.buffer
    }
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            buffer: StorageBuffer::new("skein_lights", 0),
        }
    }
}
