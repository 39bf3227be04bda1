use crate::{gpu, StorageBuffer};

#[derive(Debug)]
pub struct Triangles {
    buffer: StorageBuffer<gpu::Triangle>,
}

impl Triangles {
    pub fn add(&mut self, triangle: gpu::Triangle) -> gpu::TriangleId {
        let id = gpu::TriangleId::new(self.buffer.len() as u32);

        self.buffer.push(triangle);

        id
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn buffer(&self) -> &[gpu::Triangle] {
        &self.buffer
    }
}

impl Default for Triangles {
    fn default() -> Self {
        Self {
            buffer: StorageBuffer::new("skein_triangles", 0),
        }
    }
}
