use crate::{gpu, StorageBuffer};

#[derive(Debug)]
pub struct Materials {
    buffer: StorageBuffer<gpu::Material>,
}

impl Materials {
    pub fn add(&mut self, material: gpu::Material) -> gpu::MaterialId {
        let id = gpu::MaterialId::new(self.buffer.len() as u32);

        self.buffer.push(material);

        id
    }

    pub fn get(&self, id: gpu::MaterialId) -> Option<&gpu::Material> {
        self.buffer.get(id.get() as usize)
    }

    pub fn buffer(&self) -> &[gpu::Material] {
        &self.buffer
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self {
            buffer: StorageBuffer::new("skein_materials", 0),
        }
    }
}
