use crate::{Triangle, TriangleId};

#[derive(Clone, Copy)]
pub struct TrianglesView<'a> {
    buffer: &'a [Triangle],
}

impl<'a> TrianglesView<'a> {
    pub fn new(buffer: &'a [Triangle]) -> Self {
        Self { buffer }
    }

    pub fn get(self, id: TriangleId) -> Triangle {
        self.buffer[id.get() as usize]
    }

    pub fn len(self) -> usize {
        self.buffer.len()
    }

    pub fn iter(self) -> impl Iterator<Item = (TriangleId, Triangle)> + 'a {
        self.buffer
            .iter()
            .enumerate()
            .map(|(id, triangle)| (TriangleId::new(id as u32), *triangle))
    }
}
