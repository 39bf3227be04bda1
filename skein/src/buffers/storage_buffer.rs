use std::any;
use std::ops::{Deref, DerefMut};

use bytemuck::Pod;
use derivative::Derivative;

/// Flat buffer of `Pod` items that kernels read from and write into.
#[derive(Clone, Derivative)]
#[derivative(Debug(bound = ""))]
pub struct StorageBuffer<T> {
    label: String,

    #[derivative(Debug = "ignore")]
    data: Vec<T>,
}

impl<T> StorageBuffer<T>
where
    T: Pod,
{
    /// Creates a buffer of `len` zeroed items.
    pub fn new(label: impl AsRef<str>, len: usize) -> Self {
        let label = label.as_ref();

        log::debug!(
            "Allocating storage buffer `{label}`; ty={}, len={len}",
            any::type_name::<T>(),
        );

        Self {
            label: label.to_owned(),
            data: vec![T::zeroed(); len],
        }
    }

    /// Zeroes all items, keeping the length.
    pub fn clear(&mut self) {
        self.data.fill(T::zeroed());
    }

    pub fn push(&mut self, item: T) {
        self.data.push(item);
    }
}

impl<T> Deref for StorageBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> DerefMut for StorageBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use skein_gpu::ReservoirData;

    use super::*;

    #[test]
    fn buffer() {
        let mut buffer = StorageBuffer::<ReservoirData>::new("test", 4);

        assert_eq!(4, buffer.len());

        buffer[1].d0.x = 1.0;
        buffer.push(ReservoirData::default());
        buffer.clear();

        let bytes: &[u8] = bytemuck::cast_slice(&buffer[..]);

        assert!(bytes.iter().all(|&byte| byte == 0));
        assert_eq!(5, buffer.len());
    }
}
