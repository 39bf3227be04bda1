use glam::{Vec3, Vec4, Vec4Swizzles};

/// What the camera ray of a pixel hit; used to decide whether two pixels see
/// similar enough surfaces to share paths.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GBufferEntry {
    /// Shading normal facing the camera
    pub normal: Vec3,

    /// Distance to the primary hit; zero if the camera ray missed
    pub depth: f32,
}

impl GBufferEntry {
    pub fn new(normal: Vec3, depth: f32) -> Self {
        Self { normal, depth }
    }

    pub fn unpack(d0: Vec4) -> Self {
        Self {
            normal: d0.xyz(),
            depth: d0.w,
        }
    }

    pub fn pack(self) -> Vec4 {
        self.normal.extend(self.depth)
    }

    pub fn is_some(&self) -> bool {
        self.depth > 0.0
    }

    pub fn is_none(&self) -> bool {
        !self.is_some()
    }

    /// Returns whether a path sampled for `other` can be reused for this
    /// entry.
    pub fn is_similar_to(
        &self,
        other: &Self,
        normal_threshold: f32,
        depth_threshold: f32,
    ) -> bool {
        match (self.is_some(), other.is_some()) {
            (false, false) => return true,
            (true, true) => (),
            _ => return false,
        }

        if self.normal.dot(other.normal) < normal_threshold {
            return false;
        }

        (self.depth - other.depth).abs() <= depth_threshold * self.depth
    }
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn serialization() {
        let target = GBufferEntry::new(vec3(0.26, 0.53, 0.80), 123.0);

        assert_eq!(target, GBufferEntry::unpack(target.pack()));
    }

    #[test]
    fn similarity() {
        let up = GBufferEntry::new(vec3(0.0, 1.0, 0.0), 10.0);
        let side = GBufferEntry::new(vec3(1.0, 0.0, 0.0), 10.0);
        let far = GBufferEntry::new(vec3(0.0, 1.0, 0.0), 12.0);
        let near = GBufferEntry::new(vec3(0.0, 1.0, 0.0), 10.5);
        let miss = GBufferEntry::default();

        assert!(up.is_similar_to(&near, 0.8, 0.1));
        assert!(!up.is_similar_to(&side, 0.8, 0.1));
        assert!(!up.is_similar_to(&far, 0.8, 0.1));
        assert!(miss.is_similar_to(&miss, 0.8, 0.1));
        assert!(!miss.is_similar_to(&up, 0.8, 0.1));
        assert!(!up.is_similar_to(&miss, 0.8, 0.1));
    }
}
