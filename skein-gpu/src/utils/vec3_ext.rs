use glam::{vec3, Vec3};

pub trait Vec3Ext
where
    Self: Sized,
{
    /// Reflects this direction-vector around `other`.
    fn reflect(self, other: Self) -> Self;

    /// Returns luminance of this color-vector.
    fn luma(self) -> f32;

    /// Returns whether this color-vector is non-zero.
    fn is_lit(self) -> bool;

    /// Maps a direction expressed in a local frame (z-up) into the frame
    /// oriented around `normal`.
    fn from_local(self, normal: Self) -> Self;
}

impl Vec3Ext for Vec3 {
    fn reflect(self, other: Self) -> Self {
        self - 2.0 * other.dot(self) * other
    }

    fn luma(self) -> f32 {
        self.dot(vec3(0.2126, 0.7152, 0.0722))
    }

    fn is_lit(self) -> bool {
        self.max_element() > 0.0
    }

    fn from_local(self, normal: Self) -> Self {
        let (t, b) = normal.any_orthonormal_pair();

        t * self.x + b * self.y + normal * self.z
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn reflect() {
        let dir = vec3(1.0, -1.0, 0.0).normalize();
        let actual = dir.reflect(vec3(0.0, 1.0, 0.0));

        assert_relative_eq!(vec3(1.0, 1.0, 0.0).normalize(), actual);
    }

    #[test]
    fn from_local() {
        let normal = vec3(0.3, -0.5, 0.8).normalize();

        assert_relative_eq!(
            normal,
            vec3(0.0, 0.0, 1.0).from_local(normal),
            epsilon = 1e-6
        );

        let dir = vec3(0.6, 0.0, 0.8).from_local(normal);

        assert_relative_eq!(1.0, dir.length(), epsilon = 1e-6);
        assert_relative_eq!(0.8, dir.dot(normal), epsilon = 1e-6);
    }
}
