use glam::{UVec2, Vec3, Vec4};

/// Invocation of a kernel for a single pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lane {
    /// Position of this lane within the whole dispatch, possibly outside of
    /// the screen (dispatches are rounded up to whole workgroups)
    pub global_id: UVec2,

    /// Pixel this lane works on; lanes outside of the screen work on the
    /// nearest pixel inside of it, but their work is discarded
    pub screen_pos: UVec2,

    pub in_bounds: bool,
}

impl Lane {
    pub fn new(global_id: UVec2, screen_size: UVec2) -> Self {
        let in_bounds =
            global_id.x < screen_size.x && global_id.y < screen_size.y;

        Self {
            global_id,
            screen_pos: global_id.min(screen_size.saturating_sub(UVec2::ONE)),
            in_bounds,
        }
    }
}

/// Per-pixel entry point of a pass.
///
/// Execution happens in two phases: first `compute()` runs for every lane of
/// the dispatch, reading whatever buffers the kernel borrows; then, once all
/// lanes are done, `commit()` writes the results of in-bounds lanes into the
/// output buffer. A lane can only write its own pixel.
pub trait Kernel: Sync {
    type Output: Send;
    type Item: Send;

    fn compute(&self, lane: Lane) -> Self::Output;

    fn commit(&self, lane: Lane, output: Self::Output, item: &mut Self::Item);
}

/// Folds `sample` into a running average kept in `acc.xyz`, with `acc.w`
/// counting the samples seen so far; non-finite samples are dropped.
pub fn accumulate(acc: Vec4, sample: Vec3) -> Vec4 {
    if !sample.is_finite() {
        return acc;
    }

    let count = acc.w + 1.0;
    let mean = acc.truncate() + (sample - acc.truncate()) / count;

    mean.extend(count)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3};

    use super::*;

    #[test]
    fn lane() {
        let size = uvec2(10, 5);

        let lane = Lane::new(uvec2(3, 4), size);

        assert!(lane.in_bounds);
        assert_eq!(uvec2(3, 4), lane.screen_pos);

        let lane = Lane::new(uvec2(15, 7), size);

        assert!(!lane.in_bounds);
        assert_eq!(uvec2(9, 4), lane.screen_pos);
    }

    #[test]
    fn accumulation() {
        let mut acc = Vec4::ZERO;

        acc = accumulate(acc, vec3(1.0, 2.0, 3.0));
        acc = accumulate(acc, vec3(3.0, 2.0, 1.0));
        acc = accumulate(acc, Vec3::NAN);

        assert_relative_eq!(vec3(2.0, 2.0, 2.0).extend(2.0), acc);
    }
}
