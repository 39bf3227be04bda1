use skein_gpu::prelude::*;

/// Turns the final reservoir of each pixel into radiance and folds it into
/// the accumulation image.
pub struct PtResolving<'a> {
    pub camera: &'a Camera,
    pub reservoirs: &'a [ReservoirData],
}

impl Kernel for PtResolving<'_> {
    type Output = Vec3;
    type Item = Vec4;

    fn compute(&self, lane: Lane) -> Self::Output {
        let screen_idx = self.camera.screen_to_idx(lane.screen_pos);

        Reservoir::read(self.reservoirs, screen_idx).contribution()
    }

    fn commit(&self, _: Lane, output: Self::Output, item: &mut Self::Item) {
        *item = accumulate(*item, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolving() {
        let camera = Camera::new(
            Vec3::Z,
            Vec3::ZERO,
            Vec3::Y,
            1.0,
            uvec2(2, 1),
            Camera::MODE_IMAGE,
        );

        let mut lit = Reservoir::new(Domain::new(uvec2(1, 0), 1), Default::default());

        lit.sample.f = vec3(1.0, 2.0, 3.0);
        lit.w = 0.5;
        lit.w_sum = 1.0;
        lit.c = 1.0;
        lit.is_null = false;

        let reservoirs = [ReservoirData::default(), lit.pack()];

        let kernel = PtResolving {
            camera: &camera,
            reservoirs: &reservoirs,
        };

        let lane = Lane::new(uvec2(0, 0), camera.screen_size());
        let mut acc = Vec4::ZERO;

        kernel.commit(lane, kernel.compute(lane), &mut acc);

        assert_eq!(Vec4::new(0.0, 0.0, 0.0, 1.0), acc);

        let lane = Lane::new(uvec2(1, 0), camera.screen_size());
        let mut acc = Vec4::ZERO;

        kernel.commit(lane, kernel.compute(lane), &mut acc);

        // Exact, since it's the first sample
        assert_eq!(Vec4::new(0.5, 1.0, 1.5, 1.0), acc);
    }
}
