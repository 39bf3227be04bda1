use skein_gpu::prelude::*;

/// Merges each pixel's reservoir with reservoirs of a few pixels picked
/// around it.
pub struct PtSpatialResampling<'a> {
    pub world: World<'a>,
    pub params: &'a RestirParams,
    pub pass: PtSpatialResamplingPassParams,
    pub input_reservoirs: &'a [ReservoirData],
}

impl PtSpatialResampling<'_> {
    /// How many times we try to find a pixel not picked yet before giving up
    /// on given neighbor.
    const MAX_ATTEMPTS: u32 = 4;

    /// Picks distinct neighbors of `screen_pos` from a disk, shrinking the
    /// disk every time a pick lands on an already picked pixel (the center
    /// one included) or turns out to be gated.
    ///
    /// Returns the number of candidates written into `out`, the center
    /// reservoir included (at index 0).
    pub fn gather(
        &self,
        wnoise: &mut WhiteNoise,
        screen_pos: UVec2,
        out: &mut [Reservoir; MAX_CANDIDATES],
    ) -> usize {
        let camera = self.world.camera;
        let center = Reservoir::read(
            self.input_reservoirs,
            camera.screen_to_idx(screen_pos),
        );

        out[0] = center;

        let count = (self.params.spatial_candidates as usize)
            .min(MAX_SPATIAL_CANDIDATES);

        let min_radius = self.params.spatial_radius.min(5.0);
        let mut radius = self.params.spatial_radius;
        let mut picked_pixels = [screen_pos; MAX_CANDIDATES];
        let mut len = 1;

        for _ in 0..count {
            let mut picked = None;

            for _ in 0..Self::MAX_ATTEMPTS {
                let offset = wnoise.sample_disk() * radius;

                let pos = camera.contain(
                    (screen_pos.as_vec2() + offset).round().as_ivec2(),
                );

                if !picked_pixels[..len].contains(&pos) {
                    picked = Some(pos);
                    break;
                }

                radius = (radius * 0.5).max(min_radius);
            }

            let Some(pos) = picked else {
                continue;
            };

            let neighbor = Reservoir::read(
                self.input_reservoirs,
                camera.screen_to_idx(pos),
            )
            .gate(
                &center.gbuffer,
                self.params.normal_threshold,
                self.params.depth_threshold,
            );

            if !neighbor.domain.is_on_screen() {
                radius = (radius * 0.5).max(min_radius);
            }

            out[len] = neighbor;
            picked_pixels[len] = pos;
            len += 1;
        }

        len
    }
}

impl Kernel for PtSpatialResampling<'_> {
    type Output = ReservoirData;
    type Item = ReservoirData;

    fn compute(&self, lane: Lane) -> Self::Output {
        let mut wnoise = WhiteNoise::new(
            self.pass.seed ^ self.pass.nth.wrapping_mul(0x9e3779b9),
            lane.screen_pos,
        );

        let mut candidates = [Reservoir::default(); MAX_CANDIDATES];
        let len = self.gather(&mut wnoise, lane.screen_pos, &mut candidates);

        if len == 1 {
            return candidates[0].pack();
        }

        let tracer = PathTracer::new(&self.world, self.params);

        Resampler::new(&tracer, self.params)
            .resample(&mut wnoise, &candidates[..len])
            .reservoir
            .pack()
    }

    fn commit(&self, _: Lane, output: Self::Output, item: &mut Self::Item) {
        *item = output;
    }
}
