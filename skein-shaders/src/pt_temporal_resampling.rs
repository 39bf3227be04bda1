use skein_gpu::prelude::*;

/// Merges each pixel's fresh reservoir with the one it ended up with in the
/// previous frame.
pub struct PtTemporalResampling<'a> {
    pub world: World<'a>,
    pub params: &'a RestirParams,
    pub pass: PtTemporalResamplingPassParams,
    pub curr_reservoirs: &'a [ReservoirData],
    pub prev_reservoirs: &'a [ReservoirData],
}

impl Kernel for PtTemporalResampling<'_> {
    type Output = ReservoirData;
    type Item = ReservoirData;

    fn compute(&self, lane: Lane) -> Self::Output {
        let screen_idx = self.world.camera.screen_to_idx(lane.screen_pos);
        let mut wnoise = WhiteNoise::new(self.pass.seed, lane.screen_pos);

        let curr = Reservoir::read(self.curr_reservoirs, screen_idx);
        let prev = Reservoir::read(self.prev_reservoirs, screen_idx);

        // Zeroed buffer, i.e. the first frame after a reset
        if prev.c == 0.0 {
            return curr.pack();
        }

        let prev = prev.gate(
            &curr.gbuffer,
            self.params.normal_threshold,
            self.params.depth_threshold,
        );

        let tracer = PathTracer::new(&self.world, self.params);

        Resampler::new(&tracer, self.params)
            .resample(&mut wnoise, &[curr, prev])
            .reservoir
            .pack()
    }

    fn commit(&self, _: Lane, output: Self::Output, item: &mut Self::Item) {
        *item = output;
    }
}
