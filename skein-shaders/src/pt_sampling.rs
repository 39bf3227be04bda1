use skein_gpu::prelude::*;

/// Traces `initial_candidates` paths per pixel and merges them into the
/// pixel's initial reservoir.
pub struct PtSampling<'a> {
    pub world: World<'a>,
    pub params: &'a RestirParams,
    pub pass: PtSamplingPassParams,
}

impl PtSampling<'_> {
    pub fn sample(&self, screen_pos: UVec2) -> Reservoir {
        let tracer = PathTracer::new(&self.world, self.params);

        // Reservoir decisions draw from a stream separate from the paths'
        let mut wnoise = WhiteNoise::new(!self.pass.seed, screen_pos);

        let count = (self.params.initial_candidates as usize)
            .clamp(1, MAX_INITIAL_CANDIDATES);

        let mut candidates = [Reservoir::default(); MAX_INITIAL_CANDIDATES];

        for (nth, candidate) in candidates.iter_mut().take(count).enumerate() {
            let domain_seed =
                WhiteNoise::domain_seed(self.pass.seed, screen_pos, nth as u32);

            *candidate =
                tracer.trace(&mut wnoise, screen_pos, domain_seed).reservoir;
        }

        if count == 1 {
            return candidates[0];
        }

        Resampler::new(&tracer, self.params)
            .resample(&mut wnoise, &candidates[..count])
            .reservoir
    }
}

impl Kernel for PtSampling<'_> {
    type Output = ReservoirData;
    type Item = ReservoirData;

    fn compute(&self, lane: Lane) -> Self::Output {
        self.sample(lane.screen_pos).pack()
    }

    fn commit(&self, _: Lane, output: Self::Output, item: &mut Self::Item) {
        *item = output;
    }
}
