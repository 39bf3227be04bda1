use skein_gpu::prelude::*;

/// Plain path tracing: every candidate a trace finds is summed and folded
/// into the accumulation image, without any resampling.
pub struct RefTracing<'a> {
    pub world: World<'a>,
    pub params: &'a RestirParams,
    pub pass: RefTracingPassParams,
}

impl Kernel for RefTracing<'_> {
    type Output = Vec3;
    type Item = Vec4;

    fn compute(&self, lane: Lane) -> Self::Output {
        let tracer = PathTracer::new(&self.world, self.params);
        let mut wnoise = WhiteNoise::new(!self.pass.seed, lane.screen_pos);

        let domain_seed =
            WhiteNoise::domain_seed(self.pass.seed, lane.screen_pos, 0);

        tracer
            .trace(&mut wnoise, lane.screen_pos, domain_seed)
            .radiance
    }

    fn commit(&self, _: Lane, output: Self::Output, item: &mut Self::Item) {
        *item = accumulate(*item, output);
    }
}
