use skein_shaders::PtTemporalResampling;

use crate::{gpu, Camera, CameraBuffers, CameraComputePass, Engine, Error};

#[derive(Debug)]
pub struct PtTemporalResamplingPass {
    pass: CameraComputePass,
}

impl PtTemporalResamplingPass {
    pub fn new(_: &Camera, _: &CameraBuffers) -> Self {
        Self {
            pass: CameraComputePass::new("pt_temporal_resampling"),
        }
    }

    pub fn run(
        &self,
        engine: &Engine,
        buffers: &mut CameraBuffers,
        alternate: bool,
        seed: u32,
    ) -> Result<(), Error> {
        let (curr_reservoirs, next_reservoirs) =
            buffers.reservoirs.split_mut(alternate);

        let kernel = PtTemporalResampling {
            world: engine.world(&buffers.camera),
            params: engine.params(),
            pass: gpu::PtTemporalResamplingPassParams { seed },
            curr_reservoirs,
            prev_reservoirs: &buffers.prev_reservoirs,
        };

        self.pass.run(
            buffers.camera.screen_size(),
            &kernel,
            &mut next_reservoirs[..],
        )
    }
}
