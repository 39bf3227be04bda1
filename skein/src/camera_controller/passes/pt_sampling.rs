use skein_shaders::PtSampling;

use crate::{gpu, Camera, CameraBuffers, CameraComputePass, Engine, Error};

#[derive(Debug)]
pub struct PtSamplingPass {
    pass: CameraComputePass,
}

impl PtSamplingPass {
    pub fn new(_: &Camera, _: &CameraBuffers) -> Self {
        Self {
            pass: CameraComputePass::new("pt_sampling"),
        }
    }

    /// Traces fresh paths into the primary reservoir buffer.
    pub fn run(
        &self,
        engine: &Engine,
        buffers: &mut CameraBuffers,
        seed: u32,
    ) -> Result<(), Error> {
        let kernel = PtSampling {
            world: engine.world(&buffers.camera),
            params: engine.params(),
            pass: gpu::PtSamplingPassParams { seed },
        };

        self.pass.run(
            buffers.camera.screen_size(),
            &kernel,
            &mut buffers.reservoirs.get_mut(false)[..],
        )
    }
}
