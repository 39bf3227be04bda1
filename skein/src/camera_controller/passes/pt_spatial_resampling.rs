use skein_shaders::PtSpatialResampling;

use crate::{gpu, Camera, CameraBuffers, CameraComputePass, Engine, Error};

#[derive(Debug)]
pub struct PtSpatialResamplingPass {
    pass: CameraComputePass,
}

impl PtSpatialResamplingPass {
    pub fn new(_: &Camera, _: &CameraBuffers) -> Self {
        Self {
            pass: CameraComputePass::new("pt_spatial_resampling"),
        }
    }

    pub fn run(
        &self,
        engine: &Engine,
        buffers: &mut CameraBuffers,
        alternate: bool,
        seed: u32,
        nth: u32,
    ) -> Result<(), Error> {
        let (input_reservoirs, output_reservoirs) =
            buffers.reservoirs.split_mut(alternate);

        let kernel = PtSpatialResampling {
            world: engine.world(&buffers.camera),
            params: engine.params(),
            pass: gpu::PtSpatialResamplingPassParams { seed, nth },
            input_reservoirs,
        };

        self.pass.run(
            buffers.camera.screen_size(),
            &kernel,
            &mut output_reservoirs[..],
        )
    }
}
