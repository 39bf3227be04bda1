use skein_shaders::RefTracing;

use crate::{gpu, Camera, CameraBuffers, CameraComputePass, Engine, Error};

#[derive(Debug)]
pub struct RefTracingPass {
    pass: CameraComputePass,
}

impl RefTracingPass {
    pub fn new(_: &Camera, _: &CameraBuffers) -> Self {
        Self {
            pass: CameraComputePass::new("ref_tracing"),
        }
    }

    pub fn run(
        &self,
        engine: &Engine,
        buffers: &mut CameraBuffers,
        seed: u32,
    ) -> Result<(), Error> {
        let kernel = RefTracing {
            world: engine.world(&buffers.camera),
            params: engine.params(),
            pass: gpu::RefTracingPassParams { seed },
        };

        self.pass.run(
            buffers.camera.screen_size(),
            &kernel,
            &mut buffers.image[..],
        )
    }
}
