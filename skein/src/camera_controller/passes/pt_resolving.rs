use skein_shaders::PtResolving;

use crate::{Camera, CameraBuffers, CameraComputePass, Error};

#[derive(Debug)]
pub struct PtResolvingPass {
    pass: CameraComputePass,
}

impl PtResolvingPass {
    pub fn new(_: &Camera, _: &CameraBuffers) -> Self {
        Self {
            pass: CameraComputePass::new("pt_resolving"),
        }
    }

    pub fn run(
        &self,
        buffers: &mut CameraBuffers,
        alternate: bool,
    ) -> Result<(), Error> {
        let kernel = PtResolving {
            camera: &buffers.camera,
            reservoirs: buffers.reservoirs.get(alternate),
        };

        self.pass.run(
            buffers.camera.screen_size(),
            &kernel,
            &mut buffers.image[..],
        )
    }
}
