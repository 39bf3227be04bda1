use log::debug;

use crate::{Camera, CameraBuffers};

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        #[derive(Debug)]
        pub struct CameraPasses {
            $( pub $name: $class, )*
        }

        impl CameraPasses {
            pub fn new(config: &Camera, buffers: &CameraBuffers) -> Self {
                debug!("Initializing camera passes");

                Self {
                    $( $name: $class::new(config, buffers), )*
                }
            }
        }
    };
}

passes!([
    pt_resolving => PtResolvingPass,
    pt_sampling => PtSamplingPass,
    pt_spatial_resampling => PtSpatialResamplingPass,
    pt_temporal_resampling => PtTemporalResamplingPass,
    ref_tracing => RefTracingPass,
]);
