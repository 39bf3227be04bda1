//! Per-pass kernels; each one is executed once per pixel by the renderer's
//! dispatcher.

pub mod pt_resolving;
pub mod pt_sampling;
pub mod pt_spatial_resampling;
pub mod pt_temporal_resampling;
pub mod ref_tracing;

pub use self::pt_resolving::PtResolving;
pub use self::pt_sampling::PtSampling;
pub use self::pt_spatial_resampling::PtSpatialResampling;
pub use self::pt_temporal_resampling::PtTemporalResampling;
pub use self::ref_tracing::RefTracing;
