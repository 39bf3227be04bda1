use bytemuck::{Pod, Zeroable};

/// Settings shared by every pass of a frame.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct RestirParams {
    /// Number of independent paths traced per pixel before resampling
    pub initial_candidates: u32,

    /// Number of neighbors considered per spatial pass
    pub spatial_candidates: u32,

    /// See: [`Mis`]
    pub mis: u32,

    /// Last vertex index a path can reach (`x_0` being the primary hit)
    pub max_bounces: u32,

    /// Radius of the disk spatial neighbors are picked from, in pixels
    pub spatial_radius: f32,

    pub max_confidence: f32,
    pub min_reconnection_distance: f32,
    pub min_roughness: f32,
    pub normal_threshold: f32,
    pub depth_threshold: f32,
    pub _pad0: u32,
    pub _pad1: u32,
}

impl RestirParams {
    pub fn mis(&self) -> Mis {
        Mis::from_u32(self.mis)
    }
}

impl Default for RestirParams {
    fn default() -> Self {
        Self {
            initial_candidates: 1,
            spatial_candidates: 3,
            mis: Mis::Gbh as u32,
            max_bounces: 4,
            spatial_radius: 16.0,
            max_confidence: 20.0,
            min_reconnection_distance: 0.05,
            min_roughness: 0.2,
            normal_threshold: 0.8,
            depth_threshold: 0.1,
            _pad0: 0,
            _pad1: 0,
        }
    }
}

/// Multiple-importance-sampling weights used when resampling reservoirs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mis {
    /// Generalized balance heuristic; shifts every candidate into every other
    /// candidate's domain
    #[default]
    Gbh = 0,

    /// Pairwise weights; shifts only between the canonical candidate and the
    /// rest
    Pairwise = 1,

    /// Constant `1/M` weights; cheap but biased
    Biased = 2,
}

impl Mis {
    pub fn from_u32(mis: u32) -> Self {
        match mis {
            1 => Self::Pairwise,
            2 => Self::Biased,
            _ => Self::Gbh,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct PtSamplingPassParams {
    pub seed: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct PtTemporalResamplingPassParams {
    pub seed: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct PtSpatialResamplingPassParams {
    pub seed: u32,
    pub nth: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct RefTracingPassParams {
    pub seed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mis() {
        for mis in [Mis::Gbh, Mis::Pairwise, Mis::Biased] {
            assert_eq!(mis, Mis::from_u32(mis as u32));
        }

        let params = RestirParams {
            mis: Mis::Pairwise as u32,
            ..Default::default()
        };

        assert_eq!(Mis::Pairwise, params.mis());
    }
}
