use crate::gpu::{self, Mis};
use crate::ConfigError;

/// Knobs of the resampling engine.
///
/// Every field has a builder-style setter (`with_*`); the whole thing gets
/// checked through [`Config::validate()`] when it's handed to the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of paths traced per pixel per frame, merged into a single
    /// reservoir before any reuse happens
    pub initial_candidates: u32,

    /// Number of neighbors visited by each spatial pass
    pub spatial_candidates: u32,

    /// Radius of the disk spatial neighbors are picked from, in pixels
    pub spatial_radius: f32,

    pub spatial_passes: u32,

    /// Whether reservoirs are reused across frames
    pub temporal: bool,

    pub mis: Mis,

    /// Confidence reservoirs are clamped to after every merge; bounds how
    /// much history a pixel can accumulate
    pub max_confidence: f32,

    /// Vertices closer than this to their predecessor can't be reconnected
    /// through
    pub min_reconnection_distance: f32,

    /// Glossy surfaces rougher than this can be reconnected through
    pub min_roughness: f32,

    pub max_bounces: u32,

    /// Minimum cosine between normals of neighbors allowed to share paths
    pub normal_threshold: f32,

    /// Maximum relative depth difference between neighbors allowed to share
    /// paths
    pub depth_threshold: f32,

    /// Seed of the random numbers drawn by the renderer; `None` draws it from
    /// the operating system
    pub seed: Option<u64>,
}

impl Config {
    pub fn with_initial_candidates(mut self, value: u32) -> Self {
        self.initial_candidates = value;
        self
    }

    pub fn with_spatial_candidates(mut self, value: u32) -> Self {
        self.spatial_candidates = value;
        self
    }

    pub fn with_spatial_radius(mut self, value: f32) -> Self {
        self.spatial_radius = value;
        self
    }

    pub fn with_spatial_passes(mut self, value: u32) -> Self {
        self.spatial_passes = value;
        self
    }

    pub fn with_temporal(mut self, value: bool) -> Self {
        self.temporal = value;
        self
    }

    pub fn with_mis(mut self, value: Mis) -> Self {
        self.mis = value;
        self
    }

    pub fn with_max_confidence(mut self, value: f32) -> Self {
        self.max_confidence = value;
        self
    }

    pub fn with_min_reconnection_distance(mut self, value: f32) -> Self {
        self.min_reconnection_distance = value;
        self
    }

    pub fn with_min_roughness(mut self, value: f32) -> Self {
        self.min_roughness = value;
        self
    }

    pub fn with_max_bounces(mut self, value: u32) -> Self {
        self.max_bounces = value;
        self
    }

    pub fn with_normal_threshold(mut self, value: f32) -> Self {
        self.normal_threshold = value;
        self
    }

    pub fn with_depth_threshold(mut self, value: f32) -> Self {
        self.depth_threshold = value;
        self
    }

    pub fn with_seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_initial_candidates = gpu::MAX_INITIAL_CANDIDATES as u32;
        let max_spatial_candidates = gpu::MAX_SPATIAL_CANDIDATES as u32;

        if !(1..=max_initial_candidates).contains(&self.initial_candidates) {
            return Err(ConfigError::out_of_range(
                "initial_candidates",
                "1..=4",
                self.initial_candidates,
            ));
        }

        if self.spatial_candidates > max_spatial_candidates {
            return Err(ConfigError::out_of_range(
                "spatial_candidates",
                "0..=6",
                self.spatial_candidates,
            ));
        }

        if !(self.spatial_radius >= 1.0 && self.spatial_radius.is_finite()) {
            return Err(ConfigError::out_of_range(
                "spatial_radius",
                ">= 1",
                self.spatial_radius,
            ));
        }

        if self.spatial_passes > 4 {
            return Err(ConfigError::out_of_range(
                "spatial_passes",
                "0..=4",
                self.spatial_passes,
            ));
        }

        if !(self.max_confidence >= 1.0 && self.max_confidence.is_finite()) {
            return Err(ConfigError::out_of_range(
                "max_confidence",
                ">= 1",
                self.max_confidence,
            ));
        }

        if !(self.min_reconnection_distance >= 0.0
            && self.min_reconnection_distance.is_finite())
        {
            return Err(ConfigError::out_of_range(
                "min_reconnection_distance",
                ">= 0",
                self.min_reconnection_distance,
            ));
        }

        if !(0.0..=1.0).contains(&self.min_roughness) {
            return Err(ConfigError::out_of_range(
                "min_roughness",
                "0..=1",
                self.min_roughness,
            ));
        }

        if !(1..=gpu::MAX_BOUNCES).contains(&self.max_bounces) {
            return Err(ConfigError::out_of_range(
                "max_bounces",
                "1..=16",
                self.max_bounces,
            ));
        }

        if !(-1.0..=1.0).contains(&self.normal_threshold) {
            return Err(ConfigError::out_of_range(
                "normal_threshold",
                "-1..=1",
                self.normal_threshold,
            ));
        }

        if !(self.depth_threshold > 0.0) {
            return Err(ConfigError::out_of_range(
                "depth_threshold",
                "> 0",
                self.depth_threshold,
            ));
        }

        Ok(())
    }

    pub(crate) fn serialize(&self) -> gpu::RestirParams {
        gpu::RestirParams {
            initial_candidates: self.initial_candidates,
            spatial_candidates: self.spatial_candidates,
            mis: self.mis as u32,
            max_bounces: self.max_bounces,
            spatial_radius: self.spatial_radius,
            max_confidence: self.max_confidence,
            min_reconnection_distance: self.min_reconnection_distance,
            min_roughness: self.min_roughness,
            normal_threshold: self.normal_threshold,
            depth_threshold: self.depth_threshold,
            _pad0: 0,
            _pad1: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let params = gpu::RestirParams::default();

        Self {
            initial_candidates: params.initial_candidates,
            spatial_candidates: params.spatial_candidates,
            spatial_radius: params.spatial_radius,
            spatial_passes: 1,
            temporal: true,
            mis: params.mis(),
            max_confidence: params.max_confidence,
            min_reconnection_distance: params.min_reconnection_distance,
            min_roughness: params.min_roughness,
            max_bounces: params.max_bounces,
            normal_threshold: params.normal_threshold,
            depth_threshold: params.depth_threshold,
            seed: None,
        }
    }
}
