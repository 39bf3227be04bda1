mod resampler;

use bytemuck::{Pod, Zeroable};
use glam::{ivec2, IVec2, UVec2, Vec3, Vec4};

pub use self::resampler::*;
use crate::{F32Ext, GBufferEntry, PathInfo, PathInfoData, WhiteNoise};

/// Sampling technique a path was generated with: the pixel its camera ray
/// went through and the seed of that camera ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain {
    pub pixel: IVec2,
    pub seed: u32,
}

impl Domain {
    pub const OFF_SCREEN: IVec2 = IVec2::NEG_ONE;

    pub fn new(pixel: UVec2, seed: u32) -> Self {
        Self {
            pixel: pixel.as_ivec2(),
            seed,
        }
    }

    pub fn off_screen() -> Self {
        Self {
            pixel: Self::OFF_SCREEN,
            seed: 0,
        }
    }

    pub fn is_on_screen(&self) -> bool {
        self.pixel.x >= 0 && self.pixel.y >= 0
    }

    pub fn pixel(&self) -> Option<UVec2> {
        self.is_on_screen().then(|| self.pixel.as_uvec2())
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::off_screen()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reservoir {
    pub sample: PathInfo,

    /// Unbiased contribution weight of `sample`
    pub w: f32,

    pub w_sum: f32,

    /// Confidence weight, i.e. roughly how many samples this reservoir has
    /// seen
    pub c: f32,

    pub is_null: bool,
    pub domain: Domain,
    pub gbuffer: GBufferEntry,
}

impl Reservoir {
    pub fn new(domain: Domain, gbuffer: GBufferEntry) -> Self {
        Self {
            sample: Default::default(),
            w: 0.0,
            w_sum: 0.0,
            c: 0.0,
            is_null: true,
            domain,
            gbuffer,
        }
    }

    pub fn read(buffer: &[ReservoirData], id: usize) -> Self {
        Self::unpack(buffer[id])
    }

    pub fn write(self, buffer: &mut [ReservoirData], id: usize) {
        buffer[id] = self.pack();
    }

    /// Streams a candidate into this reservoir; returns whether the candidate
    /// got selected.
    ///
    /// Weights that are not finite and positive count as zero.
    pub fn update(
        &mut self,
        wnoise: &mut WhiteNoise,
        sample: PathInfo,
        weight: f32,
    ) -> bool {
        let weight = weight.or_zero();

        self.w_sum += weight;

        if wnoise.sample() * self.w_sum < weight {
            self.sample = sample;
            self.is_null = false;
            true
        } else {
            false
        }
    }

    pub fn update_with_confidence(
        &mut self,
        wnoise: &mut WhiteNoise,
        sample: PathInfo,
        weight: f32,
        c: f32,
    ) -> bool {
        self.c += c;
        self.update(wnoise, sample, weight)
    }

    /// Computes the contribution weight of the selected sample.
    pub fn finalize(&mut self) {
        let p_hat = self.sample.p_hat();

        self.w = if self.is_null || p_hat <= 0.0 {
            0.0
        } else {
            (self.w_sum / p_hat).or_zero()
        };
    }

    pub fn clamp_confidence(&mut self, max: f32) {
        self.c = self.c.clamp(1.0, max.max(1.0));
    }

    /// Replaces this reservoir with a null one that cannot be shifted into,
    /// keeping its confidence.
    pub fn into_gated(self) -> Self {
        Self {
            c: self.c,
            ..Self::new(Domain::off_screen(), self.gbuffer)
        }
    }

    /// Returns this reservoir, or its gated version if it was sampled for a
    /// surface too different from `target`.
    pub fn gate(
        self,
        target: &GBufferEntry,
        normal_threshold: f32,
        depth_threshold: f32,
    ) -> Self {
        if target.is_similar_to(&self.gbuffer, normal_threshold, depth_threshold)
        {
            self
        } else {
            self.into_gated()
        }
    }

    /// Returns the radiance estimate of this reservoir.
    pub fn contribution(&self) -> Vec3 {
        if self.is_null {
            Vec3::ZERO
        } else {
            self.sample.f * self.w
        }
    }

    pub fn unpack(data: ReservoirData) -> Self {
        let flags = data.d0.w.to_bits();

        Self {
            sample: PathInfo::unpack(data.path),
            w: data.d0.x,
            w_sum: data.d0.y,
            c: data.d0.z,
            is_null: flags & ReservoirData::PRESENT == 0,
            domain: if flags & ReservoirData::ON_SCREEN == 0 {
                Domain::off_screen()
            } else {
                Domain {
                    pixel: ivec2(
                        data.d1.x.to_bits() as i32,
                        data.d1.y.to_bits() as i32,
                    ),
                    seed: data.d1.z.to_bits(),
                }
            },
            gbuffer: GBufferEntry::unpack(data.gbuffer),
        }
    }

    pub fn pack(self) -> ReservoirData {
        let mut flags = 0;

        if !self.is_null {
            flags |= ReservoirData::PRESENT;
        }

        if self.domain.is_on_screen() {
            flags |= ReservoirData::ON_SCREEN;
        }

        ReservoirData {
            path: self.sample.pack(),
            d0: Vec4::new(self.w, self.w_sum, self.c, f32::from_bits(flags)),
            d1: Vec4::new(
                f32::from_bits(self.domain.pixel.x as u32),
                f32::from_bits(self.domain.pixel.y as u32),
                f32::from_bits(self.domain.seed),
                0.0,
            ),
            gbuffer: self.gbuffer.pack(),
        }
    }
}

impl Default for Reservoir {
    fn default() -> Self {
        Self::new(Domain::off_screen(), GBufferEntry::default())
    }
}

/// Buffer layout of [`Reservoir`]; all-zeros decodes into an empty, gated
/// reservoir.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct ReservoirData {
    pub path: PathInfoData,

    /// x - w
    /// y - w_sum
    /// z - confidence
    /// w - flags
    pub d0: Vec4,

    /// x, y - domain's pixel
    /// z - domain's seed
    pub d1: Vec4,

    pub gbuffer: Vec4,
}

impl ReservoirData {
    const PRESENT: u32 = 1;
    const ON_SCREEN: u32 = 2;
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{uvec2, vec3};

    use super::*;

    fn path(luma: f32) -> PathInfo {
        PathInfo {
            f: Vec3::splat(luma),
            ..Default::default()
        }
    }

    #[test]
    fn conservation() {
        let mut wnoise = WhiteNoise::new(1, UVec2::ZERO);
        let mut reservoir = Reservoir::new(Domain::new(uvec2(1, 2), 3), Default::default());
        let weights = [0.5, 1.5, 0.25, 3.0, 0.75];

        for (idx, weight) in weights.into_iter().enumerate() {
            let w_sum = reservoir.w_sum;

            reservoir.update(&mut wnoise, path(idx as f32 + 1.0), weight);

            assert!(reservoir.w_sum >= w_sum);
        }

        assert_relative_eq!(weights.iter().sum::<f32>(), reservoir.w_sum);
        assert!(!reservoir.is_null);
    }

    #[test]
    fn degenerate_weights() {
        let mut wnoise = WhiteNoise::new(1, UVec2::ZERO);
        let mut reservoir = Reservoir::default();

        for weight in [f32::NAN, f32::INFINITY, -1.0, 0.0] {
            assert!(!reservoir.update(&mut wnoise, path(1.0), weight));
        }

        reservoir.finalize();

        assert_eq!(0.0, reservoir.w_sum);
        assert_eq!(0.0, reservoir.w);
        assert!(reservoir.is_null);
        assert_eq!(Vec3::ZERO, reservoir.contribution());
    }

    #[test]
    fn first_candidate_is_always_selected() {
        for seed in 0..64 {
            let mut wnoise = WhiteNoise::new(seed, UVec2::ZERO);
            let mut reservoir = Reservoir::default();

            assert!(reservoir.update(&mut wnoise, path(1.0), 1e-6));
        }
    }

    #[test]
    fn finalize() {
        let mut wnoise = WhiteNoise::new(1, UVec2::ZERO);
        let mut reservoir = Reservoir::default();

        reservoir.update(&mut wnoise, path(2.0), 4.0);
        reservoir.finalize();

        assert_relative_eq!(2.0, reservoir.w, epsilon = 1e-5);
        assert_relative_eq!(Vec3::splat(4.0), reservoir.contribution(), epsilon = 1e-4);
    }

    #[test]
    fn confidence() {
        let mut reservoir = Reservoir {
            c: 20.0 + 1e-3,
            ..Default::default()
        };

        reservoir.clamp_confidence(20.0);

        assert_eq!(20.0, reservoir.c);

        reservoir.c = 0.0;
        reservoir.clamp_confidence(20.0);

        assert_eq!(1.0, reservoir.c);
    }

    #[test]
    fn gating() {
        let up = GBufferEntry::new(vec3(0.0, 1.0, 0.0), 2.0);
        let side = GBufferEntry::new(vec3(1.0, 0.0, 0.0), 2.0);

        let reservoir = Reservoir {
            sample: path(1.0),
            w: 1.0,
            w_sum: 1.0,
            c: 5.0,
            is_null: false,
            domain: Domain::new(uvec2(3, 3), 123),
            gbuffer: up,
        };

        assert_eq!(reservoir, reservoir.gate(&up, 0.8, 0.1));

        let gated = reservoir.gate(&side, 0.8, 0.1);

        assert!(gated.is_null);
        assert!(!gated.domain.is_on_screen());
        assert_eq!(5.0, gated.c);
        assert_eq!(0.0, gated.w);
    }

    #[test]
    fn serialization() {
        let mut wnoise = WhiteNoise::new(1, UVec2::ZERO);

        let mut target = Reservoir::new(
            Domain::new(uvec2(12, 34), 0xcafebabe),
            GBufferEntry::new(vec3(0.0, 0.0, 1.0), 3.5),
        );

        target.update_with_confidence(&mut wnoise, path(1.5), 1.0, 4.0);
        target.finalize();

        let mut buffer = vec![ReservoirData::default(); 4];

        target.write(&mut buffer, 2);

        assert_eq!(target, Reservoir::read(&buffer, 2));

        // ---

        let empty = Reservoir::read(&buffer, 0);

        assert!(empty.is_null);
        assert!(!empty.domain.is_on_screen());
        assert_eq!(0.0, empty.c);
    }
}
