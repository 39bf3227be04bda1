use bytemuck::{Pod, Zeroable};
use glam::{vec2, Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::{Lobe, TriangleId, Vec3Ext};

/// How a path's last vertex was found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PathTermination {
    /// Next-event estimation picked a point on an emissive triangle
    LightSampled,

    /// Next-event estimation picked a direction towards the environment
    EnvmapSampled,

    /// BRDF-sampled ray hit an emissive triangle
    #[default]
    BrdfSampled,

    /// BRDF-sampled ray didn't hit anything
    EscapedToEnvmap,
}

impl PathTermination {
    pub fn is_light_sampled(self) -> bool {
        matches!(self, Self::LightSampled | Self::EnvmapSampled)
    }

    fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::LightSampled,
            1 => Self::EnvmapSampled,
            2 => Self::BrdfSampled,
            _ => Self::EscapedToEnvmap,
        }
    }

    fn to_bits(self) -> u32 {
        match self {
            Self::LightSampled => 0,
            Self::EnvmapSampled => 1,
            Self::BrdfSampled => 2,
            Self::EscapedToEnvmap => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LobePair {
    /// Lobe of the vertex preceding the reconnection vertex
    pub prev: Lobe,

    /// Lobe of the reconnection vertex itself
    pub anchor: Lobe,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReconnectionVertex {
    Surface {
        triangle_id: TriangleId,
        barycentrics: Vec2,
    },
    Environment {
        direction: Vec3,
    },
}

/// Vertex a shifted path connects to, together with what the path looks like
/// after it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reconnection {
    /// Index of the reconnection vertex; `x_0` is the primary hit
    pub bounce: u32,

    pub lobes: LobePair,
    pub vertex: ReconnectionVertex,

    /// Radiance arriving at the reconnection vertex from
    /// `radiance_direction`, already multiplied by the path's throughput after
    /// that vertex; emitted radiance when the reconnection vertex is the
    /// path's last one
    pub radiance: Vec3,

    pub radiance_direction: Vec3,

    /// Solid-angle pdf of next-event estimation picking the vertex right after
    /// the reconnection vertex; zero if the path continues further than that
    pub light_pdf: f32,
}

impl Reconnection {
    /// Returns whether the reconnection vertex is the last vertex of a path
    /// with given number of bounces.
    pub fn is_endpoint(&self, bounce_count: u32) -> bool {
        self.bounce + 1 == bounce_count
    }
}

/// Pair of numbers whose product converts contributions between the
/// domains of different pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jacobian {
    pub pdf: f32,
    pub geometry: f32,
}

impl Jacobian {
    pub const ONE: Self = Self {
        pdf: 1.0,
        geometry: 1.0,
    };

    pub fn new(pdf: f32, geometry: f32) -> Self {
        Self { pdf, geometry }
    }

    pub fn value(self) -> f32 {
        self.pdf * self.geometry
    }

    /// Returns the Jacobian of moving from `self`'s domain into `other`'s.
    pub fn ratio(self, other: Self) -> f32 {
        let this = self.value();

        if this > 0.0 && this.is_finite() {
            other.value() / this
        } else {
            0.0
        }
    }
}

impl Default for Jacobian {
    fn default() -> Self {
        Self::ONE
    }
}

/// A light-transport path, compressed to what's needed to replay it from a
/// different pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathInfo {
    /// Unweighted contribution: radiance times throughput times the path's
    /// NEE/BRDF weight
    pub f: Vec3,

    /// Random state the camera ray was generated from
    pub first_vertex_seed: u32,

    /// Random state the bounces were generated from
    pub seed: u32,

    /// Number of vertices after the camera, last vertex included
    pub bounce_count: u32,

    pub termination: PathTermination,

    /// `None` for paths that can only be shifted through random replay
    pub reconnection: Option<Reconnection>,

    pub jacobian: Jacobian,
}

impl PathInfo {
    /// Returns the target function.
    pub fn p_hat(&self) -> f32 {
        self.f.luma().max(0.0)
    }

    pub fn unpack(data: PathInfoData) -> Self {
        let flags = data.d2.w.to_bits();
        let lobes = LobePair {
            prev: Lobe::from_bits(flags >> 3),
            anchor: Lobe::from_bits(flags >> 5),
        };

        let reconnection = if flags & PathInfoData::RECONNECTS != 0 {
            let vertex = if flags & PathInfoData::ENVIRONMENT != 0 {
                ReconnectionVertex::Environment {
                    direction: data.d3.xyz(),
                }
            } else {
                ReconnectionVertex::Surface {
                    triangle_id: TriangleId::new(data.d3.w.to_bits()),
                    barycentrics: vec2(data.d3.x, data.d3.y),
                }
            };

            Some(Reconnection {
                bounce: (flags >> 16) & 0xff,
                lobes,
                vertex,
                radiance: data.d1.xyz(),
                radiance_direction: data.d2.xyz(),
                light_pdf: data.d4.z,
            })
        } else {
            None
        };

        Self {
            f: data.d0.xyz(),
            first_vertex_seed: data.d0.w.to_bits(),
            seed: data.d1.w.to_bits(),
            bounce_count: (flags >> 8) & 0xff,
            termination: PathTermination::from_bits(flags),
            reconnection,
            jacobian: Jacobian::new(data.d4.x, data.d4.y),
        }
    }

    pub fn pack(&self) -> PathInfoData {
        let mut flags =
            self.termination.to_bits() | ((self.bounce_count & 0xff) << 8);

        let mut d1 = Vec3::ZERO;
        let mut d2 = Vec3::ZERO;
        let mut d3 = Vec4::ZERO;
        let mut light_pdf = 0.0;

        if let Some(reconnection) = &self.reconnection {
            flags |= PathInfoData::RECONNECTS;
            flags |= reconnection.lobes.prev.to_bits() << 3;
            flags |= reconnection.lobes.anchor.to_bits() << 5;
            flags |= (reconnection.bounce & 0xff) << 16;

            d3 = match reconnection.vertex {
                ReconnectionVertex::Surface {
                    triangle_id,
                    barycentrics,
                } => barycentrics
                    .extend(0.0)
                    .extend(f32::from_bits(triangle_id.get())),

                ReconnectionVertex::Environment { direction } => {
                    flags |= PathInfoData::ENVIRONMENT;
                    direction.extend(0.0)
                }
            };

            d1 = reconnection.radiance;
            d2 = reconnection.radiance_direction;
            light_pdf = reconnection.light_pdf;
        }

        PathInfoData {
            d0: self.f.extend(f32::from_bits(self.first_vertex_seed)),
            d1: d1.extend(f32::from_bits(self.seed)),
            d2: d2.extend(f32::from_bits(flags)),
            d3,
            d4: Vec4::new(
                self.jacobian.pdf,
                self.jacobian.geometry,
                light_pdf,
                0.0,
            ),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct PathInfoData {
    /// x, y, z - contribution
    /// w - first vertex seed
    pub d0: Vec4,

    /// x, y, z - reconnection radiance
    /// w - seed
    pub d1: Vec4,

    /// x, y, z - reconnection radiance direction
    /// w - flags (see the `RECONNECTS` and `ENVIRONMENT` constants, plus:
    /// bits 0..2 - termination, 3..5 - previous lobe, 5..7 - reconnection
    /// lobe, 8..16 - bounce count, 16..24 - reconnection bounce)
    pub d2: Vec4,

    /// x, y - reconnection barycentrics, w - reconnection triangle; or
    /// x, y, z - reconnection direction towards the environment
    pub d3: Vec4,

    /// x - Jacobian's pdf
    /// y - Jacobian's geometry term
    /// z - reconnection's light pdf
    pub d4: Vec4,
}

impl PathInfoData {
    const RECONNECTS: u32 = 1 << 2;
    const ENVIRONMENT: u32 = 1 << 7;
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    fn surface_path() -> PathInfo {
        PathInfo {
            f: vec3(1.0, 2.0, 3.0),
            first_vertex_seed: 0xcafebabe,
            seed: 0xdeadbeef,
            bounce_count: 3,
            termination: PathTermination::LightSampled,
            reconnection: Some(Reconnection {
                bounce: 1,
                lobes: LobePair {
                    prev: Lobe::Glossy,
                    anchor: Lobe::Diffuse,
                },
                vertex: ReconnectionVertex::Surface {
                    triangle_id: TriangleId::new(1234),
                    barycentrics: vec2(0.25, 0.5),
                },
                radiance: vec3(4.0, 5.0, 6.0),
                radiance_direction: vec3(0.0, 1.0, 0.0),
                light_pdf: 0.75,
            }),
            jacobian: Jacobian::new(0.5, 0.125),
        }
    }

    #[test]
    fn serialization() {
        let surface = surface_path();

        let environment = PathInfo {
            termination: PathTermination::EscapedToEnvmap,
            reconnection: Some(Reconnection {
                vertex: ReconnectionVertex::Environment {
                    direction: vec3(0.0, 0.0, -1.0),
                },
                lobes: LobePair {
                    prev: Lobe::Diffuse,
                    anchor: Lobe::Emitter,
                },
                ..surface.reconnection.unwrap()
            }),
            ..surface
        };

        let replay = PathInfo {
            termination: PathTermination::BrdfSampled,
            bounce_count: 5,
            reconnection: None,
            ..surface
        };

        for path in [surface, environment, replay] {
            assert_eq!(path, PathInfo::unpack(path.pack()));
        }
    }

    #[test]
    fn zeroed_data_has_no_reconnection() {
        let path = PathInfo::unpack(PathInfoData::zeroed());

        assert_eq!(None, path.reconnection);
        assert_eq!(0.0, path.p_hat());
    }

    #[test]
    fn jacobian() {
        let x = Jacobian::new(2.0, 0.5);
        let y = Jacobian::new(1.0, 0.25);

        assert_eq!(0.25, x.ratio(y));
        assert_eq!(4.0, y.ratio(x));
        assert_eq!(0.0, Jacobian::new(0.0, 1.0).ratio(x));
        assert_eq!(1.0, Jacobian::ONE.ratio(Jacobian::ONE));
    }

    #[test]
    fn endpoint() {
        let path = surface_path();
        let reconnection = path.reconnection.unwrap();

        assert!(!reconnection.is_endpoint(path.bounce_count));
        assert!(reconnection.is_endpoint(2));
    }
}
