use core::f32::consts::PI;

use glam::{vec3, Vec2, Vec3};

use crate::{
    cosine_hemisphere, F32Ext, Material, MaterialKind, Vec3Ext,
};

/// Scattering lobe of a path vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Lobe {
    #[default]
    Diffuse,
    Glossy,
    Mirror,
    Emitter,
}

impl Lobe {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0 => Self::Diffuse,
            1 => Self::Glossy,
            2 => Self::Mirror,
            _ => Self::Emitter,
        }
    }

    pub fn to_bits(self) -> u32 {
        match self {
            Self::Diffuse => 0,
            Self::Glossy => 1,
            Self::Mirror => 2,
            Self::Emitter => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BrdfEval {
    /// BRDF multiplied by the cosine of the incoming direction
    pub value: Vec3,

    /// Solid-angle pdf of `sample()` producing the incoming direction
    pub pdf: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BrdfSample {
    pub direction: Vec3,

    /// `value / pdf`; for delta lobes it's just the lobe's color
    pub weight: Vec3,

    /// Solid-angle pdf; 1.0 for delta lobes
    pub pdf: f32,

    pub is_delta: bool,
}

/// BRDF of a single vertex.
///
/// Shading is two-sided: `normal` is expected to face the outgoing direction.
#[derive(Clone, Copy)]
pub struct Brdf<'a> {
    material: &'a Material,
    normal: Vec3,
}

impl<'a> Brdf<'a> {
    pub fn new(material: &'a Material, normal: Vec3) -> Self {
        Self { material, normal }
    }

    pub fn eval(self, wo: Vec3, wi: Vec3) -> BrdfEval {
        let n_o_l = self.normal.dot(wi);
        let n_o_v = self.normal.dot(wo);

        if n_o_l <= 0.0 || n_o_v <= 0.0 {
            return Default::default();
        }

        match self.material.kind() {
            MaterialKind::Diffuse => BrdfEval {
                value: self.material.base_color() * (n_o_l / PI),
                pdf: n_o_l / PI,
            },

            MaterialKind::Glossy => {
                let h = (wo + wi).normalize();
                let n_o_h = self.normal.dot(h).saturate();
                let v_o_h = wo.dot(h).abs();
                let alpha = self.material.alpha();

                let d = d_ggx(alpha, n_o_h);
                let g = g1_smith(alpha, n_o_v) * g1_smith(alpha, n_o_l);
                let f = fresnel(self.material.base_color(), wi.dot(h).saturate());

                BrdfEval {
                    value: f * (d * g / (4.0 * n_o_v)),
                    pdf: d * n_o_h / (4.0 * v_o_h.max(1e-6)),
                }
            }

            MaterialKind::Mirror => Default::default(),
        }
    }

    pub fn sample(self, wo: Vec3, u: Vec2) -> Option<BrdfSample> {
        let direction = match self.material.kind() {
            MaterialKind::Diffuse => {
                cosine_hemisphere(u).from_local(self.normal)
            }

            MaterialKind::Glossy => {
                let alpha = self.material.alpha();
                let a2 = alpha * alpha;
                let phi = 2.0 * PI * u.y;
                let cos2 = (1.0 - u.x) / (1.0 + (a2 - 1.0) * u.x);
                let cos = cos2.max(0.0).sqrt();
                let sin = (1.0 - cos2).max(0.0).sqrt();
                let h = vec3(sin * phi.cos(), sin * phi.sin(), cos)
                    .from_local(self.normal);

                (-wo).reflect(h)
            }

            MaterialKind::Mirror => {
                let direction = (-wo).reflect(self.normal);

                if self.normal.dot(direction) <= 0.0 {
                    return None;
                }

                return Some(BrdfSample {
                    direction,
                    weight: self.material.base_color(),
                    pdf: 1.0,
                    is_delta: true,
                });
            }
        };

        let eval = self.eval(wo, direction);

        if eval.pdf <= 0.0 {
            return None;
        }

        let weight = eval.value / eval.pdf;

        if !weight.is_finite() {
            return None;
        }

        Some(BrdfSample {
            direction,
            weight,
            pdf: eval.pdf,
            is_delta: false,
        })
    }
}

fn d_ggx(alpha: f32, n_o_h: f32) -> f32 {
    let a2 = alpha * alpha;

    a2 / (PI * (n_o_h * n_o_h * (a2 - 1.0) + 1.0).sqr())
}

fn g1_smith(alpha: f32, n_o_x: f32) -> f32 {
    let a2 = alpha * alpha;

    2.0 * n_o_x / (n_o_x + (a2 + (1.0 - a2) * n_o_x * n_o_x).sqrt())
}

fn fresnel(f0: Vec3, l_o_h: f32) -> Vec3 {
    f0 + (Vec3::ONE - f0) * (1.0 - l_o_h).powf(5.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{vec2, vec4, UVec2};

    use super::*;
    use crate::WhiteNoise;

    fn material(kind: MaterialKind, roughness: f32) -> Material {
        Material {
            base_color: vec4(0.8, 0.6, 0.4, 1.0),
            roughness,
            kind: kind as u32,
            ..Default::default()
        }
    }

    #[test]
    fn lobe_bits() {
        for lobe in [Lobe::Diffuse, Lobe::Glossy, Lobe::Mirror, Lobe::Emitter] {
            assert_eq!(lobe, Lobe::from_bits(lobe.to_bits()));
        }
    }

    /// Directions produced by `sample()` must be evaluated by `eval()` with the
    /// very same pdf and weight.
    #[test]
    fn sample_matches_eval() {
        let normal = vec3(0.0, 1.0, 0.0);
        let wo = vec3(0.3, 0.8, -0.2).normalize();
        let mut wnoise = WhiteNoise::new(1, UVec2::ZERO);

        for (kind, roughness) in
            [(MaterialKind::Diffuse, 1.0), (MaterialKind::Glossy, 0.4)]
        {
            let material = material(kind, roughness);
            let brdf = Brdf::new(&material, normal);

            for _ in 0..256 {
                let Some(sample) = brdf.sample(wo, wnoise.sample2()) else {
                    continue;
                };

                let eval = brdf.eval(wo, sample.direction);

                assert!(!sample.is_delta);
                assert_relative_eq!(eval.pdf, sample.pdf, max_relative = 1e-4);

                assert_relative_eq!(
                    eval.value / eval.pdf,
                    sample.weight,
                    max_relative = 1e-4
                );
            }
        }
    }

    /// Integrating the pdf over the hemisphere via uniform sampling should
    /// give one; glossy lobes lose a bit of mass below the horizon.
    #[test]
    fn pdf_integrates_to_one() {
        let normal = vec3(0.0, 0.0, 1.0);
        let wo = vec3(0.0, 0.0, 1.0);
        let mut wnoise = WhiteNoise::new(2, UVec2::ZERO);

        for (kind, roughness, min) in [
            (MaterialKind::Diffuse, 1.0, 0.97),
            (MaterialKind::Glossy, 0.3, 0.9),
        ] {
            let material = material(kind, roughness);
            let brdf = Brdf::new(&material, normal);
            let mut sum = 0.0f64;
            let n = 200_000;

            for _ in 0..n {
                let mut wi = wnoise.sample_sphere();

                wi.z = wi.z.abs();

                sum += (brdf.eval(wo, wi).pdf * (2.0 * PI)) as f64;
            }

            let integral = sum / (n as f64);

            assert!(
                integral > min && integral < 1.05,
                "{:?}: {}",
                kind,
                integral
            );
        }
    }

    #[test]
    fn mirror() {
        let material = material(MaterialKind::Mirror, 0.0);
        let brdf = Brdf::new(&material, vec3(0.0, 1.0, 0.0));
        let wo = vec3(1.0, 1.0, 0.0).normalize();
        let sample = brdf.sample(wo, vec2(0.5, 0.5)).unwrap();

        assert!(sample.is_delta);
        assert_relative_eq!(vec3(-1.0, 1.0, 0.0).normalize(), sample.direction);
        assert_relative_eq!(vec3(0.8, 0.6, 0.4), sample.weight);
        assert_eq!(BrdfEval::default(), brdf.eval(wo, sample.direction));
    }

    #[test]
    fn below_horizon() {
        let material = material(MaterialKind::Diffuse, 1.0);
        let brdf = Brdf::new(&material, vec3(0.0, 1.0, 0.0));

        let eval = brdf.eval(vec3(0.0, 1.0, 0.0), vec3(0.0, -1.0, 0.0));

        assert_eq!(BrdfEval::default(), eval);
    }
}
