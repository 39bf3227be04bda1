use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

use crate::{Lobe, Vec3Ext};

#[repr(C)]
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Material {
    pub base_color: Vec4,
    pub emissive: Vec4,
    pub roughness: f32,
    pub kind: u32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl Material {
    /// Smallest roughness a glossy lobe is evaluated with; the microfacet
    /// distribution degenerates into a delta below it.
    pub const MIN_GLOSSY_ROUGHNESS: f32 = 0.05;

    pub fn kind(&self) -> MaterialKind {
        MaterialKind::from_u32(self.kind)
    }

    pub fn lobe(&self) -> Lobe {
        match self.kind() {
            MaterialKind::Diffuse => Lobe::Diffuse,
            MaterialKind::Glossy => Lobe::Glossy,
            MaterialKind::Mirror => Lobe::Mirror,
        }
    }

    pub fn base_color(&self) -> Vec3 {
        self.base_color.xyz()
    }

    pub fn emission(&self) -> Vec3 {
        self.emissive.xyz()
    }

    pub fn is_emissive(&self) -> bool {
        self.emission().is_lit()
    }

    pub fn is_delta(&self) -> bool {
        self.kind() == MaterialKind::Mirror
    }

    /// Returns whether a vertex with this material can take part in a
    /// reconnection.
    pub fn is_rough(&self, min_roughness: f32) -> bool {
        match self.kind() {
            MaterialKind::Diffuse => true,
            MaterialKind::Glossy => self.roughness >= min_roughness,
            MaterialKind::Mirror => false,
        }
    }

    /// Returns the GGX alpha used to evaluate the glossy lobe.
    pub fn alpha(&self) -> f32 {
        let roughness = self.roughness.clamp(Self::MIN_GLOSSY_ROUGHNESS, 1.0);

        roughness * roughness
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            emissive: Vec4::ZERO,
            roughness: 1.0,
            kind: MaterialKind::Diffuse as u32,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    Diffuse = 0,
    Glossy = 1,
    Mirror = 2,
}

impl MaterialKind {
    pub fn from_u32(kind: u32) -> Self {
        match kind {
            1 => Self::Glossy,
            2 => Self::Mirror,
            _ => Self::Diffuse,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use glam::vec4;

    use super::*;

    #[test]
    fn roughness_policy() {
        let diffuse = Material {
            roughness: 0.0,
            ..Default::default()
        };

        let glossy = |roughness| Material {
            roughness,
            kind: MaterialKind::Glossy as u32,
            ..Default::default()
        };

        let mirror = Material {
            kind: MaterialKind::Mirror as u32,
            ..Default::default()
        };

        assert!(diffuse.is_rough(0.2));
        assert!(glossy(0.2).is_rough(0.2));
        assert!(!glossy(0.19).is_rough(0.2));
        assert!(!mirror.is_rough(0.0));
        assert!(mirror.is_delta());
    }

    #[test]
    fn emission() {
        let mut material = Material::default();

        assert!(!material.is_emissive());

        material.emissive = vec4(0.0, 2.0, 0.0, 0.0);

        assert!(material.is_emissive());
    }
}
