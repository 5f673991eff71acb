// Copyright @yucwang 2023

use crate::core::rng::LcgRng;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::frame::ShadingFrame;
use crate::math::spectrum::RGBSpectrum;

// Definitions of types used in BSDF sampling and eval
// processes
pub type BSDFValue = RGBSpectrum;

/// The lobes a layered material can pick from when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lobe {
    Diffuse,
    Glossy,
    Clearcoat,
    Transmission,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSDFSampleRecord {
    pub value: BSDFValue,
    pub wi: Vector3f,
    pub pdf: Float,
    pub lobe: Option<Lobe>,
}

impl BSDFSampleRecord {
    pub fn new(value: BSDFValue, wi: Vector3f, pdf: Float, lobe: Lobe) -> Self {
        Self { value, wi, pdf, lobe: Some(lobe) }
    }

    /// A rejected sample: no direction, zero value, zero density.
    pub fn invalid() -> Self {
        Self {
            value: RGBSpectrum::default(),
            wi: Vector3f::zeros(),
            pdf: 0.0,
            lobe: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0 && !self.value.is_black()
    }
}

impl Default for BSDFSampleRecord {
    fn default() -> Self {
        Self::invalid()
    }
}

/// Directions are in world space and point away from the surface.
pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    fn eval(&self, frame: &ShadingFrame, wo: &Vector3f, wi: &Vector3f) -> BSDFValue;
    fn pdf(&self, frame: &ShadingFrame, wo: &Vector3f, wi: &Vector3f) -> Float;
    fn sample(&self, frame: &ShadingFrame, wo: &Vector3f, rng: &mut LcgRng) -> BSDFSampleRecord;
    fn sample_lobe(&self, lobe: Lobe, frame: &ShadingFrame, wo: &Vector3f, u: &Vector2f) -> Option<Vector3f>;
}
