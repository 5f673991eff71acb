// Copyright @yucwang 2026

use crate::core::texture::Texture;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;

/// Same colour everywhere. Scene files use it to share one value between
/// several material parameters.
pub struct ConstantTexture {
    value: RGBSpectrum,
}

impl ConstantTexture {
    pub fn new(value: RGBSpectrum) -> Self {
        Self { value }
    }

    pub fn splat(value: Float) -> Self {
        Self::new(RGBSpectrum::splat(value))
    }

    pub fn value(&self) -> RGBSpectrum {
        self.value
    }
}

impl Texture for ConstantTexture {
    fn eval(&self, _uv: Vector2f) -> RGBSpectrum {
        self.value
    }

    fn describe(&self) -> String {
        format!("ConstantTexture [{:?}]", self.value)
    }
}
