// Copyright @yucwang 2026

use crate::core::texture::Texture;
use crate::materials::disney::DisneyMaterial;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;

use log::trace;

const MIN_IOR: Float = 1e-3;

/// A scalar material input: a constant, or one channel of a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarParam {
    Value(Float),
    Texture { id: usize, channel: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorParam {
    Value(RGBSpectrum),
    Texture(usize),
}

impl ScalarParam {
    fn resolve(&self, uv: Vector2f, textures: &[Box<dyn Texture>], fallback: Float) -> Float {
        match *self {
            ScalarParam::Value(v) => v,
            ScalarParam::Texture { id, channel } => match textures.get(id) {
                Some(texture) => texture.eval_channel(uv, channel),
                None => {
                    trace!("texture {} not bound, using {}", id, fallback);
                    fallback
                }
            },
        }
    }
}

impl ColorParam {
    fn resolve(&self, uv: Vector2f, textures: &[Box<dyn Texture>], fallback: RGBSpectrum) -> RGBSpectrum {
        match *self {
            ColorParam::Value(v) => v,
            ColorParam::Texture(id) => match textures.get(id) {
                Some(texture) => texture.eval(uv),
                None => {
                    trace!("texture {} not bound, using {:?}", id, fallback);
                    fallback
                }
            },
        }
    }
}

/// Per-object parameter block as stored in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialParams {
    pub base_color: ColorParam,
    pub metallic: ScalarParam,
    pub specular: ScalarParam,
    pub roughness: ScalarParam,
    pub specular_tint: ScalarParam,
    pub anisotropy: ScalarParam,
    pub sheen: ScalarParam,
    pub sheen_tint: ScalarParam,
    pub clearcoat: ScalarParam,
    pub clearcoat_gloss: ScalarParam,
    pub ior: ScalarParam,
    pub specular_transmission: ScalarParam,
}

impl Default for MaterialParams {
    fn default() -> Self {
        MaterialParams::from_material(&DisneyMaterial::default())
    }
}

fn unit(v: Float) -> Float {
    v.max(0.0).min(1.0)
}

impl MaterialParams {
    pub fn from_material(m: &DisneyMaterial) -> Self {
        Self {
            base_color: ColorParam::Value(m.base_color),
            metallic: ScalarParam::Value(m.metallic),
            specular: ScalarParam::Value(m.specular),
            roughness: ScalarParam::Value(m.roughness),
            specular_tint: ScalarParam::Value(m.specular_tint),
            anisotropy: ScalarParam::Value(m.anisotropy),
            sheen: ScalarParam::Value(m.sheen),
            sheen_tint: ScalarParam::Value(m.sheen_tint),
            clearcoat: ScalarParam::Value(m.clearcoat),
            clearcoat_gloss: ScalarParam::Value(m.clearcoat_gloss),
            ior: ScalarParam::Value(m.ior),
            specular_transmission: ScalarParam::Value(m.specular_transmission),
        }
    }

    /// Builds the material seen at `uv`, sampling any bound textures and
    /// clamping every input to its legal range.
    pub fn resolve(&self, uv: Vector2f, textures: &[Box<dyn Texture>]) -> DisneyMaterial {
        let d = DisneyMaterial::default();
        DisneyMaterial {
            base_color: self.base_color.resolve(uv, textures, d.base_color).clamp(0.0, 1.0),
            metallic: unit(self.metallic.resolve(uv, textures, d.metallic)),
            specular: unit(self.specular.resolve(uv, textures, d.specular)),
            roughness: unit(self.roughness.resolve(uv, textures, d.roughness)),
            specular_tint: unit(self.specular_tint.resolve(uv, textures, d.specular_tint)),
            anisotropy: unit(self.anisotropy.resolve(uv, textures, d.anisotropy)),
            sheen: unit(self.sheen.resolve(uv, textures, d.sheen)),
            sheen_tint: unit(self.sheen_tint.resolve(uv, textures, d.sheen_tint)),
            clearcoat: unit(self.clearcoat.resolve(uv, textures, d.clearcoat)),
            clearcoat_gloss: unit(self.clearcoat_gloss.resolve(uv, textures, d.clearcoat_gloss)),
            ior: self.ior.resolve(uv, textures, d.ior).max(MIN_IOR),
            specular_transmission: unit(self.specular_transmission.resolve(uv, textures, d.specular_transmission)),
        }
    }
}
