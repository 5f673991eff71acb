// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;

pub trait Texture: Send + Sync {
    fn eval(&self, uv: Vector2f) -> RGBSpectrum;

    /// One colour channel, for textures that drive a scalar parameter.
    /// Channels past blue read the luminance.
    fn eval_channel(&self, uv: Vector2f, channel: usize) -> Float {
        let value = self.eval(uv);
        if channel < 3 {
            value[channel]
        } else {
            value.luminance()
        }
    }

    fn describe(&self) -> String;
}
