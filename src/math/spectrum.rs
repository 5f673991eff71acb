// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

use std::ops;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBSpectrum {
    rgb: Vector3f
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self { rgb: Vector3f::new(0.0f32, 0.0f32, 0.0f32) }
    }
}

impl RGBSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn splat(v: Float) -> Self {
        Self::new(v, v, v)
    }

    pub fn from_vector(rgb: Vector3f) -> Self {
        Self { rgb }
    }

    pub fn to_vector(&self) -> Vector3f {
        self.rgb
    }

    pub fn r(&self) -> Float {
        self.rgb.x
    }

    pub fn g(&self) -> Float {
        self.rgb.y
    }

    pub fn b(&self) -> Float {
        self.rgb.z
    }

    pub fn is_black(&self) -> bool {
        self.rgb.iter().all(|c| *c == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.rgb.iter().all(|c| c.is_finite())
    }

    pub fn max_component(&self) -> Float {
        self.rgb.x.max(self.rgb.y).max(self.rgb.z)
    }

    // Rec. 709 luma weights.
    pub fn luminance(&self) -> Float {
        0.2126 * self.rgb.x + 0.7152 * self.rgb.y + 0.0722 * self.rgb.z
    }

    pub fn lerp(a: RGBSpectrum, b: RGBSpectrum, t: Float) -> RGBSpectrum {
        a * (1.0 - t) + b * t
    }

    pub fn clamp(&self, lo: Float, hi: Float) -> RGBSpectrum {
        Self::new(self.rgb.x.max(lo).min(hi),
                  self.rgb.y.max(lo).min(hi),
                  self.rgb.z.max(lo).min(hi))
    }
}

impl ops::Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, idx: usize) -> &Float {
        &self.rgb[idx]
    }
}

impl ops::IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, idx: usize) -> &mut Float {
        &mut self.rgb[idx]
    }
}

impl ops::Add for RGBSpectrum {
    type Output = RGBSpectrum;

    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        Self { rgb: self.rgb + rhs.rgb }
    }
}

impl ops::AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        self.rgb += rhs.rgb;
    }
}

impl ops::Sub for RGBSpectrum {
    type Output = RGBSpectrum;

    fn sub(self, rhs: RGBSpectrum) -> RGBSpectrum {
        Self { rgb: self.rgb - rhs.rgb }
    }
}

impl ops::Mul for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        Self { rgb: self.rgb.component_mul(&rhs.rgb) }
    }
}

impl ops::MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, rhs: RGBSpectrum) {
        self.rgb.component_mul_assign(&rhs.rgb);
    }
}

impl ops::Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: Float) -> RGBSpectrum {
        Self { rgb: self.rgb * rhs }
    }
}

impl ops::Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: rhs.rgb * self }
    }
}

impl ops::MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Float) {
        self.rgb *= rhs;
    }
}

impl ops::Div<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn div(self, rhs: Float) -> RGBSpectrum {
        Self { rgb: self.rgb / rhs }
    }
}

impl ops::DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, rhs: Float) {
        self.rgb /= rhs;
    }
}
