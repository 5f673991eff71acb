// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f, INV_PI};
use crate::math::spectrum::RGBSpectrum;

/// Radiance arriving along rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Constant(RGBSpectrum),
    /// Checkered sky over a dark ground, `cells` squares per unit of the
    /// longitude/latitude parameterisation.
    Checker { bright: RGBSpectrum, dark: RGBSpectrum, cells: Float },
}

impl Default for Background {
    fn default() -> Self {
        Background::Checker {
            bright: RGBSpectrum::splat(0.5),
            dark: RGBSpectrum::splat(0.1),
            cells: 10.0,
        }
    }
}

impl Background {
    pub fn eval(&self, dir: &Vector3f) -> RGBSpectrum {
        match *self {
            Background::Constant(value) => value,
            Background::Checker { bright, dark, cells } => {
                let dir = dir.normalize();
                let u = 1.0 + dir.x.atan2(-dir.z) * INV_PI;
                let v = dir.y.max(-1.0).min(1.0).acos() * INV_PI;
                let check_x = (u * cells) as i64;
                let check_y = (v * cells) as i64;
                if dir.y > -0.1 && (check_x + check_y) % 2 == 0 {
                    bright
                } else {
                    dark
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_background() {
        let bg = Background::Constant(RGBSpectrum::new(0.1, 0.2, 0.3));
        assert_eq!(bg.eval(&Vector3f::new(0.3, -0.9, 0.1)), RGBSpectrum::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_checker_background() {
        let bg = Background::default();
        // Straight down is always ground.
        assert_eq!(bg.eval(&Vector3f::new(0.0, -1.0, 0.0)), RGBSpectrum::splat(0.1));

        // Straight up: u = 2, v = 0 -> cell (20, 0), even.
        assert_eq!(bg.eval(&Vector3f::new(0.0, 1.0, 0.0)), RGBSpectrum::splat(0.5));

        // Just below the horizon looking down -z: u = 1, v ~ 0.52 -> cell (10, 5), odd.
        assert_eq!(bg.eval(&Vector3f::new(0.0, -0.05, -1.0)), RGBSpectrum::splat(0.1));

        // Slightly above the horizon toward +x: u = 1.5, v just under 0.5 -> (15, 4), odd.
        assert_eq!(bg.eval(&Vector3f::new(1.0, 0.05, 0.0)), RGBSpectrum::splat(0.1));
        // Higher up toward -x: u = 0.5, v ~ 0.37 -> (5, 3), even.
        assert_eq!(bg.eval(&Vector3f::new(-1.0, 0.45, 0.0)), RGBSpectrum::splat(0.5));
    }
}
