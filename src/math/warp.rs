// Copyright @yucwang 2023

use super::constants::{ INV_PI, PI, Float, Vector2f, Vector3f };

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z: Float = 1. - 2. * u.x;
    let r: Float = (1. - z * z).max(0.).sqrt();
    let phi: Float = 2. * PI * u.y;

    return Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn sample_uniform_sphere_pdf() -> Float {
    return INV_PI / 4.
}

pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    return Vector2f::new(r * cos_phi, r * sin_phi)
}

// Cosine weighted direction about +z.
pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(&u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.).sqrt();

    return Vector3f::new(p.x, p.y, z)
}

pub fn sample_cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    if cos_theta > 0. {
        cos_theta * INV_PI
    } else {
        0.
    }
}

pub fn spherical_direction(sin_theta: Float, cos_theta: Float, phi: Float) -> Vector3f {
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vector3f::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
}

/// Veach's power heuristic with exponent 2 for `n_f` samples of density
/// `pdf_f` against `n_g` samples of density `pdf_g`.
pub fn power_heuristic(n_f: Float, pdf_f: Float, n_g: Float, pdf_g: Float) -> Float {
    let f = n_f * pdf_f;
    let g = n_g * pdf_g;
    let denom = f * f + g * g;
    if denom <= 0. {
        return 0.;
    }
    (f * f) / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;

    #[test]
    fn test_concentric_disk_inside_unit_disk() {
        let mut rng = LcgRng::new(7);
        for _ in 0..1000 {
            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            let p = sample_uniform_disk_concentric(&u);
            assert!(p.norm() <= 1.0 + 1e-5);
        }
        assert_eq!(sample_uniform_disk_concentric(&Vector2f::new(0.5, 0.5)), Vector2f::new(0.0, 0.0));
    }

    #[test]
    fn test_cosine_hemisphere_upper() {
        let mut rng = LcgRng::new(11);
        for _ in 0..1000 {
            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            let d = sample_cosine_hemisphere(&u);
            assert!(d.z >= 0.0);
            assert!((d.norm() - 1.0).abs() < 1e-4);
        }
        assert_eq!(sample_cosine_hemisphere_pdf(-0.5), 0.0);
    }

    #[test]
    fn test_power_heuristic_weights_sum_to_one() {
        let pdfs = [(0.1, 0.2), (1.0, 1.0), (3.5, 0.01), (1e-3, 40.0), (7.0, 2.0)];
        for (a, b) in pdfs.iter() {
            let w = power_heuristic(1.0, *a, 1.0, *b) + power_heuristic(1.0, *b, 1.0, *a);
            assert!((w - 1.0).abs() < 1e-5, "weights for ({}, {}) sum to {}", a, b, w);
        }
        assert_eq!(power_heuristic(1.0, 0.0, 1.0, 0.0), 0.0);
        assert_eq!(power_heuristic(1.0, 2.0, 1.0, 0.0), 1.0);
    }
}
