// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f, INV_PI, PI};
use crate::math::frame::ShadingFrame;
use crate::math::warp::spherical_direction;

// Refraction this close to grazing is treated as total internal reflection.
const GRAZING_REFRACTION: Float = 1e-6;

fn sqr(x: Float) -> Float {
    x * x
}

pub fn schlick_weight(cos_theta: Float) -> Float {
    (1.0 - cos_theta).max(0.0).min(1.0).powi(5)
}

/// Unpolarised Fresnel reflectance of a dielectric interface, going from
/// index `eta_i` into index `eta_t`.
pub fn fresnel_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let c = cos_theta_i.abs().min(1.0);
    let g2 = sqr(eta_t) / sqr(eta_i) - 1.0 + c * c;
    if g2 < 0.0 {
        return 1.0;
    }
    let g = g2.sqrt();
    let f = 0.5 * sqr(g - c) / sqr(g + c)
        * (1.0 + sqr(c * (g + c) - 1.0) / sqr(c * (g - c) + 1.0));
    f.min(1.0)
}

/// GTR with gamma = 1 (Berry), used by the clearcoat lobe.
pub fn gtr_1(cos_theta_h: Float, alpha: Float) -> Float {
    if alpha >= 1.0 {
        return INV_PI;
    }
    let alpha_sqr = alpha * alpha;
    INV_PI * (alpha_sqr - 1.0)
        / (alpha_sqr.ln() * (1.0 + (alpha_sqr - 1.0) * cos_theta_h * cos_theta_h))
}

/// GTR with gamma = 2 (GGX).
pub fn gtr_2(cos_theta_h: Float, alpha: Float) -> Float {
    let alpha_sqr = alpha * alpha;
    INV_PI * alpha_sqr / sqr(1.0 + (alpha_sqr - 1.0) * cos_theta_h * cos_theta_h)
}

pub fn gtr_2_aniso(h_dot_n: Float, h_dot_x: Float, h_dot_y: Float, alpha: &Vector2f) -> Float {
    INV_PI / (alpha.x * alpha.y
        * sqr(sqr(h_dot_x / alpha.x) + sqr(h_dot_y / alpha.y) + h_dot_n * h_dot_n))
}

/// Smith GGX shadowing with the `1 / (4 n.i n.o)` factor folded in, so the
/// product of two of these times `D * F` is the whole specular BRDF.
pub fn smith_shadowing_ggx(n_dot_o: Float, alpha_g: Float) -> Float {
    let a = alpha_g * alpha_g;
    let b = n_dot_o * n_dot_o;
    1.0 / (n_dot_o + (a + b - a * b).sqrt())
}

pub fn smith_shadowing_ggx_aniso(n_dot_o: Float, o_dot_x: Float, o_dot_y: Float, alpha: &Vector2f) -> Float {
    1.0 / (n_dot_o + (sqr(o_dot_x * alpha.x) + sqr(o_dot_y * alpha.y) + sqr(n_dot_o)).sqrt())
}

/// Plain Smith G1 for GGX, in [0, 1].
pub fn smith_g1_ggx(n_dot_v: Float, alpha: Float) -> Float {
    let c = n_dot_v.abs();
    if c <= 0.0 {
        return 0.0;
    }
    let a = alpha * alpha;
    2.0 * c / (c + (a + (1.0 - a) * c * c).sqrt())
}

/// Mirror `w` about the microfacet normal `m`. Both point away from the surface.
pub fn reflect(w: &Vector3f, m: &Vector3f) -> Vector3f {
    2.0 * w.dot(m) * m - w
}

/// Refract `w` (pointing away from the surface, on the side of `m`) through
/// the microfacet `m` with relative index `eta = eta_w / eta_t`.
/// Returns `None` on total internal reflection.
pub fn refract(w: &Vector3f, m: &Vector3f, eta: Float) -> Option<Vector3f> {
    let cos_i = w.dot(m).max(-1.0).min(1.0);
    let sin2_i = (1.0 - cos_i * cos_i).max(0.0);
    let k = 1.0 - eta * eta * sin2_i;
    if k < GRAZING_REFRACTION {
        return None;
    }
    let cos_t = k.sqrt();
    Some(-eta * w + (eta * cos_i - cos_t) * m)
}

pub fn sample_gtr_1_h(frame: &ShadingFrame, alpha: Float, u: &Vector2f) -> Vector3f {
    let phi_h = 2.0 * PI * u.x;
    let alpha_sqr = alpha * alpha;
    let cos_theta_h_sqr = if alpha >= 1.0 {
        1.0 - u.y
    } else {
        (1.0 - alpha_sqr.powf(1.0 - u.y)) / (1.0 - alpha_sqr)
    };
    let cos_theta_h = cos_theta_h_sqr.max(0.0).min(1.0).sqrt();
    let sin_theta_h = (1.0 - cos_theta_h_sqr).max(0.0).sqrt();
    let local = spherical_direction(sin_theta_h, cos_theta_h, phi_h);
    frame.from_local(&local).normalize()
}

pub fn sample_gtr_2_h(frame: &ShadingFrame, alpha: Float, u: &Vector2f) -> Vector3f {
    let phi_h = 2.0 * PI * u.x;
    let cos_theta_h_sqr = (1.0 - u.y) / (1.0 + (alpha * alpha - 1.0) * u.y);
    let cos_theta_h = cos_theta_h_sqr.max(0.0).min(1.0).sqrt();
    let sin_theta_h = (1.0 - cos_theta_h_sqr).max(0.0).sqrt();
    let local = spherical_direction(sin_theta_h, cos_theta_h, phi_h);
    frame.from_local(&local).normalize()
}

pub fn sample_gtr_2_aniso_h(frame: &ShadingFrame, alpha: &Vector2f, u: &Vector2f) -> Vector3f {
    let x = 2.0 * PI * u.x;
    let (sin_x, cos_x) = x.sin_cos();
    let slope = (u.y / (1.0 - u.y)).sqrt();
    let w_h = slope * (alpha.x * cos_x * frame.v_x + alpha.y * sin_x * frame.v_y) + frame.n;
    w_h.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;

    // Integrates D(h) cos(theta_h) over the hemisphere on a theta/phi grid.
    fn projected_area<F: Fn(&Vector3f) -> Float>(d: F) -> Float {
        let n_theta = 2000;
        let n_phi = 64;
        let d_theta = 0.5 * PI / n_theta as Float;
        let d_phi = 2.0 * PI / n_phi as Float;
        let mut sum = 0.0f64;
        for i in 0..n_theta {
            let theta = (i as Float + 0.5) * d_theta;
            let (sin_t, cos_t) = theta.sin_cos();
            for j in 0..n_phi {
                let phi = (j as Float + 0.5) * d_phi;
                let h = spherical_direction(sin_t, cos_t, phi);
                sum += (d(&h) * cos_t * sin_t * d_theta * d_phi) as f64;
            }
        }
        sum as Float
    }

    #[test]
    fn test_gtr_2_normalized() {
        for alpha in [0.1, 0.3, 0.7, 1.0].iter() {
            let area = projected_area(|h| gtr_2(h.z, *alpha));
            assert!((area - 1.0).abs() < 0.01, "alpha {} -> {}", alpha, area);
        }
    }

    #[test]
    fn test_gtr_1_normalized() {
        for alpha in [0.1, 0.25, 0.5].iter() {
            let area = projected_area(|h| gtr_1(h.z, *alpha));
            assert!((area - 1.0).abs() < 0.01, "alpha {} -> {}", alpha, area);
        }
    }

    #[test]
    fn test_gtr_2_aniso_normalized() {
        let alpha = Vector2f::new(0.5, 0.2);
        let area = projected_area(|h| gtr_2_aniso(h.z, h.x.abs(), h.y.abs(), &alpha));
        assert!((area - 1.0).abs() < 0.02, "aniso -> {}", area);
    }

    #[test]
    fn test_gtr_2_aniso_matches_isotropic() {
        let alpha = 0.4;
        let h = Vector3f::new(0.3, -0.2, 0.9).normalize();
        let iso = gtr_2(h.z, alpha);
        let aniso = gtr_2_aniso(h.z, h.x.abs(), h.y.abs(), &Vector2f::new(alpha, alpha));
        assert!((iso - aniso).abs() / iso < 1e-4);
    }

    #[test]
    fn test_fresnel_dielectric() {
        let eta = 1.5;
        let normal = fresnel_dielectric(1.0, 1.0, eta);
        let expected = sqr((eta - 1.0) / (eta + 1.0));
        assert!((normal - expected).abs() < 1e-5);

        // Grazing incidence reflects everything.
        assert!((fresnel_dielectric(1e-4, 1.0, eta) - 1.0).abs() < 1e-2);

        // Past the critical angle going from glass to air.
        let critical_cos = (1.0 - 1.0 / (eta * eta)).sqrt();
        assert_eq!(fresnel_dielectric(critical_cos * 0.9, eta, 1.0), 1.0);
        assert!(fresnel_dielectric(0.95, eta, 1.0) < 1.0);
    }

    #[test]
    fn test_smith_terms() {
        assert!((smith_g1_ggx(1.0, 0.5) - 1.0).abs() < 1e-6);
        assert!(smith_g1_ggx(0.1, 0.5) < 1.0);
        assert_eq!(smith_g1_ggx(0.0, 0.5), 0.0);
        // Folded form equals G1 / (2 n.o).
        let n_dot_o = 0.6;
        let alpha = 0.3;
        let folded = smith_shadowing_ggx(n_dot_o, alpha);
        assert!((folded - smith_g1_ggx(n_dot_o, alpha) / (2.0 * n_dot_o)).abs() < 1e-5);
    }

    #[test]
    fn test_reflect_and_refract() {
        let m = Vector3f::new(0.0, 0.0, 1.0);
        let w = Vector3f::new(0.6, 0.0, 0.8);
        assert!((reflect(&w, &m) - Vector3f::new(-0.6, 0.0, 0.8)).norm() < 1e-6);

        let eta = 1.0 / 1.5;
        let t = refract(&w, &m, eta).expect("refraction from air into glass");
        assert!(t.z < 0.0);
        assert!((t.norm() - 1.0).abs() < 1e-5);
        // Snell: sin_t = eta * sin_i.
        let sin_t = (t.x * t.x + t.y * t.y).sqrt();
        assert!((sin_t - eta * 0.6).abs() < 1e-5);

        // Glass to air: 1.5 * 0.6 < 1 still refracts, 1.5 * 0.8 > 1 does not.
        assert!(refract(&w, &m, 1.5).is_some());
        let grazing = Vector3f::new(0.8, 0.0, 0.6);
        assert!(refract(&grazing, &m, 1.5).is_none());
    }

    #[test]
    fn test_half_vector_samplers_upper_hemisphere() {
        let frame = ShadingFrame::from_normal(Vector3f::new(0.2, 0.9, -0.3).normalize());
        let mut rng = LcgRng::new(99);
        for _ in 0..2000 {
            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            for h in [
                sample_gtr_1_h(&frame, 0.1, &u),
                sample_gtr_2_h(&frame, 0.3, &u),
                sample_gtr_2_aniso_h(&frame, &Vector2f::new(0.5, 0.1), &u),
            ].iter() {
                assert!(h.dot(&frame.n) >= 0.0);
                assert!((h.norm() - 1.0).abs() < 1e-4);
            }
        }
    }
}
