// Copyright @yucwang 2026

use crate::core::bsdf::{BSDFSampleRecord, BSDFValue, Lobe, BSDF};
use crate::core::rng::LcgRng;
use crate::materials::microfacet::{
    fresnel_dielectric, gtr_1, gtr_2, gtr_2_aniso, reflect, refract, sample_gtr_1_h,
    sample_gtr_2_aniso_h, sample_gtr_2_h, schlick_weight, smith_g1_ggx, smith_shadowing_ggx,
    smith_shadowing_ggx_aniso,
};
use crate::math::constants::{Float, Vector2f, Vector3f, INV_PI};
use crate::math::frame::ShadingFrame;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};

const MIN_ALPHA: Float = 0.001;
const CLEARCOAT_SHADOWING_ALPHA: Float = 0.25;
const LOBES: [Lobe; 4] = [Lobe::Diffuse, Lobe::Glossy, Lobe::Clearcoat, Lobe::Transmission];

fn mix(a: Float, b: Float, t: Float) -> Float {
    a + (b - a) * t
}

/// Burley's principled BSDF, resolved for one shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisneyMaterial {
    pub base_color: RGBSpectrum,
    pub metallic: Float,
    pub specular: Float,
    pub roughness: Float,
    pub specular_tint: Float,
    pub anisotropy: Float,
    pub sheen: Float,
    pub sheen_tint: Float,
    pub clearcoat: Float,
    pub clearcoat_gloss: Float,
    pub ior: Float,
    pub specular_transmission: Float,
}

impl Default for DisneyMaterial {
    fn default() -> Self {
        Self {
            base_color: RGBSpectrum::splat(0.8),
            metallic: 0.0,
            specular: 0.5,
            roughness: 0.5,
            specular_tint: 0.0,
            anisotropy: 0.0,
            sheen: 0.0,
            sheen_tint: 0.5,
            clearcoat: 0.0,
            clearcoat_gloss: 1.0,
            ior: 1.5,
            specular_transmission: 0.0,
        }
    }
}

// Generalised half vector of a refraction pair.
struct TransmissionGeometry {
    w_h: Vector3f,
    eta_o: Float,
    eta_i: Float,
    o_dot_h: Float,
    i_dot_h: Float,
    o_dot_n: Float,
    i_dot_n: Float,
}

impl DisneyMaterial {
    pub fn alpha(&self) -> Float {
        (self.roughness * self.roughness).max(MIN_ALPHA)
    }

    pub fn alpha_aniso(&self) -> Vector2f {
        let aspect = (1.0 - self.anisotropy * 0.9).sqrt();
        let alpha = self.alpha();
        Vector2f::new((alpha / aspect).max(MIN_ALPHA), (alpha * aspect).max(MIN_ALPHA))
    }

    pub fn clearcoat_alpha(&self) -> Float {
        mix(0.1, 0.001, self.clearcoat_gloss)
    }

    pub fn has_transmission(&self) -> bool {
        self.specular_transmission > 0.0
    }

    /// Three reflection lobes, plus transmission when enabled.
    pub fn active_lobe_count(&self) -> usize {
        if self.has_transmission() { 4 } else { 3 }
    }

    fn tint(&self) -> RGBSpectrum {
        let lum = self.base_color.luminance();
        if lum > 0.0 {
            self.base_color / lum
        } else {
            RGBSpectrum::splat(1.0)
        }
    }

    // Reflection lobes. `frame` faces `w_o` and both cosines are positive.

    fn diffuse(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> RGBSpectrum {
        let w_h = (w_i + w_o).normalize();
        let n_dot_o = frame.n.dot(w_o).abs();
        let n_dot_i = frame.n.dot(w_i).abs();
        let i_dot_h = w_i.dot(&w_h);
        let fd90 = 0.5 + 2.0 * self.roughness * i_dot_h * i_dot_h;
        let fi = schlick_weight(n_dot_i);
        let fo = schlick_weight(n_dot_o);
        self.base_color * (INV_PI * mix(1.0, fd90, fi) * mix(1.0, fd90, fo))
    }

    fn sheen(&self, frame: &ShadingFrame, w_i: &Vector3f) -> RGBSpectrum {
        let sheen_color = RGBSpectrum::lerp(RGBSpectrum::splat(1.0), self.tint(), self.sheen_tint);
        let f = schlick_weight(frame.n.dot(w_i).abs());
        sheen_color * (f * self.sheen)
    }

    fn glossy(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> RGBSpectrum {
        let w_h = (w_i + w_o).normalize();
        let spec_tint = RGBSpectrum::lerp(RGBSpectrum::splat(1.0), self.tint(), self.specular_tint);
        let spec = RGBSpectrum::lerp(spec_tint * (self.specular * 0.08), self.base_color, self.metallic);
        let f = RGBSpectrum::lerp(spec, RGBSpectrum::splat(1.0), schlick_weight(w_i.dot(&w_h)));

        let n_dot_h = frame.n.dot(&w_h);
        let n_dot_i = frame.n.dot(w_i).abs();
        let n_dot_o = frame.n.dot(w_o).abs();
        let (d, g) = if self.anisotropy == 0.0 {
            let alpha = self.alpha();
            (gtr_2(n_dot_h, alpha),
             smith_shadowing_ggx(n_dot_i, alpha) * smith_shadowing_ggx(n_dot_o, alpha))
        } else {
            let alpha = self.alpha_aniso();
            let d = gtr_2_aniso(n_dot_h, w_h.dot(&frame.v_x).abs(), w_h.dot(&frame.v_y).abs(), &alpha);
            let g = smith_shadowing_ggx_aniso(n_dot_i, w_i.dot(&frame.v_x).abs(), w_i.dot(&frame.v_y).abs(), &alpha)
                * smith_shadowing_ggx_aniso(n_dot_o, w_o.dot(&frame.v_x).abs(), w_o.dot(&frame.v_y).abs(), &alpha);
            (d, g)
        };
        f * (d * g)
    }

    fn clearcoat(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> Float {
        let w_h = (w_i + w_o).normalize();
        let d = gtr_1(frame.n.dot(&w_h), self.clearcoat_alpha());
        let f = mix(0.04, 1.0, schlick_weight(w_i.dot(&w_h)));
        let g = smith_shadowing_ggx(frame.n.dot(w_i).abs(), CLEARCOAT_SHADOWING_ALPHA)
            * smith_shadowing_ggx(frame.n.dot(w_o).abs(), CLEARCOAT_SHADOWING_ALPHA);
        0.25 * self.clearcoat * d * f * g
    }

    // Transmission. `frame.n` is the geometric side of the surface: `w_o`
    // above it is entering the material.

    fn transmission_geometry(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> Option<TransmissionGeometry> {
        let o_dot_n = w_o.dot(&frame.n);
        let i_dot_n = w_i.dot(&frame.n);
        if o_dot_n * i_dot_n >= 0.0 {
            return None;
        }
        let (eta_o, eta_i) = if o_dot_n > 0.0 { (1.0, self.ior) } else { (self.ior, 1.0) };
        let w_h = eta_o * w_o + eta_i * w_i;
        if w_h.norm_squared() <= 0.0 {
            return None;
        }
        let mut w_h = w_h.normalize();
        if w_h.dot(w_o) < 0.0 {
            w_h = -w_h;
        }
        let o_dot_h = w_o.dot(&w_h);
        let i_dot_h = w_i.dot(&w_h);
        // The microfacet has to separate the two directions.
        if o_dot_h * i_dot_h >= 0.0 {
            return None;
        }
        let denom = eta_o * o_dot_h + eta_i * i_dot_h;
        if denom * denom <= 0.0 {
            return None;
        }
        Some(TransmissionGeometry { w_h, eta_o, eta_i, o_dot_h, i_dot_h, o_dot_n, i_dot_n })
    }

    fn transmission(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> RGBSpectrum {
        let t = match self.transmission_geometry(frame, w_o, w_i) {
            Some(t) => t,
            None => return RGBSpectrum::default(),
        };
        let alpha = self.alpha();
        let d = gtr_2(frame.n.dot(&t.w_h).abs(), alpha);
        let g = smith_g1_ggx(t.i_dot_n, alpha) * smith_g1_ggx(t.o_dot_n, alpha);
        let f = fresnel_dielectric(t.o_dot_h, t.eta_o, t.eta_i);
        let denom = t.eta_o * t.o_dot_h + t.eta_i * t.i_dot_h;
        let c = t.o_dot_h.abs() * t.i_dot_h.abs() * t.eta_o * t.eta_o
            / (t.o_dot_n.abs() * t.i_dot_n.abs() * denom * denom);
        self.base_color * (c * (1.0 - f) * g * d)
    }

    fn transmission_pdf(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> Float {
        let t = match self.transmission_geometry(frame, w_o, w_i) {
            Some(t) => t,
            None => return 0.0,
        };
        let cos_theta_h = frame.n.dot(&t.w_h).abs();
        let d = gtr_2(cos_theta_h, self.alpha());
        let denom = t.eta_o * t.o_dot_h + t.eta_i * t.i_dot_h;
        let dwh_dwi = t.eta_i * t.eta_i * t.i_dot_h.abs() / (denom * denom);
        d * cos_theta_h * dwh_dwi
    }

    // Densities of the reflection samplers, in the frame facing `w_o`.

    fn reflection_pdfs(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> (Float, Float, Float) {
        let n_dot_i = frame.n.dot(w_i);
        let diffuse = sample_cosine_hemisphere_pdf(n_dot_i);

        let w_h = (w_i + w_o).normalize();
        let cos_theta_h = frame.n.dot(&w_h);
        let jacobian = 1.0 / (4.0 * w_o.dot(&w_h));
        let glossy_d = if self.anisotropy == 0.0 {
            gtr_2(cos_theta_h, self.alpha())
        } else {
            gtr_2_aniso(cos_theta_h, w_h.dot(&frame.v_x).abs(), w_h.dot(&frame.v_y).abs(), &self.alpha_aniso())
        };
        let glossy = glossy_d * cos_theta_h * jacobian;
        let clearcoat = gtr_1(cos_theta_h, self.clearcoat_alpha()) * cos_theta_h * jacobian;
        (diffuse, glossy, clearcoat)
    }
}

fn same_hemisphere(frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> bool {
    frame.n.dot(w_o) * frame.n.dot(w_i) > 0.0
}

impl BSDF for DisneyMaterial {
    fn eval(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> BSDFValue {
        if !same_hemisphere(frame, w_o, w_i) {
            if self.has_transmission() {
                let spec_trans = self.transmission(frame, w_o, w_i);
                return spec_trans * ((1.0 - self.metallic) * self.specular_transmission);
            }
            return RGBSpectrum::default();
        }

        let frame = frame.facing(w_o);
        let coat = self.clearcoat(&frame, w_o, w_i);
        let sheen = self.sheen(&frame, w_i);
        let diffuse = self.diffuse(&frame, w_o, w_i);
        let gloss = self.glossy(&frame, w_o, w_i);
        (diffuse + sheen) * ((1.0 - self.metallic) * (1.0 - self.specular_transmission))
            + gloss + RGBSpectrum::splat(coat)
    }

    fn pdf(&self, frame: &ShadingFrame, w_o: &Vector3f, w_i: &Vector3f) -> Float {
        let n_comp = self.active_lobe_count() as Float;
        if same_hemisphere(frame, w_o, w_i) {
            let (diffuse, glossy, clearcoat) = self.reflection_pdfs(&frame.facing(w_o), w_o, w_i);
            (diffuse + glossy + clearcoat) / n_comp
        } else if self.has_transmission() {
            self.transmission_pdf(frame, w_o, w_i) / n_comp
        } else {
            0.0
        }
    }

    /// Picks a lobe with one draw and samples it with two more.
    fn sample(&self, frame: &ShadingFrame, w_o: &Vector3f, rng: &mut LcgRng) -> BSDFSampleRecord {
        let n_comp = self.active_lobe_count();
        let component = ((rng.next_f32() * n_comp as Float) as usize).min(n_comp - 1);
        let lobe = LOBES[component];
        let u = Vector2f::new(rng.next_f32(), rng.next_f32());

        let w_i = match self.sample_lobe(lobe, frame, w_o, &u) {
            Some(w_i) => w_i,
            None => return BSDFSampleRecord::invalid(),
        };
        let pdf = self.pdf(frame, w_o, &w_i);
        if !(pdf > 0.0) {
            return BSDFSampleRecord::invalid();
        }
        BSDFSampleRecord::new(self.eval(frame, w_o, &w_i), w_i, pdf, lobe)
    }

    fn sample_lobe(&self, lobe: Lobe, frame: &ShadingFrame, w_o: &Vector3f, u: &Vector2f) -> Option<Vector3f> {
        let o_dot_n = frame.n.dot(w_o);
        if o_dot_n == 0.0 {
            return None;
        }
        let facing = frame.facing(w_o);

        let w_i = match lobe {
            Lobe::Diffuse => facing.from_local(&sample_cosine_hemisphere(u)).normalize(),
            Lobe::Glossy => {
                let w_h = if self.anisotropy == 0.0 {
                    sample_gtr_2_h(&facing, self.alpha(), u)
                } else {
                    sample_gtr_2_aniso_h(&facing, &self.alpha_aniso(), u)
                };
                reflect(w_o, &w_h)
            }
            Lobe::Clearcoat => {
                let w_h = sample_gtr_1_h(&facing, self.clearcoat_alpha(), u);
                reflect(w_o, &w_h)
            }
            Lobe::Transmission => {
                if !self.has_transmission() {
                    return None;
                }
                let mut w_h = sample_gtr_2_h(frame, self.alpha(), u);
                if w_o.dot(&w_h) < 0.0 {
                    w_h = -w_h;
                }
                let eta = if o_dot_n > 0.0 { 1.0 / self.ior } else { self.ior };
                let w_i = refract(w_o, &w_h, eta)?.normalize();
                if w_i.dot(&frame.n) * o_dot_n >= 0.0 {
                    return None;
                }
                return Some(w_i);
            }
        };

        // Reflection lobes must stay on the side of `w_o`.
        if facing.n.dot(&w_i) <= 0.0 {
            return None;
        }
        Some(w_i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::PI;
    use crate::math::warp::spherical_direction;

    fn plastic() -> DisneyMaterial {
        DisneyMaterial {
            base_color: RGBSpectrum::new(0.7, 0.3, 0.2),
            roughness: 0.5,
            sheen: 0.5,
            clearcoat: 0.5,
            clearcoat_gloss: 0.0,
            ..DisneyMaterial::default()
        }
    }

    fn brushed_metal() -> DisneyMaterial {
        DisneyMaterial {
            base_color: RGBSpectrum::new(0.9, 0.8, 0.5),
            metallic: 1.0,
            roughness: 0.6,
            anisotropy: 0.7,
            ..DisneyMaterial::default()
        }
    }

    fn rough_glass() -> DisneyMaterial {
        DisneyMaterial {
            base_color: RGBSpectrum::splat(1.0),
            roughness: 0.5,
            ior: 1.5,
            specular_transmission: 1.0,
            ..DisneyMaterial::default()
        }
    }

    // Reference value of the projected integral of `eval` on a theta/phi grid.
    fn quadrature(m: &DisneyMaterial, frame: &ShadingFrame, w_o: &Vector3f) -> RGBSpectrum {
        let n_theta = 600;
        let n_phi = 600;
        let d_theta = PI / n_theta as Float;
        let d_phi = 2.0 * PI / n_phi as Float;
        let mut sum = [0.0f64; 3];
        for i in 0..n_theta {
            let theta = (i as Float + 0.5) * d_theta;
            let (sin_t, cos_t) = theta.sin_cos();
            for j in 0..n_phi {
                let phi = (j as Float + 0.5) * d_phi;
                let w_i = frame.from_local(&spherical_direction(sin_t, cos_t, phi));
                let f = m.eval(frame, w_o, &w_i) * (cos_t.abs() * sin_t * d_theta * d_phi);
                for c in 0..3 {
                    sum[c] += f[c] as f64;
                }
            }
        }
        RGBSpectrum::new(sum[0] as Float, sum[1] as Float, sum[2] as Float)
    }

    fn importance_estimate(m: &DisneyMaterial, frame: &ShadingFrame, w_o: &Vector3f, samples: usize) -> RGBSpectrum {
        let mut rng = LcgRng::new(1234);
        let mut sum = [0.0f64; 3];
        for _ in 0..samples {
            let record = m.sample(frame, w_o, &mut rng);
            if !record.is_valid() {
                continue;
            }
            let weight = record.value * (frame.n.dot(&record.wi).abs() / record.pdf);
            for c in 0..3 {
                sum[c] += weight[c] as f64;
            }
        }
        let n = samples as f64;
        RGBSpectrum::new((sum[0] / n) as Float, (sum[1] / n) as Float, (sum[2] / n) as Float)
    }

    fn assert_sampling_consistent(m: &DisneyMaterial, w_o: Vector3f) {
        let frame = ShadingFrame::default();
        let w_o = w_o.normalize();
        let reference = quadrature(m, &frame, &w_o);
        let estimate = importance_estimate(m, &frame, &w_o, 200_000);
        for c in 0..3 {
            let tolerance = 0.03 * reference[c].max(0.05);
            assert!((estimate[c] - reference[c]).abs() < tolerance,
                    "channel {}: sampled {} vs quadrature {} for {:?}", c, estimate[c], reference[c], m);
        }
    }

    #[test]
    fn test_sampling_matches_quadrature_plastic() {
        assert_sampling_consistent(&plastic(), Vector3f::new(0.3, 0.1, 0.95));
        assert_sampling_consistent(&plastic(), Vector3f::new(0.8, 0.0, 0.6));
    }

    #[test]
    fn test_sampling_matches_quadrature_anisotropic() {
        assert_sampling_consistent(&brushed_metal(), Vector3f::new(0.2, -0.4, 0.9));
    }

    #[test]
    fn test_sampling_matches_quadrature_glass() {
        assert_sampling_consistent(&rough_glass(), Vector3f::new(0.3, 0.1, 0.95));
        assert_sampling_consistent(&rough_glass(), Vector3f::new(0.2, 0.1, -0.97));
    }

    #[test]
    fn test_pdf_covers_eval_support() {
        let materials = [plastic(), brushed_metal(), rough_glass()];
        let frame = ShadingFrame::from_normal(Vector3f::new(0.1, 0.2, 0.97).normalize());
        let mut rng = LcgRng::new(5);
        for m in materials.iter() {
            for _ in 0..5000 {
                let w_o = crate::math::warp::sample_uniform_sphere(&Vector2f::new(rng.next_f32(), rng.next_f32()));
                let w_i = crate::math::warp::sample_uniform_sphere(&Vector2f::new(rng.next_f32(), rng.next_f32()));
                let f = m.eval(&frame, &w_o, &w_i);
                let pdf = m.pdf(&frame, &w_o, &w_i);
                assert!(f.is_finite() && pdf.is_finite());
                assert!(pdf >= 0.0);
                if !f.is_black() {
                    assert!(pdf > 0.0, "eval {:?} with zero pdf for {:?}", f, m);
                }
                if pdf == 0.0 {
                    assert!(f.is_black());
                }
            }
        }
    }

    #[test]
    fn test_opaque_material_has_no_transmission() {
        let m = plastic();
        let frame = ShadingFrame::default();
        let w_o = Vector3f::new(0.0, 0.3, 1.0).normalize();
        let w_i = Vector3f::new(0.1, -0.2, -1.0).normalize();
        assert!(m.eval(&frame, &w_o, &w_i).is_black());
        assert_eq!(m.pdf(&frame, &w_o, &w_i), 0.0);
        assert_eq!(m.active_lobe_count(), 3);
        assert_eq!(rough_glass().active_lobe_count(), 4);
        assert!(m.sample_lobe(Lobe::Transmission, &frame, &w_o, &Vector2f::new(0.3, 0.3)).is_none());
    }

    #[test]
    fn test_reflection_evaluated_on_backside() {
        // An opaque surface seen from below behaves as if seen from above.
        let m = plastic();
        let frame = ShadingFrame::default();
        let w_o = Vector3f::new(0.3, 0.1, 0.9).normalize();
        let w_i = Vector3f::new(-0.2, 0.4, 0.8).normalize();
        let flip = Vector3f::new(1.0, 1.0, -1.0);
        let w_o_below = w_o.component_mul(&flip);
        let w_i_below = w_i.component_mul(&flip);
        let above = m.eval(&frame, &w_o, &w_i);
        let below = m.eval(&frame, &w_o_below, &w_i_below);
        for c in 0..3 {
            assert!((above[c] - below[c]).abs() < 1e-5 * above[c].max(1.0));
        }
        let pdf_above = m.pdf(&frame, &w_o, &w_i);
        let pdf_below = m.pdf(&frame, &w_o_below, &w_i_below);
        assert!((pdf_above - pdf_below).abs() < 1e-5 * pdf_above.max(1.0));
    }

    #[test]
    fn test_sample_consumes_three_draws() {
        let frame = ShadingFrame::default();
        let w_o = Vector3f::new(0.0, 0.6, 0.8);
        for m in [plastic(), rough_glass()].iter() {
            let mut rng = LcgRng::new(77);
            let mut reference = rng;
            m.sample(&frame, &w_o, &mut rng);
            for _ in 0..3 {
                reference.next_u32();
            }
            assert_eq!(rng.state(), reference.state());
        }
    }

    #[test]
    fn test_transmission_at_critical_angle_is_rejected() {
        let m = DisneyMaterial {
            metallic: 0.0,
            roughness: 0.0,
            ior: 1.5,
            specular_transmission: 1.0,
            ..DisneyMaterial::default()
        };
        let frame = ShadingFrame::default();
        // Inside the glass, hitting the interface exactly at the critical angle.
        let sin_c: Float = 1.0 / 1.5;
        let w_o = Vector3f::new(sin_c, 0.0, -(1.0 - sin_c * sin_c).sqrt());
        assert!(m.sample_lobe(Lobe::Transmission, &frame, &w_o, &Vector2f::new(0.0, 0.0)).is_none());

        // Beyond it as well.
        let w_o_beyond = Vector3f::new(0.9, 0.0, -(1.0 - 0.81 as Float).sqrt());
        assert!(m.sample_lobe(Lobe::Transmission, &frame, &w_o_beyond, &Vector2f::new(0.0, 0.0)).is_none());

        // Through `sample`: a stream that picks the transmission lobe and tilts
        // the microfacet away from the normal on the side of `w_o`.
        let mut seed = 0u32;
        let rng = loop {
            let rng = LcgRng::new(seed);
            let mut peek = rng;
            let lobe_draw = peek.next_f32();
            let phi_draw = peek.next_f32();
            let theta_draw = peek.next_f32();
            if lobe_draw >= 0.75 && phi_draw < 0.25 && theta_draw < 0.5 {
                break rng;
            }
            seed += 1;
        };
        for w_o in [w_o, w_o_beyond].iter() {
            let mut stream = rng;
            let record = m.sample(&frame, w_o, &mut stream);
            assert_eq!(record, BSDFSampleRecord::invalid());
            assert_eq!(record.pdf, 0.0);
            assert!(record.value.is_finite() && record.value.is_black());
            assert!(!record.is_valid());
        }
    }

    #[test]
    fn test_samples_are_finite() {
        let frame = ShadingFrame::default();
        let mut rng = LcgRng::new(2024);
        let materials = [
            plastic(),
            brushed_metal(),
            rough_glass(),
            DisneyMaterial { roughness: 0.0, specular_transmission: 1.0, ..DisneyMaterial::default() },
            DisneyMaterial { roughness: 0.0, clearcoat: 1.0, ..DisneyMaterial::default() },
        ];
        for m in materials.iter() {
            for _ in 0..20_000 {
                let w_o = crate::math::warp::sample_uniform_sphere(&Vector2f::new(rng.next_f32(), rng.next_f32()));
                let record = m.sample(&frame, &w_o, &mut rng);
                if record.pdf > 0.0 {
                    assert!(record.value.is_finite(), "{:?}", record);
                    assert!(record.pdf.is_finite());
                    assert!((record.wi.norm() - 1.0).abs() < 1e-3);
                } else {
                    assert_eq!(record, BSDFSampleRecord::invalid());
                }
            }
        }
    }
}
