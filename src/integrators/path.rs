// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::integrator::{Integrator, PathRecord, PathTermination};
use crate::core::rng::LcgRng;
use crate::core::scene::SceneQuery;
use crate::materials::disney::DisneyMaterial;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::frame::ShadingFrame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::power_heuristic;

use log::trace;

pub const MAX_PATH_DEPTH: u32 = 5;
pub const RR_START_BOUNCE: u32 = 3;
pub const RR_MIN_PROBABILITY: Float = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorSettings {
    pub max_depth: u32,
    /// Roulette starts on bounces strictly after this one.
    pub rr_start_bounce: u32,
    pub rr_min_probability: Float,
    /// Light and BSDF densities below this are not worth a shadow ray.
    pub pdf_epsilon: Float,
    pub russian_roulette: bool,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            max_depth: MAX_PATH_DEPTH,
            rr_start_bounce: RR_START_BOUNCE,
            rr_min_probability: RR_MIN_PROBABILITY,
            pdf_epsilon: EPSILON,
            russian_roulette: true,
        }
    }
}

/// Unidirectional path tracer with next-event estimation. Each vertex
/// picks one quad light uniformly and combines a light sample with a BSDF
/// sample under the power heuristic.
pub struct PathIntegrator {
    settings: IntegratorSettings,
}

impl PathIntegrator {
    pub fn new(settings: IntegratorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &IntegratorSettings {
        &self.settings
    }

    fn sample_direct_light(&self,
                           scene: &dyn SceneQuery,
                           material: &DisneyMaterial,
                           frame: &ShadingFrame,
                           p: &Vector3f,
                           w_o: &Vector3f,
                           rng: &mut LcgRng,
                           ray_count: &mut u32) -> RGBSpectrum {
        let lights = scene.lights();
        if lights.is_empty() {
            return RGBSpectrum::default();
        }
        let num_lights = lights.len();
        let light_id = ((rng.next_f32() * num_lights as Float) as usize).min(num_lights - 1);
        let light = &lights[light_id];
        let eps = self.settings.pdf_epsilon;

        let mut illum = RGBSpectrum::default();

        // Light sample.
        let u = Vector2f::new(rng.next_f32(), rng.next_f32());
        let light_pos = light.sample_position(&u);
        let to_light = light_pos - p;
        let light_dist = to_light.norm();
        if light_dist > 0.0 {
            let light_dir = to_light / light_dist;
            let light_pdf = light.pdf(&light_pos, p, &light_dir);
            let bsdf = material.eval(frame, w_o, &light_dir);
            if light_pdf >= eps && !bsdf.is_black() {
                *ray_count += 1;
                let shadow_ray = Ray3f::shadow(*p, light_dir, light_dist);
                if !scene.occluded(&shadow_ray) {
                    let bsdf_pdf = material.pdf(frame, w_o, &light_dir);
                    let w = power_heuristic(1.0, light_pdf, 1.0, bsdf_pdf);
                    let cos = light_dir.dot(&frame.n).abs();
                    illum += bsdf * light.emission * (cos * w / light_pdf);
                }
            }
        }

        // BSDF sample.
        let sample = material.sample(frame, w_o, rng);
        if sample.is_valid() && sample.pdf >= eps {
            let probe = Ray3f::spawn(*p, sample.wi);
            if let Some((light_t, hit_p)) = light.ray_intersection(&probe) {
                let light_pdf = light.pdf(&hit_p, p, &sample.wi);
                if light_pdf >= eps {
                    *ray_count += 1;
                    let shadow_ray = Ray3f::shadow(*p, sample.wi, light_t);
                    if !scene.occluded(&shadow_ray) {
                        let w = power_heuristic(1.0, sample.pdf, 1.0, light_pdf);
                        let cos = sample.wi.dot(&frame.n).abs();
                        illum += sample.value * light.emission * (cos * w / sample.pdf);
                    }
                }
            }
        }

        // One light out of `num_lights` was chosen.
        illum * num_lights as Float
    }
}

impl Default for PathIntegrator {
    fn default() -> Self {
        Self::new(IntegratorSettings::default())
    }
}

impl Integrator for PathIntegrator {
    fn trace_ray_forward(&self, scene: &dyn SceneQuery, ray: &Ray3f, rng: &mut LcgRng) -> PathRecord {
        let mut radiance = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::splat(1.0);
        let mut ray_count = 0u32;
        let mut bounces = 0u32;
        let mut termination = PathTermination::MaxDepth;
        let mut ray = *ray;

        for bounce in 0..self.settings.max_depth {
            ray_count += 1;
            let hit = match scene.trace(&ray) {
                Some(hit) => hit,
                None => {
                    let background = throughput * scene.background(&ray.dir());
                    if background.is_finite() {
                        radiance += background;
                    }
                    termination = PathTermination::Miss;
                    break;
                }
            };
            bounces = bounce + 1;

            let w_o = -ray.dir();
            let p = ray.at(hit.distance);
            let material = scene.material(&hit);
            let mut frame = ShadingFrame::from_normal(hit.normal.normalize());
            // Transmissive materials need to know which side is inside.
            if !material.has_transmission() {
                frame = frame.facing(&w_o);
            }

            let direct = self.sample_direct_light(scene, &material, &frame, &p, &w_o, rng, &mut ray_count);
            if direct.is_finite() {
                radiance += throughput * direct;
            } else {
                trace!("dropping non-finite direct light {:?} at bounce {}", direct, bounce);
            }

            let sample = material.sample(&frame, &w_o, rng);
            if !sample.is_valid() {
                termination = PathTermination::InvalidSample;
                break;
            }
            throughput *= sample.value * (sample.wi.dot(&frame.n).abs() / sample.pdf);
            if !throughput.is_finite() {
                termination = PathTermination::NonFinite;
                break;
            }

            if self.settings.russian_roulette && bounce > self.settings.rr_start_bounce {
                let q = self.settings.rr_min_probability.max(1.0 - throughput.max_component());
                if rng.next_f32() < q {
                    termination = PathTermination::RussianRoulette;
                    break;
                }
                throughput /= 1.0 - q;
            }

            ray = Ray3f::spawn(p, sample.wi);
        }

        trace!("path ended after {} bounces: {:?}", bounces, termination);
        PathRecord { radiance, ray_count, bounces, termination }
    }

    fn describe(&self) -> String {
        format!("PathIntegrator [{:?}]", self.settings)
    }
}
