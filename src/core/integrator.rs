// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::core::scene::SceneQuery;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Why a path stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathTermination {
    Miss,
    MaxDepth,
    InvalidSample,
    RussianRoulette,
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathRecord {
    pub radiance: RGBSpectrum,
    /// Every traversal issued for the path, shadow rays included.
    pub ray_count: u32,
    pub bounces: u32,
    pub termination: PathTermination,
}

pub trait Integrator: Sync {
    fn trace_ray_forward(&self, scene: &dyn SceneQuery, ray: &Ray3f, rng: &mut LcgRng) -> PathRecord;
    fn describe(&self) -> String;
}
