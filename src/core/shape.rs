// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::math::constants::Float;
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    /// Nearest hit inside the ray segment.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection>;
    /// Any hit inside the ray segment.
    fn ray_intersection_t(&self, ray: &Ray3f) -> bool;
    fn surface_area(&self) -> Float;
    fn describe(&self) -> String;
}
