// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Two-sided parallelogram centred on `center` and spanned by the half
/// extents `edge_x` and `edge_y`. The normal is `edge_x x edge_y`.
pub struct Rectangle {
    center: Vector3f,
    edge_x: Vector3f,
    edge_y: Vector3f,
    normal: Vector3f,
    area: Float,
}

impl Rectangle {
    pub fn new(center: Vector3f, edge_x: Vector3f, edge_y: Vector3f) -> Self {
        let cross = edge_x.cross(&edge_y);
        let area = 4.0 * cross.norm();
        let normal = if area > 0.0 { cross.normalize() } else { Vector3f::new(0.0, 0.0, 1.0) };

        Self { center, edge_x, edge_y, normal, area }
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    // Hit distance and the local coordinates in [-1, 1]^2.
    fn intersect_local(&self, ray: &Ray3f) -> Option<(Float, Vector2f)> {
        let denom = ray.dir().dot(&self.normal);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = (self.center - ray.origin()).dot(&self.normal) / denom;
        if !ray.test_segment(t) {
            return None;
        }

        let d = ray.at(t) - self.center;
        let s = d.dot(&self.edge_x) / self.edge_x.norm_squared();
        let r = d.dot(&self.edge_y) / self.edge_y.norm_squared();
        if s.abs() > 1.0 || r.abs() > 1.0 {
            return None;
        }

        Some((t, Vector2f::new(s, r)))
    }
}

impl Shape for Rectangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let (t, local) = self.intersect_local(ray)?;
        let uv = Vector2f::new(0.5 * (local.x + 1.0), 0.5 * (local.y + 1.0));
        Some(SurfaceIntersection::new(ray.at(t), self.normal, uv, t))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.intersect_local(ray).is_some()
    }

    fn surface_area(&self) -> Float {
        self.area
    }

    fn describe(&self) -> String {
        format!("Rectangle [center={:?}, normal={:?}, area={}]", self.center, self.normal, self.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Rectangle {
        Rectangle::new(Vector3f::new(0.0, 0.0, 0.0),
                       Vector3f::new(0.0, 0.0, 2.0),
                       Vector3f::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn test_rectangle_normal_and_area() {
        let rect = floor();
        assert!((rect.normal() - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert!((rect.surface_area() - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_rectangle_hits_from_both_sides() {
        let rect = floor();
        let down = Ray3f::new(Vector3f::new(0.5, 3.0, -1.0), Vector3f::new(0.0, -1.0, 0.0), None, None);
        let hit = rect.ray_intersection(&down).expect("expected hit from above");
        assert!((hit.t() - 3.0).abs() < 1e-5);
        assert!((hit.uv() - Vector2f::new(0.25, 0.75)).norm() < 1e-5);

        let up = Ray3f::new(Vector3f::new(0.5, -1.0, -1.0), Vector3f::new(0.0, 1.0, 0.0), None, None);
        assert!(rect.ray_intersection_t(&up));
    }

    #[test]
    fn test_rectangle_misses() {
        let rect = floor();
        let outside = Ray3f::new(Vector3f::new(1.5, 3.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), None, None);
        assert!(rect.ray_intersection(&outside).is_none());

        let parallel = Ray3f::new(Vector3f::new(-5.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0), None, None);
        assert!(!rect.ray_intersection_t(&parallel));

        let short = Ray3f::new(Vector3f::new(0.0, 3.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), None, Some(2.5));
        assert!(!rect.ray_intersection_t(&short));
    }
}
