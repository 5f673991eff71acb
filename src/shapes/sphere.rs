// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::constants::{Float, Vector2f, Vector3f, INV_2PI, INV_PI, PI};
use crate::math::ray::Ray3f;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius }
    }

    // Both roots of |o + t d - c|^2 = r^2, nearest first.
    fn roots(&self, ray: &Ray3f) -> Option<(Float, Float)> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(&ray.dir());
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        Some((-b - root, -b + root))
    }

    fn nearest_t(&self, ray: &Ray3f) -> Option<Float> {
        let (t0, t1) = self.roots(ray)?;
        if ray.test_segment(t0) {
            Some(t0)
        } else if ray.test_segment(t1) {
            Some(t1)
        } else {
            None
        }
    }
}

impl Shape for Sphere {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let t = self.nearest_t(ray)?;
        let p = ray.at(t);
        let n = (p - self.center).normalize();
        let uv = Vector2f::new(0.5 + n.z.atan2(n.x) * INV_2PI,
                               n.y.max(-1.0).min(1.0).acos() * INV_PI);
        Some(SurfaceIntersection::new(p, n, uv, t))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.nearest_t(ray).is_some()
    }

    fn surface_area(&self) -> Float {
        4.0 * PI * self.radius * self.radius
    }

    fn describe(&self) -> String {
        format!("Sphere [center={:?}, radius={}]", self.center, self.radius)
    }
}
