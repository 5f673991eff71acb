// Copyright @yucwang 2023

use crate::core::shape::Shape;
use crate::core::interaction::SurfaceIntersection;
use crate::math::constants:: { EPSILON, Float, Vector2f, Vector3f };
use crate::math::ray::Ray3f;

pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f
}

impl Shape for Triangle {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let geo_normal = self.geometric_normal();
        let t = self.plane_t(ray, &geo_normal)?;
        if !ray.test_segment(t) {
            return None;
        }

        let intersection_p = ray.at(t);
        if !self.is_in_triangle(&intersection_p) {
            return None;
        }

        let bary = self.barycentric(&intersection_p);
        let uv = Vector2f::new(bary.y, bary.z);
        Some(SurfaceIntersection::new(intersection_p, geo_normal, uv, t))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        let geo_normal = self.geometric_normal();
        match self.plane_t(ray, &geo_normal) {
            Some(t) if ray.test_segment(t) => self.is_in_triangle(&ray.at(t)),
            _ => false,
        }
    }

    fn surface_area(&self) -> Float {
        0.5 * ((self.p1 - self.p0).cross(&(self.p2 - self.p0))).norm()
    }

    fn describe(&self) -> String {
        format!("Triangle [{:?}, {:?}, {:?}]", self.p0, self.p1, self.p2)
    }
}

impl Triangle {
    pub fn new(new_p0: Vector3f, new_p1: Vector3f, new_p2: Vector3f) -> Self {
        Triangle {
            p0: new_p0,
            p1: new_p1,
            p2: new_p2,
        }
    }

    // Distance to the supporting plane, `None` for rays parallel to it.
    fn plane_t(&self, ray: &Ray3f, geo_normal: &Vector3f) -> Option<Float> {
        let n_dot_dir = geo_normal.dot(&ray.dir());
        if n_dot_dir > -EPSILON && n_dot_dir < EPSILON {
            return None;
        }
        let plane_d = geo_normal.dot(&self.p0);
        Some((plane_d - geo_normal.dot(&ray.origin())) / n_dot_dir)
    }

    fn is_in_triangle(&self, p: &Vector3f) -> bool {
        let edge0 = self.p1 - self.p0;
        let edge1 = self.p2 - self.p0;
        let geo_normal = edge0.cross(&edge1);

        let n0 = (self.p1 - self.p0).cross(&(p - self.p0));
        let n1 = (self.p2 - self.p1).cross(&(p - self.p1));
        let n2 = (self.p0 - self.p2).cross(&(p - self.p2));

        (n0.dot(&geo_normal) >= 0.0) && (n1.dot(&geo_normal) >= 0.0) && (n2.dot(&geo_normal) >= 0.0)
    }

    pub fn geometric_normal(&self) -> Vector3f {
        let edge0 = self.p1 - self.p0;
        let edge1 = self.p2 - self.p0;
        edge0.cross(&edge1).normalize()
    }

    pub fn vertices(&self) -> (Vector3f, Vector3f, Vector3f) {
        (self.p0, self.p1, self.p2)
    }

    pub fn barycentric(&self, p: &Vector3f) -> Vector3f {
        let v0 = self.p1 - self.p0;
        let v1 = self.p2 - self.p0;
        let v2 = *p - self.p0;

        let d00 = v0.dot(&v0);
        let d01 = v0.dot(&v1);
        let d11 = v1.dot(&v1);
        let d20 = v2.dot(&v0);
        let d21 = v2.dot(&v1);
        let denom = d00 * d11 - d01 * d01;
        if denom.abs() < EPSILON {
            return Vector3f::new(1.0, 0.0, 0.0);
        }

        let v = (d11 * d20 - d01 * d21) / denom;
        let w = (d00 * d21 - d01 * d20) / denom;
        let u = 1.0 - v - w;
        Vector3f::new(u, v, w)
    }
}
