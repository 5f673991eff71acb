// Copyright @yucwang 2026

use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// One-sided rectangular area light. It emits `emission` toward the side
/// its normal points to, and is spanned by the unit vectors `v_x` and `v_y`
/// scaled by the half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadLight {
    pub emission: RGBSpectrum,
    pub position: Vector3f,
    pub normal: Vector3f,
    pub v_x: Vector3f,
    pub v_y: Vector3f,
    pub half_width: Float,
    pub half_height: Float,
}

impl QuadLight {
    pub fn new(emission: RGBSpectrum,
               position: Vector3f,
               normal: Vector3f,
               v_x: Vector3f,
               v_y: Vector3f,
               half_width: Float,
               half_height: Float) -> Self {
        Self {
            emission,
            position,
            normal: normal.normalize(),
            v_x: v_x.normalize(),
            v_y: v_y.normalize(),
            half_width,
            half_height,
        }
    }

    /// Builds the light from its centre and two half-extent vectors. The
    /// normal is `edge_x x edge_y`.
    pub fn from_edges(emission: RGBSpectrum, position: Vector3f,
                      edge_x: Vector3f, edge_y: Vector3f) -> Self {
        let normal = edge_x.cross(&edge_y).normalize();
        Self {
            emission,
            position,
            normal,
            v_x: edge_x.normalize(),
            v_y: edge_y.normalize(),
            half_width: edge_x.norm(),
            half_height: edge_y.norm(),
        }
    }

    pub fn area(&self) -> Float {
        4.0 * self.half_width * self.half_height
    }

    /// Uniform point on the rectangle for `u` in [0, 1)^2.
    pub fn sample_position(&self, u: &Vector2f) -> Vector3f {
        self.position
            + (2.0 * u.x - 1.0) * self.half_width * self.v_x
            + (2.0 * u.y - 1.0) * self.half_height * self.v_y
    }

    /// Solid-angle density at `shading_point` of having sampled
    /// `light_point`, where `dir` is the unit direction from the shading
    /// point toward the light.
    pub fn pdf(&self, light_point: &Vector3f, shading_point: &Vector3f, dir: &Vector3f) -> Float {
        let to_light = light_point - shading_point;
        let dist_sqr = to_light.dot(&to_light);
        let n_dot_w = self.normal.dot(&(-dir));
        if n_dot_w < EPSILON {
            return 0.0;
        }
        dist_sqr / (n_dot_w * self.area())
    }

    /// Front-face hit inside the ray segment. Returns the distance and the
    /// point on the light.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<(Float, Vector3f)> {
        let dir = ray.dir();
        let denom = -dir.dot(&self.normal);
        if denom < EPSILON {
            return None;
        }
        let t = (ray.origin() - self.position).dot(&self.normal) / denom;
        if t < 0.0 || !ray.test_segment(t) {
            return None;
        }

        let light_pos = ray.at(t);
        let hit_v = light_pos - self.position;
        if hit_v.dot(&self.v_x).abs() < self.half_width
            && hit_v.dot(&self.v_y).abs() < self.half_height {
            Some((t, light_pos))
        } else {
            None
        }
    }

    pub fn describe(&self) -> String {
        format!("QuadLight [position={:?}, normal={:?}, half_extents=({}, {}), emission={:?}]",
                self.position, self.normal, self.half_width, self.half_height, self.emission)
    }
}

/// Unoccluded form factor from a point to an `a` x `b` rectangle parallel
/// to its tangent plane at height `h`, with one corner directly above it,
/// times pi.
#[cfg(test)]
pub(crate) fn corner_form_factor(a: f64, b: f64, h: f64) -> f64 {
    let ra = (a * a + h * h).sqrt();
    let rb = (b * b + h * h).sqrt();
    0.5 * (a / ra * (b / ra).atan() + b / rb * (a / rb).atan())
}
