// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Camera rays travel at most this far.
pub const MAX_RAY_DISTANCE: Float = 1e20;

/// Pinhole camera looking from `origin` at `target`, with a vertical field
/// of view. The aspect ratio follows the film.
pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> Float {
        self.width as Float / self.height as Float
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, u: &Vector2f) -> Ray3f {
        let px = (2.0 * u.x - 1.0) * self.aspect() * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * u.y) * self.tan_half_fov_y;
        let dir = self.right * px + self.up * py + self.forward;
        Ray3f::new(self.origin, dir, Some(0.0), Some(MAX_RAY_DISTANCE))
    }

    fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera [origin: {:?}, forward: {:?}, tan_half_fov_y: {}, film: {}x{}]",
                self.origin, self.forward, self.tan_half_fov_y, self.width, self.height)
    }
}
