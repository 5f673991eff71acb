// Copyright 2020 @TwoCookingMice

use super::constants::{EPSILON, Float, Vector3f};

/// Ray segment `origin + t * dir` for `t` in `[min_t, max_t]`. The
/// direction is normalised on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f,
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(),
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(std::f32::MAX)}
    }

    /// Unbounded ray leaving a surface point.
    pub fn spawn(o: Vector3f, d: Vector3f) -> Self {
        Self::new(o, d, Some(EPSILON), None)
    }

    /// Visibility segment from a surface point to distance `max_t`.
    pub fn shadow(o: Vector3f, d: Vector3f, max_t: Float) -> Self {
        Self::new(o, d, Some(EPSILON), Some(max_t))
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn test_segment(&self, t: Float) -> bool {
        t >= self.min_t && t <= self.max_t
    }
}
