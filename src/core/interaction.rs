// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector2f, Vector3f };

/// A ray/shape hit before the scene has attached a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceIntersection {
    p: Vector3f,
    normal: Vector3f,
    uv: Vector2f,
    t: Float,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f,
               new_normal: Vector3f,
               new_uv: Vector2f,
               new_t: Float) -> Self {
        Self { p: new_p, normal: new_normal, uv: new_uv, t: new_t }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }
}

/// The nearest hit reported to the integrator: distance along the ray,
/// geometric normal, surface parameterisation and the material to shade with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub distance: Float,
    pub normal: Vector3f,
    pub uv: Vector2f,
    pub material_id: usize,
}

impl HitRecord {
    pub fn new(distance: Float, normal: Vector3f, uv: Vector2f, material_id: usize) -> Self {
        Self { distance, normal, uv, material_id }
    }

    pub fn from_intersection(intersection: &SurfaceIntersection, material_id: usize) -> Self {
        Self {
            distance: intersection.t(),
            normal: intersection.normal(),
            uv: intersection.uv(),
            material_id,
        }
    }
}
