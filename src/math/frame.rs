// Copyright @yucwang 2023

use crate::math::constants::Vector3f;

/// Orthonormal shading basis: `n` is the normal, `v_x` and `v_y` span the
/// tangent plane. Anisotropic lobes are aligned with `v_x`/`v_y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingFrame {
    pub n: Vector3f,
    pub v_x: Vector3f,
    pub v_y: Vector3f,
}

impl Default for ShadingFrame {
    fn default() -> Self {
        ShadingFrame {
            n: Vector3f::new(0.0, 0.0, 1.0),
            v_x: Vector3f::new(1.0, 0.0, 0.0),
            v_y: Vector3f::new(0.0, 1.0, 0.0),
        }
    }
}

impl ShadingFrame {
    pub fn new(n: Vector3f, v_x: Vector3f, v_y: Vector3f) -> ShadingFrame {
        ShadingFrame { n, v_x, v_y }
    }

    /// Builds the basis around a unit normal. The helper axis is the first
    /// world axis the normal is not close to, so the cross products never
    /// degenerate.
    pub fn from_normal(n: Vector3f) -> ShadingFrame {
        let helper = if n.x < 0.6 && n.x > -0.6 {
            Vector3f::new(1.0, 0.0, 0.0)
        } else if n.y < 0.6 && n.y > -0.6 {
            Vector3f::new(0.0, 1.0, 0.0)
        } else if n.z < 0.6 && n.z > -0.6 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let v_x = helper.cross(&n).normalize();
        let v_y = n.cross(&v_x).normalize();

        ShadingFrame { n, v_x, v_y }
    }

    /// Same tangents, opposite normal.
    pub fn flipped(&self) -> ShadingFrame {
        ShadingFrame { n: -self.n, v_x: self.v_x, v_y: self.v_y }
    }

    /// The frame whose normal lies on the same side as `w`.
    pub fn facing(&self, w: &Vector3f) -> ShadingFrame {
        if self.n.dot(w) < 0.0 {
            self.flipped()
        } else {
            *self
        }
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.v_x), v.dot(&self.v_y), v.dot(&self.n))
    }

    pub fn from_local(&self, v: &Vector3f) -> Vector3f {
        v.x * self.v_x + v.y * self.v_y + v.z * self.n
    }
}
