// Copyright @yucwang 2021

use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;

pub struct RenderOutput {
    /// Mean radiance over all frames.
    pub radiance: Bitmap,
    /// Mean number of rays traced per frame, row-major.
    pub ray_counts: Vec<u32>,
}

pub trait Renderer {
    /// `None` when the scene has no camera to render from.
    fn render(&self, scene: &Scene) -> Option<RenderOutput>;
}
