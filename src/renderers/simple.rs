// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

pub use super::renderer::{RenderOutput, Renderer};

pub const TILE_SIZE: usize = 64;

struct Tile {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
    radiance: Vec<Vector3f>,
    ray_counts: Vec<u32>,
}

/// Renders `frames` independent frames with one path per pixel each and
/// averages them. Frame `f` seeds its pixels with frame id `seed + f`, so
/// the result only depends on the scene, the integrator and these settings.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    camera_id: usize,
    frames: u32,
    seed: u32,
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, camera_id: usize, frames: u32, seed: u32) -> Self {
        Self {
            integrator,
            camera_id,
            frames: frames.max(1),
            seed,
        }
    }

    fn render_tile(&self, scene: &Scene, sensor: &dyn Sensor,
                   x0: usize, y0: usize, x1: usize, y1: usize) -> Tile {
        let (width, height) = sensor.resolution();
        let tile_width = x1 - x0;
        let mut radiance = vec![Vector3f::zeros(); tile_width * (y1 - y0)];
        let mut ray_totals = vec![0u64; radiance.len()];
        let mut dropped = 0usize;

        for frame in 0..self.frames {
            let frame_id = self.seed.wrapping_add(frame);
            for y in y0..y1 {
                for x in x0..x1 {
                    let mut rng = LcgRng::from_pixel(frame_id,
                                                     (x as u32, y as u32),
                                                     (width as u32, height as u32));
                    let u = Vector2f::new((x as Float + rng.next_f32()) / width as Float,
                                          (y as Float + rng.next_f32()) / height as Float);
                    let ray = sensor.sample_ray(&u);
                    let record = self.integrator.trace_ray_forward(scene, &ray, &mut rng);

                    let mut value = record.radiance.to_vector();
                    if !record.radiance.is_finite() {
                        dropped += 1;
                        value = Vector3f::zeros();
                    }
                    let idx = (x - x0) + tile_width * (y - y0);
                    let prev = radiance[idx];
                    radiance[idx] = prev + (value - prev) / (frame + 1) as Float;
                    ray_totals[idx] += record.ray_count as u64;
                }
            }
        }

        if dropped > 0 {
            warn!("Tile ({}, {}): replaced {} non-finite samples with zero", x0, y0, dropped);
        }

        let frames = self.frames as u64;
        let ray_counts = ray_totals.iter().map(|total| (total / frames) as u32).collect();
        Tile { x0, y0, x1, y1, radiance, ray_counts }
    }
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene) -> Option<RenderOutput> {
        let sensor = match scene.camera(self.camera_id) {
            Some(sensor) => sensor,
            None => {
                error!("Scene has no camera {}", self.camera_id);
                return None;
            }
        };
        let (width, height) = sensor.resolution();
        info!("Rendering {}x{}, {} frames, seed {} with {}",
              width, height, self.frames, self.seed, self.integrator.describe());

        let tiles_x = (width + TILE_SIZE - 1) / TILE_SIZE;
        let tiles_y = (height + TILE_SIZE - 1) / TILE_SIZE;
        let total_tiles = tiles_x * tiles_y;

        let progress = ProgressBar::new(total_tiles as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} tiles")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_tile = AtomicUsize::new(0);
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .min(total_tiles.max(1));
        let (tx, rx) = mpsc::channel::<Tile>();
        let mut output = RenderOutput {
            radiance: Bitmap::new(width, height),
            ray_counts: vec![0; width * height],
        };

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_tile = &next_tile;
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let tile_index = next_tile.fetch_add(1, Ordering::Relaxed);
                        if tile_index >= total_tiles {
                            break;
                        }

                        let x0 = (tile_index % tiles_x) * TILE_SIZE;
                        let y0 = (tile_index / tiles_x) * TILE_SIZE;
                        let x1 = (x0 + TILE_SIZE).min(width);
                        let y1 = (y0 + TILE_SIZE).min(height);
                        let tile = self.render_tile(scene, sensor, x0, y0, x1, y1);
                        if tx.send(tile).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for tile in rx.iter() {
                let tile_width = tile.x1 - tile.x0;
                for y in tile.y0..tile.y1 {
                    for x in tile.x0..tile.x1 {
                        let idx = (x - tile.x0) + tile_width * (y - tile.y0);
                        output.radiance[(x, y)] = tile.radiance[idx];
                        output.ray_counts[x + width * y] = tile.ray_counts[idx];
                    }
                }
                progress.inc(1);
            }
        });
        progress.finish_and_clear();

        let total_rays: u64 = output.ray_counts.iter().map(|&c| c as u64).sum();
        let mean = output.radiance.mean();
        info!("Traced {} rays per frame, mean radiance ({:.4}, {:.4}, {:.4})",
              total_rays, mean.x, mean.y, mean.z);
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::SceneObject;
    use crate::emitters::background::Background;
    use crate::emitters::quad::QuadLight;
    use crate::integrators::path::PathIntegrator;
    use crate::materials::params::MaterialParams;
    use crate::math::spectrum::RGBSpectrum;
    use crate::sensors::perspective::PerspectiveCamera;
    use crate::shapes::sphere::Sphere;
    use std::sync::Arc;

    fn small_scene(width: usize, height: usize) -> Scene {
        let mut scene = Scene::new();
        let material = scene.add_material(MaterialParams::default());
        scene.add_object(SceneObject::new(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, -3.0), 1.0)), material));
        scene.add_light(QuadLight::new(RGBSpectrum::splat(5.0),
                                       Vector3f::new(0.0, 3.0, 0.0),
                                       Vector3f::new(0.0, -1.0, 0.0),
                                       Vector3f::new(1.0, 0.0, 0.0),
                                       Vector3f::new(0.0, 0.0, 1.0),
                                       1.0, 1.0));
        scene.add_sensor(Box::new(PerspectiveCamera::new(Vector3f::zeros(),
                                                         Vector3f::new(0.0, 0.0, -1.0),
                                                         Vector3f::new(0.0, 1.0, 0.0),
                                                         1.0, width, height)));
        scene
    }

    fn render(scene: &Scene, frames: u32, seed: u32) -> RenderOutput {
        SimpleRenderer::new(Box::new(PathIntegrator::default()), 0, frames, seed)
            .render(scene)
            .unwrap()
    }

    #[test]
    fn test_render_is_deterministic() {
        // Wider than one tile so several workers contribute.
        let scene = small_scene(70, 6);
        let a = render(&scene, 2, 7);
        let b = render(&scene, 2, 7);
        assert_eq!(a.radiance.raw_copy(), b.radiance.raw_copy());
        assert_eq!(a.ray_counts, b.ray_counts);

        let c = render(&scene, 2, 8);
        assert_ne!(a.radiance.raw_copy(), c.radiance.raw_copy());
    }

    #[test]
    fn test_sphere_pixels_trace_more_rays() {
        let scene = small_scene(9, 9);
        let output = render(&scene, 1, 0);
        // Centre pixel hits the sphere, the corner misses everything.
        assert!(output.ray_counts[4 + 9 * 4] >= 2);
        assert_eq!(output.ray_counts[0], 1);
    }

    #[test]
    fn test_empty_scene_shows_background() {
        let mut scene = Scene::new();
        scene.set_background(Background::Constant(RGBSpectrum::new(0.25, 0.5, 1.0)));
        scene.add_sensor(Box::new(PerspectiveCamera::new(Vector3f::zeros(),
                                                         Vector3f::new(0.0, 0.0, 1.0),
                                                         Vector3f::new(0.0, 1.0, 0.0),
                                                         1.0, 5, 3)));
        let output = render(&scene, 3, 1);
        for (r, g, b) in output.radiance.raw_copy() {
            assert_eq!((r, g, b), (0.25, 0.5, 1.0));
        }
        assert!(output.ray_counts.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_missing_camera() {
        let scene = Scene::new();
        let renderer = SimpleRenderer::new(Box::new(PathIntegrator::default()), 2, 1, 0);
        assert!(renderer.render(&scene).is_none());
    }
}
