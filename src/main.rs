// Copyright 2020 TwoCookingMice

use glint::core::scene_loader::load_scene_with_settings;
use glint::integrators::path::PathIntegrator;
use glint::io::{exr_utils, png_utils};
use glint::renderers::simple::{Renderer, SimpleRenderer};

use log::{error, info};

use std::env;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <scene.xml> <output.exr> [--frames N] [--max-depth N] [--seed N] [--camera N] \
               [--no-rr] [--ldr out.png] [--stats stats.png]", program);
    process::exit(1);
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage(&args[0]);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let mut frames_override: Option<u32> = None;
    let mut max_depth_override: Option<u32> = None;
    let mut seed: u32 = 0;
    let mut camera_id: usize = 0;
    let mut no_rr = false;
    let mut ldr_path: Option<String> = None;
    let mut stats_path: Option<String> = None;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--frames" => {
                i += 1;
                frames_override = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--max-depth" => {
                i += 1;
                max_depth_override = args.get(i).and_then(|v| v.parse::<u32>().ok());
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(0);
            }
            "--camera" => {
                i += 1;
                camera_id = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(0);
            }
            "--no-rr" => no_rr = true,
            "--ldr" => {
                i += 1;
                ldr_path = args.get(i).cloned();
            }
            "--stats" => {
                i += 1;
                stats_path = args.get(i).cloned();
            }
            other => {
                error!("Unknown argument: {}", other);
                usage(&args[0]);
            }
        }
        i += 1;
    }

    let load_result = match load_scene_with_settings(input_path) {
        Ok(result) => result,
        Err(e) => {
            error!("Failed to load scene {}: {}", input_path, e);
            process::exit(1);
        }
    };

    let scene = load_result.scene;
    let mut settings = load_result.settings;
    if let Some(depth) = max_depth_override {
        settings.max_depth = depth;
    }
    if no_rr {
        settings.russian_roulette = false;
    }
    let frames = frames_override.or(load_result.frames).unwrap_or(1);
    let integrator = Box::new(PathIntegrator::new(settings));

    let renderer = SimpleRenderer::new(integrator, camera_id, frames, seed);
    let output = match renderer.render(&scene) {
        Some(output) => output,
        None => {
            error!("Scene has no camera {}", camera_id);
            process::exit(1);
        }
    };

    let (width, height) = (output.radiance.width(), output.radiance.height());
    let pixels = output.radiance.raw_copy();
    let mut failed = false;
    if let Err(e) = exr_utils::write_exr_to_file(&pixels, width, height, output_path) {
        error!("Failed to write {}: {}", output_path, e);
        failed = true;
    } else {
        info!("Wrote {}", output_path);
    }
    if let Some(path) = ldr_path {
        if let Err(e) = png_utils::write_srgb_png(&pixels, width, height, &path) {
            error!("Failed to write {}: {}", path, e);
            failed = true;
        }
    }
    if let Some(path) = stats_path {
        if let Err(e) = png_utils::write_ray_stats_png(&output.ray_counts, width, height, &path) {
            error!("Failed to write {}: {}", path, e);
            failed = true;
        }
    }
    if failed {
        process::exit(1);
    }
}
