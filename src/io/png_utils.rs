// Copyright @yucwang 2026

use super::{check_size, ImageWriteError};
use crate::math::constants::Float;

use image::{ImageBuffer, Luma, Rgb};

pub fn linear_to_srgb(v: Float) -> Float {
    let v = v.max(0.0).min(1.0);
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn to_u8(v: Float) -> u8 {
    (linear_to_srgb(v) * 255.0 + 0.5) as u8
}

/// 8-bit sRGB preview of linear radiance; values outside [0, 1] are clamped.
pub fn write_srgb_png(image: &[(Float, Float, Float)],
                      width: usize,
                      height: usize,
                      file_path: &str) -> Result<(), ImageWriteError> {
    check_size(image.len(), width, height)?;
    let buffer = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let (r, g, b) = image[y as usize * width + x as usize];
        Rgb([to_u8(r), to_u8(g), to_u8(b)])
    });
    buffer.save(file_path)?;
    log::info!("PNG written to: {}.", file_path);
    Ok(())
}

/// Per-pixel ray counts as 16-bit grey levels, saturating at `u16::MAX`.
pub fn write_ray_stats_png(counts: &[u32],
                           width: usize,
                           height: usize,
                           file_path: &str) -> Result<(), ImageWriteError> {
    check_size(counts.len(), width, height)?;
    let buffer: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let count = counts[y as usize * width + x as usize];
        Luma([count.min(u16::MAX as u32) as u16])
    });
    buffer.save(file_path)?;
    log::info!("Ray statistics written to: {}.", file_path);
    Ok(())
}
