// Copyright @yucwang 2026

use crate::core::texture::Texture;
use crate::math::constants::{Float, Vector2f};
use crate::math::spectrum::RGBSpectrum;
use exr::prelude::*;
use image::io::Reader as ImageReader;
use image::GenericImageView;
use log::info;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    Clamp,
}

/// Bilinearly filtered RGB bitmap. Rows are stored top to bottom, so
/// `v = 1` is the first row.
pub struct ImageTexture {
    width: usize,
    height: usize,
    data: Vec<Float>,
    wrap_mode: WrapMode,
}

pub fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

impl ImageTexture {
    /// `data` holds `width * height` linear RGB triples.
    pub fn from_rgb_data(width: usize, height: usize, data: Vec<Float>) -> std::result::Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(String::from("texture has no pixels"));
        }
        if data.len() != width * height * 3 {
            return Err(format!("texture data has {} values, expected {}",
                               data.len(), width * height * 3));
        }
        Ok(Self { width, height, data, wrap_mode: WrapMode::Repeat })
    }

    pub fn from_exr(path: &str) -> std::result::Result<Self, String> {
        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .rgba_channels(
                |resolution, _| {
                    let width = resolution.width();
                    let height = resolution.height();
                    (width, vec![0.0 as Float; width * height * 3])
                },
                |pixels: &mut (usize, Vec<Float>), position: Vec2<usize>, (r, g, b, _a): (f32, f32, f32, f32)| {
                    let (width, data) = pixels;
                    let base = (position.y() * *width + position.x()) * 3;
                    data[base] = r;
                    data[base + 1] = g;
                    data[base + 2] = b;
                },
            )
            .first_valid_layer()
            .all_attributes()
            .from_file(path)
            .map_err(|e| format!("failed to read exr {}: {}", path, e))?;

        let size = image.layer_data.size;
        let (_, data) = image.layer_data.channel_data.pixels;
        Self::from_rgb_data(size.width(), size.height(), data)
    }

    pub fn from_image(path: &str, srgb: bool) -> std::result::Result<Self, String> {
        let img = ImageReader::open(path)
            .map_err(|e| format!("failed to open image {}: {}", path, e))?
            .decode()
            .map_err(|e| format!("failed to decode image {}: {}", path, e))?;

        let (width, height) = img.dimensions();
        let rgb = img.to_rgb32f();
        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for p in rgb.pixels() {
            for c in 0..3 {
                data.push(if srgb { srgb_to_linear(p[c]) } else { p[c] });
            }
        }
        Self::from_rgb_data(width as usize, height as usize, data)
    }

    /// Loads by extension. LDR formats are assumed to be sRGB encoded.
    pub fn from_file(path: &str) -> std::result::Result<Self, String> {
        let ext = Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let texture = match ext.as_str() {
            "exr" => Self::from_exr(path),
            "jpg" | "jpeg" | "png" => Self::from_image(path, true),
            _ => Err(format!("unsupported texture format: {}", ext)),
        }?;
        info!("Loaded texture {} ({}x{})", path, texture.width, texture.height);
        Ok(texture)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
        self.wrap_mode = wrap_mode;
    }

    fn pixel_at(&self, x: usize, y: usize) -> RGBSpectrum {
        let base = (y * self.width + x) * 3;
        RGBSpectrum::new(self.data[base], self.data[base + 1], self.data[base + 2])
    }

    fn wrap_index(&self, idx: isize, size: usize) -> usize {
        let n = size as isize;
        match self.wrap_mode {
            WrapMode::Repeat => idx.rem_euclid(n) as usize,
            WrapMode::Clamp => idx.max(0).min(n - 1) as usize,
        }
    }
}

impl Texture for ImageTexture {
    fn eval(&self, uv: Vector2f) -> RGBSpectrum {
        let x = uv.x * self.width as Float - 0.5;
        let y = (1.0 - uv.y) * self.height as Float - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let xa = self.wrap_index(x0, self.width);
        let xb = self.wrap_index(x0 + 1, self.width);
        let ya = self.wrap_index(y0, self.height);
        let yb = self.wrap_index(y0 + 1, self.height);

        let top = RGBSpectrum::lerp(self.pixel_at(xa, ya), self.pixel_at(xb, ya), tx);
        let bottom = RGBSpectrum::lerp(self.pixel_at(xa, yb), self.pixel_at(xb, yb), tx);
        RGBSpectrum::lerp(top, bottom, ty)
    }

    fn describe(&self) -> String {
        format!("ImageTexture [{}x{}, {:?}]", self.width, self.height, self.wrap_mode)
    }
}
