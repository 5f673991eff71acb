/* Copyright 2020 @TwoCookingMice */

use super::{check_size, ImageWriteError};
use crate::math::constants::Float;

use exr::prelude::*;

/// Writes linear RGB pixels, row-major from the top-left corner.
pub fn write_exr_to_file(image: &[(Float, Float, Float)],
                         width: usize,
                         height: usize,
                         file_path: &str) -> std::result::Result<(), ImageWriteError> {
    log::info!("Starting writing openexr images: {}.", file_path);
    check_size(image.len(), width, height)?;

    write_rgb_file(file_path, width, height, |x, y| {
        let (r, g, b) = image[y * width + x];
        (r, g, b)
    })?;
    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::texture::Texture;
    use crate::math::constants::Vector2f;
    use crate::textures::image::ImageTexture;

    #[test]
    fn test_write_exr_and_read_back() {
        let path = std::env::temp_dir().join(format!("glint_exr_{}.exr", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let pixels = vec![(1.0, 0.0, 0.0), (0.0, 2.0, 0.0), (0.0, 0.0, 3.0), (0.5, 0.5, 0.5)];
        write_exr_to_file(&pixels, 2, 2, &path).unwrap();

        let tex = ImageTexture::from_exr(&path).unwrap();
        assert_eq!(tex.dimensions(), (2, 2));
        // Texel centres; v runs bottom to top.
        let top_right = tex.eval(Vector2f::new(0.75, 0.75));
        assert!((top_right.g() - 2.0).abs() < 1e-6);
        let bottom_left = tex.eval(Vector2f::new(0.25, 0.25));
        assert!((bottom_left.b() - 3.0).abs() < 1e-6);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_write_exr_rejects_wrong_size() {
        let pixels = vec![(0.0, 0.0, 0.0); 3];
        match write_exr_to_file(&pixels, 2, 2, "unused.exr") {
            Err(ImageWriteError::Size { expected: 4, actual: 3 }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }
}
