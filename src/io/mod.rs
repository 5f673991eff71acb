// Copyright @yucwang 2026

pub mod exr_utils;
pub mod png_utils;

use std::fmt;

#[derive(Debug)]
pub enum ImageWriteError {
    Exr(exr::error::Error),
    Image(image::ImageError),
    /// The pixel buffer does not match the requested size.
    Size { expected: usize, actual: usize },
}

impl fmt::Display for ImageWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageWriteError::Exr(e) => write!(f, "exr error: {}", e),
            ImageWriteError::Image(e) => write!(f, "image error: {}", e),
            ImageWriteError::Size { expected, actual } =>
                write!(f, "expected {} pixels, got {}", expected, actual),
        }
    }
}

impl std::error::Error for ImageWriteError {}

impl From<exr::error::Error> for ImageWriteError {
    fn from(e: exr::error::Error) -> Self {
        ImageWriteError::Exr(e)
    }
}

impl From<image::ImageError> for ImageWriteError {
    fn from(e: image::ImageError) -> Self {
        ImageWriteError::Image(e)
    }
}

pub(crate) fn check_size(len: usize, width: usize, height: usize) -> Result<(), ImageWriteError> {
    if len != width * height {
        return Err(ImageWriteError::Size { expected: width * height, actual: len });
    }
    Ok(())
}
