// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f };

use std::ops;

/// Linear RGB image, row-major with row 0 at the top.
#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Vector3f>,
    width: usize,
    height: usize,
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector3f;

    fn index(&self, (x, y): (usize, usize)) -> &Vector3f {
        debug_assert!(x < self.width && y < self.height);
        &self.data[x + self.width * y]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Vector3f {
        debug_assert!(x < self.width && y < self.height);
        &mut self.data[x + self.width * y]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![Vector3f::zeros(); width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Average over all pixels, zero for an empty image.
    pub fn mean(&self) -> Vector3f {
        if self.data.is_empty() {
            return Vector3f::zeros();
        }
        let sum = self.data.iter().fold(Vector3f::zeros(), |acc, p| acc + p);
        sum / self.data.len() as Float
    }

    // Row-major copy, the layout the image writers expect.
    pub fn raw_copy(&self) -> Vec<(Float, Float, Float)> {
        self.data.iter().map(|p| (p.x, p.y, p.z)).collect()
    }
}
