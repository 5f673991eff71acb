// Copyright @yucwang 2026

use crate::math::constants::Float;

// Largest float strictly below one.
const ONE_MINUS_EPSILON: Float = 1.0 - std::f32::EPSILON / 2.0;

const LCG_MULTIPLIER: u32 = 1664525;
const LCG_INCREMENT: u32 = 1013904223;

pub fn murmur_hash3_mix(hash: u32, k: u32) -> u32 {
    const C1: u32 = 0xcc9e2d51;
    const C2: u32 = 0x1b873593;
    const R1: u32 = 15;
    const R2: u32 = 13;
    const M: u32 = 5;
    const N: u32 = 0xe6546b64;

    let mut k = k.wrapping_mul(C1);
    k = k.rotate_left(R1);
    k = k.wrapping_mul(C2);

    let hash = hash ^ k;
    hash.rotate_left(R2).wrapping_mul(M).wrapping_add(N)
}

pub fn murmur_hash3_finalize(hash: u32) -> u32 {
    let mut hash = hash;
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85ebca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2ae35);
    hash ^= hash >> 16;

    hash
}

/// One 32-bit word of LCG state, owned by a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LcgRng {
    state: u32,
}

impl LcgRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Seeds the stream of one pixel in one frame. Pixels are linearised in
    /// row-major order before hashing, then the frame id is mixed in.
    pub fn from_pixel(frame_id: u32, pixel: (u32, u32), dims: (u32, u32)) -> Self {
        let linear = pixel.0.wrapping_add(pixel.1.wrapping_mul(dims.0));
        let mut state = murmur_hash3_mix(0, linear);
        state = murmur_hash3_mix(state, frame_id);
        state = murmur_hash3_finalize(state);

        Self { state }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> Float {
        let v = (self.next_u32() as Float) * (1.0 / 4294967296.0);
        v.min(ONE_MINUS_EPSILON)
    }
}
