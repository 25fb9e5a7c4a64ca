//! Common test imports and utilities.
#![allow(unused_imports)]

pub use rstest::rstest;

use crate::texel::{CanonicalPrecision, PixelFormat};
use half::f16;

/// Deterministic, non-uniform source texels of `format`.
pub fn sample_texels(format: PixelFormat, texel_count: usize) -> Vec<u8> {
    (0..texel_count * format.bytes_per_texel())
        .map(|x| (x.wrapping_mul(37) ^ (x >> 3)) as u8)
        .collect()
}

/// Decodes the alpha channel of one canonical texel.
pub fn canonical_alpha(precision: CanonicalPrecision, texel: &[u8]) -> f32 {
    match precision {
        CanonicalPrecision::U8 => texel[3] as f32 / u8::MAX as f32,
        CanonicalPrecision::F16 => f16::from_le_bytes([texel[6], texel[7]]).to_f32(),
        CanonicalPrecision::F32 => f32::from_le_bytes([texel[12], texel[13], texel[14], texel[15]]),
    }
}
