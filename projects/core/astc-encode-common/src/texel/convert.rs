//! Per-encoding conversions from source texels into canonical RGBA texels.

use super::{CanonicalPrecision, SourceEncoding};
use half::f16;

/// Number of channels in a canonical texel.
pub const CANONICAL_CHANNELS: usize = 4;

/// Converts every texel in `source` into `output`.
///
/// `source` must hold a whole number of texels of `channel_count` channels and `output` must
/// hold the same number of canonical texels at the encoding's precision. Channels past the
/// fourth are dropped.
pub(crate) fn convert_texels(
    encoding: SourceEncoding,
    channel_count: usize,
    source: &[u8],
    output: &mut [u8],
) {
    match encoding {
        SourceEncoding::UNorm8 | SourceEncoding::Float16 | SourceEncoding::Float32 => {
            expand_texels(encoding, channel_count, source, output, copy_channel)
        }
        SourceEncoding::UNorm16 => {
            expand_texels(encoding, channel_count, source, output, unorm16_to_f16)
        }
    }
}

#[inline(always)]
fn copy_channel(source: &[u8], output: &mut [u8]) {
    output.copy_from_slice(source);
}

/// `v / 65535`, rounded to the nearest half float.
#[inline(always)]
fn unorm16_to_f16(source: &[u8], output: &mut [u8]) {
    let value = u16::from_le_bytes([source[0], source[1]]);
    let half = f16::from_f32(value as f32 / u16::MAX as f32);
    output.copy_from_slice(&half.to_le_bytes());
}

#[inline(always)]
fn expand_texels(
    encoding: SourceEncoding,
    channel_count: usize,
    source: &[u8],
    output: &mut [u8],
    convert_channel: fn(&[u8], &mut [u8]),
) {
    let precision: CanonicalPrecision = encoding.precision();
    let source_channel_bytes = encoding.channel_bytes();
    let output_channel_bytes = precision.channel_bytes();
    let fill = precision.opaque_black();
    let kept_channels = channel_count.min(CANONICAL_CHANNELS);

    let source_texels = source.chunks_exact(channel_count * source_channel_bytes);
    let output_texels = output.chunks_exact_mut(precision.stride());
    for (source_texel, output_texel) in source_texels.zip(output_texels) {
        output_texel.copy_from_slice(fill);
        for channel in 0..kept_channels {
            convert_channel(
                &source_texel[channel * source_channel_bytes..][..source_channel_bytes],
                &mut output_texel[channel * output_channel_bytes..][..output_channel_bytes],
            );
        }
    }
}
