//! Conversion of source texels into the canonical layout consumed by ASTC codecs.
//!
//! A canonical texel always has 4 channels (R, G, B, A) stored little-endian at one of three
//! [`CanonicalPrecision`]s:
//!
//! | Source bit depth | Canonical precision | Stride |
//! |------------------|---------------------|--------|
//! | 8                | [`CanonicalPrecision::U8`]  | 4  |
//! | 16               | [`CanonicalPrecision::F16`] | 8  |
//! | 32               | [`CanonicalPrecision::F32`] | 16 |
//!
//! Missing color channels are zero and a missing alpha channel is opaque (`0xFF`, or `1.0` for
//! float precisions). 16-bit unsigned normalized sources are divided by 65535 and rounded to the
//! nearest half float. Values are never clamped.
//!
//! Channel order is preserved: BGR sources stay BGR and are expected to be swizzled by the codec.

mod convert;
mod format;
mod precision;

pub use convert::CANONICAL_CHANNELS;
pub use format::*;
pub use precision::*;

use crate::allocate::{AllocateError, ForeignBuffer, UseAfterRelease};
use thiserror::Error;
use tracing::trace;

/// Errors that can occur while normalizing texels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TexelError {
    /// The numeric pixel format id does not name a supported format.
    #[error("Unsupported pixel format id: {0}")]
    UnsupportedPixelFormat(u32),

    /// No conversion exists for this channel encoding and bit depth.
    #[error("Unsupported channel encoding {encoding:?} at {bit_depth} bits per channel")]
    UnsupportedEncoding {
        encoding: ChannelEncoding,
        bit_depth: u32,
    },

    /// Texels must have at least one channel.
    #[error("Texels must have at least one channel")]
    ZeroChannels,

    /// The source holds no texels.
    #[error("Source texel data is empty")]
    EmptySource,

    /// The source length is not a whole number of texels.
    #[error("Source length {len} is not a multiple of the texel size {texel_bytes}")]
    SourceLengthMismatch { len: usize, texel_bytes: usize },

    /// The output buffer is too small for the canonical texels.
    #[error("Output buffer too small: needed {needed} bytes, got {actual}")]
    OutputBufferTooSmall { needed: usize, actual: usize },

    /// The canonical staging buffer could not be allocated.
    #[error(transparent)]
    Allocate(#[from] AllocateError),

    /// The canonical staging buffer was released before it was written.
    #[error(transparent)]
    UseAfterRelease(#[from] UseAfterRelease),
}

/// Number of texels in `source` for a texel of `texel_bytes` bytes.
fn texel_count(source: &[u8], texel_bytes: usize) -> Result<usize, TexelError> {
    if source.is_empty() {
        return Err(TexelError::EmptySource);
    }

    if source.len() % texel_bytes != 0 {
        return Err(TexelError::SourceLengthMismatch {
            len: source.len(),
            texel_bytes,
        });
    }

    Ok(source.len() / texel_bytes)
}

/// Number of bytes [`normalize`] produces for `texel_count` texels of `format`.
#[inline]
pub const fn canonical_len(format: PixelFormat, texel_count: usize) -> usize {
    texel_count * format.precision().stride()
}

/// Normalizes texels of a known [`PixelFormat`] into a newly allocated canonical buffer.
///
/// # Parameters
///
/// - `format`: The layout of the texels in `source`
/// - `source`: Tightly packed little-endian texels
///
/// # Returns
///
/// A [`ForeignBuffer`] of `texel_count × format.precision().stride()` bytes, owned by the caller.
///
/// # Errors
///
/// - [`TexelError::EmptySource`] if `source` is empty
/// - [`TexelError::SourceLengthMismatch`] if `source` is not a whole number of texels
/// - [`TexelError::Allocate`] if the canonical buffer could not be allocated
///
/// # Examples
///
/// ```
/// use astc_encode_common::texel::{normalize, PixelFormat};
///
/// // Two RGB8 texels gain an opaque alpha channel.
/// let canonical = normalize(PixelFormat::Rgb8UNorm, &[1, 2, 3, 4, 5, 6])?;
/// assert_eq!(canonical.as_slice()?, &[1, 2, 3, 255, 4, 5, 6, 255]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn normalize(format: PixelFormat, source: &[u8]) -> Result<ForeignBuffer, TexelError> {
    normalize_encoding(source, format.channel_count(), format.source_encoding())
}

/// Normalizes texels described by their channel count, encoding and bit depth.
///
/// Equivalent to [`normalize`] for hosts that do not describe texels with a [`PixelFormat`].
/// Channels past the fourth are dropped.
///
/// # Returns
///
/// The canonical buffer together with the [`CanonicalPrecision`] it was written in.
///
/// # Errors
///
/// - [`TexelError::ZeroChannels`] if `channel_count` is 0
/// - [`TexelError::UnsupportedEncoding`] if there is no conversion for `encoding` at `bit_depth`
/// - Any error listed on [`normalize`]
pub fn normalize_with_bit_depth(
    source: &[u8],
    channel_count: usize,
    encoding: ChannelEncoding,
    bit_depth: u32,
) -> Result<(ForeignBuffer, CanonicalPrecision), TexelError> {
    let source_encoding = SourceEncoding::from_bit_depth(encoding, bit_depth)?;
    let buffer = normalize_encoding(source, channel_count, source_encoding)?;
    Ok((buffer, source_encoding.precision()))
}

/// Normalizes texels of `format` into an existing buffer.
///
/// # Returns
///
/// The number of bytes written to `output`.
///
/// # Errors
///
/// - [`TexelError::OutputBufferTooSmall`] if `output` cannot hold every canonical texel
/// - [`TexelError::EmptySource`] / [`TexelError::SourceLengthMismatch`] as for [`normalize`]
pub fn normalize_into(
    format: PixelFormat,
    source: &[u8],
    output: &mut [u8],
) -> Result<usize, TexelError> {
    let texels = texel_count(source, format.bytes_per_texel())?;
    let needed = canonical_len(format, texels);
    if output.len() < needed {
        return Err(TexelError::OutputBufferTooSmall {
            needed,
            actual: output.len(),
        });
    }

    convert::convert_texels(
        format.source_encoding(),
        format.channel_count(),
        source,
        &mut output[..needed],
    );
    Ok(needed)
}

fn normalize_encoding(
    source: &[u8],
    channel_count: usize,
    encoding: SourceEncoding,
) -> Result<ForeignBuffer, TexelError> {
    if channel_count == 0 {
        return Err(TexelError::ZeroChannels);
    }

    let texels = texel_count(source, channel_count * encoding.channel_bytes())?;
    let precision = encoding.precision();
    let mut buffer = ForeignBuffer::new(texels * precision.stride())?;

    trace!(
        ?encoding,
        channel_count,
        texels,
        "normalizing texels into canonical buffer"
    );

    convert::convert_texels(encoding, channel_count, source, buffer.as_mut_slice()?);
    Ok(buffer)
}
