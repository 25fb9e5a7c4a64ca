//! The closed set of source pixel formats accepted by the normalizer.

use super::{CanonicalPrecision, TexelError};
use derive_enum_all_values::AllValues;

/// How the values of each source channel are encoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChannelEncoding {
    /// Unsigned integer mapped to `[0, 1]` by dividing by the type maximum.
    UNorm,
    /// 8-bit unsigned integer in the sRGB transfer curve.
    Srgb,
    /// IEEE floating point, half or single precision.
    SFloat,
}

/// Source channel encoding paired with its bit depth.
///
/// Each variant has exactly one conversion into canonical texels; see [`super::normalize`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SourceEncoding {
    /// 8-bit unsigned normalized (linear or sRGB), copied as-is.
    UNorm8,
    /// 16-bit unsigned normalized, converted to half floats.
    UNorm16,
    /// 16-bit half floats, copied as-is.
    Float16,
    /// 32-bit floats, copied as-is.
    Float32,
}

impl SourceEncoding {
    /// Resolves an encoding from a channel encoding and a per-channel bit depth.
    ///
    /// # Errors
    ///
    /// [`TexelError::UnsupportedEncoding`] for combinations with no conversion, such as
    /// 32-bit integers or 8-bit floats.
    pub fn from_bit_depth(encoding: ChannelEncoding, bit_depth: u32) -> Result<Self, TexelError> {
        match (encoding, bit_depth) {
            (ChannelEncoding::UNorm | ChannelEncoding::Srgb, 8) => Ok(Self::UNorm8),
            (ChannelEncoding::UNorm, 16) => Ok(Self::UNorm16),
            (ChannelEncoding::SFloat, 16) => Ok(Self::Float16),
            (ChannelEncoding::SFloat, 32) => Ok(Self::Float32),
            _ => Err(TexelError::UnsupportedEncoding {
                encoding,
                bit_depth,
            }),
        }
    }

    /// Bits per source channel.
    pub const fn bit_depth(self) -> u32 {
        match self {
            Self::UNorm8 => 8,
            Self::UNorm16 | Self::Float16 => 16,
            Self::Float32 => 32,
        }
    }

    /// Bytes per source channel.
    pub const fn channel_bytes(self) -> usize {
        (self.bit_depth() / 8) as usize
    }

    /// Canonical precision the codec receives for this encoding.
    pub const fn precision(self) -> CanonicalPrecision {
        match self {
            Self::UNorm8 => CanonicalPrecision::U8,
            Self::UNorm16 | Self::Float16 => CanonicalPrecision::F16,
            Self::Float32 => CanonicalPrecision::F32,
        }
    }
}

/// A supported source pixel format.
///
/// The discriminant is the stable numeric id used by [`PixelFormat::from_id`]; hosts
/// that describe formats numerically go through that.
///
/// BGR ordered formats are normalized without reordering; the codec swizzle restores RGB order.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, AllValues)]
pub enum PixelFormat {
    R8UNorm = 0,
    R8Srgb = 1,
    Rg8UNorm = 2,
    Rg8Srgb = 3,
    Rgb8UNorm = 4,
    Rgb8Srgb = 5,
    Rgba8UNorm = 6,
    Rgba8Srgb = 7,
    Bgr8UNorm = 8,
    Bgr8Srgb = 9,
    Bgra8UNorm = 10,
    Bgra8Srgb = 11,
    R16UNorm = 12,
    Rg16UNorm = 13,
    Rgb16UNorm = 14,
    Rgba16UNorm = 15,
    R16SFloat = 16,
    Rg16SFloat = 17,
    Rgb16SFloat = 18,
    Rgba16SFloat = 19,
    R32SFloat = 20,
    Rg32SFloat = 21,
    Rgb32SFloat = 22,
    Rgba32SFloat = 23,
}

impl PixelFormat {
    /// Looks up a format by its numeric id.
    ///
    /// # Errors
    ///
    /// [`TexelError::UnsupportedPixelFormat`] if `id` names no supported format.
    ///
    /// # Examples
    ///
    /// ```
    /// use astc_encode_common::texel::PixelFormat;
    ///
    /// assert_eq!(PixelFormat::from_id(6).unwrap(), PixelFormat::Rgba8UNorm);
    /// assert!(PixelFormat::from_id(9000).is_err());
    /// ```
    pub fn from_id(id: u32) -> Result<Self, TexelError> {
        Self::all_values()
            .iter()
            .copied()
            .find(|format| format.id() == id)
            .ok_or(TexelError::UnsupportedPixelFormat(id))
    }

    /// Numeric id of this format.
    #[inline]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Number of channels stored per source texel.
    pub const fn channel_count(self) -> usize {
        use PixelFormat::*;
        match self {
            R8UNorm | R8Srgb | R16UNorm | R16SFloat | R32SFloat => 1,
            Rg8UNorm | Rg8Srgb | Rg16UNorm | Rg16SFloat | Rg32SFloat => 2,
            Rgb8UNorm | Rgb8Srgb | Bgr8UNorm | Bgr8Srgb | Rgb16UNorm | Rgb16SFloat
            | Rgb32SFloat => 3,
            Rgba8UNorm | Rgba8Srgb | Bgra8UNorm | Bgra8Srgb | Rgba16UNorm | Rgba16SFloat
            | Rgba32SFloat => 4,
        }
    }

    /// How each channel is encoded.
    pub const fn channel_encoding(self) -> ChannelEncoding {
        use PixelFormat::*;
        match self {
            R8Srgb | Rg8Srgb | Rgb8Srgb | Rgba8Srgb | Bgr8Srgb | Bgra8Srgb => {
                ChannelEncoding::Srgb
            }
            R8UNorm | Rg8UNorm | Rgb8UNorm | Rgba8UNorm | Bgr8UNorm | Bgra8UNorm | R16UNorm
            | Rg16UNorm | Rgb16UNorm | Rgba16UNorm => ChannelEncoding::UNorm,
            R16SFloat | Rg16SFloat | Rgb16SFloat | Rgba16SFloat | R32SFloat | Rg32SFloat
            | Rgb32SFloat | Rgba32SFloat => ChannelEncoding::SFloat,
        }
    }

    /// Bits per channel.
    pub const fn bit_depth(self) -> u32 {
        self.source_encoding().bit_depth()
    }

    /// The encoding and bit depth pair that selects this format's conversion.
    pub const fn source_encoding(self) -> SourceEncoding {
        use PixelFormat::*;
        match self {
            R8UNorm | R8Srgb | Rg8UNorm | Rg8Srgb | Rgb8UNorm | Rgb8Srgb | Rgba8UNorm
            | Rgba8Srgb | Bgr8UNorm | Bgr8Srgb | Bgra8UNorm | Bgra8Srgb => SourceEncoding::UNorm8,
            R16UNorm | Rg16UNorm | Rgb16UNorm | Rgba16UNorm => SourceEncoding::UNorm16,
            R16SFloat | Rg16SFloat | Rgb16SFloat | Rgba16SFloat => SourceEncoding::Float16,
            R32SFloat | Rg32SFloat | Rgb32SFloat | Rgba32SFloat => SourceEncoding::Float32,
        }
    }

    /// Bytes per source texel.
    #[inline]
    pub const fn bytes_per_texel(self) -> usize {
        self.channel_count() * self.source_encoding().channel_bytes()
    }

    /// Canonical precision texels of this format are normalized to.
    #[inline]
    pub const fn precision(self) -> CanonicalPrecision {
        self.source_encoding().precision()
    }

    /// Whether the format stores an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        self.channel_count() == 4
    }

    /// Whether the color channels are stored blue first.
    pub const fn is_bgr(self) -> bool {
        matches!(
            self,
            PixelFormat::Bgr8UNorm
                | PixelFormat::Bgr8Srgb
                | PixelFormat::Bgra8UNorm
                | PixelFormat::Bgra8Srgb
        )
    }

    /// Whether the color channels are sRGB encoded.
    #[inline]
    pub const fn is_srgb(self) -> bool {
        matches!(self.channel_encoding(), ChannelEncoding::Srgb)
    }

    /// Whether the channels are floating point.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self.channel_encoding(), ChannelEncoding::SFloat)
    }
}
