//! The seam between the compression pipeline and an ASTC block compressor.
//!
//! [`AstcCodec`] mirrors the lifecycle of the reference `astcenc` library:
//!
//! 1. [`AstcCodec::config_init`] validates the profile, footprint, effort and flags.
//! 2. [`AstcCodec::context_alloc`] creates a context for a number of worker threads.
//! 3. [`AstcCodec::compress_image`] compresses one image, followed by
//!    [`AstcCodec::compress_reset`] before the next image.
//! 4. [`AstcCodec::context_free`] destroys the context.
//!
//! The pipeline never drives these calls directly; it goes through a
//! [`CodecSession`](crate::session::CodecSession), which enforces the order.

use astc_encode_common::block::BlockFootprint;
use astc_encode_common::texel::CanonicalPrecision;
use bitfield::bitfield;
use core::fmt;

/// Status code reported by a codec call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CodecStatus {
    /// The call was successful.
    Success,
    /// Out of memory, or an undersized output buffer.
    OutOfMemory,
    /// The codec was built with fast math.
    BadCpuFloat,
    /// A parameter was out of range.
    BadParam,
    /// The block footprint is not a valid ASTC footprint.
    BadBlockSize,
    /// The color profile is invalid.
    BadProfile,
    /// The quality value is out of range.
    BadQuality,
    /// The component swizzle is invalid.
    BadSwizzle,
    /// The flag set is invalid.
    BadFlags,
    /// The context does not support the operation.
    BadContext,
    /// The operation is not implemented.
    NotImplemented,
    /// A status code this crate does not know about.
    Other(u32),
}

impl CodecStatus {
    /// Maps the numeric status returned by `astcenc`.
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Success,
            1 => Self::OutOfMemory,
            2 => Self::BadCpuFloat,
            3 => Self::BadParam,
            4 => Self::BadBlockSize,
            5 => Self::BadProfile,
            6 => Self::BadQuality,
            7 => Self::BadSwizzle,
            8 => Self::BadFlags,
            9 => Self::BadContext,
            10 => Self::NotImplemented,
            other => Self::Other(other),
        }
    }

    /// The numeric status as returned by `astcenc`.
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::Success => 0,
            Self::OutOfMemory => 1,
            Self::BadCpuFloat => 2,
            Self::BadParam => 3,
            Self::BadBlockSize => 4,
            Self::BadProfile => 5,
            Self::BadQuality => 6,
            Self::BadSwizzle => 7,
            Self::BadFlags => 8,
            Self::BadContext => 9,
            Self::NotImplemented => 10,
            Self::Other(raw) => raw,
        }
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Converts the status into a [`Result`], keeping non-success statuses as the error.
    #[inline]
    pub const fn into_result(self) -> Result<(), CodecStatus> {
        match self {
            Self::Success => Ok(()),
            status => Err(status),
        }
    }
}

impl fmt::Display for CodecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::OutOfMemory => f.write_str("out of memory"),
            Self::BadCpuFloat => f.write_str("codec built with unsupported floating point mode"),
            Self::BadParam => f.write_str("bad parameter"),
            Self::BadBlockSize => f.write_str("bad block size"),
            Self::BadProfile => f.write_str("bad color profile"),
            Self::BadQuality => f.write_str("bad quality"),
            Self::BadSwizzle => f.write_str("bad swizzle"),
            Self::BadFlags => f.write_str("bad flags"),
            Self::BadContext => f.write_str("bad context"),
            Self::NotImplemented => f.write_str("not implemented"),
            Self::Other(raw) => write!(f, "unknown status {raw}"),
        }
    }
}

/// The color profile the codec compresses for.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Profile {
    /// LDR with sRGB encoded color.
    LdrSrgb = 0,
    /// LDR with linear color.
    Ldr = 1,
    /// HDR color with LDR alpha.
    HdrRgbLdrA = 2,
    /// HDR color and alpha.
    Hdr = 3,
}

/// Source of one output component.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SwizzleSelector {
    R = 0,
    G = 1,
    B = 2,
    A = 3,
    /// Constant zero.
    Zero = 4,
    /// Constant one.
    One = 5,
    /// Reconstructed normal Z component.
    Z = 6,
}

/// A per-component remapping applied by the codec before compression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Swizzle {
    pub r: SwizzleSelector,
    pub g: SwizzleSelector,
    pub b: SwizzleSelector,
    pub a: SwizzleSelector,
}

impl Swizzle {
    /// Identity mapping.
    pub const RGBA: Self = Self::new(
        SwizzleSelector::R,
        SwizzleSelector::G,
        SwizzleSelector::B,
        SwizzleSelector::A,
    );

    /// Swaps red and blue, for BGR ordered texels.
    pub const BGRA: Self = Self::new(
        SwizzleSelector::B,
        SwizzleSelector::G,
        SwizzleSelector::R,
        SwizzleSelector::A,
    );

    /// Two component normal maps with X in alpha and Y in the color channels.
    pub const GGGR: Self = Self::new(
        SwizzleSelector::G,
        SwizzleSelector::G,
        SwizzleSelector::G,
        SwizzleSelector::R,
    );

    pub const fn new(
        r: SwizzleSelector,
        g: SwizzleSelector,
        b: SwizzleSelector,
        a: SwizzleSelector,
    ) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Swizzle {
    fn default() -> Self {
        Self::RGBA
    }
}

bitfield! {
    /// Flags passed to [`AstcCodec::config_init`].
    ///
    /// The bit positions match `astcenc`'s `ASTCENC_FLG_*` constants.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CodecFlags(u32);
    impl Debug;

    /// Treat the input as a two component normal map and optimize for angular error.
    pub map_normal, set_map_normal: 0;
    /// Weight color errors by alpha.
    pub use_alpha_weight, set_use_alpha_weight: 2;
    /// Optimize for perceptual error rather than PSNR.
    pub use_perceptual, set_use_perceptual: 3;
    /// Create a context that can only decompress.
    pub decompress_only, set_decompress_only: 4;
    /// Only guarantee decompression of images compressed by the same context.
    pub self_decompress_only, set_self_decompress_only: 5;
    /// Treat the input as RGBM encoded HDR data.
    pub map_rgbm, set_map_rgbm: 6;
}

impl CodecFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// Creates flags from their raw bits.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Data type of each canonical texel component.
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CodecDataType {
    /// 8-bit unsigned normalized.
    U8 = 0,
    /// 16-bit half float.
    F16 = 1,
    /// 32-bit float.
    F32 = 2,
}

impl From<CanonicalPrecision> for CodecDataType {
    fn from(precision: CanonicalPrecision) -> Self {
        match precision {
            CanonicalPrecision::U8 => Self::U8,
            CanonicalPrecision::F16 => Self::F16,
            CanonicalPrecision::F32 => Self::F32,
        }
    }
}

/// An uncompressed image handed to [`AstcCodec::compress_image`].
///
/// Texels are canonical RGBA texels of [`ImageDescriptor::data_type`], row-major, one slice
/// after another.
#[derive(Debug, Copy, Clone)]
pub struct ImageDescriptor<'a> {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub data_type: CodecDataType,
    pub texels: &'a [u8],
}

impl<'a> ImageDescriptor<'a> {
    /// Describes a single 2D slice of canonical texels.
    pub fn new_2d(
        width: u32,
        height: u32,
        precision: CanonicalPrecision,
        texels: &'a [u8],
    ) -> Self {
        Self {
            width,
            height,
            depth: 1,
            data_type: precision.into(),
            texels,
        }
    }

    /// Bytes in one 2D slice.
    pub fn slice_len(&self) -> usize {
        let stride = match self.data_type {
            CodecDataType::U8 => CanonicalPrecision::U8.stride(),
            CodecDataType::F16 => CanonicalPrecision::F16.stride(),
            CodecDataType::F32 => CanonicalPrecision::F32.stride(),
        };
        self.width as usize * self.height as usize * stride
    }
}

/// An ASTC block compressor.
///
/// Implementations wrap a concrete encoder, such as the `astcenc` library. The trait is used
/// through [`CodecSession`](crate::session::CodecSession), which calls
/// [`AstcCodec::context_free`] exactly once for every context it allocates.
pub trait AstcCodec {
    /// Validated codec configuration.
    type Config;

    /// Compression context created from a [`AstcCodec::Config`].
    type Context;

    /// Creates a configuration.
    ///
    /// # Parameters
    ///
    /// - `profile`: Color profile of the input
    /// - `footprint`: Block footprint to compress with
    /// - `quality`: Search effort in `[0, 100]`
    /// - `flags`: Codec flags
    fn config_init(
        &self,
        profile: Profile,
        footprint: BlockFootprint,
        quality: f32,
        flags: CodecFlags,
    ) -> Result<Self::Config, CodecStatus>;

    /// Allocates a context for `thread_count` worker threads.
    fn context_alloc(
        &self,
        config: &Self::Config,
        thread_count: u32,
    ) -> Result<Self::Context, CodecStatus>;

    /// Compresses `image` into `output`, which holds exactly the blocks of the image.
    fn compress_image(
        &self,
        context: &mut Self::Context,
        image: &ImageDescriptor<'_>,
        swizzle: &Swizzle,
        output: &mut [u8],
        thread_index: u32,
    ) -> CodecStatus;

    /// Resets the context before the next image.
    ///
    /// Must only run once every thread has left [`AstcCodec::compress_image`].
    fn compress_reset(&self, context: &mut Self::Context) -> CodecStatus;

    /// Destroys a context.
    fn context_free(&self, context: Self::Context);
}
