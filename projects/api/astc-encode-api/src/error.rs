//! Error types for ASTC compression.

use crate::codec::CodecStatus;
use astc_encode_common::allocate::{AllocateError, UseAfterRelease};
use astc_encode_common::block::BlockFootprint;
use astc_encode_common::mip::DimensionError;
use astc_encode_common::texel::TexelError;
use thiserror::Error;

/// Result type for compression operations.
pub type AstcEncodeResult<T> = Result<T, AstcEncodeError>;

/// Errors that can occur while compressing a texture.
///
/// Codec errors carry the status reported by the codec, and the mip level when they happened
/// while compressing one. No buffer allocated by the failed operation outlives the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AstcEncodeError {
    /// The numeric pixel format id does not name a supported format.
    #[error("Unsupported pixel format id: {0}")]
    UnsupportedPixelFormat(u32),

    /// The codec rejected the configuration.
    #[error("Codec configuration failed: {0}")]
    CodecConfig(CodecStatus),

    /// The codec could not allocate a context.
    #[error("Codec context allocation failed: {0}")]
    CodecContext(CodecStatus),

    /// The codec failed to compress a mip level.
    #[error("Codec failed to compress mip {mip}: {status}")]
    CodecCompress { status: CodecStatus, mip: u32 },

    /// The codec failed to reset after compressing a mip level.
    #[error("Codec failed to reset after mip {mip}: {status}")]
    CodecReset { status: CodecStatus, mip: u32 },

    /// A foreign buffer was accessed after release.
    #[error(transparent)]
    UseAfterRelease(#[from] UseAfterRelease),

    /// Texture width, height, mip count or block footprint is invalid.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(#[from] DimensionError),

    /// The source texels do not cover every mip level.
    #[error("Insufficient texel data: needed {required} bytes, got {actual}")]
    InsufficientTexelData { required: usize, actual: usize },

    /// The block footprint differs from the one the codec session was configured with.
    #[error("Block footprint {requested} does not match the codec session footprint {session}")]
    FootprintMismatch {
        requested: BlockFootprint,
        session: BlockFootprint,
    },

    /// Texel normalization failed.
    #[error(transparent)]
    Texel(TexelError),

    /// A buffer could not be allocated.
    #[error(transparent)]
    AllocationFailed(#[from] AllocateError),
}

impl From<TexelError> for AstcEncodeError {
    fn from(error: TexelError) -> Self {
        match error {
            TexelError::UnsupportedPixelFormat(id) => Self::UnsupportedPixelFormat(id),
            TexelError::Allocate(error) => Self::AllocationFailed(error),
            TexelError::UseAfterRelease(error) => Self::UseAfterRelease(error),
            other => Self::Texel(other),
        }
    }
}
