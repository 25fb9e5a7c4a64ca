//! Error types for the `.astc` container.

use crate::header::ImageExtent;
use astc_encode_common::allocate::UseAfterRelease;
use astc_encode_common::mip::DimensionError;
use thiserror::Error;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Errors from building or validating a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The block footprint has a zero dimension.
    #[error("Invalid block footprint: {0}")]
    InvalidFootprint(#[from] DimensionError),

    /// An axis of the image does not fit in 24 bits.
    #[error("Image extent {extent} does not fit in the header ({value} exceeds 16777215)")]
    ExtentTooLarge { extent: ImageExtent, value: u32 },

    /// The header does not start with the `.astc` magic.
    #[error("Not an .astc header: magic mismatch")]
    InvalidMagic,
}

/// Errors from reading or writing a container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// The input is shorter than a header.
    #[error("Input too short for an .astc header: {len} bytes")]
    InputTooShort { len: usize },

    /// The output slice does not match the container length.
    #[error("Output buffer has {actual} bytes, container needs {required}")]
    OutputLengthMismatch { required: usize, actual: usize },

    #[error(transparent)]
    Header(#[from] HeaderError),

    /// The compressed output was released before it was written.
    #[error(transparent)]
    UseAfterRelease(#[from] UseAfterRelease),
}
