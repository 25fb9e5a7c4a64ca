//! Error types for file I/O operations.

use crate::error::{ContainerError, HeaderError};
use astc_encode_common::allocate::UseAfterRelease;
use thiserror::Error;

/// Result type for file operations.
pub type FileOperationResult<T> = Result<T, FileOperationError>;

/// Errors that can occur during file operations.
///
/// File operations fail either because the file could not be accessed or because its contents
/// are not a valid container.
#[derive(Debug, Error)]
pub enum FileOperationError {
    /// I/O operation failed
    #[error("I/O operation failed: {0}")]
    Io(#[from] FileIoError),

    /// The file contents are not a valid container
    #[error("Invalid .astc container: {0}")]
    Container(#[from] ContainerError),
}

impl From<HeaderError> for FileOperationError {
    fn from(e: HeaderError) -> Self {
        Self::Container(ContainerError::Header(e))
    }
}

impl From<UseAfterRelease> for FileOperationError {
    fn from(e: UseAfterRelease) -> Self {
        Self::Container(ContainerError::UseAfterRelease(e))
    }
}

/// Errors from the `lightweight-mmap` backend.
#[cfg(feature = "lightweight-mmap")]
#[derive(Debug, Error)]
pub enum LightweightMmapError {
    /// Error opening file handle
    #[error("Failed to open file handle: {0}")]
    FileHandle(#[from] lightweight_mmap::handles::HandleOpenError),

    /// Error creating memory mapping
    #[error("Failed to create memory mapping: {0}")]
    MemoryMapping(#[from] lightweight_mmap::mmap::MmapError),
}

/// File I/O errors that can occur with different backends
#[derive(Debug, Error)]
pub enum FileIoError {
    /// Error from lightweight-mmap backend
    #[cfg(feature = "lightweight-mmap")]
    #[error("lightweight-mmap error: {0}")]
    LightweightMmap(#[from] LightweightMmapError),

    /// Error from std I/O operations
    #[error("I/O error: {0}")]
    Std(#[from] std::io::Error),
}

#[cfg(feature = "lightweight-mmap")]
impl From<lightweight_mmap::handles::HandleOpenError> for FileOperationError {
    fn from(e: lightweight_mmap::handles::HandleOpenError) -> Self {
        Self::Io(FileIoError::LightweightMmap(
            LightweightMmapError::FileHandle(e),
        ))
    }
}

#[cfg(feature = "lightweight-mmap")]
impl From<lightweight_mmap::mmap::MmapError> for FileOperationError {
    fn from(e: lightweight_mmap::mmap::MmapError) -> Self {
        Self::Io(FileIoError::LightweightMmap(
            LightweightMmapError::MemoryMapping(e),
        ))
    }
}
