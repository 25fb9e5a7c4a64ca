#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]

pub mod container;
pub mod error;
pub mod header;

#[cfg(feature = "file-io")]
pub mod file_io;

#[cfg(test)]
pub(crate) mod test_prelude;

// Re-export key types
pub use container::{encode_to_astc, parse_astc_container, AstcContainer};
pub use error::{ContainerError, ContainerResult, HeaderError};
pub use header::{
    decode_header, encode_header, AstcHeader, DecodedHeader, ImageExtent, ASTC_HEADER_SIZE,
    ASTC_MAGIC,
};

// Re-export file operation types when file-io feature is enabled
#[cfg(feature = "file-io")]
pub use file_io::{FileOperationError, FileOperationResult};
