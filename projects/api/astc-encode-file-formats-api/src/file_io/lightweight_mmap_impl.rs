//! File I/O implementation using lightweight-mmap.

use crate::container::{container_len, header_for_output, parse_astc_container, write_container};
use crate::error::ContainerError;
use crate::file_io::FileOperationResult;
use crate::header::{AstcHeader, DecodedHeader, ASTC_HEADER_SIZE};
use astc_encode_api::CompressedOutput;
use lightweight_mmap::handles::*;
use lightweight_mmap::mmap::*;
use std::path::Path;
use tracing::debug;

/// Contents of an `.astc` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstcFile {
    pub header: DecodedHeader,
    /// Compressed blocks following the header.
    pub payload: Vec<u8>,
}

/// Writes `header` followed by `payload` to a new file at `output_path`.
///
/// The file is created (or truncated) with exactly `16 + payload.len()` bytes and written
/// through a memory map. The output directory must exist.
pub fn write_astc_file(
    output_path: &Path,
    header: &AstcHeader,
    payload: &[u8],
) -> FileOperationResult<()> {
    let len = container_len(payload.len());
    let output_handle = ReadWriteFileHandle::create_preallocated(output_path, len as i64)?;
    let mut output_mapping = ReadWriteMmap::new(&output_handle, 0, len)?;

    write_container(header, payload, output_mapping.as_mut_slice())?;
    debug!(path = %output_path.display(), len, "wrote .astc file");
    Ok(())
}

/// Writes every mip level of `output` to an `.astc` file at `output_path`.
///
/// # Returns
///
/// The header that was written.
pub fn write_compressed_output(
    output_path: &Path,
    output: &CompressedOutput,
) -> FileOperationResult<AstcHeader> {
    let header = header_for_output(output)?;
    write_astc_file(output_path, &header, output.as_slice()?)?;
    Ok(header)
}

/// Reads the header and payload of the `.astc` file at `input_path`.
///
/// A magic mismatch is not an error; check [`DecodedHeader::magic_valid`].
///
/// # Errors
///
/// [`ContainerError::InputTooShort`] if the file is shorter than a header, and I/O errors.
pub fn read_astc_file(input_path: &Path) -> FileOperationResult<AstcFile> {
    let input_handle = ReadOnlyFileHandle::open(input_path)?;
    let input_size = input_handle.size()? as usize;
    if input_size < ASTC_HEADER_SIZE {
        return Err(ContainerError::InputTooShort { len: input_size }.into());
    }

    let input_mapping = ReadOnlyMmap::new(&input_handle, 0, input_size)?;
    let container = parse_astc_container(input_mapping.as_slice())?;
    Ok(AstcFile {
        header: container.header,
        payload: container.payload.to_vec(),
    })
}

/// Reads only the header of the `.astc` file at `input_path`.
///
/// # Returns
///
/// The decoded header and the length of the payload that follows it.
pub fn read_astc_header(input_path: &Path) -> FileOperationResult<(DecodedHeader, usize)> {
    let input_handle = ReadOnlyFileHandle::open(input_path)?;
    let input_size = input_handle.size()? as usize;
    if input_size < ASTC_HEADER_SIZE {
        return Err(ContainerError::InputTooShort { len: input_size }.into());
    }

    let input_mapping = ReadOnlyMmap::new(&input_handle, 0, ASTC_HEADER_SIZE)?;
    let container = parse_astc_container(input_mapping.as_slice())?;
    Ok((container.header, input_size - ASTC_HEADER_SIZE))
}
