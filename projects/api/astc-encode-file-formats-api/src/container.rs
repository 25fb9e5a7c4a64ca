//! File-ready `.astc` byte sequences: a header followed by the compressed blocks.

use crate::error::{ContainerError, ContainerResult};
use crate::header::{
    decode_header, encode_header, AstcHeader, DecodedHeader, ImageExtent, ASTC_HEADER_SIZE,
};
use astc_encode_api::CompressedOutput;
use astc_encode_common::mip::MipChain;
use tracing::trace;

/// Length of a container holding `payload_len` bytes of blocks.
#[inline]
pub const fn container_len(payload_len: usize) -> usize {
    ASTC_HEADER_SIZE + payload_len
}

/// Header describing `output`: its footprint and the extent of level 0, with a depth of 1.
pub fn header_for_output(output: &CompressedOutput) -> ContainerResult<AstcHeader> {
    Ok(AstcHeader::new(
        output.footprint(),
        ImageExtent::new_2d(output.width(), output.height()),
    )?)
}

/// Writes `header` followed by `payload` into `output`.
///
/// # Errors
///
/// [`ContainerError::OutputLengthMismatch`] unless `output` is exactly
/// [`container_len`]`(payload.len())` bytes long.
pub fn write_container(
    header: &AstcHeader,
    payload: &[u8],
    output: &mut [u8],
) -> ContainerResult<()> {
    let required = container_len(payload.len());
    if output.len() != required {
        return Err(ContainerError::OutputLengthMismatch {
            required,
            actual: output.len(),
        });
    }

    let (header_bytes, payload_bytes) = output.split_at_mut(ASTC_HEADER_SIZE);
    header_bytes.copy_from_slice(&encode_header(header));
    payload_bytes.copy_from_slice(payload);
    Ok(())
}

/// Builds the `.astc` file contents for `output`.
///
/// # Errors
///
/// - [`ContainerError::Header`] if the texture is too large for the header
/// - [`ContainerError::UseAfterRelease`] if `output` was released
pub fn encode_to_astc(output: &CompressedOutput) -> ContainerResult<Vec<u8>> {
    let header = header_for_output(output)?;
    let payload = output.as_slice()?;

    let mut bytes = vec![0u8; container_len(payload.len())];
    write_container(&header, payload, &mut bytes)?;
    Ok(bytes)
}

/// A parsed container, borrowing its payload from the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AstcContainer<'a> {
    pub header: DecodedHeader,
    pub payload: &'a [u8],
}

/// Splits `data` into its header and payload.
///
/// A magic mismatch is not an error here; check [`DecodedHeader::magic_valid`].
///
/// # Errors
///
/// [`ContainerError::InputTooShort`] if `data` is shorter than [`ASTC_HEADER_SIZE`].
pub fn parse_astc_container(data: &[u8]) -> ContainerResult<AstcContainer<'_>> {
    let Some((header_bytes, payload)) = data.split_first_chunk::<ASTC_HEADER_SIZE>() else {
        return Err(ContainerError::InputTooShort { len: data.len() });
    };

    let header = decode_header(header_bytes);
    if !header.magic_valid {
        trace!(len = data.len(), "input does not start with the .astc magic");
    }

    Ok(AstcContainer { header, payload })
}

/// Finds the number of mip levels whose blocks add up to `payload_len` bytes.
///
/// Only 2D images are considered. Returns `None` when no mip count matches.
pub fn infer_mip_count(header: &AstcHeader, payload_len: usize) -> Option<u32> {
    let extent = header.extent();
    if extent.depth != 1 || header.block().z != 1 {
        return None;
    }

    let max = MipChain::max_mip_count(extent.width, extent.height);
    (1..=max).find(|&mip_count| {
        MipChain::new(extent.width, extent.height, mip_count, header.block())
            .is_ok_and(|chain| chain.total_bytes() == payload_len)
    })
}
