//! The 16-byte `.astc` header.
//!
//! ```text
//! offset  size  field
//! 0       4     magic, u32 little endian
//! 4       1     block x
//! 5       1     block y
//! 6       1     block z
//! 7       3     image x, u24 little endian
//! 10      3     image y, u24 little endian
//! 13      3     image z, u24 little endian
//! ```
//!
//! The layout is packed by hand byte by byte, so it does not depend on struct layout or the
//! endianness of the host.

use crate::error::HeaderError;
use astc_encode_common::block::BlockFootprint;
use core::fmt;
use endian_writer::{EndianReader, EndianWriter, LittleEndianReader, LittleEndianWriter};

/// Size of the header in bytes.
pub const ASTC_HEADER_SIZE: usize = 16;

/// Magic at the start of every `.astc` file.
pub const ASTC_MAGIC: u32 = 0x5CA1AB13;

/// Largest extent a header can store along one axis.
pub const MAX_IMAGE_EXTENT: u32 = (1 << 24) - 1;

const BLOCK_OFFSET: usize = 4;
const EXTENT_OFFSET: usize = 7;
const EXTENT_BYTES: usize = 3;

/// Image size in texels along each axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ImageExtent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl ImageExtent {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// A 2D extent, with a depth of 1.
    pub const fn new_2d(width: u32, height: u32) -> Self {
        Self::new(width, height, 1)
    }
}

impl fmt::Display for ImageExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// A header with a valid footprint and an extent that fits in 24 bits per axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AstcHeader {
    block: BlockFootprint,
    extent: ImageExtent,
}

impl AstcHeader {
    /// Creates a header.
    ///
    /// # Errors
    ///
    /// - [`HeaderError::InvalidFootprint`] if any block dimension is zero
    /// - [`HeaderError::ExtentTooLarge`] if any extent exceeds [`MAX_IMAGE_EXTENT`]
    pub fn new(block: BlockFootprint, extent: ImageExtent) -> Result<Self, HeaderError> {
        let block = block.validate()?;
        for value in [extent.width, extent.height, extent.depth] {
            if value > MAX_IMAGE_EXTENT {
                return Err(HeaderError::ExtentTooLarge { extent, value });
            }
        }

        Ok(Self { block, extent })
    }

    #[inline]
    pub fn block(&self) -> BlockFootprint {
        self.block
    }

    #[inline]
    pub fn extent(&self) -> ImageExtent {
        self.extent
    }

    /// Packs the header into its 16-byte form.
    pub fn encode(&self) -> [u8; ASTC_HEADER_SIZE] {
        encode_header(self)
    }
}

/// Fields read back from a header, whether or not the magic matched.
///
/// The footprint is returned as stored, so it may contain zeros when the input is not an
/// `.astc` header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DecodedHeader {
    /// Whether bytes 0..4 hold [`ASTC_MAGIC`].
    pub magic_valid: bool,
    pub block: BlockFootprint,
    pub extent: ImageExtent,
}

impl DecodedHeader {
    /// Validates the decoded fields.
    ///
    /// # Errors
    ///
    /// - [`HeaderError::InvalidMagic`] if the magic did not match
    /// - [`HeaderError::InvalidFootprint`] if any block dimension is zero
    pub fn into_header(self) -> Result<AstcHeader, HeaderError> {
        if !self.magic_valid {
            return Err(HeaderError::InvalidMagic);
        }

        AstcHeader::new(self.block, self.extent)
    }
}

/// Packs `header` into 16 bytes.
pub fn encode_header(header: &AstcHeader) -> [u8; ASTC_HEADER_SIZE] {
    let mut bytes = [0u8; ASTC_HEADER_SIZE];

    // SAFETY: `bytes` is 16 bytes long, the magic occupies bytes 0..4.
    unsafe {
        let mut writer = LittleEndianWriter::new(bytes.as_mut_ptr());
        writer.write_u32_at(ASTC_MAGIC, 0);
    }

    bytes[BLOCK_OFFSET] = header.block.x;
    bytes[BLOCK_OFFSET + 1] = header.block.y;
    bytes[BLOCK_OFFSET + 2] = header.block.z;

    let extent = header.extent;
    for (axis, value) in [extent.width, extent.height, extent.depth]
        .into_iter()
        .enumerate()
    {
        let offset = EXTENT_OFFSET + axis * EXTENT_BYTES;
        bytes[offset..offset + EXTENT_BYTES].copy_from_slice(&value.to_le_bytes()[..EXTENT_BYTES]);
    }

    bytes
}

/// Unpacks a 16-byte header. Never fails: a wrong magic only clears
/// [`DecodedHeader::magic_valid`].
pub fn decode_header(bytes: &[u8; ASTC_HEADER_SIZE]) -> DecodedHeader {
    // SAFETY: `bytes` is 16 bytes long, the magic occupies bytes 0..4.
    let magic = unsafe {
        let mut reader = LittleEndianReader::new(bytes.as_ptr());
        reader.read_u32_at(0)
    };

    let read_extent = |axis: usize| {
        let offset = EXTENT_OFFSET + axis * EXTENT_BYTES;
        u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], 0])
    };

    DecodedHeader {
        magic_valid: magic == ASTC_MAGIC,
        block: BlockFootprint {
            x: bytes[BLOCK_OFFSET],
            y: bytes[BLOCK_OFFSET + 1],
            z: bytes[BLOCK_OFFSET + 2],
        },
        extent: ImageExtent::new(read_extent(0), read_extent(1), read_extent(2)),
    }
}
