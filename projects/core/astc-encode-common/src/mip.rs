//! Mip chain sizing.
//!
//! Level `n` of a chain with base size `W × H` is `floor(W / 2^n) × floor(H / 2^n)` texels.
//! Each level compresses to `blocks_x × blocks_y` blocks of [`ASTC_BLOCK_BYTES`], where the block
//! count along an axis is `ceil(dimension / block_dimension)` with a minimum of 1.
//!
//! Source texels and compressed blocks of consecutive levels are packed back to back, so the
//! offsets of a level are the sums of every smaller level index.

use crate::block::{BlockFootprint, ASTC_BLOCK_BYTES};
use thiserror::Error;

/// Invalid texture or block dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// Width or height is zero.
    #[error("Texture dimensions must be non-zero, got {width}x{height}")]
    ZeroExtent { width: u32, height: u32 },

    /// The chain has no levels.
    #[error("Mip count must be at least 1")]
    ZeroMipCount,

    /// A block footprint axis is zero.
    #[error("Block footprint must be non-zero, got {x}x{y}x{z}")]
    ZeroBlockDimension { x: u8, y: u8, z: u8 },

    /// A mip level shrinks to zero texels along one axis.
    #[error("Mip level {level} of a {width}x{height} texture has no texels")]
    EmptyMipLevel { level: u32, width: u32, height: u32 },

    /// Sizes do not fit in `usize`.
    #[error("Mip chain size overflows the address space")]
    Overflow,
}

/// Number of blocks of `block_dimension` texels needed to cover `dimension` texels.
///
/// Always at least 1, so images smaller than a block still produce one block.
///
/// # Examples
///
/// ```
/// use astc_encode_common::mip::block_count;
///
/// assert_eq!(block_count(16, 4), 4);
/// assert_eq!(block_count(17, 4), 5);
/// assert_eq!(block_count(2, 6), 1);
/// ```
#[inline]
pub const fn block_count(dimension: u32, block_dimension: u8) -> u32 {
    let blocks = dimension.div_ceil(block_dimension as u32);
    if blocks == 0 {
        1
    } else {
        blocks
    }
}

/// Size of `base` at mip `level`, `floor(base / 2^level)`.
#[inline]
pub const fn mip_dimension(base: u32, level: u32) -> u32 {
    match base.checked_shr(level) {
        Some(dimension) => dimension,
        None => 0,
    }
}

/// One level of a [`MipChain`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MipLevel {
    /// Level index, `0` being the base image.
    pub level: u32,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Horizontal block count.
    pub blocks_x: u32,
    /// Vertical block count.
    pub blocks_y: u32,
    /// Index of this level's first texel in the packed source texels.
    pub texel_offset: usize,
    /// Offset of this level's first block in the packed compressed output.
    pub byte_offset: usize,
}

impl MipLevel {
    /// Number of texels in this level.
    #[inline]
    pub const fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of blocks in this level.
    #[inline]
    pub const fn block_count(&self) -> usize {
        self.blocks_x as usize * self.blocks_y as usize
    }

    /// Compressed size of this level in bytes.
    #[inline]
    pub const fn byte_len(&self) -> usize {
        self.block_count() * ASTC_BLOCK_BYTES
    }
}

/// Sizes and offsets of every level of a 2D texture's mip chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipChain {
    footprint: BlockFootprint,
    levels: Vec<MipLevel>,
    total_texels: usize,
    total_bytes: usize,
}

impl MipChain {
    /// Computes the layout of a `width × height` texture with `mip_count` levels.
    ///
    /// # Errors
    ///
    /// - [`DimensionError::ZeroExtent`] if `width` or `height` is 0
    /// - [`DimensionError::ZeroMipCount`] if `mip_count` is 0
    /// - [`DimensionError::ZeroBlockDimension`] if `footprint` has a zero axis
    /// - [`DimensionError::EmptyMipLevel`] if a level would be 0 texels wide or tall
    /// - [`DimensionError::Overflow`] if the sizes do not fit in `usize`
    ///
    /// # Examples
    ///
    /// ```
    /// use astc_encode_common::block::BlockFootprint;
    /// use astc_encode_common::mip::MipChain;
    ///
    /// let chain = MipChain::new(8, 8, 2, BlockFootprint::new_2d(4, 4)?)?;
    /// assert_eq!(chain.total_bytes(), 2 * 2 * 16 + 16);
    /// assert_eq!(chain.levels()[1].byte_offset, 64);
    /// # Ok::<(), astc_encode_common::mip::DimensionError>(())
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        mip_count: u32,
        footprint: BlockFootprint,
    ) -> Result<Self, DimensionError> {
        if width == 0 || height == 0 {
            return Err(DimensionError::ZeroExtent { width, height });
        }

        if mip_count == 0 {
            return Err(DimensionError::ZeroMipCount);
        }

        let footprint = footprint.validate()?;
        let mut levels = Vec::with_capacity(mip_count as usize);
        let mut texel_offset = 0usize;
        let mut byte_offset = 0usize;

        for level in 0..mip_count {
            let mip_width = mip_dimension(width, level);
            let mip_height = mip_dimension(height, level);
            if mip_width == 0 || mip_height == 0 {
                return Err(DimensionError::EmptyMipLevel {
                    level,
                    width,
                    height,
                });
            }

            let mip = MipLevel {
                level,
                width: mip_width,
                height: mip_height,
                blocks_x: block_count(mip_width, footprint.x),
                blocks_y: block_count(mip_height, footprint.y),
                texel_offset,
                byte_offset,
            };

            texel_offset = (mip_width as usize)
                .checked_mul(mip_height as usize)
                .and_then(|texels| texel_offset.checked_add(texels))
                .ok_or(DimensionError::Overflow)?;
            byte_offset = mip
                .block_count()
                .checked_mul(ASTC_BLOCK_BYTES)
                .and_then(|bytes| byte_offset.checked_add(bytes))
                .ok_or(DimensionError::Overflow)?;
            levels.push(mip);
        }

        Ok(Self {
            footprint,
            levels,
            total_texels: texel_offset,
            total_bytes: byte_offset,
        })
    }

    /// Number of mip levels that fit a `width × height` texture before a level reaches 0 texels.
    pub fn max_mip_count(width: u32, height: u32) -> u32 {
        match width.min(height) {
            0 => 0,
            smallest => u32::BITS - smallest.leading_zeros(),
        }
    }

    /// Block footprint the chain was sized for.
    #[inline]
    pub fn footprint(&self) -> BlockFootprint {
        self.footprint
    }

    /// Every level in ascending order.
    #[inline]
    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    /// The base level.
    #[inline]
    pub fn base(&self) -> &MipLevel {
        // `new` rejects chains without levels.
        &self.levels[0]
    }

    /// Number of levels.
    #[inline]
    pub fn mip_count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Texels across every level.
    #[inline]
    pub fn total_texels(&self) -> usize {
        self.total_texels
    }

    /// Compressed bytes across every level.
    #[inline]
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}
