//! ASTC block footprints.
//!
//! Every ASTC block encodes to 16 bytes; the footprint only decides how many texels one block
//! covers, and therefore how many blocks an image needs.

use crate::mip::DimensionError;
use derive_enum_all_values::AllValues;

/// Number of bytes in one compressed ASTC block, regardless of footprint.
pub const ASTC_BLOCK_BYTES: usize = 16;

/// The texel region covered by a single compressed block.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlockFootprint {
    /// Block width in texels.
    pub x: u8,
    /// Block height in texels.
    pub y: u8,
    /// Block depth in texels. `1` for 2D textures.
    pub z: u8,
}

impl BlockFootprint {
    /// Creates a footprint, rejecting zero-sized axes.
    ///
    /// # Errors
    ///
    /// [`DimensionError::ZeroBlockDimension`] if any axis is 0.
    pub const fn new(x: u8, y: u8, z: u8) -> Result<Self, DimensionError> {
        if x == 0 || y == 0 || z == 0 {
            return Err(DimensionError::ZeroBlockDimension { x, y, z });
        }

        Ok(Self { x, y, z })
    }

    /// Creates a 2D footprint with a depth of 1.
    pub const fn new_2d(x: u8, y: u8) -> Result<Self, DimensionError> {
        Self::new(x, y, 1)
    }

    /// Fails if any axis is 0. Footprints built with struct literal syntax are not checked.
    pub const fn validate(self) -> Result<Self, DimensionError> {
        Self::new(self.x, self.y, self.z)
    }

    /// Number of texels one block covers.
    #[inline]
    pub const fn texel_count(self) -> u32 {
        self.x as u32 * self.y as u32 * self.z as u32
    }

    /// Bits per texel this footprint compresses to.
    #[inline]
    pub fn bits_per_texel(self) -> f32 {
        (ASTC_BLOCK_BYTES * 8) as f32 / self.texel_count() as f32
    }
}

impl core::fmt::Display for BlockFootprint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.z == 1 {
            write!(f, "{}x{}", self.x, self.y)
        } else {
            write!(f, "{}x{}x{}", self.x, self.y, self.z)
        }
    }
}

/// Square 2D footprints exposed as presets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AllValues)]
pub enum BlockSize {
    /// 8.00 bits per texel.
    Block4x4,
    /// 5.12 bits per texel.
    Block5x5,
    /// 3.56 bits per texel.
    #[default]
    Block6x6,
    /// 2.00 bits per texel.
    Block8x8,
    /// 1.28 bits per texel.
    Block10x10,
    /// 0.89 bits per texel.
    Block12x12,
}

impl BlockSize {
    /// Texels along each side of the block.
    pub const fn edge(self) -> u8 {
        match self {
            BlockSize::Block4x4 => 4,
            BlockSize::Block5x5 => 5,
            BlockSize::Block6x6 => 6,
            BlockSize::Block8x8 => 8,
            BlockSize::Block10x10 => 10,
            BlockSize::Block12x12 => 12,
        }
    }

    /// The 2D footprint of this preset.
    pub const fn footprint(self) -> BlockFootprint {
        BlockFootprint {
            x: self.edge(),
            y: self.edge(),
            z: 1,
        }
    }

    /// Finds the preset with `edge` texels per side.
    pub fn from_edge(edge: u8) -> Option<Self> {
        Self::all_values()
            .iter()
            .copied()
            .find(|size| size.edge() == edge)
    }
}

impl From<BlockSize> for BlockFootprint {
    fn from(size: BlockSize) -> Self {
        size.footprint()
    }
}
