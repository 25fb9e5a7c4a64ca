/// Little-endian bit pattern of a half precision `1.0`.
pub const F16_ONE_BYTES: [u8; 2] = [0x00, 0x3C];

/// Little-endian bit pattern of a single precision `1.0`.
pub const F32_ONE_BYTES: [u8; 4] = [0x00, 0x00, 0x80, 0x3F];

/// The per-channel representation of canonical RGBA texels.
///
/// Selected by the source bit depth: 8-bit sources stay 8-bit unsigned normalized,
/// 16-bit sources become half floats and 32-bit sources become single precision floats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalPrecision {
    /// 8-bit unsigned normalized channels.
    U8,
    /// 16-bit IEEE half float channels.
    F16,
    /// 32-bit IEEE float channels.
    F32,
}

impl CanonicalPrecision {
    /// Precision used for sources with `bit_depth` bits per channel.
    pub const fn from_bit_depth(bit_depth: u32) -> Option<Self> {
        match bit_depth {
            8 => Some(Self::U8),
            16 => Some(Self::F16),
            32 => Some(Self::F32),
            _ => None,
        }
    }

    /// Bytes per canonical channel.
    pub const fn channel_bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::F16 => 2,
            Self::F32 => 4,
        }
    }

    /// Bytes per canonical texel (4 channels).
    #[inline]
    pub const fn stride(self) -> usize {
        self.channel_bytes() * 4
    }

    /// A texel with zeroed color and opaque alpha; the fill used for missing channels.
    pub const fn opaque_black(self) -> &'static [u8] {
        const U8_OPAQUE_BLACK: [u8; 4] = [0, 0, 0, u8::MAX];
        const F16_OPAQUE_BLACK: [u8; 8] = [0, 0, 0, 0, 0, 0, F16_ONE_BYTES[0], F16_ONE_BYTES[1]];
        const F32_OPAQUE_BLACK: [u8; 16] = [
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            0,
            F32_ONE_BYTES[0],
            F32_ONE_BYTES[1],
            F32_ONE_BYTES[2],
            F32_ONE_BYTES[3],
        ];

        match self {
            Self::U8 => &U8_OPAQUE_BLACK,
            Self::F16 => &F16_OPAQUE_BLACK,
            Self::F32 => &F32_OPAQUE_BLACK,
        }
    }
}
