//! Compression settings and their derivation from the source pixel format.

use crate::codec::{CodecFlags, Profile, Swizzle};
use astc_encode_common::block::BlockSize;
use astc_encode_common::texel::PixelFormat;
use derive_enum_all_values::AllValues;

/// What the texture is used for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AllValues)]
pub enum TextureKind {
    /// Color data.
    #[default]
    Color,
    /// Tangent space normal map with X in red and Y in green.
    NormalMap,
}

/// Search effort presets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, AllValues)]
pub enum CompressQuality {
    Fastest,
    #[default]
    Fast,
    Medium,
    Thorough,
    VeryThorough,
    Exhaustive,
}

impl CompressQuality {
    /// Effort value passed to the codec, in `[0, 100]`.
    pub const fn effort(self) -> f32 {
        match self {
            CompressQuality::Fastest => 0.0,
            CompressQuality::Fast => 10.0,
            CompressQuality::Medium => 60.0,
            CompressQuality::Thorough => 98.0,
            CompressQuality::VeryThorough => 99.0,
            CompressQuality::Exhaustive => 100.0,
        }
    }
}

/// Options for [`compress_texture`](crate::compress::compress_texture).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CompressOptions {
    pub kind: TextureKind,
    pub block_size: BlockSize,
    pub quality: CompressQuality,
}

impl CompressOptions {
    /// Defaults for producing standalone `.astc` files, which favour quality over speed.
    pub fn for_container() -> Self {
        Self {
            quality: CompressQuality::Medium,
            ..Self::default()
        }
    }
}

/// Color space of the compressed texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AstcColorSpace {
    /// Linear LDR.
    UNorm,
    /// sRGB encoded LDR.
    Srgb,
    /// Unsigned HDR.
    UFloat,
}

/// Codec profile for `format`.
///
/// sRGB formats use the sRGB LDR profile, the other integer formats use linear LDR and float
/// formats use HDR.
pub const fn profile_for(format: PixelFormat) -> Profile {
    if format.is_srgb() {
        Profile::LdrSrgb
    } else if format.is_float() {
        Profile::Hdr
    } else {
        Profile::Ldr
    }
}

/// Codec flags for `format` used as `kind`.
///
/// Normal maps enable normal map error metrics. Formats with alpha weight color errors by alpha.
pub fn flags_for(format: PixelFormat, kind: TextureKind) -> CodecFlags {
    let mut flags = CodecFlags::NONE;
    flags.set_map_normal(kind == TextureKind::NormalMap);
    flags.set_use_alpha_weight(format.has_alpha());
    flags
}

/// Component swizzle for `format` used as `kind`.
///
/// Normal maps take precedence over the BGR channel order.
pub const fn swizzle_for(format: PixelFormat, kind: TextureKind) -> Swizzle {
    match kind {
        TextureKind::NormalMap => Swizzle::GGGR,
        TextureKind::Color if format.is_bgr() => Swizzle::BGRA,
        TextureKind::Color => Swizzle::RGBA,
    }
}

/// Color space a texture of `format` has once compressed.
pub const fn target_color_space(format: PixelFormat) -> AstcColorSpace {
    if format.is_srgb() {
        AstcColorSpace::Srgb
    } else if format.is_float() {
        AstcColorSpace::UFloat
    } else {
        AstcColorSpace::UNorm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(CompressQuality::Fastest, 0.0)]
    #[case(CompressQuality::Fast, 10.0)]
    #[case(CompressQuality::Medium, 60.0)]
    #[case(CompressQuality::Thorough, 98.0)]
    #[case(CompressQuality::VeryThorough, 99.0)]
    #[case(CompressQuality::Exhaustive, 100.0)]
    fn quality_effort(#[case] quality: CompressQuality, #[case] effort: f32) {
        assert_eq!(quality.effort(), effort);
    }

    #[rstest]
    #[case(PixelFormat::R8UNorm, Profile::Ldr, AstcColorSpace::UNorm)]
    #[case(PixelFormat::Rgba8Srgb, Profile::LdrSrgb, AstcColorSpace::Srgb)]
    #[case(PixelFormat::Bgr8Srgb, Profile::LdrSrgb, AstcColorSpace::Srgb)]
    #[case(PixelFormat::Bgra8UNorm, Profile::Ldr, AstcColorSpace::UNorm)]
    #[case(PixelFormat::Rgba16UNorm, Profile::Ldr, AstcColorSpace::UNorm)]
    #[case(PixelFormat::Rg16SFloat, Profile::Hdr, AstcColorSpace::UFloat)]
    #[case(PixelFormat::Rgba32SFloat, Profile::Hdr, AstcColorSpace::UFloat)]
    fn profile_and_color_space(
        #[case] format: PixelFormat,
        #[case] profile: Profile,
        #[case] color_space: AstcColorSpace,
    ) {
        assert_eq!(profile_for(format), profile);
        assert_eq!(target_color_space(format), color_space);
    }

    #[test]
    fn alpha_weight_only_for_four_channel_formats() {
        for format in PixelFormat::all_values().iter().copied() {
            let flags = flags_for(format, TextureKind::Color);
            assert_eq!(flags.use_alpha_weight(), format.channel_count() == 4, "{format:?}");
            assert!(!flags.map_normal());
        }
    }

    #[test]
    fn normal_maps_set_map_normal() {
        let flags = flags_for(PixelFormat::Rgb8UNorm, TextureKind::NormalMap);
        assert!(flags.map_normal());
        assert!(!flags.use_alpha_weight());
        assert_eq!(flags.bits(), 1);
    }

    #[rstest]
    #[case(PixelFormat::Rgba8UNorm, TextureKind::Color, Swizzle::RGBA)]
    #[case(PixelFormat::Bgr8UNorm, TextureKind::Color, Swizzle::BGRA)]
    #[case(PixelFormat::Bgra8Srgb, TextureKind::Color, Swizzle::BGRA)]
    #[case(PixelFormat::Bgra8Srgb, TextureKind::NormalMap, Swizzle::GGGR)]
    #[case(PixelFormat::Rg16UNorm, TextureKind::NormalMap, Swizzle::GGGR)]
    fn swizzle_selection(
        #[case] format: PixelFormat,
        #[case] kind: TextureKind,
        #[case] expected: Swizzle,
    ) {
        assert_eq!(swizzle_for(format, kind), expected);
    }

    #[test]
    fn defaults() {
        let options = CompressOptions::default();
        assert_eq!(options.kind, TextureKind::Color);
        assert_eq!(options.block_size, BlockSize::Block6x6);
        assert_eq!(options.quality, CompressQuality::Fast);
        assert_eq!(CompressOptions::for_container().quality, CompressQuality::Medium);
    }
}
