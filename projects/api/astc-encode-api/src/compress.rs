//! Mip chain compression.

use crate::codec::{AstcCodec, ImageDescriptor, Swizzle};
use crate::error::{AstcEncodeError, AstcEncodeResult};
use crate::session::CodecSession;
use crate::settings::{flags_for, profile_for, swizzle_for, CompressOptions};
use astc_encode_common::allocate::{ForeignBuffer, UseAfterRelease};
use astc_encode_common::block::BlockFootprint;
use astc_encode_common::mip::{DimensionError, MipChain, MipLevel};
use astc_encode_common::texel::{normalize, PixelFormat};
use tracing::{debug, info, warn};

/// Uncompressed texels of a texture and every one of its mip levels.
///
/// Texels are row-major, level 0 first, each level immediately following the previous one.
#[derive(Debug, Clone, Copy)]
pub struct SourceTexture<'a> {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    pub texels: &'a [u8],
}

impl<'a> SourceTexture<'a> {
    pub fn new(
        format: PixelFormat,
        width: u32,
        height: u32,
        mip_count: u32,
        texels: &'a [u8],
    ) -> Self {
        Self {
            format,
            width,
            height,
            mip_count,
            texels,
        }
    }

    /// Creates a texture from a numeric pixel format id.
    ///
    /// # Errors
    ///
    /// [`AstcEncodeError::UnsupportedPixelFormat`] if `format_id` names no supported format.
    pub fn from_format_id(
        format_id: u32,
        width: u32,
        height: u32,
        mip_count: u32,
        texels: &'a [u8],
    ) -> AstcEncodeResult<Self> {
        let format = PixelFormat::from_id(format_id)?;
        Ok(Self::new(format, width, height, mip_count, texels))
    }

    /// Lays out the mip chain of this texture for `footprint`, validating the dimensions and
    /// that the texels cover every level.
    ///
    /// # Errors
    ///
    /// - [`AstcEncodeError::InvalidDimensions`] for zero sizes or levels that vanish
    /// - [`AstcEncodeError::InsufficientTexelData`] if `texels` is shorter than the chain
    pub fn mip_chain(&self, footprint: BlockFootprint) -> AstcEncodeResult<MipChain> {
        let chain = MipChain::new(self.width, self.height, self.mip_count, footprint)?;
        let required = chain
            .total_texels()
            .checked_mul(self.format.bytes_per_texel())
            .ok_or(AstcEncodeError::InvalidDimensions(DimensionError::Overflow))?;

        if self.texels.len() < required {
            return Err(AstcEncodeError::InsufficientTexelData {
                required,
                actual: self.texels.len(),
            });
        }

        Ok(chain)
    }

    /// Source texels of one level.
    fn level_texels(&self, mip: &MipLevel) -> &'a [u8] {
        let texel_bytes = self.format.bytes_per_texel();
        let start = mip.texel_offset * texel_bytes;
        &self.texels[start..start + mip.texel_count() * texel_bytes]
    }
}

/// Compressed blocks of every mip level, level 0 first.
///
/// Owns the buffer the blocks were written to. Dropping the output releases it.
#[derive(Debug)]
pub struct CompressedOutput {
    buffer: ForeignBuffer,
    footprint: BlockFootprint,
    width: u32,
    height: u32,
    mip_count: u32,
}

impl CompressedOutput {
    /// Total length of the compressed blocks. Zero once released.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The compressed blocks.
    pub fn as_slice(&self) -> Result<&[u8], UseAfterRelease> {
        self.buffer.as_slice()
    }

    /// Footprint the blocks were compressed with.
    #[inline]
    pub fn footprint(&self) -> BlockFootprint {
        self.footprint
    }

    /// Width of level 0.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of level 0.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn mip_count(&self) -> u32 {
        self.mip_count
    }

    /// Releases the compressed blocks early. Calling this more than once is a no-op.
    pub fn release(&mut self) {
        self.buffer.release();
    }

    /// Takes ownership of the underlying buffer.
    pub fn into_buffer(self) -> ForeignBuffer {
        self.buffer
    }
}

/// Compresses every mip level of `texture` with an existing codec session.
///
/// Levels are compressed in ascending order on a single thread. Each level is normalized into a
/// staging buffer that is released right after the codec returns, and the codec is reset
/// between levels.
///
/// # Parameters
///
/// - `texture`: The texels to compress
/// - `footprint`: Block footprint, which must match the session's
/// - `session`: The codec session, borrowed for the whole operation
/// - `swizzle`: Component swizzle applied by the codec
///
/// # Returns
///
/// The compressed blocks of every level, sized `sum(blocks_x × blocks_y × 16)`.
///
/// # Errors
///
/// - [`AstcEncodeError::InvalidDimensions`] / [`AstcEncodeError::InsufficientTexelData`]
///   before anything is allocated
/// - [`AstcEncodeError::FootprintMismatch`] if `footprint` differs from the session's
/// - [`AstcEncodeError::CodecCompress`] with the failing level if the codec fails
/// - [`AstcEncodeError::CodecReset`] if the codec fails to reset after a level
/// - [`AstcEncodeError::AllocationFailed`] if a buffer could not be allocated
///
/// On error, every buffer allocated by this call has been released.
pub fn compress<C: AstcCodec>(
    texture: &SourceTexture<'_>,
    footprint: BlockFootprint,
    session: &mut CodecSession<'_, C>,
    swizzle: &Swizzle,
) -> AstcEncodeResult<CompressedOutput> {
    let chain = texture.mip_chain(footprint)?;
    if session.footprint() != footprint {
        return Err(AstcEncodeError::FootprintMismatch {
            requested: footprint,
            session: session.footprint(),
        });
    }

    let mut output = ForeignBuffer::new(chain.total_bytes())?;
    debug!(
        format = ?texture.format,
        width = texture.width,
        height = texture.height,
        mip_count = texture.mip_count,
        %footprint,
        total_bytes = chain.total_bytes(),
        "compressing mip chain"
    );

    for mip in chain.levels() {
        if let Err(error) = compress_level(texture, mip, session, swizzle, &mut output) {
            warn!(%error, mip = mip.level, "mip chain compression aborted");
            output.release();
            return Err(error);
        }
    }

    Ok(CompressedOutput {
        buffer: output,
        footprint,
        width: texture.width,
        height: texture.height,
        mip_count: texture.mip_count,
    })
}

fn compress_level<C: AstcCodec>(
    texture: &SourceTexture<'_>,
    mip: &MipLevel,
    session: &mut CodecSession<'_, C>,
    swizzle: &Swizzle,
    output: &mut ForeignBuffer,
) -> AstcEncodeResult<()> {
    debug!(
        mip = mip.level,
        width = mip.width,
        height = mip.height,
        byte_offset = mip.byte_offset,
        byte_len = mip.byte_len(),
        "compressing mip"
    );

    let mut staging = normalize(texture.format, texture.level_texels(mip))?;
    let status = {
        let image = ImageDescriptor::new_2d(
            mip.width,
            mip.height,
            texture.format.precision(),
            staging.as_slice()?,
        );
        let blocks = &mut output.as_mut_slice()?[mip.byte_offset..][..mip.byte_len()];
        session.compress_image(&image, swizzle, blocks)
    };

    staging.release();
    let reset = session.reset();

    if !status.is_success() {
        return Err(AstcEncodeError::CodecCompress {
            status,
            mip: mip.level,
        });
    }

    if !reset.is_success() {
        return Err(AstcEncodeError::CodecReset {
            status: reset,
            mip: mip.level,
        });
    }

    Ok(())
}

/// Compresses `texture` with settings derived from its format and `options`.
///
/// Creates a single-threaded [`CodecSession`] for the call, picking the profile, flags and
/// swizzle from [`profile_for`], [`flags_for`] and [`swizzle_for`]. The session is freed on
/// every path.
///
/// # Errors
///
/// - [`AstcEncodeError::CodecConfig`] / [`AstcEncodeError::CodecContext`] if the session could
///   not be created
/// - Any error listed on [`compress`]
pub fn compress_texture<C: AstcCodec>(
    codec: &C,
    texture: &SourceTexture<'_>,
    options: &CompressOptions,
) -> AstcEncodeResult<CompressedOutput> {
    let footprint = options.block_size.footprint();
    texture.mip_chain(footprint)?;

    let mut session = CodecSession::new(
        codec,
        profile_for(texture.format),
        footprint,
        options.quality.effort(),
        flags_for(texture.format, options.kind),
    )?;

    let output = compress(
        texture,
        footprint,
        &mut session,
        &swizzle_for(texture.format, options.kind),
    )?;

    info!(
        format = ?texture.format,
        width = texture.width,
        height = texture.height,
        mip_count = texture.mip_count,
        bytes = output.len(),
        "texture compressed"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecDataType, CodecFlags, CodecStatus, Profile};
    use crate::test_prelude::*;
    use astc_encode_common::allocate::live_foreign_bytes;

    fn session(codec: &MockCodec) -> CodecSession<'_, MockCodec> {
        CodecSession::new(codec, Profile::Ldr, footprint_4x4(), 60.0, CodecFlags::NONE).unwrap()
    }

    #[test]
    fn single_mip_16x16_rgba8_is_256_bytes() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba8UNorm, 16 * 16);
        let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, 16, 16, 1, &texels);

        let output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();
        assert_eq!(output.len(), 256);
        assert_eq!(output.mip_count(), 1);
        assert_eq!(output.as_slice().unwrap(), &mock_blocks(0, 16)[..]);
    }

    #[test]
    fn two_mip_8x8_is_80_bytes_in_level_order() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba8UNorm, 64 + 16);
        let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, 8, 8, 2, &texels);

        let output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();
        let bytes = output.as_slice().unwrap();

        assert_eq!(bytes.len(), 80);
        assert_eq!(&bytes[..64], &mock_blocks(0, 4)[..]);
        assert_eq!(&bytes[64..], &mock_blocks(1, 1)[..]);
    }

    #[test]
    fn every_level_is_compressed_then_reset() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgb8UNorm, 64 + 16 + 4);
        let texture = SourceTexture::new(PixelFormat::Rgb8UNorm, 8, 8, 3, &texels);
        let _output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();

        assert_eq!(
            codec.calls()[2..8],
            [
                Call::Compress { width: 8, height: 8, output_len: 64, thread_index: 0 },
                Call::Reset,
                Call::Compress { width: 4, height: 4, output_len: 16, thread_index: 0 },
                Call::Reset,
                Call::Compress { width: 2, height: 2, output_len: 16, thread_index: 0 },
                Call::Reset,
            ]
        );
    }

    #[test]
    fn codec_receives_canonical_texels_of_each_level() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rg16UNorm, 16 + 4);
        let texture = SourceTexture::new(PixelFormat::Rg16UNorm, 4, 4, 2, &texels);
        let _output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();

        let images = codec.images();
        assert_eq!(images.len(), 2);
        let level1 = normalize(PixelFormat::Rg16UNorm, &texels[16 * 4..]).unwrap();
        assert_eq!(images[1].data_type, CodecDataType::F16);
        assert_eq!(images[1].texels, level1.as_slice().unwrap());
    }

    #[rstest]
    #[case(4, 0)]
    #[case(4, 1)]
    #[case(4, 3)]
    fn failure_at_mip_k_reports_k_and_leaks_nothing(#[case] mip_count: u32, #[case] k: u32) {
        let codec = MockCodec::new().fail_compress_at(k, CodecStatus::BadParam);
        let texels = sample_texels(PixelFormat::Rgba16SFloat, 256 + 64 + 16 + 4);
        let texture = SourceTexture::new(PixelFormat::Rgba16SFloat, 16, 16, mip_count, &texels);

        let baseline = live_foreign_bytes();
        let result = compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA);

        assert_eq!(
            result.unwrap_err(),
            AstcEncodeError::CodecCompress {
                status: CodecStatus::BadParam,
                mip: k
            }
        );
        assert_eq!(live_foreign_bytes(), baseline);
        assert_eq!(codec.compress_calls(), k as usize + 1);
        // The failed level is still reset before the session is freed.
        assert!(codec.calls().ends_with(&[Call::Reset, Call::ContextFree]));
    }

    #[test]
    fn staging_buffers_are_released_per_level() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba32SFloat, 64 + 16);
        let texture = SourceTexture::new(PixelFormat::Rgba32SFloat, 8, 8, 2, &texels);

        let baseline = live_foreign_bytes();
        let output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();
        assert_eq!(live_foreign_bytes(), baseline + output.len());

        drop(output);
        assert_eq!(live_foreign_bytes(), baseline);
    }

    #[test]
    fn reset_failure_is_reported_with_level() {
        let codec = MockCodec::new().fail_reset_at(1, CodecStatus::BadContext);
        let texels = sample_texels(PixelFormat::R8UNorm, 64 + 16);
        let texture = SourceTexture::new(PixelFormat::R8UNorm, 8, 8, 2, &texels);

        let baseline = live_foreign_bytes();
        let result = compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA);
        assert_eq!(
            result.unwrap_err(),
            AstcEncodeError::CodecReset {
                status: CodecStatus::BadContext,
                mip: 1
            }
        );
        assert_eq!(live_foreign_bytes(), baseline);
    }

    #[rstest]
    #[case(0, 16, 1, DimensionError::ZeroExtent { width: 0, height: 16 })]
    #[case(16, 0, 1, DimensionError::ZeroExtent { width: 16, height: 0 })]
    #[case(16, 16, 0, DimensionError::ZeroMipCount)]
    #[case(16, 16, 6, DimensionError::EmptyMipLevel { level: 5, width: 16, height: 16 })]
    fn invalid_dimensions_are_rejected_before_codec_calls(
        #[case] width: u32,
        #[case] height: u32,
        #[case] mip_count: u32,
        #[case] expected: DimensionError,
    ) {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba8UNorm, 1024);
        let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, width, height, mip_count, &texels);

        let baseline = live_foreign_bytes();
        let result = compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA);

        assert_eq!(result.unwrap_err(), AstcEncodeError::InvalidDimensions(expected));
        assert_eq!(codec.compress_calls(), 0);
        assert_eq!(live_foreign_bytes(), baseline);
    }

    #[test]
    fn short_texel_data_is_rejected() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba8UNorm, 64);
        let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, 8, 8, 2, &texels);

        assert_eq!(
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap_err(),
            AstcEncodeError::InsufficientTexelData {
                required: 80 * 4,
                actual: 64 * 4
            }
        );
        assert_eq!(codec.compress_calls(), 0);
    }

    #[test]
    fn footprint_must_match_session() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba8UNorm, 64);
        let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, 8, 8, 1, &texels);
        let footprint_6x6 = BlockFootprint::new_2d(6, 6).unwrap();

        assert_eq!(
            compress(&texture, footprint_6x6, &mut session(&codec), &Swizzle::RGBA).unwrap_err(),
            AstcEncodeError::FootprintMismatch {
                requested: footprint_6x6,
                session: footprint_4x4()
            }
        );
    }

    #[test]
    fn images_smaller_than_a_block_produce_one_block() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba8UNorm, 2 * 3);
        let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, 2, 3, 1, &texels);

        let output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();
        assert_eq!(output.len(), 16);
    }

    #[test]
    fn unknown_format_id_is_rejected() {
        assert_eq!(
            SourceTexture::from_format_id(77, 4, 4, 1, &[]).unwrap_err(),
            AstcEncodeError::UnsupportedPixelFormat(77)
        );
    }

    #[test]
    fn release_and_into_buffer() {
        let codec = MockCodec::new();
        let texels = sample_texels(PixelFormat::Rgba8UNorm, 16);
        let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, 4, 4, 1, &texels);

        let mut output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();
        output.release();
        output.release();
        assert!(output.is_empty());
        assert_eq!(output.as_slice().unwrap_err(), UseAfterRelease);

        let output =
            compress(&texture, footprint_4x4(), &mut session(&codec), &Swizzle::RGBA).unwrap();
        let buffer = output.into_buffer();
        assert_eq!(buffer.len(), 16);
    }
}
