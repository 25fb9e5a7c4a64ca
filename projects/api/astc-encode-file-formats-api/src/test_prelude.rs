//! Common test imports and utilities.
#![allow(unused_imports)]

pub use rstest::rstest;

use astc_encode_api::codec::{
    AstcCodec, CodecFlags, CodecStatus, ImageDescriptor, Profile, Swizzle,
};
use astc_encode_api::{compress, CodecSession, CompressedOutput, SourceTexture};
use astc_encode_common::block::BlockFootprint;
use astc_encode_common::texel::PixelFormat;

/// Codec that fills the blocks of the n-th image with `n + 1`.
pub struct FillCodec;

impl AstcCodec for FillCodec {
    type Config = ();
    type Context = u8;

    fn config_init(
        &self,
        _profile: Profile,
        _footprint: BlockFootprint,
        _quality: f32,
        _flags: CodecFlags,
    ) -> Result<(), CodecStatus> {
        Ok(())
    }

    fn context_alloc(&self, _config: &(), _thread_count: u32) -> Result<u8, CodecStatus> {
        Ok(0)
    }

    fn compress_image(
        &self,
        context: &mut u8,
        _image: &ImageDescriptor<'_>,
        _swizzle: &Swizzle,
        output: &mut [u8],
        _thread_index: u32,
    ) -> CodecStatus {
        *context += 1;
        output.fill(*context);
        CodecStatus::Success
    }

    fn compress_reset(&self, _context: &mut u8) -> CodecStatus {
        CodecStatus::Success
    }

    fn context_free(&self, _context: u8) {}
}

/// Compresses an RGBA8 texture of the given size with [`FillCodec`].
pub fn compressed_output(
    width: u32,
    height: u32,
    mip_count: u32,
    block_edge: u8,
) -> CompressedOutput {
    let footprint = BlockFootprint::new_2d(block_edge, block_edge).unwrap();
    let texel_count = (0..mip_count)
        .map(|level| (width >> level) as usize * (height >> level) as usize)
        .sum::<usize>();
    let texels = vec![0x7Fu8; texel_count * PixelFormat::Rgba8UNorm.bytes_per_texel()];
    let texture = SourceTexture::new(PixelFormat::Rgba8UNorm, width, height, mip_count, &texels);

    let codec = FillCodec;
    let mut session =
        CodecSession::new(&codec, Profile::Ldr, footprint, 60.0, CodecFlags::NONE).unwrap();
    compress(&texture, footprint, &mut session, &Swizzle::RGBA).unwrap()
}
