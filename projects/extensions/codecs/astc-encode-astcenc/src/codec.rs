//! [`AstcCodec`] over the linked `astcenc` library.

use crate::ffi::{self, RawConfig, RawContext, RawImage, RawSwizzle};
use astc_encode_api::codec::{
    AstcCodec, CodecFlags, CodecStatus, ImageDescriptor, Profile, Swizzle,
};
use astc_encode_common::block::BlockFootprint;
use core::ffi::c_void;
use core::ptr::{self, NonNull};
use tracing::trace;

/// The `astcenc` library.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstcencCodec;

/// A configuration filled by `astcenc_config_init`.
pub struct AstcencConfig(Box<RawConfig>);

/// A context allocated by `astcenc_context_alloc`.
pub struct AstcencContext(NonNull<RawContext>);

impl AstcCodec for AstcencCodec {
    type Config = AstcencConfig;
    type Context = AstcencContext;

    fn config_init(
        &self,
        profile: Profile,
        footprint: BlockFootprint,
        quality: f32,
        flags: CodecFlags,
    ) -> Result<Self::Config, CodecStatus> {
        let mut config = Box::new(RawConfig::zeroed());

        // SAFETY: `config` points to storage larger than any `astcenc_config`.
        let status = unsafe {
            ffi::astcenc_config_init(
                profile as u32,
                footprint.x as u32,
                footprint.y as u32,
                footprint.z as u32,
                quality,
                flags.bits(),
                &mut *config,
            )
        };

        trace!(%footprint, ?profile, quality, raw_status = status, "astcenc_config_init");
        CodecStatus::from_raw(status).into_result()?;
        Ok(AstcencConfig(config))
    }

    fn context_alloc(
        &self,
        config: &Self::Config,
        thread_count: u32,
    ) -> Result<Self::Context, CodecStatus> {
        let mut context: *mut RawContext = ptr::null_mut();

        // SAFETY: `config` was filled by `astcenc_config_init`.
        let status =
            unsafe { ffi::astcenc_context_alloc(&*config.0, thread_count, &mut context) };

        trace!(thread_count, raw_status = status, "astcenc_context_alloc");
        CodecStatus::from_raw(status).into_result()?;
        NonNull::new(context)
            .map(AstcencContext)
            .ok_or(CodecStatus::OutOfMemory)
    }

    fn compress_image(
        &self,
        context: &mut Self::Context,
        image: &ImageDescriptor<'_>,
        swizzle: &Swizzle,
        output: &mut [u8],
        thread_index: u32,
    ) -> CodecStatus {
        let slice_len = image.slice_len();
        if image.depth != 1 || image.texels.len() < slice_len {
            return CodecStatus::BadParam;
        }

        // astcenc only reads the slices while compressing.
        let mut slices = [image.texels.as_ptr() as *mut c_void];
        let mut raw_image = RawImage {
            dim_x: image.width,
            dim_y: image.height,
            dim_z: image.depth,
            data_type: image.data_type as u32,
            data: slices.as_mut_ptr(),
        };
        let raw_swizzle = RawSwizzle::from(swizzle);

        // SAFETY: the context is live, the slice holds `slice_len` texels of `data_type` and
        // `output` is writable for its whole length.
        let status = unsafe {
            ffi::astcenc_compress_image(
                context.0.as_ptr(),
                &mut raw_image,
                &raw_swizzle,
                output.as_mut_ptr(),
                output.len(),
                thread_index,
            )
        };

        trace!(
            width = image.width,
            height = image.height,
            output_len = output.len(),
            raw_status = status,
            "astcenc_compress_image"
        );
        CodecStatus::from_raw(status)
    }

    fn compress_reset(&self, context: &mut Self::Context) -> CodecStatus {
        // SAFETY: the context is live and no thread is inside `astcenc_compress_image`.
        CodecStatus::from_raw(unsafe { ffi::astcenc_compress_reset(context.0.as_ptr()) })
    }

    fn context_free(&self, context: Self::Context) {
        // SAFETY: the context is consumed, so it is freed exactly once.
        unsafe { ffi::astcenc_context_free(context.0.as_ptr()) };
    }
}
