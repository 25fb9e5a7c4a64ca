//! Scoped ownership of a codec context.

use crate::codec::{AstcCodec, CodecFlags, CodecStatus, ImageDescriptor, Profile, Swizzle};
use crate::error::{AstcEncodeError, AstcEncodeResult};
use astc_encode_common::block::BlockFootprint;
use tracing::{debug, warn};

/// Worker threads a session is allocated for. Mips are compressed one after another.
pub const SESSION_THREAD_COUNT: u32 = 1;

/// Index of the only worker thread of a session.
pub const SESSION_THREAD_INDEX: u32 = 0;

/// A codec context configured for one footprint, freed when the session is dropped.
///
/// Sessions are single-threaded and are borrowed mutably for the duration of a
/// [`compress`](crate::compress::compress) call.
pub struct CodecSession<'a, C: AstcCodec> {
    codec: &'a C,
    context: Option<C::Context>,
    footprint: BlockFootprint,
    profile: Profile,
    flags: CodecFlags,
}

impl<'a, C: AstcCodec> CodecSession<'a, C> {
    /// Configures `codec` and allocates a single-threaded context.
    ///
    /// # Errors
    ///
    /// - [`AstcEncodeError::CodecConfig`] if the codec rejects the configuration
    /// - [`AstcEncodeError::CodecContext`] if the context could not be allocated
    pub fn new(
        codec: &'a C,
        profile: Profile,
        footprint: BlockFootprint,
        quality: f32,
        flags: CodecFlags,
    ) -> AstcEncodeResult<Self> {
        let config = codec
            .config_init(profile, footprint, quality, flags)
            .map_err(|status| {
                warn!(%status, %footprint, ?profile, quality, "codec configuration failed");
                AstcEncodeError::CodecConfig(status)
            })?;

        let context = codec
            .context_alloc(&config, SESSION_THREAD_COUNT)
            .map_err(|status| {
                warn!(%status, "codec context allocation failed");
                AstcEncodeError::CodecContext(status)
            })?;

        debug!(%footprint, ?profile, quality, flags = flags.bits(), "codec session created");
        Ok(Self {
            codec,
            context: Some(context),
            footprint,
            profile,
            flags,
        })
    }

    /// Footprint the context was configured with.
    #[inline]
    pub fn footprint(&self) -> BlockFootprint {
        self.footprint
    }

    /// Profile the context was configured with.
    #[inline]
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Flags the context was configured with.
    #[inline]
    pub fn flags(&self) -> CodecFlags {
        self.flags
    }

    /// Compresses one image on the session's only thread.
    pub fn compress_image(
        &mut self,
        image: &ImageDescriptor<'_>,
        swizzle: &Swizzle,
        output: &mut [u8],
    ) -> CodecStatus {
        match self.context.as_mut() {
            Some(context) => {
                self.codec
                    .compress_image(context, image, swizzle, output, SESSION_THREAD_INDEX)
            }
            None => CodecStatus::BadContext,
        }
    }

    /// Resets the context so the next image can be compressed.
    pub fn reset(&mut self) -> CodecStatus {
        match self.context.as_mut() {
            Some(context) => self.codec.compress_reset(context),
            None => CodecStatus::BadContext,
        }
    }
}

impl<C: AstcCodec> Drop for CodecSession<'_, C> {
    fn drop(&mut self) {
        if let Some(context) = self.context.take() {
            self.codec.context_free(context);
        }
    }
}
