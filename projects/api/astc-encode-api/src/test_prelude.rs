//! Common test imports and utilities.
#![allow(unused_imports)]

pub use crate::codec::*;
pub use astc_encode_common::block::BlockFootprint;
pub use astc_encode_common::texel::{CanonicalPrecision, PixelFormat};
pub use rstest::rstest;

use astc_encode_common::block::ASTC_BLOCK_BYTES;
use astc_encode_common::mip::block_count;
use core::cell::{Cell, RefCell};

/// A codec call recorded by [`MockCodec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ConfigInit,
    ContextAlloc { thread_count: u32 },
    Compress {
        width: u32,
        height: u32,
        output_len: usize,
        thread_index: u32,
    },
    Reset,
    ContextFree,
}

/// An image as seen by [`MockCodec::compress_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedImage {
    pub width: u32,
    pub height: u32,
    pub data_type: CodecDataType,
    pub swizzle: Swizzle,
    pub texels: Vec<u8>,
}

/// Configuration handed out by [`MockCodec`].
pub struct MockConfig {
    footprint: BlockFootprint,
}

/// Context handed out by [`MockCodec`].
pub struct MockContext {
    footprint: BlockFootprint,
}

/// Codec that records calls and writes [`mock_blocks`] instead of compressing.
///
/// The n-th compressed image (0 based) is filled with `mock_blocks(n, blocks)`.
#[derive(Default)]
pub struct MockCodec {
    calls: RefCell<Vec<Call>>,
    images: RefCell<Vec<RecordedImage>>,
    live_contexts: Cell<i32>,
    compressed: Cell<u32>,
    resets: Cell<u32>,
    fail_config: Option<CodecStatus>,
    fail_context: Option<CodecStatus>,
    fail_compress: Option<(u32, CodecStatus)>,
    fail_reset: Option<(u32, CodecStatus)>,
}

impl MockCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_config(mut self, status: CodecStatus) -> Self {
        self.fail_config = Some(status);
        self
    }

    pub fn fail_context(mut self, status: CodecStatus) -> Self {
        self.fail_context = Some(status);
        self
    }

    /// Fails the `index`-th compress call.
    pub fn fail_compress_at(mut self, index: u32, status: CodecStatus) -> Self {
        self.fail_compress = Some((index, status));
        self
    }

    /// Fails the `index`-th reset call.
    pub fn fail_reset_at(mut self, index: u32, status: CodecStatus) -> Self {
        self.fail_reset = Some((index, status));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn images(&self) -> Vec<RecordedImage> {
        self.images.borrow().clone()
    }

    pub fn compress_calls(&self) -> usize {
        self.compressed.get() as usize
    }

    /// Contexts allocated and not yet freed.
    pub fn live_contexts(&self) -> i32 {
        self.live_contexts.get()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl AstcCodec for MockCodec {
    type Config = MockConfig;
    type Context = MockContext;

    fn config_init(
        &self,
        _profile: Profile,
        footprint: BlockFootprint,
        quality: f32,
        _flags: CodecFlags,
    ) -> Result<Self::Config, CodecStatus> {
        self.record(Call::ConfigInit);
        if let Some(status) = self.fail_config {
            return Err(status);
        }

        if !(0.0..=100.0).contains(&quality) {
            return Err(CodecStatus::BadQuality);
        }

        Ok(MockConfig { footprint })
    }

    fn context_alloc(
        &self,
        config: &Self::Config,
        thread_count: u32,
    ) -> Result<Self::Context, CodecStatus> {
        self.record(Call::ContextAlloc { thread_count });
        if let Some(status) = self.fail_context {
            return Err(status);
        }

        self.live_contexts.set(self.live_contexts.get() + 1);
        Ok(MockContext {
            footprint: config.footprint,
        })
    }

    fn compress_image(
        &self,
        context: &mut Self::Context,
        image: &ImageDescriptor<'_>,
        swizzle: &Swizzle,
        output: &mut [u8],
        thread_index: u32,
    ) -> CodecStatus {
        self.record(Call::Compress {
            width: image.width,
            height: image.height,
            output_len: output.len(),
            thread_index,
        });
        self.images.borrow_mut().push(RecordedImage {
            width: image.width,
            height: image.height,
            data_type: image.data_type,
            swizzle: *swizzle,
            texels: image.texels.to_vec(),
        });

        let index = self.compressed.get();
        self.compressed.set(index + 1);
        if let Some((fail_index, status)) = self.fail_compress {
            if fail_index == index {
                return status;
            }
        }

        let blocks = block_count(image.width, context.footprint.x) as usize
            * block_count(image.height, context.footprint.y) as usize;
        if output.len() != blocks * ASTC_BLOCK_BYTES || image.texels.len() != image.slice_len() {
            return CodecStatus::BadParam;
        }

        output.copy_from_slice(&mock_blocks(index, blocks));
        CodecStatus::Success
    }

    fn compress_reset(&self, _context: &mut Self::Context) -> CodecStatus {
        self.record(Call::Reset);
        let index = self.resets.get();
        self.resets.set(index + 1);
        match self.fail_reset {
            Some((fail_index, status)) if fail_index == index => status,
            _ => CodecStatus::Success,
        }
    }

    fn context_free(&self, _context: Self::Context) {
        self.record(Call::ContextFree);
        self.live_contexts.set(self.live_contexts.get() - 1);
    }
}

/// Bytes [`MockCodec`] writes for its `image`-th image of `blocks` blocks.
pub fn mock_blocks(image: u32, blocks: usize) -> Vec<u8> {
    (0..blocks * ASTC_BLOCK_BYTES)
        .map(|x| (x as u8).wrapping_mul(7) ^ (image as u8).wrapping_add(0xA5))
        .collect()
}

/// A 4x4 footprint.
pub fn footprint_4x4() -> BlockFootprint {
    BlockFootprint::new_2d(4, 4).unwrap()
}

/// Deterministic, non-uniform source texels of `format`.
pub fn sample_texels(format: PixelFormat, texel_count: usize) -> Vec<u8> {
    (0..texel_count * format.bytes_per_texel())
        .map(|x| (x.wrapping_mul(37) ^ (x >> 3)) as u8)
        .collect()
}
