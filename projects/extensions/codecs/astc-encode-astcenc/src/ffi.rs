//! Raw types and functions of the `astcenc` C API.

use astc_encode_api::codec::{Swizzle, SwizzleSelector};
use core::ffi::c_void;

/// Bytes reserved for `astcenc_config`.
///
/// `astcenc_config_init` fills the whole structure, whose size differs between library versions.
/// The storage is larger than any released layout so it can be treated as opaque.
pub const CONFIG_STORAGE_BYTES: usize = 512;

/// Opaque storage for an `astcenc_config`.
#[repr(C, align(8))]
pub struct RawConfig {
    bytes: [u8; CONFIG_STORAGE_BYTES],
}

impl RawConfig {
    /// Zeroed storage, ready to be filled by `astcenc_config_init`.
    pub const fn zeroed() -> Self {
        Self {
            bytes: [0; CONFIG_STORAGE_BYTES],
        }
    }
}

/// Opaque `astcenc_context`.
#[repr(C)]
pub struct RawContext {
    _private: [u8; 0],
}

/// `astcenc_image`: an uncompressed image passed as an array of 2D slices.
#[repr(C)]
#[derive(Debug)]
pub struct RawImage {
    pub dim_x: u32,
    pub dim_y: u32,
    pub dim_z: u32,
    /// `astcenc_type`.
    pub data_type: u32,
    /// Array of `dim_z` slice pointers.
    pub data: *mut *mut c_void,
}

/// `astcenc_swizzle`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawSwizzle {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub a: u32,
}

impl From<&Swizzle> for RawSwizzle {
    fn from(swizzle: &Swizzle) -> Self {
        let raw = |selector: SwizzleSelector| selector as u32;
        Self {
            r: raw(swizzle.r),
            g: raw(swizzle.g),
            b: raw(swizzle.b),
            a: raw(swizzle.a),
        }
    }
}

#[cfg(feature = "link")]
#[link(name = "astcenc")]
extern "C" {
    pub fn astcenc_config_init(
        profile: u32,
        block_x: u32,
        block_y: u32,
        block_z: u32,
        quality: f32,
        flags: u32,
        config: *mut RawConfig,
    ) -> u32;

    pub fn astcenc_context_alloc(
        config: *const RawConfig,
        thread_count: u32,
        context: *mut *mut RawContext,
    ) -> u32;

    pub fn astcenc_compress_image(
        context: *mut RawContext,
        image: *mut RawImage,
        swizzle: *const RawSwizzle,
        data_out: *mut u8,
        data_len: usize,
        thread_index: u32,
    ) -> u32;

    pub fn astcenc_compress_reset(context: *mut RawContext) -> u32;

    pub fn astcenc_context_free(context: *mut RawContext);
}
