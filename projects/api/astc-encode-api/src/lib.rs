#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]

pub mod codec;
pub mod compress;
pub mod error;
pub mod session;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_prelude;

// Re-export key types
pub use codec::{AstcCodec, CodecFlags, CodecStatus, ImageDescriptor, Profile, Swizzle};
pub use compress::{compress, compress_texture, CompressedOutput, SourceTexture};
pub use error::{AstcEncodeError, AstcEncodeResult};
pub use session::CodecSession;
pub use settings::{CompressOptions, CompressQuality, TextureKind};
