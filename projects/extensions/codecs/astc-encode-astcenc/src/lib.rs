#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]

pub mod ffi;

#[cfg(feature = "link")]
mod codec;
#[cfg(feature = "link")]
pub use codec::{AstcencCodec, AstcencConfig, AstcencContext};
