#![doc = include_str!(concat!("../", std::env!("CARGO_PKG_README")))]

pub mod allocate;
pub mod block;
pub mod mip;
pub mod texel;

#[cfg(test)]
pub(crate) mod test_prelude;
