pub mod inspect;
pub mod plan;

#[cfg(feature = "astcenc")]
pub mod encode;
