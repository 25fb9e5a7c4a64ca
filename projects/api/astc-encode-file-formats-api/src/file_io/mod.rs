//! Reading and writing `.astc` files.
//!
//! Files are accessed through memory maps provided by `lightweight-mmap`.

mod error;
pub use error::*;

#[cfg(feature = "lightweight-mmap")]
mod lightweight_mmap_impl;

// Public API lives in there.
#[cfg(feature = "lightweight-mmap")]
pub use lightweight_mmap_impl::*;

#[cfg(not(feature = "lightweight-mmap"))]
compile_error!("The 'lightweight-mmap' feature must be enabled for file I/O operations.");
