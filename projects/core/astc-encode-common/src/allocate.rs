//! Aligned allocations and the move-only [`ForeignBuffer`] guard.
//!
//! Texel staging buffers and compressed output live outside of regular [`Vec`] storage so they
//! can be handed to an external codec with a 64-byte alignment guarantee. Every such region is
//! owned by exactly one [`ForeignBuffer`] at a time.
//!
//! ## Useful APIs
//!
//! [`allocate_align_64`]: Allocates uninitialized memory aligned to 64-bytes.
//! [`ForeignBuffer::new`]: Allocates a zeroed, owned region with exactly-once release.
//! [`live_foreign_bytes`]: Bytes currently held by foreign buffers on the calling thread.
//!
//! ## Safety
//!
//! All allocation operations are wrapped in safe APIs. Memory held by a [`ForeignBuffer`] is
//! released by [`ForeignBuffer::release`] or when the buffer is dropped, whichever comes first.
//! Accessing a released buffer returns [`UseAfterRelease`] instead of touching freed memory.

use core::alloc::{Layout, LayoutError};
use core::cell::Cell;
use core::{ptr, slice};
use safe_allocator_api::prelude::*;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

thread_local! {
    static LIVE_FOREIGN_BYTES: Cell<usize> = const { Cell::new(0) };
}

/// Returns the number of bytes held by live [`ForeignBuffer`]s on the calling thread.
///
/// Buffers add their length when allocated and subtract it when released. A buffer released on
/// a different thread than the one that allocated it is subtracted from the releasing thread.
pub fn live_foreign_bytes() -> usize {
    LIVE_FOREIGN_BYTES.with(Cell::get)
}

fn track_allocated(num_bytes: usize) {
    LIVE_FOREIGN_BYTES.with(|live| live.set(live.get().saturating_add(num_bytes)));
}

fn track_released(num_bytes: usize) {
    LIVE_FOREIGN_BYTES.with(|live| live.set(live.get().saturating_sub(num_bytes)));
}

/// Allocates data with an alignment of 64 bytes.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate
///
/// # Returns
///
/// A [`RawAlloc`] containing the allocated data
pub fn allocate_align_64(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    if num_bytes == 0 {
        return Err(AllocateError::ZeroLength);
    }

    let layout = Layout::from_size_align(num_bytes, 64)?;
    Ok(RawAlloc::new(layout)?)
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `num_bytes` in `allocate_align_64` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),

    /// A zero byte allocation was requested.
    #[error("Cannot allocate a buffer of zero bytes.")]
    ZeroLength,
}

/// A [`ForeignBuffer`] was accessed after [`ForeignBuffer::release`] was called on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Foreign buffer was accessed after it was released.")]
pub struct UseAfterRelease;

/// An owned, 64-byte aligned memory region with exactly-once release semantics.
///
/// The buffer is move-only; passing it by value transfers the right to release it.
/// Release happens on the first call to [`ForeignBuffer::release`] or on drop. After release
/// the buffer reports a length of zero and every accessor returns [`UseAfterRelease`].
#[derive(Debug)]
pub struct ForeignBuffer {
    allocation: Option<RawAlloc>,
    len: usize,
}

impl ForeignBuffer {
    /// Allocates a zeroed buffer of `num_bytes`, aligned to 64 bytes.
    ///
    /// # Parameters
    ///
    /// - `num_bytes`: The number of bytes to allocate. Must be non-zero.
    ///
    /// # Errors
    ///
    /// - [`AllocateError::ZeroLength`] if `num_bytes` is 0
    /// - [`AllocateError::LayoutError`] if `num_bytes` exceeds [`isize::MAX`]
    /// - [`AllocateError::AllocationFailed`] if the allocator returned no memory
    ///
    /// # Examples
    ///
    /// ```
    /// use astc_encode_common::allocate::ForeignBuffer;
    ///
    /// let mut buffer = ForeignBuffer::new(256)?;
    /// assert_eq!(buffer.len(), 256);
    /// assert!(buffer.as_slice()?.iter().all(|&b| b == 0));
    ///
    /// buffer.release();
    /// assert!(buffer.as_slice().is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(num_bytes: usize) -> Result<Self, AllocateError> {
        let mut allocation = allocate_align_64(num_bytes)?;

        // Safety: `allocation` spans exactly `num_bytes` writable bytes.
        unsafe { ptr::write_bytes(allocation.as_mut_ptr(), 0, num_bytes) };

        track_allocated(num_bytes);
        Ok(Self {
            allocation: Some(allocation),
            len: num_bytes,
        })
    }

    /// Length of the buffer in bytes. Zero once released.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no bytes, which is only the case after release.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` once [`ForeignBuffer::release`] has run.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.allocation.is_none()
    }

    /// Fails with [`UseAfterRelease`] if the buffer has been released.
    #[inline]
    pub fn access_guard(&self) -> Result<(), UseAfterRelease> {
        match self.allocation {
            Some(_) => Ok(()),
            None => Err(UseAfterRelease),
        }
    }

    /// Views the buffer contents.
    pub fn as_slice(&self) -> Result<&[u8], UseAfterRelease> {
        let allocation = self.allocation.as_ref().ok_or(UseAfterRelease)?;

        // Safety: the allocation is live, zero-initialized on creation and `len` bytes long.
        Ok(unsafe { slice::from_raw_parts(allocation.as_ptr(), self.len) })
    }

    /// Views the buffer contents mutably.
    pub fn as_mut_slice(&mut self) -> Result<&mut [u8], UseAfterRelease> {
        let len = self.len;
        let allocation = self.allocation.as_mut().ok_or(UseAfterRelease)?;

        // Safety: the allocation is live, zero-initialized on creation and `len` bytes long.
        //         `&mut self` guarantees the returned slice is the only view.
        Ok(unsafe { slice::from_raw_parts_mut(allocation.as_mut_ptr(), len) })
    }

    /// Raw pointer to the start of the buffer, for handing to foreign code.
    ///
    /// The pointer is valid for [`ForeignBuffer::len`] bytes until the buffer is released.
    pub fn as_mut_ptr(&mut self) -> Result<*mut u8, UseAfterRelease> {
        let allocation = self.allocation.as_mut().ok_or(UseAfterRelease)?;
        Ok(allocation.as_mut_ptr())
    }

    /// Frees the underlying region. Calling this more than once is a no-op.
    pub fn release(&mut self) {
        if let Some(allocation) = self.allocation.take() {
            track_released(self.len);
            drop(allocation);
        }
        self.len = 0;
    }

    /// Hands the underlying allocation and its length to a new owner.
    ///
    /// The allocation stops counting towards [`live_foreign_bytes`].
    pub fn into_raw_alloc(mut self) -> Result<(RawAlloc, usize), UseAfterRelease> {
        let allocation = self.allocation.take().ok_or(UseAfterRelease)?;
        let len = core::mem::take(&mut self.len);
        track_released(len);
        Ok((allocation, len))
    }
}

impl Drop for ForeignBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_prelude::*;

    #[rstest]
    #[case(1)]
    #[case(16)]
    #[case(4096)]
    fn new_buffer_is_zeroed_and_aligned(#[case] num_bytes: usize) {
        let mut buffer = ForeignBuffer::new(num_bytes).unwrap();
        assert_eq!(buffer.len(), num_bytes);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.as_mut_ptr().unwrap() as usize % 64, 0);
        assert!(buffer.as_slice().unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_length_is_rejected() {
        assert_eq!(
            ForeignBuffer::new(0).unwrap_err(),
            AllocateError::ZeroLength
        );
    }

    #[test]
    fn release_is_idempotent() {
        let baseline = live_foreign_bytes();
        let mut buffer = ForeignBuffer::new(128).unwrap();
        assert_eq!(live_foreign_bytes(), baseline + 128);

        buffer.release();
        assert_eq!(live_foreign_bytes(), baseline);
        assert_eq!(buffer.len(), 0);
        assert!(buffer.is_released());

        buffer.release();
        assert_eq!(live_foreign_bytes(), baseline);
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn access_after_release_fails() {
        let mut buffer = ForeignBuffer::new(32).unwrap();
        assert!(buffer.access_guard().is_ok());
        buffer.release();

        assert_eq!(buffer.access_guard(), Err(UseAfterRelease));
        assert_eq!(buffer.as_slice().unwrap_err(), UseAfterRelease);
        assert_eq!(buffer.as_mut_slice().unwrap_err(), UseAfterRelease);
        assert_eq!(buffer.as_mut_ptr().unwrap_err(), UseAfterRelease);
    }

    #[test]
    fn drop_releases_memory() {
        let baseline = live_foreign_bytes();
        {
            let _buffer = ForeignBuffer::new(512).unwrap();
            assert_eq!(live_foreign_bytes(), baseline + 512);
        }
        assert_eq!(live_foreign_bytes(), baseline);
    }

    #[test]
    fn moved_buffer_is_released_once_by_new_owner() {
        let baseline = live_foreign_bytes();
        let buffer = ForeignBuffer::new(64).unwrap();
        let mut owner = vec![buffer];
        assert_eq!(live_foreign_bytes(), baseline + 64);

        owner[0].as_mut_slice().unwrap()[63] = 0xAB;
        assert_eq!(owner[0].as_slice().unwrap()[63], 0xAB);

        drop(owner);
        assert_eq!(live_foreign_bytes(), baseline);
    }

    #[test]
    fn into_raw_alloc_transfers_ownership() {
        let baseline = live_foreign_bytes();
        let buffer = ForeignBuffer::new(96).unwrap();
        let (allocation, len) = buffer.into_raw_alloc().unwrap();
        assert_eq!(len, 96);
        assert_eq!(live_foreign_bytes(), baseline);
        drop(allocation);
        assert_eq!(live_foreign_bytes(), baseline);
    }
}
