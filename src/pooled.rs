//! Buffer guard that returns to the pool on drop.
//!
//! [`PooledBuf`] wraps a `Vec<u8>` obtained from [`BufferPool::get_pooled`]
//! and hands it back through [`BufferPool::put`] when dropped.

use std::ops::{Deref, DerefMut};

use crate::pool::BufferPool;

/// A buffer borrowed from a [`BufferPool`].
///
/// Dereferences to the underlying `Vec<u8>`. Growing it past the pool's
/// `max_size` is allowed; such a buffer is simply freed on drop instead of
/// being retained.
///
/// # Example
///
/// ```rust
/// use bytespool::BufferPool;
///
/// # fn main() -> Result<(), bytespool::ConfigError> {
/// let pool = BufferPool::new(0, 4096, 64)?;
/// {
///     let mut buf = pool.get_pooled(512);
///     buf[0] = 42;
///     assert_eq!(buf.len(), 512);
/// }
/// // Returned on drop
/// assert_eq!(pool.stats().retained, 1);
/// # Ok(())
/// # }
/// ```
pub struct PooledBuf {
    /// Left empty once the buffer has been detached.
    buf: Vec<u8>,

    /// Pool the buffer goes back to.
    pool: BufferPool,
}

impl PooledBuf {
    pub(crate) const fn new(buf: Vec<u8>, pool: BufferPool) -> Self {
        Self { buf, pool }
    }

    /// Detaches the buffer so it is not returned to the pool.
    #[must_use]
    pub fn into_inner(mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Returns the buffer as a byte slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the buffer as a mutable byte slice.
    #[inline]
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl Drop for PooledBuf {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        if buf.capacity() > 0 {
            // Refused buffers are freed here
            let _ = self.pool.put(buf);
        }
    }
}

impl Deref for PooledBuf {
    type Target = Vec<u8>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl AsRef<[u8]> for PooledBuf {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsMut<[u8]> for PooledBuf {
    #[inline]
    fn as_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl std::fmt::Debug for PooledBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuf")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish_non_exhaustive()
    }
}
