//! Size-stratified buffer pool.
//!
//! This module provides the [`BufferPool`] and [`BufferPoolBuilder`] types.
//! Released buffers are kept in per-bucket stacks, each behind its own lock,
//! and handed out again to requests that map to the same bucket.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::config::PoolConfig;
use crate::error::{ConfigError, RejectReason, Rejected};
use crate::pooled::PooledBuf;

/// Builder for creating a [`BufferPool`] with custom geometry.
///
/// # Example
///
/// ```rust
/// use bytespool::BufferPoolBuilder;
///
/// let pool = BufferPoolBuilder::new()
///     .min_size(0)
///     .max_size(4096)
///     .round_to(64)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(pool.bucket_count(), 65);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BufferPoolBuilder {
    config: PoolConfig,
}

impl BufferPoolBuilder {
    /// Creates a new builder with default settings.
    ///
    /// Default settings:
    /// - Min size: 0
    /// - Max size: 64 KiB
    /// - Round to: 64 bytes
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the upper bound of the smallest size class.
    #[must_use]
    pub const fn min_size(mut self, min_size: usize) -> Self {
        self.config.min_size = min_size;
        self
    }

    /// Sets the largest buffer capacity the pool will retain.
    ///
    /// Requests above this size are never served from the pool, and larger
    /// buffers are refused by [`BufferPool::put`].
    #[must_use]
    pub const fn max_size(mut self, max_size: usize) -> Self {
        self.config.max_size = max_size;
        self
    }

    /// Sets the width of each bucket above `min_size`.
    #[must_use]
    pub const fn round_to(mut self, round_to: usize) -> Self {
        self.config.round_to = round_to;
        self
    }

    /// Builds the buffer pool with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid. Nothing is
    /// allocated in that case, and the builder's values can be corrected and
    /// built again.
    pub fn build(self) -> Result<BufferPool, ConfigError> {
        BufferPool::with_config(self.config)
    }
}

/// A thread-safe pool of reusable byte buffers grouped by capacity.
///
/// Every bucket is an independent stack guarded by its own lock, so callers
/// working on different size classes never contend with each other.
/// Cloning the pool is cheap and the clones share storage.
///
/// # Example
///
/// ```rust
/// use bytespool::BufferPool;
///
/// # fn main() -> Result<(), bytespool::ConfigError> {
/// let pool = BufferPool::new(0, 4096, 64)?;
///
/// let buf = pool.get(100, true).expect("allocation allowed");
/// assert_eq!(buf.len(), 100);
/// assert!(pool.put(buf).is_ok());
///
/// // Served from the bucket this time
/// let buf = pool.get(100, false).expect("recycled");
/// assert_eq!(buf.len(), 100);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

impl BufferPool {
    /// Creates a pool for the given geometry.
    ///
    /// Equivalent to `BufferPool::with_config(PoolConfig::new(min_size, max_size, round_to))`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `max_size <= min_size`, `round_to == 0`,
    /// or the geometry needs more than [`MAX_BUCKETS`](crate::MAX_BUCKETS) buckets.
    pub fn new(min_size: usize, max_size: usize, round_to: usize) -> Result<Self, ConfigError> {
        Self::with_config(PoolConfig::new(min_size, max_size, round_to))
    }

    /// Creates a pool from a [`PoolConfig`].
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] produced by [`PoolConfig::validate`].
    pub fn with_config(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let buckets: Box<[Bucket]> = (0..config.bucket_count())
            .map(|_| Bucket::default())
            .collect();
        debug!(
            min_size = config.min_size,
            max_size = config.max_size,
            round_to = config.round_to,
            buckets = buckets.len(),
            "buffer pool initialized"
        );

        Ok(Self {
            inner: Arc::new(PoolInner {
                config,
                buckets,
                stats: Counters::default(),
            }),
        })
    }

    /// Returns a buffer whose length is exactly `size`.
    ///
    /// - `size == 0` always yields an empty buffer without touching any bucket.
    /// - Sizes above `max_size` are never served from the pool; a fresh
    ///   buffer is allocated if `allocate_if_missing` is set.
    /// - Otherwise a recycled buffer from the matching bucket is preferred.
    ///   Its capacity may exceed `size`, and its contents are unspecified.
    ///   When the bucket is empty a new buffer is allocated if
    ///   `allocate_if_missing` is set.
    ///
    /// Returns `None` only on a miss with `allocate_if_missing == false`.
    #[must_use]
    pub fn get(&self, size: usize, allocate_if_missing: bool) -> Option<Vec<u8>> {
        if size == 0 {
            return Some(Vec::new());
        }

        let inner = &*self.inner;
        let config = &inner.config;
        if size > config.max_size {
            inner.stats.misses.fetch_add(1, Ordering::Relaxed);
            if !allocate_if_missing {
                return None;
            }
            inner.stats.allocations.fetch_add(1, Ordering::Relaxed);
            return Some(vec![0; size]);
        }

        let index = config.index_of(size);
        if let Some(mut buf) = inner.buckets[index].pop() {
            inner.stats.hits.fetch_add(1, Ordering::Relaxed);
            if buf.capacity() < size {
                // Regrow to exactly the bucket's capacity, never past max_size
                buf.clear();
                buf.reserve_exact(config.alloc_capacity(index));
            }
            buf.resize(size, 0);
            return Some(buf);
        }

        inner.stats.misses.fetch_add(1, Ordering::Relaxed);
        if !allocate_if_missing {
            return None;
        }

        inner.stats.allocations.fetch_add(1, Ordering::Relaxed);
        let mut buf = Vec::with_capacity(config.alloc_capacity(index));
        buf.resize(size, 0);
        Some(buf)
    }

    /// Returns a buffer of length `size` that goes back to the pool on drop.
    ///
    /// Always allocates on a miss.
    #[must_use]
    pub fn get_pooled(&self, size: usize) -> PooledBuf {
        let buf = self.get(size, true).unwrap_or_default();
        PooledBuf::new(buf, self.clone())
    }

    /// Hands a buffer back to the pool.
    ///
    /// The buffer is filed under the bucket of its *capacity*; its current
    /// length is irrelevant.
    ///
    /// # Errors
    ///
    /// Returns [`Rejected`], which carries the buffer back, if the buffer has
    /// no capacity or its capacity exceeds `max_size`. Pool state is left
    /// untouched in either case.
    pub fn put(&self, buf: Vec<u8>) -> Result<(), Rejected> {
        let inner = &*self.inner;
        let capacity = buf.capacity();

        let reason = if capacity == 0 {
            Some(RejectReason::Empty)
        } else if capacity > inner.config.max_size {
            Some(RejectReason::Oversized {
                capacity,
                max_size: inner.config.max_size,
            })
        } else {
            None
        };
        if let Some(reason) = reason {
            trace!(capacity, %reason, "buffer rejected");
            inner.stats.rejections.fetch_add(1, Ordering::Relaxed);
            return Err(Rejected::new(reason, buf));
        }

        let index = inner.config.index_of(capacity);
        inner.buckets[index].push(buf);
        inner.stats.returns.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Returns the pool's configuration.
    #[must_use]
    pub fn config(&self) -> PoolConfig {
        self.inner.config
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.inner.buckets.len()
    }

    /// Returns the inclusive capacity range of bucket `index`, or `None` if
    /// the pool has no such bucket.
    #[must_use]
    pub fn bucket_range(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.bucket_count()).then(|| self.inner.config.range_of(index))
    }

    /// Returns the number of retained buffers in each bucket.
    #[must_use]
    pub fn free_counts(&self) -> Vec<usize> {
        self.inner.buckets.iter().map(Bucket::len).collect()
    }

    /// Returns a snapshot of the pool's counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let stats = &self.inner.stats;
        PoolStats {
            retained: self.inner.buckets.iter().map(Bucket::len).sum(),
            hits: stats.hits.load(Ordering::Relaxed),
            misses: stats.misses.load(Ordering::Relaxed),
            allocations: stats.allocations.load(Ordering::Relaxed),
            returns: stats.returns.load(Ordering::Relaxed),
            rejections: stats.rejections.load(Ordering::Relaxed),
        }
    }

    /// Drops every retained buffer and returns how many were released.
    pub fn clear(&self) -> usize {
        let released: usize = self.inner.buckets.iter().map(Bucket::drain).sum();
        trace!(released, "buffer pool cleared");
        released
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("config", &self.inner.config)
            .field("buckets", &self.inner.buckets.len())
            .finish_non_exhaustive()
    }
}

/// Shared pool state.
struct PoolInner {
    /// Geometry fixed at build time.
    config: PoolConfig,

    /// One stack per bucket, indexed by bucket number.
    buckets: Box<[Bucket]>,

    /// Lifetime counters.
    stats: Counters,
}

/// A single size class.
#[derive(Default)]
struct Bucket {
    free: Mutex<Vec<Vec<u8>>>,
}

impl Bucket {
    #[inline]
    fn pop(&self) -> Option<Vec<u8>> {
        self.free.lock().pop()
    }

    #[inline]
    fn push(&self, buf: Vec<u8>) {
        self.free.lock().push(buf);
    }

    fn len(&self) -> usize {
        self.free.lock().len()
    }

    fn drain(&self) -> usize {
        // Swap out under the lock, free outside it
        let drained = std::mem::take(&mut *self.free.lock());
        drained.len()
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicUsize,
    misses: AtomicUsize,
    allocations: AtomicUsize,
    returns: AtomicUsize,
    rejections: AtomicUsize,
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Buffers currently held in buckets.
    pub retained: usize,
    /// Requests served from a bucket.
    pub hits: usize,
    /// Non-empty requests that found nothing to recycle.
    pub misses: usize,
    /// Fresh buffers allocated on a miss.
    pub allocations: usize,
    /// Buffers accepted by `put`.
    pub returns: usize,
    /// Buffers refused by `put`.
    pub rejections: usize,
}

impl PoolStats {
    /// Fraction of non-empty requests served from the pool (0.0 to 1.0).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
