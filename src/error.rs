//! Error types reported by the pool.

use thiserror::Error;

/// Reasons a pool configuration is refused at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `max_size` must be strictly greater than `min_size`.
    #[error("invalid size range: max_size {max_size} must exceed min_size {min_size}")]
    InvalidRange {
        /// Configured minimum size.
        min_size: usize,
        /// Configured maximum size.
        max_size: usize,
    },

    /// The rounding granularity must be at least one byte.
    #[error("round_to must be at least 1")]
    ZeroRoundTo,

    /// The configuration would need an unreasonable number of buckets.
    #[error("configuration needs {buckets} buckets (limit {limit})")]
    TooManyBuckets {
        /// Buckets the configuration would need.
        buckets: usize,
        /// Largest supported bucket count.
        limit: usize,
    },
}

/// Why [`BufferPool::put`](crate::BufferPool::put) refused a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// The buffer has no capacity to retain.
    #[error("buffer has zero capacity")]
    Empty,

    /// The buffer is larger than anything the pool retains.
    #[error("buffer capacity {capacity} exceeds pool max_size {max_size}")]
    Oversized {
        /// Capacity of the refused buffer.
        capacity: usize,
        /// The pool's configured maximum size.
        max_size: usize,
    },
}

/// A buffer the pool declined to retain.
///
/// The buffer is handed back so the caller can reuse or drop it.
#[derive(Debug, Error)]
#[error("buffer rejected: {reason}")]
pub struct Rejected {
    reason: RejectReason,
    buf: Vec<u8>,
}

impl Rejected {
    pub(crate) const fn new(reason: RejectReason, buf: Vec<u8>) -> Self {
        Self { reason, buf }
    }

    /// Returns why the buffer was refused.
    #[must_use]
    pub const fn reason(&self) -> RejectReason {
        self.reason
    }

    /// Recovers the refused buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}
