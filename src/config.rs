//! Pool geometry configuration.

use crate::error::ConfigError;
use crate::index::{index_to_range, size_to_index};

/// Largest number of buckets a pool may be built with.
pub const MAX_BUCKETS: usize = 1 << 24;

/// Default upper bound for retained buffers (64 KiB).
pub const DEFAULT_MAX_SIZE: usize = 64 * 1024;

/// Default bucket granularity.
pub const DEFAULT_ROUND_TO: usize = 64;

/// Size-class geometry of a [`BufferPool`](crate::BufferPool).
///
/// A config is a plain value; it is checked by [`validate`](Self::validate)
/// when a pool is built and never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound of bucket 0.
    pub min_size: usize,
    /// Largest buffer capacity the pool retains.
    pub max_size: usize,
    /// Width of every bucket above `min_size`.
    pub round_to: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
            round_to: DEFAULT_ROUND_TO,
        }
    }
}

impl PoolConfig {
    /// Creates a config from its three parameters without validating it.
    #[must_use]
    pub const fn new(min_size: usize, max_size: usize, round_to: usize) -> Self {
        Self {
            min_size,
            max_size,
            round_to,
        }
    }

    /// Checks the parameter combination.
    ///
    /// Besides the range and granularity checks, geometries needing more than
    /// [`MAX_BUCKETS`] buckets are refused even though their parameters are
    /// otherwise consistent, e.g. `(0, 1 << 24, 1)`. Every bucket is allocated
    /// up front, so such a pool would cost hundreds of megabytes before
    /// holding a single buffer; widen `round_to` instead.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidRange`] if `max_size <= min_size`
    /// - [`ConfigError::ZeroRoundTo`] if `round_to == 0`
    /// - [`ConfigError::TooManyBuckets`] if the geometry exceeds [`MAX_BUCKETS`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size <= self.min_size {
            return Err(ConfigError::InvalidRange {
                min_size: self.min_size,
                max_size: self.max_size,
            });
        }
        if self.round_to == 0 {
            return Err(ConfigError::ZeroRoundTo);
        }
        let buckets = self.index_of(self.max_size).saturating_add(1);
        if buckets > MAX_BUCKETS {
            return Err(ConfigError::TooManyBuckets {
                buckets,
                limit: MAX_BUCKETS,
            });
        }
        Ok(())
    }

    /// Number of buckets needed to cover `[0, max_size]`.
    ///
    /// Only meaningful for a validated config.
    #[must_use]
    pub const fn bucket_count(&self) -> usize {
        self.index_of(self.max_size) + 1
    }

    #[inline]
    pub(crate) const fn index_of(&self, size: usize) -> usize {
        size_to_index(size, self.round_to, self.min_size)
    }

    #[inline]
    pub(crate) const fn range_of(&self, index: usize) -> (usize, usize) {
        index_to_range(index, self.round_to, self.min_size)
    }

    /// Capacity given to fresh buffers for bucket `index`.
    ///
    /// This is the bucket's upper bound clamped to `max_size`, so a released
    /// buffer lands back in the bucket that created it and can serve any
    /// size in that bucket without growing.
    #[inline]
    pub(crate) const fn alloc_capacity(&self, index: usize) -> usize {
        let (_, hi) = self.range_of(index);
        if hi < self.max_size { hi } else { self.max_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PoolConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket_count(), DEFAULT_MAX_SIZE / DEFAULT_ROUND_TO + 1);
    }

    #[test]
    fn test_invalid_range() {
        let err = PoolConfig::new(100, 50, 1).validate().unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidRange {
                min_size: 100,
                max_size: 50
            }
        );
        assert!(PoolConfig::new(100, 100, 1).validate().is_err());
    }

    #[test]
    fn test_zero_round_to() {
        assert_eq!(
            PoolConfig::new(0, 4096, 0).validate(),
            Err(ConfigError::ZeroRoundTo)
        );
    }

    #[test]
    fn test_too_many_buckets() {
        let err = PoolConfig::new(0, usize::MAX, 1).validate().unwrap_err();
        assert!(matches!(err, ConfigError::TooManyBuckets { limit, .. } if limit == MAX_BUCKETS));

        // Exactly at the limit is fine
        assert!(PoolConfig::new(0, MAX_BUCKETS - 1, 1).validate().is_ok());
        assert!(PoolConfig::new(0, MAX_BUCKETS, 1).validate().is_err());
    }

    #[test]
    fn test_bucket_count() {
        assert_eq!(PoolConfig::new(0, 4096, 64).bucket_count(), 65);
        assert_eq!(PoolConfig::new(0, 4097, 64).bucket_count(), 66);
        assert_eq!(PoolConfig::new(100, 101, 16).bucket_count(), 2);
    }

    #[test]
    fn test_alloc_capacity() {
        let config = PoolConfig::new(0, 4000, 64);
        assert_eq!(config.alloc_capacity(1), 64);
        assert_eq!(config.alloc_capacity(2), 128);
        // The last bucket [3969, 4032] is clamped to max_size
        let last = config.bucket_count() - 1;
        assert_eq!(config.range_of(last), (3969, 4032));
        assert_eq!(config.alloc_capacity(last), 4000);
        assert_eq!(config.index_of(config.alloc_capacity(last)), last);
    }
}
