//! Bucket index arithmetic.
//!
//! Sizes are grouped into buckets. Bucket 0 covers `[0, min_size]`; every
//! bucket above it covers one `round_to`-wide step:
//!
//! - Bucket 0: `[0, min_size]`
//! - Bucket 1: `[min_size + 1, min_size + round_to]`
//! - Bucket k: `[min_size + (k - 1) * round_to + 1, min_size + k * round_to]`
//!
//! Both directions are pure and range-agnostic: clamping to a pool's maximum
//! size happens in the pool, not here.

/// Returns the index of the smallest bucket whose range covers `size`.
///
/// Larger sizes never map to a smaller index.
#[inline]
#[must_use]
pub const fn size_to_index(size: usize, round_to: usize, min_size: usize) -> usize {
    debug_assert!(round_to > 0);
    if size <= min_size {
        return 0;
    }
    // ceil((size - min_size) / round_to) without the `+ round_to - 1` overflow
    (size - min_size - 1) / round_to + 1
}

/// Returns the inclusive `(min, max)` size range covered by bucket `index`.
///
/// The upper bound saturates at `usize::MAX`, so the last bucket of the
/// address space is clipped rather than wrapped.
#[inline]
#[must_use]
pub const fn index_to_range(index: usize, round_to: usize, min_size: usize) -> (usize, usize) {
    debug_assert!(round_to > 0);
    if index == 0 {
        return (0, min_size);
    }
    let lo = min_size
        .saturating_add((index - 1).saturating_mul(round_to))
        .saturating_add(1);
    let hi = min_size.saturating_add(index.saturating_mul(round_to));
    (lo, hi)
}
