//! # bytespool
//!
//! A size-stratified pool of reusable byte buffers. Buffers are handed out at
//! an exact requested length and recycled by capacity, so repeated
//! allocate/release cycles of similarly sized buffers skip the allocator.
//!
//! ## Features
//!
//! - **Bucketed recycling**: Capacities are grouped into `round_to`-wide
//!   buckets above a `min_size` floor, up to a configurable `max_size`
//! - **Exact lengths**: [`BufferPool::get`] always returns a buffer whose
//!   length is the requested size; spare capacity stays with the buffer
//! - **Per-bucket locking**: Each bucket is an independent stack, so callers
//!   working on different size classes never contend
//! - **Bounded footprint**: Buffers larger than `max_size` are never retained
//! - **RAII guard**: [`PooledBuf`] returns its buffer to the pool on drop
//!
//! ## Example
//!
//! ```rust
//! use bytespool::BufferPoolBuilder;
//!
//! # fn main() -> Result<(), bytespool::ConfigError> {
//! let pool = BufferPoolBuilder::new()
//!     .min_size(0)
//!     .max_size(4096)
//!     .round_to(64)
//!     .build()?;
//!
//! // Miss: a fresh buffer sized for the whole [65, 128] bucket
//! let buf = pool.get(100, true).expect("allocation allowed");
//! assert_eq!(buf.len(), 100);
//! pool.put(buf).expect("fits the pool");
//!
//! // Hit: the same buffer, cut to the new length
//! let buf = pool.get(120, false).expect("recycled");
//! assert_eq!(buf.len(), 120);
//!
//! // Empty bucket without allocation permission
//! assert!(pool.get(500, false).is_none());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod index;
mod pool;
mod pooled;

pub use config::{DEFAULT_MAX_SIZE, DEFAULT_ROUND_TO, MAX_BUCKETS, PoolConfig};
pub use error::{ConfigError, RejectReason, Rejected};
pub use index::{index_to_range, size_to_index};
pub use pool::{BufferPool, BufferPoolBuilder, PoolStats};
pub use pooled::PooledBuf;
