//! Fixed-capacity block pool
//!
//! A pool of equally sized chunks carved out of a single buffer reserved at
//! construction. Chunks are addressed by generational [`ChunkId`] handles and handed
//! out in O(1) from a free-index stack.
//!
//! ## Modules
//! - `block_pool` - Main BlockPool implementation with free stack and live bitmap
//! - `config` - Configuration variants (default, production, debug)
//! - `stats` - Statistics tracking types

pub mod block_pool;
pub mod config;
pub mod stats;

pub use block_pool::{BlockPool, ChunkId, SharedPool};
pub use config::PoolConfig;
pub use stats::PoolStats;
