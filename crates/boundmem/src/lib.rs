//! # boundmem
//!
//! Memory-bounded container primitives for code that must not call the
//! general-purpose allocator per element.
//!
//! This crate provides:
//! - [`BlockPool`](pool::BlockPool): fixed-capacity pool of fixed-size chunks
//!   with O(1) allocate/free and double-free detection
//! - [`LinkedQueue`](queue::LinkedQueue): FIFO queue of `i32` built from
//!   linked pool chunks
//! - [`LinkedPriorityQueue`](queue::LinkedPriorityQueue): stable ascending
//!   priority queue on the same chunk mechanics
//! - [`BoundedHashMap`](map::BoundedHashMap): fixed-capacity `i32`-keyed map
//!   with bounded in-array chaining
//!
//! ## Quick Start
//!
//! ```rust
//! use boundmem::prelude::*;
//!
//! // One pool sized for the peak depth of every queue drawing from it
//! let pool = BlockPool::shared(16, LinkedPriorityQueue::NODE_SIZE)?;
//!
//! let mut fifo = LinkedQueue::new(&pool)?;
//! fifo.enqueue(1)?;
//!
//! let mut jobs = LinkedPriorityQueue::new(&pool)?;
//! jobs.enqueue(10, 3.0)?;
//! jobs.enqueue(20, 1.0)?;
//! assert_eq!(jobs.dequeue()?.value, 20);
//!
//! let mut map = IntMap::new();
//! map.insert(1, 42)?;
//! assert_eq!(map.lookup(1), Some(42));
//! # Ok::<(), MemoryError>(())
//! ```
//!
//! ## Features
//!
//! - `logging` (default): structured events through `tracing` on pool
//!   exhaustion, double free and bucket overflow
//!
//! ## Architecture
//!
//! - Standalone error handling via [`error`] module; no container ever
//!   signals failure through a reserved payload value
//! - Single-threaded: a [`SharedPool`](pool::SharedPool) is an
//!   `Rc<RefCell<_>>`, so none of the containers are `Send` or `Sync`
//! - Capacity is fixed at construction; nothing grows or rehashes

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::perf)]
#![warn(clippy::pedantic)]
#![warn(rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Chunk indices are validated to fit u32 at pool construction
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

// Error types
pub mod error;

// Core modules
pub mod map;
pub mod pool;
pub mod queue;

pub use crate::error::{MemoryError, MemoryResult, Result};

// Public API exports
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    // Error types
    pub use crate::error::{MemoryError, MemoryResult};

    // Pool types
    pub use crate::pool::{BlockPool, ChunkId, PoolConfig, PoolStats, SharedPool};

    // Queue types
    pub use crate::queue::{LinkedPriorityQueue, LinkedQueue, PriorityItem};

    // Map types
    pub use crate::map::{BoundedHashMap, FloatMap, IntMap, MapConfig};
}
