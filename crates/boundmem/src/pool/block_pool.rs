//! Main block pool implementation
//!
//! ## Invariants
//!
//! - Every chunk index is in exactly one place: on the free stack or set in
//!   the live bitmap, so `free_chunks() + allocated_chunks() == num_chunks()`
//! - Chunk handles are `(index, generation)` pairs, never pointers. A chunk's
//!   generation advances whenever it is freed or reclaimed by `free_all`, so
//!   a handle is honoured only while the allocation it came from is live
//! - Generations wrap after `u32::MAX` reuses of the same chunk
//! - Chunks are zero-filled when handed out
//! - The backing buffer is allocated once and never grows or shrinks

use core::cell::RefCell;
use core::fmt;
use core::ops::Range;
use std::rc::Rc;

use fixedbitset::FixedBitSet;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

use super::{PoolConfig, PoolStats};
use crate::error::{MemoryError, MemoryResult};

/// A block pool shared by several consumers in a single thread
///
/// Queues hold one of these so that they can draw capacity from the same pool.
pub type SharedPool = Rc<RefCell<BlockPool>>;

/// Handle to one allocation from a [`BlockPool`]
///
/// Only the pool hands these out. A handle outlives its allocation once the
/// chunk is freed or reclaimed; the pool then rejects it even if the same
/// chunk has been handed to someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId {
    index: u32,
    generation: u32,
}

impl ChunkId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the raw chunk index
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.index
    }

    /// Returns the chunk index as a `usize`
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Returns the allocation generation this handle belongs to
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// Pool of fixed-size chunks
///
/// The pool reserves `num_chunks * chunk_size` bytes up front and hands them
/// out one chunk at a time. Allocation and free are O(1).
///
/// # Memory Layout
/// ```text
/// [Chunk0][Chunk1][Chunk2][Chunk3]...[ChunkN-1]
///
/// free stack (top last): [0, 2, ...]       live bitmap: 0 1 0 1 ...
/// ```
///
/// After construction or [`free_all`](Self::free_all) the first allocation
/// returns chunk `N-1`, then `N-2`, down to chunk `0`.
pub struct BlockPool {
    /// Owned buffer containing all chunks
    memory: Box<[u8]>,

    /// Size of each chunk in bytes
    chunk_size: usize,

    /// Total number of chunks
    num_chunks: usize,

    /// Indices of free chunks; the next allocation pops from the end
    free_stack: Vec<u32>,

    /// Bit `i` is set while chunk `i` is handed out
    live: FixedBitSet,

    /// Current generation of each chunk
    generations: Vec<u32>,

    /// Configuration
    config: PoolConfig,

    /// Statistics (only tracked if enabled)
    total_allocs: u64,
    total_frees: u64,
    failed_allocs: u64,
    rejected_frees: u64,
    peak_chunks: usize,
}

impl BlockPool {
    /// Creates a new block pool with the default configuration
    ///
    /// # Errors
    /// See [`with_config`](Self::with_config).
    pub fn new(num_chunks: usize, chunk_size: usize) -> MemoryResult<Self> {
        Self::with_config(num_chunks, chunk_size, PoolConfig::default())
    }

    /// Creates a new block pool with custom configuration
    ///
    /// # Errors
    /// Returns an error if:
    /// - `num_chunks` or `chunk_size` is zero
    /// - `num_chunks` does not fit a 32-bit chunk index
    /// - `num_chunks * chunk_size` overflows `usize`
    pub fn with_config(
        num_chunks: usize,
        chunk_size: usize,
        config: PoolConfig,
    ) -> MemoryResult<Self> {
        if num_chunks == 0 {
            return Err(MemoryError::invalid_pool_config("num_chunks must be non-zero"));
        }
        if chunk_size == 0 {
            return Err(MemoryError::invalid_pool_config("chunk_size must be non-zero"));
        }
        if u32::try_from(num_chunks).is_err() {
            return Err(MemoryError::invalid_pool_config(
                "num_chunks exceeds the 32-bit chunk index range",
            ));
        }

        let total_size = chunk_size
            .checked_mul(num_chunks)
            .ok_or_else(|| MemoryError::size_overflow("pool buffer size"))?;

        let mut pool = Self {
            memory: vec![0u8; total_size].into_boxed_slice(),
            chunk_size,
            num_chunks,
            free_stack: Vec::with_capacity(num_chunks),
            live: FixedBitSet::with_capacity(num_chunks),
            generations: vec![0; num_chunks],
            config,
            total_allocs: 0,
            total_frees: 0,
            failed_allocs: 0,
            rejected_frees: 0,
            peak_chunks: 0,
        };
        pool.free_all();

        #[cfg(feature = "logging")]
        debug!(num_chunks, chunk_size, "Block pool created");

        Ok(pool)
    }

    /// Creates a pool and wraps it for sharing between queues
    ///
    /// # Errors
    /// See [`with_config`](Self::with_config).
    pub fn shared(num_chunks: usize, chunk_size: usize) -> MemoryResult<SharedPool> {
        Self::new(num_chunks, chunk_size).map(Self::into_shared)
    }

    /// Wraps this pool for sharing between queues
    pub fn into_shared(self) -> SharedPool {
        Rc::new(RefCell::new(self))
    }

    /// Returns the size of each chunk in bytes
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the total number of chunks in the pool
    pub fn num_chunks(&self) -> usize {
        self.num_chunks
    }

    /// Returns the total capacity in bytes
    pub fn capacity_bytes(&self) -> usize {
        self.memory.len()
    }

    /// Returns the number of free chunks
    pub fn free_chunks(&self) -> usize {
        self.free_stack.len()
    }

    /// Returns the number of chunks currently handed out
    pub fn allocated_chunks(&self) -> usize {
        self.num_chunks - self.free_stack.len()
    }

    /// Checks if the pool has no free chunks left
    pub fn is_full(&self) -> bool {
        self.free_stack.is_empty()
    }

    /// Checks if a handle indexes a chunk of this pool
    pub fn contains(&self, chunk: ChunkId) -> bool {
        chunk.index() < self.num_chunks
    }

    /// Checks if a handle refers to an allocation that is still outstanding
    pub fn is_live(&self, chunk: ChunkId) -> bool {
        self.contains(chunk)
            && self.live.contains(chunk.index())
            && self.generations[chunk.index()] == chunk.generation
    }

    /// Allocates one zero-filled chunk
    ///
    /// # Errors
    /// Returns [`MemoryError::PoolExhausted`] if every chunk is handed out.
    pub fn allocate(&mut self) -> MemoryResult<ChunkId> {
        let Some(index) = self.free_stack.pop() else {
            if self.config.track_stats {
                self.failed_allocs += 1;
            }
            return Err(MemoryError::pool_exhausted(self.num_chunks));
        };

        let chunk = ChunkId::new(index, self.generations[index as usize]);
        self.live.insert(chunk.index());
        let range = self.byte_range(chunk);
        self.memory[range].fill(0);

        if self.config.track_stats {
            self.total_allocs += 1;
            self.peak_chunks = self.peak_chunks.max(self.allocated_chunks());
        }

        Ok(chunk)
    }

    /// Returns a chunk to the pool
    ///
    /// Handles that do not index a chunk of this pool are ignored.
    ///
    /// # Errors
    /// Returns [`MemoryError::DoubleFree`] if the handle's allocation has
    /// already ended, whether by `free` or by [`free_all`](Self::free_all),
    /// even when the chunk has since been handed out again. The pool is left
    /// untouched in that case.
    pub fn free(&mut self, chunk: ChunkId) -> MemoryResult<()> {
        if !self.contains(chunk) {
            #[cfg(feature = "logging")]
            trace!(chunk = chunk.raw(), "Ignoring free of chunk outside the pool");
            return Ok(());
        }

        if !self.is_live(chunk) {
            if self.config.track_stats {
                self.rejected_frees += 1;
            }
            return Err(MemoryError::double_free(chunk.raw()));
        }

        if let Some(pattern) = self.config.dealloc_pattern {
            let range = self.byte_range(chunk);
            self.memory[range].fill(pattern);
        }

        let index = chunk.index();
        self.live.set(index, false);
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.free_stack.push(chunk.raw());

        if self.config.track_stats {
            self.total_frees += 1;
        }

        Ok(())
    }

    /// Returns every chunk to the pool
    ///
    /// Chunks are pushed in increasing index order, so the next allocations
    /// hand out chunk `N-1` first and chunk `0` last. Every outstanding
    /// handle becomes stale and is rejected from then on.
    pub fn free_all(&mut self) {
        for index in self.live.ones() {
            self.generations[index] = self.generations[index].wrapping_add(1);
        }
        self.live.clear();
        self.free_stack.clear();
        self.free_stack.extend(0..self.num_chunks as u32);

        if self.config.track_stats {
            self.total_allocs = 0;
            self.total_frees = 0;
            self.failed_allocs = 0;
            self.rejected_frees = 0;
            self.peak_chunks = 0;
        }

        #[cfg(feature = "logging")]
        debug!(num_chunks = self.num_chunks, "Block pool free list rebuilt");
    }

    /// Returns the bytes of a live chunk
    ///
    /// # Errors
    /// Returns [`MemoryError::InvalidChunk`] if the chunk is outside the pool
    /// or not currently handed out.
    pub fn chunk(&self, chunk: ChunkId) -> MemoryResult<&[u8]> {
        let range = self.live_range(chunk)?;
        Ok(&self.memory[range])
    }

    /// Returns the bytes of a live chunk for writing
    ///
    /// # Errors
    /// Returns [`MemoryError::InvalidChunk`] if the chunk is outside the pool
    /// or not currently handed out.
    pub fn chunk_mut(&mut self, chunk: ChunkId) -> MemoryResult<&mut [u8]> {
        let range = self.live_range(chunk)?;
        Ok(&mut self.memory[range])
    }

    /// Get statistics (if tracking is enabled)
    pub fn stats(&self) -> Option<PoolStats> {
        if !self.config.track_stats {
            return None;
        }

        Some(PoolStats {
            total_allocs: self.total_allocs,
            total_frees: self.total_frees,
            failed_allocs: self.failed_allocs,
            rejected_frees: self.rejected_frees,
            peak_chunks: self.peak_chunks,
            allocated_chunks: self.allocated_chunks(),
            chunk_size: self.chunk_size,
            num_chunks: self.num_chunks,
        })
    }

    /// Returns the configuration this pool was built with
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    fn live_range(&self, chunk: ChunkId) -> MemoryResult<Range<usize>> {
        if !self.contains(chunk) {
            return Err(MemoryError::invalid_chunk(chunk.raw(), "outside the pool"));
        }
        if !self.live.contains(chunk.index()) {
            return Err(MemoryError::invalid_chunk(chunk.raw(), "not allocated"));
        }
        if self.generations[chunk.index()] != chunk.generation {
            return Err(MemoryError::invalid_chunk(chunk.raw(), "stale handle"));
        }
        Ok(self.byte_range(chunk))
    }

    fn byte_range(&self, chunk: ChunkId) -> Range<usize> {
        let start = chunk.index() * self.chunk_size;
        start..start + self.chunk_size
    }
}

impl fmt::Debug for BlockPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockPool")
            .field("chunk_size", &self.chunk_size)
            .field("num_chunks", &self.num_chunks)
            .field("free_chunks", &self.free_chunks())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
