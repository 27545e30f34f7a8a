//! FIFO queue backed by pool chunks

use core::fmt;

use super::chain::{NODE_SLOTS, NodeChain, node_size};
use crate::error::MemoryResult;
use crate::pool::SharedPool;

/// First-in first-out queue of `i32` built from linked pool chunks
///
/// The queue grows one chunk at a time as items are enqueued and returns a
/// chunk to the pool as soon as its last item is dequeued, so the chunks it
/// holds track its current depth rather than its peak depth. An empty queue
/// always keeps one chunk.
///
/// # Examples
///
/// ```rust
/// use boundmem::pool::BlockPool;
/// use boundmem::queue::LinkedQueue;
///
/// let pool = BlockPool::shared(8, LinkedQueue::NODE_SIZE)?;
/// let mut queue = LinkedQueue::new(&pool)?;
///
/// queue.enqueue(5)?;
/// queue.enqueue(9)?;
/// assert_eq!(queue.dequeue()?, 5);
/// assert_eq!(queue.dequeue()?, 9);
/// assert!(queue.is_empty());
/// # Ok::<(), boundmem::MemoryError>(())
/// ```
pub struct LinkedQueue {
    chain: NodeChain<i32>,
}

impl LinkedQueue {
    /// Items held by one chunk
    pub const NODE_SLOTS: usize = NODE_SLOTS;

    /// Minimum pool chunk size, in bytes, this queue can draw from
    pub const NODE_SIZE: usize = node_size::<i32>();

    /// Creates an empty queue, taking its first chunk from `pool`
    ///
    /// # Errors
    /// Returns [`MemoryError::InvalidConfig`](crate::MemoryError::InvalidConfig)
    /// if the pool's chunks are smaller than [`Self::NODE_SIZE`], or
    /// [`MemoryError::PoolExhausted`](crate::MemoryError::PoolExhausted) if
    /// the pool has no free chunk.
    pub fn new(pool: &SharedPool) -> MemoryResult<Self> {
        Ok(Self {
            chain: NodeChain::new(pool)?,
        })
    }

    /// Returns `true` if the queue holds no items
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Number of pool chunks currently owned by this queue
    pub fn node_count(&self) -> usize {
        self.chain.node_count()
    }

    /// The pool this queue draws from
    pub fn pool(&self) -> &SharedPool {
        self.chain.pool()
    }

    /// Appends an item at the back
    ///
    /// # Errors
    /// Returns [`MemoryError::PoolExhausted`](crate::MemoryError::PoolExhausted)
    /// if the item fills the back chunk and no successor chunk is available.
    /// The queue is unchanged in that case.
    pub fn enqueue(&mut self, item: i32) -> MemoryResult<()> {
        self.chain.push_back(item)
    }

    /// Removes and returns the item at the front
    ///
    /// # Errors
    /// Returns [`MemoryError::QueueEmpty`](crate::MemoryError::QueueEmpty)
    /// if there is nothing to dequeue.
    pub fn dequeue(&mut self) -> MemoryResult<i32> {
        self.chain.pop_front()
    }

    /// Returns the item at the front without removing it
    ///
    /// # Errors
    /// Returns [`MemoryError::QueueEmpty`](crate::MemoryError::QueueEmpty)
    /// if the queue is empty.
    pub fn peek(&self) -> MemoryResult<i32> {
        self.chain.peek_front()
    }
}

impl fmt::Debug for LinkedQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedQueue")
            .field("len", &self.len())
            .field("node_count", &self.node_count())
            .finish_non_exhaustive()
    }
}
