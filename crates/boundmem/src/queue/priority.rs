//! Priority queue backed by pool chunks

use core::fmt;

use super::chain::{NODE_SLOTS, NodeChain, node_size};
use super::slot::PriorityItem;
use crate::error::{MemoryError, MemoryResult};
use crate::pool::SharedPool;

/// Queue of `(value, priority)` items kept in ascending priority order
///
/// Uses the same chunk mechanics as [`LinkedQueue`](super::LinkedQueue).
/// Every enqueue walks the queue from the front, so it costs O(n); dequeue
/// is O(1). Items with equal priority leave in the order they arrived.
///
/// # Examples
///
/// ```rust
/// use boundmem::pool::BlockPool;
/// use boundmem::queue::{LinkedPriorityQueue, PriorityItem};
///
/// let pool = BlockPool::shared(8, LinkedPriorityQueue::NODE_SIZE)?;
/// let mut queue = LinkedPriorityQueue::new(&pool)?;
///
/// queue.enqueue(10, 3.0)?;
/// queue.enqueue(20, 1.0)?;
/// assert_eq!(queue.dequeue()?, PriorityItem::new(20, 1.0));
/// # Ok::<(), boundmem::MemoryError>(())
/// ```
pub struct LinkedPriorityQueue {
    chain: NodeChain<PriorityItem>,
}

impl LinkedPriorityQueue {
    /// Items held by one chunk
    pub const NODE_SLOTS: usize = NODE_SLOTS;

    /// Minimum pool chunk size, in bytes, this queue can draw from
    pub const NODE_SIZE: usize = node_size::<PriorityItem>();

    /// Creates an empty queue, taking its first chunk from `pool`
    ///
    /// # Errors
    /// Same as [`LinkedQueue::new`](super::LinkedQueue::new), with
    /// [`Self::NODE_SIZE`] as the minimum chunk size.
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

    /// Inserts `value` behind every queued item whose priority is not
    /// greater than `priority`
    ///
    /// # Errors
    /// - [`MemoryError::InvalidPriority`] if `priority` is NaN
    /// - [`MemoryError::PoolExhausted`] if the queue needs another chunk and
    ///   the pool has none; the queue is unchanged
    pub fn enqueue(&mut self, value: i32, priority: f32) -> MemoryResult<()> {
        if priority.is_nan() {
            return Err(MemoryError::invalid_priority(priority));
        }

        self.chain
            .insert_by(PriorityItem::new(value, priority), |carried, resident| {
                carried.priority < resident.priority
            })
    }

    /// Removes and returns the item with the lowest priority
    ///
    /// # Errors
    /// Returns [`MemoryError::QueueEmpty`] if there is nothing to dequeue.
    pub fn dequeue(&mut self) -> MemoryResult<PriorityItem> {
        self.chain.pop_front()
    }

    /// Returns the item with the lowest priority without removing it
    ///
    /// # Errors
    /// Returns [`MemoryError::QueueEmpty`] if the queue is empty.
    pub fn peek(&self) -> MemoryResult<PriorityItem> {
        self.chain.peek_front()
    }
}

impl fmt::Debug for LinkedPriorityQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedPriorityQueue")
            .field("len", &self.len())
            .field("node_count", &self.node_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::BlockPool;

    fn queue_with(chunks: usize) -> LinkedPriorityQueue {
        let pool = BlockPool::shared(chunks, LinkedPriorityQueue::NODE_SIZE).unwrap();
        LinkedPriorityQueue::new(&pool).unwrap()
    }

    #[test]
    fn test_three_item_scenario() {
        let mut queue = queue_with(2);
        queue.enqueue(10, 3.0).unwrap();
        queue.enqueue(20, 1.0).unwrap();
        queue.enqueue(30, 2.0).unwrap();

        assert_eq!(queue.dequeue().unwrap(), PriorityItem::new(20, 1.0));
        assert_eq!(queue.dequeue().unwrap(), PriorityItem::new(30, 2.0));
        assert_eq!(queue.dequeue().unwrap(), PriorityItem::new(10, 3.0));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_priorities_keep_arrival_order() {
        let mut queue = queue_with(4);
        queue.enqueue(1, 5.0).unwrap();
        queue.enqueue(2, 1.0).unwrap();
        queue.enqueue(3, 5.0).unwrap();
        queue.enqueue(4, 1.0).unwrap();
        queue.enqueue(5, 5.0).unwrap();

        let values: Vec<i32> = (0..5).map(|_| queue.dequeue().unwrap().value).collect();
        assert_eq!(values, vec![2, 4, 1, 3, 5]);
    }

    #[test]
    fn test_carried_resident_does_not_pass_equal_priority() {
        let mut queue = queue_with(4);
        queue.enqueue(1, 1.0).unwrap();
        queue.enqueue(2, 3.0).unwrap();
        queue.enqueue(3, 3.0).unwrap();
        queue.enqueue(4, 2.0).unwrap();

        let values: Vec<i32> = (0..4).map(|_| queue.dequeue().unwrap().value).collect();
        assert_eq!(values, vec![1, 4, 2, 3]);
    }

    #[test]
    fn test_ordering_across_nodes() {
        let mut queue = queue_with(8);
        for (i, priority) in [9.0, 3.0, 7.0, 1.0, 8.0, 2.0, 6.0, 0.5, 4.0, 5.0]
            .into_iter()
            .enumerate()
        {
            queue.enqueue(i as i32, priority).unwrap();
        }
        assert_eq!(queue.node_count(), 3);

        let mut last = f32::NEG_INFINITY;
        while let Ok(item) = queue.dequeue() {
            assert!(item.priority >= last);
            last = item.priority;
        }
        assert_eq!(queue.node_count(), 1);
    }

    #[test]
    fn test_nan_priority_rejected() {
        let mut queue = queue_with(1);
        assert!(matches!(
            queue.enqueue(1, f32::NAN),
            Err(MemoryError::InvalidPriority { .. })
        ));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_exhaustion_does_not_lose_items() {
        let mut queue = queue_with(1);
        queue.enqueue(1, 3.0).unwrap();
        queue.enqueue(2, 2.0).unwrap();
        queue.enqueue(3, 1.0).unwrap();

        let err = queue.enqueue(4, 0.0).unwrap_err();
        assert!(matches!(err, MemoryError::PoolExhausted { .. }));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek().unwrap(), PriorityItem::new(3, 1.0));
    }
}
