//! Block chain shared by both queue variants
//!
//! A chain is a singly linked sequence of pool chunks ("nodes"). Each node
//! holds [`NODE_SLOTS`] fixed-width slots followed by a successor link:
//!
//! ```text
//! [slot0][slot1][slot2][slot3][next+1: u32 LE][next generation: u32 LE]
//! ```
//!
//! The link stores the successor's `index + 1` and its generation, so the
//! zero-filled chunk handed out by the pool reads as "no successor".
//!
//! ## Invariants
//!
//! - `front == back && front_offset == back_offset` iff the chain is empty
//! - `back_offset < NODE_SLOTS` always; a full back node is replaced by a
//!   fresh one in the same call that fills it
//! - Every node from `front` to `back` is owned by the chain and live in the
//!   pool; a node goes back to the pool as soon as its last slot is read

use core::marker::PhantomData;

#[cfg(feature = "logging")]
use tracing::warn;

use super::slot::{Slot, read_u32};
use crate::error::{MemoryError, MemoryResult};
use crate::pool::{BlockPool, ChunkId, SharedPool};

/// Slots per node
pub const NODE_SLOTS: usize = 4;

/// Width of the successor link at the end of a node
const LINK_SIZE: usize = 8;

/// Bytes one node of `T` occupies in a chunk
pub(crate) const fn node_size<T: Slot>() -> usize {
    NODE_SLOTS * T::SIZE + LINK_SIZE
}

/// Position of one slot in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    node: ChunkId,
    offset: usize,
}

pub(crate) struct NodeChain<T: Slot> {
    pool: SharedPool,
    front: Cursor,
    back: Cursor,
    len: usize,
    nodes: usize,
    _slot: PhantomData<T>,
}

impl<T: Slot> NodeChain<T> {
    pub(crate) fn new(pool: &SharedPool) -> MemoryResult<Self> {
        let first = {
            let mut guard = pool.borrow_mut();
            if guard.chunk_size() < node_size::<T>() {
                return Err(MemoryError::invalid_config(&format!(
                    "pool chunk size {} cannot hold a {}-byte queue node",
                    guard.chunk_size(),
                    node_size::<T>()
                )));
            }
            guard.allocate()?
        };

        let start = Cursor {
            node: first,
            offset: 0,
        };
        Ok(Self {
            pool: SharedPool::clone(pool),
            front: start,
            back: start,
            len: 0,
            nodes: 1,
            _slot: PhantomData,
        })
    }

    pub(crate) fn pool(&self) -> &SharedPool {
        &self.pool
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.front == self.back
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes
    }

    /// Appends an item at the back
    ///
    /// On [`MemoryError::PoolExhausted`] the chain is unchanged.
    pub(crate) fn push_back(&mut self, item: T) -> MemoryResult<()> {
        let spare = self.reserve_tail()?;
        self.commit_tail(item, spare)
    }

    /// Inserts an item by walking the chain from the front
    ///
    /// The new item is swapped into the first slot whose resident it
    /// `displaces`. From there on every resident is carried one slot back,
    /// and whatever is carried at the tail is appended. With a strict
    /// ordering predicate this keeps the chain sorted and stable.
    pub(crate) fn insert_by<F>(&mut self, item: T, displaces: F) -> MemoryResult<()>
    where
        F: Fn(&T, &T) -> bool,
    {
        let spare = self.reserve_tail()?;

        let mut carried = item;
        let mut shifting = false;
        let mut cursor = self.front;
        while cursor != self.back {
            let resident = match self.read(cursor) {
                Ok(resident) => resident,
                Err(e) => return Err(self.release(spare, e)),
            };
            // Once shifting, a carried resident must not pass an equal one
            if shifting || displaces(&carried, &resident) {
                shifting = true;
                if let Err(e) = self.write(cursor, carried) {
                    return Err(self.release(spare, e));
                }
                carried = resident;
            }
            cursor = match self.advance(cursor) {
                Ok(next) => next,
                Err(e) => return Err(self.release(spare, e)),
            };
        }

        self.commit_tail(carried, spare)
    }

    /// Removes the item at the front
    pub(crate) fn pop_front(&mut self) -> MemoryResult<T> {
        if self.is_empty() {
            return Err(MemoryError::queue_empty());
        }

        let item = self.read(self.front)?;
        let drained = self.front.node;
        let next = self.advance(self.front)?;
        if next.node != drained {
            self.pool.borrow_mut().free(drained)?;
            self.nodes -= 1;
        }
        self.front = next;
        self.len -= 1;

        Ok(item)
    }

    pub(crate) fn peek_front(&self) -> MemoryResult<T> {
        if self.is_empty() {
            return Err(MemoryError::queue_empty());
        }
        self.read(self.front)
    }

    /// Allocates the successor node if the next append fills the back node
    fn reserve_tail(&self) -> MemoryResult<Option<ChunkId>> {
        if self.back.offset + 1 < NODE_SLOTS {
            return Ok(None);
        }
        self.pool.borrow_mut().allocate().map(Some)
    }

    fn commit_tail(&mut self, item: T, spare: Option<ChunkId>) -> MemoryResult<()> {
        if let Err(e) = self.write(self.back, item) {
            return Err(self.release(spare, e));
        }

        match spare {
            Some(next) => {
                if let Err(e) = self.set_link(self.back.node, next) {
                    return Err(self.release(spare, e));
                }
                self.back = Cursor {
                    node: next,
                    offset: 0,
                };
                self.nodes += 1;
            }
            None => self.back.offset += 1,
        }
        self.len += 1;

        Ok(())
    }

    /// Hands a reserved node back after a failed append
    fn release(&self, spare: Option<ChunkId>, error: MemoryError) -> MemoryError {
        if let Some(chunk) = spare {
            let released = self.pool.borrow_mut().free(chunk);
            debug_assert!(released.is_ok(), "reserved node {chunk} was not live");
        }
        error
    }

    fn advance(&self, cursor: Cursor) -> MemoryResult<Cursor> {
        if cursor.offset + 1 < NODE_SLOTS {
            return Ok(Cursor {
                node: cursor.node,
                offset: cursor.offset + 1,
            });
        }
        Ok(Cursor {
            node: self.link(cursor.node)?,
            offset: 0,
        })
    }

    fn read(&self, cursor: Cursor) -> MemoryResult<T> {
        let pool = self.pool.borrow();
        let bytes = pool.chunk(cursor.node)?;
        let start = cursor.offset * T::SIZE;
        Ok(T::decode(&bytes[start..start + T::SIZE]))
    }

    fn write(&self, cursor: Cursor, item: T) -> MemoryResult<()> {
        let mut pool = self.pool.borrow_mut();
        let bytes = pool.chunk_mut(cursor.node)?;
        let start = cursor.offset * T::SIZE;
        item.encode(&mut bytes[start..start + T::SIZE]);
        Ok(())
    }

    fn link(&self, node: ChunkId) -> MemoryResult<ChunkId> {
        Self::link_in(&self.pool.borrow(), node)
    }

    fn link_in(pool: &BlockPool, node: ChunkId) -> MemoryResult<ChunkId> {
        let bytes = pool.chunk(node)?;
        let start = NODE_SLOTS * T::SIZE;
        match read_u32(&bytes[start..]) {
            0 => Err(MemoryError::invalid_chunk(
                node.raw(),
                "queue node has no successor",
            )),
            next => Ok(ChunkId::new(next - 1, read_u32(&bytes[start + 4..]))),
        }
    }

    fn set_link(&self, node: ChunkId, next: ChunkId) -> MemoryResult<()> {
        let mut pool = self.pool.borrow_mut();
        let bytes = pool.chunk_mut(node)?;
        let start = NODE_SLOTS * T::SIZE;
        bytes[start..start + 4].copy_from_slice(&(next.raw() + 1).to_le_bytes());
        bytes[start + 4..start + LINK_SIZE].copy_from_slice(&next.generation().to_le_bytes());
        Ok(())
    }
}

impl<T: Slot> Drop for NodeChain<T> {
    fn drop(&mut self) {
        let Ok(mut pool) = self.pool.try_borrow_mut() else {
            #[cfg(feature = "logging")]
            warn!(
                nodes = self.nodes,
                front = %self.front.node,
                "Block pool borrowed while dropping queue, nodes leaked"
            );
            return;
        };

        let mut node = Some(self.front.node);
        while let Some(current) = node {
            node = if current == self.back.node {
                None
            } else {
                Self::link_in(&pool, current).ok()
            };

            // Nodes reclaimed by `free_all` carry a stale generation and are
            // no longer ours, even if the chunk was handed out again.
            if pool.is_live(current) {
                let _ = pool.free(current);
            }
        }
    }
}
