//! Property tests for the pool, queue and map laws

use std::collections::HashMap;

use boundmem::map::IntMap;
use boundmem::pool::BlockPool;
use boundmem::queue::{LinkedPriorityQueue, LinkedQueue};
use boundmem::MemoryError;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Pool conservation
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn pool_exhausts_only_when_every_chunk_is_out(
        num_chunks in 1usize..32,
        ops in prop::collection::vec(any::<Option<prop::sample::Index>>(), 0..200),
    ) {
        let mut pool = BlockPool::new(num_chunks, 8).unwrap();
        let mut outstanding = Vec::new();

        for op in ops {
            match op {
                None => match pool.allocate() {
                    Ok(chunk) => outstanding.push(chunk),
                    Err(MemoryError::PoolExhausted { .. }) => {
                        prop_assert_eq!(outstanding.len(), num_chunks);
                    }
                    Err(e) => return Err(TestCaseError::fail(e.to_string())),
                },
                Some(index) if !outstanding.is_empty() => {
                    let chunk = outstanding.swap_remove(index.index(outstanding.len()));
                    prop_assert!(pool.free(chunk).is_ok());
                }
                Some(_) => {}
            }
            prop_assert_eq!(pool.free_chunks() + outstanding.len(), num_chunks);
        }
    }
}

// ---------------------------------------------------------------------------
// FIFO law
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn fifo_preserves_order(items in prop::collection::vec(any::<i32>(), 1..200)) {
        let pool = BlockPool::shared(items.len() / 4 + 1, LinkedQueue::NODE_SIZE).unwrap();
        let mut queue = LinkedQueue::new(&pool).unwrap();

        for &item in &items {
            queue.enqueue(item).unwrap();
        }
        let out: Vec<i32> = items.iter().map(|_| queue.dequeue().unwrap()).collect();

        prop_assert_eq!(out, items);
        prop_assert!(queue.is_empty());
        prop_assert_eq!(queue.node_count(), 1);
    }
}

// ---------------------------------------------------------------------------
// Priority ordering law
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn priority_queue_is_a_stable_sort(
        items in prop::collection::vec((any::<i32>(), 0u8..8), 0..120),
    ) {
        let pool =
            BlockPool::shared(items.len() / 4 + 1, LinkedPriorityQueue::NODE_SIZE).unwrap();
        let mut queue = LinkedPriorityQueue::new(&pool).unwrap();

        for &(value, priority) in &items {
            queue.enqueue(value, f32::from(priority)).unwrap();
        }

        let mut expected: Vec<(i32, f32)> = items
            .iter()
            .map(|&(value, priority)| (value, f32::from(priority)))
            .collect();
        expected.sort_by(|a, b| a.1.total_cmp(&b.1));

        let out: Vec<(i32, f32)> =
            std::iter::from_fn(|| queue.dequeue().ok()).map(Into::into).collect();
        prop_assert_eq!(out, expected);
    }
}

// ---------------------------------------------------------------------------
// Map round-trip
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn map_agrees_with_model(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..600),
    ) {
        let mut map = IntMap::new();
        let mut model = HashMap::new();

        for (key, value) in entries {
            match map.insert(key, value) {
                Ok(previous) => {
                    prop_assert_eq!(previous, model.insert(key, value));
                }
                Err(MemoryError::BucketFull { .. }) => {
                    prop_assert!(!model.contains_key(&key));
                }
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
            }
        }

        prop_assert_eq!(map.len(), model.len());
        for (key, value) in &model {
            prop_assert_eq!(map.lookup(*key), Some(*value));
        }
    }
}
