//! Integration tests for the priority queue

use boundmem::pool::BlockPool;
use boundmem::queue::{LinkedPriorityQueue, LinkedQueue, PriorityItem};
use boundmem::MemoryError;

fn drain(queue: &mut LinkedPriorityQueue) -> Vec<PriorityItem> {
    std::iter::from_fn(|| queue.dequeue().ok()).collect()
}

#[test]
fn test_priority_scenario() {
    let pool = BlockPool::shared(4, LinkedPriorityQueue::NODE_SIZE).unwrap();
    let mut queue = LinkedPriorityQueue::new(&pool).unwrap();

    queue.enqueue(10, 3.0).unwrap();
    queue.enqueue(20, 1.0).unwrap();
    queue.enqueue(30, 2.0).unwrap();

    let out: Vec<(i32, f32)> = drain(&mut queue).into_iter().map(Into::into).collect();
    assert_eq!(out, vec![(20, 1.0), (30, 2.0), (10, 3.0)]);
}

#[test]
fn test_dequeue_empty() {
    let pool = BlockPool::shared(1, LinkedPriorityQueue::NODE_SIZE).unwrap();
    let mut queue = LinkedPriorityQueue::new(&pool).unwrap();
    assert_eq!(queue.dequeue(), Err(MemoryError::QueueEmpty));

    // (-1, -1.0) is an ordinary item, not an "empty" marker
    queue.enqueue(-1, -1.0).unwrap();
    assert_eq!(queue.dequeue(), Ok(PriorityItem::new(-1, -1.0)));
}

#[test]
fn test_descending_input_is_reversed() {
    let pool = BlockPool::shared(16, LinkedPriorityQueue::NODE_SIZE).unwrap();
    let mut queue = LinkedPriorityQueue::new(&pool).unwrap();

    for value in 0..30 {
        queue.enqueue(value, (30 - value) as f32).unwrap();
    }
    let values: Vec<i32> = drain(&mut queue).iter().map(|item| item.value).collect();
    let expected: Vec<i32> = (0..30).rev().collect();
    assert_eq!(values, expected);
    assert_eq!(queue.node_count(), 1);
}

#[test]
fn test_negative_and_infinite_priorities() {
    let pool = BlockPool::shared(4, LinkedPriorityQueue::NODE_SIZE).unwrap();
    let mut queue = LinkedPriorityQueue::new(&pool).unwrap();

    queue.enqueue(1, f32::INFINITY).unwrap();
    queue.enqueue(2, -3.5).unwrap();
    queue.enqueue(3, f32::NEG_INFINITY).unwrap();
    queue.enqueue(4, 0.0).unwrap();

    let values: Vec<i32> = drain(&mut queue).iter().map(|item| item.value).collect();
    assert_eq!(values, vec![3, 2, 4, 1]);
}

#[test]
fn test_mixed_queues_on_one_pool() {
    // Chunks sized for the larger node serve both queue kinds.
    let pool = BlockPool::shared(4, LinkedPriorityQueue::NODE_SIZE).unwrap();
    let mut fifo = LinkedQueue::new(&pool).unwrap();
    let mut prio = LinkedPriorityQueue::new(&pool).unwrap();

    fifo.enqueue(1).unwrap();
    prio.enqueue(1, 1.0).unwrap();
    assert_eq!(pool.borrow().allocated_chunks(), 2);

    assert!(matches!(
        LinkedPriorityQueue::new(&BlockPool::shared(1, LinkedQueue::NODE_SIZE).unwrap()),
        Err(MemoryError::InvalidConfig { .. })
    ));
}
