//! Pool-backed expanding queues
//!
//! Both queues store their items in chunks drawn from a shared
//! [`BlockPool`](crate::pool::BlockPool). A pool must be sized for the
//! combined peak depth of every queue drawing from it, and its chunks must
//! be at least `NODE_SIZE` bytes of the largest queue type it serves.
//!
//! ## Modules
//! - `chain` - Linked chunk sequence shared by both queues
//! - `linked` - FIFO queue of `i32`
//! - `priority` - Ascending priority queue of `(i32, f32)` items
//! - `slot` - Fixed-width item encoding

mod chain;
pub mod linked;
pub mod priority;
mod slot;

pub use chain::NODE_SLOTS;
pub use linked::LinkedQueue;
pub use priority::LinkedPriorityQueue;
pub use slot::PriorityItem;
