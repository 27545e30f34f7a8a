//! Fixed-capacity integer-keyed hash map
//!
//! Chaining emulated with array slots: each bucket owns a fixed run of
//! slots in one flat array, so the table never allocates after construction
//! and a bucket holds at most `bucket_size` keys.

pub mod bounded;
pub mod config;
pub mod hash;

pub use bounded::{BoundedHashMap, FloatMap, IntMap};
pub use config::MapConfig;
pub use hash::{bucket_of, hash};
