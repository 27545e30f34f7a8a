//! Bounded hash map configuration

use crate::error::{MemoryError, MemoryResult};

/// Geometry of a [`BoundedHashMap`](super::BoundedHashMap)
///
/// The table is one flat array of `num_buckets * bucket_size` slots. Bucket
/// `b` owns the slots `b, b + num_buckets, b + 2 * num_buckets, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    /// Number of buckets keys are hashed into
    pub num_buckets: usize,
    /// Slots per bucket; the most keys one bucket can hold
    pub bucket_size: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            num_buckets: 64,
            bucket_size: 16,
        }
    }
}

impl MapConfig {
    /// Creates a geometry with the given bucket count and bucket size
    #[must_use]
    pub const fn new(num_buckets: usize, bucket_size: usize) -> Self {
        Self {
            num_buckets,
            bucket_size,
        }
    }

    /// Total number of slots
    ///
    /// # Errors
    /// Returns [`MemoryError::SizeOverflow`] if the slot count overflows.
    pub fn data_len(&self) -> MemoryResult<usize> {
        self.num_buckets
            .checked_mul(self.bucket_size)
            .ok_or_else(|| MemoryError::size_overflow("map slot count"))
    }

    /// Validate configuration
    ///
    /// # Errors
    /// Returns an error if either dimension is zero or the slot count
    /// overflows.
    pub fn validate(&self) -> MemoryResult<()> {
        if self.num_buckets == 0 {
            return Err(MemoryError::invalid_map_config("num_buckets must be non-zero"));
        }
        if self.bucket_size == 0 {
            return Err(MemoryError::invalid_map_config("bucket_size must be non-zero"));
        }
        self.data_len().map(|_| ())
    }
}
