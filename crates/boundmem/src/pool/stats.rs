//! Block pool statistics

/// Statistics for a block pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total successful allocations
    pub total_allocs: u64,
    /// Total accepted frees
    pub total_frees: u64,
    /// Allocation attempts that found the pool exhausted
    pub failed_allocs: u64,
    /// Frees rejected as double frees
    pub rejected_frees: u64,
    /// Highest number of chunks outstanding at once
    pub peak_chunks: usize,
    /// Chunks currently outstanding
    pub allocated_chunks: usize,
    /// Size of each chunk in bytes
    pub chunk_size: usize,
    /// Total number of chunks
    pub num_chunks: usize,
}

impl PoolStats {
    /// Fraction of the pool currently handed out, in `[0.0, 1.0]`
    #[must_use]
    pub fn utilization(&self) -> f64 {
        if self.num_chunks == 0 {
            return 0.0;
        }
        self.allocated_chunks as f64 / self.num_chunks as f64
    }
}
