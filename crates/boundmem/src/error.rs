//! Standalone error types for boundmem
//!
//! Uses thiserror for clean, idiomatic Rust error definitions. Every
//! condition that a fixed-capacity container can hit is a variant here, so
//! no payload value ever doubles as an error marker.

use thiserror::Error;

#[cfg(feature = "logging")]
use tracing::{error, warn};

// ============================================================================
// Main Error Types
// ============================================================================

/// Errors produced by the pool, the queues and the bounded map
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    // --- Pool Errors ---
    #[error("Block pool exhausted (capacity: {capacity} chunks)")]
    PoolExhausted { capacity: usize },

    #[error("Double free of chunk {chunk}")]
    DoubleFree { chunk: u32 },

    #[error("Invalid chunk {chunk}: {reason}")]
    InvalidChunk { chunk: u32, reason: &'static str },

    // --- Queue Errors ---
    #[error("Queue is empty")]
    QueueEmpty,

    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: f32 },

    // --- Map Errors ---
    #[error("Bucket {bucket} full ({bucket_size} slots), key {key} not inserted")]
    BucketFull {
        key: i32,
        bucket: usize,
        bucket_size: usize,
    },

    // --- Configuration Errors ---
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Size overflow during operation: {operation}")]
    SizeOverflow { operation: &'static str },
}

impl MemoryError {
    /// Check if error is retryable
    ///
    /// Exhaustion, emptiness and bucket overflow can clear up once the caller
    /// drains or clears the container; the rest are programming errors.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PoolExhausted { .. } | Self::QueueEmpty | Self::BucketFull { .. }
        )
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PoolExhausted { .. } => "MEM:POOL:EXHAUSTED",
            Self::DoubleFree { .. } => "MEM:POOL:DOUBLE_FREE",
            Self::InvalidChunk { .. } => "MEM:POOL:CHUNK",
            Self::QueueEmpty => "MEM:QUEUE:EMPTY",
            Self::InvalidPriority { .. } => "MEM:QUEUE:PRIORITY",
            Self::BucketFull { .. } => "MEM:MAP:BUCKET_FULL",
            Self::InvalidConfig { .. } => "MEM:CONFIG:INVALID",
            Self::SizeOverflow { .. } => "MEM:CONFIG:OVERFLOW",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create pool exhausted error
    pub fn pool_exhausted(capacity: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(capacity, "Block pool exhausted");

        Self::PoolExhausted { capacity }
    }

    /// Create double free error
    pub fn double_free(chunk: u32) -> Self {
        #[cfg(feature = "logging")]
        error!(chunk, "Double free detected in block pool");

        Self::DoubleFree { chunk }
    }

    /// Create invalid chunk error
    pub fn invalid_chunk(chunk: u32, reason: &'static str) -> Self {
        Self::InvalidChunk { chunk, reason }
    }

    /// Create queue empty error
    pub fn queue_empty() -> Self {
        Self::QueueEmpty
    }

    /// Create invalid priority error
    pub fn invalid_priority(priority: f32) -> Self {
        Self::InvalidPriority { priority }
    }

    /// Create bucket full error
    pub fn bucket_full(key: i32, bucket: usize, bucket_size: usize) -> Self {
        #[cfg(feature = "logging")]
        warn!(key, bucket, bucket_size, "Hash map bucket full, insert rejected");

        Self::BucketFull {
            key,
            bucket,
            bucket_size,
        }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }

    /// Create invalid pool config error
    pub fn invalid_pool_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: format!("invalid pool config: {reason}"),
        }
    }

    /// Create invalid map config error
    pub fn invalid_map_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: format!("invalid map config: {reason}"),
        }
    }

    /// Create size overflow error
    pub fn size_overflow(operation: &'static str) -> Self {
        Self::SizeOverflow { operation }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for container operations
pub type MemoryResult<T> = core::result::Result<T, MemoryError>;

/// Generic result type alias
pub type Result<T> = MemoryResult<T>;

// ============================================================================
// Tests
// ============================================================================
