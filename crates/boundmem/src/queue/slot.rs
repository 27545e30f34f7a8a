//! Fixed-width slot encoding for queue nodes
//!
//! Queue nodes live inside pool chunks as plain bytes. Each element type
//! knows its own width and little-endian encoding, so a node is portable and
//! never reinterprets chunk memory through a pointer cast.

use core::fmt;

/// Element that can be stored in a queue node slot
pub(crate) trait Slot: Copy {
    /// Encoded width in bytes
    const SIZE: usize;

    /// Writes the element into `out`, which is exactly `SIZE` bytes long
    fn encode(&self, out: &mut [u8]);

    /// Reads an element back from exactly `SIZE` bytes
    fn decode(bytes: &[u8]) -> Self;
}

pub(crate) fn read_u32(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(raw)
}

impl Slot for i32 {
    const SIZE: usize = 4;

    fn encode(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        read_u32(bytes) as i32
    }
}

/// A value paired with its priority
///
/// Lower priorities are dequeued first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriorityItem {
    /// Payload
    pub value: i32,
    /// Ordering key, ascending
    pub priority: f32,
}

impl PriorityItem {
    /// Creates a new item
    #[must_use]
    pub const fn new(value: i32, priority: f32) -> Self {
        Self { value, priority }
    }
}

impl From<(i32, f32)> for PriorityItem {
    fn from((value, priority): (i32, f32)) -> Self {
        Self { value, priority }
    }
}

impl From<PriorityItem> for (i32, f32) {
    fn from(item: PriorityItem) -> Self {
        (item.value, item.priority)
    }
}

impl fmt::Display for PriorityItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.value, self.priority)
    }
}

impl Slot for PriorityItem {
    const SIZE: usize = 8;

    fn encode(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.value.to_le_bytes());
        out[4..8].copy_from_slice(&self.priority.to_bits().to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        Self {
            value: read_u32(&bytes[..4]) as i32,
            priority: f32::from_bits(read_u32(&bytes[4..8])),
        }
    }
}
