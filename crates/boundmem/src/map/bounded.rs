//! Bounded hash map implementation
//!
//! ## Invariants
//!
//! - A key occupies at most one slot, and that slot belongs to its bucket
//! - Within a bucket, occupied slots form a prefix of the bucket's slots;
//!   there is no per-key removal, only [`BoundedHashMap::clear`]
//! - Empty slots are `None`, so every `i32` key and every value is storable

use core::fmt;

#[cfg(feature = "logging")]
use tracing::debug;

use super::config::MapConfig;
use super::hash::bucket_of;
use crate::error::{MemoryError, MemoryResult};

/// Map from `i32` to `i32`
pub type IntMap = BoundedHashMap<i32>;

/// Map from `i32` to `f32`
pub type FloatMap = BoundedHashMap<f32>;

/// Fixed-capacity hash map from `i32` keys to `V` values
///
/// Keys hash into one of `num_buckets` buckets; each bucket scans its
/// `bucket_size` slots linearly. When a bucket is full, inserting another
/// distinct key fails with [`MemoryError::BucketFull`] and the map is left
/// unchanged. There is no rehashing or growth.
///
/// # Examples
///
/// ```rust
/// use boundmem::map::IntMap;
///
/// let mut map = IntMap::new();
/// assert_eq!(map.insert(7, 70)?, None);
/// assert_eq!(map.insert(7, 71)?, Some(70));
/// assert_eq!(map.lookup(7), Some(71));
/// assert_eq!(map.lookup(8), None);
/// # Ok::<(), boundmem::MemoryError>(())
/// ```
#[derive(Clone)]
pub struct BoundedHashMap<V> {
    slots: Box<[Option<(i32, V)>]>,
    config: MapConfig,
    len: usize,
}

impl<V: Copy> BoundedHashMap<V> {
    /// Creates an empty map with 64 buckets of 16 slots
    #[must_use]
    pub fn new() -> Self {
        let config = MapConfig::default();
        Self::build(config, config.num_buckets * config.bucket_size)
    }

    /// Creates an empty map with custom geometry
    ///
    /// # Errors
    /// Returns an error if `config` fails [`MapConfig::validate`].
    pub fn with_config(config: MapConfig) -> MemoryResult<Self> {
        config.validate()?;
        let data_len = config.data_len()?;
        Ok(Self::build(config, data_len))
    }

    fn build(config: MapConfig, data_len: usize) -> Self {
        #[cfg(feature = "logging")]
        debug!(
            num_buckets = config.num_buckets,
            bucket_size = config.bucket_size,
            "Bounded hash map created"
        );

        Self {
            slots: vec![None; data_len].into_boxed_slice(),
            config,
            len: 0,
        }
    }

    /// Inserts a key/value pair, replacing the value if the key is present
    ///
    /// Returns the previous value for an existing key.
    ///
    /// # Errors
    /// Returns [`MemoryError::BucketFull`] if the key is new and its bucket
    /// already holds `bucket_size` other keys.
    pub fn insert(&mut self, key: i32, value: V) -> MemoryResult<Option<V>> {
        let bucket = self.bucket(key);
        for i in 0..self.config.bucket_size {
            let index = self.slot_index(bucket, i);
            match &mut self.slots[index] {
                slot @ None => {
                    *slot = Some((key, value));
                    self.len += 1;
                    return Ok(None);
                }
                Some((resident, old)) if *resident == key => {
                    return Ok(Some(core::mem::replace(old, value)));
                }
                Some(_) => {}
            }
        }

        Err(MemoryError::bucket_full(
            key,
            bucket,
            self.config.bucket_size,
        ))
    }

    /// Returns the value stored for `key`, or `None` if it is absent
    pub fn lookup(&self, key: i32) -> Option<V> {
        self.bucket_slots(self.bucket(key))
            .map_while(|slot| *slot)
            .find_map(|(resident, value)| (resident == key).then_some(value))
    }

    /// Checks if `key` is present
    pub fn contains_key(&self, key: i32) -> bool {
        self.lookup(key).is_some()
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.slots.fill(None);
        self.len = 0;

        #[cfg(feature = "logging")]
        debug!(slots = self.slots.len(), "Bounded hash map cleared");
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no key is stored
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of keys stored in `bucket`; zero for a bucket out of range
    pub fn bucket_len(&self, bucket: usize) -> usize {
        if bucket >= self.config.num_buckets {
            return 0;
        }
        self.bucket_slots(bucket)
            .take_while(|slot| slot.is_some())
            .count()
    }

    /// Geometry of this map
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Iterates over all entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (i32, V)> + '_ {
        self.slots.iter().filter_map(|slot| *slot)
    }

    fn bucket(&self, key: i32) -> usize {
        bucket_of(key, self.config.num_buckets)
    }

    fn slot_index(&self, bucket: usize, i: usize) -> usize {
        bucket + i * self.config.num_buckets
    }

    fn bucket_slots(&self, bucket: usize) -> impl Iterator<Item = &Option<(i32, V)>> + '_ {
        self.slots
            .iter()
            .skip(bucket)
            .step_by(self.config.num_buckets)
    }
}

impl<V: Copy> Default for BoundedHashMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Copy + fmt::Debug> fmt::Debug for BoundedHashMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colliding_keys(bucket: usize, count: usize) -> Vec<i32> {
        (0..)
            .filter(|&key| bucket_of(key, 64) == bucket)
            .take(count)
            .collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut map = IntMap::new();
        assert_eq!(map.insert(1, 100).unwrap(), None);
        assert_eq!(map.insert(2, 200).unwrap(), None);

        assert_eq!(map.lookup(1), Some(100));
        assert_eq!(map.lookup(2), Some(200));
        assert_eq!(map.lookup(3), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_update_keeps_single_slot() {
        let mut map = IntMap::new();
        map.insert(5, 1).unwrap();
        assert_eq!(map.insert(5, 2).unwrap(), Some(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.bucket_len(bucket_of(5, 64)), 1);
        assert_eq!(map.lookup(5), Some(2));
    }

    #[test]
    fn test_former_sentinel_values_are_storable() {
        let mut ints = IntMap::new();
        ints.insert(i32::MIN, i32::MIN).unwrap();
        assert_eq!(ints.lookup(i32::MIN), Some(i32::MIN));

        let mut floats = FloatMap::new();
        floats.insert(3, -2_147_483_648.0).unwrap();
        assert_eq!(floats.lookup(3), Some(-2_147_483_648.0));
    }

    #[test]
    fn test_bucket_overflow() {
        let mut map = IntMap::new();
        let keys = colliding_keys(54, 17);

        for (i, &key) in keys[..16].iter().enumerate() {
            map.insert(key, i as i32).unwrap();
        }
        let err = map.insert(keys[16], 16).unwrap_err();
        assert_eq!(
            err,
            MemoryError::BucketFull {
                key: keys[16],
                bucket: 54,
                bucket_size: 16,
            }
        );

        for (i, &key) in keys[..16].iter().enumerate() {
            assert_eq!(map.lookup(key), Some(i as i32));
        }
        assert_eq!(map.lookup(keys[16]), None);
        assert_eq!(map.len(), 16);

        // Updating a resident key still works in a full bucket.
        assert_eq!(map.insert(keys[0], 99).unwrap(), Some(0));
    }

    #[test]
    fn test_clear() {
        let mut map = FloatMap::new();
        for key in 0..100 {
            map.insert(key, key as f32 * 0.5).unwrap();
        }
        assert_eq!(map.len(), 100);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
        assert_eq!(map.lookup(10), None);
        assert_eq!(map.capacity(), 1024);
    }

    #[test]
    fn test_new_matches_default_config() {
        let plain = IntMap::new();
        let configured = IntMap::with_config(MapConfig::default()).unwrap();
        assert_eq!(plain.config(), configured.config());
        assert_eq!(plain.capacity(), configured.capacity());
        assert_eq!(plain.capacity(), 1024);
    }

    #[test]
    fn test_custom_geometry() {
        let mut map = IntMap::with_config(MapConfig::new(1, 2)).unwrap();
        map.insert(10, 1).unwrap();
        map.insert(20, 2).unwrap();
        assert!(matches!(
            map.insert(30, 3),
            Err(MemoryError::BucketFull { bucket: 0, .. })
        ));
        assert_eq!(map.bucket_len(0), 2);
        assert_eq!(map.bucket_len(5), 0);

        assert!(IntMap::with_config(MapConfig::new(0, 4)).is_err());
    }
}
