//! Integer key hashing

/// Mixes a 32-bit key into a well-distributed 32-bit hash
///
/// Thomas Wang's shift/add/multiply integer mix. Deterministic, unseeded and
/// stateless; all arithmetic wraps.
#[must_use]
pub const fn hash(key: i32) -> i32 {
    let mut key = (!key).wrapping_add(key.wrapping_shl(15));
    key ^= key >> 12;
    key = key.wrapping_add(key.wrapping_shl(2));
    key ^= key >> 4;
    key = key.wrapping_mul(2057);
    key ^= key >> 16;
    key
}

/// Bucket a key falls into for a table of `num_buckets` buckets
///
/// Negative hashes are reduced with Euclidean remainder, so the result is
/// always in `0..num_buckets`.
#[must_use]
pub fn bucket_of(key: i32, num_buckets: usize) -> usize {
    debug_assert!(num_buckets > 0);
    i64::from(hash(key)).rem_euclid(num_buckets as i64) as usize
}
