//! Integer mixers and the hashing plumbing for the BGP value types.
//!
//! The values in this crate are used as keys in very large hash tables
//! (prefixes seen in a full table, origin ASes, peers), so every key type
//! computes a single, already well distributed, integer. The
//! [`BuildKeyHasher`] only spreads that integer over all 64 bits, instead
//! of running it through SipHash a second time.

use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hasher};

//------------ Mixers --------------------------------------------------------

/// Thomas Wang's 32-bit integer hash.
///
/// Adjacent inputs (e.g. the network addresses of two neighbouring /24s)
/// end up far apart in the output space.
#[inline]
pub const fn wang_hash32(key: u32) -> u32 {
    let mut key = key;
    key = key.wrapping_add(!(key << 15));
    key ^= key >> 10;
    key = key.wrapping_add(key << 3);
    key ^= key >> 6;
    key = key.wrapping_add(!(key << 11));
    key ^= key >> 16;
    key
}

/// Thomas Wang's 64-bit integer hash.
#[inline]
pub const fn wang_hash64(key: u64) -> u64 {
    let mut key = key;
    key = (!key).wrapping_add(key << 21);
    key ^= key >> 24;
    key = key.wrapping_add(key << 3).wrapping_add(key << 8);
    key ^= key >> 14;
    key = key.wrapping_add(key << 2).wrapping_add(key << 4);
    key ^= key >> 28;
    key = key.wrapping_add(key << 31);
    key
}

//------------ KeyHash (trait) -----------------------------------------------

/// A type that can produce its own mixed hash value.
///
/// Implementors guarantee that `a == b` implies
/// `a.key_hash() == b.key_hash()`. The `std::hash::Hash` impls of the
/// value types in this crate write exactly this value, and nothing else.
pub trait KeyHash {
    fn key_hash(&self) -> u64;
}

//------------ KeyHasher -----------------------------------------------------

/// A [`Hasher`] for keys that already produce a mixed `u64`.
///
/// Only meant for the key types of this crate, which write a single,
/// pre-mixed `u64`. Anything else written into it is folded through
/// [`wang_hash64`], so it still works (slowly) for other types.
///
/// Several key hashes are 32-bit mixes widened to `u64`. `finish`
/// multiplies the state by an odd 64-bit constant, so the top bits, that
/// `HashMap` uses for its control bytes, depend on every bit of the key.
/// The multiplication is a bijection, so no two states collide.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyHasher {
    state: u64,
    written: bool,
}

/// 2^64 divided by the golden ratio, rounded to odd.
const SPREAD: u64 = 0x9e37_79b9_7f4a_7c15;

impl KeyHasher {
    fn fold(&mut self, value: u64) {
        if self.written {
            self.state = wang_hash64(self.state ^ value);
        } else {
            self.state = value;
            self.written = true;
        }
    }
}

impl Hasher for KeyHasher {
    fn finish(&self) -> u64 {
        self.state.wrapping_mul(SPREAD)
    }

    fn write(&mut self, bytes: &[u8]) {
        for chunk in bytes.chunks(8) {
            let mut buf = [0_u8; 8];
            if let Some(dst) = buf.get_mut(..chunk.len()) {
                dst.copy_from_slice(chunk);
            }
            self.fold(wang_hash64(u64::from_le_bytes(buf)));
        }
    }

    fn write_u64(&mut self, value: u64) {
        self.fold(value);
    }
}

/// The `BuildHasher` to use for hash tables keyed on the value types.
pub type BuildKeyHasher = BuildHasherDefault<KeyHasher>;

/// A `HashMap` using the [`KeyHasher`].
pub type KeyHashMap<K, V> = HashMap<K, V, BuildKeyHasher>;

/// A `HashSet` using the [`KeyHasher`].
pub type KeyHashSet<K> = HashSet<K, BuildKeyHasher>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::BuildHasher;

    #[test]
    fn wang32_known_values() {
        assert_eq!(wang_hash32(0), wang_hash32(0));
        assert_ne!(wang_hash32(1), wang_hash32(2));
        // zero does not map to zero, so the constant 0 used for short AS
        // strings still lands somewhere in the middle of the table.
        assert_ne!(wang_hash32(0), 0);
    }

    #[test]
    fn wang64_spreads_adjacent_keys() {
        let a = wang_hash64(0x0a00_0000_0000_0000);
        let b = wang_hash64(0x0a00_0001_0000_0000);
        assert_ne!(a, b);
        // more than a handful of bits must flip
        assert!((a ^ b).count_ones() > 8);
    }

    #[test]
    fn key_hasher_is_a_function_of_the_key() {
        let build = BuildKeyHasher::default();
        assert_eq!(
            build.hash_one(0xdead_beef_u64),
            build.hash_one(0xdead_beef_u64)
        );
        assert_ne!(
            build.hash_one(0xdead_beef_u64),
            build.hash_one(0xdead_bef0_u64)
        );
        assert_eq!(
            build.hash_one(0xdead_beef_u64),
            0xdead_beef_u64.wrapping_mul(SPREAD)
        );
    }

    #[test]
    fn key_hasher_fills_top_bits_for_32_bit_keys() {
        let build = BuildKeyHasher::default();
        let tags: HashSet<u64> = (0..1024_u32)
            .map(|i| build.hash_one(u64::from(wang_hash32(i))) >> 57)
            .collect();
        // 7-bit tags, 128 possible values
        assert!(tags.len() > 100, "only {} distinct tags", tags.len());
    }

    #[test]
    fn zero_first_component_still_mixes() {
        let build = BuildKeyHasher::default();
        let mut a = build.build_hasher();
        a.write_u64(0);
        a.write_u64(7);
        let mut b = build.build_hasher();
        b.write_u64(7);
        assert_ne!(a.finish(), b.finish());
    }
}
