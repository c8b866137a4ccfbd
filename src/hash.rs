// Copyright (c) 2026 The bloomset authors
//
// Licensed under the MIT license.

//! A family of independently seeded hash functions.
//!
//! Each member of the family is a SipHash-1-3 instance keyed with its own
//! 128-bit key, so the positions produced for one element across different
//! indices only collide by chance. The family is a pure configuration
//! artifact: it holds no mutable state and two families hash identically
//! if and only if their key sequences are equal.

use std::hash::{Hash, Hasher};

use siphasher::sip::SipHasher13;

use crate::error::{Error, Result};

/// The largest supported number of hash functions per filter.
///
/// Bounded by the built-in key table. An optimizer that derives a larger
/// `k` clamps to this value and flags the truncation, trading accuracy
/// for a bounded amount of hashing per operation.
pub const MAX_HASHES: usize = 20;

/// Built-in SipHash keys, one per possible hash function index.
const DEFAULT_KEYS: [[u8; 16]; MAX_HASHES] = [
    [155, 225, 111, 248, 177, 165, 38, 29, 213, 92, 103, 142, 146, 51, 207, 155],
    [38, 27, 210, 9, 193, 133, 207, 174, 104, 61, 83, 66, 73, 65, 73, 212],
    [240, 168, 205, 42, 24, 56, 96, 253, 30, 84, 215, 192, 172, 18, 187, 159],
    [139, 58, 158, 238, 214, 79, 31, 181, 231, 8, 52, 237, 244, 120, 88, 159],
    [85, 206, 227, 228, 114, 174, 178, 152, 48, 50, 83, 43, 38, 162, 249, 178],
    [59, 82, 165, 40, 172, 111, 210, 44, 69, 21, 111, 149, 173, 240, 164, 16],
    [218, 250, 103, 126, 235, 241, 251, 18, 173, 188, 250, 239, 20, 156, 100, 162],
    [165, 176, 215, 62, 101, 192, 126, 93, 18, 233, 90, 193, 4, 128, 2, 18],
    [61, 53, 216, 229, 252, 76, 153, 186, 225, 133, 58, 97, 160, 43, 231, 11],
    [114, 193, 236, 234, 195, 157, 252, 20, 221, 30, 72, 140, 30, 154, 71, 19],
    [43, 9, 205, 54, 219, 150, 47, 218, 244, 44, 1, 54, 22, 135, 113, 235],
    [46, 222, 122, 185, 3, 15, 205, 181, 205, 253, 42, 169, 210, 245, 36, 142],
    [244, 234, 226, 40, 196, 145, 219, 236, 2, 112, 232, 250, 33, 156, 4, 40],
    [127, 205, 95, 0, 179, 121, 156, 236, 241, 30, 250, 158, 118, 101, 164, 39],
    [73, 27, 168, 50, 63, 121, 3, 166, 119, 214, 63, 114, 59, 54, 61, 207],
    [1, 153, 169, 190, 45, 36, 28, 211, 226, 204, 181, 116, 52, 222, 49, 101],
    [228, 124, 218, 37, 128, 190, 233, 125, 229, 74, 199, 46, 119, 87, 235, 22],
    [62, 207, 76, 242, 163, 60, 134, 9, 195, 13, 157, 184, 184, 62, 166, 42],
    [25, 249, 25, 87, 208, 23, 38, 201, 234, 57, 13, 154, 236, 209, 168, 184],
    [117, 253, 6, 47, 221, 68, 63, 37, 237, 250, 221, 145, 130, 101, 238, 235],
];

/// An ordered, immutable sequence of SipHash keys.
///
/// Owned by each filter; two filters may only be unioned or intersected
/// when their families compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashFamily {
    keys: Vec<[u8; 16]>,
}

impl HashFamily {
    /// Create a family of `nhashes` functions using the built-in key table.
    ///
    /// Fails if `nhashes` is zero or exceeds [`MAX_HASHES`].
    pub fn new(nhashes: usize) -> Result<Self> {
        if nhashes == 0 || nhashes > MAX_HASHES {
            return Err(Error::invalid_hashes(nhashes));
        }
        Ok(Self {
            keys: DEFAULT_KEYS[..nhashes].to_vec(),
        })
    }

    /// Create a family from caller-supplied keys.
    ///
    /// Filters built from the same key sequence hash identically across
    /// processes, which makes them combinable after serialization.
    pub fn from_keys(keys: Vec<[u8; 16]>) -> Result<Self> {
        if keys.is_empty() || keys.len() > MAX_HASHES {
            return Err(Error::invalid_hashes(keys.len()));
        }
        Ok(Self { keys })
    }

    /// Number of hash functions in the family (the `k` parameter).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the family holds no keys. Never true for a constructed family.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The key sequence backing this family.
    pub fn keys(&self) -> &[[u8; 16]] {
        &self.keys
    }

    /// Map an element to a bit position in `[0, nbits)` using the hash
    /// function at `index`.
    ///
    /// Deterministic for a given `(element, key, nbits)` triple. The full
    /// 64-bit digest is reduced modulo `nbits`, keeping the mapping close
    /// to uniform for any `nbits` well below `2^64`.
    pub fn position<K: Hash + ?Sized>(&self, item: &K, index: usize, nbits: usize) -> usize {
        let mut hasher = SipHasher13::new_with_key(&self.keys[index]);
        item.hash(&mut hasher);

        (hasher.finish() % nbits as u64) as usize
    }
}
