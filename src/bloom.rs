// Copyright (c) 2026 The bloomset authors
//
// Licensed under the MIT license.

//! A Bloom filter built from a seeded hash family and a packed bit vector.

use std::hash::Hash;
use std::marker::PhantomData;

use crate::bitvec::BitVec;
use crate::error::{Error, Result};
use crate::hash::HashFamily;
use crate::params::FilterParams;

/// The default false positive probability value, 1%.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// Magic bytes prefixing an encoded filter.
const MAGIC: [u8; 4] = *b"BSET";
/// Current encoding version.
const VERSION: u8 = 1;
/// Bytes preceding the key table in an encoded filter.
const HEADER_LEN: usize = 4 + 1 + 1 + 8 + 8;

/// A Bloom filter that keeps track of items of type `K`.
///
/// Supports membership queries with no false negatives and a bounded
/// false positive rate, plus union and intersection over filters built
/// with the same configuration.
#[derive(Clone, Debug)]
pub struct BloomFilter<K> {
    bits: BitVec,
    family: HashFamily,
    ninserts: u64,
    truncated: bool,
    key: PhantomData<K>,
}

impl<K: Hash> BloomFilter<K> {
    /// Return a new Bloom filter with a given approximate item capacity.
    /// The false positive probability is [`DEFAULT_FALSE_POSITIVE_RATE`].
    pub fn new(capacity: usize) -> Result<BloomFilter<K>> {
        BloomFilter::with_rate(capacity, DEFAULT_FALSE_POSITIVE_RATE)
    }

    /// Return a new Bloom filter with a given approximate item capacity
    /// and a desired false positive rate.
    ///
    /// The bit array size and hash count are derived with
    /// [`FilterParams::optimize`]; a hash count clamped to the seed table
    /// is reported by [`truncated()`][Self::truncated].
    pub fn with_rate(capacity: usize, fp_rate: f64) -> Result<BloomFilter<K>> {
        let params = FilterParams::optimize(capacity, fp_rate)?;
        let family = HashFamily::new(params.nhashes)?;

        Ok(BloomFilter {
            bits: BitVec::new(params.nbits),
            family,
            ninserts: 0,
            truncated: params.truncated,
            key: PhantomData,
        })
    }

    /// Return a new Bloom filter with an explicit bit array size and hash
    /// function count.
    ///
    /// Unlike the optimizer path, an unsupported `nhashes` is rejected
    /// rather than clamped.
    pub fn with_params(nbits: usize, nhashes: usize) -> Result<BloomFilter<K>> {
        Self::with_hash_family(nbits, HashFamily::new(nhashes)?)
    }

    /// Return a new Bloom filter with an explicit bit array size and hash
    /// family.
    ///
    /// Filters built from equal families are union/intersection-compatible,
    /// across processes included.
    pub fn with_hash_family(nbits: usize, family: HashFamily) -> Result<BloomFilter<K>> {
        if nbits == 0 {
            return Err(Error::InvalidBits);
        }
        Ok(BloomFilter {
            bits: BitVec::new(nbits),
            family,
            ninserts: 0,
            truncated: false,
            key: PhantomData,
        })
    }

    /// Set an item in the Bloom filter. This operation is idempotent with
    /// regards to each unique item's bits, while the insertion counter is
    /// incremented on every call, duplicates included.
    pub fn insert(&mut self, item: &K) {
        let nbits = self.bits.len();

        for i in 0..self.family.len() {
            let index = self.family.position(item, i, nbits);
            self.bits.set(index);
        }
        self.ninserts += 1;
    }

    /// Return whether or not a given item is likely in the Bloom filter.
    /// There is a possibility for a false positive, with the probability
    /// bounded by the filter's configured rate, but a false negative will
    /// never occur.
    ///
    /// Short-circuits on the first unset bit.
    pub fn contains(&self, item: &K) -> bool {
        let nbits = self.bits.len();

        for i in 0..self.family.len() {
            let index = self.family.position(item, i, nbits);
            if !self.bits.is_set(index) {
                return false;
            }
        }
        true
    }

    /// Reset all bits and the insertion counter. The bit array size, hash
    /// count and seeds are untouched.
    pub fn clear(&mut self) {
        self.bits.clear();
        self.ninserts = 0;
    }

    /// Return the number of bits in this filter (the `m` parameter).
    pub fn bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of hashes used (the `k` parameter).
    pub fn hashes(&self) -> usize {
        self.family.len()
    }

    /// The hash family owned by this filter.
    pub fn hash_family(&self) -> &HashFamily {
        &self.family
    }

    /// Number of `insert` calls since construction or the last `clear`.
    ///
    /// An insertion counter, not a distinct-element counter: duplicate
    /// inserts are included. After a union this is the saturating sum of
    /// both operands' counters, after an intersection the minimum; both
    /// are approximations.
    pub fn insertions(&self) -> u64 {
        self.ninserts
    }

    /// Whether the derived hash count was clamped to the seed table during
    /// construction. A truncated filter realizes a false positive rate
    /// above the requested target.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// The fraction of bits currently set, in `[0, 1]`.
    pub fn fill_ratio(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    /// The expected false positive rate at the current fill ratio,
    /// `fill_ratio^k`.
    ///
    /// An estimate assuming uniform bit occupancy; the empirically observed
    /// rate under a specific workload can diverge.
    pub fn expected_fp_rate(&self) -> f64 {
        self.fill_ratio().powi(self.family.len() as i32)
    }

    /// Count the approximate number of items in the filter,
    /// `round(-(m/k) * ln(1 - fill_ratio))`.
    ///
    /// Returns `0` for an empty filter and `usize::MAX` at full saturation,
    /// where the estimator diverges.
    pub fn count(&self) -> usize {
        let nbits_set = self.bits.count_ones();
        if nbits_set == 0 {
            return 0;
        }
        if nbits_set >= self.bits.len() {
            return usize::MAX;
        }
        let nbits = self.bits.len() as f64;
        let nhashes = self.family.len() as f64;
        let count = -(nbits / nhashes) * (1. - (nbits_set as f64 / nbits)).ln();

        count.round() as usize
    }

    /// Compute the approximate similarity between two filters using the
    /// Jaccard index.
    pub fn similarity(&self, other: &Self) -> Result<f64> {
        let intersection = self.intersection(other)?.count() as f64;
        let union = self.union(other)?.count() as f64;

        Ok(intersection / union)
    }

    /// Compute the approximate overlap between two filters using the
    /// overlap coefficient.
    pub fn overlap(&self, other: &Self) -> Result<f64> {
        let intersection = self.intersection(other)?.count() as f64;
        let smallest = usize::min(self.count(), other.count()) as f64;

        Ok(intersection / smallest)
    }

    /// Compute the union of two Bloom filters.
    ///
    /// The result answers positively for any item either operand answers
    /// positively for. Its insertion counter is the saturating sum of both
    /// operands' counters. Fails with [`Error::Incompatible`] when the
    /// configurations differ; no partial result is produced.
    pub fn union(&self, other: &Self) -> Result<Self> {
        if !self.is_comparable(other) {
            return Err(Error::Incompatible);
        }
        Ok(Self {
            bits: self.bits.union(&other.bits),
            family: self.family.clone(),
            ninserts: self.ninserts.saturating_add(other.ninserts),
            truncated: self.truncated || other.truncated,
            key: PhantomData,
        })
    }

    /// Compute the intersection of two Bloom filters.
    ///
    /// The result answers positively for items inserted into both operands.
    /// Its insertion counter is the minimum of both operands' counters, a
    /// conservative approximation. Fails with [`Error::Incompatible`] when
    /// the configurations differ.
    pub fn intersection(&self, other: &Self) -> Result<Self> {
        if !self.is_comparable(other) {
            return Err(Error::Incompatible);
        }
        Ok(Self {
            bits: self.bits.intersection(&other.bits),
            family: self.family.clone(),
            ninserts: u64::min(self.ninserts, other.ninserts),
            truncated: self.truncated || other.truncated,
            key: PhantomData,
        })
    }

    /// Check whether two filters can be compared, intersected and unioned:
    /// equal bit array sizes, hash counts and hash seeds.
    pub fn is_comparable(&self, other: &Self) -> bool {
        self.bits.len() == other.bits.len() && self.family == other.family
    }

    /// Return the underlying bit storage as packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_bytes()
    }

    /// Encode the filter, its parameters and its seed table into a
    /// self-describing byte vector.
    ///
    /// A filter decoded with [`from_bytes`][Self::from_bytes] answers
    /// `contains` identically and stays combinable with filters sharing
    /// the configuration.
    pub fn to_bytes(&self) -> Vec<u8> {
        let keys = self.family.keys();
        let mut bytes =
            Vec::with_capacity(HEADER_LEN + keys.len() * 16 + self.bits.as_bytes().len());

        bytes.extend_from_slice(&MAGIC);
        bytes.push(VERSION);
        bytes.push(keys.len() as u8);
        bytes.extend_from_slice(&(self.bits.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&self.ninserts.to_le_bytes());
        for key in keys {
            bytes.extend_from_slice(key);
        }
        bytes.extend_from_slice(self.bits.as_bytes());
        bytes
    }

    /// Decode a filter produced by [`to_bytes`][Self::to_bytes].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::TruncatedData {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        if bytes[..4] != MAGIC {
            return Err(Error::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(Error::UnsupportedVersion(bytes[4]));
        }
        let nhashes = bytes[5] as usize;
        let nbits = u64::from_le_bytes(bytes[6..14].try_into().expect("8-byte slice")) as usize;
        let ninserts = u64::from_le_bytes(bytes[14..22].try_into().expect("8-byte slice"));
        if nbits == 0 {
            return Err(Error::InvalidBits);
        }

        let expected = HEADER_LEN + nhashes * 16 + nbits.div_ceil(8);
        if bytes.len() != expected {
            return Err(Error::TruncatedData {
                expected,
                actual: bytes.len(),
            });
        }
        let keys = bytes[HEADER_LEN..HEADER_LEN + nhashes * 16]
            .chunks_exact(16)
            .map(|chunk| chunk.try_into().expect("16-byte chunk"))
            .collect();
        let family = HashFamily::from_keys(keys)?;
        let bits = BitVec::from_bytes(&bytes[HEADER_LEN + nhashes * 16..], nbits)
            .expect("length verified above");

        Ok(Self {
            bits,
            family,
            ninserts,
            truncated: false,
            key: PhantomData,
        })
    }
}

impl<K> AsRef<[u8]> for BloomFilter<K> {
    fn as_ref(&self) -> &[u8] {
        self.bits.as_bytes()
    }
}

impl<K> PartialEq for BloomFilter<K> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits && self.family == other.family && self.ninserts == other.ninserts
    }
}

impl<K> Eq for BloomFilter<K> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::MAX_HASHES;
    use std::collections::HashSet;
    use std::iter;

    fn key() -> String {
        let rng = fastrand::Rng::new();
        iter::repeat_with(|| rng.alphanumeric()).take(32).collect()
    }

    fn items(size: usize) -> Vec<String> {
        let mut items = HashSet::<String>::new();
        while items.len() < size {
            items.insert(key());
        }
        items.into_iter().collect()
    }

    #[test]
    fn test_no_false_negatives() {
        let n = 1024;
        let items = items(n);
        let mut bf = BloomFilter::<String>::new(items.len()).unwrap();

        for item in items.iter() {
            bf.insert(item);

            assert_eq!(
                bf.contains(item),
                true,
                "item {} should result in a positive inclusion",
                item,
            );
        }

        // Items inserted earlier are still present after later inserts.
        for item in items.iter() {
            assert_eq!(bf.contains(item), true);
        }
    }

    #[test]
    fn test_construction_rejects_invalid_input() {
        assert!(BloomFilter::<String>::new(0).is_err());
        assert!(BloomFilter::<String>::with_rate(100, 0.).is_err());
        assert!(BloomFilter::<String>::with_rate(100, 1.).is_err());
        assert!(BloomFilter::<String>::with_params(0, 5).is_err());
        assert!(BloomFilter::<String>::with_params(100, 0).is_err());
        assert!(BloomFilter::<String>::with_params(100, MAX_HASHES + 1).is_err());
    }

    #[test]
    fn test_derived_parameters() {
        let bf = BloomFilter::<String>::with_rate(1000, 0.01).unwrap();

        assert_eq!(bf.bits(), 9586);
        assert_eq!(bf.hashes(), 7);
        assert!(!bf.truncated());
    }

    #[test]
    fn test_truncated_hash_count_is_flagged() {
        let bf = BloomFilter::<String>::with_rate(100, 1e-7).unwrap();

        assert_eq!(bf.hashes(), MAX_HASHES);
        assert!(bf.truncated());
    }

    #[test]
    fn test_insertions_counts_duplicates() {
        let mut bf = BloomFilter::<&str>::new(128).unwrap();
        assert_eq!(bf.insertions(), 0);

        bf.insert(&"foo");
        bf.insert(&"foo");
        bf.insert(&"bar");

        assert_eq!(bf.insertions(), 3);
    }

    #[test]
    fn test_repeat_insert_is_idempotent_on_bits() {
        let mut bf = BloomFilter::<&str>::new(128).unwrap();

        bf.insert(&"foo");
        let ratio = bf.fill_ratio();

        bf.insert(&"foo");
        assert_eq!(bf.fill_ratio(), ratio);
        assert!(bf.contains(&"foo"));
    }

    #[test]
    fn test_fill_ratio_is_monotonic() {
        let mut bf = BloomFilter::<String>::new(512).unwrap();
        let mut previous = bf.fill_ratio();
        assert_eq!(previous, 0.);

        for item in items(256) {
            bf.insert(&item);

            let ratio = bf.fill_ratio();
            assert!(ratio >= previous);
            previous = ratio;
        }
        assert!(previous > 0. && previous < 1.);
    }

    #[test]
    fn test_clear() {
        let mut bf = BloomFilter::<&str>::new(64).unwrap();
        let (nbits, nhashes) = (bf.bits(), bf.hashes());

        bf.insert(&"foo");
        bf.clear();

        assert_eq!(bf.fill_ratio(), 0.);
        assert_eq!(bf.insertions(), 0);
        assert_eq!(bf.count(), 0);
        assert!(!bf.contains(&"foo"));
        assert_eq!((bf.bits(), bf.hashes()), (nbits, nhashes));
    }

    #[test]
    fn test_membership_scenario() {
        let mut bf = BloomFilter::<String>::with_rate(100, 0.01).unwrap();

        for fruit in ["apple", "banana", "cherry"] {
            bf.insert(&fruit.to_owned());
        }
        assert!(bf.contains(&"apple".to_owned()));
        assert!(bf.contains(&"banana".to_owned()));
        assert!(bf.contains(&"cherry".to_owned()));

        // A large never-inserted probe batch stays well under 5% positives.
        let positives = (0..10_000)
            .filter(|i| bf.contains(&format!("x{}", i)))
            .count();
        assert!(
            positives <= 500,
            "{} positives out of 10000 probes",
            positives
        );
    }

    #[test]
    fn test_false_positive_rate_is_bounded() {
        let (n, rate) = (1000, 0.01);
        let mut bf = BloomFilter::<String>::with_rate(n, rate).unwrap();

        for i in 0..n {
            bf.insert(&format!("element_{}", i));
        }

        let probes = 10_000;
        let false_positives = (0..probes)
            .filter(|i| bf.contains(&format!("probe_{}", i)))
            .count();
        let observed = false_positives as f64 / probes as f64;

        // Within ~2x of the target, with slack for sampling noise.
        assert!(
            observed < rate * 2.5,
            "observed false positive rate {} exceeds target {}",
            observed,
            rate,
        );
    }

    #[test]
    fn test_union() {
        let a_items = items(128);
        let mut a = BloomFilter::<String>::new(256).unwrap();
        for item in &a_items {
            a.insert(item);
        }

        let b_items = items(128);
        let mut b = BloomFilter::new(256).unwrap();
        for item in &b_items {
            b.insert(item);
        }

        let union = a.union(&b).unwrap();
        for item in a_items.iter().chain(b_items.iter()) {
            assert!(union.contains(item));
        }
        assert_eq!(union.insertions(), a.insertions() + b.insertions());

        // The union's bit population is the OR of both, not the sum.
        assert_eq!(
            union.bits.count_ones(),
            a.bits.union(&b.bits).count_ones()
        );
        assert!(union.bits.count_ones() <= a.bits.count_ones() + b.bits.count_ones());
    }

    #[test]
    fn test_intersection() {
        let mut a = BloomFilter::<u8>::new(32).unwrap();
        let mut b = a.clone();

        a.insert(&1);
        a.insert(&2);
        a.insert(&3);

        b.insert(&3);
        b.insert(&4);
        b.insert(&5);

        let intersection = a.intersection(&b).unwrap();

        assert!(!intersection.contains(&1));
        assert!(!intersection.contains(&2));
        assert!(intersection.contains(&3));
        assert!(!intersection.contains(&4));
        assert!(!intersection.contains(&5));
        assert_eq!(intersection.insertions(), 3);
    }

    #[test]
    fn test_incompatible_filters_are_rejected() {
        let a = BloomFilter::<String>::with_params(100, 5).unwrap();
        let b = BloomFilter::<String>::with_params(200, 5).unwrap();
        let c = BloomFilter::<String>::with_params(100, 7).unwrap();

        assert!(!a.is_comparable(&b));
        assert_eq!(a.union(&b), Err(Error::Incompatible));
        assert_eq!(a.intersection(&b), Err(Error::Incompatible));
        assert_eq!(a.union(&c), Err(Error::Incompatible));

        // Same (m, k) but differing seeds is just as incompatible.
        let family = HashFamily::from_keys(vec![[1; 16], [2; 16], [3; 16], [4; 16], [5; 16]])
            .unwrap();
        let d = BloomFilter::<String>::with_hash_family(100, family).unwrap();
        assert_eq!(a.union(&d), Err(Error::Incompatible));
    }

    #[test]
    fn test_count() {
        let mut a = BloomFilter::<u16>::new(4096).unwrap();

        for i in 0..12 {
            a.insert(&i);
        }
        assert_eq!(a.count(), 12);

        for i in 0..2048 {
            a.insert(&i);
        }
        let count = a.count() as i64;
        assert!((count - 2048).abs() <= 64, "estimate {} too far off", count);
    }

    #[test]
    fn test_count_boundaries() {
        let mut bf = BloomFilter::<u8>::with_params(16, 2).unwrap();
        assert_eq!(bf.count(), 0);

        // Saturate the bit array directly; the estimator is undefined at
        // fill ratio 1 and must report the sentinel instead.
        for i in 0..16 {
            bf.bits.set(i);
        }
        assert_eq!(bf.count(), usize::MAX);
        assert_eq!(bf.fill_ratio(), 1.);
        assert_eq!(bf.expected_fp_rate(), 1.);
    }

    #[test]
    fn test_expected_fp_rate() {
        let mut bf = BloomFilter::<String>::with_rate(1000, 0.01).unwrap();
        assert_eq!(bf.expected_fp_rate(), 0.);

        for item in items(1000) {
            bf.insert(&item);
        }
        let expected = bf.expected_fp_rate();
        assert!(expected > 0. && expected < 0.05);
    }

    #[test]
    fn test_similarity_and_overlap() {
        let mut a = BloomFilter::<i32>::new(2048).unwrap();
        let mut b = BloomFilter::<i32>::new(2048).unwrap();

        for i in 0..128 {
            a.insert(&i);
        }
        for i in 64..128 {
            b.insert(&i);
        }

        // Jaccard index 64/128, overlap coefficient 64/64; the estimators
        // introduce a little noise around both.
        let similarity = a.similarity(&b).unwrap();
        let overlap = a.overlap(&b).unwrap();
        assert!((similarity - 0.5).abs() < 0.05, "similarity {}", similarity);
        assert!((overlap - 1.0).abs() < 0.05, "overlap {}", overlap);

        assert_eq!(a.similarity(&a).unwrap(), 1.0);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut bf = BloomFilter::<String>::with_rate(100, 0.01).unwrap();
        for item in items(50) {
            bf.insert(&item);
        }

        let decoded = BloomFilter::<String>::from_bytes(&bf.to_bytes()).unwrap();
        assert_eq!(decoded, bf);
        assert_eq!(decoded.bits(), bf.bits());
        assert_eq!(decoded.hashes(), bf.hashes());
        assert_eq!(decoded.insertions(), bf.insertions());

        // A decoded filter stays combinable with the original.
        assert!(bf.is_comparable(&decoded));
        assert!(bf.union(&decoded).is_ok());
    }

    #[test]
    fn test_deserialization_rejects_malformed_input() {
        let bf = BloomFilter::<String>::new(64).unwrap();
        let bytes = bf.to_bytes();

        assert_eq!(
            BloomFilter::<String>::from_bytes(&bytes[..8]),
            Err(Error::TruncatedData {
                expected: 22,
                actual: 8
            })
        );
        assert_eq!(
            BloomFilter::<String>::from_bytes(&bytes[..bytes.len() - 1]),
            Err(Error::TruncatedData {
                expected: bytes.len(),
                actual: bytes.len() - 1
            })
        );

        let mut wrong_magic = bytes.clone();
        wrong_magic[0] = b'X';
        assert_eq!(
            BloomFilter::<String>::from_bytes(&wrong_magic),
            Err(Error::InvalidMagic)
        );

        let mut wrong_version = bytes;
        wrong_version[4] = 9;
        assert_eq!(
            BloomFilter::<String>::from_bytes(&wrong_version),
            Err(Error::UnsupportedVersion(9))
        );
    }
}
