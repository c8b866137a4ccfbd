// Copyright (c) 2026 The bloomset authors
//
// Licensed under the MIT license.

//! A fixed-size, byte-packed bit vector.

use std::fmt::Debug;

/// A densely packed vector of bits with a fixed length.
///
/// Indexing out of range is a caller bug and panics; the filter only ever
/// indexes with hash outputs already reduced modulo the bit length.
#[derive(Clone, PartialEq, Eq)]
pub struct BitVec {
    bytes: Vec<u8>,
    nbits: usize,
}

impl BitVec {
    /// Create a zeroed bit vector holding `nbits` bits.
    pub fn new(nbits: usize) -> Self {
        Self {
            bytes: vec![0; nbits.div_ceil(8)],
            nbits,
        }
    }

    /// Reconstruct a bit vector of length `nbits` from its packed bytes.
    ///
    /// Returns `None` if the byte slice doesn't hold exactly `nbits` bits.
    /// Bits past `nbits` in the last byte are cleared, keeping the
    /// population count within the bit length.
    pub fn from_bytes(bytes: &[u8], nbits: usize) -> Option<Self> {
        if bytes.len() != nbits.div_ceil(8) {
            return None;
        }
        let mut bytes = bytes.to_vec();
        if nbits % 8 != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= (1 << (nbits % 8)) - 1;
            }
        }
        Some(Self { bytes, nbits })
    }

    /// The length of the vector, in bits.
    pub fn len(&self) -> usize {
        self.nbits
    }

    /// Whether the vector has a length of zero.
    pub fn is_empty(&self) -> bool {
        self.nbits == 0
    }

    /// Reset every bit to `0`.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Set the bit at `index` to `1`. Idempotent.
    pub fn set(&mut self, index: usize) {
        assert!(
            index < self.nbits,
            "index out of bounds: the len is {} but the index is {}",
            self.nbits,
            index,
        );
        self.bytes[index / 8] |= 1 << (index % 8);
    }

    /// Whether the bit at `index` is set.
    pub fn is_set(&self, index: usize) -> bool {
        assert!(
            index < self.nbits,
            "index out of bounds: the len is {} but the index is {}",
            self.nbits,
            index,
        );
        self.bytes[index / 8] & (1 << (index % 8)) != 0
    }

    /// The number of `1` bits.
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// The number of `0` bits.
    pub fn count_zeros(&self) -> usize {
        self.nbits - self.count_ones()
    }

    /// The bitwise `OR` of two equally sized vectors.
    pub fn union(&self, other: &Self) -> Self {
        assert_eq!(
            self.nbits, other.nbits,
            "unable to union bitvecs of different lengths"
        );
        Self {
            bytes: self
                .bytes
                .iter()
                .zip(&other.bytes)
                .map(|(a, b)| a | b)
                .collect(),
            nbits: self.nbits,
        }
    }

    /// The bitwise `AND` of two equally sized vectors.
    pub fn intersection(&self, other: &Self) -> Self {
        assert_eq!(
            self.nbits, other.nbits,
            "unable to intersect bitvecs of different lengths"
        );
        Self {
            bytes: self
                .bytes
                .iter()
                .zip(&other.bytes)
                .map(|(a, b)| a & b)
                .collect(),
            nbits: self.nbits,
        }
    }

    /// The underlying packed byte storage.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Debug for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitVec({}/{})", self.count_ones(), self.nbits)
    }
}
