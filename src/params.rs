// Copyright (c) 2026 The bloomset authors
//
// Licensed under the MIT license.

//! Optimal sizing of a Bloom filter for a target accuracy.

use std::f64;

use crate::error::{Error, Result};
use crate::hash::MAX_HASHES;

/// `ln 2` squared.
const LN_SQR: f64 = f64::consts::LN_2 * f64::consts::LN_2;

/// A derived `(m, k)` configuration, consumed at filter construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterParams {
    /// Bit array size, the `m` parameter.
    pub nbits: usize,
    /// Number of hash functions, the `k` parameter.
    pub nhashes: usize,
    /// Whether the derived `k` was clamped to [`MAX_HASHES`].
    ///
    /// A truncated configuration will realize a false positive rate above
    /// the requested target.
    pub truncated: bool,
}

impl FilterParams {
    /// Derive the bit array size and hash count that meet a target false
    /// positive rate for an expected element count.
    ///
    /// Both results are rounded up: undersizing either would push the
    /// realized false positive rate above the target.
    pub fn optimize(capacity: usize, fp_rate: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        if !(fp_rate > 0. && fp_rate < 1.) {
            return Err(Error::InvalidRate(fp_rate));
        }
        let nbits = optimal_bits(capacity, fp_rate);
        let nhashes = optimal_hashes(nbits, capacity);
        let truncated = nhashes > MAX_HASHES;

        Ok(Self {
            nbits,
            nhashes: nhashes.min(MAX_HASHES),
            truncated,
        })
    }
}

/// Return the optimal bit array size for a Bloom filter given an expected
/// element count and a desired false positive rate.
///
/// `m = ceil(-n * ln(p) / ln²2)`
pub fn optimal_bits(capacity: usize, fp_rate: f64) -> usize {
    (-(capacity as f64) * fp_rate.ln() / LN_SQR).ceil() as usize
}

/// Return the optimal number of hash functions for a Bloom filter given a
/// bit array size and an expected element count.
///
/// `k = ceil((m / n) * ln 2)`
pub fn optimal_hashes(nbits: usize, capacity: usize) -> usize {
    (nbits as f64 / capacity as f64 * f64::consts::LN_2).ceil() as usize
}
