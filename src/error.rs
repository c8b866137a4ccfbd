// Copyright (c) 2026 The bloomset authors
//
// Licensed under the MIT license.

//! Error types for filter construction, combination and decoding.

use thiserror::Error;

use crate::hash::MAX_HASHES;

/// Result type alias for fallible filter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by filter construction, set algebra and decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The expected element count must be positive.
    #[error("expected element count must be greater than zero")]
    InvalidCapacity,

    /// The target false positive rate must lie strictly between 0 and 1.
    #[error("false positive rate {0} is outside the open interval (0, 1)")]
    InvalidRate(f64),

    /// The bit array size must be positive.
    #[error("bit array size must be greater than zero")]
    InvalidBits,

    /// The requested number of hash functions is unsupported.
    #[error("{requested} hash functions requested, supported range is 1..={max}")]
    InvalidHashes {
        /// Number of hash functions asked for.
        requested: usize,
        /// Largest supported number of hash functions.
        max: usize,
    },

    /// The operands of a union or intersection have differing bit sizes,
    /// hash counts or hash seeds.
    #[error("filters with different configurations cannot be combined")]
    Incompatible,

    /// The encoded filter ends before the declared payload.
    #[error("encoded filter truncated: expected {expected} bytes, got {actual}")]
    TruncatedData {
        /// Bytes the header promised.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// The input does not start with the filter magic bytes.
    #[error("not an encoded bloom filter")]
    InvalidMagic,

    /// The encoding version is not understood by this crate.
    #[error("unsupported encoding version {0}")]
    UnsupportedVersion(u8),
}

impl Error {
    pub(crate) fn invalid_hashes(requested: usize) -> Self {
        Error::InvalidHashes {
            requested,
            max: MAX_HASHES,
        }
    }
}
