//! A space-efficient probabilistic set-membership structure: the Bloom
//! filter, with derived sizing, set algebra and cardinality estimation.
//!
//! # Bloom Filters
//!
//! A Bloom filter is a space-efficient probabilistic data structure that is
//! used to test whether an element is a member of a set. It allows for queries
//! to return: "possibly in set" or "definitely not in set". Elements can be
//! added to the set, but not removed; the more elements that are added to the
//! set, the larger the probability of false positives. It has been shown that
//! fewer than 10 bits per element are required for a 1% false positive
//! probability, independent of the size or number of elements in the set.
//!
//! A filter is created either from an approximate number of expected items
//! and a target false positive probability, from which the optimal bit array
//! size `m` and hash count `k` are derived, or from explicit `(m, k)`
//! parameters. Two filters built with the same `(m, k)` and hash seeds can
//! be combined by union and intersection, and the approximate number of
//! items in a filter can be estimated from its fill ratio.
//!
//! # Hashing
//!
//! Each of the `k` bit positions for an element is produced by its own
//! SipHash-1-3 instance, keyed with a distinct 128-bit seed from the
//! filter's hash family. Hashing is fully deterministic given the seed
//! table, so filters serialized in one process remain queryable and
//! combinable in another.
//!
//! # Concurrency
//!
//! Every operation is synchronous and runs to completion; the only mutable
//! state is the bit array and the insertion counter, and mutation requires
//! `&mut self`, so shared read-only access from multiple threads is safe
//! whenever `K` is `Send + Sync`.
//!
//! # Example
//!
//! ```
//! use bloomset::BloomFilter;
//!
//! let mut filter = BloomFilter::with_rate(100, 0.01)?;
//!
//! filter.insert(&"apple");
//! filter.insert(&"banana");
//! filter.insert(&"cherry");
//!
//! assert!(filter.contains(&"apple"));
//! assert_eq!(filter.count(), 3);
//! # Ok::<(), bloomset::Error>(())
//! ```
#![warn(missing_docs)]
#![allow(clippy::bool_assert_comparison)]

pub mod bitvec;
pub mod bloom;
pub mod error;
pub mod hash;
pub mod params;

pub use bloom::{BloomFilter, DEFAULT_FALSE_POSITIVE_RATE};
pub use error::{Error, Result};
pub use hash::{HashFamily, MAX_HASHES};
pub use params::FilterParams;
