//! A simple example showing the use of a Bloom filter.
use bloomset::{BloomFilter, Result};

fn main() -> Result<()> {
    let mut bf = BloomFilter::with_rate(128, 0.01)?;

    bf.insert(&"foo");
    bf.insert(&"bar");

    bf.contains(&"foo"); // true
    bf.contains(&"bar"); // true
    bf.contains(&"baz"); // false

    println!("items: ~{}", bf.count());
    println!("fill ratio: {:.4}", bf.fill_ratio());
    println!("expected false positive rate: {:.6}", bf.expected_fp_rate());

    Ok(())
}
