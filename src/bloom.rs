//! Bloom filter over edge hashes.
//!
//! A plain m-bit filter: insertion sets one bit per hash value, membership
//! requires all of them. The bit array is `AtomicU64` words with relaxed
//! `fetch_or`, so the build pass can run across records in parallel; bits
//! only ever transition from 0 to 1, and the filter is read-only once built.
//! No false negatives, tunable false positives.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BifrustError;

/// Fixed-size Bloom filter addressed by precomputed 64-bit hash values.
#[derive(Debug)]
pub struct BloomFilter {
    words: Vec<AtomicU64>,
    num_bits: u64,
}

impl BloomFilter {
    /// Allocates a filter of `num_bits` bits, all clear.
    pub fn new(num_bits: u64) -> Result<Self, BifrustError> {
        if num_bits == 0 {
            return Err(BifrustError::FilterSize);
        }
        let num_words = usize::try_from(num_bits.div_ceil(64)).map_err(|_| BifrustError::FilterSize)?;
        let mut words = Vec::with_capacity(num_words);
        words.resize_with(num_words, || AtomicU64::new(0));
        Ok(Self { words, num_bits })
    }

    /// The configured filter size in bits.
    #[must_use]
    pub const fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Sets the bit for every hash value.
    pub fn insert(&self, hashes: &[u64]) {
        for &hash in hashes {
            let pos = hash % self.num_bits;
            self.words[(pos / 64) as usize].fetch_or(1 << (pos % 64), Ordering::Relaxed);
        }
    }

    /// Returns true iff every hash value's bit is set.
    #[must_use]
    pub fn contains(&self, hashes: &[u64]) -> bool {
        hashes.iter().all(|&hash| {
            let pos = hash % self.num_bits;
            self.words[(pos / 64) as usize].load(Ordering::Relaxed) & (1 << (pos % 64)) != 0
        })
    }

    /// Number of set bits, for fill-ratio diagnostics.
    #[must_use]
    pub fn ones(&self) -> u64 {
        self.words
            .iter()
            .map(|word| u64::from(word.load(Ordering::Relaxed).count_ones()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_bits_is_a_configuration_error() {
        assert!(matches!(
            BloomFilter::new(0),
            Err(BifrustError::FilterSize)
        ));
    }

    #[test]
    fn fresh_filter_contains_nothing() {
        let filter = BloomFilter::new(128).unwrap();
        assert!(!filter.contains(&[1, 2, 3]));
        assert_eq!(filter.ones(), 0);
    }

    #[test]
    fn inserted_hashes_are_always_found() {
        let filter = BloomFilter::new(1 << 12).unwrap();
        let items: Vec<Vec<u64>> = (0..200u64)
            .map(|i| vec![i.wrapping_mul(0x9e37_79b9_7f4a_7c15), i ^ 0xdead_beef, i << 3])
            .collect();
        for hashes in &items {
            filter.insert(hashes);
        }
        for hashes in &items {
            assert!(filter.contains(hashes));
        }
    }

    #[test]
    fn membership_requires_every_bit() {
        let filter = BloomFilter::new(1 << 10).unwrap();
        filter.insert(&[5, 17]);
        assert!(filter.contains(&[5, 17]));
        assert!(!filter.contains(&[5, 18]));
    }

    #[test]
    fn positions_wrap_modulo_filter_size() {
        let filter = BloomFilter::new(10).unwrap();
        filter.insert(&[3, 13, u64::MAX]);
        assert!(filter.contains(&[3]));
        assert!(filter.contains(&[13]));
        assert!(filter.ones() <= 3);
    }

    #[test]
    fn empty_hash_slice_is_vacuously_contained() {
        let filter = BloomFilter::new(64).unwrap();
        assert!(filter.contains(&[]));
    }
}
