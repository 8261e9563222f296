//! Enumeration parameters and validation.
//!
//! All configuration errors are reported here, before any I/O happens.

use crate::{
    dna::KmerLength,
    error::BifrustError,
};

/// Validated parameters for a vertex enumeration run.
#[derive(Debug, Clone)]
pub struct EnumerateParams {
    /// Vertex length k.
    pub k: KmerLength,
    /// Bloom filter size in bits.
    pub filter_bits: u64,
    /// Number of hash functions over each edge.
    pub num_hashes: usize,
    /// Number of rounds partitioning the reference-hash space.
    pub rounds: u64,
    /// Seed for the hash tables and the reference hash.
    pub seed: u64,
    /// Suppress progress diagnostics.
    pub quiet: bool,
}

impl EnumerateParams {
    /// Validates and assembles run parameters.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `k` is out of range, or if the
    /// filter size, hash count, or round count is zero.
    pub fn new(
        k: usize,
        filter_bits: u64,
        num_hashes: usize,
        rounds: u64,
        seed: u64,
    ) -> Result<Self, BifrustError> {
        let k = KmerLength::new(k)?;
        if filter_bits == 0 {
            return Err(BifrustError::FilterSize);
        }
        if num_hashes == 0 {
            return Err(BifrustError::HashCount);
        }
        if rounds == 0 {
            return Err(BifrustError::Rounds);
        }
        Ok(Self {
            k,
            filter_bits,
            num_hashes,
            rounds,
            seed,
            quiet: false,
        })
    }

    /// Sets whether progress diagnostics are suppressed.
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_accept_valid_arguments() {
        let params = EnumerateParams::new(21, 1 << 20, 4, 3, 42).unwrap();
        assert_eq!(params.k.get(), 21);
        assert_eq!(params.filter_bits, 1 << 20);
        assert_eq!(params.num_hashes, 4);
        assert_eq!(params.rounds, 3);
        assert_eq!(params.seed, 42);
        assert!(!params.quiet);
    }

    #[test]
    fn params_reject_k_zero() {
        assert!(matches!(
            EnumerateParams::new(0, 1024, 4, 1, 0),
            Err(BifrustError::InvalidKmerLength { k: 0, .. })
        ));
    }

    #[test]
    fn params_reject_k_past_edge_capacity() {
        assert!(matches!(
            EnumerateParams::new(32, 1024, 4, 1, 0),
            Err(BifrustError::InvalidKmerLength { k: 32, .. })
        ));
    }

    #[test]
    fn params_reject_zero_filter_bits() {
        assert!(matches!(
            EnumerateParams::new(21, 0, 4, 1, 0),
            Err(BifrustError::FilterSize)
        ));
    }

    #[test]
    fn params_reject_zero_hash_functions() {
        assert!(matches!(
            EnumerateParams::new(21, 1024, 0, 1, 0),
            Err(BifrustError::HashCount)
        ));
    }

    #[test]
    fn params_reject_zero_rounds() {
        assert!(matches!(
            EnumerateParams::new(21, 1024, 4, 0, 0),
            Err(BifrustError::Rounds)
        ));
    }

    #[test]
    fn quiet_is_a_builder_toggle() {
        let params = EnumerateParams::new(5, 1024, 2, 1, 0)
            .unwrap()
            .with_quiet(true);
        assert!(params.quiet);
    }
}
