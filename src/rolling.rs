//! Rolling edge hashing.
//!
//! A bank of q independent cyclic polynomial (Buzhash-style) hashers over a
//! sliding window of width k+1. Each hasher keeps forward and
//! reverse-complement strand hashes rolled together and reports the
//! strand-independent minimum of the two, so an edge hashes identically no
//! matter which strand it was observed on.
//!
//! The same family has a block form over a packed word, used by the degree
//! test to probe edges that were never streamed. Streaming and block values
//! are bit-identical, which is what makes the Bloom filter sound: whatever
//! the build pass inserted, the query pass can find.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dna::{Base, PackedDna};

/// Seeded bank of q cyclic polynomial hash functions over edge windows.
#[derive(Debug, Clone)]
pub struct EdgeHasher {
    width: usize,
    tables: Vec<[u64; 4]>,
}

impl EdgeHasher {
    /// Creates a bank of `num_hashes` functions over windows of `width`
    /// bases, with per-base mixing tables drawn from `seed`.
    #[must_use]
    pub fn new(width: usize, num_hashes: usize, seed: u64) -> Self {
        assert!(
            (1..=PackedDna::CAPACITY).contains(&width),
            "edge window width out of range"
        );
        assert!(num_hashes >= 1, "hash bank needs at least one function");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tables = (0..num_hashes)
            .map(|_| {
                let mut table = [0u64; 4];
                for slot in &mut table {
                    *slot = rng.gen();
                }
                table
            })
            .collect();
        Self { width, tables }
    }

    /// The window width in bases (k+1).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of hash functions in the bank.
    #[must_use]
    pub fn num_hashes(&self) -> usize {
        self.tables.len()
    }

    /// A fresh streaming window over this bank.
    #[must_use]
    pub fn window(&self) -> EdgeWindow<'_> {
        EdgeWindow {
            hasher: self,
            fwd: vec![0; self.tables.len()],
            rev: vec![0; self.tables.len()],
            filled: 0,
        }
    }

    /// Computes the canonical hash values of a packed edge word directly,
    /// without streaming. Identical to what a streamed window reports.
    pub fn probe(&self, edge: &PackedDna, hashes: &mut Vec<u64>) {
        debug_assert_eq!(edge.len(), self.width);
        let rc = edge.rev_comp();
        hashes.clear();
        for table in &self.tables {
            let fwd = Self::block_hash(table, edge);
            let rev = Self::block_hash(table, &rc);
            hashes.push(fwd.min(rev));
        }
    }

    fn block_hash(table: &[u64; 4], word: &PackedDna) -> u64 {
        word.bases()
            .fold(0, |hash, base| hash.rotate_left(1) ^ table[base.code() as usize])
    }
}

/// Streaming state of one edge window: per-function forward and
/// reverse-complement hashes, updated in O(1) per base.
#[derive(Debug)]
pub struct EdgeWindow<'a> {
    hasher: &'a EdgeHasher,
    fwd: Vec<u64>,
    rev: Vec<u64>,
    filled: usize,
}

impl EdgeWindow<'_> {
    /// Clears the window for the next segment.
    pub fn reset(&mut self) {
        self.fwd.iter_mut().for_each(|hash| *hash = 0);
        self.rev.iter_mut().for_each(|hash| *hash = 0);
        self.filled = 0;
    }

    /// Feeds one base while the window is filling up.
    pub fn eat(&mut self, base: Base) {
        debug_assert!(self.filled < self.hasher.width);
        let comp = base.complement();
        for (i, table) in self.hasher.tables.iter().enumerate() {
            self.fwd[i] = self.fwd[i].rotate_left(1) ^ table[base.code() as usize];
            self.rev[i] ^= table[comp.code() as usize].rotate_left(self.filled as u32);
        }
        self.filled += 1;
    }

    /// Slides a full window one base to the right.
    pub fn slide(&mut self, outgoing: Base, incoming: Base) {
        debug_assert!(self.is_full());
        let width = self.hasher.width as u32;
        let out_comp = outgoing.complement();
        let in_comp = incoming.complement();
        for (i, table) in self.hasher.tables.iter().enumerate() {
            self.fwd[i] = self.fwd[i].rotate_left(1)
                ^ table[outgoing.code() as usize].rotate_left(width)
                ^ table[incoming.code() as usize];
            self.rev[i] = (self.rev[i] ^ table[out_comp.code() as usize]).rotate_right(1)
                ^ table[in_comp.code() as usize].rotate_left(width - 1);
        }
    }

    /// Returns true once `width` bases have been eaten.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled == self.hasher.width
    }

    /// Writes the canonical (strand-independent) hash values of the
    /// current window into `hashes`.
    pub fn canonical_hashes(&self, hashes: &mut Vec<u64>) {
        debug_assert!(self.is_full());
        hashes.clear();
        for (fwd, rev) in self.fwd.iter().zip(&self.rev) {
            hashes.push(*fwd.min(rev));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> PackedDna {
        PackedDna::from_ascii(s.as_bytes()).unwrap()
    }

    fn bases(s: &str) -> Vec<Base> {
        s.bytes().map(|b| Base::from_byte(b).unwrap()).collect()
    }

    #[test]
    fn streamed_hashes_match_block_probes() {
        let seq = "ACGTTGCAACGGT";
        let width = 4;
        let hasher = EdgeHasher::new(width, 3, 42);
        let seq_bases = bases(seq);

        let mut window = hasher.window();
        for &base in &seq_bases[..width] {
            window.eat(base);
        }

        let mut streamed = Vec::new();
        let mut probed = Vec::new();
        for start in 0..=seq.len() - width {
            window.canonical_hashes(&mut streamed);
            hasher.probe(&word(&seq[start..start + width]), &mut probed);
            assert_eq!(streamed, probed, "window starting at {start}");

            if start + width < seq.len() {
                window.slide(seq_bases[start], seq_bases[start + width]);
            }
        }
    }

    #[test]
    fn probe_is_strand_independent() {
        let hasher = EdgeHasher::new(5, 4, 7);
        let edge = word("ACGTT");
        let mut fwd = Vec::new();
        let mut rev = Vec::new();
        hasher.probe(&edge, &mut fwd);
        hasher.probe(&edge.rev_comp(), &mut rev);
        assert_eq!(fwd, rev);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let a = EdgeHasher::new(6, 2, 99);
        let b = EdgeHasher::new(6, 2, 99);
        let mut ha = Vec::new();
        let mut hb = Vec::new();
        a.probe(&word("ACGTAC"), &mut ha);
        b.probe(&word("ACGTAC"), &mut hb);
        assert_eq!(ha, hb);
    }

    #[test]
    fn different_seeds_differ() {
        let a = EdgeHasher::new(6, 2, 1);
        let b = EdgeHasher::new(6, 2, 2);
        let mut ha = Vec::new();
        let mut hb = Vec::new();
        a.probe(&word("ACGTAC"), &mut ha);
        b.probe(&word("ACGTAC"), &mut hb);
        assert_ne!(ha, hb);
    }

    #[test]
    fn reset_clears_the_window() {
        let hasher = EdgeHasher::new(3, 2, 5);
        let mut window = hasher.window();
        for base in bases("ACG") {
            window.eat(base);
        }
        let mut before = Vec::new();
        window.canonical_hashes(&mut before);

        window.reset();
        assert!(!window.is_full());
        for base in bases("ACG") {
            window.eat(base);
        }
        let mut after = Vec::new();
        window.canonical_hashes(&mut after);
        assert_eq!(before, after);
    }

    #[test]
    fn bank_reports_its_shape() {
        let hasher = EdgeHasher::new(8, 5, 0);
        assert_eq!(hasher.width(), 8);
        assert_eq!(hasher.num_hashes(), 5);
    }
}
