//! Edge-set construction.
//!
//! The first streaming pass: every observed (k+1)-mer window, on either
//! strand, feeds its canonical rolling hashes into the Bloom filter.
//! Records are processed in parallel; the filter's atomic set-bit makes
//! concurrent insertion safe.

use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

use rayon::prelude::{ParallelBridge, ParallelIterator};

use crate::{
    bloom::BloomFilter,
    dna::Base,
    error::BifrustError,
    fasta,
    progress::ProgressTracker,
    rolling::EdgeHasher,
};

/// Streams every input once and inserts all observed edges into `filter`.
///
/// # Errors
///
/// Fails if a file cannot be opened or read, or contains no FASTA record.
pub fn build_edge_filter<P: AsRef<Path>>(
    inputs: &[P],
    hasher: &EdgeHasher,
    filter: &BloomFilter,
    tracker: &ProgressTracker,
) -> Result<(), BifrustError> {
    for path in inputs {
        let path = path.as_ref();
        let records_seen = AtomicU64::new(0);
        fasta::open(path)?
            .records()
            .par_bridge()
            .try_for_each(|record| {
                let record = record.map_err(|source| fasta::read_error(path, source))?;
                records_seen.fetch_add(1, Ordering::Relaxed);
                insert_record_edges(record.seq(), hasher, filter, tracker);
                Ok::<(), BifrustError>(())
            })?;
        if records_seen.load(Ordering::Relaxed) == 0 {
            return Err(BifrustError::NoRecords {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

fn insert_record_edges(
    seq: &[u8],
    hasher: &EdgeHasher,
    filter: &BloomFilter,
    tracker: &ProgressTracker,
) {
    let width = hasher.width();
    let mut window = hasher.window();
    let mut hashes = Vec::with_capacity(hasher.num_hashes());
    for segment in fasta::split_segments(seq) {
        tracker.record_segment(segment.len() as u64);
        if segment.len() < width {
            continue;
        }
        window.reset();
        for &byte in &segment[..width] {
            window.eat(Base::from_segment_byte(byte));
        }
        window.canonical_hashes(&mut hashes);
        filter.insert(&hashes);
        for pos in width..segment.len() {
            window.slide(
                Base::from_segment_byte(segment[pos - width]),
                Base::from_segment_byte(segment[pos]),
            );
            window.canonical_hashes(&mut hashes);
            filter.insert(&hashes);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::dna::PackedDna;

    use super::*;

    fn fasta_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    fn probe_contains(hasher: &EdgeHasher, filter: &BloomFilter, edge: &str) -> bool {
        let mut hashes = Vec::new();
        hasher.probe(&PackedDna::from_ascii(edge.as_bytes()).unwrap(), &mut hashes);
        filter.contains(&hashes)
    }

    #[test]
    fn observed_edges_are_inserted_on_both_strands() {
        let file = fasta_file(">s\nACGTA\n");
        let hasher = EdgeHasher::new(3, 3, 11);
        let filter = BloomFilter::new(1 << 16).unwrap();
        let tracker = ProgressTracker::new();

        build_edge_filter(&[file.path()], &hasher, &filter, &tracker).unwrap();

        for edge in ["ACG", "CGT", "GTA"] {
            assert!(probe_contains(&hasher, &filter, edge), "missing {edge}");
        }
        // Reverse complements hash identically.
        assert!(probe_contains(&hasher, &filter, "CGT"));
        assert!(probe_contains(&hasher, &filter, "TAC"));
        assert_eq!(tracker.snapshot().segments_scanned, 1);
        assert_eq!(tracker.snapshot().bases_scanned, 5);
    }

    #[test]
    fn ambiguous_bases_break_edges() {
        let file = fasta_file(">s\nACNGT\n");
        let hasher = EdgeHasher::new(3, 3, 11);
        let filter = BloomFilter::new(1 << 16).unwrap();
        let tracker = ProgressTracker::new();

        build_edge_filter(&[file.path()], &hasher, &filter, &tracker).unwrap();

        // No 3-base window fits in either 2-base segment.
        assert_eq!(filter.ones(), 0);
        assert_eq!(tracker.snapshot().segments_scanned, 2);
    }

    #[test]
    fn file_without_records_is_an_error() {
        let file = fasta_file("");
        let hasher = EdgeHasher::new(3, 2, 0);
        let filter = BloomFilter::new(1024).unwrap();
        let tracker = ProgressTracker::new();

        let err = build_edge_filter(&[file.path()], &hasher, &filter, &tracker).unwrap_err();
        assert!(matches!(err, BifrustError::NoRecords { .. }));
    }
}
