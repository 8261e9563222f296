//! Vertex enumeration driver.
//!
//! Orchestrates the two-stage pipeline: one pass to build the edge Bloom
//! filter, then one classification pass per round over a contiguous range
//! of the 64-bit reference-hash space of canonical vertices. Sharding the
//! hash space bounds the peak size of the candidate and confirmed sets; a
//! single round disables it.
//!
//! Within a round each vertex moves through at most three states:
//! absent, candidate (one observed edge context), confirmed. A vertex is
//! confirmed directly when it sits at a segment boundary, or promoted from
//! candidate when a second, distinct edge context shows up. Bloom false
//! positives can park a non-branching vertex in the candidate set, but it
//! is only emitted if the promotion rule fires too; leftovers are dropped
//! when the round ends.

use std::{path::Path, time::Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use xxhash_rust::xxh64::xxh64;

use crate::{
    bloom::BloomFilter,
    config::EnumerateParams,
    dna::{Base, PackedDna},
    edges,
    error::BifrustError,
    fasta,
    output::BifurcationIndex,
    progress::ProgressTracker,
    rolling::EdgeHasher,
};

/// Enumerates the bifurcation vertices of the de Bruijn graph of `inputs`.
///
/// Streams every input once to collect edges, then once per round to
/// classify vertices, and assembles the sorted identity index.
///
/// # Errors
///
/// Fails on unreadable inputs or inputs without any FASTA record;
/// configuration is already validated by [`EnumerateParams`].
pub fn enumerate<P: AsRef<Path>>(
    params: &EnumerateParams,
    inputs: &[P],
) -> Result<BifurcationIndex, BifrustError> {
    let hasher = EdgeHasher::new(params.k.edge_len(), params.num_hashes, params.seed);
    let filter = BloomFilter::new(params.filter_bits)?;
    if !params.quiet {
        println!(
            "filter size = {} bits, {} hash functions",
            params.filter_bits, params.num_hashes
        );
    }
    #[cfg(feature = "tracing")]
    tracing::info!(
        filter_bits = params.filter_bits,
        num_hashes = params.num_hashes,
        k = params.k.get(),
        "building edge filter"
    );

    let tracker = ProgressTracker::new();
    let start = Instant::now();
    edges::build_edge_filter(inputs, &hasher, &filter, &tracker)?;
    if !params.quiet {
        let progress = tracker.snapshot();
        println!(
            "edge filter: {} segments, {} bases in {:.2}s",
            progress.segments_scanned,
            progress.bases_scanned,
            start.elapsed().as_secs_f64()
        );
    }

    let mut bodies = Vec::new();
    for round in 0..params.rounds {
        let (low, high) = round_range(round, params.rounds);
        if !params.quiet {
            println!("round {round}, [{low}:{high}]");
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(round, low, high, "classification pass");

        let start = Instant::now();
        let mut sets = RoundSets::default();
        let mut edge_hashes = Vec::with_capacity(params.num_hashes);
        for path in inputs {
            classify_file(
                path.as_ref(),
                params,
                (low, high),
                &hasher,
                &filter,
                &mut sets,
                &mut edge_hashes,
            )?;
        }
        if !params.quiet {
            println!("vertex count = {}", sets.confirmed.len());
            println!("false positive count = {}", sets.candidates.len());
            println!("enumeration pass: {:.2}s", start.elapsed().as_secs_f64());
        }
        bodies.extend(sets.confirmed);
    }

    Ok(BifurcationIndex::from_rounds(params.k, bodies))
}

/// The single observed edge context of a candidate vertex, stored in
/// canonical orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Witness {
    prev: Base,
    ext: Base,
}

impl Witness {
    /// The same physical context read on the opposite strand.
    const fn flipped(self) -> Self {
        Self {
            prev: self.ext.complement(),
            ext: self.prev.complement(),
        }
    }
}

#[derive(Debug, Default)]
struct RoundSets {
    confirmed: FxHashSet<u64>,
    candidates: FxHashMap<u64, Witness>,
}

/// Reference hash of a canonical vertex body, used only for sharding.
fn reference_hash(body: u64, seed: u64) -> u64 {
    xxh64(&body.to_le_bytes(), seed)
}

/// The inclusive hash range covered by `round`. Ranges are contiguous,
/// disjoint, and cover the whole 64-bit space.
fn round_range(round: u64, rounds: u64) -> (u64, u64) {
    let span = u64::MAX / rounds;
    let low = if round == 0 { 0 } else { round * span + 1 };
    let high = if round == rounds - 1 {
        u64::MAX
    } else {
        (round + 1) * span
    };
    (low, high)
}

#[allow(clippy::too_many_arguments)]
fn classify_file(
    path: &Path,
    params: &EnumerateParams,
    range: (u64, u64),
    hasher: &EdgeHasher,
    filter: &BloomFilter,
    sets: &mut RoundSets,
    edge_hashes: &mut Vec<u64>,
) -> Result<(), BifrustError> {
    for record in fasta::open(path)?.records() {
        let record = record.map_err(|source| fasta::read_error(path, source))?;
        for segment in fasta::split_segments(record.seq()) {
            classify_segment(&segment, params, range, hasher, filter, sets, edge_hashes);
        }
    }
    Ok(())
}

fn classify_segment(
    segment: &[u8],
    params: &EnumerateParams,
    (low, high): (u64, u64),
    hasher: &EdgeHasher,
    filter: &BloomFilter,
    sets: &mut RoundSets,
    edge_hashes: &mut Vec<u64>,
) {
    let k = params.k.get();
    if segment.len() < k {
        return;
    }
    let mut pos: PackedDna = segment[..k]
        .iter()
        .map(|&byte| Base::from_segment_byte(byte))
        .collect();
    let mut neg = pos.rev_comp();
    let last_start = segment.len() - k;

    for start in 0..=last_start {
        let prev = (start > 0).then(|| Base::from_segment_byte(segment[start - 1]));
        let ext = (start < last_start).then(|| Base::from_segment_byte(segment[start + k]));
        let canonical_body = pos.body().min(neg.body());
        let hash = reference_hash(canonical_body, params.seed);

        if (low..=high).contains(&hash) {
            match (prev, ext) {
                (Some(prev), Some(ext)) => {
                    if !sets.confirmed.contains(&canonical_body) {
                        observe_interior(
                            sets,
                            canonical_body,
                            &pos,
                            &neg,
                            prev,
                            ext,
                            hasher,
                            filter,
                            edge_hashes,
                        );
                    }
                }
                // First or last full window of a segment: boundary vertex.
                _ => {
                    sets.candidates.remove(&canonical_body);
                    sets.confirmed.insert(canonical_body);
                }
            }
        }

        if start < last_start {
            let incoming = Base::from_segment_byte(segment[start + k]);
            pos.pop_front();
            pos.push_back(incoming);
            neg.pop_back();
            neg.push_front(incoming.complement());
            debug_assert_eq!(neg, pos.rev_comp());
        }
    }
}

/// One interior visit of a vertex: record it as a candidate when the
/// degree test branches, promote it when a second distinct edge context
/// appears. A palindromic vertex reads the same visit on both strands, so
/// the complemented-swapped context counts as an observation too.
#[allow(clippy::too_many_arguments)]
fn observe_interior(
    sets: &mut RoundSets,
    canonical_body: u64,
    pos: &PackedDna,
    neg: &PackedDna,
    prev: Base,
    ext: Base,
    hasher: &EdgeHasher,
    filter: &BloomFilter,
    edge_hashes: &mut Vec<u64>,
) {
    let palindromic = pos.body() == neg.body();
    let witness = if neg.body() < pos.body() {
        Witness {
            prev: ext.complement(),
            ext: prev.complement(),
        }
    } else {
        Witness { prev, ext }
    };

    if let Some(&stored) = sets.candidates.get(&canonical_body) {
        if witness != stored || (palindromic && witness.flipped() != stored) {
            sets.candidates.remove(&canonical_body);
            sets.confirmed.insert(canonical_body);
        }
    } else if branches(pos, hasher, filter, edge_hashes) {
        if palindromic && witness.flipped() != witness {
            // The two strand readings of this single visit already disagree.
            sets.confirmed.insert(canonical_body);
        } else {
            sets.candidates.insert(canonical_body, witness);
        }
    }
}

/// Degree test: counts the in- and out-edges of `vertex` present in the
/// filter, over all four extensions. Probes are strand-independent, so
/// each covers both orientations of the edge. No false negatives means no
/// under-count; the test errs only toward extra candidates.
fn branches(
    vertex: &PackedDna,
    hasher: &EdgeHasher,
    filter: &BloomFilter,
    edge_hashes: &mut Vec<u64>,
) -> bool {
    let mut in_count = 0;
    let mut out_count = 0;
    for base in Base::ALL {
        hasher.probe(&vertex.with_front(base), edge_hashes);
        if filter.contains(edge_hashes) {
            in_count += 1;
        }
        hasher.probe(&vertex.with_back(base), edge_hashes);
        if filter.contains(edge_hashes) {
            out_count += 1;
        }
    }
    in_count > 1 || out_count > 1
}
