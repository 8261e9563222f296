//! Bifurcation index assembly and identity lookup.
//!
//! Per-round dumps of confirmed vertices are concatenated, sorted by packed
//! body, and deduplicated (a vertex lands in exactly one round by
//! construction, but the guard is cheap). The result supports stable
//! 0-based identity lookup by binary search; both orientations of a query
//! resolve to the same id.

use std::io::Write;

use serde::Serialize;

use crate::{
    cli::OutputFormat,
    dna::{KmerLength, PackedDna},
    error::BifrustError,
};

/// The sorted set of canonical bifurcation k-mers of an enumeration run.
#[derive(Debug, Clone)]
pub struct BifurcationIndex {
    k: KmerLength,
    bodies: Vec<u64>,
}

/// A vertex with its stable id, used for JSON serialization.
#[derive(Serialize)]
struct VertexRecord {
    id: usize,
    kmer: String,
}

impl BifurcationIndex {
    /// Assembles the index from the concatenated per-round vertex dumps.
    pub(crate) fn from_rounds(k: KmerLength, mut bodies: Vec<u64>) -> Self {
        bodies.sort_unstable();
        bodies.dedup();
        Self { k, bodies }
    }

    /// The vertex length this index was built for.
    #[must_use]
    pub const fn k(&self) -> KmerLength {
        self.k
    }

    /// Number of distinct canonical bifurcation vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if no bifurcation was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Looks up the stable id of a vertex, in sort order of the canonical
    /// packed body. Either orientation resolves to the same id; absent
    /// vertices (including length mismatches) yield `None`.
    #[must_use]
    pub fn id_of(&self, kmer: &PackedDna) -> Option<usize> {
        if kmer.len() != self.k.get() {
            return None;
        }
        self.bodies.binary_search(&kmer.canonical().body()).ok()
    }

    /// Looks up a vertex given as an ASCII k-mer.
    ///
    /// # Errors
    ///
    /// Returns an error if the string contains a non-ACGT byte.
    pub fn id_of_str(&self, kmer: &str) -> Result<Option<usize>, BifrustError> {
        if kmer.len() != self.k.get() {
            return Ok(None);
        }
        let word = PackedDna::from_ascii(kmer.as_bytes())?;
        Ok(self.id_of(&word))
    }

    /// Iterates the canonical vertices in id order.
    pub fn kmers(&self) -> impl Iterator<Item = PackedDna> + '_ {
        self.bodies
            .iter()
            .map(move |&body| PackedDna::from_body(body, self.k.get()))
    }

    /// The raw sorted packed bodies, in id order.
    #[must_use]
    pub fn bodies(&self) -> &[u64] {
        &self.bodies
    }

    /// Writes the vertex list in the requested format.
    pub fn write<W: Write>(&self, writer: &mut W, format: OutputFormat) -> Result<(), BifrustError> {
        match format {
            OutputFormat::Plain => {
                for kmer in self.kmers() {
                    writeln!(writer, "{kmer}")?;
                }
            }
            OutputFormat::Tsv => {
                for (id, kmer) in self.kmers().enumerate() {
                    writeln!(writer, "{id}\t{kmer}")?;
                }
            }
            OutputFormat::Json => {
                let records: Vec<VertexRecord> = self
                    .kmers()
                    .enumerate()
                    .map(|(id, kmer)| VertexRecord {
                        id,
                        kmer: kmer.to_string(),
                    })
                    .collect();
                serde_json::to_writer(&mut *writer, &records)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}
