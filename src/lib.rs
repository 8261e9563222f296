//! # Bifrust
//!
//! Bifrust enumerates the **bifurcation vertices** of the de Bruijn graph
//! of one or more DNA FASTA files, in bounded memory.
//!
//! A de Bruijn graph of order k has one vertex per distinct k-mer and one
//! directed edge per observed (k+1)-mer. A vertex is a bifurcation if,
//! considering both strands, it has in-degree or out-degree of at least
//! two, or sits at a sequence boundary. Bifurcations are the structural
//! skeleton of the graph: downstream tools only ever traverse the
//! unbranching paths between them.
//!
//! The pipeline streams each input twice. The first pass feeds every
//! observed edge, via a bank of strand-independent rolling hashes, into a
//! Bloom filter. The second pass classifies vertices with an 8-probe
//! degree test against the filter, confirming a vertex only when a second
//! distinct edge context (or a sequence boundary) vouches for it. The
//! vertex hash space can be partitioned into rounds so the candidate sets
//! stay within RAM no matter how large the genome is.
//!
//! ```no_run
//! use bifrust::{enumerate, EnumerateParams};
//!
//! # fn main() -> Result<(), bifrust::BifrustError> {
//! let params = EnumerateParams::new(21, 1 << 28, 4, 1, 0)?.with_quiet(true);
//! let index = enumerate(&params, &["genome.fa"])?;
//! println!("{} bifurcation vertices", index.len());
//! # Ok(())
//! # }
//! ```

pub mod bloom;
pub mod cli;
pub mod config;
pub mod dna;
pub mod edges;
pub mod enumerate;
pub mod error;
pub mod fasta;
pub mod output;
pub mod progress;
pub mod rolling;

pub use config::EnumerateParams;
pub use dna::{Base, KmerLength, PackedDna};
pub use enumerate::enumerate;
pub use error::BifrustError;
pub use output::BifurcationIndex;
