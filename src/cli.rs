//! Command-line interface definition.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// A memory-frugal enumerator of bifurcation vertices in the de Bruijn
/// graph of DNA sequence files.
///
/// Streams each FASTA input twice: once to build a Bloom filter over all
/// observed (k+1)-mer edges, then once per round to confirm which vertices
/// branch. The sorted canonical bifurcation k-mers are written to stdout.
///
/// # Examples
///
/// ```bash
/// # Enumerate bifurcations of the order-21 de Bruijn graph
/// bifrust 21 genome.fa
///
/// # Several inputs share one graph
/// bifrust 21 chr1.fa chr2.fa
///
/// # Bound candidate-set memory with four rounds
/// bifrust 25 genome.fa -m 4000000000 -R 4
///
/// # Machine-readable output
/// bifrust 21 genome.fa --quiet --format tsv > vertices.tsv
/// ```
#[derive(Parser, Debug)]
#[command(name = "bifrust")]
#[command(version, author, about, long_about = None)]
pub struct Args {
    /// Vertex length k (1-31)
    #[arg(value_parser = parse_k)]
    pub k: usize,

    /// Input FASTA file paths
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Bloom filter size in bits
    #[arg(short = 'm', long = "filter-bits", default_value_t = 1 << 28)]
    pub filter_bits: u64,

    /// Number of hash functions over each edge
    #[arg(short = 'q', long = "num-hashes", default_value_t = 4)]
    pub num_hashes: usize,

    /// Number of rounds partitioning the vertex hash space (1 disables sharding)
    #[arg(short = 'R', long, default_value_t = 1)]
    pub rounds: u64,

    /// Seed for the hash family
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// Suppress progress diagnostics (only output the vertex list)
    #[arg(long)]
    pub quiet: bool,
}

/// Output format for the bifurcation list.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// One canonical k-mer per line
    #[default]
    Plain,
    /// Tab-separated values (id\tkmer)
    Tsv,
    /// JSON array of {id, kmer} records
    Json,
}

fn parse_k(s: &str) -> Result<usize, String> {
    let k: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if k == 0 {
        return Err("vertex length must be at least 1".to_string());
    }
    if k > 31 {
        return Err("vertex length must be at most 31 (edges span k+1 packed bases)".to_string());
    }
    Ok(k)
}
