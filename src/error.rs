//! Error types for bifrust.
//!
//! This module provides exhaustive, strongly-typed errors for all operations
//! in the library, enabling precise error handling and informative messages.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in bifrust operations.
#[derive(Debug, Error)]
pub enum BifrustError {
    /// Vertex length is outside the valid range (1-31).
    #[error("invalid vertex length {k}: must be between {min} and {max} (edges span k+1 packed bases)")]
    InvalidKmerLength { k: usize, min: usize, max: usize },

    /// The Bloom filter was configured with zero bits.
    #[error("Bloom filter size must be at least one bit")]
    FilterSize,

    /// The hash bank was configured with zero hash functions.
    #[error("number of hash functions must be at least one")]
    HashCount,

    /// The round count was configured as zero.
    #[error("number of rounds must be at least one")]
    Rounds,

    /// Encountered an invalid DNA base in a query k-mer.
    #[error(transparent)]
    InvalidBase(#[from] InvalidBaseError),

    /// Failed to open or read a sequence file.
    #[error("failed to read sequence file '{path}': {source}")]
    SequenceRead {
        #[source]
        source: anyhow::Error,
        path: PathBuf,
    },

    /// An input file contained no parseable FASTA record.
    #[error("no FASTA records found in '{path}'")]
    NoRecords { path: PathBuf },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

/// Error for invalid vertex (k-mer) length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("vertex length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid vertex length.
    pub min: usize,
    /// Maximum valid vertex length.
    pub max: usize,
}

/// Error for invalid DNA base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte in the sequence.
    pub position: usize,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.base.is_ascii_graphic() || self.base == b' ' {
            write!(
                f,
                "invalid base '{}' (0x{:02x}) at position {}",
                self.base as char, self.base, self.position
            )
        } else {
            write!(
                f,
                "invalid base 0x{:02x} at position {}",
                self.base, self.position
            )
        }
    }
}

impl std::error::Error for InvalidBaseError {}

impl From<std::io::Error> for BifrustError {
    fn from(source: std::io::Error) -> Self {
        BifrustError::Write { source }
    }
}

impl From<serde_json::Error> for BifrustError {
    fn from(source: serde_json::Error) -> Self {
        BifrustError::Json { source }
    }
}

impl From<KmerLengthError> for BifrustError {
    fn from(err: KmerLengthError) -> Self {
        BifrustError::InvalidKmerLength {
            k: err.k,
            min: err.min,
            max: err.max,
        }
    }
}
