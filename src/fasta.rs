//! FASTA input.
//!
//! Records are read with `bio`'s FASTA reader; headers are consumed and
//! discarded. Ambiguous bases (N and anything else outside ACGT) act as
//! record separators: a record is split into clean segments and no k-mer
//! or edge window ever spans a split point, so every segment contributes
//! its own boundary windows.

use std::{fs::File, io::BufReader, path::Path};

use bio::io::fasta;
use bytes::Bytes;

use crate::error::BifrustError;

/// Opens a FASTA file for record-by-record streaming.
pub fn open(path: &Path) -> Result<fasta::Reader<BufReader<File>>, BifrustError> {
    fasta::Reader::from_file(path).map_err(|source| BifrustError::SequenceRead {
        source: source.into(),
        path: path.to_path_buf(),
    })
}

/// Wraps a per-record read failure with the file it came from.
pub(crate) fn read_error(path: &Path, source: std::io::Error) -> BifrustError {
    BifrustError::SequenceRead {
        source: source.into(),
        path: path.to_path_buf(),
    }
}

/// Splits a record's sequence into uppercased, ACGT-only segments.
///
/// Soft-masked (lowercase) bases are normalized; every other byte ends the
/// current segment. Empty segments are dropped.
#[must_use]
pub fn split_segments(seq: &[u8]) -> Vec<Bytes> {
    let mut segments = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    for &byte in seq {
        match byte {
            b'A' | b'C' | b'G' | b'T' => current.push(byte),
            b'a' | b'c' | b'g' | b't' => current.push(byte.to_ascii_uppercase()),
            _ => {
                if !current.is_empty() {
                    segments.push(Bytes::from(std::mem::take(&mut current)));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(Bytes::from(current));
    }
    segments
}
