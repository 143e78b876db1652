//! Loading and normalizing nucleotide sequences.
//!
//! Sequences are stored lowercase with all whitespace removed. Reads may come
//! as bare sequence text or with FASTA-style `>` header lines, which are
//! skipped.

use crate::error::{Result, SeqrepError};
use bio::alphabets::dna::revcomp;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// Nucleotide codes accepted in a sequence (lowercase IUPAC).
pub const ALPHABET: &[u8] = b"acgtnrykmswbdhv";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sequence {
    data: Vec<u8>,
}

/// A character that is not a nucleotide code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBase {
    pub base: char,
    pub position: usize,
}

impl fmt::Display for InvalidBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid nucleotide '{}' at position {}",
            self.base.escape_debug(),
            self.position + 1
        )
    }
}

impl Sequence {
    /// Normalize raw sequence text: whitespace is dropped and case folded.
    pub fn parse(text: &str) -> Result<Self, InvalidBase> {
        let mut data = Vec::with_capacity(text.len());
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            let lower = c.to_ascii_lowercase();
            if !lower.is_ascii() || !ALPHABET.contains(&(lower as u8)) {
                return Err(InvalidBase {
                    base: c,
                    position: data.len(),
                });
            }
            data.push(lower as u8);
        }
        Ok(Sequence { data })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII codes from ALPHABET are ever stored.
        std::str::from_utf8(&self.data).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reverse complement (a<->t, c<->g, n stays n). Applying it twice
    /// returns the original sequence.
    pub fn reverse_complement(&self) -> Sequence {
        Sequence {
            data: revcomp(self.data.iter()),
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Sequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Sequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Sequence::parse(&text).map_err(de::Error::custom)
    }
}

/// Extract the sequence part of a file's text, skipping `>` header lines.
pub fn parse_sequence_text(text: &str) -> Result<Sequence, InvalidBase> {
    let body: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('>'))
        .collect();
    Sequence::parse(&body)
}

/// Read a sequence file. Anything that is not plain-text nucleotide data is
/// reported as malformed input naming the file.
pub fn load_sequence(path: &Path) -> Result<Sequence> {
    let bytes = fs::read(path).map_err(|e| SeqrepError::MalformedInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let text = String::from_utf8(bytes).map_err(|_| SeqrepError::MalformedInput {
        path: path.to_path_buf(),
        reason: "file is not plain text".to_string(),
    })?;
    let seq = parse_sequence_text(&text).map_err(|e| SeqrepError::MalformedInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if seq.is_empty() {
        return Err(SeqrepError::MalformedInput {
            path: path.to_path_buf(),
            reason: "file contains no sequence".to_string(),
        });
    }
    log::debug!("Loaded {} bases from {}", seq.len(), path.display());
    Ok(seq)
}
