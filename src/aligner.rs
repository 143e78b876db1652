/// Abstraction over the local alignment backend used to pair reads with templates
use crate::sequence::Sequence;

pub mod smith_waterman;

pub use smith_waterman::SmithWatermanAligner;

/// Gap character in aligned strings.
pub const GAP: u8 = b'-';

/// Result of a local alignment of `query` against `target`.
///
/// Offsets are 0-based and inclusive. `aligned_query` with gaps removed is
/// exactly `query_sequence[query_begin..=query_end]`, and the same holds for
/// the target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentResult {
    pub query_sequence: Sequence,
    pub target_sequence: Sequence,
    pub query_begin: usize,
    pub query_end: usize,
    pub target_begin: usize,
    pub target_end: usize,
    pub aligned_query: String,
    pub aligned_target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlignmentError {
    #[error("no local alignment between read and template")]
    Empty,

    #[error("aligned strings differ in length ({query} vs {target})")]
    LengthMismatch { query: usize, target: usize },

    #[error("{which} offsets {begin}..={end} fall outside a sequence of length {len}")]
    OffsetOutOfRange {
        which: &'static str,
        begin: usize,
        end: usize,
        len: usize,
    },

    #[error("aligned {which} does not match its sequence at offsets {begin}..={end}")]
    RegionMismatch {
        which: &'static str,
        begin: usize,
        end: usize,
    },
}

fn check_region(
    which: &'static str,
    sequence: &Sequence,
    begin: usize,
    end: usize,
    aligned: &str,
) -> Result<(), AlignmentError> {
    if begin > end || end >= sequence.len() {
        return Err(AlignmentError::OffsetOutOfRange {
            which,
            begin,
            end,
            len: sequence.len(),
        });
    }
    let ungapped = aligned.bytes().filter(|&b| b != GAP);
    if !ungapped.eq(sequence.as_bytes()[begin..=end].iter().copied()) {
        return Err(AlignmentError::RegionMismatch { which, begin, end });
    }
    Ok(())
}

impl AlignmentResult {
    /// Check offsets and aligned strings against the original sequences.
    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.aligned_query.is_empty() && self.aligned_target.is_empty() {
            return Err(AlignmentError::Empty);
        }
        if self.aligned_query.len() != self.aligned_target.len() {
            return Err(AlignmentError::LengthMismatch {
                query: self.aligned_query.len(),
                target: self.aligned_target.len(),
            });
        }
        check_region(
            "query",
            &self.query_sequence,
            self.query_begin,
            self.query_end,
            &self.aligned_query,
        )?;
        check_region(
            "target",
            &self.target_sequence,
            self.target_begin,
            self.target_end,
            &self.aligned_target,
        )
    }
}

/// Scoring and behaviour of the local aligner, fixed when it is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignerConfig {
    pub match_score: i32,
    pub mismatch_score: i32,
    /// Cost of the first position of a gap.
    pub gap_open_penalty: i32,
    /// Cost of every further position of a gap.
    pub gap_extend_penalty: i32,
    /// Log score and offsets of every alignment.
    pub log_alignments: bool,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        AlignerConfig {
            match_score: 1,
            mismatch_score: -2,
            gap_open_penalty: 5,
            gap_extend_penalty: 2,
            log_alignments: false,
        }
    }
}

/// Trait for local alignment backends
pub trait LocalAligner: Sync {
    /// Locally align a lowercase `query` against a lowercase `target`.
    fn align(&self, query: &Sequence, target: &Sequence)
        -> Result<AlignmentResult, AlignmentError>;
}

/// Build the default backend for a configuration.
pub fn create_aligner(config: AlignerConfig) -> Box<dyn LocalAligner> {
    Box::new(SmithWatermanAligner::new(config))
}
