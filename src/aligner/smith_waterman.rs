/// Smith-Waterman local alignment backed by rust-bio
use super::{AlignerConfig, AlignmentError, AlignmentResult, LocalAligner, GAP};
use crate::sequence::Sequence;
use bio::alignment::pairwise::Aligner;
use bio::alignment::{Alignment, AlignmentOperation};

pub struct SmithWatermanAligner {
    config: AlignerConfig,
}

impl SmithWatermanAligner {
    pub fn new(config: AlignerConfig) -> Self {
        SmithWatermanAligner { config }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Gap open and extend scores in rust-bio's convention, where a gap of
    /// length k scores `open + k * extend`.
    fn gap_scores(&self) -> (i32, i32) {
        let extend = -self.config.gap_extend_penalty;
        let open = -(self.config.gap_open_penalty - self.config.gap_extend_penalty);
        (open, extend)
    }
}

/// Expand rust-bio's operation list into gapped query/target strings and
/// convert its exclusive end offsets to inclusive ones.
fn to_alignment_result(
    query: &Sequence,
    target: &Sequence,
    alignment: &Alignment,
) -> Result<AlignmentResult, AlignmentError> {
    if alignment.xend <= alignment.xstart || alignment.yend <= alignment.ystart {
        return Err(AlignmentError::Empty);
    }

    let x = query.as_bytes();
    let y = target.as_bytes();
    let mut aligned_query = Vec::with_capacity(alignment.operations.len());
    let mut aligned_target = Vec::with_capacity(alignment.operations.len());
    let mut i = alignment.xstart;
    let mut j = alignment.ystart;

    for op in &alignment.operations {
        match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                aligned_query.push(x[i]);
                aligned_target.push(y[j]);
                i += 1;
                j += 1;
            }
            AlignmentOperation::Ins => {
                aligned_query.push(x[i]);
                aligned_target.push(GAP);
                i += 1;
            }
            AlignmentOperation::Del => {
                aligned_query.push(GAP);
                aligned_target.push(y[j]);
                j += 1;
            }
            // Clipped ends lie outside the aligned region.
            AlignmentOperation::Xclip(_) | AlignmentOperation::Yclip(_) => {}
        }
    }

    let result = AlignmentResult {
        query_sequence: query.clone(),
        target_sequence: target.clone(),
        query_begin: alignment.xstart,
        query_end: alignment.xend - 1,
        target_begin: alignment.ystart,
        target_end: alignment.yend - 1,
        aligned_query: String::from_utf8_lossy(&aligned_query).into_owned(),
        aligned_target: String::from_utf8_lossy(&aligned_target).into_owned(),
    };
    result.validate()?;
    Ok(result)
}

impl LocalAligner for SmithWatermanAligner {
    fn align(
        &self,
        query: &Sequence,
        target: &Sequence,
    ) -> Result<AlignmentResult, AlignmentError> {
        let (gap_open, gap_extend) = self.gap_scores();
        let match_score = self.config.match_score;
        let mismatch_score = self.config.mismatch_score;
        // Identity substitution: n only scores as a match against n.
        let score = |a: u8, b: u8| if a == b { match_score } else { mismatch_score };

        let mut aligner =
            Aligner::with_capacity(query.len(), target.len(), gap_open, gap_extend, score);
        let alignment = aligner.local(query.as_bytes(), target.as_bytes());

        if self.config.log_alignments {
            log::debug!(
                "Local alignment score {}: query {}..{} of {}, target {}..{} of {}",
                alignment.score,
                alignment.xstart,
                alignment.xend,
                alignment.xlen,
                alignment.ystart,
                alignment.yend,
                alignment.ylen
            );
        }

        to_alignment_result(query, target, &alignment)
    }
}
