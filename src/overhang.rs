//! Extending a local alignment with flanking context from the original
//! sequences.
//!
//! The flank length is shared by query and target: on each side it is the
//! smallest of the requested overhang and the bases available beyond the
//! aligned region in either sequence, so both rows always show the same
//! amount of context.

use crate::aligner::{AlignmentResult, GAP};

pub const DEFAULT_OVERHANG: usize = 50;

pub const MATCH: char = '|';
pub const MISMATCH: char = '-';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedAlignment {
    pub extended_query: String,
    pub extended_target: String,
    pub match_string: String,
    pub start_overhang: usize,
    pub end_overhang: usize,
    /// 1-based query position of the first extended character.
    pub query_start: usize,
    /// 1-based target position of the first extended character.
    pub target_start: usize,
}

/// `|` where both strings carry the same base, `-` elsewhere (gaps never match).
pub fn match_string(a: &str, b: &str) -> String {
    a.bytes()
        .zip(b.bytes())
        .map(|(x, y)| if x == y && x != GAP { MATCH } else { MISMATCH })
        .collect()
}

/// Extend `alignment` by up to `overhang` bases on each side.
///
/// `alignment` must satisfy the [`AlignmentResult`] invariant; results from
/// [`crate::aligner::LocalAligner`] are validated before they are returned.
pub fn extend(alignment: &AlignmentResult, overhang: usize) -> ExtendedAlignment {
    let query = alignment.query_sequence.as_str();
    let target = alignment.target_sequence.as_str();

    let start_overhang = alignment
        .query_begin
        .min(alignment.target_begin)
        .min(overhang);
    let query_after = query.len().saturating_sub(alignment.query_end + 1);
    let target_after = target.len().saturating_sub(alignment.target_end + 1);
    let end_overhang = query_after.min(target_after).min(overhang);

    let query_prefix = &query[alignment.query_begin - start_overhang..alignment.query_begin];
    let query_suffix = &query[alignment.query_end + 1..alignment.query_end + 1 + end_overhang];
    let target_prefix = &target[alignment.target_begin - start_overhang..alignment.target_begin];
    let target_suffix =
        &target[alignment.target_end + 1..alignment.target_end + 1 + end_overhang];

    let extended_query = [query_prefix, alignment.aligned_query.as_str(), query_suffix].concat();
    let extended_target =
        [target_prefix, alignment.aligned_target.as_str(), target_suffix].concat();
    let match_string = match_string(&extended_query, &extended_target);

    ExtendedAlignment {
        extended_query,
        extended_target,
        match_string,
        start_overhang,
        end_overhang,
        query_start: alignment.query_begin - start_overhang + 1,
        target_start: alignment.target_begin - start_overhang + 1,
    }
}
