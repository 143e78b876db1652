//! Splitting an extended alignment into fixed-width report lines.
//!
//! Every line carries the 1-based, inclusive range of original-sequence
//! positions its non-gap characters cover. Query and target positions are
//! tracked separately because a gap in one row does not advance the other.

use crate::aligner::GAP;
use crate::error::{Result, SeqrepError};
use crate::overhang::ExtendedAlignment;
use serde::Serialize;
use std::iter::FusedIterator;

pub const DEFAULT_LINE_LENGTH: usize = 60;

/// Inclusive 1-based position range. A line without any base of a sequence
/// gets the empty range `(start, start - 1)`, where `start` is the position
/// the next base would take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PositionRange {
    pub start: usize,
    pub end: usize,
}

impl PositionRange {
    fn covering(start: usize, count: usize) -> Self {
        PositionRange {
            start,
            end: start + count - 1,
        }
    }

    /// Number of positions covered.
    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportLine<'a> {
    pub query_text: &'a str,
    pub target_text: &'a str,
    pub match_text: &'a str,
    pub query_range: PositionRange,
    pub target_range: PositionRange,
}

fn residues(text: &str) -> usize {
    text.bytes().filter(|&b| b != GAP).count()
}

/// Iterator over the report lines of one alignment, left to right.
///
/// Positions are threaded from line to line, so the lines can only be
/// produced once and in order.
#[derive(Debug)]
pub struct Lines<'a> {
    extended: &'a ExtendedAlignment,
    line_length: usize,
    offset: usize,
    query_pos: usize,
    target_pos: usize,
}

impl<'a> Iterator for Lines<'a> {
    type Item = ReportLine<'a>;

    fn next(&mut self) -> Option<ReportLine<'a>> {
        let total = self.extended.extended_query.len();
        if self.offset >= total {
            return None;
        }
        let end = (self.offset + self.line_length).min(total);
        let query_text = &self.extended.extended_query[self.offset..end];
        let target_text = &self.extended.extended_target[self.offset..end];
        let match_text = &self.extended.match_string[self.offset..end];

        let query_count = residues(query_text);
        let target_count = residues(target_text);
        let line = ReportLine {
            query_text,
            target_text,
            match_text,
            query_range: PositionRange::covering(self.query_pos, query_count),
            target_range: PositionRange::covering(self.target_pos, target_count),
        };

        self.query_pos += query_count;
        self.target_pos += target_count;
        self.offset = end;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.extended.extended_query.len().saturating_sub(self.offset);
        let n = remaining.div_ceil(self.line_length);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Lines<'_> {}
impl FusedIterator for Lines<'_> {}

/// Wrap `extended` into lines of `line_length` characters, the last one
/// possibly shorter. `query_start` and `target_start` are the 1-based
/// positions of the first extended character in each sequence.
pub fn wrap(
    extended: &ExtendedAlignment,
    line_length: usize,
    query_start: usize,
    target_start: usize,
) -> Result<Lines<'_>> {
    if line_length == 0 {
        return Err(SeqrepError::Config(
            "line length must be at least 1".to_string(),
        ));
    }
    if query_start == 0 || target_start == 0 {
        return Err(SeqrepError::Config(
            "sequence positions are 1-based".to_string(),
        ));
    }
    Ok(Lines {
        extended,
        line_length,
        offset: 0,
        query_pos: query_start,
        target_pos: target_start,
    })
}

/// Wrap an extension starting from the positions it records.
pub fn wrap_alignment(extended: &ExtendedAlignment, line_length: usize) -> Result<Lines<'_>> {
    wrap(
        extended,
        line_length,
        extended.query_start,
        extended.target_start,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overhang::match_string;

    fn extended(query: &str, target: &str) -> ExtendedAlignment {
        ExtendedAlignment {
            extended_query: query.to_string(),
            extended_target: target.to_string(),
            match_string: match_string(query, target),
            start_overhang: 0,
            end_overhang: 0,
            query_start: 1,
            target_start: 1,
        }
    }

    fn range(start: usize, end: usize) -> PositionRange {
        PositionRange { start, end }
    }

    #[test]
    fn test_identical_two_lines() {
        let ext = extended("acgtacgt", "acgtacgt");
        let lines: Vec<_> = wrap(&ext, 4, 1, 1).unwrap().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].query_text, "acgt");
        assert_eq!(lines[0].match_text, "||||");
        assert_eq!(lines[0].query_range, range(1, 4));
        assert_eq!(lines[0].target_range, range(1, 4));
        assert_eq!(lines[1].match_text, "||||");
        assert_eq!(lines[1].query_range, range(5, 8));
        assert_eq!(lines[1].target_range, range(5, 8));
    }

    #[test]
    fn test_gap_shortens_query_range() {
        let ext = extended("ac-t", "acgt");
        let lines: Vec<_> = wrap(&ext, 60, 1, 1).unwrap().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].query_range, range(1, 3));
        assert_eq!(lines[0].query_range.len(), 3);
        assert_eq!(lines[0].target_range, range(1, 4));
        assert_eq!(lines[0].target_range.len(), 4);
    }

    #[test]
    fn test_positions_tracked_independently() {
        let ext = extended("acg--tacgt", "acgggtac-t");
        let lines: Vec<_> = wrap(&ext, 5, 11, 101).unwrap().collect();
        assert_eq!(lines[0].query_range, range(11, 13));
        assert_eq!(lines[0].target_range, range(101, 105));
        assert_eq!(lines[1].query_range, range(14, 18));
        assert_eq!(lines[1].target_range, range(106, 109));
    }

    #[test]
    fn test_last_line_shorter() {
        let ext = extended("acgtacgtac", "acgtacgtac");
        let lines: Vec<_> = wrap(&ext, 4, 1, 1).unwrap().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].query_text, "ac");
        assert_eq!(lines[2].query_range, range(9, 10));
    }

    #[test]
    fn test_no_trailing_empty_line() {
        let ext = extended("acgtacgt", "acgtacgt");
        assert_eq!(wrap(&ext, 8, 1, 1).unwrap().count(), 1);
        assert_eq!(wrap(&ext, 1, 1, 1).unwrap().count(), 8);
    }

    #[test]
    fn test_all_gap_line_is_empty_range() {
        let ext = extended("acgt----acgt", "acgtacgtacgt");
        let lines: Vec<_> = wrap(&ext, 4, 1, 1).unwrap().collect();
        assert_eq!(lines[1].query_text, "----");
        assert_eq!(lines[1].query_range, range(5, 4));
        assert!(lines[1].query_range.is_empty());
        assert_eq!(lines[1].query_range.len(), 0);
        assert_eq!(lines[1].target_range, range(5, 8));
        assert_eq!(lines[2].query_range, range(5, 8));
    }

    #[test]
    fn test_size_hint_matches_count() {
        let ext = extended("acgtacgtacgtacg", "acgtacgtacgtacg");
        let lines = wrap(&ext, 4, 1, 1).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.count(), 4);
    }

    #[test]
    fn test_zero_line_length_rejected() {
        let ext = extended("acgt", "acgt");
        assert!(matches!(wrap(&ext, 0, 1, 1), Err(SeqrepError::Config(_))));
    }

    #[test]
    fn test_empty_alignment_has_no_lines() {
        let ext = extended("", "");
        assert_eq!(wrap(&ext, 4, 1, 1).unwrap().count(), 0);
    }
}
