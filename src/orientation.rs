/// Marker in a read's file name flagging a reverse sequencing primer.
pub const REVERSE_MARKER: &str = "rev";

/// Whether a read must be reverse-complemented before alignment.
///
/// This is purely a naming convention: the name must contain `rev`
/// (case-sensitive) anywhere.
pub fn is_reverse(filename: &str) -> bool {
    filename.contains(REVERSE_MARKER)
}
