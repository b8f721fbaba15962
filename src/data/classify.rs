//! Line classification for the hybrid PDH layout.
//!
//! The format has no marker between the data block and the XML footer.
//! Data rows never start with `<`, so a line whose first non-whitespace
//! character is `<` is taken to belong to the footer.

/// What a single line of a PDH file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Data,
    Metadata,
}

/// True iff `line` is zero or more whitespace characters followed by `<`.
///
/// Only the prefix is inspected; nothing after the `<` is validated.
pub fn is_metadata_line(line: &str) -> bool {
    line.trim_start().starts_with('<')
}

pub fn classify(line: &str) -> LineKind {
    if is_metadata_line(line) {
        LineKind::Metadata
    } else {
        LineKind::Data
    }
}
