//! Span-based source code editing with format preservation

use crate::Span;
use thiserror::Error;

/// Errors that can occur during edit application
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Overlapping edits detected at offset {offset}")]
    OverlappingEdits { offset: usize },

    #[error("Edit span {start}..{end} out of bounds for source length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Edit offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// Represents a single text edit: replace `span` of the original source with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// The source span to replace
    pub span: Span,
    /// The replacement text
    pub replacement: String,
    /// Human-readable description of the edit
    pub message: String,
}

impl Edit {
    /// Create a new edit
    pub fn new(span: Span, replacement: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
            message: message.into(),
        }
    }

    /// Insert text at an offset without removing anything
    pub fn insert(offset: usize, text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Span::empty(offset), text, message)
    }

    /// Remove the text covered by a span
    pub fn delete(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, String::new(), message)
    }

    /// Get the byte offset where this edit starts
    pub fn start_offset(&self) -> usize {
        self.span.start
    }

    /// Get the byte offset where this edit ends
    pub fn end_offset(&self) -> usize {
        self.span.end
    }

    /// Whether this edit only inserts text
    pub fn is_insert(&self) -> bool {
        self.span.is_empty()
    }
}

/// Sort edits by start offset; at equal offsets pure insertions come first.
///
/// The sort is stable so insertions registered at the same offset keep their order.
pub fn sort_edits(edits: &mut [Edit]) {
    edits.sort_by(|a, b| {
        a.start_offset()
            .cmp(&b.start_offset())
            .then_with(|| b.is_insert().cmp(&a.is_insert()))
    });
}

/// Check that sorted edits do not overlap.
///
/// Zero-width insertions may touch the boundary of a neighbouring edit.
pub fn check_disjoint(sorted: &[Edit]) -> Result<(), EditError> {
    for pair in sorted.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.start_offset() < prev.end_offset() {
            return Err(EditError::OverlappingEdits {
                offset: next.start_offset(),
            });
        }
    }
    Ok(())
}

/// Apply edits to source code, reproducing untouched text exactly
///
/// # Arguments
/// * `source` - The original source code
/// * `edits` - Slice of edits to apply, in any order
///
/// # Returns
/// * `Ok(String)` - The modified source code
/// * `Err(EditError)` - If edits overlap or are out of bounds
pub fn apply_edits(source: &str, edits: &[Edit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(source.to_string());
    }

    let mut sorted: Vec<Edit> = edits.to_vec();
    sort_edits(&mut sorted);

    // Validate bounds before touching anything
    let source_len = source.len();
    for edit in &sorted {
        let (start, end) = (edit.start_offset(), edit.end_offset());
        if end > source_len || start > end {
            return Err(EditError::SpanOutOfBounds {
                start,
                end,
                len: source_len,
            });
        }
        for offset in [start, end] {
            if !source.is_char_boundary(offset) {
                return Err(EditError::NotCharBoundary { offset });
            }
        }
    }
    check_disjoint(&sorted)?;

    let growth: usize = sorted.iter().map(|e| e.replacement.len()).sum();
    let mut result = String::with_capacity(source_len + growth);
    let mut cursor = 0;

    for edit in &sorted {
        result.push_str(&source[cursor..edit.start_offset()]);
        result.push_str(&edit.replacement);
        cursor = edit.end_offset();
    }
    result.push_str(&source[cursor..]);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_replacement() {
        let source = "list.add(x);";
        let edit = Edit::new(Span::new(0, 11), "list.push(x)", "rename call");

        let result = apply_edits(source, &[edit]).unwrap();
        assert_eq!(result, "list.push(x);");
    }

    #[test]
    fn test_multiple_edits_any_order() {
        let source = "a(1); b(2);";
        let edits = vec![
            Edit::new(Span::new(6, 10), "c(3)", "second"),
            Edit::new(Span::new(0, 4), "d(4)", "first"),
        ];

        let result = apply_edits(source, &edits).unwrap();
        assert_eq!(result, "d(4); c(3);");
    }

    #[test]
    fn test_empty_edits() {
        let source = "unchanged";
        let result = apply_edits(source, &[]).unwrap();
        assert_eq!(result, "unchanged");
    }

    #[test]
    fn test_insert_touching_delete() {
        let source = "A, B, C";
        let edits = vec![
            Edit::delete(Span::new(3, 6), "remove B"),
            Edit::insert(3, "X, ", "insert X"),
        ];

        let result = apply_edits(source, &edits).unwrap();
        assert_eq!(result, "A, X, C");
    }

    #[test]
    fn test_inserts_at_same_offset_keep_order() {
        let source = "ab";
        let edits = vec![Edit::insert(1, "1", "one"), Edit::insert(1, "2", "two")];

        let result = apply_edits(source, &edits).unwrap();
        assert_eq!(result, "a12b");
    }

    #[test]
    fn test_overlapping_edits() {
        let source = "abcdef";
        let edits = vec![
            Edit::new(Span::new(0, 4), "x", "first"),
            Edit::new(Span::new(2, 5), "y", "second"),
        ];

        let result = apply_edits(source, &edits);
        assert!(matches!(result, Err(EditError::OverlappingEdits { offset: 2 })));
    }

    #[test]
    fn test_insert_inside_replacement_overlaps() {
        let source = "abcdef";
        let edits = vec![
            Edit::new(Span::new(0, 4), "x", "replace"),
            Edit::insert(2, "y", "insert"),
        ];

        assert!(apply_edits(source, &edits).is_err());
    }

    #[test]
    fn test_out_of_bounds() {
        let source = "short";
        let edit = Edit::new(Span::new(0, 100), "replacement", "oob");

        let result = apply_edits(source, &[edit]);
        assert!(matches!(result, Err(EditError::SpanOutOfBounds { .. })));
    }

    #[test]
    fn test_not_char_boundary() {
        let source = "é";
        let edit = Edit::insert(1, "x", "mid char");

        let result = apply_edits(source, &[edit]);
        assert!(matches!(result, Err(EditError::NotCharBoundary { offset: 1 })));
    }
}
