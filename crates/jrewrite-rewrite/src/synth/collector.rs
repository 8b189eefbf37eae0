//! Accumulates synthesized edits and enforces the output invariants

use crate::error::{Result, RewriteError};
use jrewrite_core::{check_disjoint, sort_edits, Edit, EditError, Span};

#[derive(Debug, Default)]
pub(crate) struct EditCollector {
    edits: Vec<Edit>,
}

impl EditCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, offset: usize, text: impl Into<String>, message: &str) {
        let text = text.into();
        if !text.is_empty() {
            self.edits.push(Edit::insert(offset, text, message));
        }
    }

    pub fn replace(&mut self, span: Span, text: impl Into<String>, message: &str) {
        self.edits.push(Edit::new(span, text, message));
    }

    pub fn delete(&mut self, span: Span, message: &str) {
        if !span.is_empty() {
            self.edits.push(Edit::delete(span, message));
        }
    }

    /// Sorted, disjoint edits; insertions at one offset are merged in emission order
    pub fn finish(self) -> Result<Vec<Edit>> {
        let mut edits = self.edits;
        sort_edits(&mut edits);

        let mut merged: Vec<Edit> = Vec::with_capacity(edits.len());
        for edit in edits {
            match merged.last_mut() {
                Some(prev) if prev.is_insert() && edit.is_insert() && prev.span == edit.span => {
                    prev.replacement.push_str(&edit.replacement);
                }
                _ => merged.push(edit),
            }
        }

        check_disjoint(&merged).map_err(|e| match e {
            EditError::OverlappingEdits { offset } => RewriteError::InternalConsistency(format!(
                "synthesized edits overlap at offset {}",
                offset
            )),
            other => RewriteError::Edit(other),
        })?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_insertions_at_same_offset() {
        let mut out = EditCollector::new();
        out.insert(4, ", X", "insert");
        out.delete(Span::new(0, 3), "remove");
        out.insert(4, ", Y", "insert");
        let edits = out.finish().unwrap();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[1].replacement, ", X, Y");
    }

    #[test]
    fn test_insert_before_deletion_at_same_offset() {
        let mut out = EditCollector::new();
        out.delete(Span::new(2, 6), "remove");
        out.insert(2, "new", "insert");
        let edits = out.finish().unwrap();
        assert!(edits[0].is_insert());
        assert_eq!(edits[1].span, Span::new(2, 6));
    }

    #[test]
    fn test_overlap_is_internal_inconsistency() {
        let mut out = EditCollector::new();
        out.replace(Span::new(0, 5), "a", "replace");
        out.replace(Span::new(3, 8), "b", "replace");
        assert!(matches!(
            out.finish(),
            Err(RewriteError::InternalConsistency(_))
        ));
    }

    #[test]
    fn test_empty_edits_are_dropped() {
        let mut out = EditCollector::new();
        out.insert(1, "", "insert");
        out.delete(Span::new(3, 3), "remove");
        assert!(out.finish().unwrap().is_empty());
    }
}
