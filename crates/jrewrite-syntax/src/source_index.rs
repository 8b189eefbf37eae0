//! Source Span Index
//!
//! Offset queries over the original text: neighbouring tokens, line
//! geometry, and extended node ranges that take in the comments a node owns.

use crate::ast::{Ast, NodeId};
use crate::cst::{Comment, Token};
use jrewrite_core::Span;

impl Ast {
    /// Last token ending at or before `offset`
    pub fn token_before(&self, offset: usize) -> Option<&Token> {
        let tokens = self.tokens();
        let idx = tokens.partition_point(|t| t.span.end <= offset);
        idx.checked_sub(1).map(|i| &tokens[i])
    }

    /// First token starting at or after `offset`
    pub fn token_after(&self, offset: usize) -> Option<&Token> {
        let tokens = self.tokens();
        let idx = tokens.partition_point(|t| t.span.start < offset);
        tokens.get(idx)
    }

    /// Tokens lying completely inside `range`
    pub fn tokens_in(&self, range: Span) -> &[Token] {
        let tokens = self.tokens();
        let from = tokens.partition_point(|t| t.span.start < range.start);
        let to = tokens.partition_point(|t| t.span.end <= range.end);
        if from >= to {
            &[]
        } else {
            &tokens[from..to]
        }
    }

    /// First token inside `range` whose text is `text`
    pub fn find_token(&self, range: Span, text: &str) -> Option<Span> {
        self.tokens_in(range)
            .iter()
            .find(|t| t.text(self.source()) == text)
            .map(|t| t.span)
    }

    /// Last token inside `range` whose text is `text`
    pub fn find_token_rev(&self, range: Span, text: &str) -> Option<Span> {
        self.tokens_in(range)
            .iter()
            .rev()
            .find(|t| t.text(self.source()) == text)
            .map(|t| t.span)
    }

    /// Comments lying completely inside `range`
    pub fn comments_in(&self, range: Span) -> &[Comment] {
        let comments = self.comments();
        let from = comments.partition_point(|c| c.span.start < range.start);
        let to = comments.partition_point(|c| c.span.end <= range.end);
        if from >= to {
            &[]
        } else {
            &comments[from..to]
        }
    }

    /// Offset of the first character of the line containing `offset`
    pub fn line_start(&self, offset: usize) -> usize {
        self.source()[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    /// Offset of the line break ending the line containing `offset` (or the text end)
    pub fn line_end(&self, offset: usize) -> usize {
        let source = self.source();
        let end = source[offset..].find('\n').map(|i| offset + i).unwrap_or(source.len());
        if end > offset && source.as_bytes()[end - 1] == b'\r' {
            end - 1
        } else {
            end
        }
    }

    /// Leading whitespace of the line containing `offset`
    pub fn indent_at(&self, offset: usize) -> &str {
        let start = self.line_start(offset);
        let line = &self.source()[start..];
        let width = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..width]
    }

    /// Whether only spaces and tabs separate the line start from `offset`
    pub fn is_first_on_line(&self, offset: usize) -> bool {
        self.source()[self.line_start(offset)..offset]
            .chars()
            .all(|c| c == ' ' || c == '\t')
    }

    /// Range of a node widened over the comments it owns.
    ///
    /// Leading comments sit on the lines directly above the node (no blank
    /// line in between) and do not trail a token on their own line. A
    /// trailing comment starts on the line the node ends on. The range never
    /// leaves the parent node.
    pub fn extended_span(&self, id: NodeId) -> Span {
        let span = self.span(id);
        let bounds = self
            .parent(id)
            .map(|(p, _)| self.span(p))
            .unwrap_or_else(|| Span::new(0, self.source().len()));
        let source = self.source();
        let comments = self.comments();

        let mut start = span.start;
        let mut idx = comments.partition_point(|c| c.span.end <= start);
        while idx > 0 {
            let comment = comments[idx - 1];
            if comment.span.start < bounds.start {
                break;
            }
            let gap = &source[comment.span.end..start];
            if !gap.trim().is_empty() || gap.matches('\n').count() > 1 {
                break;
            }
            let trails_token = self
                .token_before(comment.span.start)
                .is_some_and(|t| !source[t.span.end..comment.span.start].contains('\n'));
            if trails_token {
                break;
            }
            start = comment.span.start;
            idx -= 1;
        }

        let mut end = span.end;
        let mut idx = comments.partition_point(|c| c.span.start < end);
        while let Some(comment) = comments.get(idx) {
            if comment.span.end > bounds.end {
                break;
            }
            let gap = &source[end..comment.span.start];
            if !gap.chars().all(|c| c == ' ' || c == '\t') {
                break;
            }
            end = comment.span.end;
            idx += 1;
        }

        Span::new(start, end)
    }
}
