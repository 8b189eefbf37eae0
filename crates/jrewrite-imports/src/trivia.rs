//! Comment classification
//!
//! Every comment is tagged once with how it is separated from whatever
//! precedes it. Ownership decisions read these tags instead of looking at
//! whitespace again.

use jrewrite_core::Span;
use jrewrite_syntax::{Comment, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub span: Span,
    /// At least one empty line separates it from the previous token or comment
    pub preceding_blank_line: bool,
    /// It starts on the line where the previous token or comment ends
    pub same_line: bool,
}

/// Whether the text between two offsets contains an empty line
pub(crate) fn blank_line_between(source: &str, from: usize, to: usize) -> bool {
    from < to && source[from..to].matches('\n').count() >= 2
}

pub(crate) fn classify(source: &str, tokens: &[Token], comments: &[Comment]) -> Vec<Trivia> {
    let mut out = Vec::with_capacity(comments.len());
    let mut previous_comment_end: Option<usize> = None;
    for comment in comments {
        let start = comment.span.start;
        let idx = tokens.partition_point(|t| t.span.end <= start);
        let token_end = idx.checked_sub(1).map(|i| tokens[i].span.end);
        let previous_end = match (token_end, previous_comment_end) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let trivia = match previous_end {
            Some(end) => Trivia {
                span: comment.span,
                preceding_blank_line: blank_line_between(source, end, start),
                same_line: !source[end..start].contains('\n'),
            },
            None => Trivia {
                span: comment.span,
                preceding_blank_line: false,
                same_line: false,
            },
        };
        out.push(trivia);
        previous_comment_end = Some(comment.span.end);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrewrite_syntax::lex;

    fn tags(source: &str) -> Vec<(bool, bool)> {
        let lexed = lex(source).unwrap();
        classify(source, &lexed.tokens, &lexed.comments)
            .iter()
            .map(|t| (t.preceding_blank_line, t.same_line))
            .collect()
    }

    #[test]
    fn test_classify() {
        let source = "// head\nimport a.A; // same\n// next\n\n/* floating */\nimport b.B;";
        assert_eq!(
            tags(source),
            vec![(false, false), (false, true), (false, false), (true, false)]
        );
    }

    #[test]
    fn test_blank_line_between() {
        assert!(blank_line_between("a\n\nb", 1, 3));
        assert!(!blank_line_between("a\n  b", 1, 4));
        assert!(blank_line_between("a\r\n\r\nb", 1, 5));
    }
}
