//! Existing import declarations and the comments they own
//!
//! Between two imports, a comment on the earlier import's line trails it, as
//! do comments that follow it before the first empty line. Comments directly
//! above an import (no empty line in between) lead it, and so does anything
//! floating after an empty line. Before the first import only the attached
//! comments are taken; after the last one only the trailing ones are.

use crate::name::ImportName;
use crate::section::Header;
use crate::trivia::{blank_line_between, Trivia};
use jrewrite_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImportRecord {
    pub name: ImportName,
    /// `import ...;`
    pub span: Span,
    pub leading: Vec<Span>,
    pub trailing: Vec<Span>,
    /// The first trailing comment shares the declaration's line
    pub trailing_same_line: bool,
}

impl ImportRecord {
    /// Declaration together with its comments
    pub fn extended(&self) -> Span {
        let start = self.leading.first().map_or(self.span.start, |c| c.start);
        let end = self.trailing.last().map_or(self.span.end, |c| c.end);
        Span::new(start, end)
    }

    pub fn has_comments(&self) -> bool {
        !self.leading.is_empty() || !self.trailing.is_empty()
    }
}

pub(crate) fn build_records(source: &str, header: &Header, trivia: &[Trivia]) -> Vec<ImportRecord> {
    let mut records: Vec<ImportRecord> = header
        .imports
        .iter()
        .map(|import| ImportRecord {
            name: import.name.clone(),
            span: import.span,
            leading: Vec::new(),
            trailing: Vec::new(),
            trailing_same_line: false,
        })
        .collect();
    let count = records.len();
    if count == 0 {
        return records;
    }

    for gap in 0..=count {
        let from = match gap {
            0 => header.package.as_ref().map_or(0, |p| p.span.end),
            _ => records[gap - 1].span.end,
        };
        let (to, next_exists) = if gap < count {
            (records[gap].span.start, true)
        } else {
            match header.body_start {
                Some(start) => (start, true),
                None => (source.len(), false),
            }
        };
        let comments: Vec<Trivia> = trivia
            .iter()
            .filter(|t| t.span.start >= from && t.span.end <= to)
            .copied()
            .collect();
        let prev_is_import = gap > 0;
        let next_is_import = gap < count;

        // same-line comments of the previous import
        let mut idx = 0;
        if prev_is_import {
            while idx < comments.len() && comments[idx].same_line {
                let record = &mut records[gap - 1];
                if idx == 0 {
                    record.trailing_same_line = true;
                }
                record.trailing.push(comments[idx].span);
                idx += 1;
            }
        }

        // comments attached to the next item
        let mut chain = comments.len();
        if next_exists {
            while chain > idx {
                let comment = comments[chain - 1];
                let next_start = comments.get(chain).map_or(to, |c| c.span.start);
                if blank_line_between(source, comment.span.end, next_start) || (chain - 1 == 0 && comment.same_line) {
                    break;
                }
                chain -= 1;
            }
        }

        let mut middle = idx;
        if prev_is_import {
            while middle < chain && !comments[middle].preceding_blank_line {
                records[gap - 1].trailing.push(comments[middle].span);
                middle += 1;
            }
        }

        if next_is_import {
            let record = &mut records[gap];
            let start = if prev_is_import { middle } else { chain };
            record.leading.extend(comments[start..].iter().map(|c| c.span));
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::scan;
    use crate::trivia::classify;
    use jrewrite_syntax::{leaves, parse_tree};

    fn records(source: &str) -> Vec<ImportRecord> {
        let tree = parse_tree(source).unwrap();
        let lexed = leaves(&tree, source);
        let header = scan(source, tree.root_node()).unwrap();
        let trivia = classify(source, &lexed.tokens, &lexed.comments);
        build_records(source, &header, &trivia)
    }

    fn texts<'s>(source: &'s str, spans: &[Span]) -> Vec<&'s str> {
        spans.iter().map(|s| s.text(source)).collect()
    }

    #[test]
    fn test_leading_and_trailing_ownership() {
        let source = "package p; // pkg\n\n// license-ish\n\n// about A\nimport a.A; // A line\n// after A\n\n// floating\n// about B\nimport b.B;\n// after B\n\nclass C {}";
        let records = records(source);
        assert_eq!(texts(source, &records[0].leading), vec!["// about A"]);
        assert_eq!(texts(source, &records[0].trailing), vec!["// A line", "// after A"]);
        assert!(records[0].trailing_same_line);
        assert_eq!(texts(source, &records[1].leading), vec!["// floating", "// about B"]);
        assert_eq!(texts(source, &records[1].trailing), vec!["// after B"]);
        assert!(!records[1].trailing_same_line);
    }

    #[test]
    fn test_comment_above_next_import_leads_it() {
        let source = "import a.A;\n// about B\nimport b.B;\nclass C {}";
        let records = records(source);
        assert!(records[0].trailing.is_empty());
        assert_eq!(texts(source, &records[1].leading), vec!["// about B"]);
    }

    #[test]
    fn test_type_javadoc_is_not_taken() {
        let source = "import a.A;\n/** Doc */\nclass C {}";
        let records = records(source);
        assert!(!records[0].has_comments());
        assert_eq!(records[0].extended().text(source), "import a.A;");
    }

    #[test]
    fn test_same_line_leading_comment() {
        let source = "/* x */ import a.A;\nclass C {}";
        let records = records(source);
        assert_eq!(records[0].extended().text(source), "/* x */ import a.A;");
    }
}
