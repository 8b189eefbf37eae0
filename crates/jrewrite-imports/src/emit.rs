//! Import block text
//!
//! Declarations kept as they were are copied from the source together with
//! their comments. Declarations that changed, or that take over comments of
//! other declarations, are printed with those comments around them.

use crate::name::ImportName;
use crate::record::ImportRecord;
use jrewrite_core::{Edit, Span};

/// One declaration of the rewritten block
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub name: ImportName,
    /// Original declaration whose text and comments are reused
    pub record: Option<usize>,
    /// Declarations whose comments move onto this one
    pub absorbed: Vec<usize>,
}

impl Entry {
    pub fn new(name: ImportName, record: Option<usize>) -> Self {
        Self {
            name,
            record,
            absorbed: Vec::new(),
        }
    }

    /// Records contributing comments, in source order
    pub fn comment_owners(&self) -> Vec<usize> {
        let mut owners: Vec<usize> = self.record.into_iter().chain(self.absorbed.iter().copied()).collect();
        owners.sort_unstable();
        owners.dedup();
        owners
    }

    fn is_verbatim(&self, records: &[ImportRecord]) -> bool {
        self.absorbed.is_empty() && self.record.is_some_and(|r| records[r].name == self.name)
    }
}

fn render_entry(source: &str, records: &[ImportRecord], entry: &Entry, ld: &str) -> String {
    if let Some(record) = entry.record.filter(|_| entry.is_verbatim(records)) {
        return records[record].extended().text(source).to_string();
    }
    let owners = entry.comment_owners();
    let mut out = String::new();
    for &owner in &owners {
        for comment in &records[owner].leading {
            out.push_str(comment.text(source));
            out.push_str(ld);
        }
    }
    out.push_str(&entry.name.declaration());
    let mut first = true;
    for &owner in &owners {
        let record = &records[owner];
        for (i, comment) in record.trailing.iter().enumerate() {
            if first && i == 0 && record.trailing_same_line {
                out.push(' ');
            } else {
                out.push_str(ld);
            }
            out.push_str(comment.text(source));
            first = false;
        }
    }
    out
}

/// Text of the whole block: entries one per line, groups apart by blank lines
pub(crate) fn render_block(
    source: &str,
    records: &[ImportRecord],
    groups: &[Vec<Entry>],
    ld: &str,
    blank_lines: usize,
) -> String {
    let group_separator = ld.repeat(blank_lines + 1);
    groups
        .iter()
        .map(|group| {
            group
                .iter()
                .map(|entry| render_entry(source, records, entry, ld))
                .collect::<Vec<_>>()
                .join(ld)
        })
        .collect::<Vec<_>>()
        .join(&group_separator)
}

/// Replacement of `region` by `new`, narrowed to the lines that differ
pub(crate) fn minimal_edit(source: &str, region: Span, new: &str) -> Option<Edit> {
    let old = region.text(source);
    if old == new {
        return None;
    }
    let old_lines: Vec<&str> = old.split_inclusive('\n').collect();
    let new_lines: Vec<&str> = new.split_inclusive('\n').collect();
    let prefix = old_lines
        .iter()
        .zip(&new_lines)
        .take_while(|(a, b)| a == b)
        .count();
    let room = old_lines.len().min(new_lines.len()) - prefix;
    let suffix = old_lines
        .iter()
        .rev()
        .zip(new_lines.iter().rev())
        .take(room)
        .take_while(|(a, b)| a == b)
        .count();

    let bytes = |lines: &[&str]| lines.iter().map(|l| l.len()).sum::<usize>();
    let old_start = bytes(&old_lines[..prefix]);
    let old_end = old.len() - bytes(&old_lines[old_lines.len() - suffix..]);
    let new_start = bytes(&new_lines[..prefix]);
    let new_end = new.len() - bytes(&new_lines[new_lines.len() - suffix..]);
    Some(Edit::new(
        Span::new(region.start + old_start, region.start + old_end),
        &new[new_start..new_end],
        "organize imports",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(source: &str, text: &str, leading: &[&str], trailing: &[&str], same_line: bool) -> ImportRecord {
        let find = |t: &str| {
            let start = source.find(t).unwrap();
            Span::new(start, start + t.len())
        };
        let span = find(text);
        ImportRecord {
            name: ImportName::parse(
                text.trim_start_matches("import ").trim_end_matches(';'),
                false,
            ),
            span,
            leading: leading.iter().map(|c| find(c)).collect(),
            trailing: trailing.iter().map(|c| find(c)).collect(),
            trailing_same_line: same_line,
        }
    }

    #[test]
    fn test_render_merged_comments() {
        let source = "// a\nimport p.A; // a2\n// b\nimport p.B; /* b2 */\n";
        let records = vec![
            record(source, "import p.A;", &["// a"], &["// a2"], true),
            record(source, "import p.B;", &["// b"], &["/* b2 */"], true),
        ];
        let entry = Entry {
            name: ImportName::on_demand("p", false),
            record: None,
            absorbed: vec![0, 1],
        };
        let block = render_block(source, &records, &[vec![entry]], "\n", 1);
        assert_eq!(block, "// a\n// b\nimport p.*; // a2\n/* b2 */");
    }

    #[test]
    fn test_verbatim_entries_and_groups() {
        let source = "import a.A; // keep\nimport b.B;\n";
        let records = vec![
            record(source, "import a.A;", &[], &["// keep"], true),
            record(source, "import b.B;", &[], &[], false),
        ];
        let groups = vec![
            vec![Entry::new(records[0].name.clone(), Some(0))],
            vec![Entry::new(records[1].name.clone(), Some(1)), Entry::new(ImportName::single("b.C", false), None)],
        ];
        let block = render_block(source, &records, &groups, "\n", 1);
        assert_eq!(block, "import a.A; // keep\n\nimport b.B;\nimport b.C;");
    }

    #[test]
    fn test_minimal_edit_keeps_common_lines() {
        let source = "import a.A;\nimport c.C;\n\nclass X {}";
        let region = Span::new(0, 23);
        let edit = minimal_edit(source, region, "import a.A;\nimport b.B;\nimport c.C;").unwrap();
        assert_eq!(edit.span, Span::new(12, 12));
        assert_eq!(edit.replacement, "import b.B;\n");
        assert!(minimal_edit(source, region, "import a.A;\nimport c.C;").is_none());
    }
}
