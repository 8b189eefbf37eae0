//! List slot synthesis
//!
//! The gaps between consecutive original elements are their separators. A
//! removed element takes the gap that follows it when a kept element comes
//! later, otherwise the gap before it. Insertions attach to the nearest kept
//! element before them (`sep + new` at its end) or, at the front, to the
//! first kept element after them (`new + sep` at its start).

use super::collector::EditCollector;
use super::{element_span, Synth};
use crate::error::{Result, RewriteError};
use crate::events::{ListEntry, RewriteEvent};
use jrewrite_core::Span;
use jrewrite_syntax::{NodeId, NodeKind, Prop, Separator};

impl Synth<'_, '_> {
    pub(super) fn list_change(
        &mut self,
        parent: NodeId,
        prop: Prop,
        separator: Separator,
        entries: &[ListEntry],
        out: &mut EditCollector,
    ) -> Result<()> {
        let ast = self.ast;
        let originals = ast.list(parent, prop);
        let spans: Vec<Span> = originals.iter().map(|&o| element_span(ast, o)).collect();
        let kept: Vec<bool> = originals
            .iter()
            .map(|&o| entries.iter().any(|e| e.original == Some(o) && e.is_kept()))
            .collect();
        let has_inserts = entries.iter().any(|e| e.event == RewriteEvent::Inserted);
        let indent = self.list_indent(parent, separator, &spans);
        let sep = self.separator(separator, &indent, &spans);

        // Removals
        if !kept.contains(&true) && !originals.is_empty() && !has_inserts && self.is_line_list(separator) {
            out.delete(self.full_lines(spans[0].start, spans[spans.len() - 1].end), "remove list elements");
        } else {
            // modifiers leave no gap before the next token once all are gone
            let emptied_space_list = separator == Separator::Space && !kept.contains(&true) && !has_inserts;
            for i in 0..originals.len() {
                if kept[i] {
                    continue;
                }
                let mut range = if kept[i + 1..].contains(&true) {
                    Span::new(spans[i].start, spans[i + 1].start)
                } else if i > 0 {
                    Span::new(spans[i - 1].end, spans[i].end)
                } else {
                    spans[i]
                };
                if emptied_space_list && i + 1 == originals.len() {
                    if let Some(next) = ast.token_after(range.end) {
                        range.end = next.span.start;
                    }
                }
                out.delete(range, "remove list element");
            }
        }

        // Kept elements and insertions, in output order
        let mut leading: Vec<String> = Vec::new();
        let mut anchor: Option<usize> = None;
        let mut trailing = String::new();
        for entry in entries {
            match (entry.event, entry.original) {
                (RewriteEvent::Unchanged | RewriteEvent::Replaced(_), Some(original)) => {
                    let i = originals
                        .iter()
                        .position(|&o| o == original)
                        .ok_or_else(|| self.missing(parent, "list element"))?;
                    if let Some(previous) = anchor {
                        out.insert(spans[previous].end, std::mem::take(&mut trailing), "insert list element");
                    }
                    if !leading.is_empty() {
                        let text = format!("{}{}", leading.join(&sep), sep);
                        out.insert(spans[i].start, text, "insert list element");
                        leading.clear();
                    }
                    match entry.event {
                        RewriteEvent::Replaced(new) => {
                            let span = ast.span(original);
                            let text = self.render(new, ast.indent_at(span.start))?;
                            out.replace(span, text, "replace list element");
                        }
                        _ => self.visit(original, out)?,
                    }
                    anchor = Some(i);
                }
                (RewriteEvent::Inserted, _) => {
                    let text = self.render(entry.node, &indent)?;
                    if anchor.is_some() {
                        trailing.push_str(&sep);
                        trailing.push_str(&text);
                    } else {
                        leading.push(text);
                    }
                }
                _ => {}
            }
        }
        if let Some(previous) = anchor {
            out.insert(spans[previous].end, trailing, "insert list element");
        }
        if !leading.is_empty() {
            if originals.is_empty() {
                self.insert_into_empty(parent, prop, separator, &leading, &indent, out)?;
            } else {
                out.insert(spans[0].start, leading.join(&sep), "insert list element");
            }
        }
        Ok(())
    }

    fn is_line_list(&self, separator: Separator) -> bool {
        matches!(separator, Separator::Line | Separator::Members)
    }

    /// `start..end` widened to whole lines when nothing else shares them
    fn full_lines(&self, start: usize, end: usize) -> Span {
        let ast = self.ast;
        let source = ast.source();
        let start = if ast.is_first_on_line(start) {
            ast.line_start(start)
        } else {
            start
        };
        let line_end = ast.line_end(end);
        let end = if source[end..line_end].trim().is_empty() {
            let after = &source[line_end..];
            if after.starts_with("\r\n") {
                line_end + 2
            } else if after.starts_with('\n') {
                line_end + 1
            } else {
                line_end
            }
        } else {
            end
        };
        Span::new(start, end)
    }

    /// Indentation of the elements of a list
    fn list_indent(&self, parent: NodeId, separator: Separator, spans: &[Span]) -> String {
        let ast = self.ast;
        let parent_indent = ast.indent_at(ast.span(parent).start);
        if !self.is_line_list(separator) {
            return parent_indent.to_string();
        }
        match spans.first() {
            Some(first) if ast.is_first_on_line(first.start) => ast.indent_at(first.start).to_string(),
            _ if ast.kind(parent) == NodeKind::CompilationUnit => String::new(),
            _ => format!("{}{}", parent_indent, self.unit),
        }
    }

    fn separator(&self, separator: Separator, indent: &str, spans: &[Span]) -> String {
        match separator {
            Separator::Comma => {
                let source = self.ast.source();
                match spans {
                    [a, b, ..] if source[a.end..b.start].contains('\n') => {
                        format!(",{}{}", self.ld, self.ast.indent_at(b.start))
                    }
                    _ => self.config.comma().to_string(),
                }
            }
            Separator::Space => " ".to_string(),
            Separator::Ampersand => " & ".to_string(),
            Separator::Line => format!("{}{}", self.ld, indent),
            Separator::Members => format!(
                "{}{}",
                self.ld.repeat(1 + self.config.blank_lines_between_members),
                indent
            ),
        }
    }

    fn insert_into_empty(
        &mut self,
        parent: NodeId,
        prop: Prop,
        separator: Separator,
        items: &[String],
        indent: &str,
        out: &mut EditCollector,
    ) -> Result<()> {
        use NodeKind::*;
        let ast = self.ast;
        let kind = ast.kind(parent);
        let span = ast.span(parent);
        let ld = self.ld;
        let joined = items.join(&self.separator(separator, indent, &[]));
        const MESSAGE: &str = "insert into empty list";

        match (kind, prop) {
            (_, Prop::Modifiers) => out.insert(span.start, format!("{} ", joined), MESSAGE),
            (CompilationUnit, Prop::Imports) => match ast.child(parent, Prop::Package) {
                // Below the package line, after any comment trailing it
                Some(package) => out.insert(ast.extended_span(package).end, format!("{ld}{ld}{joined}"), MESSAGE),
                None => {
                    let at = ast
                        .list(parent, Prop::Types)
                        .first()
                        .map(|&t| ast.extended_span(t).start)
                        .unwrap_or(0);
                    out.insert(at, format!("{joined}{ld}{ld}"), MESSAGE);
                }
            },
            (CompilationUnit, Prop::Types) => {
                let source = ast.source();
                let text = if source.trim().is_empty() {
                    format!("{joined}{ld}")
                } else if source.ends_with('\n') {
                    format!("{ld}{joined}{ld}")
                } else {
                    format!("{ld}{ld}{joined}")
                };
                out.insert(source.len(), text, MESSAGE);
            }
            (Block, Prop::Statements) | (TypeDeclaration | EnumDeclaration, Prop::BodyDeclarations) => {
                self.insert_into_body(parent, &joined, indent, out)?;
            }
            (EnumDeclaration, Prop::EnumConstants) => {
                let open = self.open_brace(parent)?;
                let next = ast
                    .token_after(open.end)
                    .map(|t| t.span.start)
                    .unwrap_or(span.end);
                if ast.source()[open.end..next].trim().is_empty() {
                    out.replace(Span::new(open.end, next), format!(" {} ", joined), MESSAGE);
                } else {
                    out.insert(open.end, format!(" {}", joined), MESSAGE);
                }
            }
            (TypeDeclaration | EnumDeclaration, Prop::Interfaces) => {
                let keyword = if kind == TypeDeclaration && ast.flag(parent, Prop::Interface) {
                    " extends "
                } else {
                    " implements "
                };
                let after = ast
                    .child(parent, Prop::Superclass)
                    .or_else(|| ast.child(parent, Prop::Name))
                    .ok_or_else(|| self.missing(parent, "name"))?;
                out.insert(ast.span(after).end, format!("{}{}", keyword, joined), MESSAGE);
            }
            (MethodDeclaration, Prop::ThrownExceptions) => {
                let close = self.parameters_close(parent)?;
                out.insert(close.end, format!(" throws {}", joined), MESSAGE);
            }
            (MethodDeclaration, Prop::Parameters)
            | (MethodInvocation | ClassInstanceCreation, Prop::Arguments) => {
                let open = self.open_paren(parent)?;
                out.insert(open.end, joined, MESSAGE);
            }
            (Annotation | EnumConstant, Prop::Arguments) => {
                let name_slot = if kind == Annotation { Prop::TypeName } else { Prop::Name };
                let name_end = ast
                    .child(parent, name_slot)
                    .map(|n| ast.span(n).end)
                    .ok_or_else(|| self.missing(parent, "name"))?;
                match ast.token_after(name_end) {
                    Some(t) if t.text(ast.source()) == "(" && t.span.end <= span.end => {
                        out.insert(t.span.end, joined, MESSAGE)
                    }
                    _ => out.insert(name_end, format!("({})", joined), MESSAGE),
                }
            }
            (ParameterizedType, Prop::TypeArguments) => {
                let open = ast
                    .find_token(span, "<")
                    .ok_or_else(|| self.missing(parent, "'<'"))?;
                out.insert(open.end, joined, MESSAGE);
            }
            _ => {
                return Err(RewriteError::InternalConsistency(format!(
                    "cannot insert into the empty {} list of {:?}",
                    prop, kind
                )))
            }
        }
        Ok(())
    }

    /// Fill the braces of a block or type body
    fn insert_into_body(&mut self, parent: NodeId, joined: &str, indent: &str, out: &mut EditCollector) -> Result<()> {
        let ast = self.ast;
        let source = ast.source();
        let span = ast.span(parent);
        let ld = self.ld;
        let close = ast
            .find_token_rev(span, "}")
            .filter(|c| c.end == span.end)
            .ok_or_else(|| self.missing(parent, "closing '}'"))?;

        let (anchor, prefix) = match ast.kind(parent) {
            NodeKind::EnumDeclaration => self.enum_body_anchor(parent)?,
            NodeKind::Block => (span.start + 1, ""),
            _ => (self.open_brace(parent)?.end, ""),
        };
        let outer = ast.indent_at(span.start);
        if source[anchor..close.start].trim().is_empty() {
            out.replace(
                Span::new(anchor, close.start),
                format!("{prefix}{ld}{indent}{joined}{ld}{outer}"),
                "insert into empty body",
            );
        } else {
            out.insert(anchor, format!("{prefix}{ld}{indent}{joined}"), "insert into empty body");
        }
        Ok(())
    }

    /// Offset after the `;` ending enum constants, or where a `;` must be added
    fn enum_body_anchor(&self, parent: NodeId) -> Result<(usize, &'static str)> {
        let ast = self.ast;
        let source = ast.source();
        let mut after = match ast.list(parent, Prop::EnumConstants).last() {
            Some(&last) => ast.span(last).end,
            None => self.open_brace(parent)?.end,
        };
        if let Some(comma) = ast.token_after(after).filter(|t| t.text(source) == ",") {
            after = comma.span.end;
        }
        match ast.token_after(after) {
            Some(t) if t.text(source) == ";" => Ok((t.span.end, "")),
            _ => Ok((after, ";")),
        }
    }

    fn open_brace(&self, parent: NodeId) -> Result<Span> {
        let ast = self.ast;
        let span = ast.span(parent);
        let name_end = ast
            .child(parent, Prop::Name)
            .map(|n| ast.span(n).end)
            .unwrap_or(span.start);
        ast.find_token(Span::new(name_end, span.end), "{")
            .ok_or_else(|| self.missing(parent, "opening '{'"))
    }

    fn open_paren(&self, parent: NodeId) -> Result<Span> {
        let ast = self.ast;
        let before = if ast.kind(parent) == NodeKind::ClassInstanceCreation {
            Prop::Type
        } else {
            Prop::Name
        };
        ast.child(parent, before)
            .and_then(|c| ast.token_after(ast.span(c).end))
            .filter(|t| t.text(ast.source()) == "(")
            .map(|t| t.span)
            .ok_or_else(|| self.missing(parent, "'('"))
    }

    fn parameters_close(&self, parent: NodeId) -> Result<Span> {
        let ast = self.ast;
        let after = match ast.list(parent, Prop::Parameters).last() {
            Some(&last) => ast.span(last).end,
            None => self.open_paren(parent)?.end,
        };
        ast.token_after(after)
            .filter(|t| t.text(ast.source()) == ")")
            .map(|t| t.span)
            .ok_or_else(|| self.missing(parent, "')'"))
    }
}
