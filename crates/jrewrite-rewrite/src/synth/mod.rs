//! Text Edit Synthesizer
//!
//! Walks the original tree guided by the recorded events. Unchanged subtrees
//! produce nothing; changed slots produce edits over the exact original
//! ranges, with new content printed and placeholders sliced from the source.

mod collector;
mod layout;
mod list;
mod print;

use crate::error::{Result, RewriteError};
use crate::events::ChildEvent;
use crate::format::FormattingConfig;
use crate::session::{AstRewrite, Placeholder};
use collector::EditCollector;
use jrewrite_core::{apply_edits, Edit, Span};
use jrewrite_syntax::{Ast, NodeId, NodeKind, Prop, Separator, SlotKind, SlotValue};
use layout::{optional_layout, property_span, token_count, Anchor};

/// Range a node occupies as a list element or placeholder source.
///
/// Elements of line-separated lists carry the comments they own.
pub(crate) fn element_span(ast: &Ast, id: NodeId) -> Span {
    let line_separated = ast
        .parent(id)
        .and_then(|(parent, prop)| ast.kind(parent).slot(prop))
        .is_some_and(|slot| matches!(slot.kind, SlotKind::List(Separator::Line | Separator::Members)));
    if line_separated {
        ast.extended_span(id)
    } else {
        ast.span(id)
    }
}

/// Compute the edits of a whole session
pub(crate) fn synthesize(rewrite: &AstRewrite<'_>) -> Result<Vec<Edit>> {
    let mut synth = Synth::new(rewrite);
    synth.node_edits(rewrite.ast().root())
}

pub(crate) struct Synth<'r, 'a> {
    rw: &'r AstRewrite<'a>,
    ast: &'a Ast,
    config: &'r FormattingConfig,
    ld: &'static str,
    unit: String,
    /// Placeholder sources currently being expanded
    rendering: Vec<NodeId>,
}

impl<'r, 'a> Synth<'r, 'a> {
    fn new(rw: &'r AstRewrite<'a>) -> Self {
        let ast = rw.ast();
        let config = rw.formatting();
        Self {
            rw,
            ast,
            config,
            ld: config.line_delimiter(ast.source()),
            unit: config.indent_unit(),
            rendering: Vec::new(),
        }
    }

    /// Edits for everything below `id`; the node's own event is not applied
    fn node_edits(&mut self, id: NodeId) -> Result<Vec<Edit>> {
        let mut out = EditCollector::new();
        self.visit(id, &mut out)?;
        out.finish()
    }

    fn visit(&mut self, id: NodeId, out: &mut EditCollector) -> Result<()> {
        let ast = self.ast;
        let rw = self.rw;
        let events = rw.events();
        for slot in ast.kind(id).slots() {
            let prop = slot.prop;
            match slot.kind {
                SlotKind::Child { .. } => {
                    if let Some(event) = events.child(id, prop) {
                        self.child_change(id, prop, *event, out)?;
                    } else if let Some(child) = ast.child(id, prop) {
                        self.visit(child, out)?;
                    }
                }
                SlotKind::List(separator) => match events.list(id, prop) {
                    Some(entries) => self.list_change(id, prop, separator, entries, out)?,
                    None => {
                        for &child in ast.list(id, prop) {
                            self.visit(child, out)?;
                        }
                    }
                },
                SlotKind::Text | SlotKind::Flag => {
                    if let Some(value) = events.property(id, prop) {
                        self.property_change(id, prop, value, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    // ==================== Content ====================

    /// Text for a created node or placeholder placed at `indent`
    fn render(&mut self, id: NodeId, indent: &str) -> Result<String> {
        let rw = self.rw;
        match rw.created(id) {
            Some(node) => match node.placeholder {
                Some(placeholder) => self.placeholder_text(placeholder, indent),
                None => self.print_created(id, indent),
            },
            None => Err(RewriteError::invalid(
                id,
                "original nodes must be placed through a copy or move target",
            )),
        }
    }

    fn placeholder_text(&mut self, placeholder: Placeholder, indent: &str) -> Result<String> {
        if self.rendering.contains(&placeholder.first) {
            return Err(RewriteError::InternalConsistency(format!(
                "placeholder for {} is placed inside its own source",
                placeholder.first
            )));
        }
        self.rendering.push(placeholder.first);
        let text = self.placeholder_source(placeholder);
        self.rendering.pop();

        let range = element_span(self.ast, placeholder.first);
        let source_indent = self.ast.indent_at(range.start);
        Ok(reindent(&text?, source_indent, indent))
    }

    /// Original text of the placeholder range with nested edits applied
    fn placeholder_source(&mut self, placeholder: Placeholder) -> Result<String> {
        let ast = self.ast;
        let range = element_span(ast, placeholder.first).cover(element_span(ast, placeholder.last));
        let mut edits = Vec::new();
        for node in self.rw.range_nodes(placeholder.first, placeholder.last)? {
            for edit in self.node_edits(node)? {
                let start = edit.span.start.checked_sub(range.start);
                let end = edit.span.end.checked_sub(range.start);
                let (Some(start), Some(end)) = (start, end) else {
                    return Err(RewriteError::InternalConsistency(format!(
                        "nested edit at {} lies outside the copied range {}",
                        edit.span, range
                    )));
                };
                edits.push(Edit::new(Span::new(start, end), edit.replacement, edit.message));
            }
        }
        Ok(apply_edits(range.text(ast.source()), &edits)?)
    }

    // ==================== Single-child slots ====================

    fn child_change(&mut self, parent: NodeId, prop: Prop, event: ChildEvent, out: &mut EditCollector) -> Result<()> {
        let ast = self.ast;
        match (event.original, event.new) {
            (Some(old), Some(new)) => {
                let span = ast.span(old);
                let text = self.render(new, ast.indent_at(span.start))?;
                out.replace(span, text, "replace node");
                Ok(())
            }
            (Some(old), None) => self.remove_child(parent, prop, old, out),
            (None, Some(new)) => self.insert_child(parent, prop, new, out),
            (None, None) => Ok(()),
        }
    }

    fn remove_child(&mut self, parent: NodeId, prop: Prop, old: NodeId, out: &mut EditCollector) -> Result<()> {
        let ast = self.ast;
        let source = ast.source();
        let span = ast.span(old);
        let Some(layout) = optional_layout(ast.kind(parent), prop) else {
            // required child vacated by a move
            out.delete(span, "remove node");
            return Ok(());
        };

        if layout.anchor == Anchor::LastToken {
            let start = ast.token_before(span.start).map(|t| t.span.end).unwrap_or(span.start);
            out.replace(Span::new(start, span.end), ";", "remove body");
            return Ok(());
        }

        let mut start = span.start;
        for _ in 0..token_count(layout.prefix) {
            start = ast
                .token_before(start)
                .map(|t| t.span.start)
                .ok_or_else(|| self.missing(parent, "token before the child"))?;
        }
        if layout.prefix.starts_with(char::is_whitespace) {
            start = source[..start].trim_end().len();
        }

        let mut end = span.end;
        for _ in 0..token_count(layout.suffix) {
            end = ast
                .token_after(end)
                .map(|t| t.span.end)
                .ok_or_else(|| self.missing(parent, "token after the child"))?;
        }
        if layout.suffix.ends_with(char::is_whitespace) {
            end = source.len() - source[end..].trim_start().len();
        }

        out.delete(Span::new(start, end), "remove node");
        Ok(())
    }

    fn insert_child(&mut self, parent: NodeId, prop: Prop, new: NodeId, out: &mut EditCollector) -> Result<()> {
        let ast = self.ast;
        let kind = ast.kind(parent);
        let span = ast.span(parent);
        let layout = optional_layout(kind, prop).ok_or(RewriteError::WrongSlot { kind, prop })?;
        let text = self.render(new, ast.indent_at(span.start))?;
        let prefix = layout.prefix.replace('\n', self.ld);
        let suffix = layout.suffix.replace('\n', self.ld);

        if layout.anchor == Anchor::LastToken {
            let semicolon = ast
                .find_token_rev(span, ";")
                .filter(|s| s.end == span.end)
                .ok_or_else(|| self.missing(parent, "terminating ';'"))?;
            out.replace(semicolon, format!("{}{}", prefix, text), "insert body");
            return Ok(());
        }

        let offset = match layout.anchor {
            Anchor::ParentStart => span.start,
            Anchor::AfterFirstToken => ast
                .token_after(span.start)
                .map(|t| t.span.end)
                .ok_or_else(|| self.missing(parent, "leading keyword"))?,
            Anchor::AfterSlot(slot) => ast
                .child(parent, slot)
                .map(|c| ast.span(c).end)
                .ok_or_else(|| self.missing(parent, "anchor child"))?,
            Anchor::BeforeSlot(slot) => ast
                .child(parent, slot)
                .map(|c| ast.span(c).start)
                .ok_or_else(|| self.missing(parent, "anchor child"))?,
            Anchor::LastToken => span.end,
        };
        out.insert(offset, format!("{}{}{}", prefix, text, suffix), "insert node");
        Ok(())
    }

    // ==================== Properties ====================

    fn property_change(&mut self, id: NodeId, prop: Prop, value: &SlotValue, out: &mut EditCollector) -> Result<()> {
        let ast = self.ast;
        let kind = ast.kind(id);
        match value {
            SlotValue::Text(text) => {
                let span = property_span(ast, id, prop).ok_or(RewriteError::WrongSlot { kind, prop })?;
                out.replace(span, text.clone(), "change property");
                Ok(())
            }
            SlotValue::Flag(flag) => self.flag_change(id, prop, *flag, out),
            _ => Err(RewriteError::WrongSlot { kind, prop }),
        }
    }

    fn flag_change(&mut self, id: NodeId, prop: Prop, flag: bool, out: &mut EditCollector) -> Result<()> {
        let ast = self.ast;
        let kind = ast.kind(id);
        if ast.flag(id, prop) == flag {
            return Ok(());
        }
        let span = ast.span(id);
        let child_span = |slot: Prop| {
            ast.child(id, slot)
                .map(|c| ast.span(c))
                .ok_or_else(|| self.missing(id, "child"))
        };
        match (kind, prop) {
            (NodeKind::ImportDeclaration, Prop::Static) => {
                let name = child_span(Prop::Name)?;
                if flag {
                    out.insert(name.start, "static ", "make import static");
                } else {
                    let keyword = ast
                        .find_token(Span::new(span.start, name.start), "static")
                        .ok_or_else(|| self.missing(id, "'static'"))?;
                    out.delete(Span::new(keyword.start, name.start), "make import non-static");
                }
            }
            (NodeKind::ImportDeclaration, Prop::OnDemand) => {
                let name = child_span(Prop::Name)?;
                if flag {
                    out.insert(name.end, ".*", "make import on-demand");
                } else {
                    let semicolon = ast
                        .find_token_rev(span, ";")
                        .ok_or_else(|| self.missing(id, "';'"))?;
                    out.delete(Span::new(name.end, semicolon.start), "make import single");
                }
            }
            (NodeKind::SingleVariableDeclaration, Prop::Varargs) => {
                let ty = child_span(Prop::Type)?;
                if flag {
                    out.insert(ty.end, "...", "make parameter variable-arity");
                } else {
                    let name = child_span(Prop::Name)?;
                    let dots = ast
                        .find_token(Span::new(ty.end, name.start), "...")
                        .ok_or_else(|| self.missing(id, "'...'"))?;
                    out.delete(dots, "make parameter fixed-arity");
                }
            }
            (NodeKind::TypeDeclaration, Prop::Interface) => {
                let name = child_span(Prop::Name)?;
                let (old, new) = if flag { ("class", "interface") } else { ("interface", "class") };
                let keyword = ast
                    .find_token(Span::new(span.start, name.start), old)
                    .ok_or_else(|| self.missing(id, "type keyword"))?;
                out.replace(keyword, new, "change type keyword");
            }
            (NodeKind::BooleanLiteral, Prop::Value) => {
                out.replace(span, flag.to_string(), "change literal");
            }
            _ => return Err(RewriteError::WrongSlot { kind, prop }),
        }
        Ok(())
    }

    fn missing(&self, id: NodeId, what: &str) -> RewriteError {
        RewriteError::InternalConsistency(format!(
            "cannot locate {} of {:?} {}",
            what,
            self.ast.kind(id),
            id
        ))
    }
}

/// Shift continuation lines from one indentation to another
fn reindent(text: &str, from: &str, to: &str) -> String {
    if from == to || !text.contains('\n') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split_inclusive('\n').enumerate() {
        match line.strip_prefix(from) {
            Some(rest) if i > 0 => {
                out.push_str(to);
                out.push_str(rest);
            }
            _ => out.push_str(line),
        }
    }
    out
}
