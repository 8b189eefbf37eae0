//! Per-kind source layout: where optional children go and where property tokens sit

use jrewrite_core::Span;
use jrewrite_syntax::{Ast, NodeId, NodeKind, Prop};

/// Where an absent optional child is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    ParentStart,
    AfterFirstToken,
    AfterSlot(Prop),
    BeforeSlot(Prop),
    /// Takes the place of the terminating `;` (method bodies)
    LastToken,
}

/// Text framing an optional child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OptionalLayout {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub anchor: Anchor,
}

const fn layout(prefix: &'static str, suffix: &'static str, anchor: Anchor) -> OptionalLayout {
    OptionalLayout {
        prefix,
        suffix,
        anchor,
    }
}

pub(crate) fn optional_layout(kind: NodeKind, prop: Prop) -> Option<OptionalLayout> {
    use NodeKind::*;
    let found = match (kind, prop) {
        (CompilationUnit, Prop::Package) => layout("", "\n\n", Anchor::ParentStart),
        (TypeDeclaration, Prop::Superclass) => layout(" extends ", "", Anchor::AfterSlot(Prop::Name)),
        (MethodDeclaration, Prop::ReturnType) => layout("", " ", Anchor::BeforeSlot(Prop::Name)),
        (MethodDeclaration, Prop::Body) => layout(" ", "", Anchor::LastToken),
        (VariableDeclarationFragment, Prop::Initializer) => {
            layout(" = ", "", Anchor::AfterSlot(Prop::Name))
        }
        (ReturnStatement, Prop::Expression) => layout(" ", "", Anchor::AfterFirstToken),
        (IfStatement, Prop::ElseStatement) => {
            layout(" else ", "", Anchor::AfterSlot(Prop::ThenStatement))
        }
        (MethodInvocation, Prop::Expression) => layout("", ".", Anchor::BeforeSlot(Prop::Name)),
        _ => return None,
    };
    Some(found)
}

/// Number of tokens in a framing text (`" else "` has one).
///
/// Framing texts are keywords and single operators separated by blanks.
pub(crate) fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Range of the tokens that spell a textual property
pub(crate) fn property_span(ast: &Ast, id: NodeId, prop: Prop) -> Option<Span> {
    use NodeKind::*;
    let span = ast.span(id);
    match (ast.kind(id), prop) {
        (Assignment | InfixExpression, Prop::Operator) => {
            let left = ast.span(ast.child(id, Prop::Left)?);
            let right = ast.span(ast.child(id, Prop::Right)?);
            token_run(ast, Span::new(left.end, right.start))
        }
        (PrefixExpression, Prop::Operator) => {
            let operand = ast.span(ast.child(id, Prop::Operand)?);
            token_run(ast, Span::new(span.start, operand.start))
        }
        (PostfixExpression, Prop::Operator) => {
            let operand = ast.span(ast.child(id, Prop::Operand)?);
            token_run(ast, Span::new(operand.end, span.end))
        }
        (SimpleName, Prop::Identifier)
        | (NumberLiteral | StringLiteral | CharacterLiteral, Prop::Token)
        | (Modifier | PrimitiveType, Prop::Keyword) => Some(span),
        _ => None,
    }
}

fn token_run(ast: &Ast, range: Span) -> Option<Span> {
    let tokens = ast.tokens_in(range);
    Some(tokens.first()?.span.cover(tokens.last()?.span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrewrite_syntax::parse;

    #[test]
    fn test_operator_span_skips_comments() {
        let source = "class A { void f() { x = 3 /* c */ >> 1; } }";
        let ast = parse(source).unwrap();
        let infix = ast.find_first(NodeKind::InfixExpression).unwrap();
        let span = property_span(&ast, infix, Prop::Operator).unwrap();
        assert_eq!(span.text(source), ">>");
    }

    #[test]
    fn test_prefix_operator_span() {
        let source = "class A { void f() { x = -- y; } }";
        let ast = parse(source).unwrap();
        let prefix = ast.find_first(NodeKind::PrefixExpression).unwrap();
        let span = property_span(&ast, prefix, Prop::Operator).unwrap();
        assert_eq!(span.text(source), "--");
    }

    #[test]
    fn test_framing_token_counts() {
        assert_eq!(token_count(" else "), 1);
        assert_eq!(token_count(" "), 0);
        assert_eq!(token_count(" extends "), 1);
    }

    #[test]
    fn test_layout_table() {
        let l = optional_layout(NodeKind::ReturnStatement, Prop::Expression).unwrap();
        assert_eq!(l.anchor, Anchor::AfterFirstToken);
        assert!(optional_layout(NodeKind::ArrayAccess, Prop::Index).is_none());
    }
}
