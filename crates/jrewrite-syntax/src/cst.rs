//! Concrete syntax tree access
//!
//! Parses Java with tree-sitter-java and reads the leaves of the concrete
//! tree back as significant tokens and comments. Comments are extras in the
//! grammar, so they are kept apart from the tokens the span index walks.

use jrewrite_core::Span;
use thiserror::Error;
use tree_sitter::{Node as CstNode, Parser, Tree};

/// Error raised for source outside the supported subset or malformed input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn at(node: CstNode<'_>, message: impl Into<String>) -> Self {
        Self {
            offset: node.start_byte(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword,
    Literal,
    /// Operators and separators
    Punct,
    /// Text the grammar could not place
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Doc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
}

/// Tokens and comments of a source text, both in source order
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

/// Parse a source text into a tree-sitter tree.
///
/// Never fails on malformed input: tree-sitter recovers and marks the broken
/// regions with `ERROR` and missing nodes (see [`first_error`]).
pub fn parse_tree(source: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .map_err(|e| ParseError {
            offset: 0,
            message: format!("Failed to set Java language: {:?}", e),
        })?;
    parser.parse(source, None).ok_or_else(|| ParseError {
        offset: 0,
        message: "Parse failed - no tree returned".to_string(),
    })
}

/// Tokens and comments of a source text
pub fn lex(source: &str) -> Result<Lexed, ParseError> {
    let tree = parse_tree(source)?;
    Ok(leaves(&tree, source))
}

/// Tokens and comments of an already parsed tree
pub fn leaves(tree: &Tree, source: &str) -> Lexed {
    let mut out = Lexed::default();
    collect(tree.root_node(), source, &mut out);
    out
}

/// First error or missing node under `node`, in source order
pub fn first_error(node: CstNode<'_>) -> Option<ParseError> {
    if !node.has_error() {
        return None;
    }
    if node.is_missing() {
        return Some(ParseError::at(node, format!("missing '{}'", node.kind())));
    }
    let mut cursor = node.walk();
    let children: Vec<CstNode<'_>> = node.children(&mut cursor).collect();
    for child in children {
        if let Some(error) = first_error(child) {
            return Some(error);
        }
    }
    if node.is_error() {
        return Some(ParseError::at(node, "unexpected input"));
    }
    None
}

/// Named children that are not comments
pub(crate) fn named_children(node: CstNode<'_>) -> Vec<CstNode<'_>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).filter(|c| !c.is_extra()).collect();
    found
}

/// All children that are not comments, anonymous tokens included
pub(crate) fn children(node: CstNode<'_>) -> Vec<CstNode<'_>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).filter(|c| !c.is_extra()).collect();
    found
}

pub(crate) fn node_span(node: CstNode<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn is_comment(node: CstNode<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}

fn collect(node: CstNode<'_>, source: &str, out: &mut Lexed) {
    let span = node_span(node);
    if is_comment(node) {
        out.comments.push(comment(span, source));
        return;
    }
    // Literals are single tokens even though the grammar splits their content
    let literal = matches!(node.kind(), "string_literal" | "character_literal");
    if literal || node.child_count() == 0 {
        if !span.is_empty() {
            out.tokens.push(Token {
                kind: token_kind(node, span.text(source)),
                span,
            });
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(child, source, out);
    }
}

fn comment(span: Span, source: &str) -> Comment {
    let text = span.text(source);
    if text.starts_with("//") {
        // A '\r' before the newline belongs to the line break, not the comment
        let end = span.start + text.trim_end_matches(['\r', '\n']).len();
        return Comment {
            kind: CommentKind::Line,
            span: Span::new(span.start, end),
        };
    }
    let kind = if text.starts_with("/**") && text != "/**/" {
        CommentKind::Doc
    } else {
        CommentKind::Block
    };
    Comment { kind, span }
}

fn token_kind(node: CstNode<'_>, text: &str) -> TokenKind {
    match node.kind() {
        "ERROR" => TokenKind::Unknown,
        "identifier" | "type_identifier" => TokenKind::Ident,
        kind if kind.ends_with("_literal") || matches!(kind, "true" | "false") => TokenKind::Literal,
        _ if text.starts_with(|c: char| c.is_ascii_alphabetic()) => TokenKind::Keyword,
        _ => TokenKind::Punct,
    }
}
