//! Java source model for jrewrite
//!
//! Parsing through tree-sitter-java, an arena-allocated syntax tree for a
//! Java subset lowered from the concrete tree, and span/token queries over
//! the parsed source.

pub mod ast;
pub mod cst;
mod parser;
mod source_index;
pub mod visitor;

pub use ast::{Ast, Category, Node, NodeId, NodeKind, Prop, Separator, SlotDescriptor, SlotKind, SlotValue, Slots};
pub use cst::{first_error, leaves, lex, parse_tree, Comment, CommentKind, Lexed, ParseError, Token, TokenKind};
pub use parser::parse;
pub use visitor::{visit, Visitor};
