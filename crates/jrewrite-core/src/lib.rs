//! jrewrite-core: Core abstractions for Java source rewriting
//!
//! This crate provides:
//! - `Span`: A half-open byte range into the original source
//! - `Edit`: A span-based text modification
//! - `apply_edits()`: The multi-edit applier used by every rewrite engine
//! - `WhitespaceConfig`: Indentation and line ending settings
//! - `logging`: An opt-in, timestamped run log

mod edit;
pub mod logging;
mod span;
pub mod whitespace;

pub use edit::{apply_edits, check_disjoint, sort_edits, Edit, EditError};
pub use span::Span;
pub use whitespace::{IndentStyle, LineEnding, WhitespaceConfig};
