//! Errors raised by rewrite sessions

use jrewrite_core::{EditError, Span};
use jrewrite_syntax::{NodeId, NodeKind, Prop};
use thiserror::Error;

/// Errors that abort a rewrite session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The operation references a node that is unknown or cannot take part in it
    #[error("Invalid node {id}: {reason}")]
    InvalidNode { id: NodeId, reason: String },

    /// Two move sources cover a common range of the original source
    #[error("Move source {second} overlaps the earlier move source {first}")]
    OverlappingRange { first: Span, second: Span },

    /// The synthesizer produced edits that cannot be applied together
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),

    #[error(transparent)]
    Edit(#[from] EditError),

    /// A value was stored in a slot of another shape, or the slot does not exist
    #[error("{kind:?} has no {prop} slot of that shape")]
    WrongSlot { kind: NodeKind, prop: Prop },
}

impl RewriteError {
    pub(crate) fn invalid(id: NodeId, reason: impl Into<String>) -> Self {
        RewriteError::InvalidNode {
            id,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RewriteError>;
