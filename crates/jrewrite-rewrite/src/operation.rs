//! Edit Descriptor Log
//!
//! Append-only record of the operations requested in a session. The event
//! store is updated as operations arrive; the log keeps the history and the
//! move sources used for the overlap check.

use crate::error::{Result, RewriteError};
use jrewrite_core::Span;
use jrewrite_syntax::{NodeId, Prop, SlotValue};

/// One requested operation, addressed at original or created nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    Replace {
        target: NodeId,
        replacement: NodeId,
    },
    Remove {
        target: NodeId,
    },
    ListInsert {
        parent: NodeId,
        prop: Prop,
        index: usize,
        node: NodeId,
    },
    ListRemove {
        parent: NodeId,
        prop: Prop,
        node: NodeId,
    },
    ListReplace {
        parent: NodeId,
        prop: Prop,
        target: NodeId,
        replacement: NodeId,
    },
    Move {
        first: NodeId,
        last: NodeId,
        placeholder: NodeId,
    },
    Copy {
        first: NodeId,
        last: NodeId,
        placeholder: NodeId,
    },
    SetProperty {
        target: NodeId,
        prop: Prop,
        value: SlotValue,
    },
}

#[derive(Debug, Default)]
pub struct EditLog {
    operations: Vec<EditOperation>,
    move_sources: Vec<Span>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, operation: EditOperation) {
        self.operations.push(operation);
    }

    /// Register the source range of a move, rejecting overlap with earlier moves
    pub(crate) fn claim_move_source(&mut self, range: Span) -> Result<()> {
        if let Some(first) = self.move_sources.iter().find(|s| s.intersects(range)) {
            return Err(RewriteError::OverlappingRange {
                first: *first,
                second: range,
            });
        }
        self.move_sources.push(range);
        Ok(())
    }

    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
