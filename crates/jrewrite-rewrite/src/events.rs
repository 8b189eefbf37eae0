//! Rewrite Event Tree
//!
//! Shadow annotations over the original tree, keyed by `(parent, slot)`.
//! Single-child slots record the original and the new child, list slots keep
//! an entry per original element plus inserted ones in output order, and
//! property slots record their new value.

use jrewrite_syntax::{NodeId, Prop, SlotValue};
use std::collections::HashMap;

/// Change of one node as seen from its parent slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteEvent {
    Unchanged,
    Inserted,
    Removed,
    Replaced(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChildEvent {
    pub original: Option<NodeId>,
    pub new: Option<NodeId>,
}

impl ChildEvent {
    pub fn is_change(&self) -> bool {
        self.original != self.new
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListEntry {
    /// Element of the original list, `None` for insertions
    pub original: Option<NodeId>,
    /// Node at this position in the rewritten list
    pub node: NodeId,
    pub event: RewriteEvent,
}

impl ListEntry {
    pub fn is_kept(&self) -> bool {
        matches!(self.event, RewriteEvent::Unchanged | RewriteEvent::Replaced(_))
    }
}

#[derive(Debug, Default)]
pub(crate) struct RewriteEvents {
    children: HashMap<(NodeId, Prop), ChildEvent>,
    lists: HashMap<(NodeId, Prop), Vec<ListEntry>>,
    properties: HashMap<(NodeId, Prop), SlotValue>,
}

impl RewriteEvents {
    pub fn child(&self, parent: NodeId, prop: Prop) -> Option<&ChildEvent> {
        self.children.get(&(parent, prop)).filter(|e| e.is_change())
    }

    pub fn set_child(&mut self, parent: NodeId, prop: Prop, original: Option<NodeId>, new: Option<NodeId>) {
        self.children
            .entry((parent, prop))
            .and_modify(|e| e.new = new)
            .or_insert(ChildEvent { original, new });
    }

    /// Entries of a list slot, only when something in it changed
    pub fn list(&self, parent: NodeId, prop: Prop) -> Option<&[ListEntry]> {
        self.lists
            .get(&(parent, prop))
            .filter(|entries| entries.iter().any(|e| e.event != RewriteEvent::Unchanged))
            .map(Vec::as_slice)
    }

    /// Entries of a list slot that has been edited, changed or not
    pub fn list_entries(&self, parent: NodeId, prop: Prop) -> Option<&[ListEntry]> {
        self.lists.get(&(parent, prop)).map(Vec::as_slice)
    }

    /// Entries of a list slot, created from the original elements on first use
    pub fn list_mut(&mut self, parent: NodeId, prop: Prop, originals: &[NodeId]) -> &mut Vec<ListEntry> {
        self.lists.entry((parent, prop)).or_insert_with(|| {
            originals
                .iter()
                .map(|&id| ListEntry {
                    original: Some(id),
                    node: id,
                    event: RewriteEvent::Unchanged,
                })
                .collect()
        })
    }

    pub fn property(&self, parent: NodeId, prop: Prop) -> Option<&SlotValue> {
        self.properties.get(&(parent, prop))
    }

    pub fn set_property(&mut self, parent: NodeId, prop: Prop, value: SlotValue) {
        self.properties.insert((parent, prop), value);
    }

    /// Event of an original node inside its parent slot
    pub fn event_of(&self, parent: NodeId, prop: Prop, id: NodeId) -> RewriteEvent {
        if let Some(event) = self.children.get(&(parent, prop)) {
            if event.original == Some(id) {
                return match event.new {
                    Some(new) if new == id => RewriteEvent::Unchanged,
                    Some(new) => RewriteEvent::Replaced(new),
                    None => RewriteEvent::Removed,
                };
            }
        }
        self.lists
            .get(&(parent, prop))
            .and_then(|entries| entries.iter().find(|e| e.original == Some(id)))
            .map(|e| e.event)
            .unwrap_or(RewriteEvent::Unchanged)
    }

    pub fn is_empty(&self) -> bool {
        self.children.values().all(|e| !e.is_change())
            && self
                .lists
                .values()
                .all(|entries| entries.iter().all(|e| e.event == RewriteEvent::Unchanged))
            && self.properties.is_empty()
    }
}
