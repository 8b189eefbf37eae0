//! Arena-allocated syntax tree

use super::kind::{NodeKind, Prop, SlotKind};
use crate::cst::{Comment, Token};
use jrewrite_core::Span;
use std::fmt;

/// Stable index of a node.
///
/// Ids below `Ast::len()` address parsed nodes; rewrite sessions hand out
/// higher ids for nodes they create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value held by one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    Child(Option<NodeId>),
    List(Vec<NodeId>),
    Text(String),
    Flag(bool),
}

impl SlotValue {
    /// Default value for an empty slot of the given shape
    pub fn empty(kind: SlotKind) -> Self {
        match kind {
            SlotKind::Child { .. } => SlotValue::Child(None),
            SlotKind::List(_) => SlotValue::List(Vec::new()),
            SlotKind::Text => SlotValue::Text(String::new()),
            SlotKind::Flag => SlotValue::Flag(false),
        }
    }

    pub fn matches(&self, kind: SlotKind) -> bool {
        matches!(
            (self, kind),
            (SlotValue::Child(_), SlotKind::Child { .. })
                | (SlotValue::List(_), SlotKind::List(_))
                | (SlotValue::Text(_), SlotKind::Text)
                | (SlotValue::Flag(_), SlotKind::Flag)
        )
    }
}

/// Ordered slot storage, aligned with `NodeKind::slots()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots(Vec<(Prop, SlotValue)>);

impl Slots {
    /// Empty slots for a node kind
    pub fn for_kind(kind: NodeKind) -> Self {
        Slots(
            kind.slots()
                .iter()
                .map(|d| (d.prop, SlotValue::empty(d.kind)))
                .collect(),
        )
    }

    pub fn get(&self, prop: Prop) -> Option<&SlotValue> {
        self.0.iter().find(|(p, _)| *p == prop).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, prop: Prop) -> Option<&mut SlotValue> {
        self.0.iter_mut().find(|(p, _)| *p == prop).map(|(_, v)| v)
    }

    /// Store a value; returns false when the slot does not exist or has another shape
    pub fn set(&mut self, prop: Prop, value: SlotValue) -> bool {
        match self.get_mut(prop) {
            Some(slot) if std::mem::discriminant(slot) == std::mem::discriminant(&value) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Prop, SlotValue)> {
        self.0.iter()
    }

    pub fn child(&self, prop: Prop) -> Option<NodeId> {
        match self.get(prop) {
            Some(SlotValue::Child(c)) => *c,
            _ => None,
        }
    }

    pub fn list(&self, prop: Prop) -> &[NodeId] {
        match self.get(prop) {
            Some(SlotValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn text(&self, prop: Prop) -> Option<&str> {
        match self.get(prop) {
            Some(SlotValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    pub fn flag(&self, prop: Prop) -> bool {
        matches!(self.get(prop), Some(SlotValue::Flag(true)))
    }

    /// Child node ids in slot order
    pub fn node_children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for (_, value) in &self.0 {
            match value {
                SlotValue::Child(Some(id)) => out.push(*id),
                SlotValue::List(items) => out.extend(items.iter().copied()),
                _ => {}
            }
        }
        out
    }
}

/// A parsed node
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// Parent node and the slot this node occupies there
    pub parent: Option<(NodeId, Prop)>,
    pub slots: Slots,
}

/// A parsed compilation unit: source text, tokens, comments and the node arena
#[derive(Debug, Clone)]
pub struct Ast {
    source: String,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub(crate) fn new(
        source: String,
        tokens: Vec<Token>,
        comments: Vec<Comment>,
        nodes: Vec<Node>,
        root: NodeId,
    ) -> Self {
        Self {
            source,
            tokens,
            comments,
            nodes,
            root,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of parsed nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` addresses a node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Access a node.
    ///
    /// # Panics
    /// If `id` does not belong to this tree; use [`Ast::get`] for unchecked ids.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<(NodeId, Prop)> {
        self.node(id).parent
    }

    pub fn child(&self, id: NodeId, prop: Prop) -> Option<NodeId> {
        self.node(id).slots.child(prop)
    }

    pub fn list(&self, id: NodeId, prop: Prop) -> &[NodeId] {
        self.node(id).slots.list(prop)
    }

    pub fn text_prop(&self, id: NodeId, prop: Prop) -> Option<&str> {
        self.node(id).slots.text(prop)
    }

    pub fn flag(&self, id: NodeId, prop: Prop) -> bool {
        self.node(id).slots.flag(prop)
    }

    /// Source text covered by a node
    pub fn text_of(&self, id: NodeId) -> &str {
        self.span(id).text(&self.source)
    }

    /// Child nodes in source order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id).slots.node_children()
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node).map(|(p, _)| p);
        }
        false
    }

    /// Dotted text of a name node (`java.util.List`)
    pub fn name_text(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::SimpleName => self.text_prop(id, Prop::Identifier).unwrap_or("").to_string(),
            NodeKind::QualifiedName => {
                let qualifier = self
                    .child(id, Prop::Qualifier)
                    .map(|q| self.name_text(q))
                    .unwrap_or_default();
                let name = self
                    .child(id, Prop::Name)
                    .map(|n| self.name_text(n))
                    .unwrap_or_default();
                format!("{}.{}", qualifier, name)
            }
            _ => self.text_of(id).to_string(),
        }
    }

    /// All nodes of a kind in source order
    pub fn find_all(&self, kind: NodeKind) -> Vec<NodeId> {
        let mut collector = crate::visitor::KindCollector::new(kind);
        crate::visitor::visit(&mut collector, self);
        collector.found
    }

    /// First node of a kind in source order
    pub fn find_first(&self, kind: NodeKind) -> Option<NodeId> {
        self.find_all(kind).into_iter().next()
    }

    /// Nodes of a kind whose source text equals `text`
    pub fn find_by_text(&self, kind: NodeKind, text: &str) -> Vec<NodeId> {
        self.find_all(kind)
            .into_iter()
            .filter(|id| self.text_of(*id) == text)
            .collect()
    }
}
