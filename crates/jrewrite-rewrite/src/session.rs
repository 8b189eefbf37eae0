//! Rewrite sessions over one parsed compilation unit
//!
//! An [`AstRewrite`] never mutates the tree it was opened on. Operations on
//! original nodes are recorded as events; nodes created through the session
//! live in a second arena and are edited in place.

use crate::error::{Result, RewriteError};
use crate::events::{ListEntry, RewriteEvent, RewriteEvents};
use crate::format::FormattingConfig;
use crate::operation::{EditLog, EditOperation};
use crate::synth;
use jrewrite_core::{apply_edits, logging, Edit};
use jrewrite_syntax::{Ast, NodeId, NodeKind, Prop, SlotKind, SlotValue, Slots};

const SESSION: &str = "ast-rewrite";

/// Whether a placeholder duplicates or relocates its source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Copy,
    Move,
}

/// Stand-in for a range of original list siblings (or a single node)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub first: NodeId,
    pub last: NodeId,
    pub kind: PlaceholderKind,
}

#[derive(Debug, Clone)]
pub(crate) struct CreatedNode {
    pub kind: NodeKind,
    pub slots: Slots,
    pub placeholder: Option<Placeholder>,
}

/// A rewrite session (`beginRewrite`)
#[derive(Debug)]
pub struct AstRewrite<'a> {
    ast: &'a Ast,
    created: Vec<CreatedNode>,
    log: EditLog,
    events: RewriteEvents,
    formatting: FormattingConfig,
}

impl<'a> AstRewrite<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            created: Vec::new(),
            log: EditLog::new(),
            events: RewriteEvents::default(),
            formatting: FormattingConfig::default(),
        }
    }

    pub fn with_formatting(mut self, formatting: FormattingConfig) -> Self {
        self.formatting = formatting;
        self
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn formatting(&self) -> &FormattingConfig {
        &self.formatting
    }

    pub fn log(&self) -> &EditLog {
        &self.log
    }

    pub(crate) fn events(&self) -> &RewriteEvents {
        &self.events
    }

    // ==================== Node lookup ====================

    pub fn is_original(&self, id: NodeId) -> bool {
        self.ast.contains(id)
    }

    pub(crate) fn created(&self, id: NodeId) -> Option<&CreatedNode> {
        id.index()
            .checked_sub(self.ast.len())
            .and_then(|i| self.created.get(i))
    }

    fn created_mut(&mut self, id: NodeId) -> Option<&mut CreatedNode> {
        let index = id.index().checked_sub(self.ast.len())?;
        self.created.get_mut(index)
    }

    /// Kind of an original or created node
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        if self.is_original(id) {
            Some(self.ast.kind(id))
        } else {
            self.created(id).map(|n| n.kind)
        }
    }

    pub fn placeholder(&self, id: NodeId) -> Option<Placeholder> {
        self.created(id).and_then(|n| n.placeholder)
    }

    /// Current slot value of a node, taking recorded property changes into account
    pub fn get(&self, id: NodeId, prop: Prop) -> Option<SlotValue> {
        if self.is_original(id) {
            if let Some(value) = self.events.property(id, prop) {
                return Some(value.clone());
            }
            if let Some(event) = self.events.child(id, prop) {
                return Some(SlotValue::Child(event.new));
            }
            return self.ast.node(id).slots.get(prop).cloned();
        }
        self.created(id).and_then(|n| n.slots.get(prop).cloned())
    }

    /// Event recorded for a node
    pub fn event(&self, id: NodeId) -> RewriteEvent {
        if !self.is_original(id) {
            return RewriteEvent::Inserted;
        }
        match self.ast.parent(id) {
            Some((parent, prop)) => self.events.event_of(parent, prop, id),
            None => RewriteEvent::Unchanged,
        }
    }

    fn check_original(&self, id: NodeId) -> Result<()> {
        if self.is_original(id) {
            Ok(())
        } else if self.created(id).is_some() {
            Err(RewriteError::invalid(id, "expected a node of the original tree"))
        } else {
            Err(RewriteError::invalid(id, "node does not belong to this session"))
        }
    }

    /// Nodes placed into slots must be created by the session
    fn check_placeable(&self, id: NodeId) -> Result<()> {
        if self.created(id).is_some() {
            Ok(())
        } else if self.is_original(id) {
            Err(RewriteError::invalid(
                id,
                "original nodes must be placed through a copy or move target",
            ))
        } else {
            Err(RewriteError::invalid(id, "node does not belong to this session"))
        }
    }

    fn slot_of(&self, id: NodeId) -> Result<(NodeId, Prop, SlotKind)> {
        let (parent, prop) = self
            .ast
            .parent(id)
            .ok_or_else(|| RewriteError::invalid(id, "the root node has no parent slot"))?;
        let kind = self.ast.kind(parent);
        let slot = kind
            .slot(prop)
            .ok_or(RewriteError::WrongSlot { kind, prop })?;
        Ok((parent, prop, slot.kind))
    }

    // ==================== Node factory ====================

    fn alloc(&mut self, kind: NodeKind, placeholder: Option<Placeholder>) -> NodeId {
        let id = NodeId((self.ast.len() + self.created.len()) as u32);
        self.created.push(CreatedNode {
            kind,
            slots: Slots::for_kind(kind),
            placeholder,
        });
        id
    }

    fn store(&mut self, id: NodeId, prop: Prop, value: SlotValue) -> Result<()> {
        let node = self
            .created_mut(id)
            .ok_or_else(|| RewriteError::invalid(id, "node does not belong to this session"))?;
        let kind = node.kind;
        if node.slots.set(prop, value) {
            Ok(())
        } else {
            Err(RewriteError::WrongSlot { kind, prop })
        }
    }

    /// Create an empty node of the given kind
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(kind, None)
    }

    fn new_text_node(&mut self, kind: NodeKind, prop: Prop, text: &str) -> NodeId {
        let id = self.alloc(kind, None);
        if let Some(node) = self.created_mut(id) {
            node.slots.set(prop, SlotValue::Text(text.to_string()));
        }
        id
    }

    pub fn new_simple_name(&mut self, identifier: &str) -> NodeId {
        self.new_text_node(NodeKind::SimpleName, Prop::Identifier, identifier)
    }

    /// Simple or qualified name from dotted text
    pub fn new_name(&mut self, dotted: &str) -> NodeId {
        let mut segments = dotted.split('.');
        let first = segments.next().unwrap_or_default();
        let mut name = self.new_simple_name(first);
        for segment in segments {
            let right = self.new_simple_name(segment);
            let qualified = self.alloc(NodeKind::QualifiedName, None);
            if let Some(node) = self.created_mut(qualified) {
                node.slots.set(Prop::Qualifier, SlotValue::Child(Some(name)));
                node.slots.set(Prop::Name, SlotValue::Child(Some(right)));
            }
            name = qualified;
        }
        name
    }

    pub fn new_number_literal(&mut self, token: &str) -> NodeId {
        self.new_text_node(NodeKind::NumberLiteral, Prop::Token, token)
    }

    /// String literal for an unescaped value
    pub fn new_string_literal(&mut self, value: &str) -> NodeId {
        let mut token = String::with_capacity(value.len() + 2);
        token.push('"');
        for c in value.chars() {
            match c {
                '"' => token.push_str("\\\""),
                '\\' => token.push_str("\\\\"),
                '\n' => token.push_str("\\n"),
                '\r' => token.push_str("\\r"),
                '\t' => token.push_str("\\t"),
                c => token.push(c),
            }
        }
        token.push('"');
        self.new_text_node(NodeKind::StringLiteral, Prop::Token, &token)
    }

    pub fn new_boolean_literal(&mut self, value: bool) -> NodeId {
        let id = self.alloc(NodeKind::BooleanLiteral, None);
        if let Some(node) = self.created_mut(id) {
            node.slots.set(Prop::Value, SlotValue::Flag(value));
        }
        id
    }

    pub fn new_modifier(&mut self, keyword: &str) -> NodeId {
        self.new_text_node(NodeKind::Modifier, Prop::Keyword, keyword)
    }

    pub fn new_primitive_type(&mut self, keyword: &str) -> NodeId {
        self.new_text_node(NodeKind::PrimitiveType, Prop::Keyword, keyword)
    }

    pub fn new_simple_type(&mut self, name: &str) -> NodeId {
        let name = self.new_name(name);
        let id = self.alloc(NodeKind::SimpleType, None);
        if let Some(node) = self.created_mut(id) {
            node.slots.set(Prop::Name, SlotValue::Child(Some(name)));
        }
        id
    }

    pub fn new_infix(&mut self, left: NodeId, operator: &str, right: NodeId) -> Result<NodeId> {
        self.new_binary(NodeKind::InfixExpression, left, operator, right)
    }

    pub fn new_assignment(&mut self, left: NodeId, operator: &str, right: NodeId) -> Result<NodeId> {
        self.new_binary(NodeKind::Assignment, left, operator, right)
    }

    fn new_binary(&mut self, kind: NodeKind, left: NodeId, operator: &str, right: NodeId) -> Result<NodeId> {
        let id = self.alloc(kind, None);
        self.set(id, Prop::Left, SlotValue::Child(Some(left)))?;
        self.set(id, Prop::Operator, SlotValue::Text(operator.to_string()))?;
        self.set(id, Prop::Right, SlotValue::Child(Some(right)))?;
        Ok(id)
    }

    pub fn new_method_invocation(
        &mut self,
        expression: Option<NodeId>,
        name: &str,
        arguments: &[NodeId],
    ) -> Result<NodeId> {
        let id = self.alloc(NodeKind::MethodInvocation, None);
        let name = self.new_simple_name(name);
        self.set(id, Prop::Expression, SlotValue::Child(expression))?;
        self.set(id, Prop::Name, SlotValue::Child(Some(name)))?;
        let mut list = self.list(id, Prop::Arguments)?;
        for &argument in arguments {
            list.insert_last(argument)?;
        }
        Ok(id)
    }

    pub fn new_expression_statement(&mut self, expression: NodeId) -> Result<NodeId> {
        let id = self.alloc(NodeKind::ExpressionStatement, None);
        self.set(id, Prop::Expression, SlotValue::Child(Some(expression)))?;
        Ok(id)
    }

    pub fn new_enum_constant(&mut self, name: &str) -> NodeId {
        let name = self.new_simple_name(name);
        let id = self.alloc(NodeKind::EnumConstant, None);
        if let Some(node) = self.created_mut(id) {
            node.slots.set(Prop::Name, SlotValue::Child(Some(name)));
        }
        id
    }

    /// Method with the given modifiers, an optional return type and an empty body
    pub fn new_method_declaration(
        &mut self,
        modifiers: &[&str],
        return_type: Option<NodeId>,
        name: &str,
    ) -> Result<NodeId> {
        let id = self.alloc(NodeKind::MethodDeclaration, None);
        for keyword in modifiers {
            let modifier = self.new_modifier(keyword);
            self.list(id, Prop::Modifiers)?.insert_last(modifier)?;
        }
        let name = self.new_simple_name(name);
        let body = self.new_node(NodeKind::Block);
        self.set(id, Prop::ReturnType, SlotValue::Child(return_type))?;
        self.set(id, Prop::Name, SlotValue::Child(Some(name)))?;
        self.set(id, Prop::Body, SlotValue::Child(Some(body)))?;
        Ok(id)
    }

    // ==================== Structural operations ====================

    /// Replace an original node by a created node or placeholder
    pub fn replace(&mut self, target: NodeId, replacement: NodeId) -> Result<()> {
        self.replace_inner(target, replacement)
            .inspect_err(|e| logging::log_rejected(SESSION, &e.to_string()))
    }

    fn replace_inner(&mut self, target: NodeId, replacement: NodeId) -> Result<()> {
        self.check_original(target)?;
        self.check_placeable(replacement)?;
        let (parent, prop, slot) = self.slot_of(target)?;
        match slot {
            SlotKind::List(_) => self.list(parent, prop)?.replace(target, replacement)?,
            _ => {
                self.events
                    .set_child(parent, prop, Some(target), Some(replacement));
                self.log.push(EditOperation::Replace {
                    target,
                    replacement,
                });
            }
        }
        Ok(())
    }

    /// Remove an original node from its optional child slot or list
    pub fn remove(&mut self, target: NodeId) -> Result<()> {
        self.remove_inner(target)
            .inspect_err(|e| logging::log_rejected(SESSION, &e.to_string()))
    }

    fn remove_inner(&mut self, target: NodeId) -> Result<()> {
        self.check_original(target)?;
        let (parent, prop, slot) = self.slot_of(target)?;
        match slot {
            SlotKind::List(_) => self.list(parent, prop)?.remove(target)?,
            SlotKind::Child { optional: true } => {
                self.events.set_child(parent, prop, Some(target), None);
                self.log.push(EditOperation::Remove { target });
            }
            _ => {
                return Err(RewriteError::invalid(
                    target,
                    format!("the {} slot of {:?} cannot be empty", prop, self.ast.kind(parent)),
                ))
            }
        }
        Ok(())
    }

    /// Removal implied by a move; an explicit replace of the node wins
    fn remove_moved(&mut self, target: NodeId) -> Result<()> {
        let (parent, prop, slot) = self.slot_of(target)?;
        if let SlotKind::List(_) = slot {
            let ast = self.ast;
            let entries = self.events.list_mut(parent, prop, ast.list(parent, prop));
            if let Some(entry) = entries.iter_mut().find(|e| e.original == Some(target)) {
                if entry.event == RewriteEvent::Unchanged {
                    entry.event = RewriteEvent::Removed;
                }
            }
            return Ok(());
        }
        if self.events.event_of(parent, prop, target) == RewriteEvent::Unchanged {
            self.events.set_child(parent, prop, Some(target), None);
        }
        Ok(())
    }

    /// Set a child slot or property of a node.
    ///
    /// On created nodes the value is stored directly; on original nodes it is
    /// recorded as an event.
    pub fn set(&mut self, parent: NodeId, prop: Prop, value: SlotValue) -> Result<()> {
        let kind = self
            .kind(parent)
            .ok_or_else(|| RewriteError::invalid(parent, "node does not belong to this session"))?;
        let slot = kind.slot(prop).ok_or(RewriteError::WrongSlot { kind, prop })?;
        if !value.matches(slot.kind) || matches!(slot.kind, SlotKind::List(_)) {
            return Err(RewriteError::WrongSlot { kind, prop });
        }
        if let SlotValue::Child(Some(child)) = &value {
            self.check_placeable(*child)?;
        }
        if !self.is_original(parent) {
            return self.store(parent, prop, value);
        }

        match (&value, slot.kind) {
            (SlotValue::Child(None), SlotKind::Child { optional: false }) => {
                return Err(RewriteError::invalid(
                    parent,
                    format!("the {} slot of {:?} cannot be empty", prop, kind),
                ));
            }
            (SlotValue::Child(new), _) => {
                let original = self.ast.child(parent, prop);
                self.events.set_child(parent, prop, original, *new);
            }
            _ => self.events.set_property(parent, prop, value.clone()),
        }
        self.log.push(EditOperation::SetProperty {
            target: parent,
            prop,
            value,
        });
        Ok(())
    }

    pub fn set_child(&mut self, parent: NodeId, prop: Prop, child: Option<NodeId>) -> Result<()> {
        self.set(parent, prop, SlotValue::Child(child))
    }

    pub fn set_text(&mut self, parent: NodeId, prop: Prop, text: &str) -> Result<()> {
        self.set(parent, prop, SlotValue::Text(text.to_string()))
    }

    pub fn set_flag(&mut self, parent: NodeId, prop: Prop, flag: bool) -> Result<()> {
        self.set(parent, prop, SlotValue::Flag(flag))
    }

    /// List editor for a list slot (`getListEditor`)
    pub fn list(&mut self, parent: NodeId, prop: Prop) -> Result<ListRewrite<'_, 'a>> {
        let kind = self
            .kind(parent)
            .ok_or_else(|| RewriteError::invalid(parent, "node does not belong to this session"))?;
        match kind.slot(prop) {
            Some(slot) if matches!(slot.kind, SlotKind::List(_)) => Ok(ListRewrite {
                rewrite: self,
                parent,
                prop,
            }),
            _ => Err(RewriteError::WrongSlot { kind, prop }),
        }
    }

    // ==================== Placeholders ====================

    /// Placeholder that reproduces the text of `node` wherever it is placed
    pub fn create_copy_target(&mut self, node: NodeId) -> Result<NodeId> {
        self.create_target(node, node, PlaceholderKind::Copy)
    }

    /// Placeholder for the list siblings `first..=last`
    pub fn create_copy_target_range(&mut self, first: NodeId, last: NodeId) -> Result<NodeId> {
        self.create_target(first, last, PlaceholderKind::Copy)
    }

    /// Placeholder that relocates `node`; its original location is removed
    pub fn create_move_target(&mut self, node: NodeId) -> Result<NodeId> {
        self.create_target(node, node, PlaceholderKind::Move)
    }

    pub fn create_move_target_range(&mut self, first: NodeId, last: NodeId) -> Result<NodeId> {
        self.create_target(first, last, PlaceholderKind::Move)
    }

    fn create_target(&mut self, first: NodeId, last: NodeId, kind: PlaceholderKind) -> Result<NodeId> {
        self.create_target_inner(first, last, kind)
            .inspect_err(|e| logging::log_rejected(SESSION, &e.to_string()))
    }

    fn create_target_inner(&mut self, first: NodeId, last: NodeId, kind: PlaceholderKind) -> Result<NodeId> {
        self.check_original(first)?;
        self.check_original(last)?;
        let nodes = self.range_nodes(first, last)?;
        let range = synth::element_span(self.ast, first).cover(synth::element_span(self.ast, last));

        if kind == PlaceholderKind::Move {
            self.log.claim_move_source(range)?;
            for &node in &nodes {
                self.remove_moved(node)?;
            }
        }

        let node_kind = self.ast.kind(first);
        let placeholder = self.alloc(node_kind, Some(Placeholder { first, last, kind }));
        self.log.push(match kind {
            PlaceholderKind::Copy => EditOperation::Copy {
                first,
                last,
                placeholder,
            },
            PlaceholderKind::Move => EditOperation::Move {
                first,
                last,
                placeholder,
            },
        });
        logging::log(&format!(
            "{:?} target {} for {}..{} at {}",
            kind, placeholder, first, last, range
        ));
        Ok(placeholder)
    }

    /// Nodes of a sibling range, in list order
    pub(crate) fn range_nodes(&self, first: NodeId, last: NodeId) -> Result<Vec<NodeId>> {
        let (parent, prop, slot) = self.slot_of(first)?;
        if first == last {
            return Ok(vec![first]);
        }
        if !matches!(slot, SlotKind::List(_)) || self.ast.parent(last) != Some((parent, prop)) {
            return Err(RewriteError::invalid(last, "a range must end in the list it starts in"));
        }
        let list = self.ast.list(parent, prop);
        let from = list.iter().position(|&n| n == first);
        let to = list.iter().position(|&n| n == last);
        match (from, to) {
            (Some(from), Some(to)) if from <= to => Ok(list[from..=to].to_vec()),
            _ => Err(RewriteError::invalid(last, "a range must not end before it starts")),
        }
    }

    /// Move `source` into a list at `index`, counted the way
    /// [`ListRewrite::insert_at`] counts: removed originals keep their places
    pub fn move_node(&mut self, source: NodeId, parent: NodeId, prop: Prop, index: usize) -> Result<NodeId> {
        let placeholder = self.create_move_target(source)?;
        self.list(parent, prop)?.insert_at(placeholder, index)?;
        Ok(placeholder)
    }

    /// Copy `source` into a list at `index`, counted the way
    /// [`ListRewrite::insert_at`] counts: removed originals keep their places
    pub fn copy_node(&mut self, source: NodeId, parent: NodeId, prop: Prop, index: usize) -> Result<NodeId> {
        let placeholder = self.create_copy_target(source)?;
        self.list(parent, prop)?.insert_at(placeholder, index)?;
        Ok(placeholder)
    }

    // ==================== Output ====================

    /// Whether no operation changed anything
    pub fn is_unchanged(&self) -> bool {
        self.events.is_empty()
    }

    /// Text edits reproducing every registered operation, sorted and disjoint
    pub fn compute_edits(&self) -> Result<Vec<Edit>> {
        if self.is_unchanged() {
            return Ok(Vec::new());
        }
        let edits = synth::synthesize(self)?;
        logging::log_edits_emitted(SESSION, edits.len());
        Ok(edits)
    }

    /// Source text with all edits applied
    pub fn rewrite_source(&self) -> Result<String> {
        let edits = self.compute_edits()?;
        Ok(apply_edits(self.ast.source(), &edits)?)
    }
}

/// Editor for one list slot (`ListRewrite`)
pub struct ListRewrite<'r, 'a> {
    rewrite: &'r mut AstRewrite<'a>,
    parent: NodeId,
    prop: Prop,
}

impl<'r, 'a> ListRewrite<'r, 'a> {
    /// Elements of the list before any edit
    pub fn original_list(&self) -> Vec<NodeId> {
        if self.rewrite.is_original(self.parent) {
            self.rewrite.ast.list(self.parent, self.prop).to_vec()
        } else {
            Vec::new()
        }
    }

    /// Elements of the list after the recorded edits
    pub fn rewritten_list(&self) -> Vec<NodeId> {
        match self.rewrite.created(self.parent) {
            Some(node) => node.slots.list(self.prop).to_vec(),
            None => match self.rewrite.events.list_entries(self.parent, self.prop) {
                Some(entries) => entries
                    .iter()
                    .filter(|e| e.event != RewriteEvent::Removed)
                    .map(|e| e.node)
                    .collect(),
                None => self.original_list(),
            },
        }
    }

    fn entries(&mut self) -> &mut Vec<ListEntry> {
        let ast = self.rewrite.ast;
        self.rewrite
            .events
            .list_mut(self.parent, self.prop, ast.list(self.parent, self.prop))
    }

    fn created_list(&mut self) -> Option<&mut Vec<NodeId>> {
        let prop = self.prop;
        let node = self.rewrite.created_mut(self.parent)?;
        match node.slots.get_mut(prop) {
            Some(SlotValue::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Insert at `index`, counted over the rewritten list plus removed originals
    pub fn insert_at(&mut self, node: NodeId, index: usize) -> Result<()> {
        self.rewrite.check_placeable(node)?;
        if let Some(items) = self.created_list() {
            let index = index.min(items.len());
            items.insert(index, node);
            return Ok(());
        }
        let entries = self.entries();
        let index = index.min(entries.len());
        entries.insert(
            index,
            ListEntry {
                original: None,
                node,
                event: RewriteEvent::Inserted,
            },
        );
        self.rewrite.log.push(EditOperation::ListInsert {
            parent: self.parent,
            prop: self.prop,
            index,
            node,
        });
        Ok(())
    }

    pub fn insert_first(&mut self, node: NodeId) -> Result<()> {
        self.insert_at(node, 0)
    }

    pub fn insert_last(&mut self, node: NodeId) -> Result<()> {
        self.insert_at(node, usize::MAX)
    }

    pub fn insert_before(&mut self, node: NodeId, anchor: NodeId) -> Result<()> {
        let index = self.position(anchor)?;
        self.insert_at(node, index)
    }

    pub fn insert_after(&mut self, node: NodeId, anchor: NodeId) -> Result<()> {
        let index = self.position(anchor)?;
        self.insert_at(node, index + 1)
    }

    fn position(&mut self, id: NodeId) -> Result<usize> {
        let found = match self.created_list() {
            Some(items) => items.iter().position(|&n| n == id),
            None => self
                .entries()
                .iter()
                .position(|e| e.node == id || e.original == Some(id)),
        };
        found.ok_or_else(|| RewriteError::invalid(id, "node is not an element of this list"))
    }

    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        let index = self.position(node)?;
        if let Some(items) = self.created_list() {
            items.remove(index);
            return Ok(());
        }
        let entries = self.entries();
        if entries[index].original.is_none() {
            entries.remove(index);
        } else {
            entries[index].event = RewriteEvent::Removed;
            entries[index].node = entries[index].original.unwrap_or(node);
        }
        self.rewrite.log.push(EditOperation::ListRemove {
            parent: self.parent,
            prop: self.prop,
            node,
        });
        Ok(())
    }

    pub fn replace(&mut self, node: NodeId, replacement: NodeId) -> Result<()> {
        self.rewrite.check_placeable(replacement)?;
        let index = self.position(node)?;
        if let Some(items) = self.created_list() {
            items[index] = replacement;
            return Ok(());
        }
        let entries = self.entries();
        let entry = &mut entries[index];
        entry.node = replacement;
        if entry.original.is_some() {
            entry.event = RewriteEvent::Replaced(replacement);
        }
        self.rewrite.log.push(EditOperation::ListReplace {
            parent: self.parent,
            prop: self.prop,
            target: node,
            replacement,
        });
        Ok(())
    }
}
