//! Syntax tree model

mod kind;
mod node;

pub use kind::{Category, NodeKind, Prop, Separator, SlotDescriptor, SlotKind};
pub use node::{Ast, Node, NodeId, SlotValue, Slots};
