//! AST visitor for traversing Java syntax trees
//!
//! Provides a trait-based visitor pattern. Default implementations handle
//! traversal in source order; implementors override the hooks they need.

use crate::ast::{Ast, NodeId, NodeKind};

/// Trait for visiting syntax tree nodes
pub trait Visitor {
    /// Called before a node's children. Return `true` to continue traversal into children.
    fn visit_node(&mut self, _ast: &Ast, _id: NodeId) -> bool {
        true
    }

    /// Called after all children of a node were traversed
    fn leave_node(&mut self, _ast: &Ast, _id: NodeId) {}

    /// Traverse a node and its children
    fn traverse(&mut self, ast: &Ast, id: NodeId) {
        if self.visit_node(ast, id) {
            for child in ast.children(id) {
                self.traverse(ast, child);
            }
        }
        self.leave_node(ast, id);
    }
}

/// Helper function to run a visitor over a whole tree
pub fn visit<V: Visitor>(visitor: &mut V, ast: &Ast) {
    visitor.traverse(ast, ast.root());
}

/// Collects every node of one kind
pub(crate) struct KindCollector {
    kind: NodeKind,
    pub(crate) found: Vec<NodeId>,
}

impl KindCollector {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            found: Vec::new(),
        }
    }
}

impl Visitor for KindCollector {
    fn visit_node(&mut self, ast: &Ast, id: NodeId) -> bool {
        if ast.kind(id) == self.kind {
            self.found.push(id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    struct DepthTracker {
        depth: usize,
        max_depth: usize,
    }

    impl Visitor for DepthTracker {
        fn visit_node(&mut self, _ast: &Ast, _id: NodeId) -> bool {
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            true
        }

        fn leave_node(&mut self, _ast: &Ast, _id: NodeId) {
            self.depth -= 1;
        }
    }

    #[test]
    fn test_traversal_balances() {
        let ast = parse("class A { void f() { x = 1 + 2; } }").unwrap();
        let mut tracker = DepthTracker { depth: 0, max_depth: 0 };
        visit(&mut tracker, &ast);
        assert_eq!(tracker.depth, 0);
        assert!(tracker.max_depth >= 7);
    }

    #[test]
    fn test_collects_in_source_order() {
        let ast = parse("class A { void f() { a(); b(); } }").unwrap();
        let calls = ast.find_all(NodeKind::MethodInvocation);
        let names: Vec<&str> = calls.iter().map(|c| ast.text_of(*c)).collect();
        assert_eq!(names, vec!["a()", "b()"]);
    }
}
