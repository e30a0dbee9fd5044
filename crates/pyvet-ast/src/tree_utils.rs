//! Queries over the parent chain and statement structure.

use crate::node::{NodeIndex, NodeKind};
use crate::tree::ParseTree;

impl ParseTree {
    /// The innermost function enclosing `node`, if any. Starts at the
    /// parent, so a function node is not its own enclosing function.
    pub fn get_enclosing_function(&self, node: NodeIndex) -> Option<NodeIndex> {
        let mut current = self.parent(node);
        while current.is_some() {
            if matches!(self.kind(current)?, NodeKind::Function(_)) {
                return Some(current);
            }
            current = self.parent(current);
        }
        None
    }

    /// The innermost class enclosing `node`. With `stop_at_function`, an
    /// intervening function means the node is not directly inside a class
    /// body (e.g. a local class of a method does not make its functions
    /// methods of the outer class).
    pub fn get_enclosing_class(&self, node: NodeIndex, stop_at_function: bool) -> Option<NodeIndex> {
        let mut current = self.parent(node);
        while current.is_some() {
            match self.kind(current)? {
                NodeKind::Class(_) => return Some(current),
                NodeKind::Function(_) if stop_at_function => return None,
                _ => {}
            }
            current = self.parent(current);
        }
        None
    }

    /// The innermost class or module enclosing `node`.
    pub fn get_enclosing_class_or_module(&self, node: NodeIndex) -> Option<NodeIndex> {
        let mut current = self.parent(node);
        while current.is_some() {
            match self.kind(current)? {
                NodeKind::Class(_) | NodeKind::Module(_) => return Some(current),
                _ => {}
            }
            current = self.parent(current);
        }
        None
    }

    /// Whether `node` sits inside `container`'s subtree. A node is
    /// considered contained within itself.
    pub fn is_node_contained_within(&self, node: NodeIndex, container: NodeIndex) -> bool {
        let mut current = node;
        while current.is_some() {
            if current == container {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Whether `node` is (part of) a parameter's default value expression.
    pub fn is_within_default_param_initializer(&self, node: NodeIndex) -> bool {
        let mut current = node;
        let mut parent = self.parent(node);
        while parent.is_some() {
            match self.kind(parent) {
                Some(NodeKind::Parameter(param)) if param.default_value == current => {
                    return true;
                }
                Some(
                    NodeKind::Function(_)
                    | NodeKind::Lambda(_)
                    | NodeKind::Class(_)
                    | NodeKind::Module(_),
                ) => return false,
                _ => {}
            }
            current = parent;
            parent = self.parent(parent);
        }
        false
    }

    /// Whether `node` has an enclosing `assert` statement.
    pub fn is_within_assert(&self, node: NodeIndex) -> bool {
        let mut current = node;
        while current.is_some() {
            if matches!(self.kind(current), Some(NodeKind::Assert(_))) {
                return true;
            }
            current = self.parent(current);
        }
        false
    }

    /// Whether a suite consists entirely of `...` statements. Such bodies
    /// mark protocol and abstract declarations and are exempt from the
    /// implicit-return check.
    pub fn is_suite_empty(&self, suite: NodeIndex) -> bool {
        let Some(NodeKind::Suite(data)) = self.kind(suite) else {
            return false;
        };
        data.statements.iter().all(|&statement| match self.kind(statement) {
            Some(NodeKind::StatementList(list)) => list
                .statements
                .iter()
                .all(|&sub| matches!(self.kind(sub), Some(NodeKind::Ellipsis))),
            Some(NodeKind::Ellipsis) => true,
            _ => false,
        })
    }
}
