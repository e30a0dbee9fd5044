//! Private/protected access enforcement.
//!
//! A class-private name (`__x`) is usable only inside the class or module
//! that declares it; a protected name (`_x`) is additionally usable from
//! subclasses of the declaring class.

use crate::checker::Checker;
use pyvet_ast::node::NodeKind;
use pyvet_ast::NodeIndex;
use pyvet_binder::symbol_names;
use pyvet_common::Rule;
use pyvet_solver::utils::derives_from_class_recursive;
use pyvet_solver::Type;

impl<'a> Checker<'a> {
    pub(crate) fn report_private_usage(&mut self, node: NodeIndex) {
        // Short-circuit before any resolution work when the rule is off.
        if self.context.rules.severity(Rule::PrivateUsage).is_none() {
            return;
        }
        // Declaration-only files freely re-export private names.
        if self.context.is_stub_file {
            return;
        }

        let Some(name_value) = self.name_of(node) else {
            return;
        };
        let is_private_name = symbol_names::is_private_name(name_value);
        let is_protected_name = symbol_names::is_protected_name(name_value);
        if !is_private_name && !is_protected_name {
            return;
        }

        let Some(declarations) = self.evaluator.get_declarations_for_name_node(node) else {
            return;
        };
        let Some(primary_declaration) = declarations.last() else {
            return;
        };
        // The declaration site itself is not a use.
        if primary_declaration.node == node {
            return;
        }
        let Some(primary_declaration) =
            self.evaluator.resolve_alias_declaration(primary_declaration)
        else {
            return;
        };
        if primary_declaration.node == node {
            return;
        }

        let mut class_or_module = if primary_declaration.node.is_some() {
            self.tree.get_enclosing_class_or_module(primary_declaration.node)
        } else {
            None
        };

        // The name of a class attributes to the scope *containing* the
        // class, so the class's own name is usable throughout that scope
        // rather than only inside its own body.
        if let Some(container) = class_or_module
            && primary_declaration.node.is_some()
            && self.tree.parent(primary_declaration.node) == container
            && matches!(self.kind_of(container), Some(NodeKind::Class(_)))
        {
            class_or_module = self.tree.get_enclosing_class_or_module(container);
        }

        // Protected members are reachable from subclasses of the declaring
        // class.
        let mut is_protected_access = false;
        if is_protected_name
            && let Some(container) = class_or_module
            && matches!(self.kind_of(container), Some(NodeKind::Class(_)))
            && let Some(declaring_info) = self.evaluator.get_type_of_class(container)
            && let Type::Class(declaring_class) = &declaring_info.decorated_type
        {
            is_protected_access = true;

            if let Some(enclosing_class) = self.tree.get_enclosing_class(node, false)
                && let Some(enclosing_info) = self.evaluator.get_type_of_class(enclosing_class)
                && let Type::Class(enclosing_class_type) = &enclosing_info.decorated_type
                && derives_from_class_recursive(enclosing_class_type, declaring_class)
            {
                return;
            }
        }

        if let Some(container) = class_or_module
            && !self.tree.is_node_contained_within(node, container)
        {
            if is_protected_access {
                self.add_diagnostic(
                    Rule::PrivateUsage,
                    format!("'{name_value}' is protected and used outside of a derived class"),
                    node,
                );
            } else {
                let scope_name =
                    if matches!(self.kind_of(container), Some(NodeKind::Class(_))) {
                        "class"
                    } else {
                        "module"
                    };
                self.add_diagnostic(
                    Rule::PrivateUsage,
                    format!(
                        "'{name_value}' is private and used outside of the {scope_name} \
                         in which it is declared"
                    ),
                    node,
                );
            }
        }
    }
}
