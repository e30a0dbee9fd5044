//! Whole-module symbol-table validation.
//!
//! Runs once after the walk, over every scope collected along the way:
//! unused-symbol reporting and incompatible-redeclaration detection. The
//! entire pass is skipped for declaration-only files.

use crate::checker::Checker;
use pyvet_ast::node::NodeKind;
use pyvet_ast::NodeIndex;
use pyvet_binder::{symbol_names, Declaration, DeclarationKind, ScopeKind, SymbolId};
use pyvet_common::Rule;
use pyvet_solver::utils::{is_property, is_type_same};
use tracing::debug_span;

/// The noun used when one declaration obscures another.
fn declaration_kind_label(declaration: &Declaration) -> &'static str {
    match declaration.kind {
        DeclarationKind::Intrinsic => "intrinsic",
        DeclarationKind::Class | DeclarationKind::SpecialBuiltin => "class",
        DeclarationKind::Function { .. } => "function",
        DeclarationKind::Method { .. } => "method",
        DeclarationKind::Parameter { .. } => "parameter",
        DeclarationKind::Variable { .. } => "variable",
        DeclarationKind::Alias => "alias",
    }
}

impl<'a> Checker<'a> {
    pub(crate) fn validate_symbol_tables(&mut self) {
        // Declaration-only files have no executable code; nothing there is
        // "used" in the ordinary sense.
        if self.context.is_stub_file {
            return;
        }
        let _span = debug_span!("validate_symbol_tables").entered();

        for index in 0..self.scoped_nodes.len() {
            let scoped_node = self.scoped_nodes[index];
            let Some(scope_id) = self.binder.scope_for_node(scoped_node) else {
                continue;
            };
            let binder = self.binder;
            let Some(scope) = binder.scopes.get(scope_id) else {
                continue;
            };

            for (name, &symbol_id) in &scope.symbols {
                self.report_unused_symbol(name, symbol_id, scope.kind);
                self.report_incompatible_declarations(name, symbol_id);
            }
        }
    }

    fn report_unused_symbol(&mut self, name: &str, symbol_id: SymbolId, scope_kind: ScopeKind) {
        let Some(symbol) = self.symbol_of(symbol_id) else {
            return;
        };
        if symbol.is_ignored_for_protocol_match()
            || self.context.accessed_symbols.contains(&symbol_id)
        {
            return;
        }

        // A leading underscore means "I know this isn't used".
        if name.starts_with('_') {
            return;
        }
        if symbol_names::is_dunder_name(name) {
            return;
        }

        let is_private = self.is_symbol_private(name, scope_kind);
        for declaration in symbol.declarations() {
            self.report_unused_declaration(declaration, is_private);
        }
    }

    /// Privacy decides whether an unused symbol can possibly be consumed
    /// from elsewhere. Everything in a function or comprehension scope is
    /// private; in module and class scopes only conventionally-private
    /// names are.
    fn is_symbol_private(&self, name: &str, scope_kind: ScopeKind) -> bool {
        if matches!(scope_kind, ScopeKind::Function | ScopeKind::ListComprehension) {
            return true;
        }
        if symbol_names::is_private_name(name) {
            return true;
        }
        if symbol_names::is_protected_name(name) {
            // Protected names outside a class scope are effectively private.
            return scope_kind != ScopeKind::Class;
        }
        false
    }

    fn report_unused_declaration(&mut self, declaration: &'a Declaration, is_private: bool) {
        match declaration.kind {
            DeclarationKind::Alias => self.report_unused_import(declaration),
            DeclarationKind::Variable { .. } | DeclarationKind::Parameter { .. } => {
                if !is_private {
                    return;
                }
                let name_node = self.declaration_name_node(declaration.node);
                if let Some(name) = self.name_of(name_node) {
                    let range = self.range_of(name_node);
                    self.sink.add_unused_code(format!("'{name}' is not accessed"), range);
                    self.add_diagnostic(
                        Rule::UnusedVariable,
                        format!("Variable '{name}' is not accessed"),
                        name_node,
                    );
                }
            }
            DeclarationKind::Class => {
                if !is_private {
                    return;
                }
                let name_node = self.declaration_name_node(declaration.node);
                if let Some(name) = self.name_of(name_node) {
                    let range = self.range_of(name_node);
                    self.sink.add_unused_code(format!("'{name}' is not accessed"), range);
                    self.add_diagnostic(
                        Rule::UnusedClass,
                        format!("Class '{name}' is not accessed"),
                        name_node,
                    );
                }
            }
            DeclarationKind::Function { .. } | DeclarationKind::Method { .. } => {
                if !is_private {
                    return;
                }
                let name_node = self.declaration_name_node(declaration.node);
                if let Some(name) = self.name_of(name_node) {
                    let range = self.range_of(name_node);
                    self.sink.add_unused_code(format!("'{name}' is not accessed"), range);
                    self.add_diagnostic(
                        Rule::UnusedFunction,
                        format!("Function '{name}' is not accessed"),
                        name_node,
                    );
                }
            }
            DeclarationKind::Intrinsic | DeclarationKind::SpecialBuiltin => {}
        }
    }

    fn report_unused_import(&mut self, declaration: &'a Declaration) {
        let mut name_node = NodeIndex::NONE;

        match self.kind_of(declaration.node) {
            Some(NodeKind::ImportAs(import_as)) => {
                if import_as.alias.is_some() {
                    name_node = import_as.alias;
                } else if let Some(NodeKind::ModuleName(module_name)) =
                    self.kind_of(import_as.module)
                    && !module_name.name_parts.is_empty()
                {
                    // Multi-part module names report one range covering
                    // every part.
                    let parts: Vec<&str> = module_name
                        .name_parts
                        .iter()
                        .filter_map(|&part| self.name_of(part))
                        .collect();
                    let multipart_name = parts.join(".");
                    let mut range = self.range_of(module_name.name_parts[0]);
                    range.extend(self.range_of(*module_name.name_parts.last().unwrap()));

                    self.sink
                        .add_unused_code(format!("'{multipart_name}' is not accessed"), range);
                    self.add_diagnostic_for_range(
                        Rule::UnusedImport,
                        format!("Import '{multipart_name}' is not accessed"),
                        range,
                    );
                    return;
                }
            }
            Some(NodeKind::ImportFromAs(import_from_as)) => {
                // Re-exports from __future__ and from generated protobuf
                // modules ("*_pb2.py") are intentional; don't flag them.
                let import_from = self.tree.parent(declaration.node);
                let mut exempt = false;
                if let Some(NodeKind::ImportFrom(import_from_data)) = self.kind_of(import_from)
                    && let Some(NodeKind::ModuleName(module_name)) =
                        self.kind_of(import_from_data.module)
                    && let Some(&first_part) = module_name.name_parts.first()
                {
                    exempt = self.name_of(first_part) == Some("__future__")
                        || self.context.file_path.ends_with("_pb2.py");
                }
                if !exempt {
                    name_node = if import_from_as.alias.is_some() {
                        import_from_as.alias
                    } else {
                        import_from_as.name
                    };
                }
            }
            _ => {}
        }

        if name_node.is_some()
            && let Some(name) = self.name_of(name_node)
        {
            let range = self.range_of(name_node);
            self.sink.add_unused_code(format!("'{name}' is not accessed"), range);
            self.add_diagnostic(
                Rule::UnusedImport,
                format!("Import '{name}' is not accessed"),
                name_node,
            );
        }
    }

    /// With one or more typed declarations, every other declaration of the
    /// name must be consistent with the last typed one.
    fn report_incompatible_declarations(&mut self, name: &str, symbol_id: SymbolId) {
        let Some(symbol) = self.symbol_of(symbol_id) else {
            return;
        };
        let Some(primary) = symbol.last_typed_declaration() else {
            return;
        };

        let primary_is_function = primary.is_function_or_method();
        let other_declarations: Vec<&Declaration> = symbol
            .declarations()
            .iter()
            .filter(|declaration| !std::ptr::eq(*declaration, primary))
            // Overloads legitimately redeclare a function's name.
            .filter(|declaration| {
                !(primary_is_function && declaration.is_overloaded_function())
            })
            .collect();
        if other_declarations.is_empty() {
            return;
        }

        let primary_label = declaration_kind_label(primary);
        let primary_path = primary.path.clone();
        let primary_range = primary.range;

        for other in other_declarations {
            let diag = match other.kind {
                DeclarationKind::Class | DeclarationKind::SpecialBuiltin => {
                    let target = self.declaration_name_node(other.node);
                    self.add_error(
                        format!(
                            "Class declaration '{name}' is obscured by a {primary_label} \
                             declaration of the same name"
                        ),
                        target,
                    )
                }
                DeclarationKind::Function { .. } | DeclarationKind::Method { .. } => {
                    let target = self.declaration_name_node(other.node);
                    self.add_error(
                        format!(
                            "Function declaration '{name}' is obscured by a {primary_label} \
                             declaration of the same name"
                        ),
                        target,
                    )
                }
                DeclarationKind::Parameter { .. } => {
                    let target = self.declaration_name_node(other.node);
                    if self.name_of(target).is_some() {
                        self.add_error(
                            format!(
                                "Parameter '{name}' is obscured by a {primary_label} \
                                 declaration of the same name"
                            ),
                            target,
                        )
                    } else {
                        None
                    }
                }
                DeclarationKind::Variable { annotation } => {
                    let primary_type = self.evaluator.get_type_for_declaration(primary);
                    if annotation.is_some() {
                        if self.name_of(other.node).is_none() {
                            None
                        } else {
                            // Two annotated variables may redeclare the
                            // same type.
                            let mut duplicate_is_ok = false;
                            if matches!(primary.kind, DeclarationKind::Variable { .. })
                                && let Some(primary_type) = &primary_type
                                && let Some(other_type) =
                                    self.evaluator.get_type_for_declaration(other)
                                && is_type_same(primary_type, &other_type)
                            {
                                duplicate_is_ok = true;
                            }
                            if !duplicate_is_ok {
                                self.add_error(
                                    format!(
                                        "Declared type for '{name}' is obscured by an \
                                         incompatible {primary_label} declaration"
                                    ),
                                    other.node,
                                )
                            } else {
                                None
                            }
                        }
                    } else if let Some(primary_type) = &primary_type
                        && !is_property(primary_type)
                        && (primary_is_function
                            || matches!(primary.kind, DeclarationKind::Class))
                    {
                        self.add_error(
                            format!("Declared {primary_label} already exists for '{name}'"),
                            other.node,
                        )
                    } else {
                        None
                    }
                }
                DeclarationKind::Intrinsic | DeclarationKind::Alias => None,
            };

            if let Some(diag) = diag {
                diag.add_related_info(
                    format!("See {primary_label} declaration"),
                    primary_path.clone(),
                    primary_range,
                );
            }
        }
    }
}
