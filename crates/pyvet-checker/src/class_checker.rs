//! Class-level validation: method overrides and TypedDict suite shape.

use crate::checker::Checker;
use pyvet_ast::node::{ClassData, NodeKind};
use pyvet_ast::NodeIndex;
use pyvet_binder::symbol_names;
use pyvet_common::{DiagnosticAddendum, Rule};
use pyvet_solver::utils::get_symbol_from_base_classes;
use pyvet_solver::{ClassType, Type};

impl<'a> Checker<'a> {
    pub(crate) fn visit_class(&mut self, node: NodeIndex, class: &'a ClassData) -> bool {
        let class_result = self.evaluator.get_type_of_class(node);

        if let Some(result) = class_result {
            self.validate_class_methods(&result.class_type);
            if result.class_type.is_typed_dict() {
                self.validate_typed_dict_class_suite(class.suite);
            }
        }

        self.walk(class.suite);
        self.walk_multiple(&class.decorators);
        self.walk_multiple(&class.arguments);

        self.scoped_nodes.push(node);

        false
    }

    fn validate_class_methods(&mut self, class_type: &ClassType) {
        // Declaration-only files describe foreign hierarchies whose
        // overrides are frequently intentional reshapes; skip them.
        if !self.context.is_stub_file {
            self.validate_overridden_methods(class_type);
        }
    }

    fn validate_overridden_methods(&mut self, class_type: &ClassType) {
        for (name, &symbol_id) in &class_type.fields {
            let Some(symbol) = self.symbol_of(symbol_id) else {
                continue;
            };
            // Magic methods are intentionally reshaped all the time.
            if !symbol.is_class_member() || symbol_names::is_dunder_name(name) {
                continue;
            }

            let symbol_type = self.evaluator.get_effective_type_of_symbol(symbol_id);
            if !matches!(symbol_type, Type::Function(_)) {
                continue;
            }
            let Some((base_class, base_symbol)) = get_symbol_from_base_classes(class_type, name)
            else {
                continue;
            };
            let base_type = self.evaluator.get_effective_type_of_symbol(base_symbol);

            let mut addendum = DiagnosticAddendum::new();
            if !self
                .evaluator
                .can_override_method(&base_type, &symbol_type, &mut addendum)
                && let Some(declaration) = symbol.last_typed_declaration()
                && declaration.is_function_or_method()
            {
                let target = self.declaration_name_node(declaration.node);
                let base_declaration = self
                    .symbol_of(base_symbol)
                    .and_then(|base| base.last_typed_declaration());
                if let Some(diag) = self.add_diagnostic(
                    Rule::IncompatibleMethodOverride,
                    format!(
                        "Method '{name}' overrides class '{}' in an incompatible manner{}",
                        base_class.name,
                        addendum.text()
                    ),
                    target,
                ) && let Some(base_declaration) = base_declaration
                {
                    diag.add_related_info(
                        "See base method declaration",
                        base_declaration.path.clone(),
                        base_declaration.range,
                    );
                }
            }

            if let Type::Function(base_method) = &base_type
                && base_method.is_final()
                && let Some(declaration) = symbol.last_typed_declaration()
                && declaration.is_function_or_method()
            {
                let target = self.declaration_name_node(declaration.node);
                self.add_error(
                    format!(
                        "Method '{name}' cannot override final method defined in class '{}'",
                        base_class.name
                    ),
                    target,
                );
            }
        }
    }

    /// TypedDict suites may contain only annotations, doc strings, `...`,
    /// and `pass`.
    pub(crate) fn validate_typed_dict_class_suite(&mut self, suite: NodeIndex) {
        let Some(NodeKind::Suite(suite_data)) = self.kind_of(suite) else {
            return;
        };

        for &statement in &suite_data.statements {
            if self.tree.is_unreachable(statement) {
                continue;
            }
            match self.kind_of(statement) {
                Some(NodeKind::StatementList(list)) => {
                    for &substatement in &list.statements {
                        if !self.is_allowed_typed_dict_statement(substatement) {
                            self.add_error(
                                "TypedDict classes can contain only type annotations",
                                substatement,
                            );
                        }
                    }
                }
                _ => {
                    if !self.is_allowed_typed_dict_statement(statement) {
                        self.add_error(
                            "TypedDict classes can contain only type annotations",
                            statement,
                        );
                    }
                }
            }
        }
    }

    fn is_allowed_typed_dict_statement(&self, statement: NodeIndex) -> bool {
        matches!(
            self.kind_of(statement),
            Some(
                NodeKind::TypeAnnotation(_)
                    | NodeKind::Ellipsis
                    | NodeKind::StringList(_)
                    | NodeKind::String(_)
                    | NodeKind::Pass
            )
        )
    }
}
