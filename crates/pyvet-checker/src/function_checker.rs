//! Function, method, and lambda validation: parameter typing, first-parameter
//! naming conventions, and the return/yield contract.

use crate::checker::Checker;
use pyvet_ast::node::{FunctionData, LambdaData, NodeKind, ParameterCategory, ReturnData, YieldData, YieldFromData};
use pyvet_ast::NodeIndex;
use pyvet_common::{DiagnosticAddendum, Rule};
use pyvet_solver::utils::{
    contains_unknown, get_declared_generator_return_type, get_declared_generator_yield_type,
    is_no_return_type, specialize_type,
};
use pyvet_solver::{FunctionType, Type};
use std::sync::Arc;

impl<'a> Checker<'a> {
    pub(crate) fn visit_function(&mut self, node: NodeIndex, function: &'a FunctionData) -> bool {
        let function_result = self.evaluator.get_type_of_function(node);
        let containing_class = self.tree.get_enclosing_class(node, true);

        if let Some(result) = &function_result {
            // Report any unknown parameter types.
            for (index, &param_node) in function.parameters.iter().enumerate() {
                let Some(NodeKind::Parameter(param)) = self.kind_of(param_node) else {
                    continue;
                };
                if param.name.is_none() {
                    continue;
                }
                if let Some(param_type) = result.function_type.parameters.get(index)
                    && matches!(param_type.ty, Type::Unknown)
                {
                    let param_name = self.name_of(param.name).unwrap_or_default();
                    self.add_diagnostic(
                        Rule::UnknownParameterType,
                        format!("Type of '{param_name}' is unknown"),
                        param.name,
                    );
                }
            }

            if containing_class.is_some() {
                self.validate_method(function, &result.function_type);
            }
        }

        // Parameter defaults and annotations evaluate in the enclosing
        // scope, before the function's own scope is entered.
        for &param_node in &function.parameters {
            let Some(NodeKind::Parameter(param)) = self.kind_of(param_node) else {
                continue;
            };
            if param.default_value.is_some() {
                self.walk(param.default_value);
            }
            if param.type_annotation.is_some() {
                self.walk(param.type_annotation);
            }
        }

        if function.return_type_annotation.is_some() {
            self.walk(function.return_type_annotation);
        }

        self.walk_multiple(&function.decorators);

        for &param_node in &function.parameters {
            let Some(NodeKind::Parameter(param)) = self.kind_of(param_node) else {
                continue;
            };
            if param.name.is_some() {
                self.walk(param.name);
            }
        }

        self.walk(function.suite);

        if let Some(result) = &function_result {
            self.validate_function_return(node, function, &result.function_type);
        }

        self.scoped_nodes.push(node);

        false
    }

    pub(crate) fn visit_lambda(&mut self, node: NodeIndex, lambda: &'a LambdaData) -> bool {
        self.evaluator.get_type(node);

        self.walk_multiple(&lambda.parameters);
        self.walk(lambda.expression);

        for &param_node in &lambda.parameters {
            let Some(NodeKind::Parameter(param)) = self.kind_of(param_node) else {
                continue;
            };
            if param.name.is_none() {
                continue;
            }
            let Some(param_type) = self.evaluator.get_type(param.name) else {
                continue;
            };
            let param_name = self.name_of(param.name).unwrap_or_default();
            if matches!(param_type, Type::Unknown) {
                self.add_diagnostic(
                    Rule::UnknownLambdaType,
                    format!("Type of '{param_name}' is unknown"),
                    param.name,
                );
            } else if contains_unknown(&param_type) {
                let printed = self.evaluator.print_type(&param_type);
                self.add_diagnostic(
                    Rule::UnknownLambdaType,
                    format!("Type of '{param_name}', '{printed}', is partially unknown"),
                    param.name,
                );
            }
        }

        if let Some(return_type) = self.evaluator.get_type(lambda.expression) {
            if matches!(return_type, Type::Unknown) {
                self.add_diagnostic(
                    Rule::UnknownLambdaType,
                    "Type of lambda expression is unknown",
                    lambda.expression,
                );
            } else if contains_unknown(&return_type) {
                let printed = self.evaluator.print_type(&return_type);
                self.add_diagnostic(
                    Rule::UnknownLambdaType,
                    format!("Type of lambda expression, '{printed}', is partially unknown"),
                    lambda.expression,
                );
            }
        }

        self.scoped_nodes.push(node);

        false
    }

    pub(crate) fn visit_return(&mut self, node: NodeIndex, data: &'a ReturnData) -> bool {
        let enclosing_function = self.tree.get_enclosing_function(node);
        let declared_return_type = enclosing_function
            .and_then(|function| self.evaluator.get_function_declared_return_type(function));

        // With no return expression, "None" is assumed.
        let return_type = if data.expression.is_some() {
            self.evaluator.get_type(data.expression).unwrap_or(Type::Unknown)
        } else {
            Type::None
        };

        if enclosing_function.is_some()
            && self.evaluator.is_node_reachable(node)
            && let Some(declared) = declared_return_type
        {
            if is_no_return_type(&declared) {
                self.add_error(
                    "Function with declared return type 'NoReturn' cannot include a return statement",
                    node,
                );
            } else {
                // Free type variables compare via their bound or
                // constraint types.
                let specialized = specialize_type(&declared);
                let mut addendum = DiagnosticAddendum::new();
                if !self
                    .evaluator
                    .can_assign_type(&specialized, &return_type, &mut addendum)
                {
                    let target = if data.expression.is_some() {
                        data.expression
                    } else {
                        node
                    };
                    self.add_error(
                        format!(
                            "Expression of type '{}' cannot be assigned to return type '{}'{}",
                            self.evaluator.print_type(&return_type),
                            self.evaluator.print_type(&specialized),
                            addendum.text()
                        ),
                        target,
                    );
                }
            }
        }

        true
    }

    pub(crate) fn visit_yield(&mut self, node: NodeIndex, data: &'a YieldData) -> bool {
        let yield_type = if data.expression.is_some() {
            self.evaluator.get_type(data.expression)
        } else {
            Some(Type::None)
        };

        // Wrap the yielded type in the Iterator shape.
        let iterator_type = self.evaluator.get_builtin_type(node, "Iterator");
        let adjusted_yield_type = match (yield_type, iterator_type) {
            (Some(yield_type), Some(Type::Class(iterator))) => Type::Object(Arc::new(
                iterator.clone_for_specialization(vec![yield_type]),
            )),
            _ => Type::Unknown,
        };

        self.validate_yield_type(node, data.expression, &adjusted_yield_type);

        true
    }

    pub(crate) fn visit_yield_from(&mut self, node: NodeIndex, data: &'a YieldFromData) -> bool {
        if let Some(yield_type) = self.evaluator.get_type(data.expression) {
            self.validate_yield_type(node, data.expression, &yield_type);
        }

        true
    }

    fn validate_yield_type(
        &mut self,
        node: NodeIndex,
        expression: NodeIndex,
        adjusted_yield_type: &Type,
    ) {
        let mut declared_yield_type = None;
        if let Some(enclosing_function) = self.tree.get_enclosing_function(node)
            && let Some(result) = self.evaluator.get_type_of_function(enclosing_function)
        {
            let iterator_type = self
                .evaluator
                .get_builtin_type(node, "Iterator")
                .unwrap_or(Type::Unknown);
            declared_yield_type =
                get_declared_generator_yield_type(&result.function_type, &iterator_type);
        }

        if !self.evaluator.is_node_reachable(node) {
            return;
        }
        let Some(declared) = declared_yield_type else {
            return;
        };

        if is_no_return_type(&declared) {
            self.add_error(
                "Function with declared return type 'NoReturn' cannot include a yield statement",
                node,
            );
        } else {
            let mut addendum = DiagnosticAddendum::new();
            if !self
                .evaluator
                .can_assign_type(&declared, adjusted_yield_type, &mut addendum)
            {
                let target = if expression.is_some() { expression } else { node };
                self.add_error(
                    format!(
                        "Expression of type '{}' cannot be assigned to yield type '{}'{}",
                        self.evaluator.print_type(adjusted_yield_type),
                        self.evaluator.print_type(&declared),
                        addendum.text()
                    ),
                    target,
                );
            }
        }
    }

    /// Post-body validation of the declared (or inferred) return type.
    fn validate_function_return(
        &mut self,
        node: NodeIndex,
        function: &'a FunctionData,
        function_type: &FunctionType,
    ) {
        // Declaration-only files elide bodies; nothing to validate.
        if self.context.is_stub_file {
            return;
        }

        if function.return_type_annotation.is_some() {
            let function_never_returns = !self.evaluator.is_after_node_reachable(node);
            let implicitly_returns_none = self.evaluator.is_after_node_reachable(function.suite);

            let declared_return_type = if function_type.is_generator() {
                get_declared_generator_return_type(function_type)
            } else {
                function_type.declared_return_type.clone()
            };

            // Each return statement was already checked on the walk; what
            // remains is the implicit None when the body's end is reachable.
            let Some(declared) = declared_return_type else {
                return;
            };
            if function_never_returns || !implicitly_returns_none {
                return;
            }

            if is_no_return_type(&declared) {
                // A body of "..." marks an abstract or protocol stub and is
                // allowed to fall through.
                if !self.tree.is_suite_empty(function.suite) {
                    self.add_error(
                        "Function with declared type of 'NoReturn' cannot return 'None'",
                        function.return_type_annotation,
                    );
                }
            } else if !function_type.is_abstract_method() {
                let mut addendum = DiagnosticAddendum::new();
                if !self
                    .evaluator
                    .can_assign_type(&declared, &Type::None, &mut addendum)
                    && !self.tree.is_suite_empty(function.suite)
                {
                    self.add_error(
                        format!(
                            "Function with declared type of '{}' must return value{}",
                            self.evaluator.print_type(&declared),
                            addendum.text()
                        ),
                        function.return_type_annotation,
                    );
                }
            }
        } else {
            let inferred = self.evaluator.get_function_inferred_return_type(function_type);
            if matches!(inferred, Type::Unknown) {
                self.add_diagnostic(
                    Rule::UnknownParameterType,
                    "Inferred return type is unknown",
                    function.name,
                );
            } else if contains_unknown(&inferred) {
                self.add_diagnostic(
                    Rule::UnknownParameterType,
                    format!(
                        "Return type '{}' is partially unknown",
                        self.evaluator.print_type(&inferred)
                    ),
                    function.name,
                );
            }
        }
    }

    /// First-parameter naming conventions for methods.
    fn validate_method(&mut self, function: &'a FunctionData, function_type: &FunctionType) {
        let function_name = self.name_of(function.name).unwrap_or_default();
        let first_param_node = function.parameters.first().copied().unwrap_or(NodeIndex::NONE);
        let first_param = match self.kind_of(first_param_node) {
            Some(NodeKind::Parameter(param)) => Some(param),
            _ => None,
        };
        let first_param_name = first_param
            .and_then(|param| self.name_of(param.name))
            .unwrap_or_default();
        // Diagnostics anchor at the first parameter when there is one.
        let param_or_name_target = if first_param_node.is_some() {
            first_param_node
        } else {
            function.name
        };

        if function_name == "__new__" {
            if !matches!(first_param_name, "cls" | "mcs") {
                self.add_error(
                    "The __new__ override should take a 'cls' parameter",
                    param_or_name_target,
                );
            }
        } else if function_name == "__init_subclass__" {
            if first_param_name != "cls" {
                self.add_error(
                    "The __init_subclass__ override should take a 'cls' parameter",
                    param_or_name_target,
                );
            }
        } else if function_type.is_static_method() {
            if matches!(first_param_name, "self" | "cls")
                && let Some(param) = first_param
            {
                self.add_error(
                    "Static methods should not take a 'self' or 'cls' parameter",
                    param.name,
                );
            }
        } else if function_type.is_class_method() {
            if first_param_name != "cls" {
                // Stub files use underscore-prefixed names and 'metacls' in
                // a few places; accept those there.
                let exempt = self.context.is_stub_file
                    && (first_param_name.starts_with('_') || first_param_name == "metacls");
                if !exempt {
                    self.add_error(
                        "Class methods should take a 'cls' parameter",
                        param_or_name_target,
                    );
                }
            }
        } else {
            // A decorator can change the calling convention entirely, so
            // only undecorated instance methods are held to the convention.
            if !function.decorators.is_empty() {
                return;
            }
            let first_param_is_simple = first_param
                .map(|param| param.category == ParameterCategory::Simple)
                .unwrap_or(true);
            if first_param_is_simple
                && first_param_name != "self"
                && !first_param_name.starts_with('_')
            {
                // The metaclass registration method in declaration-only
                // files legitimately takes 'cls'.
                let is_register_method = self.context.is_stub_file
                    && first_param_name == "cls"
                    && function_name == "register";
                if !is_register_method {
                    self.add_error(
                        "Instance methods should take a 'self' parameter",
                        param_or_name_target,
                    );
                }
            }
        }
    }
}
