//! Exception contracts for `raise`, `except`, and the truthy-assert check.

use crate::checker::Checker;
use pyvet_ast::node::{AssertData, ExceptData, RaiseData};
use pyvet_ast::NodeIndex;
use pyvet_common::{DiagnosticAddendum, Rule};
use pyvet_solver::utils::{
    derives_from_class_recursive, for_each_subtype, is_any_or_unknown, is_none_or_never,
    transform_type_object_to_class,
};
use pyvet_solver::{ClassType, Type};

impl<'a> Checker<'a> {
    pub(crate) fn visit_raise(&mut self, node: NodeIndex, data: &'a RaiseData) -> bool {
        let base_exception_type = self.evaluator.get_builtin_type(node, "BaseException");

        // The raised operand must be an exception class or instance.
        if data.type_expression.is_some()
            && let Some(exception_type) = self.evaluator.get_type(data.type_expression)
            && let Some(Type::Class(base_exception)) = &base_exception_type
        {
            let mut addendum = DiagnosticAddendum::new();
            for_each_subtype(&exception_type, |subtype| {
                if is_any_or_unknown(subtype) {
                    return;
                }
                let derives = match subtype {
                    Type::Class(class) | Type::Object(class) => {
                        derives_from_class_recursive(class, base_exception)
                    }
                    _ => false,
                };
                if !derives {
                    addendum.add_message(format!(
                        "'{}' does not derive from BaseException",
                        self.evaluator.print_type(subtype)
                    ));
                }
            });
            if addendum.message_count() > 0 {
                self.add_error(
                    format!("Expected exception class or object{}", addendum.text()),
                    data.type_expression,
                );
            }
        }

        // The "from" cause must be an exception instance or None.
        if data.value_expression.is_some()
            && let Some(cause_type) = self.evaluator.get_type(data.value_expression)
            && let Some(Type::Class(base_exception)) = &base_exception_type
        {
            let mut addendum = DiagnosticAddendum::new();
            for_each_subtype(&cause_type, |subtype| {
                if is_any_or_unknown(subtype) || is_none_or_never(subtype) {
                    return;
                }
                let derives = match subtype {
                    Type::Object(class) => derives_from_class_recursive(class, base_exception),
                    _ => false,
                };
                if !derives {
                    addendum.add_message(format!(
                        "'{}' does not derive from BaseException",
                        self.evaluator.print_type(subtype)
                    ));
                }
            });
            if addendum.message_count() > 0 {
                self.add_error(
                    format!("Expected exception object or None{}", addendum.text()),
                    data.value_expression,
                );
            }
        }

        true
    }

    pub(crate) fn visit_except(&mut self, node: NodeIndex, data: &'a ExceptData) -> bool {
        if data.type_expression.is_some() {
            self.evaluator.evaluate_types_for_statement(node);

            if let Some(exception_type) = self.evaluator.get_type(data.type_expression) {
                self.validate_exception_type(&exception_type, data.type_expression);
            }
        }

        true
    }

    fn validate_exception_type(&mut self, exception_type: &Type, error_node: NodeIndex) {
        let base_exception_type = self.evaluator.get_builtin_type(error_node, "BaseException");
        let derives_from_base = |class: &ClassType| -> bool {
            match &base_exception_type {
                Some(Type::Class(base_exception)) => {
                    derives_from_class_recursive(class, base_exception)
                }
                // Without a resolvable root exception type there is nothing
                // to validate against.
                _ => true,
            }
        };

        let mut addendum = DiagnosticAddendum::new();

        match exception_type {
            ty if is_any_or_unknown(ty) => {}
            Type::Class(class) => {
                if !derives_from_base(class) {
                    addendum.add_message(format!(
                        "'{}' does not derive from BaseException",
                        self.evaluator.print_type(exception_type)
                    ));
                }
            }
            Type::Object(_) => {
                // A tuple of exception classes is caught member-wise;
                // unwrap one level of iteration.
                let iterable_type = self
                    .evaluator
                    .get_type_from_iterable(exception_type, error_node);
                for_each_subtype(&iterable_type, |subtype| {
                    if is_any_or_unknown(subtype) {
                        return;
                    }
                    let transformed = transform_type_object_to_class(subtype);
                    let derives = match &transformed {
                        Type::Class(class) => derives_from_base(class),
                        _ => false,
                    };
                    if !derives {
                        addendum.add_message(format!(
                            "'{}' does not derive from BaseException",
                            self.evaluator.print_type(exception_type)
                        ));
                    }
                });
            }
            _ => {
                addendum.add_message(format!(
                    "'{}' does not derive from BaseException",
                    self.evaluator.print_type(exception_type)
                ));
            }
        }

        if addendum.message_count() > 0 {
            self.add_error(
                format!(
                    "'{}' is not valid exception class{}",
                    self.evaluator.print_type(exception_type),
                    addendum.text()
                ),
                error_node,
            );
        }
    }

    pub(crate) fn visit_assert(&mut self, _node: NodeIndex, data: &'a AssertData) -> bool {
        if data.exception_expression.is_some() {
            self.evaluator.get_type(data.exception_expression);
        }

        if let Some(test_type) = self.evaluator.get_type(data.test_expression)
            && let Type::Object(class) = &test_type
            && class.is_built_in("Tuple")
            && class
                .type_arguments
                .as_ref()
                .is_some_and(|args| !args.is_empty())
        {
            // A parenthesized non-empty tuple is always truthy; the author
            // almost certainly meant assert with a message argument.
            self.add_diagnostic(
                Rule::AssertAlwaysTrue,
                "Assert expression always evaluates to true",
                data.test_expression,
            );
        }

        true
    }
}
