//! Redundant-narrowing detection for `isinstance`/`issubclass` calls.
//!
//! A runtime type check that provably cannot narrow its subject is either
//! dead (`never`) or vacuous (`always`); both are common bug indicators.

use crate::checker::Checker;
use pyvet_ast::node::{CallData, NodeKind};
use pyvet_ast::NodeIndex;
use pyvet_common::Rule;
use pyvet_solver::utils::{
    combine_types, is_any_or_unknown, is_type_same, map_subtypes, transform_type_object_to_class,
};
use pyvet_solver::{ClassType, Type};
use smallvec::SmallVec;
use std::sync::Arc;

impl<'a> Checker<'a> {
    pub(crate) fn validate_isinstance_call_necessary(
        &mut self,
        node: NodeIndex,
        call: &'a CallData,
    ) {
        if self.context.rules.severity(Rule::UnnecessaryIsInstance).is_none() {
            return;
        }

        // Inside an assert the check is the point; never flag it.
        if self.tree.is_within_assert(node) {
            return;
        }

        let Some(call_name) = self.name_of(call.left_expression) else {
            return;
        };
        let is_instance_check = match call_name {
            "isinstance" => true,
            "issubclass" => false,
            _ => return,
        };
        if call.arguments.len() != 2 {
            return;
        }

        let Some(subject_node) = self.argument_value(call.arguments[0]) else {
            return;
        };
        let Some(filter_node) = self.argument_value(call.arguments[1]) else {
            return;
        };

        let Some(subject_type) = self.evaluator.get_type(subject_node) else {
            return;
        };
        let subject_type = map_subtypes(&subject_type, transform_type_object_to_class);
        if is_any_or_unknown(&subject_type) {
            return;
        }

        let Some(filter_type) = self.evaluator.get_type(filter_node) else {
            return;
        };

        // The filter must reduce to a class or a tuple of classes; any
        // Any/Unknown anywhere aborts the whole check.
        let mut filter_classes: SmallVec<[Arc<ClassType>; 4]> = SmallVec::new();
        match &filter_type {
            Type::Class(class) => filter_classes.push(class.clone()),
            Type::Object(class) if class.is_built_in("Tuple") => {
                let Some(args) = &class.type_arguments else {
                    return;
                };
                for arg in args {
                    match arg {
                        Type::Class(member) => filter_classes.push(member.clone()),
                        _ => return,
                    }
                }
            }
            _ => return,
        }

        let wrap = |class: &Arc<ClassType>| -> Type {
            if is_instance_check {
                Type::Object(class.clone())
            } else {
                Type::Class(class.clone())
            }
        };

        // Partition the filters against one subject member: a filter above
        // the subject teaches nothing (keep the subject); a filter below it
        // narrows (keep the filter).
        let filter_member = |subject_class: &Arc<ClassType>| -> Vec<Type> {
            let mut remaining = Vec::new();
            for filter in &filter_classes {
                let filter_is_superclass =
                    pyvet_solver::utils::derives_from_class_recursive(subject_class, filter);
                let filter_is_subclass =
                    pyvet_solver::utils::derives_from_class_recursive(filter, subject_class);
                if filter_is_superclass {
                    remaining.push(wrap(subject_class));
                } else if filter_is_subclass {
                    remaining.push(wrap(filter));
                }
            }
            remaining
        };

        let narrowed_type = match &subject_type {
            Type::Object(class) if is_instance_check => combine_types(filter_member(class)),
            Type::Class(class) if !is_instance_check => combine_types(filter_member(class)),
            Type::Union(members) => {
                let mut remaining: Vec<Type> = Vec::new();
                let mut found_any_or_unknown = false;
                for member in members.iter() {
                    if is_any_or_unknown(member) {
                        found_any_or_unknown = true;
                    }
                    match member {
                        Type::Object(class) if is_instance_check => {
                            remaining.extend(filter_member(class));
                        }
                        Type::Class(class) if !is_instance_check => {
                            remaining.extend(filter_member(class));
                        }
                        _ => {}
                    }
                }
                // An Any/Unknown member means the runtime check can still
                // learn something; all bets are off.
                if found_any_or_unknown {
                    return;
                }
                combine_types(remaining)
            }
            _ => return,
        };

        let test_type = combine_types(
            filter_classes
                .iter()
                .map(|class| Type::Object(class.clone()))
                .collect(),
        );
        let relation = if is_instance_check { "instance" } else { "subclass" };

        if matches!(narrowed_type, Type::Never) {
            self.add_diagnostic(
                Rule::UnnecessaryIsInstance,
                format!(
                    "Unnecessary {call_name} call: '{}' is never {relation} of '{}'",
                    self.evaluator.print_type(&subject_type),
                    self.evaluator.print_type(&test_type)
                ),
                node,
            );
        } else if is_type_same(&narrowed_type, &subject_type) {
            self.add_diagnostic(
                Rule::UnnecessaryIsInstance,
                format!(
                    "Unnecessary {call_name} call: '{}' is always {relation} of '{}'",
                    self.evaluator.print_type(&subject_type),
                    self.evaluator.print_type(&test_type)
                ),
                node,
            );
        }
    }

    fn argument_value(&self, argument: NodeIndex) -> Option<NodeIndex> {
        match self.kind_of(argument)? {
            NodeKind::Argument(data) => Some(data.value_expression),
            // A bare expression in argument position.
            _ => Some(argument),
        }
    }
}
