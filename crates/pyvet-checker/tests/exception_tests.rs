//! Exception contracts for raise/except and the truthy-assert rule.

mod support;

use pyvet_ast::{NodeIndex, ParseTree};
use pyvet_binder::BindResult;
use pyvet_checker::CheckerContext;
use pyvet_common::{DiagnosticCategory, Rule};
use pyvet_solver::Type;
use support::*;

#[test]
fn raising_a_non_exception_class_is_an_error() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let operand = tree.add_name("Widget", spans.next(6));
    let raise_stmt = tree.add_raise(operand, NodeIndex::NONE, spans.next(12));
    let module = tree.add_module(vec![raise_stmt], spans.next(1));

    evaluator.set_type(operand, Type::class(plain_class("Widget")));

    let binder = BindResult::new();
    let context = context_all_errors();
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_single_diagnostic(&sink, "Expected exception class or object");
    assert!(sink.diagnostics[0]
        .message
        .contains("'Type[Widget]' does not derive from BaseException"));
}

/// A union of invalid operands still produces one error per statement,
/// with one addendum line per offending member.
#[test]
fn invalid_union_operands_aggregate_into_one_error() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let operand = tree.add_name("value", spans.next(5));
    let raise_stmt = tree.add_raise(operand, NodeIndex::NONE, spans.next(11));
    let module = tree.add_module(vec![raise_stmt], spans.next(1));

    evaluator.set_type(
        operand,
        Type::union(vec![
            Type::class(plain_class("Widget")),
            Type::class(plain_class("Gadget")),
        ]),
    );

    let binder = BindResult::new();
    let context = context_all_errors();
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_eq!(sink.diagnostics.len(), 1);
    let message = &sink.diagnostics[0].message;
    assert!(message.contains("'Type[Widget]' does not derive from BaseException"));
    assert!(message.contains("'Type[Gadget]' does not derive from BaseException"));
}

#[test]
fn raising_a_proper_exception_is_quiet() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let operand = tree.add_name("MyError", spans.next(7));
    let raise_stmt = tree.add_raise(operand, NodeIndex::NONE, spans.next(13));
    let module = tree.add_module(vec![raise_stmt], spans.next(1));

    let my_error = exception_class("MyError", &base_exception_class());
    evaluator.set_type(operand, Type::class(my_error));

    let binder = BindResult::new();
    let context = context_all_errors();
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_no_diagnostics(&sink);
}

#[test]
fn raising_an_unknown_type_is_quiet() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let operand = tree.add_name("mystery", spans.next(7));
    let raise_stmt = tree.add_raise(operand, NodeIndex::NONE, spans.next(13));
    let module = tree.add_module(vec![raise_stmt], spans.next(1));

    evaluator.set_type(operand, Type::Unknown);

    let binder = BindResult::new();
    let context = context_all_errors();
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_no_diagnostics(&sink);
}

/// `raise E from cause` accepts None for the cause but nothing else
/// non-exceptional.
#[test]
fn raise_cause_accepts_none_but_not_other_values() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let operand = tree.add_name("MyError", spans.next(7));
    let cause = tree.add_name("cause", spans.next(5));
    let raise_stmt = tree.add_raise(operand, cause, spans.next(25));
    let module = tree.add_module(vec![raise_stmt], spans.next(1));

    let my_error = exception_class("MyError", &base_exception_class());
    evaluator.set_type(operand, Type::class(my_error));
    evaluator.set_type(cause, Type::None);

    let binder = BindResult::new();
    let context = context_all_errors();
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);
    assert_no_diagnostics(&sink);

    // An int cause is not an exception object.
    evaluator.set_type(cause, object_of("int"));
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);
    assert_single_diagnostic(&sink, "Expected exception object or None");
}

#[test]
fn except_accepts_a_tuple_of_exception_classes() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let target = tree.add_name("errors", spans.next(6));
    let body = pass_body(&mut tree, &mut spans);
    let suite = tree.add_suite(body, spans.next(4));
    let except = tree.add_except(target, NodeIndex::NONE, suite, spans.next(20));
    let try_suite_body = pass_body(&mut tree, &mut spans);
    let try_suite = tree.add_suite(try_suite_body, spans.next(4));
    let try_stmt = tree.add_try(
        pyvet_ast::node::TryData {
            try_suite,
            except_clauses: vec![except],
            else_suite: NodeIndex::NONE,
            finally_suite: NodeIndex::NONE,
        },
        spans.next(30),
    );
    let module = tree.add_module(vec![try_stmt], spans.next(1));

    let base = base_exception_class();
    evaluator.set_type(
        target,
        tuple_object(vec![
            Type::class(exception_class("IOError", &base)),
            Type::class(exception_class("ValueError", &base)),
        ]),
    );

    let binder = BindResult::new();
    let context = context_all_errors();
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_no_diagnostics(&sink);
}

#[test]
fn except_with_a_non_exception_type_is_an_error() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let target = tree.add_name("int", spans.next(3));
    let body = pass_body(&mut tree, &mut spans);
    let suite = tree.add_suite(body, spans.next(4));
    let except = tree.add_except(target, NodeIndex::NONE, suite, spans.next(14));
    let try_suite_body = pass_body(&mut tree, &mut spans);
    let try_suite = tree.add_suite(try_suite_body, spans.next(4));
    let try_stmt = tree.add_try(
        pyvet_ast::node::TryData {
            try_suite,
            except_clauses: vec![except],
            else_suite: NodeIndex::NONE,
            finally_suite: NodeIndex::NONE,
        },
        spans.next(24),
    );
    let module = tree.add_module(vec![try_stmt], spans.next(1));

    evaluator.set_type(target, Type::class(builtin_class("int")));

    let binder = BindResult::new();
    let context = context_all_errors();
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_single_diagnostic(&sink, "is not valid exception class");
}

/// `assert (a, b)` — a literal non-empty tuple is always truthy; the
/// default severity for this rule is warning.
#[test]
fn assert_on_a_non_empty_tuple_warns_by_default() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let test = tree.add_name("pair", spans.next(4));
    let assert_stmt = tree.add_assert(test, NodeIndex::NONE, spans.next(14));
    let module = tree.add_module(vec![assert_stmt], spans.next(1));

    evaluator.set_type(test, tuple_object(vec![object_of("int"), object_of("str")]));

    let binder = BindResult::new();
    let context = CheckerContext::new("test.py");
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_single_diagnostic(&sink, "Assert expression always evaluates to true");
    assert_eq!(sink.diagnostics[0].category, DiagnosticCategory::Warning);
    assert_eq!(sink.diagnostics[0].rule, Some(Rule::AssertAlwaysTrue));
    assert_eq!(sink.diagnostics[0].range, tree.range(test));
}

#[test]
fn assert_on_an_empty_tuple_is_quiet() {
    let mut tree = ParseTree::new();
    let mut spans = Spans::new();
    let mut evaluator = TestEvaluator::new();

    let test = tree.add_name("empty", spans.next(5));
    let assert_stmt = tree.add_assert(test, NodeIndex::NONE, spans.next(15));
    let module = tree.add_module(vec![assert_stmt], spans.next(1));

    evaluator.set_type(test, tuple_object(vec![]));

    let binder = BindResult::new();
    let context = CheckerContext::new("test.py");
    let sink = run_checker(&tree, module, &binder, &evaluator, &context);

    assert_no_diagnostics(&sink);
}
