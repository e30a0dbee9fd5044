//! Shared fixture for checker integration tests: a canned evaluator over
//! programmatically built trees, plus small builders and assertions.

#![allow(dead_code)]

use pyvet_ast::node::{FunctionData, ClassData, NodeKind, ParameterCategory};
use pyvet_ast::{NodeIndex, ParseTree};
use pyvet_binder::{
    symbol_flags, BindResult, Declaration, DeclarationKind, ScopeId, ScopeKind, SymbolId,
};
use pyvet_checker::{Checker, CheckerContext};
use pyvet_common::{DiagnosticAddendum, DiagnosticSink, RuleSeverities, TextRange};
use pyvet_solver::utils::{
    combine_types, derives_from_class_recursive, is_any_or_unknown, is_type_same,
};
use pyvet_solver::{
    ClassFlags, ClassType, ClassTypeResult, FunctionType, FunctionTypeResult, Type, TypeEvaluator,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::sync::Arc;

/// Hands out non-overlapping source ranges so every node gets a distinct,
/// deterministic location.
#[derive(Default)]
pub struct Spans {
    cursor: u32,
}

impl Spans {
    pub fn new() -> Spans {
        Spans::default()
    }

    pub fn next(&mut self, length: u32) -> TextRange {
        let range = TextRange::new(self.cursor, length);
        self.cursor += length + 1;
        range
    }
}

/// A canned [`TypeEvaluator`]: every answer is looked up in a table the
/// test filled in beforehand. Queries are logged so tests can assert the
/// cache-population side effect of the walk.
#[derive(Default)]
pub struct TestEvaluator {
    pub node_types: FxHashMap<NodeIndex, Type>,
    pub class_types: FxHashMap<NodeIndex, ClassTypeResult>,
    pub function_types: FxHashMap<NodeIndex, FunctionTypeResult>,
    pub declared_return_types: FxHashMap<NodeIndex, Type>,
    pub inferred_return_types: FxHashMap<String, Type>,
    pub symbol_types: FxHashMap<SymbolId, Type>,
    pub builtin_types: FxHashMap<String, Type>,
    pub name_declarations: FxHashMap<NodeIndex, Vec<Declaration>>,
    pub alias_resolutions: FxHashMap<NodeIndex, Declaration>,
    pub declaration_types: FxHashMap<NodeIndex, Type>,
    /// Names of methods whose overrides the evaluator deems incompatible.
    pub incompatible_overrides: FxHashSet<String>,
    pub unreachable_nodes: FxHashSet<NodeIndex>,
    pub unreachable_after: FxHashSet<NodeIndex>,
    pub evaluated: RefCell<FxHashSet<NodeIndex>>,
}

impl TestEvaluator {
    pub fn new() -> TestEvaluator {
        let mut evaluator = TestEvaluator::default();
        evaluator
            .builtin_types
            .insert("BaseException".to_string(), Type::class(base_exception_class()));
        evaluator
            .builtin_types
            .insert("Iterator".to_string(), Type::class(builtin_class("Iterator")));
        evaluator
    }

    pub fn set_type(&mut self, node: NodeIndex, ty: Type) {
        self.node_types.insert(node, ty);
    }

    pub fn was_evaluated(&self, node: NodeIndex) -> bool {
        self.evaluated.borrow().contains(&node)
    }

    fn log(&self, node: NodeIndex) {
        self.evaluated.borrow_mut().insert(node);
    }
}

impl TypeEvaluator for TestEvaluator {
    fn get_type(&self, node: NodeIndex) -> Option<Type> {
        self.log(node);
        self.node_types.get(&node).cloned()
    }

    fn evaluate_types_for_statement(&self, node: NodeIndex) {
        self.log(node);
    }

    fn get_type_of_class(&self, node: NodeIndex) -> Option<ClassTypeResult> {
        self.class_types.get(&node).cloned()
    }

    fn get_type_of_function(&self, node: NodeIndex) -> Option<FunctionTypeResult> {
        self.function_types.get(&node).cloned()
    }

    fn get_function_declared_return_type(&self, node: NodeIndex) -> Option<Type> {
        self.declared_return_types.get(&node).cloned().or_else(|| {
            self.function_types
                .get(&node)
                .and_then(|result| result.function_type.declared_return_type.clone())
        })
    }

    fn get_function_inferred_return_type(&self, function: &FunctionType) -> Type {
        self.inferred_return_types
            .get(&function.name)
            .cloned()
            .unwrap_or(Type::None)
    }

    fn get_effective_type_of_symbol(&self, symbol: SymbolId) -> Type {
        self.symbol_types.get(&symbol).cloned().unwrap_or(Type::Unknown)
    }

    fn can_assign_type(&self, dest: &Type, src: &Type, addendum: &mut DiagnosticAddendum) -> bool {
        if is_any_or_unknown(dest) || is_any_or_unknown(src) {
            return true;
        }
        if is_type_same(dest, src) {
            return true;
        }
        if let Type::Union(members) = dest
            && members
                .iter()
                .any(|member| self.can_assign_type(member, src, &mut DiagnosticAddendum::new()))
        {
            return true;
        }
        // Nominal subtyping applies only to unspecialized classes here;
        // specialized classes already compared structurally above.
        if let (Type::Object(src_class), Type::Object(dest_class)) = (src, dest)
            && src_class.type_arguments.is_none()
            && dest_class.type_arguments.is_none()
            && derives_from_class_recursive(src_class, dest_class)
        {
            return true;
        }
        addendum.add_message(format!(
            "'{}' is incompatible with '{}'",
            self.print_type(src),
            self.print_type(dest)
        ));
        false
    }

    fn can_override_method(
        &self,
        _base: &Type,
        derived: &Type,
        addendum: &mut DiagnosticAddendum,
    ) -> bool {
        if let Type::Function(derived_function) = derived
            && self.incompatible_overrides.contains(&derived_function.name)
        {
            addendum.add_message("Parameter types are incompatible");
            return false;
        }
        true
    }

    fn get_builtin_type(&self, _node: NodeIndex, name: &str) -> Option<Type> {
        self.builtin_types.get(name).cloned()
    }

    fn get_declarations_for_name_node(&self, node: NodeIndex) -> Option<Vec<Declaration>> {
        self.name_declarations.get(&node).cloned()
    }

    fn resolve_alias_declaration(&self, declaration: &Declaration) -> Option<Declaration> {
        Some(
            self.alias_resolutions
                .get(&declaration.node)
                .cloned()
                .unwrap_or_else(|| declaration.clone()),
        )
    }

    fn is_node_reachable(&self, node: NodeIndex) -> bool {
        !self.unreachable_nodes.contains(&node)
    }

    fn is_after_node_reachable(&self, node: NodeIndex) -> bool {
        !self.unreachable_after.contains(&node)
    }

    fn get_type_for_declaration(&self, declaration: &Declaration) -> Option<Type> {
        self.declaration_types.get(&declaration.node).cloned()
    }

    fn verify_delete_expression(&self, node: NodeIndex) {
        self.log(node);
    }

    fn get_type_from_iterable(&self, ty: &Type, _node: NodeIndex) -> Type {
        if let Type::Object(class) = ty
            && class.is_built_in("Tuple")
            && let Some(args) = &class.type_arguments
        {
            return combine_types(args.clone());
        }
        Type::Unknown
    }

    fn print_type(&self, ty: &Type) -> String {
        match ty {
            Type::Unbound => "Unbound".to_string(),
            Type::Unknown => "Unknown".to_string(),
            Type::Any => "Any".to_string(),
            Type::None => "None".to_string(),
            Type::Never => "Never".to_string(),
            Type::Module => "Module".to_string(),
            Type::Class(class) => format!("Type[{}]", class.name),
            Type::Object(class) => match &class.type_arguments {
                Some(args) if !args.is_empty() => {
                    let printed: Vec<String> = args.iter().map(|arg| self.print_type(arg)).collect();
                    format!("{}[{}]", class.name, printed.join(", "))
                }
                _ => class.name.clone(),
            },
            Type::Function(function) => function.name.clone(),
            Type::Union(members) => {
                let printed: Vec<String> =
                    members.iter().map(|member| self.print_type(member)).collect();
                printed.join(" | ")
            }
            Type::TypeVar(type_var) => type_var.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Type construction helpers
// ---------------------------------------------------------------------------

pub fn builtin_class(name: &str) -> ClassType {
    ClassType::new(name, ClassFlags::BUILT_IN)
}

pub fn plain_class(name: &str) -> ClassType {
    ClassType::new(name, ClassFlags::empty())
}

pub fn object_of(name: &str) -> Type {
    Type::object(builtin_class(name))
}

pub fn base_exception_class() -> ClassType {
    builtin_class("BaseException")
}

/// A user exception class deriving from `base`.
pub fn exception_class(name: &str, base: &ClassType) -> ClassType {
    let mut class = plain_class(name);
    class.base_classes.push(Type::class(base.clone()));
    class
}

pub fn tuple_object(args: Vec<Type>) -> Type {
    Type::object(builtin_class("Tuple").clone_for_specialization(args))
}

pub fn no_return_type() -> Type {
    Type::object(builtin_class("NoReturn"))
}

pub fn generator_object(yield_type: Type, send_type: Type, return_type: Type) -> Type {
    Type::object(
        builtin_class("Generator").clone_for_specialization(vec![
            yield_type, send_type, return_type,
        ]),
    )
}

pub fn function_type_result(function: FunctionType) -> FunctionTypeResult {
    let function_type = Arc::new(function);
    FunctionTypeResult {
        decorated_type: Type::Function(function_type.clone()),
        function_type,
    }
}

pub fn class_type_result(class: ClassType) -> ClassTypeResult {
    let class_type = Arc::new(class);
    ClassTypeResult {
        decorated_type: Type::Class(class_type.clone()),
        class_type,
    }
}

// ---------------------------------------------------------------------------
// Tree construction helpers
// ---------------------------------------------------------------------------

pub struct FunctionHandles {
    pub node: NodeIndex,
    pub name: NodeIndex,
    pub suite: NodeIndex,
    pub parameters: Vec<NodeIndex>,
}

/// `def <name>(<params>) [-> annotation]: <body>`
pub fn function(
    tree: &mut ParseTree,
    spans: &mut Spans,
    name: &str,
    parameters: Vec<NodeIndex>,
    return_type_annotation: NodeIndex,
    body: Vec<NodeIndex>,
) -> FunctionHandles {
    let suite = tree.add_suite(body, spans.next(8));
    let name_node = tree.add_name(name, spans.next(name.len() as u32));
    let node = tree.add_function(
        FunctionData {
            name: name_node,
            parameters: parameters.clone(),
            decorators: vec![],
            return_type_annotation,
            suite,
            is_async: false,
        },
        spans.next(10),
    );
    FunctionHandles {
        node,
        name: name_node,
        suite,
        parameters,
    }
}

pub struct ClassHandles {
    pub node: NodeIndex,
    pub name: NodeIndex,
    pub suite: NodeIndex,
}

/// `class <name>: <body>`
pub fn class(
    tree: &mut ParseTree,
    spans: &mut Spans,
    name: &str,
    body: Vec<NodeIndex>,
) -> ClassHandles {
    let suite = tree.add_suite(body, spans.next(8));
    let name_node = tree.add_name(name, spans.next(name.len() as u32));
    let node = tree.add_class(
        ClassData {
            name: name_node,
            arguments: vec![],
            decorators: vec![],
            suite,
        },
        spans.next(10),
    );
    ClassHandles {
        node,
        name: name_node,
        suite,
    }
}

pub struct ParamHandles {
    pub node: NodeIndex,
    pub name: NodeIndex,
}

/// A simple positional parameter with no annotation or default.
pub fn param(tree: &mut ParseTree, spans: &mut Spans, name: &str) -> ParamHandles {
    let name_node = tree.add_name(name, spans.next(name.len() as u32));
    let node = tree.add_parameter(
        name_node,
        ParameterCategory::Simple,
        NodeIndex::NONE,
        NodeIndex::NONE,
        spans.next(4),
    );
    ParamHandles {
        node,
        name: name_node,
    }
}

/// An ellipsis-only suite body (`...`).
pub fn ellipsis_body(tree: &mut ParseTree, spans: &mut Spans) -> Vec<NodeIndex> {
    let ellipsis = tree.add(NodeKind::Ellipsis, spans.next(3));
    let list = tree.add_statement_list(vec![ellipsis], spans.next(3));
    vec![list]
}

pub fn pass_body(tree: &mut ParseTree, spans: &mut Spans) -> Vec<NodeIndex> {
    let pass = tree.add(NodeKind::Pass, spans.next(4));
    vec![pass]
}

// ---------------------------------------------------------------------------
// Binding helpers
// ---------------------------------------------------------------------------

pub fn module_scope(binder: &mut BindResult, module: NodeIndex) -> ScopeId {
    let scope = binder.add_scope(ScopeKind::Module, None);
    binder.attach_scope(module, scope);
    scope
}

pub fn child_scope(
    binder: &mut BindResult,
    parent: ScopeId,
    kind: ScopeKind,
    node: NodeIndex,
) -> ScopeId {
    let scope = binder.add_scope(kind, Some(parent));
    binder.attach_scope(node, scope);
    scope
}

pub fn variable_declaration(name_node: NodeIndex, range: TextRange) -> Declaration {
    Declaration::new(
        DeclarationKind::Variable {
            annotation: NodeIndex::NONE,
        },
        name_node,
        "test.py",
        range,
    )
}

pub fn declare_variable(
    binder: &mut BindResult,
    scope: ScopeId,
    name: &str,
    name_node: NodeIndex,
    range: TextRange,
) -> SymbolId {
    binder.declare(
        scope,
        name,
        symbol_flags::NONE,
        variable_declaration(name_node, range),
    )
}

// ---------------------------------------------------------------------------
// Running the checker
// ---------------------------------------------------------------------------

pub fn context_all_errors() -> CheckerContext {
    let mut context = CheckerContext::new("test.py");
    context.rules = RuleSeverities::all_errors();
    context
}

pub fn run_checker(
    tree: &ParseTree,
    root: NodeIndex,
    binder: &BindResult,
    evaluator: &TestEvaluator,
    context: &CheckerContext,
) -> DiagnosticSink {
    let mut sink = DiagnosticSink::new();
    let mut checker = Checker::new(tree, root, binder, evaluator, context, &mut sink);
    checker.check();
    sink
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

pub fn messages(sink: &DiagnosticSink) -> Vec<String> {
    sink.diagnostics.iter().map(|diag| diag.message.clone()).collect()
}

/// Exactly one diagnostic, whose message contains `needle`.
pub fn assert_single_diagnostic(sink: &DiagnosticSink, needle: &str) {
    assert_eq!(
        sink.diagnostics.len(),
        1,
        "expected exactly one diagnostic, got: {:?}",
        messages(sink)
    );
    assert!(
        sink.diagnostics[0].message.contains(needle),
        "diagnostic {:?} does not contain {needle:?}",
        sink.diagnostics[0].message
    );
}

pub fn assert_no_diagnostics(sink: &DiagnosticSink) {
    assert!(
        sink.diagnostics.is_empty(),
        "expected no diagnostics, got: {:?}",
        messages(sink)
    );
}
