//! The reachability-gated walker and per-kind dispatch.
//!
//! One `Checker` checks one file's tree exactly once. Most node kinds only
//! need their type evaluated (which also populates the evaluator's
//! per-node cache); the interesting kinds carry their own validation and
//! control their own descent.

use crate::context::CheckerContext;
use pyvet_ast::node::NodeKind;
use pyvet_ast::{NodeIndex, ParseTree};
use pyvet_binder::{BindResult, Symbol, SymbolId};
use pyvet_common::DiagnosticSink;
use pyvet_solver::TypeEvaluator;
use tracing::{debug, debug_span};

pub struct Checker<'a> {
    pub(crate) tree: &'a ParseTree,
    pub(crate) root: NodeIndex,
    pub(crate) binder: &'a BindResult,
    pub(crate) evaluator: &'a dyn TypeEvaluator,
    pub(crate) context: &'a CheckerContext,
    pub(crate) sink: &'a mut DiagnosticSink,
    /// Scope-introducing nodes in walk order, consumed by the
    /// whole-module pass and discarded with the checker.
    pub(crate) scoped_nodes: Vec<NodeIndex>,
}

impl<'a> Checker<'a> {
    pub fn new(
        tree: &'a ParseTree,
        root: NodeIndex,
        binder: &'a BindResult,
        evaluator: &'a dyn TypeEvaluator,
        context: &'a CheckerContext,
        sink: &'a mut DiagnosticSink,
    ) -> Checker<'a> {
        Checker {
            tree,
            root,
            binder,
            evaluator,
            context,
            sink,
            scoped_nodes: Vec::new(),
        }
    }

    /// Walk the module once, then validate every collected scope.
    pub fn check(&mut self) {
        let _span = debug_span!("check", path = %self.context.file_path).entered();

        self.scoped_nodes.push(self.root);
        if let Some(NodeKind::Module(module)) = self.kind_of(self.root) {
            self.walk_multiple(&module.statements);
        }

        self.validate_symbol_tables();

        debug!(
            diagnostics = self.sink.diagnostics.len(),
            scopes = self.scoped_nodes.len(),
            "check pass complete"
        );
    }

    /// Node kind lookup that outlives `&self`, so payload references can be
    /// held across mutations of the checker.
    pub(crate) fn kind_of(&self, node: NodeIndex) -> Option<&'a NodeKind> {
        let tree: &'a ParseTree = self.tree;
        tree.kind(node)
    }

    pub(crate) fn name_of(&self, node: NodeIndex) -> Option<&'a str> {
        let tree: &'a ParseTree = self.tree;
        tree.name_value(node)
    }

    pub(crate) fn symbol_of(&self, id: SymbolId) -> Option<&'a Symbol> {
        let binder: &'a BindResult = self.binder;
        binder.symbol(id)
    }

    /// The name node a diagnostic about a declaration should anchor to.
    pub(crate) fn declaration_name_node(&self, node: NodeIndex) -> NodeIndex {
        match self.kind_of(node) {
            Some(NodeKind::Function(function)) => function.name,
            Some(NodeKind::Class(class)) => class.name,
            Some(NodeKind::Parameter(param)) if param.name.is_some() => param.name,
            _ => node,
        }
    }

    pub(crate) fn walk(&mut self, node: NodeIndex) {
        if node.is_none() || self.tree.is_unreachable(node) {
            return;
        }
        if self.visit(node) {
            for child in self.tree.children(node) {
                self.walk(child);
            }
        }
    }

    pub(crate) fn walk_multiple(&mut self, nodes: &[NodeIndex]) {
        for &node in nodes {
            self.walk(node);
        }
    }

    /// Per-kind dispatch. Returns whether the default child walk should
    /// run; kinds that order their own descent return `false`.
    fn visit(&mut self, node: NodeIndex) -> bool {
        let Some(kind) = self.kind_of(node) else {
            return false;
        };

        match kind {
            // Structural kinds with no checking of their own.
            NodeKind::Module(_)
            | NodeKind::Suite(_)
            | NodeKind::StatementList(_)
            | NodeKind::Try(_)
            | NodeKind::WithItem(_)
            | NodeKind::Decorator(_)
            | NodeKind::Argument(_)
            | NodeKind::ModuleName(_)
            | NodeKind::ComprehensionFor(_)
            | NodeKind::ComprehensionIf(_)
            | NodeKind::Parameter(_)
            | NodeKind::List(_)
            | NodeKind::String(_)
            | NodeKind::Number
            | NodeKind::Constant(_)
            | NodeKind::Ellipsis
            | NodeKind::Pass
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Global(_)
            | NodeKind::Nonlocal(_)
            | NodeKind::ImportFromAs(_) => true,

            NodeKind::Class(class) => self.visit_class(node, class),
            NodeKind::Function(function) => self.visit_function(node, function),
            NodeKind::Lambda(lambda) => self.visit_lambda(node, lambda),

            NodeKind::Call(call) => {
                self.evaluator.get_type(node);
                self.validate_isinstance_call_necessary(node, call);
                if self.tree.is_within_default_param_initializer(node)
                    && !self.context.is_stub_file
                {
                    self.add_diagnostic(
                        pyvet_common::Rule::CallInDefaultInitializer,
                        "Function calls within default value initializer are not permitted",
                        node,
                    );
                }
                true
            }

            NodeKind::ListComprehension(_) => {
                self.scoped_nodes.push(node);
                true
            }

            NodeKind::For(_) => {
                self.evaluator.evaluate_types_for_statement(node);
                true
            }

            NodeKind::If(data) => {
                self.evaluator.get_type(data.test_expression);
                true
            }
            NodeKind::While(data) => {
                self.evaluator.get_type(data.test_expression);
                true
            }

            NodeKind::With(data) => {
                for &item in &data.items {
                    self.evaluator.evaluate_types_for_statement(item);
                }
                true
            }

            NodeKind::Return(data) => self.visit_return(node, data),
            NodeKind::Yield(data) => self.visit_yield(node, data),
            NodeKind::YieldFrom(data) => self.visit_yield_from(node, data),
            NodeKind::Raise(data) => self.visit_raise(node, data),
            NodeKind::Except(data) => self.visit_except(node, data),
            NodeKind::Assert(data) => self.visit_assert(node, data),

            NodeKind::Assignment(data) => {
                self.evaluator.evaluate_types_for_statement(node);
                if data.annotation_comment.is_some() {
                    self.evaluator.get_type(data.annotation_comment);
                }
                true
            }
            NodeKind::AugmentedAssignment(_) => {
                self.evaluator.evaluate_types_for_statement(node);
                true
            }
            NodeKind::AssignmentExpression(_) => {
                self.evaluator.get_type(node);
                true
            }

            NodeKind::Index(_)
            | NodeKind::Slice(_)
            | NodeKind::BinaryOperation(_)
            | NodeKind::UnaryOperation(_)
            | NodeKind::Ternary(_)
            | NodeKind::Tuple(_)
            | NodeKind::Unpack(_) => {
                self.evaluator.get_type(node);
                true
            }

            NodeKind::StringList(data) => {
                // Only forward-reference strings carry semantic content.
                if data.type_annotation.is_some() {
                    self.evaluator.get_type(node);
                }
                true
            }

            NodeKind::FormatString(data) => {
                for &expression in &data.expressions {
                    self.evaluator.get_type(expression);
                }
                true
            }

            NodeKind::TypeAnnotation(data) => {
                self.evaluator.get_type(data.type_annotation);
                true
            }

            NodeKind::Name(_) => {
                self.report_private_usage(node);
                true
            }

            NodeKind::MemberAccess(data) => {
                self.evaluator.get_type(node);
                self.report_private_usage(data.member_name);
                // Walk the left side; the member name leaf was just
                // validated and is not independently re-walked.
                self.walk(data.left_expression);
                false
            }

            NodeKind::Del(data) => {
                for &expression in &data.expressions {
                    self.evaluator.verify_delete_expression(expression);
                }
                true
            }

            NodeKind::ImportAs(_) => {
                self.evaluator.evaluate_types_for_statement(node);
                false
            }
            NodeKind::ImportFrom(data) => {
                if !data.is_wildcard {
                    for &import in &data.imports {
                        self.evaluator.evaluate_types_for_statement(import);
                    }
                }
                false
            }

            NodeKind::Error(data) => {
                // Type the available child for downstream tooling, then
                // stop; the subtree is not well formed.
                if data.child.is_some() {
                    self.evaluator.get_type(data.child);
                }
                false
            }
        }
    }
}
