//! The node arena.
//!
//! Trees are built bottom-up: children are created before their parent, and
//! `add` patches the children's parent links when the parent lands. This is
//! the invariant that makes parent indices safe to store as plain `u32`s.

use crate::node::*;
use pyvet_common::TextRange;
use smallvec::SmallVec;

type ChildList = SmallVec<[NodeIndex; 8]>;

#[derive(Debug, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
}

impl ParseTree {
    pub fn new() -> ParseTree {
        ParseTree::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node and fix up the parent links of its children.
    pub fn add(&mut self, kind: NodeKind, range: TextRange) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        let mut children = ChildList::new();
        collect_children(&kind, &mut children);
        self.nodes.push(ParseNode {
            kind,
            range,
            parent: NodeIndex::NONE,
            unreachable: false,
        });
        for child in children {
            if let Some(node) = self.nodes.get_mut(child.0 as usize) {
                node.parent = idx;
            }
        }
        idx
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&ParseNode> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    pub fn kind(&self, idx: NodeIndex) -> Option<&NodeKind> {
        self.get(idx).map(|node| &node.kind)
    }

    pub fn range(&self, idx: NodeIndex) -> TextRange {
        self.get(idx).map(|node| node.range).unwrap_or_default()
    }

    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.get(idx).map(|node| node.parent).unwrap_or(NodeIndex::NONE)
    }

    /// Record that flow analysis proved this node unreachable.
    pub fn mark_unreachable(&mut self, idx: NodeIndex) {
        if let Some(node) = self.nodes.get_mut(idx.0 as usize) {
            node.unreachable = true;
        }
    }

    pub fn is_unreachable(&self, idx: NodeIndex) -> bool {
        self.get(idx).is_some_and(|node| node.unreachable)
    }

    /// The node's children in source order.
    pub fn children(&self, idx: NodeIndex) -> SmallVec<[NodeIndex; 8]> {
        let mut out = ChildList::new();
        if let Some(node) = self.get(idx) {
            collect_children(&node.kind, &mut out);
        }
        out
    }

    /// The string value of a `Name` node, if `idx` is one.
    pub fn name_value(&self, idx: NodeIndex) -> Option<&str> {
        match self.kind(idx)? {
            NodeKind::Name(name) => Some(name.value.as_str()),
            _ => None,
        }
    }

    // Convenience constructors for the most common kinds. The external
    // parser front end builds trees through these.

    pub fn add_name(&mut self, value: &str, range: TextRange) -> NodeIndex {
        self.add(
            NodeKind::Name(NameData {
                value: value.to_string(),
            }),
            range,
        )
    }

    pub fn add_module(&mut self, statements: Vec<NodeIndex>, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Module(ModuleData { statements }), range)
    }

    pub fn add_suite(&mut self, statements: Vec<NodeIndex>, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Suite(SuiteData { statements }), range)
    }

    pub fn add_statement_list(
        &mut self,
        statements: Vec<NodeIndex>,
        range: TextRange,
    ) -> NodeIndex {
        self.add(NodeKind::StatementList(StatementListData { statements }), range)
    }

    pub fn add_parameter(
        &mut self,
        name: NodeIndex,
        category: ParameterCategory,
        type_annotation: NodeIndex,
        default_value: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Parameter(ParameterData {
                name,
                category,
                type_annotation,
                default_value,
            }),
            range,
        )
    }

    pub fn add_function(&mut self, data: FunctionData, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Function(data), range)
    }

    pub fn add_class(&mut self, data: ClassData, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Class(data), range)
    }

    pub fn add_lambda(
        &mut self,
        parameters: Vec<NodeIndex>,
        expression: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Lambda(LambdaData {
                parameters,
                expression,
            }),
            range,
        )
    }

    pub fn add_call(
        &mut self,
        left_expression: NodeIndex,
        arguments: Vec<NodeIndex>,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Call(CallData {
                left_expression,
                arguments,
            }),
            range,
        )
    }

    pub fn add_argument(
        &mut self,
        name: NodeIndex,
        value_expression: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Argument(ArgumentData {
                name,
                value_expression,
            }),
            range,
        )
    }

    pub fn add_member_access(
        &mut self,
        left_expression: NodeIndex,
        member_name: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::MemberAccess(MemberAccessData {
                left_expression,
                member_name,
            }),
            range,
        )
    }

    pub fn add_return(&mut self, expression: NodeIndex, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Return(ReturnData { expression }), range)
    }

    pub fn add_yield(&mut self, expression: NodeIndex, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Yield(YieldData { expression }), range)
    }

    pub fn add_yield_from(&mut self, expression: NodeIndex, range: TextRange) -> NodeIndex {
        self.add(NodeKind::YieldFrom(YieldFromData { expression }), range)
    }

    pub fn add_raise(
        &mut self,
        type_expression: NodeIndex,
        value_expression: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Raise(RaiseData {
                type_expression,
                value_expression,
            }),
            range,
        )
    }

    pub fn add_except(
        &mut self,
        type_expression: NodeIndex,
        name: NodeIndex,
        except_suite: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Except(ExceptData {
                type_expression,
                name,
                except_suite,
            }),
            range,
        )
    }

    pub fn add_try(&mut self, data: TryData, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Try(data), range)
    }

    pub fn add_assert(
        &mut self,
        test_expression: NodeIndex,
        exception_expression: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Assert(AssertData {
                test_expression,
                exception_expression,
            }),
            range,
        )
    }

    pub fn add_assignment(
        &mut self,
        left_expression: NodeIndex,
        right_expression: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::Assignment(AssignmentData {
                left_expression,
                right_expression,
                annotation_comment: NodeIndex::NONE,
            }),
            range,
        )
    }

    pub fn add_type_annotation(
        &mut self,
        value_expression: NodeIndex,
        type_annotation: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::TypeAnnotation(TypeAnnotationData {
                value_expression,
                type_annotation,
            }),
            range,
        )
    }

    pub fn add_tuple(&mut self, expressions: Vec<NodeIndex>, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Tuple(TupleData { expressions }), range)
    }

    pub fn add_module_name(
        &mut self,
        leading_dots: usize,
        name_parts: Vec<NodeIndex>,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::ModuleName(ModuleNameData {
                leading_dots,
                name_parts,
            }),
            range,
        )
    }

    pub fn add_import_as(
        &mut self,
        module: NodeIndex,
        alias: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(NodeKind::ImportAs(ImportAsData { module, alias }), range)
    }

    pub fn add_import_from(
        &mut self,
        module: NodeIndex,
        imports: Vec<NodeIndex>,
        is_wildcard: bool,
        range: TextRange,
    ) -> NodeIndex {
        self.add(
            NodeKind::ImportFrom(ImportFromData {
                module,
                imports,
                is_wildcard,
            }),
            range,
        )
    }

    pub fn add_import_from_as(
        &mut self,
        name: NodeIndex,
        alias: NodeIndex,
        range: TextRange,
    ) -> NodeIndex {
        self.add(NodeKind::ImportFromAs(ImportFromAsData { name, alias }), range)
    }

    pub fn add_decorator(&mut self, expression: NodeIndex, range: TextRange) -> NodeIndex {
        self.add(NodeKind::Decorator(DecoratorData { expression }), range)
    }
}

/// Push the non-absent children of `kind`, in source order. Used both for
/// parent fixup at insertion and for the default walk.
fn collect_children(kind: &NodeKind, out: &mut ChildList) {
    let mut push = |idx: NodeIndex| {
        if idx.is_some() {
            out.push(idx);
        }
    };

    match kind {
        NodeKind::Module(data) => data.statements.iter().copied().for_each(&mut push),
        NodeKind::Suite(data) => data.statements.iter().copied().for_each(&mut push),
        NodeKind::StatementList(data) => data.statements.iter().copied().for_each(&mut push),
        NodeKind::If(data) => {
            push(data.test_expression);
            push(data.if_suite);
            push(data.else_suite);
        }
        NodeKind::While(data) => {
            push(data.test_expression);
            push(data.while_suite);
            push(data.else_suite);
        }
        NodeKind::For(data) => {
            push(data.target_expression);
            push(data.iterable_expression);
            push(data.for_suite);
            push(data.else_suite);
        }
        NodeKind::With(data) => {
            data.items.iter().copied().for_each(&mut push);
            push(data.suite);
        }
        NodeKind::WithItem(data) => {
            push(data.expression);
            push(data.target);
        }
        NodeKind::Try(data) => {
            push(data.try_suite);
            data.except_clauses.iter().copied().for_each(&mut push);
            push(data.else_suite);
            push(data.finally_suite);
        }
        NodeKind::Except(data) => {
            push(data.type_expression);
            push(data.name);
            push(data.except_suite);
        }
        NodeKind::Assert(data) => {
            push(data.test_expression);
            push(data.exception_expression);
        }
        NodeKind::Return(data) => push(data.expression),
        NodeKind::Yield(data) => push(data.expression),
        NodeKind::YieldFrom(data) => push(data.expression),
        NodeKind::Raise(data) => {
            push(data.type_expression);
            push(data.value_expression);
        }
        NodeKind::Del(data) => data.expressions.iter().copied().for_each(&mut push),
        NodeKind::Assignment(data) => {
            push(data.left_expression);
            push(data.right_expression);
            push(data.annotation_comment);
        }
        NodeKind::AugmentedAssignment(data) => {
            push(data.left_expression);
            push(data.right_expression);
        }
        NodeKind::AssignmentExpression(data) => {
            push(data.name);
            push(data.value_expression);
        }
        NodeKind::TypeAnnotation(data) => {
            push(data.value_expression);
            push(data.type_annotation);
        }
        NodeKind::Name(_) => {}
        NodeKind::MemberAccess(data) => {
            push(data.left_expression);
            push(data.member_name);
        }
        NodeKind::Call(data) => {
            push(data.left_expression);
            data.arguments.iter().copied().for_each(&mut push);
        }
        NodeKind::Argument(data) => {
            push(data.name);
            push(data.value_expression);
        }
        NodeKind::Index(data) => {
            push(data.base_expression);
            data.items.iter().copied().for_each(&mut push);
        }
        NodeKind::Slice(data) => {
            push(data.start_value);
            push(data.end_value);
            push(data.step_value);
        }
        NodeKind::BinaryOperation(data) => {
            push(data.left_expression);
            push(data.right_expression);
        }
        NodeKind::UnaryOperation(data) => push(data.expression),
        NodeKind::Ternary(data) => {
            push(data.if_expression);
            push(data.test_expression);
            push(data.else_expression);
        }
        NodeKind::Tuple(data) => data.expressions.iter().copied().for_each(&mut push),
        NodeKind::List(data) => data.entries.iter().copied().for_each(&mut push),
        NodeKind::Unpack(data) => push(data.expression),
        NodeKind::Lambda(data) => {
            data.parameters.iter().copied().for_each(&mut push);
            push(data.expression);
        }
        NodeKind::ListComprehension(data) => {
            push(data.expression);
            data.comprehensions.iter().copied().for_each(&mut push);
        }
        NodeKind::ComprehensionFor(data) => {
            push(data.target_expression);
            push(data.iterable_expression);
        }
        NodeKind::ComprehensionIf(data) => push(data.test_expression),
        NodeKind::Parameter(data) => {
            push(data.name);
            push(data.type_annotation);
            push(data.default_value);
        }
        NodeKind::Function(data) => {
            data.decorators.iter().copied().for_each(&mut push);
            push(data.name);
            data.parameters.iter().copied().for_each(&mut push);
            push(data.return_type_annotation);
            push(data.suite);
        }
        NodeKind::Class(data) => {
            data.decorators.iter().copied().for_each(&mut push);
            push(data.name);
            data.arguments.iter().copied().for_each(&mut push);
            push(data.suite);
        }
        NodeKind::Decorator(data) => push(data.expression),
        NodeKind::ImportAs(data) => {
            push(data.module);
            push(data.alias);
        }
        NodeKind::ImportFrom(data) => {
            push(data.module);
            data.imports.iter().copied().for_each(&mut push);
        }
        NodeKind::ImportFromAs(data) => {
            push(data.name);
            push(data.alias);
        }
        NodeKind::ModuleName(data) => data.name_parts.iter().copied().for_each(&mut push),
        NodeKind::StringList(data) => {
            data.strings.iter().copied().for_each(&mut push);
            push(data.type_annotation);
        }
        NodeKind::String(_) => {}
        NodeKind::FormatString(data) => data.expressions.iter().copied().for_each(&mut push),
        NodeKind::Number
        | NodeKind::Constant(_)
        | NodeKind::Ellipsis
        | NodeKind::Pass
        | NodeKind::Break
        | NodeKind::Continue => {}
        NodeKind::Global(data) => data.names.iter().copied().for_each(&mut push),
        NodeKind::Nonlocal(data) => data.names.iter().copied().for_each(&mut push),
        NodeKind::Error(data) => push(data.child),
    }
}
