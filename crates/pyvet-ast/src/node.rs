//! Node kinds and their payloads.
//!
//! `NodeKind` is a closed union: adding a kind is a breaking change that the
//! compiler surfaces at every exhaustive match, which is exactly what the
//! checker's dispatch relies on.

use pyvet_common::TextRange;

/// Index of a node inside its [`crate::ParseTree`] arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Sentinel for an absent optional child.
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    FloorDivide,
    Mod,
    Pow,
    MatrixMultiply,
    LeftShift,
    RightShift,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseInvert,
    And,
    Or,
    Not,
    Negate,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Is,
    IsNot,
    In,
    NotIn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParameterCategory {
    Simple,
    VarArgList,
    VarArgDictionary,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConstantKind {
    True,
    False,
    None,
    Debug,
}

#[derive(Clone, Debug)]
pub struct ModuleData {
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct SuiteData {
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct StatementListData {
    pub statements: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct IfData {
    pub test_expression: NodeIndex,
    pub if_suite: NodeIndex,
    pub else_suite: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct WhileData {
    pub test_expression: NodeIndex,
    pub while_suite: NodeIndex,
    pub else_suite: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ForData {
    pub target_expression: NodeIndex,
    pub iterable_expression: NodeIndex,
    pub for_suite: NodeIndex,
    pub else_suite: NodeIndex,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct WithData {
    pub items: Vec<NodeIndex>,
    pub suite: NodeIndex,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct WithItemData {
    pub expression: NodeIndex,
    pub target: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TryData {
    pub try_suite: NodeIndex,
    pub except_clauses: Vec<NodeIndex>,
    pub else_suite: NodeIndex,
    pub finally_suite: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ExceptData {
    pub type_expression: NodeIndex,
    pub name: NodeIndex,
    pub except_suite: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AssertData {
    pub test_expression: NodeIndex,
    pub exception_expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ReturnData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct YieldData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct YieldFromData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct RaiseData {
    pub type_expression: NodeIndex,
    pub value_expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct DelData {
    pub expressions: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct AssignmentData {
    pub left_expression: NodeIndex,
    pub right_expression: NodeIndex,
    pub annotation_comment: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct AugmentedAssignmentData {
    pub left_expression: NodeIndex,
    pub right_expression: NodeIndex,
    pub operator: Operator,
}

#[derive(Clone, Debug)]
pub struct AssignmentExpressionData {
    pub name: NodeIndex,
    pub value_expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TypeAnnotationData {
    pub value_expression: NodeIndex,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct NameData {
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct MemberAccessData {
    pub left_expression: NodeIndex,
    pub member_name: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct CallData {
    pub left_expression: NodeIndex,
    pub arguments: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ArgumentData {
    pub name: NodeIndex,
    pub value_expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct IndexData {
    pub base_expression: NodeIndex,
    pub items: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct SliceData {
    pub start_value: NodeIndex,
    pub end_value: NodeIndex,
    pub step_value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct BinaryOperationData {
    pub left_expression: NodeIndex,
    pub right_expression: NodeIndex,
    pub operator: Operator,
}

#[derive(Clone, Debug)]
pub struct UnaryOperationData {
    pub expression: NodeIndex,
    pub operator: Operator,
}

#[derive(Clone, Debug)]
pub struct TernaryData {
    pub if_expression: NodeIndex,
    pub test_expression: NodeIndex,
    pub else_expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct TupleData {
    pub expressions: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ListData {
    pub entries: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct UnpackData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct LambdaData {
    pub parameters: Vec<NodeIndex>,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ListComprehensionData {
    pub expression: NodeIndex,
    pub comprehensions: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ComprehensionForData {
    pub target_expression: NodeIndex,
    pub iterable_expression: NodeIndex,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct ComprehensionIfData {
    pub test_expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ParameterData {
    pub name: NodeIndex,
    pub category: ParameterCategory,
    pub type_annotation: NodeIndex,
    pub default_value: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub parameters: Vec<NodeIndex>,
    pub decorators: Vec<NodeIndex>,
    pub return_type_annotation: NodeIndex,
    pub suite: NodeIndex,
    pub is_async: bool,
}

#[derive(Clone, Debug)]
pub struct ClassData {
    pub name: NodeIndex,
    pub arguments: Vec<NodeIndex>,
    pub decorators: Vec<NodeIndex>,
    pub suite: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct DecoratorData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportAsData {
    pub module: NodeIndex,
    pub alias: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ImportFromData {
    pub module: NodeIndex,
    pub imports: Vec<NodeIndex>,
    pub is_wildcard: bool,
}

#[derive(Clone, Debug)]
pub struct ImportFromAsData {
    pub name: NodeIndex,
    pub alias: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct ModuleNameData {
    pub leading_dots: usize,
    pub name_parts: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct StringListData {
    pub strings: Vec<NodeIndex>,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug)]
pub struct StringData {
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct FormatStringData {
    pub expressions: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct GlobalData {
    pub names: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct NonlocalData {
    pub names: Vec<NodeIndex>,
}

#[derive(Clone, Debug)]
pub struct ErrorData {
    pub child: NodeIndex,
}

/// The closed set of node kinds.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Module(ModuleData),
    Suite(SuiteData),
    StatementList(StatementListData),
    If(IfData),
    While(WhileData),
    For(ForData),
    With(WithData),
    WithItem(WithItemData),
    Try(TryData),
    Except(ExceptData),
    Assert(AssertData),
    Return(ReturnData),
    Yield(YieldData),
    YieldFrom(YieldFromData),
    Raise(RaiseData),
    Del(DelData),
    Assignment(AssignmentData),
    AugmentedAssignment(AugmentedAssignmentData),
    AssignmentExpression(AssignmentExpressionData),
    TypeAnnotation(TypeAnnotationData),
    Name(NameData),
    MemberAccess(MemberAccessData),
    Call(CallData),
    Argument(ArgumentData),
    Index(IndexData),
    Slice(SliceData),
    BinaryOperation(BinaryOperationData),
    UnaryOperation(UnaryOperationData),
    Ternary(TernaryData),
    Tuple(TupleData),
    List(ListData),
    Unpack(UnpackData),
    Lambda(LambdaData),
    ListComprehension(ListComprehensionData),
    ComprehensionFor(ComprehensionForData),
    ComprehensionIf(ComprehensionIfData),
    Parameter(ParameterData),
    Function(FunctionData),
    Class(ClassData),
    Decorator(DecoratorData),
    ImportAs(ImportAsData),
    ImportFrom(ImportFromData),
    ImportFromAs(ImportFromAsData),
    ModuleName(ModuleNameData),
    StringList(StringListData),
    String(StringData),
    FormatString(FormatStringData),
    Number,
    Constant(ConstantKind),
    Ellipsis,
    Pass,
    Break,
    Continue,
    Global(GlobalData),
    Nonlocal(NonlocalData),
    Error(ErrorData),
}

impl NodeKind {
    /// True for the kinds that introduce their own scope.
    pub const fn introduces_scope(&self) -> bool {
        matches!(
            self,
            NodeKind::Module(_)
                | NodeKind::Class(_)
                | NodeKind::Function(_)
                | NodeKind::Lambda(_)
                | NodeKind::ListComprehension(_)
        )
    }
}

/// One node of the parse tree.
#[derive(Clone, Debug)]
pub struct ParseNode {
    pub kind: NodeKind,
    pub range: TextRange,
    /// Arena index of the parent; `NodeIndex::NONE` for the module root.
    pub parent: NodeIndex,
    /// Set by the binder's flow analysis when no control path reaches this
    /// statement. The walker prunes the whole subtree.
    pub unreachable: bool,
}
