//! The contract the checker requires of the type-evaluation engine.
//!
//! The evaluator memoizes per-node types keyed by node identity; every
//! query is idempotent and safe to repeat. The checker is the engine's
//! only per-node caller during a check pass, and it relies on the side
//! effect that each query populates the cache for downstream consumers.

use crate::types::{ClassType, FunctionType, Type};
use pyvet_ast::NodeIndex;
use pyvet_binder::{Declaration, SymbolId};
use pyvet_common::DiagnosticAddendum;
use std::sync::Arc;

/// The class type of a class node, before and after decorators are
/// applied.
#[derive(Clone, Debug)]
pub struct ClassTypeResult {
    pub class_type: Arc<ClassType>,
    pub decorated_type: Type,
}

/// The function type of a function node, before and after decorators are
/// applied.
#[derive(Clone, Debug)]
pub struct FunctionTypeResult {
    pub function_type: Arc<FunctionType>,
    pub decorated_type: Type,
}

pub trait TypeEvaluator {
    /// Compute (and cache) the type of an expression node.
    fn get_type(&self, node: NodeIndex) -> Option<Type>;

    /// Evaluate and cache the types a statement assigns, without returning
    /// a result.
    fn evaluate_types_for_statement(&self, node: NodeIndex);

    fn get_type_of_class(&self, node: NodeIndex) -> Option<ClassTypeResult>;

    fn get_type_of_function(&self, node: NodeIndex) -> Option<FunctionTypeResult>;

    /// The declared return type of the function node, if annotated.
    fn get_function_declared_return_type(&self, node: NodeIndex) -> Option<Type>;

    /// The return type inferred from the function's body.
    fn get_function_inferred_return_type(&self, function: &FunctionType) -> Type;

    /// The type of a symbol as seen by member lookups.
    fn get_effective_type_of_symbol(&self, symbol: SymbolId) -> Type;

    /// Whether `src` is assignable to `dest`. Explanations for a negative
    /// answer accumulate in `addendum`.
    fn can_assign_type(&self, dest: &Type, src: &Type, addendum: &mut DiagnosticAddendum) -> bool;

    /// Whether `derived` can override `base` in a subclass.
    fn can_override_method(
        &self,
        base: &Type,
        derived: &Type,
        addendum: &mut DiagnosticAddendum,
    ) -> bool;

    /// Look up a builtin type visible from `node`'s scope.
    fn get_builtin_type(&self, node: NodeIndex, name: &str) -> Option<Type>;

    /// The declarations a name node resolves to, nearest last.
    fn get_declarations_for_name_node(&self, node: NodeIndex) -> Option<Vec<Declaration>>;

    /// Follow one alias-resolution step to the declaration an import alias
    /// points at.
    fn resolve_alias_declaration(&self, declaration: &Declaration) -> Option<Declaration>;

    /// Whether control flow can reach the node.
    fn is_node_reachable(&self, node: NodeIndex) -> bool;

    /// Whether control flow can move past the node.
    fn is_after_node_reachable(&self, node: NodeIndex) -> bool;

    /// The declared type a declaration pins down, if any.
    fn get_type_for_declaration(&self, declaration: &Declaration) -> Option<Type>;

    /// Validate a `del` target, caching types along the way.
    fn verify_delete_expression(&self, node: NodeIndex);

    /// The element type obtained by iterating `ty`.
    fn get_type_from_iterable(&self, ty: &Type, node: NodeIndex) -> Type;

    /// Render a type for use in a diagnostic message.
    fn print_type(&self, ty: &Type) -> String;
}
