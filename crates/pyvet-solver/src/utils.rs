//! Structural operations over [`Type`] values.

use crate::types::{ClassFlags, ClassType, FunctionType, Type};
use pyvet_binder::SymbolId;
use std::sync::Arc;

pub fn is_any_or_unknown(ty: &Type) -> bool {
    match ty {
        Type::Any | Type::Unknown => true,
        Type::Union(members) => !members.is_empty() && members.iter().all(is_any_or_unknown),
        _ => false,
    }
}

pub fn is_none_or_never(ty: &Type) -> bool {
    matches!(ty, Type::None | Type::Never)
}

/// Whether any part of the type is Unknown. Partially-unknown types get
/// their own diagnostics in several rules.
pub fn contains_unknown(ty: &Type) -> bool {
    match ty {
        Type::Unknown => true,
        Type::Union(members) => members.iter().any(contains_unknown),
        Type::Class(class) | Type::Object(class) => class
            .type_arguments
            .as_ref()
            .is_some_and(|args| args.iter().any(contains_unknown)),
        Type::Function(function) => {
            function.parameters.iter().any(|param| contains_unknown(&param.ty))
                || function
                    .declared_return_type
                    .as_ref()
                    .is_some_and(contains_unknown)
        }
        _ => false,
    }
}

/// Structural equality.
pub fn is_type_same(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Unbound, Type::Unbound)
        | (Type::Unknown, Type::Unknown)
        | (Type::Any, Type::Any)
        | (Type::None, Type::None)
        | (Type::Never, Type::Never)
        | (Type::Module, Type::Module) => true,
        (Type::Class(a), Type::Class(b)) | (Type::Object(a), Type::Object(b)) => {
            class_types_same(a, b)
        }
        (Type::Function(a), Type::Function(b)) => function_types_same(a, b),
        (Type::Union(a), Type::Union(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| is_type_same(x, y))
        }
        (Type::TypeVar(a), Type::TypeVar(b)) => a.name == b.name,
        _ => false,
    }
}

fn class_types_same(a: &ClassType, b: &ClassType) -> bool {
    if !a.is_same_class(b) || a.flags != b.flags {
        return false;
    }
    match (&a.type_arguments, &b.type_arguments) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| is_type_same(x, y))
        }
        _ => false,
    }
}

fn function_types_same(a: &FunctionType, b: &FunctionType) -> bool {
    a.name == b.name
        && a.flags == b.flags
        && a.parameters.len() == b.parameters.len()
        && a.parameters.iter().zip(b.parameters.iter()).all(|(x, y)| {
            x.name == y.name && x.category == y.category && is_type_same(&x.ty, &y.ty)
        })
        && match (&a.declared_return_type, &b.declared_return_type) {
            (None, None) => true,
            (Some(x), Some(y)) => is_type_same(x, y),
            _ => false,
        }
}

/// Flatten and dedup a list of types into a single type. An empty result
/// collapses to `Never`.
pub fn combine_types(types: Vec<Type>) -> Type {
    let mut members: Vec<Type> = Vec::new();
    let mut add = |ty: Type, members: &mut Vec<Type>| {
        if !matches!(ty, Type::Never) && !members.iter().any(|m| is_type_same(m, &ty)) {
            members.push(ty);
        }
    };
    for ty in types {
        match ty {
            Type::Union(nested) => {
                for member in nested.iter() {
                    add(member.clone(), &mut members);
                }
            }
            other => add(other, &mut members),
        }
    }
    match members.len() {
        0 => Type::Never,
        1 => members.pop().unwrap(),
        _ => Type::union(members),
    }
}

/// Apply `f` to each union member, or to the type itself when it is not a
/// union.
pub fn for_each_subtype(ty: &Type, mut f: impl FnMut(&Type)) {
    match ty {
        Type::Union(members) => members.iter().for_each(|member| f(member)),
        other => f(other),
    }
}

/// Rebuild a type member-wise through `f`.
pub fn map_subtypes(ty: &Type, mut f: impl FnMut(&Type) -> Type) -> Type {
    match ty {
        Type::Union(members) => combine_types(members.iter().map(|member| f(member)).collect()),
        other => f(other),
    }
}

/// Whether `class` is `base` or transitively derives from it.
pub fn derives_from_class_recursive(class: &ClassType, base: &ClassType) -> bool {
    if class.is_same_class(base) {
        return true;
    }
    class.base_classes.iter().any(|candidate| match candidate {
        Type::Class(candidate) => derives_from_class_recursive(candidate, base),
        _ => false,
    })
}

/// Convert a `Type[X]` object into the class `X`. Other types pass through
/// unchanged.
pub fn transform_type_object_to_class(ty: &Type) -> Type {
    if let Type::Object(class) = ty
        && class.is_built_in("Type")
        && let Some(args) = &class.type_arguments
        && args.len() == 1
        && let Type::Object(inner) = &args[0]
    {
        return Type::Class(inner.clone());
    }
    ty.clone()
}

/// Replace free type variables with their bound or constraint types so the
/// result can be compared against concrete types.
pub fn specialize_type(ty: &Type) -> Type {
    match ty {
        Type::TypeVar(type_var) => {
            if let Some(bound) = &type_var.bound {
                specialize_type(bound)
            } else if !type_var.constraints.is_empty() {
                combine_types(type_var.constraints.iter().map(specialize_type).collect())
            } else {
                Type::Unknown
            }
        }
        Type::Union(members) => {
            combine_types(members.iter().map(specialize_type).collect())
        }
        Type::Class(class) => Type::Class(specialize_class(class)),
        Type::Object(class) => Type::Object(specialize_class(class)),
        other => other.clone(),
    }
}

fn specialize_class(class: &Arc<ClassType>) -> Arc<ClassType> {
    match &class.type_arguments {
        Some(args) => Arc::new(
            class.clone_for_specialization(args.iter().map(specialize_type).collect()),
        ),
        None => class.clone(),
    }
}

/// Whether the type is the bottom "never returns" declaration.
pub fn is_no_return_type(ty: &Type) -> bool {
    match ty {
        Type::Object(class) | Type::Class(class) => class.is_built_in("NoReturn"),
        _ => false,
    }
}

/// Whether the type is an instance of a property class.
pub fn is_property(ty: &Type) -> bool {
    matches!(ty, Type::Object(class) if class.is_property_class())
}

/// The `[yield, send, return]` arguments of a declared generator/iterator
/// return annotation.
fn generator_type_args(ty: &Type) -> Option<&[Type]> {
    if let Type::Object(class) = ty
        && class.flags.contains(ClassFlags::BUILT_IN)
        && matches!(
            class.name.as_str(),
            "Generator" | "AsyncGenerator" | "Iterator" | "Iterable"
        )
        && let Some(args) = &class.type_arguments
    {
        return Some(args);
    }
    None
}

/// The completion type of a generator, from its declared return
/// annotation.
pub fn get_declared_generator_return_type(function: &FunctionType) -> Option<Type> {
    let declared = function.declared_return_type.as_ref()?;
    if let Some(args) = generator_type_args(declared) {
        return Some(if args.len() >= 3 {
            args[2].clone()
        } else {
            Type::Unknown
        });
    }
    if is_no_return_type(declared) {
        return Some(declared.clone());
    }
    None
}

/// The per-iteration type of a generator, wrapped in the `Iterator` shape
/// so it compares directly against the type of a `yield`.
pub fn get_declared_generator_yield_type(
    function: &FunctionType,
    iterator_type: &Type,
) -> Option<Type> {
    let declared = function.declared_return_type.as_ref()?;
    if let Some(args) = generator_type_args(declared) {
        if let (Some(yield_type), Type::Class(iterator)) = (args.first(), iterator_type) {
            return Some(Type::Object(Arc::new(
                iterator.clone_for_specialization(vec![yield_type.clone()]),
            )));
        }
        return Some(Type::Unknown);
    }
    if is_no_return_type(declared) {
        return Some(declared.clone());
    }
    None
}

/// Look `name` up in the base classes of `class`, nearest base first.
pub fn get_symbol_from_base_classes(
    class: &ClassType,
    name: &str,
) -> Option<(Arc<ClassType>, SymbolId)> {
    for base in &class.base_classes {
        if let Type::Class(base_class) = base {
            if let Some(&symbol) = base_class.fields.get(name) {
                return Some((base_class.clone(), symbol));
            }
            if let Some(found) = get_symbol_from_base_classes(base_class, name) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str) -> ClassType {
        ClassType::new(name, ClassFlags::empty())
    }

    fn builtin(name: &str) -> ClassType {
        ClassType::new(name, ClassFlags::BUILT_IN)
    }

    #[test]
    fn combine_collapses_duplicates_and_never() {
        let int_type = Type::object(builtin("int"));
        let combined = combine_types(vec![int_type.clone(), Type::Never, int_type.clone()]);
        assert!(is_type_same(&combined, &int_type));

        assert!(matches!(combine_types(vec![]), Type::Never));

        let str_type = Type::object(builtin("str"));
        let union = combine_types(vec![int_type.clone(), str_type.clone()]);
        match &union {
            Type::Union(members) => assert_eq!(members.len(), 2),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn derivation_is_transitive_and_reflexive() {
        let base = class("Base");
        let mut middle = class("Middle");
        middle.base_classes.push(Type::class(base.clone()));
        let mut leaf = class("Leaf");
        leaf.base_classes.push(Type::class(middle.clone()));

        assert!(derives_from_class_recursive(&leaf, &leaf));
        assert!(derives_from_class_recursive(&leaf, &middle));
        assert!(derives_from_class_recursive(&leaf, &base));
        assert!(!derives_from_class_recursive(&base, &leaf));
    }

    #[test]
    fn type_object_unwraps_to_class() {
        let inner = Arc::new(class("Widget"));
        let type_class = ClassType::new("Type", ClassFlags::SPECIAL_BUILT_IN)
            .clone_for_specialization(vec![Type::Object(inner.clone())]);
        let transformed = transform_type_object_to_class(&Type::object(type_class));
        match transformed {
            Type::Class(result) => assert_eq!(result.name, "Widget"),
            other => panic!("expected class, got {other:?}"),
        }

        let untouched = transform_type_object_to_class(&Type::None);
        assert!(is_type_same(&untouched, &Type::None));
    }

    #[test]
    fn specialize_replaces_type_vars_with_bounds() {
        let bound = Type::object(builtin("int"));
        let type_var = Type::TypeVar(Arc::new(crate::types::TypeVarType {
            name: "_T".to_string(),
            bound: Some(bound.clone()),
            constraints: Vec::new(),
        }));
        assert!(is_type_same(&specialize_type(&type_var), &bound));

        let free = Type::TypeVar(Arc::new(crate::types::TypeVarType {
            name: "_U".to_string(),
            bound: None,
            constraints: Vec::new(),
        }));
        assert!(matches!(specialize_type(&free), Type::Unknown));
    }

    #[test]
    fn generator_yield_type_wraps_in_iterator() {
        let generator = builtin("Generator").clone_for_specialization(vec![
            Type::object(builtin("int")),
            Type::None,
            Type::None,
        ]);
        let mut function = FunctionType::new("gen", crate::types::FunctionFlags::GENERATOR);
        function.declared_return_type = Some(Type::Object(Arc::new(generator)));

        let iterator = Type::class(builtin("Iterator"));
        let yield_type = get_declared_generator_yield_type(&function, &iterator).unwrap();
        match yield_type {
            Type::Object(class) => {
                assert_eq!(class.name, "Iterator");
                let args = class.type_arguments.as_ref().unwrap();
                assert!(is_type_same(&args[0], &Type::object(builtin("int"))));
            }
            other => panic!("expected iterator object, got {other:?}"),
        }

        let return_type = get_declared_generator_return_type(&function).unwrap();
        assert!(is_type_same(&return_type, &Type::None));
    }
}
