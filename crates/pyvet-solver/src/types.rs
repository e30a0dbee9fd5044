//! The closed type union.

use bitflags::bitflags;
use indexmap::IndexMap;
use pyvet_ast::ParameterCategory;
use pyvet_binder::SymbolId;
use std::sync::Arc;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ClassFlags: u32 {
        /// Declared in the builtins scope.
        const BUILT_IN = 1 << 0;
        /// One of the specially-handled builtin forms (Type, Tuple, ...).
        const SPECIAL_BUILT_IN = 1 << 1;
        /// Derived from TypedDict; its suite may contain only annotations.
        const TYPED_DICT = 1 << 2;
        /// The class implements the property protocol.
        const PROPERTY = 1 << 3;
        /// Marked final; cannot be subclassed.
        const FINAL = 1 << 4;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct FunctionFlags: u32 {
        const STATIC_METHOD = 1 << 0;
        const CLASS_METHOD = 1 << 1;
        const ABSTRACT_METHOD = 1 << 2;
        /// Marked final; cannot be overridden.
        const FINAL = 1 << 3;
        /// The body contains a yield; the function is a generator.
        const GENERATOR = 1 << 4;
        /// One of several same-named signatures.
        const OVERLOADED = 1 << 5;
        const ASYNC = 1 << 6;
    }
}

/// A class declaration's type. Also the payload of `Type::Object`, which
/// denotes an instance of the class.
#[derive(Clone, Debug)]
pub struct ClassType {
    /// Fully-qualified name; class identity is nominal on this.
    pub name: String,
    pub flags: ClassFlags,
    /// Base classes in MRO-relevant order; `Type::Class` entries.
    pub base_classes: Vec<Type>,
    /// Specialization arguments, when the generic form has been applied.
    pub type_arguments: Option<Vec<Type>>,
    /// Members declared in the class body, keyed by name in declaration
    /// order.
    pub fields: IndexMap<String, SymbolId>,
}

impl ClassType {
    pub fn new(name: impl Into<String>, flags: ClassFlags) -> ClassType {
        ClassType {
            name: name.into(),
            flags,
            base_classes: Vec::new(),
            type_arguments: None,
            fields: IndexMap::new(),
        }
    }

    pub fn is_built_in(&self, name: &str) -> bool {
        self.flags
            .intersects(ClassFlags::BUILT_IN | ClassFlags::SPECIAL_BUILT_IN)
            && self.name == name
    }

    pub fn is_typed_dict(&self) -> bool {
        self.flags.contains(ClassFlags::TYPED_DICT)
    }

    pub fn is_property_class(&self) -> bool {
        self.flags.contains(ClassFlags::PROPERTY)
    }

    /// Nominal identity, ignoring specialization.
    pub fn is_same_class(&self, other: &ClassType) -> bool {
        self.name == other.name
    }

    /// A copy of this class specialized with the given type arguments.
    pub fn clone_for_specialization(&self, type_arguments: Vec<Type>) -> ClassType {
        let mut specialized = self.clone();
        specialized.type_arguments = Some(type_arguments);
        specialized
    }
}

#[derive(Clone, Debug)]
pub struct FunctionParameter {
    pub name: Option<String>,
    pub category: ParameterCategory,
    pub ty: Type,
}

#[derive(Clone, Debug)]
pub struct FunctionType {
    pub name: String,
    pub flags: FunctionFlags,
    pub parameters: Vec<FunctionParameter>,
    pub declared_return_type: Option<Type>,
}

impl FunctionType {
    pub fn new(name: impl Into<String>, flags: FunctionFlags) -> FunctionType {
        FunctionType {
            name: name.into(),
            flags,
            parameters: Vec::new(),
            declared_return_type: None,
        }
    }

    pub fn is_static_method(&self) -> bool {
        self.flags.contains(FunctionFlags::STATIC_METHOD)
    }

    pub fn is_class_method(&self) -> bool {
        self.flags.contains(FunctionFlags::CLASS_METHOD)
    }

    pub fn is_abstract_method(&self) -> bool {
        self.flags.contains(FunctionFlags::ABSTRACT_METHOD)
    }

    pub fn is_final(&self) -> bool {
        self.flags.contains(FunctionFlags::FINAL)
    }

    pub fn is_generator(&self) -> bool {
        self.flags.contains(FunctionFlags::GENERATOR)
    }
}

/// A type variable with its bound or value constraints.
#[derive(Clone, Debug)]
pub struct TypeVarType {
    pub name: String,
    pub bound: Option<Type>,
    pub constraints: Vec<Type>,
}

/// The closed union of types the checker can observe. Composite payloads
/// are shared; `Type` values are cheap to clone and structurally compared
/// through [`crate::utils::is_type_same`].
#[derive(Clone, Debug)]
pub enum Type {
    /// Referenced before any assignment was seen.
    Unbound,
    /// The evaluator could not determine a type.
    Unknown,
    Any,
    None,
    Never,
    Class(Arc<ClassType>),
    /// An instance of the class.
    Object(Arc<ClassType>),
    Function(Arc<FunctionType>),
    Union(Arc<[Type]>),
    Module,
    TypeVar(Arc<TypeVarType>),
}

impl Type {
    pub fn class(class: ClassType) -> Type {
        Type::Class(Arc::new(class))
    }

    pub fn object(class: ClassType) -> Type {
        Type::Object(Arc::new(class))
    }

    pub fn function(function: FunctionType) -> Type {
        Type::Function(Arc::new(function))
    }

    pub fn union(members: Vec<Type>) -> Type {
        Type::Union(members.into())
    }

    /// The class payload of a `Class` or `Object` type.
    pub fn as_class(&self) -> Option<&Arc<ClassType>> {
        match self {
            Type::Class(class) | Type::Object(class) => Some(class),
            _ => None,
        }
    }
}
