//! Declarations: the places a symbol's name is introduced.

use pyvet_ast::NodeIndex;
use pyvet_common::TextRange;

/// What kind of thing a declaration introduces. `Parameter` and `Variable`
/// carry the explicit annotation node when the source supplied one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclarationKind {
    Intrinsic,
    Class,
    SpecialBuiltin,
    Function { is_overloaded: bool },
    Method { is_overloaded: bool },
    Parameter { annotation: NodeIndex },
    Variable { annotation: NodeIndex },
    Alias,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// The defining node: the class/function node for classes and
    /// functions, the name node for variables, the parameter node for
    /// parameters, the import node for aliases.
    pub node: NodeIndex,
    pub path: String,
    pub range: TextRange,
}

impl Declaration {
    pub fn new(
        kind: DeclarationKind,
        node: NodeIndex,
        path: impl Into<String>,
        range: TextRange,
    ) -> Declaration {
        Declaration {
            kind,
            node,
            path: path.into(),
            range,
        }
    }

    pub fn is_function_or_method(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::Function { .. } | DeclarationKind::Method { .. }
        )
    }

    pub fn is_overloaded_function(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::Function { is_overloaded: true }
                | DeclarationKind::Method { is_overloaded: true }
        )
    }

    /// Whether this declaration pins down a type for the symbol. Aliases
    /// never do; variables and parameters only when annotated.
    pub fn has_declared_type(&self) -> bool {
        match self.kind {
            DeclarationKind::Intrinsic
            | DeclarationKind::Class
            | DeclarationKind::SpecialBuiltin
            | DeclarationKind::Function { .. }
            | DeclarationKind::Method { .. } => true,
            DeclarationKind::Parameter { annotation } => annotation.is_some(),
            DeclarationKind::Variable { annotation } => annotation.is_some(),
            DeclarationKind::Alias => false,
        }
    }

    /// Two declarations are the same if they introduce the same kind of
    /// thing at the same location.
    pub fn is_same_as(&self, other: &Declaration) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
            && self.path == other.path
            && self.range.start == other.range.start
    }
}
