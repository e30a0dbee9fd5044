//! Scopes and the binding result handed to the checker.

use crate::declaration::Declaration;
use crate::symbol::{Symbol, SymbolArena, SymbolId};
use indexmap::IndexMap;
use pyvet_ast::NodeIndex;
use rustc_hash::FxHashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Builtin,
    Module,
    Class,
    Function,
    ListComprehension,
}

/// One scope's symbol table. The table is insertion-ordered so that scans
/// over it produce deterministic diagnostic sequences.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub symbols: IndexMap<String, SymbolId>,
}

impl Scope {
    pub fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Scope {
        Scope {
            kind,
            parent,
            symbols: IndexMap::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> ScopeArena {
        ScopeArena::default()
    }

    pub fn alloc(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, parent));
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0 as usize)
    }
}

/// Everything the binding pass produces for one file: the scope tree, the
/// symbol arena, and the scoped-node → scope association.
#[derive(Debug, Default)]
pub struct BindResult {
    pub scopes: ScopeArena,
    pub symbols: SymbolArena,
    scope_map: FxHashMap<NodeIndex, ScopeId>,
}

impl BindResult {
    pub fn new() -> BindResult {
        BindResult::default()
    }

    pub fn add_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        self.scopes.alloc(kind, parent)
    }

    /// Associate a scoped node (module, class, function, lambda,
    /// comprehension) with its scope.
    pub fn attach_scope(&mut self, node: NodeIndex, scope: ScopeId) {
        self.scope_map.insert(node, scope);
    }

    pub fn scope_for_node(&self, node: NodeIndex) -> Option<ScopeId> {
        self.scope_map.get(&node).copied()
    }

    /// Introduce `name` into `scope`, creating the symbol on first sight,
    /// and append a declaration to it.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        flags: u32,
        declaration: Declaration,
    ) -> SymbolId {
        let id = match self.scopes.get(scope).and_then(|s| s.lookup(name)) {
            Some(existing) => existing,
            None => {
                let id = self.symbols.alloc(flags);
                if let Some(scope) = self.scopes.get_mut(scope) {
                    scope.symbols.insert(name.to_string(), id);
                }
                id
            }
        };
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.add_declaration(declaration);
        }
        id
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }
}
