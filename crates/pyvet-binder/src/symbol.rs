//! Symbols and the arena that owns them.

use crate::declaration::Declaration;

/// Stable identifier of a symbol within one file's [`SymbolArena`]. The
/// host's accessed-symbol map is keyed by these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Symbol behavior flags.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    /// The symbol is a member of a class body (method, class variable).
    pub const CLASS_MEMBER: u32 = 1 << 0;
    /// The symbol is an instance member assigned through `self`.
    pub const INSTANCE_MEMBER: u32 = 1 << 1;
    /// Synthesized or protocol-matching symbol, excluded from unused-symbol
    /// reporting.
    pub const IGNORED_FOR_PROTOCOL_MATCH: u32 = 1 << 2;
}

#[derive(Clone, Debug)]
pub struct Symbol {
    id: SymbolId,
    flags: u32,
    declarations: Vec<Declaration>,
}

impl Symbol {
    pub fn new(id: SymbolId, flags: u32) -> Symbol {
        Symbol {
            id,
            flags,
            declarations: Vec::new(),
        }
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    /// Record a declaration unless an equivalent one is already present.
    pub fn add_declaration(&mut self, declaration: Declaration) {
        if !self.declarations.iter().any(|decl| decl.is_same_as(&declaration)) {
            self.declarations.push(declaration);
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_class_member(&self) -> bool {
        self.flags & symbol_flags::CLASS_MEMBER != 0
    }

    pub fn is_ignored_for_protocol_match(&self) -> bool {
        self.flags & symbol_flags::IGNORED_FOR_PROTOCOL_MATCH != 0
    }

    /// The last declaration that pins down a type, the "primary"
    /// declaration the others are validated against.
    pub fn last_typed_declaration(&self) -> Option<&Declaration> {
        self.declarations
            .iter()
            .rev()
            .find(|decl| decl.has_declared_type())
    }
}

#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> SymbolArena {
        SymbolArena::default()
    }

    pub fn alloc(&mut self, flags: u32) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(id, flags));
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }
}
