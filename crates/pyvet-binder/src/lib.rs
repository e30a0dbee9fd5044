//! Scope, symbol, and declaration model for the pyvet analyzer.
//!
//! The binding pass runs between parsing and checking. This crate holds the
//! data it produces: per-scope symbol tables, symbols with their ordered
//! declaration lists, and the name-shape helpers the access-control rules
//! are built on. The checker consumes all of it read-only.

pub mod declaration;
pub mod scope;
pub mod symbol;
pub mod symbol_names;

pub use declaration::{Declaration, DeclarationKind};
pub use scope::{BindResult, Scope, ScopeArena, ScopeId, ScopeKind};
pub use symbol::{Symbol, SymbolArena, SymbolId, symbol_flags};
