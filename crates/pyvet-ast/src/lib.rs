//! Parse tree model for the pyvet analyzer.
//!
//! The tree is produced by an external parser/binder front end and consumed
//! read-only by the checking pass. Nodes live in a [`ParseTree`] arena and
//! refer to each other through [`NodeIndex`] values; parent links are plain
//! indices, never owning references. Each node carries its source range and
//! the binder-computed reachability flag.

pub mod node;
pub mod tree;
pub mod tree_utils;

pub use node::{
    ConstantKind, NodeIndex, NodeKind, Operator, ParameterCategory, ParseNode,
};
pub use tree::ParseTree;
