//! Type model and evaluation contract for the pyvet analyzer.
//!
//! Types are immutable values; composite types share their payload through
//! `Arc`, so cloning is cheap everywhere. The evaluation engine itself —
//! inference, narrowing arithmetic, overload resolution — lives behind the
//! [`TypeEvaluator`] trait and is supplied by the host. This crate holds
//! what the checker needs to *inspect* types: the closed `Type` union,
//! classification predicates, and a handful of structural utilities.

pub mod evaluator;
pub mod types;
pub mod utils;

pub use evaluator::{ClassTypeResult, FunctionTypeResult, TypeEvaluator};
pub use types::{
    ClassFlags, ClassType, FunctionFlags, FunctionParameter, FunctionType, Type, TypeVarType,
};
