//! Shared infrastructure for the pyvet analyzer crates.
//!
//! This crate holds the pieces every other crate needs: source text ranges,
//! the diagnostic model (diagnostics, addenda, the per-file sink), and the
//! rule-severity configuration table.

pub mod diagnostics;
pub mod rules;
pub mod text_range;

pub use diagnostics::{
    Diagnostic, DiagnosticAddendum, DiagnosticCategory, DiagnosticRelatedInformation,
    DiagnosticSink, UnusedCodeRange,
};
pub use rules::{Rule, RuleSeverities, Severity};
pub use text_range::TextRange;
