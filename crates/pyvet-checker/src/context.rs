//! Read-only per-file inputs for a check pass.

use pyvet_binder::SymbolId;
use pyvet_common::RuleSeverities;
use rustc_hash::FxHashSet;

/// Everything the host configures for one file's check. The checker treats
/// all of it as read-only; per-run mutable state lives in the checker
/// itself and in the diagnostic sink.
#[derive(Clone, Debug)]
pub struct CheckerContext {
    pub file_path: String,
    /// Declaration-only ("stub") files contain signatures without bodies;
    /// several checks are relaxed or skipped for them.
    pub is_stub_file: bool,
    pub rules: RuleSeverities,
    /// Symbols referenced anywhere in the program, tracked externally by
    /// symbol id. Feeds the unused-symbol pass.
    pub accessed_symbols: FxHashSet<SymbolId>,
}

impl CheckerContext {
    pub fn new(file_path: impl Into<String>) -> CheckerContext {
        CheckerContext {
            file_path: file_path.into(),
            is_stub_file: false,
            rules: RuleSeverities::default(),
            accessed_symbols: FxHashSet::default(),
        }
    }
}
