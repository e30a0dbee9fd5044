//! Diagnostic emission helpers.
//!
//! Unconditional findings go through `add_error`; rule-gated findings go
//! through `add_diagnostic`, which maps the configured severity to a
//! category and drops the diagnostic entirely when the rule is off.

use crate::checker::Checker;
use pyvet_ast::NodeIndex;
use pyvet_common::{Diagnostic, DiagnosticCategory, Rule, Severity, TextRange};

impl Checker<'_> {
    pub(crate) fn range_of(&self, node: NodeIndex) -> TextRange {
        self.tree.range(node)
    }

    pub(crate) fn add_error(
        &mut self,
        message: impl Into<String>,
        node: NodeIndex,
    ) -> Option<&mut Diagnostic> {
        let range = self.range_of(node);
        Some(self.sink.push(Diagnostic::new(
            DiagnosticCategory::Error,
            None,
            message,
            range,
        )))
    }

    pub(crate) fn add_diagnostic(
        &mut self,
        rule: Rule,
        message: impl Into<String>,
        node: NodeIndex,
    ) -> Option<&mut Diagnostic> {
        let range = self.range_of(node);
        self.add_diagnostic_for_range(rule, message, range)
    }

    pub(crate) fn add_diagnostic_for_range(
        &mut self,
        rule: Rule,
        message: impl Into<String>,
        range: TextRange,
    ) -> Option<&mut Diagnostic> {
        let category = match self.context.rules.severity(rule) {
            Severity::Error => DiagnosticCategory::Error,
            Severity::Warning => DiagnosticCategory::Warning,
            Severity::Information => DiagnosticCategory::Information,
            Severity::None => return None,
        };
        Some(self
            .sink
            .push(Diagnostic::new(category, Some(rule), message, range)))
    }
}
