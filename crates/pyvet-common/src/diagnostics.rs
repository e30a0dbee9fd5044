//! Diagnostic records and the per-file sink they accumulate in.

use crate::rules::Rule;
use crate::text_range::TextRange;

/// Category of an emitted diagnostic. A rule configured as
/// [`crate::Severity::None`] produces no diagnostic at all, so there is no
/// corresponding category here.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    Information,
}

/// A pointer at a secondary location, e.g. the declaration a duplicate
/// definition conflicts with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub message: String,
    pub path: String,
    pub range: TextRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    /// The rule that produced this diagnostic, or `None` for unconditional
    /// errors that have no severity knob.
    pub rule: Option<Rule>,
    pub message: String,
    pub range: TextRange,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn new(
        category: DiagnosticCategory,
        rule: Option<Rule>,
        message: impl Into<String>,
        range: TextRange,
    ) -> Diagnostic {
        Diagnostic {
            category,
            rule,
            message: message.into(),
            range,
            related_information: Vec::new(),
        }
    }

    pub fn add_related_info(
        &mut self,
        message: impl Into<String>,
        path: impl Into<String>,
        range: TextRange,
    ) {
        self.related_information.push(DiagnosticRelatedInformation {
            message: message.into(),
            path: path.into(),
            range,
        });
    }
}

/// Accumulates the explanation lines a validation produces on its way to a
/// verdict. The collected text is appended to the main diagnostic message.
#[derive(Debug, Default)]
pub struct DiagnosticAddendum {
    messages: Vec<String>,
}

impl DiagnosticAddendum {
    pub fn new() -> DiagnosticAddendum {
        DiagnosticAddendum::default()
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render the addendum for appending to a diagnostic message. Empty
    /// addenda render as the empty string so callers can append blindly.
    pub fn text(&self) -> String {
        if self.messages.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        for message in &self.messages {
            out.push_str("\n  ");
            out.push_str(message);
        }
        out
    }
}

/// A span of source that is not used by anything, reported alongside the
/// regular diagnostics so editors can dim it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnusedCodeRange {
    pub message: String,
    pub range: TextRange,
}

/// Per-file accumulator for everything the checking pass emits.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    pub diagnostics: Vec<Diagnostic>,
    pub unused_code_ranges: Vec<UnusedCodeRange>,
}

impl DiagnosticSink {
    pub fn new() -> DiagnosticSink {
        DiagnosticSink::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) -> &mut Diagnostic {
        self.diagnostics.push(diagnostic);
        self.diagnostics.last_mut().unwrap()
    }

    pub fn add_unused_code(&mut self, message: impl Into<String>, range: TextRange) {
        self.unused_code_ranges.push(UnusedCodeRange {
            message: message.into(),
            range,
        });
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.category == DiagnosticCategory::Error)
    }
}
