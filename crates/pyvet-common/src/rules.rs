//! Named validation rules and their per-file severity configuration.
//!
//! Each rule is independently configurable by the host. A rule set to
//! [`Severity::None`] must be skipped before any expensive work happens;
//! diagnostics with that severity never reach the sink.

use serde::{Deserialize, Serialize};

/// The severity a host assigns to a rule.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
    #[default]
    None,
}

impl Severity {
    pub const fn is_none(self) -> bool {
        matches!(self, Severity::None)
    }
}

/// Independently configurable validation rules.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    UnknownParameterType,
    UnknownLambdaType,
    CallInDefaultInitializer,
    AssertAlwaysTrue,
    UnusedImport,
    UnusedVariable,
    UnusedClass,
    UnusedFunction,
    UnnecessaryIsInstance,
    PrivateUsage,
    IncompatibleMethodOverride,
}

impl Rule {
    pub const fn as_str(self) -> &'static str {
        match self {
            Rule::UnknownParameterType => "unknownParameterType",
            Rule::UnknownLambdaType => "unknownLambdaType",
            Rule::CallInDefaultInitializer => "callInDefaultInitializer",
            Rule::AssertAlwaysTrue => "assertAlwaysTrue",
            Rule::UnusedImport => "unusedImport",
            Rule::UnusedVariable => "unusedVariable",
            Rule::UnusedClass => "unusedClass",
            Rule::UnusedFunction => "unusedFunction",
            Rule::UnnecessaryIsInstance => "unnecessaryIsInstance",
            Rule::PrivateUsage => "privateUsage",
            Rule::IncompatibleMethodOverride => "incompatibleMethodOverride",
        }
    }
}

/// Per-rule severity table, threaded read-only into every rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSeverities {
    pub unknown_parameter_type: Severity,
    pub unknown_lambda_type: Severity,
    pub call_in_default_initializer: Severity,
    pub assert_always_true: Severity,
    pub unused_import: Severity,
    pub unused_variable: Severity,
    pub unused_class: Severity,
    pub unused_function: Severity,
    pub unnecessary_is_instance: Severity,
    pub private_usage: Severity,
    pub incompatible_method_override: Severity,
}

impl Default for RuleSeverities {
    fn default() -> RuleSeverities {
        RuleSeverities {
            unknown_parameter_type: Severity::None,
            unknown_lambda_type: Severity::None,
            call_in_default_initializer: Severity::None,
            assert_always_true: Severity::Warning,
            unused_import: Severity::Warning,
            unused_variable: Severity::Warning,
            unused_class: Severity::Warning,
            unused_function: Severity::Warning,
            unnecessary_is_instance: Severity::None,
            private_usage: Severity::Error,
            incompatible_method_override: Severity::Error,
        }
    }
}

impl RuleSeverities {
    pub fn severity(&self, rule: Rule) -> Severity {
        match rule {
            Rule::UnknownParameterType => self.unknown_parameter_type,
            Rule::UnknownLambdaType => self.unknown_lambda_type,
            Rule::CallInDefaultInitializer => self.call_in_default_initializer,
            Rule::AssertAlwaysTrue => self.assert_always_true,
            Rule::UnusedImport => self.unused_import,
            Rule::UnusedVariable => self.unused_variable,
            Rule::UnusedClass => self.unused_class,
            Rule::UnusedFunction => self.unused_function,
            Rule::UnnecessaryIsInstance => self.unnecessary_is_instance,
            Rule::PrivateUsage => self.private_usage,
            Rule::IncompatibleMethodOverride => self.incompatible_method_override,
        }
    }

    /// Table with every rule turned on as an error, for tests and strict hosts.
    pub fn all_errors() -> RuleSeverities {
        RuleSeverities {
            unknown_parameter_type: Severity::Error,
            unknown_lambda_type: Severity::Error,
            call_in_default_initializer: Severity::Error,
            assert_always_true: Severity::Error,
            unused_import: Severity::Error,
            unused_variable: Severity::Error,
            unused_class: Severity::Error,
            unused_function: Severity::Error,
            unnecessary_is_instance: Severity::Error,
            private_usage: Severity::Error,
            incompatible_method_override: Severity::Error,
        }
    }
}
