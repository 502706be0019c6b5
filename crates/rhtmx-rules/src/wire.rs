// File: src/wire.rs
// Purpose: Normalized rule records consumed by the client-side validator

use crate::value::{ParamValue, Parameters};
use serde::Serialize;
use std::fmt;

/// The fixed set of rule kinds understood by the client-side validator.
///
/// The string form is written verbatim into `data-val-<kind>` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Required,
    Email,
    Length,
    MaxLength,
    MinLength,
    Range,
    Min,
    Max,
    Regex,
    CreditCard,
    Custom,
}

impl RuleKind {
    pub const ALL: [RuleKind; 11] = [
        RuleKind::Required,
        RuleKind::Email,
        RuleKind::Length,
        RuleKind::MaxLength,
        RuleKind::MinLength,
        RuleKind::Range,
        RuleKind::Min,
        RuleKind::Max,
        RuleKind::Regex,
        RuleKind::CreditCard,
        RuleKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Email => "email",
            RuleKind::Length => "length",
            RuleKind::MaxLength => "maxlength",
            RuleKind::MinLength => "minlength",
            RuleKind::Range => "range",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Regex => "regex",
            RuleKind::CreditCard => "creditcard",
            RuleKind::Custom => "custom",
        }
    }

    /// Message used when neither the rule nor the constraint carries one.
    /// `{min}`/`{max}` are filled from the rule parameters.
    pub fn default_message(&self) -> &'static str {
        match self {
            RuleKind::Required => "This field is required.",
            RuleKind::Email => "Please enter a valid email address.",
            RuleKind::Length => "Must be between {min} and {max} characters.",
            RuleKind::MaxLength => "Must not exceed {max} characters.",
            RuleKind::MinLength => "Must be at least {min} characters.",
            RuleKind::Range => "Must be between {min} and {max}.",
            RuleKind::Min => "Must be greater than {min}.",
            RuleKind::Max => "Must be less than {max}.",
            RuleKind::Regex => "Invalid format.",
            RuleKind::CreditCard => "Please enter a valid credit card number.",
            RuleKind::Custom => "Invalid value.",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized rule: kind, message and kind-specific parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireRule {
    pub kind: RuleKind,
    pub message: String,
    #[serde(skip_serializing_if = "Parameters::is_empty")]
    pub parameters: Parameters,
}

impl WireRule {
    pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(name, value);
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    /// Attribute name for the rule itself, e.g. `data-val-length`
    pub fn attribute_name(&self) -> String {
        format!("data-val-{}", self.kind.as_str())
    }

    /// Attribute name for one parameter, e.g. `data-val-length-min`
    pub fn parameter_attribute_name(&self, parameter: &str) -> String {
        format!("data-val-{}-{}", self.kind.as_str(), parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_are_lowercase() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.as_str(), kind.as_str().to_lowercase());
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.as_str().to_string())
            );
        }
    }

    #[test]
    fn test_attribute_names() {
        let rule = WireRule::new(RuleKind::Length, "x")
            .with_param("min", 3)
            .with_param("max", 20);
        assert_eq!(rule.attribute_name(), "data-val-length");
        assert_eq!(rule.parameter_attribute_name("min"), "data-val-length-min");
    }

    #[test]
    fn test_serialize_skips_empty_parameters() {
        let rule = WireRule::new(RuleKind::Required, "This field is required.");
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"kind":"required","message":"This field is required."}"#);
    }
}
