// File: src/error.rs
// Purpose: Error types for rule extraction (all non-fatal at the render boundary)

use thiserror::Error;

/// Failure while reading a property off a constraint adapter
/// (message text, bounds, pattern, ...).
///
/// Callers swallow these and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("constraint property '{0}' is not available")]
    Missing(&'static str),

    #[error("constraint property '{property}' could not be read: {reason}")]
    Unreadable {
        property: &'static str,
        reason: String,
    },
}

/// Errors raised while describing or resolving validators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("validator for '{model}' failed to describe its rules: {reason}")]
    DescribeFailed { model: &'static str, reason: String },

    #[error("validator for '{model}' is bound to '{bound}'")]
    ModelMismatch {
        model: &'static str,
        bound: &'static str,
    },
}

impl RulesError {
    /// Shorthand for a description failure
    pub fn describe_failed(model: &'static str, reason: impl Into<String>) -> Self {
        RulesError::DescribeFailed {
            model,
            reason: reason.into(),
        }
    }
}
