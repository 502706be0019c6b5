// File: src/constraint.rs
// Purpose: Adapter interface over validation constraints, plus the built-in constraint set

use crate::error::ProbeError;
use crate::value::ParamValue;
use std::fmt::Debug;

/// Message attached to one rule instance
#[derive(Debug, Clone, PartialEq)]
pub enum MessageSource {
    /// Pre-formatted text, usable outside a validation pass. Emitted verbatim.
    Literal(String),
    /// Computed from the instance being validated; cannot be rendered ahead of time
    Deferred,
}

/// Comparison operator of a comparison constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

/// A comparison against a fixed value, or against another member of the
/// model when `value` is `None`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: CompareOp,
    pub value: Option<ParamValue>,
    pub member: Option<String>,
}

/// Capability probes over a single declared constraint.
///
/// Every probe defaults to "not this kind". A binding for an external
/// validation library implements the probes matching each of its
/// constraint types; the classifier asks them in a fixed priority order.
pub trait Constraint: Debug + Send + Sync {
    /// Implementation name of the constraint (e.g. `NotEmptyValidator`)
    fn name(&self) -> &str;

    /// Additional capability names the constraint implements
    fn markers(&self) -> &[&'static str] {
        &[]
    }

    /// Not-null or not-empty check
    fn is_required(&self) -> bool {
        false
    }

    fn is_email(&self) -> bool {
        false
    }

    /// Upper length bound of a maximum-length-only check
    fn max_length_only(&self) -> Result<Option<usize>, ProbeError> {
        Ok(None)
    }

    /// Lower length bound of a minimum-length-only check
    fn min_length_only(&self) -> Result<Option<usize>, ProbeError> {
        Ok(None)
    }

    /// Bounds of an exact or ranged length check
    fn length_range(&self) -> Result<Option<(usize, usize)>, ProbeError> {
        Ok(None)
    }

    /// Bounds of an inclusive or exclusive numeric range check
    fn range(&self) -> Result<Option<(ParamValue, ParamValue)>, ProbeError> {
        Ok(None)
    }

    fn comparison(&self) -> Result<Option<Comparison>, ProbeError> {
        Ok(None)
    }

    /// Regular expression of a pattern check
    fn pattern(&self) -> Result<Option<String>, ProbeError> {
        Ok(None)
    }

    fn is_credit_card(&self) -> bool {
        false
    }

    /// Check that only runs on the server. Never treated as custom,
    /// whatever its name.
    fn is_server_only(&self) -> bool {
        false
    }

    /// Message attached to this specific rule instance
    fn message(&self) -> Result<Option<MessageSource>, ProbeError> {
        Ok(None)
    }

    /// Message the constraint implementation falls back to
    fn default_message(&self) -> Result<Option<String>, ProbeError> {
        Ok(None)
    }
}

/// Built-in constraint kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    NotNull,
    NotEmpty,
    Email,
    Length { min: usize, max: usize },
    ExactLength(usize),
    MinimumLength(usize),
    MaximumLength(usize),
    InclusiveBetween(ParamValue, ParamValue),
    ExclusiveBetween(ParamValue, ParamValue),
    GreaterThan(ParamValue),
    GreaterThanOrEqual(ParamValue),
    LessThan(ParamValue),
    LessThanOrEqual(ParamValue),
    Equal(ParamValue),
    NotEqual(ParamValue),
    /// Comparison against another member of the model
    CompareMember { op: CompareOp, member: String },
    Matches(String),
    CreditCard,
    /// Named user-supplied check
    Custom(String),
    /// Inline closure-style check
    Predicate,
    /// Server-only check without a client-side equivalent
    Opaque(String),
}

impl Check {
    fn implementation_name(&self) -> &str {
        match self {
            Check::NotNull => "NotNullValidator",
            Check::NotEmpty => "NotEmptyValidator",
            Check::Email => "EmailValidator",
            Check::Length { .. } => "LengthValidator",
            Check::ExactLength(_) => "ExactLengthValidator",
            Check::MinimumLength(_) => "MinimumLengthValidator",
            Check::MaximumLength(_) => "MaximumLengthValidator",
            Check::InclusiveBetween(..) => "InclusiveBetweenValidator",
            Check::ExclusiveBetween(..) => "ExclusiveBetweenValidator",
            Check::GreaterThan(_) => "GreaterThanValidator",
            Check::GreaterThanOrEqual(_) => "GreaterThanOrEqualValidator",
            Check::LessThan(_) => "LessThanValidator",
            Check::LessThanOrEqual(_) => "LessThanOrEqualValidator",
            Check::Equal(_) => "EqualValidator",
            Check::NotEqual(_) => "NotEqualValidator",
            Check::CompareMember { .. } => "MemberComparisonValidator",
            Check::Matches(_) => "RegularExpressionValidator",
            Check::CreditCard => "CreditCardValidator",
            Check::Custom(name) => name.as_str(),
            Check::Predicate => "PredicateValidator",
            Check::Opaque(name) => name.as_str(),
        }
    }

    fn fallback_message(&self) -> Option<&'static str> {
        match self {
            Check::NotNull | Check::NotEmpty => Some("This field is required."),
            Check::ExactLength(_) => Some("Must be exactly {min} characters."),
            Check::ExclusiveBetween(..) => Some("Must be between {min} and {max} (exclusive)."),
            Check::GreaterThanOrEqual(_) => Some("Must be at least {min}."),
            Check::LessThanOrEqual(_) => Some("Must be at most {max}."),
            _ => None,
        }
    }
}

/// A built-in check together with its optional per-rule message
#[derive(Debug, Clone, PartialEq)]
pub struct CheckRule {
    pub check: Check,
    pub message: Option<MessageSource>,
}

impl CheckRule {
    pub fn new(check: Check) -> Self {
        Self {
            check,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(MessageSource::Literal(message.into()));
        self
    }

    pub fn with_deferred_message(mut self) -> Self {
        self.message = Some(MessageSource::Deferred);
        self
    }
}

impl From<Check> for CheckRule {
    fn from(check: Check) -> Self {
        CheckRule::new(check)
    }
}

impl Constraint for CheckRule {
    fn name(&self) -> &str {
        self.check.implementation_name()
    }

    fn markers(&self) -> &[&'static str] {
        match self.check {
            Check::Custom(_) => &["CustomValidator"],
            Check::Predicate => &["PredicateValidator"],
            _ => &[],
        }
    }

    fn is_required(&self) -> bool {
        matches!(self.check, Check::NotNull | Check::NotEmpty)
    }

    fn is_email(&self) -> bool {
        matches!(self.check, Check::Email)
    }

    fn max_length_only(&self) -> Result<Option<usize>, ProbeError> {
        Ok(match self.check {
            Check::MaximumLength(max) => Some(max),
            _ => None,
        })
    }

    fn min_length_only(&self) -> Result<Option<usize>, ProbeError> {
        Ok(match self.check {
            Check::MinimumLength(min) => Some(min),
            _ => None,
        })
    }

    // Minimum/maximum length checks are length checks with one open bound
    fn length_range(&self) -> Result<Option<(usize, usize)>, ProbeError> {
        Ok(match self.check {
            Check::Length { min, max } => Some((min, max)),
            Check::ExactLength(len) => Some((len, len)),
            Check::MinimumLength(min) => Some((min, usize::MAX)),
            Check::MaximumLength(max) => Some((0, max)),
            _ => None,
        })
    }

    fn range(&self) -> Result<Option<(ParamValue, ParamValue)>, ProbeError> {
        Ok(match &self.check {
            Check::InclusiveBetween(from, to) | Check::ExclusiveBetween(from, to) => {
                Some((from.clone(), to.clone()))
            }
            _ => None,
        })
    }

    fn comparison(&self) -> Result<Option<Comparison>, ProbeError> {
        let (op, value) = match &self.check {
            Check::GreaterThan(v) => (CompareOp::GreaterThan, v),
            Check::GreaterThanOrEqual(v) => (CompareOp::GreaterThanOrEqual, v),
            Check::LessThan(v) => (CompareOp::LessThan, v),
            Check::LessThanOrEqual(v) => (CompareOp::LessThanOrEqual, v),
            Check::Equal(v) => (CompareOp::Equal, v),
            Check::NotEqual(v) => (CompareOp::NotEqual, v),
            Check::CompareMember { op, member } => {
                return Ok(Some(Comparison {
                    op: *op,
                    value: None,
                    member: Some(member.clone()),
                }))
            }
            _ => return Ok(None),
        };
        Ok(Some(Comparison {
            op,
            value: Some(value.clone()),
            member: None,
        }))
    }

    fn pattern(&self) -> Result<Option<String>, ProbeError> {
        Ok(match &self.check {
            Check::Matches(pattern) => Some(pattern.clone()),
            _ => None,
        })
    }

    fn is_credit_card(&self) -> bool {
        matches!(self.check, Check::CreditCard)
    }

    fn is_server_only(&self) -> bool {
        matches!(self.check, Check::Opaque(_))
    }

    fn message(&self) -> Result<Option<MessageSource>, ProbeError> {
        Ok(self.message.clone())
    }

    fn default_message(&self) -> Result<Option<String>, ProbeError> {
        Ok(self.check.fallback_message().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximum_length_also_answers_length_range() {
        let rule = CheckRule::new(Check::MaximumLength(50));
        assert_eq!(rule.max_length_only(), Ok(Some(50)));
        assert_eq!(rule.length_range(), Ok(Some((0, 50))));
        assert_eq!(rule.min_length_only(), Ok(None));
    }

    #[test]
    fn test_member_comparison_has_no_value() {
        let rule = CheckRule::new(Check::CompareMember {
            op: CompareOp::GreaterThan,
            member: "StartDate".to_string(),
        });
        let comparison = rule.comparison().unwrap().unwrap();
        assert_eq!(comparison.op, CompareOp::GreaterThan);
        assert_eq!(comparison.value, None);
        assert_eq!(comparison.member.as_deref(), Some("StartDate"));
    }

    #[test]
    fn test_length_checks_carry_no_markers() {
        for check in [Check::MinimumLength(2), Check::MaximumLength(9), Check::ExactLength(4)] {
            assert!(CheckRule::new(check).markers().is_empty());
        }
    }

    #[test]
    fn test_opaque_check_is_server_only() {
        let rule = CheckRule::new(Check::Opaque("CustomerExistsCheck".to_string()));
        assert!(rule.is_server_only());
        assert!(rule.markers().is_empty());
        assert!(!CheckRule::new(Check::Custom("Unique".to_string())).is_server_only());
    }

    #[test]
    fn test_messages() {
        let rule = CheckRule::new(Check::NotEmpty).with_message("Name please");
        assert_eq!(
            rule.message(),
            Ok(Some(MessageSource::Literal("Name please".to_string())))
        );

        let deferred = CheckRule::new(Check::Email).with_deferred_message();
        assert_eq!(deferred.message(), Ok(Some(MessageSource::Deferred)));
        assert_eq!(deferred.default_message(), Ok(None));
    }

    #[test]
    fn test_custom_name_is_implementation_name() {
        let rule = CheckRule::new(Check::Custom("UniqueUsername".to_string()));
        assert_eq!(rule.name(), "UniqueUsername");
        assert_eq!(rule.markers(), &["CustomValidator"]);
    }
}
