// File: src/classify.rs
// Purpose: Ordered capability dispatch from a constraint to a wire rule

use crate::constraint::{CompareOp, Comparison, Constraint, MessageSource};
use crate::value::{ParamValue, Parameters};
use crate::wire::{RuleKind, WireRule};
use once_cell::sync::Lazy;
use regex::Regex;

type Probe = fn(&dyn Constraint) -> Option<Parameters>;

/// Capability checks in priority order. The first match wins.
///
/// Maximum/minimum length come before the generic length check because a
/// one-sided length constraint also reports a length range.
const CLASSIFIERS: &[(RuleKind, Probe)] = &[
    (RuleKind::Required, probe_required),
    (RuleKind::Email, probe_email),
    (RuleKind::MaxLength, probe_max_length),
    (RuleKind::MinLength, probe_min_length),
    (RuleKind::Length, probe_length),
    (RuleKind::Range, probe_range),
    (RuleKind::Min, probe_min),
    (RuleKind::Max, probe_max),
    (RuleKind::Regex, probe_regex),
    (RuleKind::CreditCard, probe_credit_card),
    (RuleKind::Custom, probe_custom),
];

// Matches validator type names such as `CustomValidator` or `IAsyncPredicateValidator`
static CUSTOM_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(custom|predicate)validator$").expect("custom marker regex")
});

/// Classify one constraint into a wire rule.
///
/// Returns `None` when the constraint has no client-side equivalent.
pub fn classify(constraint: &dyn Constraint) -> Option<WireRule> {
    let (kind, parameters) = CLASSIFIERS
        .iter()
        .find_map(|(kind, probe)| probe(constraint).map(|params| (*kind, params)))?;

    Some(WireRule {
        kind,
        message: resolve_message(constraint, kind, &parameters),
        parameters,
    })
}

/// Message for a classified constraint: literal rule message, then the
/// constraint's own default, then the kind's default. Probe failures count
/// as "no message".
///
/// Literals are used as written; only the default templates get their
/// `{min}`/`{max}`/`{pattern}` placeholders filled from `parameters`.
pub fn resolve_message(
    constraint: &dyn Constraint,
    kind: RuleKind,
    parameters: &Parameters,
) -> String {
    if let Ok(Some(MessageSource::Literal(text))) = constraint.message() {
        if !text.is_empty() {
            return text;
        }
    }

    let template = constraint
        .default_message()
        .ok()
        .flatten()
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| kind.default_message().to_string());
    parameters.format_message(&template)
}

fn probe_required(c: &dyn Constraint) -> Option<Parameters> {
    c.is_required().then(Parameters::new)
}

fn probe_email(c: &dyn Constraint) -> Option<Parameters> {
    c.is_email().then(Parameters::new)
}

fn probe_max_length(c: &dyn Constraint) -> Option<Parameters> {
    let max = c.max_length_only().ok().flatten()?;
    Some(Parameters::new().with("max", max))
}

fn probe_min_length(c: &dyn Constraint) -> Option<Parameters> {
    let min = c.min_length_only().ok().flatten()?;
    Some(Parameters::new().with("min", min))
}

fn probe_length(c: &dyn Constraint) -> Option<Parameters> {
    let (min, max) = c.length_range().ok().flatten()?;
    Some(Parameters::new().with("min", min).with("max", max))
}

fn probe_range(c: &dyn Constraint) -> Option<Parameters> {
    let (min, max) = c.range().ok().flatten()?;
    Some(Parameters::new().with("min", min).with("max", max))
}

fn probe_min(c: &dyn Constraint) -> Option<Parameters> {
    let comparison = c.comparison().ok().flatten()?;
    match comparison.op {
        CompareOp::GreaterThan | CompareOp::GreaterThanOrEqual => {
            Some(bound_parameters("min", comparison))
        }
        _ => None,
    }
}

fn probe_max(c: &dyn Constraint) -> Option<Parameters> {
    let comparison = c.comparison().ok().flatten()?;
    match comparison.op {
        CompareOp::LessThan | CompareOp::LessThanOrEqual => {
            Some(bound_parameters("max", comparison))
        }
        _ => None,
    }
}

// A member comparison has no fixed bound; the client reads the other field instead
fn bound_parameters(bound: &str, comparison: Comparison) -> Parameters {
    let params = Parameters::new().with(bound, comparison.value.unwrap_or(ParamValue::Null));
    match comparison.member {
        Some(member) => params.with("other", member),
        None => params,
    }
}

fn probe_regex(c: &dyn Constraint) -> Option<Parameters> {
    let pattern = c.pattern().ok().flatten()?;
    Some(Parameters::new().with("pattern", pattern))
}

fn probe_credit_card(c: &dyn Constraint) -> Option<Parameters> {
    c.is_credit_card().then(Parameters::new)
}

fn probe_custom(c: &dyn Constraint) -> Option<Parameters> {
    if c.is_server_only() {
        return None;
    }
    let is_custom = CUSTOM_MARKER.is_match(c.name())
        || c.markers().iter().any(|marker| CUSTOM_MARKER.is_match(marker));
    is_custom.then(Parameters::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Check, CheckRule};
    use crate::error::ProbeError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn classify_check(check: Check) -> Option<WireRule> {
        classify(&CheckRule::new(check))
    }

    #[rstest]
    #[case(Check::NotNull, RuleKind::Required)]
    #[case(Check::NotEmpty, RuleKind::Required)]
    #[case(Check::Email, RuleKind::Email)]
    #[case(Check::Length { min: 3, max: 20 }, RuleKind::Length)]
    #[case(Check::ExactLength(5), RuleKind::Length)]
    #[case(Check::MaximumLength(50), RuleKind::MaxLength)]
    #[case(Check::MinimumLength(8), RuleKind::MinLength)]
    #[case(Check::InclusiveBetween(1.into(), 10.into()), RuleKind::Range)]
    #[case(Check::ExclusiveBetween(1.into(), 10.into()), RuleKind::Range)]
    #[case(Check::GreaterThan(0.into()), RuleKind::Min)]
    #[case(Check::GreaterThanOrEqual(0.into()), RuleKind::Min)]
    #[case(Check::LessThan(100.into()), RuleKind::Max)]
    #[case(Check::LessThanOrEqual(100.into()), RuleKind::Max)]
    #[case(Check::Matches("^[a-z]+$".to_string()), RuleKind::Regex)]
    #[case(Check::CreditCard, RuleKind::CreditCard)]
    #[case(Check::Custom("UniqueUsername".to_string()), RuleKind::Custom)]
    #[case(Check::Predicate, RuleKind::Custom)]
    fn test_classification_kind(#[case] check: Check, #[case] expected: RuleKind) {
        let rule = classify_check(check).expect("should classify");
        assert_eq!(rule.kind, expected);
    }

    #[rstest]
    #[case(Check::Equal("yes".into()))]
    #[case(Check::NotEqual(0.into()))]
    #[case(Check::Opaque("ServerOnlyCheck".to_string()))]
    #[case(Check::Opaque("CustomerExistsCheck".to_string()))]
    #[case(Check::Opaque("CustomsDutyLookup".to_string()))]
    #[case(Check::Opaque("LegacyCustomValidator".to_string()))]
    fn test_unmappable_constraints(#[case] check: Check) {
        assert_eq!(classify_check(check), None);
    }

    #[test]
    fn test_length_parameters_and_default_message() {
        let rule = classify_check(Check::Length { min: 3, max: 20 }).unwrap();
        assert_eq!(
            rule,
            WireRule::new(RuleKind::Length, "Must be between 3 and 20 characters.")
                .with_param("min", 3)
                .with_param("max", 20)
        );
    }

    #[test]
    fn test_max_length_wins_over_length() {
        let rule = classify_check(Check::MaximumLength(50)).unwrap();
        assert_eq!(rule.kind, RuleKind::MaxLength);
        assert_eq!(rule.message, "Must not exceed 50 characters.");
        assert_eq!(rule.param("min"), None);
    }

    #[test]
    fn test_literal_message_wins() {
        let rule = classify(
            &CheckRule::new(Check::InclusiveBetween(18.into(), 120.into()))
                .with_message("Age must be between 18 and 120."),
        )
        .unwrap();
        assert_eq!(rule.message, "Age must be between 18 and 120.");
        assert_eq!(rule.param("min"), Some(&ParamValue::Integer(18)));
        assert_eq!(rule.param("max"), Some(&ParamValue::Integer(120)));
    }

    #[test]
    fn test_deferred_message_falls_back_to_default() {
        let rule = classify(&CheckRule::new(Check::Email).with_deferred_message()).unwrap();
        assert_eq!(rule.message, "Please enter a valid email address.");
    }

    #[test]
    fn test_constraint_default_message_beats_kind_default() {
        let rule = classify_check(Check::GreaterThanOrEqual(18.into())).unwrap();
        assert_eq!(rule.message, "Must be at least 18.");
    }

    #[test]
    fn test_member_comparison_emits_null_bound() {
        let rule = classify_check(Check::CompareMember {
            op: CompareOp::LessThan,
            member: "EndDate".to_string(),
        })
        .unwrap();
        assert_eq!(rule.kind, RuleKind::Max);
        assert_eq!(rule.param("max"), Some(&ParamValue::Null));
        assert_eq!(rule.param("other"), Some(&ParamValue::Text("EndDate".to_string())));
    }

    #[test]
    fn test_literal_message_is_not_reformatted() {
        let rule = classify(
            &CheckRule::new(Check::Length { min: 3, max: 20 })
                .with_message("Use {min}-{max} characters"),
        )
        .unwrap();
        assert_eq!(rule.message, "Use {min}-{max} characters");
    }

    #[rstest]
    #[case("CustomValidator", true)]
    #[case("PredicateValidator", true)]
    #[case("IAsyncPredicateValidator", true)]
    #[case("CustomerExistsCheck", false)]
    #[case("CustomsDutyLookup", false)]
    #[case("PredicateLogic", false)]
    fn test_custom_marker_matches_validator_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(CUSTOM_MARKER.is_match(name), expected);
    }

    #[derive(Debug)]
    struct BrokenProbe;

    impl Constraint for BrokenProbe {
        fn name(&self) -> &str {
            "BrokenPatternValidator"
        }

        fn pattern(&self) -> Result<Option<String>, ProbeError> {
            Ok(Some(r"^\d+$".to_string()))
        }

        fn message(&self) -> Result<Option<MessageSource>, ProbeError> {
            Err(ProbeError::Unreadable {
                property: "message",
                reason: "accessor threw".to_string(),
            })
        }

        fn default_message(&self) -> Result<Option<String>, ProbeError> {
            Err(ProbeError::Missing("default_message"))
        }
    }

    #[test]
    fn test_probe_failures_are_swallowed() {
        let rule = classify(&BrokenProbe).unwrap();
        assert_eq!(rule.kind, RuleKind::Regex);
        assert_eq!(rule.message, "Invalid format.");
        assert_eq!(rule.param("pattern"), Some(&ParamValue::Text(r"^\d+$".to_string())));
    }

    #[derive(Debug)]
    struct MarkedOnly;

    impl Constraint for MarkedOnly {
        fn name(&self) -> &str {
            "AsyncLookupValidator"
        }

        fn markers(&self) -> &[&'static str] {
            &["IAsyncPredicateValidator"]
        }
    }

    #[test]
    fn test_custom_heuristic_uses_markers() {
        let rule = classify(&MarkedOnly).unwrap();
        assert_eq!(rule.kind, RuleKind::Custom);
        assert_eq!(rule.message, "Invalid value.");
    }
}
