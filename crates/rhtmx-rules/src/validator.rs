// File: src/validator.rs
// Purpose: Validator handles, the self-description capability, and a fluent rule builder

use crate::constraint::{Check, CheckRule, CompareOp, Constraint};
use crate::error::RulesError;
use crate::model::{Model, ModelType};
use crate::value::ParamValue;
use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Constraints declared on one property, in declaration order
pub type PropertyRules = Vec<Arc<dyn Constraint>>;

/// Structured output of a validator's self-description: property name
/// (unqualified) to its ordered constraints.
#[derive(Debug, Clone, Default)]
pub struct RuleDescriptor {
    properties: Vec<(String, PropertyRules)>,
}

impl RuleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append constraints for a property, merging with earlier declarations
    pub fn add(&mut self, property: impl Into<String>, constraint: Arc<dyn Constraint>) {
        let property = property.into();
        match self.properties.iter_mut().find(|(name, _)| *name == property) {
            Some((_, rules)) => rules.push(constraint),
            None => self.properties.push((property, vec![constraint])),
        }
    }

    pub fn rules_for(&self, property: &str) -> Option<&[Arc<dyn Constraint>]> {
        self.properties
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Arc<dyn Constraint>])> {
        self.properties
            .iter()
            .map(|(name, rules)| (name.as_str(), rules.as_slice()))
    }

    /// Number of properties with at least one constraint
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Self-description capability of a validator
pub trait DescribeRules {
    fn describe_rules(&self) -> Result<RuleDescriptor, RulesError>;
}

/// A validator instance bound to exactly one model type
pub trait Validator: Any + Send + Sync {
    /// Model type this validator is bound to
    fn model(&self) -> ModelType;

    /// Identity of the concrete validator implementation
    fn implementation(&self) -> TypeId {
        self.type_id()
    }

    /// The self-description capability, if the validator exposes one
    fn as_describable(&self) -> Option<&dyn DescribeRules> {
        None
    }
}

/// Declarative validator for a model, built rule by rule.
///
/// # Example
///
/// ```ignore
/// let validator = ModelValidator::<Signup>::new()
///     .rule_for("Email", |r| r.not_empty().email())
///     .rule_for("Username", |r| r.length(3, 20).with_message("3 to 20 characters"));
/// ```
pub struct ModelValidator<T: Model> {
    descriptor: RuleDescriptor,
    _model: PhantomData<fn() -> T>,
}

impl<T: Model> ModelValidator<T> {
    pub fn new() -> Self {
        Self {
            descriptor: RuleDescriptor::new(),
            _model: PhantomData,
        }
    }

    /// Declare the checks for one property
    pub fn rule_for(
        mut self,
        property: &str,
        build: impl FnOnce(RuleBuilder) -> RuleBuilder,
    ) -> Self {
        for rule in build(RuleBuilder::default()).rules {
            self.descriptor.add(property, Arc::new(rule));
        }
        self
    }

    /// Attach an already-built constraint (e.g. from a library binding)
    pub fn constraint(mut self, property: &str, constraint: Arc<dyn Constraint>) -> Self {
        self.descriptor.add(property, constraint);
        self
    }

    /// Shared handle for registration
    pub fn into_handle(self) -> Arc<dyn Validator> {
        Arc::new(self)
    }
}

impl<T: Model> Default for ModelValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model> fmt::Debug for ModelValidator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelValidator")
            .field("model", &std::any::type_name::<T>())
            .field("properties", &self.descriptor.len())
            .finish()
    }
}

impl<T: Model> Validator for ModelValidator<T> {
    fn model(&self) -> ModelType {
        ModelType::of::<T>()
    }

    fn as_describable(&self) -> Option<&dyn DescribeRules> {
        Some(self)
    }
}

impl<T: Model> DescribeRules for ModelValidator<T> {
    fn describe_rules(&self) -> Result<RuleDescriptor, RulesError> {
        Ok(self.descriptor.clone())
    }
}

/// Checks declared for a single property
#[derive(Debug, Default)]
pub struct RuleBuilder {
    rules: Vec<CheckRule>,
}

impl RuleBuilder {
    pub fn check(mut self, check: Check) -> Self {
        self.rules.push(CheckRule::new(check));
        self
    }

    /// Set a literal message on the most recently declared check
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.rules.pop() {
            self.rules.push(last.with_message(message));
        }
        self
    }

    /// Mark the most recent check's message as computed at validation time
    pub fn with_deferred_message(mut self) -> Self {
        if let Some(last) = self.rules.pop() {
            self.rules.push(last.with_deferred_message());
        }
        self
    }

    pub fn not_null(self) -> Self {
        self.check(Check::NotNull)
    }

    pub fn not_empty(self) -> Self {
        self.check(Check::NotEmpty)
    }

    pub fn email(self) -> Self {
        self.check(Check::Email)
    }

    pub fn length(self, min: usize, max: usize) -> Self {
        self.check(Check::Length { min, max })
    }

    pub fn exact_length(self, len: usize) -> Self {
        self.check(Check::ExactLength(len))
    }

    pub fn min_length(self, min: usize) -> Self {
        self.check(Check::MinimumLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.check(Check::MaximumLength(max))
    }

    pub fn inclusive_between(self, from: impl Into<ParamValue>, to: impl Into<ParamValue>) -> Self {
        self.check(Check::InclusiveBetween(from.into(), to.into()))
    }

    pub fn exclusive_between(self, from: impl Into<ParamValue>, to: impl Into<ParamValue>) -> Self {
        self.check(Check::ExclusiveBetween(from.into(), to.into()))
    }

    pub fn greater_than(self, value: impl Into<ParamValue>) -> Self {
        self.check(Check::GreaterThan(value.into()))
    }

    pub fn greater_than_or_equal(self, value: impl Into<ParamValue>) -> Self {
        self.check(Check::GreaterThanOrEqual(value.into()))
    }

    pub fn less_than(self, value: impl Into<ParamValue>) -> Self {
        self.check(Check::LessThan(value.into()))
    }

    pub fn less_than_or_equal(self, value: impl Into<ParamValue>) -> Self {
        self.check(Check::LessThanOrEqual(value.into()))
    }

    pub fn equal(self, value: impl Into<ParamValue>) -> Self {
        self.check(Check::Equal(value.into()))
    }

    pub fn compare_member(self, op: CompareOp, member: impl Into<String>) -> Self {
        self.check(Check::CompareMember {
            op,
            member: member.into(),
        })
    }

    pub fn matches(self, pattern: impl Into<String>) -> Self {
        self.check(Check::Matches(pattern.into()))
    }

    pub fn credit_card(self) -> Self {
        self.check(Check::CreditCard)
    }

    pub fn custom(self, name: impl Into<String>) -> Self {
        self.check(Check::Custom(name.into()))
    }

    pub fn must(self) -> Self {
        self.check(Check::Predicate)
    }

    pub fn server_only(self, name: impl Into<String>) -> Self {
        self.check(Check::Opaque(name.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Property;

    struct Signup;

    impl Model for Signup {
        fn properties() -> Vec<Property> {
            vec![
                Property::of::<String>("Email"),
                Property::of::<String>("Username"),
            ]
        }
    }

    #[test]
    fn test_descriptor_preserves_declaration_order() {
        let validator = ModelValidator::<Signup>::new()
            .rule_for("Email", |r| r.not_empty().email())
            .rule_for("Username", |r| r.length(3, 20));

        let descriptor = validator.describe_rules().unwrap();
        let names: Vec<&str> = descriptor.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Email", "Username"]);

        let email_rules = descriptor.rules_for("Email").unwrap();
        assert_eq!(email_rules.len(), 2);
        assert_eq!(email_rules[0].name(), "NotEmptyValidator");
        assert_eq!(email_rules[1].name(), "EmailValidator");
    }

    #[test]
    fn test_repeated_rule_for_merges() {
        let validator = ModelValidator::<Signup>::new()
            .rule_for("Email", |r| r.not_empty())
            .rule_for("Email", |r| r.email());

        let descriptor = validator.describe_rules().unwrap();
        assert_eq!(descriptor.len(), 1);
        assert_eq!(descriptor.rules_for("Email").unwrap().len(), 2);
    }

    #[test]
    fn test_with_message_applies_to_last_check() {
        let builder = RuleBuilder::default()
            .not_empty()
            .email()
            .with_message("Bad email");
        assert_eq!(builder.rules[0].message, None);
        assert!(builder.rules[1].message.is_some());
    }

    #[test]
    fn test_validator_identity() {
        let validator = ModelValidator::<Signup>::new();
        assert_eq!(validator.model(), ModelType::of::<Signup>());
        assert_eq!(
            Validator::implementation(&validator),
            TypeId::of::<ModelValidator<Signup>>()
        );
        assert!(validator.as_describable().is_some());
    }
}
